//! Turning free-form LLM replies into typed records.

use crate::error::{DocumentPortalError, Result};
use crate::llm::ChatModel;
use log::{debug, warn};
use regex::Regex;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::OnceLock;

/// A type the LLM is asked to produce as JSON.
pub trait StructuredOutput: DeserializeOwned {
    /// JSON schema sent to the model as format instructions.
    fn schema() -> serde_json::Value;
}

fn fenced_block() -> &'static Regex {
    static FENCED: OnceLock<Regex> = OnceLock::new();
    FENCED.get_or_init(|| {
        Regex::new(r"(?s)```(?:json|JSON)?\s*\n?(.*?)```").expect("static fence regex")
    })
}

/// Pulls the JSON payload out of a reply that may wrap it in Markdown or prose.
pub fn extract_json(text: &str) -> &str {
    let text = text.trim();
    if let Some(caps) = fenced_block().captures(text) {
        if let Some(body) = caps.get(1) {
            return body.as_str().trim();
        }
    }

    let start = text.find(|c: char| c == '{' || c == '[');
    let end = text.rfind(|c: char| c == '}' || c == ']');
    match (start, end) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

pub struct JsonOutputParser<T> {
    _target: PhantomData<T>,
}

impl<T: StructuredOutput> Default for JsonOutputParser<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: StructuredOutput> JsonOutputParser<T> {
    pub fn new() -> Self {
        JsonOutputParser {
            _target: PhantomData,
        }
    }

    pub fn format_instructions(&self) -> String {
        let schema = serde_json::to_string_pretty(&T::schema()).unwrap_or_default();
        format!(
            "The output should be formatted as a JSON instance that conforms to the JSON schema below.\n\n\
             Here is the output schema:\n```\n{}\n```",
            schema
        )
    }

    pub fn parse(&self, text: &str) -> Result<T> {
        let payload = extract_json(text);
        serde_json::from_str(payload).map_err(|e| {
            debug!("Unparsable model output: {}", payload);
            DocumentPortalError::Upstream(format!("Failed to parse model output as JSON: {}", e))
        })
    }
}

/// Parses with [`JsonOutputParser`]; on failure asks the model once to repair its reply.
pub struct OutputFixingParser<'a, T> {
    parser: JsonOutputParser<T>,
    llm: &'a dyn ChatModel,
}

impl<'a, T: StructuredOutput> OutputFixingParser<'a, T> {
    pub fn new(llm: &'a dyn ChatModel) -> Self {
        OutputFixingParser {
            parser: JsonOutputParser::new(),
            llm,
        }
    }

    pub fn format_instructions(&self) -> String {
        self.parser.format_instructions()
    }

    pub async fn parse(&self, completion: &str) -> Result<T> {
        match self.parser.parse(completion) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!("Model output did not parse, asking {} to fix it: {}", self.llm.model_name(), err);
                let fixed = self.llm.invoke(&self.fix_prompt(completion, &err)).await?;
                self.parser.parse(&fixed)
            }
        }
    }

    fn fix_prompt(&self, completion: &str, err: &DocumentPortalError) -> String {
        format!(
            "Instructions:\n--------------\n{}\n--------------\n\
             Completion:\n--------------\n{}\n--------------\n\n\
             Above, the Completion did not satisfy the constraints given in the Instructions.\n\
             Error:\n--------------\n{}\n--------------\n\n\
             Please try again. Please only respond with an answer that satisfies the constraints laid out in the Instructions:",
            self.format_instructions(),
            completion,
            err
        )
    }
}
