use crate::error::{DocumentPortalError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

pub const DOCUMENT_ANALYSIS: &str = "document_analysis";
pub const DOCUMENT_COMPARISON: &str = "document_comparison";

const DOCUMENT_ANALYSIS_TEMPLATE: &str = "\
You are a highly capable assistant trained to analyze and summarize documents.
Return ONLY valid JSON matching the exact schema below.

{format_instructions}

Analyze this document:
{document_text}
";

const DOCUMENT_COMPARISON_TEMPLATE: &str = "\
You will be provided with content from two PDFs. Your tasks are as follows:

1. Compare the content in the two PDFs.
2. Identify the differences and note down the page number.
3. The output you provide must be page wise comparison content.
4. If any page does not have any change, mention as 'NO CHANGE'.

Reference document:
{reference_text}

Actual document:
{actual_text}

Your response should follow this format:

{format_instructions}
";

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").expect("static placeholder regex"))
}

/// A template with `{name}` placeholders.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: &'static str,
}

impl PromptTemplate {
    pub const fn new(template: &'static str) -> Self {
        PromptTemplate { template }
    }

    pub fn variables(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for caps in placeholder().captures_iter(self.template) {
            if !names.iter().any(|n| n == &caps[1]) {
                names.push(caps[1].to_string());
            }
        }
        names
    }

    /// Fills every placeholder; any left unfilled is an error.
    pub fn render(&self, values: &[(&str, &str)]) -> Result<String> {
        let values: HashMap<&str, &str> = values.iter().copied().collect();
        let missing: Vec<String> = self
            .variables()
            .into_iter()
            .filter(|name| !values.contains_key(name.as_str()))
            .collect();
        if !missing.is_empty() {
            return Err(DocumentPortalError::Config(format!(
                "prompt is missing values for: {}",
                missing.join(", ")
            )));
        }

        // Single pass, so braces inside substituted document text are left alone.
        let rendered = placeholder().replace_all(self.template, |caps: &regex::Captures| {
            values.get(&caps[1]).copied().unwrap_or_default().to_string()
        });
        Ok(rendered.into_owned())
    }
}

pub fn get(name: &str) -> Result<PromptTemplate> {
    match name {
        DOCUMENT_ANALYSIS => Ok(PromptTemplate::new(DOCUMENT_ANALYSIS_TEMPLATE)),
        DOCUMENT_COMPARISON => Ok(PromptTemplate::new(DOCUMENT_COMPARISON_TEMPLATE)),
        other => Err(DocumentPortalError::Config(format!(
            "no prompt registered as {}",
            other
        ))),
    }
}
