use crate::error::{DocumentPortalError, Result};
use crate::llm::ChatModel;
use crate::model::Metadata;
use crate::output_parser::OutputFixingParser;
use crate::prompt::{self, DOCUMENT_ANALYSIS};
use log::{error, info};

/// Extracts [`Metadata`] and a summary from a single document's text.
pub struct DocumentAnalyzer {
    llm: Box<dyn ChatModel>,
}

impl DocumentAnalyzer {
    pub fn new(llm: Box<dyn ChatModel>) -> Self {
        info!("DocumentAnalyzer initialized with {}", llm.model_name());
        DocumentAnalyzer { llm }
    }

    pub fn model_name(&self) -> String {
        self.llm.model_name()
    }

    pub async fn analyze(&self, document_text: &str) -> Result<Metadata> {
        if document_text.trim().is_empty() {
            return Err(DocumentPortalError::Validation(
                "Document has no extractable text".to_string(),
            ));
        }

        let parser = OutputFixingParser::<Metadata>::new(self.llm.as_ref());
        let instructions = parser.format_instructions();
        let prompt = prompt::get(DOCUMENT_ANALYSIS)?.render(&[
            ("format_instructions", instructions.as_str()),
            ("document_text", document_text),
        ])?;

        let reply = self.llm.invoke(&prompt).await.map_err(|e| {
            error!("Metadata analysis failed: {}", e);
            e
        })?;
        let metadata = parser.parse(&reply).await?;

        info!(
            "Metadata extraction successful: title={:?}, summary_sentences={}",
            metadata.title,
            metadata.summary.len()
        );
        Ok(metadata)
    }
}
