use crate::error::Result;
use crate::llm::ChatModel;
use crate::model::ComparisonTable;
use crate::output_parser::OutputFixingParser;
use crate::prompt::{self, DOCUMENT_COMPARISON};
use log::{error, info};

/// Asks the model for a page-wise diff between two documents.
pub struct DocumentComparator {
    llm: Box<dyn ChatModel>,
}

impl DocumentComparator {
    pub fn new(llm: Box<dyn ChatModel>) -> Self {
        DocumentComparator { llm }
    }

    pub fn model_name(&self) -> String {
        self.llm.model_name()
    }

    pub async fn compare(&self, reference_text: &str, actual_text: &str) -> Result<ComparisonTable> {
        let parser = OutputFixingParser::<ComparisonTable>::new(self.llm.as_ref());
        let instructions = parser.format_instructions();
        let prompt = prompt::get(DOCUMENT_COMPARISON)?.render(&[
            ("reference_text", reference_text),
            ("actual_text", actual_text),
            ("format_instructions", instructions.as_str()),
        ])?;

        info!("Starting document comparison with {}", self.llm.model_name());
        let reply = self.llm.invoke(&prompt).await.map_err(|e| {
            error!("Error in compare_documents: {}", e);
            e
        })?;
        let table = parser.parse(&reply).await?;

        info!("Document comparison completed: rows={}", table.len());
        Ok(table)
    }
}
