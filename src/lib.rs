pub mod analyzer;
pub mod comparator;
pub mod config;
pub mod document;
pub mod error;
pub mod llm;
pub mod logging;
pub mod model;
pub mod model_loader;
pub mod output_parser;
pub mod prompt;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use analyzer::DocumentAnalyzer;
pub use comparator::DocumentComparator;
pub use config::{Config, EnvSettings};
pub use document::{DocumentHandler, DocumentIngestion, InMemoryFile, LocalFile, UploadedFile};
pub use error::DocumentPortalError;
pub use llm::ChatModel;
pub use model::{ComparisonTable, Metadata};
pub use model_loader::ModelLoader;
