pub mod file_utils;

pub use file_utils::{clear_directory, collect_pdf_files, validate_pdf_name};
