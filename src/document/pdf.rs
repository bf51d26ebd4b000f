//! Page-by-page text extraction on top of `lopdf`.

use crate::error::{DocumentPortalError, Result};
use log::{debug, warn};
use lopdf::Document;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-indexed page number.
    pub number: u32,
    pub text: String,
}

fn load(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(DocumentPortalError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "PDF file not found"),
        ));
    }
    Document::load(path).map_err(|e| {
        let message = e.to_string();
        if message.contains("encrypt") || message.contains("password") {
            DocumentPortalError::pdf(path, format!("PDF is encrypted: {}", message))
        } else {
            DocumentPortalError::pdf(path, format!("Failed to load PDF: {}", message))
        }
    })
}

/// Extracts every page's raw text in page order.
///
/// With `reject_encrypted` set, an encrypted document fails before any page
/// is read.
pub fn extract_pages(path: &Path, reject_encrypted: bool) -> Result<Vec<PageText>> {
    let doc = load(path)?;

    if doc.is_encrypted() {
        if reject_encrypted {
            let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
            return Err(DocumentPortalError::pdf(
                path,
                format!("PDF is encrypted {}", name.unwrap_or_default()),
            ));
        }
        warn!("Reading encrypted PDF without a password: {}", path.display());
    }

    let mut pages = Vec::new();
    for (number, _object_id) in doc.get_pages() {
        let text = doc.extract_text(&[number]).map_err(|e| {
            DocumentPortalError::pdf(
                path,
                format!("Failed to extract text from page {}: {}", number, e),
            )
        })?;
        debug!("Extracted page {} ({} chars) from {}", number, text.len(), path.display());
        pages.push(PageText { number, text });
    }
    Ok(pages)
}

/// Every page under a `--- Page N ---` header.
pub fn render_pages(pages: &[PageText]) -> String {
    pages
        .iter()
        .map(|page| format!("\n--- Page {} ---\n{}", page.number, page.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Like [`render_pages`], but blank pages are dropped.
pub fn render_non_blank_pages(pages: &[PageText]) -> String {
    pages
        .iter()
        .filter(|page| !page.text.trim().is_empty())
        .map(|page| format!("\n --- Page {} --- \n{}", page.number, page.text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
pub(crate) mod test_support {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Builds a PDF with one page per entry; an empty entry gives a page with no text.
    pub fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
        save(build(pages))
    }

    /// Same pages, with a standard-security `Encrypt` entry in the trailer.
    /// Page content stays in the clear.
    pub fn encrypted_pdf_bytes(pages: &[&str]) -> Vec<u8> {
        let mut doc = build(pages);
        let encrypt_id = doc.add_object(dictionary! {
            "Filter" => "Standard",
            "V" => 1,
            "R" => 2,
            "O" => Object::string_literal(vec![0u8; 32]),
            "U" => Object::string_literal(vec![0u8; 32]),
            "P" => -4,
        });
        doc.trailer.set("Encrypt", encrypt_id);
        save(doc)
    }

    fn save(mut doc: Document) -> Vec<u8> {
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn build(pages: &[&str]) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let mut operations = vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
            ];
            if !text.is_empty() {
                operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
            }
            operations.push(Operation::new("ET", vec![]));
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }
}
