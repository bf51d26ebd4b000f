use crate::output_parser::StructuredOutput;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

/// Page count as reported by the model: a number, or a sentinel such as "Not Available".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageCount {
    Count(u32),
    Unavailable(String),
}

impl fmt::Display for PageCount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PageCount::Count(n) => write!(f, "{}", n),
            PageCount::Unavailable(s) => write!(f, "{}", s),
        }
    }
}

/// Document metadata extracted by the analysis prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Metadata {
    #[serde(default)]
    pub summary: Vec<String>,
    pub title: String,
    pub author: String,
    pub date_created: String,
    pub last_modified_date: String,
    pub publisher: String,
    pub language: String,
    pub page_count: PageCount,
    pub sentiment_tone: String,
}

impl StructuredOutput for Metadata {
    fn schema() -> serde_json::Value {
        let text = json!({"type": "string"});
        json!({
            "title": "Metadata",
            "type": "object",
            "properties": {
                "Summary": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Summary of the document"
                },
                "Title": text,
                "Author": text,
                "DateCreated": text,
                "LastModifiedDate": text,
                "Publisher": text,
                "Language": text,
                "PageCount": {
                    "anyOf": [{"type": "integer"}, {"type": "string"}],
                    "description": "Number of pages, or \"Not Available\""
                },
                "SentimentTone": text
            },
            "required": [
                "Title", "Author", "DateCreated", "LastModifiedDate",
                "Publisher", "Language", "PageCount", "SentimentTone"
            ]
        })
    }
}

/// One row of a document comparison: where it changed, and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangeRecord {
    pub page: String,
    pub changes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparisonTable {
    pub rows: Vec<ChangeRecord>,
}

impl ComparisonTable {
    pub const COLUMNS: [&'static str; 2] = ["Page", "Changes"];

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

impl StructuredOutput for ComparisonTable {
    fn schema() -> serde_json::Value {
        json!({
            "title": "ComparisonTable",
            "type": "array",
            "items": {
                "type": "object",
                "properties": {
                    "Page": {"type": "string", "description": "Page number"},
                    "Changes": {"type": "string", "description": "Changes on that page, or NO CHANGE"}
                },
                "required": ["Page", "Changes"]
            }
        })
    }
}

impl fmt::Display for ComparisonTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let page_width = self
            .rows
            .iter()
            .map(|row| row.page.chars().count())
            .chain(std::iter::once(Self::COLUMNS[0].len()))
            .max()
            .unwrap_or(0);

        writeln!(f, "{:<width$} | {}", Self::COLUMNS[0], Self::COLUMNS[1], width = page_width)?;
        writeln!(f, "{}-+-{}", "-".repeat(page_width), "-".repeat(Self::COLUMNS[1].len()))?;
        for row in &self.rows {
            writeln!(f, "{:<width$} | {}", row.page, row.changes, width = page_width)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_accepts_number_or_sentinel() {
        let numeric: PageCount = serde_json::from_value(json!(12)).unwrap();
        assert_eq!(numeric, PageCount::Count(12));
        let sentinel: PageCount = serde_json::from_value(json!("Not Available")).unwrap();
        assert_eq!(sentinel.to_string(), "Not Available");
    }

    #[test]
    fn metadata_uses_pascal_case_keys() {
        let metadata: Metadata = serde_json::from_value(json!({
            "Title": "Attention Is All You Need",
            "Author": "Vaswani et al.",
            "DateCreated": "2017-06-12",
            "LastModifiedDate": "2017-12-06",
            "Publisher": "NeurIPS",
            "Language": "English",
            "PageCount": 15,
            "SentimentTone": "Neutral"
        }))
        .unwrap();
        assert!(metadata.summary.is_empty());
        assert_eq!(metadata.page_count, PageCount::Count(15));

        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(value["SentimentTone"], "Neutral");
    }

    #[test]
    fn table_renders_aligned_rows() {
        let table = ComparisonTable {
            rows: vec![
                ChangeRecord { page: "Page 1".into(), changes: "NO CHANGE".into() },
                ChangeRecord { page: "Page 12".into(), changes: "Revenue figure updated".into() },
            ],
        };
        let rendered = table.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Page    | Changes");
        assert_eq!(lines[2], "Page 1  | NO CHANGE");
        assert_eq!(lines[3], "Page 12 | Revenue figure updated");
    }
}
