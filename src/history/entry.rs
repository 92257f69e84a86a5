use serde::{Deserialize, Serialize};

pub const SUMMARY_MAX_CHARS: usize = 50;
const ELLIPSIS: &str = "...";

/// One persisted classification summary. Field names on disk match the
/// records the browser client kept in local storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub timestamp: String,
    #[serde(rename = "text")]
    pub text_summary: String,
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
    #[serde(rename = "prioridade", default)]
    pub priority: Option<String>,
    #[serde(rename = "processingTime", default)]
    pub processing_time_ms: u64,
}

/// What the caller knows about a finished classification.
#[derive(Debug, Clone, Copy)]
pub struct HistorySource<'a> {
    pub text: &'a str,
    pub category: Option<&'a str>,
    pub priority: Option<&'a str>,
    pub processing_time_ms: u64,
}

pub fn summarize(text: &str) -> String {
    match text.char_indices().nth(SUMMARY_MAX_CHARS) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}
