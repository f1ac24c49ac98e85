use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::models::dataset::Row;

/// Who wrote a chat entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Author {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "system")]
    System,
}

/// Rows attached to a reply, shown as a small table under the text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// One line of the conversation. Entries are never edited after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEntry {
    pub author: Author,
    pub text: String,
    pub has_chart: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TablePreview>,
    pub timestamp: DateTime<Utc>,
}

impl ChatEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Author::User, text.into(), false, None)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Author::System, text.into(), false, None)
    }

    pub fn with_chart(text: impl Into<String>) -> Self {
        Self::new(Author::System, text.into(), true, None)
    }

    pub fn with_table(text: impl Into<String>, table: TablePreview) -> Self {
        Self::new(Author::System, text.into(), false, Some(table))
    }

    fn new(author: Author, text: String, has_chart: bool, table: Option<TablePreview>) -> Self {
        Self {
            author,
            text,
            has_chart,
            table,
            timestamp: Utc::now(),
        }
    }
}

/// Body of `POST /messages` and `POST /suggestions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub text: String,
}
