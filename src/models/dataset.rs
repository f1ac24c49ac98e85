use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single spreadsheet cell in the preview
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum CellValue {
    Int(i64),
    Text(String),
}

impl CellValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CellValue::Int(v) => Some(*v),
            CellValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            CellValue::Int(_) => None,
        }
    }
}

pub type Row = HashMap<String, CellValue>;

/// Number of rows kept for the data preview tab
pub const PREVIEW_ROWS: usize = 10;

/// Tabular data produced once per successful upload and replaced wholesale
/// by the next one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub sample_rows: Vec<Row>,
    pub row_count: usize,
    pub column_count: usize,
    pub missing_value_count: usize,
}

impl Dataset {
    /// Build a dataset, deriving `column_count` from `columns`.
    pub fn new(
        columns: Vec<String>,
        sample_rows: Vec<Row>,
        row_count: usize,
        missing_value_count: usize,
    ) -> Self {
        let column_count = columns.len();
        Self {
            columns,
            sample_rows,
            row_count,
            column_count,
            missing_value_count,
        }
    }

    /// Integer values of `column` across the sample, skipping non-integers
    pub fn int_column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = i64> + 'a {
        self.sample_rows
            .iter()
            .filter_map(move |row| row.get(column).and_then(CellValue::as_int))
    }

    /// Text values of `column` across the sample, skipping non-text
    pub fn text_column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.sample_rows
            .iter()
            .filter_map(move |row| row.get(column).and_then(CellValue::as_text))
    }
}
