use thiserror::Error;

/// Conditions the insight session can run into. Most of them are normal
/// conversational branches that end up as a system chat entry; only
/// `Internal` indicates an actual fault.
#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Unsupported file type: {mime_type}")]
    UnsupportedFileType { mime_type: String },

    #[error("Query is empty")]
    EmptyQuery,

    #[error("No dataset loaded yet")]
    DatasetNotReady,

    #[error("Query did not match any known intent")]
    UnrecognizedIntent,

    #[error("Another query is still being answered")]
    Busy,

    // raised by a real spreadsheet reader behind DatasetSource
    #[allow(dead_code)]
    #[error("Spreadsheet could not be parsed: {message}")]
    MalformedSpreadsheet { message: String },

    #[error("File is too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: usize, limit: usize },

    // raised by a real spreadsheet reader behind DatasetSource
    #[allow(dead_code)]
    #[error("Only part of the spreadsheet could be read: {message}")]
    PartialExtraction { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl InsightError {
    /// HTTP status used when the condition reaches the API surface.
    pub fn status_code(&self) -> u16 {
        match self {
            InsightError::UnsupportedFileType { .. } => 415,
            InsightError::EmptyQuery => 400,
            InsightError::DatasetNotReady => 409,
            InsightError::UnrecognizedIntent => 422,
            InsightError::Busy => 429,
            InsightError::MalformedSpreadsheet { .. } => 422,
            InsightError::FileTooLarge { .. } => 413,
            InsightError::PartialExtraction { .. } => 422,
            InsightError::Internal(_) => 500,
        }
    }
}
