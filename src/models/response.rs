use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::models::chart::ChartSpec;
use crate::models::conversation::ChatEntry;
use crate::models::dataset::Dataset;
use crate::models::upload::UploadState;

/// Tab the shell should show
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActiveView {
    #[serde(rename = "chat")]
    Chat,
    #[serde(rename = "preview")]
    Preview,
}

/// Read-only view model of the whole session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub messages: Vec<ChatEntry>,
    pub upload: UploadState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<Dataset>,
    pub active_view: ActiveView,
    pub is_typing: bool,
    pub clear_pending: bool,
    pub memory_usage: u8,
}

/// Response for file selection
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response for text submission
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Currently live chart in the shared container
#[derive(Debug, Serialize, Deserialize)]
pub struct ChartResponse {
    pub container: String,
    pub spec: ChartSpec,
    /// `data:image/svg+xml;base64,...` ready for an `<img>` tag
    pub data_uri: String,
}

/// Error response for API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status_code: u16,
}
