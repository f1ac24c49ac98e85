use serde::{Deserialize, Serialize};

/// The only content type accepted for uploads
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// A file handed over by the shell. Only `name` and `mime_type` are looked
/// at; the bytes are kept opaque.
#[derive(Debug, Clone)]
pub struct FileHandle {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn is_spreadsheet(&self) -> bool {
        self.mime_type == XLSX_MIME_TYPE
    }
}

/// Lifecycle of an upload. Only moves forward; a new file restarts it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "uploading")]
    Uploading,
    #[serde(rename = "processing")]
    Processing,
    #[serde(rename = "ready")]
    Ready,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadState {
    pub file_name: String,
    pub progress_percent: u8,
    pub phase: Phase,
}

impl Default for UploadState {
    fn default() -> Self {
        Self {
            file_name: String::new(),
            progress_percent: 0,
            phase: Phase::Idle,
        }
    }
}

impl UploadState {
    /// Restart for a freshly selected file.
    pub fn begin(&mut self, file_name: &str) {
        self.file_name = file_name.to_string();
        self.progress_percent = 0;
        self.phase = Phase::Uploading;
    }

    /// Advance progress by `step`, capped at 100. Returns true once the
    /// upload has reached 100 and moved on to processing.
    pub fn advance(&mut self, step: u8) -> bool {
        if self.phase != Phase::Uploading {
            return false;
        }
        self.progress_percent = self.progress_percent.saturating_add(step).min(100);
        if self.progress_percent == 100 {
            self.phase = Phase::Processing;
            return true;
        }
        false
    }

    pub fn mark_ready(&mut self) {
        if self.phase == Phase::Processing {
            self.phase = Phase::Ready;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_reaches_exactly_100_then_processes() {
        let mut state = UploadState::default();
        state.begin("sales.xlsx");
        let mut seen = vec![state.progress_percent];
        while !state.advance(30) {
            seen.push(state.progress_percent);
            assert_eq!(state.phase, Phase::Uploading);
        }
        seen.push(state.progress_percent);
        assert_eq!(seen, vec![0, 30, 60, 90, 100]);
        assert_eq!(state.phase, Phase::Processing);
        assert!(!state.advance(30));
        assert_eq!(state.progress_percent, 100);
    }

    #[test]
    fn ready_only_follows_processing() {
        let mut state = UploadState::default();
        state.mark_ready();
        assert_eq!(state.phase, Phase::Idle);
    }
}
