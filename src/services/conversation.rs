use crate::models::conversation::ChatEntry;

pub const WELCOME_MESSAGE: &str = "Hello! I'm Excel Insight Chatbot. Upload an Excel file (.xlsx) to get started, and I'll help you analyze your data.";
pub const CLEARED_MESSAGE: &str =
    "Chat history has been cleared. You can continue asking questions about your data.";

/// Append-only chat log. Insertion order is display order.
///
/// Clearing is a two step interaction: `request_clear` opens the
/// confirmation, `confirm_clear` performs it. A confirm without a pending
/// request does nothing.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    entries: Vec<ChatEntry>,
    clear_pending: bool,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            entries: vec![ChatEntry::system(WELCOME_MESSAGE)],
            clear_pending: false,
        }
    }

    pub fn append(&mut self, entry: ChatEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn request_clear(&mut self) {
        self.clear_pending = true;
    }

    pub fn cancel_clear(&mut self) {
        self.clear_pending = false;
    }

    pub fn is_clear_pending(&self) -> bool {
        self.clear_pending
    }

    /// Reset to the single seed entry if a clear was requested.
    /// Returns whether the log was cleared.
    pub fn confirm_clear(&mut self) -> bool {
        if !self.clear_pending {
            return false;
        }
        self.entries = vec![ChatEntry::system(CLEARED_MESSAGE)];
        self.clear_pending = false;
        true
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}
