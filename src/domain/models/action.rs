use super::PendingUpload;

/// Requests the UI sends to the worker task. Each one maps to a single
/// network-issuing operation.
pub enum Action {
    ListSessions(),
    CreateSession(PendingUpload),
    FetchHistory(String),
    AskQuestion {
        question: String,
        language_code: String,
        chat_id: String,
    },
}
