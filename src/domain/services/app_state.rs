#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use anyhow::Result;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;

use super::Scroll;
use crate::domain::models::Action;
use crate::domain::models::ChatSession;
use crate::domain::models::Event;
use crate::domain::models::Languages;
use crate::domain::models::Notice;
use crate::domain::models::PendingUpload;
use crate::domain::models::QaRecord;
use crate::domain::models::MAX_UPLOAD_BYTES;

/// The full client state. All mutations happen here, either synchronously in
/// a trigger method or in the [`AppState::handle_api_event`] reducer; the
/// view only reads a snapshot and dispatches triggers.
pub struct AppState {
    pub sessions: Vec<ChatSession>,
    pub selected_chat_id: Option<String>,
    pub history: Vec<QaRecord>,
    pub expanded: Option<usize>,
    pub selected_file: Option<PendingUpload>,
    pub upload_progress: u8,
    pub language: String,
    pub answer: String,
    pub notice: Option<Notice>,
    pub loading_sessions: bool,
    pub processing: bool,
    pub uploading: bool,
    pub scroll: Scroll,
    pub last_known_width: u16,
    pub last_known_height: u16,
}

impl AppState {
    pub fn new(language: &str) -> AppState {
        return AppState {
            sessions: vec![],
            selected_chat_id: None,
            history: vec![],
            expanded: None,
            selected_file: None,
            upload_progress: 0,
            language: language.to_string(),
            answer: "".to_string(),
            notice: None,
            loading_sessions: false,
            processing: false,
            uploading: false,
            scroll: Scroll::default(),
            last_known_width: 0,
            last_known_height: 0,
        };
    }

    /// Kicks off a session-list refresh. Failures come back as
    /// [`Event::SessionsFailed`], never as an error from the fetch itself.
    pub fn refresh_sessions(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        self.loading_sessions = true;
        tx.send(Action::ListSessions())?;

        return Ok(());
    }

    /// Validates a picked file. A rejected file always clears the previous
    /// selection.
    pub fn select_file(&mut self, upload: PendingUpload) {
        if !upload.is_pdf() {
            self.notice = Some(Notice::error("Please select a valid PDF file."));
            self.selected_file = None;
            return;
        }

        if upload.size > MAX_UPLOAD_BYTES {
            self.notice = Some(Notice::error(
                "File is too large. Please select a file smaller than 10MB.",
            ));
            self.selected_file = None;
            return;
        }

        self.selected_file = Some(upload);
        self.notice = None;
    }

    /// Starts the upload of the selected file as a new session. No request is
    /// issued without a selected file.
    pub fn begin_upload(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        let upload = match self.selected_file.clone() {
            Some(upload) => upload,
            None => {
                self.notice = Some(Notice::error("Please select a PDF file!"));
                return Ok(());
            }
        };

        self.processing = true;
        self.uploading = true;
        self.upload_progress = 0;
        self.notice = None;
        tx.send(Action::CreateSession(upload))?;

        return Ok(());
    }

    /// Selects a session and requests its history. Callers must pass an id
    /// present in the session collection. The displayed history is discarded
    /// immediately so it never shows another session's records.
    pub fn select_session(&mut self, id: &str, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        self.selected_chat_id = Some(id.to_string());
        self.history = vec![];
        self.expanded = None;
        self.sync_dependants();
        tx.send(Action::FetchHistory(id.to_string()))?;

        return Ok(());
    }

    /// Submits a question against the selected session. Both guards fail
    /// without issuing a request.
    pub fn submit_question(&mut self, text: &str, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        if text.is_empty() {
            self.notice = Some(Notice::error("Please enter a question!"));
            return Ok(());
        }

        let chat_id = match self.selected_chat_id.clone() {
            Some(id) => id,
            None => {
                self.notice = Some(Notice::error("Please select a chat!"));
                return Ok(());
            }
        };

        self.processing = true;
        self.notice = None;
        tx.send(Action::AskQuestion {
            question: text.to_string(),
            language_code: self.language.to_string(),
            chat_id,
        })?;

        return Ok(());
    }

    /// Expands the record at `index`, collapsing whichever one was expanded
    /// before. Expanding the same index again collapses it.
    pub fn toggle_expanded(&mut self, index: usize) {
        if index >= self.history.len() {
            return;
        }

        if self.expanded == Some(index) {
            self.expanded = None;
        } else {
            self.expanded = Some(index);
        }

        self.sync_dependants();
    }

    pub fn set_language(&mut self, code: &str) -> bool {
        if !Languages::is_supported(code) {
            return false;
        }

        self.language = code.to_string();
        return true;
    }

    pub fn session_at(&self, index: usize) -> Option<&ChatSession> {
        return self.sessions.get(index);
    }

    pub fn selected_session_index(&self) -> Option<usize> {
        let id = self.selected_chat_id.as_ref()?;
        return self.sessions.iter().position(|session| return &session.id == id);
    }

    /// Applies one asynchronous result. Each arm leaves the state consistent
    /// for that operation before returning.
    pub fn handle_api_event(&mut self, event: Event) {
        match event {
            Event::SessionsLoading() => {
                self.loading_sessions = true;
            }
            Event::SessionsLoaded(sessions) => {
                self.sessions = sessions;
                self.loading_sessions = false;
            }
            Event::SessionsFailed(err) => {
                self.sessions = vec![];
                self.notice = Some(Notice::error(&format!(
                    "Failed to fetch chat sessions: {err}"
                )));
                self.loading_sessions = false;
            }
            Event::HistoryLoaded(chat_id, records) => {
                // A fetch for a session that is no longer selected must not
                // overwrite the current view.
                if self.selected_chat_id.as_deref() == Some(chat_id.as_str()) {
                    self.history = records;
                    self.sync_dependants();
                    self.scroll.last();
                }
            }
            Event::HistoryFailed(err) => {
                self.notice = Some(Notice::error(&format!(
                    "Failed to fetch questions for the selected chat: {err}"
                )));
            }
            Event::UploadProgress(percent) => {
                // Progress is monotonic within one attempt; a late-arriving
                // smaller chunk report never walks it backwards.
                self.upload_progress = self.upload_progress.max(percent.min(100));
            }
            Event::SessionCreated(chat_id) => {
                self.notice = Some(Notice::success("New chat created successfully!"));
                self.selected_file = None;
                self.upload_progress = 0;
                self.selected_chat_id = Some(chat_id);
                self.history = vec![];
                self.expanded = None;
                self.processing = false;
                self.uploading = false;
                self.sync_dependants();
            }
            Event::UploadFailed(err) => {
                self.notice = Some(Notice::error(&format!("Error creating new chat: {err}")));
                self.processing = false;
                self.uploading = false;
            }
            Event::AnswerReceived(answer) => {
                self.answer = answer;
                self.processing = false;
            }
            Event::QuestionFailed(err) => {
                self.notice = Some(Notice::error(&format!("Error asking question: {err}")));
                self.processing = false;
            }
            _ => (),
        }
    }

    /// Display lines for the history pane at the last known width.
    pub fn history_lines(&self) -> Vec<String> {
        let width = self.last_known_width.max(10) as usize;
        return self
            .history
            .iter()
            .enumerate()
            .flat_map(|(idx, record)| {
                return record.as_string_lines(self.expanded == Some(idx), width);
            })
            .collect();
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    fn sync_dependants(&mut self) {
        self.scroll
            .set_state(self.history_lines().len() as u16, self.last_known_height);
    }
}
