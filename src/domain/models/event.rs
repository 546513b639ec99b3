use tui_textarea::Input;

use super::ChatSession;
use super::QaRecord;

pub enum Event {
    // API results. History events carry the id they were fetched for so the
    // reducer can drop results that arrive after the selection moved on.
    SessionsLoading(),
    SessionsLoaded(Vec<ChatSession>),
    SessionsFailed(String),
    HistoryLoaded(String, Vec<QaRecord>),
    HistoryFailed(String),
    UploadProgress(u8),
    SessionCreated(String),
    UploadFailed(String),
    AnswerReceived(String),
    QuestionFailed(String),
    // Terminal input.
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardEnter(),
    KeyboardPaste(String),
    SessionsNext(),
    SessionsPrevious(),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
}
