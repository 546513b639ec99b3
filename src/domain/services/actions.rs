#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::PendingUpload;
use crate::infrastructure::api::ApiBox;

fn failure_text(err: anyhow::Error) -> String {
    let text = err.to_string();
    if text.is_empty() {
        return "Unknown error".to_string();
    }

    return text;
}

/// List failures never propagate; they are folded into the message slot.
/// Every refresh announces itself first so the loading flag rises no matter
/// which operation triggered it.
async fn list_sessions(api: &ApiBox, tx: &mpsc::UnboundedSender<Event>) -> Result<()> {
    tx.send(Event::SessionsLoading())?;
    match api.list_sessions().await {
        Ok(sessions) => {
            tx.send(Event::SessionsLoaded(sessions))?;
        }
        Err(err) => {
            tracing::error!(error = ?err, "Failed to fetch chat sessions");
            tx.send(Event::SessionsFailed(failure_text(err)))?;
        }
    }

    return Ok(());
}

async fn fetch_history(api: &ApiBox, tx: &mpsc::UnboundedSender<Event>, chat_id: &str) -> Result<()> {
    match api.chat_history(chat_id).await {
        Ok(records) => {
            tx.send(Event::HistoryLoaded(chat_id.to_string(), records))?;
        }
        Err(err) => {
            tracing::error!(error = ?err, chat_id = chat_id, "Failed to fetch chat history");
            tx.send(Event::HistoryFailed(failure_text(err)))?;
        }
    }

    return Ok(());
}

/// A successful upload refreshes the session list before reporting the new
/// session, so the selection lands on an entry the list already contains.
async fn create_session(
    api: &ApiBox,
    tx: &mpsc::UnboundedSender<Event>,
    upload: PendingUpload,
) -> Result<()> {
    match api.create_session(&upload, tx).await {
        Ok(chat_id) => {
            list_sessions(api, tx).await?;
            tx.send(Event::SessionCreated(chat_id))?;
        }
        Err(err) => {
            tracing::error!(error = ?err, "Failed to create session");
            tx.send(Event::UploadFailed(failure_text(err)))?;
        }
    }

    return Ok(());
}

/// A successful answer refreshes the session list (question counts) and the
/// selected session's history, without changing the selection.
async fn ask_question(
    api: &ApiBox,
    tx: &mpsc::UnboundedSender<Event>,
    question: &str,
    language_code: &str,
    chat_id: &str,
) -> Result<()> {
    match api.ask(question, language_code, chat_id).await {
        Ok(answer) => {
            tx.send(Event::AnswerReceived(answer))?;
            list_sessions(api, tx).await?;
            fetch_history(api, tx, chat_id).await?;
        }
        Err(err) => {
            tracing::error!(error = ?err, chat_id = chat_id, "Failed to ask question");
            tx.send(Event::QuestionFailed(failure_text(err)))?;
        }
    }

    return Ok(());
}

pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        api: ApiBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        loop {
            let action = rx.recv().await;
            if action.is_none() {
                return Ok(());
            }

            match action.unwrap() {
                Action::ListSessions() => {
                    list_sessions(&api, &tx).await?;
                }
                Action::CreateSession(upload) => {
                    create_session(&api, &tx, upload).await?;
                }
                Action::FetchHistory(chat_id) => {
                    fetch_history(&api, &tx, &chat_id).await?;
                }
                Action::AskQuestion {
                    question,
                    language_code,
                    chat_id,
                } => {
                    ask_question(&api, &tx, &question, &language_code, &chat_id).await?;
                }
            }
        }
    }
}
