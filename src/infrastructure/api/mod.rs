pub mod http;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::models::ChatSession;
use crate::domain::models::Event;
use crate::domain::models::PendingUpload;
use crate::domain::models::QaRecord;

/// The remote document question-answering service, reduced to the four calls
/// the client makes.
#[async_trait]
pub trait ApiClient {
    /// Fetches the full session collection, newest first as returned by the
    /// server.
    async fn list_sessions(&self) -> Result<Vec<ChatSession>>;

    /// Fetches the ordered question/answer history for one session.
    async fn chat_history(&self, chat_id: &str) -> Result<Vec<QaRecord>>;

    /// Uploads a PDF as a new session, reporting transfer progress through
    /// the channel, and returns the id of the created session.
    async fn create_session<'a>(
        &self,
        upload: &PendingUpload,
        tx: &'a mpsc::UnboundedSender<Event>,
    ) -> Result<String>;

    /// Submits a question against a session and returns the answer text.
    async fn ask(&self, question: &str, language_code: &str, chat_id: &str) -> Result<String>;
}

pub type ApiBox = Box<dyn ApiClient + Send + Sync>;
