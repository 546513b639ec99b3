use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use super::ActionsService;
use crate::domain::models::Action;
use crate::domain::models::ChatSession;
use crate::domain::models::Event;
use crate::domain::models::PendingUpload;
use crate::domain::models::QaRecord;
use crate::domain::services::AppState;
use crate::infrastructure::api::ApiClient;

#[derive(Default, Clone)]
struct StubApi {
    sessions: Vec<ChatSession>,
    sessions_err: Option<String>,
    history: Vec<QaRecord>,
    history_err: Option<String>,
    chat_id: String,
    create_err: Option<String>,
    answer: String,
    ask_err: Option<String>,
}

#[async_trait]
impl ApiClient for StubApi {
    async fn list_sessions(&self) -> Result<Vec<ChatSession>> {
        if let Some(err) = &self.sessions_err {
            bail!(err.to_string());
        }
        return Ok(self.sessions.clone());
    }

    async fn chat_history(&self, _chat_id: &str) -> Result<Vec<QaRecord>> {
        if let Some(err) = &self.history_err {
            bail!(err.to_string());
        }
        return Ok(self.history.clone());
    }

    async fn create_session<'a>(
        &self,
        _upload: &PendingUpload,
        tx: &'a mpsc::UnboundedSender<Event>,
    ) -> Result<String> {
        if let Some(err) = &self.create_err {
            return Err(anyhow!(err.to_string()));
        }

        tx.send(Event::UploadProgress(50))?;
        tx.send(Event::UploadProgress(100))?;
        return Ok(self.chat_id.to_string());
    }

    async fn ask(&self, _question: &str, _language_code: &str, _chat_id: &str) -> Result<String> {
        if let Some(err) = &self.ask_err {
            bail!(err.to_string());
        }
        return Ok(self.answer.clone());
    }
}

fn start_service(api: StubApi) -> (mpsc::UnboundedSender<Action>, mpsc::UnboundedReceiver<Event>) {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    tokio::spawn(async move {
        return ActionsService::start(Box::new(api), event_tx, &mut action_rx).await;
    });

    return (action_tx, event_rx);
}

fn session(id: &str, title: &str) -> ChatSession {
    return ChatSession {
        id: id.to_string(),
        title: title.to_string(),
        questions_answers: vec![],
    };
}

fn upload_fixture() -> PendingUpload {
    return PendingUpload {
        path: std::path::PathBuf::from("doc.pdf"),
        file_name: "doc.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        size: 2 * 1024 * 1024,
    };
}

#[tokio::test]
async fn it_loads_sessions() -> Result<()> {
    let api = StubApi {
        sessions: vec![session("abc123", "doc.pdf")],
        ..StubApi::default()
    };
    let (action_tx, mut event_rx) = start_service(api);

    action_tx.send(Action::ListSessions())?;

    match event_rx.recv().await.unwrap() {
        Event::SessionsLoading() => (),
        _ => bail!("Wrong event"),
    }
    match event_rx.recv().await.unwrap() {
        Event::SessionsLoaded(sessions) => {
            assert_eq!(sessions.len(), 1);
            assert_eq!(sessions[0].id, "abc123");
        }
        _ => bail!("Wrong event"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_converts_list_failures_to_events() -> Result<()> {
    let api = StubApi {
        sessions_err: Some("connection refused".to_string()),
        ..StubApi::default()
    };
    let (action_tx, mut event_rx) = start_service(api);

    action_tx.send(Action::ListSessions())?;

    match event_rx.recv().await.unwrap() {
        Event::SessionsLoading() => (),
        _ => bail!("Wrong event"),
    }
    match event_rx.recv().await.unwrap() {
        Event::SessionsFailed(err) => assert_eq!(err, "connection refused"),
        _ => bail!("Wrong event"),
    }

    // The worker must keep serving after a failure.
    action_tx.send(Action::ListSessions())?;
    assert!(event_rx.recv().await.is_some());

    return Ok(());
}

#[tokio::test]
async fn it_uploads_then_refreshes_then_selects() -> Result<()> {
    let api = StubApi {
        sessions: vec![session("abc123", "doc.pdf")],
        chat_id: "abc123".to_string(),
        ..StubApi::default()
    };
    let (action_tx, mut event_rx) = start_service(api);

    let mut app_state = AppState::new("en");
    action_tx.send(Action::CreateSession(upload_fixture()))?;

    // Progress, then the refreshed list, then the new selection.
    match event_rx.recv().await.unwrap() {
        Event::UploadProgress(percent) => assert_eq!(percent, 50),
        _ => bail!("Wrong event"),
    }
    match event_rx.recv().await.unwrap() {
        Event::UploadProgress(percent) => assert_eq!(percent, 100),
        _ => bail!("Wrong event"),
    }

    // The refresh the worker issues raises the loading flag too.
    let loading_event = event_rx.recv().await.unwrap();
    match &loading_event {
        Event::SessionsLoading() => (),
        _ => bail!("Wrong event"),
    }
    app_state.handle_api_event(loading_event);
    assert!(app_state.loading_sessions);

    let list_event = event_rx.recv().await.unwrap();
    match &list_event {
        Event::SessionsLoaded(sessions) => assert_eq!(sessions[0].id, "abc123"),
        _ => bail!("Wrong event"),
    }
    app_state.handle_api_event(list_event);

    let created_event = event_rx.recv().await.unwrap();
    match &created_event {
        Event::SessionCreated(chat_id) => assert_eq!(chat_id, "abc123"),
        _ => bail!("Wrong event"),
    }
    app_state.handle_api_event(created_event);

    assert_eq!(app_state.selected_chat_id, Some("abc123".to_string()));
    assert_eq!(app_state.sessions.len(), 1);
    assert!(!app_state.processing);
    assert!(!app_state.loading_sessions);

    return Ok(());
}

#[tokio::test]
async fn it_reports_upload_failures() -> Result<()> {
    let api = StubApi {
        create_err: Some("Only PDF files are supported".to_string()),
        ..StubApi::default()
    };
    let (action_tx, mut event_rx) = start_service(api);

    action_tx.send(Action::CreateSession(upload_fixture()))?;

    match event_rx.recv().await.unwrap() {
        Event::UploadFailed(err) => assert_eq!(err, "Only PDF files are supported"),
        _ => bail!("Wrong event"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_falls_back_to_unknown_error() -> Result<()> {
    let api = StubApi {
        create_err: Some("".to_string()),
        ..StubApi::default()
    };
    let (action_tx, mut event_rx) = start_service(api);

    action_tx.send(Action::CreateSession(upload_fixture()))?;

    match event_rx.recv().await.unwrap() {
        Event::UploadFailed(err) => assert_eq!(err, "Unknown error"),
        _ => bail!("Wrong event"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_fetches_history_tagged_with_its_chat() -> Result<()> {
    let api = StubApi {
        history: vec![QaRecord {
            question: "What is the total?".to_string(),
            answer: "42".to_string(),
        }],
        ..StubApi::default()
    };
    let (action_tx, mut event_rx) = start_service(api);

    action_tx.send(Action::FetchHistory("abc123".to_string()))?;

    match event_rx.recv().await.unwrap() {
        Event::HistoryLoaded(chat_id, records) => {
            assert_eq!(chat_id, "abc123");
            assert_eq!(records.len(), 1);
        }
        _ => bail!("Wrong event"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_reports_history_failures() -> Result<()> {
    let api = StubApi {
        history_err: Some("not found".to_string()),
        ..StubApi::default()
    };
    let (action_tx, mut event_rx) = start_service(api);

    action_tx.send(Action::FetchHistory("abc123".to_string()))?;

    match event_rx.recv().await.unwrap() {
        Event::HistoryFailed(err) => assert_eq!(err, "not found"),
        _ => bail!("Wrong event"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_answers_then_refreshes_list_and_history() -> Result<()> {
    let api = StubApi {
        sessions: vec![session("abc123", "doc.pdf")],
        history: vec![QaRecord {
            question: "What is the total?".to_string(),
            answer: "42".to_string(),
        }],
        answer: "42".to_string(),
        ..StubApi::default()
    };
    let (action_tx, mut event_rx) = start_service(api);

    let mut app_state = AppState::new("en");
    app_state.selected_chat_id = Some("abc123".to_string());

    action_tx.send(Action::AskQuestion {
        question: "What is the total?".to_string(),
        language_code: "en".to_string(),
        chat_id: "abc123".to_string(),
    })?;

    // Answer, loading, refreshed list, refreshed history.
    for _ in 0..4 {
        let event = event_rx.recv().await.unwrap();
        app_state.handle_api_event(event);
    }

    assert_eq!(app_state.answer, "42");
    assert_eq!(app_state.sessions.len(), 1);
    assert!(!app_state.loading_sessions);
    let last = app_state.history.last().unwrap();
    assert_eq!(last.question, "What is the total?");
    assert_eq!(last.answer, "42");
    assert!(!app_state.processing);

    return Ok(());
}

#[tokio::test]
async fn it_reports_question_failures() -> Result<()> {
    let api = StubApi {
        ask_err: Some("timed out".to_string()),
        ..StubApi::default()
    };
    let (action_tx, mut event_rx) = start_service(api);

    action_tx.send(Action::AskQuestion {
        question: "What is the total?".to_string(),
        language_code: "en".to_string(),
        chat_id: "abc123".to_string(),
    })?;

    match event_rx.recv().await.unwrap() {
        Event::QuestionFailed(err) => assert_eq!(err, "timed out"),
        _ => bail!("Wrong event"),
    }

    return Ok(());
}
