use anyhow::Result;
use tokio::sync::mpsc;

use super::handle_slash_command;
use crate::domain::models::Action;
use crate::domain::models::ChatSession;
use crate::domain::models::Notice;
use crate::domain::models::SlashCommand;
use crate::domain::services::AppState;

fn session(id: &str, title: &str) -> ChatSession {
    return ChatSession {
        id: id.to_string(),
        title: title.to_string(),
        questions_answers: vec![],
    };
}

#[tokio::test]
async fn it_explains_chat_selection_with_no_chats() -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
    let mut app_state = AppState::new("en");
    let command = SlashCommand::parse("/chat 1").unwrap();

    let quit = handle_slash_command(&command, &mut app_state, &tx).await?;

    assert!(!quit);
    assert_eq!(
        app_state.notice,
        Some(Notice::error(
            "There are no chats yet. Upload a PDF to start one!"
        ))
    );
    assert!(rx.try_recv().is_err());

    return Ok(());
}

#[tokio::test]
async fn it_rejects_out_of_range_chat_numbers() -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
    let mut app_state = AppState::new("en");
    app_state.sessions = vec![session("abc123", "doc.pdf")];
    let command = SlashCommand::parse("/chat 2").unwrap();

    handle_slash_command(&command, &mut app_state, &tx).await?;

    assert_eq!(
        app_state.notice,
        Some(Notice::error("/chat takes a number between 1 and 1."))
    );
    assert!(rx.try_recv().is_err());

    return Ok(());
}

#[tokio::test]
async fn it_selects_a_chat_by_number() -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
    let mut app_state = AppState::new("en");
    app_state.sessions = vec![session("abc123", "doc.pdf"), session("def456", "other.pdf")];
    let command = SlashCommand::parse("/chat 2").unwrap();

    handle_slash_command(&command, &mut app_state, &tx).await?;

    assert_eq!(app_state.selected_chat_id, Some("def456".to_string()));
    match rx.try_recv()? {
        Action::FetchHistory(id) => assert_eq!(id, "def456"),
        _ => panic!("Wrong action"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_quits_on_quit_commands() -> Result<()> {
    let (tx, _rx) = mpsc::unbounded_channel::<Action>();
    let mut app_state = AppState::new("en");
    let command = SlashCommand::parse("/quit").unwrap();

    let quit = handle_slash_command(&command, &mut app_state, &tx).await?;

    assert!(quit);

    return Ok(());
}
