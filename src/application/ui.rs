#[cfg(test)]
#[path = "ui_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Gauge;
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::widgets::Wrap;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Languages;
use crate::domain::models::Notice;
use crate::domain::models::NoticeKind;
use crate::domain::models::PendingUpload;
use crate::domain::models::SlashCommand;
use crate::domain::models::TextArea;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;

pub fn help_text() -> String {
    return [
        "Commands: /attach PATH (pick a PDF)",
        "/upload (create a chat from it)",
        "/chat N (select session N)",
        "/lang CODE (answer language)",
        "/expand N (show answer N)",
        "/refresh (reload sessions)",
        "/quit",
    ]
    .join(" | ");
}

fn render_sessions<B: Backend>(frame: &mut Frame<'_, B>, app_state: &AppState, rect: Rect) {
    let selected = app_state.selected_session_index();
    let items = app_state
        .sessions
        .iter()
        .enumerate()
        .map(|(idx, session)| {
            let n = idx + 1;
            let mut item = ListItem::new(format!(
                "{n}. {title} ({count} questions)",
                title = session.title,
                count = session.question_count()
            ));
            if selected == Some(idx) {
                item = item.style(Style::default().add_modifier(Modifier::REVERSED));
            }
            return item;
        })
        .collect::<Vec<ListItem>>();

    let mut title = "Chats".to_string();
    if app_state.loading_sessions {
        title = "Chats (loading...)".to_string();
    }

    frame.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title(title)),
        rect,
    );
}

fn render_history<B: Backend>(frame: &mut Frame<'_, B>, app_state: &mut AppState, rect: Rect) {
    if rect.width != app_state.last_known_width || rect.height != app_state.last_known_height {
        app_state.set_rect(rect);
    }

    let lines = app_state
        .history_lines()
        .iter()
        .map(|line| return Line::from(line.to_string()))
        .collect::<Vec<Line>>();

    let mut title = "Questions".to_string();
    if let Some(idx) = app_state.selected_session_index() {
        title = format!("Questions - {}", app_state.sessions[idx].title);
    }

    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .scroll((app_state.scroll.position, 0)),
        rect,
    );
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        rect.inner(&Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut app_state.scroll.scrollbar_state,
    );
}

fn render_answer<B: Backend>(frame: &mut Frame<'_, B>, app_state: &AppState, rect: Rect) {
    frame.render_widget(
        Paragraph::new(app_state.answer.to_string())
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Answer")),
        rect,
    );
}

fn render_status<B: Backend>(frame: &mut Frame<'_, B>, app_state: &AppState, rect: Rect) {
    // The gauge belongs to uploads only. A question in flight with a file
    // still attached must not resurface it.
    if app_state.uploading {
        frame.render_widget(
            Gauge::default()
                .percent(u16::from(app_state.upload_progress))
                .label(format!("{}%", app_state.upload_progress)),
            rect,
        );
        return;
    }

    if let Some(notice) = &app_state.notice {
        let color = match notice.kind {
            NoticeKind::Success => Color::Green,
            NoticeKind::Error => Color::Red,
        };
        frame.render_widget(
            Paragraph::new(notice.text.to_string()).style(Style::default().fg(color)),
            rect,
        );
        return;
    }

    let mut attachment = "no file attached".to_string();
    if let Some(upload) = &app_state.selected_file {
        attachment = format!("attached: {}", upload.file_name);
    }
    let language = Languages::display_name(&app_state.language).unwrap_or("Unknown");
    frame.render_widget(
        Paragraph::new(format!("Language: {language} | {attachment} | /help for commands"))
            .style(Style::default().fg(Color::DarkGray)),
        rect,
    );
}

async fn handle_slash_command(
    command: &SlashCommand,
    app_state: &mut AppState,
    tx: &mpsc::UnboundedSender<Action>,
) -> Result<bool> {
    if command.is_help() {
        app_state.notice = Some(Notice::success(&help_text()));
        return Ok(false);
    }

    if command.is_attach() {
        if command.args.is_empty() {
            app_state.notice = Some(Notice::error("Usage: /attach PATH"));
            return Ok(false);
        }

        match PendingUpload::inspect(path::Path::new(&command.args.join(" "))).await {
            Ok(upload) => app_state.select_file(upload),
            Err(err) => {
                app_state.notice = Some(Notice::error(&format!("Could not read file: {err}")));
            }
        }
        return Ok(false);
    }

    if command.is_upload() {
        if !app_state.processing {
            app_state.begin_upload(tx)?;
        }
        return Ok(false);
    }

    if command.is_select_chat() {
        if app_state.sessions.is_empty() {
            app_state.notice = Some(Notice::error(
                "There are no chats yet. Upload a PDF to start one!",
            ));
            return Ok(false);
        }

        let arg = command.args.first().cloned().unwrap_or_default();
        match arg.parse::<usize>() {
            // Guard here keeps select_session from ever seeing an id outside
            // the collection.
            Ok(n) if n >= 1 && n <= app_state.sessions.len() => {
                let id = app_state.sessions[n - 1].id.to_string();
                app_state.select_session(&id, tx)?;
            }
            _ => {
                app_state.notice = Some(Notice::error(&format!(
                    "/chat takes a number between 1 and {}.",
                    app_state.sessions.len()
                )));
            }
        }
        return Ok(false);
    }

    if command.is_language() {
        let code = command.args.first().cloned().unwrap_or_default();
        if !app_state.set_language(&code) {
            app_state.notice = Some(Notice::error(&format!(
                "Unsupported language code: {code}"
            )));
        }
        return Ok(false);
    }

    if command.is_expand() {
        let arg = command.args.first().cloned().unwrap_or_default();
        match arg.parse::<usize>() {
            Ok(n) if n >= 1 => app_state.toggle_expanded(n - 1),
            _ => {
                app_state.notice = Some(Notice::error("Usage: /expand N"));
            }
        }
        return Ok(false);
    }

    if command.is_refresh() {
        app_state.refresh_sessions(tx)?;
        return Ok(false);
    }

    return Ok(command.is_quit());
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut events_service = EventsService::new(rx);
    let mut textarea = TextArea::default();

    app_state.refresh_sessions(&tx)?;

    loop {
        terminal.draw(|frame| {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![
                    Constraint::Min(1),
                    Constraint::Max(5),
                    Constraint::Max(1),
                    Constraint::Max(4),
                ])
                .split(frame.size());

            let panes = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Percentage(70), Constraint::Percentage(30)])
                .split(layout[0]);

            render_history(frame, app_state, panes[0]);
            render_sessions(frame, app_state, panes[1]);
            render_answer(frame, app_state, layout[1]);
            render_status(frame, app_state, layout[2]);
            frame.render_widget(textarea.widget(), layout[3]);
        })?;

        match events_service.next().await? {
            Event::KeyboardCTRLC() => break,
            Event::KeyboardCharInput(input) => {
                textarea.input(input);
            }
            Event::KeyboardPaste(text) => {
                textarea.insert_str(&text.replace('\r', "\n"));
            }
            Event::KeyboardEnter() => {
                let input_str = textarea.lines().join("\n");

                if let Some(command) = SlashCommand::parse(&input_str) {
                    textarea = TextArea::default();
                    if handle_slash_command(&command, app_state, &tx).await? {
                        break;
                    }
                    continue;
                }

                // Submission stays disabled while an upload or question is in
                // flight.
                if app_state.processing {
                    continue;
                }

                app_state.submit_question(&input_str, &tx)?;
                if app_state.processing {
                    textarea = TextArea::default();
                }
            }
            Event::SessionsNext() => {
                let next = match app_state.selected_session_index() {
                    Some(idx) => idx + 1,
                    None => 0,
                };
                if let Some(session) = app_state.session_at(next) {
                    let id = session.id.to_string();
                    app_state.select_session(&id, &tx)?;
                }
            }
            Event::SessionsPrevious() => {
                if let Some(idx) = app_state.selected_session_index() {
                    if idx > 0 {
                        let id = app_state.sessions[idx - 1].id.to_string();
                        app_state.select_session(&id, &tx)?;
                    }
                }
            }
            Event::UIScrollUp() => {
                app_state.scroll.up();
            }
            Event::UIScrollDown() => {
                app_state.scroll.down();
            }
            Event::UIScrollPageUp() => {
                app_state.scroll.up_page();
            }
            Event::UIScrollPageDown() => {
                app_state.scroll.down_page();
            }
            Event::UITick() => (),
            event => {
                app_state.handle_api_event(event);
            }
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    disable_raw_mode().unwrap();
    crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture).unwrap();
    crossterm::execute!(io::stdout(), cursor::Show).unwrap();
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let mut app_state = AppState::new(&Config::get(ConfigKey::Language));
    start_loop(&mut terminal, &mut app_state, tx, rx).await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
