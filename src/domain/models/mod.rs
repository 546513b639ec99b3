mod action;
mod event;
mod language;
mod notice;
mod session;
mod slash_commands;
mod textarea;
mod upload;

pub use action::*;
pub use event::*;
pub use language::*;
pub use notice::*;
pub use session::*;
pub use slash_commands::*;
pub use textarea::*;
pub use upload::*;
