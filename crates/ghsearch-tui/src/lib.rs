// Terminal UI for browsing ranked results with ratatui

pub mod keymap;
pub mod layout;
pub mod opener;
pub mod progress;
pub mod runner;
pub mod screen;
pub mod session;
pub mod table;
pub mod ui;

pub use layout::Panes;
pub use opener::{SystemBrowser, UrlOpener};
pub use progress::{run_with_progress, ProgressSink, ProgressTask, StatusLine};
pub use runner::{present, Phase, PresentationMode, Session, SessionEnd, SessionOptions};
pub use screen::{CrosstermScreen, Screen};
pub use session::{BrowseState, Effect, InputEvent, KeyToken};
pub use ui::Notice;
