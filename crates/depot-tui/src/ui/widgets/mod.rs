//! Reusable widgets for the depot TUI.

pub mod sidebar;
pub mod status_bar;
pub mod suggestions;
pub mod text_input;
pub mod transcript;

pub use sidebar::Sidebar;
pub use status_bar::{KeyHint, StatusBar};
pub use suggestions::SuggestionChips;
pub use text_input::TextInputState;
pub use transcript::Transcript;
