//! Application module
//!
//! Contains the core application architecture:
//! - Actions: What can happen
//! - State: What is true right now
//! - Reducer: Pure function (State, Action) -> State
//!
//! Session data (statistics, results, loading, error) is owned by the
//! library's result store. The state here only mirrors it, through
//! `Action::SessionUpdated`, next to the UI-local tab and input fields.

pub mod actions;
pub mod event;
pub mod reducer;
pub mod state;

// Re-export commonly used types
pub use actions::{Action, Effect};
pub use reducer::reduce;
pub use state::{AppState, SessionView, UiConfig};
