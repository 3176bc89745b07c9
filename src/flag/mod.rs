//! Page action orchestration.
//!
//! This module provides:
//! - [`FlagController::set_flag`], the single entry point for updating a tab
//! - [`PageActionState`] and its titles
//! - [`EventHandlers`] wrapping `set_flag` for tab events

mod controller;
mod events;
mod page_action;

// Re-export public API
pub use controller::FlagController;
pub use events::EventHandlers;
pub use page_action::{flag_path, location_title, PageActionState};
