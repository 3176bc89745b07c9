//! Popup controller and view.

mod controller;
mod view;

// Re-export public API
pub use controller::{PopupController, PopupSurface, ReloadOutcome};
pub use view::{Animation, LocalToggle, PopupLayout, PopupView, Toolbar};
