//! Transient status messages
//!
//! The terminal host shows the controller's notifications (request progress,
//! AI failures, save confirmations) in a small popup that expires on its own.

mod render;
mod state;

pub use render::render_notification;
pub use state::{Notification, NotificationState};
