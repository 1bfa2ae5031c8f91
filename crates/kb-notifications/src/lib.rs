//! # kb-notifications
//!
//! User-facing notifications ("toasts") for the kanban client.
//!
//! ## Features
//!
//! - Toast messages with a severity level
//! - The [`Notifier`] trait the store reports failures through
//! - In-memory, tracing-backed and fan-out notifiers

pub mod toast;
pub mod notifiers;

pub use toast::{Toast, ToastLevel};
pub use notifiers::{MemoryNotifier, Notifier, NotifierSet, TracingNotifier};
