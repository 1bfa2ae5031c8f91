//! Notifier implementations

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::toast::{Toast, ToastLevel};

/// Shows toasts to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);

    fn error(&self, message: &str) {
        self.notify(Toast::error(message));
    }
}

/// Keeps toasts in memory, oldest first.
///
/// With a capacity, the oldest toasts are dropped once it is exceeded.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    toasts: Mutex<VecDeque<Toast>>,
    capacity: Option<usize>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            toasts: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: Some(capacity),
        }
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().iter().cloned().collect()
    }

    pub fn errors(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .iter()
            .filter(|t| t.is_error())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.toasts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.lock().is_empty()
    }

    /// Remove and return every toast
    pub fn drain(&self) -> Vec<Toast> {
        self.toasts.lock().drain(..).collect()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, toast: Toast) {
        let mut toasts = self.toasts.lock();
        toasts.push_back(toast);
        if let Some(capacity) = self.capacity {
            while toasts.len() > capacity {
                toasts.pop_front();
            }
        }
    }
}

/// Emits toasts as log events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, toast: Toast) {
        match toast.level {
            ToastLevel::Error => tracing::error!(id = %toast.id, "{}", toast.message),
            ToastLevel::Warning => tracing::warn!(id = %toast.id, "{}", toast.message),
            ToastLevel::Info | ToastLevel::Success => {
                tracing::info!(id = %toast.id, level = toast.level.as_str(), "{}", toast.message)
            }
        }
    }
}

/// Sends every toast to each of its notifiers
#[derive(Default, Clone)]
pub struct NotifierSet {
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl NotifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Notifier for NotifierSet {
    fn notify(&self, toast: Toast) {
        for notifier in &self.notifiers {
            notifier.notify(toast.clone());
        }
    }
}
