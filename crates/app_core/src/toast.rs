//! Ephemeral status messages

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const MAX_VISIBLE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub expires_at: Instant,
}

/// Toast queue
#[derive(Debug, Clone)]
pub struct Toasts {
    lifetime: Duration,
    queue: VecDeque<Toast>,
}

impl Toasts {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            queue: VecDeque::new(),
        }
    }

    pub fn push(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) {
        let message = message.into();
        tracing::debug!(?kind, "toast: {}", message);

        if self.queue.len() >= MAX_VISIBLE {
            self.queue.pop_front();
        }
        self.queue.push_back(Toast {
            message,
            kind,
            expires_at: now + self.lifetime,
        });
    }

    /// Drop expired toasts
    pub fn prune(&mut self, now: Instant) {
        self.queue.retain(|t| t.expires_at > now);
    }

    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn next_expiry(&self) -> Option<Instant> {
        self.queue.iter().map(|t| t.expires_at).min()
    }
}
