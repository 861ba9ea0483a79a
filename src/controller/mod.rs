//! Page controllers.
//!
//! Each controller owns a [`QueueService`](crate::api::QueueService) and
//! renders through a view trait, so the GTK shell and the tests drive the
//! exact same code paths. Errors never escape an action: every action renders
//! its own failure into its result region.

pub mod message_flow;
pub mod queue_admin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Pending,
    Success,
    Failed,
}

/// Transient outcome of one operation, shown in that operation's result region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultState {
    pub status: Status,
    pub message: String,
}

impl ResultState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn pending(message: impl Into<String>) -> Self {
        Self { status: Status::Pending, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { status: Status::Success, message: message.into() }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { status: Status::Failed, message: message.into() }
    }

    pub fn is_error(&self) -> bool {
        self.status == Status::Failed
    }
}

/// What a content region (queue list, message list) currently displays.
///
/// Keeps "not loaded yet", "loaded with zero results" and "failed" apart.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ListRegion<T> {
    #[default]
    Blank,
    Loading(&'static str),
    Empty(&'static str),
    Items(Vec<T>),
    Failed(String),
}

impl<T> ListRegion<T> {
    /// `Items` for a non-empty result, otherwise the given empty-state marker.
    pub fn from_items(items: Vec<T>, empty_marker: &'static str) -> Self {
        if items.is_empty() {
            ListRegion::Empty(empty_marker)
        } else {
            ListRegion::Items(items)
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            ListRegion::Items(items) => items,
            _ => &[],
        }
    }
}
