use thiserror::Error;

/// Why a push was refused. The rejected value is handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PushError<T> {
    #[error("queue is closed")]
    Closed(T),
    #[error("queue is destroyed")]
    Destroyed(T),
}

impl<T> PushError<T> {
    pub fn into_inner(self) -> T {
        match self {
            PushError::Closed(value) | PushError::Destroyed(value) => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PopError {
    #[error("queue is empty")]
    Empty,
    #[error("queue is closed")]
    Closed,
    #[error("queue is destroyed")]
    Destroyed,
}
