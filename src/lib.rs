pub mod config;
pub mod error;
mod loom;
pub mod mpmc;
pub mod ring;
pub mod sync;

pub use config::QueueConfig;
pub use error::{PopError, PushError};
pub use mpmc::RingQueue;
pub use ring::RingNode;
pub use sync::{SpinGuard, SpinLock, WaitStrategy};

// Common interface for all MPMC queues.
pub trait MpmcQueue<T: Send>: Send + Sync {
    type PushError;
    type PopError;
    fn push(&self, item: T) -> Result<(), Self::PushError>;
    fn pop(&self) -> Result<T, Self::PopError>;
    fn is_empty(&self) -> bool;
    fn is_full(&self) -> bool;
}
