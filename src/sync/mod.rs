pub mod spin_lock;
pub mod wait;

pub use spin_lock::{SpinGuard, SpinLock};
pub use wait::WaitStrategy;
