// Atomics and scheduling hooks, swapped for loom's when built with --cfg loom.

#[cfg(not(loom))]
pub(crate) use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[cfg(loom)]
pub(crate) use ::loom::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

// Spin waits must hand control back to the model scheduler.
#[cfg(loom)]
#[inline]
pub(crate) fn model_yield() {
    ::loom::thread::yield_now();
}
