use crossbeam_utils::Backoff;

/// What a thread does between two failed attempts to take a [`SpinLock`].
///
/// Every strategy keeps the caller on-CPU in the sense that no operation ever
/// parks on a kernel object; `Backoff` and `SpinThenYield` merely offer the
/// time slice back to the scheduler once spinning stops paying off.
///
/// [`SpinLock`]: super::SpinLock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitStrategy {
    /// Busy-wait with a processor spin hint on every retry.
    #[default]
    Spin,
    /// Exponential backoff (`crossbeam_utils::Backoff::snooze`): spin with a
    /// growing number of hints, then yield the thread.
    Backoff,
    /// Spin `spins` times, then yield on every further retry.
    SpinThenYield { spins: u32 },
}

// Per-acquisition wait state. Created fresh for each lock attempt so that the
// backoff step of one caller never leaks into another.
#[cfg_attr(loom, allow(dead_code))]
pub(crate) struct Waiter {
    strategy: WaitStrategy,
    backoff: Backoff,
    spun: u32,
}

impl Waiter {
    pub(crate) fn new(strategy: WaitStrategy) -> Self {
        Self {
            strategy,
            backoff: Backoff::new(),
            spun: 0,
        }
    }

    #[cfg(not(loom))]
    #[inline]
    pub(crate) fn wait(&mut self) {
        match self.strategy {
            WaitStrategy::Spin => std::hint::spin_loop(),
            WaitStrategy::Backoff => self.backoff.snooze(),
            WaitStrategy::SpinThenYield { spins } => {
                if self.spun < spins {
                    self.spun += 1;
                    std::hint::spin_loop();
                } else {
                    std::thread::yield_now();
                }
            }
        }
    }

    #[cfg(loom)]
    #[inline]
    pub(crate) fn wait(&mut self) {
        crate::loom::model_yield();
    }
}
