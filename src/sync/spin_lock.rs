use std::cell::UnsafeCell;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use crossbeam_utils::CachePadded;

use super::wait::{WaitStrategy, Waiter};
use crate::loom::{AtomicBool, Ordering};

/// Test-and-test-and-set spin lock guarding a `T`.
///
/// Acquisition never parks the thread: a waiter loops on the lock word,
/// running the configured [`WaitStrategy`] between attempts. Release is an
/// atomic `Release` store done by [`SpinGuard`]'s `Drop`.
pub struct SpinLock<T> {
    locked: CachePadded<AtomicBool>,
    wait: WaitStrategy,
    data: UnsafeCell<T>,
}

unsafe impl<T: Send> Send for SpinLock<T> {}
unsafe impl<T: Send> Sync for SpinLock<T> {}

/// RAII guard for a held [`SpinLock`]; unlocks on drop.
pub struct SpinGuard<'a, T> {
    lock: &'a SpinLock<T>,
    // Send/Sync of the guard follow those of `&mut T`.
    _marker: PhantomData<&'a mut T>,
}

impl<T> SpinLock<T> {
    pub fn new(data: T) -> Self {
        Self::with_wait(data, WaitStrategy::default())
    }

    pub fn with_wait(data: T, wait: WaitStrategy) -> Self {
        Self {
            locked: CachePadded::new(AtomicBool::new(false)),
            wait,
            data: UnsafeCell::new(data),
        }
    }

    #[inline]
    pub fn wait_strategy(&self) -> WaitStrategy {
        self.wait
    }

    /// Single acquisition attempt.
    #[inline]
    pub fn try_lock(&self) -> Option<SpinGuard<'_, T>> {
        // test, then test-and-set
        if !self.locked.load(Ordering::Relaxed)
            && self
                .locked
                .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
        {
            Some(SpinGuard {
                lock: self,
                _marker: PhantomData,
            })
        } else {
            None
        }
    }

    /// Spins until the lock is taken. Unbounded.
    pub fn lock(&self) -> SpinGuard<'_, T> {
        let mut waiter = Waiter::new(self.wait);
        loop {
            if let Some(guard) = self.try_lock() {
                return guard;
            }
            waiter.wait();
        }
    }

    /// Spins until the lock is taken or `abort` returns `true`.
    ///
    /// `abort` is evaluated before every attempt, including the first, so a
    /// caller that is already cancelled never touches the lock word.
    pub fn lock_unless<F>(&self, mut abort: F) -> Option<SpinGuard<'_, T>>
    where
        F: FnMut() -> bool,
    {
        let mut waiter = Waiter::new(self.wait);
        loop {
            if abort() {
                return None;
            }
            if let Some(guard) = self.try_lock() {
                return Some(guard);
            }
            waiter.wait();
        }
    }

    /// Best-effort snapshot; may be stale by the time it is inspected.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }

    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: Default> Default for SpinLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for SpinLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpinLock")
            .field("locked", &self.is_locked())
            .field("wait", &self.wait)
            .finish_non_exhaustive()
    }
}

impl<T> Deref for SpinGuard<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        // SAFETY: the guard exists only while `locked` is held by us.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for SpinGuard<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: as above; `&mut self` makes the access unique.
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for SpinGuard<'_, T> {
    #[inline]
    fn drop(&mut self) {
        self.lock.locked.store(false, Ordering::Release);
    }
}
