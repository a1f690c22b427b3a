// FIFO queue over a `RingNode` ring, serialized by one spin lock.
//
// The ring cursor sits on the tail; the head is always the tail's successor.
// The ring never shrinks below one node: once the last live value is popped
// the node stays behind as an empty residual (`None`) with head == tail, and
// the next push splices after it and then retires it.
use std::fmt;

use crossbeam_utils::CachePadded;
use log::{debug, trace};

use crate::config::QueueConfig;
use crate::error::{PopError, PushError};
use crate::loom::{AtomicBool, AtomicUsize, Ordering};
use crate::ring::RingNode;
use crate::sync::{SpinGuard, SpinLock};
use crate::MpmcQueue;

type Ring<T> = RingNode<Option<T>>;

// Why a caller gave up on the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Halt {
    Closed,
    Destroyed,
}

impl Halt {
    fn reject<T>(self, value: T) -> PushError<T> {
        match self {
            Halt::Closed => PushError::Closed(value),
            Halt::Destroyed => PushError::Destroyed(value),
        }
    }
}

impl From<Halt> for PopError {
    fn from(halt: Halt) -> Self {
        match halt {
            Halt::Closed => PopError::Closed,
            Halt::Destroyed => PopError::Destroyed,
        }
    }
}

/// Unbounded multi-producer multi-consumer FIFO queue.
///
/// All structural work happens under a [`SpinLock`]; nothing ever blocks in
/// the kernel. `pop` and `peek` on an empty queue return `None` immediately
/// rather than waiting for a producer.
///
/// Lifecycle: [`close`](Self::close) and [`destroy`](Self::destroy) are
/// one-way switches that turn every later operation into a no-op and make
/// threads currently spinning for the lock give up. Neither drains the queue;
/// values still inside are dropped with the queue.
pub struct RingQueue<T> {
    ring: SpinLock<Ring<T>>,
    len: CachePadded<AtomicUsize>,
    not_empty: AtomicBool,
    closed: AtomicBool,
    destroyed: AtomicBool,
    initialized: AtomicBool,
    label: &'static str,
}

impl<T> RingQueue<T> {
    /// A queue always starts out holding one value.
    pub fn new(value: T) -> Self {
        Self::with_config(value, QueueConfig::default())
    }

    pub fn with_config(value: T, config: QueueConfig) -> Self {
        let queue = Self {
            ring: SpinLock::with_wait(RingNode::new(Some(value)), config.wait),
            len: CachePadded::new(AtomicUsize::new(1)),
            not_empty: AtomicBool::new(true),
            closed: AtomicBool::new(false),
            destroyed: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            label: config.label,
        };
        queue.initialized.store(true, Ordering::Release);
        trace!("{}: created, wait strategy {:?}", queue.label, config.wait);
        queue
    }

    // Destroyed is checked up front and again on every spin, closed on every
    // spin; either one makes the caller walk away without the lock.
    fn acquire(&self) -> Result<SpinGuard<'_, Ring<T>>, Halt> {
        if self.destroyed.load(Ordering::Acquire) {
            return Err(Halt::Destroyed);
        }
        let mut halt = Halt::Closed;
        let guard = self.ring.lock_unless(|| {
            if self.destroyed.load(Ordering::Acquire) {
                halt = Halt::Destroyed;
                true
            } else {
                self.closed.load(Ordering::Acquire)
            }
        });
        guard.ok_or_else(|| {
            trace!("{}: lock wait abandoned ({:?})", self.label, halt);
            halt
        })
    }

    /// Appends `value` at the tail. Silently dropped if the queue is closed
    /// or destroyed; use [`try_push`](Self::try_push) to find out.
    pub fn push(&self, value: T) {
        let _ = self.try_push(value);
    }

    pub fn try_push(&self, value: T) -> Result<(), PushError<T>> {
        let mut ring = match self.acquire() {
            Ok(ring) => ring,
            Err(halt) => return Err(halt.reject(value)),
        };
        let was_empty = self.len.load(Ordering::Relaxed) == 0;

        ring.push(Some(value));
        ring.next();

        if was_empty {
            // The old tail is the residual and now sits at the head; retire it.
            ring.next();
            drop(ring.remove());
            trace!("{}: residual node retired", self.label);
        }

        self.len.fetch_add(1, Ordering::Release);
        self.not_empty.store(true, Ordering::Release);
        Ok(())
    }

    /// Removes and returns the oldest value, or `None` when the queue is
    /// empty, closed or destroyed.
    pub fn pop(&self) -> Option<T> {
        self.try_pop().ok()
    }

    pub fn try_pop(&self) -> Result<T, PopError> {
        let mut ring = self.acquire()?;
        if self.len.load(Ordering::Relaxed) == 0 {
            return Err(PopError::Empty);
        }

        ring.next();
        let value = ring.pop(); // head cut out, cursor on the new head
        ring.prev();

        if self.len.fetch_sub(1, Ordering::Release) == 1 {
            self.not_empty.store(false, Ordering::Release);
        }
        debug_assert!(value.is_some(), "live head held no value");
        value.ok_or(PopError::Empty)
    }

    /// Clone of the oldest value without removing it.
    pub fn peek(&self) -> Option<T>
    where
        T: Clone,
    {
        self.peek_with(T::clone)
    }

    /// Runs `f` on the oldest value under the lock.
    pub fn peek_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&T) -> R,
    {
        let ring = self.acquire().ok()?;
        if self.len.load(Ordering::Relaxed) == 0 {
            return None;
        }
        ring.next_value().as_ref().map(f)
    }

    /// Visits every value from head to tail while holding the lock for the
    /// whole walk. `f` must not call back into this queue.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&T),
    {
        let Ok(ring) = self.acquire() else {
            return;
        };
        if self.len.load(Ordering::Relaxed) == 0 {
            return;
        }
        // Start one past the cursor (the head) and finish on the tail.
        let mut slots = ring.iter();
        let tail = slots.next();
        for value in slots.chain(tail).flatten() {
            f(value);
        }
    }

    /// Lock-free snapshot of the element count; may be stale.
    #[inline]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.not_empty.load(Ordering::Acquire)
    }

    /// Stops all further operations. Idempotent.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!("{}: closed with {} element(s)", self.label, self.len());
        }
    }

    /// Like [`close`](Self::close), but also checked before a caller starts
    /// spinning. Idempotent.
    pub fn destroy(&self) {
        if !self.destroyed.swap(true, Ordering::AcqRel) {
            debug!("{}: destroyed with {} element(s)", self.label, self.len());
        }
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Consumes the queue, returning the remaining values oldest first.
    /// Works whatever the lifecycle state.
    pub fn into_vec(self) -> Vec<T> {
        let mut ring = self.ring.into_inner();
        ring.next();
        ring.into_vec().into_iter().flatten().collect()
    }
}

impl<T> fmt::Debug for RingQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingQueue")
            .field("label", &self.label)
            .field("len", &self.len())
            .field("closed", &self.is_closed())
            .field("destroyed", &self.is_destroyed())
            .finish_non_exhaustive()
    }
}

impl<T: Send> MpmcQueue<T> for RingQueue<T> {
    type PushError = PushError<T>;
    type PopError = PopError;

    fn push(&self, item: T) -> Result<(), Self::PushError> {
        self.try_push(item)
    }

    fn pop(&self) -> Result<T, Self::PopError> {
        self.try_pop()
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }

    fn is_full(&self) -> bool {
        // unbounded
        false
    }
}
