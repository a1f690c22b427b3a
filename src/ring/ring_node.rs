// Circular doubly-linked ring with splice-based insertion and removal.
//
// A `RingNode` handle owns every node of its ring and points at one of them
// (the "current" node). Splicing another ring in consumes that ring's handle;
// cutting a run out hands the run back as a new handle, so every heap node has
// exactly one owner at all times.
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop};
use std::ptr::NonNull;

struct Node<T> {
    next: NonNull<Node<T>>,
    prev: NonNull<Node<T>>,
    value: T,
}

pub struct RingNode<T> {
    cur: NonNull<Node<T>>,
    len: usize, // physical nodes, >= 1
    _owns: PhantomData<Box<Node<T>>>,
}

unsafe impl<T: Send> Send for RingNode<T> {}
unsafe impl<T: Sync> Sync for RingNode<T> {}

impl<T> RingNode<T> {
    /// Ring of one: `next == prev == self`.
    pub fn new(value: T) -> Self {
        let node = NonNull::from(Box::leak(Box::new(Node {
            next: NonNull::dangling(),
            prev: NonNull::dangling(),
            value,
        })));
        unsafe {
            (*node.as_ptr()).next = node;
            (*node.as_ptr()).prev = node;
        }
        Self {
            cur: node,
            len: 1,
            _owns: PhantomData,
        }
    }

    /// Number of physical nodes in the ring. Never zero.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_singleton(&self) -> bool {
        self.len == 1
    }

    #[inline]
    pub fn value(&self) -> &T {
        unsafe { &(*self.cur.as_ptr()).value }
    }

    #[inline]
    pub fn value_mut(&mut self) -> &mut T {
        unsafe { &mut (*self.cur.as_ptr()).value }
    }

    #[inline]
    pub fn next_value(&self) -> &T {
        unsafe { &(*(*self.cur.as_ptr()).next.as_ptr()).value }
    }

    #[inline]
    pub fn prev_value(&self) -> &T {
        unsafe { &(*(*self.cur.as_ptr()).prev.as_ptr()).value }
    }

    /// Steps the cursor one node forward.
    #[inline]
    pub fn next(&mut self) -> &mut Self {
        self.cur = unsafe { (*self.cur.as_ptr()).next };
        self
    }

    /// Steps the cursor one node backward.
    #[inline]
    pub fn prev(&mut self) -> &mut Self {
        self.cur = unsafe { (*self.cur.as_ptr()).prev };
        self
    }

    /// Steps `n` nodes forward, or `|n|` backward when negative.
    ///
    /// Full laps are skipped, so the walk costs `min(|n|, len)` hops.
    pub fn move_by(&mut self, n: isize) -> &mut Self {
        if n >= 0 {
            self.move_next(n.unsigned_abs())
        } else {
            self.move_prev(n.unsigned_abs())
        }
    }

    pub fn move_next(&mut self, n: usize) -> &mut Self {
        for _ in 0..n % self.len {
            self.next();
        }
        self
    }

    pub fn move_prev(&mut self, n: usize) -> &mut Self {
        for _ in 0..n % self.len {
            self.prev();
        }
        self
    }

    /// Splices `other` in directly after the current node.
    ///
    /// `other` may be a single node or a whole ring; its current node ends up
    /// as our successor and its predecessor links back to our old successor.
    /// The cursor does not move.
    pub fn link(&mut self, other: RingNode<T>) -> &mut Self {
        let other = ManuallyDrop::new(other);
        unsafe {
            let cur = self.cur;
            let cur_next = (*cur.as_ptr()).next;
            let other_first = other.cur;
            let other_last = (*other_first.as_ptr()).prev;

            (*cur.as_ptr()).next = other_first;
            (*other_first.as_ptr()).prev = cur;
            (*cur_next.as_ptr()).prev = other_last;
            (*other_last.as_ptr()).next = cur_next;
        }
        self.len += other.len;
        self
    }

    /// Cuts `count` consecutive nodes out, starting at the current node.
    ///
    /// The cursor moves to the node that followed the run and the run is
    /// returned as its own closed ring. The ring is circular, so only
    /// `count % len` nodes can actually go: when that is zero (`count == 0`,
    /// or `count == 1` on a single node) nothing is cut, the cursor stays put
    /// and `None` is returned.
    pub fn unlink(&mut self, count: usize) -> Option<RingNode<T>> {
        let run = count % self.len;
        if run == 0 {
            return None;
        }
        let first = self.cur;
        unsafe {
            let before = (*first.as_ptr()).prev;
            let mut last = first;
            for _ in 1..run {
                last = (*last.as_ptr()).next;
            }
            let after = (*last.as_ptr()).next;

            // close the gap
            (*before.as_ptr()).next = after;
            (*after.as_ptr()).prev = before;
            // close the run on itself
            (*first.as_ptr()).prev = last;
            (*last.as_ptr()).next = first;

            self.cur = after;
        }
        self.len -= run;
        Some(RingNode {
            cur: first,
            len: run,
            _owns: PhantomData,
        })
    }

    /// `unlink(1)`.
    #[inline]
    pub fn remove(&mut self) -> Option<RingNode<T>> {
        self.unlink(1)
    }

    /// Links a fresh node holding `value` right after the current node.
    #[inline]
    pub fn push(&mut self, value: T) -> &mut Self {
        self.link(RingNode::new(value))
    }

    /// Takes the current node's value and cuts the node out; the cursor lands
    /// on its successor.
    ///
    /// A single node is never cut: it stays behind as the residual with its
    /// value replaced by `T::default()`.
    pub fn pop(&mut self) -> T
    where
        T: Default,
    {
        match self.remove() {
            Some(node) => node.into_value(),
            None => mem::take(self.value_mut()),
        }
    }

    /// Applies `f` to every value, starting at the current node and following
    /// `next` until the walk comes back around.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&T),
    {
        for value in self.iter() {
            f(value);
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            node: self.cur,
            remaining: self.len,
            _ring: PhantomData,
        }
    }

    /// Consumes the ring, returning its values from the current node onward.
    pub fn into_vec(self) -> Vec<T> {
        let this = ManuallyDrop::new(self);
        let mut values = Vec::with_capacity(this.len);
        let mut node = this.cur;
        for _ in 0..this.len {
            let boxed = unsafe { Box::from_raw(node.as_ptr()) };
            node = boxed.next;
            values.push(boxed.value);
        }
        values
    }

    // Only valid for a ring of one.
    fn into_value(self) -> T {
        debug_assert!(self.is_singleton());
        let this = ManuallyDrop::new(self);
        let boxed = unsafe { Box::from_raw(this.cur.as_ptr()) };
        boxed.value
    }
}

impl<T> Drop for RingNode<T> {
    fn drop(&mut self) {
        let mut node = self.cur;
        for _ in 0..self.len {
            let boxed = unsafe { Box::from_raw(node.as_ptr()) };
            node = boxed.next;
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RingNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a RingNode<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// One lap around a ring, starting at its current node.
pub struct Iter<'a, T> {
    node: NonNull<Node<T>>,
    remaining: usize,
    _ring: PhantomData<&'a RingNode<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        // SAFETY: the ring is borrowed for 'a, so no node is freed or relinked.
        unsafe {
            let node = &*self.node.as_ptr();
            self.node = node.next;
            Some(&node.value)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            node: self.node,
            remaining: self.remaining,
            _ring: PhantomData,
        }
    }
}
