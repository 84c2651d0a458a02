//! Fixed-capacity FIFO queue that evicts its oldest entry when full.
//!
//! [`BoundedQueue`] backs retry buffers whose size must never grow without
//! bound: pushing onto a full queue drops and returns the oldest entry
//! instead of failing or reallocating. Draining yields entries in insertion
//! order, which lets a caller retry the oldest work first.

use std::collections::VecDeque;

/// Error raised when a queue is constructed with an unusable capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("bounded queue capacity must be at least 1")]
pub struct ZeroCapacityError;

/// FIFO queue with a hard upper bound on length.
///
/// Once the queue holds `capacity` entries, each further push evicts the
/// oldest entry and hands it back to the caller.
///
/// # Examples
/// ```
/// use bounded_queue::BoundedQueue;
///
/// # fn main() -> Result<(), bounded_queue::ZeroCapacityError> {
/// let mut queue = BoundedQueue::with_capacity(2)?;
/// assert_eq!(queue.push("a"), None);
/// assert_eq!(queue.push("b"), None);
/// assert_eq!(queue.push("c"), Some("a"));
/// assert_eq!(queue.drain(), vec!["b", "c"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedQueue<T> {
    capacity: usize,
    items: VecDeque<T>,
}

impl<T> BoundedQueue<T> {
    /// Create an empty queue bounded at `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ZeroCapacityError`] when `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, ZeroCapacityError> {
        if capacity == 0 {
            return Err(ZeroCapacityError);
        }
        Ok(Self {
            capacity,
            items: VecDeque::with_capacity(capacity),
        })
    }

    /// Rebuild a queue from previously drained entries.
    ///
    /// When `items` exceeds `capacity`, the oldest entries are discarded so
    /// the invariant holds for hydrated state as well as live pushes.
    ///
    /// # Errors
    ///
    /// Returns [`ZeroCapacityError`] when `capacity` is zero.
    pub fn from_items(
        capacity: usize,
        items: impl IntoIterator<Item = T>,
    ) -> Result<Self, ZeroCapacityError> {
        let mut queue = Self::with_capacity(capacity)?;
        for item in items {
            queue.push(item);
        }
        Ok(queue)
    }

    /// Append an entry, evicting and returning the oldest one if the queue
    /// is already full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    /// Remove and return every entry in insertion order.
    pub fn drain(&mut self) -> Vec<T> {
        self.items.drain(..).collect()
    }

    /// Number of entries currently queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the queue holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum number of entries the queue retains.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over queued entries from oldest to newest without removing
    /// them.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a BoundedQueue<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
