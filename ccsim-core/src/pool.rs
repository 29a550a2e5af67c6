//! Fixed-capacity pool of interchangeable servers with FIFO admission
//!
//! The pool models the agents of a call center. A caller that finds every
//! agent busy waits in a single first-come-first-served line; there is no
//! priority, preemption or abandonment.

use crate::error::{EventError, SimError};
use std::collections::VecDeque;
use tracing::debug;

/// Outcome of [`ResourcePool::acquire`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission<W> {
    /// A unit was free; the waiter is handed straight back and now holds it.
    Granted(W),
    /// Every unit is busy; the waiter joined the line at this zero-based
    /// position and will be handed back by a later [`ResourcePool::release`].
    Queued { position: usize },
}

/// A fixed set of interchangeable servers with a FIFO waiting line
///
/// `W` is whatever the caller needs back when a waiter is finally granted,
/// typically the suspended request itself.
///
/// # Examples
///
/// ```
/// use ccsim_core::pool::{Admission, ResourcePool};
///
/// let mut pool = ResourcePool::new(1).unwrap();
/// assert_eq!(pool.acquire("first"), Admission::Granted("first"));
/// assert_eq!(pool.acquire("second"), Admission::Queued { position: 0 });
/// assert_eq!(pool.queue_depth(), 1);
///
/// // one release, one grant: the unit passes straight to the waiter
/// assert_eq!(pool.release().unwrap(), Some("second"));
/// assert_eq!(pool.busy(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ResourcePool<W> {
    capacity: usize,
    busy: usize,
    waiting: VecDeque<W>,
    /// Total number of grants issued (for metrics)
    total_granted: u64,
    /// Total number of waiters that had to queue (for metrics)
    total_queued: u64,
}

impl<W> ResourcePool<W> {
    /// Create a pool with `capacity` servers, all idle
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, SimError> {
        if capacity == 0 {
            return Err(SimError::Configuration(
                "resource pool capacity must be positive".to_string(),
            ));
        }
        Ok(Self {
            capacity,
            busy: 0,
            waiting: VecDeque::new(),
            total_granted: 0,
            total_queued: 0,
        })
    }

    /// Request one unit.
    ///
    /// Grants immediately when a unit is free, otherwise appends the waiter
    /// to the back of the line.
    pub fn acquire(&mut self, waiter: W) -> Admission<W> {
        if self.has_capacity() {
            self.busy += 1;
            self.total_granted += 1;
            debug!(busy = self.busy, capacity = self.capacity, "Unit granted");
            Admission::Granted(waiter)
        } else {
            let position = self.waiting.len();
            self.waiting.push_back(waiter);
            self.total_queued += 1;
            debug!(
                position,
                queue_depth = self.waiting.len(),
                "All units busy, waiter queued"
            );
            Admission::Queued { position }
        }
    }

    /// Give back one unit.
    ///
    /// If anyone is waiting, the unit passes directly to the head of the
    /// line and that waiter is returned so its continuation can be resumed;
    /// the busy count is then unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::ReleaseWithoutHolder`] if no unit is held.
    pub fn release(&mut self) -> Result<Option<W>, EventError> {
        if self.busy == 0 {
            return Err(EventError::ReleaseWithoutHolder);
        }
        match self.waiting.pop_front() {
            Some(next) => {
                self.total_granted += 1;
                debug!(
                    queue_depth = self.waiting.len(),
                    "Unit handed to next waiter"
                );
                Ok(Some(next))
            }
            None => {
                self.busy -= 1;
                debug!(busy = self.busy, "Unit released");
                Ok(None)
            }
        }
    }

    /// Number of waiters in line right now (not a time average)
    pub fn queue_depth(&self) -> usize {
        self.waiting.len()
    }

    /// Number of units currently held
    pub fn busy(&self) -> usize {
        self.busy
    }

    /// Number of units currently free
    pub fn idle(&self) -> usize {
        self.capacity - self.busy
    }

    /// Total number of units
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check if a unit is free
    pub fn has_capacity(&self) -> bool {
        self.busy < self.capacity
    }

    /// Holders plus waiters
    pub fn in_system(&self) -> usize {
        self.busy + self.waiting.len()
    }

    /// Total grants issued so far, including hand-offs on release
    pub fn total_granted(&self) -> u64 {
        self.total_granted
    }

    /// Total waiters that found every unit busy
    pub fn total_queued(&self) -> u64 {
        self.total_queued
    }

    /// Iterate over the waiters from the head of the line
    pub fn waiters(&self) -> impl Iterator<Item = &W> {
        self.waiting.iter()
    }
}
