use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use tracing::trace;

use crate::error::{EventError, SimError};
use crate::logging::event_span;
use crate::types::EventId;
use crate::SimTime;

/// A suspended piece of model logic waiting for its scheduled instant.
///
/// When the clock reaches the instant, the continuation is resumed with
/// mutable access to the scheduler (to schedule follow-up work) and to the
/// model state `S`. It runs to completion without preemption.
///
/// Any `FnOnce(&mut Scheduler<S>, &mut S) -> Result<(), SimError>` closure or
/// function item is a continuation.
pub trait Continuation<S>: 'static {
    fn resume(self: Box<Self>, scheduler: &mut Scheduler<S>, state: &mut S) -> Result<(), SimError>;
}

impl<S, F> Continuation<S> for F
where
    F: FnOnce(&mut Scheduler<S>, &mut S) -> Result<(), SimError> + 'static,
{
    fn resume(self: Box<Self>, scheduler: &mut Scheduler<S>, state: &mut S) -> Result<(), SimError> {
        (*self)(scheduler, state)
    }
}

/// Entry type stored in the scheduler: the continuation plus the time when
/// it is supposed to run and the id that orders it among same-time entries.
pub struct EventEntry<S> {
    id: EventId,
    time: SimTime,
    continuation: Box<dyn Continuation<S>>,
}

impl<S> EventEntry<S> {
    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn time(&self) -> SimTime {
        self.time
    }
}

impl<S> fmt::Debug for EventEntry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEntry")
            .field("id", &self.id)
            .field("time", &self.time)
            .finish_non_exhaustive()
    }
}

impl<S> PartialEq for EventEntry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.id == other.id
    }
}

impl<S> Eq for EventEntry<S> {}

impl<S> PartialOrd for EventEntry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> Ord for EventEntry<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse the ordering for min-heap behavior in BinaryHeap.
        // Equal times fall back to scheduling order.
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Scheduler is used to keep the current time and the pending continuations.
///
/// Events are kept in a min-heap keyed by `(time, id)`. Ids grow with every
/// `schedule_*` call, so two events scheduled for the same instant run in the
/// order they were scheduled.
pub struct Scheduler<S> {
    next_event_id: u64,
    events: BinaryHeap<EventEntry<S>>,
    now: SimTime,
    dispatched: u64,
}

impl<S> Default for Scheduler<S> {
    fn default() -> Self {
        Self {
            next_event_id: 0,
            events: BinaryHeap::default(),
            now: SimTime::zero(),
            dispatched: 0,
        }
    }
}

impl<S: 'static> Scheduler<S> {
    /// Schedules `continuation` to be resumed at `self.time() + delay`.
    pub fn schedule_after<C: Continuation<S>>(&mut self, delay: SimTime, continuation: C) -> EventId {
        self.next_event_id += 1;
        let id = EventId(self.next_event_id);
        let time = self.time() + delay;
        trace!(event_id = %id, time = %time, "Event scheduled");
        self.events.push(EventEntry {
            id,
            time,
            continuation: Box::new(continuation),
        });
        id
    }

    /// Schedules `continuation` after a delay given in minutes.
    ///
    /// # Errors
    ///
    /// A negative, NaN or infinite delay is a programming error and is
    /// reported as [`SimError::Scheduling`]; it is never clamped.
    pub fn schedule_after_minutes<C: Continuation<S>>(
        &mut self,
        delay: f64,
        continuation: C,
    ) -> Result<EventId, SimError> {
        let delay = SimTime::from_minutes(delay)?;
        Ok(self.schedule_after(delay, continuation))
    }

    /// Schedules `continuation` to be resumed at `self.time()`, after every
    /// continuation already scheduled for this instant.
    pub fn schedule_now<C: Continuation<S>>(&mut self, continuation: C) -> EventId {
        self.schedule_after(SimTime::zero(), continuation)
    }

    /// Removes the next scheduled event and advances the clock to its time.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::OutOfOrder`] if the event lies before the
    /// current time.
    pub fn pop(&mut self) -> Result<Option<EventEntry<S>>, EventError> {
        let Some(entry) = self.events.pop() else {
            return Ok(None);
        };
        let now = self.time();
        if entry.time < now {
            return Err(EventError::OutOfOrder {
                event: entry.id,
                scheduled: entry.time,
                now,
            });
        }
        self.now = entry.time;
        Ok(Some(entry))
    }

    /// Dispatches the next event. Returns `false` once the queue is empty.
    pub fn step(&mut self, state: &mut S) -> Result<bool, SimError> {
        let Some(entry) = self.pop()? else {
            return Ok(false);
        };
        let _span = event_span(entry.id, entry.time).entered();
        trace!("Dispatching event");
        self.dispatched += 1;
        entry.continuation.resume(self, state)?;
        Ok(true)
    }

    /// Dispatches events in `(time, id)` order until the queue is empty or
    /// the next event lies beyond `horizon`. Events after the horizon stay
    /// queued and are never run; the clock never passes the horizon.
    ///
    /// Returns the number of events dispatched by this call.
    pub fn run_until(&mut self, horizon: SimTime, state: &mut S) -> Result<u64, SimError> {
        let before = self.dispatched;
        while self.has_event_due_by(horizon) {
            self.step(state)?;
        }
        Ok(self.dispatched - before)
    }
}

impl<S> Scheduler<S> {
    /// Returns the current simulation time.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.now
    }

    /// Returns the time of the next scheduled event or `None` if none are left.
    pub fn peek_time(&self) -> Option<SimTime> {
        self.events.peek().map(EventEntry::time)
    }

    /// Whether the next pending event lies at or before `horizon`.
    ///
    /// This is the stopping rule of every horizon-bounded run.
    pub fn has_event_due_by(&self, horizon: SimTime) -> bool {
        self.peek_time().is_some_and(|time| time <= horizon)
    }

    /// Number of events waiting to be dispatched
    pub fn pending(&self) -> usize {
        self.events.len()
    }

    /// Total number of events dispatched so far
    pub fn events_dispatched(&self) -> u64 {
        self.dispatched
    }
}
