//! Core type definitions and newtypes for the simulation framework

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for events in the simulation.
///
/// Ids are handed out in scheduling order, so they double as the FIFO
/// tie-break for events scheduled at the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event({})", self.0)
    }
}

/// Sequence number of a caller entering the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Call {}", self.0)
    }
}
