//! Simulation time management

use crate::error::EventError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Number of clock ticks in one virtual minute.
pub const TICKS_PER_MINUTE: u64 = 60_000_000_000;

/// Simulation time with nanosecond precision
///
/// SimTime represents a point in virtual time (or a span of virtual time),
/// stored as ticks since the simulation start. The model works in minutes,
/// so one tick is one nanosecond of a virtual minute. Integer ticks keep the
/// event ordering total and the arithmetic exact, which is what makes seeded
/// runs replay bit-for-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTime(u64);

impl SimTime {
    /// Create a new SimTime at the simulation start (time zero)
    pub const fn zero() -> Self {
        SimTime(0)
    }

    /// Create a SimTime from raw ticks
    pub const fn from_ticks(ticks: u64) -> Self {
        SimTime(ticks)
    }

    /// Create a SimTime from whole minutes
    pub const fn from_whole_minutes(minutes: u64) -> Self {
        SimTime(minutes * TICKS_PER_MINUTE)
    }

    /// Create a SimTime from fractional minutes.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::InvalidTime`] if `minutes` is negative, NaN,
    /// infinite or too large to be represented. Negative times are never
    /// clamped to zero.
    pub fn from_minutes(minutes: f64) -> Result<Self, EventError> {
        if !minutes.is_finite() {
            return Err(EventError::InvalidTime(format!(
                "non-finite value: {minutes}"
            )));
        }
        if minutes < 0.0 {
            return Err(EventError::InvalidTime(format!(
                "negative value: {minutes}"
            )));
        }

        const MAX_MINUTES: f64 = (u64::MAX as f64) / TICKS_PER_MINUTE as f64;
        if minutes >= MAX_MINUTES {
            return Err(EventError::InvalidTime(format!(
                "value too large: {minutes} minutes (max: {MAX_MINUTES} minutes)"
            )));
        }

        Ok(SimTime((minutes * TICKS_PER_MINUTE as f64).round() as u64))
    }

    /// Get the raw tick value
    pub const fn as_ticks(&self) -> u64 {
        self.0
    }

    /// Convert to fractional minutes
    pub fn as_minutes(&self) -> f64 {
        self.0 as f64 / TICKS_PER_MINUTE as f64
    }

    /// Calculate the span since another SimTime (zero if `earlier` is later)
    pub fn duration_since(&self, earlier: SimTime) -> SimTime {
        SimTime(self.0.saturating_sub(earlier.0))
    }

    /// Subtract, returning `None` if `rhs` is later than `self`
    pub fn checked_sub(&self, rhs: SimTime) -> Option<SimTime> {
        self.0.checked_sub(rhs.0).map(SimTime)
    }

    /// Add, returning `None` on overflow
    pub fn checked_add(&self, rhs: SimTime) -> Option<SimTime> {
        self.0.checked_add(rhs.0).map(SimTime)
    }
}

impl Add<SimTime> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: SimTime) -> Self::Output {
        SimTime(self.0.saturating_add(rhs.0))
    }
}

impl Sub<SimTime> for SimTime {
    type Output = SimTime;

    fn sub(self, rhs: SimTime) -> Self::Output {
        self.duration_since(rhs)
    }
}

impl Default for SimTime {
    fn default() -> Self {
        SimTime::zero()
    }
}

impl TryFrom<f64> for SimTime {
    type Error = EventError;

    /// Convert from minutes (as f64) to SimTime
    ///
    /// # Examples
    /// ```
    /// # use ccsim_core::SimTime;
    /// let time = SimTime::try_from(1.5).unwrap(); // 1.5 minutes
    /// assert_eq!(time.as_ticks(), 90_000_000_000);
    /// assert!(SimTime::try_from(-1.0).is_err());
    /// ```
    fn try_from(minutes: f64) -> Result<Self, Self::Error> {
        SimTime::from_minutes(minutes)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}min", self.as_minutes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simtime_creation() {
        assert_eq!(SimTime::zero().as_ticks(), 0);
        assert_eq!(SimTime::from_ticks(1000).as_ticks(), 1000);
        assert_eq!(SimTime::from_whole_minutes(1).as_ticks(), TICKS_PER_MINUTE);
        assert_eq!(SimTime::from_whole_minutes(480).as_minutes(), 480.0);
    }

    #[test]
    fn test_simtime_arithmetic() {
        let t1 = SimTime::from_whole_minutes(10);
        let t2 = SimTime::from_whole_minutes(4);

        assert_eq!(t1 + t2, SimTime::from_whole_minutes(14));
        assert_eq!(t1 - t2, SimTime::from_whole_minutes(6));
        assert_eq!(t2 - t1, SimTime::zero());
        assert_eq!(t2.checked_sub(t1), None);
        assert_eq!(t1.checked_sub(t2), Some(SimTime::from_whole_minutes(6)));
    }

    #[test]
    fn test_simtime_ordering() {
        let t1 = SimTime::from_whole_minutes(1);
        let t2 = SimTime::from_whole_minutes(2);

        assert!(t1 < t2);
        assert!(t2 > t1);
        assert_eq!(t1, t1);
    }

    #[test]
    fn test_simtime_from_minutes() {
        assert_eq!(SimTime::from_minutes(1.0).unwrap().as_ticks(), TICKS_PER_MINUTE);
        assert_eq!(SimTime::from_minutes(0.5).unwrap().as_ticks(), TICKS_PER_MINUTE / 2);
        assert_eq!(SimTime::from_minutes(0.0).unwrap(), SimTime::zero());

        let t = SimTime::from_minutes(7.25).unwrap();
        assert_eq!(t.as_minutes(), 7.25);
    }

    #[test]
    fn test_simtime_rejects_invalid_minutes() {
        assert!(matches!(
            SimTime::from_minutes(-0.001),
            Err(EventError::InvalidTime(_))
        ));
        assert!(SimTime::from_minutes(f64::NAN).is_err());
        assert!(SimTime::from_minutes(f64::INFINITY).is_err());

        let max_minutes = (u64::MAX as f64) / TICKS_PER_MINUTE as f64;
        assert!(SimTime::from_minutes(max_minutes * 2.0).is_err());
    }

    #[test]
    fn test_simtime_display() {
        assert_eq!(SimTime::from_minutes(2.5).unwrap().to_string(), "2.500min");
    }
}
