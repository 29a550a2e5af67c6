//! Distribution traits and implementations for arrival patterns and service times
//!
//! This module provides traits and implementations for the probability
//! distributions used by the call-center model: the gap between successive
//! callers and the time an agent spends with one caller. Every sample is
//! drawn from a [`RandomProvider`] passed in by the caller, never from a
//! generator hidden inside the distribution.

use crate::error::SimError;
use crate::randomness::{DrawSite, RandomProvider};
use crate::time::SimTime;

/// Trait for generating arrival patterns
///
/// This trait abstracts over different arrival patterns for request generation
/// (Poisson, constant, etc.).
pub trait ArrivalPattern: Send {
    /// Get the time until the next request arrival
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidSample`] if the pattern produced a negative
    /// or non-finite gap.
    fn next_arrival_time(&mut self, rng: &mut dyn RandomProvider) -> Result<SimTime, SimError>;

    /// Mean gap between arrivals, in minutes
    fn mean_inter_arrival(&self) -> f64;
}

/// Trait for sampling service times from a distribution
pub trait ServiceTimeDistribution: Send {
    /// Sample the service time for a single request
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidSample`] if the distribution produced a
    /// negative or non-finite duration.
    fn sample(&mut self, rng: &mut dyn RandomProvider) -> Result<SimTime, SimError>;

    /// Mean service time, in minutes
    fn mean_service_time(&self) -> f64;
}

/// Turn a raw sample in minutes into a duration, rejecting bad values.
fn checked_sample(site: DrawSite, minutes: f64) -> Result<SimTime, SimError> {
    SimTime::from_minutes(minutes).map_err(|_| SimError::InvalidSample {
        site: site.tag,
        value: minutes,
    })
}

fn positive_mean(what: &str, mean: f64) -> Result<f64, SimError> {
    if mean.is_finite() && mean > 0.0 {
        Ok(mean)
    } else {
        Err(SimError::Configuration(format!(
            "{what} must be a positive finite number of minutes, got {mean}"
        )))
    }
}

// =============================================================================
// Arrival Pattern Implementations
// =============================================================================

/// Simple constant arrival pattern
///
/// Generates requests with a fixed inter-arrival time.
#[derive(Debug, Clone)]
pub struct ConstantArrivalPattern {
    inter_arrival_time: SimTime,
}

impl ConstantArrivalPattern {
    /// Create a new constant arrival pattern
    pub fn new(inter_arrival_time: SimTime) -> Self {
        Self { inter_arrival_time }
    }
}

impl ArrivalPattern for ConstantArrivalPattern {
    fn next_arrival_time(&mut self, _rng: &mut dyn RandomProvider) -> Result<SimTime, SimError> {
        Ok(self.inter_arrival_time)
    }

    fn mean_inter_arrival(&self) -> f64 {
        self.inter_arrival_time.as_minutes()
    }
}

/// Poisson arrival pattern
///
/// Generates requests according to a Poisson process with exponentially
/// distributed inter-arrival times.
#[derive(Debug, Clone)]
pub struct PoissonArrivals {
    /// Mean gap between arrivals, in minutes
    mean: f64,
    /// Rate parameter (lambda) - average arrivals per minute
    rate: f64,
    site: DrawSite,
}

impl PoissonArrivals {
    /// Create a new Poisson arrival pattern from the mean inter-arrival time
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`] unless `mean_inter_arrival` is a
    /// positive finite number.
    pub fn new(mean_inter_arrival: f64) -> Result<Self, SimError> {
        let mean = positive_mean("Mean inter-arrival time", mean_inter_arrival)?;
        Ok(Self {
            mean,
            rate: 1.0 / mean,
            site: crate::draw_site!("interarrival"),
        })
    }

    /// Get the rate parameter
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl ArrivalPattern for PoissonArrivals {
    fn next_arrival_time(&mut self, rng: &mut dyn RandomProvider) -> Result<SimTime, SimError> {
        let gap = rng.sample_exp_minutes(self.site, self.rate);
        checked_sample(self.site, gap)
    }

    fn mean_inter_arrival(&self) -> f64 {
        self.mean
    }
}

// =============================================================================
// Service Time Distribution Implementations
// =============================================================================

/// Constant service time distribution
///
/// Always returns the same service time.
#[derive(Debug, Clone)]
pub struct ConstantServiceTime {
    duration: SimTime,
}

impl ConstantServiceTime {
    /// Create a new constant service time distribution
    pub fn new(duration: SimTime) -> Self {
        Self { duration }
    }
}

impl ServiceTimeDistribution for ConstantServiceTime {
    fn sample(&mut self, _rng: &mut dyn RandomProvider) -> Result<SimTime, SimError> {
        Ok(self.duration)
    }

    fn mean_service_time(&self) -> f64 {
        self.duration.as_minutes()
    }
}

/// Exponential service time distribution
///
/// Samples service times from an exponential distribution, the classic
/// M/M/c assumption for call handling times.
#[derive(Debug, Clone)]
pub struct ExponentialServiceTime {
    mean: f64,
    rate: f64,
    site: DrawSite,
}

impl ExponentialServiceTime {
    /// Create a new exponential service time distribution from its mean
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`] unless `mean_service_time` is a
    /// positive finite number.
    pub fn new(mean_service_time: f64) -> Result<Self, SimError> {
        let mean = positive_mean("Mean service time", mean_service_time)?;
        Ok(Self {
            mean,
            rate: 1.0 / mean,
            site: crate::draw_site!("service"),
        })
    }

    /// Get the rate parameter
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl ServiceTimeDistribution for ExponentialServiceTime {
    fn sample(&mut self, rng: &mut dyn RandomProvider) -> Result<SimTime, SimError> {
        let duration = rng.sample_exp_minutes(self.site, self.rate);
        checked_sample(self.site, duration)
    }

    fn mean_service_time(&self) -> f64 {
        self.mean
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::randomness::RandomSource;

    /// Provider returning a fixed value regardless of the rate.
    struct FixedProvider(f64);

    impl RandomProvider for FixedProvider {
        fn sample_exp_minutes(&mut self, _site: DrawSite, _rate: f64) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_constant_arrival_pattern() {
        let mut rng = RandomSource::seeded(1);
        let mut pattern = ConstantArrivalPattern::new(SimTime::from_whole_minutes(5));
        assert_eq!(pattern.next_arrival_time(&mut rng).unwrap(), SimTime::from_whole_minutes(5));
        assert_eq!(pattern.next_arrival_time(&mut rng).unwrap(), SimTime::from_whole_minutes(5));
        assert_eq!(pattern.mean_inter_arrival(), 5.0);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_poisson_arrivals_creation() {
        let pattern = PoissonArrivals::new(5.0).unwrap();
        assert_eq!(pattern.rate(), 0.2);
        assert_eq!(pattern.mean_inter_arrival(), 5.0);
    }

    #[test]
    fn test_poisson_arrivals_invalid_mean() {
        assert!(matches!(PoissonArrivals::new(0.0), Err(SimError::Configuration(_))));
        assert!(PoissonArrivals::new(-5.0).is_err());
        assert!(PoissonArrivals::new(f64::NAN).is_err());
    }

    #[test]
    fn test_poisson_arrivals_draw_from_injected_source() {
        let mut pattern = PoissonArrivals::new(5.0).unwrap();
        let mut a = RandomSource::seeded(99);
        let mut b = RandomSource::seeded(99);
        for _ in 0..20 {
            let gap = pattern.next_arrival_time(&mut a).unwrap();
            assert_eq!(gap, pattern.next_arrival_time(&mut b).unwrap());
        }
        assert_eq!(a.draws(), 20);
    }

    #[test]
    fn test_negative_sample_is_rejected() {
        let mut pattern = PoissonArrivals::new(5.0).unwrap();
        let err = pattern.next_arrival_time(&mut FixedProvider(-1.0)).unwrap_err();
        assert!(matches!(err, SimError::InvalidSample { site: "interarrival", .. }));

        let mut service = ExponentialServiceTime::new(10.0).unwrap();
        let err = service.sample(&mut FixedProvider(f64::NAN)).unwrap_err();
        assert!(matches!(err, SimError::InvalidSample { site: "service", .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_constant_service_time() {
        let mut rng = RandomSource::seeded(1);
        let mut dist = ConstantServiceTime::new(SimTime::from_whole_minutes(10));
        assert_eq!(dist.sample(&mut rng).unwrap(), SimTime::from_whole_minutes(10));
        assert_eq!(dist.mean_service_time(), 10.0);
    }

    #[test]
    fn test_exponential_service_time_sampling() {
        let mut dist = ExponentialServiceTime::new(10.0).unwrap();
        assert_eq!(dist.rate(), 0.1);
        let mut rng = RandomSource::seeded(3);
        let n = 10_000;
        let total: f64 = (0..n)
            .map(|_| dist.sample(&mut rng).unwrap().as_minutes())
            .sum();
        let mean = total / n as f64;
        assert!((mean - 10.0).abs() < 0.6, "sample mean {mean}");
    }

    #[test]
    fn test_exponential_service_time_invalid_mean() {
        assert!(ExponentialServiceTime::new(0.0).is_err());
        assert!(ExponentialServiceTime::new(f64::INFINITY).is_err());
    }
}
