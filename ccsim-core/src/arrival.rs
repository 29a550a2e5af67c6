//! Unbounded source of callers
//!
//! The source keeps exactly one pending arrival on the clock. Each arrival
//! samples the line length, admits a new caller, and schedules the next
//! arrival one sampled gap later. It never stops on its own; arrivals
//! scheduled past the horizon simply never run.

use crate::center::CallCenter;
use crate::error::SimError;
use crate::request::{self, Request};
use crate::scheduler::Scheduler;
use tracing::trace;

/// Drives caller creation for a [`CallCenter`]
pub struct ArrivalSource;

impl ArrivalSource {
    /// Schedule the first arrival one gap after the current time.
    ///
    /// # Errors
    ///
    /// Fails if the arrival pattern produces an invalid gap.
    pub fn start(scheduler: &mut Scheduler<CallCenter>, center: &mut CallCenter) -> Result<(), SimError> {
        Self::schedule_next(scheduler, center)
    }

    fn schedule_next(scheduler: &mut Scheduler<CallCenter>, center: &mut CallCenter) -> Result<(), SimError> {
        let gap = center.arrivals.next_arrival_time(&mut center.rng)?;
        let id = scheduler.schedule_after(gap, Self::on_arrival);
        trace!(event_id = %id, gap = %gap, "Next arrival scheduled");
        Ok(())
    }

    fn on_arrival(scheduler: &mut Scheduler<CallCenter>, center: &mut CallCenter) -> Result<(), SimError> {
        let now = scheduler.time();
        // sampled before the newcomer joins the line
        let depth = center.pool.queue_depth();
        center.observations.record_queue_length(depth);

        let id = center.admit();
        trace!(request = %id, time = %now, queue_depth = depth, "Caller arrived");
        request::start(Request::new(id, now), scheduler, center)?;

        // draw order per arrival: the newcomer's service time (when an agent
        // is free), then the next gap
        Self::schedule_next(scheduler, center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::center::build_simulation;
    use crate::dists::{ConstantArrivalPattern, ConstantServiceTime};
    use crate::randomness::RandomSource;
    use crate::time::SimTime;
    use crate::{Execute, Executor};

    fn minutes(m: u64) -> SimTime {
        SimTime::from_whole_minutes(m)
    }

    fn sim(servers: usize, gap: u64, service: u64) -> crate::Simulation<CallCenter> {
        let center = CallCenter::new(
            servers,
            Box::new(ConstantArrivalPattern::new(minutes(gap))),
            Box::new(ConstantServiceTime::new(minutes(service))),
            RandomSource::seeded(0),
        )
        .unwrap()
        .with_departure_records();
        build_simulation(center).unwrap()
    }

    #[test]
    fn test_arrivals_keep_coming_until_horizon() {
        let mut sim = sim(10, 3, 1);
        Executor::timed(minutes(30)).execute(&mut sim).unwrap();
        // arrivals at 3, 6, ..., 30
        assert_eq!(sim.state().arrived(), 10);
        assert_eq!(sim.state().observations().queue_length_samples(), &[0; 10]);
        // the arrival at 33 is queued but never dispatched
        assert_eq!(sim.peek_next_event_time(), Some(minutes(31)));
    }

    #[test]
    fn test_queue_is_sampled_before_joining() {
        let mut sim = sim(1, 1, 10);
        Executor::timed(minutes(4)).execute(&mut sim).unwrap();
        // first caller is served, the next three line up behind it
        assert_eq!(sim.state().observations().queue_length_samples(), &[0, 0, 1, 2]);
        assert_eq!(sim.state().pool().queue_depth(), 3);
    }

    #[test]
    fn test_service_is_drawn_before_the_next_gap() {
        use crate::dists::{
            ArrivalPattern, ExponentialServiceTime, PoissonArrivals, ServiceTimeDistribution,
        };

        let center = CallCenter::new(
            2,
            Box::new(PoissonArrivals::new(5.0).unwrap()),
            Box::new(ExponentialServiceTime::new(10.0).unwrap()),
            RandomSource::seeded(9),
        )
        .unwrap();
        let mut sim = build_simulation(center).unwrap();
        Executor::steps(1).execute(&mut sim).unwrap();
        assert_eq!(sim.state().rng().draws(), 3);

        // replay the same stream by hand: gap, service, gap
        let mut rng = RandomSource::seeded(9);
        let mut arrivals = PoissonArrivals::new(5.0).unwrap();
        let mut service = ExponentialServiceTime::new(10.0).unwrap();
        let first_gap = arrivals.next_arrival_time(&mut rng).unwrap();
        let first_service = service.sample(&mut rng).unwrap();
        let second_gap = arrivals.next_arrival_time(&mut rng).unwrap();

        assert_eq!(sim.time(), first_gap);
        assert_eq!(
            sim.state().observations().service_times(),
            &[first_service.as_minutes()]
        );
        let next = sim.peek_next_event_time().unwrap();
        assert_eq!(next, (first_gap + first_service).min(first_gap + second_gap));
    }
}
