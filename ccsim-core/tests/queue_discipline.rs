//! Queueing discipline and bookkeeping invariants of a running call center

use ccsim_core::{
    build_simulation, Admission, CallCenter, ConstantArrivalPattern, ConstantServiceTime, Execute,
    Executor, ExponentialServiceTime, PoissonArrivals, RandomSource, ResourcePool, SimTime,
    Simulation,
};
use proptest::prelude::*;
use std::collections::VecDeque;

fn minutes(m: u64) -> SimTime {
    SimTime::from_whole_minutes(m)
}

fn poisson_center(servers: usize, inter_arrival: f64, service: f64, seed: u64) -> CallCenter {
    CallCenter::new(
        servers,
        Box::new(PoissonArrivals::new(inter_arrival).unwrap()),
        Box::new(ExponentialServiceTime::new(service).unwrap()),
        RandomSource::seeded(seed),
    )
    .unwrap()
    .with_departure_records()
}

fn run(center: CallCenter, horizon: SimTime) -> Simulation<CallCenter> {
    let mut sim = build_simulation(center).unwrap();
    sim.execute(Executor::timed(horizon)).unwrap();
    sim
}

#[test]
fn constant_load_matches_hand_computation() {
    // one agent, a caller every minute, two minutes per call
    let center = CallCenter::new(
        1,
        Box::new(ConstantArrivalPattern::new(minutes(1))),
        Box::new(ConstantServiceTime::new(minutes(2))),
        RandomSource::seeded(0),
    )
    .unwrap();
    let sim = run(center, minutes(10));
    let center = sim.state();
    let obs = center.observations();

    assert_eq!(obs.wait_times(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
    assert_eq!(obs.queue_length_samples(), &[0, 0, 0, 1, 1, 2, 2, 3, 3, 4]);
    assert_eq!(obs.average_wait(), 2.0);
    assert_eq!(obs.max_queue_length(), 4);
    assert_eq!(obs.utilization_pct(1, 10.0), 100.0);

    assert_eq!(center.arrived(), 10);
    assert_eq!(center.departed(), 4);
    assert_eq!(center.in_system(), 6);
    assert_eq!(center.pool().busy(), 1);
    assert_eq!(center.pool().queue_depth(), 5);
    assert_eq!(sim.time(), minutes(10));
    // no random draws for constant patterns
    assert_eq!(center.rng().draws(), 0);
}

#[test]
fn grants_follow_arrival_order() {
    for seed in 0..10 {
        let sim = run(poisson_center(3, 2.0, 10.0, seed), minutes(480));
        let records = sim.state().completed();
        assert!(!records.is_empty());

        let mut by_id = records.to_vec();
        by_id.sort_by_key(|r| r.id);
        for pair in by_id.windows(2) {
            assert!(
                pair[0].granted_at <= pair[1].granted_at,
                "seed {seed}: {} granted at {} after {} granted at {}",
                pair[0].id,
                pair[0].granted_at,
                pair[1].id,
                pair[1].granted_at
            );
        }
    }
}

#[test]
fn waits_are_non_negative_and_consistent() {
    let sim = run(poisson_center(2, 4.0, 9.0, 17), minutes(480));
    let center = sim.state();
    for record in center.completed() {
        assert!(record.granted_at >= record.arrival_time);
        assert_eq!(record.wait_time(), record.granted_at - record.arrival_time);
        assert_eq!(record.departed_at, record.granted_at + record.service_time);
    }
    assert!(center.observations().wait_times().iter().all(|w| *w >= 0.0));
    assert!(center.observations().service_times().iter().all(|s| *s >= 0.0));
}

#[test]
fn conservation_holds_after_every_step() {
    let mut sim = build_simulation(poisson_center(3, 3.0, 10.0, 5)).unwrap();
    let horizon = minutes(480);
    Executor::timed(horizon)
        .side_effect(|sim: &Simulation<CallCenter>| {
            let center = sim.state();
            let pool = center.pool();
            assert!(pool.busy() <= pool.capacity());
            assert_eq!(
                (pool.busy() + pool.queue_depth()) as u64,
                center.arrived() - center.departed()
            );
            assert!(sim.time() <= horizon);
        })
        .execute(&mut sim)
        .unwrap();
    assert!(sim.events_processed() > 0);
}

#[test]
fn overloaded_center_builds_a_line() {
    let sim = run(poisson_center(1, 1.0, 10.0, 3), minutes(120));
    let center = sim.state();
    assert_eq!(center.pool().busy(), 1);
    assert!(center.pool().queue_depth() > 50);
    assert!(center.observations().max_queue_length() > 50);
    assert!(center.pool().total_queued() > 0);
}

/// One step of a pool workload: a new arrival, or a service completion.
#[derive(Debug, Clone)]
enum Op {
    Arrive,
    Complete,
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(prop_oneof![Just(Op::Arrive), Just(Op::Complete)], 0..200)
}

proptest! {
    #[test]
    fn pool_grants_waiters_in_fifo_order(capacity in 1usize..6, ops in ops()) {
        let mut pool = ResourcePool::new(capacity).unwrap();
        let mut next_id = 0u32;
        let mut expected_line = VecDeque::new();
        let mut granted = Vec::new();
        let mut arrived = Vec::new();

        for op in ops {
            match op {
                Op::Arrive => {
                    next_id += 1;
                    arrived.push(next_id);
                    match pool.acquire(next_id) {
                        Admission::Granted(id) => granted.push(id),
                        Admission::Queued { position } => {
                            prop_assert_eq!(position, expected_line.len());
                            expected_line.push_back(next_id);
                        }
                    }
                }
                Op::Complete => {
                    if pool.busy() == 0 {
                        prop_assert!(pool.release().is_err());
                        continue;
                    }
                    if let Some(id) = pool.release().unwrap() {
                        prop_assert_eq!(Some(id), expected_line.pop_front());
                        granted.push(id);
                    }
                }
            }
            prop_assert!(pool.busy() <= capacity);
            prop_assert_eq!(pool.queue_depth(), expected_line.len());
            // nobody waits while an agent is idle
            prop_assert!(pool.queue_depth() == 0 || pool.busy() == capacity);
        }

        // everyone granted so far was granted in arrival order
        prop_assert_eq!(&granted[..], &arrived[..granted.len()]);
    }
}
