use crate::error::SimError;
use crate::{SimTime, Simulation};

/// Simulation execution trait.
pub trait Execute<S> {
    /// Executes the simulation until some stopping condition is reached.
    /// The condition is implementation-specific.
    ///
    /// # Errors
    ///
    /// Stops at the first continuation that fails and returns its error.
    fn execute(self, sim: &mut Simulation<S>) -> Result<(), SimError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndCondition {
    Time(SimTime),
    NoEvents,
    Steps(usize),
}

/// Executor is used for simple execution of an entire simulation.
///
/// See the crate level documentation for examples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Executor {
    end_condition: EndCondition,
}

impl Executor {
    /// Simulation will end only once there is no available events in the queue.
    ///
    /// An arrival source never runs dry, so this is only useful for models
    /// that stop scheduling on their own.
    #[must_use]
    pub fn unbound() -> Self {
        Self {
            end_condition: EndCondition::NoEvents,
        }
    }

    /// Simulation will be run no longer than the given time.
    /// Events scheduled exactly at `time` still run; later ones stay queued.
    #[must_use]
    pub fn timed(time: SimTime) -> Self {
        Self {
            end_condition: EndCondition::Time(time),
        }
    }

    /// Simulation will execute exactly this many steps, unless we run out of events.
    #[must_use]
    pub fn steps(steps: usize) -> Self {
        Self {
            end_condition: EndCondition::Steps(steps),
        }
    }

    /// Registers a side effect that is called _after_ each simulation step.
    #[must_use]
    pub fn side_effect<S, F>(self, func: F) -> ExecutorWithSideEffect<F>
    where
        F: Fn(&Simulation<S>),
    {
        ExecutorWithSideEffect {
            end_condition: self.end_condition,
            side_effect: func,
        }
    }
}

impl<S: 'static> Execute<S> for Executor {
    fn execute(self, sim: &mut Simulation<S>) -> Result<(), SimError> {
        run_with(sim, self.end_condition, |_| {})
    }
}

pub struct ExecutorWithSideEffect<F> {
    end_condition: EndCondition,
    side_effect: F,
}

impl<S: 'static, F> Execute<S> for ExecutorWithSideEffect<F>
where
    F: Fn(&Simulation<S>),
{
    fn execute(self, sim: &mut Simulation<S>) -> Result<(), SimError> {
        run_with(sim, self.end_condition, self.side_effect)
    }
}

fn run_with<S: 'static, F>(
    sim: &mut Simulation<S>,
    end_condition: EndCondition,
    side_effect: F,
) -> Result<(), SimError>
where
    F: Fn(&Simulation<S>),
{
    let step_fn = |sim: &mut Simulation<S>| -> Result<bool, SimError> {
        let result = sim.step()?;
        if result {
            side_effect(sim);
        }
        Ok(result)
    };
    match end_condition {
        EndCondition::Time(time) => execute_until(sim, time, step_fn),
        EndCondition::NoEvents => execute_until_empty(sim, step_fn),
        EndCondition::Steps(steps) => execute_steps(sim, steps, step_fn),
    }
}

fn execute_until_empty<S, F>(sim: &mut Simulation<S>, step: F) -> Result<(), SimError>
where
    F: Fn(&mut Simulation<S>) -> Result<bool, SimError>,
{
    while step(sim)? {}
    Ok(())
}

fn execute_until<S, F>(sim: &mut Simulation<S>, time: SimTime, step: F) -> Result<(), SimError>
where
    F: Fn(&mut Simulation<S>) -> Result<bool, SimError>,
{
    while sim.has_event_due_by(time) {
        step(sim)?;
    }
    Ok(())
}

fn execute_steps<S, F>(sim: &mut Simulation<S>, steps: usize, step: F) -> Result<(), SimError>
where
    F: Fn(&mut Simulation<S>) -> Result<bool, SimError>,
{
    for _ in 0..steps {
        if !step(sim)? {
            break;
        }
    }
    Ok(())
}
