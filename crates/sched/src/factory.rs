//! Building schedulers from [`SchedulerConfig`] entries.

use stateparam_common::{SchedulerConfig, ValueFnConfig};
use stateparam_engine::{EventLoop, EventTrigger};

use crate::error::{Result, SchedulerError};
use crate::scheduler::StateParamScheduler;
use crate::value_fn::{Exponential, MultiStep, PiecewiseLinear, StepDecay, ValueFunction};

/// A scheduler whose value function was chosen at runtime.
pub type DynStateScheduler = StateParamScheduler<Box<dyn ValueFunction>>;

/// Validate arguments and build the value function a config entry describes.
pub fn build_value_fn(config: &ValueFnConfig) -> Result<Box<dyn ValueFunction>> {
    Ok(match config {
        ValueFnConfig::Exponential {
            initial_value,
            gamma,
        } => Box::new(Exponential::new(*initial_value, *gamma)),
        ValueFnConfig::Step {
            initial_value,
            gamma,
            step_size,
        } => Box::new(StepDecay::new(*initial_value, *gamma, *step_size)?),
        ValueFnConfig::MultiStep {
            initial_value,
            gamma,
            milestones,
        } => Box::new(MultiStep::new(*initial_value, *gamma, milestones.clone())),
        ValueFnConfig::PiecewiseLinear { milestones_values } => {
            Box::new(PiecewiseLinear::from_json(milestones_values)?)
        }
    })
}

pub fn build_scheduler(config: &SchedulerConfig) -> Result<DynStateScheduler> {
    let value_fn = build_value_fn(&config.value_fn)?;
    Ok(StateParamScheduler::new(
        config.param_name.clone(),
        value_fn,
        config.save_history,
    ))
}

/// The trigger a config entry asks for: its event, filtered by `every`.
pub fn trigger_for(config: &SchedulerConfig) -> Result<EventTrigger> {
    match config.every {
        None => Ok(config.event.into()),
        Some(n) => config.event.every(n).map_err(|err| {
            SchedulerError::InvalidValue(format!("{err} (scheduler '{}')", config.param_name))
        }),
    }
}

/// Build the scheduler for `config` and attach it to `event_loop`.
pub fn attach_from_config<L>(
    config: &SchedulerConfig,
    event_loop: &mut L,
) -> Result<DynStateScheduler>
where
    L: EventLoop + ?Sized,
{
    let trigger = trigger_for(config)?;
    let scheduler = build_scheduler(config)?;
    scheduler.attach(event_loop, trigger)?;
    Ok(scheduler)
}

// ── Tests ───────────────────────────────────────────────────────────────────
