//! Running schedulers without a loop, for inspection and charts.

use crate::chart::Chart;
use crate::error::Result;
use crate::scheduler::StateParamScheduler;
use crate::value_fn::ValueFunction;

impl<F: ValueFunction> StateParamScheduler<F> {
    /// Values a new scheduler built from these arguments would emit over
    /// `num_events` firings, as `(i, value of firing i + 1)` pairs.
    pub fn simulate_values(
        num_events: usize,
        param_name: impl Into<String>,
        value_fn: F,
    ) -> Vec<(usize, f64)> {
        Self::new(param_name, value_fn, false).simulate(num_events)
    }

    /// Simulate `num_events` firings from a fresh counter sharing this
    /// scheduler's value function. This scheduler's own counter is untouched.
    pub fn simulate(&self, num_events: usize) -> Vec<(usize, f64)> {
        let fresh = self.detached();
        (0..num_events).map(|i| (i, fresh.advance())).collect()
    }

    /// Simulate and render with the built-in text chart.
    ///
    /// Requires the `plot` feature; without it this returns
    /// [`SchedulerError::MissingDependency`](crate::SchedulerError::MissingDependency).
    pub fn plot_values(
        num_events: usize,
        param_name: impl Into<String>,
        value_fn: F,
    ) -> Result<String> {
        Self::new(param_name, value_fn, false).plot(num_events)
    }

    /// Instance form of [`plot_values`](Self::plot_values).
    #[cfg(feature = "plot")]
    pub fn plot(&self, num_events: usize) -> Result<String> {
        Ok(self.plot_with(num_events, &crate::chart::TextChart::default()))
    }

    #[cfg(not(feature = "plot"))]
    pub fn plot(&self, _num_events: usize) -> Result<String> {
        Err(crate::SchedulerError::MissingDependency { dependency: "plot" })
    }

    /// Simulate and render through a caller-provided chart.
    pub fn plot_values_with<C: Chart>(
        num_events: usize,
        param_name: impl Into<String>,
        value_fn: F,
        chart: &C,
    ) -> C::Output {
        Self::new(param_name, value_fn, false).plot_with(num_events, chart)
    }

    pub fn plot_with<C: Chart>(&self, num_events: usize, chart: &C) -> C::Output {
        chart.render(self.param_name(), &self.simulate(num_events))
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use stateparam_engine::State;

    use super::*;
    use crate::scheduler::{ExpStateScheduler, LambdaStateScheduler, MultiStepStateScheduler};
    use crate::value_fn::{Lambda, MultiStep, PiecewiseLinear};

    /// Collects what it is asked to render.
    struct Capture;

    impl Chart for Capture {
        type Output = (String, Vec<(usize, f64)>);

        fn render(&self, label: &str, points: &[(usize, f64)]) -> Self::Output {
            (label.to_string(), points.to_vec())
        }
    }

    #[test]
    fn simulation_pairs_index_with_next_firing() {
        let values = StateParamScheduler::simulate_values(
            5,
            "pw",
            PiecewiseLinear::new(vec![(2, 0.0), (5, 10.0)]).unwrap(),
        );
        let expected = [0.0, 0.0, 10.0 / 3.0, 20.0 / 3.0, 10.0];
        assert_eq!(values.len(), 5);
        for (i, (&(index, value), want)) in values.iter().zip(expected).enumerate() {
            assert_eq!(index, i);
            assert!((value - want).abs() < 1e-12, "{i}: {value} vs {want}");
        }
    }

    #[test]
    fn simulate_leaves_counter_alone() {
        let sched = MultiStepStateScheduler::multi_step("m", 10.0, 0.99, vec![3, 6], false);
        let mut state = State::new();
        sched.step(&mut state);

        let values = sched.simulate(4);
        assert_eq!(values[0].1, 10.0);
        assert_eq!(sched.event_index(), 1);
    }

    #[test]
    fn simulation_matches_stepping() {
        let sched = LambdaStateScheduler::lambda("l", |i: usize| (i % 3) as f64, false);
        let simulated: Vec<f64> = sched.simulate(7).into_iter().map(|(_, v)| v).collect();
        let mut state = State::new();
        let stepped: Vec<f64> = (0..7).map(|_| sched.step(&mut state)).collect();
        assert_eq!(simulated, stepped);
    }

    #[test]
    fn plot_with_custom_chart() {
        let (label, points) = StateParamScheduler::plot_values_with(
            3,
            "custom_scheduled_param",
            Lambda::new(|i: usize| i as f64 * 2.0),
            &Capture,
        );
        assert_eq!(label, "custom_scheduled_param");
        assert_eq!(points, vec![(0, 2.0), (1, 4.0), (2, 6.0)]);
    }

    #[cfg(feature = "plot")]
    #[test]
    fn plot_values_renders_text_chart() {
        let value_fn = MultiStep::new(10.0, 0.99, vec![3, 6]);
        let out =
            StateParamScheduler::plot_values(20, "multistep_scheduled_param", value_fn).unwrap();
        assert!(out.starts_with("-- multistep_scheduled_param\n"));
        assert!(out.contains('*'));

        let sched = ExpStateScheduler::exponential("exp", 10.0, 0.99, false);
        assert!(sched.plot(20).unwrap().contains("9.9000"));
    }

    #[cfg(not(feature = "plot"))]
    #[test]
    fn plot_values_reports_missing_feature() {
        let value_fn = MultiStep::new(10.0, 0.99, vec![3, 6]);
        let err = StateParamScheduler::plot_values(20, "m", value_fn).unwrap_err();
        assert!(matches!(
            err,
            crate::SchedulerError::MissingDependency { dependency: "plot" }
        ));

        let sched = ExpStateScheduler::exponential("exp", 10.0, 0.99, false);
        assert_eq!(sched.plot_with(2, &Capture).1.len(), 2);
    }
}
