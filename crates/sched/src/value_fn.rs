//! Value functions: pure maps from an event index to a scalar.
//!
//! Construction validates arguments eagerly; `value` never fails.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Result, SchedulerError};

/// A scalar as a function of the number of events fired so far.
pub trait ValueFunction: Send + Sync {
    fn value(&self, event_index: usize) -> f64;
}

impl<T: ValueFunction + ?Sized> ValueFunction for Box<T> {
    fn value(&self, event_index: usize) -> f64 {
        (**self).value(event_index)
    }
}

impl<T: ValueFunction + ?Sized> ValueFunction for Arc<T> {
    fn value(&self, event_index: usize) -> f64 {
        (**self).value(event_index)
    }
}

#[inline]
fn decayed(initial_value: f64, gamma: f64, exponent: usize) -> f64 {
    initial_value * gamma.powf(exponent as f64)
}

// ── Exponential ─────────────────────────────────────────────────────────────

/// `initial_value * gamma^i`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    pub initial_value: f64,
    pub gamma: f64,
}

impl Exponential {
    pub fn new(initial_value: f64, gamma: f64) -> Self {
        Self {
            initial_value,
            gamma,
        }
    }
}

impl ValueFunction for Exponential {
    fn value(&self, event_index: usize) -> f64 {
        decayed(self.initial_value, self.gamma, event_index)
    }
}

// ── Step ────────────────────────────────────────────────────────────────────

/// `initial_value * gamma^(i / step_size)`, decaying every `step_size` events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepDecay {
    initial_value: f64,
    gamma: f64,
    step_size: usize,
}

impl StepDecay {
    pub fn new(initial_value: f64, gamma: f64, step_size: usize) -> Result<Self> {
        if step_size == 0 {
            return Err(SchedulerError::InvalidValue(
                "Argument step_size should be a positive integer, but given 0".to_string(),
            ));
        }
        Ok(Self {
            initial_value,
            gamma,
            step_size,
        })
    }

    pub fn step_size(&self) -> usize {
        self.step_size
    }
}

impl ValueFunction for StepDecay {
    fn value(&self, event_index: usize) -> f64 {
        decayed(self.initial_value, self.gamma, event_index / self.step_size)
    }
}

// ── Multi-step ──────────────────────────────────────────────────────────────

/// `initial_value * gamma^k`, `k` = number of milestones `<= i`.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiStep {
    initial_value: f64,
    gamma: f64,
    /// Sorted ascending.
    milestones: Vec<usize>,
}

impl MultiStep {
    pub fn new(initial_value: f64, gamma: f64, mut milestones: Vec<usize>) -> Self {
        milestones.sort_unstable();
        Self {
            initial_value,
            gamma,
            milestones,
        }
    }

    pub fn milestones(&self) -> &[usize] {
        &self.milestones
    }
}

impl ValueFunction for MultiStep {
    fn value(&self, event_index: usize) -> f64 {
        let passed = self.milestones.partition_point(|&m| m <= event_index);
        decayed(self.initial_value, self.gamma, passed)
    }
}

// ── Piecewise linear ────────────────────────────────────────────────────────

/// Linear interpolation between `(milestone, value)` pairs, constant outside.
///
/// ```text
/// i <= m_first          → v_first
/// i >= m_last           → v_last
/// m_k <= i < m_{k+1}    → v_k + (v_{k+1} - v_k) * (i - m_k) / (m_{k+1} - m_k)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseLinear {
    milestones: Vec<usize>,
    values: Vec<f64>,
}

impl PiecewiseLinear {
    /// Milestones must be strictly increasing and there must be at least one pair.
    pub fn new(milestones_values: Vec<(usize, f64)>) -> Result<Self> {
        if milestones_values.is_empty() {
            return Err(SchedulerError::InvalidValue(
                "Argument milestones_values should be with at least one value".to_string(),
            ));
        }
        for pair in milestones_values.windows(2) {
            let (prev, next) = (pair[0].0, pair[1].0);
            if next <= prev {
                return Err(SchedulerError::InvalidValue(format!(
                    "Milestones should be increasing integers, but given {next} is not larger \
                     than the previous milestone {prev}"
                )));
            }
        }
        let (milestones, values) = milestones_values.into_iter().unzip();
        Ok(Self { milestones, values })
    }

    /// Build from untyped JSON such as `[[10, 0.5], [20, 0.1]]`.
    pub fn from_json(milestones_values: &Value) -> Result<Self> {
        let entries = milestones_values.as_array().ok_or_else(|| {
            SchedulerError::InvalidType(format!(
                "Argument milestones_values should be a list or tuple, but given {}",
                json_type_name(milestones_values)
            ))
        })?;
        if entries.is_empty() {
            return Err(SchedulerError::InvalidValue(
                "Argument milestones_values should be with at least one value".to_string(),
            ));
        }

        let mut pairs = Vec::with_capacity(entries.len());
        for entry in entries {
            let pair = entry
                .as_array()
                .filter(|pair| pair.len() == 2)
                .ok_or_else(|| {
                    SchedulerError::InvalidValue(format!(
                        "Argument milestones_values should be a list of pairs \
                         (milestone, param_value), but given {entry}"
                    ))
                })?;
            let milestone = json_milestone(&pair[0])?;
            let value = pair[1].as_f64().ok_or_else(|| {
                SchedulerError::InvalidType(format!(
                    "Value of a parameter should be a number, but given {}",
                    json_type_name(&pair[1])
                ))
            })?;
            pairs.push((milestone, value));
        }
        Self::new(pairs)
    }

    pub fn milestones_values(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.milestones.iter().copied().zip(self.values.iter().copied())
    }
}

impl ValueFunction for PiecewiseLinear {
    fn value(&self, event_index: usize) -> f64 {
        let last = self.milestones.len() - 1;
        if event_index <= self.milestones[0] {
            return self.values[0];
        }
        if event_index >= self.milestones[last] {
            return self.values[last];
        }

        // First milestone strictly after `event_index`; always in 1..=last here.
        let hi = self.milestones.partition_point(|&m| m <= event_index);
        let (m0, m1) = (self.milestones[hi - 1], self.milestones[hi]);
        let (v0, v1) = (self.values[hi - 1], self.values[hi]);
        v0 + (v1 - v0) * (event_index - m0) as f64 / (m1 - m0) as f64
    }
}

fn json_milestone(milestone: &Value) -> Result<usize> {
    match milestone {
        Value::Number(n) if n.is_u64() || n.is_i64() => n
            .as_u64()
            .and_then(|m| usize::try_from(m).ok())
            .ok_or_else(|| {
                SchedulerError::InvalidValue(format!(
                    "Milestones should be non-negative integers, but given {n}"
                ))
            }),
        other => Err(SchedulerError::InvalidType(format!(
            "Value of a milestone should be integer, but given {}",
            json_type_name(other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

// ── Lambda ──────────────────────────────────────────────────────────────────

/// Any user callable `f(event_index) -> value`.
#[derive(Clone)]
pub struct Lambda<F> {
    f: F,
}

impl<F> Lambda<F>
where
    F: Fn(usize) -> f64 + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> ValueFunction for Lambda<F>
where
    F: Fn(usize) -> f64 + Send + Sync,
{
    fn value(&self, event_index: usize) -> f64 {
        (self.f)(event_index)
    }
}

impl<F> fmt::Debug for Lambda<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lambda").finish_non_exhaustive()
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn exponential_decays_every_event() {
        let f = Exponential::new(10.0, 0.99);
        assert_eq!(f.value(0), 10.0);
        assert!(close(f.value(3), 10.0 * 0.99f64.powi(3)));
        assert!(close(f.value(40), 10.0 * 0.99f64.powi(40)));
    }

    #[test]
    fn step_decays_every_step_size() {
        let f = StepDecay::new(5.0, 0.98, 22).unwrap();
        assert_eq!(f.step_size(), 22);
        assert_eq!(f.value(21), 5.0);
        assert!(close(f.value(22), 5.0 * 0.98));
        assert!(close(f.value(40), 5.0 * 0.98));
        assert!(close(f.value(44), 5.0 * 0.98 * 0.98));
    }

    #[test]
    fn step_rejects_zero_step_size() {
        let err = StepDecay::new(1.0, 0.5, 0).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn multi_step_counts_passed_milestones() {
        let f = MultiStep::new(5.0, 0.5, vec![3, 6, 9, 10, 11]);
        assert_eq!(f.value(2), 5.0);
        assert_eq!(f.value(3), 2.5);
        assert_eq!(f.value(5), 2.5);
        assert_eq!(f.value(9), 5.0 * 0.125);
        assert_eq!(f.value(40), 5.0 * 0.5f64.powi(5));
    }

    #[test]
    fn multi_step_sorts_milestones() {
        let f = MultiStep::new(1.0, 0.1, vec![6, 3]);
        assert_eq!(f.milestones(), &[3, 6]);
        assert!(close(f.value(4), 0.1));
    }

    #[test]
    fn piecewise_linear_clamps_and_interpolates() {
        let f = PiecewiseLinear::new(vec![(2, 0.0), (5, 10.0)]).unwrap();
        assert_eq!(f.value(0), 0.0);
        assert_eq!(f.value(2), 0.0);
        assert_eq!(f.value(3), 10.0 / 3.0);
        assert_eq!(f.value(5), 10.0);
        assert_eq!(f.value(100), 10.0);
    }

    #[test]
    fn piecewise_linear_exact_at_inner_milestones() {
        let f = PiecewiseLinear::new(vec![(10, 0.5), (20, 0.45), (21, 0.3), (30, 0.1), (40, 0.1)])
            .unwrap();
        assert_eq!(f.value(20), 0.45);
        assert_eq!(f.value(21), 0.3);
        assert_eq!(f.value(30), 0.1);
        assert!(close(f.value(15), 0.475));
        assert!(close(f.value(35), 0.1));
    }

    #[test]
    fn piecewise_linear_single_pair_is_constant() {
        let f = PiecewiseLinear::new(vec![(4, 7.0)]).unwrap();
        assert_eq!(f.value(0), 7.0);
        assert_eq!(f.value(4), 7.0);
        assert_eq!(f.value(9), 7.0);
    }

    #[test]
    fn piecewise_linear_typed_validation() {
        let err = PiecewiseLinear::new(vec![]).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidValue(_)));
        assert!(err.to_string().contains("at least one value"));

        let err = PiecewiseLinear::new(vec![(10, 0.5), (5, 0.6)]).unwrap_err();
        assert!(err.to_string().starts_with("Milestones should be increasing integers"));

        let err = PiecewiseLinear::new(vec![(5, 0.5), (5, 0.6)]).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidValue(_)));
    }

    #[test]
    fn piecewise_linear_json_validation() {
        let cases = [
            (json!(null), "Argument milestones_values should be a list or tuple", true),
            (json!([]), "Argument milestones_values should be with at least one value", false),
            (json!([[0.5]]), "Argument milestones_values should be a list of pairs", false),
            (json!([[10, 0.5], [0.6]]), "Argument milestones_values should be a list", false),
            (json!([[10, 0.5], [5, 0.6]]), "Milestones should be increasing integers", false),
            (json!([[0.5, 1]]), "Value of a milestone should be integer", true),
            (json!([[-1, 1]]), "Milestones should be non-negative integers", false),
            (json!([[1, "high"]]), "Value of a parameter should be a number", true),
        ];
        for (input, message, is_type_error) in cases {
            let err = PiecewiseLinear::from_json(&input).unwrap_err();
            assert!(err.is_invalid_argument(), "{input}");
            assert!(
                err.to_string().starts_with(message),
                "{input}: got '{err}'"
            );
            assert_eq!(matches!(err, SchedulerError::InvalidType(_)), is_type_error, "{input}");
        }
    }

    #[test]
    fn piecewise_linear_json_accepts_pairs() {
        let f = PiecewiseLinear::from_json(&json!([[10, 0], [20, 10]])).unwrap();
        let pairs: Vec<_> = f.milestones_values().collect();
        assert_eq!(pairs, vec![(10, 0.0), (20, 10.0)]);
        assert_eq!(f.value(15), 5.0);
    }

    #[test]
    fn lambda_delegates_to_callable() {
        let f = Lambda::new(|i: usize| 10.0 * 0.99f64.powi((i % 9) as i32));
        assert_eq!(f.value(0), 10.0);
        assert_eq!(f.value(9), 10.0);
        assert!(close(f.value(2), 10.0 * 0.99 * 0.99));
    }

    #[test]
    fn boxed_and_shared_value_functions() {
        let boxed: Box<dyn ValueFunction> = Box::new(Exponential::new(2.0, 0.5));
        assert_eq!(boxed.value(1), 1.0);
        let shared: Arc<dyn ValueFunction> = Arc::new(MultiStep::new(2.0, 0.5, vec![1]));
        assert_eq!(shared.value(1), 1.0);
    }
}
