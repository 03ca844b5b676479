use serde::Serialize;
use thiserror::Error;

use super::inflation::MONTHS;

/// Seasonal spending model `c(t) = alpha + beta*cos(wt) + gamma*sin(wt)`, in
/// currency units per month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionParams {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationMethod {
    Rectangle,
    Trapezoidal,
    Simpson,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScenarioError {
    #[error("expected {expected} monthly inflation values, got {actual}")]
    InflationLength { expected: usize, actual: usize },
    #[error("inflation of {percent}% in month {month} has no log rate (must be > -100%)")]
    InflationDomain { month: usize, percent: f64 },
}

/// Uniform partition of `[0, end]` into `num_steps` subintervals.
#[derive(Debug, Clone)]
pub struct TimeGrid {
    points: Vec<f64>,
    step: f64,
}

impl TimeGrid {
    pub fn uniform(end: f64, num_steps: usize) -> Self {
        let steps = num_steps.max(1);
        let step = end / steps as f64;
        let mut points: Vec<f64> = (0..=steps).map(|i| i as f64 * step).collect();
        // Pin the right boundary so it never drifts past `end`.
        points[steps] = end;
        Self { points, step }
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn num_steps(&self) -> usize {
        self.points.len() - 1
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSample {
    pub t_month: f64,
    pub nominal: f64,
    pub log_rate: f64,
    pub deflator: f64,
    pub real: f64,
    pub cumulative_real: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub month: &'static str,
    pub inflation_pct: f64,
    pub nominal: f64,
    pub real: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioMetrics {
    pub nominal_total: f64,
    pub real_total: f64,
    pub purchasing_power_loss: f64,
    pub inflation_avg_pct: f64,
    pub inflation_compounded_pct: f64,
}

#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub method: IntegrationMethod,
    pub step: f64,
    pub time: Vec<f64>,
    pub nominal: Vec<f64>,
    pub log_rate: Vec<f64>,
    pub deflator: Vec<f64>,
    pub real: Vec<f64>,
    pub cumulative_real: Vec<f64>,
    pub scaled_inflation: [f64; MONTHS],
    pub monthly: Vec<MonthlySummary>,
    pub metrics: ScenarioMetrics,
}

impl ScenarioResult {
    /// Row-wise view of the sampled curves.
    pub fn time_series(&self) -> Vec<TimeSample> {
        (0..self.time.len())
            .map(|i| TimeSample {
                t_month: self.time[i],
                nominal: self.nominal[i],
                log_rate: self.log_rate[i],
                deflator: self.deflator[i],
                real: self.real[i],
                cumulative_real: self.cumulative_real[i],
            })
            .collect()
    }
}
