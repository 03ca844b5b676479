use std::f64::consts::PI;

use super::types::ConsumptionParams;

/// One full seasonal cycle per 12 months.
pub const OMEGA: f64 = 2.0 * PI / 12.0;

pub fn seasonal_consumption_at(t: f64, params: &ConsumptionParams) -> f64 {
    params.alpha + params.beta * (OMEGA * t).cos() + params.gamma * (OMEGA * t).sin()
}

/// Nominal spending rate for each time value (months).
pub fn seasonal_consumption(t: &[f64], params: &ConsumptionParams) -> Vec<f64> {
    t.iter()
        .map(|&ti| seasonal_consumption_at(ti, params))
        .collect()
}

/// Cheapest and most expensive month implied by the cosine swing, `alpha -/+ |beta|`.
pub fn spending_range(params: &ConsumptionParams) -> (f64, f64) {
    let swing = params.beta.abs();
    (params.alpha - swing, params.alpha + swing)
}
