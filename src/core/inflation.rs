use super::types::ScenarioError;

pub const MONTHS: usize = 12;

pub const MONTH_LABELS: [&str; MONTHS] = [
    "Sep-24", "Oct-24", "Nov-24", "Dec-24", "Jan-25", "Feb-25", "Mar-25", "Apr-25", "May-25",
    "Jun-25", "Jul-25", "Aug-25",
];

/// Reference month-on-month CPI variation in percent (Sep-2024 to Aug-2025).
pub const DEFAULT_INFLATION_PERCENT: [f64; MONTHS] = [
    0.24, -0.13, 0.27, 0.46, 1.14, 0.82, 0.52, 0.66, 0.32, 0.10, 0.28, 0.19,
];

// Largest time that still maps into the last month.
const LAST_MONTH_CLIP: f64 = 11.9999;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InflationScenario {
    Base,
    Optimistic,
    Critical,
    Custom(f64),
}

impl InflationScenario {
    pub fn factor(self) -> f64 {
        match self {
            InflationScenario::Base => 1.0,
            InflationScenario::Optimistic => 0.8,
            InflationScenario::Critical => 1.2,
            InflationScenario::Custom(factor) => factor,
        }
    }
}

pub fn default_inflation_table() -> Vec<(&'static str, f64)> {
    MONTH_LABELS
        .iter()
        .copied()
        .zip(DEFAULT_INFLATION_PERCENT)
        .collect()
}

/// Rejects anything other than exactly one value per month.
pub fn monthly_series(values: &[f64]) -> Result<[f64; MONTHS], ScenarioError> {
    values
        .try_into()
        .map_err(|_| ScenarioError::InflationLength {
            expected: MONTHS,
            actual: values.len(),
        })
}

pub fn scale_inflation(percent: &[f64; MONTHS], factor: f64) -> [f64; MONTHS] {
    percent.map(|p| p * factor)
}

/// `ln(1 + p/100)` per month. Rejects `p <= -100` instead of producing a
/// non-finite rate.
pub fn monthly_percent_to_log_rate(
    percent: &[f64; MONTHS],
) -> Result<[f64; MONTHS], ScenarioError> {
    let mut rates = [0.0; MONTHS];
    for (month, (&p, rate)) in percent.iter().zip(rates.iter_mut()).enumerate() {
        let proportion = p / 100.0;
        if !proportion.is_finite() || proportion <= -1.0 {
            return Err(ScenarioError::InflationDomain { month, percent: p });
        }
        *rate = proportion.ln_1p();
    }
    Ok(rates)
}

pub fn month_index(t: f64) -> usize {
    t.clamp(0.0, LAST_MONTH_CLIP).floor() as usize
}

/// Piecewise-constant rate curve: each time takes the rate of the month it falls in.
pub fn piecewise_log_rate(log_rates: &[f64], t: &[f64]) -> Result<Vec<f64>, ScenarioError> {
    if log_rates.len() != MONTHS {
        return Err(ScenarioError::InflationLength {
            expected: MONTHS,
            actual: log_rates.len(),
        });
    }
    Ok(t.iter().map(|&ti| log_rates[month_index(ti)]).collect())
}
