mod consumption;
mod deflator;
mod engine;
mod inflation;
mod quadrature;
mod types;

pub use consumption::{OMEGA, seasonal_consumption, seasonal_consumption_at, spending_range};
pub use deflator::{build_deflator, cumulative_trapezoid, interpolate_linear};
pub use engine::{HORIZON_MONTHS, MIDPOINT_STEPS, PRIMARY_STEPS, compute_scenario};
pub use inflation::{
    DEFAULT_INFLATION_PERCENT, InflationScenario, MONTH_LABELS, MONTHS, default_inflation_table,
    month_index, monthly_percent_to_log_rate, monthly_series, piecewise_log_rate, scale_inflation,
};
pub use quadrature::{integrate_rectangles, integrate_simpson, integrate_trapezoidal};
pub use types::{
    ConsumptionParams, IntegrationMethod, MonthlySummary, ScenarioError, ScenarioMetrics,
    ScenarioResult, TimeGrid, TimeSample,
};
