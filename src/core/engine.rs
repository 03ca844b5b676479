use tracing::debug;

use super::consumption::{seasonal_consumption, seasonal_consumption_at};
use super::deflator::{build_deflator, cumulative_trapezoid, interpolate_linear};
use super::inflation::{
    MONTH_LABELS, MONTHS, monthly_percent_to_log_rate, monthly_series, piecewise_log_rate,
    scale_inflation,
};
use super::types::{
    ConsumptionParams, IntegrationMethod, MonthlySummary, ScenarioError, ScenarioMetrics,
    ScenarioResult, TimeGrid,
};

pub const HORIZON_MONTHS: f64 = 12.0;
/// Grid for the annual integrals and the plotted curves.
pub const PRIMARY_STEPS: usize = 600;
/// Independent grid used only to read the deflator at month midpoints.
pub const MIDPOINT_STEPS: usize = 120;

pub fn compute_scenario(
    params: &ConsumptionParams,
    inflation_percent: &[f64],
    factor: f64,
    method: IntegrationMethod,
) -> Result<ScenarioResult, ScenarioError> {
    let inflation_percent = monthly_series(inflation_percent)?;
    let scaled_inflation = scale_inflation(&inflation_percent, factor);

    let grid = TimeGrid::uniform(HORIZON_MONTHS, PRIMARY_STEPS);
    let dt = grid.step();
    let time = grid.points().to_vec();

    let nominal = seasonal_consumption(&time, params);

    let log_rates = monthly_percent_to_log_rate(&scaled_inflation)?;
    let log_rate = piecewise_log_rate(&log_rates, &time)?;
    let deflator = build_deflator(&log_rate, dt);
    let real: Vec<f64> = nominal.iter().zip(&deflator).map(|(c, d)| c * d).collect();

    let nominal_total = method.integrate(&nominal, dt);
    let real_total = method.integrate(&real, dt);

    // Display curve; always trapezoidal regardless of the headline method.
    let cumulative_real = cumulative_trapezoid(&real, dt);

    let monthly = monthly_summary(params, &scaled_inflation, &log_rates)?;

    let inflation_avg_pct = scaled_inflation.iter().sum::<f64>() / MONTHS as f64;
    let inflation_compounded_pct = log_rates.iter().sum::<f64>().exp_m1() * 100.0;

    let metrics = ScenarioMetrics {
        nominal_total,
        real_total,
        purchasing_power_loss: nominal_total - real_total,
        inflation_avg_pct,
        inflation_compounded_pct,
    };
    debug!(
        ?method,
        factor,
        nominal_total,
        real_total,
        inflation_compounded_pct,
        "scenario computed"
    );

    Ok(ScenarioResult {
        method,
        step: dt,
        time,
        nominal,
        log_rate,
        deflator,
        real,
        cumulative_real,
        scaled_inflation,
        monthly,
        metrics,
    })
}

fn monthly_summary(
    params: &ConsumptionParams,
    scaled_inflation: &[f64; MONTHS],
    log_rates: &[f64; MONTHS],
) -> Result<Vec<MonthlySummary>, ScenarioError> {
    let fine = TimeGrid::uniform(HORIZON_MONTHS, MIDPOINT_STEPS);
    let fine_rate = piecewise_log_rate(log_rates, fine.points())?;
    let fine_deflator = build_deflator(&fine_rate, fine.step());

    let rows = (0..MONTHS)
        .map(|m| {
            let t_mid = m as f64 + 0.5;
            let nominal = seasonal_consumption_at(t_mid, params);
            let deflator = interpolate_linear(t_mid, fine.points(), &fine_deflator);
            MonthlySummary {
                month: MONTH_LABELS[m],
                inflation_pct: round_to(scaled_inflation[m], 3),
                nominal: nominal.round(),
                real: (nominal * deflator).round(),
            }
        })
        .collect();
    Ok(rows)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::inflation::DEFAULT_INFLATION_PERCENT;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn sample_params() -> ConsumptionParams {
        ConsumptionParams {
            alpha: 1_500_000.0,
            beta: 150_000.0,
            gamma: 75_000.0,
        }
    }

    #[test]
    fn reference_scenario_loses_purchasing_power() {
        let result = compute_scenario(
            &sample_params(),
            &DEFAULT_INFLATION_PERCENT,
            1.0,
            IntegrationMethod::Simpson,
        )
        .expect("reference scenario is valid");
        let m = result.metrics;

        assert_approx_tol(m.nominal_total, 18_000_000.0, 180_000.0);
        assert!(m.real_total < m.nominal_total);
        assert!(m.purchasing_power_loss > 0.0);
        assert_approx(m.purchasing_power_loss, m.nominal_total - m.real_total);

        let expected_avg = DEFAULT_INFLATION_PERCENT.iter().sum::<f64>() / 12.0;
        assert_approx(m.inflation_avg_pct, expected_avg);
        let expected_compounded = (DEFAULT_INFLATION_PERCENT
            .iter()
            .map(|p| 1.0 + p / 100.0)
            .product::<f64>()
            - 1.0)
            * 100.0;
        assert_approx(m.inflation_compounded_pct, expected_compounded);
    }

    #[test]
    fn result_shapes_follow_grids() {
        let result = compute_scenario(
            &sample_params(),
            &DEFAULT_INFLATION_PERCENT,
            1.0,
            IntegrationMethod::Trapezoidal,
        )
        .expect("valid");
        assert_eq!(result.time.len(), PRIMARY_STEPS + 1);
        assert_eq!(result.nominal.len(), PRIMARY_STEPS + 1);
        assert_eq!(result.deflator.len(), PRIMARY_STEPS + 1);
        assert_eq!(result.cumulative_real.len(), PRIMARY_STEPS + 1);
        assert_eq!(result.time_series().len(), PRIMARY_STEPS + 1);
        assert_eq!(result.monthly.len(), 12);
        assert_eq!(result.time[0], 0.0);
        assert_eq!(result.time[PRIMARY_STEPS], 12.0);
        assert_approx(result.step, 0.02);
        assert_eq!(result.deflator[0], 1.0);
        assert_eq!(result.cumulative_real[0], 0.0);
        assert_eq!(result.log_rate[PRIMARY_STEPS], result.log_rate[PRIMARY_STEPS - 1]);
    }

    #[test]
    fn cumulative_curve_ends_at_trapezoidal_total() {
        let result = compute_scenario(
            &sample_params(),
            &DEFAULT_INFLATION_PERCENT,
            1.0,
            IntegrationMethod::Trapezoidal,
        )
        .expect("valid");
        let last = *result.cumulative_real.last().expect("non-empty");
        assert_approx_tol(last, result.metrics.real_total, 1e-6 * result.metrics.real_total);
    }

    #[test]
    fn zero_inflation_keeps_real_equal_to_nominal() {
        let result = compute_scenario(
            &sample_params(),
            &[0.0; 12],
            1.0,
            IntegrationMethod::Simpson,
        )
        .expect("valid");
        assert!(result.deflator.iter().all(|&d| d == 1.0));
        assert_eq!(result.metrics.real_total, result.metrics.nominal_total);
        assert_eq!(result.metrics.purchasing_power_loss, 0.0);
        assert_eq!(result.metrics.inflation_compounded_pct, 0.0);
        for row in &result.monthly {
            assert_eq!(row.nominal, row.real);
        }
    }

    #[test]
    fn monthly_summary_uses_midpoints_and_labels() {
        let params = sample_params();
        let result = compute_scenario(
            &params,
            &DEFAULT_INFLATION_PERCENT,
            1.2,
            IntegrationMethod::Simpson,
        )
        .expect("valid");
        assert_eq!(result.monthly[0].month, "Sep-24");
        assert_eq!(result.monthly[11].month, "Aug-25");
        assert_approx(result.monthly[4].inflation_pct, 1.368);
        assert_eq!(
            result.monthly[0].nominal,
            seasonal_consumption_at(0.5, &params).round()
        );
        // First half-month deflates by exactly half of September's log rate.
        let expected_real = seasonal_consumption_at(0.5, &params)
            * (-0.5 * (0.24f64 * 1.2 / 100.0).ln_1p()).exp();
        assert_approx_tol(result.monthly[0].real, expected_real, 1.0);
        assert!(result.monthly.iter().all(|row| row.real < row.nominal));
    }

    #[test]
    fn methods_agree_closely_on_reference_scenario() {
        let totals: Vec<f64> = [
            IntegrationMethod::Rectangle,
            IntegrationMethod::Trapezoidal,
            IntegrationMethod::Simpson,
        ]
        .iter()
        .map(|&m| {
            compute_scenario(&sample_params(), &DEFAULT_INFLATION_PERCENT, 1.0, m)
                .expect("valid")
                .metrics
                .real_total
        })
        .collect();
        assert_approx_tol(totals[0], totals[1], 1e-3);
        assert_approx_tol(totals[1], totals[2], 1e-5 * totals[2]);
    }

    #[test]
    fn wrong_length_inflation_is_rejected_before_computing() {
        let err = compute_scenario(
            &sample_params(),
            &DEFAULT_INFLATION_PERCENT[..11],
            1.0,
            IntegrationMethod::Simpson,
        )
        .expect_err("11 months must be rejected");
        assert_eq!(
            err,
            ScenarioError::InflationLength {
                expected: 12,
                actual: 11
            }
        );
    }

    #[test]
    fn total_loss_month_is_a_domain_error() {
        let mut inflation = DEFAULT_INFLATION_PERCENT;
        inflation[6] = -60.0;
        let err = compute_scenario(&sample_params(), &inflation, 2.0, IntegrationMethod::Simpson)
            .expect_err("-120% after scaling has no log rate");
        assert!(matches!(err, ScenarioError::InflationDomain { month: 6, .. }));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let a = compute_scenario(
            &sample_params(),
            &DEFAULT_INFLATION_PERCENT,
            0.8,
            IntegrationMethod::Rectangle,
        )
        .expect("valid");
        let b = compute_scenario(
            &sample_params(),
            &DEFAULT_INFLATION_PERCENT,
            0.8,
            IntegrationMethod::Rectangle,
        )
        .expect("valid");
        assert_eq!(a.real, b.real);
        assert_eq!(a.metrics.real_total, b.metrics.real_total);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(24))]

        #[test]
        fn prop_positive_inflation_always_costs_purchasing_power(
            monthly_bp in proptest::collection::vec(1u32..300, 12),
            factor_pct in 20u32..201,
            alpha in 100_000u32..5_000_000
        ) {
            let inflation: Vec<f64> = monthly_bp.iter().map(|&bp| bp as f64 / 100.0).collect();
            let params = ConsumptionParams {
                alpha: alpha as f64,
                beta: alpha as f64 * 0.1,
                gamma: alpha as f64 * 0.05,
            };
            let result = compute_scenario(
                &params,
                &inflation,
                factor_pct as f64 / 100.0,
                IntegrationMethod::Simpson,
            )
            .expect("positive inflation is valid");
            prop_assert!(result.metrics.purchasing_power_loss > 0.0);
            prop_assert!(result.deflator.windows(2).all(|w| w[1] <= w[0]));
            prop_assert!(result.metrics.real_total.is_finite());
        }
    }
}
