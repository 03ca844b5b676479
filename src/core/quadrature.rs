use super::types::IntegrationMethod;

/// Midpoint rule with each midpoint value taken as the mean of its endpoints.
pub fn integrate_rectangles(f: &[f64], dt: f64) -> f64 {
    f.windows(2).map(|w| 0.5 * (w[0] + w[1])).sum::<f64>() * dt
}

pub fn integrate_trapezoidal(f: &[f64], dt: f64) -> f64 {
    let Some((&first, rest)) = f.split_first() else {
        return 0.0;
    };
    let Some((&last, interior)) = rest.split_last() else {
        return 0.0;
    };
    (first + 2.0 * interior.iter().sum::<f64>() + last) * dt / 2.0
}

/// Composite Simpson. An odd subinterval count closes the final subinterval
/// with a trapezoid; fewer than two subintervals integrate to zero.
pub fn integrate_simpson(f: &[f64], dt: f64) -> f64 {
    let n = f.len().saturating_sub(1);
    if n < 2 {
        return 0.0;
    }
    if n % 2 == 1 {
        let n_simpson = n - 1;
        simpson_even(&f[..=n_simpson], dt) + (f[n_simpson] + f[n]) * dt / 2.0
    } else {
        simpson_even(f, dt)
    }
}

// Caller guarantees an even, non-zero number of subintervals.
fn simpson_even(f: &[f64], dt: f64) -> f64 {
    let n = f.len() - 1;
    let odd: f64 = f[1..n].iter().step_by(2).sum();
    let even: f64 = f[2..n].iter().step_by(2).sum();
    (f[0] + 4.0 * odd + 2.0 * even + f[n]) * dt / 3.0
}

impl IntegrationMethod {
    pub fn integrate(self, f: &[f64], dt: f64) -> f64 {
        match self {
            IntegrationMethod::Rectangle => integrate_rectangles(f, dt),
            IntegrationMethod::Trapezoidal => integrate_trapezoidal(f, dt),
            IntegrationMethod::Simpson => integrate_simpson(f, dt),
        }
    }
}
