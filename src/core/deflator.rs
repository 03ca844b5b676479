/// Running integral of uniformly sampled `f`, one pairwise trapezoid at a time.
/// The first entry is always zero.
pub fn cumulative_trapezoid(f: &[f64], dt: f64) -> Vec<f64> {
    let mut acc = Vec::with_capacity(f.len());
    if f.is_empty() {
        return acc;
    }
    acc.push(0.0);
    for k in 1..f.len() {
        let prev = acc[k - 1];
        acc.push(prev + 0.5 * (f[k - 1] + f[k]) * dt);
    }
    acc
}

/// `D(t) = exp(-int_0^t pi(s) ds)`, mapping a nominal amount paid at `t` to
/// time-zero purchasing power.
pub fn build_deflator(log_rate: &[f64], dt: f64) -> Vec<f64> {
    cumulative_trapezoid(log_rate, dt)
        .into_iter()
        .map(|p| (-p).exp())
        .collect()
}

/// Piecewise-linear interpolation of `(xs, ys)` at `x`, holding the end values
/// outside the sampled range. `xs` must be ascending.
pub fn interpolate_linear(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return f64::NAN;
    }
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }
    let hi = xs[..n].partition_point(|&xi| xi <= x);
    let lo = hi - 1;
    let span = xs[hi] - xs[lo];
    if span <= 0.0 {
        return ys[lo];
    }
    let w = (x - xs[lo]) / span;
    ys[lo] + w * (ys[hi] - ys[lo])
}
