//! Fixed-step classic Runge-Kutta integration over flat state arrays.

/// Advance `state` from `t` to `t + dt` with the four-stage RK4 scheme.
///
/// `derivative(t, x)` must be a pure function of its arguments; it is
/// evaluated at `t`, twice at `t + dt/2`, and at `t + dt`.
pub fn rk4_step<const N: usize, F>(state: &[f64; N], t: f64, dt: f64, mut derivative: F) -> [f64; N]
where
    F: FnMut(f64, &[f64; N]) -> [f64; N],
{
    let half = 0.5 * dt;
    let k1 = derivative(t, state);
    let k2 = derivative(t + half, &offset(state, &k1, half));
    let k3 = derivative(t + half, &offset(state, &k2, half));
    let k4 = derivative(t + dt, &offset(state, &k3, dt));

    let mut next = *state;
    for i in 0..N {
        next[i] += dt / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }
    next
}

/// `x + h·k`
fn offset<const N: usize>(x: &[f64; N], k: &[f64; N], h: f64) -> [f64; N] {
    let mut out = *x;
    for (o, d) in out.iter_mut().zip(k) {
        *o += h * d;
    }
    out
}
