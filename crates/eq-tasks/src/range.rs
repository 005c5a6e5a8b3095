//! Range tabulator (§4.2).

/// Produce `start, start+step, start+2*step, ...`, inclusive of the first
/// point `>= stop` so `stop` itself is always present even when it is not
/// an exact multiple of `step` past `start`.
///
/// Callers are responsible for clamping `start`/`stop` to a physically
/// valid interval before calling this; `start <= stop` and `step > 0` are
/// required.
pub fn tabulate(start: f64, stop: f64, step: f64) -> Vec<f64> {
    debug_assert!(start <= stop);
    debug_assert!(step > 0.0);

    if step >= stop - start {
        return vec![start];
    }

    let mut points = Vec::new();
    let mut v = start;
    loop {
        points.push(v);
        if v >= stop {
            break;
        }
        v += step;
    }
    points
}
