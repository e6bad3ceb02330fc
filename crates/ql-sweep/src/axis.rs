//! Sweep axis values and nearest-point lookup.

/// `n` evenly spaced values from `start` to `end` inclusive. The last value
/// is exactly `end`.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let delta = (end - start) / (n - 1) as f64;
            let mut points: Vec<f64> = (0..n).map(|i| start + i as f64 * delta).collect();
            points[n - 1] = end;
            points
        }
    }
}

/// Index of the value closest to `target`; the first one wins on ties.
pub fn nearest_index(values: &[f64], target: f64) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, v)| {
            let d = (v - target).abs();
            match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((i, d)),
            }
        })
        .map(|(i, _)| i)
}
