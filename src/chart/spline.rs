//! Catmull-Rom smoothing for line series.
//!
//! The interpolated curve passes through every input point, so smoothing never
//! moves a plotted month.

/// Interpolate `points` with a uniform Catmull-Rom spline.
///
/// Each segment between two input points is sampled `samples_per_segment`
/// times. Fewer than three points are returned unchanged.
pub fn smooth_series(points: &[(f64, f64)], samples_per_segment: usize) -> Vec<(f64, f64)> {
    let n = points.len();
    if n < 3 || samples_per_segment < 2 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity((n - 1) * samples_per_segment + 1);
    for i in 0..n - 1 {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(n - 1)];

        for s in 0..samples_per_segment {
            let t = s as f64 / samples_per_segment as f64;
            out.push((catmull_rom(p0.0, p1.0, p2.0, p3.0, t), catmull_rom(p0.1, p1.1, p2.1, p3.1, t)));
        }
    }
    out.push(points[n - 1]);
    out
}

fn catmull_rom(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_every_input_point() {
        let pts = vec![(0.0, 1.0), (1.0, 3.0), (2.0, 2.0), (3.0, 5.0)];
        let smooth = smooth_series(&pts, 8);
        assert_eq!(smooth.len(), 3 * 8 + 1);
        for (i, p) in pts.iter().enumerate() {
            let q = smooth[i * 8];
            assert!((q.0 - p.0).abs() < 1e-12 && (q.1 - p.1).abs() < 1e-12);
        }
    }

    #[test]
    fn short_series_unchanged() {
        let pts = vec![(0.0, 1.0), (1.0, 2.0)];
        assert_eq!(smooth_series(&pts, 8), pts);
    }

    #[test]
    fn collinear_points_stay_on_the_line() {
        let pts: Vec<(f64, f64)> = (0..5).map(|i| (i as f64, 2.0 * i as f64)).collect();
        for (x, y) in smooth_series(&pts, 4) {
            assert!((y - 2.0 * x).abs() < 1e-9);
        }
    }
}
