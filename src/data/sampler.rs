//! Sampling an [`Evaluator`] over a 1D range or a 2D grid.
//!
//! Missing data is handled differently by dimension. A line chart can skip
//! segments, so 1D sampling marks bad points as gaps. A triangulated surface
//! needs a value at every vertex, so 2D sampling takes an explicit
//! [`MissingValuePolicy`] chosen by the renderer.

use serde::{Deserialize, Serialize};

use super::expression::Evaluator;

/// What to store for a grid vertex whose evaluation failed or was non-finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MissingValuePolicy {
    /// Leave the vertex empty; wire lines break there.
    Gap,
    /// Substitute a neutral value so the mesh stays closed.
    Fill(f64),
}

impl MissingValuePolicy {
    fn resolve(self, value: Option<f64>) -> Option<f64> {
        match (value, self) {
            (Some(v), _) => Some(v),
            (None, MissingValuePolicy::Gap) => None,
            (None, MissingValuePolicy::Fill(fill)) => Some(fill),
        }
    }
}

/// One 1D sample: the input position and its value (`None` = gap).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: Option<f64>,
}

impl Sample {
    pub fn is_gap(&self) -> bool {
        self.y.is_none()
    }
}

/// Result of [`sample_1d`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineSamples {
    pub points: Vec<Sample>,
    /// Largest `|y|` among the non-gap samples (0 when there are none).
    pub max_magnitude: f64,
}

impl LineSamples {
    pub fn gap_count(&self) -> usize {
        self.points.iter().filter(|s| s.is_gap()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Parameters for [`sample_1d`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSampling {
    /// Number of evenly spaced positions over the domain.
    pub count: usize,
    /// Values with `|y|` above this become gaps.
    pub magnitude_clamp: f64,
    /// Insert a gap between neighbours that straddle a pole.
    pub split_discontinuities: bool,
}

impl Default for LineSampling {
    fn default() -> Self {
        Self {
            count: 200,
            magnitude_clamp: 1e6,
            split_discontinuities: true,
        }
    }
}

/// Evenly spaced samples over `[min, max]`.
///
/// A value is a gap if evaluation fails, is non-finite, or exceeds the
/// magnitude clamp. With `split_discontinuities`, two finite neighbours of
/// opposite sign whose midpoint value is non-finite or lies outside their
/// range get a gap sample inserted at the midpoint, so poles that fall
/// between sample positions still break the line.
///
/// A zero-width domain yields a single sample at `min`; `count == 0` or a
/// reversed/non-finite domain yields none.
pub fn sample_1d(f: &Evaluator, domain: (f64, f64), opts: &LineSampling) -> LineSamples {
    let (min, max) = domain;
    let mut out = LineSamples::default();
    if opts.count == 0 || !min.is_finite() || !max.is_finite() || max < min {
        return out;
    }
    let positions: Vec<f64> = if max == min || opts.count == 1 {
        vec![min]
    } else {
        let step = (max - min) / (opts.count - 1) as f64;
        (0..opts.count).map(|i| min + step * i as f64).collect()
    };

    let value_at = |x: f64| {
        f.eval_x(x)
            .ok()
            .filter(|v| v.is_finite() && v.abs() <= opts.magnitude_clamp)
    };

    out.points.reserve(positions.len());
    for x in positions {
        let y = value_at(x);
        if opts.split_discontinuities {
            if let (Some(prev), Some(cur)) = (out.points.last().copied(), y) {
                if let Some(prev_y) = prev.y {
                    if straddles_pole(prev_y, cur, || value_at((prev.x + x) / 2.0)) {
                        out.points.push(Sample {
                            x: (prev.x + x) / 2.0,
                            y: None,
                        });
                    }
                }
            }
        }
        if let Some(v) = y {
            out.max_magnitude = out.max_magnitude.max(v.abs());
        }
        out.points.push(Sample { x, y });
    }
    out
}

fn straddles_pole(a: f64, b: f64, midpoint: impl FnOnce() -> Option<f64>) -> bool {
    if a.signum() == b.signum() || a == 0.0 || b == 0.0 {
        return false;
    }
    match midpoint() {
        None => true,
        Some(m) => m < a.min(b) || m > a.max(b),
    }
}

/// Result of [`sample_2d`]: `(resolution + 1)²` vertices in row-major order
/// (rows follow y, columns follow x).
#[derive(Debug, Clone, PartialEq)]
pub struct GridSamples {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub values: Vec<Option<f64>>,
    pub policy: MissingValuePolicy,
}

impl GridSamples {
    pub fn columns(&self) -> usize {
        self.xs.len()
    }

    pub fn rows(&self) -> usize {
        self.ys.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.values.len()
    }

    /// Value at (row, col); `None` for gaps or out-of-range indices.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows() || col >= self.columns() {
            return None;
        }
        self.values[row * self.columns() + col]
    }

    /// Observed `(min, max)` over the present values.
    pub fn z_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .flatten()
            .fold(None, |acc, &z| match acc {
                None => Some((z, z)),
                Some((lo, hi)) => Some((lo.min(z), hi.max(z))),
            })
    }
}

fn axis(domain: (f64, f64), resolution: usize) -> Vec<f64> {
    let (min, max) = domain;
    if !min.is_finite() || !max.is_finite() || max < min {
        return Vec::new();
    }
    if resolution == 0 || max == min {
        return vec![min];
    }
    let step = (max - min) / resolution as f64;
    (0..=resolution).map(|i| min + step * i as f64).collect()
}

/// Evaluate `f(x, y)` at every vertex of a `resolution × resolution` cell grid.
pub fn sample_2d(
    f: &Evaluator,
    x_domain: (f64, f64),
    y_domain: (f64, f64),
    resolution: usize,
    policy: MissingValuePolicy,
) -> GridSamples {
    let xs = axis(x_domain, resolution);
    let ys = axis(y_domain, resolution);
    let mut values = Vec::with_capacity(xs.len() * ys.len());
    for &y in &ys {
        for &x in &xs {
            let z = f.eval_xy(x, y).ok().filter(|v| v.is_finite());
            values.push(policy.resolve(z));
        }
    }
    GridSamples {
        xs,
        ys,
        values,
        policy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::expression::compile;

    #[test]
    fn parabola_over_symmetric_domain() {
        let f = compile("x^2").unwrap();
        let s = sample_1d(&f, (-5.0, 5.0), &LineSampling::default());
        assert_eq!(s.points.len(), 200);
        assert_eq!(s.gap_count(), 0);
        assert_eq!(s.points[0].x, -5.0);
        assert!((s.points[199].x - 5.0).abs() < 1e-12);
        assert!((s.max_magnitude - 25.0).abs() < 1e-9);
        let min = s.points.iter().filter_map(|p| p.y).fold(f64::MAX, f64::min);
        assert!(min >= 0.0 && min < 0.01);
    }

    #[test]
    fn reciprocal_gaps_near_zero() {
        let f = compile("1/x").unwrap();
        // 201 points puts a sample exactly on x = 0
        let opts = LineSampling {
            count: 201,
            ..LineSampling::default()
        };
        let s = sample_1d(&f, (-1.0, 1.0), &opts);
        assert_eq!(s.gap_count(), 1);
        assert!(s.points[100].is_gap());
        assert_eq!(s.points[100].x, 0.0);
    }

    #[test]
    fn pole_between_samples_gets_a_gap() {
        let f = compile("1/x").unwrap();
        let s = sample_1d(&f, (-5.0, 5.0), &LineSampling::default());
        assert_eq!(s.points.len(), 201);
        assert_eq!(s.gap_count(), 1);
        let gap = s.points.iter().find(|p| p.is_gap()).unwrap();
        assert!(gap.x.abs() < 1e-9);
        assert!(s.points.windows(2).all(|w| w[0].x < w[1].x));
    }

    #[test]
    fn tangent_breaks_at_every_pole() {
        let f = compile("tan(x)").unwrap();
        let s = sample_1d(&f, (-5.0, 5.0), &LineSampling::default());
        assert_eq!(s.gap_count(), 4);
        let poles = [-1.5, -0.5, 0.5, 1.5].map(|k| k * std::f64::consts::PI);
        let segments = crate::data::view2d::polyline_segments(&s.points);
        assert_eq!(segments.len(), 5);
        for seg in &segments {
            for w in seg.windows(2) {
                assert!(
                    !poles.iter().any(|&p| w[0][0] < p && p < w[1][0]),
                    "segment crosses a pole between {:?} and {:?}",
                    w[0],
                    w[1]
                );
            }
        }
    }

    #[test]
    fn zero_crossing_is_not_a_pole() {
        let f = compile("x^3 - x").unwrap();
        let s = sample_1d(&f, (-3.0, 3.0), &LineSampling::default());
        assert_eq!(s.gap_count(), 0);
        assert_eq!(s.points.len(), 200);
    }

    #[test]
    fn magnitude_clamp_marks_gap() {
        let f = compile("1/x").unwrap();
        let opts = LineSampling {
            count: 3,
            ..LineSampling::default()
        };
        let s = sample_1d(&f, (-1e-7, 1e-7), &opts);
        assert!(s.points.iter().all(|p| p.is_gap()));
        assert_eq!(s.max_magnitude, 0.0);
    }

    #[test]
    fn zero_width_domain_yields_one_sample() {
        let f = compile("x + 1").unwrap();
        let s = sample_1d(&f, (2.0, 2.0), &LineSampling::default());
        assert_eq!(s.points, vec![Sample { x: 2.0, y: Some(3.0) }]);
    }

    #[test]
    fn zero_count_yields_nothing() {
        let f = compile("x").unwrap();
        let opts = LineSampling {
            count: 0,
            ..LineSampling::default()
        };
        assert!(sample_1d(&f, (0.0, 1.0), &opts).is_empty());
    }

    #[test]
    fn sampling_is_repeatable() {
        let f = compile("sin(3*x) / x").unwrap();
        let a = sample_1d(&f, (-4.0, 4.0), &LineSampling::default());
        let b = sample_1d(&f, (-4.0, 4.0), &LineSampling::default());
        assert_eq!(a, b);
    }

    #[test]
    fn grid_has_vertex_per_corner() {
        let f = compile("x^2*y").unwrap();
        let g = sample_2d(&f, (-2.0, 2.0), (-2.0, 2.0), 4, MissingValuePolicy::Fill(0.0));
        assert_eq!(g.vertex_count(), 25);
        assert!(g.values.iter().all(|v| v.map_or(false, f64::is_finite)));
        // row 0 is y = -2, col 4 is x = 2
        assert_eq!(g.get(0, 4), Some(-8.0));
        assert_eq!(g.z_range(), Some((-8.0, 8.0)));
    }

    #[test]
    fn grid_policy_decides_missing_values() {
        let f = compile("sqrt(x)").unwrap();
        let filled = sample_2d(&f, (-1.0, 1.0), (0.0, 1.0), 2, MissingValuePolicy::Fill(0.0));
        assert_eq!(filled.get(0, 0), Some(0.0));
        let gapped = sample_2d(&f, (-1.0, 1.0), (0.0, 1.0), 2, MissingValuePolicy::Gap);
        assert_eq!(gapped.get(0, 0), None);
        assert_eq!(gapped.get(0, 2), Some(1.0));
    }
}
