/// Eased values at or above this are treated as fully displaced.
const SNAP_TO_ONE: f64 = 0.997;

/// Cubic-bezier easing curve applied to the magnitude of a sampled displacement.
///
/// Control points follow the CSS `cubic-bezier(x1, y1, x2, y2)` convention: the curve runs from
/// `(0, 0)` to `(1, 1)` and `x1`, `x2` must lie in `[0, 1]` for `x` to be monotonic.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DisplacementBezier {
    /// First control point, x.
    pub x1: f64,
    /// First control point, y.
    pub y1: f64,
    /// Second control point, x.
    pub x2: f64,
    /// Second control point, y.
    pub y2: f64,
}

impl Default for DisplacementBezier {
    fn default() -> Self {
        Self::new(
            0.816137566137566,
            0.20502645502645533,
            0.5806878306878306,
            0.873015873015873,
        )
    }
}

impl DisplacementBezier {
    /// Create a curve from its two inner control points.
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Evaluate the curve at `x`, clamped to `[0, 1]`.
    pub fn ease(&self, x: f64) -> f64 {
        if x <= 0.0 || x.is_nan() {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        let t = self.solve_t(x);
        let y = sample_curve(self.y1, self.y2, t);
        if y >= SNAP_TO_ONE { 1.0 } else { y }
    }

    /// `true` when both x control points lie in `[0, 1]` and every coordinate is finite.
    pub fn is_valid(&self) -> bool {
        [self.x1, self.y1, self.x2, self.y2]
            .iter()
            .all(|v| v.is_finite())
            && (0.0..=1.0).contains(&self.x1)
            && (0.0..=1.0).contains(&self.x2)
    }

    // Newton-Raphson on x(t) = x, bisection when the slope flattens out.
    fn solve_t(&self, x: f64) -> f64 {
        let mut t = x;
        for _ in 0..8 {
            let err = sample_curve(self.x1, self.x2, t) - x;
            if err.abs() < 1e-9 {
                return t;
            }
            let d = sample_curve_derivative(self.x1, self.x2, t);
            if d.abs() < 1e-7 {
                break;
            }
            t = (t - err / d).clamp(0.0, 1.0);
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        for _ in 0..40 {
            let x_t = sample_curve(self.x1, self.x2, t);
            if (x_t - x).abs() < 1e-9 {
                break;
            }
            if x_t < x {
                lo = t;
            } else {
                hi = t;
            }
            t = 0.5 * (lo + hi);
        }
        t
    }
}

fn sample_curve(a1: f64, a2: f64, t: f64) -> f64 {
    let omt = 1.0 - t;
    3.0 * omt * omt * t * a1 + 3.0 * omt * t * t * a2 + t * t * t
}

fn sample_curve_derivative(a1: f64, a2: f64, t: f64) -> f64 {
    let omt = 1.0 - t;
    3.0 * omt * omt * a1 + 6.0 * omt * t * (a2 - a1) + 3.0 * t * t * (1.0 - a2)
}

#[cfg(test)]
#[path = "../../tests/unit/glass/bezier.rs"]
mod tests;
