pub use kurbo::{BezPath, Point, Rect, Size, Vec2};

/// A target-space position. `z` is depth: it never moves the point by itself, the active
/// depth-normalization policy decides how it affects the resolved 2D position.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point3D {
    /// Horizontal target coordinate.
    pub x: f64,
    /// Vertical target coordinate.
    pub y: f64,
    /// Depth.
    pub z: f64,
}

impl Point3D {
    /// The origin at depth zero.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a point from its components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Lift a 2D point to depth zero.
    pub fn from_point(p: Point) -> Self {
        Self::new(p.x, p.y, 0.0)
    }

    /// Planar part of this point, depth dropped.
    pub fn xy(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// `true` when every component is finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Linear interpolation, `t` is not clamped.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.z + (other.z - self.z) * t,
        )
    }
}

/// Bilinear interpolation across a quad given in face order `p0, p1, p2, p3`
/// (`p0 -> p1` is the `u` direction, `p0 -> p3` the `v` direction).
pub(crate) fn bilerp_point(q: [Point; 4], u: f64, v: f64) -> Point {
    let top = q[0].lerp(q[1], u);
    let bottom = q[3].lerp(q[2], u);
    top.lerp(bottom, v)
}

pub(crate) fn bilerp_point3(q: [Point3D; 4], u: f64, v: f64) -> Point3D {
    let top = q[0].lerp(q[1], u);
    let bottom = q[3].lerp(q[2], u);
    top.lerp(bottom, v)
}

/// Smallest rectangle containing every point, `None` for an empty input.
pub(crate) fn bounds_of(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
    let mut it = points.into_iter();
    let first = it.next()?;
    let mut r = Rect::from_points(first, first);
    for p in it {
        r = r.union_pt(p);
    }
    Some(r)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
