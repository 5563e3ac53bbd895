use crate::foundation::core::{Point, Size, Vec2};

/// Signed distance from `p` to the outline of a `size` rectangle with rounded corners, anchored at
/// the origin. Negative inside, zero on the edge, positive outside.
pub fn rounded_rect_sdf(p: Point, size: Size, radius: f64) -> f64 {
    let q = corner_offset(p, size, radius);
    let outside = Vec2::new(q.x.max(0.0), q.y.max(0.0)).hypot();
    let inside = q.x.max(q.y).min(0.0);
    outside + inside - radius
}

/// Outward unit normal of the nearest outline point.
///
/// Radial around the arc centre in corner regions, axis-aligned along the straight edges. The
/// exact centre of the rectangle falls back to the horizontal edge normal.
pub fn rounded_rect_gradient(p: Point, size: Size, radius: f64) -> Vec2 {
    let q = corner_offset(p, size, radius);
    let mut n = if q.x > 0.0 && q.y > 0.0 {
        let d = q.hypot();
        if d > 0.0 { q / d } else { Vec2::ZERO }
    } else if q.x > q.y {
        Vec2::new(1.0, 0.0)
    } else {
        Vec2::new(0.0, 1.0)
    };

    if p.x < size.width * 0.5 {
        n.x = -n.x;
    }
    if p.y < size.height * 0.5 {
        n.y = -n.y;
    }
    n
}

/// Corner radius limited to half the shorter side.
pub(crate) fn clamp_corner_radius(size: Size, radius: f64) -> f64 {
    radius.min(size.min_side() * 0.5).max(0.0)
}

fn corner_offset(p: Point, size: Size, radius: f64) -> Vec2 {
    let half = Vec2::new(size.width * 0.5, size.height * 0.5);
    let c = p.to_vec2() - half;
    Vec2::new(c.x.abs() - half.x + radius, c.y.abs() - half.y + radius)
}

#[cfg(test)]
#[path = "../../tests/unit/glass/sdf.rs"]
mod tests;
