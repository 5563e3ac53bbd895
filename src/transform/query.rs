use rayon::prelude::*;

use crate::foundation::core::Point;
use crate::transform::mesh_transform::MeshTransform;

/// Batches at least this large are mapped on the rayon pool.
pub const PARALLEL_MAP_THRESHOLD: usize = 4096;

// Barycentric slack so points on shared edges are not lost to rounding.
const EDGE_EPS: f64 = 1e-9;
// Smallest |sin| of the corner angle at `a` for a triangle to count as non-degenerate.
const MIN_CORNER_SINE: f64 = 1e-12;

impl MeshTransform {
    /// Map a source-image point through the deformation.
    ///
    /// The first triangle (in triangle order) whose source footprint contains `source` wins; its
    /// resolved corners are blended with the barycentric coordinates of `source`. Returns `None`
    /// when no triangle covers the point. Collinear source triangles never match, at any scale.
    pub fn map_point(&self, source: Point) -> Option<Point> {
        for (tri, bounds) in self.triangles.iter().zip(&self.triangle_source_bounds) {
            if source.x < bounds.x0 - EDGE_EPS
                || source.x > bounds.x1 + EDGE_EPS
                || source.y < bounds.y0 - EDGE_EPS
                || source.y > bounds.y1 + EDGE_EPS
            {
                continue;
            }
            let [a, b, c] = tri.indices.map(|i| &self.vertices[i as usize]);
            let Some([wa, wb, wc]) = barycentric(source, a.source, b.source, c.source) else {
                continue;
            };
            let p = a.position.to_vec2() * wa
                + b.position.to_vec2() * wb
                + c.position.to_vec2() * wc;
            return Some(p.to_point());
        }
        None
    }

    /// Map many points. Large batches run in parallel; the result is identical to calling
    /// [`MeshTransform::map_point`] for each point in order.
    pub fn map_points(&self, sources: &[Point]) -> Vec<Option<Point>> {
        if sources.len() >= PARALLEL_MAP_THRESHOLD {
            sources.par_iter().map(|&p| self.map_point(p)).collect()
        } else {
            sources.iter().map(|&p| self.map_point(p)).collect()
        }
    }
}

/// Barycentric weights of `p` in triangle `abc`, `None` when outside or degenerate.
fn barycentric(p: Point, a: Point, b: Point, c: Point) -> Option<[f64; 3]> {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;
    let den = v0.cross(v1);
    if den.abs() <= MIN_CORNER_SINE * v0.hypot() * v1.hypot() {
        return None;
    }
    let wb = v2.cross(v1) / den;
    let wc = v0.cross(v2) / den;
    let wa = 1.0 - wb - wc;
    if wa < -EDGE_EPS || wb < -EDGE_EPS || wc < -EDGE_EPS {
        return None;
    }
    Some([wa, wb, wc])
}

#[cfg(test)]
#[path = "../../tests/unit/transform/query.rs"]
mod tests;
