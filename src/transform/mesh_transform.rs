use crate::foundation::core::{BezPath, Point, Rect, bounds_of};
use crate::foundation::math::Fnv1a64;
use crate::mesh::descriptor::normalize_weights;
use crate::transform::builder::MeshTransformOpts;
use crate::transform::policy::DepthNormalization;

/// A vertex after depth normalization.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResolvedVertex {
    /// Undeformed source-image position.
    pub source: Point,
    /// Effective 2D target position after the depth policy.
    pub position: Point,
    /// Raw target depth, kept for draw order and shading hints.
    pub depth: f64,
}

/// One renderer triangle, tagged with the authored face it was cut from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Triangle {
    /// Indices into [`MeshTransform::vertices`].
    pub indices: [u32; 3],
    /// Index of the parent face in the source descriptor.
    pub face: u32,
}

/// Flat vertex layout for GPU upload, one entry per triangle corner.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GpuVertex {
    /// Resolved target position.
    pub position: [f32; 2],
    /// Source-image position (texture coordinate space).
    pub source: [f32; 2],
    /// Raw target depth.
    pub depth: f32,
}

/// Immutable, renderer-ready deformation built from a
/// [`MeshDescriptor`](crate::MeshDescriptor).
///
/// Holds the triangulated mesh with every vertex resolved exactly once under a single
/// [`DepthNormalization`]. It is never mutated after construction, so it can be shared across
/// threads behind an `Arc` without locking. Editing a mesh means building a new transform.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshTransform {
    pub(crate) vertices: Vec<ResolvedVertex>,
    pub(crate) triangles: Vec<Triangle>,
    pub(crate) face_weights: Vec<[f32; 4]>,
    pub(crate) face_corners: Vec<[u32; 4]>,
    pub(crate) triangle_source_bounds: Vec<Rect>,
    pub(crate) policy: DepthNormalization,
    pub(crate) opts: MeshTransformOpts,
    pub(crate) fingerprint: u64,
}

impl MeshTransform {
    pub(crate) fn from_parts(
        vertices: Vec<ResolvedVertex>,
        triangles: Vec<Triangle>,
        face_weights: Vec<[f32; 4]>,
        face_corners: Vec<[u32; 4]>,
        policy: DepthNormalization,
        opts: MeshTransformOpts,
    ) -> Self {
        let triangle_source_bounds = triangles
            .iter()
            .map(|t| {
                bounds_of(t.indices.iter().map(|&i| vertices[i as usize].source))
                    .unwrap_or(Rect::ZERO)
            })
            .collect();
        let mut out = Self {
            vertices,
            triangles,
            face_weights,
            face_corners,
            triangle_source_bounds,
            policy,
            opts,
            fingerprint: 0,
        };
        out.fingerprint = out.compute_fingerprint();
        out
    }

    fn compute_fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_bytes(self.policy.name().as_bytes());
        h.write_f64(self.policy.strength());
        h.write_f64(self.opts.projection_center.x);
        h.write_f64(self.opts.projection_center.y);
        h.write_u32(self.opts.subdivision_steps);

        h.write_u64(self.vertices.len() as u64);
        for v in &self.vertices {
            h.write_f64(v.source.x);
            h.write_f64(v.source.y);
            h.write_f64(v.position.x);
            h.write_f64(v.position.y);
            h.write_f64(v.depth);
        }
        h.write_u64(self.triangles.len() as u64);
        for t in &self.triangles {
            for i in t.indices {
                h.write_u32(i);
            }
            h.write_u32(t.face);
        }
        h.write_u64(self.face_weights.len() as u64);
        for (w, c) in self.face_weights.iter().zip(&self.face_corners) {
            for x in w {
                h.write_f32(*x);
            }
            for i in c {
                h.write_u32(*i);
            }
        }
        h.finish()
    }

    /// Resolved vertices. Authored vertices come first, in descriptor order, followed by any
    /// vertices introduced by subdivision.
    pub fn vertices(&self) -> &[ResolvedVertex] {
        &self.vertices
    }

    /// Number of resolved vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Triangle list.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Number of authored faces.
    pub fn face_count(&self) -> usize {
        self.face_weights.len()
    }

    /// Parent face of a triangle.
    pub fn triangle_face(&self, triangle: usize) -> Option<usize> {
        self.triangles.get(triangle).map(|t| t.face as usize)
    }

    /// The authored blend weights of a face, unchanged.
    pub fn face_weights(&self, face: usize) -> Option<[f32; 4]> {
        self.face_weights.get(face).copied()
    }

    /// Normalized weight of one face corner, for seam blending between adjacent faces.
    /// All-zero weights yield `0.25` per corner.
    pub fn seam_weight(&self, face: usize, corner: usize) -> Option<f32> {
        let w = self.face_weights.get(face)?;
        normalize_weights(*w).get(corner).copied()
    }

    /// Policy the positions were resolved with.
    pub fn policy(&self) -> DepthNormalization {
        self.policy
    }

    /// Options the transform was built with.
    pub fn opts(&self) -> &MeshTransformOpts {
        &self.opts
    }

    /// Stable hash of the resolved topology and positions. Two builds from the same input have
    /// the same fingerprint.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Bounding rectangle of the resolved target positions.
    pub fn bounds(&self) -> Rect {
        bounds_of(self.vertices.iter().map(|v| v.position)).unwrap_or(Rect::ZERO)
    }

    /// Resolved corner positions of each triangle, in triangle order.
    pub fn triangle_positions(&self) -> impl ExactSizeIterator<Item = [Point; 3]> + '_ {
        self.triangles
            .iter()
            .map(|t| t.indices.map(|i| self.vertices[i as usize].position))
    }

    /// Flat per-corner vertex buffer in triangle order (`3 * triangle_count()` entries).
    pub fn gpu_vertices(&self) -> Vec<GpuVertex> {
        let mut out = Vec::with_capacity(self.triangles.len() * 3);
        for t in &self.triangles {
            for i in t.indices {
                let v = &self.vertices[i as usize];
                out.push(GpuVertex {
                    position: [v.position.x as f32, v.position.y as f32],
                    source: [v.source.x as f32, v.source.y as f32],
                    depth: v.depth as f32,
                });
            }
        }
        out
    }

    /// Outline of every authored face through its resolved corners.
    pub fn wireframe(&self) -> BezPath {
        let mut path = BezPath::new();
        for corners in &self.face_corners {
            let p = corners.map(|i| self.vertices[i as usize].position);
            path.move_to(p[0]);
            path.line_to(p[1]);
            path.line_to(p[2]);
            path.line_to(p[3]);
            path.close_path();
        }
        path
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/mesh_transform.rs"]
mod tests;
