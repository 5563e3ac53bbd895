use crate::foundation::core::{Point, Point3D, bilerp_point, bilerp_point3};
use crate::foundation::error::{MeshResult, MeshWarpError};
use crate::mesh::descriptor::MeshDescriptor;
use crate::transform::mesh_transform::{MeshTransform, ResolvedVertex, Triangle};
use crate::transform::policy::{DepthNormalization, parse_policy};

/// Upper bound for [`MeshTransformOpts::subdivision_steps`].
pub const MAX_SUBDIVISION_STEPS: u32 = 16;

/// Quad split along the `0-2` diagonal, in face-local corner order.
const QUAD_TRIANGLES: [[usize; 3]; 2] = [[0, 1, 2], [0, 2, 3]];

/// Build options for [`MeshTransformBuilder`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MeshTransformOpts {
    /// Point that depth scaling and the perspective divide converge toward.
    pub projection_center: Point,
    /// Extra uniform cuts per face edge. `0` keeps the authored quads (two triangles per face);
    /// `n` splits each face into `(n + 1)^2` bilinear sub-quads.
    pub subdivision_steps: u32,
}

impl Default for MeshTransformOpts {
    fn default() -> Self {
        Self {
            projection_center: Point::ORIGIN,
            subdivision_steps: 0,
        }
    }
}

impl MeshTransformOpts {
    /// Check option ranges.
    pub fn validate(&self) -> MeshResult<()> {
        if !self.projection_center.is_finite() {
            return Err(MeshWarpError::validation("projection center must be finite"));
        }
        if self.subdivision_steps > MAX_SUBDIVISION_STEPS {
            return Err(MeshWarpError::validation(format!(
                "subdivision_steps must be <= {MAX_SUBDIVISION_STEPS}, got {}",
                self.subdivision_steps
            )));
        }
        Ok(())
    }
}

/// Turns a [`MeshDescriptor`] into a [`MeshTransform`] under one depth policy.
///
/// Building is a pure function of the descriptor, the policy and the options: the same input
/// yields bit-identical output.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshTransformBuilder {
    policy: DepthNormalization,
    opts: MeshTransformOpts,
}

impl MeshTransformBuilder {
    /// Builder with default options.
    pub fn new(policy: DepthNormalization) -> Self {
        Self {
            policy,
            opts: MeshTransformOpts::default(),
        }
    }

    /// Builder for a legacy policy name, see [`parse_policy`].
    pub fn named(policy: &str) -> MeshResult<Self> {
        Ok(Self::new(parse_policy(policy)?))
    }

    /// Replace the build options.
    pub fn opts(mut self, opts: MeshTransformOpts) -> Self {
        self.opts = opts;
        self
    }

    /// Set the projection center.
    pub fn projection_center(mut self, center: Point) -> Self {
        self.opts.projection_center = center;
        self
    }

    /// Set the subdivision step count.
    pub fn subdivision_steps(mut self, steps: u32) -> Self {
        self.opts.subdivision_steps = steps;
        self
    }

    /// Policy this builder applies.
    pub fn policy(&self) -> DepthNormalization {
        self.policy
    }

    /// Build the transform.
    ///
    /// Every error is reported here; the returned transform cannot fail afterwards.
    #[tracing::instrument(
        skip(self, desc),
        fields(policy = %self.policy, faces = desc.face_count())
    )]
    pub fn build(&self, desc: &MeshDescriptor) -> MeshResult<MeshTransform> {
        self.policy.validate()?;
        self.opts.validate()?;

        let steps = self.opts.subdivision_steps as usize;
        let cells_per_face = (steps + 1) * (steps + 1);

        // Raw vertices first: authored ones, then the interior/edge points subdivision adds.
        let mut raw: Vec<(Point, Point3D)> =
            desc.vertices().iter().map(|v| (v.from, v.to)).collect();
        let mut triangles = Vec::with_capacity(desc.face_count() * cells_per_face * 2);
        let mut face_weights = Vec::with_capacity(desc.face_count());
        let mut face_corners = Vec::with_capacity(desc.face_count());

        for (face_idx, face) in desc.faces().iter().enumerate() {
            let face_id = u32::try_from(face_idx)
                .map_err(|_| MeshWarpError::invalid_mesh("face count exceeds u32 range"))?;
            face_weights.push(face.weights);
            face_corners.push(face.indices);

            if steps == 0 {
                push_quad_triangles(&mut triangles, face.indices, face_id);
                continue;
            }

            let grid = subdivide_face(&mut raw, face.indices, steps)?;
            for r in 0..=steps {
                for c in 0..=steps {
                    let quad = [grid[r][c], grid[r][c + 1], grid[r + 1][c + 1], grid[r + 1][c]];
                    push_quad_triangles(&mut triangles, quad, face_id);
                }
            }
        }

        let center = self.opts.projection_center;
        let vertices = raw
            .iter()
            .enumerate()
            .map(|(i, &(from, to))| {
                Ok(ResolvedVertex {
                    source: from,
                    position: self.policy.resolve(i, to, center)?,
                    depth: to.z,
                })
            })
            .collect::<MeshResult<Vec<_>>>()?;

        let out = MeshTransform::from_parts(
            vertices,
            triangles,
            face_weights,
            face_corners,
            self.policy,
            self.opts,
        );
        tracing::debug!(
            vertices = out.vertex_count(),
            triangles = out.triangle_count(),
            fingerprint = out.fingerprint(),
            "mesh transform built"
        );
        Ok(out)
    }
}

impl MeshTransform {
    /// Build with default options. Shorthand for [`MeshTransformBuilder::build`].
    pub fn build(desc: &MeshDescriptor, policy: DepthNormalization) -> MeshResult<Self> {
        MeshTransformBuilder::new(policy).build(desc)
    }

    /// Build from a legacy policy name (`none`, `linear`, `perspective`).
    pub fn build_named(desc: &MeshDescriptor, policy: &str) -> MeshResult<Self> {
        MeshTransformBuilder::named(policy)?.build(desc)
    }
}

fn push_quad_triangles(out: &mut Vec<Triangle>, quad: [u32; 4], face: u32) {
    for tri in QUAD_TRIANGLES {
        out.push(Triangle {
            indices: tri.map(|k| quad[k]),
            face,
        });
    }
}

/// Append the bilinear sample points of one face and return the `(steps + 2)^2` index grid.
/// Grid corners reuse the authored corner indices.
fn subdivide_face(
    raw: &mut Vec<(Point, Point3D)>,
    corners: [u32; 4],
    steps: usize,
) -> MeshResult<Vec<Vec<u32>>> {
    let from = corners.map(|i| raw[i as usize].0);
    let to = corners.map(|i| raw[i as usize].1);
    let n = steps + 1;
    let mut grid = vec![vec![0u32; n + 1]; n + 1];

    for (r, row) in grid.iter_mut().enumerate() {
        for (c, slot) in row.iter_mut().enumerate() {
            *slot = match (r, c) {
                (0, 0) => corners[0],
                (0, cc) if cc == n => corners[1],
                (rr, cc) if rr == n && cc == n => corners[2],
                (rr, 0) if rr == n => corners[3],
                _ => {
                    let u = c as f64 / n as f64;
                    let v = r as f64 / n as f64;
                    let idx = u32::try_from(raw.len()).map_err(|_| {
                        MeshWarpError::invalid_mesh("subdivided vertex count exceeds u32 range")
                    })?;
                    raw.push((bilerp_point(from, u, v), bilerp_point3(to, u, v)));
                    idx
                }
            };
        }
    }
    Ok(grid)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/builder.rs"]
mod tests;
