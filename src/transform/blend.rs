use crate::foundation::error::{MeshResult, MeshWarpError};
use crate::transform::mesh_transform::{MeshTransform, ResolvedVertex};

/// Easing curves for transitions between two transforms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Linear interpolation.
    #[default]
    Linear,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in/out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in/out.
    InOutCubic,
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }
}

/// Blend two transforms that share a topology, for animating a mesh change.
///
/// `t` is clamped to `[0, 1]` and shaped by `ease`. Positions, sources and depths are lerped per
/// vertex, as are the authored face weights. The result carries the
/// policy and options of `to` once the eased progress reaches one, of `from` otherwise.
///
/// Fails with [`MeshWarpError::InvalidMesh`] when vertex counts, face counts or triangle lists
/// differ.
pub fn interpolate(
    from: &MeshTransform,
    to: &MeshTransform,
    t: f64,
    ease: Ease,
) -> MeshResult<MeshTransform> {
    if from.vertex_count() != to.vertex_count() {
        return Err(MeshWarpError::invalid_mesh(format!(
            "cannot blend transforms with {} and {} vertices",
            from.vertex_count(),
            to.vertex_count()
        )));
    }
    if from.face_count() != to.face_count() || from.face_corners != to.face_corners {
        return Err(MeshWarpError::invalid_mesh(
            "cannot blend transforms with different faces",
        ));
    }
    if from.triangles != to.triangles {
        return Err(MeshWarpError::invalid_mesh(
            "cannot blend transforms with different triangle lists",
        ));
    }

    let k = ease.apply(t);
    let vertices: Vec<ResolvedVertex> = from
        .vertices
        .iter()
        .zip(&to.vertices)
        .map(|(a, b)| ResolvedVertex {
            source: a.source.lerp(b.source, k),
            position: a.position.lerp(b.position, k),
            depth: a.depth + (b.depth - a.depth) * k,
        })
        .collect();

    let kf = k as f32;
    let face_weights: Vec<[f32; 4]> = from
        .face_weights
        .iter()
        .zip(&to.face_weights)
        .map(|(a, b)| {
            if k >= 1.0 {
                *b
            } else {
                std::array::from_fn(|i| a[i] + (b[i] - a[i]) * kf)
            }
        })
        .collect();

    let (policy, opts) = if k >= 1.0 {
        (to.policy, to.opts)
    } else {
        (from.policy, from.opts)
    };

    Ok(MeshTransform::from_parts(
        vertices,
        from.triangles.clone(),
        face_weights,
        from.face_corners.clone(),
        policy,
        opts,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/transform/blend.rs"]
mod tests;
