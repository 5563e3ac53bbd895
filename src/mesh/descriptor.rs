use serde::{Deserialize, Serialize};

use crate::foundation::core::{Point, Point3D, Rect, bounds_of};
use crate::foundation::error::{MeshResult, MeshWarpError};

/// Index of a vertex inside its descriptor's vertex sequence.
pub type VertexIndex = u32;

/// One mesh control point: where it sits in the undeformed source image (`from`) and where it
/// lands in target space (`to`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Position in the undeformed source image.
    pub from: Point,
    /// Position in deformed target space, `z` is depth.
    pub to: Point3D,
}

impl Vertex {
    /// Create a vertex from its source and target positions.
    pub fn new(from: Point, to: Point3D) -> Self {
        Self { from, to }
    }

    /// A vertex that maps a source point onto itself at depth zero.
    pub fn identity(p: Point) -> Self {
        Self::new(p, Point3D::from_point(p))
    }

    fn is_finite(&self) -> bool {
        self.from.is_finite() && self.to.is_finite()
    }
}

/// A quadrilateral patch naming four vertices (in winding order) and a blend weight per corner.
///
/// Weights are opaque blend coefficients for the renderer. They are not required to sum to one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Face {
    /// Corner vertex indices, in face-local order `0..4`.
    pub indices: [VertexIndex; 4],
    /// Per-corner blend weights, same order as `indices`.
    pub weights: [f32; 4],
}

impl Face {
    /// Create a face from indices and weights.
    pub fn new(indices: [VertexIndex; 4], weights: [f32; 4]) -> Self {
        Self { indices, weights }
    }

    /// A face with all weights set to zero.
    pub fn quad(indices: [VertexIndex; 4]) -> Self {
        Self::new(indices, [0.0; 4])
    }

    /// A face with all weights set to one.
    pub fn uniform(indices: [VertexIndex; 4]) -> Self {
        Self::new(indices, [1.0; 4])
    }

    /// Weights scaled to sum to one. A face whose weights are all zero gets equal influence per
    /// corner.
    pub fn normalized_weights(&self) -> [f32; 4] {
        normalize_weights(self.weights)
    }

    fn validate(&self, face_idx: usize, vertex_count: usize) -> MeshResult<()> {
        for (slot, &idx) in self.indices.iter().enumerate() {
            if idx as usize >= vertex_count {
                return Err(MeshWarpError::invalid_mesh(format!(
                    "face {face_idx} corner {slot} references vertex {idx}, \
                     but the mesh has {vertex_count} vertices"
                )));
            }
        }
        for (slot, &w) in self.weights.iter().enumerate() {
            if !w.is_finite() {
                return Err(MeshWarpError::invalid_mesh(format!(
                    "face {face_idx} weight {slot} is not finite"
                )));
            }
            if w < 0.0 {
                return Err(MeshWarpError::invalid_mesh(format!(
                    "face {face_idx} weight {slot} is negative ({w})"
                )));
            }
        }
        Ok(())
    }
}

pub(crate) fn normalize_weights(w: [f32; 4]) -> [f32; 4] {
    let sum: f32 = w.iter().sum();
    if sum > 0.0 && sum.is_finite() {
        return w.map(|x| x / sum);
    }
    // Finite weights can still overflow when summed; rescale by the largest first.
    let max = w.iter().copied().fold(0.0, f32::max);
    if max > 0.0 {
        let scaled = w.map(|x| x / max);
        let sum: f32 = scaled.iter().sum();
        scaled.map(|x| x / sum)
    } else {
        [0.25; 4]
    }
}

/// An immutable, validated deformation mesh: vertices plus quad faces referencing them by index.
///
/// There is no way to obtain a `MeshDescriptor` that violates its invariants; deserialization runs
/// the same checks as [`MeshDescriptor::new`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MeshDescriptorRepr", into = "MeshDescriptorRepr")]
pub struct MeshDescriptor {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
}

impl MeshDescriptor {
    /// Validate and freeze a mesh.
    ///
    /// Fails with [`MeshWarpError::InvalidMesh`] when there are no vertices or no faces, when a
    /// face index is out of range, when a weight is negative or non-finite, or when a vertex
    /// coordinate is non-finite.
    pub fn new(vertices: Vec<Vertex>, faces: Vec<Face>) -> MeshResult<Self> {
        if vertices.is_empty() {
            return Err(MeshWarpError::invalid_mesh("mesh has no vertices"));
        }
        if faces.is_empty() {
            return Err(MeshWarpError::invalid_mesh("mesh has no faces"));
        }
        if u32::try_from(vertices.len()).is_err() {
            return Err(MeshWarpError::invalid_mesh(format!(
                "mesh has {} vertices, more than a u32 index can address",
                vertices.len()
            )));
        }
        if let Some(i) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(MeshWarpError::invalid_mesh(format!(
                "vertex {i} has a non-finite coordinate"
            )));
        }
        for (i, face) in faces.iter().enumerate() {
            face.validate(i, vertices.len())?;
        }

        tracing::debug!(
            vertices = vertices.len(),
            faces = faces.len(),
            "mesh descriptor validated"
        );
        Ok(Self { vertices, faces })
    }

    /// Vertices in index order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Faces in authoring order.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Number of vertices, always `> 0`.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces, always `> 0`.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Vertex by index.
    pub fn vertex(&self, idx: VertexIndex) -> Option<&Vertex> {
        self.vertices.get(idx as usize)
    }

    /// The four corner vertices of a face, in face-local order.
    pub fn face_vertices(&self, face: usize) -> Option<[Vertex; 4]> {
        let f = self.faces.get(face)?;
        // indices were validated on construction
        Some(f.indices.map(|i| self.vertices[i as usize]))
    }

    /// Bounding rectangle of all `from` positions.
    pub fn source_bounds(&self) -> Rect {
        bounds_of(self.vertices.iter().map(|v| v.from)).unwrap_or(Rect::ZERO)
    }

    /// Parse a descriptor from JSON. Structural problems are [`MeshWarpError::Serde`]; a
    /// well-formed document describing a malformed mesh is [`MeshWarpError::InvalidMesh`].
    pub fn from_json(json: &str) -> MeshResult<Self> {
        let repr: MeshDescriptorRepr =
            serde_json::from_str(json).map_err(|e| MeshWarpError::serde(e.to_string()))?;
        Self::try_from(repr)
    }

    /// Pretty-printed JSON form, readable by [`MeshDescriptor::from_json`].
    pub fn to_json_pretty(&self) -> MeshResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| MeshWarpError::serde(e.to_string()))
    }

    /// Give back the raw parts, e.g. to derive an edited mesh.
    pub fn into_parts(self) -> (Vec<Vertex>, Vec<Face>) {
        (self.vertices, self.faces)
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct MeshDescriptorRepr {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
}

impl TryFrom<MeshDescriptorRepr> for MeshDescriptor {
    type Error = MeshWarpError;

    fn try_from(repr: MeshDescriptorRepr) -> Result<Self, Self::Error> {
        Self::new(repr.vertices, repr.faces)
    }
}

impl From<MeshDescriptor> for MeshDescriptorRepr {
    fn from(desc: MeshDescriptor) -> Self {
        Self {
            vertices: desc.vertices,
            faces: desc.faces,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mesh/descriptor.rs"]
mod tests;
