use crate::foundation::error::{MeshResult, MeshWarpError};
use crate::mesh::descriptor::{Face, MeshDescriptor, Vertex, VertexIndex};

/// Incremental authoring helper for [`MeshDescriptor`].
///
/// Vertices get their index at insertion time so faces can reference them right away. Nothing is
/// validated until [`MeshBuilder::finish`].
#[derive(Clone, Debug, Default)]
pub struct MeshBuilder {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
}

impl MeshBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty builder with preallocated storage.
    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
        }
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, vertex: Vertex) -> VertexIndex {
        let idx = self.vertices.len() as VertexIndex;
        self.vertices.push(vertex);
        idx
    }

    /// Append a face.
    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    /// Append a zero-weight quad over four existing vertices.
    pub fn add_quad(&mut self, i0: VertexIndex, i1: VertexIndex, i2: VertexIndex, i3: VertexIndex) {
        self.add_face(Face::quad([i0, i1, i2, i3]));
    }

    /// Append a row-major grid of vertices and connect neighbouring cells with quads
    /// `[r][c], [r][c+1], [r+1][c+1], [r+1][c]`.
    ///
    /// Returns the index grid. Rows must all have the same length.
    pub fn add_grid(&mut self, rows: &[Vec<Vertex>]) -> MeshResult<Vec<Vec<VertexIndex>>> {
        let Some(first) = rows.first() else {
            return Ok(Vec::new());
        };
        let cols = first.len();
        if let Some(r) = rows.iter().position(|row| row.len() != cols) {
            return Err(MeshWarpError::invalid_mesh(format!(
                "grid row {r} has {} vertices, expected {cols}",
                rows[r].len()
            )));
        }

        let grid: Vec<Vec<VertexIndex>> = rows
            .iter()
            .map(|row| row.iter().map(|&v| self.add_vertex(v)).collect())
            .collect();

        for r in 0..grid.len().saturating_sub(1) {
            for c in 0..cols.saturating_sub(1) {
                self.add_quad(grid[r][c], grid[r][c + 1], grid[r + 1][c + 1], grid[r + 1][c]);
            }
        }
        Ok(grid)
    }

    /// Vertex by index, if already added.
    pub fn vertex(&self, idx: VertexIndex) -> Option<&Vertex> {
        self.vertices.get(idx as usize)
    }

    /// Number of vertices added so far.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces added so far.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Validate and freeze the mesh.
    pub fn finish(self) -> MeshResult<MeshDescriptor> {
        MeshDescriptor::new(self.vertices, self.faces)
    }
}

impl From<MeshDescriptor> for MeshBuilder {
    fn from(desc: MeshDescriptor) -> Self {
        let (vertices, faces) = desc.into_parts();
        Self { vertices, faces }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mesh/builder.rs"]
mod tests;
