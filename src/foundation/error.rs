/// Convenience result type used across meshwarp.
pub type MeshResult<T> = Result<T, MeshWarpError>;

/// Top-level error taxonomy used by mesh construction and transform building.
#[derive(thiserror::Error, Debug)]
pub enum MeshWarpError {
    /// Malformed mesh data: empty collections, out-of-range indices, bad weights, or a vertex the
    /// depth policy cannot resolve.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    /// Unrecognized depth-normalization mode or an invalid policy strength.
    #[error("unsupported depth normalization: {0}")]
    UnsupportedPolicy(String),

    /// Invalid generator or tooling parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MeshWarpError {
    /// Build a [`MeshWarpError::InvalidMesh`] value.
    pub fn invalid_mesh(msg: impl Into<String>) -> Self {
        Self::InvalidMesh(msg.into())
    }

    /// Build a [`MeshWarpError::UnsupportedPolicy`] value.
    pub fn unsupported_policy(msg: impl Into<String>) -> Self {
        Self::UnsupportedPolicy(msg.into())
    }

    /// Build a [`MeshWarpError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MeshWarpError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for [`MeshWarpError::InvalidMesh`].
    pub fn is_invalid_mesh(&self) -> bool {
        matches!(self, Self::InvalidMesh(_))
    }

    /// `true` for [`MeshWarpError::UnsupportedPolicy`].
    pub fn is_unsupported_policy(&self) -> bool {
        matches!(self, Self::UnsupportedPolicy(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
