//! meshwarp turns authored deformation meshes into immutable, renderer-ready transforms.
//!
//! A mesh is a set of control vertices, each mapping a point of the undeformed source image to a
//! target position with depth, grouped into quad faces. The public API is build-oriented:
//!
//! - Author a [`MeshDescriptor`] directly or through a [`MeshBuilder`]
//! - Pick a [`DepthNormalization`] policy and build a [`MeshTransform`] with
//!   [`MeshTransformBuilder`]
//! - Share it across threads, swap it live through [`SharedMeshTransform`], or blend two
//!   transforms with [`interpolate`]
//!
//! The glass module generates rounded-rectangle refraction meshes from a [`DisplacementMap`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod glass;
pub(crate) mod mesh;
pub(crate) mod transform;

pub use crate::foundation::core::{BezPath, Point, Point3D, Rect, Size, Vec2};
pub use crate::foundation::error::{MeshResult, MeshWarpError};

pub use crate::glass::bezier::DisplacementBezier;
pub use crate::glass::displacement::{DisplacementMap, MAX_MAP_DIMENSION, NEUTRAL_CHANNEL};
pub use crate::glass::generate::{
    CORNER_ANCHOR_DEPTH, GlassMesh, GlassMeshParams, MAX_CORNER_RESOLUTION, generate_glass_mesh,
};
pub use crate::glass::sdf::{rounded_rect_gradient, rounded_rect_sdf};
pub use crate::mesh::builder::MeshBuilder;
pub use crate::mesh::descriptor::{Face, MeshDescriptor, Vertex, VertexIndex};
pub use crate::transform::blend::{Ease, interpolate};
pub use crate::transform::builder::{MAX_SUBDIVISION_STEPS, MeshTransformBuilder, MeshTransformOpts};
pub use crate::transform::mesh_transform::{GpuVertex, MeshTransform, ResolvedVertex, Triangle};
pub use crate::transform::policy::{
    DEFAULT_LINEAR_STRENGTH, DEFAULT_PERSPECTIVE_STRENGTH, DepthNormalization, REFERENCE_DEPTH,
    parse_policy,
};
pub use crate::transform::query::PARALLEL_MAP_THRESHOLD;
pub use crate::transform::shared::SharedMeshTransform;
