use super::*;
use crate::mesh::descriptor::{Face, Vertex};

fn unit_square(z: f64) -> MeshDescriptor {
    let verts = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
        .into_iter()
        .map(|(x, y)| Vertex::new(Point::new(x, y), Point3D::new(x, y, z)))
        .collect();
    MeshDescriptor::new(verts, vec![Face::uniform([0, 1, 2, 3])]).unwrap()
}

fn two_quads() -> MeshDescriptor {
    let verts = (0..2)
        .flat_map(|r| (0..3).map(move |c| (c as f64, r as f64)))
        .map(|(x, y)| Vertex::new(Point::new(x, y), Point3D::new(x * 2.0, y * 2.0, x)))
        .collect();
    MeshDescriptor::new(
        verts,
        vec![
            Face::new([0, 1, 4, 3], [1.0, 2.0, 3.0, 4.0]),
            Face::quad([1, 2, 5, 4]),
        ],
    )
    .unwrap()
}

#[test]
fn identity_square_triangulates_along_first_diagonal() {
    let t = MeshTransform::build(&unit_square(0.0), DepthNormalization::None).unwrap();
    assert_eq!(t.triangle_count(), 2);
    assert_eq!(t.triangles()[0].indices, [0, 1, 2]);
    assert_eq!(t.triangles()[1].indices, [0, 2, 3]);
    for v in t.vertices() {
        assert_eq!(v.position, v.source);
    }
    assert_eq!(t.face_weights(0), Some([1.0; 4]));
}

#[test]
fn triangle_count_is_twice_face_count() {
    let t = MeshTransform::build(&two_quads(), DepthNormalization::linear()).unwrap();
    assert_eq!(t.face_count(), 2);
    assert_eq!(t.triangle_count(), 4);
    assert_eq!(t.triangle_face(2), Some(1));
    assert_eq!(t.triangles()[2].indices, [1, 2, 5]);
    assert_eq!(t.face_weights(0), Some([1.0, 2.0, 3.0, 4.0]));
    assert_eq!(t.face_weights(1), Some([0.0; 4]));
}

#[test]
fn perspective_uses_projection_center() {
    let t = MeshTransformBuilder::new(DepthNormalization::Perspective { strength: 1.0 })
        .projection_center(Point::new(1.0, 1.0))
        .build(&unit_square(1.0))
        .unwrap();
    assert_eq!(t.vertices()[0].position, Point::new(0.5, 0.5));
    assert_eq!(t.vertices()[2].position, Point::new(1.0, 1.0));
    assert_eq!(t.vertices()[0].depth, 1.0);
}

#[test]
fn named_policies_build_or_fail_with_unsupported() {
    let desc = unit_square(0.5);
    let a = MeshTransform::build_named(&desc, "perspective").unwrap();
    let b = MeshTransform::build(&desc, DepthNormalization::perspective()).unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());

    let err = MeshTransform::build_named(&desc, "orthographic").unwrap_err();
    assert!(err.is_unsupported_policy());
}

#[test]
fn invalid_strength_fails_at_build() {
    let err = MeshTransform::build(
        &unit_square(0.0),
        DepthNormalization::Perspective { strength: -1.0 },
    )
    .unwrap_err();
    assert!(err.is_unsupported_policy());
}

#[test]
fn unresolvable_vertex_fails_at_build() {
    let err = MeshTransform::build(
        &unit_square(-2.0),
        DepthNormalization::Perspective { strength: 1.0 },
    )
    .unwrap_err();
    assert!(err.is_invalid_mesh());
}

#[test]
fn repeated_builds_are_bit_identical() {
    let desc = two_quads();
    let builder = MeshTransformBuilder::new(DepthNormalization::Perspective { strength: 0.25 });
    let a = builder.build(&desc).unwrap();
    let b = builder.build(&desc).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.fingerprint(), b.fingerprint());

    let other = MeshTransform::build(&desc, DepthNormalization::None).unwrap();
    assert_ne!(a.fingerprint(), other.fingerprint());
}

#[test]
fn subdivision_multiplies_triangles_and_keeps_corners() {
    let desc = two_quads();
    let t = MeshTransformBuilder::new(DepthNormalization::None)
        .subdivision_steps(2)
        .build(&desc)
        .unwrap();
    assert_eq!(t.triangle_count(), 2 * 9 * 2);
    // 6 authored + 12 new per face (16 grid points minus 4 corners)
    assert_eq!(t.vertex_count(), 6 + 2 * 12);
    for (i, v) in desc.vertices().iter().enumerate() {
        assert_eq!(t.vertices()[i].source, v.from);
        assert_eq!(t.vertices()[i].position, v.to.xy());
    }
    assert!(t.triangles()[..18].iter().all(|tri| tri.face == 0));
    assert!(t.triangles()[18..].iter().all(|tri| tri.face == 1));

    // first interior sample of face 0 sits a third of the way along each axis
    let first_new = t.vertices()[6];
    assert!((first_new.source.x - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(first_new.source.y, 0.0);
}

#[test]
fn subdivision_limit_is_validated() {
    let err = MeshTransformBuilder::new(DepthNormalization::None)
        .subdivision_steps(MAX_SUBDIVISION_STEPS + 1)
        .build(&unit_square(0.0))
        .unwrap_err();
    assert!(matches!(err, MeshWarpError::Validation(_)));
}

#[test]
fn degenerate_quads_are_triangulated_as_authored() {
    let verts = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]
        .into_iter()
        .map(|(x, y)| Vertex::identity(Point::new(x, y)))
        .collect();
    let desc = MeshDescriptor::new(verts, vec![Face::quad([0, 1, 2, 2])]).unwrap();
    let t = MeshTransform::build(&desc, DepthNormalization::None).unwrap();
    assert_eq!(t.triangles()[0].indices, [0, 1, 2]);
    assert_eq!(t.triangles()[1].indices, [0, 2, 2]);
}
