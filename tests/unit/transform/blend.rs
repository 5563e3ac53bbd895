use super::*;
use crate::foundation::core::{Point, Point3D};
use crate::mesh::descriptor::{Face, MeshDescriptor, Vertex};
use crate::transform::builder::MeshTransformBuilder;
use crate::transform::policy::DepthNormalization;

fn square(offset: f64, weights: [f32; 4]) -> MeshDescriptor {
    let verts = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
        .into_iter()
        .map(|(x, y)| Vertex::new(Point::new(x, y), Point3D::new(x + offset, y, offset)))
        .collect();
    MeshDescriptor::new(verts, vec![Face::new([0, 1, 2, 3], weights)]).unwrap()
}

#[test]
fn ease_endpoints_and_clamping() {
    for e in [
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
    ] {
        assert_eq!(e.apply(0.0), 0.0, "{e:?}");
        assert_eq!(e.apply(1.0), 1.0, "{e:?}");
        assert_eq!(e.apply(-3.0), 0.0, "{e:?}");
        assert_eq!(e.apply(7.0), 1.0, "{e:?}");
    }
    assert!((Ease::InOutCubic.apply(0.5) - 0.5).abs() < 1e-12);
    assert!(Ease::InQuad.apply(0.5) < 0.5);
    assert!(Ease::OutQuad.apply(0.5) > 0.5);
}

#[test]
fn endpoints_reproduce_positions() {
    let a = MeshTransform::build(&square(0.0, [1.0; 4]), DepthNormalization::None).unwrap();
    let b = MeshTransform::build(&square(2.0, [1.0; 4]), DepthNormalization::None).unwrap();

    let at0 = interpolate(&a, &b, 0.0, Ease::Linear).unwrap();
    assert_eq!(at0.vertices(), a.vertices());
    let at1 = interpolate(&a, &b, 1.0, Ease::InOutCubic).unwrap();
    assert_eq!(at1.vertices(), b.vertices());

    let mid = interpolate(&a, &b, 0.5, Ease::Linear).unwrap();
    assert_eq!(mid.vertices()[0].position, Point::new(1.0, 0.0));
    assert_eq!(mid.vertices()[0].depth, 1.0);
    assert_eq!(mid.triangles(), a.triangles());
}

#[test]
fn authored_weights_are_lerped_as_is() {
    let a = MeshTransform::build(&square(0.0, [4.0, 0.0, 0.0, 0.0]), DepthNormalization::None)
        .unwrap();
    let b = MeshTransform::build(&square(0.0, [0.0; 4]), DepthNormalization::None).unwrap();
    let mid = interpolate(&a, &b, 0.5, Ease::Linear).unwrap();
    assert_eq!(mid.face_weights(0), Some([2.0, 0.0, 0.0, 0.0]));
    assert_eq!(mid.seam_weight(0, 0), Some(1.0));

    let end = interpolate(&a, &b, 1.0, Ease::Linear).unwrap();
    assert_eq!(end.face_weights(0), Some([0.0; 4]));
}

#[test]
fn blending_a_transform_with_itself_is_identity() {
    for weights in [[0.0; 4], [3.0, 1.0, 0.5, 7.0]] {
        let a = MeshTransform::build(&square(0.25, weights), DepthNormalization::linear()).unwrap();
        for t in [0.0, 0.5, 1.0] {
            let same = interpolate(&a, &a, t, Ease::Linear).unwrap();
            assert_eq!(same, a, "t={t} weights={weights:?}");
            assert_eq!(same.fingerprint(), a.fingerprint());
        }
    }
}

#[test]
fn policy_switches_at_end_of_transition() {
    let a = MeshTransform::build(&square(0.0, [1.0; 4]), DepthNormalization::None).unwrap();
    let b = MeshTransform::build(&square(0.5, [1.0; 4]), DepthNormalization::perspective())
        .unwrap();
    assert_eq!(
        interpolate(&a, &b, 0.99, Ease::Linear).unwrap().policy(),
        DepthNormalization::None
    );
    assert_eq!(
        interpolate(&a, &b, 1.0, Ease::Linear).unwrap().policy(),
        DepthNormalization::perspective()
    );
}

#[test]
fn topology_mismatch_is_rejected() {
    let a = MeshTransform::build(&square(0.0, [1.0; 4]), DepthNormalization::None).unwrap();
    let b = MeshTransformBuilder::new(DepthNormalization::None)
        .subdivision_steps(1)
        .build(&square(0.0, [1.0; 4]))
        .unwrap();
    let err = interpolate(&a, &b, 0.5, Ease::Linear).unwrap_err();
    assert!(err.is_invalid_mesh());
}
