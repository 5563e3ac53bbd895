use super::*;
use crate::foundation::core::{Point, Point3D};
use crate::mesh::descriptor::{Face, Vertex};

fn square(z: f64) -> MeshDescriptor {
    let verts = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
        .into_iter()
        .map(|(x, y)| Vertex::new(Point::new(x, y), Point3D::new(x, y, z)))
        .collect();
    MeshDescriptor::new(verts, vec![Face::uniform([0, 1, 2, 3])]).unwrap()
}

#[test]
fn readers_keep_their_snapshot_across_swaps() {
    let first = MeshTransform::build(&square(0.0), DepthNormalization::None).unwrap();
    let first_fp = first.fingerprint();
    let shared = SharedMeshTransform::new(first);

    let snapshot = shared.load();
    let next = shared
        .rebuild(
            &square(1.0),
            DepthNormalization::perspective(),
            MeshTransformOpts::default(),
        )
        .unwrap();

    assert_eq!(snapshot.fingerprint(), first_fp);
    assert_eq!(shared.load().fingerprint(), next.fingerprint());
    assert_ne!(next.fingerprint(), first_fp);
    assert_eq!(shared.generation(), 1);
}

#[test]
fn failed_rebuild_keeps_previous_transform() {
    let initial = MeshTransform::build(&square(0.0), DepthNormalization::None).unwrap();
    let shared = SharedMeshTransform::new(initial);
    let before = shared.load().fingerprint();

    let err = shared
        .rebuild(
            &square(-3.0),
            DepthNormalization::perspective(),
            MeshTransformOpts::default(),
        )
        .unwrap_err();
    assert!(err.is_invalid_mesh());
    assert_eq!(shared.load().fingerprint(), before);
    assert_eq!(shared.generation(), 0);
}

#[test]
fn store_returns_replaced_transform() {
    let a = MeshTransform::build(&square(0.0), DepthNormalization::None).unwrap();
    let b = MeshTransform::build(&square(0.5), DepthNormalization::linear()).unwrap();
    let (fa, fb) = (a.fingerprint(), b.fingerprint());

    let shared = SharedMeshTransform::new(a);
    let old = shared.store(b);
    assert_eq!(old.fingerprint(), fa);
    assert_eq!(shared.load().fingerprint(), fb);
    assert!(format!("{shared:?}").contains("generation: 1"));
}
