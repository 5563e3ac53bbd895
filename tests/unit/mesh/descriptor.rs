use super::*;

fn unit_square() -> Vec<Vertex> {
    [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
        .into_iter()
        .map(|(x, y)| Vertex::identity(Point::new(x, y)))
        .collect()
}

#[test]
fn accepts_single_quad() {
    let desc = MeshDescriptor::new(unit_square(), vec![Face::uniform([0, 1, 2, 3])]).unwrap();
    assert_eq!(desc.vertex_count(), 4);
    assert_eq!(desc.face_count(), 1);
    assert_eq!(desc.source_bounds(), Rect::new(0.0, 0.0, 1.0, 1.0));
    let corners = desc.face_vertices(0).unwrap();
    assert_eq!(corners[2].from, Point::new(1.0, 1.0));
    assert!(desc.face_vertices(1).is_none());
}

#[test]
fn rejects_empty_collections() {
    let err = MeshDescriptor::new(vec![], vec![Face::uniform([0, 0, 0, 0])]).unwrap_err();
    assert!(err.is_invalid_mesh());
    let err = MeshDescriptor::new(unit_square(), vec![]).unwrap_err();
    assert!(err.is_invalid_mesh());
}

#[test]
fn rejects_index_equal_to_vertex_count() {
    let err = MeshDescriptor::new(unit_square(), vec![Face::uniform([0, 1, 2, 4])]).unwrap_err();
    assert!(err.is_invalid_mesh());
    assert!(err.to_string().contains("vertex 4"));
}

#[test]
fn rejects_negative_and_non_finite_weights() {
    let err = MeshDescriptor::new(
        unit_square(),
        vec![Face::new([0, 1, 2, 3], [1.0, -0.5, 1.0, 1.0])],
    )
    .unwrap_err();
    assert!(err.is_invalid_mesh());

    let err = MeshDescriptor::new(
        unit_square(),
        vec![Face::new([0, 1, 2, 3], [1.0, 1.0, f32::NAN, 1.0])],
    )
    .unwrap_err();
    assert!(err.is_invalid_mesh());

    let err = MeshDescriptor::new(
        unit_square(),
        vec![Face::new([0, 1, 2, 3], [f32::INFINITY, 1.0, 1.0, 1.0])],
    )
    .unwrap_err();
    assert!(err.is_invalid_mesh());
}

#[test]
fn rejects_non_finite_vertex() {
    let mut verts = unit_square();
    verts[2].to.z = f64::NAN;
    let err = MeshDescriptor::new(verts, vec![Face::uniform([0, 1, 2, 3])]).unwrap_err();
    assert!(err.to_string().contains("vertex 2"));
}

#[test]
fn unnormalized_and_zero_weights_are_valid() {
    let desc = MeshDescriptor::new(
        unit_square(),
        vec![
            Face::new([0, 1, 2, 3], [3.0, 1.0, 0.0, 0.0]),
            Face::quad([0, 1, 2, 2]),
        ],
    )
    .unwrap();
    assert_eq!(desc.faces()[0].normalized_weights(), [0.75, 0.25, 0.0, 0.0]);
    assert_eq!(desc.faces()[1].normalized_weights(), [0.25; 4]);
}

#[test]
fn huge_weights_normalize_without_overflow() {
    let face = Face::new([0, 1, 2, 3], [f32::MAX, f32::MAX, 0.0, 0.0]);
    assert_eq!(face.normalized_weights(), [0.5, 0.5, 0.0, 0.0]);

    let face = Face::new([0, 1, 2, 3], [f32::MAX, f32::MAX / 2.0, f32::MAX / 2.0, 0.0]);
    assert_eq!(face.normalized_weights(), [0.5, 0.25, 0.25, 0.0]);
}

#[test]
fn deserialization_validates() {
    let desc = MeshDescriptor::new(unit_square(), vec![Face::uniform([0, 1, 2, 3])]).unwrap();
    let json = serde_json::to_string(&desc).unwrap();
    let back: MeshDescriptor = serde_json::from_str(&json).unwrap();
    assert_eq!(back, desc);

    let bad = json.replace("[0,1,2,3]", "[0,1,2,9]");
    assert!(serde_json::from_str::<MeshDescriptor>(&bad).is_err());
}

#[test]
fn json_helpers_separate_syntax_from_validation() {
    let desc = MeshDescriptor::new(unit_square(), vec![Face::uniform([0, 1, 2, 3])]).unwrap();
    let json = desc.to_json_pretty().unwrap();
    assert_eq!(MeshDescriptor::from_json(&json).unwrap(), desc);

    let err = MeshDescriptor::from_json("{\"vertices\": [").unwrap_err();
    assert!(matches!(err, MeshWarpError::Serde(_)));

    let err = MeshDescriptor::from_json(r#"{"vertices": [], "faces": []}"#).unwrap_err();
    assert!(err.is_invalid_mesh());
}
