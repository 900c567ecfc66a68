#[derive(Clone, Default, tenon::Model)]
struct Model {
    id: Option<i64>,
}

fn main() {
    assert_eq!(<Model as tenon::Model>::table_name(), "model");
    assert_eq!(format!("{:?}", Model { id: Some(1) }), "Model(id=1)");
    assert_eq!(Model { id: Some(1) }.to_string(), "Model(id=1)");
    assert!(Model { id: Some(1) } == Model { id: Some(1) });
    assert!(Model::default() != Model { id: Some(2) });
}
