//! Mixin behaviour of derived models: naming, equality and representation

use std::any::Any;

use tenon::{Model as _, Related, Value};

#[derive(Clone, Default, tenon::Model)]
struct Model {
    id: Option<i64>,
}

#[derive(Clone, Default, tenon::Model)]
struct OtherModel {
    id: Option<i64>,
}

#[derive(Clone, Default, tenon::Model)]
struct AnotherModel {
    id: Option<i64>,
    attr: Option<i64>,
    other_id: Option<i64>,
    #[model(relationship)]
    other: Related<Model>,
}

fn model(id: i64) -> Model {
    Model { id: Some(id) }
}

#[test]
fn test_table_name() {
    assert_eq!(Model::table_name(), "model");
    assert_eq!(AnotherModel::table_name(), "anothermodel");
}

#[test]
fn test_eq_wrong_type() {
    let not_a_model: Box<dyn Any> = Box::new(String::from("model"));
    assert!(!Model::default().eq_any(not_a_model.as_ref()));
}

#[test]
fn test_eq_wrong_model_type() {
    assert!(!model(1).model_eq(&OtherModel { id: Some(1) }));
}

#[test]
fn test_eq_different() {
    assert!(!(model(1) == model(2)));
}

#[test]
fn test_eq_different_keys() {
    assert!(!(Model::default() == model(2)));
}

#[test]
fn test_eq_same() {
    assert!(model(1) == model(1));
}

#[test]
fn test_ne_wrong_type() {
    assert!(!Model::default().eq_any(&42i64));
}

#[test]
fn test_ne_wrong_model_type() {
    let other = OtherModel { id: Some(1) };
    assert!(!model(1).model_eq(&other));
    assert!(!other.model_eq(&model(1)));
}

#[test]
fn test_ne_different() {
    assert!(model(1) != model(2));
}

#[test]
fn test_ne_same() {
    assert!(!(model(1) != model(1)));
}

#[test]
fn test_repr() {
    assert_eq!(format!("{:?}", model(1)), "Model(id=1)");
    assert_eq!(model(1).repr(), "Model(id=1)");
}

#[test]
fn test_str() {
    assert_eq!(model(1).to_string(), "Model(id=1)");
    assert_eq!(Model::default().to_string(), "Model(id=None)");
}

#[test]
fn test_primary_key_mapping() {
    let key = AnotherModel { id: Some(2), ..Default::default() }.primary_key();
    assert_eq!(key.names(), vec!["id"]);
    assert_eq!(key.get("id"), Some(&Value::Int(2)));
    assert!(key.is_complete());
    assert!(!AnotherModel::default().primary_key().is_complete());
}

#[test]
fn test_eq_considers_all_columns() {
    let a = AnotherModel { id: Some(2), attr: Some(6), ..Default::default() };
    let b = AnotherModel { id: Some(2), attr: None, ..Default::default() };
    assert!(a != b);
    assert_eq!(a.to_string(), b.to_string());
}

#[test]
fn test_eq_considers_loaded_relationships() {
    let raw = AnotherModel { id: Some(2), other_id: Some(1), ..Default::default() };
    let loaded = AnotherModel {
        id: Some(2),
        other_id: Some(1),
        other: Related::from(model(1)),
        ..Default::default()
    };
    let loaded_other = AnotherModel {
        id: Some(2),
        other_id: Some(1),
        other: Related::from(model(3)),
        ..Default::default()
    };

    assert!(raw != loaded);
    assert!(loaded == loaded.clone());
    assert!(loaded != loaded_other);
}

#[test]
fn test_models_as_values() {
    let values = vec![model(1), model(2)];
    let value = tenon::ToValue::to_value(&values);
    assert_eq!(value.repr(), "[Model(id=1), Model(id=2)]");
    assert_eq!(value, tenon::ToValue::to_value(&vec![model(1), model(2)]));
    assert_ne!(value, tenon::ToValue::to_value(&vec![model(2), model(1)]));
}

#[test]
fn test_to_fields_serializes_columns() {
    let fields = AnotherModel { id: Some(2), attr: Some(6), ..Default::default() }.to_fields();
    assert_eq!(
        serde_json::Value::Object(fields),
        serde_json::json!({"id": 2, "attr": 6, "other_id": null})
    );
}
