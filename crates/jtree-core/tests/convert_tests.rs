/// Typed values → token tree (serde), and token tree ↔ serde_json::Value.
use chrono::{TimeZone, Utc};
use jtree_core::{
    from_json, to_json, to_token, ContainerFlavor, NodeType, Token, TreeError, TreeWriter, Value,
    ValueKind,
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;

#[derive(Serialize)]
struct User {
    name: String,
    age: u32,
    email: Option<String>,
    tags: Vec<&'static str>,
}

#[derive(Serialize)]
enum Shape {
    Empty,
    Circle(f64),
    Point(i32, i32),
    Rect { w: u32, h: u32 },
}

// ============================================================================
// Serialize → tree
// ============================================================================

#[test]
fn struct_becomes_object_in_field_order() {
    let user = User {
        name: "Alice".into(),
        age: 30,
        email: None,
        tags: vec!["rust", "json"],
    };
    let token = to_token(&user).unwrap();
    let root = token.root().unwrap();

    let keys: Vec<&str> = root.children().filter_map(|m| m.key()).collect();
    assert_eq!(keys, vec!["name", "age", "email", "tags"]);
    assert_eq!(root.get("age").unwrap().as_value(), Some(&Value::Integer(30)));
    assert_eq!(root.get("email").unwrap().as_value(), Some(&Value::Null));
    assert_eq!(
        root.get("tags").unwrap().node_type(),
        NodeType::Container(ContainerFlavor::Array)
    );
}

#[test]
fn primitive_becomes_lone_scalar() {
    assert_eq!(to_token(&7u8).unwrap(), Token::Scalar(Value::Integer(7)));
    assert_eq!(to_token("hi").unwrap(), Token::Scalar(Value::from("hi")));
    assert_eq!(to_token(&()).unwrap(), Token::Scalar(Value::Null));
}

#[test]
fn enum_variants_are_externally_tagged() {
    assert_eq!(
        to_json(&to_token(&Shape::Empty).unwrap()).unwrap(),
        json!("Empty")
    );
    assert_eq!(
        to_json(&to_token(&Shape::Circle(1.5)).unwrap()).unwrap(),
        json!({"Circle": 1.5})
    );
    assert_eq!(
        to_json(&to_token(&Shape::Point(1, -2)).unwrap()).unwrap(),
        json!({"Point": [1, -2]})
    );
    assert_eq!(
        to_json(&to_token(&Shape::Rect { w: 3, h: 4 }).unwrap()).unwrap(),
        json!({"Rect": {"w": 3, "h": 4}})
    );
}

#[test]
fn variants_nested_in_sequences() {
    let shapes = vec![Shape::Point(0, 0), Shape::Rect { w: 1, h: 1 }, Shape::Empty];
    let json = to_json(&to_token(&shapes).unwrap()).unwrap();
    assert_eq!(
        json,
        json!([{"Point": [0, 0]}, {"Rect": {"w": 1, "h": 1}}, "Empty"])
    );
}

#[test]
fn integer_map_keys_are_stringified() {
    let mut map = BTreeMap::new();
    map.insert(2, "two");
    map.insert(1, "one");
    let token = to_token(&map).unwrap();
    let keys: Vec<&str> = token.root().unwrap().children().filter_map(|m| m.key()).collect();
    assert_eq!(keys, vec!["1", "2"]);
}

#[test]
fn non_string_map_keys_rejected() {
    let mut map = BTreeMap::new();
    map.insert(vec![1], "list key");
    assert!(matches!(to_token(&map), Err(TreeError::KeyMustBeString)));
}

#[test]
fn bytes_are_a_bytes_value() {
    struct Blob;
    impl Serialize for Blob {
        fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            s.serialize_bytes(&[0xde, 0xad])
        }
    }
    assert_eq!(to_token(&Blob).unwrap(), Token::Scalar(Value::Bytes(vec![0xde, 0xad])));
}

#[test]
fn custom_serialize_errors_surface() {
    struct Refuses;
    impl Serialize for Refuses {
        fn serialize<S: serde::Serializer>(&self, _s: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refused"))
        }
    }
    match to_token(&Refuses) {
        Err(TreeError::Custom(msg)) => assert_eq!(msg, "refused"),
        other => panic!("expected custom error, got {other:?}"),
    }
}

// ============================================================================
// serde_json interop
// ============================================================================

#[test]
fn from_json_preserves_structure_and_order() {
    let value = json!({"z": 1, "a": [true, null, 2.5, "s"], "m": {}});
    let token = from_json(&value).unwrap();
    let root = token.root().unwrap();

    let keys: Vec<&str> = root.children().filter_map(|m| m.key()).collect();
    assert_eq!(keys, vec!["z", "a", "m"]);

    let kinds: Vec<NodeType> = root.get("a").unwrap().children().map(|n| n.node_type()).collect();
    assert_eq!(
        kinds,
        vec![
            NodeType::Value(ValueKind::Boolean),
            NodeType::Value(ValueKind::Null),
            NodeType::Value(ValueKind::Float),
            NodeType::Value(ValueKind::String),
        ]
    );
    assert_eq!(to_json(&token).unwrap(), value);
}

#[test]
fn from_json_scalar() {
    assert_eq!(from_json(&json!(5)).unwrap(), Token::Scalar(Value::Integer(5)));
    assert_eq!(from_json(&json!(u64::MAX)).unwrap(), Token::Scalar(Value::from(u64::MAX)));
}

#[test]
fn non_json_kinds_map_to_json() {
    let mut w = TreeWriter::new();
    w.begin_array().unwrap();
    w.write_undefined().unwrap();
    w.value(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()).unwrap();
    w.value(uuid::Uuid::nil()).unwrap();
    w.value(url::Url::parse("https://example.com/").unwrap()).unwrap();
    w.value(vec![1u8, 2]).unwrap();
    w.write_raw(r#"{"x":1}"#).unwrap();
    w.write_raw("not json").unwrap();
    w.write_comment("dropped").unwrap();
    w.end().unwrap();

    let json = to_json(&w.into_token().unwrap()).unwrap();
    assert_eq!(
        json,
        json!([
            null,
            "2024-01-02T03:04:05Z",
            "00000000-0000-0000-0000-000000000000",
            "https://example.com/",
            [1, 2],
            {"x": 1},
            "not json"
        ])
    );
}

#[test]
fn constructor_maps_to_named_arguments() {
    let mut w = TreeWriter::new();
    w.begin_object().unwrap();
    w.property_name("when").unwrap();
    w.begin_constructor("Date").unwrap();
    w.value(2024).unwrap();
    w.write_comment("month").unwrap();
    w.value(1).unwrap();
    w.end().unwrap();
    w.property_name("note").unwrap();
    w.write_comment("skipped member").unwrap();
    w.end().unwrap();

    let json = to_json(&w.into_token().unwrap()).unwrap();
    assert_eq!(json, json!({"when": {"Date": [2024, 1]}}));
}

#[test]
fn tree_serializes_to_text_through_serde_json() {
    let token = from_json(&json!({"a": [1, 2]})).unwrap();
    assert_eq!(serde_json::to_string(&token).unwrap(), r#"{"a":[1,2]}"#);
}
