/// Property-based tests for the tree writer.
///
/// Random documents (objects, arrays, constructors and every scalar kind) are
/// flattened into event sequences, built with `TreeWriter`, replayed from the
/// built tree, and rebuilt. The checks:
///
/// - replaying a built tree yields the exact event sequence that built it
/// - rebuilding from the replay yields a structurally identical tree
/// - tree depth equals the maximum nesting of unmatched start events
/// - parent links and the object/member shape rules hold on every node
use chrono::TimeDelta;
use jtree_core::{
    ContainerFlavor, Event, Node, NodeType, Token, TreeWriter, Value,
};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

#[derive(Debug, Clone)]
enum Doc {
    Scalar(Value),
    Array(Vec<Doc>),
    Object(Vec<(String, Doc)>),
    Constructor(String, Vec<Doc>),
}

fn arb_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_]{0,8}").unwrap()
}

/// Every scalar kind except dates (covered in value_tests) and NaN floats,
/// which would break structural equality.
fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(Value::Undefined),
        any::<bool>().prop_map(Value::Boolean),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        (-1.0e9f64..1.0e9f64).prop_map(Value::Float),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::String),
        prop::collection::vec(any::<u8>(), 0..6).prop_map(Value::Bytes),
        (-86_400i64..86_400i64).prop_map(|s| Value::TimeSpan(TimeDelta::seconds(s))),
        any::<u128>().prop_map(|n| Value::Guid(uuid::Uuid::from_u128(n))),
        "[a-z0-9,\\[\\]]{0,8}".prop_map(Value::Raw),
        "[a-z ]{0,8}".prop_map(Value::Comment),
    ]
}

fn arb_doc() -> impl Strategy<Value = Doc> {
    arb_value().prop_map(Doc::Scalar).prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Doc::Array),
            prop::collection::vec((arb_key(), inner.clone()), 0..6).prop_map(Doc::Object),
            (arb_key(), prop::collection::vec(inner, 0..4))
                .prop_map(|(name, args)| Doc::Constructor(name, args)),
        ]
    })
}

fn emit(doc: &Doc, out: &mut Vec<Event>) {
    match doc {
        Doc::Scalar(v) => out.push(Event::Value(v.clone())),
        Doc::Array(items) => {
            out.push(Event::StartArray);
            items.iter().for_each(|item| emit(item, out));
            out.push(Event::EndArray);
        }
        Doc::Object(members) => {
            out.push(Event::StartObject);
            for (key, value) in members {
                out.push(Event::PropertyName(key.clone()));
                emit(value, out);
            }
            out.push(Event::EndObject);
        }
        Doc::Constructor(name, args) => {
            out.push(Event::StartConstructor(name.clone()));
            args.iter().for_each(|arg| emit(arg, out));
            out.push(Event::EndConstructor);
        }
    }
}

fn events_of(doc: &Doc) -> Vec<Event> {
    let mut events = Vec::new();
    emit(doc, &mut events);
    events
}

/// Maximum number of simultaneously open containers.
fn max_nesting(events: &[Event]) -> usize {
    let mut open = 0usize;
    let mut max = 0usize;
    for event in events {
        match event {
            Event::StartObject | Event::StartArray | Event::StartConstructor(_) => {
                open += 1;
                max = max.max(open);
            }
            Event::EndObject | Event::EndArray | Event::EndConstructor => open -= 1,
            _ => {}
        }
    }
    max
}

fn check_shape(node: Node<'_>) {
    for child in node.children() {
        assert_eq!(child.parent().map(|p| p.id()), Some(node.id()));
        match node.node_type() {
            NodeType::Container(ContainerFlavor::Object) => {
                assert_eq!(child.node_type(), NodeType::Member)
            }
            NodeType::Container(_) | NodeType::Member => {
                assert_ne!(child.node_type(), NodeType::Member)
            }
            NodeType::Value(_) => panic!("value node has children"),
        }
        check_shape(child);
    }
    if node.node_type() == NodeType::Member {
        assert_eq!(node.len(), 1);
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn replay_matches_original_events(doc in arb_doc()) {
        let events = events_of(&doc);
        let token = TreeWriter::from_events(events.clone()).unwrap().unwrap();

        let mut replayed = Vec::new();
        token.write_to(&mut replayed).unwrap();
        prop_assert_eq!(replayed, events);
    }

    #[test]
    fn rebuild_is_structurally_identical(doc in arb_doc()) {
        let token = TreeWriter::from_events(events_of(&doc)).unwrap().unwrap();

        let mut replayed = Vec::new();
        token.write_to(&mut replayed).unwrap();
        let rebuilt = TreeWriter::from_events(replayed).unwrap().unwrap();
        prop_assert_eq!(rebuilt, token);
    }

    #[test]
    fn depth_equals_max_nesting(doc in arb_doc()) {
        let events = events_of(&doc);
        let nesting = max_nesting(&events);
        let token = TreeWriter::from_events(events).unwrap().unwrap();

        match &token {
            Token::Tree(tree) => prop_assert_eq!(tree.depth(), nesting),
            Token::Scalar(_) => prop_assert_eq!(nesting, 0),
        }
    }

    #[test]
    fn shape_invariants_hold(doc in arb_doc()) {
        let token = TreeWriter::from_events(events_of(&doc)).unwrap().unwrap();
        if let Some(root) = token.root() {
            prop_assert!(root.parent().is_none());
            check_shape(root);
        }
    }

    #[test]
    fn writer_is_balanced_after_every_prefix(doc in arb_doc()) {
        let events = events_of(&doc);
        let mut w = TreeWriter::new();
        let mut open = 0usize;
        for event in events {
            match &event {
                Event::StartObject | Event::StartArray | Event::StartConstructor(_) => open += 1,
                Event::EndObject | Event::EndArray | Event::EndConstructor => open -= 1,
                _ => {}
            }
            jtree_core::JsonSink::write_event(&mut w, event).unwrap();
            prop_assert_eq!(w.depth(), open);
        }
        prop_assert!(w.is_complete());
    }
}
