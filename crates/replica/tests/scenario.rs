//! End-to-end clone and update of a three-level entity graph declared with
//! the derive macros.

use replica::{
    config::ReplicaConfig,
    obs::{metrics_report, metrics_reset_all},
    prelude::*,
};

#[derive(Clonable, Clone, Debug, Default, PartialEq)]
struct MockObject {
    #[replica(update = "IndexSuffix")]
    name: String,
    #[replica(update = "OffsetByIndex<i64>")]
    number: i64,
}

#[derive(Clonable, Clone, Debug, PartialEq)]
struct SimpleCompostMockObject {
    #[replica(base)]
    base: MockObject,
    #[replica(no_update)]
    child_object: Option<MockObject>,
    #[replica(copy, no_update)]
    immutable_string: String,
}

impl Default for SimpleCompostMockObject {
    fn default() -> Self {
        Self {
            base: MockObject::default(),
            child_object: None,
            immutable_string: "THIS STRING WON'T CHANGE".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum MockEnum {
    #[default]
    One,
    Two,
}

impl MockEnum {
    const fn clone_self(&self) -> Self {
        *self
    }
}

#[derive(Replicate, Clone, Debug, PartialEq)]
enum MockNode {
    Plain(MockObject),
    Simple(SimpleCompostMockObject),
}

#[derive(Clonable, Clone, Debug, Default, PartialEq)]
struct CompostMockObject {
    #[replica(base)]
    base: MockObject,
    mock_object_list: Vec<MockNode>,
    #[replica(with = "MockEnum::clone_self")]
    mock_enum: MockEnum,
}

fn plain() -> MockObject {
    MockObject {
        name: "PlainMockObject".to_string(),
        number: 0,
    }
}

fn simple_compost() -> SimpleCompostMockObject {
    SimpleCompostMockObject {
        base: MockObject {
            name: "SimpleCompostMockObject".to_string(),
            number: 0,
        },
        child_object: Some(plain()),
        ..SimpleCompostMockObject::default()
    }
}

fn compost() -> CompostMockObject {
    CompostMockObject {
        base: MockObject {
            name: "CompostMockObject".to_string(),
            number: 0,
        },
        mock_object_list: vec![MockNode::Simple(simple_compost()), MockNode::Plain(plain())],
        mock_enum: MockEnum::One,
    }
}

#[test]
fn every_level_clones_to_an_equal_distinct_value() {
    let plain_origin = plain();
    let plain_copy = plain_origin.clone_self().expect("plain clone");
    assert_eq!(plain_copy, plain_origin);

    let simple_origin = simple_compost();
    let simple_copy = simple_origin.clone_self().expect("simple clone");
    assert_eq!(simple_copy, simple_origin);

    let compost_origin = compost();
    let compost_copy = compost_origin.clone_self().expect("compost clone");
    assert_eq!(compost_copy, compost_origin);
    assert!(!std::ptr::eq(
        compost_copy.mock_object_list.as_ptr(),
        compost_origin.mock_object_list.as_ptr()
    ));
}

#[test]
fn updating_a_clone_leaves_the_origin_untouched() {
    let origin = compost();
    let mut copy = origin.clone_self().expect("clone should succeed");

    copy.update_self(CloneIndex::new(1)).expect("update should succeed");

    assert_eq!(origin, compost());
    assert_eq!(copy.base.name, "CompostMockObject_INDEX_1");
    assert_eq!(copy.base.number, 1);
    assert_eq!(copy.mock_enum, MockEnum::One);

    let MockNode::Simple(simple) = &copy.mock_object_list[0] else {
        panic!("first child should stay a simple composite");
    };
    assert_eq!(simple.base.name, "SimpleCompostMockObject_INDEX_1");
    assert_eq!(simple.child_object, Some(plain()));
    assert_eq!(simple.immutable_string, "THIS STRING WON'T CHANGE");
    assert_eq!(
        copy.mock_object_list[1],
        MockNode::Plain(MockObject {
            name: "PlainMockObject_INDEX_1".to_string(),
            number: 1,
        })
    );
}

#[test]
fn configured_engine_drives_a_batch_of_copies() {
    let config = ReplicaConfig::from_toml_str(
        r#"
        [walk]
        max_depth = 8

        [naming]
        separator = "-"
        order = "insert"
        "#,
    )
    .expect("config should parse");
    let engine = Engine::new(config).expect("config should be valid");

    let copies = engine
        .replicate_indexed(&compost(), [CloneIndex::new(1), CloneIndex::new(2)])
        .expect("batch should succeed");

    assert_eq!(copies.len(), 2);
    assert_eq!(copies[0].base.name, "CompostMockObject-1");
    assert_eq!(copies[1].base.name, "CompostMockObject-2");

    let mut twice = copies[0].clone();
    engine
        .update_entity(&mut twice, CloneIndex::new(5))
        .expect("second update should succeed");
    assert_eq!(twice.base.name, "CompostMockObject-5-1");
}

#[test]
fn shallow_depth_limit_reports_the_deepest_path() {
    let config = ReplicaConfig::from_toml_str("[walk]\nmax_depth = 2\n").expect("config");
    let engine = Engine::new(config).expect("config should be valid");

    let err = engine
        .clone_entity(&compost())
        .expect_err("the grandchild sits three levels down");

    assert!(err.is_unsupported());
    assert_eq!(err.path.as_deref(), Some("mock_object_list[0].child_object"));
}

#[test]
fn walks_are_reported_per_root_entity() {
    metrics_reset_all();

    let mut copy = compost().clone_self().expect("clone should succeed");
    copy.update_self(CloneIndex::new(3)).expect("update should succeed");

    let report = metrics_report();
    assert_eq!(report.counters.ops.clone_calls, 1);
    assert_eq!(report.counters.ops.update_calls, 1);
    assert_eq!(report.counters.ops.walk_failures, 0);

    let root = report
        .entity_counters
        .iter()
        .find(|summary| summary.path == CompostMockObject::PATH)
        .expect("root entity should be reported");
    assert_eq!(root.clone_calls, 1);
    assert_eq!(root.update_calls, 1);

    let json = serde_json::to_string(&report).expect("report should serialize");
    assert!(json.contains("CompostMockObject"));
}
