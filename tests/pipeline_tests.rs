use mql_pipeline::stage::{Fields, Filter, Map, Match, Reduce};
use mql_pipeline::*;
use serde_json::json;

// ============================================================================
// Builder ordering
// ============================================================================

#[test]
fn test_empty_pipeline_renders_empty_array() {
    let pipeline = Pipeline::new();
    assert!(pipeline.is_empty());
    assert_eq!(pipeline.render().unwrap(), Vec::<serde_json::Value>::new());
}

#[test]
fn test_append_order_is_preserved() {
    let pipeline = Pipeline::new()
        .add_fields(Fields::new().with("a", 1))
        .project(Fields::new());

    assert_eq!(
        pipeline.render().unwrap(),
        vec![json!({"$addFields": {"a": 1}}), json!({"$project": {}})]
    );
}

#[test]
fn test_stages_iterate_in_chain_order() {
    let pipeline = Pipeline::new()
        .r#match(Value::field("a").greater_than(1))
        .group("$a", Fields::new())
        .project(Fields::new())
        .add_fields(Fields::new());

    let keywords: Vec<_> = pipeline.stages().map(Stage::keyword).collect();
    assert_eq!(
        keywords,
        vec![
            StageKeyword::Match,
            StageKeyword::Group,
            StageKeyword::Project,
            StageKeyword::AddFields
        ]
    );
    assert_eq!(pipeline.len(), 4);
}

#[test]
fn test_builder_script() {
    let pipeline = Pipeline::new()
        .add_fields(Fields::new().with("core", 2).with("pour", 3).with("pike", 4))
        .group(json!({"x": "$x"}), Fields::new().with("y", json!({"$sum": "$y"})))
        .project(Fields::new());

    assert_eq!(
        pipeline.render().unwrap(),
        vec![
            json!({"$addFields": {"core": 2, "pour": 3, "pike": 4}}),
            json!({"$group": {"_id": {"x": "$x"}, "y": {"$sum": "$y"}}}),
            json!({"$project": {}}),
        ]
    );
}

#[test]
fn test_render_is_idempotent() {
    let pipeline = Pipeline::new()
        .r#match(Value::field("qty").less_or_equal(4.5))
        .add_fields(Fields::new().with("double", Value::field("qty").multiply(2)));

    let first = pipeline.render().unwrap();
    let second = pipeline.render().unwrap();
    assert_eq!(first, second);
    assert_eq!(pipeline.len(), 2);
}

#[test]
fn test_append_generic_stage() {
    let pipeline = Pipeline::new().append(Match::new(json!({"status": "A"})));
    assert_eq!(pipeline.render().unwrap(), vec![json!({"$match": {"status": "A"}})]);
}

#[test]
fn test_render_error_propagates() {
    let pipeline = Pipeline::new()
        .project(Fields::new())
        .add_fields(Fields::new().with("broken", Host::Null));
    assert_eq!(pipeline.render(), Err(MqlError::Unrenderable("null")));
}

// ============================================================================
// Composed array operators
// ============================================================================

#[test]
fn test_filter_map_reduce_nesting() {
    let evens = Filter::new(
        Value::field("numList"),
        Value::variable("this").modulo(2).equals(0),
    );
    let scaled = Map::new(evens, Value::variable("this").multiply(10));
    let total = Reduce::new(scaled, 0, Value::variable("value").add("$$this"));

    let pipeline = Pipeline::new().project(Fields::new().with("result", total));

    assert_eq!(
        pipeline.render().unwrap(),
        vec![json!({
            "$project": {
                "result": {
                    "$reduce": {
                        "input": {
                            "$map": {
                                "input": {
                                    "$filter": {
                                        "input": "$numList",
                                        "cond": {"$eq": [{"$mod": ["$$this", 2]}, 0]}
                                    }
                                },
                                "in": {"$multiply": ["$$this", 10]}
                            }
                        },
                        "initialValue": 0,
                        "in": {"$add": ["$$value", "$$this"]}
                    }
                }
            }
        })]
    );
}

// ============================================================================
// Text output
// ============================================================================

#[test]
fn test_to_json_compact() {
    let pipeline = Pipeline::new().add_fields(Fields::new().with("a", 1.5));
    assert_eq!(pipeline.to_json().unwrap(), r#"[{"$addFields":{"a":1.5}}]"#);
}

#[test]
fn test_to_json_pretty() {
    let pipeline = Pipeline::new().project(Fields::new());
    assert_eq!(
        pipeline.to_json_pretty().unwrap(),
        "[\n  {\n    \"$project\": {}\n  }\n]"
    );
}

// ============================================================================
// Typed pipeline
// ============================================================================

struct Scores {
    num_list: Value,
    owner: Value,
}

impl Model for Scores {
    fn placeholder() -> Self {
        Scores {
            num_list: Value::field("numList"),
            owner: Value::field("owner"),
        }
    }
}

#[test]
fn test_typed_callbacks_receive_placeholder() {
    let pipeline = TypedPipeline::<Scores>::new()
        .match_with(|s| s.owner.equals("ada"))
        .add_field("evens", |s| {
            Filter::new(s.num_list.clone(), Value::variable("this").modulo(2).equals(0))
        })
        .project_field("owner", |s| s.owner.clone());

    assert_eq!(
        pipeline.render().unwrap(),
        vec![
            json!({"$match": {"$eq": ["$owner", "ada"]}}),
            json!({"$addFields": {"evens": {"$filter": {
                "input": "$numList",
                "cond": {"$eq": [{"$mod": ["$$this", 2]}, 0]}
            }}}}),
            json!({"$project": {"owner": "$owner"}}),
        ]
    );
}

#[test]
fn test_typed_append_with_and_into_inner() {
    let typed = TypedPipeline::<Scores>::new()
        .append_with(|s| Match::new(s.num_list.greater_than(json!([]))));

    assert_eq!(typed.model().num_list, Value::field("numList"));

    let pipeline = typed.into_inner().project(Fields::new());
    assert_eq!(
        pipeline.render().unwrap(),
        vec![
            json!({"$match": {"$gt": ["$numList", []]}}),
            json!({"$project": {}}),
        ]
    );
}
