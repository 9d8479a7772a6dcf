use chrono::{TimeZone, Utc};
use mql_pipeline::stage::Filter;
use mql_pipeline::*;
use rust_decimal::Decimal;
use serde_json::json;

fn kind_of(host: impl Into<Host>) -> Option<ValueKind> {
    of(host).kind()
}

// ============================================================================
// Dispatch order
// ============================================================================

#[test]
fn test_typed_value_passes_through_unchanged() {
    let value = Value::field("a").equals(1);
    assert_eq!(of(value.clone()), Coerced::Typed(value));
}

#[test]
fn test_scalar_dispatch() {
    assert_eq!(kind_of(false), Some(ValueKind::Boolean));
    assert_eq!(kind_of(3), Some(ValueKind::Integer));
    assert_eq!(kind_of(3i64), Some(ValueKind::Integer));
    assert_eq!(kind_of(3.0), Some(ValueKind::Number));
    assert_eq!(kind_of(Decimal::new(15, 1)), Some(ValueKind::Number));
    assert_eq!(kind_of("hello"), Some(ValueKind::String));
    assert_eq!(
        kind_of(Utc.with_ymd_and_hms(2020, 5, 1, 0, 0, 0).unwrap()),
        Some(ValueKind::Date)
    );
}

#[test]
fn test_integer_stays_integer() {
    assert_eq!(of(4), Coerced::Typed(Value::Integer(4)));
}

#[test]
fn test_float_becomes_number() {
    assert_eq!(of(4.0), Coerced::Typed(Value::Number(Number::Integral(4))));
    assert_eq!(of(4.5), Coerced::Typed(Value::Number(Number::Floating(4.5))));
}

#[test]
fn test_all_digit_string_becomes_number() {
    assert_eq!(of("42"), Coerced::Typed(Value::Number(Number::Integral(42))));
}

#[test]
fn test_all_digit_field_name_is_misclassified() {
    // A field literally named "2024" is coerced to the number 2024, not kept
    // as a string.
    let coerced = of("2024");
    assert_eq!(coerced.kind(), Some(ValueKind::Number));
    assert_eq!(coerced.render().unwrap(), json!(2024));
}

#[test]
fn test_partly_numeric_strings_stay_strings() {
    assert_eq!(kind_of("$2024"), Some(ValueKind::String));
    assert_eq!(kind_of("12a"), Some(ValueKind::String));
    assert_eq!(kind_of("1.5"), Some(ValueKind::String));
    assert_eq!(kind_of("-3"), Some(ValueKind::String));
    assert_eq!(kind_of(""), Some(ValueKind::String));
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn test_sequence_coerced_recursively() {
    let coerced = of(vec![Host::from(1), Host::from(2.5), Host::from("x")]);
    assert_eq!(coerced.kind(), Some(ValueKind::Array));

    let Some(Value::Array(array)) = coerced.as_value() else {
        panic!("expected array");
    };
    assert_eq!(array.element_kind(), Some(ValueKind::Integer));

    let kinds: Vec<_> = array.items().iter().map(Coerced::kind).collect();
    assert_eq!(
        kinds,
        vec![Some(ValueKind::Integer), Some(ValueKind::Number), Some(ValueKind::String)]
    );
}

#[test]
fn test_empty_sequence_is_untyped_array() {
    let coerced = of(Vec::<Host>::new());
    let Some(Value::Array(array)) = coerced.into_value() else {
        panic!("expected array");
    };
    assert_eq!(array.element_kind(), None);
}

#[test]
fn test_mapping_coerced_recursively() {
    let coerced = of(Host::mapping([
        ("total", Host::from(10.0)),
        ("tags", Host::from(vec!["a", "b"])),
    ]));
    assert_eq!(coerced.kind(), Some(ValueKind::Map));
    assert_eq!(coerced.render().unwrap(), json!({"total": 10, "tags": ["a", "b"]}));
}

#[test]
fn test_json_round_trips_through_render() {
    let input = json!({
        "name": "widget",
        "price": 9.99,
        "qty": 3,
        "active": true,
        "sizes": [1, 2, 3],
        "nested": {"path": "$a.b", "weights": [0.5, 1.5]}
    });
    assert_eq!(of(input.clone()).render().unwrap(), input);
}

#[test]
fn test_integers_above_i64_stay_integral() {
    let input = json!(u64::MAX);
    assert_eq!(of(input.clone()).render().unwrap(), input);
    assert_eq!(of(u64::MAX).render().unwrap(), input);
    assert_eq!(of("18446744073709551615").render().unwrap(), input);
    assert_eq!(of(1e19).render().unwrap(), json!(10_000_000_000_000_000_000u64));
}

#[test]
fn test_small_u64_is_integer() {
    assert_eq!(of(7u64), Coerced::Typed(Value::Integer(7)));
}

#[test]
fn test_unicode_numerals_stay_strings() {
    assert_eq!(kind_of("\u{663}"), Some(ValueKind::String));
}

#[test]
fn test_json_integral_float_renders_integral() {
    assert_eq!(of(json!(2.0)).render().unwrap(), json!(2));
}

// ============================================================================
// Fallback
// ============================================================================

#[test]
fn test_null_is_returned_unchanged() {
    assert_eq!(of(Host::Null), Coerced::Unchanged(Host::Null));
    assert_eq!(of(None::<i64>), Coerced::Unchanged(Host::Null));
}

#[test]
fn test_unchanged_null_fails_only_at_render() {
    let array = of(vec![Host::from(1), Host::Null]);
    assert_eq!(array.kind(), Some(ValueKind::Array));
    assert_eq!(array.render(), Err(MqlError::Unrenderable("null")));
}

#[test]
fn test_unchanged_null_first_leaves_array_untyped() {
    let Some(Value::Array(array)) = of(vec![Host::Null, Host::from(1)]).into_value() else {
        panic!("expected array");
    };
    assert_eq!(array.element_kind(), None);
}

#[test]
fn test_stage_is_returned_unchanged_and_renders_itself() {
    let filter = Filter::new("$list", Value::variable("this").greater_than(0));
    let coerced = of(filter.clone());

    assert_eq!(coerced, Coerced::Unchanged(Host::Stage(Box::new(filter.into()))));
    assert_eq!(
        coerced.render().unwrap(),
        json!({"$filter": {"input": "$list", "cond": {"$gt": ["$$this", 0]}}})
    );
}
