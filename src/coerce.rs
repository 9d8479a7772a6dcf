//! The coercion dispatcher: turns host values into typed [`Value`]s.
//!
//! Dispatch is an ordered rule list evaluated first-match-wins. Each rule
//! either claims the host value or hands it back for the next rule:
//!
//! 1. already a `Value` → unchanged
//! 2. boolean → `Boolean`
//! 3. integer → `Integer` (unsigned integers above `i64::MAX` → integral `Number`)
//! 4. float or decimal → `Number`
//! 5. string → `Number` when it is all digits, `String` otherwise. Only
//!    ASCII `0-9` count as digits; other Unicode numerals such as `"٣"`
//!    stay strings.
//! 6. date → `Date`
//! 7. sequence → `Array`, every element coerced
//! 8. mapping → `Map`, every value coerced
//!
//! A host value no rule claims is returned unchanged inside
//! [`Coerced::Unchanged`]. Coercion itself never fails; an unchanged value
//! that has no wire form fails later, when it is rendered.
//!
//! ```
//! use mql_pipeline::{of, ValueKind};
//!
//! assert_eq!(of(true).kind(), Some(ValueKind::Boolean));
//! assert_eq!(of("$price").kind(), Some(ValueKind::String));
//! assert_eq!(of("42").kind(), Some(ValueKind::Number));
//! ```

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value as Json;
use tracing::{debug, trace};

use crate::{
    error::MqlError,
    stage::Stage,
    value::{Array, Number, Value, ValueKind},
};

static ALL_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("digit pattern is valid"));

/// A value supplied by the caller, before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Host {
    /// Already typed
    Value(Value),
    Boolean(bool),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Decimal(Decimal),
    String(String),
    Date(DateTime<Utc>),
    Sequence(Vec<Host>),
    Mapping(Vec<(String, Host)>),
    /// A stage used in value position, such as `$filter` as a `$map` input
    Stage(Box<Stage>),
    Null,
}

impl Host {
    /// Builds a mapping, keeping entry order.
    pub fn mapping<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Host>,
    {
        Host::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Host::Value(_) => "value",
            Host::Boolean(_) => "boolean",
            Host::Integer(_) => "integer",
            Host::Unsigned(_) => "unsigned",
            Host::Float(_) => "float",
            Host::Decimal(_) => "decimal",
            Host::String(_) => "string",
            Host::Date(_) => "date",
            Host::Sequence(_) => "sequence",
            Host::Mapping(_) => "mapping",
            Host::Stage(_) => "stage",
            Host::Null => "null",
        }
    }
}

/// Result of running a host value through the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    /// Claimed by a rule
    Typed(Value),
    /// Claimed by no rule, kept exactly as supplied
    Unchanged(Host),
}

impl Coerced {
    /// The value tag, or `None` for an unchanged host value.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Coerced::Typed(value) => Some(value.kind()),
            Coerced::Unchanged(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Coerced::Typed(value) => Some(value),
            Coerced::Unchanged(_) => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Coerced::Typed(value) => Some(value),
            Coerced::Unchanged(_) => None,
        }
    }

    /// Renders a typed value. An unchanged stage renders as its own stage
    /// document; any other unchanged host value has no wire form.
    pub fn render(&self) -> Result<Json, MqlError> {
        match self {
            Coerced::Typed(value) => value.render(),
            Coerced::Unchanged(Host::Stage(stage)) => stage.render(),
            Coerced::Unchanged(host) => Err(MqlError::Unrenderable(host.type_name())),
        }
    }
}

type Rule = fn(Host) -> Result<Value, Host>;

/// Rule order matters: earlier rules must not be shadowed by later ones.
const RULES: [(&str, Rule); 8] = [
    ("value", typed),
    ("boolean", boolean),
    ("integer", integer),
    ("number", number),
    ("string", string),
    ("date", date),
    ("sequence", sequence),
    ("mapping", mapping),
];

/// Coerces any host value into the matching [`Value`] variant.
pub fn of(value: impl Into<Host>) -> Coerced {
    let mut host = value.into();
    for (name, rule) in RULES {
        match rule(host) {
            Ok(value) => {
                trace!(rule = name, kind = %value.kind(), "coerced host value");
                return Coerced::Typed(value);
            }
            Err(unclaimed) => host = unclaimed,
        }
    }

    debug!(host = host.type_name(), "no coercion rule matched, value left unchanged");
    Coerced::Unchanged(host)
}

fn typed(host: Host) -> Result<Value, Host> {
    match host {
        Host::Value(value) => Ok(value),
        other => Err(other),
    }
}

fn boolean(host: Host) -> Result<Value, Host> {
    match host {
        Host::Boolean(b) => Ok(Value::Boolean(b)),
        other => Err(other),
    }
}

fn integer(host: Host) -> Result<Value, Host> {
    match host {
        Host::Integer(n) => Ok(Value::Integer(n)),
        Host::Unsigned(n) => Ok(match i64::try_from(n) {
            Ok(n) => Value::Integer(n),
            Err(_) => Value::Number(Number::Unsigned(n)),
        }),
        other => Err(other),
    }
}

fn number(host: Host) -> Result<Value, Host> {
    match host {
        Host::Float(n) => Ok(Value::number(n)),
        Host::Decimal(d) => Ok(Value::decimal(d)),
        other => Err(other),
    }
}

/// All-digit strings become numbers. This also catches field names that
/// happen to be all digits.
fn string(host: Host) -> Result<Value, Host> {
    match host {
        Host::String(s) if ALL_DIGITS.is_match(&s) => Ok(Value::Number(parse_digits(&s))),
        Host::String(s) => Ok(Value::String(s)),
        other => Err(other),
    }
}

fn parse_digits(s: &str) -> Number {
    if let Ok(n) = s.parse::<i64>() {
        return Number::Integral(n);
    }
    if let Ok(n) = s.parse::<u64>() {
        return Number::Unsigned(n);
    }
    // Too long for u64; digits always parse as f64
    Number::from_f64(s.parse::<f64>().unwrap_or(f64::INFINITY))
}

fn date(host: Host) -> Result<Value, Host> {
    match host {
        Host::Date(date) => Ok(Value::Date(date)),
        other => Err(other),
    }
}

fn sequence(host: Host) -> Result<Value, Host> {
    match host {
        Host::Sequence(items) => Ok(Value::Array(Array::new(
            items.into_iter().map(of).collect(),
        ))),
        other => Err(other),
    }
}

fn mapping(host: Host) -> Result<Value, Host> {
    match host {
        Host::Mapping(entries) => Ok(Value::Map(
            entries.into_iter().map(|(k, v)| (k, of(v))).collect(),
        )),
        other => Err(other),
    }
}

// Conversions into Host

impl From<Value> for Host {
    fn from(value: Value) -> Self {
        Host::Value(value)
    }
}

impl From<Coerced> for Host {
    fn from(coerced: Coerced) -> Self {
        match coerced {
            Coerced::Typed(value) => Host::Value(value),
            Coerced::Unchanged(host) => host,
        }
    }
}

impl From<bool> for Host {
    fn from(b: bool) -> Self {
        Host::Boolean(b)
    }
}

impl From<i32> for Host {
    fn from(n: i32) -> Self {
        Host::Integer(n.into())
    }
}

impl From<i64> for Host {
    fn from(n: i64) -> Self {
        Host::Integer(n)
    }
}

impl From<u32> for Host {
    fn from(n: u32) -> Self {
        Host::Integer(n.into())
    }
}

impl From<u64> for Host {
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or(Host::Unsigned(n), Host::Integer)
    }
}

impl From<f64> for Host {
    fn from(n: f64) -> Self {
        Host::Float(n)
    }
}

impl From<Decimal> for Host {
    fn from(d: Decimal) -> Self {
        Host::Decimal(d)
    }
}

impl From<&str> for Host {
    fn from(s: &str) -> Self {
        Host::String(s.to_string())
    }
}

impl From<String> for Host {
    fn from(s: String) -> Self {
        Host::String(s)
    }
}

impl From<DateTime<Utc>> for Host {
    fn from(date: DateTime<Utc>) -> Self {
        Host::Date(date)
    }
}

impl<T: Into<Host>> From<Vec<T>> for Host {
    fn from(items: Vec<T>) -> Self {
        Host::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Host>> From<Option<T>> for Host {
    fn from(value: Option<T>) -> Self {
        value.map_or(Host::Null, Into::into)
    }
}

impl From<Stage> for Host {
    fn from(stage: Stage) -> Self {
        Host::Stage(Box::new(stage))
    }
}

/// JSON numbers that fit `i64` or `u64` are integers; every other number is a
/// float.
impl From<Json> for Host {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Host::Null,
            Json::Bool(b) => Host::Boolean(b),
            Json::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Host::Integer(i),
                (None, Some(u)) => Host::Unsigned(u),
                (None, None) => Host::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Host::String(s),
            Json::Array(items) => Host::Sequence(items.into_iter().map(Host::from).collect()),
            Json::Object(entries) => Host::Mapping(
                entries.into_iter().map(|(k, v)| (k, Host::from(v))).collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_fit_i64() {
        assert_eq!(parse_digits("0042"), Number::Integral(42));
    }

    #[test]
    fn digits_beyond_i64_stay_integral() {
        assert_eq!(parse_digits("18446744073709551615"), Number::Unsigned(u64::MAX));
        assert_eq!(
            of("18446744073709551615").render().unwrap(),
            Json::from(u64::MAX)
        );
    }

    #[test]
    fn json_u64_renders_back_equal() {
        let input = Json::from(u64::MAX);
        assert_eq!(Host::from(input.clone()), Host::Unsigned(u64::MAX));
        assert_eq!(of(input.clone()).render().unwrap(), input);
    }

    #[test]
    fn digits_beyond_u64_fall_back_to_float() {
        assert!(matches!(
            parse_digits("123456789012345678901234567890"),
            Number::Floating(_)
        ));
    }

    #[test]
    fn rules_run_in_order() {
        let names: Vec<_> = RULES.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            ["value", "boolean", "integer", "number", "string", "date", "sequence", "mapping"]
        );
    }

    #[test]
    fn digit_pattern_rejects_empty_and_signs() {
        assert!(!ALL_DIGITS.is_match(""));
        assert!(!ALL_DIGITS.is_match("-1"));
        assert!(!ALL_DIGITS.is_match("1.5"));
        assert!(ALL_DIGITS.is_match("2024"));
    }
}
