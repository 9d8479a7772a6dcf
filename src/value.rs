use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde_json::{Map as JsonMap, Value as Json};

use crate::{
    coerce::{Coerced, Host, of},
    error::MqlError,
    expr::{Expression, Operator},
};

/// A typed expression value.
///
/// Values are immutable once built. They come either from the coercion
/// dispatcher ([`of`]) or from the typed constructors below, and combine
/// into [`Expression`] nodes through the comparison and arithmetic builders.
///
/// # Number vs Integer
///
/// [`Value::Integer`] holds integers supplied as integers. [`Value::Number`]
/// holds anything supplied as a float or decimal, and decides at construction
/// whether it renders as an integral or a floating literal by testing the
/// fractional part: `4.0` renders as `4`, `4.5` as `4.5`.
///
/// # Examples
///
/// ```
/// use mql_pipeline::Value;
/// use serde_json::json;
///
/// assert_eq!(Value::number(4.0).render().unwrap(), json!(4));
/// assert_eq!(Value::number(4.5).render().unwrap(), json!(4.5));
///
/// let bigger = Value::field("qty").greater_than(10);
/// assert_eq!(bigger.render().unwrap(), json!({"$gt": ["$qty", 10]}));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean literal
    Boolean(bool),

    /// Float or decimal input, split into integral/floating at construction
    Number(Number),

    /// Integer input
    Integer(i64),

    /// UTF-8 string, including field paths like `"$price"`
    String(String),

    /// Point in time, rendered in extended JSON date form
    Date(DateTime<Utc>),

    /// Ordered elements with an inferred element tag
    Array(Array),

    /// Raw document, rendered verbatim
    Document(JsonMap<String, Json>),

    /// String keys to coerced values, in insertion order
    Map(Vec<(String, Coerced)>),

    /// Operator document
    Expression(Expression),
}

/// The variant tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Boolean,
    Number,
    Integer,
    String,
    Date,
    Array,
    Document,
    Map,
    Expression,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::Integer => "integer",
            ValueKind::String => "string",
            ValueKind::Date => "date",
            ValueKind::Array => "array",
            ValueKind::Document => "document",
            ValueKind::Map => "map",
            ValueKind::Expression => "expression",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload of [`Value::Number`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Zero fractional part, rendered as an integral literal
    Integral(i64),
    /// Zero fractional part above `i64::MAX`, rendered as an integral literal
    Unsigned(u64),
    /// Non-zero fractional part (or beyond `u64`), rendered as a float
    Floating(f64),
}

impl Number {
    pub fn from_f64(n: f64) -> Self {
        // i64::MAX as f64 rounds up to 2^63 and u64::MAX as f64 to 2^64,
        // both already out of range for their type
        if n.fract() != 0.0 || n < i64::MIN as f64 || n >= u64::MAX as f64 {
            Number::Floating(n)
        } else if n < i64::MAX as f64 {
            Number::Integral(n as i64)
        } else {
            Number::Unsigned(n as u64)
        }
    }

    /// Integral, switching to `Unsigned` above `i64::MAX`.
    pub fn from_u64(n: u64) -> Self {
        i64::try_from(n).map_or(Number::Unsigned(n), Number::Integral)
    }

    pub fn from_decimal(d: Decimal) -> Self {
        if d.fract().is_zero() {
            if let Some(n) = d.to_i64() {
                return Number::Integral(n);
            }
            if let Some(n) = d.to_u64() {
                return Number::Unsigned(n);
            }
        }
        Number::Floating(d.to_f64().unwrap_or(f64::NAN))
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integral(n) => n as f64,
            Number::Unsigned(n) => n as f64,
            Number::Floating(n) => n,
        }
    }

    /// NaN and infinities have no JSON literal and render as null.
    pub fn render(self) -> Json {
        match self {
            Number::Integral(n) => Json::from(n),
            Number::Unsigned(n) => Json::from(n),
            Number::Floating(n) => serde_json::Number::from_f64(n)
                .map(Json::Number)
                .unwrap_or(Json::Null),
        }
    }
}

/// Payload of [`Value::Array`].
///
/// The element tag is taken from the first element when the array is built
/// and is `None` for an empty array (or one whose first element was left
/// unchanged by coercion).
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    element: Option<ValueKind>,
    items: Vec<Coerced>,
}

impl Array {
    pub fn new(items: Vec<Coerced>) -> Self {
        let element = items.first().and_then(Coerced::kind);
        Array { element, items }
    }

    pub fn element_kind(&self) -> Option<ValueKind> {
        self.element
    }

    pub fn items(&self) -> &[Coerced] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn render(&self) -> Result<Json, MqlError> {
        self.items
            .iter()
            .map(Coerced::render)
            .collect::<Result<Vec<_>, _>>()
            .map(Json::Array)
    }
}

impl Value {
    pub fn boolean(b: bool) -> Self {
        Value::Boolean(b)
    }

    pub fn number(n: f64) -> Self {
        Value::Number(Number::from_f64(n))
    }

    pub fn decimal(d: Decimal) -> Self {
        Value::Number(Number::from_decimal(d))
    }

    pub fn integer(n: i64) -> Self {
        Value::Integer(n)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn date(date: DateTime<Utc>) -> Self {
        Value::Date(date)
    }

    /// Parses an RFC 3339 timestamp, normalizing it to UTC.
    pub fn date_from_str(s: &str) -> Result<Self, MqlError> {
        DateTime::parse_from_rfc3339(s)
            .map(|date| Value::Date(date.with_timezone(&Utc)))
            .map_err(|_| MqlError::InvalidDate(s.to_string()))
    }

    /// Builds an array, coercing every element.
    pub fn array<T: Into<Host>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::Array(Array::new(items.into_iter().map(of).collect()))
    }

    pub fn document(doc: JsonMap<String, Json>) -> Self {
        Value::Document(doc)
    }

    /// Builds a map, coercing every value and keeping key order.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Host>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), of(v)))
                .collect(),
        )
    }

    /// Field path reference: `field("price")` is `"$price"`.
    pub fn field(path: &str) -> Self {
        Value::String(format!("${}", path))
    }

    /// Variable reference: `variable("this")` is `"$$this"`.
    pub fn variable(name: &str) -> Self {
        Value::String(format!("$${}", name))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::Integer(_) => ValueKind::Integer,
            Value::String(_) => ValueKind::String,
            Value::Date(_) => ValueKind::Date,
            Value::Array(_) => ValueKind::Array,
            Value::Document(_) => ValueKind::Document,
            Value::Map(_) => ValueKind::Map,
            Value::Expression(_) => ValueKind::Expression,
        }
    }

    /// Renders the value into its wire form.
    ///
    /// Leaves render their payload as is. Containers render every element in
    /// place, so they fail only when they hold a host value the dispatcher
    /// could not classify.
    pub fn render(&self) -> Result<Json, MqlError> {
        match self {
            Value::Boolean(b) => Ok(Json::Bool(*b)),
            Value::Number(n) => Ok(n.render()),
            Value::Integer(n) => Ok(Json::from(*n)),
            Value::String(s) => Ok(Json::String(s.clone())),
            Value::Date(date) => Ok(render_date(date)),
            Value::Array(array) => array.render(),
            Value::Document(doc) => Ok(Json::Object(doc.clone())),
            Value::Map(entries) => {
                let mut doc = JsonMap::new();
                for (key, value) in entries {
                    doc.insert(key.clone(), value.render()?);
                }
                Ok(Json::Object(doc))
            }
            Value::Expression(expr) => expr.render(),
        }
    }

    /// Hands the value to `f`, for chaining helper functions inline.
    pub fn pass_to<T>(&self, f: impl FnOnce(&Value) -> T) -> T {
        f(self)
    }

    // Comparison

    pub fn equals(&self, other: impl Into<Host>) -> Value {
        self.combine(Operator::Equal, other)
    }

    pub fn not_equals(&self, other: impl Into<Host>) -> Value {
        self.combine(Operator::NotEqual, other)
    }

    pub fn greater_than(&self, other: impl Into<Host>) -> Value {
        self.combine(Operator::GreaterThan, other)
    }

    pub fn greater_or_equal(&self, other: impl Into<Host>) -> Value {
        self.combine(Operator::GreaterEqual, other)
    }

    pub fn less_than(&self, other: impl Into<Host>) -> Value {
        self.combine(Operator::LessThan, other)
    }

    pub fn less_or_equal(&self, other: impl Into<Host>) -> Value {
        self.combine(Operator::LessEqual, other)
    }

    // Arithmetic

    pub fn modulo(&self, other: impl Into<Host>) -> Value {
        self.combine(Operator::Modulo, other)
    }

    pub fn add(&self, other: impl Into<Host>) -> Value {
        self.combine(Operator::Add, other)
    }

    pub fn multiply(&self, other: impl Into<Host>) -> Value {
        self.combine(Operator::Multiply, other)
    }

    fn combine(&self, operator: Operator, other: impl Into<Host>) -> Value {
        Value::Expression(Expression::new(
            operator,
            vec![Coerced::Typed(self.clone()), of(other)],
        ))
    }
}

/// Extended JSON (relaxed) date: `{"$date": "2024-01-31T12:00:00.000Z"}`.
fn render_date(date: &DateTime<Utc>) -> Json {
    let mut doc = JsonMap::new();
    doc.insert(
        "$date".to_string(),
        Json::String(date.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    Json::Object(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_split_on_fraction() {
        assert_eq!(Number::from_f64(4.0), Number::Integral(4));
        assert_eq!(Number::from_f64(-2.0), Number::Integral(-2));
        assert_eq!(Number::from_f64(4.5), Number::Floating(4.5));
    }

    #[test]
    fn number_above_i64_stays_integral() {
        assert_eq!(Number::from_f64(1e19), Number::Unsigned(10_000_000_000_000_000_000));
        assert_eq!(Number::from_f64(1e19).render(), Json::from(10_000_000_000_000_000_000u64));
        assert_eq!(Number::from_u64(u64::MAX), Number::Unsigned(u64::MAX));
        assert_eq!(Number::from_u64(7), Number::Integral(7));
    }

    #[test]
    fn number_beyond_u64_or_non_finite_is_floating() {
        assert_eq!(Number::from_f64(1e20), Number::Floating(1e20));
        assert!(matches!(Number::from_f64(f64::NAN), Number::Floating(_)));
        assert!(matches!(Number::from_f64(f64::INFINITY), Number::Floating(_)));
    }

    #[test]
    fn non_finite_renders_null() {
        assert_eq!(Number::Floating(f64::INFINITY).render(), Json::Null);
    }

    #[test]
    fn decimal_split_on_fraction() {
        assert_eq!(Number::from_decimal(Decimal::new(400, 2)), Number::Integral(4));
        assert_eq!(Number::from_decimal(Decimal::new(45, 1)), Number::Floating(4.5));
        assert_eq!(
            Number::from_decimal(Decimal::from(u64::MAX)),
            Number::Unsigned(u64::MAX)
        );
    }
}
