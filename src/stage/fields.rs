use serde_json::{Map as JsonMap, Value as Json};

use crate::{
    coerce::{Coerced, Host, of},
    error::MqlError,
};

/// Ordered field name → value entries, coerced as they are added.
///
/// ```
/// use mql_pipeline::stage::Fields;
///
/// let fields = Fields::new().with("core", 2).with("pour", 3);
/// assert_eq!(fields.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, Coerced)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Host>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Host>) {
        self.entries.push((name.into(), of(value)));
    }

    /// Removes every entry under `name`, reporting whether any existed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| entry != name);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Coerced)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Renders every value under its name. A repeated name keeps its first
    /// position and its last value.
    pub fn render(&self) -> Result<JsonMap<String, Json>, MqlError> {
        let mut doc = JsonMap::new();
        for (name, value) in &self.entries {
            doc.insert(name.clone(), value.render()?);
        }
        Ok(doc)
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<Host>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (name, value) in iter {
            fields.insert(name, value);
        }
        fields
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Fields
where
    K: Into<String>,
    V: Into<Host>,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K, V> From<Vec<(K, V)>> for Fields
where
    K: Into<String>,
    V: Into<Host>,
{
    fn from(entries: Vec<(K, V)>) -> Self {
        entries.into_iter().collect()
    }
}

/// `$addFields`: adds or overwrites computed fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddFields {
    fields: Fields,
}

impl AddFields {
    pub fn new(fields: impl Into<Fields>) -> Self {
        AddFields {
            fields: fields.into(),
        }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn payload(&self) -> Result<Json, MqlError> {
        self.fields.render().map(Json::Object)
    }
}

/// `$project`: reshapes documents to the listed fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    fields: Fields,
}

impl Project {
    pub fn new(fields: impl Into<Fields>) -> Self {
        Project {
            fields: fields.into(),
        }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn payload(&self) -> Result<Json, MqlError> {
        self.fields.render().map(Json::Object)
    }
}
