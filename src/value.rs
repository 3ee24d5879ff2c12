//! Content value model: field values, materialized rows and record identity.
//!
//! These are plain data types that serialize freely (fixture manifests are
//! TOML documents deserialized straight into them). The traversal types in
//! [`crate::rows`] and the source cursors, by contrast, never implement
//! `Clone`, `Serialize` or `Deserialize`.

use std::collections::BTreeMap;
use std::fmt;

use derive_more::From;
use serde::{Deserialize, Serialize};

/// A single content field value.
///
/// Mirrors the value space a content source hands back for a sub-field:
/// scalars, ordered lists and nested maps. `Null` stands for the source's
/// "no data" answer.
///
/// # Examples
///
/// ```
/// use repeater_rows::value::Value;
///
/// let v: Value = "hero.jpg".into();
/// assert_eq!(v.as_str(), Some("hero.jpg"));
/// assert!(!v.is_empty());
/// assert!(Value::Null.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, From)]
#[serde(untagged)]
pub enum Value {
    /// Absent / "no data".
    Null,
    #[from]
    Bool(bool),
    #[from]
    Integer(i64),
    #[from]
    Float(f64),
    #[from]
    Text(String),
    #[from]
    List(Vec<Value>),
    #[from]
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Whether this value is the source's "no data" answer: `Null`, an empty
    /// string, or an empty collection. Scalars other than `Null` are never
    /// empty, including `false` and `0`.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Map(entries) => entries.is_empty(),
            Value::Bool(_) | Value::Integer(_) | Value::Float(_) => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

/// One materialized repeater row: the row's sub-fields as a name-keyed
/// associative structure.
///
/// Rows come out of a source already resolved against a formatting flag;
/// a `Row` therefore holds plain [`Value`]s, not raw/formatted pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: BTreeMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sub-field value by name. `None` for names the row does not carry,
    /// matching the silent-empty convention of the source interface.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Sub-field names and values in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Row {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Identifies the content record that owns a repeater field.
///
/// `Current` defers to whatever record the source currently designates as
/// the default one (for [`crate::source::memory::MemorySource`], the record
/// named via `set_current_record`). `Id` names a record explicitly; scope
/// names like `"options"` are ordinary ids as far as this crate is
/// concerned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordRef {
    /// The source's designated current record.
    #[default]
    Current,
    /// An explicitly named record.
    Id(String),
}

impl From<String> for RecordRef {
    fn from(id: String) -> Self {
        RecordRef::Id(id)
    }
}

impl From<&str> for RecordRef {
    fn from(id: &str) -> Self {
        RecordRef::Id(id.to_owned())
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRef::Current => f.write_str("<current>"),
            RecordRef::Id(id) => f.write_str(id),
        }
    }
}
