//! In-memory repeater source.
//!
//! `MemorySource` is the reference [`RepeaterSource`] backend: a plain
//! record → field → rows map, populated either programmatically through the
//! builder methods or from a TOML fixture manifest. It stands in for a real
//! content-management backend the same way an in-memory store stands in for
//! a database engine: tests and examples run against it, and it pins down
//! the observable traversal semantics production sources must match.
//!
//! # Fixture manifests
//!
//! ```toml
//! current = "42"
//!
//! [[records."42".gallery]]
//! image = "one.jpg"
//! caption = { raw = "<b>One</b>", formatted = "One" }
//!
//! [[records."42".gallery]]
//! image = "two.jpg"
//! ```
//!
//! Each `[[records.<id>.<field>]]` table is one row. A sub-field is either a
//! bare value (no formatting step) or a `{ raw, formatted }` pair; resolving
//! with `format = true` prefers the formatted variant.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::error::RepeaterResult;
use crate::source::RepeaterSource;
use crate::value::{RecordRef, Row, Value};

/// Stored form of one sub-field value: the raw value plus an optional
/// formatted variant.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    raw: Value,
    formatted: Option<Value>,
}

impl FieldValue {
    /// A value with no formatting step; both resolutions return `raw`.
    pub fn plain(raw: impl Into<Value>) -> Self {
        FieldValue {
            raw: raw.into(),
            formatted: None,
        }
    }

    /// A value whose formatted variant differs from the stored one.
    pub fn with_formatted(raw: impl Into<Value>, formatted: impl Into<Value>) -> Self {
        FieldValue {
            raw: raw.into(),
            formatted: Some(formatted.into()),
        }
    }

    /// Resolve against a formatting flag: `format = true` prefers the
    /// formatted variant when one exists.
    pub fn resolve(&self, format: bool) -> &Value {
        match (&self.formatted, format) {
            (Some(formatted), true) => formatted,
            _ => &self.raw,
        }
    }
}

/// One stored repeater row: named sub-fields in their stored form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredRow {
    fields: BTreeMap<String, FieldValue>,
}

impl StoredRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sub-field with no formatting step.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), FieldValue::plain(value));
        self
    }

    /// Add a sub-field carrying a distinct formatted variant.
    pub fn with_formatted(
        mut self,
        name: impl Into<String>,
        raw: impl Into<Value>,
        formatted: impl Into<Value>,
    ) -> Self {
        self.fields
            .insert(name.into(), FieldValue::with_formatted(raw, formatted));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Materialize as a [`Row`], resolving every sub-field against `format`.
    pub fn materialize(&self, format: bool) -> Row {
        self.fields
            .iter()
            .map(|(name, value)| (name.clone(), value.resolve(format).clone()))
            .collect()
    }
}

/// Traversal handle over a `MemorySource` field.
///
/// Holds the resolved record id, the field name and the position within the
/// field's rows. `pos` is `None` before the first advance. Not `Clone` and
/// not serializable: one handle, one pass.
#[derive(Debug)]
pub struct MemoryCursor {
    /// Resolved at `begin` time; `None` when the record reference could not
    /// be resolved (no designated current record), which makes the pass
    /// immediately exhausted.
    record: Option<String>,
    field: String,
    pos: Option<usize>,
}

/// In-memory [`RepeaterSource`] implementation.
///
/// # Examples
///
/// ```
/// use repeater_rows::prelude::*;
///
/// let mut source = MemorySource::new();
/// source.insert_rows("42", "gallery", [
///     StoredRow::new().with("image", "one.jpg"),
///     StoredRow::new().with("image", "two.jpg"),
/// ]);
/// source.set_current_record("42");
///
/// // RecordRef::Current resolves through the designated record.
/// let images: Vec<String> = Rows::over(&source, "gallery")
///     .filter_map(|(_, row)| row.get("image").and_then(Value::as_str).map(str::to_owned))
///     .collect();
/// assert_eq!(images, ["one.jpg", "two.jpg"]);
/// ```
#[derive(Debug, Default)]
pub struct MemorySource {
    records: HashMap<String, HashMap<String, Vec<StoredRow>>>,
    current: Option<String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Designate which record [`RecordRef::Current`] resolves to. Without a
    /// designation, `Current` traversals are empty.
    pub fn set_current_record(&mut self, id: impl Into<String>) -> &mut Self {
        self.current = Some(id.into());
        self
    }

    /// Replace the rows of `field` on `record`.
    pub fn insert_rows(
        &mut self,
        record: impl Into<String>,
        field: impl Into<String>,
        rows: impl IntoIterator<Item = StoredRow>,
    ) -> &mut Self {
        self.records
            .entry(record.into())
            .or_default()
            .insert(field.into(), rows.into_iter().collect());
        self
    }

    /// Append one row to `field` on `record`.
    pub fn push_row(
        &mut self,
        record: impl Into<String>,
        field: impl Into<String>,
        row: StoredRow,
    ) -> &mut Self {
        self.records
            .entry(record.into())
            .or_default()
            .entry(field.into())
            .or_default()
            .push(row);
        self
    }

    /// Number of rows stored for `field` on `record`.
    pub fn row_count(&self, record: &RecordRef, field: &str) -> usize {
        self.resolve(record)
            .and_then(|id| self.rows_for(id, field))
            .map_or(0, Vec::len)
    }

    /// Load a source from a TOML fixture manifest. See the module docs for
    /// the document shape.
    pub fn from_toml_str(manifest: &str) -> RepeaterResult<Self> {
        let spec: SourceSpec = toml::from_str(manifest)?;
        Ok(spec.into_source())
    }

    /// Load a source from a TOML fixture manifest on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> RepeaterResult<Self> {
        let path = path.as_ref();
        debug!("MemorySource: loading fixture manifest from {}", path.display());
        let manifest = std::fs::read_to_string(path)?;
        Self::from_toml_str(&manifest)
    }

    fn resolve<'a>(&'a self, record: &'a RecordRef) -> Option<&'a str> {
        match record {
            RecordRef::Current => self.current.as_deref(),
            RecordRef::Id(id) => Some(id),
        }
    }

    fn rows_for(&self, record: &str, field: &str) -> Option<&Vec<StoredRow>> {
        self.records.get(record)?.get(field)
    }

    fn cursor_rows(&self, cursor: &MemoryCursor) -> Option<&Vec<StoredRow>> {
        self.rows_for(cursor.record.as_deref()?, &cursor.field)
    }
}

impl RepeaterSource for MemorySource {
    type Cursor = MemoryCursor;

    fn begin(&self, field: &str, record: &RecordRef) -> MemoryCursor {
        MemoryCursor {
            record: self.resolve(record).map(str::to_owned),
            field: field.to_owned(),
            pos: None,
        }
    }

    fn advance(&self, cursor: &mut MemoryCursor) -> bool {
        let len = self.cursor_rows(cursor).map_or(0, Vec::len);
        let next = cursor.pos.map_or(0, |pos| pos.saturating_add(1));
        if next < len {
            cursor.pos = Some(next);
            true
        } else {
            // Park at the end; further advances stay exhausted.
            cursor.pos = Some(len);
            false
        }
    }

    fn current_row(&self, cursor: &MemoryCursor, format: bool) -> Option<Row> {
        let row = self.cursor_rows(cursor)?.get(cursor.pos?)?;
        Some(row.materialize(format))
    }

    fn field_value(&self, cursor: &MemoryCursor, name: &str, format: bool) -> Option<Value> {
        let row = self.cursor_rows(cursor)?.get(cursor.pos?)?;
        Some(row.get(name)?.resolve(format).clone())
    }
}

// =============================================================================
// TOML fixture manifest
// =============================================================================

/// Top-level shape of a fixture manifest.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SourceSpec {
    /// The record `RecordRef::Current` resolves to.
    #[serde(default)]
    current: Option<String>,
    /// record id → field name → rows.
    #[serde(default)]
    records: HashMap<String, HashMap<String, Vec<RowSpec>>>,
}

type RowSpec = BTreeMap<String, FieldValueSpec>;

/// A sub-field in a manifest: either a bare value or a raw/formatted pair.
/// Tried in that order: a table with exactly the keys `raw` (and optionally
/// `formatted`) is a pair, anything else is a plain map value.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldValueSpec {
    Formatted(FormattedSpec),
    Plain(Value),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FormattedSpec {
    raw: Value,
    #[serde(default)]
    formatted: Option<Value>,
}

impl SourceSpec {
    fn into_source(self) -> MemorySource {
        let mut source = MemorySource::new();
        if let Some(current) = self.current {
            source.set_current_record(current);
        }
        for (record, fields) in self.records {
            for (field, rows) in fields {
                let rows = rows.into_iter().map(|row| {
                    StoredRow {
                        fields: row
                            .into_iter()
                            .map(|(name, value)| (name, value.into_field_value()))
                            .collect(),
                    }
                });
                source.insert_rows(record.clone(), field, rows);
            }
        }
        source
    }
}

impl FieldValueSpec {
    fn into_field_value(self) -> FieldValue {
        match self {
            FieldValueSpec::Plain(raw) => FieldValue {
                raw,
                formatted: None,
            },
            FieldValueSpec::Formatted(spec) => FieldValue {
                raw: spec.raw,
                formatted: spec.formatted,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gallery_source() -> MemorySource {
        let mut source = MemorySource::new();
        source.insert_rows(
            "42",
            "gallery",
            [
                StoredRow::new().with("image", "one.jpg"),
                StoredRow::new().with("image", "two.jpg"),
                StoredRow::new().with("image", "three.jpg"),
            ],
        );
        source
    }

    #[test]
    fn advance_walks_every_row_then_parks() {
        let source = gallery_source();
        let mut cursor = source.begin("gallery", &RecordRef::from("42"));

        assert!(source.advance(&mut cursor));
        assert!(source.advance(&mut cursor));
        assert!(source.advance(&mut cursor));
        assert!(!source.advance(&mut cursor));
        // Exhaustion is stable.
        assert!(!source.advance(&mut cursor));
        assert_eq!(source.current_row(&cursor, true), None);
    }

    #[test]
    fn reads_before_first_advance_are_empty() {
        let source = gallery_source();
        let cursor = source.begin("gallery", &RecordRef::from("42"));

        assert_eq!(source.current_row(&cursor, true), None);
        assert_eq!(source.field_value(&cursor, "image", true), None);
    }

    #[test]
    fn unknown_field_and_record_are_empty_not_errors() {
        let source = gallery_source();

        let mut cursor = source.begin("missing_field", &RecordRef::from("42"));
        assert!(!source.advance(&mut cursor));

        let mut cursor = source.begin("gallery", &RecordRef::from("999"));
        assert!(!source.advance(&mut cursor));
    }

    #[test]
    fn current_record_requires_designation() {
        let mut source = gallery_source();

        let mut cursor = source.begin("gallery", &RecordRef::Current);
        assert!(!source.advance(&mut cursor));

        source.set_current_record("42");
        let mut cursor = source.begin("gallery", &RecordRef::Current);
        assert!(source.advance(&mut cursor));
    }

    #[test]
    fn formatting_prefers_the_formatted_variant() {
        let mut source = MemorySource::new();
        source.insert_rows(
            "7",
            "blocks",
            [StoredRow::new().with_formatted("body", "<b>hi</b>", "hi")],
        );

        let mut cursor = source.begin("blocks", &RecordRef::from("7"));
        assert!(source.advance(&mut cursor));
        assert_eq!(
            source.field_value(&cursor, "body", true),
            Some(Value::from("hi"))
        );
        assert_eq!(
            source.field_value(&cursor, "body", false),
            Some(Value::from("<b>hi</b>"))
        );
    }

    #[test]
    fn manifest_loads_plain_and_formatted_sub_fields() {
        let source = MemorySource::from_toml_str(
            r#"
            current = "42"

            [[records."42".gallery]]
            image = "one.jpg"
            caption = { raw = "<b>One</b>", formatted = "One" }
            width = 640

            [[records."42".gallery]]
            image = "two.jpg"
            "#,
        )
        .unwrap();

        assert_eq!(source.row_count(&RecordRef::Current, "gallery"), 2);

        let mut cursor = source.begin("gallery", &RecordRef::Current);
        assert!(source.advance(&mut cursor));
        assert_eq!(
            source.field_value(&cursor, "caption", true),
            Some(Value::from("One"))
        );
        assert_eq!(
            source.field_value(&cursor, "caption", false),
            Some(Value::from("<b>One</b>"))
        );
        assert_eq!(
            source.field_value(&cursor, "width", true),
            Some(Value::Integer(640))
        );
    }

    #[test]
    fn manifest_rejects_unknown_top_level_keys() {
        let err = MemorySource::from_toml_str("rows = 3").unwrap_err();
        assert!(matches!(
            err,
            crate::error::RepeaterError::TomlDeError(_)
        ));
    }
}
