//! The repeater source seam.
//!
//! A [`RepeaterSource`] is whatever actually stores repeater rows: a
//! content-management backend, or the bundled [`memory::MemorySource`]. The
//! trait deals in explicit traversal handles: every pass over a field gets
//! its own [`RepeaterSource::Cursor`], and every call names the handle it
//! operates on. There is no "current field" or "current row" hidden inside
//! the source, so overlapping passes (nested loops, the same field twice)
//! are well-defined and independent.
//!
//! Absence is never an error at this seam. An unknown field or record
//! produces a handle whose first [`advance`](RepeaterSource::advance) is
//! `false`; an unknown sub-field name produces `None`. Callers that need to
//! tell "missing" from "empty" must ask the backing store directly.

use crate::value::{RecordRef, Row, Value};

pub mod memory;

/// A source of repeater / flexible-content rows, traversed through explicit
/// per-pass cursor handles.
///
/// The traversal contract is check-then-advance:
///
/// 1. [`begin`](Self::begin) hands back a fresh handle positioned before the
///    first row;
/// 2. each [`advance`](Self::advance) moves the handle to the next row and
///    reports whether one became current (the advancing call, not a peek);
/// 3. [`current_row`](Self::current_row) and
///    [`field_value`](Self::field_value) read the row the handle currently
///    selects, and return nothing until the first successful `advance`.
pub trait RepeaterSource {
    /// Owned traversal handle. All per-pass state lives here, which is what
    /// makes simultaneous passes safe. Cursor types do not implement
    /// `Clone`, `Serialize` or `Deserialize`; a half-advanced handle can be
    /// neither duplicated nor persisted.
    type Cursor;

    /// Start a fresh pass over `field` on `record`. The returned handle sits
    /// before the first row; a field or record the source does not know
    /// yields a handle that is immediately exhausted.
    fn begin(&self, field: &str, record: &RecordRef) -> Self::Cursor;

    /// Advance the handle to the next row. Returns `true` iff a row became
    /// current.
    fn advance(&self, cursor: &mut Self::Cursor) -> bool;

    /// Materialize the currently-selected row, resolving each sub-field
    /// against `format`. `None` before the first `advance`, after
    /// exhaustion, or when the handle points at nothing.
    fn current_row(&self, cursor: &Self::Cursor, format: bool) -> Option<Row>;

    /// A single sub-field of the currently-selected row. `None` for names
    /// the row does not carry.
    fn field_value(&self, cursor: &Self::Cursor, name: &str, format: bool) -> Option<Value>;
}

/// Look up one sub-field of whatever row `cursor` currently selects.
///
/// A free function rather than a method on [`crate::rows::Rows`]: the lookup
/// touches none of the iterator's own state, only the source and a handle,
/// so it is usable from any code that holds the two, including the middle
/// of a manual traversal loop via [`crate::rows::Rows::cursor`].
///
/// # Examples
///
/// ```
/// use repeater_rows::prelude::*;
/// use repeater_rows::source::sub_field;
///
/// let mut source = MemorySource::new();
/// source.insert_rows("42", "gallery", [StoredRow::new().with("image", "one.jpg")]);
///
/// let mut rows = Rows::new(&source, Binding::builder().field("gallery").record("42").build());
/// assert!(rows.valid());
/// let image = sub_field(&source, rows.cursor(), "image", true);
/// assert_eq!(image.as_ref().and_then(Value::as_str), Some("one.jpg"));
/// ```
pub fn sub_field<S: RepeaterSource>(
    source: &S,
    cursor: &S::Cursor,
    name: &str,
    format: bool,
) -> Option<Value> {
    source.field_value(cursor, name, format)
}
