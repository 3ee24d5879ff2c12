//! The row iterator.
//!
//! [`Rows`] turns the imperative check-then-advance idiom of a repeater
//! source into ordinary iteration. Instead of
//!
//! ```text
//! let mut cursor = source.begin("gallery", &record);
//! while source.advance(&mut cursor) {
//!     let row = source.current_row(&cursor, true);
//!     // ...
//! }
//! ```
//!
//! callers write:
//!
//! ```
//! use repeater_rows::prelude::*;
//!
//! let mut source = MemorySource::new();
//! source.insert_rows("42", "gallery", [
//!     StoredRow::new().with("image", "one.jpg"),
//!     StoredRow::new().with("image", "two.jpg"),
//! ]);
//!
//! let binding = Binding::builder().field("gallery").record("42").build();
//! for (i, row) in Rows::new(&source, binding) {
//!     let image = row.get("image").and_then(Value::as_str).unwrap();
//!     println!("row {i}: {image}");
//! }
//! ```
//!
//! A `Rows` owns its traversal handle outright. It is not `Clone` and not
//! serializable, so there is exactly one live handle per pass and no way to
//! persist one across process boundaries; restart a pass with
//! [`Rows::rewind`] instead of duplicating it.

use std::fmt;

use log::debug;
use typed_builder::TypedBuilder;

use crate::source::RepeaterSource;
use crate::value::{RecordRef, Row};

/// What a [`Rows`] traverses: a field on a record, and whether materialized
/// values go through the source's formatting step.
///
/// # Examples
///
/// ```
/// use repeater_rows::rows::Binding;
/// use repeater_rows::value::RecordRef;
///
/// // Record and formatting default to `Current` and `true`.
/// let binding = Binding::builder().field("gallery").build();
/// assert_eq!(binding.record, RecordRef::Current);
/// assert!(binding.format);
///
/// let raw = Binding::builder()
///     .field("gallery")
///     .record("42")
///     .format(false)
///     .build();
/// assert_eq!(raw.record, RecordRef::Id("42".to_owned()));
/// ```
#[derive(Debug, Clone, PartialEq, TypedBuilder)]
#[builder(doc)]
pub struct Binding {
    /// Name of the repeater or flexible-content field to traverse.
    #[builder(setter(into))]
    pub field: String,

    /// The record owning the field; defaults to the source's current record.
    #[builder(default, setter(into))]
    pub record: RecordRef,

    /// Whether materialized values pass through the source's formatting
    /// step.
    #[builder(default = true)]
    pub format: bool,
}

impl Binding {
    /// Shorthand for a formatted traversal of `field` on the current record.
    pub fn over(field: impl Into<String>) -> Self {
        Binding::builder().field(field).build()
    }
}

/// A lazily-evaluated, restartable iterator over the rows of one repeater
/// field.
///
/// Construction primes the source, so a fresh `Rows` is immediately ready
/// to iterate. The same object can be pointed at a different field or
/// record with [`rebind`](Rows::rebind): the traversal restarts from the
/// top, and any progress through the previous binding is discarded.
///
/// Besides the [`Iterator`] impl, the underlying protocol is available as
/// explicit methods for callers that want to drive it by hand:
/// [`valid`](Rows::valid) (the advancing check), [`current`](Rows::current)
/// (materialize), [`key`](Rows::key) (iteration index) and
/// [`step`](Rows::step) (bump the index). `valid` must come before
/// `current`; before the first successful `valid` there is no current row.
pub struct Rows<'s, S: RepeaterSource> {
    source: &'s S,
    binding: Binding,
    cursor: S::Cursor,
    index: usize,
}

impl<'s, S: RepeaterSource> Rows<'s, S> {
    /// Bind to a field and prime the source for a fresh pass.
    pub fn new(source: &'s S, binding: Binding) -> Self {
        debug!(
            "Rows: starting pass over field {:?} on record {}",
            binding.field, binding.record
        );
        let cursor = source.begin(&binding.field, &binding.record);
        Rows {
            source,
            binding,
            cursor,
            index: 0,
        }
    }

    /// Shorthand for a formatted traversal of `field` on the current record.
    pub fn over(source: &'s S, field: impl Into<String>) -> Self {
        Rows::new(source, Binding::over(field))
    }

    /// Re-point this iterator at a different binding and restart. The
    /// object is reconfigured in place; whatever remained of the previous
    /// pass is gone.
    pub fn rebind(&mut self, binding: Binding) {
        debug!(
            "Rows: rebinding from field {:?} on record {} to field {:?} on record {}",
            self.binding.field, self.binding.record, binding.field, binding.record
        );
        self.binding = binding;
        self.rewind();
    }

    /// Restart the traversal: reset the iteration index and re-prime the
    /// source. Always does both, whether or not the pass ever advanced.
    pub fn rewind(&mut self) {
        self.index = 0;
        self.cursor = self.source.begin(&self.binding.field, &self.binding.record);
    }

    /// Advance the source to the next row and report whether one became
    /// current. This is the call that moves the source cursor; it is not a
    /// peek, and calling it twice skips a row.
    pub fn valid(&mut self) -> bool {
        self.source.advance(&mut self.cursor)
    }

    /// Materialize the currently-selected row, resolving values against the
    /// binding's format flag. `None` before the first successful
    /// [`valid`](Rows::valid) and after exhaustion.
    pub fn current(&self) -> Option<Row> {
        self.source.current_row(&self.cursor, self.binding.format)
    }

    /// The iteration index: 0 while the first row is current.
    pub fn key(&self) -> usize {
        self.index
    }

    /// Bump the iteration index by one. Touches nothing in the source;
    /// pairing it with [`valid`](Rows::valid) is what keeps
    /// [`key`](Rows::key) in lockstep with the rows.
    pub fn step(&mut self) {
        self.index += 1;
    }

    /// The traversal handle, for [`crate::source::sub_field`] lookups
    /// mid-pass.
    pub fn cursor(&self) -> &S::Cursor {
        &self.cursor
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }
}

impl<S: RepeaterSource> Iterator for Rows<'_, S> {
    type Item = (usize, Row);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.valid() {
            return None;
        }
        let row = self.current()?;
        let key = self.key();
        self.step();
        Some((key, row))
    }
}

impl<S: RepeaterSource> fmt::Debug for Rows<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rows")
            .field("binding", &self.binding)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::memory::{MemorySource, StoredRow};
    use crate::value::Value;

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

    fn images(rows: Rows<'_, MemorySource>) -> Vec<(usize, String)> {
        rows.map(|(i, row)| {
            let image = row.get("image").and_then(Value::as_str).unwrap().to_owned();
            (i, image)
        })
        .collect()
    }

    #[test]
    fn iteration_yields_keys_and_rows_in_order() {
        let source = gallery_source();
        let binding = Binding::builder().field("gallery").record("42").build();

        assert_eq!(
            images(Rows::new(&source, binding)),
            [
                (0, "one.jpg".to_owned()),
                (1, "two.jpg".to_owned()),
                (2, "three.jpg".to_owned()),
            ]
        );
    }

    #[test]
    fn manual_protocol_matches_iteration() {
        let source = gallery_source();
        let mut rows = Rows::new(
            &source,
            Binding::builder().field("gallery").record("42").build(),
        );

        let mut seen = Vec::new();
        while rows.valid() {
            let row = rows.current().unwrap();
            seen.push((rows.key(), row.get("image").cloned().unwrap()));
            rows.step();
        }

        assert_eq!(
            seen,
            [
                (0, Value::from("one.jpg")),
                (1, Value::from("two.jpg")),
                (2, Value::from("three.jpg")),
            ]
        );
        assert!(!rows.valid());
    }

    #[test]
    fn current_before_valid_is_none() {
        let source = gallery_source();
        let rows = Rows::new(
            &source,
            Binding::builder().field("gallery").record("42").build(),
        );
        assert_eq!(rows.current(), None);
    }

    #[test]
    fn empty_field_is_immediately_exhausted() {
        let source = gallery_source();
        let mut rows = Rows::new(
            &source,
            Binding::builder().field("sidebar").record("42").build(),
        );

        assert!(!rows.valid());
        assert_eq!(rows.current(), None);
        assert_eq!(Rows::new(&source, Binding::over("sidebar")).count(), 0);
    }

    #[test]
    fn rewind_restarts_from_the_top() {
        let source = gallery_source();
        let mut rows = Rows::new(
            &source,
            Binding::builder().field("gallery").record("42").build(),
        );

        // Consume part of the pass, then rewind.
        assert!(rows.valid());
        assert!(rows.valid());
        rows.rewind();

        assert_eq!(rows.key(), 0);
        assert!(rows.valid());
        assert_eq!(
            rows.current().unwrap().get("image"),
            Some(&Value::from("one.jpg"))
        );
    }

    #[test]
    fn rebind_reconfigures_the_same_object() {
        let mut source = gallery_source();
        source.insert_rows("7", "links", [StoredRow::new().with("url", "a")]);

        let mut rows = Rows::new(
            &source,
            Binding::builder().field("gallery").record("42").build(),
        );
        assert!(rows.valid());

        rows.rebind(Binding::builder().field("links").record("7").build());
        assert_eq!(rows.binding().field, "links");
        assert_eq!(rows.key(), 0);

        let collected: Vec<_> = rows.collect();
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].1.get("url"), Some(&Value::from("a")));
    }

    #[test]
    fn independent_passes_do_not_disturb_each_other() {
        let source = gallery_source();
        let outer_binding = Binding::builder().field("gallery").record("42").build();

        let mut pairs = Vec::new();
        for (i, outer) in Rows::new(&source, outer_binding.clone()) {
            for (j, inner) in Rows::new(&source, outer_binding.clone()) {
                pairs.push((
                    i,
                    j,
                    outer.get("image").cloned().unwrap(),
                    inner.get("image").cloned().unwrap(),
                ));
            }
        }

        // Full cross product: the nested pass never corrupts the outer one.
        assert_eq!(pairs.len(), 9);
        assert_eq!(pairs[0].0, 0);
        assert_eq!(pairs[8].1, 2);
    }

    #[test]
    fn format_flag_flows_through_materialization() {
        let mut source = MemorySource::new();
        source.insert_rows(
            "7",
            "blocks",
            [StoredRow::new().with_formatted("body", "<b>hi</b>", "hi")],
        );

        let formatted: Vec<_> = Rows::new(
            &source,
            Binding::builder().field("blocks").record("7").build(),
        )
        .collect();
        assert_eq!(formatted[0].1.get("body"), Some(&Value::from("hi")));

        let raw: Vec<_> = Rows::new(
            &source,
            Binding::builder()
                .field("blocks")
                .record("7")
                .format(false)
                .build(),
        )
        .collect();
        assert_eq!(raw[0].1.get("body"), Some(&Value::from("<b>hi</b>")));
    }
}
