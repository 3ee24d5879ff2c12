//! # repeater_rows
//!
//! A lazily-evaluated, restartable row iterator over repeater and
//! flexible-content fields of content records.
//!
//! Content sources expose repeater traversal as an imperative
//! check-then-advance loop: ask whether another row exists (which also moves
//! an internal cursor), materialize the row that became current, repeat.
//! This crate wraps that idiom in ordinary Rust iteration.
//!
//! ## Features
//!
//! - **Standard iteration**: `Rows` implements [`Iterator`], yielding
//!   `(index, row)` pairs; the explicit valid/current/step protocol stays
//!   available for manual loops
//! - **Explicit traversal handles**: the [`source::RepeaterSource`] seam
//!   threads a per-pass cursor through every call; with no ambient
//!   "current row" state, nested and interleaved passes are safe
//! - **Restartable and rebindable**: `rewind` restarts a pass; `rebind`
//!   re-points the same iterator at another field or record
//! - **Single live handle**: iterators and cursors are neither cloneable
//!   nor serializable, so a half-consumed pass cannot be duplicated
//! - **Fixture manifests**: the in-memory source loads row data from TOML
//!   documents for tests and examples
//!
//! ## Quick Start
//!
//! ```
//! use repeater_rows::prelude::*;
//!
//! let source = MemorySource::from_toml_str(r#"
//!     current = "42"
//!
//!     [[records."42".gallery]]
//!     image = "one.jpg"
//!
//!     [[records."42".gallery]]
//!     image = "two.jpg"
//! "#)?;
//!
//! for (i, row) in Rows::over(&source, "gallery") {
//!     let image = row.get("image").and_then(Value::as_str).unwrap();
//!     println!("{i}: {image}");
//! }
//! # Ok::<(), repeater_rows::error::RepeaterError>(())
//! ```

pub mod error;
pub mod prelude;
pub mod rows;
pub mod source;
pub mod value;
