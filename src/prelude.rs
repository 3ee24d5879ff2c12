//! Prelude module for convenient imports.
//!
//! Re-exports the types and traits most traversals touch, so users can get
//! started with a single import.
//!
//! # Usage
//!
//! ```rust,ignore
//! use repeater_rows::prelude::*;
//! ```
//!
//! # What's Included
//!
//! ## Iteration
//!
//! - [`Rows`]: the row iterator
//! - [`Binding`]: field / record / format configuration for a pass
//!
//! ## Source seam
//!
//! - [`RepeaterSource`]: the trait a row source implements
//! - [`sub_field`]: free-function sub-field lookup against a handle
//! - [`MemorySource`], [`StoredRow`], [`FieldValue`]: the in-memory
//!   reference source and its stored row form
//!
//! ## Data model
//!
//! - [`Value`], [`Row`], [`RecordRef`]
//!
//! ## Error handling
//!
//! - [`RepeaterError`], [`RepeaterResult`]
//!
//! # Not Included
//!
//! Source cursor types ([`crate::source::memory::MemoryCursor`]) stay out of
//! the prelude: code only names them when implementing a source, and keeping
//! them explicit underlines that handles are not general-purpose values.

pub use crate::error::{RepeaterError, RepeaterResult};
pub use crate::rows::{Binding, Rows};
pub use crate::source::memory::{FieldValue, MemorySource, StoredRow};
pub use crate::source::{RepeaterSource, sub_field};
pub use crate::value::{RecordRef, Row, Value};
