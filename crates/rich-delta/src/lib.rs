//! Rich-text change lists.
//!
//! A [`Delta`] describes an edit to a document made of text, inline formats
//! and embeds as a canonical list of [`Op`]s (insert / delete / retain). Deltas
//! can be composed, inverted against the document they applied to, transformed
//! against concurrent edits, sliced, and walked line by line.
//!
//! # Example
//!
//! ```
//! use rich_delta::Delta;
//! use serde_json::json;
//!
//! let mut doc = Delta::new();
//! doc.insert("Hello world\n", None);
//!
//! let mut change = Delta::new();
//! change
//!     .retain(6, json!({"bold": true}).as_object().cloned())
//!     .delete(5)
//!     .insert("there", None);
//!
//! let edited = doc.compose(&change);
//! assert_eq!(edited.plain_text(), "Hello there\n");
//!
//! // Undo restores the original document.
//! let undo = change.invert(&doc);
//! assert_eq!(edited.compose(&undo), doc);
//! ```

pub mod attributes;
pub mod codec;
pub mod delta;
pub mod error;
pub mod iterator;
pub mod lines;
pub mod op;

pub use attributes::AttributeMap;
pub use delta::Delta;
pub use error::DeltaError;
pub use iterator::OpIterator;
pub use lines::{Lines, DEFAULT_LINE_SEPARATOR};
pub use op::{InsertValue, Op, OpType};
