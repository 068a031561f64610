//! # Audience Editors
//!
//! Batch editors for tag groups and attributes on a channel or named user.
//!
//! ## Overview
//!
//! Editors accumulate mutations in memory and, on an explicit `apply`,
//! compact them into a minimal, conflict-free batch that is handed to an
//! [`OperationSink`] supplied at construction (in practice a closure posting a
//! native command).
//!
//! - [`TagGroupEditor`]: per group and per tag, the last add/remove intent wins
//! - [`AttributeEditor`]: per key, the last set/remove wins with its timestamp
//!
//! Both editors are single-use: `apply` consumes them. Invalid input is
//! rejected with [`EditorError`] and logged; a rejected call never touches the
//! pending log.
//!
//! ## Usage
//!
//! ```
//! use core_editors::TagGroupEditor;
//! use bridge_traits::TagGroupOperation;
//!
//! let mut editor = TagGroupEditor::new(|ops: Vec<TagGroupOperation>| {
//!     assert_eq!(ops.len(), 1);
//! });
//! editor.add_tags("loyalty", ["gold"]).unwrap();
//! editor.apply();
//! ```

pub mod attributes;
pub mod error;
pub mod sink;
pub mod tag_groups;

pub use attributes::{attribute_value_from_json, compact_attribute_operations, AttributeEditor};
pub use error::{EditorError, Result};
pub use sink::OperationSink;
pub use tag_groups::{compact_tag_operations, PendingTagOperation, TagGroupEditor};
