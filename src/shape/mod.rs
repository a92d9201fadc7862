//! Shape introspection
//!
//! Normalizes optional references, resolves external field keys, and
//! derives the dotted field paths describing a value.

pub mod fields;
pub mod keys;
pub mod normalize;

pub use fields::{generate_node_field_names, merge_fields};
pub use keys::{lower_first, resolve_key, ResolvedKey};
pub use normalize::{normalize, NodeView};
