//! # Flatshape - Nested Value Flattening Toolkit
//!
//! Derives deterministic dotted field paths ("headers") from arbitrarily
//! nested values and flattens those values into ordered `[path, value]`
//! rows, ready to be laid out as a two-dimensional table.
//!
//! ## Modules
//!
//! - **shape**: normalize optional references, resolve field keys, generate field paths
//! - **flatten**: flatten values, reconcile them against headers, rebuild records from tables
//! - **input**: read JSON documents for the command-line front ends
//!
//! ## Quick Start
//!
//! ```rust
//! use flatshape::{flatten_struct_fields, generate_field_names, FieldDescriptor, Options, RecordBuilder};
//!
//! # fn main() -> flatshape::Result<()> {
//! let tags = vec!["x".to_string(), "y".to_string()];
//! let user = RecordBuilder::new("User")
//!     .field(FieldDescriptor::new("Name"), "Ann")
//!     .field(FieldDescriptor::new("Tags"), &tags)
//!     .build();
//!
//! let headers = generate_field_names("", &user, &Options::default())?;
//! assert_eq!(headers, vec!["name", "tags.00", "tags.01"]);
//!
//! let flat = flatten_struct_fields(&user, &Options::new().with_generate())?;
//! assert_eq!(flat.rows[0], ["name".to_string(), "Ann".to_string()]);
//! # Ok(())
//! # }
//! ```

use tracing::debug;

pub mod error;
pub mod flatten;
pub mod input;
pub mod introspect;
pub mod path;
pub mod shape;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use flatten::{
    assemble, flatten_node, prune_to_headers, table_to_structs, to_map, to_pretty_json, Assembled, FlatMap,
};
pub use introspect::{Introspect, RecordBuilder};
pub use shape::{generate_node_field_names, merge_fields, normalize, resolve_key, NodeView, ResolvedKey};
pub use types::{
    Field, FieldDescriptor, Leaf, Mapping, Node, Optional, Options, Record, Sequence, Tag, TagFamily, TargetKind,
    NIL_PLACEHOLDER,
};

/// Ordered `[path, value]` rows of one flattened record
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlatRows {
    pub rows: Vec<[String; 2]>,
    /// Headers after assembly: matched prefixes replaced by full paths, leftovers appended
    pub headers: Vec<String>,
}

impl From<Assembled> for FlatRows {
    fn from(assembled: Assembled) -> Self {
        FlatRows {
            rows: assembled.rows,
            headers: assembled.headers,
        }
    }
}

/// Derive the ordered field paths describing `value`
pub fn generate_field_names<T: Introspect + ?Sized>(prefix: &str, value: &T, options: &Options) -> Result<Vec<String>> {
    let fields = generate_node_field_names(prefix, &value.to_node(), options)?;
    debug!(prefix, count = fields.len(), "generated field names");
    Ok(fields)
}

/// Main entry point: flatten a record into ordered `[path, value]` rows.
///
/// Headers come from `options.headers`, or are generated from the value when
/// `options.generate` is set and none were supplied. Unless generating, the
/// flattened keys are pruned to the supplied headers and every header that
/// matched nothing is emitted with an empty value.
pub fn flatten_struct_fields<T: Introspect + ?Sized>(value: &T, options: &Options) -> Result<FlatRows> {
    let node = value.to_node();
    match normalize(&node) {
        NodeView::Record(_) => {}
        other => {
            return Err(Error::UnsupportedShape {
                expected: "record",
                found: other.kind_name(),
            });
        }
    }

    let supplied = options.headers.as_ref().filter(|headers| !headers.is_empty());
    let headers = match supplied {
        Some(headers) => headers.clone(),
        None if options.generate => generate_node_field_names("", &node, options)?,
        None => options.headers.clone().unwrap_or_default(),
    };

    let mut flat = FlatMap::new();
    flatten_node(&node, "", &mut flat, options)?;

    if !options.generate {
        if let Some(requested) = &options.headers {
            let before = flat.len();
            flat = prune_to_headers(flat, requested);
            debug!(before, after = flat.len(), "pruned flattened keys to headers");
        }
    }

    Ok(assemble(&flat, &headers).into())
}
