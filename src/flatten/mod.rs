//! Flattening values into path → value rows
//!
//! The flattener walks a node and stringifies every leaf under its dotted
//! path. The table step reconciles the result against a header list, and the
//! conversions rebuild records from string tables or render JSON maps.

pub mod convert;
pub mod flattener;
pub mod table;

pub use convert::{sanitize_identifier, table_to_structs, to_map, to_pretty_json};
pub use flattener::{flatten_node, FlatMap};
pub use table::{assemble, prune_to_headers, Assembled};
