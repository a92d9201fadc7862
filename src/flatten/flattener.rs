//! Recursive flattening of a node into a path → string mapping

use crate::error::{Error, Result};
use crate::path::{index_segment, index_width, join};
use crate::shape::{normalize, resolve_key, NodeView, ResolvedKey};
use crate::types::{Mapping, Node, Options, Record, NIL_PLACEHOLDER};
use std::collections::BTreeMap;

/// Flattened path → stringified value mapping
pub type FlatMap = BTreeMap<String, String>;

/// Flatten `node` into `into`, keying every leaf by its dotted path under `prefix`.
///
/// Empty top-level sequences and mappings contribute nothing; empty ones
/// reached through a field emit an empty string at their own path.
pub fn flatten_node(node: &Node, prefix: &str, into: &mut FlatMap, options: &Options) -> Result<()> {
    match normalize(node) {
        NodeView::Record(record) => flatten_record(record, prefix, into, options),
        NodeView::Mapping(mapping) => flatten_mapping(mapping, prefix, into, options),
        NodeView::Sequence(seq) => {
            let width = index_width(seq.len());
            for (index, element) in seq.elements.iter().enumerate() {
                flatten_value(element, &join(prefix, &index_segment(index, width)), into, options)?;
            }
            Ok(())
        }
        NodeView::Leaf(leaf) => insert(into, prefix.to_string(), leaf.to_string()),
        NodeView::Absent(_) if options.exclude_nil => Ok(()),
        NodeView::Absent(_) => insert(into, prefix.to_string(), NIL_PLACEHOLDER.to_string()),
    }
}

fn flatten_record(record: &Record, prefix: &str, into: &mut FlatMap, options: &Options) -> Result<()> {
    for field in &record.fields {
        let key = match resolve_key(&field.descriptor) {
            ResolvedKey::Key(key) => key,
            ResolvedKey::Suppressed => continue,
        };

        let inline = field.descriptor.is_inline();
        if field.value.is_absent() {
            if !(options.exclude_nil || inline) {
                insert(into, join(prefix, &key), NIL_PLACEHOLDER.to_string())?;
            }
            continue;
        }

        if inline {
            match normalize(&field.value) {
                NodeView::Record(child) => {
                    flatten_record(child, prefix, into, options)?;
                    continue;
                }
                NodeView::Mapping(child) => {
                    flatten_mapping(child, prefix, into, options)?;
                    continue;
                }
                _ => {}
            }
        }

        flatten_value(&field.value, &join(prefix, &key), into, options)?;
    }
    Ok(())
}

fn flatten_mapping(mapping: &Mapping, prefix: &str, into: &mut FlatMap, options: &Options) -> Result<()> {
    for (key, value) in mapping.sorted_entries() {
        flatten_value(value, &join(prefix, key), into, options)?;
    }
    Ok(())
}

fn flatten_value(node: &Node, path: &str, into: &mut FlatMap, options: &Options) -> Result<()> {
    match normalize(node) {
        NodeView::Mapping(mapping) if mapping.is_empty() => insert(into, path.to_string(), String::new()),
        NodeView::Sequence(seq) if seq.is_empty() => insert(into, path.to_string(), String::new()),
        _ => flatten_node(node, path, into, options),
    }
}

fn insert(into: &mut FlatMap, path: String, value: String) -> Result<()> {
    if into.contains_key(&path) {
        return Err(Error::DuplicateKey { path });
    }
    into.insert(path, value);
    Ok(())
}
