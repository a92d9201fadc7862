//! Field-name generation
//!
//! Derives the ordered set of dotted paths that describe a value's shape.
//! A sequence handed to the generator directly is treated as a set of rows:
//! each element's shape is generated under the same prefix and the results
//! are union-merged, since elements need not share one shape. Sequences
//! reached through a field or mapping entry are addressed by index instead,
//! mirroring the flattener.

use crate::error::{Error, Result};
use crate::path::{compare_paths, index_segment, index_width, join};
use crate::shape::keys::{resolve_key, ResolvedKey};
use crate::shape::normalize::{normalize, NodeView};
use crate::types::{Mapping, Node, Options, Record, Sequence};
use std::collections::HashSet;
use tracing::trace;

/// Ordered path list that rejects duplicates
#[derive(Debug, Default)]
struct PathList {
    paths: Vec<String>,
    seen: HashSet<String>,
}

impl PathList {
    fn push(&mut self, path: String) -> Result<()> {
        if !self.seen.insert(path.clone()) {
            return Err(Error::DuplicateKey { path });
        }
        self.paths.push(path);
        Ok(())
    }

    fn extend(&mut self, paths: Vec<String>) -> Result<()> {
        for path in paths {
            self.push(path)?;
        }
        Ok(())
    }
}

/// Generate the field paths of `node` under `prefix`
pub fn generate_node_field_names(prefix: &str, node: &Node, options: &Options) -> Result<Vec<String>> {
    let mut fields = collect_field_names(prefix, node, options)?;
    if options.sort {
        fields.sort_by(|a, b| compare_paths(a, b));
    }
    Ok(fields)
}

fn collect_field_names(prefix: &str, node: &Node, options: &Options) -> Result<Vec<String>> {
    match normalize(node) {
        NodeView::Record(record) => {
            let mut out = PathList::default();
            record_field_names(prefix, record, options, &mut out)?;
            Ok(out.paths)
        }
        NodeView::Mapping(mapping) => {
            let mut out = PathList::default();
            mapping_field_names(prefix, mapping, options, &mut out)?;
            Ok(out.paths)
        }
        NodeView::Sequence(seq) => sequence_field_names(prefix, seq, options),
        NodeView::Absent(_) => Ok(Vec::new()),
        NodeView::Leaf(_) => Ok(vec![prefix.to_string()]),
    }
}

fn record_field_names(prefix: &str, record: &Record, options: &Options, out: &mut PathList) -> Result<()> {
    for field in &record.fields {
        let key = match resolve_key(&field.descriptor) {
            ResolvedKey::Key(key) => key,
            ResolvedKey::Suppressed => continue,
        };

        let inline = field.descriptor.is_inline();
        if field.value.is_absent() {
            // Inlined absent references contribute nothing to the parent
            if options.exclude_nil || inline {
                trace!(field = %field.descriptor.name, "skipping absent field");
                continue;
            }
            out.push(join(prefix, &key))?;
            continue;
        }

        if inline {
            match normalize(&field.value) {
                NodeView::Record(child) => {
                    record_field_names(prefix, child, options, out)?;
                    continue;
                }
                NodeView::Mapping(child) => {
                    mapping_field_names(prefix, child, options, out)?;
                    continue;
                }
                _ => {}
            }
        }

        value_field_names(&join(prefix, &key), &field.value, options, out)?;
    }
    Ok(())
}

fn mapping_field_names(prefix: &str, mapping: &Mapping, options: &Options, out: &mut PathList) -> Result<()> {
    for (key, value) in mapping.sorted_entries() {
        value_field_names(&join(prefix, key), value, options, out)?;
    }
    Ok(())
}

/// Paths for a value reached through a field, mapping entry or sequence index
fn value_field_names(path: &str, node: &Node, options: &Options, out: &mut PathList) -> Result<()> {
    match normalize(node) {
        NodeView::Record(record) => record_field_names(path, record, options, out),
        NodeView::Mapping(mapping) if mapping.is_empty() => out.push(path.to_string()),
        NodeView::Mapping(mapping) => mapping_field_names(path, mapping, options, out),
        NodeView::Sequence(seq) if seq.is_empty() => out.push(path.to_string()),
        NodeView::Sequence(seq) => {
            let width = index_width(seq.len());
            for (index, element) in seq.elements.iter().enumerate() {
                value_field_names(&join(path, &index_segment(index, width)), element, options, out)?;
            }
            Ok(())
        }
        NodeView::Absent(_) if options.exclude_nil => Ok(()),
        NodeView::Absent(_) | NodeView::Leaf(_) => out.push(path.to_string()),
    }
}

fn sequence_field_names(prefix: &str, seq: &Sequence, options: &Options) -> Result<Vec<String>> {
    if seq.is_empty() {
        return Err(Error::EmptySequence {
            path: prefix.to_string(),
        });
    }

    let mut merged: Option<Vec<String>> = None;
    for element in seq.elements.iter().filter(|e| !e.is_absent()) {
        let candidate = collect_field_names(prefix, element, options)?;
        merged = Some(match merged {
            None => candidate,
            Some(base) => merge_fields(base, candidate),
        });
    }

    match merged {
        Some(fields) => Ok(fields),
        None => {
            trace!(prefix, "no present elements, using element zero shape");
            match &seq.element_zero {
                Some(zero) => collect_field_names(prefix, zero, options),
                None => Ok(Vec::new()),
            }
        }
    }
}

/// Union of two field lists: `base` keeps its order and unseen candidate
/// paths are appended in candidate order.
pub fn merge_fields(base: Vec<String>, candidate: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = base.iter().cloned().collect();
    let mut merged = base;
    for path in candidate {
        if seen.insert(path.clone()) {
            merged.push(path);
        }
    }
    merged
}
