//! Reconciling a flat mapping against a header list

use crate::flatten::flattener::FlatMap;
use crate::path::{compare_in_group, matches_header};
use std::collections::HashSet;
use tracing::debug;

/// Rows in output order plus the headers that produced them
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assembled {
    pub rows: Vec<[String; 2]>,
    /// Matched keys in row order; prefixes are replaced by the full paths they matched
    pub headers: Vec<String>,
}

/// Keep only keys at or under one of `headers`.
///
/// A header that matches nothing is still emitted with an empty value, so
/// every requested header shows up in the output.
pub fn prune_to_headers(flat: FlatMap, headers: &[String]) -> FlatMap {
    let unmatched: Vec<&String> = headers
        .iter()
        .filter(|header| !flat.keys().any(|key| matches_header(key, header)))
        .collect();

    let mut kept: FlatMap = flat
        .into_iter()
        .filter(|(key, _)| headers.iter().any(|header| matches_header(key, header)))
        .collect();

    for header in unmatched {
        kept.insert(header.clone(), String::new());
    }
    kept
}

/// Order flat entries by header.
///
/// Each header collects the keys equal to it or under it that no earlier
/// header claimed, sorted with the header itself first and numeric segments
/// in numeric order. Keys that no header claims follow in lexicographic order.
pub fn assemble(flat: &FlatMap, headers: &[String]) -> Assembled {
    let mut assembled = Assembled::default();
    let mut claimed: HashSet<&String> = HashSet::new();

    for header in headers {
        let mut group: Vec<&String> = flat
            .keys()
            .filter(|key| !claimed.contains(key) && matches_header(key, header))
            .collect();
        group.sort_by(|a, b| compare_in_group(header, a, b));

        for key in group {
            claimed.insert(key);
            assembled.push(key, &flat[key]);
        }
    }

    let mut leftovers: Vec<&String> = flat.keys().filter(|key| !claimed.contains(key)).collect();
    leftovers.sort();

    if !leftovers.is_empty() {
        debug!(count = leftovers.len(), "appending keys not claimed by any header");
    }
    for key in leftovers {
        assembled.push(key, &flat[key]);
    }

    assembled
}

impl Assembled {
    fn push(&mut self, key: &str, value: &str) {
        self.headers.push(key.to_string());
        self.rows.push([key.to_string(), value.to_string()]);
    }
}
