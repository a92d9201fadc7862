//! Conversions between nodes, JSON maps and string tables

use crate::error::{Error, Result};
use crate::introspect::Introspect;
use crate::shape::{normalize, resolve_key, NodeView, ResolvedKey};
use crate::types::{FieldDescriptor, Leaf, Mapping, Node, Record, Tag, TagFamily};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Number, Value};
use std::collections::HashSet;
use tracing::debug;

static NON_IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}_]").unwrap());

/// Convert a record (or mapping) to a JSON map keyed by external field keys.
///
/// With `include_zero` unset, record fields holding zero values are skipped.
pub fn to_map<T: Introspect + ?Sized>(value: &T, include_zero: bool) -> Result<Map<String, Value>> {
    let node = value.to_node();
    match normalize(&node) {
        NodeView::Record(record) => record_to_map(record, include_zero),
        NodeView::Mapping(mapping) => mapping_to_map(mapping, include_zero),
        other => Err(Error::UnsupportedShape {
            expected: "record or mapping",
            found: other.kind_name(),
        }),
    }
}

/// Render any value as indented JSON
pub fn to_pretty_json<T: Introspect + ?Sized>(value: &T) -> Result<String> {
    let json = node_to_json(&value.to_node(), true)?;
    Ok(serde_json::to_string_pretty(&json)?)
}

fn record_to_map(record: &Record, include_zero: bool) -> Result<Map<String, Value>> {
    let mut out = Map::new();
    for field in &record.fields {
        let key = match resolve_key(&field.descriptor) {
            ResolvedKey::Key(key) => key,
            ResolvedKey::Suppressed => continue,
        };
        if !include_zero && field.value.is_zero() {
            continue;
        }

        match node_to_json(&field.value, include_zero)? {
            Value::Object(child) if field.descriptor.is_inline() => {
                for (child_key, child_value) in child {
                    insert_unique(&mut out, child_key, child_value)?;
                }
            }
            value => insert_unique(&mut out, key, value)?,
        }
    }
    Ok(out)
}

fn mapping_to_map(mapping: &Mapping, include_zero: bool) -> Result<Map<String, Value>> {
    let mut out = Map::new();
    for (key, value) in mapping.sorted_entries() {
        out.insert(key.to_string(), node_to_json(value, include_zero)?);
    }
    Ok(out)
}

fn node_to_json(node: &Node, include_zero: bool) -> Result<Value> {
    let value = match node {
        Node::Record(record) => Value::Object(record_to_map(record, include_zero)?),
        Node::Mapping(mapping) => Value::Object(mapping_to_map(mapping, include_zero)?),
        Node::Sequence(seq) => Value::Array(
            seq.elements
                .iter()
                .map(|element| node_to_json(element, include_zero))
                .collect::<Result<Vec<_>>>()?,
        ),
        Node::Optional(opt) => match &opt.value {
            Some(inner) => node_to_json(inner, include_zero)?,
            None => Value::Null,
        },
        Node::Leaf(leaf) => leaf_to_json(leaf),
    };
    Ok(value)
}

fn leaf_to_json(leaf: &Leaf) -> Value {
    match leaf {
        Leaf::Str(s) => Value::String(s.clone()),
        Leaf::Int(n) => Value::Number((*n).into()),
        Leaf::UInt(n) => Value::Number((*n).into()),
        Leaf::Float(n) => Number::from_f64(*n).map(Value::Number).unwrap_or(Value::Null),
        Leaf::Bool(b) => Value::Bool(*b),
        Leaf::Timestamp(ts) => Value::String(ts.to_rfc3339()),
    }
}

fn insert_unique(out: &mut Map<String, Value>, key: String, value: Value) -> Result<()> {
    if out.contains_key(&key) {
        return Err(Error::DuplicateKey { path: key });
    }
    out.insert(key, value);
    Ok(())
}

/// Rebuild string-typed records from a table whose first row holds the headers.
///
/// Each header becomes a field named by [`sanitize_identifier`] whose `json`
/// tag is the original header text, so flattening a record with the header
/// row as headers gives back the table row.
pub fn table_to_structs(rows: &[Vec<String>]) -> Result<Vec<Record>> {
    let Some((header_row, data)) = rows.split_first() else {
        return Err(Error::InputEmpty);
    };

    let mut names = HashSet::new();
    let mut descriptors = Vec::with_capacity(header_row.len());
    for header in header_row {
        let name = sanitize_identifier(header);
        if !names.insert(name.clone()) {
            return Err(Error::DuplicateKey { path: name });
        }
        descriptors.push(FieldDescriptor::new(name).with_tag(TagFamily::Json, Tag::key(header.clone())));
    }

    let mut records = Vec::with_capacity(data.len());
    for (index, row) in data.iter().enumerate() {
        if row.len() != header_row.len() {
            return Err(Error::ShapeMismatch {
                row: index + 1,
                expected: header_row.len(),
                found: row.len(),
            });
        }

        let mut record = Record::new("Row");
        for (descriptor, cell) in descriptors.iter().zip(row) {
            record.push(descriptor.clone(), Node::str(cell.clone()));
        }
        records.push(record);
    }

    debug!(
        columns = header_row.len(),
        records = records.len(),
        "rebuilt records from table"
    );
    Ok(records)
}

/// Turn header text into a field identifier: `"Full Name"` → `"FullName"`.
///
/// Words are capitalised and joined, characters that cannot appear in an
/// identifier are dropped, and `Field` is prepended when the result does not
/// start with a letter or underscore.
pub fn sanitize_identifier(header: &str) -> String {
    let joined: String = header
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect();
    let name = NON_IDENTIFIER.replace_all(&joined, "").into_owned();

    match name.chars().next() {
        Some(first) if first.is_alphabetic() || first == '_' => name,
        _ => format!("Field{}", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::RecordBuilder;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn table(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("Full Name"), "FullName");
        assert_eq!(sanitize_identifier("age"), "Age");
        assert_eq!(sanitize_identifier("2nd place"), "Field2ndPlace");
        assert_eq!(sanitize_identifier("e-mail (work)"), "Emailwork");
        assert_eq!(sanitize_identifier(""), "Field");
        assert_eq!(sanitize_identifier("_id"), "_id");
    }

    #[test]
    fn test_table_to_structs() {
        let records = table_to_structs(&table(&[&["Full Name", "Age"], &["Ann", "30"]])).unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.field("FullName").map(|f| &f.value), Some(&Node::str("Ann")));
        assert_eq!(record.field("Age").map(|f| &f.value), Some(&Node::str("30")));
        assert_eq!(
            resolve_key(&record.fields[0].descriptor),
            ResolvedKey::Key("Full Name".into())
        );
    }

    #[test]
    fn test_table_errors() {
        assert!(matches!(table_to_structs(&[]), Err(Error::InputEmpty)));

        let err = table_to_structs(&table(&[&["a", "b"], &["1"]])).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { row: 1, expected: 2, found: 1 }));

        let err = table_to_structs(&table(&[&["a b", "AB"]])).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { .. }));
    }

    #[test]
    fn test_to_map_skips_zero() {
        let tags: Vec<String> = Vec::new();
        let node = RecordBuilder::new("User")
            .field(FieldDescriptor::new("Name"), "Ann")
            .field(FieldDescriptor::new("Age"), &0u32)
            .field(FieldDescriptor::new("Tags"), &tags)
            .field(FieldDescriptor::new("Secret").json("-"), "s")
            .build();

        assert_eq!(Value::Object(to_map(&node, false).unwrap()), json!({"name": "Ann"}));
        assert_eq!(
            Value::Object(to_map(&node, true).unwrap()),
            json!({"name": "Ann", "age": 0, "tags": []})
        );
    }

    #[test]
    fn test_to_map_nested_and_mapping() {
        let address = RecordBuilder::new("Address").field(FieldDescriptor::new("City"), "Oslo").build();
        let node = RecordBuilder::new("User")
            .node(FieldDescriptor::new("Address"), address.clone())
            .node(FieldDescriptor::new("Home").inline(), address)
            .build();
        assert_eq!(
            Value::Object(to_map(&node, false).unwrap()),
            json!({"address": {"city": "Oslo"}, "city": "Oslo"})
        );

        let mut counts = BTreeMap::new();
        counts.insert("b", 2u8);
        counts.insert("a", 1u8);
        assert_eq!(Value::Object(to_map(&counts, false).unwrap()), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_to_map_rejects_leaf() {
        let err = to_map("text", false).unwrap_err();
        assert!(matches!(err, Error::UnsupportedShape { found: "leaf", .. }));
    }

    #[test]
    fn test_pretty_json() {
        let node = RecordBuilder::new("User").field(FieldDescriptor::new("Name"), "Ann").build();
        let pretty = to_pretty_json(&node).unwrap();
        assert_eq!(pretty, "{\n  \"name\": \"Ann\"\n}");
    }
}
