//! Runtime shape introspection
//!
//! Types describe themselves as a [`Node`] tree through the [`Introspect`]
//! trait. Scalars, collections, optionals, timestamps and `serde_json::Value`
//! are covered here; records implement it with a [`RecordBuilder`].
//!
//! ```rust
//! use flatshape::{FieldDescriptor, Introspect, Node, RecordBuilder};
//!
//! struct User {
//!     name: String,
//!     tags: Vec<String>,
//! }
//!
//! impl Introspect for User {
//!     fn to_node(&self) -> Node {
//!         RecordBuilder::new("User")
//!             .field(FieldDescriptor::new("Name"), &self.name)
//!             .field(FieldDescriptor::new("Tags").json("tags,omitempty"), &self.tags)
//!             .build()
//!     }
//! }
//!
//! let user = User { name: "Ann".into(), tags: vec!["x".into()] };
//! assert!(matches!(user.to_node(), Node::Record(_)));
//! ```

use crate::types::{FieldDescriptor, Leaf, Mapping, Node, Record, Sequence, Tag, TagFamily, TargetKind};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::hash::BuildHasher;

/// A value whose shape can be walked at runtime
pub trait Introspect {
    /// Describe this value as a node tree
    fn to_node(&self) -> Node;

    /// Shape of a zero-valued instance of this type, when it has one
    fn zero_node() -> Option<Node>
    where
        Self: Sized,
    {
        None
    }

    /// Kind an absent reference to this type would have pointed at
    fn target_kind() -> TargetKind
    where
        Self: Sized,
    {
        Self::zero_node()
            .map(|node| node.target_kind())
            .unwrap_or(TargetKind::Dynamic)
    }
}

/// Builds a [`Node::Record`] field by field, in declaration order
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    pub fn new(type_name: impl Into<String>) -> Self {
        RecordBuilder {
            record: Record::new(type_name),
        }
    }

    pub fn field<T: Introspect + ?Sized>(mut self, descriptor: FieldDescriptor, value: &T) -> Self {
        self.record.push(descriptor, value.to_node());
        self
    }

    /// Add a field from an already built node
    pub fn node(mut self, descriptor: FieldDescriptor, value: Node) -> Self {
        self.record.push(descriptor, value);
        self
    }

    pub fn into_record(self) -> Record {
        self.record
    }

    pub fn build(self) -> Node {
        Node::Record(self.record)
    }
}

impl Record {
    pub fn builder(type_name: impl Into<String>) -> RecordBuilder {
        RecordBuilder::new(type_name)
    }

    /// Treat a JSON object as a record whose fields follow document order.
    ///
    /// Object keys become literal external keys; nested objects stay mappings.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let mut record = Record::new("object");
        for (key, value) in object {
            let descriptor = FieldDescriptor::new(key.clone()).with_tag(TagFamily::Json, Tag::key(key.clone()));
            record.push(descriptor, value.to_node());
        }
        record
    }
}

impl Introspect for Node {
    fn to_node(&self) -> Node {
        self.clone()
    }
}

impl Introspect for Record {
    fn to_node(&self) -> Node {
        Node::Record(self.clone())
    }
}

impl Introspect for Leaf {
    fn to_node(&self) -> Node {
        Node::Leaf(self.clone())
    }
}

macro_rules! impl_leaf {
    ($variant:ident, $zero:expr; $($ty:ty),*) => {
        $(
            impl Introspect for $ty {
                fn to_node(&self) -> Node {
                    Node::Leaf(Leaf::$variant((*self).into()))
                }

                fn zero_node() -> Option<Node> {
                    Some(Node::Leaf(Leaf::$variant($zero)))
                }
            }
        )*
    };
}

impl_leaf!(Int, 0; i8, i16, i32, i64);
impl_leaf!(UInt, 0; u8, u16, u32, u64);
impl_leaf!(Float, 0.0; f64);
impl_leaf!(Bool, false; bool);

// Widening directly would print f32 noise digits (0.1 -> 0.10000000149011612)
impl Introspect for f32 {
    fn to_node(&self) -> Node {
        Node::Leaf(Leaf::Float(self.to_string().parse().unwrap_or_else(|_| f64::from(*self))))
    }

    fn zero_node() -> Option<Node> {
        Some(Node::Leaf(Leaf::Float(0.0)))
    }
}

impl Introspect for isize {
    fn to_node(&self) -> Node {
        Node::Leaf(Leaf::Int(*self as i64))
    }

    fn zero_node() -> Option<Node> {
        Some(Node::Leaf(Leaf::Int(0)))
    }
}

impl Introspect for usize {
    fn to_node(&self) -> Node {
        Node::Leaf(Leaf::UInt(*self as u64))
    }

    fn zero_node() -> Option<Node> {
        Some(Node::Leaf(Leaf::UInt(0)))
    }
}

impl Introspect for char {
    fn to_node(&self) -> Node {
        Node::Leaf(Leaf::Str(self.to_string()))
    }

    fn zero_node() -> Option<Node> {
        Some(Node::str(""))
    }
}

impl Introspect for String {
    fn to_node(&self) -> Node {
        Node::str(self.clone())
    }

    fn zero_node() -> Option<Node> {
        Some(Node::str(""))
    }
}

impl Introspect for str {
    fn to_node(&self) -> Node {
        Node::str(self)
    }
}

impl Introspect for DateTime<Utc> {
    fn to_node(&self) -> Node {
        Node::Leaf(Leaf::Timestamp(self.fixed_offset()))
    }

    fn zero_node() -> Option<Node> {
        Utc.timestamp_opt(0, 0)
            .single()
            .map(|ts| Node::Leaf(Leaf::Timestamp(ts.fixed_offset())))
    }
}

impl Introspect for DateTime<FixedOffset> {
    fn to_node(&self) -> Node {
        Node::Leaf(Leaf::Timestamp(*self))
    }

    fn zero_node() -> Option<Node> {
        <DateTime<Utc> as Introspect>::zero_node()
    }
}

impl<T: Introspect + ?Sized> Introspect for &T {
    fn to_node(&self) -> Node {
        (**self).to_node()
    }
}

impl<T: Introspect> Introspect for Box<T> {
    fn to_node(&self) -> Node {
        (**self).to_node()
    }

    fn zero_node() -> Option<Node> {
        T::zero_node()
    }
}

impl<T: Introspect> Introspect for Option<T> {
    fn to_node(&self) -> Node {
        match self {
            Some(value) => Node::present(value.to_node()),
            None => Node::absent(T::target_kind()),
        }
    }

    // The declared target's zero shape, so all-absent sequences can still
    // report the fields their elements would have had.
    fn zero_node() -> Option<Node> {
        T::zero_node()
    }

    fn target_kind() -> TargetKind {
        T::target_kind()
    }
}

impl<T: Introspect> Introspect for [T] {
    fn to_node(&self) -> Node {
        let elements = self.iter().map(Introspect::to_node).collect();
        Node::Sequence(Sequence::new(elements).with_element_zero(T::zero_node()))
    }
}

impl<T: Introspect> Introspect for Vec<T> {
    fn to_node(&self) -> Node {
        self.as_slice().to_node()
    }

    fn zero_node() -> Option<Node> {
        Some(Node::Sequence(Sequence::default().with_element_zero(T::zero_node())))
    }
}

impl<K: Display, V: Introspect> Introspect for BTreeMap<K, V> {
    fn to_node(&self) -> Node {
        Node::Mapping(
            self.iter()
                .map(|(k, v)| (k.to_string(), v.to_node()))
                .collect(),
        )
    }

    fn zero_node() -> Option<Node> {
        Some(Node::Mapping(Mapping::new()))
    }
}

impl<K: Display, V: Introspect, S: BuildHasher> Introspect for HashMap<K, V, S> {
    fn to_node(&self) -> Node {
        Node::Mapping(
            self.iter()
                .map(|(k, v)| (k.to_string(), v.to_node()))
                .collect(),
        )
    }

    fn zero_node() -> Option<Node> {
        Some(Node::Mapping(Mapping::new()))
    }
}

impl Introspect for Value {
    fn to_node(&self) -> Node {
        match self {
            Value::Null => Node::absent(TargetKind::Dynamic),
            Value::Bool(b) => Node::Leaf(Leaf::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Node::Leaf(Leaf::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Node::Leaf(Leaf::UInt(u))
                } else {
                    Node::Leaf(Leaf::Float(n.as_f64().unwrap_or_default()))
                }
            }
            Value::String(s) => Node::str(s.clone()),
            Value::Array(arr) => Node::Sequence(Sequence::new(arr.iter().map(Introspect::to_node).collect())),
            Value::Object(obj) => Node::Mapping(
                obj.iter()
                    .map(|(k, v)| (k.clone(), v.to_node()))
                    .collect(),
            ),
        }
    }
}
