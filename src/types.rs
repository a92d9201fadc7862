use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::fmt;

/// Value emitted for a field whose optional reference is absent
pub const NIL_PLACEHOLDER: &str = "<nil>";

/// Terminal value of a shape
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    /// Calendar timestamp, treated as atomic even though it is structured
    Timestamp(DateTime<FixedOffset>),
}

impl Leaf {
    /// Whether this leaf holds its type's zero value
    pub fn is_zero(&self) -> bool {
        match self {
            Leaf::Str(s) => s.is_empty(),
            Leaf::Int(n) => *n == 0,
            Leaf::UInt(n) => *n == 0,
            Leaf::Float(n) => *n == 0.0,
            Leaf::Bool(b) => !*b,
            Leaf::Timestamp(ts) => ts.timestamp() == 0 && ts.timestamp_subsec_nanos() == 0,
        }
    }

    fn target_kind(&self) -> TargetKind {
        match self {
            Leaf::Str(_) => TargetKind::Str,
            Leaf::Int(_) | Leaf::UInt(_) | Leaf::Float(_) => TargetKind::Number,
            Leaf::Bool(_) => TargetKind::Bool,
            Leaf::Timestamp(_) => TargetKind::Timestamp,
        }
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leaf::Str(s) => f.write_str(s),
            Leaf::Int(n) => write!(f, "{}", n),
            Leaf::UInt(n) => write!(f, "{}", n),
            Leaf::Float(n) => write!(f, "{}", n),
            Leaf::Bool(b) => write!(f, "{}", b),
            Leaf::Timestamp(ts) => f.write_str(&ts.to_rfc3339()),
        }
    }
}

/// Declared kind behind an optional reference.
///
/// An absent reference still knows what it would have pointed at, which lets
/// the normalizer substitute zero values for scalar targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Str,
    Number,
    Bool,
    Timestamp,
    Record,
    Mapping,
    Sequence,
    /// Dynamically typed slot with no declared target
    Dynamic,
}

impl TargetKind {
    /// Zero value for scalar targets, `None` for structural ones
    pub fn zero_leaf(self) -> Option<Leaf> {
        match self {
            TargetKind::Str => Some(Leaf::Str(String::new())),
            TargetKind::Number => Some(Leaf::Int(0)),
            TargetKind::Bool => Some(Leaf::Bool(false)),
            _ => None,
        }
    }
}

/// A tag family consulted when resolving a field's external key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFamily {
    Json,
    Url,
    Xml,
}

impl TagFamily {
    /// Families in resolution priority order
    pub const PRIORITY: [TagFamily; 3] = [TagFamily::Json, TagFamily::Url, TagFamily::Xml];
}

/// Parsed serialization tag, e.g. `owner,omitempty` or `,inline`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tag {
    pub name: String,
    pub options: Vec<String>,
    /// The tag was the bare `-` sentinel
    pub omit: bool,
    /// `name` is the key verbatim, even when empty
    pub literal: bool,
}

impl Tag {
    /// Parse tag text: the first comma-separated part is the key, the rest are options.
    pub fn parse(text: &str) -> Self {
        let mut parts = text.split(',');
        let name = parts.next().unwrap_or_default().to_string();
        let options: Vec<String> = parts
            .filter(|opt| !opt.is_empty())
            .map(str::to_string)
            .collect();
        let omit = name == "-" && !text.contains(',');

        Tag {
            name: if omit { String::new() } else { name },
            options,
            omit,
            literal: false,
        }
    }

    /// A tag carrying a literal key, with no sentinel or option parsing
    pub fn key(name: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            options: Vec::new(),
            omit: false,
            literal: true,
        }
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|opt| opt == option)
    }
}

/// Describes one declared field of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Declared field name
    pub name: String,
    tags: Vec<(TagFamily, Tag)>,
    inline: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        FieldDescriptor {
            name: name.into(),
            tags: Vec::new(),
            inline: false,
        }
    }

    /// Attach a tag family, replacing any previous tag of that family
    pub fn with_tag(mut self, family: TagFamily, tag: Tag) -> Self {
        self.tags.retain(|(f, _)| *f != family);
        self.tags.push((family, tag));
        self
    }

    pub fn json(self, text: &str) -> Self {
        self.with_tag(TagFamily::Json, Tag::parse(text))
    }

    pub fn url(self, text: &str) -> Self {
        self.with_tag(TagFamily::Url, Tag::parse(text))
    }

    pub fn xml(self, text: &str) -> Self {
        self.with_tag(TagFamily::Xml, Tag::parse(text))
    }

    /// Merge the child's fields into the parent namespace
    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    pub fn tag(&self, family: TagFamily) -> Option<&Tag> {
        self.tags
            .iter()
            .find(|(f, _)| *f == family)
            .map(|(_, tag)| tag)
    }

    /// Inline either set explicitly or requested by an `inline` tag option
    pub fn is_inline(&self) -> bool {
        self.inline || self.tags.iter().any(|(_, tag)| tag.has_option("inline"))
    }
}

/// A declared field together with its value
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub descriptor: FieldDescriptor,
    pub value: Node,
}

/// Structured value with a fixed, ordered set of named fields
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub type_name: String,
    pub fields: Vec<Field>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Record {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn push(&mut self, descriptor: FieldDescriptor, value: Node) {
        self.fields.push(Field { descriptor, value });
    }

    /// Look up a field by declared name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.descriptor.name == name)
    }
}

/// Key/value associative structure with dynamically discovered keys
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    entries: Vec<(String, Node)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing an existing one with the same key
    pub fn insert(&mut self, key: impl Into<String>, value: Node) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by key, independent of insertion order
    pub fn sorted_entries(&self) -> Vec<(&str, &Node)> {
        let mut entries: Vec<(&str, &Node)> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        entries.sort_by(|lhs, rhs| lhs.0.cmp(rhs.0));
        entries
    }
}

impl FromIterator<(String, Node)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (key, value) in iter {
            mapping.insert(key, value);
        }
        mapping
    }
}

/// Ordered list of values, possibly heterogeneous in shape
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sequence {
    pub elements: Vec<Node>,
    /// Shape of a zero-valued element of the declared element type
    pub element_zero: Option<Box<Node>>,
}

impl Sequence {
    pub fn new(elements: Vec<Node>) -> Self {
        Sequence {
            elements,
            element_zero: None,
        }
    }

    pub fn with_element_zero(mut self, zero: Option<Node>) -> Self {
        self.element_zero = zero.map(Box::new);
        self
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Value slot that may be absent or present
#[derive(Debug, Clone, PartialEq)]
pub struct Optional {
    pub value: Option<Box<Node>>,
    pub target: TargetKind,
}

/// A value shape discovered at runtime
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Record(Record),
    Mapping(Mapping),
    Sequence(Sequence),
    Optional(Optional),
    Leaf(Leaf),
}

impl Node {
    pub fn absent(target: TargetKind) -> Self {
        Node::Optional(Optional {
            value: None,
            target,
        })
    }

    pub fn present(value: Node) -> Self {
        let target = value.target_kind();
        Node::Optional(Optional {
            value: Some(Box::new(value)),
            target,
        })
    }

    pub fn str(value: impl Into<String>) -> Self {
        Node::Leaf(Leaf::Str(value.into()))
    }

    /// Whether following present optionals ends at an absent reference
    pub fn is_absent(&self) -> bool {
        match self {
            Node::Optional(Optional { value: None, .. }) => true,
            Node::Optional(Optional { value: Some(inner), .. }) => inner.is_absent(),
            _ => false,
        }
    }

    /// Zero-value test used when zero-valued fields are filtered out
    pub fn is_zero(&self) -> bool {
        match self {
            Node::Leaf(leaf) => leaf.is_zero(),
            Node::Optional(opt) => opt.value.is_none(),
            Node::Sequence(seq) => seq.is_empty(),
            Node::Mapping(mapping) => mapping.is_empty(),
            Node::Record(record) => record.fields.iter().all(|f| f.value.is_zero()),
        }
    }

    pub fn target_kind(&self) -> TargetKind {
        match self {
            Node::Record(_) => TargetKind::Record,
            Node::Mapping(_) => TargetKind::Mapping,
            Node::Sequence(_) => TargetKind::Sequence,
            Node::Optional(opt) => opt.target,
            Node::Leaf(leaf) => leaf.target_kind(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Record(_) => "record",
            Node::Mapping(_) => "mapping",
            Node::Sequence(_) => "sequence",
            Node::Optional(_) => "optional",
            Node::Leaf(_) => "leaf",
        }
    }
}

/// Per-call configuration, threaded by reference through every recursive step
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Sort generated headers with the numeric-aware path order
    pub sort: bool,

    /// Derive headers from the value when none were supplied
    pub generate: bool,

    /// Caller-supplied header list
    pub headers: Option<Vec<String>>,

    /// Omit fields behind absent optional references instead of emitting a placeholder
    pub exclude_nil: bool,

    /// Keep zero-valued fields when converting to a map
    pub include_zero: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sort(mut self) -> Self {
        self.sort = true;
        self
    }

    pub fn with_generate(mut self) -> Self {
        self.generate = true;
        self
    }

    pub fn with_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = Some(headers.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_exclude_nil(mut self) -> Self {
        self.exclude_nil = true;
        self
    }

    pub fn with_include_zero(mut self) -> Self {
        self.include_zero = true;
        self
    }
}
