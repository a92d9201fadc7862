use crate::types::{FieldDescriptor, TagFamily};

/// Outcome of resolving a field's external key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedKey {
    Key(String),
    /// The field carries the `-` sentinel and is left out entirely
    Suppressed,
}

/// Derive a field's external key from its tags.
///
/// Tag families are checked in priority order. The first family with a tag
/// decides: `-` suppresses the field, a non-empty or literal name is the key,
/// and an empty parsed name (e.g. `,inline`) defers to the next family.
/// Without any usable tag the declared name is used with its first character
/// lower-cased.
pub fn resolve_key(descriptor: &FieldDescriptor) -> ResolvedKey {
    for family in TagFamily::PRIORITY {
        let Some(tag) = descriptor.tag(family) else {
            continue;
        };
        if tag.omit {
            return ResolvedKey::Suppressed;
        }
        if tag.literal || !tag.name.is_empty() {
            return ResolvedKey::Key(tag.name.clone());
        }
    }

    ResolvedKey::Key(lower_first(&descriptor.name))
}

/// Lower-case the first character, Unicode-aware
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
