use crate::types::{Leaf, Mapping, Node, Record, Sequence, TargetKind};
use std::borrow::Cow;

/// A node with every optional layer peeled off
#[derive(Debug, Clone, PartialEq)]
pub enum NodeView<'a> {
    Record(&'a Record),
    Mapping(&'a Mapping),
    Sequence(&'a Sequence),
    Leaf(Cow<'a, Leaf>),
    /// Absent reference to a structural or dynamic target
    Absent(TargetKind),
}

impl NodeView<'_> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeView::Record(_) => "record",
            NodeView::Mapping(_) => "mapping",
            NodeView::Sequence(_) => "sequence",
            NodeView::Leaf(_) => "leaf",
            NodeView::Absent(_) => "absent reference",
        }
    }
}

/// Unwrap optional references until a concrete kind is reached.
///
/// Absent references to scalar targets become that target's zero value;
/// absent structural targets are reported as [`NodeView::Absent`].
pub fn normalize(node: &Node) -> NodeView<'_> {
    let mut current = node;
    loop {
        match current {
            Node::Optional(opt) => match &opt.value {
                Some(inner) => current = inner,
                None => {
                    return match opt.target.zero_leaf() {
                        Some(zero) => NodeView::Leaf(Cow::Owned(zero)),
                        None => NodeView::Absent(opt.target),
                    };
                }
            },
            Node::Record(record) => return NodeView::Record(record),
            Node::Mapping(mapping) => return NodeView::Mapping(mapping),
            Node::Sequence(seq) => return NodeView::Sequence(seq),
            Node::Leaf(leaf) => return NodeView::Leaf(Cow::Borrowed(leaf)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwraps_present_optionals() {
        let node = Node::present(Node::present(Node::str("x")));
        assert_eq!(normalize(&node), NodeView::Leaf(Cow::Owned(Leaf::Str("x".into()))));
    }

    #[test]
    fn test_absent_scalars_become_zero() {
        assert_eq!(
            normalize(&Node::absent(TargetKind::Str)),
            NodeView::Leaf(Cow::Owned(Leaf::Str(String::new())))
        );
        assert_eq!(
            normalize(&Node::absent(TargetKind::Number)),
            NodeView::Leaf(Cow::Owned(Leaf::Int(0)))
        );
        assert_eq!(
            normalize(&Node::absent(TargetKind::Bool)),
            NodeView::Leaf(Cow::Owned(Leaf::Bool(false)))
        );
    }

    #[test]
    fn test_absent_structures_stay_absent() {
        assert_eq!(normalize(&Node::absent(TargetKind::Record)), NodeView::Absent(TargetKind::Record));
        assert_eq!(normalize(&Node::absent(TargetKind::Dynamic)), NodeView::Absent(TargetKind::Dynamic));
        assert_eq!(
            normalize(&Node::present(Node::absent(TargetKind::Mapping))),
            NodeView::Absent(TargetKind::Mapping)
        );
    }
}
