//! JSON and YAML dumps of syntax trees
//!
//! Trees are converted into [`NodeRecord`]s, a serde-friendly mirror of [`Node`] that
//! carries leaf text so that a dump can be read without the source file at hand.

use super::registry::{FormatError, FormatOptions};
use crate::hyperql::syntax::{Node, Position, Tree};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRecord<'s> {
    pub kind: &'static str,
    pub named: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    pub start: Position,
    pub end: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<[usize; 2]>,
    #[serde(skip_serializing_if = "is_false")]
    pub missing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'s str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeRecord<'s>>,
}

fn is_false(value: &bool) -> bool {
    !value
}

impl<'s> NodeRecord<'s> {
    pub fn from_node(node: &Node, source: &'s str, options: &FormatOptions) -> Self {
        let is_leaf = node.child_count() == 0 && !node.is_missing();
        Self {
            kind: node.kind(),
            named: node.is_named(),
            field: node.field_name(),
            start: node.start_position(),
            end: node.end_position(),
            bytes: options
                .ranges
                .then(|| [node.start_byte(), node.end_byte()]),
            missing: node.is_missing(),
            text: is_leaf.then(|| node.utf8_text(source)),
            children: node
                .children()
                .filter(|child| options.anonymous || child.is_named() || child.is_missing())
                .map(|child| NodeRecord::from_node(child, source, options))
                .collect(),
        }
    }
}

pub fn to_json(tree: &Tree, source: &str, options: &FormatOptions) -> Result<String, FormatError> {
    let record = NodeRecord::from_node(tree.root_node(), source, options);
    serde_json::to_string_pretty(&record).map_err(|e| FormatError::Serialization(e.to_string()))
}

pub fn to_yaml(tree: &Tree, source: &str, options: &FormatOptions) -> Result<String, FormatError> {
    let record = NodeRecord::from_node(tree.root_node(), source, options);
    serde_yaml::to_string(&record).map_err(|e| FormatError::Serialization(e.to_string()))
}
