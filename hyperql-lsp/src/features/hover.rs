//! Hover shows where the cursor sits in the syntax tree: the chain of named nodes from
//! the statement down to the innermost node, with the field that node fills.

use hyperql_parser::{Node, Position, Range, Tree};

#[derive(Debug, Clone, PartialEq)]
pub struct HoverResult {
    pub range: Range,
    pub contents: String,
}

pub fn hover(tree: &Tree, source: &str, position: Position) -> Option<HoverResult> {
    let path = named_path(tree.root_node(), position);
    // The root alone means the cursor is between statements
    let innermost = *path.get(1..)?.last()?;

    let chain = path[1..]
        .iter()
        .map(|node| node.kind())
        .collect::<Vec<_>>()
        .join(" › ");
    let mut contents = format!("`{chain}`");
    if let Some(field) = innermost.field_name() {
        contents.push_str(&format!("\n\nfield: `{field}`"));
    }
    if innermost.child_count() == 0 {
        let text = innermost.utf8_text(source);
        if !text.is_empty() && !text.contains('`') {
            contents.push_str(&format!("\n\ntext: `{text}`"));
        }
    }

    Some(HoverResult {
        range: innermost.range().clone(),
        contents,
    })
}

/// Named nodes containing `position`, outermost first. Missing nodes are never entered.
fn named_path(root: &Node, position: Position) -> Vec<&Node> {
    let mut path = Vec::new();
    if !root.range().contains(position) {
        return path;
    }
    let mut node = root;
    path.push(node);
    while let Some(child) = node
        .named_children()
        .find(|child| !child.is_missing() && child.range().contains(position))
    {
        path.push(child);
        node = child;
    }
    path
}
