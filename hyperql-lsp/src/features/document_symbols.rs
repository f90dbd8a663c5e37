//! Outline of the schema definitions in a file
//!
//!     Every `DEFINE` statement becomes a symbol named after its `name` field. Members
//!     (enum values, struct and trait fields, node and edge properties and roles, index
//!     columns) become its children. Definitions whose name is missing are skipped.

use hyperql_parser::{Node, Range, SyntaxKind, Tree};
use lsp_types::SymbolKind;

#[derive(Debug, Clone, PartialEq)]
pub struct HyperqlDocumentSymbol {
    pub name: String,
    pub detail: Option<String>,
    pub kind: SymbolKind,
    pub range: Range,
    pub selection_range: Range,
    pub children: Vec<HyperqlDocumentSymbol>,
}

pub fn collect_document_symbols(tree: &Tree, source: &str) -> Vec<HyperqlDocumentSymbol> {
    tree.root_node()
        .children()
        .filter(|node| node.is(SyntaxKind::DefinitionStatement))
        .filter_map(|statement| statement.named_children().find(|n| !n.is_extra()))
        .filter_map(|definition| definition_symbol(definition, source))
        .collect()
}

fn definition_symbol(definition: &Node, source: &str) -> Option<HyperqlDocumentSymbol> {
    let name = definition.child_by_field_name("name")?;
    if name.is_missing() {
        return None;
    }
    let kind = definition.syntax_kind()?;
    let abstract_prefix = if definition.children().any(|c| c.kind() == "ABSTRACT") {
        "abstract "
    } else {
        ""
    };

    let (symbol_kind, detail, children) = match kind {
        SyntaxKind::DefineNamespace => (SymbolKind::NAMESPACE, "namespace".to_string(), Vec::new()),
        SyntaxKind::DefineEnum => (
            SymbolKind::ENUM,
            "enum".to_string(),
            member_symbols(definition, SymbolKind::ENUM_MEMBER, source),
        ),
        SyntaxKind::DefineStruct => (
            SymbolKind::STRUCT,
            "struct".to_string(),
            member_symbols(definition, SymbolKind::FIELD, source),
        ),
        SyntaxKind::DefineTrait => (
            SymbolKind::INTERFACE,
            "trait".to_string(),
            member_symbols(definition, SymbolKind::FIELD, source),
        ),
        SyntaxKind::DefineField => {
            let detail = match field_type_text(definition, source) {
                Some(data_type) => format!("field: {data_type}"),
                None => "field".to_string(),
            };
            (SymbolKind::FIELD, detail, Vec::new())
        }
        SyntaxKind::DefineRole => (SymbolKind::PROPERTY, "role".to_string(), Vec::new()),
        SyntaxKind::DefineNode => (
            SymbolKind::CLASS,
            format!("{abstract_prefix}node"),
            body_symbols(definition, source),
        ),
        SyntaxKind::DefineEdge => (
            SymbolKind::STRUCT,
            format!("{abstract_prefix}edge"),
            body_symbols(definition, source),
        ),
        SyntaxKind::DefineIndex => {
            let detail = match definition.child_by_field_name("type") {
                Some(target) if !target.is_missing() => {
                    format!("index on {}", target.utf8_text(source))
                }
                _ => "index".to_string(),
            };
            (
                SymbolKind::KEY,
                detail,
                member_symbols(definition, SymbolKind::FIELD, source),
            )
        }
        _ => return None,
    };

    Some(HyperqlDocumentSymbol {
        name: name.utf8_text(source).to_string(),
        detail: Some(detail),
        kind: symbol_kind,
        range: definition.range().clone(),
        selection_range: name.range().clone(),
        children,
    })
}

/// Unlabelled identifiers directly under `node`: enum values, struct members, index columns.
fn member_symbols(node: &Node, kind: SymbolKind, source: &str) -> Vec<HyperqlDocumentSymbol> {
    node.named_children()
        .filter(|child| {
            child.is(SyntaxKind::Identifier) && child.field_name().is_none() && !child.is_missing()
        })
        .map(|child| leaf_symbol(child, kind, None, source))
        .collect()
}

fn body_symbols(definition: &Node, source: &str) -> Vec<HyperqlDocumentSymbol> {
    let Some(body) = definition.child_of_kind(SyntaxKind::SchemaBody) else {
        return Vec::new();
    };
    body.named_children()
        .filter_map(|member| match member.syntax_kind()? {
            SyntaxKind::Identifier if !member.is_missing() => {
                Some(leaf_symbol(member, SymbolKind::FIELD, None, source))
            }
            SyntaxKind::RoleDefinition => {
                let name = member.child_by_field_name("name")?;
                let role_type = member
                    .child_by_field_name("role_type")
                    .filter(|n| !n.is_missing())
                    .map(|n| n.utf8_text(source));
                let cardinality = member
                    .child_by_field_name("cardinality")
                    .filter(|n| !n.is_missing())
                    .map(|n| n.kind());
                let detail = match (role_type, cardinality) {
                    (Some(role_type), Some(cardinality)) => format!("role: {role_type} {cardinality}"),
                    (Some(role_type), None) => format!("role: {role_type}"),
                    _ => "role".to_string(),
                };
                Some(HyperqlDocumentSymbol {
                    name: name.utf8_text(source).to_string(),
                    detail: Some(detail),
                    kind: SymbolKind::PROPERTY,
                    range: member.range().clone(),
                    selection_range: name.range().clone(),
                    children: Vec::new(),
                })
            }
            _ => None,
        })
        .collect()
}

fn leaf_symbol(
    node: &Node,
    kind: SymbolKind,
    detail: Option<String>,
    source: &str,
) -> HyperqlDocumentSymbol {
    HyperqlDocumentSymbol {
        name: node.utf8_text(source).to_string(),
        detail,
        kind,
        range: node.range().clone(),
        selection_range: node.range().clone(),
        children: Vec::new(),
    }
}

/// Source text of a field's type, which spans several nodes for `List<String>` and friends.
fn field_type_text<'s>(definition: &Node, source: &'s str) -> Option<&'s str> {
    let mut parts = definition
        .children_by_field_name("type")
        .filter(|n| !n.is_missing());
    let first = parts.next()?;
    let end = parts.last().map_or(first.end_byte(), |last| last.end_byte());
    source.get(first.start_byte()..end)
}
