use hyperql_parser::{Node, SyntaxKind, Tree};
use lsp_types::FoldingRangeKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperqlFoldingRange {
    pub start_line: u32,
    pub start_character: Option<u32>,
    pub end_line: u32,
    pub end_character: Option<u32>,
    pub kind: Option<FoldingRangeKind>,
}

/// Multi-line statements, brace bodies and block comments.
pub fn folding_ranges(tree: &Tree) -> Vec<HyperqlFoldingRange> {
    let mut ranges: Vec<HyperqlFoldingRange> = tree
        .root_node()
        .walk()
        .filter_map(fold_kind)
        .filter_map(|(node, kind)| to_range(node, kind))
        .collect();

    // One range per start line; the walk is pre-order so the outermost node wins
    let mut seen = std::collections::HashSet::new();
    ranges.retain(|range| seen.insert(range.start_line));
    ranges.sort_by_key(|range| range.start_line);
    ranges
}

fn fold_kind(node: &Node) -> Option<(&Node, Option<FoldingRangeKind>)> {
    let kind = node.syntax_kind()?;
    if kind == SyntaxKind::Comment {
        return Some((node, Some(FoldingRangeKind::Comment)));
    }
    let foldable = kind.is_statement()
        || matches!(
            kind,
            SyntaxKind::SchemaBody
                | SyntaxKind::MapLiteral
                | SyntaxKind::ListLiteral
                | SyntaxKind::MapClause
                | SyntaxKind::DefaultsClause
                | SyntaxKind::MatchExpression
                | SyntaxKind::CaseExpression
                | SyntaxKind::SubqueryExpression
        );
    foldable.then_some((node, Some(FoldingRangeKind::Region)))
}

fn to_range(node: &Node, kind: Option<FoldingRangeKind>) -> Option<HyperqlFoldingRange> {
    let start = node.start_position();
    let end = node.end_position();
    (end.line > start.line).then(|| HyperqlFoldingRange {
        start_line: start.line as u32,
        start_character: Some(start.column as u32),
        end_line: end.line as u32,
        end_character: Some(end.column as u32),
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::sample_tree;
    use hyperql_parser::parse_source;

    #[test]
    fn folds_multi_line_statements_and_comments() {
        let ranges = folding_ranges(&sample_tree());
        let lines: Vec<_> = ranges.iter().map(|r| (r.start_line, r.end_line)).collect();
        assert_eq!(lines, vec![(6, 9), (12, 13), (14, 16)]);
        assert_eq!(ranges[1].kind, Some(FoldingRangeKind::Comment));
        assert_eq!(ranges[2].kind, Some(FoldingRangeKind::Region));
    }

    #[test]
    fn folds_nested_bodies_on_their_own_lines() {
        let source = "BATCH {\n  CREATE NODE a:A {\n    x: 1\n  };\n} RETURN a;";
        let ranges = folding_ranges(&parse_source(source));
        let lines: Vec<_> = ranges.iter().map(|r| (r.start_line, r.end_line)).collect();
        assert_eq!(lines, vec![(0, 4), (1, 3)]);
    }

    #[test]
    fn single_line_input_has_no_folds() {
        assert!(folding_ranges(&parse_source("MATCH (n) RETURN n;")).is_empty());
    }
}
