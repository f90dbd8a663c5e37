//! Parser Engine - token cursor, recovery and the top-level loop
//!
//!     The engine owns the lexeme stream of one source text and the [`TreeBuilder`] the
//!     grammar writes into. Grammar rules (see [grammar](super::grammar)) are methods on
//!     [`Engine`] built from the small vocabulary defined here:
//!
//!         - lookahead over significant lexemes (`at`, `at_word`, `nth_word`, `at_words`),
//!         - consuming tokens as anonymous or named leaves (`keyword`, `punct`, `bump_as`),
//!         - required tokens that become zero-width missing nodes when absent (`expect`),
//!         - closing delimiters that skip junk into an `ERROR` node (`expect_closer`),
//!         - a nesting limit for recursive rules (`enter_nested`, `leave_nested`).
//!
//!     Comments are extras: they are never looked at by the grammar and are flushed into
//!     whichever node is open when the next token, node or checkpoint is created.
//!
//!     Keywords are context sensitive. Every word is lexed as an identifier and a rule
//!     treats it as a keyword only where it expects that keyword.
//!
//! Reuse
//!
//!     When a previous tree is available, the top-level loop checks at every statement
//!     boundary whether an unchanged, error-free statement of the old tree starts at the
//!     same offset. If so, that subtree is appended as is and the cursor jumps past it.
//!     Statements only depend on their own tokens and on the two tokens after them, and
//!     `Tree::edit` marks a statement as changed when any of these was touched, so a reused
//!     statement is exactly what a fresh parse would have produced.

use super::parser::ParseStats;
use crate::hyperql::language::LITERALS;
use crate::hyperql::lexing::{tokenize, Lexeme, Token};
use crate::hyperql::syntax::builder::{Checkpoint, TreeBuilder};
use crate::hyperql::syntax::{Kind, Node, SyntaxKind};

/// Recursive rules nest at most this deep; anything further in becomes one `ERROR` node.
pub(crate) const MAX_NESTING: usize = 256;

/// Words that can only start a top-level statement.
pub(crate) const TOP_LEVEL_STARTS: &[&str] = &[
    "DEFINE", "VALIDATE", "MIGRATE", "ALTER", "SHOW", "EXPLAIN", "ANALYZE", "BATCH", "BEGIN",
];

/// Words that start a clause of a manipulation statement.
pub(crate) const CLAUSE_STARTS: &[&str] = &[
    "IMPORT", "MATCH", "OPTIONAL", "CREATE", "MERGE", "SET", "DELETE", "DETACH", "REMOVE",
    "WITH", "WHERE", "RETURN", "ORDER", "LIMIT", "SKIP", "GROUP", "UNION", "UNWIND",
];

pub(crate) struct Engine<'s> {
    source: &'s str,
    lexemes: Vec<Lexeme>,
    /// Indices of non-comment lexemes.
    significant: Vec<usize>,
    /// Position in `significant` of the next token.
    cursor: usize,
    /// Lexemes before this index are already in the tree.
    emitted: usize,
    builder: TreeBuilder,
    reusable: Vec<Node>,
    next_reusable: usize,
    stats: ParseStats,
    /// Recursive rules currently open.
    depth: usize,
}

impl<'s> Engine<'s> {
    pub(crate) fn new(source: &'s str, reusable: Vec<Node>) -> Self {
        let lexemes = tokenize(source);
        let significant = lexemes
            .iter()
            .enumerate()
            .filter(|(_, lexeme)| !lexeme.is_trivia())
            .map(|(index, _)| index)
            .collect();
        Self {
            source,
            lexemes,
            significant,
            cursor: 0,
            emitted: 0,
            builder: TreeBuilder::new(source, Kind::Named(SyntaxKind::SourceFile)),
            reusable,
            next_reusable: 0,
            stats: ParseStats::default(),
            depth: 0,
        }
    }

    /// `source_file: repeat(_statement)`
    pub(crate) fn parse_source_file(mut self) -> (Node, ParseStats) {
        while !self.at_eof() {
            if self.try_reuse() {
                continue;
            }
            if !self.statement() {
                tracing::trace!(offset = self.offset(), "unexpected input at top level");
                self.error_until(|p| p.at_statement_start());
            }
            self.stats.parsed += 1;
        }
        self.flush_trivia();
        (self.builder.finish(), self.stats)
    }

    fn try_reuse(&mut self) -> bool {
        let Some(start) = self.lexeme(0).map(|lexeme| lexeme.span.start) else {
            return false;
        };
        while self
            .reusable
            .get(self.next_reusable)
            .is_some_and(|node| node.start_byte() < start)
        {
            self.next_reusable += 1;
        }
        let Some(node) = self
            .reusable
            .get(self.next_reusable)
            .filter(|node| node.start_byte() == start)
        else {
            return false;
        };

        let end = node.end_byte();
        let lexemes = &self.lexemes;
        let next = self
            .significant
            .partition_point(|&index| lexemes[index].span.start < end);
        let ends_on_token = next > 0 && lexemes[self.significant[next - 1]].span.end == end;
        if !ends_on_token {
            return false;
        }

        let node = node.clone();
        self.flush_trivia();
        self.builder.subtree(node);
        self.cursor = next;
        self.emitted = self.lexemes.partition_point(|lexeme| lexeme.span.start < end);
        self.next_reusable += 1;
        self.stats.reused += 1;
        true
    }

    // Lookahead

    fn lexeme(&self, n: usize) -> Option<&Lexeme> {
        self.significant
            .get(self.cursor + n)
            .map(|&index| &self.lexemes[index])
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.cursor >= self.significant.len()
    }

    /// Byte offset of the next token, or the end of input.
    pub(crate) fn offset(&self) -> usize {
        self.lexeme(0)
            .map(|lexeme| lexeme.span.start)
            .unwrap_or(self.source.len())
    }

    pub(crate) fn nth(&self, n: usize, token: Token) -> bool {
        self.lexeme(n).is_some_and(|lexeme| lexeme.is(token))
    }

    pub(crate) fn at(&self, token: Token) -> bool {
        self.nth(0, token)
    }

    /// Text of the n-th token ahead if it is a word.
    pub(crate) fn nth_text(&self, n: usize) -> Option<&'s str> {
        let source = self.source;
        self.lexeme(n)
            .filter(|lexeme| lexeme.is(Token::Identifier))
            .map(|lexeme| &source[lexeme.span.clone()])
    }

    pub(crate) fn nth_word(&self, n: usize, word: &str) -> bool {
        self.nth_text(n) == Some(word)
    }

    pub(crate) fn at_word(&self, word: &str) -> bool {
        self.nth_word(0, word)
    }

    pub(crate) fn at_any_word(&self, words: &[&str]) -> bool {
        self.nth_text(0).is_some_and(|text| words.contains(&text))
    }

    /// Tokens n and n+1 are separated by whitespace only.
    fn only_whitespace_between(&self, n: usize) -> bool {
        match (
            self.significant.get(self.cursor + n),
            self.significant.get(self.cursor + n + 1),
        ) {
            (Some(a), Some(b)) => b == &(a + 1),
            _ => false,
        }
    }

    /// Tokens n and n+1 touch, with nothing in between.
    pub(crate) fn touching(&self, n: usize) -> bool {
        match (self.lexeme(n), self.lexeme(n + 1)) {
            (Some(a), Some(b)) => a.span.end == b.span.start,
            _ => false,
        }
    }

    /// A multi-word literal such as `IS NOT NULL`: the words in order, separated by
    /// whitespace only.
    pub(crate) fn at_words(&self, words: &[&str]) -> bool {
        words.iter().enumerate().all(|(n, word)| {
            self.nth_word(n, word) && (n == 0 || self.only_whitespace_between(n - 1))
        })
    }

    pub(crate) fn at_unrecognised(&self) -> bool {
        self.lexeme(0).is_some_and(|lexeme| lexeme.token.is_none())
    }

    pub(crate) fn at_statement_start(&self) -> bool {
        self.at_any_word(TOP_LEVEL_STARTS) || self.at_any_word(CLAUSE_STARTS)
    }

    pub(crate) fn at_clause_start(&self) -> bool {
        self.at_any_word(CLAUSE_STARTS)
    }

    // Tree events

    fn flush_trivia(&mut self) {
        let until = self
            .significant
            .get(self.cursor)
            .copied()
            .unwrap_or(self.lexemes.len());
        for index in self.emitted..until {
            let span = self.lexemes[index].span.clone();
            self.builder.extra(Kind::Named(SyntaxKind::Comment), span);
        }
        self.emitted = self.emitted.max(until);
    }

    pub(crate) fn start(&mut self, kind: SyntaxKind) {
        self.flush_trivia();
        self.builder.start_node(Kind::Named(kind));
    }

    pub(crate) fn finish(&mut self) {
        self.builder.finish_node();
    }

    pub(crate) fn checkpoint(&mut self) -> Checkpoint {
        self.flush_trivia();
        self.builder.checkpoint()
    }

    pub(crate) fn start_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, Kind::Named(kind));
    }

    /// Label the next node or token.
    pub(crate) fn field(&mut self, name: &'static str) {
        self.builder.field(name);
    }

    pub(crate) fn push_field_scope(&mut self, name: &'static str) {
        self.builder.push_field_scope(name);
    }

    pub(crate) fn pop_field_scope(&mut self) {
        self.builder.pop_field_scope();
    }

    pub(crate) fn missing(&mut self, kind: Kind) {
        self.builder.missing(kind);
    }

    // Consuming tokens

    /// Consume the next token as a leaf of the given kind.
    pub(crate) fn bump_as(&mut self, kind: Kind) {
        self.bump_joined(kind, 1);
    }

    /// Consume `count` tokens as a single leaf.
    pub(crate) fn bump_joined(&mut self, kind: Kind, count: usize) {
        self.flush_trivia();
        let first = self.significant.get(self.cursor).copied();
        let last = self.significant.get(self.cursor + count - 1).copied();
        if let (Some(first), Some(last)) = (first, last) {
            let span = self.lexemes[first].span.start..self.lexemes[last].span.end;
            self.builder.token(kind, span);
            self.cursor += count;
            self.emitted = last + 1;
        }
    }

    /// Consume a keyword if it is next.
    pub(crate) fn keyword(&mut self, word: &'static str) -> bool {
        if self.at_word(word) {
            self.bump_as(Kind::Anonymous(word));
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_keyword(&mut self, word: &'static str) {
        if !self.keyword(word) {
            self.missing(Kind::Anonymous(word));
        }
    }

    /// Consume a multi-word literal if it is next.
    pub(crate) fn words(&mut self, literal: &'static str) -> bool {
        let parts: Vec<&str> = literal.split(' ').collect();
        if self.at_words(&parts) {
            self.bump_joined(Kind::Anonymous(literal), parts.len());
            true
        } else {
            false
        }
    }

    /// Consume a punctuation token if it is next.
    pub(crate) fn punct(&mut self, token: Token) -> bool {
        match token.literal() {
            Some(literal) if self.at(token) => {
                self.bump_as(Kind::Anonymous(literal));
                true
            }
            _ => false,
        }
    }

    pub(crate) fn expect(&mut self, token: Token) {
        if !self.punct(token) {
            if let Some(literal) = token.literal() {
                self.missing(Kind::Anonymous(literal));
            }
        }
    }

    /// Expect a closing token. Junk in front of it is wrapped in an `ERROR` node when the
    /// closer turns up before the enclosing construct could have ended.
    pub(crate) fn expect_closer(&mut self, token: Token) {
        if self.punct(token) {
            return;
        }
        match self.find_closer(token) {
            Some(count) => {
                tracing::trace!(offset = self.offset(), closer = %token, "skipping to closer");
                self.error_tokens(count);
                self.punct(token);
            }
            None => self.expect(token),
        }
    }

    fn find_closer(&self, closer: Token) -> Option<usize> {
        let mut depth = 0usize;
        let mut n = 0;
        while let Some(lexeme) = self.lexeme(n) {
            match lexeme.token {
                Some(token) if depth == 0 && token == closer => return Some(n),
                Some(Token::LParen | Token::LBracket | Token::LBrace) => depth += 1,
                Some(token) if token.is_closing_delimiter() => {
                    if depth == 0 {
                        return None;
                    }
                    depth -= 1;
                }
                Some(Token::Semicolon) if depth == 0 => return None,
                Some(Token::Identifier) if depth == 0 => {
                    let word = self.nth_text(n);
                    let boundary = if closer == Token::Semicolon {
                        word.is_some_and(|w| TOP_LEVEL_STARTS.contains(&w) || CLAUSE_STARTS.contains(&w))
                    } else {
                        word.is_some_and(|w| TOP_LEVEL_STARTS.contains(&w))
                    };
                    if boundary {
                        return None;
                    }
                }
                _ => {}
            }
            n += 1;
        }
        None
    }

    /// Open one level of a recursive rule. Past [`MAX_NESTING`] the rest of the nested
    /// input goes into an `ERROR` node, `placeholder` goes missing if there is no such
    /// input, and `false` is returned: the caller must not recurse. Every `true` must be
    /// paired with [`Engine::leave_nested`].
    pub(crate) fn enter_nested(&mut self, placeholder: Kind) -> bool {
        if self.depth < MAX_NESTING {
            self.depth += 1;
            return true;
        }
        tracing::debug!(offset = self.offset(), "nesting limit reached");
        match self.nested_extent() {
            0 => self.missing(placeholder),
            count => self.error_tokens(count),
        }
        false
    }

    pub(crate) fn leave_nested(&mut self) {
        self.depth -= 1;
    }

    /// Tokens up to the end of the construct the cursor is in: an unmatched closing
    /// delimiter, or a `,`, `;` or statement keyword outside any delimiters.
    fn nested_extent(&self) -> usize {
        let mut depth = 0usize;
        let mut n = 0;
        while let Some(lexeme) = self.lexeme(n) {
            match lexeme.token {
                Some(Token::LParen | Token::LBracket | Token::LBrace) => depth += 1,
                Some(token) if token.is_closing_delimiter() => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                Some(Token::Comma | Token::Semicolon) if depth == 0 => break,
                Some(Token::Identifier) if depth == 0 && n > 0 => {
                    if self
                        .nth_text(n)
                        .is_some_and(|w| TOP_LEVEL_STARTS.contains(&w) || CLAUSE_STARTS.contains(&w))
                    {
                        break;
                    }
                }
                _ => {}
            }
            n += 1;
        }
        n
    }

    /// Wrap everything up to the point where `stop` holds (or the end of input) in an
    /// `ERROR` node. Always consumes at least one token.
    pub(crate) fn error_until(&mut self, stop: impl Fn(&Self) -> bool) {
        if self.at_eof() {
            return;
        }
        let start = self.cursor;
        self.cursor += 1;
        while !self.at_eof() && !stop(self) {
            self.cursor += 1;
        }
        let count = self.cursor - start;
        self.cursor = start;
        self.error_tokens(count);
    }

    fn error_tokens(&mut self, count: usize) {
        if count == 1 && self.at_unrecognised() {
            self.bump_as(Kind::Error);
            return;
        }
        self.flush_trivia();
        self.builder.start_node(Kind::Error);
        for _ in 0..count {
            self.bump_any();
        }
        self.builder.finish_node();
    }

    /// Consume any token, classified the way it would appear in a valid tree.
    fn bump_any(&mut self) {
        let Some(lexeme) = self.lexeme(0) else {
            return;
        };
        let kind = match lexeme.token {
            None => Kind::Error,
            Some(Token::Identifier) => {
                let text = lexeme.text(self.source);
                match LITERALS.iter().find(|literal| **literal == text) {
                    Some(literal) => Kind::Anonymous(literal),
                    None if text == "null" => Kind::Named(SyntaxKind::NullLiteral),
                    None => Kind::Named(SyntaxKind::Identifier),
                }
            }
            Some(Token::Integer) => Kind::Named(SyntaxKind::IntegerLiteral),
            Some(Token::Float) => Kind::Named(SyntaxKind::FloatLiteral),
            Some(Token::String) => Kind::Named(SyntaxKind::StringLiteral),
            Some(token) => match token.literal() {
                Some(literal) => Kind::Anonymous(literal),
                None => Kind::Error,
            },
        };
        self.bump_as(kind);
    }
}

#[cfg(test)]
mod tests {
    use crate::hyperql::parsing::parse_source;
    use crate::hyperql::syntax::Tree;

    const DEEP: usize = 100_000;

    fn assert_covers_input(tree: &Tree, source: &str) {
        assert_eq!(tree.root_node().byte_range(), 0..source.len());
        assert!(tree.has_error());
    }

    #[test]
    fn test_deep_parentheses_end_in_an_error() {
        let source = format!("RETURN {}", "(".repeat(DEEP));
        assert_covers_input(&parse_source(&source), &source);
    }

    #[test]
    fn test_deep_prefix_operators_end_in_an_error() {
        let source = format!("RETURN {}x;", "!".repeat(DEEP));
        assert_covers_input(&parse_source(&source), &source);

        let source = format!("RETURN {}1", "-!".repeat(DEEP));
        assert_covers_input(&parse_source(&source), &source);
    }

    #[test]
    fn test_closers_after_the_limit_still_close_their_parentheses() {
        let source = format!("RETURN {}1{};\nSHOW ROLES", "(".repeat(DEEP), ")".repeat(DEEP));
        let tree = parse_source(&source);
        assert_covers_input(&tree, &source);

        let root = tree.root_node();
        assert_eq!(root.named_child_count(), 2);
        let kinds: Vec<_> = root.named_children().map(|node| node.kind()).collect();
        assert_eq!(kinds, ["manipulation_statement", "system_statement"]);
        assert!(!root.named_children().nth(1).is_some_and(|node| node.has_error()));
    }

    #[test]
    fn test_deep_list_types_and_batches_end_in_an_error() {
        let source = format!("DEFINE FIELD f: {}Int{};", "List<".repeat(DEEP), ">".repeat(DEEP));
        assert_covers_input(&parse_source(&source), &source);

        let source = "BATCH { ".repeat(DEEP);
        assert_covers_input(&parse_source(&source), &source);
    }

    #[test]
    fn test_nesting_below_the_limit_is_clean() {
        let source = format!("RETURN {}1{};", "(".repeat(200), ")".repeat(200));
        assert!(!parse_source(&source).has_error());

        let source = format!("RETURN {}x;", "!".repeat(200));
        assert!(!parse_source(&source).has_error());
    }
}
