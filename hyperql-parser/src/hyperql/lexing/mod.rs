//! Lexing for HyperQL source
//!
//!     Tokenization is handled entirely by logos (see [token]). This module turns the
//!     logos stream into [`Lexeme`]s: a token kind plus its byte span. Input that logos
//!     cannot classify is kept as a lexeme without a token so that the parser can report
//!     it and wrap it in an error node instead of silently dropping it.
//!
//!     Comments are extras. They are kept in the lexeme stream and [`significant`] filters
//!     them out for callers that only care about grammar tokens.

pub mod token;

pub use token::Token;

use logos::Logos;
use serde::Serialize;
use std::ops::Range;

/// A single lexed unit of source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lexeme {
    /// `None` marks input the lexer could not classify.
    pub token: Option<Token>,
    pub span: Range<usize>,
}

impl Lexeme {
    pub fn new(token: Option<Token>, span: Range<usize>) -> Self {
        Self { token, span }
    }

    pub fn is(&self, token: Token) -> bool {
        self.token == Some(token)
    }

    pub fn is_trivia(&self) -> bool {
        self.token.is_some_and(|token| token.is_trivia())
    }

    /// Source text covered by this lexeme.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span.clone()]
    }
}

/// Tokenize a string, keeping comments and unrecognised input.
pub fn tokenize(source: &str) -> Vec<Lexeme> {
    let mut lexer = Token::lexer(source);
    let mut lexemes = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => lexemes.push(Lexeme::new(Some(token), span)),
            Err(()) => {
                // Adjacent unrecognised characters collapse into one lexeme
                match lexemes.last_mut() {
                    Some(last) if last.token.is_none() && last.span.end == span.start => {
                        last.span.end = span.end;
                    }
                    _ => lexemes.push(Lexeme::new(None, span)),
                }
            }
        }
    }

    lexemes
}

/// Drop comments from a lexeme stream.
pub fn significant(lexemes: &[Lexeme]) -> Vec<Lexeme> {
    lexemes
        .iter()
        .filter(|lexeme| !lexeme.is_trivia())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_with_spans() {
        let lexemes = tokenize("MATCH (n)");
        let summary: Vec<_> = lexemes
            .iter()
            .map(|lexeme| (lexeme.token, lexeme.span.clone()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Some(Token::Identifier), 0..5),
                (Some(Token::LParen), 6..7),
                (Some(Token::Identifier), 7..8),
                (Some(Token::RParen), 8..9),
            ]
        );
    }

    #[test]
    fn test_unrecognised_input_is_kept() {
        let lexemes = tokenize("a ## b");
        assert_eq!(lexemes.len(), 3);
        assert_eq!(lexemes[1].token, None);
        assert_eq!(lexemes[1].span, 2..4);
    }

    #[test]
    fn test_significant_drops_comments() {
        let source = "RETURN x // trailing";
        let lexemes = tokenize(source);
        assert_eq!(lexemes.len(), 3);
        let tokens = significant(&lexemes);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].text(source), "x");
    }

    #[test]
    fn test_unicode_whitespace_is_skipped() {
        let source = "RETURN\u{00A0}x\u{000B};\u{2003}";
        let tokens: Vec<_> = tokenize(source).iter().map(|lexeme| lexeme.token).collect();
        assert_eq!(
            tokens,
            vec![Some(Token::Identifier), Some(Token::Identifier), Some(Token::Semicolon)]
        );
        assert!(!crate::hyperql::parsing::parse_source(source).has_error());
    }

    #[test]
    fn test_empty_source() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \n\t ").is_empty());
    }
}
