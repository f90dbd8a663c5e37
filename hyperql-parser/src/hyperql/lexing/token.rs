//! Token definitions for HyperQL
//!
//! This module defines all the tokens that can be produced by the HyperQL lexer.
//! The tokens are defined using the logos derive macro for efficient tokenization.
//!
//! Keywords are not token classes of their own. Every keyword is lexed as an
//! [`Token::Identifier`] and the parser decides, from where it stands, whether the
//! word is a keyword or a name. This keeps words such as `Date` or `count` usable as
//! identifiers wherever the grammar does not expect the keyword.
use logos::Logos;
use serde::Serialize;

/// All possible tokens in HyperQL source
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[logos(skip r"\s+")]
pub enum Token {
    // Extras
    #[regex(r"//[^\n]*")]
    #[regex(r"--[^\n]*")]
    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
    Comment,

    // Words and literals
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,
    #[regex(r"[0-9]+")]
    Integer,
    #[regex(r"[0-9]+\.[0-9]+")]
    Float,
    #[regex(r#""[^"]*""#)]
    String,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("$")]
    Dollar,
    #[token("@")]
    At,

    // Operators
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("!")]
    Bang,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("->")]
    Arrow,
    #[token("=>")]
    FatArrow,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
}

impl Token {
    /// The literal text of fixed tokens, or `None` for tokens whose text varies.
    pub fn literal(&self) -> Option<&'static str> {
        let text = match self {
            Token::Comment
            | Token::Identifier
            | Token::Integer
            | Token::Float
            | Token::String => return None,
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Comma => ",",
            Token::Semicolon => ";",
            Token::Colon => ":",
            Token::Dot => ".",
            Token::Dollar => "$",
            Token::At => "@",
            Token::Eq => "=",
            Token::EqEq => "==",
            Token::NotEq => "!=",
            Token::Bang => "!",
            Token::Lt => "<",
            Token::Gt => ">",
            Token::LtEq => "<=",
            Token::GtEq => ">=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::AndAnd => "&&",
            Token::OrOr => "||",
            Token::Arrow => "->",
            Token::FatArrow => "=>",
            Token::PlusEq => "+=",
            Token::MinusEq => "-=",
        };
        Some(text)
    }

    /// Check if this token is a comment (an extra that may appear anywhere)
    pub fn is_trivia(&self) -> bool {
        matches!(self, Token::Comment)
    }

    /// Check if this token is a literal value
    pub fn is_literal(&self) -> bool {
        matches!(self, Token::Integer | Token::Float | Token::String)
    }

    /// Check if this token closes a bracketed construct
    pub fn is_closing_delimiter(&self) -> bool {
        matches!(self, Token::RParen | Token::RBracket | Token::RBrace)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.literal() {
            Some(text) => write!(f, "{text}"),
            None => match self {
                Token::Comment => write!(f, "comment"),
                Token::Identifier => write!(f, "identifier"),
                Token::Integer => write!(f, "integer"),
                Token::Float => write!(f, "float"),
                _ => write!(f, "string"),
            },
        }
    }
}
