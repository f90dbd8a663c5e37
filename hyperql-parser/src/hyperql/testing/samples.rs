//! Verified HyperQL sample files
//!
//!     The samples under `hyperql-parser/samples` exercise every statement kind of the
//!     language. All of them except [`Sample::Recovery`] parse without errors; the recovery
//!     sample holds the malformed input the error-recovery tests are written against.

use crate::hyperql::lexing::{tokenize, Lexeme};
use crate::hyperql::parsing::parse_source;
use crate::hyperql::syntax::Tree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    Schema,
    Queries,
    Migrations,
    Transactions,
    Recovery,
}

impl Sample {
    pub const ALL: [Sample; 5] = [
        Sample::Schema,
        Sample::Queries,
        Sample::Migrations,
        Sample::Transactions,
        Sample::Recovery,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Sample::Schema => "schema.hql",
            Sample::Queries => "queries.hql",
            Sample::Migrations => "migrations.hql",
            Sample::Transactions => "transactions.hql",
            Sample::Recovery => "recovery.hql",
        }
    }

    pub fn source(self) -> &'static str {
        match self {
            Sample::Schema => include_str!("../../../samples/schema.hql"),
            Sample::Queries => include_str!("../../../samples/queries.hql"),
            Sample::Migrations => include_str!("../../../samples/migrations.hql"),
            Sample::Transactions => include_str!("../../../samples/transactions.hql"),
            Sample::Recovery => include_str!("../../../samples/recovery.hql"),
        }
    }

    /// Whether the sample is meant to parse without errors.
    pub fn is_valid(self) -> bool {
        self != Sample::Recovery
    }

    pub fn parse(self) -> Tree {
        parse_source(self.source())
    }

    pub fn tokenize(self) -> Vec<Lexeme> {
        tokenize(self.source())
    }
}
