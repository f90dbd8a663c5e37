//! The HyperQL grammar-language descriptor
//!
//!     [`Language`] is the process-wide, immutable description of the grammar: its symbol
//!     table (named rules, hidden rules, anonymous literals), its field names and its
//!     keywords. It is built once on first use and lives for the rest of the process.
//!
//!     Symbol ids follow tree-sitter's conventions: id 0 is the end-of-input symbol, field
//!     ids start at 1, and `ERROR` has the reserved id `u16::MAX`.

use crate::hyperql::ffi::TSLanguage;
use crate::hyperql::syntax::kind::{Kind, SyntaxKind};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Version of the tree-sitter language ABI the descriptor corresponds to.
pub const ABI_VERSION: usize = 14;

pub const ERROR_ID: u16 = u16::MAX;

/// Field names, in id order starting at 1.
pub const FIELDS: &[&str] = &[
    "name",
    "type",
    "role_type",
    "cardinality",
    "path_var",
    "weight_field",
    "variable",
    "properties",
    "object",
    "property",
];

/// Rules that never appear in a tree; their children are spliced into the parent.
pub const HIDDEN_RULES: &[&str] = &[
    "_statement",
    "_clause",
    "_weight_clause",
    "_expression",
    "_data_type",
    "_projection_element",
    "_literal",
];

/// Every literal string of the grammar, in the order the grammar first uses it.
pub const LITERALS: &[&str] = &[
    // Schema definitions
    "DEFINE", "NAMESPACE", "STRICT_MODE", "=", ";", "ENUM", "{", ",", "}", "FIELD", ":",
    "ROLE", "ALLOWS", "[", "]", "STRUCT", "TRAIT", "ABSTRACT", "NODE", "EDGE", "EXTENDS",
    "(ONE)", "(MANY)", "INDEX", "ON", "(", ")",
    // Migration and system
    "VALIDATE", "MIGRATION", "TO", "MIGRATE", "ALTER", "ADD", "DROP", "RENAME", "MAP",
    "DEFAULTS", "SHOW", "NODE TYPES", "EDGE TYPES", "FIELDS", "ROLES", "SCHEMA", "EXPLAIN",
    "ANALYZE", "BATCH", "BEGIN", "ISOLATION", "LEVEL", "ON ERROR CONTINUE",
    "READ UNCOMMITTED", "READ COMMITTED", "REPEATABLE READ", "SERIALIZABLE",
    // Clauses
    "IMPORT", "AS", "MATCH", "CROSS_TYPE", "PATH", "WEIGHT", "BY", "USING", "SUM", "MAX",
    "MIN", "AVG", "OPTIONAL", "CREATE", "MERGE", "SET", "REMOVE", "DELETE", "DETACH", "WITH",
    "WHERE", "GROUP", "ORDER", "ASC", "DESC", "LIMIT", "SKIP", "RETURN", "DISTINCT", "UNION",
    "ALL", "UNWIND", "USE",
    // Patterns and expressions
    "-", "<-", "*", "->", "+", "/", "%", "<", ">", "<=", ">=", "==", "!=", "IS", "LIKE",
    "ILIKE", "MATCHES", "IMATCHES", "&&", "||", "IN", "IS NULL", "IS NOT NULL", "!", "+=",
    "-=", ".", "OVER", "PARTITION", "=>", "CASE", "WHEN", "THEN", "ELSE", "END", "EXISTS",
    // Types and literals
    "String", "Int", "Int32", "Float", "Bool", "Date", "UUID", "Interval", "Time", "Decimal",
    "Path", "Vector", "List", "Enum", "Struct", "@", "true", "false", "$",
];

static LANGUAGE: Lazy<Language> = Lazy::new(Language::build);

/// The HyperQL language descriptor.
pub fn language() -> &'static Language {
    &LANGUAGE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    pub id: u16,
    pub name: &'static str,
    pub named: bool,
    pub visible: bool,
}

#[derive(Debug, Serialize)]
pub struct Language {
    name: &'static str,
    abi_version: usize,
    symbols: Vec<Symbol>,
    fields: Vec<&'static str>,
    keywords: Vec<&'static str>,
    #[serde(skip)]
    ids: HashMap<(&'static str, bool), u16>,
}

impl Language {
    fn build() -> Language {
        let mut symbols = vec![Symbol {
            id: 0,
            name: "end",
            named: false,
            visible: false,
        }];

        let named = SyntaxKind::ALL.iter().map(|kind| (kind.as_str(), true, true));
        let anonymous = LITERALS.iter().map(|literal| (*literal, false, true));
        let hidden = HIDDEN_RULES.iter().map(|rule| (*rule, true, false));
        for (name, is_named, visible) in named.chain(anonymous).chain(hidden) {
            symbols.push(Symbol {
                id: symbols.len() as u16,
                name,
                named: is_named,
                visible,
            });
        }

        let ids = symbols
            .iter()
            .filter(|symbol| symbol.visible)
            .map(|symbol| ((symbol.name, symbol.named), symbol.id))
            .collect();

        let keywords = LITERALS
            .iter()
            .copied()
            .filter(|literal| is_word(literal))
            .chain(std::iter::once("null"))
            .collect();

        Language {
            name: "hyperql",
            abi_version: ABI_VERSION,
            symbols,
            fields: FIELDS.to_vec(),
            keywords,
            ids,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn abi_version(&self) -> usize {
        self.abi_version
    }

    /// Number of symbols, `ERROR` excluded.
    pub fn node_kind_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn node_kind_for_id(&self, id: u16) -> Option<&'static str> {
        if id == ERROR_ID {
            return Some(Kind::ERROR_NAME);
        }
        self.symbols.get(id as usize).map(|symbol| symbol.name)
    }

    pub fn id_for_node_kind(&self, kind: &str, named: bool) -> Option<u16> {
        if named && kind == Kind::ERROR_NAME {
            return Some(ERROR_ID);
        }
        self.ids.get(&(kind, named)).copied()
    }

    /// Symbol id for a tree node kind. Every kind the parser produces has one.
    pub fn id_for_kind(&self, kind: Kind) -> u16 {
        match kind {
            Kind::Error => Some(ERROR_ID),
            Kind::Named(kind) => self.id_for_node_kind(kind.as_str(), true),
            Kind::Anonymous(literal) => self.id_for_node_kind(literal, false),
        }
        .unwrap_or(ERROR_ID)
    }

    pub fn node_kind_is_named(&self, id: u16) -> bool {
        id == ERROR_ID || self.symbols.get(id as usize).is_some_and(|s| s.named)
    }

    pub fn node_kind_is_visible(&self, id: u16) -> bool {
        id == ERROR_ID || self.symbols.get(id as usize).is_some_and(|s| s.visible)
    }

    pub fn field_name_for_id(&self, id: u16) -> Option<&'static str> {
        let index = (id as usize).checked_sub(1)?;
        self.fields.get(index).copied()
    }

    pub fn field_id_for_name(&self, name: &str) -> Option<u16> {
        self.fields
            .iter()
            .position(|field| *field == name)
            .map(|index| index as u16 + 1)
    }

    /// True for words the grammar reserves somewhere; keywords stay usable as identifiers
    /// wherever the grammar does not expect them.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains(&word)
    }

    pub fn keywords(&self) -> &[&'static str] {
        &self.keywords
    }

    /// Opaque pointer handed to C callers.
    pub fn as_raw(&'static self) -> *const TSLanguage {
        (self as *const Language).cast()
    }

    /// Convert a pointer obtained from [`Language::as_raw`] back into the descriptor.
    ///
    /// # Safety
    ///
    /// `raw` must be null or a pointer returned by `tree_sitter_hyperql`.
    pub unsafe fn from_raw(raw: *const TSLanguage) -> Option<&'static Language> {
        // SAFETY: the caller guarantees `raw` points at the static descriptor
        unsafe { raw.cast::<Language>().as_ref() }
    }
}

fn is_word(literal: &str) -> bool {
    let mut chars = literal.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_singleton() {
        assert!(std::ptr::eq(language(), language()));
        assert_eq!(language().name(), "hyperql");
        assert_eq!(language().abi_version(), ABI_VERSION);
    }

    #[test]
    fn test_literals_are_unique() {
        let unique: HashSet<_> = LITERALS.iter().collect();
        assert_eq!(unique.len(), LITERALS.len());
    }

    #[test]
    fn test_symbol_lookup() {
        let lang = language();
        let id = lang.id_for_node_kind("match_clause", true).unwrap();
        assert_eq!(lang.node_kind_for_id(id), Some("match_clause"));
        assert!(lang.node_kind_is_named(id));
        assert!(lang.node_kind_is_visible(id));

        let id = lang.id_for_node_kind("IS NOT NULL", false).unwrap();
        assert!(!lang.node_kind_is_named(id));
        assert!(lang.id_for_node_kind("IS NOT NULL", true).is_none());

        assert_eq!(lang.id_for_node_kind("ERROR", true), Some(ERROR_ID));
        assert_eq!(lang.node_kind_for_id(ERROR_ID), Some("ERROR"));
        assert_eq!(lang.node_kind_for_id(0), Some("end"));
        assert!(lang.id_for_node_kind("_expression", true).is_none());
        assert_eq!(
            lang.node_kind_count(),
            1 + SyntaxKind::ALL.len() + LITERALS.len() + HIDDEN_RULES.len()
        );
    }

    #[test]
    fn test_hidden_rules_are_invisible() {
        let lang = language();
        let hidden = lang
            .symbols()
            .iter()
            .find(|symbol| symbol.name == "_expression")
            .unwrap();
        assert!(hidden.named);
        assert!(!lang.node_kind_is_visible(hidden.id));
    }

    #[test]
    fn test_fields() {
        let lang = language();
        assert_eq!(lang.field_count(), 10);
        assert_eq!(lang.field_id_for_name("name"), Some(1));
        assert_eq!(lang.field_name_for_id(1), Some("name"));
        assert_eq!(lang.field_name_for_id(0), None);
        assert_eq!(lang.field_name_for_id(11), None);
        assert_eq!(lang.field_id_for_name("weight_field"), Some(6));
    }

    #[test]
    fn test_keywords() {
        let lang = language();
        assert!(lang.is_keyword("MATCH"));
        assert!(lang.is_keyword("Int32"));
        assert!(lang.is_keyword("null"));
        assert!(!lang.is_keyword("IS NULL"));
        assert!(!lang.is_keyword("match"));
        assert!(!lang.is_keyword("->"));
    }
}
