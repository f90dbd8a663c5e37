use hyperql_parser::{parse_source, Tree};

pub(crate) const SAMPLE: &str = r#"-- Library schema
DEFINE NAMESPACE app.library;

DEFINE ENUM Format { Hardcover, Paperback }
DEFINE FIELD title: String @required;

DEFINE NODE Book {
    title,
    format
}
DEFINE EDGE Borrowed { reader: Member (ONE), since }

/* Readers with
   overdue books */
MATCH (m:Member)-[:Borrowed]->(b:Book)
WHERE b.due < now() && m.active == true
RETURN m.name, count(b) AS overdue, $limit;
"#;

pub(crate) fn sample_tree() -> Tree {
    parse_source(SAMPLE)
}
