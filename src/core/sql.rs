//! SQL text helpers
//!
//! The session works on raw SQL strings. These helpers build the few
//! fragments it and its callers need: the count wrapper and `IN (...)` lists.

use super::table::StringRow;

/// Column alias used by [`count_query`]
pub const COUNT_COLUMN: &str = "cnt";

/// Wrap a SELECT so it returns its row count in a single `cnt` column
///
/// The statement must be a valid subquery body. A trailing `;` is dropped.
pub fn count_query(sql: &str) -> String {
    let body = sql.trim().trim_end_matches(';').trim_end();
    format!("select count(*) as {} from ( {} )", COUNT_COLUMN, body)
}

/// Quote a value as a SQL string literal, doubling embedded quotes
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Render values as the body of an `IN (...)` list: `'a','b','c'`
///
/// Returns `None` for an empty input, since `IN ()` is not valid SQL.
pub fn in_list<I, S>(values: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let quoted: Vec<String> = values
        .into_iter()
        .map(|v| quote_literal(v.as_ref()))
        .collect();
    if quoted.is_empty() {
        None
    } else {
        Some(quoted.join(","))
    }
}

/// Render one column of a set of rows as an `IN (...)` list body
///
/// Rows where the column is missing or NULL are skipped.
pub fn in_list_by_key(rows: &[StringRow], key: &str) -> Option<String> {
    in_list(
        rows.iter()
            .filter_map(|row| row.get(key).and_then(|v| v.as_deref())),
    )
}
