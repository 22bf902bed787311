//! Tabular query results
//!
//! A driver hands back a fully materialized [`ResultSet`]. The session turns
//! it into either a [`TypedResult`] (cells keep their database type) or the
//! string-only [`TabularResult`] that display and export callers consume.

use super::value::DatabaseValue;
use serde::Serialize;
use std::collections::HashMap;

/// A row of a tabular result (column name -> text value, `None` for NULL)
pub type StringRow = HashMap<String, Option<String>>;

/// Raw result of a SELECT as produced by a driver
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    /// Column names in the order declared by the result metadata
    pub columns: Vec<String>,
    /// Row cells, each row in column order
    pub rows: Vec<Vec<DatabaseValue>>,
}

/// Query result with typed cells
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypedResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<DatabaseValue>>,
}

impl TypedResult {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the query returned no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Typed cell lookup by row index and column name
    pub fn get(&self, row: usize, column: &str) -> Option<&DatabaseValue> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }
}

impl From<ResultSet> for TypedResult {
    fn from(rs: ResultSet) -> Self {
        TypedResult {
            columns: rs.columns,
            rows: rs.rows,
        }
    }
}

/// Generic column-list + row-list result with every value stringified
///
/// `rows` are keyed by column name; when a SELECT repeats a name the last
/// column wins there. `cells` keep every value by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TabularResult {
    /// Column names in the order declared by the result metadata
    pub columns: Vec<String>,
    /// Rows in result order
    pub rows: Vec<StringRow>,
    /// Row cells in column order
    pub cells: Vec<Vec<Option<String>>>,
}

impl TabularResult {
    /// Build a result from positional cells
    pub fn new(columns: Vec<String>, cells: Vec<Vec<Option<String>>>) -> Self {
        let rows = cells
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect::<StringRow>()
            })
            .collect();

        TabularResult {
            columns,
            rows,
            cells,
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the query returned no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row, if any
    pub fn first(&self) -> Option<&StringRow> {
        self.rows.first()
    }

    /// Consume the result and keep only its first row
    pub fn into_first(self) -> Option<StringRow> {
        self.rows.into_iter().next()
    }

    /// Cells of one row in column order
    pub fn row_values(&self, index: usize) -> Option<Vec<Option<&str>>> {
        let row = self.cells.get(index)?;
        Some(row.iter().map(|v| v.as_deref()).collect())
    }

    /// All values of the first column with this name, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(
            self.cells
                .iter()
                .map(|row| row.get(index).and_then(|v| v.as_deref()))
                .collect(),
        )
    }
}

impl From<TypedResult> for TabularResult {
    fn from(typed: TypedResult) -> Self {
        let cells = typed
            .rows
            .iter()
            .map(|row| row.iter().map(DatabaseValue::to_text).collect())
            .collect();
        TabularResult::new(typed.columns, cells)
    }
}

impl From<ResultSet> for TabularResult {
    fn from(rs: ResultSet) -> Self {
        TypedResult::from(rs).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResultSet {
        ResultSet {
            columns: vec!["id".to_string(), "name".to_string(), "score".to_string()],
            rows: vec![
                vec![
                    DatabaseValue::Integer(1),
                    DatabaseValue::from("alice"),
                    DatabaseValue::Real(9.5),
                ],
                vec![
                    DatabaseValue::Integer(2),
                    DatabaseValue::Null,
                    DatabaseValue::Real(7.0),
                ],
            ],
        }
    }

    #[test]
    fn test_tabular_from_result_set() {
        let table = TabularResult::from(sample());
        assert_eq!(table.columns, vec!["id", "name", "score"]);
        assert_eq!(table.len(), 2);

        let first = table.first().unwrap();
        assert_eq!(first.get("name").unwrap().as_deref(), Some("alice"));
        assert_eq!(first.get("score").unwrap().as_deref(), Some("9.5"));

        // NULL stays distinguishable from missing columns
        let second = &table.rows[1];
        assert_eq!(second.get("name"), Some(&None));
        assert_eq!(second.get("missing"), None);
    }

    #[test]
    fn test_row_values_follow_column_order() {
        let table = TabularResult::from(sample());
        assert_eq!(
            table.row_values(1).unwrap(),
            vec![Some("2"), None, Some("7.0")]
        );
        assert!(table.row_values(5).is_none());
        assert_eq!(table.column("id").unwrap(), vec![Some("1"), Some("2")]);
        assert!(table.column("nope").is_none());
    }

    #[test]
    fn test_repeated_column_names_keep_every_cell() {
        let rs = ResultSet {
            columns: vec!["id".to_string(), "id".to_string()],
            rows: vec![vec![DatabaseValue::Integer(1), DatabaseValue::Integer(99)]],
        };
        let table = TabularResult::from(rs);
        assert_eq!(table.row_values(0).unwrap(), vec![Some("1"), Some("99")]);
        assert_eq!(table.column("id").unwrap(), vec![Some("1")]);
        // Name lookup keeps the last column of that name
        assert_eq!(table.rows[0].get("id").unwrap().as_deref(), Some("99"));
    }

    #[test]
    fn test_empty_result_keeps_columns() {
        let rs = ResultSet {
            columns: vec!["a".to_string()],
            rows: vec![],
        };
        let table = TabularResult::from(rs);
        assert!(table.is_empty());
        assert_eq!(table.columns, vec!["a"]);
        assert!(table.into_first().is_none());
    }

    #[test]
    fn test_typed_lookup() {
        let typed = TypedResult::from(sample());
        assert_eq!(typed.get(0, "id"), Some(&DatabaseValue::Integer(1)));
        assert_eq!(typed.get(1, "name"), Some(&DatabaseValue::Null));
        assert_eq!(typed.get(2, "id"), None);
        assert_eq!(typed.column_index("score"), Some(2));
    }

    #[test]
    fn test_serializes_to_json() {
        let table = TabularResult::from(sample());
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["columns"][1], "name");
        assert_eq!(json["rows"][0]["id"], "1");
        assert!(json["rows"][1]["name"].is_null());
        assert_eq!(json["cells"][0][1], "alice");
    }
}
