//! SQLite database backend implementation
//!
//! This module provides a SQLite implementation of the Driver and Connection
//! traits. SQLite runs in auto-commit mode unless a transaction is open, so
//! with auto-commit disabled the connection issues `BEGIN` itself before the
//! first statement of every transaction.

#[cfg(feature = "sqlite")]
use crate::core::{
    config::DatabaseInfo,
    database_types::DatabaseType,
    driver::{Connection, Driver},
    error::{DatabaseError, Result},
    table::ResultSet,
    value::DatabaseValue,
};

#[cfg(feature = "sqlite")]
use rusqlite::types::ValueRef;

/// Opens SQLite databases
#[cfg(feature = "sqlite")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDriver;

#[cfg(feature = "sqlite")]
impl SqliteDriver {
    pub fn new() -> Self {
        Self
    }

    /// Strip the URL scheme, leaving what `rusqlite` opens
    ///
    /// `sqlite::memory:` maps to an in-memory database.
    pub fn database_path(url: &str) -> &str {
        let url = url.trim();
        let url = url.strip_prefix("jdbc:").unwrap_or(url);
        let rest = url
            .strip_prefix("sqlite3:")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);
        rest.strip_prefix("//").unwrap_or(rest)
    }
}

#[cfg(feature = "sqlite")]
impl Driver for SqliteDriver {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::Sqlite
    }

    fn connect(&self, info: &DatabaseInfo) -> Result<Box<dyn Connection>> {
        let path = Self::database_path(info.get_url());
        if path.is_empty() {
            return Err(DatabaseError::connection("SQLite database path is empty"));
        }

        // SQLite has no authentication; user and credential are accepted as-is
        let conn = rusqlite::Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;

        Ok(Box::new(SqliteConnection {
            conn: Some(conn),
            auto_commit: true,
        }))
    }
}

/// SQLite connection
#[cfg(feature = "sqlite")]
pub struct SqliteConnection {
    conn: Option<rusqlite::Connection>,
    auto_commit: bool,
}

#[cfg(feature = "sqlite")]
impl SqliteConnection {
    fn live(&self) -> Result<&rusqlite::Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| DatabaseError::connection("Connection is closed"))
    }

    /// Open a transaction if auto-commit is off and none is pending
    fn begin_if_needed(&self) -> Result<&rusqlite::Connection> {
        let conn = self.live()?;
        if !self.auto_commit && conn.is_autocommit() {
            conn.execute_batch("BEGIN")?;
        }
        Ok(conn)
    }

    fn to_value(value: ValueRef<'_>) -> DatabaseValue {
        match value {
            ValueRef::Null => DatabaseValue::Null,
            ValueRef::Integer(v) => DatabaseValue::Integer(v),
            ValueRef::Real(v) => DatabaseValue::Real(v),
            ValueRef::Text(v) => DatabaseValue::Text(String::from_utf8_lossy(v).into_owned()),
            ValueRef::Blob(v) => DatabaseValue::Blob(v.to_vec()),
        }
    }
}

#[cfg(feature = "sqlite")]
impl Connection for SqliteConnection {
    fn execute(&mut self, sql: &str) -> Result<u64> {
        let conn = self.begin_if_needed()?;
        let affected = conn.execute(sql, [])?;
        Ok(affected as u64)
    }

    fn query(&mut self, sql: &str) -> Result<ResultSet> {
        let conn = self.begin_if_needed()?;

        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let column_count = columns.len();

        let mut rows = stmt.query([])?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(column_count);
            for i in 0..column_count {
                cells.push(Self::to_value(row.get_ref(i)?));
            }
            result.push(cells);
        }

        Ok(ResultSet {
            columns,
            rows: result,
        })
    }

    fn commit(&mut self) -> Result<()> {
        let conn = self.live()?;
        if !conn.is_autocommit() {
            conn.execute_batch("COMMIT")?;
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        let conn = self.live()?;
        if !conn.is_autocommit() {
            conn.execute_batch("ROLLBACK")?;
        }
        Ok(())
    }

    fn set_auto_commit(&mut self, enabled: bool) -> Result<()> {
        if enabled && !self.auto_commit {
            self.commit()?;
        }
        self.auto_commit = enabled;
        Ok(())
    }

    fn auto_commit(&self) -> bool {
        self.auto_commit
    }

    fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    fn close(mut self: Box<Self>) -> Result<()> {
        match self.conn.take() {
            // SQLite discards an open transaction when the connection closes
            Some(conn) => conn.close().map_err(|(_, e)| DatabaseError::from(e)),
            None => Ok(()),
        }
    }
}
