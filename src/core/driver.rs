//! Driver and connection traits
//!
//! This module defines the seam between the session manager and a concrete
//! database. A [`Driver`] opens connections for the endpoints it accepts; a
//! [`Connection`] runs raw SQL text and owns the physical transaction.

use super::config::DatabaseInfo;
use super::database_types::DatabaseType;
use super::error::Result;
use super::table::ResultSet;

/// Opens connections for one kind of database
pub trait Driver: Send + Sync {
    /// Get the database type this driver serves
    fn database_type(&self) -> DatabaseType;

    /// Whether this driver can open the given endpoint URL
    fn accepts(&self, url: &str) -> bool {
        DatabaseType::from_url(url) == self.database_type()
    }

    /// Open a physical connection using the configured endpoint and credentials
    fn connect(&self, info: &DatabaseInfo) -> Result<Box<dyn Connection>>;
}

/// A live physical connection
///
/// With auto-commit disabled a transaction is implicitly begun by the first
/// statement, and again by the first statement after each commit or rollback.
/// All methods block until the database round-trip completes.
pub trait Connection: Send {
    /// Execute a statement that doesn't return rows (INSERT, UPDATE, DELETE, DDL)
    ///
    /// Returns the number of affected rows.
    fn execute(&mut self, sql: &str) -> Result<u64>;

    /// Execute a SELECT and materialize every row
    fn query(&mut self, sql: &str) -> Result<ResultSet>;

    /// Commit the pending transaction, if any
    fn commit(&mut self) -> Result<()>;

    /// Roll back the pending transaction, if any
    fn rollback(&mut self) -> Result<()>;

    /// Switch auto-commit on or off
    ///
    /// Turning auto-commit on while a transaction is pending commits it.
    fn set_auto_commit(&mut self, enabled: bool) -> Result<()>;

    /// Current auto-commit setting
    fn auto_commit(&self) -> bool;

    /// Whether the connection has been closed
    fn is_closed(&self) -> bool;

    /// Close the connection, discarding any uncommitted work
    fn close(self: Box<Self>) -> Result<()>;
}
