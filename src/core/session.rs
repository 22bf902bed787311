//! Session manager
//!
//! A [`SessionManager`] owns at most one live connection and routes every
//! statement through a mode-aware transaction policy:
//!
//! - auto-commit is always off while the connection is open;
//! - in test mode `commit()` is suppressed and `close()` rolls back, so a
//!   test session never persists anything;
//! - a failing `execute()` rolls back the whole transaction before the error
//!   reaches the caller;
//! - `open()` and `close()` never return errors; open reports a boolean and
//!   close logs and swallows.
//!
//! The manager is owned by the caller and its methods take `&mut self`, so a
//! single writer is enforced at compile time. [`SharedSession`] wraps it in a
//! mutex for callers that need to drive one session from several threads.
//!
//! # Example
//!
//! ```rust,no_run
//! use rust_db_session::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut session = SessionManager::new();
//!     session.configure(&DatabaseInfo::new().url("sqlite:orders.db"))?;
//!     if !session.open() {
//!         return Err(DatabaseError::connection("could not open orders.db"));
//!     }
//!
//!     session.execute("insert into orders (id) values (1)")?;
//!     let table = session.query("select * from orders")?;
//!     println!("{} row(s)", table.len());
//!
//!     // Test mode: suppressed, and close() rolls the insert back
//!     session.commit()?;
//!     session.close();
//!     Ok(())
//! }
//! ```

use super::config::{ConnectionMode, DatabaseInfo};
use super::cooldown::{Cooldown, CountdownCooldown};
use super::driver::{Connection, Driver};
use super::error::{DatabaseError, Result};
use super::sql;
use super::table::{StringRow, TabularResult, TypedResult};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No configuration accepted yet
    Unconfigured,
    /// Configured, never opened
    Configured,
    /// A live connection exists
    Open,
    /// The last connection was closed; `open()` may be called again
    Closed,
}

/// Owns one database connection and its transaction policy
pub struct SessionManager {
    drivers: Vec<Box<dyn Driver>>,
    cooldown: Box<dyn Cooldown>,
    config: Option<DatabaseInfo>,
    connection: Option<Box<dyn Connection>>,
    was_opened: bool,
}

impl SessionManager {
    /// Create a session manager with the built-in drivers registered
    pub fn new() -> Self {
        let mut manager = Self::without_drivers();
        #[cfg(feature = "sqlite")]
        manager
            .drivers
            .push(Box::new(crate::backends::sqlite::SqliteDriver::new()));
        manager
    }

    /// Create a session manager with no drivers registered
    pub fn without_drivers() -> Self {
        Self {
            drivers: Vec::new(),
            cooldown: Box::new(CountdownCooldown),
            config: None,
            connection: None,
            was_opened: false,
        }
    }

    /// Register a driver; later registrations take precedence
    pub fn with_driver(mut self, driver: impl Driver + 'static) -> Self {
        self.drivers.insert(0, Box::new(driver));
        self
    }

    /// Replace the production-mode cooldown
    pub fn with_cooldown(mut self, cooldown: impl Cooldown + 'static) -> Self {
        self.cooldown = Box::new(cooldown);
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        match (&self.config, &self.connection) {
            (_, Some(_)) => SessionState::Open,
            (None, None) => SessionState::Unconfigured,
            (Some(_), None) if self.was_opened => SessionState::Closed,
            (Some(_), None) => SessionState::Configured,
        }
    }

    /// Whether a live connection exists
    pub fn is_open(&self) -> bool {
        self.connection.as_ref().is_some_and(|c| !c.is_closed())
    }

    /// Active configuration, if any
    pub fn config(&self) -> Option<&DatabaseInfo> {
        self.config.as_ref()
    }

    /// Operating mode of the active configuration
    pub fn mode(&self) -> Option<ConnectionMode> {
        self.config.as_ref().map(|c| c.get_mode())
    }

    /// Accept a configuration
    ///
    /// The manager keeps its own copy; changing `info` afterwards has no
    /// effect on the session. Rejected while a connection is open, and when the
    /// parameters are invalid. In production mode the configured cooldown runs
    /// before this returns.
    pub fn configure(&mut self, info: &DatabaseInfo) -> Result<()> {
        if self.is_open() {
            log::error!("configure rejected: a connection is open");
            return Err(DatabaseError::configuration(
                "cannot reconfigure while a connection is open",
            ));
        }
        if let Err(e) = info.validate() {
            log::error!("configure rejected: {}", e);
            return Err(e);
        }

        let info = info.clone();
        log::info!("------------------ connection ------------------");
        log::info!("[database] NAME : {}", info.get_name());
        log::info!("[database] URL  : {}", info.get_url());
        log::info!("[database] USER : {}", info.get_user());
        log::info!("[database] PASS : {}", info.masked_password());
        match info.get_mode() {
            ConnectionMode::Production => log::debug!("[mode] production (commit enabled)"),
            ConnectionMode::Test => log::debug!("[mode] test (commit suppressed)"),
        }

        if info.get_mode().commits() && !info.get_cooldown().is_zero() {
            self.cooldown.wait(info.get_cooldown());
        }

        self.config = Some(info);
        self.was_opened = false;
        Ok(())
    }

    /// Open the physical connection with auto-commit disabled
    ///
    /// Returns `false` and logs on any failure; no connection is kept in
    /// that case. Opening while already open closes the old connection first.
    pub fn open(&mut self) -> bool {
        let info = match &self.config {
            Some(info) => info.clone(),
            None => {
                log::error!("database open error: {}", DatabaseError::NotConfigured);
                return false;
            }
        };

        if self.connection.is_some() {
            log::debug!("closing the previous connection before reopening");
            self.close();
        }

        match self.connect(&info) {
            Ok(conn) => {
                self.connection = Some(conn);
                self.was_opened = true;
                log::info!("database open");
                true
            }
            Err(e) => {
                log::error!("database open error: {}", e);
                false
            }
        }
    }

    fn connect(&self, info: &DatabaseInfo) -> Result<Box<dyn Connection>> {
        let driver = self
            .drivers
            .iter()
            .find(|d| d.accepts(info.get_url()))
            .ok_or_else(|| DatabaseError::unsupported(info.get_url()))?;

        let mut conn = driver.connect(info)?;
        if let Err(e) = conn.set_auto_commit(false) {
            if let Err(close_err) = conn.close() {
                log::error!("database close error: {}", close_err);
            }
            return Err(e);
        }
        Ok(conn)
    }

    fn connection(&mut self) -> Result<&mut Box<dyn Connection>> {
        match self.connection.as_mut() {
            Some(conn) if !conn.is_closed() => Ok(conn),
            _ => Err(DatabaseError::connection("Not connected to database")),
        }
    }

    /// Run a SELECT and return every row with typed cells
    pub fn query_typed(&mut self, sql: &str) -> Result<TypedResult> {
        let conn = self.connection()?;
        log::debug!("{}", sql);
        let result = TypedResult::from(conn.query(sql)?);
        log::debug!("query returned {} row(s)", result.len());
        Ok(result)
    }

    /// Run a SELECT and return every row with stringified cells
    ///
    /// Errors propagate unchanged; a failed read does not roll back.
    pub fn query(&mut self, sql: &str) -> Result<TabularResult> {
        self.query_typed(sql).map(TabularResult::from)
    }

    /// First row of a SELECT, or `None` when it returned no rows
    pub fn query_one(&mut self, sql: &str) -> Result<Option<StringRow>> {
        Ok(self.query(sql)?.into_first())
    }

    /// Number of rows a SELECT returns
    ///
    /// `sql` must be usable as a subquery body.
    pub fn query_count(&mut self, sql: &str) -> Result<u64> {
        let row = self
            .query_one(&sql::count_query(sql))?
            .ok_or_else(|| DatabaseError::query("count query returned no rows"))?;

        let count = row
            .get(sql::COUNT_COLUMN)
            .and_then(|v| v.as_deref())
            .ok_or_else(|| DatabaseError::query("count query returned no value"))?;
        count
            .parse()
            .map_err(|_| DatabaseError::type_mismatch("non-negative integer", count))
    }

    /// Run an INSERT, UPDATE, DELETE or DDL statement in the current transaction
    ///
    /// On failure the whole transaction is rolled back before the error is
    /// returned.
    pub fn execute(&mut self, sql: &str) -> Result<u64> {
        let conn = self.connection()?;
        log::debug!("{}", sql);

        match conn.execute(sql) {
            Ok(count) => {
                log::debug!("affected {} row(s)", count);
                Ok(count)
            }
            Err(e) => {
                log::error!("statement failed: {}", e);
                if let Err(rollback_err) = self.rollback() {
                    log::error!("rollback after failed statement failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    /// Commit the current transaction
    ///
    /// Suppressed in test mode. A no-op when no connection is open.
    pub fn commit(&mut self) -> Result<()> {
        if self.mode() != Some(ConnectionMode::Production) {
            log::debug!("test mode does not commit");
            return Ok(());
        }
        if let Some(conn) = self.connection.as_mut().filter(|c| !c.is_closed()) {
            conn.commit()?;
            log::info!("commit");
        }
        Ok(())
    }

    /// Roll back the current transaction
    ///
    /// A no-op when no connection is open.
    pub fn rollback(&mut self) -> Result<()> {
        if let Some(conn) = self.connection.as_mut().filter(|c| !c.is_closed()) {
            conn.rollback()?;
            log::info!("rollback");
        }
        Ok(())
    }

    /// Close the connection
    ///
    /// Test mode always rolls back first. Production mode closes directly and
    /// any uncommitted work is discarded by the close. Errors are logged and
    /// swallowed.
    pub fn close(&mut self) {
        let Some(mut conn) = self.connection.take() else {
            return;
        };

        if !conn.is_closed() {
            if self.mode() != Some(ConnectionMode::Production) {
                match conn.rollback() {
                    Ok(()) => log::info!("rollback"),
                    Err(e) => log::error!("database close error: {}", e),
                }
            }
            if let Err(e) = conn.close() {
                log::error!("database close error: {}", e);
                return;
            }
        }
        log::info!("database close");
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        // Same policy as an explicit close: test mode never persists
        if self.connection.is_some() {
            self.close();
        }
    }
}

/// A session manager that can be shared between threads
///
/// Every call takes the lock for its own duration. Hold a guard from
/// [`SharedSession::lock`] to keep a whole open-execute-commit-close sequence
/// free of interleaving.
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<SessionManager>>,
}

impl SharedSession {
    pub fn new(manager: SessionManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    /// Exclusive access to the session
    pub fn lock(&self) -> MutexGuard<'_, SessionManager> {
        self.inner.lock()
    }

    /// Run a closure with exclusive access to the session
    pub fn with<T>(&self, f: impl FnOnce(&mut SessionManager) -> T) -> T {
        let mut guard = self.inner.lock();
        f(&mut *guard)
    }

    pub fn configure(&self, info: &DatabaseInfo) -> Result<()> {
        self.lock().configure(info)
    }

    pub fn open(&self) -> bool {
        self.lock().open()
    }

    pub fn query(&self, sql: &str) -> Result<TabularResult> {
        self.lock().query(sql)
    }

    pub fn query_one(&self, sql: &str) -> Result<Option<StringRow>> {
        self.lock().query_one(sql)
    }

    pub fn query_count(&self, sql: &str) -> Result<u64> {
        self.lock().query_count(sql)
    }

    pub fn execute(&self, sql: &str) -> Result<u64> {
        self.lock().execute(sql)
    }

    pub fn commit(&self) -> Result<()> {
        self.lock().commit()
    }

    pub fn rollback(&self) -> Result<()> {
        self.lock().rollback()
    }

    pub fn close(&self) {
        self.lock().close()
    }
}

impl From<SessionManager> for SharedSession {
    fn from(manager: SessionManager) -> Self {
        Self::new(manager)
    }
}
