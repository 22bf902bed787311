//! # Rust DB Session
//!
//! A single-connection database session manager with a dual operating mode.
//! One [`SessionManager`] owns one live connection, runs raw SQL through it,
//! and turns relational results into generic tabular structures.
//!
//! ## Features
//!
//! - **Dual mode**: production sessions commit; test (dry-run) sessions
//!   suppress every commit and roll back on close
//! - **Failure recovery**: a failing write rolls back the whole transaction
//!   before the error is returned
//! - **Generic results**: every query yields ordered column names plus rows of
//!   stringified cells, with a typed variant alongside
//! - **Pluggable drivers**: SQLite is bundled; other databases plug in through
//!   the [`Driver`] trait
//! - **Thread Safety**: single writer by default, opt-in [`SharedSession`]
//!   built on `parking_lot`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rust_db_session::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let info = DatabaseInfo::new()
//!         .name("orders")
//!         .url("sqlite:orders.db")
//!         .mode(ConnectionMode::Production);
//!
//!     let mut session = SessionManager::new();
//!     session.configure(&info)?;
//!     if !session.open() {
//!         return Err(DatabaseError::connection("could not open orders.db"));
//!     }
//!
//!     let result = (|| -> Result<()> {
//!         session.execute("update orders set status = 'shipped' where id = 1")?;
//!         let pending = session.query_count("select * from orders where status = 'pending'")?;
//!         println!("{} order(s) pending", pending);
//!         session.commit()
//!     })();
//!
//!     session.close();
//!     result
//! }
//! ```
//!
//! ## Project Structure
//!
//! ```text
//! rust_db_session/
//! ├── src/
//! │   ├── core/              # Core types and traits
//! │   │   ├── config.rs      # Connection configuration
//! │   │   ├── driver.rs      # Driver / Connection traits
//! │   │   ├── session.rs     # Session manager
//! │   │   ├── table.rs       # Tabular results
//! │   │   └── ...
//! │   ├── backends/          # Driver implementations
//! │   │   └── sqlite.rs
//! │   ├── bin/dbsession/     # Batch CLI
//! │   └── lib.rs
//! ├── tests/                 # Integration tests
//! └── Cargo.toml
//! ```

/// Core session types and traits
pub mod core;

/// Database backend implementations
pub mod backends;

/// Prelude for convenient imports
///
/// ```rust
/// use rust_db_session::prelude::*;
///
/// let mut session = SessionManager::new();
/// session.configure(&DatabaseInfo::new().url("sqlite::memory:")).unwrap();
/// assert!(session.open());
/// session.close();
/// ```
pub mod prelude {
    pub use crate::core::{
        ConnectionMode, DatabaseError, DatabaseInfo, DatabaseType, DatabaseValue, Result,
        SessionManager, SessionState, SharedSession, StringRow, TabularResult, TypedResult,
    };

    #[cfg(feature = "sqlite")]
    pub use crate::backends::SqliteDriver;
}

// Re-export at root level for convenience
pub use core::{
    Connection, ConnectionMode, Cooldown, DatabaseError, DatabaseInfo, DatabaseType,
    DatabaseValue, Driver, Result, SessionManager, SessionSettings, SessionState, SharedSession,
    StringRow, TabularResult, TypedResult,
};

#[cfg(feature = "sqlite")]
pub use backends::SqliteDriver;
