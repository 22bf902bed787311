//! Core session types
//!
//! This module provides the building blocks of the session manager: the
//! configuration value, the driver seam, tabular results, and the manager
//! itself.

pub mod config;
pub mod cooldown;
pub mod database_types;
pub mod driver;
pub mod error;
pub mod session;
pub mod settings;
pub mod sql;
pub mod table;
pub mod value;

// Re-export commonly used types
pub use config::{ConnectionMode, DatabaseInfo};
pub use cooldown::{Cooldown, CountdownCooldown, NoCooldown};
pub use database_types::DatabaseType;
pub use driver::{Connection, Driver};
pub use error::{DatabaseError, Result};
pub use session::{SessionManager, SessionState, SharedSession};
pub use settings::SessionSettings;
pub use table::{ResultSet, StringRow, TabularResult, TypedResult};
pub use value::DatabaseValue;
