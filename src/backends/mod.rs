//! Database backend implementations
//!
//! This module contains concrete implementations of the Driver and
//! Connection traits.

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteConnection, SqliteDriver};
