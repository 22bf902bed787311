//! Database type definitions
//!
//! This module identifies which database an endpoint URL points at, so the
//! session can pick a driver for it.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Database kinds an endpoint URL can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum DatabaseType {
    /// Unknown or unrecognised endpoint
    #[default]
    None = 0,
    /// PostgreSQL database
    Postgres = 1,
    /// MySQL/MariaDB database
    Mysql = 2,
    /// SQLite database
    Sqlite = 3,
    /// Oracle database
    Oracle = 4,
}

impl DatabaseType {
    /// Convert database type to string representation
    pub fn to_str(&self) -> &'static str {
        match self {
            DatabaseType::None => "none",
            DatabaseType::Postgres => "postgres",
            DatabaseType::Mysql => "mysql",
            DatabaseType::Sqlite => "sqlite",
            DatabaseType::Oracle => "oracle",
        }
    }

    /// Detect the database type from an endpoint URL
    ///
    /// An optional `jdbc:` prefix is ignored. URLs without a recognised scheme
    /// (plain file paths, `:memory:`) are treated as SQLite.
    pub fn from_url(url: &str) -> Self {
        let url = url.trim();
        if url.is_empty() {
            return DatabaseType::None;
        }
        let url = url.strip_prefix("jdbc:").unwrap_or(url);

        match url.split_once(':') {
            Some((scheme, _)) if !scheme.is_empty() => match scheme.parse() {
                Ok(db_type) => db_type,
                // Windows drive letters look like a one-character scheme
                Err(_) if scheme.len() == 1 => DatabaseType::Sqlite,
                Err(_) => DatabaseType::None,
            },
            _ => DatabaseType::Sqlite,
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for DatabaseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(DatabaseType::None),
            "postgres" | "postgresql" => Ok(DatabaseType::Postgres),
            "mysql" | "mariadb" => Ok(DatabaseType::Mysql),
            "sqlite" | "sqlite3" => Ok(DatabaseType::Sqlite),
            "oracle" => Ok(DatabaseType::Oracle),
            _ => Err(format!("Invalid database type: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_type_from_str() {
        assert_eq!(
            "postgresql".parse::<DatabaseType>().ok(),
            Some(DatabaseType::Postgres)
        );
        assert_eq!(
            "sqlite3".parse::<DatabaseType>().ok(),
            Some(DatabaseType::Sqlite)
        );
        assert_eq!("unknown".parse::<DatabaseType>().ok(), None);
    }

    #[test]
    fn test_from_url_schemes() {
        assert_eq!(DatabaseType::from_url("sqlite::memory:"), DatabaseType::Sqlite);
        assert_eq!(DatabaseType::from_url("sqlite:///tmp/a.db"), DatabaseType::Sqlite);
        assert_eq!(DatabaseType::from_url("jdbc:sqlite:a.db"), DatabaseType::Sqlite);
        assert_eq!(
            DatabaseType::from_url("jdbc:oracle:thin:@localhost:1521:orcl"),
            DatabaseType::Oracle
        );
        assert_eq!(
            DatabaseType::from_url("postgres://user@localhost/db"),
            DatabaseType::Postgres
        );
        assert_eq!(DatabaseType::from_url("mysql://localhost/db"), DatabaseType::Mysql);
    }

    #[test]
    fn test_from_url_bare_paths() {
        assert_eq!(DatabaseType::from_url(":memory:"), DatabaseType::Sqlite);
        assert_eq!(DatabaseType::from_url("data/app.db"), DatabaseType::Sqlite);
        assert_eq!(DatabaseType::from_url("C:\\data\\app.db"), DatabaseType::Sqlite);
        assert_eq!(DatabaseType::from_url("redis://localhost"), DatabaseType::None);
        assert_eq!(DatabaseType::from_url(""), DatabaseType::None);
    }
}
