//! Connection configuration
//!
//! [`DatabaseInfo`] is the value a caller builds and hands to the session
//! manager. The manager keeps its own copy, so later changes to the caller's
//! value never reach an active session.

use super::database_types::DatabaseType;
use super::error::{DatabaseError, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Property key: display name of the database
pub const KEY_DB_NAME: &str = "dbName";
/// Property key: endpoint URL
pub const KEY_DB_URL: &str = "dbUrl";
/// Property key: user name
pub const KEY_DB_USER: &str = "dbUser";
/// Property key: credential
pub const KEY_DB_PASS: &str = "dbPass";
/// Property key: operating mode (`production` commits, `test` never does)
pub const KEY_DB_MODE: &str = "dbMode";
/// Property key: production cooldown in seconds
pub const KEY_DB_COOLDOWN: &str = "dbCooldown";

/// Text substituted for credentials in logs and dumps
pub const REDACTED: &str = "[REDACTED]";

/// Pause applied before a production session proceeds, when one is requested
pub const DEFAULT_PRODUCTION_COOLDOWN: Duration = Duration::from_secs(10);

/// Operating mode of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
    /// Dry run: commit is suppressed and close always rolls back
    #[default]
    Test,
    /// Commit persists writes
    Production,
}

impl ConnectionMode {
    /// Whether `commit()` actually persists in this mode
    pub fn commits(&self) -> bool {
        matches!(self, ConnectionMode::Production)
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            ConnectionMode::Test => "test",
            ConnectionMode::Production => "production",
        }
    }
}

impl std::fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl From<bool> for ConnectionMode {
    fn from(production: bool) -> Self {
        if production {
            ConnectionMode::Production
        } else {
            ConnectionMode::Test
        }
    }
}

impl FromStr for ConnectionMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" | "true" | "commit" => Ok(ConnectionMode::Production),
            "test" | "dry-run" | "dryrun" | "false" => Ok(ConnectionMode::Test),
            _ => Err(format!("Invalid connection mode: '{}'", s)),
        }
    }
}

/// Accepts the same names as [`FromStr`] or a boolean production flag
impl<'de> Deserialize<'de> for ConnectionMode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawMode {
            Flag(bool),
            Name(String),
        }

        match RawMode::deserialize(deserializer)? {
            RawMode::Flag(production) => Ok(production.into()),
            RawMode::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Connection parameters and operating mode for one session
#[derive(Debug)]
pub struct DatabaseInfo {
    name: String,
    url: String,
    user: String,
    password: SecretString,
    mode: ConnectionMode,
    cooldown: Duration,
}

impl DatabaseInfo {
    /// Create an empty configuration in test mode
    pub fn new() -> Self {
        Self {
            name: String::new(),
            url: String::new(),
            user: String::new(),
            password: SecretString::from(String::new()),
            mode: ConnectionMode::Test,
            cooldown: Duration::ZERO,
        }
    }

    /// Set the display name
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Set the endpoint URL
    pub fn url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = url.into();
        self
    }

    /// Set the user name
    pub fn user<S: Into<String>>(mut self, user: S) -> Self {
        self.user = user.into();
        self
    }

    /// Set the credential
    pub fn password<S: Into<String>>(mut self, password: S) -> Self {
        self.password = SecretString::from(password.into());
        self
    }

    /// Set the operating mode
    pub fn mode(mut self, mode: ConnectionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for `mode(ConnectionMode::Production)`
    pub fn production(self) -> Self {
        self.mode(ConnectionMode::Production)
    }

    /// Set the pause applied when a production session is configured
    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_url(&self) -> &str {
        &self.url
    }

    pub fn get_user(&self) -> &str {
        &self.user
    }

    /// The credential in clear text, for drivers only
    pub fn expose_password(&self) -> &str {
        self.password.expose_secret()
    }

    /// The credential as it may appear in logs
    pub fn masked_password(&self) -> &'static str {
        REDACTED
    }

    pub fn get_mode(&self) -> ConnectionMode {
        self.mode
    }

    pub fn get_cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Database type named by the endpoint URL
    pub fn database_type(&self) -> DatabaseType {
        DatabaseType::from_url(&self.url)
    }

    /// Check the parameters before a session accepts them
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(DatabaseError::configuration("endpoint url is empty"));
        }
        if self.database_type() == DatabaseType::None {
            return Err(DatabaseError::configuration(format!(
                "unrecognised endpoint url: {}",
                self.url
            )));
        }
        Ok(())
    }
}

impl Default for DatabaseInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DatabaseInfo {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            url: self.url.clone(),
            user: self.user.clone(),
            password: SecretString::from(self.password.expose_secret().to_string()),
            mode: self.mode,
            cooldown: self.cooldown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_getters() {
        let info = DatabaseInfo::new()
            .name("orders")
            .url("sqlite::memory:")
            .user("scott")
            .password("tiger")
            .production()
            .cooldown(Duration::from_secs(3));

        assert_eq!(info.get_name(), "orders");
        assert_eq!(info.get_url(), "sqlite::memory:");
        assert_eq!(info.get_user(), "scott");
        assert_eq!(info.expose_password(), "tiger");
        assert_eq!(info.get_mode(), ConnectionMode::Production);
        assert_eq!(info.get_cooldown(), Duration::from_secs(3));
        assert_eq!(info.database_type(), DatabaseType::Sqlite);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = DatabaseInfo::new().url("a.db").password("one");
        let copy = original.clone();
        let original = original.url("b.db").password("two").production();

        assert_eq!(copy.get_url(), "a.db");
        assert_eq!(copy.expose_password(), "one");
        assert_eq!(copy.get_mode(), ConnectionMode::Test);
        assert_eq!(original.get_url(), "b.db");
    }

    #[test]
    fn test_debug_never_shows_password() {
        let info = DatabaseInfo::new().url("a.db").password("hunter2");
        assert!(!format!("{:?}", info).contains("hunter2"));
        assert_eq!(info.masked_password(), REDACTED);
    }

    #[test]
    fn test_validate() {
        assert!(matches!(
            DatabaseInfo::new().validate(),
            Err(DatabaseError::Configuration(_))
        ));
        assert!(DatabaseInfo::new().url("redis://x").validate().is_err());
        assert!(DatabaseInfo::new().url("sqlite::memory:").validate().is_ok());
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("production".parse(), Ok(ConnectionMode::Production));
        assert_eq!("TRUE".parse(), Ok(ConnectionMode::Production));
        assert_eq!("dry-run".parse(), Ok(ConnectionMode::Test));
        assert_eq!("false".parse(), Ok(ConnectionMode::Test));
        assert!("maybe".parse::<ConnectionMode>().is_err());
        assert_eq!(ConnectionMode::from(true), ConnectionMode::Production);
        assert!(!ConnectionMode::default().commits());
    }
}
