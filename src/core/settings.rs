//! Loading connection settings
//!
//! Two sources feed a [`DatabaseInfo`]: a flat property map keyed by the
//! `dbName`/`dbUrl`/... keys, and a TOML settings file holding named profiles
//! under `[profiles.<name>]` with the same keys.

use super::config::{
    ConnectionMode, DatabaseInfo, KEY_DB_COOLDOWN, KEY_DB_MODE, KEY_DB_NAME, KEY_DB_PASS,
    KEY_DB_URL, KEY_DB_USER, REDACTED,
};
use super::error::{DatabaseError, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Duration;

impl DatabaseInfo {
    /// Build a configuration from a flat property map
    pub fn from_properties(props: &HashMap<String, String>) -> Result<Self> {
        let url = props
            .get(KEY_DB_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                DatabaseError::configuration(format!("missing property {}", KEY_DB_URL))
            })?;

        let mut info = DatabaseInfo::new().url(url.trim());
        if let Some(name) = props.get(KEY_DB_NAME) {
            info = info.name(name.trim());
        }
        if let Some(user) = props.get(KEY_DB_USER) {
            info = info.user(user.trim());
        }
        if let Some(pass) = props.get(KEY_DB_PASS) {
            info = info.password(pass.clone());
        }
        if let Some(mode) = props.get(KEY_DB_MODE) {
            info = info.mode(
                mode.parse::<ConnectionMode>()
                    .map_err(DatabaseError::configuration)?,
            );
        }
        if let Some(secs) = props.get(KEY_DB_COOLDOWN) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                DatabaseError::configuration(format!(
                    "{} is not a number: {}",
                    KEY_DB_COOLDOWN, secs
                ))
            })?;
            info = info.cooldown(Duration::from_secs(secs));
        }
        Ok(info)
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
struct TomlDefaults {
    profile: Option<String>,
}

/// One `[profiles.<name>]` table
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSettings {
    pub db_name: Option<String>,
    pub db_url: Option<String>,
    pub db_user: Option<String>,
    pub db_pass: Option<String>,
    /// Name of an environment variable holding the credential
    pub db_pass_env: Option<String>,
    pub db_mode: Option<ConnectionMode>,
    pub db_cooldown: Option<u64>,
}

impl ProfileSettings {
    fn resolve_password(&self) -> Option<String> {
        if let Some(key) = &self.db_pass_env {
            if let Ok(val) = std::env::var(key) {
                if !val.is_empty() {
                    return Some(val);
                }
            }
        }
        self.db_pass.clone()
    }

    /// Build the connection configuration for this profile
    pub fn to_database_info(&self, profile: &str) -> Result<DatabaseInfo> {
        let url = self
            .db_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                DatabaseError::configuration(format!(
                    "profile '{}' has no {}",
                    profile, KEY_DB_URL
                ))
            })?;

        let mut info = DatabaseInfo::new()
            .name(self.db_name.clone().unwrap_or_else(|| profile.to_string()))
            .url(url)
            .user(self.db_user.clone().unwrap_or_default())
            .mode(self.db_mode.unwrap_or_default())
            .cooldown(Duration::from_secs(self.db_cooldown.unwrap_or(0)));
        if let Some(password) = self.resolve_password() {
            info = info.password(password);
        }
        Ok(info)
    }
}

/// Parsed settings file
#[derive(Debug, Deserialize, Default, Clone)]
pub struct SessionSettings {
    #[serde(default)]
    defaults: TomlDefaults,
    #[serde(default)]
    profiles: BTreeMap<String, ProfileSettings>,
}

impl SessionSettings {
    /// Parse settings from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&content)?;
        log::debug!(
            "loaded {} profile(s) from {}",
            settings.profiles.len(),
            path.display()
        );
        Ok(settings)
    }

    /// Profile names in sorted order
    pub fn profile_names(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    /// Build the configuration for a named profile
    pub fn profile(&self, name: &str) -> Result<DatabaseInfo> {
        self.profiles
            .get(name)
            .ok_or_else(|| {
                DatabaseError::configuration(format!("profile '{}' not found", name))
            })?
            .to_database_info(name)
    }

    /// Build the configuration for the default profile
    ///
    /// The default is `[defaults] profile`, or the only profile when exactly
    /// one is defined.
    pub fn default_profile(&self) -> Result<DatabaseInfo> {
        match (&self.defaults.profile, self.profiles.len()) {
            (Some(name), _) => self.profile(name),
            (None, 1) => {
                let (name, profile) = self
                    .profiles
                    .iter()
                    .next()
                    .ok_or_else(|| DatabaseError::configuration("no profiles defined"))?;
                profile.to_database_info(name)
            }
            (None, 0) => Err(DatabaseError::configuration("no profiles defined")),
            (None, _) => Err(DatabaseError::configuration(
                "several profiles defined and no default selected",
            )),
        }
    }

    /// Sorted `key : value` listing of a profile, credential masked
    pub fn dump(&self, name: &str) -> Result<Vec<String>> {
        let info = self.profile(name)?;
        let mut entries = vec![
            (KEY_DB_NAME, info.get_name().to_string()),
            (KEY_DB_URL, info.get_url().to_string()),
            (KEY_DB_USER, info.get_user().to_string()),
            (KEY_DB_PASS, REDACTED.to_string()),
            (KEY_DB_MODE, info.get_mode().to_string()),
            (KEY_DB_COOLDOWN, info.get_cooldown().as_secs().to_string()),
        ];
        entries.sort_by(|a, b| a.0.cmp(b.0));
        Ok(entries
            .into_iter()
            .map(|(k, v)| format!("{:<25} : {}", k, v))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[defaults]
profile = "local"

[profiles.local]
dbName = "Local orders"
dbUrl = "sqlite:orders.db"
dbUser = "scott"
dbPass = "tiger"
dbMode = "test"

[profiles.live]
dbUrl = "sqlite:/srv/orders.db"
dbMode = "production"
dbCooldown = 10
"#;

    #[test]
    fn test_from_properties() {
        let mut props = HashMap::new();
        props.insert("dbUrl".to_string(), "sqlite::memory:".to_string());
        props.insert("dbUser".to_string(), "scott".to_string());
        props.insert("dbPass".to_string(), "tiger".to_string());
        props.insert("dbMode".to_string(), "true".to_string());
        props.insert("dbCooldown".to_string(), "5".to_string());

        let info = DatabaseInfo::from_properties(&props).unwrap();
        assert_eq!(info.get_url(), "sqlite::memory:");
        assert_eq!(info.get_user(), "scott");
        assert_eq!(info.expose_password(), "tiger");
        assert_eq!(info.get_mode(), ConnectionMode::Production);
        assert_eq!(info.get_cooldown(), Duration::from_secs(5));
    }

    #[test]
    fn test_from_properties_rejects_bad_input() {
        let props = HashMap::new();
        assert!(matches!(
            DatabaseInfo::from_properties(&props),
            Err(DatabaseError::Configuration(_))
        ));

        let mut props = HashMap::new();
        props.insert("dbUrl".to_string(), "a.db".to_string());
        props.insert("dbMode".to_string(), "sometimes".to_string());
        assert!(DatabaseInfo::from_properties(&props).is_err());
    }

    #[test]
    fn test_profiles() {
        let settings = SessionSettings::from_toml_str(SAMPLE).unwrap();
        assert_eq!(settings.profile_names(), vec!["live", "local"]);

        let local = settings.default_profile().unwrap();
        assert_eq!(local.get_name(), "Local orders");
        assert_eq!(local.get_url(), "sqlite:orders.db");
        assert_eq!(local.expose_password(), "tiger");
        assert_eq!(local.get_mode(), ConnectionMode::Test);

        let live = settings.profile("live").unwrap();
        assert_eq!(live.get_name(), "live");
        assert_eq!(live.get_mode(), ConnectionMode::Production);
        assert_eq!(live.get_cooldown(), Duration::from_secs(10));

        assert!(settings.profile("missing").is_err());
    }

    #[test]
    fn test_default_profile_selection() {
        let single =
            SessionSettings::from_toml_str("[profiles.only]\ndbUrl = \"a.db\"\n").unwrap();
        assert_eq!(single.default_profile().unwrap().get_name(), "only");

        let empty = SessionSettings::from_toml_str("").unwrap();
        assert!(empty.default_profile().is_err());

        let ambiguous = SessionSettings::from_toml_str(
            "[profiles.a]\ndbUrl = \"a.db\"\n[profiles.b]\ndbUrl = \"b.db\"\n",
        )
        .unwrap();
        assert!(ambiguous.default_profile().is_err());
    }

    #[test]
    fn test_profile_mode_spellings() {
        let settings = SessionSettings::from_toml_str(
            r#"
[profiles.flag]
dbUrl = "a.db"
dbMode = true

[profiles.short]
dbUrl = "a.db"
dbMode = "prod"

[profiles.dry]
dbUrl = "a.db"
dbMode = "dry-run"
"#,
        )
        .unwrap();
        let mode = |name: &str| settings.profile(name).unwrap().get_mode();
        assert_eq!(mode("flag"), ConnectionMode::Production);
        assert_eq!(mode("short"), ConnectionMode::Production);
        assert_eq!(mode("dry"), ConnectionMode::Test);

        let bad = SessionSettings::from_toml_str(
            "[profiles.x]\ndbUrl = \"a.db\"\ndbMode = \"sometimes\"\n",
        );
        assert!(matches!(bad, Err(DatabaseError::Toml(_))));
    }

    #[test]
    fn test_missing_settings_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = SessionSettings::load(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(DatabaseError::IoError(_))));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            SessionSettings::from_toml_str("[profiles.x\n"),
            Err(DatabaseError::Toml(_))
        ));
    }

    #[test]
    fn test_dump_masks_password() {
        let settings = SessionSettings::from_toml_str(SAMPLE).unwrap();
        let lines = settings.dump("local").unwrap();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("dbCooldown"));
        assert!(lines.iter().all(|l| !l.contains("tiger")));
        assert!(lines.iter().any(|l| l.contains(REDACTED)));
    }
}
