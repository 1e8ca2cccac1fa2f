//! Application-level configuration: storage endpoints, bootstrap account and
//! registration policy.
//!
//! Values come from an optional JSON file, then environment variables override
//! individual keys.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "ARTEMIS_BACK_CONFIG_PATH";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_URL: &str = "sqlite://artemis.db?mode=rwc";
const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listen port.
    pub port: u16,
    /// SeaORM connection URL for users and items.
    pub database_url: String,
    /// MongoDB URI for games.
    pub mongo_uri: String,
    /// MongoDB database name; the driver default applies when absent.
    pub mongo_db: Option<String>,
    /// Backend for key-value items.
    pub kv: KvConfig,
    /// Account created at startup when no user owns its email yet.
    pub first_superuser: Option<FirstSuperuser>,
    /// Allow anonymous sign-up through `POST /users/open`.
    pub users_open_registration: bool,
}

/// Key-value backend selection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum KvConfig {
    /// Redis server; the production default.
    Redis { url: String },
    /// Process-local map; contents are lost on restart.
    Memory,
    /// CouchDB database reached over HTTP.
    Couch {
        base_url: String,
        database: String,
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        password: Option<String>,
    },
}

/// Bootstrap superuser credentials.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FirstSuperuser {
    pub email: String,
    pub password: String,
}

impl AppConfig {
    /// Load the configuration file (when present) and apply environment overrides.
    pub fn load() -> Self {
        let mut config = Self::from_file();
        config.apply_overrides(|key| env::var(key).ok());
        config
    }

    fn from_file() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Self>(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded config file");
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Override keys from a variable lookup (the process environment in production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(raw) = var("PORT").or_else(|| var("SERVER_PORT")) {
            match raw.parse::<u16>() {
                Ok(port) => self.port = port,
                Err(_) => warn!(value = %raw, "ignoring invalid port override"),
            }
        }
        if let Some(url) = var("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(uri) = var("MONGO_URI") {
            self.mongo_uri = uri;
        }
        if let Some(db) = var("MONGO_DB") {
            self.mongo_db = Some(db);
        }
        let backend = var("KV_BACKEND");
        match backend.as_deref() {
            Some("memory") => self.kv = KvConfig::Memory,
            Some("redis") => self.kv = KvConfig::Redis { url: redis_url(&var) },
            None if var("REDIS_URL").is_some() || var("REDIS_HOST").is_some() => {
                self.kv = KvConfig::Redis { url: redis_url(&var) }
            }
            Some("couch") | None => match var("COUCH_BASE_URL") {
                Some(base_url) => {
                    self.kv = KvConfig::Couch {
                        base_url,
                        database: var("COUCH_DB").unwrap_or_else(|| "artemis".into()),
                        username: var("COUCH_USERNAME"),
                        password: var("COUCH_PASSWORD"),
                    };
                }
                None if backend.is_some() => warn!("KV_BACKEND=couch requires COUCH_BASE_URL; keeping configured backend"),
                None => {}
            },
            Some(other) => warn!(value = %other, "ignoring unknown KV_BACKEND override"),
        }
        if let (Some(email), Some(password)) = (var("FIRST_SUPERUSER"), var("FIRST_SUPERUSER_PASSWORD")) {
            self.first_superuser = Some(FirstSuperuser { email, password });
        }
        if let Some(raw) = var("USERS_OPEN_REGISTRATION") {
            match parse_flag(&raw) {
                Some(flag) => self.users_open_registration = flag,
                None => warn!(value = %raw, "ignoring invalid USERS_OPEN_REGISTRATION override"),
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.into(),
            mongo_uri: DEFAULT_MONGO_URI.into(),
            mongo_db: None,
            kv: KvConfig::Redis {
                url: DEFAULT_REDIS_URL.into(),
            },
            first_superuser: None,
            users_open_registration: false,
        }
    }
}

/// `REDIS_URL` wins; otherwise the URL is built from `REDIS_HOST` and `REDIS_PORT`.
fn redis_url(var: &impl Fn(&str) -> Option<String>) -> String {
    if let Some(url) = var("REDIS_URL") {
        return url;
    }
    match var("REDIS_HOST") {
        Some(host) => {
            let port = var("REDIS_PORT").unwrap_or_else(|| "6379".into());
            format!("redis://{host}:{port}")
        }
        None => DEFAULT_REDIS_URL.into(),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "port": 9000, "kv": { "backend": "memory" } }"#).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.kv, KvConfig::Memory);
        assert!(!config.users_open_registration);
    }

    #[test]
    fn test_couch_backend_parses_from_file() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "kv": { "backend": "couch", "base_url": "http://couch:5984", "database": "kv" } }"#,
        )
        .unwrap();
        assert_eq!(
            config.kv,
            KvConfig::Couch {
                base_url: "http://couch:5984".into(),
                database: "kv".into(),
                username: None,
                password: None,
            }
        );
    }

    #[test]
    fn test_environment_overrides_file_values() {
        let mut config = AppConfig::default();
        config.apply_overrides(lookup(&[
            ("SERVER_PORT", "9100"),
            ("DATABASE_URL", "postgres://db/artemis"),
            ("FIRST_SUPERUSER", "admin@example.com"),
            ("FIRST_SUPERUSER_PASSWORD", "changethis"),
            ("USERS_OPEN_REGISTRATION", "true"),
        ]));

        assert_eq!(config.port, 9100);
        assert_eq!(config.database_url, "postgres://db/artemis");
        assert_eq!(
            config.first_superuser,
            Some(FirstSuperuser {
                email: "admin@example.com".into(),
                password: "changethis".into(),
            })
        );
        assert!(config.users_open_registration);
    }

    #[test]
    fn test_kv_backend_override_selects_store() {
        let mut config = AppConfig::default();
        config.apply_overrides(lookup(&[
            ("COUCH_BASE_URL", "http://couch:5984"),
            ("COUCH_USERNAME", "admin"),
            ("COUCH_PASSWORD", "pw"),
        ]));
        assert!(matches!(
            &config.kv,
            KvConfig::Couch { database, username: Some(user), .. } if database == "artemis" && user == "admin"
        ));

        config.apply_overrides(lookup(&[("KV_BACKEND", "memory"), ("COUCH_BASE_URL", "http://couch:5984")]));
        assert_eq!(config.kv, KvConfig::Memory);
    }

    #[test]
    fn test_redis_is_the_default_backend() {
        assert_eq!(
            AppConfig::default().kv,
            KvConfig::Redis {
                url: DEFAULT_REDIS_URL.into()
            }
        );
        let config: AppConfig =
            serde_json::from_str(r#"{ "kv": { "backend": "redis", "url": "redis://cache:6380" } }"#).unwrap();
        assert_eq!(
            config.kv,
            KvConfig::Redis {
                url: "redis://cache:6380".into()
            }
        );
    }

    #[test]
    fn test_redis_overrides_build_the_url() {
        let mut config = AppConfig::default();
        config.apply_overrides(lookup(&[("KV_BACKEND", "memory")]));
        assert_eq!(config.kv, KvConfig::Memory);

        config.apply_overrides(lookup(&[("REDIS_HOST", "cache"), ("REDIS_PORT", "6380")]));
        assert_eq!(
            config.kv,
            KvConfig::Redis {
                url: "redis://cache:6380".into()
            }
        );

        config.apply_overrides(lookup(&[
            ("KV_BACKEND", "redis"),
            ("REDIS_URL", "redis://:pw@cache/2"),
            ("REDIS_HOST", "ignored"),
        ]));
        assert_eq!(
            config.kv,
            KvConfig::Redis {
                url: "redis://:pw@cache/2".into()
            }
        );
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(lookup(&[
            ("PORT", "not-a-port"),
            ("USERS_OPEN_REGISTRATION", "maybe"),
            ("FIRST_SUPERUSER", "admin@example.com"),
        ]));
        assert_eq!(config, AppConfig::default());
    }
}
