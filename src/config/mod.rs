//! Process configuration read once from the environment at startup.

use crate::error::ConfigError;
use std::net::SocketAddr;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DbConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    /// Full URL from `DATABASE_URL`; takes precedence over the individual parts.
    pub url: Option<String>,
    pub max_connections: u32,
}

impl DbConfig {
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        if self.password.is_empty() {
            format!(
                "postgres://{}@{}:{}/{}",
                self.user, self.host, self.port, self.database
            )
        } else {
            format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.database
            )
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_address: String,
    pub port: u16,
    pub database: DbConfig,
    /// Create missing tables at startup.
    pub bootstrap_schema: bool,
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let database = DbConfig {
            user: var("POSTGRES_USER", "postgres"),
            password: lookup("POSTGRES_PASSWORD").unwrap_or_default(),
            host: var("POSTGRES_HOST", "localhost"),
            port: parse_var("POSTGRES_PORT", lookup("POSTGRES_PORT"), 5432)?,
            database: var("POSTGRES_DB", "skills_catalog"),
            url: lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()),
            max_connections: parse_var(
                "DB_MAX_CONNECTIONS",
                lookup("DB_MAX_CONNECTIONS"),
                DEFAULT_MAX_CONNECTIONS,
            )?,
        };

        Ok(AppConfig {
            bind_address: var("BIND_ADDRESS", "0.0.0.0"),
            port: parse_var("PORT", lookup("PORT"), DEFAULT_PORT)?,
            database,
            bootstrap_schema: parse_flag("BOOTSTRAP_SCHEMA", lookup("BOOTSTRAP_SCHEMA"))?,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.bind_address, self.port);
        raw.parse().map_err(|_| ConfigError::InvalidVar {
            name: "BIND_ADDRESS",
            value: self.bind_address.clone(),
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::InvalidVar {
            name,
            value: v.to_string(),
        }),
    }
}

fn parse_flag(name: &'static str, raw: Option<String>) -> Result<bool, ConfigError> {
    match raw.as_deref().map(|v| v.trim().to_lowercase()).as_deref() {
        None | Some("") | Some("0") | Some("false") | Some("no") => Ok(false),
        Some("1") | Some("true") | Some("yes") => Ok(true),
        Some(other) => Err(ConfigError::InvalidVar {
            name,
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.database.port, 5432);
        assert_eq!(cfg.database.max_connections, 5);
        assert!(!cfg.bootstrap_schema);
        assert_eq!(
            cfg.database.connection_url(),
            "postgres://postgres@localhost:5432/skills_catalog"
        );
    }

    #[test]
    fn parts_build_the_url() {
        let cfg = config_from(&[
            ("POSTGRES_USER", "ada"),
            ("POSTGRES_PASSWORD", "secret"),
            ("POSTGRES_HOST", "db"),
            ("POSTGRES_PORT", "6543"),
            ("POSTGRES_DB", "catalog"),
            ("PORT", "8080"),
            ("BOOTSTRAP_SCHEMA", "true"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert!(cfg.bootstrap_schema);
        assert_eq!(
            cfg.database.connection_url(),
            "postgres://ada:secret@db:6543/catalog"
        );
    }

    #[test]
    fn database_url_wins() {
        let cfg = config_from(&[
            ("DATABASE_URL", "postgres://u@h/d"),
            ("POSTGRES_HOST", "ignored"),
        ])
        .unwrap();
        assert_eq!(cfg.database.connection_url(), "postgres://u@h/d");
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = config_from(&[("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { name: "PORT", .. }));
    }

    #[test]
    fn socket_addr_combines_address_and_port() {
        let cfg = config_from(&[("BIND_ADDRESS", "127.0.0.1"), ("PORT", "4000")]).unwrap();
        assert_eq!(cfg.socket_addr().unwrap().to_string(), "127.0.0.1:4000");
    }
}
