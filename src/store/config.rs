use serde::Deserialize;

use crate::error::StoreError;

/// Connection parameters for the Redis store, passed through to the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub db: i64,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            db: 0,
            username: None,
            password: None,
        }
    }
}

impl ConnectionConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn db(mut self, db: i64) -> Self {
        self.db = db;
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Reads `HOTQUEUE_HOST`, `HOTQUEUE_PORT`, `HOTQUEUE_DB`,
    /// `HOTQUEUE_USERNAME` and `HOTQUEUE_PASSWORD`, falling back to the
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = std::env::var("HOTQUEUE_HOST").unwrap_or(defaults.host);
        let port = std::env::var("HOTQUEUE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let db = std::env::var("HOTQUEUE_DB")
            .ok()
            .and_then(|d| d.parse().ok())
            .unwrap_or(defaults.db);

        Self {
            host,
            port,
            db,
            username: std::env::var("HOTQUEUE_USERNAME").ok(),
            password: std::env::var("HOTQUEUE_PASSWORD").ok(),
        }
    }

    /// Parses a `redis://[user:pass@]host[:port][/db]` URL.
    pub fn from_url(url: &str) -> Result<Self, StoreError> {
        let info = redis::parse_redis_url(url)
            .ok_or_else(|| StoreError::InvalidConfig(format!("invalid redis url '{}'", url)))?;
        if info.scheme() != "redis" {
            return Err(StoreError::InvalidConfig(format!(
                "unsupported url scheme '{}'",
                info.scheme()
            )));
        }

        let defaults = Self::default();
        let path = info.path().trim_matches('/');
        let db = if path.is_empty() {
            defaults.db
        } else {
            path.parse()
                .map_err(|_| StoreError::InvalidConfig(format!("invalid database '{}'", path)))?
        };

        Ok(Self {
            host: info
                .host_str()
                .map(|h| h.trim_matches(|c| c == '[' || c == ']').to_string())
                .unwrap_or(defaults.host),
            port: info.port().unwrap_or(defaults.port),
            db,
            username: Some(info.username())
                .filter(|u| !u.is_empty())
                .map(str::to_string),
            password: info.password().map(str::to_string),
        })
    }

    pub(crate) fn connection_info(&self) -> redis::ConnectionInfo {
        redis::ConnectionInfo {
            addr: redis::ConnectionAddr::Tcp(self.host.clone(), self.port),
            redis: redis::RedisConnectionInfo {
                db: self.db,
                username: self.username.clone(),
                password: self.password.clone(),
                ..Default::default()
            },
        }
    }
}
