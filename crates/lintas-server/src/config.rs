//! Server configuration.
//!
//! Everything is read from `LINTAS_*` environment variables with
//! development-friendly defaults, so a bare `lintas-server` starts an
//! in-memory instance on localhost.

use lintas_db::DbConfig;

/// Top-level configuration for the LINTAS server process.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub listen_addr: String,
    /// SurrealDB connection settings.
    pub db: DbConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".into(),
            db: DbConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Builds a configuration from the environment.
    ///
    /// Recognized variables: `LINTAS_LISTEN_ADDR`, `LINTAS_DB_URL`,
    /// `LINTAS_DB_NAMESPACE`, `LINTAS_DB_DATABASE`, `LINTAS_DB_USERNAME`,
    /// `LINTAS_DB_PASSWORD`. Unset variables fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            listen_addr: env_or("LINTAS_LISTEN_ADDR", &defaults.listen_addr),
            db: DbConfig {
                url: env_or("LINTAS_DB_URL", &defaults.db.url),
                namespace: env_or("LINTAS_DB_NAMESPACE", &defaults.db.namespace),
                database: env_or("LINTAS_DB_DATABASE", &defaults.db.database),
                username: env_or("LINTAS_DB_USERNAME", &defaults.db.username),
                password: env_or("LINTAS_DB_PASSWORD", &defaults.db.password),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_memory_engine() {
        let config = ServerConfig::default();

        assert_eq!(config.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.db.url, "mem://");
        assert_eq!(config.db.namespace, "lintas");
        assert_eq!(config.db.database, "main");
    }
}
