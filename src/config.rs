//! Application configuration management.
//!
//! Configuration is read from environment variables (optionally seeded from a
//! `.env` file) and deserialized into a type-safe struct with `envy`.
//! Every value has a fallback so the server starts out of the box for local
//! development. Those fallbacks are insecure and are reported at startup.

use serde::Deserialize;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/blog";
pub const DEFAULT_JWT_SECRET: &str = "your-secret-key";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_PORT: u16 = 3001;

/// Prefix of `DATABASE_URL` values that select the in-process article store.
pub const MEMORY_STORE_PREFIX: &str = "memory:";

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string, or `memory:` for the in-process store
/// - `JWT_SECRET`: key used to sign and verify admin tokens
/// - `ADMIN_PASSWORD`: the single shared admin password
/// - `PORT`: HTTP server port
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    #[serde(default = "default_admin_password")]
    pub admin_password: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

fn default_jwt_secret() -> String {
    DEFAULT_JWT_SECRET.to_string()
}

fn default_admin_password() -> String {
    DEFAULT_ADMIN_PASSWORD.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            jwt_secret: default_jwt_secret(),
            admin_password: default_admin_password(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is loaded first if present. Field names map to upper-case
    /// variables: `jwt_secret` -> `JWT_SECRET`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed (e.g. a
    /// non-numeric `PORT`).
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        envy::from_env::<Config>()
    }

    /// Names of the secret settings that still hold their development fallback.
    pub fn insecure_defaults(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.jwt_secret == DEFAULT_JWT_SECRET {
            names.push("JWT_SECRET");
        }
        if self.admin_password == DEFAULT_ADMIN_PASSWORD {
            names.push("ADMIN_PASSWORD");
        }
        names
    }

    /// Whether `database_url` selects the in-process store instead of Postgres.
    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with(MEMORY_STORE_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_flagged_as_insecure() {
        let config = Config::default();
        assert_eq!(config.port, 3001);
        assert_eq!(
            config.insecure_defaults(),
            vec!["JWT_SECRET", "ADMIN_PASSWORD"]
        );
        assert!(!config.uses_memory_store());
    }

    #[test]
    fn overridden_secrets_are_not_flagged() {
        let config = Config {
            jwt_secret: "a-long-random-secret".to_string(),
            admin_password: "hunter2-but-longer".to_string(),
            database_url: "memory:".to_string(),
            ..Config::default()
        };
        assert!(config.insecure_defaults().is_empty());
        assert!(config.uses_memory_store());
    }
}
