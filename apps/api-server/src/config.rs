//! Server configuration.

use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Database URL (opaque; the in-memory store ignores it).
    pub database_url: Option<String>,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// JWT expiration in hours.
    pub jwt_expiration_hours: u64,
    /// Whether to seed demo data at startup.
    pub seed_demo_data: bool,
    /// Log level.
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = env::var("MOVICARE_JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("MOVICARE_JWT_SECRET is required"))?;

        Ok(Self {
            host: env::var("MOVICARE_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("MOVICARE_SERVER_PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            database_url: env::var("DATABASE_URL").ok(),
            jwt_secret,
            jwt_expiration_hours: env::var("MOVICARE_JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .unwrap_or(24),
            seed_demo_data: env::var("MOVICARE_SEED_DEMO_DATA")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
            log_level: env::var("MOVICARE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_jwt_secret_is_an_error() {
        // SAFETY: Tests run serially or in isolation
        unsafe {
            env::remove_var("MOVICARE_JWT_SECRET");
        }

        assert!(Config::from_env().is_err());
    }
}
