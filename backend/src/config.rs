use closet_rental_shared::MIN_JWT_SECRET_LEN;
use serde::Deserialize;
use std::time::Duration;

/// Process configuration, read once at startup and handed to each component.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    /// Shared key material for the sensitive-column cipher.
    pub secret_key: String,
    pub client_url: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub transaction_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("client_url", "http://localhost:3000")?
            .set_default("db_max_connections", 10)?
            .set_default("db_acquire_timeout_secs", 30)?
            .set_default("request_timeout_secs", 30)?
            .set_default("transaction_timeout_secs", 15)?
            .add_source(config::Environment::default())
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(config::ConfigError::Message(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            )));
        }
        if self.secret_key.is_empty() {
            return Err(config::ConfigError::Message(
                "SECRET_KEY must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn transaction_timeout(&self) -> Duration {
        Duration::from_secs(self.transaction_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: "postgres://localhost/closet".to_string(),
            jwt_secret: "x".repeat(MIN_JWT_SECRET_LEN),
            secret_key: "closet-secret".to_string(),
            client_url: "http://localhost:3000".to_string(),
            db_max_connections: 10,
            db_acquire_timeout_secs: 30,
            request_timeout_secs: 30,
            transaction_timeout_secs: 15,
        }
    }

    #[test]
    fn short_jwt_secret_is_rejected() {
        let mut config = sample();
        config.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_field_key_is_rejected() {
        let mut config = sample();
        config.secret_key.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn valid_config_passes() {
        let config = sample();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.transaction_timeout(), Duration::from_secs(15));
    }
}
