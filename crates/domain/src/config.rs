//! Environment-driven configuration for the gateway binary.

use std::env;

use thiserror::Error;

/// Listener targets plus the raw (unresolved) downstream URL values. The
/// service URLs stay optional here; `locator::resolve_base_url` turns them
/// into canonical base URLs at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    bind_address: String,
    unix_socket: Option<String>,
    internal_bind_address: Option<String>,
    internal_unix_socket: Option<String>,
    transactions_service_url: Option<String>,
    monero_service_url: Option<String>,
}

impl AdminConfig {
    /// Loads the environment variables required by the gateway binary.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        hydrate_env_file()?;

        Ok(Self {
            bind_address: get_required_var("ADMIN_BIND_ADDRESS")?,
            unix_socket: get_optional_var("ADMIN_UNIX_SOCKET"),
            internal_bind_address: get_optional_var("ADMIN_INTERNAL_BIND_ADDRESS"),
            internal_unix_socket: get_optional_var("ADMIN_INTERNAL_UNIX_SOCKET"),
            transactions_service_url: get_optional_var("TRANSACTIONS_SERVICE_URL"),
            monero_service_url: get_optional_var("MONERO_SERVICE_URL"),
        })
    }

    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }

    pub fn unix_socket(&self) -> Option<&str> {
        self.unix_socket.as_deref()
    }

    pub fn internal_bind_address(&self) -> Option<&str> {
        self.internal_bind_address.as_deref()
    }

    pub fn internal_unix_socket(&self) -> Option<&str> {
        self.internal_unix_socket.as_deref()
    }

    pub fn has_internal_listener(&self) -> bool {
        self.internal_bind_address.is_some() || self.internal_unix_socket.is_some()
    }

    pub fn transactions_service_url(&self) -> Option<&str> {
        self.transactions_service_url.as_deref()
    }

    pub fn monero_service_url(&self) -> Option<&str> {
        self.monero_service_url.as_deref()
    }
}

fn get_required_var(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Err(ConfigError::MissingVar { key })
            } else {
                Ok(trimmed.to_string())
            }
        }
        Err(_) => Err(ConfigError::MissingVar { key }),
    }
}

fn get_optional_var(key: &'static str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub fn hydrate_env_file() -> Result<(), ConfigError> {
    if env::var_os("PUPERO_ADMIN_SKIP_DOTENV").is_some() {
        return Ok(());
    }
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(ConfigError::Dotenv { source: err }),
    }

    Ok(())
}

/// Errors emitted when `.env` hydration or environment parsing fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable `{key}`")]
    MissingVar { key: &'static str },
    #[error("failed to load .env file: {source}")]
    Dotenv {
        #[from]
        source: dotenvy::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_GUARD: Mutex<()> = Mutex::new(());

    fn set_env() {
        std::env::set_var("PUPERO_ADMIN_SKIP_DOTENV", "1");
        std::env::set_var("ADMIN_BIND_ADDRESS", "127.0.0.1:8080");
        std::env::remove_var("ADMIN_UNIX_SOCKET");
        std::env::remove_var("ADMIN_INTERNAL_BIND_ADDRESS");
        std::env::remove_var("ADMIN_INTERNAL_UNIX_SOCKET");
        std::env::remove_var("TRANSACTIONS_SERVICE_URL");
        std::env::remove_var("MONERO_SERVICE_URL");
    }

    #[test]
    fn service_urls_default_to_none() {
        let _guard = ENV_GUARD.lock().unwrap();
        set_env();

        let config = AdminConfig::load_from_env().expect("config loads");
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.transactions_service_url(), None);
        assert_eq!(config.monero_service_url(), None);
        assert!(!config.has_internal_listener());
    }

    #[test]
    fn service_urls_are_read_and_trimmed() {
        let _guard = ENV_GUARD.lock().unwrap();
        set_env();
        std::env::set_var("TRANSACTIONS_SERVICE_URL", " transactions ");
        std::env::set_var("MONERO_SERVICE_URL", "http://wallet:9000");

        let config = AdminConfig::load_from_env().expect("config loads");
        assert_eq!(config.transactions_service_url(), Some("transactions"));
        assert_eq!(config.monero_service_url(), Some("http://wallet:9000"));

        set_env();
    }

    #[test]
    fn blank_service_url_is_treated_as_unset() {
        let _guard = ENV_GUARD.lock().unwrap();
        set_env();
        std::env::set_var("MONERO_SERVICE_URL", "   ");

        let config = AdminConfig::load_from_env().expect("config loads");
        assert_eq!(config.monero_service_url(), None);

        set_env();
    }

    #[test]
    fn supports_unix_and_internal_listeners() {
        let _guard = ENV_GUARD.lock().unwrap();
        set_env();
        std::env::set_var("ADMIN_UNIX_SOCKET", "/tmp/admin.sock");
        std::env::set_var("ADMIN_INTERNAL_BIND_ADDRESS", "127.0.0.1:9090");

        let config = AdminConfig::load_from_env().expect("config loads");
        assert_eq!(config.unix_socket(), Some("/tmp/admin.sock"));
        assert_eq!(config.internal_bind_address(), Some("127.0.0.1:9090"));
        assert!(config.has_internal_listener());

        set_env();
    }

    #[test]
    fn missing_bind_address_is_an_error() {
        let _guard = ENV_GUARD.lock().unwrap();
        set_env();
        std::env::set_var("ADMIN_BIND_ADDRESS", "  ");

        let err = AdminConfig::load_from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingVar {
                key: "ADMIN_BIND_ADDRESS"
            }
        ));

        set_env();
    }
}
