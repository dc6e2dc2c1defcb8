use std::fmt;
use std::sync::Arc;

use crate::config::config_spec::{ConfigSpec, ConfigValueSource};
use crate::config::errors::ApplicationError;
use crate::config::EnvironmentProvider;

/// Settings needed before anything else starts: storage, listener, session and audit limits
#[derive(Clone)]
pub struct BootstrapSettings {
    database_url: String,
    server_host: String,
    server_port: u16,
    session_ttl_minutes: i64,
    audit_default_limit: u64,
    audit_max_limit: u64,
}

trait LoadLogged {
    fn load(&self) -> Result<String, ApplicationError>;
}

impl LoadLogged for ConfigSpec {
    fn load(&self) -> Result<String, ApplicationError> {
        let loaded = self.load_setting_with_source()?;
        match &loaded.source {
            ConfigValueSource::EnvironmentVariable { name } => tracing::debug!("{} set from environment", name),
            ConfigValueSource::Default => {
                tracing::debug!("{} using default", self.env_override.as_deref().unwrap_or("setting"))
            }
        }
        Ok(loaded.value)
    }
}

impl BootstrapSettings {
    /// Load bootstrap settings through ConfigSpec
    pub fn from_env_provider(env_provider: Arc<dyn EnvironmentProvider + Send + Sync>) -> Result<Self, ApplicationError> {
        let database_url = ConfigSpec::new(env_provider.clone())
            .env_override("DATABASE_URL")
            .default_value("sqlite://media_explorer.db?mode=rwc")
            .min_length(1)
            .load()?;

        let server_host = ConfigSpec::new(env_provider.clone())
            .env_override("HOST")
            .default_value("0.0.0.0")
            .validator(ConfigSpec::validate_host_address)
            .load()?;

        let port_value = ConfigSpec::new(env_provider.clone())
            .env_override("PORT")
            .default_value("3000")
            .validator(|value| ConfigSpec::validate_port_range(value, 1, 65535))
            .load()?;
        let server_port = ConfigSpec::parse_port(&port_value, "PORT")?;

        let ttl_value = ConfigSpec::new(env_provider.clone())
            .env_override("SESSION_TTL_MINUTES")
            .default_value("60")
            .validator(|value| ConfigSpec::validate_integer_range(value, 1, 60 * 24 * 30))
            .load()?;
        let session_ttl_minutes = ConfigSpec::parse_integer(&ttl_value, "SESSION_TTL_MINUTES")?;

        let max_value = ConfigSpec::new(env_provider.clone())
            .env_override("AUDIT_MAX_LIMIT")
            .default_value("500")
            .validator(|value| ConfigSpec::validate_integer_range(value, 1, 10_000))
            .load()?;
        let audit_max_limit = ConfigSpec::parse_integer(&max_value, "AUDIT_MAX_LIMIT")? as u64;

        let default_value = ConfigSpec::new(env_provider)
            .env_override("AUDIT_DEFAULT_LIMIT")
            .default_value("100")
            .validator(|value| ConfigSpec::validate_integer_range(value, 1, 10_000))
            .load()?;
        let audit_default_limit = ConfigSpec::parse_integer(&default_value, "AUDIT_DEFAULT_LIMIT")? as u64;

        if audit_default_limit > audit_max_limit {
            return Err(ApplicationError::InvalidSetting {
                setting_name: "AUDIT_DEFAULT_LIMIT".to_string(),
                reason: format!("Value {} exceeds AUDIT_MAX_LIMIT {}", audit_default_limit, audit_max_limit),
            });
        }

        Ok(Self {
            database_url,
            server_host,
            server_port,
            session_ttl_minutes,
            audit_default_limit,
            audit_max_limit,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ApplicationError> {
        use crate::config::SystemEnvironment;
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn session_ttl_minutes(&self) -> i64 {
        self.session_ttl_minutes
    }

    pub fn audit_default_limit(&self) -> u64 {
        self.audit_default_limit
    }

    pub fn audit_max_limit(&self) -> u64 {
        self.audit_max_limit
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("database_url", &self.database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("session_ttl_minutes", &self.session_ttl_minutes)
            .field("audit_default_limit", &self.audit_default_limit)
            .field("audit_max_limit", &self.audit_max_limit)
            .finish()
    }
}
