use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for Zynix onboarding
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ZynixConfig {
    /// Registration wizard settings
    pub registration: RegistrationConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Domain appended to the chosen email local part
    pub email_domain: String,
    /// Minimum password length in characters
    pub min_password_length: usize,
    /// Simulated confirmation latency
    pub confirmation_delay_ms: u64,
    /// One-time fee shown on the payment stage
    pub registration_fee_usd: u32,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            email_domain: "zynix.com".to_string(),
            min_password_length: 8,
            confirmation_delay_ms: 3000,
            registration_fee_usd: 50,
        }
    }
}

impl RegistrationConfig {
    pub fn confirmation_delay(&self) -> Duration {
        Duration::from_millis(self.confirmation_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is unset
    pub log_level: String,
    /// Emit JSON lines instead of human readable output
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json_logs: false,
        }
    }
}

impl ZynixConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (zynix.toml, .zynix-rc)
    /// 3. Environment variables (prefixed with ZYNIX_, sections split by `__`)
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();

        if Path::new("zynix.toml").exists() {
            builder = builder.add_source(File::with_name("zynix"));
        }

        if Path::new(".zynix-rc").exists() {
            builder = builder.add_source(File::new(".zynix-rc", config::FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("ZYNIX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let zynix_config: ZynixConfig = config.try_deserialize()?;

        Ok(zynix_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<ZynixConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = ZynixConfig::load_env_file();
        ZynixConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static ZynixConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_site_behaviour() {
        let config = ZynixConfig::default();
        assert_eq!(config.registration.email_domain, "zynix.com");
        assert_eq!(config.registration.min_password_length, 8);
        assert_eq!(config.registration.confirmation_delay(), Duration::from_secs(3));
        assert_eq!(config.registration.registration_fee_usd, 50);
        assert!(!config.observability.json_logs);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let parsed: ZynixConfig = toml::from_str(
            r#"
            [registration]
            confirmation_delay_ms = 0
            "#,
        )
        .unwrap();
        assert_eq!(parsed.registration.confirmation_delay_ms, 0);
        assert_eq!(parsed.registration.email_domain, "zynix.com");
        assert_eq!(parsed.observability.log_level, "warn");
    }

    #[test]
    fn test_save_round_trips_through_toml() {
        let dir = std::env::temp_dir().join(format!("zynix-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("zynix.toml");

        let mut config = ZynixConfig::default();
        config.registration.min_password_length = 12;
        config.save_to_file(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let loaded: ZynixConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.registration.min_password_length, 12);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
