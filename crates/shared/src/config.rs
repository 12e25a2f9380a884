//! Application configuration management.

use serde::Deserialize;
use uuid::Uuid;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Billing and report generation configuration.
    #[serde(default)]
    pub billing: BillingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Billing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Professor whose enrollments are billed in the separate special report.
    ///
    /// When unset, no special report is produced and every professor is part
    /// of the general report.
    #[serde(default)]
    pub special_professor_id: Option<Uuid>,
    /// Rule deciding which enrollments belong to a month
    /// (`boundary_in_month` or `overlaps_month`).
    #[serde(default = "default_enrollment_window")]
    pub enrollment_window: String,
    /// Maximum enrollments whose attendance is loaded concurrently.
    #[serde(default = "default_report_concurrency")]
    pub report_concurrency: usize,
}

fn default_enrollment_window() -> String {
    "boundary_in_month".to_string()
}

fn default_report_concurrency() -> usize {
    8
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            special_professor_id: None,
            enrollment_window: default_enrollment_window(),
            report_concurrency: default_report_concurrency(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TUTORBILL").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("TUTORBILL__DATABASE__URL", Some("postgres://localhost/tutorbill")),
                (
                    "TUTORBILL__BILLING__SPECIAL_PROFESSOR_ID",
                    Some("6f1c1a52-8d3e-4d5b-9a51-2f0c7f3f8b11"),
                ),
                ("TUTORBILL__BILLING__ENROLLMENT_WINDOW", Some("overlaps_month")),
                ("RUN_MODE", Some("test-none")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/tutorbill");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(
                    config.billing.special_professor_id,
                    Some(Uuid::parse_str("6f1c1a52-8d3e-4d5b-9a51-2f0c7f3f8b11").unwrap())
                );
                assert_eq!(config.billing.enrollment_window, "overlaps_month");
                assert_eq!(config.billing.report_concurrency, 8);
            },
        );
    }

    #[test]
    fn test_billing_defaults() {
        let billing = BillingConfig::default();
        assert!(billing.special_professor_id.is_none());
        assert_eq!(billing.enrollment_window, "boundary_in_month");
        assert_eq!(billing.report_concurrency, 8);
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars(
            [
                ("TUTORBILL__DATABASE__URL", None::<&str>),
                ("RUN_MODE", Some("test-none")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
