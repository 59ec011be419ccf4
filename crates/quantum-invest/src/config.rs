//! Investment engine configuration

use quantum_common::{QuantumError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Environment variable naming an alternative configuration file
pub const CONFIG_FILE_ENV: &str = "QUANTUM_CONFIG";

/// Configuration file looked up when `QUANTUM_CONFIG` is not set
pub const DEFAULT_CONFIG_FILE: &str = "quantum-invest";

/// Investment engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestConfig {
    /// Rate tier repository connection
    pub repository: RepositorySettings,
    /// Simulation parameters
    pub resolver: ResolverSettings,
}

impl InvestConfig {
    /// Load configuration from defaults, an optional file and the environment.
    ///
    /// Later sources win: defaults, then `quantum-invest.{toml,json,yaml}`
    /// (or the file named by `QUANTUM_CONFIG`), then `QUANTUM__SECTION__KEY`
    /// variables, e.g. `QUANTUM__RESOLVER__TAX_RATE=0.03`.
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        let file =
            std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let defaults = config::Config::try_from(&Self::default()).map_err(config_error)?;
        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(&file).required(false))
            .add_source(config::Environment::with_prefix("QUANTUM").separator("__"))
            .build()
            .map_err(config_error)?;

        let cfg: Self = settings.try_deserialize().map_err(config_error)?;
        cfg.resolver.validate()?;
        Ok(cfg)
    }
}

fn config_error(err: config::ConfigError) -> QuantumError {
    QuantumError::Config(err.to_string())
}

/// Rate tier repository settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySettings {
    /// Backend base URL
    pub base_url: String,
    /// Path of the tier collection; the legacy frontend used `/sim/investment`
    pub tiers_path: String,
    /// Serve tiers from a process-local repository instead of HTTP
    pub offline: bool,
    /// JSON file of tier records used to seed the offline repository
    pub seed_file: Option<String>,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            tiers_path: "/investment-tiers".to_string(),
            offline: false,
            seed_file: None,
        }
    }
}

impl RepositorySettings {
    /// Full URL of the tier collection
    pub fn tiers_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.tiers_path.trim_start_matches('/')
        )
    }
}

/// Interest computation and term conversion parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// Tax withheld from gross interest (0.02 = 2%)
    pub tax_rate: Decimal,
    /// Days per year used to prorate the annual rate
    pub day_count_basis: u32,
    /// Days added for each month beyond the first
    pub days_per_month: u32,
    /// Longest term accepted in months
    pub max_term_months: u32,
    /// Tolerance when comparing amount bounds for duplicates
    pub amount_tolerance: Decimal,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            tax_rate: crate::DEFAULT_TAX_RATE,
            day_count_basis: crate::DAY_COUNT_BASIS,
            days_per_month: crate::DAYS_PER_MONTH,
            max_term_months: crate::MAX_TERM_MONTHS,
            amount_tolerance: crate::AMOUNT_TOLERANCE,
        }
    }
}

impl ResolverSettings {
    /// Reject settings that would make every computation meaningless
    pub fn validate(&self) -> Result<()> {
        if self.tax_rate < Decimal::ZERO || self.tax_rate >= Decimal::ONE {
            return Err(QuantumError::Config(format!(
                "tax_rate must be in [0, 1), got {}",
                self.tax_rate
            )));
        }
        if self.day_count_basis == 0 {
            return Err(QuantumError::Config(
                "day_count_basis must be positive".to_string(),
            ));
        }
        if self.max_term_months == 0 {
            return Err(QuantumError::Config(
                "max_term_months must be positive".to_string(),
            ));
        }
        if self.amount_tolerance < Decimal::ZERO {
            return Err(QuantumError::Config(
                "amount_tolerance must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
