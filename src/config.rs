//! Configuration management
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files. Every section falls back to its defaults, so
//! a file only needs the credentials to be usable.

use crate::error::{ConfigError, PortalError, Result};
use crate::offpeak::OffpeakPeriod;
use crate::portal::{ClientConfig, Credentials};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod defaults;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Portal account and tariff windows
    pub portal: PortalConfig,

    /// Portal endpoints
    pub endpoints: EndpointsConfig,

    /// HTTP transport settings
    pub http: HttpConfig,

    /// InfluxDB sink
    pub influx: InfluxConfig,

    /// Electricity contract prices
    pub pricing: PricingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// IANA time zone the portal dates are expressed in
    pub timezone: String,

    /// Number of past days to retrieve by default
    pub days: u32,
}

/// Portal account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Customer account login (e-mail)
    pub login: String,

    /// Customer account password
    pub password: String,

    /// Subscribed power in kVA, reported alongside each point
    pub max_power_kva: u32,

    /// Daily off-peak windows
    pub offpeak_periods: Vec<OffpeakPeriodConfig>,
}

/// Textual off-peak window, e.g. `from: "22:30"`, `to: "23:59"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffpeakPeriodConfig {
    pub from: String,
    pub to: String,
}

impl OffpeakPeriodConfig {
    pub fn new<F: Into<String>, T: Into<String>>(from: F, to: T) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Portal endpoint URLs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// Login form target
    pub login_url: String,

    /// Consumption landing page, also the data resource endpoint
    pub data_url: String,
}

/// HTTP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds, 0 keeps the transport default
    pub timeout_seconds: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

/// InfluxDB 1.x connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InfluxConfig {
    pub url: String,
    pub user: String,
    pub password: String,
    pub database: String,

    /// Measurement name the points are written under
    pub measurement: String,
}

/// Pricing configuration for cost calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Energy supplier name, informational
    pub provider_name: String,

    /// Yearly subscription fee
    pub annual_fee: f64,

    /// Bill peak and off-peak energy at different rates
    pub peak_offpeak_enabled: bool,

    /// Flat rate per kWh
    pub price_per_kwh: f64,

    /// Peak rate per kWh
    pub price_per_kwh_peak: f64,

    /// Off-peak rate per kWh
    pub price_per_kwh_offpeak: f64,

    /// Currency symbol
    pub currency_symbol: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Console level override
    pub console_level: Option<String>,

    /// File level override
    pub file_level: Option<String>,

    /// Path to log file
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        let default_paths = [
            "enedis_portal.yaml",
            "/etc/enedis-portal/config.yaml",
        ];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        Ok(Config::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse the configured time zone
    pub fn parse_timezone(&self) -> Result<Tz> {
        self.timezone.parse::<Tz>().map_err(|_| {
            ConfigError::InvalidTimezone {
                value: self.timezone.clone(),
            }
            .into()
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.portal.login.trim().is_empty() {
            return Err(PortalError::validation("portal.login", "Login cannot be empty"));
        }

        if self.portal.password.is_empty() {
            return Err(PortalError::validation(
                "portal.password",
                "Password cannot be empty",
            ));
        }

        for (index, period) in self.portal.offpeak_periods.iter().enumerate() {
            OffpeakPeriod::parse(&period.from, &period.to).map_err(|e| {
                PortalError::validation(format!("portal.offpeak_periods[{index}]"), e.to_string())
            })?;
        }

        self.parse_timezone()?;

        if self.days == 0 {
            return Err(PortalError::validation("days", "Must be greater than 0"));
        }

        if self.influx.url.trim().is_empty() {
            return Err(PortalError::validation("influx.url", "URL cannot be empty"));
        }

        Ok(())
    }

    /// Build the portal client configuration
    pub fn client_config(&self) -> Result<ClientConfig> {
        Ok(ClientConfig {
            credentials: Credentials::new(&self.portal.login, &self.portal.password),
            offpeak_periods: self.portal.offpeak_periods.clone(),
            endpoints: self.endpoints.clone(),
            http: self.http.clone(),
            timezone: self.parse_timezone()?,
        })
    }
}
