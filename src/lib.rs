//! # enedis-portal - Enedis consumption retrieval
//!
//! Logs into the Enedis customer portal, downloads half-hourly consumption
//! at the requested resolution, tags every sample as peak or off-peak and
//! hands the result to a time-series sink.
//!
//! ## Architecture
//!
//! - `offpeak`: daily off-peak windows and the membership test
//! - `portal`: session handshake, data retrieval protocol and client facade
//! - `measurement`: the normalised output entity
//! - `sink`: sink trait and the InfluxDB writer
//! - `pricing`: cost estimation from contract rates
//! - `config`: YAML configuration with validation
//! - `logging`: structured logging and tracing
//! - `error`: typed errors per stage
//!
//! ```no_run
//! use enedis_portal::portal::{ClientConfig, Credentials, PortalClient};
//! use enedis_portal::config::OffpeakPeriodConfig;
//!
//! let mut config = ClientConfig::new(Credentials::new("jane@example.com", "secret"));
//! config.offpeak_periods.push(OffpeakPeriodConfig::new("22:30", "23:59"));
//! let client = PortalClient::new(config)?;
//! let now = chrono::Utc::now();
//! let measurements = client.hourly(&(now - chrono::TimeDelta::days(2)), &now)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod measurement;
pub mod offpeak;
pub mod portal;
pub mod pricing;
pub mod sink;

// Re-export commonly used types
pub use config::Config;
pub use error::{AuthError, ConfigError, FetchError, ParseError, PortalError, Result};
pub use measurement::{PowerMeasurement, TariffPeriod};
pub use offpeak::OffpeakPeriod;
pub use portal::{PortalClient, Resolution};
