//! Time-series sinks for retrieved measurements
//!
//! The portal client only produces [`PowerMeasurement`]s. A sink decides how
//! they are tagged, scaled and stored.

use crate::error::Result;
use crate::measurement::{PowerMeasurement, TariffPeriod};

pub mod influx;

pub use influx::InfluxSink;

/// Static description attached to every point of a batch
#[derive(Debug, Clone)]
pub struct SeriesMetadata {
    /// Measurement (series) name
    pub measurement: String,

    /// Subscribed power in kVA
    pub max_power_kva: u32,

    /// Whether off-peak windows were configured; without them every point is
    /// reported as `normal`
    pub offpeak_configured: bool,
}

impl SeriesMetadata {
    pub fn tariff_period(&self, measurement: &PowerMeasurement) -> TariffPeriod {
        TariffPeriod::classify(measurement, self.offpeak_configured)
    }
}

/// Destination for a batch of measurements
pub trait MeasurementSink {
    /// Write the batch and return how many points were accepted.
    ///
    /// Rows that cannot be turned into a point are skipped, not fatal.
    fn write(&mut self, measurements: &[PowerMeasurement], metadata: &SeriesMetadata)
    -> Result<usize>;
}
