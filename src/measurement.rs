//! Normalised consumption measurements

use chrono::DateTime;
use chrono_tz::Tz;
use std::fmt;

/// One half-hour sample turned into a timestamped power figure.
///
/// `power` is the portal value halved (kWh over the half hour expressed on an
/// hourly basis); multiply by 1000 for watts.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerMeasurement {
    pub date: DateTime<Tz>,
    pub power: f64,
    pub is_offpeak: bool,
}

/// Tariff bucket a measurement is reported under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TariffPeriod {
    Offpeak,
    Peak,
    /// No off-peak windows configured, so no peak/off-peak distinction
    Normal,
}

impl TariffPeriod {
    pub fn classify(measurement: &PowerMeasurement, offpeak_configured: bool) -> Self {
        if !offpeak_configured {
            Self::Normal
        } else if measurement.is_offpeak {
            Self::Offpeak
        } else {
            Self::Peak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offpeak => "offpeak",
            Self::Peak => "peak",
            Self::Normal => "normal",
        }
    }
}

impl fmt::Display for TariffPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
