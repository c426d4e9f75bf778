//! Energy cost estimation
//!
//! Applies the contract rates to retrieved measurements. With peak/off-peak
//! billing disabled every measurement is charged at the flat rate.

use crate::config::PricingConfig;
use crate::measurement::PowerMeasurement;

/// Cost of a single measurement
pub fn cost_of(measurement: &PowerMeasurement, pricing: &PricingConfig) -> f64 {
    rate_for(measurement, pricing) * measurement.power
}

fn rate_for(measurement: &PowerMeasurement, pricing: &PricingConfig) -> f64 {
    match (pricing.peak_offpeak_enabled, measurement.is_offpeak) {
        (true, true) => pricing.price_per_kwh_offpeak,
        (true, false) => pricing.price_per_kwh_peak,
        (false, _) => pricing.price_per_kwh,
    }
}

/// Totals over a batch of measurements
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostSummary {
    pub measurements: usize,
    pub offpeak_energy: f64,
    pub peak_energy: f64,
    pub offpeak_cost: f64,
    pub peak_cost: f64,
}

impl CostSummary {
    pub fn total_energy(&self) -> f64 {
        self.offpeak_energy + self.peak_energy
    }

    pub fn total_cost(&self) -> f64 {
        self.offpeak_cost + self.peak_cost
    }
}

/// Sum energy and cost, split by off-peak classification
pub fn summarize(measurements: &[PowerMeasurement], pricing: &PricingConfig) -> CostSummary {
    measurements
        .iter()
        .fold(CostSummary::default(), |mut summary, m| {
            let cost = cost_of(m, pricing);
            if m.is_offpeak {
                summary.offpeak_energy += m.power;
                summary.offpeak_cost += cost;
            } else {
                summary.peak_energy += m.power;
                summary.peak_cost += cost;
            }
            summary.measurements += 1;
            summary
        })
}
