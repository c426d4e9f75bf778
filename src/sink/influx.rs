//! InfluxDB 1.x line-protocol sink
//!
//! Points carry three 0/1 tags (`heures_creuses`, `heures_pleines`,
//! `heures_normales`) and two fields: `value` in watts and `max`, the
//! subscribed power in VA. Timestamps are written with second precision.

use crate::config::{HttpConfig, InfluxConfig};
use crate::error::{PortalError, Result};
use crate::logging::{LogContext, StructuredLogger, get_logger_with_context};
use crate::measurement::{PowerMeasurement, TariffPeriod};
use crate::sink::{MeasurementSink, SeriesMetadata};
use reqwest::blocking::Client;
use std::time::Duration;

/// Render one measurement as a line-protocol point.
///
/// Returns `None` when the value cannot be represented (NaN or infinite).
pub fn encode_point(measurement: &PowerMeasurement, metadata: &SeriesMetadata) -> Option<String> {
    let value = measurement.power * 1000.0;
    if !value.is_finite() {
        return None;
    }

    let flag = |b: bool| if b { "1" } else { "0" };
    let period = metadata.tariff_period(measurement);

    // Tag keys in lexical order
    Some(format!(
        "{},heures_creuses={},heures_normales={},heures_pleines={} max={}i,value={} {}",
        escape_measurement(&metadata.measurement),
        flag(period == TariffPeriod::Offpeak),
        flag(period == TariffPeriod::Normal),
        flag(period == TariffPeriod::Peak),
        u64::from(metadata.max_power_kva) * 1000,
        value,
        measurement.date.timestamp()
    ))
}

fn escape_measurement(name: &str) -> String {
    name.replace(',', "\\,").replace(' ', "\\ ")
}

/// Sink writing to the InfluxDB 1.x `/write` endpoint
pub struct InfluxSink {
    http: Client,
    config: InfluxConfig,
    logger: StructuredLogger,
}

impl InfluxSink {
    pub fn new(config: &InfluxConfig, http: &HttpConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(http.user_agent.clone());
        if http.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(http.timeout_seconds));
        }
        let client = builder
            .build()
            .map_err(|e| PortalError::sink(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http: client,
            config: config.clone(),
            logger: get_logger_with_context(
                LogContext::new("influx").with_field("database", &config.database),
            ),
        })
    }

    /// Encode a batch, skipping and logging rows that cannot be encoded
    pub fn encode_batch(
        &self,
        measurements: &[PowerMeasurement],
        metadata: &SeriesMetadata,
    ) -> Vec<String> {
        measurements
            .iter()
            .filter_map(|m| {
                let line = encode_point(m, metadata);
                if line.is_none() {
                    self.logger.warn(&format!(
                        "Skipping point at {}: value {} is not finite",
                        m.date, m.power
                    ));
                }
                line
            })
            .collect()
    }

    fn write_url(&self) -> String {
        format!("{}/write", self.config.url.trim_end_matches('/'))
    }
}

impl MeasurementSink for InfluxSink {
    fn write(
        &mut self,
        measurements: &[PowerMeasurement],
        metadata: &SeriesMetadata,
    ) -> Result<usize> {
        let lines = self.encode_batch(measurements, metadata);
        if lines.is_empty() {
            self.logger.info("No points to write");
            return Ok(0);
        }

        self.logger.info(&format!(
            "Pushing {} points to InfluxDB database {}",
            lines.len(),
            self.config.database
        ));

        let mut request = self
            .http
            .post(self.write_url())
            .query(&[("db", self.config.database.as_str()), ("precision", "s")])
            .body(lines.join("\n"));
        if !self.config.user.is_empty() {
            request = request.basic_auth(&self.config.user, Some(&self.config.password));
        }

        let resp = request
            .send()
            .map_err(|e| PortalError::sink(format!("InfluxDB request failed: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            self.logger
                .error(&format!("InfluxDB write failed: {status} {body}"));
            return Err(PortalError::sink(format!(
                "InfluxDB write failed with status {status}: {body}"
            )));
        }

        Ok(lines.len())
    }
}
