mod common;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::TimeZone;
use chrono_tz::Europe::Paris;
use common::{MockPortal, Scenario};
use enedis_portal::config::InfluxConfig;
use enedis_portal::error::PortalError;
use enedis_portal::measurement::PowerMeasurement;
use enedis_portal::sink::{InfluxSink, MeasurementSink, SeriesMetadata};

fn influx_config(portal: &MockPortal) -> InfluxConfig {
    InfluxConfig {
        url: format!("{}/", portal.base_url),
        database: "home".to_string(),
        measurement: "conso".to_string(),
        ..InfluxConfig::default()
    }
}

fn metadata(offpeak_configured: bool) -> SeriesMetadata {
    SeriesMetadata {
        measurement: "conso".to_string(),
        max_power_kva: 6,
        offpeak_configured,
    }
}

fn measurement(hour: u32, power: f64, is_offpeak: bool) -> PowerMeasurement {
    PowerMeasurement {
        date: Paris.with_ymd_and_hms(2024, 1, 15, hour, 0, 0).unwrap(),
        power,
        is_offpeak,
    }
}

#[test]
fn writes_line_protocol_batch() {
    let portal = MockPortal::start(Scenario::accepting());
    let mut sink = InfluxSink::new(&influx_config(&portal), &portal.http()).unwrap();

    let batch = [measurement(2, 0.25, true), measurement(10, 1.5, false)];
    let written = sink.write(&batch, &metadata(true)).unwrap();
    assert_eq!(written, 2);

    let recorded = portal.recorded();
    assert_eq!(recorded.influx_writes.len(), 1);
    let write = &recorded.influx_writes[0];
    assert_eq!(write.query["db"], "home");
    assert_eq!(write.query["precision"], "s");
    assert!(write.authorization.is_none());

    let lines: Vec<&str> = write.body.lines().collect();
    assert_eq!(
        lines[0],
        format!(
            "conso,heures_creuses=1,heures_normales=0,heures_pleines=0 max=6000i,value=250 {}",
            batch[0].date.timestamp()
        )
    );
    assert_eq!(
        lines[1],
        format!(
            "conso,heures_creuses=0,heures_normales=0,heures_pleines=1 max=6000i,value=1500 {}",
            batch[1].date.timestamp()
        )
    );
}

#[test]
fn unconfigured_windows_tag_everything_normal() {
    let portal = MockPortal::start(Scenario::accepting());
    let mut sink = InfluxSink::new(&influx_config(&portal), &portal.http()).unwrap();

    sink.write(&[measurement(3, 1.0, false)], &metadata(false))
        .unwrap();

    let body = &portal.recorded().influx_writes[0].body;
    assert!(body.starts_with("conso,heures_creuses=0,heures_normales=1,heures_pleines=0 "));
}

#[test]
fn credentials_are_sent_as_basic_auth() {
    let portal = MockPortal::start(Scenario::accepting());
    let config = InfluxConfig {
        user: "writer".to_string(),
        password: "pw".to_string(),
        ..influx_config(&portal)
    };
    let mut sink = InfluxSink::new(&config, &portal.http()).unwrap();

    sink.write(&[measurement(1, 1.0, false)], &metadata(true))
        .unwrap();

    let expected = format!("Basic {}", STANDARD.encode("writer:pw"));
    assert_eq!(
        portal.recorded().influx_writes[0].authorization.as_deref(),
        Some(expected.as_str())
    );
}

#[test]
fn non_finite_values_are_skipped() {
    let portal = MockPortal::start(Scenario::accepting());
    let mut sink = InfluxSink::new(&influx_config(&portal), &portal.http()).unwrap();

    let batch = [measurement(1, f64::NAN, false), measurement(2, 0.5, false)];
    assert_eq!(sink.write(&batch, &metadata(true)).unwrap(), 1);
    assert_eq!(portal.recorded().influx_writes[0].body.lines().count(), 1);
}

#[test]
fn empty_batch_sends_nothing() {
    let portal = MockPortal::start(Scenario::accepting());
    let mut sink = InfluxSink::new(&influx_config(&portal), &portal.http()).unwrap();

    assert_eq!(sink.write(&[], &metadata(true)).unwrap(), 0);
    assert!(portal.recorded().influx_writes.is_empty());
}

#[test]
fn rejected_write_is_a_sink_error() {
    let portal = MockPortal::start(Scenario::accepting().with_influx_status(500));
    let mut sink = InfluxSink::new(&influx_config(&portal), &portal.http()).unwrap();

    let err = sink
        .write(&[measurement(1, 1.0, false)], &metadata(true))
        .unwrap_err();
    assert!(matches!(err, PortalError::Sink { .. }));
    assert!(err.to_string().contains("500"));
}
