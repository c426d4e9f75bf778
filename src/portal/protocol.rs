//! Consumption data retrieval
//!
//! A request names a date range (days only) and a resolution. The portal
//! answers with numbered half-hour buckets counted from midnight of the
//! first day, which are turned back into timestamps here.

use crate::error::FetchError;
use crate::logging::{LogContext, get_logger_with_context};
use crate::measurement::PowerMeasurement;
use crate::offpeak::{OffpeakPeriod, is_offpeak, resolve_local};
use crate::portal::session::PortalSession;
use crate::portal::types::{DataResponse, PORTLET_ID, RawSample, Resolution};
use chrono::{DateTime, LocalResult, NaiveTime, TimeDelta, TimeZone};
use chrono_tz::Tz;

/// Minutes covered by one portal bucket
pub const BUCKET_MINUTES: i64 = 30;

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Query string of the data resource request
pub fn query_params(resolution: Resolution) -> [(&'static str, &'static str); 9] {
    [
        ("p_p_id", PORTLET_ID),
        ("p_p_lifecycle", "2"),
        ("p_p_state", "normal"),
        ("p_p_mode", "view"),
        ("p_p_resource_id", resolution.resource_id()),
        ("p_p_cacheability", "cacheLevelPage"),
        ("p_p_col_id", "column-1"),
        ("p_p_col_pos", "1"),
        ("p_p_col_count", "3"),
    ]
}

/// Form body carrying the date-only range bounds
pub fn form_fields(from: &DateTime<Tz>, to: &DateTime<Tz>) -> [(String, String); 2] {
    [
        (
            format!("_{PORTLET_ID}_dateDebut"),
            from.format(DATE_FORMAT).to_string(),
        ),
        (
            format!("_{PORTLET_ID}_dateFin"),
            to.format(DATE_FORMAT).to_string(),
        ),
    ]
}

/// Floor `from` to 00:00:00 and ceil `to` to 23:59:59 of their own days.
///
/// A midnight skipped by a DST jump floors to the first instant after the gap.
pub fn day_bounds(
    from: &DateTime<Tz>,
    to: &DateTime<Tz>,
) -> Result<(DateTime<Tz>, DateTime<Tz>), FetchError> {
    let start = resolve_local(&from.timezone(), from.date_naive().and_time(NaiveTime::MIN))
        .ok_or_else(|| FetchError::InvalidRange {
            message: format!("no start of day on {}", from.date_naive()),
        })?;

    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    let end_local = to.date_naive().and_time(end_of_day);
    let end = match to.timezone().from_local_datetime(&end_local) {
        LocalResult::Ambiguous(_, latest) => Some(latest),
        _ => resolve_local(&to.timezone(), end_local),
    }
    .ok_or_else(|| FetchError::InvalidRange {
        message: format!("no end of day on {}", to.date_naive()),
    })?;

    if end < start {
        return Err(FetchError::InvalidRange {
            message: format!(
                "range ends ({}) before it starts ({})",
                to.date_naive(),
                from.date_naive()
            ),
        });
    }
    Ok((start, end))
}

/// Decode a response body; any mismatch with the expected shape fails the whole batch
pub fn decode_response(body: &str) -> Result<DataResponse, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::DecodeError {
        message: e.to_string(),
    })
}

/// Map raw buckets to measurements, in input order.
///
/// Each timestamp is `start + (order - 1) * 30 min + 1 ms`; the extra
/// millisecond keeps samples off the window boundaries.
pub fn to_measurements(
    samples: &[RawSample],
    start: &DateTime<Tz>,
    periods: &[OffpeakPeriod],
) -> Result<Vec<PowerMeasurement>, FetchError> {
    samples
        .iter()
        .map(|sample| {
            let date = sample_time(start, sample.order)?;
            Ok(PowerMeasurement {
                is_offpeak: is_offpeak(periods, &date),
                date,
                power: sample.value / 2.0,
            })
        })
        .collect()
}

fn sample_time(start: &DateTime<Tz>, order: i64) -> Result<DateTime<Tz>, FetchError> {
    let out_of_range = || FetchError::DecodeError {
        message: format!("sample order {order} is out of range"),
    };
    if order < 1 {
        return Err(out_of_range());
    }

    let offset = (order - 1)
        .checked_mul(BUCKET_MINUTES)
        .and_then(TimeDelta::try_minutes)
        .ok_or_else(out_of_range)?;
    start
        .checked_add_signed(offset)
        .and_then(|t| t.checked_add_signed(TimeDelta::milliseconds(1)))
        .ok_or_else(out_of_range)
}

/// Fetch and classify one range of consumption data.
///
/// Fails with [`FetchError::NotAuthenticated`] before touching the network
/// when the session has not logged in.
pub fn fetch(
    session: &PortalSession,
    resolution: Resolution,
    from: &DateTime<Tz>,
    to: &DateTime<Tz>,
    periods: &[OffpeakPeriod],
) -> Result<Vec<PowerMeasurement>, FetchError> {
    if !session.is_authenticated() {
        return Err(FetchError::NotAuthenticated);
    }

    let logger = get_logger_with_context(
        LogContext::new("protocol").with_field("resolution", resolution),
    );

    let form = form_fields(from, to);
    let (start, end) = day_bounds(from, to)?;
    logger.debug(&format!("Requesting data from {start} to {end}"));

    let resp = session
        .http()
        .post(session.data_url())
        .query(&query_params(resolution))
        .form(&form)
        .send()?;

    let status = resp.status();
    if status.as_u16() >= 400 {
        logger.error(&format!("Data request failed: {status}"));
        return Err(FetchError::HttpStatus {
            status: status.as_u16(),
        });
    }

    let body = resp.text()?;
    let response = decode_response(&body)?;
    logger.debug(&format!(
        "Portal state '{}', {} samples",
        response.state.value,
        response.graph.data.len()
    ));

    let measurements = to_measurements(&response.graph.data, &start, periods)?;
    if let Some(last) = measurements.last()
        && last.date > end
    {
        logger.warn(&format!(
            "Last sample at {} is past the requested range end {end}",
            last.date
        ));
    }
    Ok(measurements)
}
