use crate::config::{EndpointsConfig, HttpConfig, OffpeakPeriodConfig};
use crate::error::{ConfigError, FetchError, Result};
use crate::logging::{StructuredLogger, get_logger};
use crate::measurement::PowerMeasurement;
use crate::offpeak::OffpeakPeriod;
use crate::portal::protocol;
use crate::portal::session::{Credentials, PortalSession};
use crate::portal::types::Resolution;
use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;

/// Everything needed to build a logged-in client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub credentials: Credentials,
    pub offpeak_periods: Vec<OffpeakPeriodConfig>,
    pub endpoints: EndpointsConfig,
    pub http: HttpConfig,
    /// Zone the portal's calendar days and off-peak windows are read in
    pub timezone: Tz,
}

impl ClientConfig {
    /// Default endpoints, no off-peak windows, Europe/Paris
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            offpeak_periods: Vec::new(),
            endpoints: EndpointsConfig::default(),
            http: HttpConfig::default(),
            timezone: chrono_tz::Europe::Paris,
        }
    }
}

/// Portal client. A constructed client is always logged in.
pub struct PortalClient {
    session: PortalSession,
    offpeak_periods: Vec<OffpeakPeriod>,
    timezone: Tz,
    logger: StructuredLogger,
}

impl PortalClient {
    /// Validate the configuration, open a session and log in
    pub fn new(config: ClientConfig) -> Result<Self> {
        let logger = get_logger("client");

        if !config.credentials.is_complete() {
            return Err(ConfigError::MissingCredentials.into());
        }

        let offpeak_periods = config
            .offpeak_periods
            .iter()
            .enumerate()
            .map(|(index, p)| {
                OffpeakPeriod::parse(&p.from, &p.to)
                    .map_err(|source| ConfigError::InvalidOffpeakPeriod { index, source })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for period in offpeak_periods.iter().filter(|p| p.is_empty_interval()) {
            logger.warn(&format!(
                "Off-peak period {period} does not wrap past midnight and will never match"
            ));
        }

        let mut session = PortalSession::new(&config.endpoints, &config.http)?;
        session.login(&config.credentials)?;

        Ok(Self {
            session,
            offpeak_periods,
            timezone: config.timezone,
            logger,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn offpeak_periods(&self) -> &[OffpeakPeriod] {
        &self.offpeak_periods
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn hourly<Z: TimeZone>(
        &self,
        from: &DateTime<Z>,
        to: &DateTime<Z>,
    ) -> std::result::Result<Vec<PowerMeasurement>, FetchError> {
        self.fetch(Resolution::Hourly, from, to)
    }

    pub fn daily<Z: TimeZone>(
        &self,
        from: &DateTime<Z>,
        to: &DateTime<Z>,
    ) -> std::result::Result<Vec<PowerMeasurement>, FetchError> {
        self.fetch(Resolution::Daily, from, to)
    }

    pub fn monthly<Z: TimeZone>(
        &self,
        from: &DateTime<Z>,
        to: &DateTime<Z>,
    ) -> std::result::Result<Vec<PowerMeasurement>, FetchError> {
        self.fetch(Resolution::Monthly, from, to)
    }

    pub fn yearly<Z: TimeZone>(
        &self,
        from: &DateTime<Z>,
        to: &DateTime<Z>,
    ) -> std::result::Result<Vec<PowerMeasurement>, FetchError> {
        self.fetch(Resolution::Yearly, from, to)
    }

    /// Fetch a range at the given resolution; bounds are read in the client's time zone
    pub fn fetch<Z: TimeZone>(
        &self,
        resolution: Resolution,
        from: &DateTime<Z>,
        to: &DateTime<Z>,
    ) -> std::result::Result<Vec<PowerMeasurement>, FetchError> {
        let from = from.with_timezone(&self.timezone);
        let to = to.with_timezone(&self.timezone);

        let measurements =
            protocol::fetch(&self.session, resolution, &from, &to, &self.offpeak_periods)?;
        self.logger.info(&format!(
            "Fetched {} {resolution} measurements from {} to {}",
            measurements.len(),
            from.date_naive(),
            to.date_naive()
        ));
        Ok(measurements)
    }
}
