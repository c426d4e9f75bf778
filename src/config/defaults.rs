use super::*;

pub(crate) const DEFAULT_LOGIN_URL: &str = "https://espace-client-connexion.enedis.fr/auth/UI/Login";
pub(crate) const DEFAULT_DATA_URL: &str =
    "https://espace-client-particuliers.enedis.fr/group/espace-particuliers/suivi-de-consommation";

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            login: String::new(),
            password: String::new(),
            max_power_kva: 6,
            offpeak_periods: Vec::new(),
        }
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            login_url: DEFAULT_LOGIN_URL.to_string(),
            data_url: DEFAULT_DATA_URL.to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: format!("enedis-portal/{}", env!("APP_VERSION")),
        }
    }
}

impl Default for InfluxConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8086".to_string(),
            user: String::new(),
            password: String::new(),
            database: "enedis".to_string(),
            measurement: "consumption".to_string(),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            provider_name: String::new(),
            annual_fee: 0.0,
            peak_offpeak_enabled: false,
            price_per_kwh: 0.2516,
            price_per_kwh_peak: 0.27,
            price_per_kwh_offpeak: 0.2068,
            currency_symbol: "€".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            console_level: None,
            file_level: None,
            file: "/tmp/enedis-portal.log".to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            portal: PortalConfig::default(),
            endpoints: EndpointsConfig::default(),
            http: HttpConfig::default(),
            influx: InfluxConfig::default(),
            pricing: PricingConfig::default(),
            logging: LoggingConfig::default(),
            timezone: "Europe/Paris".to_string(),
            days: 1,
        }
    }
}
