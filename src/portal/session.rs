//! Cookie-backed portal session
//!
//! The login endpoint answers 200 (or a redirect) whether or not the
//! credentials are accepted. The only reliable signal is the
//! `iPlanetDirectoryPro` cookie: absent or set to `LOGOUT` means the login
//! was refused.

use crate::config::{EndpointsConfig, HttpConfig};
use crate::error::{AuthError, ConfigError};
use crate::logging::{LogContext, StructuredLogger, get_logger_with_context};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::blocking::Client;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::redirect::Policy;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Session-marker cookie set by the login endpoint
pub const SESSION_COOKIE: &str = "iPlanetDirectoryPro";

/// Session-marker value meaning the login was refused
pub const LOGGED_OUT_SENTINEL: &str = "LOGOUT";

const REALM: &str = "realm=particuliers";

/// Account credentials
#[derive(Clone)]
pub struct Credentials {
    login: String,
    password: String,
}

impl Credentials {
    pub fn new<L: Into<String>, P: Into<String>>(login: L, password: P) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    /// Both login and password are non-empty
    pub fn is_complete(&self) -> bool {
        !self.login.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"***")
            .finish()
    }
}

/// Authenticated HTTP session against the portal.
///
/// Owns the cookie jar; every request made through the session shares it.
/// Not meant to be used from several threads at once.
pub struct PortalSession {
    http: Client,
    cookies: Arc<Jar>,
    endpoints: EndpointsConfig,
    authenticated: bool,
    logger: StructuredLogger,
}

impl PortalSession {
    /// Build an unauthenticated session
    pub fn new(endpoints: &EndpointsConfig, http: &HttpConfig) -> Result<Self, ConfigError> {
        let cookies = Arc::new(Jar::default());

        // Redirects are not followed so the login response cookies stay visible
        let mut builder = Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .redirect(Policy::none())
            .user_agent(http.user_agent.clone());
        if http.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(http.timeout_seconds));
        }
        let client = builder.build().map_err(|e| ConfigError::HttpClient {
            message: e.to_string(),
        })?;

        Ok(Self {
            http: client,
            cookies,
            endpoints: endpoints.clone(),
            authenticated: false,
            logger: get_logger_with_context(
                LogContext::new("session").with_field("login_url", &endpoints.login_url),
            ),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Run the login handshake, then warm the session up on the data page.
    ///
    /// On any failure the session is left unauthenticated.
    pub fn login(&mut self, credentials: &Credentials) -> Result<(), AuthError> {
        self.authenticated = false;
        self.logger
            .info(&format!("Logging in as {}", credentials.login()));

        let realm = STANDARD.encode(REALM);
        let form = [
            ("IDToken1", credentials.login.as_str()),
            ("IDToken2", credentials.password.as_str()),
            ("SunQueryParamsString", realm.as_str()),
            ("encoded", "true"),
            ("gx_charset", "UTF-8"),
        ];

        let resp = self
            .http
            .post(&self.endpoints.login_url)
            .form(&form)
            .send()?;

        let status = resp.status();
        if status.as_u16() >= 400 {
            self.logger
                .error(&format!("Login request failed: {status}"));
            return Err(AuthError::HttpFailure {
                status: status.as_u16(),
            });
        }

        let cookies: Vec<(String, String)> = resp
            .cookies()
            .map(|c| (c.name().to_string(), c.value().to_string()))
            .collect();
        if let Err(e) = check_session_cookie(cookies.iter().map(|(n, v)| (n.as_str(), v.as_str())))
        {
            self.logger.error(&e.to_string());
            return Err(e);
        }

        // The data page hands out the remaining cookies (JSESSIONID, ...)
        self.http.get(&self.endpoints.data_url).send()?;
        if let Ok(url) = self.endpoints.data_url.parse::<reqwest::Url>() {
            let has_cookies = self.cookies.cookies(&url).is_some();
            self.logger
                .debug(&format!("Warm-up done, data cookies present: {has_cookies}"));
        }

        self.authenticated = true;
        self.logger.info("Logged in");
        Ok(())
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn data_url(&self) -> &str {
        &self.endpoints.data_url
    }
}

/// Decide the login outcome from the response cookies
pub fn check_session_cookie<'a, I>(cookies: I) -> Result<(), AuthError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut seen = false;
    for (name, value) in cookies {
        if name != SESSION_COOKIE {
            continue;
        }
        if value == LOGGED_OUT_SENTINEL {
            return Err(AuthError::InvalidCredentials {
                reason: format!("{SESSION_COOKIE} == {LOGGED_OUT_SENTINEL}"),
            });
        }
        seen = true;
    }

    if seen {
        Ok(())
    } else {
        Err(AuthError::InvalidCredentials {
            reason: format!("no {SESSION_COOKIE} cookie present"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_with_token_is_accepted() {
        let cookies = [("amlbcookie", "01"), (SESSION_COOKIE, "AQIC5wM2LY4Sfcz")];
        assert!(check_session_cookie(cookies).is_ok());
    }

    #[test]
    fn logout_sentinel_is_rejected() {
        let err = check_session_cookie([(SESSION_COOKIE, "LOGOUT")]).unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials { .. }));
        assert!(err.to_string().contains("LOGOUT"));
    }

    #[test]
    fn logout_wins_over_earlier_token() {
        let cookies = [(SESSION_COOKIE, "AQIC5wM2"), (SESSION_COOKIE, "LOGOUT")];
        assert!(check_session_cookie(cookies).is_err());
    }

    #[test]
    fn missing_cookie_is_rejected() {
        let err = check_session_cookie([("JSESSIONID", "abc")]).unwrap_err();
        assert!(err.to_string().contains("no iPlanetDirectoryPro cookie"));
    }

    #[test]
    fn realm_marker_encoding() {
        assert_eq!(STANDARD.encode(REALM), "cmVhbG09cGFydGljdWxpZXJz");
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new("jane@example.com", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("jane@example.com"));
        assert!(!debug.contains("hunter2"));
        assert!(creds.is_complete());
        assert!(!Credentials::new("", "x").is_complete());
    }

    #[test]
    fn new_session_is_not_authenticated() {
        let session =
            PortalSession::new(&EndpointsConfig::default(), &HttpConfig::default()).unwrap();
        assert!(!session.is_authenticated());
    }
}
