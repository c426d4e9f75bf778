use std::collections::BTreeMap;
use std::fmt::Display;
use tracing::{Level, debug, error, info, trace, warn};

/// Field keys whose values are masked in every event
const SECRET_KEYS: [&str; 3] = ["password", "token", "cookie"];

/// Fields attached to every event of a logger
#[derive(Debug, Clone)]
pub struct LogContext {
    /// Emitting component, e.g. "session", "protocol", "influx"
    pub component: &'static str,
    pub extra_fields: BTreeMap<&'static str, String>,
}

impl LogContext {
    pub fn new(component: &'static str) -> Self {
        Self {
            component,
            extra_fields: BTreeMap::new(),
        }
    }

    /// Attach a field; values under secret-looking keys are masked
    #[must_use]
    pub fn with_field<V: Display>(mut self, key: &'static str, value: V) -> Self {
        let value = if is_secret(key) {
            "***".to_string()
        } else {
            value.to_string()
        };
        self.extra_fields.insert(key, value);
        self
    }
}

fn is_secret(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    SECRET_KEYS.iter().any(|s| key.contains(s))
}

/// Component logger; every event carries `component=<name>` plus the context fields
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    pub(crate) context: LogContext,
    fields: String,
}

impl StructuredLogger {
    pub fn new(context: LogContext) -> Self {
        let fields = render_fields(&context);
        Self { context, fields }
    }

    pub fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }

    pub fn error(&self, message: &str) {
        self.log(Level::ERROR, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }

    pub fn trace(&self, message: &str) {
        self.log(Level::TRACE, message);
    }

    fn log(&self, level: Level, message: &str) {
        let fields = self.fields.as_str();
        match level {
            Level::ERROR => error!(%fields, "{message}"),
            Level::WARN => warn!(%fields, "{message}"),
            Level::INFO => info!(%fields, "{message}"),
            Level::DEBUG => debug!(%fields, "{message}"),
            _ => trace!(%fields, "{message}"),
        }
    }
}

// Rendered once; loggers are built per component and reused
fn render_fields(context: &LogContext) -> String {
    std::iter::once(format!("component={}", context.component))
        .chain(
            context
                .extra_fields
                .iter()
                .map(|(key, value)| format!("{key}={value}")),
        )
        .collect::<Vec<_>>()
        .join(",")
}

pub fn get_logger(component: &'static str) -> StructuredLogger {
    StructuredLogger::new(LogContext::new(component))
}

pub fn get_logger_with_context(context: LogContext) -> StructuredLogger {
    StructuredLogger::new(context)
}
