/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for a local intake service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service root, without trailing slash (default: `http://localhost:5000`).
    pub base_url: String,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Require the step-one validation form to pass before advancing
    /// (default: `false`).
    pub strict_validation: bool,
}

/// A configuration variable held a value that could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("{var} must be {expected} (got '{value}')")]
pub struct ConfigError {
    pub var: &'static str,
    pub expected: &'static str,
    pub value: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            strict_validation: false,
        }
    }
}

const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl ClientConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `INTAKE_BASE_URL`             | `http://localhost:5000` |
    /// | `INTAKE_REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `INTAKE_STRICT_VALIDATION`    | `false`                 |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("INTAKE_BASE_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());

        let request_timeout_secs = match lookup("INTAKE_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError {
                var: "INTAKE_REQUEST_TIMEOUT_SECS",
                expected: "a whole number of seconds",
                value: raw.clone(),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let strict_validation = match lookup("INTAKE_STRICT_VALIDATION") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError {
                var: "INTAKE_STRICT_VALIDATION",
                expected: "true or false",
                value: raw.clone(),
            })?,
            None => false,
        };

        Ok(Self {
            base_url,
            request_timeout_secs,
            strict_validation,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
