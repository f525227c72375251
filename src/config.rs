//! Provider configuration.
//!
//! The provider needs exactly three options: a client id, a client secret, and an
//! environment selector. They usually arrive from the framework's provider
//! registration as loosely typed values, so they are first deserialized into
//! [`RawOptions`] and then validated into [`ProviderOptions`].
//!
//! # Examples
//!
//! ```
//! use paypal_provider::config::{Environment, ProviderOptions};
//!
//! let toml = r#"
//!     client_id = "abc"
//!     client_secret = "shh"
//!     environment = "sandbox"
//! "#;
//!
//! let options = ProviderOptions::from_toml(toml).unwrap();
//! assert_eq!(options.environment, Environment::Sandbox);
//! ```

use std::{fmt, path::Path, str::FromStr, time::Duration};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use crate::error::{ProviderError, Result};

/// Environment variable holding the client id.
pub const ENV_CLIENT_ID: &str = "PAYPAL_CLIENT_ID";
/// Environment variable holding the client secret.
pub const ENV_CLIENT_SECRET: &str = "PAYPAL_CLIENT_SECRET";
/// Environment variable holding the environment selector.
pub const ENV_ENVIRONMENT: &str = "PAYPAL_ENVIRONMENT";

/// PayPal environment the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// `https://api-m.sandbox.paypal.com`
    Sandbox,
    /// `https://api-m.paypal.com`
    Production,
}

impl Environment {
    /// Returns the REST API base URL for this environment.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Sandbox => "https://api-m.sandbox.paypal.com",
            Self::Production => "https://api-m.paypal.com",
        }
    }

    /// Returns the option value naming this environment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            other => Err(ProviderError::InvalidOptions(format!(
                "environment must be \"sandbox\" or \"production\", got {other:?}"
            ))),
        }
    }
}

/// HTTP client tuning.
///
/// No total request timeout is applied unless `timeout_secs` is set; callers that need
/// bounded latency impose their own deadline or set it here.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Maximum idle connections per host.
    #[serde(default = "default_pool_max_idle")]
    pub pool_max_idle_per_host: usize,

    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Total request timeout in seconds (absent means unbounded).
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Overrides the environment's base URL (must be HTTPS).
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: default_pool_max_idle(),
            connect_timeout_secs: default_connect_timeout_secs(),
            timeout_secs: None,
            base_url: None,
        }
    }
}

impl HttpConfig {
    /// Validates bounds and the base URL override.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidOptions`] if:
    /// - `connect_timeout_secs` is outside 1-60
    /// - `timeout_secs` is set to 0
    /// - `base_url` does not parse or is not HTTPS
    pub fn validate(&self) -> Result<()> {
        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > 60 {
            return Err(ProviderError::InvalidOptions(
                "connect_timeout_secs must be between 1 and 60".to_owned(),
            ));
        }
        if self.timeout_secs == Some(0) {
            return Err(ProviderError::InvalidOptions(
                "timeout_secs must be positive when set".to_owned(),
            ));
        }
        if let Some(ref base_url) = self.base_url {
            let url = Url::parse(base_url).map_err(|e| {
                ProviderError::InvalidOptions(format!("invalid base_url '{base_url}': {e}"))
            })?;
            if url.scheme() != "https" {
                return Err(ProviderError::InvalidOptions(format!(
                    "base_url must use HTTPS, got: {}",
                    url.scheme()
                )));
            }
        }
        Ok(())
    }

    /// Returns the connect timeout as a [`Duration`].
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Returns the total request timeout, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

const fn default_pool_max_idle() -> usize {
    10
}

const fn default_connect_timeout_secs() -> u64 {
    10
}

/// Unvalidated provider options as handed over at registration time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOptions {
    /// PayPal REST client id.
    #[serde(default, alias = "clientId")]
    pub client_id: Option<String>,

    /// PayPal REST client secret.
    #[serde(default, alias = "clientSecret")]
    pub client_secret: Option<String>,

    /// `sandbox` or `production`.
    #[serde(default)]
    pub environment: Option<String>,

    /// HTTP client tuning.
    #[serde(default)]
    pub http: HttpConfig,
}

impl RawOptions {
    /// Checks the options without consuming them.
    ///
    /// This is the static validation entry point run when the provider is registered.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidOptions`] naming the first missing or invalid option.
    pub fn validate(&self) -> Result<()> {
        required("client_id", self.client_id.as_deref())?;
        required("client_secret", self.client_secret.as_deref())?;
        let environment = required("environment", self.environment.as_deref())?;
        environment.parse::<Environment>()?;
        self.http.validate()
    }

    /// Validates and converts into [`ProviderOptions`].
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidOptions`] if validation fails.
    pub fn into_options(self) -> Result<ProviderOptions> {
        self.validate()?;
        let Self { client_id, client_secret, environment, http } = self;
        let (Some(client_id), Some(client_secret), Some(environment)) =
            (client_id, client_secret, environment)
        else {
            return Err(ProviderError::InvalidOptions("required option missing".to_owned()));
        };
        Ok(ProviderOptions {
            client_id,
            client_secret: SecretString::from(client_secret),
            environment: environment.parse()?,
            http,
        })
    }
}

fn required<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ProviderError::InvalidOptions(format!("{name} is required"))),
    }
}

/// Validated provider options.
#[derive(Debug)]
pub struct ProviderOptions {
    /// PayPal REST client id.
    pub client_id: String,
    /// PayPal REST client secret.
    pub client_secret: SecretString,
    /// Target environment.
    pub environment: Environment,
    /// HTTP client tuning.
    pub http: HttpConfig,
}

impl ProviderOptions {
    /// Builds options for `environment` with default HTTP settings.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            environment,
            http: HttpConfig::default(),
        }
    }

    /// Parses and validates options from TOML.
    ///
    /// # Errors
    ///
    /// Returns error if TOML parsing or validation fails.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let raw: RawOptions = toml::from_str(toml_str)
            .map_err(|e| ProviderError::InvalidOptions(format!("invalid TOML config: {e}")))?;
        raw.into_options()
    }

    /// Parses and validates options from a JSON value, the shape frameworks pass at
    /// registration.
    ///
    /// # Errors
    ///
    /// Returns error if the value has the wrong shape or validation fails.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let raw: RawOptions = serde_json::from_value(value)
            .map_err(|e| ProviderError::InvalidOptions(format!("invalid options: {e}")))?;
        raw.into_options()
    }

    /// Reads options from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or its content is invalid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ProviderError::InvalidOptions(format!("cannot read config file: {e}")))?;
        Self::from_toml(&content)
    }

    /// Reads options from `PAYPAL_CLIENT_ID`, `PAYPAL_CLIENT_SECRET`, and
    /// `PAYPAL_ENVIRONMENT`.
    ///
    /// # Errors
    ///
    /// Returns error if a variable is missing or invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads options through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns error if a variable is missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        RawOptions {
            client_id: lookup(ENV_CLIENT_ID),
            client_secret: lookup(ENV_CLIENT_SECRET),
            environment: lookup(ENV_ENVIRONMENT),
            http: HttpConfig::default(),
        }
        .into_options()
    }

    /// Checks options built in code rather than parsed from [`RawOptions`].
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidOptions`] if the credentials are blank or the HTTP
    /// settings are invalid.
    pub fn validate(&self) -> Result<()> {
        required("client_id", Some(&self.client_id))?;
        required("client_secret", Some(self.client_secret.expose_secret()))?;
        self.http.validate()
    }

    /// Returns the API base URL, honouring the override.
    ///
    /// # Errors
    ///
    /// Returns error if the override does not parse.
    pub fn base_url(&self) -> Result<Url> {
        let raw = self.http.base_url.as_deref().unwrap_or_else(|| self.environment.base_url());
        Url::parse(raw)
            .map_err(|e| ProviderError::InvalidOptions(format!("invalid base_url '{raw}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::ErrorKind;

    fn raw(id: Option<&str>, secret: Option<&str>, env: Option<&str>) -> RawOptions {
        RawOptions {
            client_id: id.map(str::to_owned),
            client_secret: secret.map(str::to_owned),
            environment: env.map(str::to_owned),
            http: HttpConfig::default(),
        }
    }

    #[test]
    fn test_valid_options() {
        let options = raw(Some("id"), Some("secret"), Some("production")).into_options().unwrap();
        assert_eq!(options.client_id, "id");
        assert_eq!(options.client_secret.expose_secret(), "secret");
        assert_eq!(options.environment, Environment::Production);
    }

    #[test]
    fn test_missing_client_id() {
        let err = raw(None, Some("secret"), Some("sandbox")).validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("client_id is required"));
    }

    #[test]
    fn test_blank_client_secret() {
        let err = raw(Some("id"), Some("   "), Some("sandbox")).validate().unwrap_err();
        assert!(err.to_string().contains("client_secret is required"));
    }

    #[test]
    fn test_missing_environment() {
        let err = raw(Some("id"), Some("secret"), None).validate().unwrap_err();
        assert!(err.to_string().contains("environment is required"));
    }

    #[test]
    fn test_invalid_environment() {
        let err = raw(Some("id"), Some("secret"), Some("live")).validate().unwrap_err();
        assert!(err.to_string().contains("\"sandbox\" or \"production\""));
    }

    #[test]
    fn test_environment_is_case_sensitive() {
        assert!("Sandbox".parse::<Environment>().is_err());
        assert_eq!("sandbox".parse::<Environment>().unwrap(), Environment::Sandbox);
    }

    #[test]
    fn test_from_toml_with_http_table() {
        let toml = r#"
            client_id = "id"
            client_secret = "secret"
            environment = "sandbox"

            [http]
            pool_max_idle_per_host = 4
            timeout_secs = 20
        "#;

        let options = ProviderOptions::from_toml(toml).unwrap();
        assert_eq!(options.http.pool_max_idle_per_host, 4);
        assert_eq!(options.http.timeout(), Some(Duration::from_secs(20)));
        assert_eq!(options.http.connect_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_from_toml_invalid() {
        assert!(ProviderOptions::from_toml("invalid toml {{{").is_err());
    }

    #[test]
    fn test_from_json_camel_case_keys() {
        let value = serde_json::json!({
            "clientId": "id",
            "clientSecret": "secret",
            "environment": "production",
        });
        let options = ProviderOptions::from_json(value).unwrap();
        assert_eq!(options.environment, Environment::Production);
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (ENV_CLIENT_ID, "id"),
            (ENV_CLIENT_SECRET, "secret"),
            (ENV_ENVIRONMENT, "sandbox"),
        ]
        .into_iter()
        .collect();

        let options =
            ProviderOptions::from_lookup(|key| vars.get(key).map(|v| (*v).to_owned())).unwrap();
        assert_eq!(options.client_id, "id");
    }

    #[test]
    fn test_from_lookup_missing_variable() {
        assert!(ProviderOptions::from_lookup(|_| None).is_err());
    }

    #[test]
    fn test_default_timeouts_unbounded() {
        let config = HttpConfig::default();
        assert!(config.timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_http_base_url_must_be_https() {
        let config = HttpConfig {
            base_url: Some("http://api.example.com".to_owned()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_http_zero_timeout_rejected() {
        let config = HttpConfig { timeout_secs: Some(0), ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_url_per_environment() {
        let sandbox = ProviderOptions::new("id", "secret", Environment::Sandbox);
        assert_eq!(sandbox.base_url().unwrap().as_str(), "https://api-m.sandbox.paypal.com/");

        let production = ProviderOptions::new("id", "secret", Environment::Production);
        assert_eq!(production.base_url().unwrap().host_str(), Some("api-m.paypal.com"));
    }

    #[test]
    fn test_programmatic_options_validated() {
        let blank = ProviderOptions::new(" ", "secret", Environment::Sandbox);
        assert_eq!(blank.validate().unwrap_err().kind(), ErrorKind::Configuration);
        assert!(ProviderOptions::new("id", "secret", Environment::Sandbox).validate().is_ok());
    }

    #[test]
    fn test_secret_is_redacted_in_debug() {
        let options = ProviderOptions::new("id", "super-secret", Environment::Sandbox);
        assert!(!format!("{options:?}").contains("super-secret"));
    }
}
