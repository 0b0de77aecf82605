//! Client configuration.

use crate::Error;
use std::time::Duration;
use url::Url;

/// The default control-plane base URL.
pub const DEFAULT_BASE_URL: &str = "https://confluent.cloud/api/";

/// Environment variable holding the account email.
pub const EMAIL_ENV: &str = "CCLOUD_EMAIL";

/// Environment variable holding the account password.
pub const PASSWORD_ENV: &str = "CCLOUD_PASSWORD";

/// Environment variable overriding the control-plane base URL.
pub const BASE_URL_ENV: &str = "CCLOUD_BASE_URL";

/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_SECS_ENV: &str = "CCLOUD_TIMEOUT_SECS";

/// Returns the default `User-Agent` sent with every request.
pub fn default_user_agent() -> String {
    format!("ccloud-sdk/{}", env!("CARGO_PKG_VERSION"))
}

/// Configuration for a [crate::Client].
#[derive(Clone, Debug)]
pub struct Config {
    /// The control-plane base URL. Endpoint paths are resolved against it.
    pub base_url: String,
    /// The `User-Agent` header value.
    pub user_agent: String,
    /// An optional timeout applied to every request.
    pub timeout: Option<Duration>,
    /// The account email used by [crate::Client::login].
    pub email: String,
    /// The account password used by [crate::Client::login].
    pub password: String,
}

impl Config {
    /// Creates a [Config] with the default base URL and user agent.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: default_user_agent(),
            timeout: None,
            email: email.into(),
            password: password.into(),
        }
    }

    /// Reads the configuration from `CCLOUD_*` environment variables.
    ///
    /// `CCLOUD_EMAIL` and `CCLOUD_PASSWORD` are required, `CCLOUD_BASE_URL`
    /// and `CCLOUD_TIMEOUT_SECS` are optional.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| Error::Config(format!("{key} is not set")))
        };

        let mut config = Self::new(required(EMAIL_ENV)?, required(PASSWORD_ENV)?);
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        if let Some(timeout) = lookup(TIMEOUT_SECS_ENV) {
            let secs = timeout
                .parse::<u64>()
                .map_err(|e| Error::Config(format!("{TIMEOUT_SECS_ENV}: {e}")))?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Sets the control-plane base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the `User-Agent` header value.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Parses and normalizes the base URL.
    ///
    /// The result always ends with a `/` so relative endpoints resolve beneath it.
    pub(crate) fn parse_base_url(&self) -> Result<Url, Error> {
        parse_base(&self.base_url)
    }
}

/// Parses `raw` as a base URL that endpoint segments can be appended to.
pub(crate) fn parse_base(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(Error::InvalidBaseUrl(raw.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
