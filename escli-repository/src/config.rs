//! Connection configuration for the search client.
//!
//! Settings come from explicit options (CLI flags, each with an environment
//! variable fallback) or, failing that, from the `.env` file written by
//! Elastic's start-local developer setup.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use crate::errors::ConfigError;

/// Default backend port.
pub const DEFAULT_PORT: u16 = 9200;

/// Default user for basic authentication.
pub const DEFAULT_USER: &str = "elastic";

/// Directories searched for a start-local `.env` file, in order.
pub const START_LOCAL_DIRS: [&str; 2] = [".", "elastic-start-local"];

/// Raw connection options, as supplied by the user.
///
/// Every field is optional; `ConnectionConfig::resolve` decides which source
/// wins and validates the result.
#[derive(Debug, Clone, Default)]
pub struct ConnectionOptions {
    /// Full endpoint URL. Takes precedence over host/port/scheme.
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// `http` or `https`.
    pub scheme: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Encoded API key. Takes precedence over user/password.
    pub api_key: Option<String>,
    /// Path to a PEM encoded CA certificate.
    pub ca_cert: Option<PathBuf>,
    /// Skip certificate validation.
    pub insecure: bool,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Credentials presented to the backend.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Basic { user: String, password: String },
    /// An encoded (base64 `id:key`) API key.
    ApiKey(String),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { user, .. } => f
                .debug_struct("Basic")
                .field("user", user)
                .field("password", &"<redacted>")
                .finish(),
            Self::ApiKey(_) => f.debug_tuple("ApiKey").field(&"<redacted>").finish(),
        }
    }
}

/// TLS settings.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TlsConfig {
    /// PEM encoded CA certificate used to validate the server.
    pub ca_cert_pem: Option<Vec<u8>>,
    /// Skip certificate validation entirely.
    pub insecure: bool,
}

impl fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsConfig")
            .field("ca_cert", &self.ca_cert_pem.as_ref().map(Vec::len))
            .field("insecure", &self.insecure)
            .finish()
    }
}

impl TlsConfig {
    fn load(options: &ConnectionOptions) -> Result<Self, ConfigError> {
        let ca_cert_pem = match &options.ca_cert {
            Some(path) => Some(fs::read(path).map_err(|source| ConfigError::Certificate {
                path: path.clone(),
                source,
            })?),
            None => None,
        };
        if options.insecure && ca_cert_pem.is_some() {
            warn!("Certificate validation is disabled, ignoring CA certificate");
        }
        Ok(Self {
            ca_cert_pem,
            insecure: options.insecure,
        })
    }
}

/// Resolved connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub url: Url,
    pub credentials: Option<Credentials>,
    pub tls: TlsConfig,
    /// Request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl ConnectionConfig {
    /// Create an anonymous config for the given endpoint.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            credentials: None,
            tls: TlsConfig::default(),
            timeout: None,
        }
    }

    /// Set the credentials.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Resolve settings from options, falling back to a start-local `.env`.
    ///
    /// Resolution order:
    ///
    /// 1. An explicit URL, or host/port/scheme, with credentials from the API
    ///    key, else user/password, else none
    /// 2. A start-local `.env` file in each of `start_local_dirs`, in order
    /// 3. Give up with `ConfigError::Unresolved`
    ///
    /// TLS and timeout options apply whichever source provided the endpoint.
    pub fn resolve(
        options: &ConnectionOptions,
        start_local_dirs: &[PathBuf],
    ) -> Result<Self, ConfigError> {
        let tls = TlsConfig::load(options)?;
        let timeout = options.timeout_secs.map(Duration::from_secs);

        if let Some(url) = explicit_endpoint(options)? {
            debug!(url = %url, "Using explicit connection settings");
            return Ok(Self {
                url,
                credentials: explicit_credentials(options)?,
                tls,
                timeout,
            });
        }

        for dir in start_local_dirs {
            if let Some(config) = Self::from_start_local(dir)? {
                debug!(dir = %dir.display(), url = %config.url, "Using start-local settings");
                return Ok(Self {
                    tls,
                    timeout,
                    ..config
                });
            }
        }

        Err(ConfigError::Unresolved)
    }

    /// Load settings from the start-local `.env` file in `dir`.
    ///
    /// Returns `Ok(None)` when there is no `.env` file in `dir`.
    pub fn from_start_local(dir: &Path) -> Result<Option<Self>, ConfigError> {
        let path = dir.join(".env");
        if !path.is_file() {
            return Ok(None);
        }

        let entries = dotenv::from_path_iter(&path)
            .map_err(|e| ConfigError::start_local(&path, e.to_string()))?;
        let mut vars = HashMap::new();
        for entry in entries {
            let (key, value) = entry.map_err(|e| ConfigError::start_local(&path, e.to_string()))?;
            vars.insert(key, value);
        }

        let url_str = match (vars.get("ES_LOCAL_URL"), vars.get("ES_LOCAL_PORT")) {
            (Some(url), _) => url.clone(),
            (None, Some(port)) => format!("http://localhost:{}", port),
            (None, None) => format!("http://localhost:{}", DEFAULT_PORT),
        };
        let url = parse_url(&url_str)
            .map_err(|e| ConfigError::start_local(&path, e.to_string()))?;

        let credentials = if let Some(api_key) = vars.get("ES_LOCAL_API_KEY") {
            Credentials::ApiKey(api_key.clone())
        } else if let Some(password) = vars.get("ES_LOCAL_PASSWORD") {
            Credentials::Basic {
                user: DEFAULT_USER.to_string(),
                password: password.clone(),
            }
        } else {
            return Err(ConfigError::start_local(
                &path,
                "neither ES_LOCAL_API_KEY nor ES_LOCAL_PASSWORD is set",
            ));
        };

        Ok(Some(Self::new(url).with_credentials(credentials)))
    }
}

/// The default start-local search directories, relative to the working directory.
pub fn default_start_local_dirs() -> Vec<PathBuf> {
    START_LOCAL_DIRS.iter().map(PathBuf::from).collect()
}

fn explicit_endpoint(options: &ConnectionOptions) -> Result<Option<Url>, ConfigError> {
    if let Some(url) = &options.url {
        if options.host.is_some() || options.port.is_some() || options.scheme.is_some() {
            warn!("A URL was given, ignoring host, port and scheme");
        }
        return parse_url(url).map(Some);
    }

    let Some(host) = &options.host else {
        return Ok(None);
    };
    let scheme = options.scheme.as_deref().unwrap_or("http");
    let port = options.port.unwrap_or(DEFAULT_PORT);
    parse_url(&format!("{}://{}:{}", scheme, host, port)).map(Some)
}

fn explicit_credentials(options: &ConnectionOptions) -> Result<Option<Credentials>, ConfigError> {
    if let Some(api_key) = options.api_key.as_ref().filter(|key| !key.is_empty()) {
        return Ok(Some(Credentials::ApiKey(api_key.clone())));
    }
    match (&options.user, &options.password) {
        (user, Some(password)) => Ok(Some(Credentials::Basic {
            user: user.clone().unwrap_or_else(|| DEFAULT_USER.to_string()),
            password: password.clone(),
        })),
        (Some(_), None) => Err(ConfigError::incomplete_credentials(
            "a user was given without a password",
        )),
        (None, None) => Ok(None),
    }
}

fn parse_url(url: &str) -> Result<Url, ConfigError> {
    let parsed = Url::parse(url).map_err(|e| ConfigError::invalid_url(url, e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}
