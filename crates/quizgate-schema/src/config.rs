//! # Configuration Validation
//!
//! Validates the process configuration (environment variables) before
//! the rest of the application starts, producing a typed [`Config`] or
//! every problem found.
//!
//! ## Recognised Keys
//!
//! | Key | Type | Default |
//! |-----|------|---------|
//! | `NODE_ENV` | `development` \| `production` \| `staging` \| `test` | `development` |
//! | `PORT` | port | `5000` |
//! | `USE_PROXY` | `"true"` \| `"false"` | `false` |
//! | `PROXY_HOST` | optional string | absent |
//! | `PROXY_PORT` | optional port | absent |
//! | `PROXY_USERNAME` | optional string | absent |
//! | `PROXY_PASSWORD` | optional string | absent |
//!
//! All other keys are ignored.
//!
//! ## Cross-Field Rule
//!
//! When `USE_PROXY` is true, `PROXY_HOST` and `PROXY_PORT` must both be
//! present. The two checks are independent, so both errors surface in the
//! same result. The rule only runs once every field resolved on its own.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use quizgate_core::{finish, FieldError, FieldPath, ValidationErrors, ValidationResult};
use serde::{Serialize, Serializer};

use crate::field::{FieldKind, FieldSpec};

/// Recognised environment keys.
pub mod keys {
    /// Deployment environment.
    pub const NODE_ENV: &str = "NODE_ENV";
    /// Listen port.
    pub const PORT: &str = "PORT";
    /// Whether outbound traffic goes through a proxy.
    pub const USE_PROXY: &str = "USE_PROXY";
    /// Proxy host name.
    pub const PROXY_HOST: &str = "PROXY_HOST";
    /// Proxy port.
    pub const PROXY_PORT: &str = "PROXY_PORT";
    /// Proxy user name.
    pub const PROXY_USERNAME: &str = "PROXY_USERNAME";
    /// Proxy password.
    pub const PROXY_PASSWORD: &str = "PROXY_PASSWORD";
}

/// `NODE_ENV` entry.
pub const NODE_ENV_FIELD: FieldSpec = FieldSpec {
    key: keys::NODE_ENV,
    kind: FieldKind::Environment,
    default: "development",
    description: "Deployment environment",
    secret: false,
};

/// `PORT` entry.
pub const PORT_FIELD: FieldSpec = FieldSpec {
    key: keys::PORT,
    kind: FieldKind::Port,
    default: "5000",
    description: "Port number for the server",
    secret: false,
};

/// `USE_PROXY` entry.
pub const USE_PROXY_FIELD: FieldSpec = FieldSpec {
    key: keys::USE_PROXY,
    kind: FieldKind::Flag,
    default: "false",
    description: "Route outbound requests through a proxy",
    secret: false,
};

/// `PROXY_HOST` entry.
pub const PROXY_HOST_FIELD: FieldSpec = FieldSpec {
    key: keys::PROXY_HOST,
    kind: FieldKind::OptionalText,
    default: "",
    description: "Proxy host name",
    secret: false,
};

/// `PROXY_PORT` entry.
pub const PROXY_PORT_FIELD: FieldSpec = FieldSpec {
    key: keys::PROXY_PORT,
    kind: FieldKind::OptionalPort,
    default: "0",
    description: "Proxy port",
    secret: false,
};

/// `PROXY_USERNAME` entry.
pub const PROXY_USERNAME_FIELD: FieldSpec = FieldSpec {
    key: keys::PROXY_USERNAME,
    kind: FieldKind::OptionalText,
    default: "",
    description: "Proxy user name",
    secret: false,
};

/// `PROXY_PASSWORD` entry.
pub const PROXY_PASSWORD_FIELD: FieldSpec = FieldSpec {
    key: keys::PROXY_PASSWORD,
    kind: FieldKind::OptionalText,
    default: "",
    description: "Proxy password",
    secret: true,
};

/// The configuration shape, in declaration order.
///
/// Per-field errors are reported in this order.
pub static CONFIG_FIELDS: [FieldSpec; 7] = [
    NODE_ENV_FIELD,
    PORT_FIELD,
    USE_PROXY_FIELD,
    PROXY_HOST_FIELD,
    PROXY_PORT_FIELD,
    PROXY_USERNAME_FIELD,
    PROXY_PASSWORD_FIELD,
];

/// Look up the table entry for a recognised key.
pub fn field_spec(key: &str) -> Option<&'static FieldSpec> {
    CONFIG_FIELDS.iter().find(|spec| spec.key == key)
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development.
    #[default]
    Development,
    /// Live deployment.
    Production,
    /// Pre-production deployment.
    Staging,
    /// Test runs.
    Test,
}

impl Environment {
    /// Accepted literals, in canonical order.
    pub const NAMES: &'static [&'static str] = &["development", "production", "staging", "test"];

    /// Returns all environments in canonical order.
    pub fn all() -> &'static [Environment] {
        &[
            Self::Development,
            Self::Production,
            Self::Staging,
            Self::Test,
        ]
    }

    /// Returns the literal this environment is configured with.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = FieldError;

    /// Case-sensitive parse of the literals produced by [`Environment::as_str`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "test" => Ok(Self::Test),
            other => Err(FieldError::enumeration(
                FieldPath::key(keys::NODE_ENV),
                Self::NAMES,
                other,
            )),
        }
    }
}

/// Fully-resolved process configuration.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Config {
    /// Deployment environment.
    pub node_env: Environment,
    /// Listen port.
    pub port: u16,
    /// Whether outbound traffic goes through a proxy.
    pub use_proxy: bool,
    /// Proxy host; `None` when unset or empty.
    pub proxy_host: Option<String>,
    /// Proxy port; `None` when unset, empty, or zero.
    pub proxy_port: Option<u16>,
    /// Proxy user name; `None` when unset or empty.
    pub proxy_username: Option<String>,
    /// Proxy password; `None` when unset or empty. Redacted on output.
    #[serde(serialize_with = "redact")]
    pub proxy_password: Option<String>,
}

fn redact<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(password) => serializer.serialize_some(PROXY_PASSWORD_FIELD.display_value(password)),
        None => serializer.serialize_none(),
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("node_env", &self.node_env)
            .field("port", &self.port)
            .field("use_proxy", &self.use_proxy)
            .field("proxy_host", &self.proxy_host)
            .field("proxy_port", &self.proxy_port)
            .field("proxy_username", &self.proxy_username)
            .field(
                "proxy_password",
                &self
                    .proxy_password
                    .as_deref()
                    .map(|password| PROXY_PASSWORD_FIELD.display_value(password)),
            )
            .finish()
    }
}

impl Default for Config {
    /// The configuration produced by an empty environment.
    fn default() -> Self {
        Self {
            node_env: Environment::default(),
            port: 5000,
            use_proxy: false,
            proxy_host: None,
            proxy_port: None,
            proxy_username: None,
            proxy_password: None,
        }
    }
}

impl Config {
    /// True when running in production.
    pub fn is_production(&self) -> bool {
        self.node_env == Environment::Production
    }

    /// Proxy settings, when proxying is enabled and fully configured.
    pub fn proxy(&self) -> Option<ProxySettings> {
        if !self.use_proxy {
            return None;
        }
        let host = self.proxy_host.clone()?;
        let port = self.proxy_port?;
        let credentials = self.proxy_username.clone().map(|username| ProxyCredentials {
            username,
            password: self.proxy_password.clone(),
        });
        Some(ProxySettings {
            host,
            port,
            credentials,
        })
    }

    /// Render back to the string encoding the validator accepts.
    ///
    /// Absent optional fields are omitted. Validating the output yields a
    /// `Config` equal to `self`.
    pub fn to_env(&self) -> BTreeMap<&'static str, String> {
        let mut env = BTreeMap::new();
        env.insert(keys::NODE_ENV, self.node_env.as_str().to_string());
        env.insert(keys::PORT, self.port.to_string());
        env.insert(keys::USE_PROXY, self.use_proxy.to_string());
        if let Some(host) = &self.proxy_host {
            env.insert(keys::PROXY_HOST, host.clone());
        }
        if let Some(port) = self.proxy_port {
            env.insert(keys::PROXY_PORT, port.to_string());
        }
        if let Some(username) = &self.proxy_username {
            env.insert(keys::PROXY_USERNAME, username.clone());
        }
        if let Some(password) = &self.proxy_password {
            env.insert(keys::PROXY_PASSWORD, password.clone());
        }
        env
    }
}

/// A fully-specified outbound proxy.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxySettings {
    /// Proxy host name.
    pub host: String,
    /// Proxy port.
    pub port: u16,
    /// Credentials, present when a user name is configured.
    pub credentials: Option<ProxyCredentials>,
}

/// Proxy authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyCredentials {
    /// User name.
    pub username: String,
    /// Password, if any.
    pub password: Option<String>,
}

impl ProxySettings {
    /// `http://[user[:password]@]host:port`.
    ///
    /// Credentials are inserted as configured, without percent-encoding.
    pub fn url(&self) -> String {
        match &self.credentials {
            Some(ProxyCredentials {
                username,
                password: Some(password),
            }) => format!("http://{username}:{password}@{}:{}", self.host, self.port),
            Some(ProxyCredentials {
                username,
                password: None,
            }) => format!("http://{username}@{}:{}", self.host, self.port),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }
}

impl fmt::Debug for ProxySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxySettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field(
                "username",
                &self.credentials.as_ref().map(|c| c.username.as_str()),
            )
            .finish_non_exhaustive()
    }
}

/// Validates process configuration against [`CONFIG_FIELDS`].
///
/// Stateless: every call is a pure function of its input, so one
/// validator may be shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigValidator;

/// A raw value as read from the source; `None` when it was not valid UTF-8.
type RawValues = HashMap<&'static str, Option<String>>;

impl ConfigValidator {
    /// Create a validator.
    pub const fn new() -> Self {
        Self
    }

    /// The field table this validator evaluates.
    pub fn fields(&self) -> &'static [FieldSpec] {
        &CONFIG_FIELDS
    }

    /// Validate a key/value source such as a map of environment variables.
    ///
    /// Unrecognised keys are ignored. When a key occurs more than once the
    /// last occurrence wins.
    ///
    /// # Errors
    ///
    /// Returns every per-field coercion and enumeration error in table
    /// order, or, when all fields resolved, every cross-field error.
    pub fn validate<I, K, V>(&self, source: I) -> ValidationResult<Config>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut raw = RawValues::new();
        for (key, value) in source {
            if let Some(spec) = field_spec(key.as_ref()) {
                raw.insert(spec.key, Some(value.as_ref().to_string()));
            }
        }
        self.resolve(&raw)
    }

    /// Validate the current process environment.
    ///
    /// A recognised key holding non-UTF-8 bytes is a coercion error at that
    /// key.
    pub fn validate_env(&self) -> ValidationResult<Config> {
        let mut raw = RawValues::new();
        for (key, value) in std::env::vars_os() {
            let Some(spec) = key.to_str().and_then(field_spec) else {
                continue;
            };
            raw.insert(spec.key, value.into_string().ok());
        }
        self.resolve(&raw)
    }

    fn resolve(&self, raw: &RawValues) -> ValidationResult<Config> {
        let mut pass = Pass {
            raw,
            errors: Vec::new(),
        };
        // Struct fields evaluate in source order, which is table order.
        let config = Config {
            node_env: pass.field(&NODE_ENV_FIELD, FieldSpec::environment),
            port: pass.field(&PORT_FIELD, FieldSpec::port),
            use_proxy: pass.field(&USE_PROXY_FIELD, FieldSpec::flag),
            proxy_host: pass.field(&PROXY_HOST_FIELD, FieldSpec::text),
            proxy_port: pass.field(&PROXY_PORT_FIELD, FieldSpec::optional_port),
            proxy_username: pass.field(&PROXY_USERNAME_FIELD, FieldSpec::text),
            proxy_password: pass.field(&PROXY_PASSWORD_FIELD, FieldSpec::text),
        };

        if let Some(errors) = ValidationErrors::from_vec(pass.errors) {
            tracing::debug!(count = errors.len(), "configuration rejected");
            return Err(errors);
        }

        let result = finish(proxy_requirements(&config), || config);
        match &result {
            Ok(config) => tracing::debug!(
                node_env = %config.node_env,
                port = config.port,
                use_proxy = config.use_proxy,
                "configuration validated"
            ),
            Err(errors) => tracing::debug!(count = errors.len(), "configuration rejected"),
        }
        result
    }
}

/// One resolution pass over the raw values, collecting per-field errors.
struct Pass<'a> {
    raw: &'a RawValues,
    errors: Vec<FieldError>,
}

impl Pass<'_> {
    /// Resolve one field. A failed field records its error and yields a
    /// placeholder that is discarded with the rest of the pass.
    fn field<T: Default>(
        &mut self,
        spec: &FieldSpec,
        resolver: impl FnOnce(&FieldSpec, Option<&str>) -> Result<T, FieldError>,
    ) -> T {
        let resolved = match self.raw.get(spec.key) {
            Some(Some(value)) => resolver(spec, Some(value.as_str())),
            Some(None) => Err(FieldError::coercion(
                spec.path(),
                "Expected string, received non-UTF-8 bytes",
            )),
            None => resolver(spec, None),
        };
        match resolved {
            Ok(value) => {
                tracing::trace!(
                    key = spec.key,
                    kind = spec.kind.type_name(),
                    defaulted = !self.raw.contains_key(spec.key),
                    "resolved configuration field"
                );
                value
            }
            Err(error) => {
                self.errors.push(error);
                T::default()
            }
        }
    }
}

/// Cross-field rule: an enabled proxy needs a host and a port.
fn proxy_requirements(config: &Config) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if config.use_proxy {
        if config.proxy_host.is_none() {
            errors.push(FieldError::cross_field(
                FieldPath::key(keys::PROXY_HOST),
                "PROXY_HOST is required when USE_PROXY is true",
            ));
        }
        if config.proxy_port.is_none() {
            errors.push(FieldError::cross_field(
                FieldPath::key(keys::PROXY_PORT),
                "PROXY_PORT is required when USE_PROXY is true",
            ));
        }
    }
    errors
}
