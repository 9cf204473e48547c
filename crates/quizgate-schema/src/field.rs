//! # Declarative Field Table
//!
//! The configuration shape is data: a static table of [`FieldSpec`]s, one
//! per recognised environment key. Each [`FieldKind`] has a typed resolver
//! on `FieldSpec` ([`FieldSpec::environment`], [`FieldSpec::port`],
//! [`FieldSpec::flag`], [`FieldSpec::text`], [`FieldSpec::optional_port`]).
//! Resolution of a single field runs, in order:
//!
//! 1. **Defaulting**: an absent key takes its declared default.
//! 2. **Coercion**: numeric kinds parse their string form; the flag kind
//!    accepts only the literals `"true"` and `"false"`.
//! 3. **Enumeration**: the environment kind must match a literal exactly
//!    (case-sensitive).
//! 4. **Empty-to-absent**: optional kinds map `""` and `0` to `None`.
//!
//! Step 4 collapses "configured as empty" and "not configured" into the
//! same state. `PROXY_PORT=0` is therefore indistinguishable from an
//! unset proxy port; the collapse is logged at warn level when the zero
//! was supplied explicitly.

use quizgate_core::{FieldError, FieldPath};

use crate::config::Environment;

/// Allowed values of the flag kind, in the order they are reported.
pub const FLAG_VALUES: &[&str] = &["true", "false"];

/// The declared type of a configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// One of the [`Environment`] literals.
    Environment,
    /// A TCP port, coerced from its string form.
    Port,
    /// A boolean encoded as the string `"true"` or `"false"`.
    Flag,
    /// A string where empty means absent.
    OptionalText,
    /// A port where zero means absent.
    OptionalPort,
}

impl FieldKind {
    /// Short type name used in log output and diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Environment => "enum",
            Self::Port => "port",
            Self::Flag => "flag",
            Self::OptionalText => "optional text",
            Self::OptionalPort => "optional port",
        }
    }

    /// The closed literal set of enumerated kinds; empty otherwise.
    pub fn allowed(&self) -> &'static [&'static str] {
        match self {
            Self::Environment => Environment::NAMES,
            Self::Flag => FLAG_VALUES,
            Self::Port | Self::OptionalText | Self::OptionalPort => &[],
        }
    }
}

/// One entry of the declarative configuration table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Environment key, e.g. `"PORT"`.
    pub key: &'static str,
    /// Declared type.
    pub kind: FieldKind,
    /// Raw default substituted when the key is absent.
    pub default: &'static str,
    /// One-line description for diagnostics.
    pub description: &'static str,
    /// The value is replaced by [`REDACTED`] wherever it is rendered.
    pub secret: bool,
}

/// Placeholder rendered in place of secret values.
pub const REDACTED: &str = "********";

impl FieldSpec {
    /// Path of this field in error reports.
    pub fn path(&self) -> FieldPath {
        FieldPath::key(self.key)
    }

    /// A value of this field as it may be shown to an operator.
    pub fn display_value<'a>(&self, value: &'a str) -> &'a str {
        if self.secret {
            REDACTED
        } else {
            value
        }
    }

    fn input<'a>(&self, raw: Option<&'a str>) -> &'a str {
        raw.unwrap_or(self.default)
    }

    /// Resolve an [`FieldKind::Environment`] field.
    ///
    /// # Errors
    ///
    /// An enumeration error at this field's path naming every environment.
    pub fn environment(&self, raw: Option<&str>) -> Result<Environment, FieldError> {
        let input = self.input(raw);
        input
            .parse()
            .map_err(|_| FieldError::enumeration(self.path(), Environment::NAMES, input))
    }

    /// Resolve a [`FieldKind::Port`] field.
    ///
    /// # Errors
    ///
    /// A coercion error at this field's path.
    pub fn port(&self, raw: Option<&str>) -> Result<u16, FieldError> {
        parse_port(self.input(raw)).map_err(|message| FieldError::coercion(self.path(), message))
    }

    /// Resolve a [`FieldKind::Flag`] field.
    ///
    /// # Errors
    ///
    /// An enumeration error at this field's path for anything but the two
    /// literals.
    pub fn flag(&self, raw: Option<&str>) -> Result<bool, FieldError> {
        match self.input(raw) {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(FieldError::enumeration(self.path(), FLAG_VALUES, other)),
        }
    }

    /// Resolve a [`FieldKind::OptionalText`] field. Never fails.
    pub fn text(&self, raw: Option<&str>) -> Result<Option<String>, FieldError> {
        let input = self.input(raw);
        Ok((!input.is_empty()).then(|| input.to_string()))
    }

    /// Resolve a [`FieldKind::OptionalPort`] field.
    ///
    /// # Errors
    ///
    /// A coercion error at this field's path.
    pub fn optional_port(&self, raw: Option<&str>) -> Result<Option<u16>, FieldError> {
        let input = self.input(raw);
        let port = parse_port(input).map_err(|message| FieldError::coercion(self.path(), message))?;
        if port == 0 && !input.trim().is_empty() {
            tracing::warn!(key = self.key, "explicit zero port treated as not configured");
        }
        Ok((port != 0).then_some(port))
    }
}

/// Coerce a string to a port number.
///
/// Surrounding whitespace is ignored and an empty string is zero. Any
/// finite decimal literal with no fractional part is accepted (`"8080"`,
/// `"+8080"`, `"8.08e3"`, `"1e3"`). Radix-prefixed forms such as `"0x1F"`
/// are rejected. The result must fit a `u16`.
pub fn parse_port(input: &str) -> Result<u16, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    let number: f64 = match trimmed.parse() {
        Ok(n) if f64::is_finite(n) => n,
        _ => return Err(format!("Expected number, received '{input}'")),
    };
    if number.fract() != 0.0 {
        return Err(format!("Expected integer, received float '{input}'"));
    }
    if number < 0.0 {
        return Err("Number must be greater than or equal to 0".to_string());
    }
    if number > f64::from(u16::MAX) {
        return Err(format!(
            "Number must be less than or equal to {}",
            u16::MAX
        ));
    }
    Ok(number as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizgate_core::ErrorKind;

    const MODE: FieldSpec = FieldSpec {
        key: "MODE",
        kind: FieldKind::Environment,
        default: "test",
        description: "test mode",
        secret: false,
    };

    const OPT_PORT: FieldSpec = FieldSpec {
        key: "OPT_PORT",
        kind: FieldKind::OptionalPort,
        default: "0",
        description: "test port",
        secret: false,
    };

    #[test]
    fn test_parse_port_accepts_decimal() {
        assert_eq!(parse_port("8080"), Ok(8080));
        assert_eq!(parse_port(" 8080 "), Ok(8080));
        assert_eq!(parse_port("+443"), Ok(443));
        assert_eq!(parse_port("8.08e3"), Ok(8080));
        assert_eq!(parse_port("1e3"), Ok(1000));
    }

    #[test]
    fn test_parse_port_rejects_radix_prefix() {
        assert!(parse_port("0x1F").unwrap_err().contains("Expected number"));
        assert!(parse_port("0o17").is_err());
        assert!(parse_port("0b101").is_err());
    }

    #[test]
    fn test_parse_port_empty_is_zero() {
        assert_eq!(parse_port(""), Ok(0));
        assert_eq!(parse_port("   "), Ok(0));
    }

    #[test]
    fn test_parse_port_rejects_garbage() {
        assert!(parse_port("not-a-number").unwrap_err().contains("Expected number"));
        assert!(parse_port("NaN").is_err());
        assert!(parse_port("inf").is_err());
    }

    #[test]
    fn test_parse_port_rejects_fraction_and_range() {
        assert!(parse_port("80.5").unwrap_err().contains("integer"));
        assert!(parse_port("-1").unwrap_err().contains("greater than"));
        assert!(parse_port("65536").unwrap_err().contains("65535"));
        assert_eq!(parse_port("65535"), Ok(65535));
    }

    #[test]
    fn test_environment_default_applied() {
        assert_eq!(MODE.environment(None), Ok(Environment::Test));
        assert_eq!(MODE.environment(Some("staging")), Ok(Environment::Staging));
    }

    #[test]
    fn test_environment_case_sensitive() {
        let err = MODE.environment(Some("Production")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Enumeration);
        assert_eq!(err.path.to_string(), "[MODE]");
        assert!(err.message.contains("'development' | 'production' | 'staging' | 'test'"));
        assert!(err.message.ends_with("received 'Production'"));
    }

    #[test]
    fn test_kind_allowed_literals() {
        assert_eq!(FieldKind::Environment.allowed(), Environment::NAMES);
        assert_eq!(FieldKind::Flag.allowed(), FLAG_VALUES);
        assert!(FieldKind::OptionalPort.allowed().is_empty());
    }

    #[test]
    fn test_optional_port_zero_collapses() {
        assert_eq!(OPT_PORT.optional_port(None), Ok(None));
        assert_eq!(OPT_PORT.optional_port(Some("0")), Ok(None));
        assert_eq!(OPT_PORT.optional_port(Some("")), Ok(None));
        assert_eq!(OPT_PORT.optional_port(Some("3128")), Ok(Some(3128)));
    }

    #[test]
    fn test_optional_port_coercion_error_has_path() {
        let err = OPT_PORT.optional_port(Some("abc")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Coercion);
        assert_eq!(err.path.to_string(), "[OPT_PORT]");
    }

    #[test]
    fn test_port_uses_default() {
        let port = FieldSpec {
            key: "P",
            kind: FieldKind::Port,
            default: "5000",
            description: "test port",
            secret: false,
        };
        assert_eq!(port.port(None), Ok(5000));
        assert_eq!(port.port(Some("")), Ok(0));
        assert_eq!(port.port(Some("x")).unwrap_err().kind, ErrorKind::Coercion);
    }

    #[test]
    fn test_flag_rejects_other_literals() {
        let flag = FieldSpec {
            key: "FLAG",
            kind: FieldKind::Flag,
            default: "false",
            description: "test flag",
            secret: false,
        };
        assert_eq!(flag.flag(None), Ok(false));
        assert_eq!(flag.flag(Some("true")), Ok(true));
        let err = flag.flag(Some("TRUE")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Enumeration);
        assert!(err.message.contains("'true' | 'false'"));
    }

    #[test]
    fn test_optional_text_empty_collapses() {
        let text = FieldSpec {
            key: "TEXT",
            kind: FieldKind::OptionalText,
            default: "",
            description: "test text",
            secret: false,
        };
        assert_eq!(text.text(None), Ok(None));
        assert_eq!(text.text(Some("")), Ok(None));
        assert_eq!(text.text(Some(" x ")), Ok(Some(" x ".to_string())));
    }

    #[test]
    fn test_secret_fields_display_redacted() {
        let secret = FieldSpec {
            key: "PASS",
            kind: FieldKind::OptionalText,
            default: "",
            description: "test secret",
            secret: true,
        };
        assert_eq!(secret.display_value("hunter2"), REDACTED);
        assert_eq!(OPT_PORT.display_value("3128"), "3128");
    }
}
