//! # Startup Configuration Gate
//!
//! Validates the process environment before any other work. On failure
//! every error is written to stderr as `[PATH]: message` and the process
//! exits with [`CONFIG_EXIT_CODE`].
//!
//! Rendering is kept apart from the exit so it can be tested on its own.

use std::io::Write;

use quizgate_core::ValidationErrors;
use quizgate_schema::{Config, ConfigValidator};

/// Exit status for an invalid configuration.
pub const CONFIG_EXIT_CODE: i32 = 1;

/// First line of the configuration failure report.
pub const CONFIG_FAILURE_HEADER: &str =
    "Invalid environment variables. Please check your .env file:";

/// Render each error as `[PATH]: message`, one per line.
pub fn render_errors(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|error| format!("{}: {}\n", error.path, error.message))
        .collect()
}

/// The full report written to stderr for an invalid configuration.
pub fn config_failure_report(errors: &ValidationErrors) -> String {
    format!("{CONFIG_FAILURE_HEADER}\n{}", render_errors(errors))
}

/// Validate the environment, writing the failure report to `err` on failure.
///
/// # Errors
///
/// Returns the validation errors after the report has been written.
pub fn check_config(
    validator: &ConfigValidator,
    err: &mut impl Write,
) -> Result<Config, ValidationErrors> {
    validator.validate_env().map_err(|errors| {
        tracing::error!(count = errors.len(), "invalid environment configuration");
        // A closed stderr must not mask the original failure.
        let _ = err.write_all(config_failure_report(&errors).as_bytes());
        let _ = err.flush();
        errors
    })
}

/// Validate the environment or terminate the process.
///
/// Call once from `main`, before any other startup work.
pub fn load_config_or_exit(validator: &ConfigValidator) -> Config {
    match check_config(validator, &mut std::io::stderr().lock()) {
        Ok(config) => config,
        Err(_) => std::process::exit(CONFIG_EXIT_CODE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proxy_errors() -> ValidationErrors {
        ConfigValidator::new()
            .validate([("USE_PROXY", "true")])
            .unwrap_err()
    }

    #[test]
    fn test_render_errors_bracketed_paths() {
        let rendered = render_errors(&proxy_errors());
        assert_eq!(
            rendered,
            "[PROXY_HOST]: PROXY_HOST is required when USE_PROXY is true\n\
             [PROXY_PORT]: PROXY_PORT is required when USE_PROXY is true\n"
        );
    }

    #[test]
    fn test_report_starts_with_header() {
        let report = config_failure_report(&proxy_errors());
        let mut lines = report.lines();
        assert_eq!(lines.next(), Some(CONFIG_FAILURE_HEADER));
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_render_port_error() {
        let errors = ConfigValidator::new()
            .validate([("PORT", "not-a-number")])
            .unwrap_err();
        assert!(render_errors(&errors).starts_with("[PORT]: "));
    }
}
