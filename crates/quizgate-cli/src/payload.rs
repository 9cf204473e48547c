//! # Check-Submission Subcommand
//!
//! Reads a submission payload from a file or stdin and validates it.

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use quizgate_core::{QuizgateError, ValidationResult};
use quizgate_schema::{Submission, SubmissionValidator};

use crate::startup::render_errors;

/// Exit status for an invalid or unreadable submission.
pub const SUBMISSION_EXIT_CODE: u8 = 2;

/// Arguments for the check-submission subcommand.
#[derive(Args, Debug)]
pub struct CheckSubmissionArgs {
    /// JSON payload file, or `-` for stdin.
    pub input: PathBuf,

    /// Report errors as a JSON array instead of `[PATH]: message` lines.
    #[arg(long)]
    pub json: bool,
}

impl CheckSubmissionArgs {
    fn is_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }

    fn source_name(&self) -> String {
        self.input.display().to_string()
    }
}

/// Read the raw payload text.
///
/// # Errors
///
/// Returns `QuizgateError::PayloadLoad` if the file or stdin cannot be read.
pub fn read_payload(args: &CheckSubmissionArgs) -> Result<String, QuizgateError> {
    let load_error = |e: std::io::Error| QuizgateError::PayloadLoad {
        source_name: args.source_name(),
        reason: e.to_string(),
    };
    if args.is_stdin() {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map_err(load_error)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(&args.input).map_err(load_error)
    }
}

/// Validate a payload that has already been read.
///
/// # Errors
///
/// Returns `QuizgateError::SchemaBuild` if the built-in schema cannot be
/// compiled. Payload problems are reported in the inner result.
pub fn check(payload: &str) -> Result<ValidationResult<Submission>, QuizgateError> {
    Ok(SubmissionValidator::shared()?.validate_str(payload))
}

/// Run the subcommand, printing the typed submission or the errors.
///
/// Returns `true` when the payload is valid.
///
/// # Errors
///
/// Returns an error if the payload cannot be read or output fails.
pub fn run(args: &CheckSubmissionArgs) -> anyhow::Result<bool> {
    let payload = read_payload(args)?;
    match check(&payload)? {
        Ok(submission) => {
            tracing::info!(
                source = %args.source_name(),
                answers = submission.answers.len(),
                "submission valid"
            );
            println!("{}", serde_json::to_string_pretty(&submission)?);
            Ok(true)
        }
        Err(errors) => {
            tracing::warn!(
                source = %args.source_name(),
                count = errors.len(),
                "submission invalid"
            );
            if args.json {
                eprintln!("{}", serde_json::to_string_pretty(&errors)?);
            } else {
                eprint!("{}", render_errors(&errors));
            }
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_valid_payload() {
        let result = check(r#"{"answers":[{"id":"q1","answer":3}],"gender":"Male"}"#).unwrap();
        assert_eq!(result.unwrap().answers.len(), 1);
    }

    #[test]
    fn test_check_invalid_payload_renders_paths() {
        let errors = check(r#"{"answers":[{"id":"q1","answer":"3"}],"gender":"Male"}"#)
            .unwrap()
            .unwrap_err();
        assert!(render_errors(&errors).starts_with("[answers][0][answer]: "));
    }

    #[test]
    fn test_read_payload_missing_file() {
        let args = CheckSubmissionArgs {
            input: PathBuf::from("/nonexistent/quizgate/payload.json"),
            json: false,
        };
        let err = read_payload(&args).unwrap_err();
        assert!(matches!(err, QuizgateError::PayloadLoad { .. }));
        assert!(err.to_string().contains("/nonexistent/quizgate/payload.json"));
    }
}
