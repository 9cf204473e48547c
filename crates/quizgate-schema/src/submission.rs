//! # Submission Validation
//!
//! Validates an inbound answer submission of unknown shape against the
//! built-in `submission.schema.json` (JSON Schema, Draft 2020-12) and
//! returns a typed [`Submission`].
//!
//! ## Contract
//!
//! ```json
//! { "answers": [{ "id": "q1", "answer": 3 }], "gender": "Female" }
//! ```
//!
//! - `answers` is a possibly-empty array of `{ id: string, answer: number }`.
//! - `gender` is exactly one of `Male`, `Female`, `Other`.
//!
//! There is no defaulting and no coercion: `"answer": "3"` is rejected at
//! `[answers][0][answer]`. Unknown members are dropped from the typed
//! value rather than rejected.

use std::fmt;
use std::sync::OnceLock;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationError, Validator};
use quizgate_core::{FieldError, FieldPath, QuizgateError, ValidationErrors, ValidationResult};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Name of the built-in submission schema.
pub const SUBMISSION_SCHEMA_NAME: &str = "submission.schema.json";

/// Source of the built-in submission schema.
pub const SUBMISSION_SCHEMA: &str = include_str!("../schemas/submission.schema.json");

/// Respondent gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Any other answer.
    Other,
}

impl Gender {
    /// Accepted literals, in canonical order.
    pub const NAMES: &'static [&'static str] = &["Male", "Female", "Other"];

    /// Returns the literal for this gender.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Question identifier.
    pub id: String,
    /// The answer, kept exactly as parsed so the value re-serializes
    /// identically (`3` stays `3`, not `3.0`).
    pub answer: Number,
}

impl Answer {
    /// The answer as a float.
    pub fn value(&self) -> Option<f64> {
        self.answer.as_f64()
    }
}

/// A validated answer submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Answers in the order they were submitted.
    pub answers: Vec<Answer>,
    /// Respondent gender.
    pub gender: Gender,
}

impl Submission {
    /// The first answer recorded for question `id`.
    pub fn answer_for(&self, id: &str) -> Option<&Answer> {
        self.answers.iter().find(|answer| answer.id == id)
    }
}

/// Validates submission payloads against the compiled built-in schema.
///
/// `SubmissionValidator` is `Send + Sync`; compile it once and share it
/// (see [`SubmissionValidator::shared`]).
pub struct SubmissionValidator {
    validator: Validator,
}

impl fmt::Debug for SubmissionValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionValidator")
            .field("schema", &SUBMISSION_SCHEMA_NAME)
            .finish()
    }
}

static SHARED: OnceLock<Result<SubmissionValidator, String>> = OnceLock::new();

impl SubmissionValidator {
    /// Compile the built-in submission schema.
    ///
    /// # Errors
    ///
    /// Returns `QuizgateError::SchemaBuild` if the embedded schema is not
    /// valid JSON or cannot be compiled.
    pub fn new() -> Result<Self, QuizgateError> {
        let schema: Value =
            serde_json::from_str(SUBMISSION_SCHEMA).map_err(|e| QuizgateError::SchemaBuild {
                schema_name: SUBMISSION_SCHEMA_NAME.to_string(),
                reason: format!("invalid JSON: {e}"),
            })?;

        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        let validator = opts.build(&schema).map_err(|e| QuizgateError::SchemaBuild {
            schema_name: SUBMISSION_SCHEMA_NAME.to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!(schema = SUBMISSION_SCHEMA_NAME, "compiled submission schema");
        Ok(Self { validator })
    }

    /// The process-wide validator, compiled on first use.
    ///
    /// # Errors
    ///
    /// Returns `QuizgateError::SchemaBuild` if compilation failed; the
    /// failure is remembered and reported on every call.
    pub fn shared() -> Result<&'static Self, QuizgateError> {
        SHARED
            .get_or_init(|| Self::new().map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|reason| QuizgateError::SchemaBuild {
                schema_name: SUBMISSION_SCHEMA_NAME.to_string(),
                reason: reason.clone(),
            })
    }

    /// Validate an untyped payload.
    ///
    /// # Errors
    ///
    /// Returns one [`FieldError`] per schema violation, each located at the
    /// offending member (a missing member is reported at its own path).
    pub fn validate(&self, instance: &Value) -> ValidationResult<Submission> {
        let errors: Vec<FieldError> = self
            .validator
            .iter_errors(instance)
            .map(to_field_error)
            .collect();
        if let Some(errors) = ValidationErrors::from_vec(errors) {
            tracing::debug!(count = errors.len(), "submission rejected");
            return Err(errors);
        }

        let submission: Submission = serde_json::from_value(instance.clone()).map_err(|e| {
            ValidationErrors::single(FieldError::structure(FieldPath::root(), e.to_string()))
        })?;
        tracing::debug!(
            answers = submission.answers.len(),
            gender = %submission.gender,
            "submission validated"
        );
        Ok(submission)
    }

    /// Parse `json` and validate it.
    ///
    /// # Errors
    ///
    /// A parse failure is a single structural error at the root path.
    pub fn validate_str(&self, json: &str) -> ValidationResult<Submission> {
        let instance: Value = serde_json::from_str(json).map_err(|e| {
            ValidationErrors::single(FieldError::structure(
                FieldPath::root(),
                format!("Invalid JSON: {e}"),
            ))
        })?;
        self.validate(&instance)
    }
}

/// Convert a schema violation into a located field error.
fn to_field_error(error: ValidationError<'_>) -> FieldError {
    let path = FieldPath::from_json_pointer(&error.instance_path.to_string());
    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let name = match property {
                Value::String(name) => name.clone(),
                other => other.to_string(),
            };
            FieldError::structure(path.child_key(name), "Required")
        }
        ValidationErrorKind::Enum { options } => {
            let allowed: Vec<&str> = match options {
                Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
                _ => Vec::new(),
            };
            let received = match error.instance.as_ref() {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            FieldError::enumeration(path, &allowed, &received)
        }
        _ => FieldError::structure(path, error.to_string()),
    }
}
