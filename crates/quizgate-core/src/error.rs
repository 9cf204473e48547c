//! # Error Types — Structured Validation Failures
//!
//! Validators never raise: they return a [`ValidationResult`], which on
//! failure carries every independently-checkable [`FieldError`] found in
//! one pass. Only the host process turns a failure into a hard exit.
//!
//! ## Taxonomy
//!
//! - [`ErrorKind::Coercion`] — a raw value could not be parsed into its
//!   declared type.
//! - [`ErrorKind::Enumeration`] — a value is outside its closed literal set.
//! - [`ErrorKind::CrossField`] — a dependent field is missing given the
//!   value of another field.
//! - [`ErrorKind::Structure`] — a payload has a missing member or a member
//!   of the wrong type.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path::FieldPath;

/// Result of running a validator: the typed value, or every field error.
pub type ValidationResult<T> = Result<T, ValidationErrors>;

/// Classification of a [`FieldError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Value cannot be parsed into the declared type.
    Coercion,
    /// Value is not in the allowed literal set.
    Enumeration,
    /// A dependent field is missing given another field's value.
    CrossField,
    /// Missing member or wrong member type in a structured payload.
    Structure,
}

impl ErrorKind {
    /// Returns the snake_case identifier for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Coercion => "coercion",
            Self::Enumeration => "enumeration",
            Self::CrossField => "cross_field",
            Self::Structure => "structure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structured failure naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Location of the offending field.
    pub path: FieldPath,
    /// Which part of the taxonomy this failure belongs to.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
}

impl FieldError {
    /// Create a field error.
    pub fn new(path: FieldPath, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }

    /// A coercion failure at `path`.
    pub fn coercion(path: FieldPath, message: impl Into<String>) -> Self {
        Self::new(path, ErrorKind::Coercion, message)
    }

    /// An enumeration-membership failure at `path`.
    ///
    /// The message names the allowed set and the received value.
    pub fn enumeration(path: FieldPath, allowed: &[&str], received: &str) -> Self {
        Self::new(
            path,
            ErrorKind::Enumeration,
            format!(
                "Invalid enum value. Expected {}, received '{received}'",
                quote_options(allowed)
            ),
        )
    }

    /// A cross-field consistency failure at `path`.
    pub fn cross_field(path: FieldPath, message: impl Into<String>) -> Self {
        Self::new(path, ErrorKind::CrossField, message)
    }

    /// A structural-shape failure at `path`.
    pub fn structure(path: FieldPath, message: impl Into<String>) -> Self {
        Self::new(path, ErrorKind::Structure, message)
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Render an allowed set as `'a' | 'b' | 'c'`.
pub fn quote_options(allowed: &[&str]) -> String {
    allowed
        .iter()
        .map(|option| format!("'{option}'"))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Ordered, non-empty collection of field errors from one validation pass.
///
/// Order is the declaration order of the checks that produced the errors.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{}", render_lines(.errors))]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

fn render_lines(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl ValidationErrors {
    /// Build from collected errors. Returns `None` when nothing was collected.
    pub fn from_vec(errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    /// A failure consisting of exactly one error.
    pub fn single(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// Returns the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if there are no errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns a slice of all errors.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Iterate over the errors in order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }

    /// Rendered paths of every error, in order.
    pub fn paths(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.path.to_string()).collect()
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<FieldError> {
        self.errors
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Finish a validation pass: `Ok(value)` when nothing was collected.
pub fn finish<T>(errors: Vec<FieldError>, value: impl FnOnce() -> T) -> ValidationResult<T> {
    match ValidationErrors::from_vec(errors) {
        Some(errors) => Err(errors),
        None => Ok(value()),
    }
}

/// Top-level error type for quizgate hosts.
#[derive(Error, Debug)]
pub enum QuizgateError {
    /// A payload could not be read.
    #[error("payload load error for '{source_name}': {reason}")]
    PayloadLoad {
        /// File path, or `-` for stdin.
        source_name: String,
        /// Reason the payload could not be loaded.
        reason: String,
    },

    /// A built-in schema failed to compile.
    #[error("schema build error for '{schema_name}': {reason}")]
    SchemaBuild {
        /// Name of the built-in schema.
        schema_name: String,
        /// Reason the schema could not be compiled.
        reason: String,
    },
}
