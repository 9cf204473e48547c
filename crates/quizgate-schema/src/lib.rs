//! # quizgate-schema — Configuration & Submission Validation
//!
//! Checks inputs before the rest of the application runs.
//!
//! ## Configuration (`config`)
//!
//! [`ConfigValidator`] evaluates the declarative field table
//! ([`CONFIG_FIELDS`], see [`field`]) against a string-keyed source such as
//! the process environment: defaults, coercion, enumeration checks,
//! empty-to-absent normalization, and finally the proxy cross-field rule.
//!
//! ## Submissions (`submission`)
//!
//! [`SubmissionValidator`] compiles the built-in
//! `submission.schema.json` once and validates untyped payloads against it,
//! reporting each violation at the offending member's path.
//!
//! ## Crate Policy
//!
//! - Depends only on `quizgate-core` internally.
//! - Validators are pure: no I/O beyond reading the environment in
//!   [`ConfigValidator::validate_env`], no exits, no panics.
//! - Printing errors and terminating the process belong to the host.

pub mod config;
pub mod field;
pub mod submission;

pub use config::{
    field_spec, keys, Config, ConfigValidator, Environment, ProxyCredentials, ProxySettings,
    CONFIG_FIELDS,
};
pub use field::{parse_port, FieldKind, FieldSpec, REDACTED};
pub use submission::{
    Answer, Gender, Submission, SubmissionValidator, SUBMISSION_SCHEMA, SUBMISSION_SCHEMA_NAME,
};
