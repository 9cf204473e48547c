//! # quizgate-core — Foundational Types for quizgate
//!
//! Defines the vocabulary every quizgate validator reports in: where a
//! problem is ([`FieldPath`]), what it is ([`FieldError`], [`ErrorKind`]),
//! and the result type validators return ([`ValidationResult`]).
//!
//! ## Key Design Principles
//!
//! 1. **Errors are data.** Validators return `ValidationResult<T>`; they
//!    never panic and never exit. The host decides what a failure means.
//!
//! 2. **Collect, don't short-circuit.** A failing pass carries every
//!    independently-checkable error, in check-declaration order.
//!
//! 3. **No partial success.** A result is wholly valid or wholly a
//!    non-empty [`ValidationErrors`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `quizgate-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod path;

pub use error::{
    finish, quote_options, ErrorKind, FieldError, QuizgateError, ValidationErrors,
    ValidationResult,
};
pub use path::{FieldPath, PathSegment};
