//! # quizgate-cli — Host Process
//!
//! Composes the pure validators from `quizgate-schema` with process
//! lifecycle policy. Nothing below this crate prints or exits.
//!
//! ## Subcommands
//!
//! - `check-env` — validate the environment and print the resolved config
//! - `check-submission` — validate a submission payload from a file or stdin
//! - `fields` — list the recognised configuration keys
//!
//! ## Startup
//!
//! Every subcommand except `fields` first passes the environment through
//! [`startup::load_config_or_exit`]; an invalid configuration ends the
//! process with status 1 before any other work.
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from validation logic.
//! - Handler functions delegate to `quizgate-schema`; no validation rules here.

pub mod fields;
pub mod payload;
pub mod startup;
