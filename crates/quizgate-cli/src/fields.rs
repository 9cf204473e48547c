//! # Fields Subcommand
//!
//! Lists the recognised configuration keys with their types and defaults.

use clap::Args;
use quizgate_schema::{ConfigValidator, FieldKind, FieldSpec};
use serde::Serialize;

/// Arguments for the fields subcommand.
#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// Print as JSON.
    #[arg(long)]
    pub json: bool,
}

/// One row of the field listing.
#[derive(Debug, Serialize)]
pub struct FieldRow {
    /// Environment key.
    pub key: &'static str,
    /// Declared type.
    #[serde(rename = "type")]
    pub type_name: &'static str,
    /// Allowed literals for enumerated fields.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<&'static str>,
    /// Raw default, or `None` when the field defaults to absent.
    pub default: Option<&'static str>,
    /// Description.
    pub description: &'static str,
    /// Values of this field are redacted in every rendering of a `Config`.
    pub secret: bool,
}

impl From<&FieldSpec> for FieldRow {
    fn from(spec: &FieldSpec) -> Self {
        let default = match spec.kind {
            FieldKind::OptionalText | FieldKind::OptionalPort => None,
            _ => Some(spec.default),
        };
        Self {
            key: spec.key,
            type_name: spec.kind.type_name(),
            allowed: spec.kind.allowed().to_vec(),
            default,
            description: spec.description,
            secret: spec.secret,
        }
    }
}

/// All rows, in declaration order.
pub fn rows() -> Vec<FieldRow> {
    ConfigValidator::new()
        .fields()
        .iter()
        .map(FieldRow::from)
        .collect()
}

/// Render rows as aligned text.
pub fn render_table(rows: &[FieldRow]) -> String {
    let width = rows.iter().map(|r| r.key.len()).max().unwrap_or(0);
    rows.iter()
        .map(|row| {
            let default = row.default.unwrap_or("-");
            let kind = if row.allowed.is_empty() {
                row.type_name.to_string()
            } else {
                row.allowed.join("|")
            };
            let secret = if row.secret { "  (secret)" } else { "" };
            format!(
                "{:width$}  {kind}  (default: {default})  {}{secret}\n",
                row.key, row.description
            )
        })
        .collect()
}

/// Run the subcommand.
///
/// # Errors
///
/// Returns an error if JSON output fails.
pub fn run(args: &FieldsArgs) -> anyhow::Result<()> {
    let rows = rows();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", render_table(&rows));
    }
    Ok(())
}
