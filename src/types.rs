//! Shared serializable output types for the built-in commands.
//!
//! These types are what gets written to stdout as JSON, CSV rows or text.
//! They are decoupled from the static `Command` / `CommandGroup` tables.
use serde::Serialize;

/// One node of the command tree.
#[derive(Debug, Clone, Serialize)]
pub struct CommandNodeOutput {
    /// Command token (e.g., "show").
    pub token: String,
    /// Full invocation path (e.g., "cmdtree tree show").
    pub path: String,
    /// "group" or "command".
    pub kind: &'static str,
    /// Output formats the command accepts.
    pub formats: Vec<&'static str>,
    /// One-line description, omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Nested commands (groups only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CommandNodeOutput>,
}

/// An output format and its capability bit.
#[derive(Debug, Clone, Serialize)]
pub struct FormatOutput {
    /// Name accepted by `--format`.
    pub name: &'static str,
    /// Mode index; the capability bit is `1 << index`.
    pub index: usize,
    /// Whether this is the default mode.
    pub default: bool,
}

/// How one token resolved against one group.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveStepOutput {
    /// The token as given.
    pub token: String,
    /// Path of the group the token was matched against.
    pub group: String,
    /// "exact", "abbreviation", "ambiguous", "unknown" or "argument".
    pub outcome: &'static str,
    /// Resolved command token, omitted when unresolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<&'static str>,
    /// Competing tokens for ambiguous matches.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<&'static str>,
}

/// One problem found in the command table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintFindingOutput {
    /// "error" or "note".
    pub severity: &'static str,
    /// Path of the group the finding applies to.
    pub path: String,
    pub message: String,
}

/// A structured error envelope for JSON error output.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (snake_case).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorOutput {
    /// Envelope for a failed command.
    #[must_use]
    pub fn command_failed(err: &anyhow::Error) -> Self {
        Self {
            ok: false,
            error: ErrorDetail {
                code: "command_failed".to_owned(),
                message: format!("{err:#}"),
            },
        }
    }
}
