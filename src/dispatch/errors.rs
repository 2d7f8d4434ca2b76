//! Errors raised while turning process arguments into a command invocation.
use thiserror::Error;

use super::format::OutputMode;
use super::group::{Command, CommandGroup};

/// Every way dispatch can stop before (or while) running a command.
///
/// All of these are terminal: the driver prints one diagnostic and exits
/// with [`DispatchError::exit_code`].
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No command in the group matches the token, exactly or as a prefix.
    #[error("{path}: unknown token '{token}'")]
    UnknownToken {
        token: String,
        /// Command path reached so far, e.g. `cmdtree tree`.
        path: String,
        group: &'static CommandGroup,
    },

    /// The token is a prefix of two or more commands and equals none.
    #[error("{path}: ambiguous token '{token}'")]
    AmbiguousToken {
        token: String,
        path: String,
        /// Competing tokens in declaration order.
        candidates: Vec<&'static str>,
    },

    /// `--format` named no known output mode.
    #[error("error: invalid output format \"{format}\"")]
    InvalidFormat { format: String },

    /// A known output mode the resolved command cannot produce.
    #[error("error: {mode} output is unsupported for this command.")]
    UnsupportedFormat {
        mode: OutputMode,
        command: &'static Command,
    },

    /// An option before the first positional argument that is not a global option.
    #[error("Unknown global option: {option}")]
    UnknownGlobalOption { option: String },

    /// A group was selected but no command token followed it.
    #[error("{path}: missing command")]
    MissingSubcommand {
        path: String,
        group: &'static CommandGroup,
    },

    /// The leaf command itself failed.
    #[error(transparent)]
    Command(#[from] anyhow::Error),

    /// Writing help or diagnostics failed.
    #[error("error: {0}")]
    Io(#[from] std::io::Error),
}

impl DispatchError {
    /// Return the process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownGlobalOption { .. } => 129,
            Self::UnknownToken { .. }
            | Self::AmbiguousToken { .. }
            | Self::InvalidFormat { .. }
            | Self::UnsupportedFormat { .. }
            | Self::MissingSubcommand { .. }
            | Self::Command(_)
            | Self::Io(_) => 1,
        }
    }

    /// Machine-readable error code (snake_case).
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownToken { .. } => "unknown_token",
            Self::AmbiguousToken { .. } => "ambiguous_token",
            Self::InvalidFormat { .. } => "invalid_format",
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::UnknownGlobalOption { .. } => "unknown_global_option",
            Self::MissingSubcommand { .. } => "missing_subcommand",
            Self::Command(_) => "command_failed",
            Self::Io(_) => "io_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let unknown_opt = DispatchError::UnknownGlobalOption {
            option: "--bogus".to_owned(),
        };
        assert_eq!(unknown_opt.exit_code(), 129);
        assert_eq!(unknown_opt.to_string(), "Unknown global option: --bogus");

        let invalid = DispatchError::InvalidFormat {
            format: "xml".to_owned(),
        };
        assert_eq!(invalid.exit_code(), 1);
        assert_eq!(invalid.to_string(), "error: invalid output format \"xml\"");

        let failed = DispatchError::from(anyhow::anyhow!("disk on fire"));
        assert_eq!(failed.exit_code(), 1);
        assert_eq!(failed.code(), "command_failed");
        assert_eq!(failed.to_string(), "disk on fire");
    }
}
