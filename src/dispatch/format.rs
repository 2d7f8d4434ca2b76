//! Output format negotiation: `--format` names, capability masks, format listing.
use std::fmt;
use std::io::{self, Write};

use bitflags::bitflags;
use clap::ValueEnum;
use serde::Serialize;

use super::errors::DispatchError;
use super::group::{Command, CommandKind};
use crate::cli::CommandContext;

/// Output modes selectable with `--format`.
///
/// The discriminant is the mode index; a command advertises support for a
/// mode by setting bit `1 << index` in its [`FormatFlags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Human-readable text. Always available.
    #[default]
    Text = 0,
    /// Pretty-printed JSON.
    Json = 1,
    /// Comma-separated values with a header row.
    Csv = 2,
}

bitflags! {
    /// Set of output modes a command can produce.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FormatFlags: u32 {
        const TEXT = 1 << OutputMode::Text as u32;
        const JSON = 1 << OutputMode::Json as u32;
        const CSV = 1 << OutputMode::Csv as u32;
    }
}

impl OutputMode {
    /// Name accepted by `--format` and shown in diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The capability bit for this mode.
    #[must_use]
    pub fn flag(self) -> FormatFlags {
        FormatFlags::from_bits_retain(1 << self.index())
    }

    /// All modes in index order.
    #[must_use]
    pub fn all() -> &'static [OutputMode] {
        Self::value_variants()
    }

    /// Look up a mode by name, ignoring ASCII case.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve a user-supplied format name and store it in the context.
///
/// On failure the context falls back to [`OutputMode::Text`] so whatever is
/// rendered next (the diagnostic and usage) comes out as plain text.
///
/// # Errors
///
/// Returns `DispatchError::InvalidFormat` when `name` matches no mode.
pub fn negotiate_format(ctx: &mut CommandContext<'_>, name: &str) -> Result<OutputMode, DispatchError> {
    match OutputMode::parse(name) {
        Some(mode) => {
            tracing::debug!(format = %mode, "output format selected");
            ctx.output_mode = mode;
            Ok(mode)
        }
        None => {
            ctx.output_mode = OutputMode::Text;
            Err(DispatchError::InvalidFormat {
                format: name.to_owned(),
            })
        }
    }
}

/// Whether `cmd` can produce output in `mode`. Text is always provided.
#[must_use]
pub fn provides_format(cmd: &Command, mode: OutputMode) -> bool {
    mode == OutputMode::Text || cmd.formats.contains(mode.flag())
}

/// Verify a leaf command supports the requested mode. Groups always pass.
///
/// # Errors
///
/// Returns `DispatchError::UnsupportedFormat` naming the mode and command.
pub fn check_capability(cmd: &'static Command, mode: OutputMode) -> Result<(), DispatchError> {
    if matches!(cmd.kind, CommandKind::Group(_)) || provides_format(cmd, mode) {
        return Ok(());
    }
    Err(DispatchError::UnsupportedFormat { mode, command: cmd })
}

/// Write the list of `--format` values.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_format_list(w: &mut dyn Write) -> io::Result<()> {
    write!(w, "Options for --format are:")?;
    for (i, mode) in OutputMode::all().iter().enumerate() {
        let sep = if i == 0 { " " } else { ", " };
        write!(w, "{sep}\"{mode}\"")?;
    }
    writeln!(w)?;
    if OutputMode::all().len() > 1 {
        writeln!(
            w,
            "Extended output formats may not be available for all commands."
        )?;
    }
    Ok(())
}
