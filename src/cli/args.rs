//! Global option parsing: the flags between the program name and the first
//! command token.
use clap::error::ContextKind;
use clap::{ArgAction, Parser};

use crate::cli::CommandContext;
use crate::dispatch::errors::DispatchError;
use crate::dispatch::format::negotiate_format;

/// Options accepted before the first command token.
///
/// Scanning stops at the first positional argument; everything from there on
/// lands in `rest` untouched, so `cmdtree tree show --help` leaves `--help` to
/// the `show` command. Long options may be abbreviated to any unambiguous
/// prefix (`--vers`, `--form=json`).
#[derive(Debug, Parser)]
#[command(
    name = "cmdtree",
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true,
    infer_long_args = true
)]
pub struct GlobalArgs {
    /// Show help for the whole program.
    #[arg(long)]
    pub help: bool,

    /// Print version information.
    #[arg(long)]
    pub version: bool,

    /// With --help, include every command's full usage.
    #[arg(long)]
    pub full: bool,

    /// Output format (text, json, csv). Every occurrence is applied in order.
    #[arg(long, value_name = "FORMAT", action = ArgAction::Append, allow_hyphen_values = true)]
    pub format: Vec<String>,

    /// Command tokens and their arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub rest: Vec<String>,
}

/// Which precedence-sensitive global flag, if any, short-circuits dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialGlobal {
    None,
    /// `--help`, optionally with `--full`.
    Help { full: bool },
    Version,
}

/// Parse global options and apply `--format` to the context.
///
/// Returns how many leading slots of `argv` (including the program name)
/// were consumed as global options. The parser keeps no state between calls.
///
/// # Errors
///
/// - `DispatchError::InvalidFormat`: `--format` named an unknown mode
/// - `DispatchError::UnknownGlobalOption`: an unrecognized option precedes
///   the first command token
pub fn parse_global_options(
    ctx: &mut CommandContext<'_>,
    argv: &[String],
) -> Result<usize, DispatchError> {
    if argv.is_empty() {
        return Ok(0);
    }

    let parsed = GlobalArgs::try_parse_from(argv).map_err(|err| {
        let reported = err.get(ContextKind::InvalidArg).map(ToString::to_string);
        let option = reported
            .as_deref()
            .and_then(|arg| offending_slot(argv, arg))
            .or_else(|| first_option(argv))
            .unwrap_or_default();
        DispatchError::UnknownGlobalOption { option }
    })?;

    // An unknown option stops clap's flag scanning and is captured as the
    // first trailing value. Options seen before it have already been applied
    // in a sequential scan, so formats are validated first, in order.
    for format in &parsed.format {
        negotiate_format(ctx, format)?;
    }

    let shift = argv.len() - parsed.rest.len();
    let after_separator = shift > 1 && argv[shift - 1] == "--";
    if let Some(first) = parsed.rest.first()
        && !after_separator
        && first.len() > 1
        && first.starts_with('-')
    {
        return Err(DispatchError::UnknownGlobalOption {
            option: first.clone(),
        });
    }

    tracing::debug!(shift, "global options consumed");
    Ok(shift)
}

/// Look for `--help`, `--full` and `--version` among the first `shift` slots.
///
/// Only the already-consumed global prefix is inspected; the same flags after
/// a command token belong to that command.
#[must_use]
pub fn special_globals(argv: &[String], shift: usize) -> SpecialGlobal {
    let prefix = &argv[..shift.min(argv.len())];
    let has = |flag: &str| prefix.iter().any(|a| a == flag);

    if has("--help") {
        SpecialGlobal::Help {
            full: has("--full"),
        }
    } else if has("--version") {
        SpecialGlobal::Version
    } else {
        SpecialGlobal::None
    }
}

/// The argument slot the user typed for clap's rendered `arg`.
///
/// clap reports the canonical name with a value placeholder
/// (`--format <FORMAT>`); the slot may be an abbreviation or carry an
/// inline value. The last matching slot is the one clap stopped at.
fn offending_slot(argv: &[String], arg: &str) -> Option<String> {
    let name = arg.split_whitespace().next()?;
    argv.iter()
        .skip(1)
        .rev()
        .find(|slot| {
            let typed = slot.split_once('=').map_or(slot.as_str(), |(typed, _)| typed);
            typed.len() > 2 && typed.starts_with("--") && name.starts_with(typed)
        })
        .cloned()
}

fn first_option(argv: &[String]) -> Option<String> {
    argv.iter().skip(1).find(|a| a.starts_with('-')).cloned()
}
