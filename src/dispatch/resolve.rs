//! Token resolution: map one argument to a command in a group.
//!
//! Resolution strategy (in priority order):
//!
//! 1. **Exact match**: the argument equals a command token. Wins immediately,
//!    even over abbreviation candidates seen earlier in the group.
//! 2. **Abbreviation**: the argument is a strict prefix of exactly one token.
//! 3. **Ambiguity**: the argument is a prefix of two or more tokens and equals
//!    none of them.
//!
//! Candidates are always visited in declaration order, which fixes the order
//! of ambiguity diagnostics.
use nucleo_matcher::{
    Matcher, Utf32Str,
    pattern::{CaseMatching, Normalization, Pattern},
};

use super::errors::DispatchError;
use super::group::{Command, CommandGroup};

/// Result of matching one token against a group.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Exact match or the only abbreviation candidate.
    Found(&'static Command),
    NotFound,
    /// Two or more abbreviation candidates, in declaration order.
    Ambiguous(Vec<&'static Command>),
}

/// Match `arg` against the commands of `group`.
#[must_use]
pub fn resolve_token(arg: &str, group: &CommandGroup) -> Resolution {
    let mut candidates: Vec<&'static Command> = Vec::new();

    for &cmd in group.commands {
        match cmd.token.strip_prefix(arg) {
            Some("") => return Resolution::Found(cmd),
            Some(_) => candidates.push(cmd),
            None => {}
        }
    }

    match candidates.len() {
        0 => Resolution::NotFound,
        1 => Resolution::Found(candidates[0]),
        _ => Resolution::Ambiguous(candidates),
    }
}

/// Resolve `arg` or fail with a diagnostic-ready error.
///
/// `path` is the command path reached so far, used to prefix diagnostics.
///
/// # Errors
///
/// - `DispatchError::UnknownToken`: nothing matches
/// - `DispatchError::AmbiguousToken`: several abbreviations tie
pub fn resolve_command(
    arg: &str,
    group: &'static CommandGroup,
    path: &str,
) -> Result<&'static Command, DispatchError> {
    match resolve_token(arg, group) {
        Resolution::Found(cmd) => {
            tracing::debug!(path, token = arg, command = cmd.token, "resolved token");
            Ok(cmd)
        }
        Resolution::NotFound => Err(DispatchError::UnknownToken {
            token: arg.to_owned(),
            path: path.to_owned(),
            group,
        }),
        Resolution::Ambiguous(candidates) => Err(DispatchError::AmbiguousToken {
            token: arg.to_owned(),
            path: path.to_owned(),
            candidates: candidates.iter().map(|c| c.token).collect(),
        }),
    }
}

/// Closest command token to a misspelled `arg`, for "did you mean" hints.
///
/// Ties keep the earlier command.
#[must_use]
pub fn suggest(arg: &str, group: &CommandGroup) -> Option<&'static Command> {
    if arg.is_empty() {
        return None;
    }

    let pattern = Pattern::parse(arg, CaseMatching::Ignore, Normalization::Smart);
    let mut matcher = Matcher::new(nucleo_matcher::Config::DEFAULT);
    let mut buf = Vec::new();

    let mut best: Option<(&'static Command, u32)> = None;
    for &cmd in group.commands {
        let haystack = Utf32Str::new(cmd.token, &mut buf);
        if let Some(score) = pattern.score(haystack, &mut matcher)
            && best.is_none_or(|(_, top)| score > top)
        {
            best = Some((cmd, score));
        }
    }
    best.map(|(cmd, _)| cmd)
}
