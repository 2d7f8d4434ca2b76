//! Static command tables: leaf commands, command groups and the program root.
use super::format::FormatFlags;
use crate::cli::CommandContext;

/// Entry point of a leaf command.
///
/// Receives the command itself, the invocation context and the remaining
/// arguments with `args[0]` already rewritten to the command's token.
/// The returned status becomes the process exit code.
pub type Handler = fn(&Command, &mut CommandContext<'_>, &[String]) -> anyhow::Result<i32>;

/// What a command does when selected.
#[derive(Debug, Clone, Copy)]
pub enum CommandKind {
    /// Run the handler.
    Leaf(Handler),
    /// Descend into a nested group.
    Group(&'static CommandGroup),
}

/// One entry of a command group.
#[derive(Debug)]
pub struct Command {
    /// Name matched against user input (exactly or by unambiguous prefix).
    pub token: &'static str,
    /// Usage lines: synopsis, one-line description, then option details.
    /// Group commands leave this empty and borrow the group's usage.
    pub usage: &'static [&'static str],
    /// Output modes the command can produce.
    pub formats: FormatFlags,
    pub kind: CommandKind,
}

impl Command {
    #[must_use]
    pub const fn leaf(
        token: &'static str,
        usage: &'static [&'static str],
        formats: FormatFlags,
        handler: Handler,
    ) -> Self {
        Self {
            token,
            usage,
            formats,
            kind: CommandKind::Leaf(handler),
        }
    }

    #[must_use]
    pub const fn group(token: &'static str, group: &'static CommandGroup) -> Self {
        Self {
            token,
            usage: &[],
            formats: FormatFlags::TEXT,
            kind: CommandKind::Group(group),
        }
    }

    /// Usage lines, taken from the nested group for branch commands.
    #[must_use]
    pub fn usage(&self) -> &'static [&'static str] {
        match self.kind {
            CommandKind::Group(group) => group.usage,
            CommandKind::Leaf(_) => self.usage,
        }
    }

    /// First usage line.
    #[must_use]
    pub fn synopsis(&self) -> &'static str {
        self.usage().first().copied().unwrap_or(self.token)
    }

    /// One-line description (second usage line), if any.
    #[must_use]
    pub fn summary(&self) -> Option<&'static str> {
        self.usage().get(1).copied().filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn nested(&self) -> Option<&'static CommandGroup> {
        match self.kind {
            CommandKind::Group(group) => Some(group),
            CommandKind::Leaf(_) => None,
        }
    }
}

/// An ordered set of commands sharing a usage banner.
///
/// Order is significant: help lists commands in this order and ambiguity
/// diagnostics report candidates in this order.
#[derive(Debug)]
pub struct CommandGroup {
    /// Usage lines: synopsis, optional description.
    pub usage: &'static [&'static str],
    /// Trailing hint printed after the command listing.
    pub info: Option<&'static str>,
    pub commands: &'static [&'static Command],
}

/// Alternate binary name that jumps straight to one root command.
#[derive(Debug, Clone, Copy)]
pub struct BinaryAlias {
    /// Basename of `argv[0]` that triggers the alias.
    pub binary: &'static str,
    /// Root-level token substituted for `argv[0]`.
    pub token: &'static str,
}

/// Everything the dispatcher needs to know about one program.
#[derive(Debug)]
pub struct Program {
    pub name: &'static str,
    pub root: &'static CommandGroup,
    /// Invoked for a bare global `--help`.
    pub help: &'static Command,
    /// Invoked for a global `--version`.
    pub version: &'static Command,
    pub alias: Option<BinaryAlias>,
}
