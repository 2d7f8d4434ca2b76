//! The dispatch loop: global options, special globals, recursive descent
//! through command groups, and the final leaf invocation.
use std::io::{self, Write};
use std::path::Path;

use super::errors::DispatchError;
use super::format::{check_capability, write_format_list};
use super::group::{Command, CommandGroup, CommandKind, Program};
use super::help::{write_command_usage, write_group_short, write_group_usage};
use super::resolve::{resolve_command, suggest};
use crate::cli::{CommandContext, SpecialGlobal, parse_global_options, special_globals, write_error};

/// Drives one invocation of a [`Program`].
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    program: &'static Program,
}

impl Dispatcher {
    #[must_use]
    pub fn new(program: &'static Program) -> Self {
        Self { program }
    }

    /// Dispatch `argv` and turn the outcome into a process exit status.
    ///
    /// Every error is rendered here, once, to the context's streams.
    pub fn run(&self, ctx: &mut CommandContext<'_>, argv: Vec<String>) -> i32 {
        match self.dispatch(ctx, argv) {
            Ok(status) => status,
            Err(err) => {
                tracing::debug!(code = err.code(), "dispatch failed");
                self.report(ctx, &err);
                err.exit_code()
            }
        }
    }

    /// Dispatch `argv` (program name at index 0) without rendering errors.
    ///
    /// Help and version displays return `Ok(0)`; a leaf's own status is
    /// returned verbatim.
    ///
    /// # Errors
    ///
    /// Returns the `DispatchError` that stopped dispatch; nothing has been
    /// printed for it yet.
    pub fn dispatch(&self, ctx: &mut CommandContext<'_>, mut argv: Vec<String>) -> Result<i32, DispatchError> {
        let program = self.program;
        let missing = || DispatchError::MissingSubcommand {
            path: program.name.to_owned(),
            group: program.root,
        };

        let Some(arg0) = argv.first() else {
            return Err(missing());
        };

        if let Some(alias) = program.alias.filter(|a| basename(arg0) == a.binary) {
            tracing::debug!(binary = alias.binary, token = alias.token, "binary alias");
            argv[0] = alias.token.to_owned();
        } else {
            let shift = parse_global_options(ctx, &argv)?;
            if let Some(status) = self.handle_special_globals(ctx, &argv, shift)? {
                return Ok(status);
            }
            argv.drain(..shift);
            if argv.is_empty() {
                return Err(missing());
            }
        }

        self.dispatch_command(program.root, program.name, ctx, argv)
    }

    /// Act on `--help` / `--version` found in the global prefix.
    ///
    /// Returns `Some(status)` when dispatch should stop.
    fn handle_special_globals(
        &self,
        ctx: &mut CommandContext<'_>,
        argv: &[String],
        shift: usize,
    ) -> Result<Option<i32>, DispatchError> {
        match special_globals(argv, shift) {
            SpecialGlobal::None => Ok(None),
            SpecialGlobal::Help { full: true } => {
                write_group_usage(ctx.out(), self.program.root, true)?;
                write_format_list(ctx.out())?;
                Ok(Some(0))
            }
            SpecialGlobal::Help { full: false } => {
                execute(self.program.help, ctx, argv)?;
                write_format_list(ctx.out())?;
                Ok(Some(0))
            }
            SpecialGlobal::Version => {
                execute(self.program.version, ctx, argv)?;
                Ok(Some(0))
            }
        }
    }

    /// Resolve `args[0]` in `group` and run or descend into it.
    fn dispatch_command(
        &self,
        group: &'static CommandGroup,
        path: &str,
        ctx: &mut CommandContext<'_>,
        mut args: Vec<String>,
    ) -> Result<i32, DispatchError> {
        let cmd = resolve_command(&args[0], group, path)?;

        if next_level_help(cmd, ctx, &args)? {
            return Ok(0);
        }

        args[0] = cmd.token.to_owned();
        match cmd.kind {
            CommandKind::Group(nested) => {
                let path = format!("{path} {}", cmd.token);
                tracing::debug!(path = %path, "descending into group");
                if args.len() < 2 {
                    return Err(DispatchError::MissingSubcommand { path, group: nested });
                }
                args.remove(0);
                self.dispatch_command(nested, &path, ctx, args)
            }
            CommandKind::Leaf(_) => execute(cmd, ctx, &args),
        }
    }

    /// Render a dispatch error to stderr.
    fn report(&self, ctx: &mut CommandContext<'_>, err: &DispatchError) {
        if let DispatchError::Command(source) = err {
            write_error(ctx, source);
            return;
        }
        if let Err(io) = self.write_diagnostic(ctx.err(), err) {
            tracing::warn!(error = %io, "failed to write diagnostic");
        }
    }

    fn write_diagnostic(&self, w: &mut dyn Write, err: &DispatchError) -> io::Result<()> {
        let root = self.program.root;
        if !matches!(err, DispatchError::MissingSubcommand { .. }) {
            writeln!(w, "{err}")?;
        }
        match err {
            DispatchError::UnknownToken { token, group, .. } => {
                if let Some(cmd) = suggest(token, group) {
                    writeln!(w, "Did you mean '{}'?", cmd.token)?;
                }
                writeln!(w)?;
                write_group_short(w, group)?;
            }
            DispatchError::AmbiguousToken { candidates, .. } => {
                writeln!(w)?;
                writeln!(w, "Did you mean one of these?")?;
                for token in candidates {
                    writeln!(w, "\t{token}")?;
                }
            }
            DispatchError::InvalidFormat { .. } => {
                writeln!(w)?;
                write_group_short(w, root)?;
                writeln!(w)?;
                write_format_list(w)?;
            }
            DispatchError::UnsupportedFormat { command, .. } => {
                writeln!(w)?;
                write_command_usage(w, command, true)?;
            }
            DispatchError::MissingSubcommand { group, .. } if std::ptr::eq(*group, root) => {
                write_group_short(w, group)?;
            }
            DispatchError::MissingSubcommand { group, .. } => write_group_usage(w, group, false)?,
            DispatchError::UnknownGlobalOption { .. }
            | DispatchError::Command(_)
            | DispatchError::Io(_) => {}
        }
        Ok(())
    }
}

/// Check the capability mask and a `--help` directly after the command token.
///
/// Returns `true` when help was rendered and dispatch should stop with 0.
fn next_level_help(
    cmd: &'static Command,
    ctx: &mut CommandContext<'_>,
    args: &[String],
) -> Result<bool, DispatchError> {
    check_capability(cmd, ctx.output_mode)?;

    if args.get(1).map(String::as_str) != Some("--help") {
        return Ok(false);
    }
    match cmd.kind {
        CommandKind::Group(nested) => {
            let full = args.get(2).is_some_and(|a| a == "--full");
            write_group_usage(ctx.out(), nested, full)?;
        }
        CommandKind::Leaf(_) => write_command_usage(ctx.out(), cmd, true)?,
    }
    Ok(true)
}

/// Invoke a leaf command; a group command only prints its usage.
fn execute(cmd: &Command, ctx: &mut CommandContext<'_>, args: &[String]) -> Result<i32, DispatchError> {
    match cmd.kind {
        CommandKind::Leaf(handler) => {
            tracing::debug!(command = cmd.token, argc = args.len(), "executing command");
            Ok(handler(cmd, ctx, args)?)
        }
        CommandKind::Group(group) => {
            write_group_usage(ctx.out(), group, false)?;
            Ok(0)
        }
    }
}

fn basename(arg0: &str) -> &str {
    Path::new(arg0)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(arg0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::format::FormatFlags;
    use crate::dispatch::group::BinaryAlias;

    fn ran(cmd: &Command, ctx: &mut CommandContext<'_>, args: &[String]) -> anyhow::Result<i32> {
        let mode = ctx.output_mode;
        writeln!(ctx.out(), "ran {} [{}] {mode}", cmd.token, args.join(" "))?;
        Ok(0)
    }

    fn status(_: &Command, _: &mut CommandContext<'_>, _: &[String]) -> anyhow::Result<i32> {
        Ok(7)
    }

    fn fail(_: &Command, _: &mut CommandContext<'_>, _: &[String]) -> anyhow::Result<i32> {
        anyhow::bail!("boom")
    }

    static SHOW: Command = Command::leaf(
        "show",
        &["prog sub show <item>", "Show an item"],
        FormatFlags::TEXT.union(FormatFlags::JSON),
        ran,
    );
    static SUB_GROUP: CommandGroup = CommandGroup {
        usage: &["prog sub <command> [<args>]", "Nested commands"],
        info: None,
        commands: &[&SHOW],
    };
    static SUB: Command = Command::group("sub", &SUB_GROUP);
    static CHECK: Command = Command::leaf("check", &["prog check", "Check"], FormatFlags::TEXT, ran);
    static CHECKSUM: Command = Command::leaf(
        "checksum",
        &["prog checksum", "Checksum", "", "--algo <name>   checksum algorithm"],
        FormatFlags::TEXT,
        ran,
    );
    static LIST: Command = Command::leaf("list", &["prog list", "List things"], FormatFlags::TEXT, ran);
    static STATUS: Command = Command::leaf("status", &["prog status"], FormatFlags::TEXT, status);
    static FAIL: Command = Command::leaf("fail", &["prog fail"], FormatFlags::TEXT, fail);
    static HELP: Command = Command::leaf("help", &["prog help [--full]"], FormatFlags::TEXT, ran);
    static VERSION: Command = Command::leaf("version", &["prog version"], FormatFlags::TEXT, ran);

    static ROOT: CommandGroup = CommandGroup {
        usage: &["prog [--help] [--version] [--format <format>] <command> [<args>]"],
        info: Some("Use --help as an argument for information on a specific group or command."),
        commands: &[&SUB, &CHECK, &CHECKSUM, &LIST, &STATUS, &FAIL, &HELP, &VERSION],
    };

    static PROGRAM: Program = Program {
        name: "prog",
        root: &ROOT,
        help: &HELP,
        version: &VERSION,
        alias: Some(BinaryAlias {
            binary: "progck",
            token: "check",
        }),
    };

    fn run(args: &[&str]) -> (i32, String, String) {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let code = {
            let mut ctx = CommandContext::new(&mut out, &mut err);
            let argv = args.iter().map(|s| (*s).to_owned()).collect();
            Dispatcher::new(&PROGRAM).run(&mut ctx, argv)
        };
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_no_arguments_prints_usage() {
        let (code, out, err) = run(&["prog"]);
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert!(err.contains("usage: prog [--help]"));

        let (code, _, _) = run(&[]);
        assert_eq!(code, 1);
    }

    #[test]
    fn test_exact_and_abbreviated_dispatch() {
        let (code, out, _) = run(&["prog", "check", "a"]);
        assert_eq!(code, 0);
        assert_eq!(out, "ran check [check a] text\n");

        let (code, out, _) = run(&["prog", "li", "x"]);
        assert_eq!(code, 0);
        assert_eq!(out, "ran list [list x] text\n");
    }

    #[test]
    fn test_nested_group_rewrites_each_level() {
        let (code, out, _) = run(&["prog", "--format=JSON", "su", "sh", "item"]);
        assert_eq!(code, 0);
        assert_eq!(out, "ran show [show item] json\n");
    }

    #[test]
    fn test_ambiguous_token() {
        let (code, out, err) = run(&["prog", "che"]);
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert!(err.starts_with("prog: ambiguous token 'che'\n"));
        assert!(err.contains("Did you mean one of these?\n\tcheck\n\tchecksum\n"));
    }

    #[test]
    fn test_unknown_token() {
        let (code, out, err) = run(&["prog", "chk"]);
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert!(err.starts_with("prog: unknown token 'chk'\n"));

        let (code, _, err) = run(&["prog", "sub", "nope"]);
        assert_eq!(code, 1);
        assert!(err.starts_with("prog sub: unknown token 'nope'\n"));
    }

    #[test]
    fn test_version_short_circuits() {
        let (code, out, _) = run(&["prog", "--version", "check"]);
        assert_eq!(code, 0);
        assert_eq!(out, "ran version [prog --version check] text\n");
    }

    #[test]
    fn test_help_beats_version() {
        let (code, out, _) = run(&["prog", "--version", "--help"]);
        assert_eq!(code, 0);
        assert!(out.starts_with("ran help [prog --version --help] text\n"));
        assert!(!out.contains("ran version"));
        assert!(out.contains("Options for --format are:"));
    }

    #[test]
    fn test_help_full_skips_help_command() {
        let (code, out, _) = run(&["prog", "--help", "--full"]);
        assert_eq!(code, 0);
        assert!(!out.contains("ran help"));
        assert!(out.contains("--algo <name>   checksum algorithm"));
        assert!(out.contains("usage: prog sub show <item>"));
        assert!(out.contains("Options for --format are:"));
    }

    #[test]
    fn test_help_after_command_belongs_to_command() {
        let (code, out, _) = run(&["prog", "--format=json", "sub", "show", "--help"]);
        assert_eq!(code, 0);
        assert!(out.starts_with("usage: prog sub show <item>"));
        assert!(!out.contains("ran"));

        let (code, out, _) = run(&["prog", "list", "x", "--help"]);
        assert_eq!(code, 0);
        assert_eq!(out, "ran list [list x --help] text\n");
    }

    #[test]
    fn test_group_help_and_missing_subcommand() {
        let (code, out, _) = run(&["prog", "sub", "--help"]);
        assert_eq!(code, 0);
        assert!(out.starts_with("usage: prog sub <command> [<args>]"));

        let (code, out, err) = run(&["prog", "sub"]);
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert!(err.contains("usage: prog sub <command> [<args>]"));
    }

    #[test]
    fn test_unsupported_format_for_command() {
        let (code, out, err) = run(&["prog", "--format=csv", "list"]);
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert!(err.starts_with("error: csv output is unsupported for this command.\n"));
        assert!(err.contains("usage: prog list"));
    }

    #[test]
    fn test_unsupported_format_wins_over_help() {
        let (code, out, err) = run(&["prog", "--format=json", "list", "--help"]);
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert!(err.contains("json output is unsupported"));
    }

    #[test]
    fn test_invalid_format() {
        let (code, _, err) = run(&["prog", "--format=xml", "list"]);
        assert_eq!(code, 1);
        assert!(err.starts_with("error: invalid output format \"xml\"\n"));
        assert!(err.contains("Options for --format are:"));
    }

    #[test]
    fn test_unknown_global_option() {
        let (code, out, err) = run(&["prog", "--bogus", "list"]);
        assert_eq!(code, 129);
        assert!(out.is_empty());
        assert_eq!(err, "Unknown global option: --bogus\n");
    }

    #[test]
    fn test_leaf_status_is_propagated() {
        assert_eq!(run(&["prog", "status"]).0, 7);

        let (code, _, err) = run(&["prog", "fail"]);
        assert_eq!(code, 1);
        assert_eq!(err, "error: boom\n");
    }

    #[test]
    fn test_binary_alias_bypasses_global_options() {
        let (code, out, _) = run(&["/usr/local/bin/progck", "--format=json", "--help"]);
        assert_eq!(code, 0);
        assert_eq!(out, "ran check [check --format=json --help] text\n");
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("/usr/bin/prog"), "prog");
        assert_eq!(basename("prog"), "prog");
    }
}
