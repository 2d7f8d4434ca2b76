//! `help` command: usage for the whole program.
use crate::cli::CommandContext;
use crate::dispatch::help::write_group_usage;
use crate::dispatch::{Command, FormatFlags};

pub static HELP: Command = Command::leaf(
    "help",
    &[
        "cmdtree help [--full]",
        "Display help information",
        "",
        "--full     display detailed help on every command",
    ],
    FormatFlags::TEXT,
    run,
);

/// Also invoked for a bare global `--help`, with the untouched process
/// arguments; only a `--full` right after the first slot selects full usage.
fn run(_cmd: &Command, ctx: &mut CommandContext<'_>, args: &[String]) -> anyhow::Result<i32> {
    let full = args.get(1).is_some_and(|a| a == "--full");
    write_group_usage(ctx.out(), &super::ROOT, full)?;
    Ok(0)
}
