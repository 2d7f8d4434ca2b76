//! `version` command: print the program version.
use std::io::Write;

use crate::cli::CommandContext;
use crate::dispatch::{Command, FormatFlags};

pub static VERSION: Command = Command::leaf(
    "version",
    &["cmdtree version", "Display cmdtree version"],
    FormatFlags::TEXT,
    run,
);

fn run(_cmd: &Command, ctx: &mut CommandContext<'_>, _args: &[String]) -> anyhow::Result<i32> {
    writeln!(ctx.out(), "cmdtree {}", env!("CARGO_PKG_VERSION"))?;
    Ok(0)
}
