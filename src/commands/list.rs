//! `list` command: every runnable command path, one per line.
use std::io::Write;

use super::{NoArgs, parse_args};
use crate::cli::CommandContext;
use crate::dispatch::{Command, CommandGroup, CommandKind, FormatFlags};

pub static LIST: Command = Command::leaf(
    "list",
    &["cmdtree list", "List every command path"],
    FormatFlags::TEXT,
    run,
);

/// Collect the full paths of all leaf commands below `group`, depth first.
pub fn leaf_paths(group: &CommandGroup, path: &str, out: &mut Vec<String>) {
    for cmd in group.commands {
        let path = format!("{path} {}", cmd.token);
        match cmd.kind {
            CommandKind::Group(nested) => leaf_paths(nested, &path, out),
            CommandKind::Leaf(_) => out.push(path),
        }
    }
}

fn run(_cmd: &Command, ctx: &mut CommandContext<'_>, args: &[String]) -> anyhow::Result<i32> {
    if let Err(status) = parse_args::<NoArgs>(ctx, args)? {
        return Ok(status);
    }

    let mut paths = Vec::new();
    leaf_paths(&super::ROOT, super::PROGRAM.name, &mut paths);
    let out = ctx.out();
    for path in paths {
        writeln!(out, "{path}")?;
    }
    Ok(0)
}
