//! Usage rendering for commands and command groups.
//!
//! The dispatcher decides when help is shown and on which stream; these
//! functions only lay it out.
use std::io::{self, Write};

use comfy_table::{Table, presets::NOTHING};

use super::group::{Command, CommandGroup, CommandKind};

/// Write the usage block of a single command.
///
/// With `full`, option details (usage lines after the description) follow.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_command_usage(w: &mut dyn Write, cmd: &Command, full: bool) -> io::Result<()> {
    writeln!(w, "usage: {}", cmd.synopsis())?;
    if let Some(summary) = cmd.summary() {
        writeln!(w)?;
        writeln!(w, "    {summary}")?;
    }
    if full {
        let details = cmd.usage().get(2..).unwrap_or_default();
        let first = details.iter().position(|l| !l.is_empty());
        if let Some(start) = first {
            writeln!(w)?;
            for line in &details[start..] {
                if line.is_empty() {
                    writeln!(w)?;
                } else {
                    writeln!(w, "    {line}")?;
                }
            }
        }
    }
    Ok(())
}

/// Write a group's usage followed by its commands.
///
/// Without `full` each command gets its synopsis and description; with
/// `full` every leaf's complete usage is included, descending into nested
/// groups.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_group_usage(w: &mut dyn Write, group: &CommandGroup, full: bool) -> io::Result<()> {
    write_group_banner(w, group)?;
    writeln!(w)?;
    write_group_commands(w, group, full)?;
    if let Some(info) = group.info {
        writeln!(w, "{info}")?;
    }
    Ok(())
}

/// Write a compact overview: usage, then groups and commands as two aligned lists.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_group_short(w: &mut dyn Write, group: &CommandGroup) -> io::Result<()> {
    write_group_banner(w, group)?;

    let (groups, leaves): (Vec<&Command>, Vec<&Command>) = group
        .commands
        .iter()
        .copied()
        .partition(|cmd| matches!(cmd.kind, CommandKind::Group(_)));

    for (title, cmds) in [("Command groups:", groups), ("Commands:", leaves)] {
        if cmds.is_empty() {
            continue;
        }
        let mut table = Table::new();
        table.load_preset(NOTHING);
        for cmd in cmds {
            table.add_row([cmd.token, cmd.summary().unwrap_or("")]);
        }
        writeln!(w)?;
        writeln!(w, "{title}")?;
        writeln!(w, "{table}")?;
    }

    if let Some(info) = group.info {
        writeln!(w)?;
        writeln!(w, "{info}")?;
    }
    Ok(())
}

fn write_group_banner(w: &mut dyn Write, group: &CommandGroup) -> io::Result<()> {
    let mut lines = group.usage.iter();
    if let Some(first) = lines.next() {
        writeln!(w, "usage: {first}")?;
    }
    if let Some(desc) = lines.next().filter(|d| !d.is_empty()) {
        writeln!(w)?;
        writeln!(w, "    {desc}")?;
    }
    Ok(())
}

fn write_group_commands(w: &mut dyn Write, group: &CommandGroup, full: bool) -> io::Result<()> {
    for &cmd in group.commands {
        match cmd.kind {
            CommandKind::Group(nested) if full => write_group_commands(w, nested, true)?,
            CommandKind::Leaf(_) if full => {
                write_command_usage(w, cmd, true)?;
                writeln!(w)?;
            }
            _ => {
                writeln!(w, "    {}", cmd.synopsis())?;
                if let Some(summary) = cmd.summary() {
                    writeln!(w, "        {summary}")?;
                }
                writeln!(w)?;
            }
        }
    }
    Ok(())
}
