//! `lint` command: validate the command table.
//!
//! Checks every group for:
//!
//! - **errors**: empty tokens, duplicate tokens, groups without commands;
//! - **notes**: a token that is a strict prefix of a sibling's token. Such a
//!   command still resolves when typed in full, but every shorter
//!   abbreviation of it is ambiguous.
use std::io::Write;

use super::{NoArgs, parse_args};
use crate::cli::CommandContext;
use crate::cli::output::write_json;
use crate::dispatch::{Command, CommandGroup, CommandKind, FormatFlags, OutputMode};
use crate::types::LintFindingOutput;

pub static LINT: Command = Command::leaf(
    "lint",
    &[
        "cmdtree lint",
        "Validate the command table",
        "",
        "Exits with status 1 when any error is found. Also runs when the",
        "binary is invoked as 'cmdlint'.",
    ],
    FormatFlags::TEXT.union(FormatFlags::JSON),
    run,
);

/// Collect findings for `group` and every nested group.
pub fn lint_group(group: &CommandGroup, path: &str, findings: &mut Vec<LintFindingOutput>) {
    let mut finding = |severity, message: String| {
        findings.push(LintFindingOutput {
            severity,
            path: path.to_owned(),
            message,
        });
    };

    if group.commands.is_empty() {
        finding("error", "group has no commands".to_owned());
    }

    // Each distinct token is reported once, at its first occurrence.
    let first_seen = |i: usize| {
        let token = group.commands[i].token;
        !group.commands[..i].iter().any(|c| c.token == token)
    };

    for (i, cmd) in group.commands.iter().enumerate() {
        if cmd.token.is_empty() {
            finding("error", "empty command token".to_owned());
            continue;
        }
        if !first_seen(i) {
            continue;
        }
        if group.commands[i + 1..].iter().any(|c| c.token == cmd.token) {
            finding("error", format!("duplicate token '{}'", cmd.token));
        }
        for (j, other) in group.commands.iter().enumerate() {
            if first_seen(j) && other.token != cmd.token && other.token.starts_with(cmd.token) {
                finding(
                    "note",
                    format!(
                        "'{}' is a prefix of '{}'; shorter abbreviations are ambiguous",
                        cmd.token, other.token
                    ),
                );
            }
        }
    }

    for cmd in group.commands {
        if let CommandKind::Group(nested) = cmd.kind {
            lint_group(nested, &format!("{path} {}", cmd.token), findings);
        }
    }
}

fn run(_cmd: &Command, ctx: &mut CommandContext<'_>, args: &[String]) -> anyhow::Result<i32> {
    if let Err(status) = parse_args::<NoArgs>(ctx, args)? {
        return Ok(status);
    }

    let mut findings = Vec::new();
    lint_group(&super::ROOT, super::PROGRAM.name, &mut findings);
    let failed = findings.iter().any(|f| f.severity == "error");

    let mode = ctx.output_mode;
    let out = ctx.out();
    match mode {
        OutputMode::Json => write_json(out, &findings)?,
        OutputMode::Text | OutputMode::Csv => {
            if findings.is_empty() {
                writeln!(out, "no problems found")?;
            }
            for f in &findings {
                writeln!(out, "{}: {}: {}", f.severity, f.path, f.message)?;
            }
        }
    }
    Ok(i32::from(failed))
}
