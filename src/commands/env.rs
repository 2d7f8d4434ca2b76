//! `env` command: list environment variables.
use std::collections::BTreeMap;
use std::io::Write;

use clap::Parser;

use super::parse_args;
use crate::cli::CommandContext;
use crate::cli::output::{csv_writer, write_json};
use crate::dispatch::{Command, FormatFlags, OutputMode};

pub static ENV: Command = Command::leaf(
    "env",
    &[
        "cmdtree env [--prefix <prefix>]",
        "List environment variables",
        "",
        "--prefix <prefix>   only variables whose name starts with <prefix>",
    ],
    FormatFlags::all(),
    run,
);

/// Arguments for `cmdtree env`.
#[derive(Debug, Parser)]
#[command(name = "env")]
struct EnvArgs {
    /// Only include variables whose name starts with this prefix.
    #[arg(long, value_name = "PREFIX")]
    prefix: Option<String>,
}

/// Environment variables sorted by name, optionally filtered by prefix.
///
/// Names and values that are not valid UTF-8 are converted lossily.
#[must_use]
pub fn collect_vars(prefix: Option<&str>) -> BTreeMap<String, String> {
    std::env::vars_os()
        .map(|(k, v)| (k.to_string_lossy().into_owned(), v.to_string_lossy().into_owned()))
        .filter(|(k, _)| prefix.is_none_or(|p| k.starts_with(p)))
        .collect()
}

fn run(_cmd: &Command, ctx: &mut CommandContext<'_>, args: &[String]) -> anyhow::Result<i32> {
    let args: EnvArgs = match parse_args(ctx, args)? {
        Ok(args) => args,
        Err(status) => return Ok(status),
    };

    let vars = collect_vars(args.prefix.as_deref());
    let mode = ctx.output_mode;
    let out = ctx.out();
    match mode {
        OutputMode::Json => write_json(out, &vars)?,
        OutputMode::Csv => {
            let mut wtr = csv_writer(out);
            wtr.write_record(["name", "value"])?;
            for (name, value) in &vars {
                wtr.write_record([name, value])?;
            }
            wtr.flush()?;
        }
        OutputMode::Text => {
            for (name, value) in &vars {
                writeln!(out, "{name}={value}")?;
            }
        }
    }
    Ok(0)
}
