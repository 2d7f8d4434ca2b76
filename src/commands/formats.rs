//! `formats` command: list the values accepted by `--format`.
use super::{NoArgs, parse_args};
use crate::cli::CommandContext;
use crate::cli::output::{csv_writer, write_json, write_table};
use crate::dispatch::{Command, FormatFlags, OutputMode};
use crate::types::FormatOutput;

pub static FORMATS: Command = Command::leaf(
    "formats",
    &["cmdtree formats", "List output formats accepted by --format"],
    FormatFlags::all(),
    run,
);

fn run(_cmd: &Command, ctx: &mut CommandContext<'_>, args: &[String]) -> anyhow::Result<i32> {
    if let Err(status) = parse_args::<NoArgs>(ctx, args)? {
        return Ok(status);
    }

    let formats: Vec<FormatOutput> = OutputMode::all()
        .iter()
        .map(|mode| FormatOutput {
            name: mode.name(),
            index: mode.index(),
            default: *mode == OutputMode::default(),
        })
        .collect();

    let mode = ctx.output_mode;
    let out = ctx.out();
    match mode {
        OutputMode::Json => write_json(out, &formats)?,
        OutputMode::Csv => {
            let mut wtr = csv_writer(out);
            wtr.write_record(["name", "index", "default"])?;
            for f in &formats {
                let index = f.index.to_string();
                let default = f.default.to_string();
                wtr.write_record([f.name, index.as_str(), default.as_str()])?;
            }
            wtr.flush()?;
        }
        OutputMode::Text => {
            let rows: Vec<[String; 3]> = formats
                .iter()
                .map(|f| {
                    [
                        f.name.to_owned(),
                        format!("1 << {}", f.index),
                        if f.default { "yes" } else { "" }.to_owned(),
                    ]
                })
                .collect();
            write_table(out, ["NAME", "BIT", "DEFAULT"], &rows)?;
        }
    }
    Ok(0)
}
