//! Per-invocation context and the output helpers commands write through.
use std::io::{self, Write};

use comfy_table::{Table, presets::UTF8_BORDERS_ONLY};
use serde::Serialize;

use crate::dispatch::format::OutputMode;
use crate::types::ErrorOutput;

/// State threaded through one dispatch pass.
///
/// Holds the negotiated output mode and the two streams everything is
/// written to, so the whole pass can run against in-memory buffers.
pub struct CommandContext<'w> {
    pub output_mode: OutputMode,
    out: &'w mut dyn Write,
    err: &'w mut dyn Write,
}

impl<'w> CommandContext<'w> {
    /// Context in text mode writing to the given streams.
    #[must_use]
    pub fn new(out: &'w mut dyn Write, err: &'w mut dyn Write) -> Self {
        Self {
            output_mode: OutputMode::Text,
            out,
            err,
        }
    }

    /// Standard output.
    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    /// Standard error.
    pub fn err(&mut self) -> &mut dyn Write {
        &mut *self.err
    }
}

// --- Generic JSON helpers ---

/// Write `value` as pretty-printed JSON followed by a newline.
///
/// # Errors
///
/// Propagates serialization and write failures.
pub fn write_json<T: Serialize + ?Sized>(w: &mut dyn Write, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, value)?;
    writeln!(w)
}

// --- CSV ---

/// CSV writer over `w`. Fields are quoted only when needed; records end in `\n`.
///
/// Callers must `flush` the writer; errors on drop are lost.
pub fn csv_writer(w: &mut dyn Write) -> csv::Writer<&mut dyn Write> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(w)
}

// --- Tables ---

/// Write a bordered table with an optional header row.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_table<const N: usize>(
    w: &mut dyn Write,
    header: [&str; N],
    rows: &[[String; N]],
) -> io::Result<()> {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(header);
    for row in rows {
        table.add_row(row.iter().map(String::as_str));
    }
    writeln!(w, "{table}")
}

// --- Error output ---

/// Write a command failure to stderr: a JSON envelope in json mode, otherwise
/// a single `error:` line with the full cause chain.
pub fn write_error(ctx: &mut CommandContext<'_>, err: &anyhow::Error) {
    let mode = ctx.output_mode;
    let out = ctx.err();
    let _ = match mode {
        OutputMode::Json => write_json(out, &ErrorOutput::command_failed(err)),
        OutputMode::Text | OutputMode::Csv => writeln!(out, "error: {err:#}"),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_quoting() {
        let mut buf = Vec::new();
        {
            let mut wtr = csv_writer(&mut buf);
            wtr.write_record(["plain", "a,b", "say \"hi\""]).unwrap();
            wtr.flush().unwrap();
        }
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "plain,\"a,b\",\"say \"\"hi\"\"\"\n"
        );
    }

    #[test]
    fn test_error_envelope_in_json_mode() {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        {
            let mut ctx = CommandContext::new(&mut out, &mut err);
            ctx.output_mode = OutputMode::Json;
            write_error(&mut ctx, &anyhow::anyhow!("boom"));
        }
        let value: serde_json::Value = serde_json::from_slice(&err).unwrap();
        assert_eq!(value["ok"], false);
        assert_eq!(value["error"]["code"], "command_failed");
        assert_eq!(value["error"]["message"], "boom");
        assert!(out.is_empty());
    }

    #[test]
    fn test_error_line_in_text_mode() {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        {
            let mut ctx = CommandContext::new(&mut out, &mut err);
            let e = anyhow::anyhow!("inner").context("outer");
            write_error(&mut ctx, &e);
        }
        assert_eq!(String::from_utf8(err).unwrap(), "error: outer: inner\n");
    }
}
