//! `tree` group: inspect the command table.
use std::io::Write;

use clap::Parser;

use super::{ROOT, parse_args};
use crate::cli::CommandContext;
use crate::cli::output::{csv_writer, write_json, write_table};
use crate::dispatch::format::provides_format;
use crate::dispatch::{
    Command, CommandGroup, CommandKind, FormatFlags, OutputMode, Resolution, resolve_token,
};
use crate::types::{CommandNodeOutput, ResolveStepOutput};

pub static TREE: Command = Command::group("tree", &TREE_GROUP);

static TREE_GROUP: CommandGroup = CommandGroup {
    usage: &["cmdtree tree <command> [<args>]", "Inspect the command table"],
    info: None,
    commands: &[&SHOW, &RESOLVE],
};

static SHOW: Command = Command::leaf(
    "show",
    &[
        "cmdtree tree show [--depth <N>]",
        "Print the command tree",
        "",
        "--depth <N>   descend at most N levels below the root",
    ],
    FormatFlags::all(),
    run_show,
);

static RESOLVE: Command = Command::leaf(
    "resolve",
    &[
        "cmdtree tree resolve <token>...",
        "Explain how tokens resolve against the command tree",
        "",
        "Each token is matched exactly or as an unambiguous prefix against",
        "the group selected by the previous token.",
    ],
    FormatFlags::TEXT.union(FormatFlags::JSON),
    run_resolve,
);

/// Arguments for `cmdtree tree show`.
#[derive(Debug, Parser)]
#[command(name = "show")]
struct ShowArgs {
    /// Maximum depth below the root (1 = top-level commands only).
    #[arg(long, value_name = "N")]
    depth: Option<usize>,
}

/// Arguments for `cmdtree tree resolve`.
#[derive(Debug, Parser)]
#[command(name = "resolve")]
struct ResolveArgs {
    /// Tokens as they would be typed after `cmdtree`.
    #[arg(required = true)]
    tokens: Vec<String>,
}

/// Build the output tree for `group`, at most `depth` levels deep.
#[must_use]
pub fn build_nodes(group: &CommandGroup, path: &str, depth: Option<usize>) -> Vec<CommandNodeOutput> {
    if depth == Some(0) {
        return Vec::new();
    }
    group
        .commands
        .iter()
        .map(|cmd| {
            let path = format!("{path} {}", cmd.token);
            let (kind, formats, children) = match cmd.kind {
                CommandKind::Group(nested) => (
                    "group",
                    Vec::new(),
                    build_nodes(nested, &path, depth.map(|d| d - 1)),
                ),
                CommandKind::Leaf(_) => ("command", format_names(cmd), Vec::new()),
            };
            CommandNodeOutput {
                token: cmd.token.to_owned(),
                path,
                kind,
                formats,
                summary: cmd.summary().map(str::to_owned),
                children,
            }
        })
        .collect()
}

fn format_names(cmd: &Command) -> Vec<&'static str> {
    OutputMode::all()
        .iter()
        .filter(|mode| provides_format(cmd, **mode))
        .map(|mode| mode.name())
        .collect()
}

fn run_show(_cmd: &Command, ctx: &mut CommandContext<'_>, args: &[String]) -> anyhow::Result<i32> {
    let args: ShowArgs = match parse_args(ctx, args)? {
        Ok(args) => args,
        Err(status) => return Ok(status),
    };

    let nodes = build_nodes(&ROOT, super::PROGRAM.name, args.depth);
    let mode = ctx.output_mode;
    let out = ctx.out();
    match mode {
        OutputMode::Json => write_json(out, &nodes)?,
        OutputMode::Csv => {
            let mut wtr = csv_writer(out);
            wtr.write_record(["path", "kind", "formats", "summary"])?;
            write_csv_nodes(&mut wtr, &nodes)?;
            wtr.flush()?;
        }
        OutputMode::Text => {
            writeln!(out, "{}", super::PROGRAM.name)?;
            let count = nodes.len();
            for (i, node) in nodes.iter().enumerate() {
                write_tree_visual(out, node, "", i + 1 == count)?;
            }
        }
    }
    Ok(0)
}

fn write_csv_nodes<W: Write>(wtr: &mut csv::Writer<W>, nodes: &[CommandNodeOutput]) -> csv::Result<()> {
    for node in nodes {
        let summary = node.summary.as_deref().unwrap_or("");
        let formats = node.formats.join(";");
        wtr.write_record([node.path.as_str(), node.kind, formats.as_str(), summary])?;
        write_csv_nodes(wtr, &node.children)?;
    }
    Ok(())
}

fn write_tree_visual(
    w: &mut dyn Write,
    node: &CommandNodeOutput,
    prefix: &str,
    is_last: bool,
) -> std::io::Result<()> {
    let connector = if is_last { "└── " } else { "├── " };
    let summary = node
        .summary
        .as_deref()
        .map(|s| format!("  {s}"))
        .unwrap_or_default();
    let formats = if node.formats.len() > 1 {
        format!("  [{}]", node.formats.join(", "))
    } else {
        String::new()
    };
    writeln!(w, "{prefix}{connector}{}{summary}{formats}", node.token)?;

    let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
    let child_count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        write_tree_visual(w, child, &child_prefix, i + 1 == child_count)?;
    }
    Ok(())
}

/// Walk `tokens` down from `root`, recording how each one resolves.
///
/// Stops after the first token that fails to resolve. Tokens following a
/// leaf command are reported as arguments.
#[must_use]
pub fn explain(root: &'static CommandGroup, name: &str, tokens: &[String]) -> Vec<ResolveStepOutput> {
    let mut steps = Vec::new();
    let mut group = Some(root);
    let mut path = name.to_owned();

    for token in tokens {
        let step = |outcome, command, candidates| ResolveStepOutput {
            token: token.clone(),
            group: path.clone(),
            outcome,
            command,
            candidates,
        };

        let Some(current) = group else {
            steps.push(step("argument", None, Vec::new()));
            continue;
        };

        match resolve_token(token, current) {
            Resolution::Found(cmd) => {
                let outcome = if cmd.token == token.as_str() { "exact" } else { "abbreviation" };
                steps.push(step(outcome, Some(cmd.token), Vec::new()));
                group = cmd.nested();
                path = format!("{path} {}", cmd.token);
            }
            Resolution::NotFound => {
                steps.push(step("unknown", None, Vec::new()));
                break;
            }
            Resolution::Ambiguous(candidates) => {
                let tokens = candidates.iter().map(|c| c.token).collect();
                steps.push(step("ambiguous", None, tokens));
                break;
            }
        }
    }
    steps
}

fn run_resolve(_cmd: &Command, ctx: &mut CommandContext<'_>, args: &[String]) -> anyhow::Result<i32> {
    let args: ResolveArgs = match parse_args(ctx, args)? {
        Ok(args) => args,
        Err(status) => return Ok(status),
    };

    let steps = explain(&ROOT, super::PROGRAM.name, &args.tokens);
    let failed = steps
        .iter()
        .any(|s| matches!(s.outcome, "unknown" | "ambiguous"));

    let mode = ctx.output_mode;
    let out = ctx.out();
    match mode {
        OutputMode::Json => write_json(out, &steps)?,
        OutputMode::Text | OutputMode::Csv => {
            let rows: Vec<[String; 4]> = steps
                .iter()
                .map(|s| {
                    let resolved = match (s.command, s.candidates.is_empty()) {
                        (Some(cmd), _) => cmd.to_owned(),
                        (None, false) => s.candidates.join(", "),
                        (None, true) => String::new(),
                    };
                    [s.token.clone(), s.group.clone(), s.outcome.to_owned(), resolved]
                })
                .collect();
            write_table(out, ["TOKEN", "GROUP", "OUTCOME", "COMMAND"], &rows)?;
        }
    }
    Ok(i32::from(failed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::run_leaf;

    fn tokens(t: &[&str]) -> Vec<String> {
        t.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_build_nodes_follows_declaration_order() {
        let nodes = build_nodes(&ROOT, "cmdtree", None);
        let top: Vec<_> = nodes.iter().map(|n| n.token.as_str()).collect();
        assert_eq!(top, ["tree", "formats", "env", "lint", "list", "help", "version"]);
        assert_eq!(nodes[0].kind, "group");
        assert_eq!(nodes[0].children[0].path, "cmdtree tree show");
        assert_eq!(nodes[0].children[0].formats, ["text", "json", "csv"]);
    }

    #[test]
    fn test_build_nodes_depth_limit() {
        let nodes = build_nodes(&ROOT, "cmdtree", Some(1));
        assert!(nodes[0].children.is_empty());
        assert!(build_nodes(&ROOT, "cmdtree", Some(0)).is_empty());
    }

    #[test]
    fn test_explain_walks_groups() {
        let steps = explain(&ROOT, "cmdtree", &tokens(&["tr", "show", "extra"]));
        let outcomes: Vec<_> = steps.iter().map(|s| s.outcome).collect();
        assert_eq!(outcomes, ["abbreviation", "exact", "argument"]);
        assert_eq!(steps[1].group, "cmdtree tree");
        assert_eq!(steps[1].command, Some("show"));
    }

    #[test]
    fn test_explain_stops_at_ambiguity() {
        let steps = explain(&ROOT, "cmdtree", &tokens(&["li", "x"]));
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].outcome, "ambiguous");
        assert_eq!(steps[0].candidates, ["lint", "list"]);
    }

    #[test]
    fn test_show_json() {
        let (code, out, _) = run_leaf(&SHOW, OutputMode::Json, &["show"]);
        assert_eq!(code, 0);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["token"], "tree");
        assert_eq!(value[0]["children"][1]["token"], "resolve");
    }

    #[test]
    fn test_show_text_and_csv() {
        let (_, out, _) = run_leaf(&SHOW, OutputMode::Text, &["show", "--depth", "1"]);
        assert!(out.starts_with("cmdtree\n├── tree"));
        assert!(out.contains("└── version"));
        assert!(!out.contains("show"));

        let (_, out, _) = run_leaf(&SHOW, OutputMode::Csv, &["show"]);
        assert!(out.starts_with("path,kind,formats,summary\n"));
        assert!(out.contains("cmdtree tree show,command,text;json;csv,Print the command tree\n"));
    }

    #[test]
    fn test_show_rejects_bad_arguments() {
        let (code, out, err) = run_leaf(&SHOW, OutputMode::Text, &["show", "--depth", "many"]);
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert!(!err.is_empty());
    }

    #[test]
    fn test_resolve_status() {
        let (code, out, _) = run_leaf(&RESOLVE, OutputMode::Text, &["resolve", "tree", "sh"]);
        assert_eq!(code, 0);
        assert!(out.contains("abbreviation"));

        let (code, _, _) = run_leaf(&RESOLVE, OutputMode::Json, &["resolve", "nope"]);
        assert_eq!(code, 1);
    }
}
