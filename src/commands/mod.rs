//! Built-in command table: the root group, its commands and the program
//! description handed to the dispatcher.
pub mod env;
pub mod formats;
pub mod help;
pub mod lint;
pub mod list;
pub mod tree;
pub mod version;

use std::io::{self, Write};

use clap::Parser;

use crate::cli::CommandContext;
use crate::dispatch::{BinaryAlias, CommandGroup, Program};

pub static PROGRAM: Program = Program {
    name: "cmdtree",
    root: &ROOT,
    help: &help::HELP,
    version: &version::VERSION,
    alias: Some(BinaryAlias {
        binary: "cmdlint",
        token: "lint",
    }),
};

pub static ROOT: CommandGroup = CommandGroup {
    usage: &[
        "cmdtree [--help] [--version] [--format <format>] <group> [<group>...] <command> [<args>]",
    ],
    info: Some("Use --help as an argument for information on a specific group or command."),
    commands: &[
        &tree::TREE,
        &formats::FORMATS,
        &env::ENV,
        &lint::LINT,
        &list::LIST,
        &help::HELP,
        &version::VERSION,
    ],
};

/// Parse a command's own arguments; `args[0]` is the command token.
///
/// When clap rejects the arguments its message is written to the right
/// stream and `Ok(Err(status))` hands back the exit status: 0 for `--help`,
/// 1 for usage errors.
///
/// # Errors
///
/// Propagates failures writing clap's message.
fn parse_args<T: Parser>(ctx: &mut CommandContext<'_>, args: &[String]) -> io::Result<Result<T, i32>> {
    let err = match T::try_parse_from(args) {
        Ok(parsed) => return Ok(Ok(parsed)),
        Err(err) => err,
    };
    let rendered = err.render();
    if err.use_stderr() {
        write!(ctx.err(), "{rendered}")?;
        Ok(Err(1))
    } else {
        write!(ctx.out(), "{rendered}")?;
        Ok(Err(0))
    }
}

/// Arguments of a command that takes none.
#[derive(Debug, Parser)]
struct NoArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_parse_args_reports_write_failures() {
        let mut out = Vec::new();
        let mut err = Broken;
        let mut ctx = CommandContext::new(&mut out, &mut err);
        let args = vec!["formats".to_owned(), "--bogus".to_owned()];
        assert!(parse_args::<NoArgs>(&mut ctx, &args).is_err());
    }

    #[test]
    fn test_parse_args_status() {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let mut ctx = CommandContext::new(&mut out, &mut err);
        let args = vec!["formats".to_owned(), "stray".to_owned()];
        assert!(matches!(parse_args::<NoArgs>(&mut ctx, &args), Ok(Err(1))));

        let args = vec!["formats".to_owned()];
        assert!(matches!(parse_args::<NoArgs>(&mut ctx, &args), Ok(Ok(NoArgs {}))));
    }
}
