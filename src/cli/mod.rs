//! CLI layer: global option parsing, invocation context and output helpers.
pub mod args;
pub mod output;

pub use args::{SpecialGlobal, parse_global_options, special_globals};
pub use output::{CommandContext, write_error};
