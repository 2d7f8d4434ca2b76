//! Dispatcher core: command tables, token resolution, format negotiation,
//! usage rendering and the recursive dispatch loop.
pub mod errors;
pub mod format;
pub mod group;
pub mod help;
pub mod resolve;
pub mod run;

pub use errors::DispatchError;
pub use format::{FormatFlags, OutputMode};
pub use group::{BinaryAlias, Command, CommandGroup, CommandKind, Program};
pub use resolve::{Resolution, resolve_token};
pub use run::Dispatcher;
