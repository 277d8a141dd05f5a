//! Editing actions: input dispatch, console command execution, and file
//! persistence helpers.
//!
//! The dispatcher turns logical input events into document/console mutations
//! and journal records; the command module parses and executes the textual
//! commands produced by the console and by shortcuts. Both operate on
//! `core-state` types only, so every behavior here is testable without a
//! terminal.

pub mod commands;
pub mod dispatcher;
pub mod io_ops;

pub use dispatcher::{DispatchResult, Dispatcher};
