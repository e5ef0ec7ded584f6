//! Command-line front end: argument parsing, display-level infrastructure,
//! and help text.

pub mod args;
pub mod constants;
pub mod help;

pub use args::{parse_args, parse_args_from, OpMode, ParsedArgs};
