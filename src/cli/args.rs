//! Command-line argument parsing for `gt1z`.
//!
//! The entry points are [`parse_args`] (reads `std::env::args()`) and
//! [`parse_args_from`] (takes an explicit slice, suitable for unit testing).
//! Short options may be aggregated (e.g. `-dfD`).  The first free argument
//! is the input filename, the second the output filename; more are a usage
//! error, as are conflicting mode letters.

use anyhow::bail;

use crate::cli::constants::{display_level, set_display_level};
use crate::cli::help::{print_usage, print_version};

/// Operation selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpMode {
    /// Compress a GT1 file into a GT1Z file (default).
    Compress,
    /// Decompress a GT1Z file into a GT1 file.
    Decompress,
    /// Verify a GT1Z file against a GT1 file.
    Verify,
}

impl OpMode {
    fn letter(self) -> char {
        match self {
            OpMode::Compress => 'c',
            OpMode::Decompress => 'd',
            OpMode::Verify => 'v',
        }
    }
}

/// Options and filenames produced by the argument parsing loop.
#[derive(Debug)]
pub struct ParsedArgs {
    /// Resolved operation mode (compress when no mode letter was given).
    pub op_mode: OpMode,
    /// Overwrite an existing output file without complaint (`-f`).
    pub force_overwrite: bool,
    /// Warn when the processed file is not relocatable (`-r`).
    pub warn_not_relocatable: bool,
    /// Input filename (required for any operation).
    pub input_filename: Option<String>,
    /// Output filename; derived from the input suffix when absent.
    pub output_filename: Option<String>,
    /// When `true`, `-h` or `--version` was handled; the caller should exit
    /// 0 without performing any I/O operation.
    pub exit_early: bool,
}

/// Parse `std::env::args()` (skipping argv[0]).
pub fn parse_args() -> anyhow::Result<ParsedArgs> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    parse_args_from(&argv)
}

/// Parse an explicit argument list.  Callable from tests without touching
/// `std::env`.
pub fn parse_args_from(argv: &[String]) -> anyhow::Result<ParsedArgs> {
    let mut op_mode: Option<OpMode> = None;
    let mut force_overwrite = false;
    let mut warn_not_relocatable = false;
    let mut input_filename: Option<String> = None;
    let mut output_filename: Option<String> = None;
    let mut exit_early = false;

    fn set_mode(current: &mut Option<OpMode>, new: OpMode) -> anyhow::Result<()> {
        if let Some(old) = *current {
            if old != new {
                bail!(
                    "conflicting options '-{}' and '-{}'",
                    old.letter(),
                    new.letter()
                );
            }
        }
        *current = Some(new);
        Ok(())
    }

    for arg in argv {
        if arg == "--help" {
            print_usage();
            exit_early = true;
        } else if arg == "--version" {
            print_version();
            exit_early = true;
        } else if let Some(letters) = arg.strip_prefix('-') {
            for ch in letters.chars() {
                match ch {
                    'c' => set_mode(&mut op_mode, OpMode::Compress)?,
                    'd' => set_mode(&mut op_mode, OpMode::Decompress)?,
                    'v' => set_mode(&mut op_mode, OpMode::Verify)?,
                    'f' => force_overwrite = true,
                    'r' => warn_not_relocatable = true,
                    'D' => set_display_level(display_level() + 1),
                    'h' => {
                        print_usage();
                        exit_early = true;
                    }
                    _ => bail!("bad usage: unknown option '-{}'", ch),
                }
            }
        } else if input_filename.is_none() {
            input_filename = Some(arg.clone());
        } else if output_filename.is_none() {
            output_filename = Some(arg.clone());
        } else {
            bail!("bad usage: too many filename arguments");
        }
    }

    Ok(ParsedArgs {
        op_mode: op_mode.unwrap_or(OpMode::Compress),
        force_overwrite,
        warn_not_relocatable,
        input_filename,
        output_filename,
        exit_early,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<ParsedArgs> {
        let argv: Vec<String> = args.iter().map(|s| (*s).to_owned()).collect();
        parse_args_from(&argv)
    }

    #[test]
    fn default_mode_is_compress() {
        let args = parse(&["prog.gt1"]).unwrap();
        assert_eq!(args.op_mode, OpMode::Compress);
        assert_eq!(args.input_filename.as_deref(), Some("prog.gt1"));
        assert_eq!(args.output_filename, None);
        assert!(!args.force_overwrite);
    }

    #[test]
    fn aggregated_short_options() {
        let args = parse(&["-dfr", "prog.gt1z", "prog.gt1"]).unwrap();
        assert_eq!(args.op_mode, OpMode::Decompress);
        assert!(args.force_overwrite);
        assert!(args.warn_not_relocatable);
        assert_eq!(args.output_filename.as_deref(), Some("prog.gt1"));
    }

    #[test]
    fn conflicting_modes_are_rejected() {
        let err = parse(&["-c", "-d", "prog.gt1"]).unwrap_err();
        assert!(err.to_string().contains("conflicting options"));
    }

    #[test]
    fn repeated_same_mode_is_fine() {
        let args = parse(&["-v", "-v", "prog.gt1z"]).unwrap();
        assert_eq!(args.op_mode, OpMode::Verify);
    }

    #[test]
    fn unknown_option_is_rejected() {
        assert!(parse(&["-x"]).is_err());
    }

    #[test]
    fn too_many_filenames_are_rejected() {
        assert!(parse(&["a", "b", "c"]).is_err());
    }
}
