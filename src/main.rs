//! Binary entry point for the `gt1z` command-line tool.
//!
//! Handles post-parse validation, suffix-based output filename resolution,
//! the overwrite policy, and operation dispatch (compress, decompress,
//! verify).

use std::path::Path;

use gt1z::cli::args::{parse_args, OpMode, ParsedArgs};
use gt1z::cli::constants::{GT1Z_EXTENSION, GT1_EXTENSION};
use gt1z::cli::help::print_usage;
use gt1z::displaylevel;
use gt1z::io::{compress_file, decompress_file, verify_file};

/// Resolve the output filename from the input and the expected suffixes,
/// warning (never failing) when a name does not carry the suffix its role
/// suggests.
fn resolve_filenames(
    input: &str,
    output: Option<String>,
    suffix_in: &str,
    suffix_out: &str,
) -> String {
    let mut output = output;
    if let Some(base) = input.strip_suffix(suffix_in) {
        if output.is_none() {
            output = Some(format!("{}{}", base, suffix_out));
        }
    } else {
        displaylevel!(
            1,
            "gt1z: warning: filename '{}' does not end with suffix '{}'\n",
            input,
            suffix_in
        );
    }
    let output = output.unwrap_or_else(|| format!("{}{}", input, suffix_out));
    if !output.ends_with(suffix_out) {
        displaylevel!(
            1,
            "gt1z: warning: filename '{}' does not end with suffix '{}'\n",
            output,
            suffix_out
        );
    }
    output
}

/// Execute the operation selected by argument parsing.
///
/// Returns the process exit code (0 = success, non-zero = error).
fn run(args: ParsedArgs) -> i32 {
    let Some(input) = args.input_filename else {
        print_usage();
        return 1;
    };

    let (suffix_in, suffix_out) = match args.op_mode {
        OpMode::Compress => (GT1_EXTENSION, GT1Z_EXTENSION),
        OpMode::Decompress | OpMode::Verify => (GT1Z_EXTENSION, GT1_EXTENSION),
    };
    let output = resolve_filenames(&input, args.output_filename, suffix_in, suffix_out);

    // Verify only reads; the other modes honor the overwrite policy.
    if args.op_mode != OpMode::Verify && !args.force_overwrite && Path::new(&output).exists() {
        eprintln!("gt1z: error: not overwriting file '{}'", output);
        return 1;
    }

    let result = match args.op_mode {
        OpMode::Compress => compress_file(&input, &output),
        OpMode::Decompress => decompress_file(&input, &output),
        OpMode::Verify => verify_file(&input, &output),
    };

    match result {
        Ok(relocatable) => {
            if args.warn_not_relocatable && !relocatable {
                let name = match args.op_mode {
                    OpMode::Compress => &output,
                    _ => &input,
                };
                displaylevel!(1, "gt1z: warning: file '{}' is not relocatable\n", name);
            }
            0
        }
        Err(e) => {
            eprintln!("gt1z: error: {}", e);
            1
        }
    }
}

fn main() {
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("gt1z: error: {}", e);
            std::process::exit(1);
        }
    };

    // Help / version flags already produced their output.
    if args.exit_early {
        std::process::exit(0);
    }

    std::process::exit(run(args));
}
