//! Usage and version text for the `gt1z` command-line tool.

use crate::cli::constants::TOOL_NAME;

/// Print brief usage to stderr.
pub fn print_usage() {
    eprintln!("Usage: {} [options] <fin> [fout]", TOOL_NAME);
    eprintln!("Compression tool for gt1 files");
    eprintln!("Options:");
    eprintln!(" -c   Compress GT1 file <fin> into GT1Z file <fout> (default)");
    eprintln!(" -d   Decompress GT1Z file <fin> into GT1 file <fout>");
    eprintln!(" -v   Verify GT1Z file <fin> against GT1 file <fout>");
    eprintln!(" -f   Overwrite an existing output file");
    eprintln!(" -r   Warn if the file is not relocatable");
    eprintln!(" -D   Increase verbosity level");
    eprintln!(" -h   Display this help and exit");
}

/// Print the tool name and version to stdout.
pub fn print_version() {
    println!("{} v{}", TOOL_NAME, crate::version_string());
}
