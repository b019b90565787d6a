//! Command Materialization
//!
//! Turns the configured command template into a concrete shell command line.

use std::path::Path;

/// Placeholder replaced by the quoted input file path.
pub const INPUT_PLACEHOLDER: &str = "{input}";
/// Placeholder replaced by the quoted output file path.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Replace every `{input}` / `{output}` placeholder with the double-quoted path.
///
/// Quotes embedded in the paths are not escaped.
pub fn materialize_command(template: &str, input_path: &Path, output_path: &Path) -> String {
    template
        .replace(INPUT_PLACEHOLDER, &quoted(input_path))
        .replace(OUTPUT_PLACEHOLDER, &quoted(output_path))
}

fn quoted(path: &Path) -> String {
    format!("\"{}\"", path.to_string_lossy())
}
