//! Rendering of one result line.

use crate::host::Host;
use crate::outcome::Outcome;

/// Minimum width of the host column.
pub const HOST_WIDTH: usize = 9;

/// Printed in front of the reason of a failed host.
pub const FAILURE_MARKER: &str = "failed!";

/// Formats the line printed for `host`.
///
/// Output that doesn't end in a newline (including no output at all) gets `placeholder`
/// appended, so an idle host with nothing to say still shows up as a complete line.
pub fn format_line(host: &Host, outcome: &Outcome, placeholder: &str) -> String {
    let mut line = format!("{:<width$} ", host, width = HOST_WIDTH);
    match outcome {
        Outcome::Failed(reason) => {
            line.push_str(FAILURE_MARKER);
            line.push(' ');
            line.push_str(reason);
            line.push('\n');
        }
        Outcome::Completed(text) => {
            line.push_str(text);
            if !text.ends_with('\n') {
                line.push_str(placeholder);
                line.push('\n');
            }
        }
    }
    line
}
