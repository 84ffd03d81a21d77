//! CLI output: error mapping from dispatch errors to the stderr surface.

use crate::cli::PROGRAM_NAME;
use crate::error::DispatchError;

/// Map a dispatch error to the line printed on stderr.
///
/// Usage errors are rendered by clap itself and are returned untouched.
pub fn map_error(e: &DispatchError) -> String {
    match e {
        DispatchError::Usage(err) => err.render().to_string(),
        other => format!("{}: {}", PROGRAM_NAME, other),
    }
}
