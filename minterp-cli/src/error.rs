// ============================================================================
// minterp-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Result alias and checks performed before a run

use minterp_core::{CoreError, CoreResult};
use std::path::Path;

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Fails with a probe error unless `input` is an existing regular file.
pub fn ensure_input_file(input: &Path) -> CliResult<()> {
    if input.is_file() {
        Ok(())
    } else {
        Err(CoreError::Probe(format!(
            "input file not found: {}",
            input.display()
        )))
    }
}
