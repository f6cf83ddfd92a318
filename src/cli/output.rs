//! Output formatting for CLI

use crate::validation::ValidationOutcome;

/// Format a validation outcome for stdout.
///
/// Quiet mode keeps only the final verdict line of the transcript.
pub fn format_outcome(outcome: &ValidationOutcome, quiet: bool) -> String {
    if !quiet {
        return outcome.log.clone();
    }
    if outcome.passed {
        "Successful validation".to_string()
    } else {
        "Failed validation".to_string()
    }
}
