use crate::config::InvalidRowReport;
use crate::domain::deck::import::ImportOutcome;
use crate::domain::deck::ingest::IngestResult;
use tracing::{info, warn};

/// Builds the confirm-upload prompt: the invalid-row report (full rows or a
/// count, per configuration) followed by the proceed question.
pub fn confirm_upload_message(mode: InvalidRowReport, rows: &IngestResult) -> String {
    let mut message = format!("There are {} invalid card(s).", rows.invalid.len());
    if mode == InvalidRowReport::Full {
        for row in &rows.invalid {
            message.push_str(&format!(
                "\n  row {}: {} [{}]",
                row.record.line(),
                row.reason,
                row.record.values().collect::<Vec<_>>().join(", ")
            ));
        }
    }
    message.push_str(&format!(
        "\nProceed to upload the {} valid card(s)?",
        rows.valid.len()
    ));
    message
}

pub fn log_outcome(outcome: &ImportOutcome) {
    match outcome {
        ImportOutcome::NoValidRows { invalid } => {
            warn!(
                "There are no valid cards to upload ({} invalid row(s))",
                invalid
            );
        }
        ImportOutcome::Cancelled => {
            info!("Upload cancelled; no changes made");
        }
        ImportOutcome::Written {
            written,
            skipped_duplicates,
            invalid,
        } => {
            info!("=== Import Summary ===");
            info!("Cards added or updated: {}", written);
            info!("Duplicates kept as-is: {}", skipped_duplicates);
            info!("Invalid rows skipped: {}", invalid);
        }
    }
}
