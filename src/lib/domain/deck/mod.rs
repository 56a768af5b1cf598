pub mod import;
pub mod ingest;
pub mod reconcile;
pub mod setup;
pub mod summary;
pub mod write;

pub use import::{ImportOutcome, run_import};
pub use ingest::{IngestResult, InvalidRow, ingest_deck_file};
pub use reconcile::resolve_duplicates;
pub use summary::log_outcome;
pub use write::write_cards;
