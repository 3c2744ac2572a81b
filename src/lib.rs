pub mod codons;
pub mod config;
pub mod error;
pub mod insights;
pub mod llm_client;
pub mod prompt;
pub mod protein_window;
pub mod report;
pub mod rna_window;
pub mod sections;
pub mod sequence_window;
pub mod snapshot;

pub use error::{InsightError, InsightErrorKind};
pub use insights::{generate_structured_insights, InsightPayload};
pub use llm_client::InsightClient;
pub use protein_window::build_protein_cards_from_sequences;
pub use rna_window::build_rna_windows;
pub use sequence_window::build_windows;
pub use snapshot::SnapshotResolver;
