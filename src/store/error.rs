use thiserror::Error;

/// Failures reading or writing an entity-set file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("{entity_set}: header is missing column(s) {missing}")]
    Schema {
        entity_set: &'static str,
        missing: String,
    },
    #[error("{entity_set}: malformed row at line {line}: {reason}")]
    Malformed {
        entity_set: &'static str,
        line: u64,
        reason: String,
    },
}
