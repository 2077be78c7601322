use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors surfaced by the repositories and the reset engine.
///
/// Expected conditions are returned, never panicked.  Raw store errors are
/// converted to [`CoreError::StoreUnavailable`] at the repository boundary
/// so callers only ever see this taxonomy.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Caller-supplied data was rejected (empty item name, mismatched
    /// reorder sequence).  Never worth retrying unchanged.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The referenced checklist item does not exist.
    #[error("no checklist item with id '{0}'")]
    NotFound(String),

    /// The underlying key-value store failed.  Write paths guarantee
    /// nothing about persisted state after this; callers retry by
    /// re-invoking the whole operation.
    #[error("storage unavailable: {0}")]
    StoreUnavailable(#[from] lastcheck_store::StoreError),
}
