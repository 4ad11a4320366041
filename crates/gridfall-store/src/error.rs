//! Error type for the store layer.

/// Errors that can occur talking to a backing store.
///
/// The core does not retry these; they are logged at the call site and
/// propagated to the nearest external boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend rejected or failed the call.
    #[error("store backend unavailable: {0}")]
    Backend(String),

    /// A stored value could not be encoded or decoded.
    #[error("stored record is malformed: {0}")]
    Malformed(String),
}
