/// Error types shared across server crates.
///
/// These errors represent failures in infrastructure components that any server in the
/// workspace may hit. Redis failures never appear here: the cache degrades to a no-op
/// instead. Application-specific errors should be defined in each server crate and wrap
/// `CommonError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("embedding error: {0}")]
    Embedding(String),
}
