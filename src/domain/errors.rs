/// Errors surfaced by the request service.
///
/// Transfer failures never show up here: they travel in `Response::error`.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0} not initialized")]
    NotInitialized(&'static str),

    #[error("History item {0} not found")]
    NotFound(i64),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
