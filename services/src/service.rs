use db::StoreError;
use thiserror::Error;

/// Every service failure is an external call that was rejected. The message
/// is passed through to clients unchanged.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Warehouse(StoreError),
}
