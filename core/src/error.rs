//! Error type shared by every store implementation.
//!
//! # Design
//! `NotFound` gets a dedicated variant because handlers turn it into a client
//! error, while anything the backend raises is opaque to them and surfaces as
//! a server failure. The backend error is boxed so this crate stays free of
//! any particular database driver.

use std::error::Error as StdError;

/// Errors returned by `TodoSession` and `SessionProvider` operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No row exists with the requested id.
    #[error("todo {id} not found")]
    NotFound { id: i64 },

    /// The storage backend failed (connection loss, pool timeout, constraint violation).
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn StdError + Send + Sync>),
}

impl StoreError {
    /// Wrap a driver error.
    pub fn backend<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }
}
