//! The persistence seam between handlers and storage.
//!
//! # Design
//! A `SessionProvider` is built once per process and shared by every request.
//! Each request asks it for a fresh `TodoSession`, owns that session for the
//! duration of the handler, and releases it by dropping it. Implementations
//! must make `Drop` the release point so an early return, an error or a
//! cancelled request future all give the session back.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{ListParams, Todo, TodoCreate, TodoUpdate};

/// Request-scoped handle to the todo table.
///
/// Every method performs one logical database interaction, and mutations are
/// committed before the method returns.
#[async_trait]
pub trait TodoSession: Send {
    /// Insert a new row and return it with its assigned id.
    async fn create(&mut self, input: TodoCreate) -> Result<Todo, StoreError>;

    /// Return up to `params.limit` rows after skipping `params.skip`, ordered by id.
    async fn list(&mut self, params: ListParams) -> Result<Vec<Todo>, StoreError>;

    async fn get(&mut self, id: i64) -> Result<Todo, StoreError>;

    /// Overwrite every field of row `id` from `input`.
    async fn update(&mut self, id: i64, input: TodoUpdate) -> Result<Todo, StoreError>;

    /// Remove row `id`, returning its last values.
    async fn delete(&mut self, id: i64) -> Result<Todo, StoreError>;
}

/// Process-wide factory for request sessions.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn TodoSession>, StoreError>;
}
