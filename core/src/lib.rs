//! Domain core for the todo service.
//!
//! # Overview
//! Defines the wire schemas, the storage error type and the
//! `SessionProvider` / `TodoSession` seam that request handlers talk to. No
//! HTTP and no SQL live here; the server crate supplies both.
//!
//! # Design
//! - Schemas are plain serde types, so the HTTP layer validates a request
//!   simply by decoding it.
//! - Update is a full replacement: `TodoUpdate` has the same shape as
//!   `TodoCreate` and `Todo::replace_with` overwrites every field.
//! - `MemoryStore` implements the seam without a database so handlers can be
//!   exercised in isolation.

pub mod error;
pub mod memory;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::{SessionProvider, TodoSession};
pub use types::{ListParams, Todo, TodoCreate, TodoUpdate, DEFAULT_LIMIT};
