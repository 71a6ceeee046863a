//! Wire schemas for the todo API.
//!
//! # Design
//! `TodoCreate` and `TodoUpdate` share a shape but are kept as separate types:
//! an update is a full replacement, so every field the client omits falls back
//! to its schema default instead of keeping the stored value. `Todo` is the
//! response shape and always carries every column, with `description` encoded
//! as `null` when absent.

use serde::{Deserialize, Serialize};

/// Page size used by the list operation when the caller omits `limit`.
pub const DEFAULT_LIMIT: u32 = 10;

/// A single todo item as persisted and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

impl Todo {
    /// Overwrite every mutable field from `input`.
    ///
    /// Fields are assigned one by one so the full-replace contract is visible
    /// here: nothing from the previous value survives except `id`.
    pub fn replace_with(&mut self, input: TodoUpdate) {
        self.title = input.title;
        self.description = input.description;
        self.completed = input.completed;
    }
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl TodoCreate {
    /// Build the stored value once the persistence layer has assigned `id`.
    pub fn into_todo(self, id: i64) -> Todo {
        Todo {
            id,
            title: self.title,
            description: self.description,
            completed: self.completed,
        }
    }
}

/// Request payload for replacing an existing todo.
///
/// Omitted fields take their defaults (`description: null`,
/// `completed: false`); they do not leave the stored value untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoUpdate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Offset/limit window for the list operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListParams {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}
