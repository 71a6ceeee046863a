//! Process-local store used to run handlers without a database.
//!
//! Rows live in a `BTreeMap` so listing walks them in id order, matching the
//! SQL store. Ids come from a counter that only moves forward, so an id freed
//! by a delete is never handed out again.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::{SessionProvider, TodoSession};
use crate::types::{ListParams, Todo, TodoCreate, TodoUpdate};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, Todo>,
    last_id: i64,
}

/// In-memory `SessionProvider`. Cloning shares the same table.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    table: Arc<RwLock<Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently stored.
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionProvider for MemoryStore {
    async fn acquire(&self) -> Result<Box<dyn TodoSession>, StoreError> {
        Ok(Box::new(MemorySession {
            table: Arc::clone(&self.table),
        }))
    }
}

/// Session over a `MemoryStore`; holds a reference to the shared table until dropped.
#[derive(Debug)]
pub struct MemorySession {
    table: Arc<RwLock<Table>>,
}

#[async_trait]
impl TodoSession for MemorySession {
    async fn create(&mut self, input: TodoCreate) -> Result<Todo, StoreError> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let todo = input.into_todo(table.last_id);
        table.rows.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn list(&mut self, params: ListParams) -> Result<Vec<Todo>, StoreError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .skip(params.skip as usize)
            .take(params.limit as usize)
            .cloned()
            .collect())
    }

    async fn get(&mut self, id: i64) -> Result<Todo, StoreError> {
        let table = self.table.read().await;
        table.rows.get(&id).cloned().ok_or(StoreError::NotFound { id })
    }

    async fn update(&mut self, id: i64, input: TodoUpdate) -> Result<Todo, StoreError> {
        let mut table = self.table.write().await;
        let todo = table.rows.get_mut(&id).ok_or(StoreError::NotFound { id })?;
        todo.replace_with(input);
        Ok(todo.clone())
    }

    async fn delete(&mut self, id: i64) -> Result<Todo, StoreError> {
        let mut table = self.table.write().await;
        table.rows.remove(&id).ok_or(StoreError::NotFound { id })
    }
}
