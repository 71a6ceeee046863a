//! SQLite persistence for todos.
//!
//! `SqliteStore` owns the process-wide `SqlitePool`. Each request session
//! holds one `PoolConnection`, which goes back to the pool when the session is
//! dropped. Every mutation is a single autocommitted statement with a
//! `RETURNING` clause, so the row handed back is the committed one.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, Sqlite, SqlitePool};
use todo_core::{ListParams, SessionProvider, StoreError, Todo, TodoCreate, TodoSession, TodoUpdate};

pub const MEMORY_URL: &str = "sqlite::memory:";

// AUTOINCREMENT keeps ids monotonic: SQLite would otherwise reuse the largest
// id after that row is deleted.
const CREATE_TODOS: &str = r#"
CREATE TABLE IF NOT EXISTS todos (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT    NOT NULL,
    description TEXT,
    completed   BOOLEAN NOT NULL DEFAULT 0
)
"#;

/// Stored row of the `todos` table.
#[derive(Debug, Clone, FromRow)]
pub struct TodoRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            completed: row.completed,
        }
    }
}

/// Create the schema if it does not exist yet.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_TODOS).execute(pool).await?;
    Ok(())
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// `SessionProvider` backed by a SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `database_url` and run migrations.
    ///
    /// An in-memory database exists only as long as its connection does, so for
    /// those URLs the pool is pinned to a single connection that never expires.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool_options = if is_in_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };

        let pool = pool_options.connect_with(options).await?;
        migrate(&pool).await?;

        tracing::debug!(database_url, "sqlite store ready");
        Ok(Self { pool })
    }

    /// Fresh, empty in-memory database.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        Self::connect(MEMORY_URL, 1).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl SessionProvider for SqliteStore {
    async fn acquire(&self) -> Result<Box<dyn TodoSession>, StoreError> {
        let conn = self.pool.acquire().await.map_err(StoreError::backend)?;
        Ok(Box::new(SqliteSession { conn }))
    }
}

/// One pooled connection, returned to the pool on drop.
pub struct SqliteSession {
    conn: PoolConnection<Sqlite>,
}

#[async_trait]
impl TodoSession for SqliteSession {
    async fn create(&mut self, input: TodoCreate) -> Result<Todo, StoreError> {
        let row: TodoRow = sqlx::query_as(
            r#"
            INSERT INTO todos (title, description, completed)
            VALUES (?, ?, ?)
            RETURNING id, title, description, completed
            "#,
        )
        .bind(input.title)
        .bind(input.description)
        .bind(input.completed)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(StoreError::backend)?;

        Ok(row.into())
    }

    async fn list(&mut self, params: ListParams) -> Result<Vec<Todo>, StoreError> {
        let rows: Vec<TodoRow> = sqlx::query_as(
            r#"
            SELECT id, title, description, completed
            FROM todos
            ORDER BY id
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(i64::from(params.limit))
        .bind(i64::from(params.skip))
        .fetch_all(&mut *self.conn)
        .await
        .map_err(StoreError::backend)?;

        Ok(rows.into_iter().map(Todo::from).collect())
    }

    async fn get(&mut self, id: i64) -> Result<Todo, StoreError> {
        let row: Option<TodoRow> = sqlx::query_as(
            "SELECT id, title, description, completed FROM todos WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(StoreError::backend)?;

        row.map(Todo::from).ok_or(StoreError::NotFound { id })
    }

    async fn update(&mut self, id: i64, input: TodoUpdate) -> Result<Todo, StoreError> {
        // Every column is written, whatever the client sent.
        let row: Option<TodoRow> = sqlx::query_as(
            r#"
            UPDATE todos
            SET title = ?, description = ?, completed = ?
            WHERE id = ?
            RETURNING id, title, description, completed
            "#,
        )
        .bind(input.title)
        .bind(input.description)
        .bind(input.completed)
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(StoreError::backend)?;

        row.map(Todo::from).ok_or(StoreError::NotFound { id })
    }

    async fn delete(&mut self, id: i64) -> Result<Todo, StoreError> {
        let row: Option<TodoRow> = sqlx::query_as(
            "DELETE FROM todos WHERE id = ? RETURNING id, title, description, completed",
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(StoreError::backend)?;

        row.map(Todo::from).ok_or(StoreError::NotFound { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(title: &str) -> TodoCreate {
        TodoCreate {
            title: title.to_string(),
            description: None,
            completed: false,
        }
    }

    #[test]
    fn detects_in_memory_urls() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:todos?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://todos.db"));
    }

    #[tokio::test]
    async fn in_memory_pool_has_one_connection() {
        let store = SqliteStore::in_memory().await.unwrap();
        assert_eq!(store.pool().options().get_max_connections(), 1);
    }

    #[tokio::test]
    async fn migrate_is_idempotent() {
        let store = SqliteStore::in_memory().await.unwrap();
        migrate(store.pool()).await.unwrap();
        migrate(store.pool()).await.unwrap();
    }

    #[tokio::test]
    async fn deleting_the_newest_row_does_not_free_its_id() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut session = store.acquire().await.unwrap();

        let first = session.create(create("first")).await.unwrap();
        let second = session.create(create("second")).await.unwrap();
        session.delete(second.id).await.unwrap();
        let third = session.create(create("third")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn stored_values_map_back_to_the_wire_shape() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut session = store.acquire().await.unwrap();

        let created = session
            .create(TodoCreate {
                title: "Buy milk".to_string(),
                description: Some("2 litres".to_string()),
                completed: true,
            })
            .await
            .unwrap();

        let fetched = session.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.description.as_deref(), Some("2 litres"));
        assert!(fetched.completed);
    }

    #[tokio::test]
    async fn update_writes_every_column() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut session = store.acquire().await.unwrap();

        let created = session
            .create(TodoCreate {
                title: "Walk dog".to_string(),
                description: Some("twice".to_string()),
                completed: true,
            })
            .await
            .unwrap();

        let updated = session
            .update(
                created.id,
                TodoUpdate {
                    title: "Walk cat".to_string(),
                    description: None,
                    completed: false,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Walk cat");
        assert!(updated.description.is_none());
        assert!(!updated.completed);
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut session = store.acquire().await.unwrap();

        assert!(matches!(
            session.get(9).await.unwrap_err(),
            StoreError::NotFound { id: 9 }
        ));
        assert!(matches!(
            session.delete(9).await.unwrap_err(),
            StoreError::NotFound { id: 9 }
        ));
    }

    #[tokio::test]
    async fn session_returns_its_connection_when_dropped() {
        let store = SqliteStore::in_memory().await.unwrap();

        let session = store.acquire().await.unwrap();
        drop(session);

        // With a single-connection pool this only succeeds once the first session is gone.
        let mut session = tokio::time::timeout(std::time::Duration::from_secs(5), store.acquire())
            .await
            .expect("connection was not released")
            .unwrap();
        session.list(ListParams::default()).await.unwrap();
    }
}
