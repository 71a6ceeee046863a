//! Custom Axum extractors

use axum::extract::{FromRequest, FromRequestParts, Path, Query};
use axum::http::request::Parts;
use todo_core::{ListParams, TodoSession};

use crate::error::ApiError;
use crate::AppState;

/// JSON request body; decode failures become `ApiError::Validation`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Payload<T>(pub T);

/// Integer `{id}` path segment.
#[derive(Debug, Clone, Copy)]
pub struct TodoId(pub i64);

impl<S> FromRequestParts<S> for TodoId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<i64> = Path::from_request_parts(parts, state).await?;
        Ok(Self(id))
    }
}

/// `skip` / `limit` query string.
#[derive(Debug, Clone, Copy)]
pub struct Window(pub ListParams);

impl<S> FromRequestParts<S> for Window
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params): Query<ListParams> = Query::from_request_parts(parts, state).await?;
        Ok(Self(params))
    }
}

/// Database session scoped to one request.
///
/// Acquired from the state's provider before the handler body runs and
/// released when the handler drops it, on every exit path. Handlers that
/// decode a body acquire through `AppState::session` after decoding instead.
pub struct DbSession(pub Box<dyn TodoSession>);

impl FromRequestParts<AppState> for DbSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(state.session().await?))
    }
}
