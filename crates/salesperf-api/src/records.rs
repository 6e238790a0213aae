//! Handlers for `/performance-records` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/performance-records` | Full listing |
//! | `POST`   | `/performance-records` | Body: [`RecordDraft`]; returns 201 + stored record |
//! | `GET`    | `/performance-records/:id` | 400 if the id is malformed, 404 if absent |
//! | `PUT`    | `/performance-records/:id` | Body: [`RecordDraft`]; bonus is re-derived |
//! | `DELETE` | `/performance-records/:id` | Also removes the record from every salesman |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use salesperf_core::{
  record::{Record, RecordDraft},
  store::Backend,
};

use crate::{AppState, error::ApiError, extract::ApiJson};

/// `GET /performance-records`
pub async fn list<B: Backend>(
  State(state): State<AppState<B>>,
) -> Result<Json<Vec<Record>>, ApiError> {
  Ok(Json(state.records.list().await?))
}

/// `GET /performance-records/:id`
pub async fn get_one<B: Backend>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
) -> Result<Json<Record>, ApiError> {
  Ok(Json(state.records.get(&id).await?))
}

/// `POST /performance-records`: returns 201 and the stored [`Record`].
pub async fn create<B: Backend>(
  State(state): State<AppState<B>>,
  ApiJson(body): ApiJson<RecordDraft>,
) -> Result<impl IntoResponse, ApiError> {
  let record = state.records.create(body).await?;
  Ok((StatusCode::CREATED, Json(record)))
}

/// `PUT /performance-records/:id`: returns the updated [`Record`].
pub async fn update<B: Backend>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
  ApiJson(body): ApiJson<RecordDraft>,
) -> Result<Json<Record>, ApiError> {
  Ok(Json(state.records.update(&id, body).await?))
}

/// `DELETE /performance-records/:id`: 204 once the cascade has run.
pub async fn delete_one<B: Backend>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  state.records.delete(&id).await?;
  Ok(StatusCode::NO_CONTENT)
}
