//! Handlers for `/salesmen` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/salesmen` | Full listing |
//! | `POST`   | `/salesmen` | Body: `{"firstname":"…","lastname":"…"}` |
//! | `GET`    | `/salesmen/:id` | 400 if the id is malformed, 404 if absent |
//! | `PUT`    | `/salesmen/:id` | Body: [`SalesmanUpdate`]; wholesale replace |
//! | `DELETE` | `/salesmen/:id` | Records are not touched |
//! | `PUT`    | `/salesmen/:id/records` | Body: `{"rid":"…"}`; 409 if already attached |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use salesperf_core::{
  salesman::{Salesman, SalesmanDraft, SalesmanUpdate},
  store::Backend,
};
use serde::Deserialize;

use crate::{AppState, error::ApiError, extract::ApiJson};

/// `GET /salesmen`
pub async fn list<B: Backend>(
  State(state): State<AppState<B>>,
) -> Result<Json<Vec<Salesman>>, ApiError> {
  Ok(Json(state.salesmen.list().await?))
}

/// `GET /salesmen/:id`
pub async fn get_one<B: Backend>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
) -> Result<Json<Salesman>, ApiError> {
  Ok(Json(state.salesmen.get(&id).await?))
}

/// `POST /salesmen`: returns 201 and the new [`Salesman`].
pub async fn create<B: Backend>(
  State(state): State<AppState<B>>,
  ApiJson(body): ApiJson<SalesmanDraft>,
) -> Result<impl IntoResponse, ApiError> {
  let salesman = state.salesmen.create(body).await?;
  Ok((StatusCode::CREATED, Json(salesman)))
}

/// `PUT /salesmen/:id`
pub async fn update<B: Backend>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
  ApiJson(body): ApiJson<SalesmanUpdate>,
) -> Result<StatusCode, ApiError> {
  state.salesmen.update(&id, body).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /salesmen/:id`
pub async fn delete_one<B: Backend>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  state.salesmen.delete(&id).await?;
  Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct AttachBody {
  /// Missing is treated like malformed.
  #[serde(default)]
  pub rid: String,
}

/// `PUT /salesmen/:id/records`: returns the updated [`Salesman`].
pub async fn attach<B: Backend>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
  ApiJson(body): ApiJson<AttachBody>,
) -> Result<Json<Salesman>, ApiError> {
  Ok(Json(state.salesmen.attach(&id, &body.rid).await?))
}
