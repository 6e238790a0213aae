//! Bulk-reset handlers. Each clears one collection and never cascades.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `DELETE` | `/cleanup/salesmen` | Returns `{"deleted": n}` |
//! | `DELETE` | `/cleanup/performance-records` | Snapshots in salesmen are kept |

use axum::{Json, extract::State};
use salesperf_core::store::Backend;
use serde::Serialize;

use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct Cleared {
  pub deleted: u64,
}

/// `DELETE /cleanup/salesmen`
pub async fn salesmen<B: Backend>(
  State(state): State<AppState<B>>,
) -> Result<Json<Cleared>, ApiError> {
  let deleted = state.salesmen.clear().await?;
  Ok(Json(Cleared { deleted }))
}

/// `DELETE /cleanup/performance-records`
pub async fn records<B: Backend>(
  State(state): State<AppState<B>>,
) -> Result<Json<Cleared>, ApiError> {
  let deleted = state.records.clear().await?;
  Ok(Json(Cleared { deleted }))
}
