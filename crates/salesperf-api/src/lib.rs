//! JSON REST API for the sales performance tracker.
//!
//! Exposes an axum [`Router`] backed by any [`salesperf_core::store::Backend`].
//! Transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", salesperf_api::api_router(store.clone()))
//! ```

pub mod cleanup;
pub mod error;
pub mod extract;
pub mod records;
pub mod salesmen;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, put},
};
use salesperf_core::{records::RecordStore, salesmen::SalesmanStore, store::Backend};

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct AppState<B> {
  pub records:  RecordStore<B>,
  pub salesmen: SalesmanStore<B>,
}

impl<B: Backend> AppState<B> {
  pub fn new(backend: Arc<B>) -> Self {
    Self {
      records:  RecordStore::new(Arc::clone(&backend)),
      salesmen: SalesmanStore::new(backend),
    }
  }
}

impl<B> Clone for AppState<B> {
  fn clone(&self) -> Self {
    Self { records: self.records.clone(), salesmen: self.salesmen.clone() }
  }
}

/// Build a fully-materialised API router for `backend`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<B: Backend>(backend: Arc<B>) -> Router<()> {
  Router::new()
    // Salesmen
    .route("/salesmen", get(salesmen::list::<B>).post(salesmen::create::<B>))
    .route(
      "/salesmen/{id}",
      get(salesmen::get_one::<B>)
        .put(salesmen::update::<B>)
        .delete(salesmen::delete_one::<B>),
    )
    .route("/salesmen/{id}/records", put(salesmen::attach::<B>))
    // Performance records
    .route(
      "/performance-records",
      get(records::list::<B>).post(records::create::<B>),
    )
    .route(
      "/performance-records/{id}",
      get(records::get_one::<B>)
        .put(records::update::<B>)
        .delete(records::delete_one::<B>),
    )
    // Bulk reset
    .route("/cleanup/salesmen", delete(cleanup::salesmen::<B>))
    .route("/cleanup/performance-records", delete(cleanup::records::<B>))
    .with_state(AppState::new(backend))
}
