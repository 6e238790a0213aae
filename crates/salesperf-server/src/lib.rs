//! HTTP server assembly for the sales performance tracker.
//!
//! Holds the runtime configuration and mounts the JSON API under `/api`
//! with request tracing. The binary in `main.rs` wires these to a SQLite
//! store.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use salesperf_core::store::Backend;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SALESPERF_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl ServerConfig {
  /// Load configuration from an optional file at `path`, overridden by the
  /// environment, on top of built-in defaults.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 3000_i64)?
      .set_default("store_path", "salesperf.db")?
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("SALESPERF"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router: the API nested under `/api`, traced.
pub fn router<B: Backend>(backend: Arc<B>) -> Router {
  Router::new()
    .nest("/api", salesperf_api::api_router(backend))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use std::io;

  use salesperf_core::{
    id::{RecordId, SalesmanId},
    memory::MemoryStore,
    record::{Record, RecordSnapshot},
    salesman::Salesman,
    store::{AppendOutcome, RecordRepository, SalesmanRepository},
  };
  use salesperf_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    router(Arc::new(store))
  }

  async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(json) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string())),
      None => builder.body(Body::empty()),
    }
    .unwrap();
    app.clone().oneshot(req).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn create_record(app: &Router, target: f64, actual: f64) -> Value {
    let resp = send(
      app,
      "POST",
      "/api/performance-records",
      Some(json!({
        "category": "eco",
        "targetValue": target,
        "actualValue": actual,
        "year": 2024
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    json_body(resp).await
  }

  async fn create_salesman(app: &Router, first: &str, last: &str) -> Value {
    let resp = send(
      app,
      "POST",
      "/api/salesmen",
      Some(json!({ "firstname": first, "lastname": last })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    json_body(resp).await
  }

  fn id(v: &Value) -> &str { v["id"].as_str().unwrap() }

  // ── Config ──────────────────────────────────────────────────────────────────

  #[test]
  fn missing_config_file_falls_back_to_defaults() {
    let cfg = ServerConfig::load(Path::new("does-not-exist.toml")).unwrap();
    assert_eq!(cfg.port, 3000);
    assert_eq!(cfg.store_path, PathBuf::from("salesperf.db"));
    assert!(cfg.address().ends_with(":3000"));
  }

  // ── Records ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_record_returns_201_with_derived_bonus() {
    let app = app().await;
    let met = create_record(&app, 100.0, 100.0).await;
    let missed = create_record(&app, 100.0, 80.0).await;
    let exceeded = create_record(&app, 100.0, 120.0).await;
    assert_eq!(met["bonus"], 50);
    assert_eq!(missed["bonus"], 20);
    assert_eq!(exceeded["bonus"], 100);

    let resp = send(&app, "GET", "/api/performance-records", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await.as_array().unwrap().len(), 3);
  }

  #[tokio::test]
  async fn create_record_without_year_returns_400() {
    let app = app().await;
    let resp = send(
      &app,
      "POST",
      "/api/performance-records",
      Some(json!({ "category": "eco", "targetValue": 0, "actualValue": 0 })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn update_ignores_client_bonus() {
    let app = app().await;
    let record = create_record(&app, 10.0, 10.0).await;
    let uri = format!("/api/performance-records/{}", id(&record));

    let resp = send(
      &app,
      "PUT",
      &uri,
      Some(json!({
        "category": "eco",
        "targetValue": 10,
        "actualValue": 3,
        "year": 2024,
        "bonus": 100
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["bonus"], 20);

    let stored = json_body(send(&app, "GET", &uri, None).await).await;
    assert_eq!(stored["bonus"], 20);
    assert_eq!(stored["actualValue"], 3.0);
  }

  #[tokio::test]
  async fn malformed_and_missing_ids_map_to_400_and_404() {
    let app = app().await;
    let bad = send(&app, "GET", "/api/performance-records/not-an-id", None).await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

    let missing = send(
      &app,
      "DELETE",
      "/api/salesmen/00000000-0000-4000-8000-000000000000",
      None,
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
  }

  // ── Salesmen ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_salesman_with_empty_firstname_returns_400() {
    let app = app().await;
    let resp = send(
      &app,
      "POST",
      "/api/salesmen",
      Some(json!({ "firstname": "", "lastname": "B" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let list = json_body(send(&app, "GET", "/api/salesmen", None).await).await;
    assert!(list.as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn update_salesman_returns_204() {
    let app = app().await;
    let salesman = create_salesman(&app, "A", "B").await;
    let uri = format!("/api/salesmen/{}", id(&salesman));

    let resp = send(
      &app,
      "PUT",
      &uri,
      Some(json!({ "firstname": "C", "lastname": "D", "records": [] })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let stored = json_body(send(&app, "GET", &uri, None).await).await;
    assert_eq!(stored["firstname"], "C");
    assert_eq!(stored["lastname"], "D");
  }

  #[tokio::test]
  async fn attach_twice_returns_409() {
    let app = app().await;
    let record = create_record(&app, 1.0, 1.0).await;
    let salesman = create_salesman(&app, "A", "B").await;
    let uri = format!("/api/salesmen/{}/records", id(&salesman));
    let body = json!({ "rid": id(&record) });

    let first = send(&app, "PUT", &uri, Some(body.clone())).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(json_body(first).await["records"].as_array().unwrap().len(), 1);

    let second = send(&app, "PUT", &uri, Some(body)).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn attach_without_rid_returns_400() {
    let app = app().await;
    let salesman = create_salesman(&app, "A", "B").await;
    let uri = format!("/api/salesmen/{}/records", id(&salesman));

    let resp = send(&app, "PUT", &uri, Some(json!({}))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn mistyped_record_body_returns_400_json() {
    let app = app().await;
    let resp = send(
      &app,
      "POST",
      "/api/performance-records",
      Some(json!({
        "category": "eco",
        "targetValue": "10",
        "actualValue": 5,
        "year": 2024
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn non_string_rid_returns_400_json() {
    let app = app().await;
    let salesman = create_salesman(&app, "A", "B").await;
    let uri = format!("/api/salesmen/{}/records", id(&salesman));

    let resp = send(&app, "PUT", &uri, Some(json!({ "rid": 5 }))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());
  }

  #[tokio::test]
  async fn update_with_malformed_snapshot_returns_400_json() {
    let app = app().await;
    let salesman = create_salesman(&app, "A", "B").await;
    let uri = format!("/api/salesmen/{}", id(&salesman));

    let resp = send(
      &app,
      "PUT",
      &uri,
      Some(json!({ "firstname": "A", "lastname": "B", "records": [{ "rid": "x" }] })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].is_string());

    let stored = json_body(send(&app, "GET", &uri, None).await).await;
    assert!(stored["records"].as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn update_passes_snapshot_contents_through() {
    let app = app().await;
    let salesman = create_salesman(&app, "A", "B").await;
    let uri = format!("/api/salesmen/{}", id(&salesman));
    let snapshot = json!({
      "rid": RecordId::generate().to_string(),
      "category": "",
      "targetValue": 1.0,
      "actualValue": 0.0,
      "year": 1999,
      "bonus": 100
    });

    let resp = send(
      &app,
      "PUT",
      &uri,
      Some(json!({ "firstname": "A", "lastname": "B", "records": [snapshot.clone()] })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let stored = json_body(send(&app, "GET", &uri, None).await).await;
    assert_eq!(stored["records"][0], snapshot);
  }

  // ── Store failures ──────────────────────────────────────────────────────────

  /// A [`MemoryStore`] whose snapshot sweep always fails.
  struct SweepDown(MemoryStore);

  impl RecordRepository for SweepDown {
    type Error = io::Error;

    async fn list_records(&self) -> io::Result<Vec<Record>> {
      self.0.list_records().await.map_err(io::Error::other)
    }

    async fn find_record(&self, id: RecordId) -> io::Result<Option<Record>> {
      self.0.find_record(id).await.map_err(io::Error::other)
    }

    async fn insert_record(&self, record: Record) -> io::Result<()> {
      self.0.insert_record(record).await.map_err(io::Error::other)
    }

    async fn replace_record(&self, record: Record) -> io::Result<bool> {
      self.0.replace_record(record).await.map_err(io::Error::other)
    }

    async fn delete_record(&self, id: RecordId) -> io::Result<bool> {
      self.0.delete_record(id).await.map_err(io::Error::other)
    }

    async fn clear_records(&self) -> io::Result<u64> {
      self.0.clear_records().await.map_err(io::Error::other)
    }
  }

  impl SalesmanRepository for SweepDown {
    type Error = io::Error;

    async fn list_salesmen(&self) -> io::Result<Vec<Salesman>> {
      self.0.list_salesmen().await.map_err(io::Error::other)
    }

    async fn find_salesman(&self, id: SalesmanId) -> io::Result<Option<Salesman>> {
      self.0.find_salesman(id).await.map_err(io::Error::other)
    }

    async fn insert_salesman(&self, salesman: Salesman) -> io::Result<()> {
      self.0.insert_salesman(salesman).await.map_err(io::Error::other)
    }

    async fn replace_salesman(&self, salesman: Salesman) -> io::Result<bool> {
      self.0.replace_salesman(salesman).await.map_err(io::Error::other)
    }

    async fn delete_salesman(&self, id: SalesmanId) -> io::Result<bool> {
      self.0.delete_salesman(id).await.map_err(io::Error::other)
    }

    async fn append_snapshot(
      &self,
      id: SalesmanId,
      snapshot: RecordSnapshot,
    ) -> io::Result<AppendOutcome> {
      self.0.append_snapshot(id, snapshot).await.map_err(io::Error::other)
    }

    async fn remove_snapshots(&self, _rid: RecordId) -> io::Result<u64> {
      Err(io::Error::other("snapshot sweep unavailable"))
    }

    async fn clear_salesmen(&self) -> io::Result<u64> {
      self.0.clear_salesmen().await.map_err(io::Error::other)
    }
  }

  #[tokio::test]
  async fn failed_cascade_returns_500_json() {
    let app = router(Arc::new(SweepDown(MemoryStore::new())));
    let record = create_record(&app, 1.0, 1.0).await;
    let uri = format!("/api/performance-records/{}", id(&record));

    let resp = send(&app, "DELETE", &uri, None).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(resp).await["error"], "snapshot sweep unavailable");

    // The record stays deleted.
    let gone = send(&app, "GET", &uri, None).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
  }

  // ── Cleanup ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn cleanup_clears_one_collection() {
    let app = app().await;
    create_record(&app, 1.0, 1.0).await;
    create_salesman(&app, "A", "B").await;

    let resp = send(&app, "DELETE", "/api/cleanup/performance-records", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["deleted"], 1);

    let salesmen = json_body(send(&app, "GET", "/api/salesmen", None).await).await;
    assert_eq!(salesmen.as_array().unwrap().len(), 1);
  }

  // ── End to end ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn deleting_record_removes_it_from_salesman() {
    let app = app().await;
    let record = create_record(&app, 10.0, 10.0).await;
    assert_eq!(record["bonus"], 50);

    let salesman = create_salesman(&app, "A", "B").await;
    let salesman_uri = format!("/api/salesmen/{}", id(&salesman));

    let attached = send(
      &app,
      "PUT",
      &format!("{salesman_uri}/records"),
      Some(json!({ "rid": id(&record) })),
    )
    .await;
    let attached = json_body(attached).await;
    let records = attached["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["rid"], record["id"]);
    assert_eq!(records[0]["bonus"], 50);

    let deleted = send(
      &app,
      "DELETE",
      &format!("/api/performance-records/{}", id(&record)),
      None,
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let refetched = json_body(send(&app, "GET", &salesman_uri, None).await).await;
    assert!(refetched["records"].as_array().unwrap().is_empty());
  }
}
