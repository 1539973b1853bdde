//! HTTP service exposing the roster over JSON.
//!
//! ## Routes
//!
//! - `GET /students` — all students.
//! - `POST /students` — add one; 400 when a required name is missing,
//!   500 on storage failure. Body: `{firstName, lastName, middleName,
//!   contacts?, groupId?}`.
//! - `DELETE /students/:id` — remove by id (idempotent).
//! - `POST /students/random` — seed `amount` (default 10) random students.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::db::StudentDb;
use crate::error::StorageError;
use crate::roster::types::NewStudent;

/// Build the router over the given persistence adapter.
pub fn router(db: Arc<StudentDb>) -> Router {
  Router::new()
    .route("/students", get(list_students).post(add_student))
    .route("/students/random", post(add_random_students))
    .route("/students/:id", delete(delete_student))
    .with_state(db)
}

/// Serve the roster API at the given address (e.g. `"127.0.0.1:3000"`).
pub async fn serve(db: Arc<StudentDb>, addr: &str) -> Result<(), std::io::Error> {
  let app = router(db);
  let listener = tokio::net::TcpListener::bind(addr).await?;
  tracing::info!(%addr, "roster service listening");
  axum::serve(listener, app).await
}

async fn list_students(State(db): State<Arc<StudentDb>>) -> impl IntoResponse {
  match db.list_students() {
    Ok(students) => (StatusCode::OK, Json(students)).into_response(),
    Err(e) => storage_failure("list students", e),
  }
}

async fn add_student(
  State(db): State<Arc<StudentDb>>,
  Json(new): Json<NewStudent>,
) -> impl IntoResponse {
  if let Err(e) = new.validate() {
    return (StatusCode::BAD_REQUEST, Json(json!({ "message": e.to_string() }))).into_response();
  }

  match db.insert_student(&new) {
    Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
    Err(e) => storage_failure("add student", e),
  }
}

async fn delete_student(
  State(db): State<Arc<StudentDb>>,
  Path(id): Path<i64>,
) -> impl IntoResponse {
  match db.delete_student(id) {
    Ok(()) => (StatusCode::OK, Json(json!({ "id": id }))).into_response(),
    Err(e) => storage_failure("delete student", e),
  }
}

#[derive(Debug, Deserialize)]
struct RandomRequest {
  #[serde(default = "default_amount")]
  amount: usize,
}

fn default_amount() -> usize {
  10
}

async fn add_random_students(
  State(db): State<Arc<StudentDb>>,
  body: Option<Json<RandomRequest>>,
) -> impl IntoResponse {
  let amount = body.map(|Json(r)| r.amount).unwrap_or_else(default_amount);

  match db.insert_random_students(amount) {
    Ok(names) => (StatusCode::CREATED, Json(names)).into_response(),
    Err(e) => storage_failure("seed students", e),
  }
}

fn storage_failure(operation: &str, e: StorageError) -> axum::response::Response {
  error!(%operation, error = %e, "storage operation failed");
  (
    StatusCode::INTERNAL_SERVER_ERROR,
    Json(json!({ "message": format!("failed to {operation}") })),
  )
    .into_response()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::TransportError;
  use crate::roster::client::RosterClient;

  /// Start a fresh service on an ephemeral port, return its base URL.
  async fn start_server() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let db = Arc::new(StudentDb::new(dir.path().join("roster.db")));
    let app = router(db);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
    });
    (dir, format!("http://{addr}"))
  }

  fn valid_body() -> serde_json::Value {
    json!({ "firstName": "Ivan", "lastName": "Petrov", "middleName": "Ivanovich" })
  }

  #[tokio::test]
  async fn test_post_with_missing_names_is_rejected() {
    let (_dir, base) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
      .post(format!("{base}/students"))
      .json(&json!({ "lastName": "X" }))
      .send()
      .await
      .unwrap();
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("required"));

    // Nothing was inserted
    let list: Vec<serde_json::Value> = client
      .get(format!("{base}/students"))
      .send()
      .await
      .unwrap()
      .json()
      .await
      .unwrap();
    assert!(list.is_empty());
  }

  #[tokio::test]
  async fn test_post_defaults_group_id_to_one() {
    let (_dir, base) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
      .post(format!("{base}/students"))
      .json(&valid_body())
      .send()
      .await
      .unwrap();
    assert_eq!(resp.status(), 201);

    let created: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(created["groupId"], 1);
    assert!(created["id"].as_i64().unwrap() > 0);
  }

  #[tokio::test]
  async fn test_post_does_not_persist_contacts() {
    let (_dir, base) = start_server().await;
    let client = reqwest::Client::new();

    let mut body = valid_body();
    body["contacts"] = json!("ivan@example.com");
    let resp = client
      .post(format!("{base}/students"))
      .json(&body)
      .send()
      .await
      .unwrap();
    assert_eq!(resp.status(), 201);

    let list: Vec<serde_json::Value> = client
      .get(format!("{base}/students"))
      .send()
      .await
      .unwrap()
      .json()
      .await
      .unwrap();
    assert!(list[0].get("contacts").is_none());
  }

  #[tokio::test]
  async fn test_list_returns_students_in_id_order() {
    let (_dir, base) = start_server().await;
    let client = reqwest::Client::new();

    for last in ["Petrov", "Sidorov"] {
      let mut body = valid_body();
      body["lastName"] = json!(last);
      client
        .post(format!("{base}/students"))
        .json(&body)
        .send()
        .await
        .unwrap();
    }

    let list: Vec<serde_json::Value> = client
      .get(format!("{base}/students"))
      .send()
      .await
      .unwrap()
      .json()
      .await
      .unwrap();
    assert_eq!(list.len(), 2);
    assert!(list[0]["id"].as_i64().unwrap() < list[1]["id"].as_i64().unwrap());
    assert_eq!(list[0]["lastName"], "Petrov");
  }

  #[tokio::test]
  async fn test_delete_removes_and_is_idempotent() {
    let (_dir, base) = start_server().await;
    let client = reqwest::Client::new();

    let created: serde_json::Value = client
      .post(format!("{base}/students"))
      .json(&valid_body())
      .send()
      .await
      .unwrap()
      .json()
      .await
      .unwrap();
    let id = created["id"].as_i64().unwrap();

    let resp = client
      .delete(format!("{base}/students/{id}"))
      .send()
      .await
      .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["id"], id);

    // Deleting again still succeeds
    let resp = client
      .delete(format!("{base}/students/{id}"))
      .send()
      .await
      .unwrap();
    assert_eq!(resp.status(), 200);

    let list: Vec<serde_json::Value> = client
      .get(format!("{base}/students"))
      .send()
      .await
      .unwrap()
      .json()
      .await
      .unwrap();
    assert!(list.is_empty());
  }

  #[tokio::test]
  async fn test_seed_random_students() {
    let (_dir, base) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
      .post(format!("{base}/students/random"))
      .json(&json!({ "amount": 3 }))
      .send()
      .await
      .unwrap();
    assert_eq!(resp.status(), 201);

    let list: Vec<serde_json::Value> = client
      .get(format!("{base}/students"))
      .send()
      .await
      .unwrap()
      .json()
      .await
      .unwrap();
    assert_eq!(list.len(), 3);
  }

  #[tokio::test]
  async fn test_roster_client_roundtrip() {
    let (_dir, base) = start_server().await;
    let client = RosterClient::new(base);

    let created = client
      .add_student(&NewStudent {
        first_name: "Ivan".into(),
        last_name: "Petrov".into(),
        middle_name: "Ivanovich".into(),
        ..Default::default()
      })
      .await
      .unwrap();
    assert!(created.id > 0);
    assert_eq!(created.group_id, 1);

    let students = client.list_students().await.unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].id, created.id);

    assert_eq!(client.delete_student(created.id).await.unwrap(), created.id);
    assert!(client.list_students().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_roster_client_surfaces_rejection_as_status_error() {
    let (_dir, base) = start_server().await;
    let client = RosterClient::new(base);

    let err = client
      .add_student(&NewStudent::default())
      .await
      .unwrap_err();
    match err {
      TransportError::Status { status, message } => {
        assert_eq!(status, 400);
        assert!(message.contains("required"));
      }
      other => panic!("expected Status error, got {other:?}"),
    }
  }
}
