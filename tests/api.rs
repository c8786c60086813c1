use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use serde_json::{Value, json};
use std::sync::Arc;

use sec_reviewer::app;
use sec_reviewer::content::{ContentLibrary, Topic};
use sec_reviewer::domain::{Card, LearnerId, ProgressDocument, ProgressUpdate, QuestionState};
use sec_reviewer::error::StoreError;
use sec_reviewer::handlers::{LEARNER_ID_HEADER, LEARNER_KIND_HEADER};
use sec_reviewer::state::{AppState, SharedStore};
use sec_reviewer::store::{MemoryStore, ProgressStore, QuestionStates};

fn learner_id() -> HeaderName {
  HeaderName::from_static(LEARNER_ID_HEADER)
}

fn learner_kind() -> HeaderName {
  HeaderName::from_static(LEARNER_KIND_HEADER)
}

fn library() -> ContentLibrary {
  ContentLibrary::from_topics(vec![Topic {
    id: "access-control".into(),
    title: "Access Control".into(),
    flashcards: vec![
      Card::new("access-control-fc-1", "RBAC", "Role-based access control"),
      Card::new("access-control-fc-2", "ABAC", "Attribute-based access control"),
    ],
  }])
  .unwrap()
}

/// Store that never accepts writes; reads fail too when `reads_fail` is set
struct OfflineStore {
  reads_fail: bool,
}

impl OfflineStore {
  fn outage() -> StoreError {
    StoreError::Unavailable("database is locked".into())
  }
}

#[async_trait]
impl ProgressStore for OfflineStore {
  async fn load(&self, _learner: &LearnerId) -> Result<ProgressDocument, StoreError> {
    if self.reads_fail {
      return Err(Self::outage());
    }
    Ok(ProgressDocument::new())
  }

  async fn save(&self, _learner: &LearnerId, _update: ProgressUpdate) -> Result<(), StoreError> {
    Err(Self::outage())
  }

  async fn load_questions(&self, _learner: &LearnerId) -> Result<QuestionStates, StoreError> {
    Err(Self::outage())
  }

  async fn save_question(
    &self,
    _learner: &LearnerId,
    _question_id: &str,
    _state: QuestionState,
  ) -> Result<(), StoreError> {
    Err(Self::outage())
  }
}

fn server_with(store: SharedStore) -> TestServer {
  TestServer::new(app::router(AppState::new(store, library()))).unwrap()
}

fn as_guest(request: TestRequest, id: &'static str) -> TestRequest {
  request.add_header(learner_id(), HeaderValue::from_static(id))
}

async fn start(server: &TestServer, id: &'static str, mode: &str) -> Value {
  let response = as_guest(server.post("/api/topics/access-control/sessions"), id)
    .json(&json!({ "mode": mode }))
    .await;
  response.assert_status(StatusCode::CREATED);
  response.json::<Value>()
}

#[tokio::test]
async fn lists_topics_with_due_counts_for_learners() {
  let server = server_with(Arc::new(MemoryStore::new()));

  let anonymous = server.get("/api/topics").await.json::<Value>();
  assert_eq!(anonymous[0]["id"], "access-control");
  assert_eq!(anonymous[0]["card_count"], 2);
  assert!(anonymous[0].get("due_count").is_none());

  let guest = as_guest(server.get("/api/topics"), "uid-1").await.json::<Value>();
  assert_eq!(guest[0]["due_count"], 2);
}

#[tokio::test]
async fn scheduled_review_flow_persists_progress() {
  let store = Arc::new(MemoryStore::new());
  let server = server_with(store.clone());

  let session = start(&server, "uid-1", "scheduled").await;
  assert_eq!(session["strategy"], "sm2");
  assert_eq!(session["total"], 2);
  assert_eq!(session["current"]["id"], "access-control-fc-1");
  let id = session["session_id"].as_str().unwrap().to_string();
  assert_eq!(id.len(), 32);

  let review = as_guest(server.post(&format!("/api/sessions/{id}/reviews")), "uid-1")
    .json(&json!({ "card_id": "access-control-fc-1", "quality": 4 }))
    .await
    .json::<Value>();
  assert_eq!(review["persisted"], true);
  assert_eq!(review["state"]["interval"], 1);
  assert_eq!(review["state"]["repetition"], 1);
  assert_eq!(review["next"]["id"], "access-control-fc-2");
  assert_eq!(review["finished"], false);

  let stored = store.load(&LearnerId::new("uid-1").unwrap()).await.unwrap();
  assert_eq!(stored.len(), 1);
  assert_eq!(stored.get("access-control-fc-1").unwrap().interval, 1);

  // Graded card is no longer due in a fresh session
  let again = start(&server, "uid-1", "scheduled").await;
  assert_eq!(again["total"], 1);
  assert_eq!(again["current"]["id"], "access-control-fc-2");
}

#[tokio::test]
async fn rejects_bad_reviews_with_status_codes() {
  let server = server_with(Arc::new(MemoryStore::new()));
  let session = start(&server, "uid-1", "scheduled").await;
  let path = format!("/api/sessions/{}/reviews", session["session_id"].as_str().unwrap());

  let cases = [
    (json!({ "card_id": "access-control-fc-1", "quality": 2 }), StatusCode::UNPROCESSABLE_ENTITY),
    (json!({ "card_id": "access-control-fc-1", "quality": 300 }), StatusCode::UNPROCESSABLE_ENTITY),
    (json!({ "card_id": "access-control-fc-1", "quality": -1 }), StatusCode::UNPROCESSABLE_ENTITY),
    (json!({ "card_id": "unknown-fc-1", "quality": 4 }), StatusCode::NOT_FOUND),
    (json!({ "card_id": "access-control-fc-2", "quality": 4 }), StatusCode::CONFLICT),
  ];
  for (body, status) in cases {
    let response = as_guest(server.post(&path), "uid-1")
      .json(&body)
      .expect_failure()
      .await;
    response.assert_status(status);
    assert!(response.json::<Value>()["error"].is_string());
  }

  let current = as_guest(server.get(&format!("/api/sessions/{}", session["session_id"].as_str().unwrap())), "uid-1")
    .await
    .json::<Value>();
  assert_eq!(current["position"], 0);
}

#[tokio::test]
async fn sessions_are_private_to_their_learner() {
  let server = server_with(Arc::new(MemoryStore::new()));
  let session = start(&server, "uid-1", "scheduled").await;
  let path = format!("/api/sessions/{}", session["session_id"].as_str().unwrap());

  as_guest(server.get(&path), "uid-2")
    .expect_failure()
    .await
    .assert_status(StatusCode::NOT_FOUND);
  server
    .get("/api/sessions/00000000000000000000000000000000")
    .expect_failure()
    .await
    .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_topic_and_mode_are_rejected() {
  let server = server_with(Arc::new(MemoryStore::new()));

  server
    .post("/api/topics/cryptography/sessions")
    .json(&json!({}))
    .expect_failure()
    .await
    .assert_status(StatusCode::NOT_FOUND);
  server
    .post("/api/topics/access-control/sessions")
    .json(&json!({ "mode": "cram" }))
    .expect_failure()
    .await
    .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn anonymous_sessions_use_weighted_passes() {
  let store = Arc::new(MemoryStore::new());
  let server = server_with(store.clone());

  let response = server
    .post("/api/topics/access-control/sessions")
    .json(&json!({ "mode": "scheduled" }))
    .await;
  response.assert_status(StatusCode::CREATED);
  let session = response.json::<Value>();
  assert_eq!(session["strategy"], "weight_heuristic");
  let id = session["session_id"].as_str().unwrap().to_string();

  for (card, quality) in [("access-control-fc-1", 5), ("access-control-fc-2", 0)] {
    let review = server
      .post(&format!("/api/sessions/{id}/reviews"))
      .json(&json!({ "card_id": card, "quality": quality }))
      .await
      .json::<Value>();
    assert_eq!(review["persisted"], false);
  }

  let pass = server
    .post(&format!("/api/sessions/{id}/passes"))
    .await
    .json::<Value>();
  assert_eq!(pass["pass"], 2);
  assert_eq!(pass["current"]["id"], "access-control-fc-2");
}

#[tokio::test]
async fn scheduled_sessions_cannot_start_a_new_pass() {
  let server = server_with(Arc::new(MemoryStore::new()));
  let session = start(&server, "uid-1", "scheduled").await;

  as_guest(
    server.post(&format!("/api/sessions/{}/passes", session["session_id"].as_str().unwrap())),
    "uid-1",
  )
  .expect_failure()
  .await
  .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn practice_reviews_leave_progress_untouched() {
  let store = Arc::new(MemoryStore::new());
  let server = server_with(store.clone());

  let session = start(&server, "uid-1", "practice").await;
  assert_eq!(session["kind"], "practice");
  let id = session["session_id"].as_str().unwrap().to_string();

  let review = as_guest(server.post(&format!("/api/sessions/{id}/reviews")), "uid-1")
    .json(&json!({ "card_id": "access-control-fc-1", "quality": 0 }))
    .await
    .json::<Value>();
  assert!(review["state"].is_null());

  let stored = store.load(&LearnerId::new("uid-1").unwrap()).await.unwrap();
  assert!(stored.is_empty());
}

#[tokio::test]
async fn account_upgrade_keeps_progress() {
  let server = server_with(Arc::new(MemoryStore::new()));
  let session = start(&server, "uid-1", "scheduled").await;
  let id = session["session_id"].as_str().unwrap().to_string();
  as_guest(server.post(&format!("/api/sessions/{id}/reviews")), "uid-1")
    .json(&json!({ "card_id": "access-control-fc-1", "quality": 5 }))
    .await
    .assert_status_ok();

  let response = server
    .post("/api/topics/access-control/sessions")
    .add_header(learner_id(), HeaderValue::from_static("uid-1"))
    .add_header(learner_kind(), HeaderValue::from_static("account"))
    .json(&json!({ "mode": "scheduled" }))
    .await;
  assert_eq!(response.json::<Value>()["total"], 1);
}

#[tokio::test]
async fn question_states_round_trip() {
  let server = server_with(Arc::new(MemoryStore::new()));

  server
    .get("/api/questions")
    .expect_failure()
    .await
    .assert_status(StatusCode::UNAUTHORIZED);

  as_guest(server.put("/api/questions/access-control-quiz-1"), "uid-1")
    .json(&json!({ "checked": true, "note": "least privilege" }))
    .await
    .assert_status_ok();
  as_guest(server.put("/api/questions/access-control-fc-1"), "uid-1")
    .json(&json!({ "checked": true }))
    .expect_failure()
    .await
    .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

  let states = as_guest(server.get("/api/questions"), "uid-1").await.json::<Value>();
  assert_eq!(states["access-control-quiz-1"]["checked"], true);
  assert_eq!(states["access-control-quiz-1"]["note"], "least privilege");
  assert!(states.get("access-control-fc-1").is_none());

  as_guest(server.put("/api/questions/access-control-recall-2"), "uid-1")
    .json(&json!({ "checked": false, "note": "review ACL vs capability" }))
    .await
    .assert_status_ok();

  let checked = as_guest(server.get("/api/questions"), "uid-1")
    .add_query_param("filter", "checked")
    .await
    .json::<Value>();
  assert_eq!(checked.as_object().unwrap().len(), 1);
  assert!(checked.get("access-control-quiz-1").is_some());

  let unchecked = as_guest(server.get("/api/questions"), "uid-1")
    .add_query_param("filter", "unchecked")
    .await
    .json::<Value>();
  assert_eq!(unchecked.as_object().unwrap().len(), 1);
  assert!(unchecked.get("access-control-recall-2").is_some());

  let response = as_guest(server.get("/api/questions"), "uid-1")
    .add_query_param("filter", "pending")
    .expect_failure()
    .await;
  response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
  assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn failed_save_is_reported_and_session_advances() {
  let server = server_with(Arc::new(OfflineStore { reads_fail: false }));
  let session = start(&server, "uid-1", "scheduled").await;
  assert_eq!(session["strategy"], "sm2");
  assert!(session.get("degraded").is_none());
  let id = session["session_id"].as_str().unwrap().to_string();

  let review = as_guest(server.post(&format!("/api/sessions/{id}/reviews")), "uid-1")
    .json(&json!({ "card_id": "access-control-fc-1", "quality": 4 }))
    .await;
  review.assert_status_ok();
  let review = review.json::<Value>();
  assert_eq!(review["persisted"], false);
  assert!(review["warning"].as_str().unwrap().contains("database is locked"));
  assert_eq!(review["state"]["interval"], 1);
  assert_eq!(review["next"]["id"], "access-control-fc-2");
}

#[tokio::test]
async fn failed_load_degrades_to_full_deck() {
  let server = server_with(Arc::new(OfflineStore { reads_fail: true }));
  let session = start(&server, "uid-1", "scheduled").await;

  assert_eq!(session["strategy"], "weight_heuristic");
  assert!(session["degraded"].as_str().unwrap().contains("database is locked"));
  assert_eq!(session["total"], 2);
  assert_eq!(session["current"]["id"], "access-control-fc-1");

  let id = session["session_id"].as_str().unwrap().to_string();
  let review = as_guest(server.post(&format!("/api/sessions/{id}/reviews")), "uid-1")
    .json(&json!({ "card_id": "access-control-fc-1", "quality": 0 }))
    .await
    .json::<Value>();
  assert_eq!(review["persisted"], false);
  assert_eq!(review["weight"], 2);
  assert!(review.get("warning").is_none());
}
