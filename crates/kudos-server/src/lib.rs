//! HTTP server assembly for the kudos vote recorder.
//!
//! Builds the full application router — public voting API plus the
//! Basic-auth-guarded admin API — over any [`VoteStore`].

pub mod auth;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware};
use kudos_core::{candidate::Candidate, store::VoteStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `kudos.toml` and
/// `KUDOS_`-prefixed environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  pub admin_username:      String,
  /// PHC string produced by argon2; see `--hash-password`.
  pub admin_password_hash: String,
  /// Candidate roster seeded into the store at startup.
  #[serde(default)]
  pub candidates:          Vec<Candidate>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the complete application router.
///
/// Public routes land under `/api`, administrative ones under `/api/admin`
/// behind the Basic-auth middleware.
pub fn router<S>(store: Arc<S>, auth: Arc<AuthConfig>) -> Router
where
  S: VoteStore + 'static,
{
  let admin = kudos_api::admin_router(store.clone())
    .layer(middleware::from_fn_with_state(auth, auth::require_admin));

  Router::new()
    .nest("/api", kudos_api::public_router(store))
    .nest("/api/admin", admin)
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use kudos_store_sqlite::SqliteStore;
  use rand_core::OsRng;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  fn roster() -> Vec<Candidate> {
    vec![
      Candidate { id: 1, name: "Alex Johnson".into(), position: "Team Lead".into() },
      Candidate { id: 2, name: "Maria Garcia".into(), position: "Design Director".into() },
      Candidate { id: 3, name: "James Wilson".into(), position: "Tech Lead".into() },
      Candidate { id: 4, name: "Sarah Chen".into(), position: "Product Manager".into() },
      Candidate { id: 5, name: "David Brown".into(), position: "Marketing Head".into() },
    ]
  }

  async fn make_app(password: &str) -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store.seed_candidates(&roster()).await.unwrap();

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();

    router(
      Arc::new(store),
      Arc::new(AuthConfig {
        username:      "admin".to_string(),
        password_hash: hash,
      }),
    )
  }

  fn xff(ip: &str) -> (header::HeaderName, String) {
    (
      header::HeaderName::from_static("x-forwarded-for"),
      ip.to_string(),
    )
  }

  fn admin_auth(password: &str) -> (header::HeaderName, String) {
    (
      header::AUTHORIZATION,
      format!("Basic {}", B64.encode(format!("admin:{password}"))),
    )
  }

  async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    headers: Vec<(header::HeaderName, String)>,
    body: Option<Value>,
  ) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
      builder = builder.header(name, value);
    }
    let req = match body {
      Some(value) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(value.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
  }

  fn parse(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
  }

  async fn submit(
    app: &Router,
    ip: &str,
    body: Value,
  ) -> (StatusCode, Value) {
    let (status, text) =
      send(app, "POST", "/api/votes", vec![xff(ip)], Some(body)).await;
    (status, parse(&text))
  }

  // ── Submission flow ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn submit_records_vote_and_updates_rankings() {
    let app = make_app("secret").await;

    let (status, body) = submit(
      &app,
      "10.0.0.5",
      json!({ "name": "Ann", "email": "a@x.com", "candidateIds": [1, 2] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert!(body["voterId"].as_str().unwrap().starts_with('P'));

    let (status, text) = send(&app, "GET", "/api/rankings", vec![], None).await;
    assert_eq!(status, StatusCode::OK);
    let rankings = parse(&text);
    assert_eq!(rankings["totalVotes"], json!(2));
    assert_eq!(rankings["rankings"][0]["candidateId"], json!(1));
    assert_eq!(rankings["rankings"][0]["votes"], json!(1));
    assert_eq!(rankings["rankings"][1]["candidateId"], json!(2));
  }

  #[tokio::test]
  async fn duplicate_identity_is_rejected_with_reason() {
    let app = make_app("secret").await;
    let payload = json!({ "name": "Ann", "candidateIds": [1, 2] });

    let (status, _) = submit(&app, "10.0.0.5", payload.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = submit(&app, "10.0.0.5", payload).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["reason"], json!("ALREADY_VOTED"));

    // The rejection moved no tallies: still 2, not 4.
    let (_, text) = send(&app, "GET", "/api/rankings", vec![], None).await;
    assert_eq!(parse(&text)["totalVotes"], json!(2));
  }

  #[tokio::test]
  async fn distinct_identities_are_counted_separately() {
    let app = make_app("secret").await;
    submit(&app, "10.0.0.1", json!({ "candidateIds": [3] })).await;
    submit(&app, "10.0.0.2", json!({ "candidateIds": [3] })).await;

    let (_, text) = send(&app, "GET", "/api/rankings", vec![], None).await;
    let rankings = parse(&text);
    assert_eq!(rankings["totalVotes"], json!(2));
    assert_eq!(rankings["rankings"][0]["candidateId"], json!(3));
    assert_eq!(rankings["rankings"][0]["votes"], json!(2));
  }

  #[tokio::test]
  async fn single_candidate_shape_is_accepted() {
    let app = make_app("secret").await;
    let (status, body) = submit(
      &app,
      "10.0.0.5",
      json!({
        "name": "Ann",
        "candidateId": 3,
        "candidateName": "James Wilson - Tech Lead"
      }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let (_, text) = send(&app, "GET", "/api/rankings", vec![], None).await;
    assert_eq!(parse(&text)["totalVotes"], json!(1));
  }

  #[tokio::test]
  async fn client_token_overrides_network_identity() {
    let app = make_app("secret").await;
    let payload = json!({ "candidateIds": [1], "clientToken": "tok-1" });

    let (status, _) = submit(&app, "10.0.0.1", payload.clone()).await;
    assert_eq!(status, StatusCode::OK);

    // Different address, same token: still a duplicate.
    let (status, body) = submit(&app, "10.0.0.2", payload).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["reason"], json!("ALREADY_VOTED"));
  }

  #[tokio::test]
  async fn empty_name_is_stored_as_anonymous() {
    let app = make_app("secret").await;
    submit(&app, "10.0.0.5", json!({ "name": "", "email": null, "candidateIds": [1] }))
      .await;

    let (status, text) = send(
      &app,
      "GET",
      "/api/admin/votes/records",
      vec![admin_auth("secret")],
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let records = parse(&text);
    assert_eq!(records[0]["voterName"], json!("Anonymous"));
    assert_eq!(records[0]["voterEmail"], json!(null));
  }

  // ── Validation ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn six_selections_are_rejected_without_side_effects() {
    let app = make_app("secret").await;

    let (status, body) = submit(
      &app,
      "10.0.0.5",
      json!({ "name": "Ann", "candidateIds": [1, 2, 3, 4, 5, 6] }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["reason"], json!("TOO_MANY_SELECTIONS"));

    // No record, no tally movement; the identity may still vote.
    let (_, text) = send(&app, "GET", "/api/rankings", vec![], None).await;
    assert_eq!(parse(&text)["totalVotes"], json!(0));
    let (_, text) =
      send(&app, "GET", "/api/votes/status", vec![xff("10.0.0.5")], None).await;
    assert_eq!(parse(&text)["hasVoted"], json!(false));
  }

  #[tokio::test]
  async fn unknown_only_selection_is_rejected() {
    let app = make_app("secret").await;
    let (status, body) =
      submit(&app, "10.0.0.5", json!({ "candidateIds": [98, 99] })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["reason"], json!("UNKNOWN_CANDIDATE"));
  }

  #[tokio::test]
  async fn unknown_ids_are_dropped_when_valid_ones_remain() {
    let app = make_app("secret").await;
    let (status, _) =
      submit(&app, "10.0.0.5", json!({ "candidateIds": [99, 1] })).await;
    assert_eq!(status, StatusCode::OK);

    let (_, text) = send(&app, "GET", "/api/rankings", vec![], None).await;
    assert_eq!(parse(&text)["totalVotes"], json!(1));
  }

  #[tokio::test]
  async fn missing_selection_is_rejected() {
    let app = make_app("secret").await;
    let (status, body) =
      submit(&app, "10.0.0.5", json!({ "name": "Ann" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["reason"], json!("MISSING_FIELD"));
  }

  #[tokio::test]
  async fn malformed_json_is_a_bad_request() {
    let app = make_app("secret").await;
    let req = Request::builder()
      .method("POST")
      .uri("/api/votes")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("{not json"))
      .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Status ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn status_flips_after_voting() {
    let app = make_app("secret").await;

    let (_, text) =
      send(&app, "GET", "/api/votes/status", vec![xff("10.0.0.5")], None).await;
    assert_eq!(parse(&text)["hasVoted"], json!(false));

    submit(&app, "10.0.0.5", json!({ "candidateIds": [1] })).await;

    let (_, text) =
      send(&app, "GET", "/api/votes/status", vec![xff("10.0.0.5")], None).await;
    assert_eq!(parse(&text)["hasVoted"], json!(true));
  }

  // ── Rankings determinism ──────────────────────────────────────────────────

  #[tokio::test]
  async fn rankings_are_sorted_with_deterministic_ties() {
    let app = make_app("secret").await;
    submit(&app, "10.0.0.1", json!({ "candidateIds": [5, 3] })).await;
    submit(&app, "10.0.0.2", json!({ "candidateIds": [3] })).await;

    let (_, text) = send(&app, "GET", "/api/rankings", vec![], None).await;
    let rankings = parse(&text);
    let ids: Vec<i64> = rankings["rankings"]
      .as_array()
      .unwrap()
      .iter()
      .map(|entry| entry["candidateId"].as_i64().unwrap())
      .collect();
    // 3 leads with two votes; 5 has one; 1, 2, 4 tie at zero in id order.
    assert_eq!(ids, vec![3, 5, 1, 2, 4]);
  }

  // ── Admin ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn admin_routes_require_credentials() {
    let app = make_app("secret").await;

    let (status, _) = send(&app, "DELETE", "/api/admin/votes", vec![], None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
      &app,
      "DELETE",
      "/api/admin/votes",
      vec![admin_auth("wrong")],
      None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) =
      send(&app, "GET", "/api/admin/votes/records", vec![], None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn erase_resets_everything_and_reopens_voting() {
    let app = make_app("secret").await;
    submit(&app, "10.0.0.5", json!({ "candidateIds": [1, 2] })).await;

    let (status, _) = send(
      &app,
      "DELETE",
      "/api/admin/votes",
      vec![admin_auth("secret")],
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, text) = send(&app, "GET", "/api/rankings", vec![], None).await;
    let rankings = parse(&text);
    assert_eq!(rankings["totalVotes"], json!(0));
    assert!(
      rankings["rankings"]
        .as_array()
        .unwrap()
        .iter()
        .all(|entry| entry["votes"] == json!(0))
    );

    // The erased identity may vote again.
    let (status, _) =
      submit(&app, "10.0.0.5", json!({ "candidateIds": [1] })).await;
    assert_eq!(status, StatusCode::OK);
  }

  #[tokio::test]
  async fn export_returns_csv_rows() {
    let app = make_app("secret").await;
    submit(
      &app,
      "10.0.0.5",
      json!({ "name": "Ann", "email": "a@x.com", "candidateIds": [1, 2] }),
    )
    .await;

    let (status, text) = send(
      &app,
      "GET",
      "/api/admin/votes/export",
      vec![admin_auth("secret")],
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let mut lines = text.lines();
    assert_eq!(
      lines.next().unwrap(),
      "voter_id,voter_name,voter_email,candidate_ids,voted_at,identity"
    );
    let row = lines.next().unwrap();
    assert!(row.contains("Ann"));
    assert!(row.contains("a@x.com"));
    assert!(row.contains("1;2"));
    assert!(row.ends_with("10.0.0.5"));
  }

  #[tokio::test]
  async fn roster_can_be_extended_and_trimmed() {
    let app = make_app("secret").await;

    let (status, text) = send(
      &app,
      "POST",
      "/api/admin/candidates",
      vec![admin_auth("secret")],
      Some(json!({ "name": "Priya Patel", "position": "Operations Lead" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let added = parse(&text);
    assert_eq!(added["id"], json!(6));

    let (status, _) = send(
      &app,
      "DELETE",
      "/api/admin/candidates/6",
      vec![admin_auth("secret")],
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, text) = send(&app, "GET", "/api/candidates", vec![], None).await;
    let roster = parse(&text);
    assert_eq!(roster.as_array().unwrap().len(), 5);
    assert!(
      roster
        .as_array()
        .unwrap()
        .iter()
        .all(|candidate| candidate["id"] != json!(6))
    );
  }

  #[tokio::test]
  async fn removed_candidate_votes_survive_for_audit() {
    let app = make_app("secret").await;
    submit(&app, "10.0.0.5", json!({ "candidateIds": [1, 2] })).await;

    let (status, _) = send(
      &app,
      "DELETE",
      "/api/admin/candidates/2",
      vec![admin_auth("secret")],
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, text) = send(&app, "GET", "/api/rankings", vec![], None).await;
    let rankings = parse(&text);
    assert_eq!(rankings["totalVotes"], json!(1));
    assert!(
      rankings["rankings"]
        .as_array()
        .unwrap()
        .iter()
        .all(|entry| entry["candidateId"] != json!(2))
    );

    let (_, text) = send(
      &app,
      "GET",
      "/api/admin/votes/records",
      vec![admin_auth("secret")],
      None,
    )
    .await;
    assert_eq!(parse(&text)[0]["candidateIds"], json!([1, 2]));
  }
}
