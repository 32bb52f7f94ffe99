//! Handlers for `/votes` — submission, status, the record list, erase-all.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/votes` | Submit a vote; 403 on a duplicate identity |
//! | `GET`    | `/votes/status` | Has the caller's identity voted? |
//! | `GET`    | `/votes/records` | Admin: full insertion-ordered list |
//! | `DELETE` | `/votes` | Admin: erase everything; idempotent |

use std::{net::SocketAddr, sync::Arc};

use axum::{
  Json,
  extract::{ConnectInfo, Request, State},
  http::StatusCode,
  response::IntoResponse,
};
use kudos_core::{
  store::VoteStore,
  submission::Submission,
  vote::{VoteRecord, VoterId},
};
use serde::Serialize;

use crate::{error::ApiError, identity};

const BODY_LIMIT: usize = 64 * 1024;

// ─── Submit ──────────────────────────────────────────────────────────────────

/// Body of a successful submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
  pub success:  bool,
  pub voter_id: VoterId,
  pub message:  &'static str,
}

/// `POST /votes` — the submit-vote entry point.
///
/// The request is taken whole: the peer address lives in the extensions and
/// the client token inside the JSON body, and both feed identity resolution
/// before the payload is normalized against the active roster.
pub async fn submit<S>(
  State(store): State<Arc<S>>,
  req: Request,
) -> Result<impl IntoResponse, ApiError>
where
  S: VoteStore,
{
  let (parts, body) = req.into_parts();
  let peer = parts
    .extensions
    .get::<ConnectInfo<SocketAddr>>()
    .map(|info| info.0);

  let bytes = axum::body::to_bytes(body, BODY_LIMIT)
    .await
    .map_err(|_| ApiError::BadRequest("request body too large".to_string()))?;
  let submission: Submission = serde_json::from_slice(&bytes)
    .map_err(|e| ApiError::BadRequest(format!("malformed payload: {e}")))?;

  let identity =
    identity::resolve(&parts.headers, peer, submission.client_token.as_deref());

  let roster = store.list_candidates().await?;
  let vote = submission.normalize(&roster, identity)?;
  let record = store.record_vote(vote).await?;

  tracing::info!(
    voter_id = %record.voter_id,
    awards = record.candidate_ids.len(),
    "vote recorded"
  );

  Ok(Json(SubmitResponse {
    success:  true,
    voter_id: record.voter_id,
    message:  "Vote submitted successfully!",
  }))
}

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
  pub has_voted: bool,
}

/// `GET /votes/status` — whether the caller's resolved identity has already
/// voted. Gates the voting page the way the original entry page was gated.
pub async fn status<S>(
  State(store): State<Arc<S>>,
  req: Request,
) -> Result<Json<StatusResponse>, ApiError>
where
  S: VoteStore,
{
  let (parts, _) = req.into_parts();
  let peer = parts
    .extensions
    .get::<ConnectInfo<SocketAddr>>()
    .map(|info| info.0);
  let identity = identity::resolve(&parts.headers, peer, None);

  let has_voted = store.has_voted(&identity).await?;
  Ok(Json(StatusResponse { has_voted }))
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// `GET /votes/records` — the full insertion-ordered list for the admin view.
pub async fn records<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<VoteRecord>>, ApiError>
where
  S: VoteStore,
{
  Ok(Json(store.list_votes().await?))
}

// ─── Erase ───────────────────────────────────────────────────────────────────

/// `DELETE /votes` — administrative wipe; idempotent.
pub async fn erase_all<S>(State(store): State<Arc<S>>) -> Result<StatusCode, ApiError>
where
  S: VoteStore,
{
  store.erase_all().await?;
  tracing::info!("all vote records erased");
  Ok(StatusCode::NO_CONTENT)
}
