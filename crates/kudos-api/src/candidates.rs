//! Handlers for `/candidates` — roster reads and admin changes.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use kudos_core::{
  candidate::{Candidate, CandidateId, NewCandidate},
  store::VoteStore,
};

use crate::error::ApiError;

/// `GET /candidates` — the active roster.
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Candidate>>, ApiError>
where
  S: VoteStore,
{
  Ok(Json(store.list_candidates().await?))
}

/// `POST /candidates` — body: `{"id": 6, "name": …, "position": …}`.
/// The store assigns the next free id when none is given.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewCandidate>,
) -> Result<impl IntoResponse, ApiError>
where
  S: VoteStore,
{
  let candidate = store.add_candidate(body).await?;
  tracing::info!(candidate_id = candidate.id, "candidate added");
  Ok((StatusCode::CREATED, Json(candidate)))
}

/// `DELETE /candidates/{id}` — soft-remove; votes already cast stay on
/// record but leave the rankings.
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<CandidateId>,
) -> Result<StatusCode, ApiError>
where
  S: VoteStore,
{
  store.remove_candidate(id).await?;
  tracing::info!(candidate_id = id, "candidate removed");
  Ok(StatusCode::NO_CONTENT)
}
