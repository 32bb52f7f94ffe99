//! `GET /rankings` — the live leaderboard payload.

use std::sync::Arc;

use axum::{Json, extract::State};
use kudos_core::{
  candidate::CandidateId,
  store::VoteStore,
  tally::{self, CandidateTally},
};
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
  pub candidate_id: CandidateId,
  pub name:         String,
  pub position:     String,
  pub votes:        u64,
}

impl From<CandidateTally> for RankingEntry {
  fn from(t: CandidateTally) -> Self {
    Self {
      candidate_id: t.candidate.id,
      name:         t.candidate.name,
      position:     t.candidate.position,
      votes:        t.votes,
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingsResponse {
  pub rankings:    Vec<RankingEntry>,
  pub total_votes: u64,
}

pub async fn handler<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<RankingsResponse>, ApiError>
where
  S: VoteStore,
{
  let tallies = store.rankings().await?;
  let total_votes = tally::total_votes(&tallies);
  Ok(Json(RankingsResponse {
    rankings: tallies.into_iter().map(RankingEntry::from).collect(),
    total_votes,
  }))
}
