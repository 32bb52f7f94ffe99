//! `GET /votes/export` — the vote records as CSV.
//!
//! One row per record; the awarded candidate ids are joined with `;` so a
//! record stays a single row regardless of how many candidates it names.

use std::sync::Arc;

use axum::{
  extract::State,
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use kudos_core::{store::VoteStore, vote::VoteRecord};

use crate::error::ApiError;

const HEADER_ROW: &str =
  "voter_id,voter_name,voter_email,candidate_ids,voted_at,identity";

pub async fn csv<S>(State(store): State<Arc<S>>) -> Result<Response, ApiError>
where
  S: VoteStore,
{
  let records = store.list_votes().await?;

  let mut out = String::from(HEADER_ROW);
  out.push('\n');
  for record in &records {
    out.push_str(&row(record));
    out.push('\n');
  }

  Ok(
    (
      StatusCode::OK,
      [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
      out,
    )
      .into_response(),
  )
}

fn row(record: &VoteRecord) -> String {
  let ids = record
    .candidate_ids
    .iter()
    .map(|id| id.to_string())
    .collect::<Vec<_>>()
    .join(";");
  [
    field(record.voter_id.as_str()),
    field(&record.voter_name),
    field(record.voter_email.as_deref().unwrap_or("")),
    field(&ids),
    field(&record.voted_at.to_rfc3339()),
    field(record.identity.as_str()),
  ]
  .join(",")
}

/// Quote a field when it contains a delimiter, quote, or line break.
fn field(value: &str) -> String {
  if value.contains([',', '"', '\n', '\r']) {
    format!("\"{}\"", value.replace('"', "\"\""))
  } else {
    value.to_string()
  }
}
