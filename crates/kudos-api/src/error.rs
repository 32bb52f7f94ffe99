//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every per-request failure converts here into the structured
//! `{ "success": false, "reason": … }` body the presentation layer expects;
//! nothing propagates far enough to take the process down.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Core(#[from] kudos_core::Error),
}

impl ApiError {
  /// Stable machine-readable reason code for the response body.
  fn reason(&self) -> &'static str {
    use kudos_core::Error as E;
    match self {
      ApiError::BadRequest(_) => "BAD_REQUEST",
      ApiError::Core(e) => match e {
        E::AlreadyVoted(_) => "ALREADY_VOTED",
        E::MissingField(_) => "MISSING_FIELD",
        E::TooManySelections { .. } => "TOO_MANY_SELECTIONS",
        E::UnknownCandidates => "UNKNOWN_CANDIDATE",
        E::EmptyIdentity => "EMPTY_IDENTITY",
        E::CandidateExists(_) => "CANDIDATE_EXISTS",
        E::CandidateNotFound(_) => "CANDIDATE_NOT_FOUND",
        E::Storage(_) => "STORAGE_FAILURE",
      },
    }
  }

  fn status(&self) -> StatusCode {
    use kudos_core::Error as E;
    match self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Core(e) => match e {
        E::AlreadyVoted(_) => StatusCode::FORBIDDEN,
        E::MissingField(_) | E::TooManySelections { .. } | E::UnknownCandidates => {
          StatusCode::UNPROCESSABLE_ENTITY
        }
        E::EmptyIdentity => StatusCode::BAD_REQUEST,
        E::CandidateExists(_) => StatusCode::CONFLICT,
        E::CandidateNotFound(_) => StatusCode::NOT_FOUND,
        E::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    (status, Json(json!({ "success": false, "reason": self.reason() })))
      .into_response()
  }
}
