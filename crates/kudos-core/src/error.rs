//! Error types for `kudos-core`.

use thiserror::Error;

use crate::candidate::CandidateId;
use crate::vote::VoterIdentity;

#[derive(Debug, Error)]
pub enum Error {
  /// The identity already has a recorded vote.
  #[error("identity {0} has already voted")]
  AlreadyVoted(VoterIdentity),

  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error(
    "too many selections: {got} distinct candidates (limit {max})",
    max = crate::submission::MAX_SELECTIONS
  )]
  TooManySelections { got: usize },

  #[error("no selection resolves to a known candidate")]
  UnknownCandidates,

  #[error("voter identity must not be empty")]
  EmptyIdentity,

  #[error("candidate {0} already exists")]
  CandidateExists(CandidateId),

  #[error("candidate {0} not found")]
  CandidateNotFound(CandidateId),

  /// Persistence failed with nothing written; the submission may be retried.
  #[error("storage failure: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
