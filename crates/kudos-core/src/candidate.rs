//! Candidate roster types.
//!
//! Candidates are created at configuration time and only change through the
//! administrative add/remove operations. Removal is soft: votes already cast
//! for a removed candidate stay on record but leave the active rankings.

use serde::{Deserialize, Serialize};

/// Stable integer id for a candidate. Assigned once, never reused.
pub type CandidateId = i64;

/// An entity eligible to receive Impact Tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
  pub id:       CandidateId,
  pub name:     String,
  pub position: String,
}

/// Input to [`crate::store::VoteStore::add_candidate`].
/// The store assigns the next free id when none is given.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCandidate {
  pub id:       Option<CandidateId>,
  pub name:     String,
  pub position: String,
}
