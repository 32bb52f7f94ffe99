//! Vote records and the voter identity they are keyed on.
//!
//! A vote record is an immutable claim that one identity awarded one to five
//! candidates. Records are never updated; the only mutation in the system is
//! the administrative erase, which drops all of them at once.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::candidate::CandidateId;
use crate::{Error, Result};

// ─── VoterIdentity ───────────────────────────────────────────────────────────

/// The deduplication key: a network-address string or an opaque client-held
/// token. At most one [`VoteRecord`] may exist per identity.
///
/// Never empty — callers that cannot resolve any address use
/// [`VoterIdentity::unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterIdentity(String);

impl VoterIdentity {
  /// Fallback value for requests with no resolvable address or token.
  pub const UNKNOWN: &'static str = "unknown";

  pub fn new(value: impl Into<String>) -> Result<Self> {
    let value = value.into();
    if value.trim().is_empty() {
      return Err(Error::EmptyIdentity);
    }
    Ok(Self(value))
  }

  pub fn unknown() -> Self {
    Self(Self::UNKNOWN.to_string())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for VoterIdentity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── VoterId ─────────────────────────────────────────────────────────────────

/// Server-generated public id for a recorded vote, e.g. `P3f1a…`.
///
/// The `P` prefix is the shape downstream consumers expect; the suffix is a
/// UUIDv4 so ids stay unique without coordination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterId(String);

impl VoterId {
  pub fn generate() -> Self {
    Self(format!("P{}", Uuid::new_v4().simple()))
  }

  /// Rebuild from a previously stored value.
  pub fn from_stored(value: impl Into<String>) -> Self {
    Self(value.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for VoterId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── VoteRecord ──────────────────────────────────────────────────────────────

/// One recorded vote. Immutable once written; `voter_id` and `voted_at` are
/// assigned by the store, never accepted from callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
  pub voter_id:      VoterId,
  pub voter_name:    String,
  pub voter_email:   Option<String>,
  /// Awarded candidates in selection order; 1..=5 distinct entries.
  pub candidate_ids: Vec<CandidateId>,
  pub voted_at:      DateTime<Utc>,
  /// The dedup key this record is stored under.
  pub identity:      VoterIdentity,
}

// ─── NewVote ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::VoteStore::record_vote`] — a submission that has
/// already passed through [`crate::submission::Submission::normalize`].
#[derive(Debug, Clone)]
pub struct NewVote {
  pub voter_name:    String,
  pub voter_email:   Option<String>,
  pub candidate_ids: Vec<CandidateId>,
  pub identity:      VoterIdentity,
}
