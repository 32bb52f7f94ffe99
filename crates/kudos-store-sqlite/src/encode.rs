//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings; identities and voter ids as
//! plain text.

use chrono::{DateTime, Utc};
use kudos_core::candidate::CandidateId;
use kudos_core::vote::{VoteRecord, VoterId, VoterIdentity};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `voters` row.
pub struct RawVoter {
  pub identity:    String,
  pub voter_id:    String,
  pub voter_name:  String,
  pub voter_email: Option<String>,
  pub voted_at:    String,
}

impl RawVoter {
  pub fn into_record(self, candidate_ids: Vec<CandidateId>) -> Result<VoteRecord> {
    let identity = VoterIdentity::new(self.identity)
      .map_err(|e| Error::Corrupt(e.to_string()))?;
    Ok(VoteRecord {
      voter_id: VoterId::from_stored(self.voter_id),
      voter_name: self.voter_name,
      voter_email: self.voter_email,
      candidate_ids,
      voted_at: decode_dt(&self.voted_at)?,
      identity,
    })
  }
}
