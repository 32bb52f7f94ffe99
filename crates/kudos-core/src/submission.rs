//! Boundary adapter from raw submission payloads to canonical [`NewVote`]s.
//!
//! The upstream form is duck-typed: the candidate field arrives either as a
//! single id (with an optional display name alongside it) or as a list of
//! ids. Both shapes collapse into a tagged [`Selection`] here, before any
//! business logic runs.

use serde::Deserialize;

use crate::candidate::{Candidate, CandidateId};
use crate::vote::{NewVote, VoterIdentity};
use crate::{Error, Result};

/// Upper bound on distinct candidates a single voter may award.
pub const MAX_SELECTIONS: usize = 5;

/// Name recorded when the submitter leaves the name fields blank.
pub const ANONYMOUS: &str = "Anonymous";

// ─── Submission ──────────────────────────────────────────────────────────────

/// Raw submit-vote payload as sent by the voting page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
  pub name:       Option<String>,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  /// Passed through as-is; no format validation is applied.
  pub email:      Option<String>,

  /// Single-selection shape.
  pub candidate_id:   Option<CandidateId>,
  /// Display name that accompanies `candidate_id` in the single shape.
  /// Informational only; the id is authoritative.
  pub candidate_name: Option<String>,
  /// Multi-selection shape.
  pub candidate_ids:  Option<Vec<CandidateId>>,

  /// Persisted client token, preferred over the network address as the
  /// dedup key when present.
  pub client_token: Option<String>,
}

/// The two observed selection shapes, tagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
  Single(CandidateId),
  Many(Vec<CandidateId>),
}

impl Selection {
  fn into_ids(self) -> Vec<CandidateId> {
    match self {
      Selection::Single(id) => vec![id],
      Selection::Many(ids) => ids,
    }
  }
}

impl Submission {
  /// Extract the tagged selection, or `MissingField` when neither shape is
  /// present.
  pub fn selection(&self) -> Result<Selection> {
    if let Some(ids) = &self.candidate_ids
      && !ids.is_empty()
    {
      return Ok(Selection::Many(ids.clone()));
    }
    if let Some(id) = self.candidate_id {
      return Ok(Selection::Single(id));
    }
    Err(Error::MissingField("candidateIds"))
  }

  /// Validate and shape this payload into a [`NewVote`] keyed on `identity`.
  ///
  /// Duplicate ids collapse (first-seen order wins) before the selection cap
  /// is checked. Ids that don't resolve against `roster` are dropped; a
  /// submission with nothing left after filtering is rejected.
  pub fn normalize(
    &self,
    roster: &[Candidate],
    identity: VoterIdentity,
  ) -> Result<NewVote> {
    let ids = self.selection()?.into_ids();

    let mut distinct: Vec<CandidateId> = Vec::with_capacity(ids.len());
    for id in ids {
      if !distinct.contains(&id) {
        distinct.push(id);
      }
    }

    if distinct.len() > MAX_SELECTIONS {
      return Err(Error::TooManySelections { got: distinct.len() });
    }

    let known: Vec<CandidateId> = distinct
      .into_iter()
      .filter(|id| roster.iter().any(|c| c.id == *id))
      .collect();
    if known.is_empty() {
      return Err(Error::UnknownCandidates);
    }

    Ok(NewVote {
      voter_name:    self.display_name(),
      voter_email:   self.email.clone(),
      candidate_ids: known,
      identity,
    })
  }

  /// Trimmed display name: the single name field when non-blank, else the
  /// split first/last fields joined, else `"Anonymous"`.
  fn display_name(&self) -> String {
    if let Some(name) = &self.name {
      let name = name.trim();
      if !name.is_empty() {
        return name.to_string();
      }
    }
    let first = self.first_name.as_deref().unwrap_or("").trim();
    let last = self.last_name.as_deref().unwrap_or("").trim();
    let joined = format!("{first} {last}");
    let joined = joined.trim();
    if joined.is_empty() {
      ANONYMOUS.to_string()
    } else {
      joined.to_string()
    }
  }
}
