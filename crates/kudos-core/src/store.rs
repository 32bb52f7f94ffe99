//! The `VoteStore` trait and its dedup contract.
//!
//! The trait is implemented by storage backends (e.g. `kudos-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.
//!
//! The check-then-write inside [`VoteStore::record_vote`] is the one
//! correctness-critical operation in the system: implementations must either
//! serialize it or enforce a uniqueness constraint on the identity inside the
//! store, so two concurrent submissions from the same identity can never both
//! succeed.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use crate::Result;
use crate::candidate::{Candidate, CandidateId, NewCandidate};
use crate::tally::CandidateTally;
use crate::vote::{NewVote, VoteRecord, VoterIdentity};

pub trait VoteStore: Send + Sync {
  // ── Votes ─────────────────────────────────────────────────────────────

  /// Atomically check the dedup key and persist `vote`.
  ///
  /// `voter_id` and `voted_at` are assigned by the store, not by callers.
  /// Fails with [`crate::Error::AlreadyVoted`] when a record already exists
  /// for the identity. On any failure nothing is written and no tally moves.
  fn record_vote(
    &self,
    vote: NewVote,
  ) -> impl Future<Output = Result<VoteRecord>> + Send + '_;

  /// Whether a record already exists for `identity`.
  ///
  /// Advisory only (page gating); the authoritative check is the one inside
  /// [`VoteStore::record_vote`].
  fn has_voted<'a>(
    &'a self,
    identity: &'a VoterIdentity,
  ) -> impl Future<Output = Result<bool>> + Send + 'a;

  /// All records in insertion order, for the voter display and CSV export.
  fn list_votes(&self) -> impl Future<Output = Result<Vec<VoteRecord>>> + Send + '_;

  /// Administrative wipe: removes every record and zeroes every tally.
  /// Idempotent. The candidate roster is untouched.
  fn erase_all(&self) -> impl Future<Output = Result<()>> + Send + '_;

  // ── Roster ────────────────────────────────────────────────────────────

  fn add_candidate(
    &self,
    candidate: NewCandidate,
  ) -> impl Future<Output = Result<Candidate>> + Send + '_;

  /// Soft-remove: the candidate leaves the active roster and rankings, but
  /// votes already cast for them are retained for audit.
  fn remove_candidate(
    &self,
    id: CandidateId,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// The active roster, ordered by id.
  fn list_candidates(&self) -> impl Future<Output = Result<Vec<Candidate>>> + Send + '_;

  /// Idempotently insert the configured roster; called once at startup.
  fn seed_candidates<'a>(
    &'a self,
    candidates: &'a [Candidate],
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  // ── Tallies ───────────────────────────────────────────────────────────

  /// The live leaderboard, recomputed from the records on every call and
  /// ordered by [`crate::tally::rank`].
  fn rankings(&self) -> impl Future<Output = Result<Vec<CandidateTally>>> + Send + '_;

  /// Sum of per-candidate counts over the active roster.
  fn total_votes(&self) -> impl Future<Output = Result<u64>> + Send + '_;
}
