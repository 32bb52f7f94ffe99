//! Derived rankings over per-candidate vote counts.
//!
//! Tallies are computed from the vote records on every read — there is no
//! independently stored counter that could drift from the records.

use serde::Serialize;

use crate::candidate::Candidate;

/// One leaderboard row: a candidate and their live vote count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateTally {
  pub candidate: Candidate,
  pub votes:     u64,
}

/// Sort descending by vote count, ties broken by ascending candidate id, so
/// the leaderboard is reproducible for any vote distribution.
pub fn rank(mut tallies: Vec<CandidateTally>) -> Vec<CandidateTally> {
  tallies.sort_by(|a, b| {
    b.votes
      .cmp(&a.votes)
      .then(a.candidate.id.cmp(&b.candidate.id))
  });
  tallies
}

/// Total awards across all candidates. A voter awarding three candidates
/// contributes three, not one.
pub fn total_votes(tallies: &[CandidateTally]) -> u64 {
  tallies.iter().map(|t| t.votes).sum()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tally(id: i64, votes: u64) -> CandidateTally {
    CandidateTally {
      candidate: Candidate {
        id,
        name:     format!("Candidate {id}"),
        position: "Member".to_string(),
      },
      votes,
    }
  }

  #[test]
  fn ranks_descending_by_votes() {
    let ranked = rank(vec![tally(1, 2), tally(2, 5), tally(3, 3)]);
    let ids: Vec<i64> = ranked.iter().map(|t| t.candidate.id).collect();
    assert_eq!(ids, vec![2, 3, 1]);
  }

  #[test]
  fn ties_break_on_ascending_id() {
    let ranked = rank(vec![tally(4, 1), tally(2, 1), tally(3, 1)]);
    let ids: Vec<i64> = ranked.iter().map(|t| t.candidate.id).collect();
    assert_eq!(ids, vec![2, 3, 4]);
  }

  #[test]
  fn total_counts_every_award() {
    assert_eq!(total_votes(&[tally(1, 2), tally(2, 3)]), 5);
  }

  #[test]
  fn empty_tallies_total_zero() {
    assert_eq!(total_votes(&[]), 0);
    assert!(rank(vec![]).is_empty());
  }
}
