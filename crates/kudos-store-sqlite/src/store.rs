//! [`SqliteStore`] — the SQLite implementation of [`VoteStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, params};

use kudos_core::{
  candidate::{Candidate, CandidateId, NewCandidate},
  store::VoteStore,
  tally::{self, CandidateTally},
  vote::{NewVote, VoteRecord, VoterId, VoterIdentity},
};

use crate::{
  Error,
  encode::{RawVoter, encode_dt},
  schema::SCHEMA,
};

type CoreResult<T> = kudos_core::Result<T>;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A vote store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Every call
/// is serialized onto the one connection, which is what makes a committed
/// write visible to the very next dedup check.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(Error::Database)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> CoreResult<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(Error::Database)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> CoreResult<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(Error::Database)?;
    Ok(())
  }
}

/// True when `e` is a uniqueness/primary-key conflict.
fn is_constraint_conflict(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

// ─── VoteStore impl ──────────────────────────────────────────────────────────

impl VoteStore for SqliteStore {
  // ── Votes ─────────────────────────────────────────────────────────────────

  async fn record_vote(&self, vote: NewVote) -> CoreResult<VoteRecord> {
    let record = VoteRecord {
      voter_id:      VoterId::generate(),
      voter_name:    vote.voter_name,
      voter_email:   vote.voter_email,
      candidate_ids: vote.candidate_ids,
      voted_at:      Utc::now(),
      identity:      vote.identity,
    };

    let identity_str = record.identity.as_str().to_owned();
    let voter_id_str = record.voter_id.as_str().to_owned();
    let name         = record.voter_name.clone();
    let email        = record.voter_email.clone();
    let ids          = record.candidate_ids.clone();
    let at_str       = encode_dt(record.voted_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // The identity PRIMARY KEY is the dedup check; a conflict here means
        // this identity already voted.
        let landed = match tx.execute(
          "INSERT INTO voters (identity, voter_id, voter_name, voter_email, voted_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          params![identity_str, voter_id_str, name, email, at_str],
        ) {
          Ok(_) => true,
          Err(e) if is_constraint_conflict(&e) => false,
          Err(e) => return Err(e.into()),
        };

        if landed {
          let mut stmt = tx.prepare(
            "INSERT INTO choices (voter_identity, candidate_id, ord) VALUES (?1, ?2, ?3)",
          )?;
          for (ord, candidate_id) in ids.iter().enumerate() {
            stmt.execute(params![identity_str, candidate_id, ord as i64])?;
          }
          drop(stmt);
          tx.commit()?;
        }
        Ok(landed)
      })
      .await
      .map_err(Error::Database)?;

    if !inserted {
      return Err(kudos_core::Error::AlreadyVoted(record.identity));
    }
    Ok(record)
  }

  async fn has_voted(&self, identity: &VoterIdentity) -> CoreResult<bool> {
    let identity_str = identity.as_str().to_owned();

    let exists = self
      .conn
      .call(move |conn| {
        let exists: bool = conn
          .query_row(
            "SELECT 1 FROM voters WHERE identity = ?1",
            params![identity_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        Ok(exists)
      })
      .await
      .map_err(Error::Database)?;

    Ok(exists)
  }

  async fn list_votes(&self) -> CoreResult<Vec<VoteRecord>> {
    let rows: Vec<(RawVoter, Vec<CandidateId>)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT identity, voter_id, voter_name, voter_email, voted_at
           FROM voters ORDER BY rowid",
        )?;
        let raws = stmt
          .query_map([], |row| {
            Ok(RawVoter {
              identity:    row.get(0)?,
              voter_id:    row.get(1)?,
              voter_name:  row.get(2)?,
              voter_email: row.get(3)?,
              voted_at:    row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut choices = conn.prepare(
          "SELECT candidate_id FROM choices WHERE voter_identity = ?1 ORDER BY ord",
        )?;
        let mut out = Vec::with_capacity(raws.len());
        for raw in raws {
          let ids = choices
            .query_map(params![raw.identity], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<CandidateId>>>()?;
          out.push((raw, ids));
        }
        Ok(out)
      })
      .await
      .map_err(Error::Database)?;

    rows
      .into_iter()
      .map(|(raw, ids)| Ok(raw.into_record(ids)?))
      .collect()
  }

  async fn erase_all(&self) -> CoreResult<()> {
    self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM choices", [])?;
        tx.execute("DELETE FROM voters", [])?;
        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(Error::Database)?;
    Ok(())
  }

  // ── Roster ────────────────────────────────────────────────────────────────

  async fn add_candidate(&self, candidate: NewCandidate) -> CoreResult<Candidate> {
    let NewCandidate { id, name, position } = candidate;
    let name_param = name.clone();
    let position_param = position.clone();

    let (landed, id) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let id = match id {
          Some(id) => id,
          None => tx.query_row(
            "SELECT COALESCE(MAX(candidate_id), 0) + 1 FROM candidates",
            [],
            |row| row.get(0),
          )?,
        };
        let landed = match tx.execute(
          "INSERT INTO candidates (candidate_id, name, position) VALUES (?1, ?2, ?3)",
          params![id, name_param, position_param],
        ) {
          Ok(_) => true,
          Err(e) if is_constraint_conflict(&e) => false,
          Err(e) => return Err(e.into()),
        };
        if landed {
          tx.commit()?;
        }
        Ok((landed, id))
      })
      .await
      .map_err(Error::Database)?;

    if !landed {
      return Err(kudos_core::Error::CandidateExists(id));
    }
    Ok(Candidate { id, name, position })
  }

  async fn remove_candidate(&self, id: CandidateId) -> CoreResult<()> {
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE candidates SET active = 0 WHERE candidate_id = ?1 AND active = 1",
          params![id],
        )?)
      })
      .await
      .map_err(Error::Database)?;

    if affected == 0 {
      return Err(kudos_core::Error::CandidateNotFound(id));
    }
    Ok(())
  }

  async fn list_candidates(&self) -> CoreResult<Vec<Candidate>> {
    let candidates = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT candidate_id, name, position FROM candidates
           WHERE active = 1 ORDER BY candidate_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Candidate {
              id:       row.get(0)?,
              name:     row.get(1)?,
              position: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    Ok(candidates)
  }

  async fn seed_candidates(&self, candidates: &[Candidate]) -> CoreResult<()> {
    let seed = candidates.to_vec();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO candidates (candidate_id, name, position)
             VALUES (?1, ?2, ?3)",
          )?;
          for c in &seed {
            stmt.execute(params![c.id, c.name, c.position])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(Error::Database)?;
    Ok(())
  }

  // ── Tallies ───────────────────────────────────────────────────────────────

  async fn rankings(&self) -> CoreResult<Vec<CandidateTally>> {
    let tallies = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT c.candidate_id, c.name, c.position, COUNT(ch.candidate_id)
           FROM candidates c
           LEFT JOIN choices ch ON ch.candidate_id = c.candidate_id
           WHERE c.active = 1
           GROUP BY c.candidate_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(CandidateTally {
              candidate: Candidate {
                id:       row.get(0)?,
                name:     row.get(1)?,
                position: row.get(2)?,
              },
              votes: row.get::<_, i64>(3)? as u64,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    Ok(tally::rank(tallies))
  }

  async fn total_votes(&self) -> CoreResult<u64> {
    let tallies = self.rankings().await?;
    Ok(tally::total_votes(&tallies))
  }
}
