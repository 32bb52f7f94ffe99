//! JSON HTTP API for the kudos vote recorder.
//!
//! Exposes axum [`Router`]s backed by any [`kudos_core::store::VoteStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility: mount
//! [`admin_router`] behind whatever guard the host requires.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", kudos_api::public_router(store.clone()))
//! .nest("/api/admin", kudos_api::admin_router(store))
//! ```

pub mod candidates;
pub mod error;
pub mod export;
pub mod identity;
pub mod rankings;
pub mod votes;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use kudos_core::store::VoteStore;

pub use error::ApiError;

/// Routes safe to expose to voters.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn public_router<S>(store: Arc<S>) -> Router<()>
where
  S: VoteStore + 'static,
{
  Router::new()
    .route("/votes", post(votes::submit::<S>))
    .route("/votes/status", get(votes::status::<S>))
    .route("/rankings", get(rankings::handler::<S>))
    .route("/candidates", get(candidates::list::<S>))
    .with_state(store)
}

/// Administrative routes: erase-all, the raw vote list, CSV export, and
/// roster changes. Callers must wrap this router in an auth layer.
pub fn admin_router<S>(store: Arc<S>) -> Router<()>
where
  S: VoteStore + 'static,
{
  Router::new()
    .route("/votes", delete(votes::erase_all::<S>))
    .route("/votes/records", get(votes::records::<S>))
    .route("/votes/export", get(export::csv::<S>))
    .route("/candidates", post(candidates::create::<S>))
    .route("/candidates/{id}", delete(candidates::remove::<S>))
    .with_state(store)
}
