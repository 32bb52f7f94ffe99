//! Voter-identity resolution.
//!
//! Order of preference: persisted client token, `X-Forwarded-For` (first
//! hop), the peer address, then the `"unknown"` fallback. Requests therefore
//! always reach the store with a non-empty dedup key.

use std::net::SocketAddr;

use axum::http::HeaderMap;
use kudos_core::vote::VoterIdentity;

pub fn resolve(
  headers: &HeaderMap,
  peer: Option<SocketAddr>,
  client_token: Option<&str>,
) -> VoterIdentity {
  if let Some(token) = client_token
    && let Ok(identity) = VoterIdentity::new(token.trim())
  {
    return identity;
  }

  if let Some(forwarded) = headers.get("x-forwarded-for")
    && let Ok(value) = forwarded.to_str()
    && let Some(first) = value.split(',').next()
    && let Ok(identity) = VoterIdentity::new(first.trim())
  {
    return identity;
  }

  if let Some(peer) = peer {
    return VoterIdentity::new(peer.ip().to_string())
      .unwrap_or_else(|_| VoterIdentity::unknown());
  }

  VoterIdentity::unknown()
}
