//! Correlates requests this run created with the reviewer's pending list.
//!
//! Identifiers are assigned by the backend, so the reviewer's view is
//! matched back to local requests by exact reason text. Two requests with
//! the same reason cannot be told apart; the first one in backend order
//! wins. Config validation rejects duplicate reasons for that reason.

use crate::client::BackendClient;
use crate::error::Result;
use crate::session::Session;
use crate::types::{LeaveId, LeaveRequest, ReviewCandidate};

/// Pending requests as seen by the reviewer. Read-only; safe to repeat.
/// A failed query is returned as-is; the caller decides whether to carry
/// on with an empty list.
pub fn fetch_pending(client: &BackendClient, reviewer: &Session) -> Result<Vec<ReviewCandidate>> {
    let records = client.pending_leaves(reviewer.token())?;
    let candidates: Vec<ReviewCandidate> = records.into_iter().map(ReviewCandidate::from).collect();
    tracing::info!(
        reviewer = reviewer.actor(),
        count = candidates.len(),
        "pending requests fetched"
    );
    Ok(candidates)
}

/// Identifier of the first candidate whose reason equals `tracked.reason`.
pub fn match_candidate(tracked: &LeaveRequest, candidates: &[ReviewCandidate]) -> Option<LeaveId> {
    candidates
        .iter()
        .find(|c| c.reason.as_deref() == Some(tracked.reason.as_str()))
        .map(|c| c.id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
