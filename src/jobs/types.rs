//! Job payloads carried through the Redis queue.

use serde::{Deserialize, Serialize};

/// Evaluate every active strategy of one user.
///
/// One job per user per scheduler tick; the handler runs the user's
/// strategies sequentially so the in-cycle dedup set works.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateUserJob {
    pub user_id: String,
}
