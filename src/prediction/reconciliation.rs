use tracing::debug;

use crate::game_logic::physics::{simulate_move, PhysicalState, VehicleConfig};
use crate::prediction::move_queue::MoveQueue;
use crate::server::authority::AuthorityState;

/// Server-reconciliation for the autonomous proxy
///
/// Runs whenever the replicated authority state changes on the owning
/// client:
/// 1. Snap to the server's transform and velocity, discarding local drift.
/// 2. Trim the queue up to the acknowledged move.
/// 3. Replay the unacknowledged tail through the shared integrator.
///
/// The result is the server's verified truth plus exactly the in-flight
/// moves, so prediction error is bounded by the unacknowledged count.
pub struct ReconciliationEngine;

impl ReconciliationEngine {
    pub fn reconcile(
        authority: &AuthorityState,
        queue: &mut MoveQueue,
        config: &VehicleConfig,
    ) -> PhysicalState {
        queue.trim(authority.last_move.time);

        let mut state = authority.state;
        for mv in queue.entries() {
            state = simulate_move(&state, mv, config);
        }

        debug!(
            acked_time = authority.last_move.time,
            replayed = queue.len(),
            "reconciled against authority state"
        );

        state
    }
}
