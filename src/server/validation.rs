use tracing::debug;

use crate::game_logic::physics::Move;

/// Server-side gate in front of the integrator
///
/// Tracks the cumulative simulated time a client has been granted and
/// rejects any move that would push it past the server's own elapsed wall
/// time: a client whose move deltas sum to more than real time is
/// simulating faster than real time (the speed-hack check). Moves that
/// fail the basic plausibility check, or that do not advance the client's
/// own timestamp, are rejected for the same silent treatment.
#[derive(Debug, Default)]
pub struct MoveValidator {
    simulated_time: f32,
    last_accepted_time: Option<f64>,
}

impl MoveValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept or reject one move against the server clock
    ///
    /// On acceptance the move's delta is added to the client's simulated
    /// time budget. Rejection is silent by protocol: the move never
    /// reaches the integrator, never becomes `last_move`, and the sender
    /// only notices when reconciliation snaps it back.
    pub fn admit(&mut self, mv: &Move, server_elapsed: f32) -> bool {
        let proposed_time = self.simulated_time + mv.delta_time;
        let running_ahead = proposed_time > server_elapsed;

        if running_ahead || !mv.is_plausible() {
            debug!(
                time = mv.time,
                delta_time = mv.delta_time,
                running_ahead,
                "rejected move"
            );
            return false;
        }

        // A move at or before the last accepted timestamp logically
        // precedes state that is already applied.
        if let Some(last) = self.last_accepted_time {
            if mv.time <= last {
                debug!(time = mv.time, last_accepted = last, "rejected stale move");
                return false;
            }
        }

        self.simulated_time = proposed_time;
        self.last_accepted_time = Some(mv.time);
        true
    }

    /// Total simulated time granted to the client so far
    pub fn simulated_time(&self) -> f32 {
        self.simulated_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(delta_time: f32, time: f64) -> Move {
        Move::new(1.0, 0.0, delta_time, time).unwrap()
    }

    #[test]
    fn test_accepts_move_within_budget() {
        let mut validator = MoveValidator::new();
        assert!(validator.admit(&mv(0.016, 1.0), 10.0));
        assert!((validator.simulated_time() - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_move_exceeding_time_budget() {
        let mut validator = MoveValidator::new();
        // Server has only been running 0.1 s but the client claims to
        // have simulated 0.2 s worth of moves.
        assert!(validator.admit(&mv(0.1, 1.0), 0.1));
        assert!(!validator.admit(&mv(0.1, 1.1), 0.1));
        // Budget is unchanged by the rejection.
        assert!((validator.simulated_time() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_budget_recovers_as_server_time_passes() {
        let mut validator = MoveValidator::new();
        assert!(validator.admit(&mv(0.1, 1.0), 0.1));
        assert!(!validator.admit(&mv(0.1, 1.1), 0.1));
        // The same move becomes acceptable once real time catches up.
        assert!(validator.admit(&mv(0.1, 1.1), 0.3));
    }

    #[test]
    fn test_rejects_implausible_move() {
        let mut validator = MoveValidator::new();
        let cheat = Move::new(5.0, 0.0, 0.016, 1.0).unwrap();
        assert!(!validator.admit(&cheat, 10.0));

        let long_frame = Move::new(1.0, 0.0, 0.5, 1.0).unwrap();
        assert!(!validator.admit(&long_frame, 10.0));
    }

    #[test]
    fn test_rejects_move_that_is_both_ahead_and_invalid() {
        // Guards the intended reject-if-either policy: a move that trips
        // both conditions at once must still be rejected.
        let mut validator = MoveValidator::new();
        let cheat = Move::new(5.0, 0.0, 0.2, 1.0).unwrap();
        assert!(!validator.admit(&cheat, 0.1));
    }

    #[test]
    fn test_rejects_stale_timestamp() {
        let mut validator = MoveValidator::new();
        assert!(validator.admit(&mv(0.016, 2.0), 10.0));
        assert!(!validator.admit(&mv(0.016, 2.0), 10.0));
        assert!(!validator.admit(&mv(0.016, 1.5), 10.0));
        assert!(validator.admit(&mv(0.016, 2.1), 10.0));
    }
}
