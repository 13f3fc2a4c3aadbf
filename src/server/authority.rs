use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::game_logic::physics::{simulate_move, Move, PhysicalState, VehicleConfig};
use crate::networking::{AuthorityPublisher, MoveReceiver};
use crate::server::validation::MoveValidator;

/// The single piece of truth the server publishes
///
/// `last_move` doubles as the acknowledgement: its `time` tells the
/// owning client which queued moves the server has consumed, and it is
/// monotonically non-decreasing over the state's lifetime.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct AuthorityState {
    pub state: PhysicalState,
    pub last_move: Move,
}

/// Authoritative server side of one kart
///
/// Drains the owning client's move channel each tick, runs every accepted
/// move through the shared integrator, and broadcasts the resulting
/// [`AuthorityState`]. Rejected moves vanish without a reply.
pub struct AuthorityHost {
    state: PhysicalState,
    config: VehicleConfig,
    validator: MoveValidator,
    moves: MoveReceiver,
    publisher: AuthorityPublisher,
    elapsed: f32,
}

impl AuthorityHost {
    pub fn new(
        initial: PhysicalState,
        config: VehicleConfig,
        moves: MoveReceiver,
        publisher: AuthorityPublisher,
    ) -> Self {
        Self {
            state: initial,
            config,
            validator: MoveValidator::new(),
            moves,
            publisher,
            elapsed: 0.0,
        }
    }

    /// Advance the server's wall clock and apply pending client moves
    pub fn tick(&mut self, delta: f32) {
        self.elapsed += delta;

        while let Some(mv) = self.moves.try_recv() {
            if !self.validator.admit(&mv, self.elapsed) {
                continue;
            }
            self.state = simulate_move(&self.state, &mv, &self.config);
            trace!(time = mv.time, "applied client move");
            self.publisher.publish(AuthorityState {
                state: self.state,
                last_move: mv,
            });
        }
    }

    /// Apply a move issued on the server itself (a server-controlled
    /// kart has no client to wait for) and broadcast the result.
    pub fn apply_local_move(&mut self, mv: Move) {
        self.state = simulate_move(&self.state, &mv, &self.config);
        self.publisher.publish(AuthorityState {
            state: self.state,
            last_move: mv,
        });
    }

    pub fn state(&self) -> &PhysicalState {
        &self.state
    }

    /// Server wall-clock time accumulated over ticks
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
