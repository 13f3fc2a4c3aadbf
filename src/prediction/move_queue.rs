use std::collections::VecDeque;

use crate::error::ReplicationError;
use crate::game_logic::physics::Move;

/// Queue of moves sent to the server but not yet acknowledged
///
/// Owned by the autonomous proxy only. Append order is send order, and
/// every entry is strictly newer than the last move the server has
/// acknowledged; trimming always removes a strict prefix.
#[derive(Debug, Default)]
pub struct MoveQueue {
    moves: VecDeque<Move>,
    last_time: Option<f64>,
}

impl MoveQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a move, enforcing strictly increasing `time`
    ///
    /// A non-increasing timestamp means the issuing peer's clock went
    /// backwards, which would break both trim and server-side ordering.
    pub fn append(&mut self, mv: Move) -> Result<(), ReplicationError> {
        if let Some(last) = self.last_time {
            if mv.time <= last {
                return Err(ReplicationError::NonMonotonicMove { time: mv.time });
            }
        }
        self.last_time = Some(mv.time);
        self.moves.push_back(mv);
        Ok(())
    }

    /// Drop every move the server has acknowledged
    ///
    /// Removes exactly the entries with `time <= last_acknowledged_time`,
    /// leaving the unacknowledged tail untouched and in order. Must run
    /// before replay on every authority update.
    pub fn trim(&mut self, last_acknowledged_time: f64) {
        while let Some(front) = self.moves.front() {
            if front.time <= last_acknowledged_time {
                self.moves.pop_front();
            } else {
                break;
            }
        }
    }

    /// Unacknowledged moves in send order, for replay
    pub fn entries(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}
