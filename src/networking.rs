use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use crate::error::ReplicationError;
use crate::game_logic::physics::Move;
use crate::server::authority::AuthorityState;

/// Client-to-server move submission, fire-and-forget
///
/// The sender never learns whether a move was accepted; acceptance is
/// only inferable later from the broadcast authority state.
pub fn move_channel() -> (MoveSender, MoveReceiver) {
    let (tx, rx) = mpsc::channel();
    (MoveSender { tx }, MoveReceiver { rx })
}

#[derive(Clone)]
pub struct MoveSender {
    tx: Sender<Move>,
}

impl MoveSender {
    pub fn send(&self, mv: Move) -> Result<(), ReplicationError> {
        self.tx.send(mv).map_err(|_| ReplicationError::ChannelClosed)
    }
}

pub struct MoveReceiver {
    rx: Receiver<Move>,
}

impl MoveReceiver {
    /// Drain one pending move without blocking
    pub fn try_recv(&self) -> Option<Move> {
        self.rx.try_recv().ok()
    }
}

// Last-write-wins slot behind the broadcast. Version numbers give each
// subscriber its own edge detection; skipped intermediate values are fine
// because consumers rebuild from the latest snapshot only.
#[derive(Debug, Default)]
struct AuthoritySlot {
    value: Option<AuthorityState>,
    version: u64,
}

/// Server-to-peers authority state broadcast
///
/// One writer (the server), any number of read-only subscribers. Each
/// `publish` replaces the previous value; a subscriber that syncs less
/// often than the server publishes simply misses intermediate snapshots.
pub fn authority_channel() -> (AuthorityPublisher, AuthoritySubscriber) {
    let slot = Arc::new(Mutex::new(AuthoritySlot::default()));
    let publisher = AuthorityPublisher { slot: slot.clone() };
    let subscriber = AuthoritySubscriber { slot, seen: 0 };
    (publisher, subscriber)
}

pub struct AuthorityPublisher {
    slot: Arc<Mutex<AuthoritySlot>>,
}

impl AuthorityPublisher {
    pub fn publish(&self, state: AuthorityState) {
        let mut slot = self.slot.lock().unwrap();
        slot.value = Some(state);
        slot.version += 1;
    }

    /// Register another observer; it sees only values published after
    /// its own last read, starting with whatever is current.
    pub fn subscribe(&self) -> AuthoritySubscriber {
        AuthoritySubscriber {
            slot: self.slot.clone(),
            seen: 0,
        }
    }
}

pub struct AuthoritySubscriber {
    slot: Arc<Mutex<AuthoritySlot>>,
    seen: u64,
}

impl AuthoritySubscriber {
    /// Edge-detected read: the full current value if it changed since
    /// this subscriber last looked, `None` otherwise
    pub fn changed(&mut self) -> Option<AuthorityState> {
        let slot = self.slot.lock().unwrap();
        if slot.version == self.seen {
            return None;
        }
        self.seen = slot.version;
        slot.value
    }

    /// Latest value regardless of whether it was already seen
    pub fn latest(&self) -> Option<AuthorityState> {
        self.slot.lock().unwrap().value
    }
}
