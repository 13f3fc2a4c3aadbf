// Client-side prediction for the locally controlled kart
//
// The autonomous proxy applies every move locally the instant it is
// issued, queues it, and ships it to the server. When the server's
// authoritative state comes back, reconciliation snaps to truth and
// replays whatever the server has not acknowledged yet.

pub mod move_queue;
pub mod reconciliation;

pub use move_queue::MoveQueue;
pub use reconciliation::ReconciliationEngine;
