//! Client prediction, server reconciliation and snapshot interpolation
//! for a networked, physically simulated kart.
//!
//! Three roles share one deterministic integrator:
//!
//! - the **authority** (server) validates untrusted client moves, applies
//!   the accepted ones and broadcasts the resulting [`AuthorityState`];
//! - the **autonomous proxy** (owning client) predicts every move locally
//!   the instant it is issued, queues it until acknowledged, and on each
//!   authority update snaps to server truth and replays the
//!   unacknowledged tail;
//! - the **simulated proxy** (any observer) never simulates; it smooths
//!   the sparse snapshots with a cubic Hermite spline whose time domain
//!   is the measured gap between the last two updates.
//!
//! Peers communicate only through the channels in [`networking`]: a
//! fire-and-forget move submission channel and a last-write-wins
//! authority broadcast with per-subscriber change detection. Every
//! consumer rebuilds from the latest snapshot alone, so dropped
//! intermediate broadcasts cost smoothness, never correctness.
//!
//! ```
//! use glam::Vec3;
//! use kart_replication::{
//!     authority_channel, move_channel, PhysicalState, Replicator, VehicleConfig,
//! };
//!
//! let config = VehicleConfig::default();
//! let start = PhysicalState::at_rest(Vec3::ZERO);
//!
//! let (move_tx, move_rx) = move_channel();
//! let (publisher, owner_sub) = authority_channel();
//! let observer_sub = publisher.subscribe();
//!
//! let mut server = Replicator::authority(start, config, move_rx, publisher);
//! let mut owner = Replicator::autonomous(start, config, move_tx, owner_sub);
//! let mut observer = Replicator::simulated(start, observer_sub);
//!
//! // One frame on each peer.
//! owner.apply_control(1.0, 0.0, 1.0 / 60.0).unwrap();
//! server.tick(1.0 / 60.0);
//! owner.tick(1.0 / 60.0);
//! observer.tick(1.0 / 60.0);
//! ```

pub mod error;
pub mod game_logic;
pub mod interpolation;
pub mod networking;
pub mod prediction;
pub mod replicator;
pub mod server;

pub use error::ReplicationError;
pub use game_logic::physics::{simulate_move, Move, PhysicalState, VehicleConfig};
pub use interpolation::{HermiteCubicSpline, InterpolationWindow};
pub use networking::{
    authority_channel, move_channel, AuthorityPublisher, AuthoritySubscriber, MoveReceiver,
    MoveSender,
};
pub use prediction::{MoveQueue, ReconciliationEngine};
pub use replicator::{PeerRole, Replicator};
pub use server::{AuthorityHost, AuthorityState, MoveValidator};
