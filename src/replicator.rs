use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ReplicationError;
use crate::game_logic::physics::{simulate_move, Move, PhysicalState, VehicleConfig};
use crate::interpolation::InterpolationWindow;
use crate::networking::{AuthorityPublisher, AuthoritySubscriber, MoveReceiver, MoveSender};
use crate::prediction::{MoveQueue, ReconciliationEngine};
use crate::server::authority::AuthorityHost;

/// Which part a local peer plays for one kart
///
/// Fixed for the session, decided at spawn by who controls the kart.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeerRole {
    /// The server's writable copy, the single source of truth
    Authority,
    /// The locally controlled, predicting client
    AutonomousProxy,
    /// Any peer only observing this kart
    SimulatedProxy,
}

/// Per-kart, per-peer replication driver
///
/// Constructed with an explicit role and exactly the channel handles that
/// role needs; there is no runtime discovery and no role transition.
/// Callers drive it with `tick` once per frame and, for controlling
/// roles, `apply_control` per input sample.
pub enum Replicator {
    Authority(AuthorityHost),
    Autonomous(AutonomousProxy),
    Simulated(SimulatedProxy),
}

impl Replicator {
    pub fn authority(
        initial: PhysicalState,
        config: VehicleConfig,
        moves: MoveReceiver,
        publisher: AuthorityPublisher,
    ) -> Self {
        Self::Authority(AuthorityHost::new(initial, config, moves, publisher))
    }

    pub fn autonomous(
        initial: PhysicalState,
        config: VehicleConfig,
        sender: MoveSender,
        subscription: AuthoritySubscriber,
    ) -> Self {
        Self::Autonomous(AutonomousProxy {
            state: initial,
            config,
            queue: MoveQueue::new(),
            sender,
            subscription,
            clock: 0.0,
        })
    }

    pub fn simulated(initial: PhysicalState, subscription: AuthoritySubscriber) -> Self {
        Self::Simulated(SimulatedProxy {
            rendered: initial,
            subscription,
            window: None,
            time_since_update: 0.0,
        })
    }

    pub fn role(&self) -> PeerRole {
        match self {
            Self::Authority(_) => PeerRole::Authority,
            Self::Autonomous(_) => PeerRole::AutonomousProxy,
            Self::Simulated(_) => PeerRole::SimulatedProxy,
        }
    }

    /// Per-frame work for the role: the authority drains and applies
    /// pending moves, the autonomous proxy reconciles against a changed
    /// authority state, the simulated proxy advances its interpolation.
    pub fn tick(&mut self, delta: f32) {
        match self {
            Self::Authority(host) => host.tick(delta),
            Self::Autonomous(proxy) => proxy.poll_authority(),
            Self::Simulated(proxy) => proxy.tick(delta),
        }
    }

    /// Feed one control sample into a controlling role
    ///
    /// On the autonomous proxy this predicts locally, queues the move and
    /// submits it; on the authority it simulates and publishes directly.
    /// A simulated proxy never issues moves.
    pub fn apply_control(
        &mut self,
        throttle: f32,
        steering_throw: f32,
        delta: f32,
    ) -> Result<(), ReplicationError> {
        match self {
            Self::Authority(host) => {
                let mv = Move::new(throttle, steering_throw, delta, host.elapsed() as f64)?;
                host.apply_local_move(mv);
                Ok(())
            }
            Self::Autonomous(proxy) => proxy.apply_control(throttle, steering_throw, delta),
            Self::Simulated(_) => Err(ReplicationError::RoleMismatch),
        }
    }

    /// The pose this peer should render right now
    pub fn state(&self) -> &PhysicalState {
        match self {
            Self::Authority(host) => host.state(),
            Self::Autonomous(proxy) => &proxy.state,
            Self::Simulated(proxy) => &proxy.rendered,
        }
    }
}

/// Owning-client side: predict, queue, submit, reconcile
pub struct AutonomousProxy {
    state: PhysicalState,
    config: VehicleConfig,
    queue: MoveQueue,
    sender: MoveSender,
    subscription: AuthoritySubscriber,
    clock: f64,
}

impl AutonomousProxy {
    fn apply_control(
        &mut self,
        throttle: f32,
        steering_throw: f32,
        delta: f32,
    ) -> Result<(), ReplicationError> {
        self.clock += delta as f64;
        let mv = Move::new(throttle, steering_throw, delta, self.clock)?;

        // Predict immediately so the local kart never waits on the wire.
        self.state = simulate_move(&self.state, &mv, &self.config);
        self.queue.append(mv)?;

        // Fire-and-forget: acceptance only ever shows up via the
        // broadcast authority state.
        if self.sender.send(mv).is_err() {
            debug!("move channel closed, server gone");
        }
        Ok(())
    }

    fn poll_authority(&mut self) {
        if let Some(snapshot) = self.subscription.changed() {
            self.state = ReconciliationEngine::reconcile(&snapshot, &mut self.queue, &self.config);
        }
    }

    /// Moves sent but not yet acknowledged by the server
    pub fn pending_moves(&self) -> usize {
        self.queue.len()
    }
}

/// Observer side: no local simulation, only spline interpolation between
/// the last two authoritative samples
pub struct SimulatedProxy {
    rendered: PhysicalState,
    subscription: AuthoritySubscriber,
    window: Option<InterpolationWindow>,
    time_since_update: f32,
}

impl SimulatedProxy {
    fn tick(&mut self, delta: f32) {
        if let Some(snapshot) = self.subscription.changed() {
            let update_interval = self.time_since_update;
            self.time_since_update = 0.0;

            if self.window.is_none() {
                // First snapshot ever: there is no previous arrival to
                // measure a window from, so snap straight to the server
                // pose and keep the window degenerate until the second
                // snapshot gives it a real time domain.
                self.rendered = snapshot.state;
                self.window = Some(InterpolationWindow::new(self.rendered, snapshot.state, 0.0));
            } else {
                self.window = Some(InterpolationWindow::new(
                    self.rendered,
                    snapshot.state,
                    update_interval,
                ));
            }
        }

        self.time_since_update += delta;
        if let Some(window) = self.window.as_mut() {
            window.advance(delta);
            // A degenerate window keeps last frame's pose.
            if let Some(sampled) = window.sample() {
                self.rendered = sampled;
            }
        }
    }
}
