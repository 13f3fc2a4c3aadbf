use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::ReplicationError;
use crate::game_logic::{
    DRAG_COEFFICIENT, GRAVITY, LOW_SPEED_TURN_THRESHOLD, MAX_DEGREES_PER_SECOND, MAX_DRIVING_FORCE,
    MAX_MOVE_DELTA, ROLLING_COEFFICIENT, VEHICLE_MASS,
};

/// One discrete control sample, immutable once created
///
/// Moves are the only thing the owning client ever sends to the server.
/// `time` comes from the issuing peer's own monotonic clock; peers never
/// compare each other's clocks, only their own.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Move {
    pub throttle: f32,
    pub steering_throw: f32,
    pub delta_time: f32,
    pub time: f64,
}

impl Move {
    /// Construct a move, rejecting a non-positive or non-finite frame time
    /// up front so the integrator never sees one.
    pub fn new(
        throttle: f32,
        steering_throw: f32,
        delta_time: f32,
        time: f64,
    ) -> Result<Self, ReplicationError> {
        if !(delta_time.is_finite() && delta_time > 0.0) {
            return Err(ReplicationError::InvalidDeltaTime { delta_time });
        }
        Ok(Self {
            throttle,
            steering_throw,
            delta_time,
            time,
        })
    }

    /// Basic plausibility check used by the server-side validator
    ///
    /// Range violations here mean a buggy or hostile client; the move is
    /// dropped without a reply either way.
    pub fn is_plausible(&self) -> bool {
        self.throttle.is_finite()
            && self.steering_throw.is_finite()
            && self.time.is_finite()
            && (-1.0..=1.0).contains(&self.throttle)
            && (-1.0..=1.0).contains(&self.steering_throw)
            && self.delta_time > 0.0
            && self.delta_time <= MAX_MOVE_DELTA
    }
}

/// Complete physical state of one kart
///
/// Mutated only by [`simulate_move`]; every role (prediction, server
/// authority, replay) goes through that single function so their
/// trajectories stay bit-identical.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct PhysicalState {
    pub position: Vec3,
    pub orientation: Quat,
    pub velocity: Vec3,
}

impl PhysicalState {
    pub fn at_rest(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
        }
    }

    /// Forward axis of the kart (+X at identity orientation)
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::X
    }
}

/// Vehicle tuning shared by every peer in a session
///
/// All peers must be constructed with identical values or replay and
/// prediction diverge from the server.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct VehicleConfig {
    pub mass: f32,
    pub max_driving_force: f32,
    pub drag_coefficient: f32,
    pub rolling_coefficient: f32,
    pub max_degrees_per_second: f32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            mass: VEHICLE_MASS,
            max_driving_force: MAX_DRIVING_FORCE,
            drag_coefficient: DRAG_COEFFICIENT,
            rolling_coefficient: ROLLING_COEFFICIENT,
            max_degrees_per_second: MAX_DEGREES_PER_SECOND,
        }
    }
}

/// Advance a physical state by one move
///
/// This is the deterministic core shared between client prediction, the
/// server's authoritative step and reconciliation replay. Pure function:
/// identical `(state, move)` pairs produce identical output on every peer.
///
/// Net force is throttle-scaled drive along the forward axis plus air drag
/// (proportional to speed squared) and rolling resistance (proportional to
/// speed), both opposing motion. Integration is semi-implicit Euler:
/// velocity first, then position from the updated velocity.
pub fn simulate_move(state: &PhysicalState, mv: &Move, config: &VehicleConfig) -> PhysicalState {
    let mut next = *state;

    let force = next.forward() * config.max_driving_force * mv.throttle
        + air_resistance(next.velocity, config)
        + rolling_resistance(next.velocity, config);

    let acceleration = force / config.mass;
    next.velocity += acceleration * mv.delta_time;

    apply_rotation(&mut next, mv, config);

    next.position += next.velocity * mv.delta_time;
    next
}

fn air_resistance(velocity: Vec3, config: &VehicleConfig) -> Vec3 {
    -velocity.normalize_or_zero() * velocity.length_squared() * config.drag_coefficient
}

fn rolling_resistance(velocity: Vec3, config: &VehicleConfig) -> Vec3 {
    let normal_force = config.mass * GRAVITY;
    -velocity.normalize_or_zero() * config.rolling_coefficient * normal_force
}

/// Rotate the heading about the up axis by the steering throw
///
/// The turn rate scales with forward speed up to [`LOW_SPEED_TURN_THRESHOLD`]
/// and is signed, so reversing inverts the steering like a real car and a
/// stationary kart cannot rotate at all. Velocity is rotated together with
/// the heading so the kart does not keep sliding along its old axis.
fn apply_rotation(state: &mut PhysicalState, mv: &Move, config: &VehicleConfig) {
    let forward_speed = state.velocity.dot(state.forward());
    let speed_scale = (forward_speed / LOW_SPEED_TURN_THRESHOLD).clamp(-1.0, 1.0);

    let rotation_angle = mv.steering_throw
        * config.max_degrees_per_second.to_radians()
        * mv.delta_time
        * speed_scale;

    let rotation_delta = Quat::from_rotation_y(-rotation_angle);
    state.orientation = (rotation_delta * state.orientation).normalize();
    state.velocity = rotation_delta * state.velocity;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_throttle(time: f64) -> Move {
        Move::new(1.0, 0.0, 0.1, time).unwrap()
    }

    #[test]
    fn test_move_rejects_bad_delta_time() {
        assert!(Move::new(1.0, 0.0, 0.0, 1.0).is_err());
        assert!(Move::new(1.0, 0.0, -0.016, 1.0).is_err());
        assert!(Move::new(1.0, 0.0, f32::NAN, 1.0).is_err());
        assert!(Move::new(1.0, 0.0, 0.016, 1.0).is_ok());
    }

    #[test]
    fn test_plausibility_ranges() {
        let mv = Move::new(1.5, 0.0, 0.016, 1.0).unwrap();
        assert!(!mv.is_plausible());

        let mv = Move::new(0.5, -2.0, 0.016, 1.0).unwrap();
        assert!(!mv.is_plausible());

        let mv = Move::new(0.5, -1.0, 1.0, 1.0).unwrap();
        assert!(!mv.is_plausible()); // frame longer than MAX_MOVE_DELTA

        let mv = Move::new(-1.0, 1.0, 0.016, 1.0).unwrap();
        assert!(mv.is_plausible());
    }

    #[test]
    fn test_golden_acceleration_from_rest() {
        // 1000 kg kart, 10 000 N full throttle, one 0.1 s move from rest.
        // Resistance vanishes at zero speed, so the first step gains
        // delta_time * max_driving_force / mass along the forward axis.
        let config = VehicleConfig::default();
        let start = PhysicalState::at_rest(Vec3::ZERO);

        let next = simulate_move(&start, &full_throttle(1.0), &config);

        let forward_speed = next.velocity.dot(Vec3::X);
        assert!((forward_speed - 1.0).abs() < 1e-6);
        // Semi-implicit Euler: position moved by the updated velocity.
        assert!((next.position.x - 0.1).abs() < 1e-6);
        assert_eq!(next.velocity.y, 0.0);
        assert_eq!(next.velocity.z, 0.0);
    }

    #[test]
    fn test_resistance_opposes_motion() {
        let config = VehicleConfig::default();
        let start = PhysicalState::at_rest(Vec3::ZERO);

        let after_one = simulate_move(&start, &full_throttle(1.0), &config);
        let after_two = simulate_move(&after_one, &full_throttle(1.1), &config);

        // Drag and rolling resistance are active on the second step, so the
        // speed gain must be strictly smaller than the first step's.
        let gain_one = after_one.velocity.length();
        let gain_two = after_two.velocity.length() - gain_one;
        assert!(gain_two < gain_one);
        assert!(gain_two > 0.0);
    }

    #[test]
    fn test_determinism_bit_identical() {
        let config = VehicleConfig::default();
        let mv = Move::new(0.7, -0.3, 0.016, 2.5).unwrap();
        let state = PhysicalState {
            position: Vec3::new(3.0, 0.0, -8.0),
            orientation: Quat::from_rotation_y(0.4),
            velocity: Vec3::new(6.0, 0.0, 1.0),
        };

        let a = simulate_move(&state, &mv, &config);
        let b = simulate_move(&state, &mv, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn test_determinism_across_instances() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand::rngs::StdRng::seed_from_u64(67);

        let config = VehicleConfig::default();
        let mut first = PhysicalState::at_rest(Vec3::ZERO);
        let mut second = PhysicalState::at_rest(Vec3::ZERO);

        for i in 0..200 {
            let mv = Move::new(
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(0.008..0.034),
                i as f64 * 0.02,
            )
            .unwrap();
            first = simulate_move(&first, &mv, &config);
            second = simulate_move(&second, &mv, &config);
        }

        assert_eq!(first, second);
    }

    #[test]
    fn test_no_turning_in_place() {
        let config = VehicleConfig::default();
        let start = PhysicalState::at_rest(Vec3::ZERO);
        let mv = Move::new(0.0, 1.0, 0.1, 1.0).unwrap();

        let next = simulate_move(&start, &mv, &config);
        assert_eq!(next.orientation, Quat::IDENTITY);
    }

    #[test]
    fn test_steering_turns_at_speed() {
        let config = VehicleConfig::default();
        let mut state = PhysicalState::at_rest(Vec3::ZERO);
        state.velocity = Vec3::X * 20.0;

        let mv = Move::new(0.0, 1.0, 0.1, 1.0).unwrap();
        let next = simulate_move(&state, &mv, &config);

        assert!(next.orientation != Quat::IDENTITY);
        // Velocity follows the heading instead of sliding along +X.
        let lateral = next.velocity - next.forward() * next.velocity.dot(next.forward());
        assert!(lateral.length() < 1e-3);
    }

    #[test]
    fn test_reversing_inverts_steering() {
        let config = VehicleConfig::default();
        let mv = Move::new(0.0, 1.0, 0.1, 1.0).unwrap();

        let mut ahead = PhysicalState::at_rest(Vec3::ZERO);
        ahead.velocity = Vec3::X * 10.0;
        let mut reversing = PhysicalState::at_rest(Vec3::ZERO);
        reversing.velocity = Vec3::X * -10.0;

        let fwd = simulate_move(&ahead, &mv, &config);
        let back = simulate_move(&reversing, &mv, &config);

        // Same steering throw bends the heading to opposite sides.
        assert!(fwd.forward().z.signum() != back.forward().z.signum());
    }
}
