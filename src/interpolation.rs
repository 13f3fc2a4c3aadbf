use glam::{Quat, Vec3};

use crate::game_logic::physics::PhysicalState;
use crate::game_logic::INTERP_EPSILON;

/// Cubic Hermite spline between two authoritative samples
///
/// Tangents are the endpoint velocities scaled by the window duration, so
/// the curve's derivative is in position units per unit of lerp ratio and
/// dividing it back out recovers a velocity.
#[derive(Clone, Copy, Debug)]
pub struct HermiteCubicSpline {
    pub start_location: Vec3,
    pub target_location: Vec3,
    pub start_derivative: Vec3,
    pub target_derivative: Vec3,
}

impl HermiteCubicSpline {
    pub fn interpolate_location(&self, lerp_ratio: f32) -> Vec3 {
        let t = lerp_ratio;
        let t2 = t * t;
        let t3 = t2 * t;

        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        self.start_location * h00
            + self.start_derivative * h10
            + self.target_location * h01
            + self.target_derivative * h11
    }

    /// Derivative of [`interpolate_location`] with respect to the ratio
    pub fn interpolate_derivative(&self, lerp_ratio: f32) -> Vec3 {
        let t = lerp_ratio;
        let t2 = t * t;

        let h00 = 6.0 * t2 - 6.0 * t;
        let h10 = 3.0 * t2 - 4.0 * t + 1.0;
        let h01 = -6.0 * t2 + 6.0 * t;
        let h11 = 3.0 * t2 - 2.0 * t;

        self.start_location * h00
            + self.start_derivative * h10
            + self.target_location * h01
            + self.target_derivative * h11
    }
}

/// Interpolation state of a simulated proxy between two snapshots
///
/// Rebuilt from scratch every time a new authority state arrives: the
/// currently rendered pose becomes the start sample and the snapshot the
/// target. The time domain is the measured gap between the last two
/// arrivals, not a fixed constant, because the update cadence is
/// irregular. Windows are replaced wholesale, never merged.
#[derive(Clone, Copy, Debug)]
pub struct InterpolationWindow {
    start: PhysicalState,
    target: PhysicalState,
    update_interval: f32,
    elapsed: f32,
}

impl InterpolationWindow {
    pub fn new(start: PhysicalState, target: PhysicalState, update_interval: f32) -> Self {
        Self {
            start,
            target,
            update_interval,
            elapsed: 0.0,
        }
    }

    pub fn advance(&mut self, delta: f32) {
        self.elapsed += delta;
    }

    /// Pose and velocity at the current elapsed time
    ///
    /// Returns `None` for a degenerate window (interval below epsilon,
    /// i.e. no second sample yet); the caller keeps the last rendered
    /// pose for that frame. The ratio is deliberately not clamped above
    /// 1: a late snapshot lets the spline run on rather than freezing.
    pub fn sample(&self) -> Option<PhysicalState> {
        if self.update_interval < INTERP_EPSILON {
            return None;
        }
        let lerp_ratio = self.elapsed / self.update_interval;

        let spline = self.create_spline();
        let position = spline.interpolate_location(lerp_ratio);
        let velocity = spline.interpolate_derivative(lerp_ratio) / self.velocity_to_derivative();
        let orientation =
            slerp_orientation(self.start.orientation, self.target.orientation, lerp_ratio);

        Some(PhysicalState {
            position,
            orientation,
            velocity,
        })
    }

    fn create_spline(&self) -> HermiteCubicSpline {
        HermiteCubicSpline {
            start_location: self.start.position,
            target_location: self.target.position,
            start_derivative: self.start.velocity * self.velocity_to_derivative(),
            target_derivative: self.target.velocity * self.velocity_to_derivative(),
        }
    }

    // Unit conversion between velocity (m/s) and the spline's derivative
    // (m per unit of lerp ratio).
    fn velocity_to_derivative(&self) -> f32 {
        self.update_interval
    }
}

/// Shortest-path rotation interpolation, kept out of the spline since
/// rotation is not a vector quantity. Takes the raw ratio so a late
/// snapshot keeps the rotation moving in step with the position.
pub fn slerp_orientation(start: Quat, target: Quat, lerp_ratio: f32) -> Quat {
    start.slerp(target, lerp_ratio)
}
