// Vehicle tuning
pub const VEHICLE_MASS: f32 = 1000.0; // kg
pub const MAX_DRIVING_FORCE: f32 = 10_000.0; // N at full throttle
pub const DRAG_COEFFICIENT: f32 = 16.0;
pub const ROLLING_COEFFICIENT: f32 = 0.015;
pub const MAX_DEGREES_PER_SECOND: f32 = 90.0; // at full steering throw
pub const GRAVITY: f32 = 9.81; // m/s^2, for the rolling-resistance normal force

// Below this forward speed the steering response scales down linearly,
// so a stationary kart cannot spin in place.
pub const LOW_SPEED_TURN_THRESHOLD: f32 = 5.0; // m/s

// A move claiming a longer frame than this fails the plausibility check.
pub const MAX_MOVE_DELTA: f32 = 0.25; // s

// Interpolation windows shorter than this are degenerate and skipped.
pub const INTERP_EPSILON: f32 = 1e-4; // s
