pub mod constants;
pub mod physics;

pub use constants::*;
pub use physics::*;
