use thiserror::Error;

/// Errors surfaced by the replication layer.
///
/// Rejected moves on the server are *not* errors: the protocol drops them
/// silently and the owning client only notices through reconciliation.
/// These variants cover local misuse and torn-down channels instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReplicationError {
    /// A move was constructed or appended with a timestamp that does not
    /// advance the issuing peer's clock.
    #[error("move time {time} is not after the previous move")]
    NonMonotonicMove { time: f64 },

    /// A move was constructed with a non-positive or non-finite delta time.
    #[error("move delta_time must be positive and finite, got {delta_time}")]
    InvalidDeltaTime { delta_time: f32 },

    /// Control input was applied to a peer role that never simulates
    /// locally (a simulated proxy).
    #[error("control input applied to a non-controlling peer role")]
    RoleMismatch,

    /// The server side of the move submission channel has gone away.
    #[error("move channel closed")]
    ChannelClosed,
}
