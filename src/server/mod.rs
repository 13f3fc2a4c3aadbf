// Authoritative side of the protocol: untrusted moves come in over the
// channel, pass the validator or vanish, and the accepted result is
// broadcast as the one true state.

pub mod authority;
pub mod validation;

pub use authority::{AuthorityHost, AuthorityState};
pub use validation::MoveValidator;
