// Per-item lifecycles driven while a decision is in flight.
// Each machine lives in its own module: statig generates a `State` enum per machine.

pub mod connect;
pub mod review;

pub use connect::{ConnectEvent, ConnectPhase, ConnectResponse, ConnectResponseMachine};
pub use review::{ReviewEvent, ReviewPhase, SignupReview, SignupReviewMachine};
