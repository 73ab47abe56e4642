#![warn(clippy::unwrap_used)]

pub mod attestation;
pub mod beacon_state;
pub mod state_transition;

#[cfg(any(test, feature = "test_consensus"))]
pub mod test_utils;
