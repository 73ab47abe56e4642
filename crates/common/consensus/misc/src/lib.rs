#![warn(clippy::unwrap_used)]

pub mod attestation_data;
pub mod bitfield;
pub mod checkpoint;
pub mod constants;
pub mod fork;
pub mod fork_data;
pub mod indexed_attestation;
pub mod misc;
pub mod participation_flags;
pub mod signing_data;
pub mod validator;
