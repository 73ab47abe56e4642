use crate::{PubKey, errors::BLSError, signature::BLSSignature, traits::Verifiable};

/// Signature checking strategy used by state transition code.
pub trait Verifier {
    fn fast_aggregate_verify(
        &self,
        pubkeys: &[&PubKey],
        message: &[u8],
        signature: &BLSSignature,
    ) -> Result<bool, BLSError>;
}

/// Verifies every signature immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleVerifier;

impl Verifier for SingleVerifier {
    fn fast_aggregate_verify(
        &self,
        pubkeys: &[&PubKey],
        message: &[u8],
        signature: &BLSSignature,
    ) -> Result<bool, BLSError> {
        signature.fast_aggregate_verify(pubkeys, message)
    }
}

/// Accepts every signature.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullVerifier;

impl Verifier for NullVerifier {
    fn fast_aggregate_verify(
        &self,
        _pubkeys: &[&PubKey],
        _message: &[u8],
        _signature: &BLSSignature,
    ) -> Result<bool, BLSError> {
        Ok(true)
    }
}
