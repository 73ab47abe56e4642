use thiserror::Error;

use crate::supranational::errors::BlstError;

#[derive(Error, PartialEq, Debug)]
pub enum BLSError {
    #[error("blst error: {0}")]
    BlstError(#[from] BlstError),
    #[error("Invalid hex string")]
    InvalidHexString,
    #[error("Invalid byte length")]
    InvalidByteLength,
    #[error("Invalid public key")]
    InvalidPublicKey,
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Invalid private key")]
    InvalidPrivateKey,
}
