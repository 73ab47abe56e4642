use alloy_primitives::B256;
use ssz_derive::{Decode, Encode};

#[derive(Debug, PartialEq, Clone, Encode, Decode, Default, Eq, Hash)]
pub struct PrivateKey {
    pub inner: B256,
}
