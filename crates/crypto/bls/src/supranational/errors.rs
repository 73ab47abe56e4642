use blst::BLST_ERROR;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("{0:?}")]
pub struct BlstError(pub BLST_ERROR);

impl From<BLST_ERROR> for BlstError {
    fn from(err: BLST_ERROR) -> Self {
        Self(err)
    }
}
