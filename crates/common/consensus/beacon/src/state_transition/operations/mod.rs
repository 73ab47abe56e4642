pub mod attestation;
pub mod errors;

use ream_bls::verifier::Verifier;
use ream_consensus_misc::constants::beacon::MAX_ATTESTATIONS;

use crate::{
    attestation::Attestation, beacon_state::BeaconState,
    state_transition::operations::errors::BlockAttestationsError,
};

impl BeaconState {
    /// Process the attestations of a block body in order, each against the state produced by the
    /// previous one.
    pub fn process_attestations(
        &self,
        attestations: &[Attestation],
        verifier: &impl Verifier,
    ) -> Result<BeaconState, BlockAttestationsError> {
        if attestations.len() as u64 > MAX_ATTESTATIONS {
            return Err(BlockAttestationsError::TooManyAttestations {
                count: attestations.len(),
                max: MAX_ATTESTATIONS,
            });
        }

        attestations
            .iter()
            .enumerate()
            .try_fold(self.clone(), |state, (position, attestation)| {
                state
                    .process_attestation(attestation, verifier)
                    .map_err(|error| BlockAttestationsError::InvalidAttestation { position, error })
            })
    }
}
