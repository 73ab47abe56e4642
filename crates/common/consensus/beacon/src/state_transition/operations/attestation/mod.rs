pub mod rewards;
pub mod validation;

use ream_bls::verifier::Verifier;
use tracing::{debug, trace};

use crate::{
    attestation::Attestation, beacon_state::BeaconState,
    state_transition::operations::errors::AttestationError,
};

impl BeaconState {
    /// Validate ``attestation``, credit its participation flags and pay the block proposer.
    ///
    /// On success the returned state carries the update; ``self`` is never modified.
    pub fn process_attestation(
        &self,
        attestation: &Attestation,
        verifier: &impl Verifier,
    ) -> Result<BeaconState, AttestationError> {
        let result = self
            .validate_attestation(attestation, verifier)
            .and_then(|()| {
                self.compute_participation_rewards(
                    &attestation.data,
                    &attestation.aggregation_bits,
                )
            })
            .and_then(|rewards| {
                let attesting_count = rewards.attesting_indices.len();
                let proposer_reward = rewards.proposer_reward();
                let state = self.apply_participation_rewards(rewards)?;
                debug!(
                    slot = attestation.data.slot,
                    committee_index = attestation.data.index,
                    attesting_count,
                    proposer_reward,
                    "Processed attestation"
                );
                Ok(state)
            });

        if let Err(err) = &result {
            trace!(
                slot = attestation.data.slot,
                committee_index = attestation.data.index,
                reason = %err,
                "Rejected attestation"
            );
        }
        result
    }
}
