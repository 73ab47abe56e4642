use ream_bls::verifier::Verifier;
use ream_consensus_misc::{
    bitfield::sentinel_bit_length,
    constants::beacon::{MIN_ATTESTATION_INCLUSION_DELAY, SLOTS_PER_EPOCH},
    misc::compute_epoch_at_slot,
};
use ssz::Encode;

use crate::{
    attestation::Attestation, beacon_state::BeaconState,
    state_transition::operations::errors::AttestationError,
};

impl BeaconState {
    /// Check ``attestation`` against the state without modifying it.
    ///
    /// Rules are evaluated in a fixed order and the first failing rule is reported.
    pub fn validate_attestation(
        &self,
        attestation: &Attestation,
        verifier: &impl Verifier,
    ) -> Result<(), AttestationError> {
        let data = &attestation.data;
        let previous_epoch = self.get_previous_epoch();
        let current_epoch = self.get_current_epoch();

        if data.target.epoch != previous_epoch && data.target.epoch != current_epoch {
            return Err(AttestationError::IncorrectTargetEpoch {
                target_epoch: data.target.epoch,
                previous_epoch,
                current_epoch,
            });
        }

        let slot_epoch = compute_epoch_at_slot(data.slot);
        if data.target.epoch != slot_epoch {
            return Err(AttestationError::EpochMismatch {
                target_epoch: data.target.epoch,
                slot_epoch,
            });
        }

        if data.slot.saturating_add(MIN_ATTESTATION_INCLUSION_DELAY) > self.slot
            || self.slot > data.slot.saturating_add(SLOTS_PER_EPOCH)
        {
            return Err(AttestationError::InclusionDelayNotMet {
                attestation_slot: data.slot,
                state_slot: self.slot,
            });
        }

        let committee_count = self.get_committee_count_per_slot(data.target.epoch);
        if data.index >= committee_count {
            return Err(AttestationError::IndexExceedsCommitteeCount {
                index: data.index,
                committee_count,
            });
        }

        let committee = self
            .get_beacon_committee(data.slot, data.index)
            .map_err(|_| AttestationError::IndexingError)?;
        let indexed_attestation = self
            .get_indexed_attestation(attestation)
            .map_err(|_| AttestationError::IndexingError)?;

        let bits_length = aggregation_bits_length(attestation);
        if bits_length != committee.len() {
            return Err(AttestationError::MismatchedAggregationBitsLength {
                bits_length,
                committee_size: committee.len(),
            });
        }

        match self.is_valid_indexed_attestation(&indexed_attestation, verifier) {
            Ok(true) => Ok(()),
            Ok(false) | Err(_) => Err(AttestationError::InvalidSignature),
        }
    }
}

/// The committee-relative length of the aggregation bits: the position of the sentinel bit in the
/// SSZ encoding.
fn aggregation_bits_length(attestation: &Attestation) -> usize {
    sentinel_bit_length(&attestation.aggregation_bits.as_ssz_bytes()).unwrap_or_default()
}
