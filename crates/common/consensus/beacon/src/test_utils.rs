use alloy_primitives::B256;
use ream_bls::{BLSSignature, PubKey};
use ream_consensus_misc::{
    attestation_data::AttestationData,
    checkpoint::Checkpoint,
    constants::beacon::{
        EPOCHS_PER_HISTORICAL_VECTOR, FAR_FUTURE_EPOCH, GENESIS_FORK_VERSION,
        MAX_EFFECTIVE_BALANCE, SLOTS_PER_HISTORICAL_ROOT,
    },
    fork::Fork,
    misc::compute_epoch_at_slot,
    validator::Validator,
};
use ssz_types::{BitList, FixedVector, VariableList, typenum::U2048};

use crate::{attestation::Attestation, beacon_state::BeaconState};

/// Builds beacon states whose validators are all active from genesis with the maximum effective
/// balance. Every block root is distinct and the two justified checkpoints differ.
#[derive(Debug, Clone)]
pub struct StateBuilder {
    validator_count: usize,
    slot: u64,
    pubkeys: Vec<PubKey>,
}

impl StateBuilder {
    pub fn new(validator_count: usize) -> Self {
        Self {
            validator_count,
            slot: 0,
            pubkeys: vec![],
        }
    }

    pub fn slot(mut self, slot: u64) -> Self {
        self.slot = slot;
        self
    }

    /// Use ``pubkeys`` for the first validators; the rest keep an empty key.
    pub fn pubkeys(mut self, pubkeys: impl IntoIterator<Item = PubKey>) -> Self {
        self.pubkeys = pubkeys.into_iter().collect();
        self
    }

    pub fn build(self) -> BeaconState {
        let validators = (0..self.validator_count)
            .map(|index| Validator {
                pubkey: self.pubkeys.get(index).cloned().unwrap_or_default(),
                withdrawal_credentials: B256::ZERO,
                effective_balance: MAX_EFFECTIVE_BALANCE,
                slashed: false,
                activation_eligibility_epoch: 0,
                activation_epoch: 0,
                exit_epoch: FAR_FUTURE_EPOCH,
                withdrawable_epoch: FAR_FUTURE_EPOCH,
            })
            .collect::<Vec<_>>();

        let block_roots = (0..SLOTS_PER_HISTORICAL_ROOT)
            .map(|slot| B256::left_padding_from(&(slot + 1).to_be_bytes()))
            .collect::<Vec<_>>();
        let randao_mixes = (0..EPOCHS_PER_HISTORICAL_VECTOR)
            .map(|epoch| B256::right_padding_from(&(epoch + 1).to_le_bytes()))
            .collect::<Vec<_>>();

        let current_epoch = compute_epoch_at_slot(self.slot);
        BeaconState {
            genesis_time: 0,
            genesis_validators_root: B256::repeat_byte(0x42),
            slot: self.slot,
            fork: Fork {
                previous_version: GENESIS_FORK_VERSION,
                current_version: GENESIS_FORK_VERSION,
                epoch: 0,
            },
            block_roots: FixedVector::from(block_roots),
            balances: VariableList::from(vec![MAX_EFFECTIVE_BALANCE; self.validator_count]),
            validators: VariableList::from(validators),
            randao_mixes: FixedVector::from(randao_mixes),
            previous_epoch_participation: VariableList::from(vec![0; self.validator_count]),
            current_epoch_participation: VariableList::from(vec![0; self.validator_count]),
            previous_justified_checkpoint: Checkpoint {
                epoch: current_epoch.saturating_sub(2),
                root: B256::repeat_byte(0x01),
            },
            current_justified_checkpoint: Checkpoint {
                epoch: current_epoch.saturating_sub(1),
                root: B256::repeat_byte(0x02),
            },
            finalized_checkpoint: Checkpoint::default(),
        }
    }
}

/// Build an unsigned attestation for committee ``index`` at ``slot`` voting for the state's own
/// block roots. ``participates`` selects committee members by their position in the committee.
pub fn build_attestation(
    state: &BeaconState,
    slot: u64,
    index: u64,
    participates: impl Fn(usize) -> bool,
) -> Attestation {
    let committee = state
        .get_beacon_committee(slot, index)
        .expect("committee should be computable");
    let mut aggregation_bits =
        BitList::<U2048>::with_capacity(committee.len()).expect("committee fits in a bitlist");
    for position in (0..committee.len()).filter(|&position| participates(position)) {
        aggregation_bits
            .set(position, true)
            .expect("position is within the committee");
    }

    let epoch = compute_epoch_at_slot(slot);
    let source = if epoch == state.get_current_epoch() {
        state.current_justified_checkpoint
    } else {
        state.previous_justified_checkpoint
    };

    Attestation {
        aggregation_bits,
        data: AttestationData {
            slot,
            index,
            beacon_block_root: state.get_block_root_at_slot(slot).unwrap_or_default(),
            source,
            target: Checkpoint {
                epoch,
                root: state.get_block_root(epoch).unwrap_or_default(),
            },
        },
        signature: BLSSignature::infinity(),
    }
}
