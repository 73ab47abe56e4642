use std::{cmp::max, collections::BTreeSet};

use alloy_primitives::{B256, aliases::B32};
use anyhow::{anyhow, ensure};
use ethereum_hashing::{hash, hash_fixed};
use ream_bls::verifier::Verifier;
use ream_consensus_misc::{
    attestation_data::AttestationData,
    checkpoint::Checkpoint,
    constants::beacon::{
        BASE_REWARD_FACTOR, DOMAIN_BEACON_ATTESTER, DOMAIN_BEACON_PROPOSER,
        EFFECTIVE_BALANCE_INCREMENT, EPOCHS_PER_HISTORICAL_VECTOR, GENESIS_EPOCH,
        MAX_COMMITTEES_PER_SLOT, MAX_EFFECTIVE_BALANCE, MAX_RANDOM_BYTE,
        MIN_ATTESTATION_INCLUSION_DELAY, MIN_SEED_LOOKAHEAD, SLOTS_PER_EPOCH,
        SLOTS_PER_HISTORICAL_ROOT, TARGET_COMMITTEE_SIZE,
    },
    fork::Fork,
    indexed_attestation::IndexedAttestation,
    misc::{
        compute_committee, compute_domain, compute_epoch_at_slot, compute_shuffled_index,
        compute_signing_root, compute_start_slot_at_epoch, integer_squareroot,
        is_sorted_and_unique,
    },
    participation_flags::{ParticipationFlag, ParticipationFlags},
    validator::Validator,
};
use ssz_derive::{Decode, Encode};
use ssz_types::{
    BitList, FixedVector, VariableList,
    typenum::{U2048, U8192, U65536, U1099511627776},
};
use tree_hash_derive::TreeHash;

use crate::{attestation::Attestation, state_transition::operations::errors::AttestationError};

/// The slice of the beacon state read and written by attestation processing.
///
/// Transitions never mutate a state in place: each one returns a new snapshot.
#[derive(Debug, PartialEq, Clone, Encode, Decode, TreeHash)]
pub struct BeaconState {
    // Versioning
    pub genesis_time: u64,
    pub genesis_validators_root: B256,
    pub slot: u64,
    pub fork: Fork,

    // History
    pub block_roots: FixedVector<B256, U8192>,

    // Registry
    pub validators: VariableList<Validator, U1099511627776>,
    pub balances: VariableList<u64, U1099511627776>,

    // Randomness
    pub randao_mixes: FixedVector<B256, U65536>,

    // Participation
    pub previous_epoch_participation: VariableList<u8, U1099511627776>,
    pub current_epoch_participation: VariableList<u8, U1099511627776>,

    // Finality
    pub previous_justified_checkpoint: Checkpoint,
    pub current_justified_checkpoint: Checkpoint,
    pub finalized_checkpoint: Checkpoint,
}

impl BeaconState {
    /// Return the current epoch.
    pub fn get_current_epoch(&self) -> u64 {
        compute_epoch_at_slot(self.slot)
    }

    /// Return the previous epoch (unless the current epoch is ``GENESIS_EPOCH``).
    pub fn get_previous_epoch(&self) -> u64 {
        let current_epoch = self.get_current_epoch();
        if current_epoch == GENESIS_EPOCH {
            GENESIS_EPOCH
        } else {
            current_epoch - 1
        }
    }

    /// Return the block root at the start of a recent ``epoch``.
    pub fn get_block_root(&self, epoch: u64) -> anyhow::Result<B256> {
        self.get_block_root_at_slot(compute_start_slot_at_epoch(epoch))
    }

    /// Return the block root at a recent ``slot``.
    pub fn get_block_root_at_slot(&self, slot: u64) -> anyhow::Result<B256> {
        ensure!(
            slot < self.slot && self.slot <= slot.saturating_add(SLOTS_PER_HISTORICAL_ROOT),
            "slot given was outside of block_roots range"
        );
        Ok(self.block_roots[(slot % SLOTS_PER_HISTORICAL_ROOT) as usize])
    }

    /// Return the randao mix at a recent ``epoch``.
    pub fn get_randao_mix(&self, epoch: u64) -> B256 {
        self.randao_mixes[(epoch % EPOCHS_PER_HISTORICAL_VECTOR) as usize]
    }

    /// Return the sequence of active validator indices at ``epoch``.
    pub fn get_active_validator_indices(&self, epoch: u64) -> Vec<u64> {
        self.validators
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.is_active_validator(epoch).then_some(i as u64))
            .collect()
    }

    /// Return the seed at ``epoch``.
    pub fn get_seed(&self, epoch: u64, domain_type: B32) -> B256 {
        let mix =
            self.get_randao_mix(epoch + EPOCHS_PER_HISTORICAL_VECTOR - MIN_SEED_LOOKAHEAD - 1);
        let epoch_with_index =
            [domain_type.as_slice(), &epoch.to_le_bytes(), mix.as_slice()].concat();
        B256::from(hash_fixed(&epoch_with_index))
    }

    /// Return the number of committees in each slot for the given ``epoch``.
    pub fn get_committee_count_per_slot(&self, epoch: u64) -> u64 {
        (self.get_active_validator_indices(epoch).len() as u64
            / SLOTS_PER_EPOCH
            / TARGET_COMMITTEE_SIZE)
            .clamp(1, MAX_COMMITTEES_PER_SLOT)
    }

    /// Return the beacon committee at ``slot`` for ``index``.
    pub fn get_beacon_committee(&self, slot: u64, index: u64) -> anyhow::Result<Vec<u64>> {
        let epoch = compute_epoch_at_slot(slot);
        let committees_per_slot = self.get_committee_count_per_slot(epoch);
        compute_committee(
            &self.get_active_validator_indices(epoch),
            self.get_seed(epoch, DOMAIN_BEACON_ATTESTER),
            (slot % SLOTS_PER_EPOCH) * committees_per_slot + index,
            committees_per_slot * SLOTS_PER_EPOCH,
        )
    }

    /// Return from ``indices`` a random index sampled by effective balance.
    pub fn compute_proposer_index(&self, indices: &[u64], seed: B256) -> anyhow::Result<u64> {
        ensure!(!indices.is_empty(), "Cannot select a proposer from an empty set");

        let total = indices.len();
        let mut i: usize = 0;
        loop {
            let candidate_index = indices[compute_shuffled_index(i % total, total, seed)?];
            let random_bytes = hash(&[seed.as_slice(), &((i / 32) as u64).to_le_bytes()].concat());
            let random_byte = random_bytes[i % 32] as u64;
            let effective_balance = self
                .validators
                .get(candidate_index as usize)
                .ok_or_else(|| anyhow!("Validator {candidate_index} not found"))?
                .effective_balance;

            if effective_balance * MAX_RANDOM_BYTE >= MAX_EFFECTIVE_BALANCE * random_byte {
                return Ok(candidate_index);
            }

            i += 1;
        }
    }

    /// Return the beacon proposer index at the current slot.
    pub fn get_beacon_proposer_index(&self) -> anyhow::Result<u64> {
        let epoch = self.get_current_epoch();
        let seed = B256::from(hash_fixed(
            &[
                self.get_seed(epoch, DOMAIN_BEACON_PROPOSER).as_slice(),
                &self.slot.to_le_bytes(),
            ]
            .concat(),
        ));
        let indices = self.get_active_validator_indices(epoch);
        self.compute_proposer_index(&indices, seed)
    }

    /// Return the combined effective balance of the ``indices``.
    /// ``EFFECTIVE_BALANCE_INCREMENT`` Gwei minimum to avoid divisions by zero.
    pub fn get_total_balance(&self, indices: impl IntoIterator<Item = u64>) -> u64 {
        max(
            EFFECTIVE_BALANCE_INCREMENT,
            indices
                .into_iter()
                .filter_map(|index| self.validators.get(index as usize))
                .map(|validator| validator.effective_balance)
                .sum(),
        )
    }

    /// Return the combined effective balance of the active validators.
    pub fn get_total_active_balance(&self) -> u64 {
        self.get_total_balance(self.get_active_validator_indices(self.get_current_epoch()))
    }

    pub fn get_base_reward_per_increment(&self) -> u64 {
        EFFECTIVE_BALANCE_INCREMENT * BASE_REWARD_FACTOR
            / integer_squareroot(self.get_total_active_balance())
    }

    /// Return the base reward for the validator defined by ``index``.
    ///
    /// ``base_reward_per_increment`` depends only on the total active balance, so callers
    /// computing many base rewards against one state pass it in once.
    pub fn get_base_reward(
        &self,
        index: u64,
        base_reward_per_increment: u64,
    ) -> anyhow::Result<u64> {
        let validator = self
            .validators
            .get(index as usize)
            .ok_or_else(|| anyhow!("Validator {index} not found"))?;
        let increments = validator.effective_balance / EFFECTIVE_BALANCE_INCREMENT;
        Ok(increments * base_reward_per_increment)
    }

    /// Return the signature domain (fork version concatenated with domain type) of a message.
    pub fn get_domain(&self, domain_type: B32, epoch: Option<u64>) -> B256 {
        let epoch = epoch.unwrap_or_else(|| self.get_current_epoch());
        compute_domain(
            domain_type,
            Some(self.fork.version_at_epoch(epoch)),
            Some(self.genesis_validators_root),
        )
    }

    /// Return the flags an attestation with ``data`` earns when included ``inclusion_delay``
    /// slots after its own slot.
    pub fn get_attestation_participation_flag_indices(
        &self,
        data: &AttestationData,
        inclusion_delay: u64,
    ) -> Result<ParticipationFlags, AttestationError> {
        let justified_checkpoint = if data.target.epoch == self.get_current_epoch() {
            self.current_justified_checkpoint
        } else {
            self.previous_justified_checkpoint
        };

        let is_matching_source = data.source == justified_checkpoint;
        if !is_matching_source {
            return Err(AttestationError::SourceMismatch);
        }

        let target_slot = compute_start_slot_at_epoch(data.target.epoch);
        let target_root = self
            .get_block_root(data.target.epoch)
            .map_err(|_| AttestationError::BlockRootUnavailable { slot: target_slot })?;
        let is_matching_target = data.target.root == target_root;

        let head_root = self
            .get_block_root_at_slot(data.slot)
            .map_err(|_| AttestationError::BlockRootUnavailable { slot: data.slot })?;
        let is_matching_head = is_matching_target && data.beacon_block_root == head_root;

        let mut participation_flags = ParticipationFlags::default();
        if inclusion_delay <= integer_squareroot(SLOTS_PER_EPOCH) {
            participation_flags = participation_flags.add_flag(ParticipationFlag::TimelySource);
        }
        if is_matching_target {
            participation_flags = participation_flags.add_flag(ParticipationFlag::TimelyTarget);
        }
        if is_matching_head && inclusion_delay == MIN_ATTESTATION_INCLUSION_DELAY {
            participation_flags = participation_flags.add_flag(ParticipationFlag::TimelyHead);
        }

        Ok(participation_flags)
    }

    /// Return the set of attesting indices corresponding to ``data`` and ``aggregation_bits``.
    ///
    /// Bits past the end of ``aggregation_bits`` read as unset.
    pub fn get_attesting_indices(
        &self,
        data: &AttestationData,
        aggregation_bits: &BitList<U2048>,
    ) -> anyhow::Result<BTreeSet<u64>> {
        let committee = self.get_beacon_committee(data.slot, data.index)?;
        Ok(committee
            .into_iter()
            .enumerate()
            .filter(|(i, _)| aggregation_bits.get(*i).unwrap_or(false))
            .map(|(_, index)| index)
            .collect())
    }

    /// Return the indexed attestation corresponding to ``attestation``.
    pub fn get_indexed_attestation(
        &self,
        attestation: &Attestation,
    ) -> anyhow::Result<IndexedAttestation> {
        let attesting_indices = self
            .get_attesting_indices(&attestation.data, &attestation.aggregation_bits)?
            .into_iter()
            .collect::<Vec<_>>();
        Ok(IndexedAttestation {
            attesting_indices: VariableList::new(attesting_indices)
                .map_err(|err| anyhow!("Too many attesting indices: {err:?}"))?,
            data: attestation.data.clone(),
            signature: attestation.signature.clone(),
        })
    }

    /// Check if ``indexed_attestation`` is not empty, has sorted and unique indices and has a valid
    /// aggregate signature.
    pub fn is_valid_indexed_attestation(
        &self,
        indexed_attestation: &IndexedAttestation,
        verifier: &impl Verifier,
    ) -> anyhow::Result<bool> {
        let indices = &indexed_attestation.attesting_indices;
        if indices.is_empty() || !is_sorted_and_unique(indices) {
            return Ok(false);
        }

        let pubkeys = indices
            .iter()
            .map(|&index| {
                self.validators
                    .get(index as usize)
                    .map(|validator| &validator.pubkey)
                    .ok_or_else(|| anyhow!("Invalid validator index {index}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let domain = self.get_domain(
            DOMAIN_BEACON_ATTESTER,
            Some(indexed_attestation.data.target.epoch),
        );
        let signing_root = compute_signing_root(&indexed_attestation.data, domain);

        verifier
            .fast_aggregate_verify(
                &pubkeys,
                signing_root.as_slice(),
                &indexed_attestation.signature,
            )
            .map_err(|err| anyhow!("Invalid indexed attestation: {err:?}"))
    }

    /// Return a state with the balance of validator ``index`` increased by ``delta``.
    pub fn increase_balance(mut self, index: u64, delta: u64) -> anyhow::Result<Self> {
        let balance = self
            .balances
            .get_mut(index as usize)
            .ok_or_else(|| anyhow!("Validator {index} has no balance entry"))?;
        *balance = balance
            .checked_add(delta)
            .ok_or_else(|| anyhow!("Balance of validator {index} overflowed"))?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use ream_bls::verifier::NullVerifier;
    use ream_consensus_misc::constants::beacon::MAX_VALIDATORS_PER_COMMITTEE;
    use ssz::{Decode, Encode};

    use super::*;
    use crate::test_utils::{StateBuilder, build_attestation};

    #[test]
    fn test_previous_epoch_saturates_at_genesis() {
        let state = StateBuilder::new(64).slot(3).build();
        assert_eq!(state.get_current_epoch(), GENESIS_EPOCH);
        assert_eq!(state.get_previous_epoch(), GENESIS_EPOCH);

        let state = StateBuilder::new(64).slot(3 * SLOTS_PER_EPOCH + 1).build();
        assert_eq!(state.get_current_epoch(), 3);
        assert_eq!(state.get_previous_epoch(), 2);
    }

    #[test]
    fn test_block_root_at_slot_range() {
        let state = StateBuilder::new(64).slot(100).build();
        assert!(state.get_block_root_at_slot(99).is_ok());
        assert!(state.get_block_root_at_slot(100).is_err());
        assert_eq!(
            state.get_block_root(2).unwrap(),
            state.block_roots[(2 * SLOTS_PER_EPOCH) as usize]
        );
    }

    #[test]
    fn test_committee_sizes() {
        let state = StateBuilder::new(2048).slot(40).build();
        assert_eq!(state.get_committee_count_per_slot(1), 1);
        let committee = state.get_beacon_committee(33, 0).unwrap();
        assert_eq!(committee.len(), 64);
        assert!(committee.len() as u64 <= MAX_VALIDATORS_PER_COMMITTEE);
    }

    #[test]
    fn test_committees_of_an_epoch_partition_active_validators() {
        let state = StateBuilder::new(256).slot(SLOTS_PER_EPOCH).build();
        let mut members = (0..SLOTS_PER_EPOCH)
            .flat_map(|slot| state.get_beacon_committee(slot, 0).unwrap())
            .collect::<Vec<_>>();
        members.sort();
        assert_eq!(members, (0..256).collect::<Vec<_>>());
    }

    #[test]
    fn test_beacon_proposer_index_is_active_validator() {
        let state = StateBuilder::new(128).slot(70).build();
        let proposer_index = state.get_beacon_proposer_index().unwrap();
        assert!(proposer_index < 128);
        assert_eq!(state.get_beacon_proposer_index().unwrap(), proposer_index);
    }

    #[test]
    fn test_proposer_index_requires_active_validators() {
        assert!(
            StateBuilder::new(0)
                .slot(10)
                .build()
                .get_beacon_proposer_index()
                .is_err()
        );
    }

    #[test]
    fn test_base_reward() {
        let state = StateBuilder::new(2048).slot(40).build();
        // 2048 validators at 32 ETH: isqrt(65_536 ETH in Gwei) = 8_095_430
        let base_reward_per_increment = state.get_base_reward_per_increment();
        assert_eq!(base_reward_per_increment, 64_000_000_000 / 8_095_430);
        assert_eq!(
            state.get_base_reward(7, base_reward_per_increment).unwrap(),
            32 * base_reward_per_increment
        );
        assert!(state.get_base_reward(2048, base_reward_per_increment).is_err());
    }

    #[test]
    fn test_participation_flag_indices_by_inclusion_delay() {
        let state = StateBuilder::new(64).slot(70).build();
        let attestation = build_attestation(&state, 64, 0, |_| true);
        let data = &attestation.data;

        let flags = state
            .get_attestation_participation_flag_indices(data, 1)
            .unwrap();
        assert_eq!(flags.into_inner(), 0b111);

        let flags = state
            .get_attestation_participation_flag_indices(data, 5)
            .unwrap();
        assert_eq!(flags.into_inner(), 0b011);

        let flags = state
            .get_attestation_participation_flag_indices(data, 6)
            .unwrap();
        assert_eq!(flags.into_inner(), 0b010);
    }

    #[test]
    fn test_participation_flag_indices_wrong_head_or_target() {
        let state = StateBuilder::new(64).slot(70).build();
        let mut attestation = build_attestation(&state, 64, 0, |_| true);

        attestation.data.beacon_block_root = B256::repeat_byte(0xee);
        let flags = state
            .get_attestation_participation_flag_indices(&attestation.data, 1)
            .unwrap();
        assert_eq!(flags.into_inner(), 0b011);

        attestation.data.target.root = B256::repeat_byte(0xee);
        let flags = state
            .get_attestation_participation_flag_indices(&attestation.data, 1)
            .unwrap();
        assert_eq!(flags.into_inner(), 0b001);
    }

    #[test]
    fn test_participation_flag_indices_rejects_wrong_source() {
        let state = StateBuilder::new(64).slot(70).build();
        let mut attestation = build_attestation(&state, 64, 0, |_| true);
        attestation.data.source = state.previous_justified_checkpoint;
        assert_eq!(
            state.get_attestation_participation_flag_indices(&attestation.data, 1),
            Err(AttestationError::SourceMismatch)
        );
    }

    #[test]
    fn test_attesting_indices_follow_aggregation_bits() {
        let state = StateBuilder::new(2048).slot(41).build();
        let attestation = build_attestation(&state, 40, 0, |i| i % 2 == 0);
        let committee = state.get_beacon_committee(40, 0).unwrap();
        let attesting_indices = state
            .get_attesting_indices(&attestation.data, &attestation.aggregation_bits)
            .unwrap();

        let expected = committee
            .iter()
            .step_by(2)
            .copied()
            .collect::<BTreeSet<_>>();
        assert_eq!(attesting_indices, expected);
    }

    #[test]
    fn test_indexed_attestation_is_sorted() {
        let state = StateBuilder::new(2048).slot(41).build();
        let attestation = build_attestation(&state, 40, 0, |_| true);
        let indexed_attestation = state.get_indexed_attestation(&attestation).unwrap();
        assert_eq!(indexed_attestation.attesting_indices.len(), 64);
        assert!(is_sorted_and_unique(&indexed_attestation.attesting_indices));
        assert!(
            state
                .is_valid_indexed_attestation(&indexed_attestation, &NullVerifier)
                .unwrap()
        );
    }

    #[test]
    fn test_empty_indexed_attestation_is_invalid() {
        let state = StateBuilder::new(2048).slot(41).build();
        let attestation = build_attestation(&state, 40, 0, |_| false);
        let indexed_attestation = state.get_indexed_attestation(&attestation).unwrap();
        assert!(
            !state
                .is_valid_indexed_attestation(&indexed_attestation, &NullVerifier)
                .unwrap()
        );
    }

    #[test]
    fn test_increase_balance_returns_new_state() {
        let state = StateBuilder::new(8).build();
        let updated = state.clone().increase_balance(3, 17).unwrap();
        assert_eq!(updated.balances[3], state.balances[3] + 17);
        assert_eq!(updated.balances[2], state.balances[2]);
        assert!(state.clone().increase_balance(8, 1).is_err());

        let mut saturated = state;
        saturated.balances[0] = u64::MAX;
        assert!(saturated.increase_balance(0, 1).is_err());
    }

    #[test]
    fn test_ssz_round_trip() {
        let state = StateBuilder::new(16).slot(70).build();
        let decoded = BeaconState::from_ssz_bytes(&state.as_ssz_bytes()).unwrap();
        assert_eq!(decoded, state);
    }
}
