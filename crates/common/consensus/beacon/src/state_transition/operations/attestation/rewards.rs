use std::collections::BTreeSet;

use ream_consensus_misc::{
    attestation_data::AttestationData,
    constants::beacon::{PROPOSER_WEIGHT, WEIGHT_DENOMINATOR},
    participation_flags::{ParticipationFlag, ParticipationFlags},
};
use ssz_types::{
    BitList, VariableList,
    typenum::{U2048, U1099511627776},
};

use crate::{beacon_state::BeaconState, state_transition::operations::errors::AttestationError};

pub type EpochParticipation = VariableList<u8, U1099511627776>;

/// The participation list an attestation writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttestationEpoch {
    Previous,
    Current,
}

/// Running totals threaded through the reward fold.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardAccumulator {
    pub proposer_reward_numerator: u64,
    pub epoch_participation: EpochParticipation,
}

/// Flags and proposer reward earned by one attestation, not yet written to any state.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipationRewards {
    pub epoch: AttestationEpoch,
    pub attesting_indices: BTreeSet<u64>,
    pub proposer_reward_numerator: u64,
    pub epoch_participation: EpochParticipation,
}

impl ParticipationRewards {
    pub fn proposer_reward(&self) -> u64 {
        self.proposer_reward_numerator / proposer_reward_denominator()
    }
}

/// ``(WEIGHT_DENOMINATOR - PROPOSER_WEIGHT) * WEIGHT_DENOMINATOR / PROPOSER_WEIGHT``
pub const fn proposer_reward_denominator() -> u64 {
    (WEIGHT_DENOMINATOR - PROPOSER_WEIGHT) * WEIGHT_DENOMINATOR / PROPOSER_WEIGHT
}

impl BeaconState {
    fn attestation_epoch(&self, data: &AttestationData) -> AttestationEpoch {
        if data.target.epoch == self.get_current_epoch() {
            AttestationEpoch::Current
        } else {
            AttestationEpoch::Previous
        }
    }

    fn epoch_participation(&self, epoch: AttestationEpoch) -> &EpochParticipation {
        match epoch {
            AttestationEpoch::Current => &self.current_epoch_participation,
            AttestationEpoch::Previous => &self.previous_epoch_participation,
        }
    }

    /// Set the flags earned by the attesters of ``data`` and sum the proposer reward numerator.
    ///
    /// Flags a validator already holds in the target epoch earn nothing.
    pub fn compute_participation_rewards(
        &self,
        data: &AttestationData,
        aggregation_bits: &BitList<U2048>,
    ) -> Result<ParticipationRewards, AttestationError> {
        let inclusion_delay = self.slot.saturating_sub(data.slot);
        let participation_flag_indices =
            self.get_attestation_participation_flag_indices(data, inclusion_delay)?;
        let attesting_indices = self
            .get_attesting_indices(data, aggregation_bits)
            .map_err(|_| AttestationError::IndexingError)?;

        let epoch = self.attestation_epoch(data);
        let base_reward_per_increment = self.get_base_reward_per_increment();

        let RewardAccumulator {
            proposer_reward_numerator,
            epoch_participation,
        } = attesting_indices.iter().try_fold(
            RewardAccumulator {
                proposer_reward_numerator: 0,
                epoch_participation: self.epoch_participation(epoch).clone(),
            },
            |accumulator, &index| {
                self.credit_validator(
                    accumulator,
                    index,
                    participation_flag_indices,
                    base_reward_per_increment,
                )
            },
        )?;

        Ok(ParticipationRewards {
            epoch,
            attesting_indices,
            proposer_reward_numerator,
            epoch_participation,
        })
    }

    fn credit_validator(
        &self,
        mut accumulator: RewardAccumulator,
        index: u64,
        participation_flag_indices: ParticipationFlags,
        base_reward_per_increment: u64,
    ) -> Result<RewardAccumulator, AttestationError> {
        let flags = accumulator
            .epoch_participation
            .get_mut(index as usize)
            .ok_or(AttestationError::ParticipationIndexOutOfRange(index))?;

        let mut validator_flags = ParticipationFlags::from(*flags);
        let mut weight = 0;
        for flag in ParticipationFlag::ALL {
            if participation_flag_indices.has_flag(flag) && !validator_flags.has_flag(flag) {
                validator_flags = validator_flags.add_flag(flag);
                weight += flag.weight();
            }
        }
        *flags = validator_flags.into();

        if weight > 0 {
            let base_reward = self
                .get_base_reward(index, base_reward_per_increment)
                .map_err(|_| AttestationError::IndexingError)?;
            accumulator.proposer_reward_numerator += base_reward * weight;
        }
        Ok(accumulator)
    }

    /// Pay the proposer and store the updated participation list, returning the new state.
    pub fn apply_participation_rewards(
        &self,
        rewards: ParticipationRewards,
    ) -> Result<BeaconState, AttestationError> {
        let proposer_index = self
            .get_beacon_proposer_index()
            .map_err(|_| AttestationError::ProposerIndexUnavailable)?;

        let mut state = self
            .clone()
            .increase_balance(proposer_index, rewards.proposer_reward())
            .map_err(|_| AttestationError::BalanceUpdateFailed { proposer_index })?;

        match rewards.epoch {
            AttestationEpoch::Current => {
                state.current_epoch_participation = rewards.epoch_participation
            }
            AttestationEpoch::Previous => {
                state.previous_epoch_participation = rewards.epoch_participation
            }
        }
        Ok(state)
    }
}
