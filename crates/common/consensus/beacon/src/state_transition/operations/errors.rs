use thiserror::Error;

/// Reasons an attestation is rejected. Any of these makes the containing block invalid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttestationError {
    #[error(
        "Target epoch {target_epoch} must be the previous ({previous_epoch}) or current ({current_epoch}) epoch"
    )]
    IncorrectTargetEpoch {
        target_epoch: u64,
        previous_epoch: u64,
        current_epoch: u64,
    },

    #[error("Target epoch {target_epoch} does not match epoch {slot_epoch} of the attestation slot")]
    EpochMismatch { target_epoch: u64, slot_epoch: u64 },

    #[error("Attestation from slot {attestation_slot} cannot be included at slot {state_slot}")]
    InclusionDelayNotMet {
        attestation_slot: u64,
        state_slot: u64,
    },

    #[error("Committee index {index} must be less than the committee count {committee_count}")]
    IndexExceedsCommitteeCount { index: u64, committee_count: u64 },

    #[error("Failed to resolve the committee or indexed attestation")]
    IndexingError,

    #[error("Aggregation bits length {bits_length} does not match committee size {committee_size}")]
    MismatchedAggregationBitsLength {
        bits_length: usize,
        committee_size: usize,
    },

    #[error("Attestation signature is invalid")]
    InvalidSignature,

    #[error("Attestation source does not match the justified checkpoint")]
    SourceMismatch,

    #[error("Block root at slot {slot} is not available in the state")]
    BlockRootUnavailable { slot: u64 },

    #[error("Failed to compute the beacon proposer index")]
    ProposerIndexUnavailable,

    #[error("Failed to increase the balance of proposer {proposer_index}")]
    BalanceUpdateFailed { proposer_index: u64 },

    #[error("Validator index {0} has no entry in the epoch participation list")]
    ParticipationIndexOutOfRange(u64),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockAttestationsError {
    #[error("Block carries {count} attestations, more than the maximum of {max}")]
    TooManyAttestations { count: usize, max: u64 },

    #[error("Attestation at position {position} is invalid: {error}")]
    InvalidAttestation {
        position: usize,
        error: AttestationError,
    },
}
