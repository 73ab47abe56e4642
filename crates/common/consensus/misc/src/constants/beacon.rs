use alloy_primitives::{aliases::B32, fixed_bytes};

pub const BASE_REWARD_FACTOR: u64 = 64;
pub const DOMAIN_BEACON_ATTESTER: B32 = fixed_bytes!("0x01000000");
pub const DOMAIN_BEACON_PROPOSER: B32 = fixed_bytes!("0x00000000");
pub const EFFECTIVE_BALANCE_INCREMENT: u64 = 1_000_000_000;
pub const EPOCHS_PER_HISTORICAL_VECTOR: u64 = 65536;
pub const FAR_FUTURE_EPOCH: u64 = 18446744073709551615;
pub const GENESIS_EPOCH: u64 = 0;
pub const GENESIS_FORK_VERSION: B32 = fixed_bytes!("0x00000000");
pub const MAX_ATTESTATIONS: u64 = 128;
pub const MAX_COMMITTEES_PER_SLOT: u64 = 64;
pub const MAX_EFFECTIVE_BALANCE: u64 = 32_000_000_000;
pub const MAX_RANDOM_BYTE: u64 = 255;
pub const MAX_VALIDATORS_PER_COMMITTEE: u64 = 2048;
pub const MIN_ATTESTATION_INCLUSION_DELAY: u64 = 1;
pub const MIN_SEED_LOOKAHEAD: u64 = 1;
pub const SHUFFLE_ROUND_COUNT: u8 = 90;
pub const SLOTS_PER_EPOCH: u64 = 32;
pub const SLOTS_PER_HISTORICAL_ROOT: u64 = 8192;
pub const TARGET_COMMITTEE_SIZE: u64 = 128;
pub const UINT64_MAX: u64 = u64::MAX;
pub const UINT64_MAX_SQRT: u64 = 4294967295;

// Participation flag indices
pub const TIMELY_SOURCE_FLAG_INDEX: u8 = 0;
pub const TIMELY_TARGET_FLAG_INDEX: u8 = 1;
pub const TIMELY_HEAD_FLAG_INDEX: u8 = 2;
pub const NUM_FLAG_INDICES: usize = 3;

// Incentivization weights
pub const TIMELY_SOURCE_WEIGHT: u64 = 14;
pub const TIMELY_TARGET_WEIGHT: u64 = 26;
pub const TIMELY_HEAD_WEIGHT: u64 = 14;
pub const PROPOSER_WEIGHT: u64 = 8;
pub const WEIGHT_DENOMINATOR: u64 = 64;

/// Indexed by [`crate::participation_flags::ParticipationFlag`].
pub const PARTICIPATION_FLAG_WEIGHTS: [u64; NUM_FLAG_INDICES] = [
    TIMELY_SOURCE_WEIGHT,
    TIMELY_TARGET_WEIGHT,
    TIMELY_HEAD_WEIGHT,
];
