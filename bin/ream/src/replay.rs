use std::{fs, path::Path};

use anyhow::{anyhow, ensure};
use ream_bls::verifier::{NullVerifier, SingleVerifier, Verifier};
use ream_consensus_beacon::{attestation::Attestation, beacon_state::BeaconState};
use snap::raw::{Decoder, Encoder};
use ssz::{Decode, Encode};
use tracing::{info, warn};

use crate::cli::{constants::SSZ_SNAPPY_EXTENSION, process::ProcessConfig};

/// Result of replaying attestations against a pre-state.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    pub post_state: BeaconState,
    pub proposer_index: u64,
    pub proposer_balance_delta: u64,
}

fn is_ssz_snappy(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension == SSZ_SNAPPY_EXTENSION)
}

/// Read an SSZ value, snappy-decompressing it first when the file ends in ``.ssz_snappy``.
pub fn read_ssz_file<T: Decode>(path: &Path) -> anyhow::Result<T> {
    let bytes = fs::read(path).map_err(|err| anyhow!("Failed to read {}: {err}", path.display()))?;
    let ssz = if is_ssz_snappy(path) {
        Decoder::new().decompress_vec(&bytes)?
    } else {
        bytes
    };
    T::from_ssz_bytes(&ssz)
        .map_err(|err| anyhow!("Failed to decode SSZ from {}: {err:?}", path.display()))
}

/// Write an SSZ value, snappy-compressing it when the file ends in ``.ssz_snappy``.
pub fn write_ssz_file<T: Encode>(path: &Path, value: &T) -> anyhow::Result<()> {
    let ssz = value.as_ssz_bytes();
    let bytes = if is_ssz_snappy(path) {
        Encoder::new().compress_vec(&ssz)?
    } else {
        ssz
    };
    fs::write(path, bytes).map_err(|err| anyhow!("Failed to write {}: {err}", path.display()))
}

/// Apply the attestations of ``config`` to its pre-state and write the post-state.
pub fn run_process(config: &ProcessConfig) -> anyhow::Result<ReplayOutcome> {
    let pre_state: BeaconState = read_ssz_file(&config.pre_state)?;
    info!(
        slot = pre_state.slot,
        validators = pre_state.validators.len(),
        "Loaded pre-state"
    );

    if let Some(network) = &config.network {
        let expected_fork = network.fork_at_epoch(pre_state.get_current_epoch());
        ensure!(
            pre_state.fork == expected_fork,
            "State fork {:?} does not match the {:?} fork {expected_fork:?}",
            pre_state.fork,
            network.network
        );
    }

    let attestations = config
        .attestations
        .iter()
        .map(|path| read_ssz_file::<Attestation>(path))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let outcome = if config.skip_signature_verification {
        warn!("Signature verification is disabled");
        replay(&pre_state, &attestations, &NullVerifier)?
    } else {
        replay(&pre_state, &attestations, &SingleVerifier)?
    };

    write_ssz_file(&config.output, &outcome.post_state)?;
    info!(
        output = %config.output.display(),
        attestations = attestations.len(),
        "Wrote post-state"
    );
    Ok(outcome)
}

/// Process ``attestations`` in order and report what the block proposer earned.
pub fn replay(
    pre_state: &BeaconState,
    attestations: &[Attestation],
    verifier: &impl Verifier,
) -> anyhow::Result<ReplayOutcome> {
    let proposer_index = pre_state.get_beacon_proposer_index()?;
    let post_state = pre_state.process_attestations(attestations, verifier)?;

    let balance = |state: &BeaconState| {
        state
            .balances
            .get(proposer_index as usize)
            .copied()
            .ok_or_else(|| anyhow!("Proposer {proposer_index} has no balance"))
    };
    let proposer_balance_delta = balance(&post_state)?.saturating_sub(balance(pre_state)?);

    Ok(ReplayOutcome {
        post_state,
        proposer_index,
        proposer_balance_delta,
    })
}
