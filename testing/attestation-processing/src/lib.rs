//! Fixtures for attestation processing tests: validator keys, keyed states and signed attestations.

use anyhow::anyhow;
use ream_bls::{
    BLSSignature, PrivateKey,
    traits::{Aggregatable, Signable},
};
use ream_consensus_beacon::{attestation::Attestation, beacon_state::BeaconState};
pub use ream_consensus_beacon::test_utils::{StateBuilder, build_attestation};
use ream_consensus_misc::{constants::beacon::DOMAIN_BEACON_ATTESTER, misc::compute_signing_root};

/// Deterministic key for validator ``index``.
pub fn deterministic_private_key(index: u64) -> anyhow::Result<PrivateKey> {
    let mut ikm = [0u8; 32];
    ikm[..8].copy_from_slice(&(index + 1).to_le_bytes());
    Ok(PrivateKey::from_ikm(&ikm)?)
}

/// A state at ``slot`` whose validators carry real public keys, with the matching private keys.
pub fn keyed_state(
    validator_count: u64,
    slot: u64,
) -> anyhow::Result<(BeaconState, Vec<PrivateKey>)> {
    let private_keys = (0..validator_count)
        .map(deterministic_private_key)
        .collect::<anyhow::Result<Vec<_>>>()?;
    let pubkeys = private_keys
        .iter()
        .map(|key| key.public_key())
        .collect::<Result<Vec<_>, _>>()?;

    let state = StateBuilder::new(validator_count as usize)
        .slot(slot)
        .pubkeys(pubkeys)
        .build();
    Ok((state, private_keys))
}

/// Aggregate signature of the attesters of ``attestation`` over its data.
pub fn sign_attestation(
    state: &BeaconState,
    attestation: &Attestation,
    private_keys: &[PrivateKey],
) -> anyhow::Result<BLSSignature> {
    let attesting_indices =
        state.get_attesting_indices(&attestation.data, &attestation.aggregation_bits)?;
    let domain = state.get_domain(DOMAIN_BEACON_ATTESTER, Some(attestation.data.target.epoch));
    let signing_root = compute_signing_root(&attestation.data, domain);

    let signatures = attesting_indices
        .iter()
        .map(|&index| {
            private_keys
                .get(index as usize)
                .ok_or_else(|| anyhow!("No private key for validator {index}"))?
                .sign(signing_root.as_slice())
                .map_err(|err| anyhow!("Failed to sign for validator {index}: {err}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(BLSSignature::aggregate(&signatures.iter().collect::<Vec<_>>())?)
}
