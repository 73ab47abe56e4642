mod tests {
    use alloy_primitives::B256;
    use attestation_processing::{StateBuilder, build_attestation, keyed_state, sign_attestation};
    use ream_bls::verifier::{NullVerifier, SingleVerifier};
    use ream_consensus_beacon::{
        attestation::Attestation,
        beacon_state::BeaconState,
        state_transition::operations::{
            attestation::rewards::proposer_reward_denominator,
            errors::{AttestationError, BlockAttestationsError},
        },
    };
    use ream_consensus_misc::constants::beacon::{
        MIN_ATTESTATION_INCLUSION_DELAY, PROPOSER_WEIGHT, SLOTS_PER_EPOCH, WEIGHT_DENOMINATOR,
    };
    use rstest::rstest;
    use ssz::{Decode, Encode};
    use ssz_types::{BitList, VariableList, typenum::U2048};

    /// 2048 validators: one committee of 64 per slot.
    fn large_state(slot: u64) -> BeaconState {
        StateBuilder::new(2048).slot(slot).build()
    }

    fn proposer_balance(state: &BeaconState) -> u64 {
        let proposer_index = state
            .get_beacon_proposer_index()
            .expect("state has a proposer");
        state.balances[proposer_index as usize]
    }

    #[test]
    fn denominator_is_exact() {
        assert_eq!(
            proposer_reward_denominator(),
            (WEIGHT_DENOMINATOR - PROPOSER_WEIGHT) * WEIGHT_DENOMINATOR / PROPOSER_WEIGHT
        );
        assert_eq!(proposer_reward_denominator(), 448);
    }

    #[test]
    fn repeated_attestation_credits_nothing_the_second_time() {
        let state = large_state(65);
        let attestation = build_attestation(&state, 64, 0, |_| true);

        let once = state
            .process_attestation(&attestation, &NullVerifier)
            .unwrap();
        let twice = once
            .process_attestation(&attestation, &NullVerifier)
            .unwrap();

        assert!(proposer_balance(&once) > proposer_balance(&state));
        assert_eq!(proposer_balance(&twice), proposer_balance(&once));
        assert_eq!(twice, once);
    }

    #[test]
    fn overlapping_attestation_credits_only_new_flags() {
        let state = large_state(65);
        let first_half = build_attestation(&state, 64, 0, |i| i < 32);
        let everyone = build_attestation(&state, 64, 0, |_| true);

        let after_first = state
            .process_attestation(&first_half, &NullVerifier)
            .unwrap();
        let after_second = after_first
            .process_attestation(&everyone, &NullVerifier)
            .unwrap();

        let first_reward = proposer_balance(&after_first) - proposer_balance(&state);
        let second_reward = proposer_balance(&after_second) - proposer_balance(&after_first);
        assert!(first_reward > 0);
        assert_eq!(second_reward, first_reward);

        let fresh = state
            .process_attestation(&everyone, &NullVerifier)
            .unwrap();
        assert!(proposer_balance(&fresh) - proposer_balance(&state) > second_reward);
    }

    #[test]
    fn block_with_duplicate_attestations_matches_sequential_processing() {
        let state = large_state(65);
        let attestation = build_attestation(&state, 64, 0, |_| true);
        let sequential = state
            .process_attestation(&attestation, &NullVerifier)
            .and_then(|state| state.process_attestation(&attestation, &NullVerifier))
            .unwrap();

        assert_eq!(
            state.process_attestations(&[attestation.clone(), attestation], &NullVerifier),
            Ok(sequential)
        );
    }

    #[rstest]
    #[case::wrong_target_epoch(|attestation: &mut Attestation| attestation.data.target.epoch = 5)]
    #[case::epoch_mismatch(|attestation: &mut Attestation| attestation.data.target.epoch = 1)]
    #[case::bad_committee_index(|attestation: &mut Attestation| attestation.data.index = 3)]
    #[case::no_participants(|attestation: &mut Attestation| {
        attestation.aggregation_bits = BitList::with_capacity(64).unwrap()
    })]
    #[case::short_bits(|attestation: &mut Attestation| {
        attestation.aggregation_bits = BitList::with_capacity(10).unwrap()
    })]
    #[case::wrong_source(|attestation: &mut Attestation| {
        attestation.data.source.root = B256::repeat_byte(0x77)
    })]
    fn rejected_attestation_leaves_state_untouched(
        #[case] corrupt: fn(&mut Attestation),
    ) {
        let state = large_state(65);
        let snapshot = state.as_ssz_bytes();
        let mut attestation = build_attestation(&state, 64, 0, |_| true);
        corrupt(&mut attestation);

        assert!(
            state
                .process_attestation(&attestation, &NullVerifier)
                .is_err()
        );
        assert_eq!(state.as_ssz_bytes(), snapshot);
    }

    #[rstest]
    #[case::proposer_balance_overflows(
        |state: &mut BeaconState| {
            let proposer_index = state.get_beacon_proposer_index().unwrap();
            state.balances[proposer_index as usize] = u64::MAX;
        },
        |state: &BeaconState| AttestationError::BalanceUpdateFailed {
            proposer_index: state.get_beacon_proposer_index().unwrap(),
        }
    )]
    #[case::truncated_participation(
        |state: &mut BeaconState| {
            state.previous_epoch_participation =
                VariableList::from(state.previous_epoch_participation[..10].to_vec());
        },
        |state: &BeaconState| {
            let first_missing = state
                .get_beacon_committee(40, 0)
                .unwrap()
                .into_iter()
                .filter(|&index| index >= 10)
                .min()
                .unwrap();
            AttestationError::ParticipationIndexOutOfRange(first_missing)
        }
    )]
    #[case::no_active_proposer(
        |state: &mut BeaconState| {
            // Still active in the attested epoch, exited in the current one
            for validator in state.validators.iter_mut() {
                validator.exit_epoch = 2;
            }
        },
        |_: &BeaconState| AttestationError::ProposerIndexUnavailable
    )]
    fn failed_reward_stage_leaves_state_untouched(
        #[case] corrupt: fn(&mut BeaconState),
        #[case] expected: fn(&BeaconState) -> AttestationError,
    ) {
        let mut state = large_state(65);
        let attestation = build_attestation(&state, 40, 0, |_| true);
        corrupt(&mut state);
        let snapshot = state.as_ssz_bytes();

        assert_eq!(
            state.process_attestation(&attestation, &NullVerifier),
            Err(expected(&state))
        );
        assert_eq!(state.as_ssz_bytes(), snapshot);
    }

    #[test]
    fn failing_block_reports_position_and_keeps_input() {
        let state = large_state(65);
        let snapshot = state.clone();
        let valid = build_attestation(&state, 64, 0, |_| true);
        let mut invalid = valid.clone();
        invalid.data.index = 2;

        assert_eq!(
            state.process_attestations(&[valid, invalid], &NullVerifier),
            Err(BlockAttestationsError::InvalidAttestation {
                position: 1,
                error: AttestationError::IndexExceedsCommitteeCount {
                    index: 2,
                    committee_count: 1,
                },
            })
        );
        assert_eq!(state, snapshot);
    }

    #[test]
    fn sentinel_position_sets_the_bit_length() {
        let state = large_state(65);
        let mut attestation = build_attestation(&state, 64, 0, |_| true);

        let mut full = vec![0xff; 8];
        full.push(0x01);
        attestation.aggregation_bits = BitList::<U2048>::from_ssz_bytes(&full).unwrap();
        assert!(
            state
                .process_attestation(&attestation, &NullVerifier)
                .is_ok()
        );

        let mut short = vec![0xff; 7];
        short.push(0x80);
        attestation.aggregation_bits = BitList::<U2048>::from_ssz_bytes(&short).unwrap();
        assert_eq!(
            state.process_attestation(&attestation, &NullVerifier),
            Err(AttestationError::MismatchedAggregationBitsLength {
                bits_length: 63,
                committee_size: 64,
            })
        );
    }

    #[test]
    fn current_epoch_attestation_only_touches_current_participation() {
        let state = large_state(65);
        let attestation = build_attestation(&state, 64, 0, |_| true);
        let post_state = state
            .process_attestation(&attestation, &NullVerifier)
            .unwrap();

        assert_eq!(
            post_state.previous_epoch_participation.as_ssz_bytes(),
            state.previous_epoch_participation.as_ssz_bytes()
        );
        assert_ne!(
            post_state.current_epoch_participation,
            state.current_epoch_participation
        );
        let committee = state.get_beacon_committee(64, 0).unwrap();
        for index in committee {
            assert_eq!(post_state.current_epoch_participation[index as usize], 0b111);
        }
    }

    #[test]
    fn previous_epoch_attestation_only_touches_previous_participation() {
        let state = large_state(65);
        let attestation = build_attestation(&state, 40, 0, |_| true);
        let post_state = state
            .process_attestation(&attestation, &NullVerifier)
            .unwrap();

        assert_eq!(
            post_state.current_epoch_participation.as_ssz_bytes(),
            state.current_epoch_participation.as_ssz_bytes()
        );
        let committee = state.get_beacon_committee(40, 0).unwrap();
        for index in committee {
            // 25 slots late: only the target vote is still timely
            assert_eq!(post_state.previous_epoch_participation[index as usize], 0b010);
        }
    }

    #[rstest]
    #[case(|i: usize| i < 8, |i: usize| i < 16)]
    #[case(|i: usize| i % 3 == 0, |i: usize| i % 3 == 0 || i % 5 == 0)]
    #[case(|_: usize| false, |i: usize| i == 63)]
    #[case(|i: usize| i % 2 == 1, |_: usize| true)]
    fn larger_attesting_set_never_earns_less(
        #[case] subset: fn(usize) -> bool,
        #[case] superset: fn(usize) -> bool,
    ) {
        let mut state = large_state(65);
        // Some committee members already hold the source flag
        let committee = state.get_beacon_committee(64, 0).unwrap();
        for index in committee.iter().step_by(4) {
            state.current_epoch_participation[*index as usize] = 0b001;
        }

        let numerator = |participates: fn(usize) -> bool| {
            let attestation = build_attestation(&state, 64, 0, participates);
            state
                .compute_participation_rewards(&attestation.data, &attestation.aggregation_bits)
                .unwrap()
                .proposer_reward_numerator
        };
        assert!(numerator(superset) >= numerator(subset));
    }

    #[rstest]
    #[case::before_minimum_delay(64, 64 + MIN_ATTESTATION_INCLUSION_DELAY - 1, false)]
    #[case::at_minimum_delay(64, 64 + MIN_ATTESTATION_INCLUSION_DELAY, true)]
    #[case::at_one_epoch(40, 40 + SLOTS_PER_EPOCH, true)]
    #[case::past_one_epoch(40, 40 + SLOTS_PER_EPOCH + 1, false)]
    fn inclusion_window_is_inclusive(
        #[case] attestation_slot: u64,
        #[case] state_slot: u64,
        #[case] accepted: bool,
    ) {
        let state = large_state(state_slot);
        let attestation = build_attestation(&state, attestation_slot, 0, |_| true);
        let result = state.process_attestation(&attestation, &NullVerifier);

        if accepted {
            assert!(result.is_ok());
        } else {
            assert_eq!(
                result,
                Err(AttestationError::InclusionDelayNotMet {
                    attestation_slot,
                    state_slot,
                })
            );
        }
    }

    #[test]
    fn signed_attestation_passes_bls_verification() -> anyhow::Result<()> {
        // 64 validators: committees of two
        let (state, private_keys) = keyed_state(64, 65)?;
        let mut attestation = build_attestation(&state, 64, 0, |_| true);
        attestation.signature = sign_attestation(&state, &attestation, &private_keys)?;

        let post_state = state.process_attestation(&attestation, &SingleVerifier)?;
        assert!(proposer_balance(&post_state) > proposer_balance(&state));
        Ok(())
    }

    #[test]
    fn tampered_attestation_fails_bls_verification() -> anyhow::Result<()> {
        let (state, private_keys) = keyed_state(64, 65)?;
        let mut attestation = build_attestation(&state, 64, 0, |_| true);
        attestation.signature = sign_attestation(&state, &attestation, &private_keys)?;

        let mut other_head = attestation.clone();
        other_head.data.beacon_block_root = B256::repeat_byte(0x99);
        assert_eq!(
            state.process_attestation(&other_head, &SingleVerifier),
            Err(AttestationError::InvalidSignature)
        );

        let mut fewer_attesters = attestation.clone();
        fewer_attesters.aggregation_bits.set(1, false).unwrap();
        assert_eq!(
            state.process_attestation(&fewer_attesters, &SingleVerifier),
            Err(AttestationError::InvalidSignature)
        );

        let mut unsigned = attestation;
        unsigned.signature = Default::default();
        assert_eq!(
            state.process_attestation(&unsigned, &SingleVerifier),
            Err(AttestationError::InvalidSignature)
        );
        Ok(())
    }

    #[test]
    fn skipping_verification_accepts_unsigned_attestation() -> anyhow::Result<()> {
        let (state, _) = keyed_state(64, 65)?;
        let attestation = build_attestation(&state, 64, 0, |_| true);

        assert_eq!(
            state.process_attestation(&attestation, &SingleVerifier),
            Err(AttestationError::InvalidSignature)
        );
        assert!(
            state
                .process_attestation(&attestation, &NullVerifier)
                .is_ok()
        );
        Ok(())
    }
}
