use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use ream_network_spec::{cli::beacon_network_parser, networks::BeaconNetworkSpec};

use crate::cli::{
    constants::DEFAULT_VERBOSITY,
    verbosity::{Verbosity, verbosity_parser},
};

#[derive(Debug, Parser)]
pub struct ProcessConfig {
    /// Verbosity level (1=error, 2=warn, 3=info, 4=debug, 5=trace)
    #[arg(short, long, default_value = DEFAULT_VERBOSITY, value_parser = verbosity_parser)]
    pub verbosity: Verbosity,

    #[arg(
        long,
        help = "Check the state's fork against mainnet, sepolia, hoodi, dev or a path to a YAML config file",
        value_parser = beacon_network_parser
    )]
    pub network: Option<Arc<BeaconNetworkSpec>>,

    #[arg(long, help = "Path to the SSZ encoded pre-state (.ssz or .ssz_snappy)")]
    pub pre_state: PathBuf,

    #[arg(
        long = "attestation",
        required = true,
        help = "Path to an SSZ encoded attestation, processed in the order given"
    )]
    pub attestations: Vec<PathBuf>,

    #[arg(long, help = "Where to write the post-state (.ssz or .ssz_snappy)")]
    pub output: PathBuf,

    #[arg(long, help = "Skip BLS verification of attestation signatures")]
    pub skip_signature_verification: bool,
}
