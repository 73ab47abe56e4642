pub const DEFAULT_VERBOSITY: &str = "3";
pub const SSZ_SNAPPY_EXTENSION: &str = "ssz_snappy";
