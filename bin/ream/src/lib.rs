pub mod cli;
pub mod replay;
