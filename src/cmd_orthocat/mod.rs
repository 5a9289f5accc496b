//! Subcommand modules for the `orthocat` binary.

pub mod collect;
pub mod concat;
pub mod detect;
pub mod pl;
pub mod snp;
pub mod xmfa;
