pub mod blast;
pub mod concat;
pub mod error;
pub mod io;
pub mod msa;
pub mod ortholog;
pub mod presence;
pub mod report;
pub mod scorer;
pub mod seq;
pub mod settings;
pub mod snp;
