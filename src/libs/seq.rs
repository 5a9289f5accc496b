use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

lazy_static! {
    static ref NON_NT: Regex = Regex::new(r"[^ACGTNacgtn]").unwrap();
}

/// A sequence record realised from a search match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqRecord {
    /// Genome name
    pub id: String,
    /// Gene description
    pub description: String,
    pub seq: Vec<u8>,
}

impl SeqRecord {
    pub fn new(id: &str, description: &str, seq: Vec<u8>) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            seq,
        }
    }

    pub fn seq_str(&self) -> &str {
        std::str::from_utf8(&self.seq).unwrap_or("")
    }
}

/// True when the sequence holds anything but A, C, G, T or N.
///
/// ```
/// assert!(!orthocat::libs::seq::has_non_nucleotide(b"ACGTNacgtn"));
/// assert!(orthocat::libs::seq::has_non_nucleotide(b"MKV"));
/// assert!(orthocat::libs::seq::has_non_nucleotide(b"ACGTR"));
/// ```
pub fn has_non_nucleotide(seq: &[u8]) -> bool {
    NON_NT.is_match(&String::from_utf8_lossy(seq))
}

/// Reverse complement; IUPAC codes are complemented, other symbols kept.
pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    bio::alphabets::dna::revcomp(seq)
}

/// Drops alignment gap symbols.
pub fn ungap(seq: &[u8]) -> Vec<u8> {
    seq.iter().copied().filter(|b| !is_gap(*b)).collect()
}

pub fn is_gap(b: u8) -> bool {
    matches!(b, b'-' | b'.')
}

/// File name without its directories.
///
/// ```
/// assert_eq!(orthocat::libs::seq::file_name("gen/CU928158.gbk"), "CU928158.gbk");
/// ```
pub fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Genome name: the file name cut at its first dot. Case is preserved.
///
/// ```
/// assert_eq!(orthocat::libs::seq::genome_name("gen/CU928158.gbk"), "CU928158");
/// assert_eq!(orthocat::libs::seq::genome_name("data/Ecoli_K12.fna.gz"), "Ecoli_K12");
/// ```
pub fn genome_name(path: &str) -> String {
    let name = file_name(path);
    match name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => name,
    }
}

/// Restricts a gene id to characters that are safe in file names.
pub fn safe_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revcomp() {
        assert_eq!(revcomp(b"ATGCCN"), b"NGGCAT".to_vec());
        assert_eq!(revcomp(b"aacg"), b"cgtt".to_vec());
    }

    #[test]
    fn test_ungap() {
        assert_eq!(ungap(b"AT--G.C"), b"ATGC".to_vec());
    }

    #[test]
    fn test_genome_name_keeps_case() {
        assert_eq!(genome_name("/data/MixedCase.fasta"), "MixedCase");
        assert_eq!(genome_name("noext"), "noext");
    }

    #[test]
    fn test_safe_name() {
        assert_eq!(safe_name("rpoB/2 subunit"), "rpoB_2_subunit");
        assert_eq!(safe_name("gyr-A.1"), "gyr-A.1");
    }
}
