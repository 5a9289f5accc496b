use crate::libs::error::OrthoError;
use crate::libs::msa::{AlignedSeq, Alignment};
use indexmap::IndexMap;

/// Joins per-gene alignments end to end, one row per genome.
///
/// Only gene alignments holding exactly one row per genome of the run take
/// part; incomplete genes are left out entirely rather than padded.
#[derive(Debug, Clone)]
pub struct Concatenator {
    genome_count: usize,
    seq_of: IndexMap<String, Vec<u8>>,
    included: Vec<(String, usize)>,
    excluded: Vec<(String, usize)>,
}

impl Concatenator {
    pub fn new(genome_count: usize) -> Self {
        Self {
            genome_count,
            seq_of: IndexMap::new(),
            included: vec![],
            excluded: vec![],
        }
    }

    /// Appends a gene alignment when its row count equals the number of
    /// genomes. Returns whether the gene was included.
    pub fn add(&mut self, gene: &str, aln: &Alignment) -> bool {
        if aln.len() != self.genome_count {
            self.excluded.push((gene.to_string(), aln.len()));
            return false;
        }

        let width = aln.width().unwrap_or(0);
        for record in &aln.records {
            self.seq_of
                .entry(record.id.clone())
                .or_default()
                .extend_from_slice(&record.seq);
        }
        self.included.push((gene.to_string(), width));
        true
    }

    /// Included genes with their alignment widths, in processing order
    pub fn included(&self) -> &[(String, usize)] {
        &self.included
    }

    /// Excluded genes with their row counts
    pub fn excluded(&self) -> &[(String, usize)] {
        &self.excluded
    }

    /// Sum of the widths of the included genes
    pub fn expected_width(&self) -> usize {
        self.included.iter().map(|(_, w)| w).sum()
    }

    /// Checks the result and hands it out.
    ///
    /// Fails when no gene qualified, or when any genome row is missing or
    /// does not span every included gene.
    pub fn finish(self) -> Result<Alignment, OrthoError> {
        if self.included.is_empty() {
            return Err(OrthoError::NoCompleteGenes(self.genome_count));
        }

        let expected = self.expected_width();
        if self.seq_of.len() != self.genome_count {
            return Err(OrthoError::Corrupted(format!(
                "{} rows for {} genomes",
                self.seq_of.len(),
                self.genome_count
            )));
        }
        for (id, seq) in &self.seq_of {
            if seq.len() != expected {
                return Err(OrthoError::Corrupted(format!(
                    "{} has {} columns, expected {}",
                    id,
                    seq.len(),
                    expected
                )));
            }
        }

        Ok(Alignment::new(
            self.seq_of
                .into_iter()
                .map(|(id, seq)| AlignedSeq { id, seq })
                .collect(),
        ))
    }
}

/// Reads gene alignments and concatenates them.
///
/// Unreadable or malformed files are skipped with a warning. `genes` pairs
/// a gene name with the path of its alignment.
pub fn concat_files(
    genes: &[(String, String)],
    genome_count: usize,
) -> Result<Alignment, OrthoError> {
    let mut concat = Concatenator::new(genome_count);

    for (gene, path) in genes {
        match crate::libs::msa::read_alignment(path) {
            Ok(aln) => {
                concat.add(gene, &aln);
            }
            Err(e) => log::warn!("{}", e),
        }
    }

    for (gene, rows) in concat.excluded() {
        log::info!(
            "{} has {} of {} genomes, not concatenated",
            gene,
            rows,
            genome_count
        );
    }

    log::info!(
        "concatenated {} genes, {} columns",
        concat.included().len(),
        concat.expected_width()
    );
    concat.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aln(rows: &[(&str, &str)]) -> Alignment {
        Alignment::new(
            rows.iter()
                .map(|(id, seq)| AlignedSeq::new(id, seq.as_bytes()))
                .collect(),
        )
    }

    #[test]
    fn test_complete_genes_only() {
        let mut concat = Concatenator::new(3);
        assert!(concat.add("g1", &aln(&[("A", "AC-"), ("B", "ACG"), ("C", "ATG")])));
        assert!(!concat.add("g2", &aln(&[("A", "TTTT"), ("B", "TTTA")])));
        assert!(concat.add("g3", &aln(&[("B", "GG"), ("A", "GA"), ("C", "GC")])));

        assert_eq!(concat.excluded(), &[("g2".to_string(), 2)]);
        assert_eq!(concat.expected_width(), 5);

        let result = concat.finish().unwrap();
        assert_eq!(result.ids(), vec!["A", "B", "C"]);
        assert_eq!(result.records[0].seq, b"AC-GA".to_vec());
        assert_eq!(result.records[1].seq, b"ACGGG".to_vec());
        assert_eq!(result.width(), Some(5));
    }

    #[test]
    fn test_no_complete_gene() {
        let mut concat = Concatenator::new(3);
        concat.add("g2", &aln(&[("A", "TTTT"), ("B", "TTTA")]));
        assert!(matches!(concat.finish(), Err(OrthoError::NoCompleteGenes(3))));
    }

    #[test]
    fn test_missing_genome_is_flagged() {
        // right row count, but B twice and C never
        let mut concat = Concatenator::new(3);
        concat.add("g1", &aln(&[("A", "AC"), ("B", "AC"), ("B", "AG")]));
        assert!(matches!(concat.finish(), Err(OrthoError::Corrupted(_))));

        // C only in the second gene
        let mut concat = Concatenator::new(2);
        concat.add("g1", &aln(&[("A", "AC"), ("B", "AC")]));
        concat.add("g2", &aln(&[("A", "GG"), ("C", "GG")]));
        assert!(matches!(concat.finish(), Err(OrthoError::Corrupted(_))));
    }
}
