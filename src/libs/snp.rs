use crate::libs::msa::Alignment;

/// Outcome of variable-site filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteFilter {
    /// Retained column indexes and the projected alignment
    Sites {
        columns: Vec<usize>,
        alignment: Alignment,
    },
    /// No column qualified; nothing should be written
    NoInformativeSites,
}

/// Columns, left to right, without gaps and with more than `threshold`
/// rows differing from the first row.
///
/// The first row is the reference of every column, not the majority.
///
/// ```
/// use orthocat::libs::msa::{Alignment, AlignedSeq};
/// use orthocat::libs::snp::variable_columns;
/// let aln = Alignment::new(vec![
///     AlignedSeq::new("A", b"AAAA"),
///     AlignedSeq::new("B", b"ACA-"),
///     AlignedSeq::new("C", b"ACGT"),
/// ]);
/// assert_eq!(variable_columns(&aln, 0), vec![1, 2]);
/// assert_eq!(variable_columns(&aln, 1), vec![1]);
/// ```
pub fn variable_columns(aln: &Alignment, threshold: usize) -> Vec<usize> {
    let first = match aln.records.first() {
        Some(r) => &r.seq,
        None => return vec![],
    };

    let mut columns = vec![];
    for (i, &base) in first.iter().enumerate() {
        let mut snps = 0;
        let mut gaps = 0;
        for record in &aln.records {
            // short rows count as gaps
            let b = record.seq.get(i).copied().unwrap_or(b'-');
            if b != base {
                snps += 1;
            }
            if b == b'-' {
                gaps += 1;
            }
        }

        if snps > threshold && gaps == 0 {
            columns.push(i);
        }
        if i > 0 && i % 100_000 == 0 {
            log::debug!("scanned {} columns, kept {}", i, columns.len());
        }
    }

    columns
}

/// Reduces an alignment to its variable, gap-free columns.
pub fn filter_variable_sites(aln: &Alignment, threshold: usize) -> SiteFilter {
    let columns = variable_columns(aln, threshold);
    if columns.is_empty() {
        return SiteFilter::NoInformativeSites;
    }

    let alignment = aln.project(&columns);
    SiteFilter::Sites { columns, alignment }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::msa::AlignedSeq;

    fn aln(rows: &[&str]) -> Alignment {
        Alignment::new(
            rows.iter()
                .enumerate()
                .map(|(i, seq)| AlignedSeq::new(&format!("g{}", i), seq.as_bytes()))
                .collect(),
        )
    }

    #[test]
    fn test_single_identical_column() {
        let a = aln(&["A", "A", "A"]);
        assert!(variable_columns(&a, 0).is_empty());
        assert_eq!(filter_variable_sites(&a, 0), SiteFilter::NoInformativeSites);
    }

    #[test]
    fn test_gap_disqualifies() {
        // column 0 varies in two rows but one of them is a gap
        let a = aln(&["AC", "-T", "GT"]);
        assert_eq!(variable_columns(&a, 0), vec![1]);
    }

    #[test]
    fn test_first_row_is_reference() {
        // first row is the odd one out: 2 rows differ from it
        let a = aln(&["T", "A", "A"]);
        assert_eq!(variable_columns(&a, 1), vec![0]);
        // first row agrees with the majority: 1 row differs
        let a = aln(&["A", "T", "A"]);
        assert!(variable_columns(&a, 1).is_empty());
    }

    #[test]
    fn test_projection_keeps_order() {
        let a = aln(&["AAAAA", "CACAC", "GAGAG"]);
        match filter_variable_sites(&a, 1) {
            SiteFilter::Sites { columns, alignment } => {
                assert_eq!(columns, vec![0, 2, 4]);
                assert_eq!(alignment.ids(), vec!["g0", "g1", "g2"]);
                assert_eq!(alignment.records[1].seq, b"CCC".to_vec());
                assert_eq!(alignment.width(), Some(3));
            }
            SiteFilter::NoInformativeSites => panic!("expected sites"),
        }
    }

    #[test]
    fn test_empty_alignment() {
        assert_eq!(
            filter_variable_sites(&Alignment::default(), 0),
            SiteFilter::NoInformativeSites
        );
    }
}
