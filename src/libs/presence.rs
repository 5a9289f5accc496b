use crate::libs::ortholog::OrthologSet;

/// Presence of one reference gene over the sorted genome names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceRow {
    pub gene: String,
    pub description: String,
    pub present: Vec<bool>,
}

impl PresenceRow {
    pub fn total(&self) -> usize {
        self.present.iter().filter(|p| **p).count()
    }
}

/// Gene × genome presence table.
///
/// Columns are the genome names in sorted order; rows follow the order in
/// which genes first received a homolog. Genes without any homolog never
/// entered the ortholog set and have no row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceMatrix {
    pub genomes: Vec<String>,
    pub rows: Vec<PresenceRow>,
}

impl PresenceMatrix {
    pub fn build(set: &OrthologSet, genome_names: &[String]) -> Self {
        let mut genomes = genome_names.to_vec();
        genomes.sort();

        let rows = set
            .iter()
            .map(|(gene, group)| PresenceRow {
                gene: gene.to_string(),
                description: group.description.clone(),
                present: genomes.iter().map(|name| group.contains(name)).collect(),
            })
            .collect();

        Self { genomes, rows }
    }

    /// Number of genes found in each genome, in column order
    pub fn column_totals(&self) -> Vec<usize> {
        (0..self.genomes.len())
            .map(|i| self.rows.iter().filter(|r| r.present[i]).count())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::seq::SeqRecord;

    #[test]
    fn test_build() {
        let mut set = OrthologSet::new();
        set.insert("g2", SeqRecord::new("B", "gene two", b"AC".to_vec()));
        set.insert("g1", SeqRecord::new("B", "gene one", b"AC".to_vec()));
        set.insert("g1", SeqRecord::new("A", "gene one", b"AC".to_vec()));

        let names: Vec<String> = ["C", "A", "B"].iter().map(|s| s.to_string()).collect();
        let matrix = PresenceMatrix::build(&set, &names);

        assert_eq!(matrix.genomes, vec!["A", "B", "C"]);
        // insertion order, not sorted
        assert_eq!(matrix.rows[0].gene, "g2");
        assert_eq!(matrix.rows[0].present, vec![false, true, false]);
        assert_eq!(matrix.rows[1].description, "gene one");
        assert_eq!(matrix.rows[1].present, vec![true, true, false]);
        assert_eq!(matrix.rows[1].total(), 2);
        assert_eq!(matrix.column_totals(), vec![1, 2, 0]);
    }

    #[test]
    fn test_empty_set() {
        let names = vec!["A".to_string()];
        let matrix = PresenceMatrix::build(&OrthologSet::new(), &names);
        assert!(matrix.rows.is_empty());
        assert_eq!(matrix.column_totals(), vec![0]);
    }
}
