use crate::libs::error::OrthoError;
use std::fmt;

/// How genomes are supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Raw (multi-)FASTA genome sequences
    Raw,
    /// Annotated records whose coding sequences were extracted to FASTA
    Annotated,
}

/// Alphabet of the reference gene set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Nucleotide,
    Protein,
}

impl RefKind {
    /// Protein as soon as one reference sequence has a non-nucleotide symbol.
    pub fn detect(path: &str) -> anyhow::Result<Self> {
        crate::libs::io::require_file(path, "Multi-FASTA")?;
        let reader = crate::reader(path)?;
        let mut fa_in = noodles_fasta::io::Reader::new(reader);

        for result in fa_in.records() {
            let record = result?;
            if crate::libs::seq::has_non_nucleotide(record.sequence().as_ref()) {
                return Ok(RefKind::Protein);
            }
        }

        Ok(RefKind::Nucleotide)
    }

    /// Database type tag used in search result names
    pub fn dbtype(&self) -> &'static str {
        match self {
            RefKind::Nucleotide => "nucl",
            RefKind::Protein => "prot",
        }
    }

    /// Extension of the coding-sequence FASTA extracted from annotated genomes
    pub fn cds_extension(&self) -> &'static str {
        match self {
            RefKind::Nucleotide => "fna",
            RefKind::Protein => "faa",
        }
    }
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefKind::Nucleotide => write!(f, "nucleotide"),
            RefKind::Protein => write!(f, "protein"),
        }
    }
}

/// Minimum identity and coverage percentages a hit has to reach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub identity: u32,
    pub coverage: u32,
}

impl Thresholds {
    pub const DEFAULT: u32 = 80;
    /// Used for protein references and annotated genomes
    pub const RELAXED: u32 = 70;

    /// Explicit values always win; otherwise the defaults depend on the run.
    ///
    /// ```
    /// use orthocat::libs::settings::*;
    /// let t = Thresholds::resolve(None, None, InputKind::Raw, RefKind::Nucleotide);
    /// assert_eq!((t.identity, t.coverage), (80, 80));
    /// let t = Thresholds::resolve(None, Some(90), InputKind::Raw, RefKind::Protein);
    /// assert_eq!((t.identity, t.coverage), (70, 90));
    /// ```
    pub fn resolve(
        identity: Option<u32>,
        coverage: Option<u32>,
        input: InputKind,
        reference: RefKind,
    ) -> Self {
        let default = if input == InputKind::Annotated || reference == RefKind::Protein {
            Self::RELAXED
        } else {
            Self::DEFAULT
        };

        Self {
            identity: identity.unwrap_or(default),
            coverage: coverage.unwrap_or(default),
        }
    }
}

/// Everything the scorer and the builder need to know about a run.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub thresholds: Thresholds,
    pub input: InputKind,
    pub reference: RefKind,
}

impl Settings {
    pub fn new(
        identity: Option<u32>,
        coverage: Option<u32>,
        input: InputKind,
        reference: RefKind,
    ) -> Self {
        Self {
            thresholds: Thresholds::resolve(identity, coverage, input, reference),
            input,
            reference,
        }
    }
}

/// One genome of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomeEntry {
    /// Path as listed
    pub path: String,
    /// File name without directories
    pub file_name: String,
    /// Genome name, the record id of every match from this genome
    pub name: String,
}

impl GenomeEntry {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            file_name: crate::libs::seq::file_name(path),
            name: crate::libs::seq::genome_name(path),
        }
    }

    /// Cached search result of this genome against the reference set
    pub fn search_result(&self, workdir: &str, refs: &str, reference: RefKind) -> String {
        format!(
            "{}/{}.{}.{}.xml",
            workdir,
            crate::libs::seq::file_name(refs),
            self.file_name,
            reference.dbtype()
        )
    }

    /// Coding sequences extracted from an annotated genome
    pub fn cds_fasta(&self, workdir: &str, reference: RefKind) -> String {
        format!("{}/{}.{}", workdir, self.name, reference.cds_extension())
    }
}

/// Reads the genome list, one path per line. Blank lines are ignored.
pub fn read_genome_list(path: &str) -> Result<Vec<GenomeEntry>, OrthoError> {
    crate::libs::io::require_file(path, "Filelist")?;
    let genomes: Vec<GenomeEntry> = intspan::read_first_column(path)
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(GenomeEntry::new)
        .collect();

    if genomes.is_empty() {
        return Err(OrthoError::Input(format!("no genomes listed in {}", path)));
    }
    Ok(genomes)
}

/// Genome names in a total, stable order.
pub fn sorted_genome_names(genomes: &[GenomeEntry]) -> Vec<String> {
    let mut names: Vec<String> = genomes.iter().map(|g| g.name.clone()).collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_annotated() {
        let t = Thresholds::resolve(None, None, InputKind::Annotated, RefKind::Nucleotide);
        assert_eq!(t.identity, 70);
        assert_eq!(t.coverage, 70);

        let t = Thresholds::resolve(Some(95), None, InputKind::Annotated, RefKind::Protein);
        assert_eq!(t.identity, 95);
        assert_eq!(t.coverage, 70);
    }

    #[test]
    fn test_genome_entry() {
        let g = GenomeEntry::new("gen/CU928158.gbk");
        assert_eq!(g.file_name, "CU928158.gbk");
        assert_eq!(g.name, "CU928158");
        assert_eq!(
            g.search_result("temp", "refs/genes.fna", RefKind::Nucleotide),
            "temp/genes.fna.CU928158.gbk.nucl.xml"
        );
        assert_eq!(g.cds_fasta("temp", RefKind::Protein), "temp/CU928158.faa");
    }

    #[test]
    fn test_detect() {
        assert_eq!(
            RefKind::detect("tests/collect/refs.fna").unwrap(),
            RefKind::Nucleotide
        );
        assert_eq!(
            RefKind::detect("tests/collect/refs.faa").unwrap(),
            RefKind::Protein
        );
        assert!(RefKind::detect("tests/collect/absent.faa").is_err());
    }

    #[test]
    fn test_sorted_genome_names() {
        let genomes: Vec<GenomeEntry> = ["x/b.fa", "y/C.fa", "z/a.fa"]
            .iter()
            .map(|p| GenomeEntry::new(p))
            .collect();
        assert_eq!(sorted_genome_names(&genomes), vec!["C", "a", "b"]);
    }
}
