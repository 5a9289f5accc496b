use thiserror::Error;

/// Failures raised by the homolog and alignment pipeline.
///
/// `Input`, `NoCompleteGenes` and `Corrupted` stop a run. `Record` and
/// `Alignment` are reported by the callers and the run carries on without
/// the affected record or gene.
#[derive(Debug, Error)]
pub enum OrthoError {
    /// Missing or unreadable reference, genome list or required intermediate
    #[error("{0}")]
    Input(String),

    /// A matched region could not be turned into a sequence record
    #[error("cannot build a record for `{query}` in {genome}: {reason}")]
    Record {
        genome: String,
        query: String,
        reason: String,
    },

    /// A per-gene alignment file could not be read or parsed
    #[error("bad alignment {path}: {reason}")]
    Alignment { path: String, reason: String },

    /// Search results could not be parsed
    #[error("bad search results {path}: {reason}")]
    SearchResult { path: String, reason: String },

    #[error("no gene alignment contains all {0} genomes")]
    NoCompleteGenes(usize),

    /// Post-condition of concatenation failed
    #[error("concatenated alignment is corrupted: {0}")]
    Corrupted(String),
}

impl OrthoError {
    pub fn record(genome: &str, query: &str, reason: impl Into<String>) -> Self {
        OrthoError::Record {
            genome: genome.to_string(),
            query: query.to_string(),
            reason: reason.into(),
        }
    }

    pub fn alignment(path: &str, reason: impl Into<String>) -> Self {
        OrthoError::Alignment {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
