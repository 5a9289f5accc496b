//! Ortholog set building.
//!
//! Scoring a genome is a pure step: every HSP of its search results becomes
//! a [`Candidate`] carrying the scores, the threshold verdict and the
//! realised sequence. Folding the candidates into an [`OrthologSet`] is the
//! only stateful step, done by [`Collector`] in genome-list order, which
//! also streams the audit table.
//!
//! Selection rule: HSPs of one (query, gene) pair are visited in descending
//! score, ties in the order the search tool reported them. The first one
//! that passes the thresholds and yields a record is the pair's candidate;
//! later passing HSPs of the pair are ignored. Across pairs, only the first
//! record of a genome enters a gene's set.

use crate::libs::blast::{QueryResult, SearchHit};
use crate::libs::error::OrthoError;
use crate::libs::report::AuditWriter;
use crate::libs::scorer::HitScore;
use crate::libs::seq::{revcomp, ungap, SeqRecord};
use crate::libs::settings::{GenomeEntry, InputKind, RefKind, Settings};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;

/// Homologs of one reference gene, at most one per genome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrthologGroup {
    pub description: String,
    pub records: Vec<SeqRecord>,
}

impl OrthologGroup {
    pub fn contains(&self, genome: &str) -> bool {
        self.records.iter().any(|r| r.id == genome)
    }
}

/// Reference gene id => homologs, in order of the first retained match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrthologSet {
    groups: IndexMap<String, OrthologGroup>,
}

impl OrthologSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record unless its genome is already in the gene's group.
    /// Returns whether the record was added.
    pub fn insert(&mut self, gene: &str, record: SeqRecord) -> bool {
        let group = self
            .groups
            .entry(gene.to_string())
            .or_insert_with(|| OrthologGroup {
                description: record.description.clone(),
                records: vec![],
            });

        if group.contains(&record.id) {
            return false;
        }
        group.records.push(record);
        true
    }

    /// Appends another partial set. Groups new to `self` keep the order of
    /// `other`; duplicated genomes are dropped, existing records kept.
    pub fn merge(&mut self, other: OrthologSet) {
        for (gene, group) in other.groups {
            for record in group.records {
                self.insert(&gene, record);
            }
        }
    }

    pub fn contains(&self, gene: &str, genome: &str) -> bool {
        self.groups
            .get(gene)
            .map(|g| g.contains(genome))
            .unwrap_or(false)
    }

    pub fn get(&self, gene: &str) -> Option<&OrthologGroup> {
        self.groups.get(gene)
    }

    pub fn genes(&self) -> impl Iterator<Item = &String> {
        self.groups.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OrthologGroup)> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// One HSP after scoring.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub genome: String,
    pub hit: SearchHit,
    pub score: HitScore,
    /// Identity and coverage reach the thresholds
    pub passed: bool,
    /// First passing HSP of its (query, gene) pair with a usable record
    pub selected: bool,
    pub record: Option<SeqRecord>,
}

/// Coding sequences of an annotated genome, keyed by FASTA id.
pub type CdsIndex = HashMap<String, Vec<u8>>;

pub fn load_cds_index(path: &str) -> anyhow::Result<CdsIndex> {
    let reader = crate::reader(path)?;
    let mut fa_in = noodles_fasta::io::Reader::new(reader);

    let mut index = CdsIndex::new();
    for result in fa_in.records() {
        let record = result?;
        let name = String::from_utf8(record.name().into())?;
        index.insert(name, record.sequence().as_ref().to_vec());
    }

    Ok(index)
}

/// Realises the sequence record of one HSP.
///
/// Annotated genomes contribute the whole coding sequence the query came
/// from; raw genomes contribute the aligned query region without gaps.
/// Nucleotide matches against the reverse strand of the reference are
/// reverse-complemented.
pub fn build_record(
    settings: &Settings,
    genome: &GenomeEntry,
    hit: &SearchHit,
    cds: Option<&CdsIndex>,
) -> Result<SeqRecord, OrthoError> {
    let seq = match settings.input {
        InputKind::Annotated => {
            let index = cds.ok_or_else(|| {
                OrthoError::record(&genome.name, &hit.query, "no coding sequences loaded")
            })?;
            index.get(hit.query_id()).cloned().ok_or_else(|| {
                OrthoError::record(&genome.name, &hit.query, "query is absent from the CDS FASTA")
            })?
        }
        InputKind::Raw => ungap(hit.hsp.query_seq.as_bytes()),
    };

    if seq.is_empty() {
        return Err(OrthoError::record(&genome.name, &hit.query, "empty sequence"));
    }

    let seq = if settings.reference == RefKind::Nucleotide && hit.is_reverse() {
        revcomp(&seq)
    } else {
        seq
    };

    Ok(SeqRecord::new(&genome.name, &hit.description, seq))
}

/// Scores every HSP of one genome. Performs no shared writes.
pub fn score_genome(
    settings: &Settings,
    genome: &GenomeEntry,
    results: Vec<QueryResult>,
    cds: Option<&CdsIndex>,
) -> Vec<Candidate> {
    let mut candidates = vec![];

    for query in results {
        for ref_hit in query.hits {
            let mut hsps = ref_hit.hsps;
            // stable: equal scores keep the reported order
            hsps.sort_by(|a, b| b.score.total_cmp(&a.score));

            let mut taken = false;
            for hsp in hsps {
                let hit = SearchHit {
                    gene: ref_hit.gene.clone(),
                    description: ref_hit.description.clone(),
                    ref_len: ref_hit.len,
                    genome_file: genome.file_name.clone(),
                    query: query.query.clone(),
                    query_len: query.query_len,
                    hsp,
                };
                let score = HitScore::of(&hit.hsp, hit.ref_len);
                let passed = score.passes(&settings.thresholds);

                let record = match build_record(settings, genome, &hit, cds) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        if passed && !taken {
                            log::warn!("{}", e);
                        } else {
                            log::debug!("{}", e);
                        }
                        None
                    }
                };

                let selected = passed && !taken && record.is_some();
                if selected {
                    taken = true;
                }

                candidates.push(Candidate {
                    genome: genome.name.clone(),
                    hit,
                    score,
                    passed,
                    selected,
                    record,
                });
            }
        }
    }

    candidates
}

/// Reads the cached search results of a genome and scores them.
pub fn scan_genome(
    settings: &Settings,
    genome: &GenomeEntry,
    result_path: &str,
    cds_path: Option<&str>,
) -> anyhow::Result<Vec<Candidate>> {
    let results = crate::libs::blast::read_blast_xml(result_path)?;
    let cds = match cds_path {
        Some(path) => Some(load_cds_index(path)?),
        None => None,
    };
    Ok(score_genome(settings, genome, results, cds.as_ref()))
}

/// Per-genome tallies, for progress messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenomeSummary {
    pub hsps: usize,
    pub passed: usize,
    pub added: usize,
}

/// Accumulates the ortholog set across genomes and writes the audit table
/// as candidates are folded in.
pub struct Collector<W: Write> {
    set: OrthologSet,
    audit: AuditWriter<W>,
}

impl<W: Write> Collector<W> {
    pub fn new(audit: AuditWriter<W>) -> Self {
        Self {
            set: OrthologSet::new(),
            audit,
        }
    }

    pub fn fold(&mut self, candidates: Vec<Candidate>) -> std::io::Result<GenomeSummary> {
        let mut summary = GenomeSummary::default();
        for mut candidate in candidates {
            summary.hsps += 1;
            if candidate.passed {
                summary.passed += 1;
            }

            let added = if candidate.selected {
                match candidate.record.clone() {
                    Some(record) => self.set.insert(&candidate.hit.gene, record),
                    None => false,
                }
            } else {
                false
            };
            if added {
                summary.added += 1;
            } else if candidate.selected {
                log::debug!(
                    "{} already has a homolog of {}",
                    candidate.genome,
                    candidate.hit.gene
                );
                candidate.selected = false;
            }

            self.audit.write_row(&candidate, added)?;
        }
        self.audit.flush()?;

        Ok(summary)
    }

    pub fn finish(mut self) -> std::io::Result<OrthologSet> {
        self.audit.flush()?;
        Ok(self.set)
    }
}

/// Releases items tagged with their list position in list order.
#[derive(Debug)]
pub struct InOrder<T> {
    next: usize,
    pending: BTreeMap<usize, T>,
}

impl<T> InOrder<T> {
    pub fn new() -> Self {
        Self {
            next: 0,
            pending: BTreeMap::new(),
        }
    }

    /// Stores `item` and returns every item now ready, in order.
    pub fn push(&mut self, index: usize, item: T) -> Vec<(usize, T)> {
        self.pending.insert(index, item);

        let mut ready = vec![];
        while let Some(item) = self.pending.remove(&self.next) {
            ready.push((self.next, item));
            self.next += 1;
        }
        ready
    }
}

impl<T> Default for InOrder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the Collector over all genomes.
///
/// With `parallel > 1` genomes are scored on worker threads. A genome is
/// folded, and its audit rows written, as soon as it and every genome
/// before it in the list are scored, so the set and the audit table match
/// the sequential run. Genomes whose search results are missing or
/// unreadable are skipped with a warning.
pub fn collect_genomes<W: Write>(
    collector: &mut Collector<W>,
    settings: &Settings,
    genomes: &[GenomeEntry],
    refs: &str,
    workdir: &str,
    parallel: usize,
) -> anyhow::Result<()> {
    let scan = |genome: &GenomeEntry| -> anyhow::Result<Vec<Candidate>> {
        let result_path = genome.search_result(workdir, refs, settings.reference);
        if !crate::libs::io::is_cached(&result_path) {
            anyhow::bail!("search results {} are missing or empty", result_path);
        }
        let cds_path = match settings.input {
            InputKind::Annotated => Some(genome.cds_fasta(workdir, settings.reference)),
            InputKind::Raw => None,
        };
        scan_genome(settings, genome, &result_path, cds_path.as_deref())
    };

    let mut fold = |genome: &GenomeEntry, scanned: anyhow::Result<Vec<Candidate>>| {
        match scanned {
            Ok(candidates) => {
                let summary = collector.fold(candidates)?;
                log::info!(
                    "{}: {} HSPs, {} passed, {} added",
                    genome.name,
                    summary.hsps,
                    summary.passed,
                    summary.added
                );
            }
            Err(e) => log::warn!("skip {}: {:#}", genome.name, e),
        }
        Ok::<(), std::io::Error>(())
    };

    if parallel <= 1 {
        for genome in genomes {
            log::info!("reading {}", genome.path);
            fold(genome, scan(genome))?;
        }
        return Ok(());
    }

    // Channel 1 - Genome indexes
    let (snd1, rcv1) = crossbeam::channel::bounded::<usize>(parallel);
    // Channel 2 - Scored genomes
    let (snd2, rcv2) = crossbeam::channel::bounded::<(usize, anyhow::Result<Vec<Candidate>>)>(parallel);

    crossbeam::scope(|s| -> anyhow::Result<()> {
        //----------------------------
        // Dispatcher thread
        //----------------------------
        s.spawn(move |_| {
            for i in 0..genomes.len() {
                if snd1.send(i).is_err() {
                    break;
                }
            }
        });

        //----------------------------
        // Worker threads
        //----------------------------
        for _ in 0..parallel {
            let (sendr, recvr) = (snd2.clone(), rcv1.clone());
            let scan = &scan;
            s.spawn(move |_| {
                for i in recvr.iter() {
                    log::debug!("reading {}", genomes[i].path);
                    if sendr.send((i, scan(&genomes[i]))).is_err() {
                        break;
                    }
                }
            });
        }
        // workers hold the only handles left, so the channels close with them
        drop(snd2);
        drop(rcv1);

        //----------------------------
        // Writer, in list order
        //----------------------------
        let mut in_order = InOrder::new();
        for (i, scanned) in rcv2 {
            for (j, scanned) in in_order.push(i, scanned) {
                fold(&genomes[j], scanned)?;
            }
        }
        Ok(())
    })
    .map_err(|_| anyhow::anyhow!("a scoring thread panicked"))??;

    Ok(())
}
