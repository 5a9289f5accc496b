//! Ingestion of pairwise search results.
//!
//! Only BLAST XML (`-outfmt 5`) is read. Each iteration is one query
//! sequence from the genome, each hit one reference gene, and each HSP one
//! local alignment between them.

use crate::libs::error::OrthoError;
use serde::Deserialize;

/// Results of one query sequence.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    /// Full definition line of the query
    pub query: String,
    pub query_len: usize,
    pub hits: Vec<RefHit>,
}

/// All HSPs of one query against one reference gene.
#[derive(Debug, Clone, Default)]
pub struct RefHit {
    /// Gene id parsed from the reference definition line
    pub gene: String,
    pub description: String,
    /// Reference length
    pub len: usize,
    pub hsps: Vec<Hsp>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hsp {
    pub score: f64,
    pub bit_score: f64,
    pub evalue: f64,
    pub query_start: usize,
    pub query_end: usize,
    pub ref_start: usize,
    pub ref_end: usize,
    pub query_frame: i32,
    pub hit_frame: i32,
    pub identities: usize,
    pub align_len: usize,
    /// Aligned query region, gaps included
    pub query_seq: String,
}

/// One HSP together with the query and reference it belongs to.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub gene: String,
    pub description: String,
    pub ref_len: usize,
    pub genome_file: String,
    pub query: String,
    pub query_len: usize,
    pub hsp: Hsp,
}

impl SearchHit {
    /// First word of the query definition, the key of FASTA lookups
    pub fn query_id(&self) -> &str {
        self.query.split_whitespace().next().unwrap_or("")
    }

    /// Reference matched on the reverse strand
    pub fn is_reverse(&self) -> bool {
        self.hsp.hit_frame < 0
    }
}

/// Splits a reference definition line into gene id and description.
///
/// A leading `gi|number|db|` triple is skipped. The id is the first word of
/// the first remaining field, the description the last field.
///
/// ```
/// use orthocat::libs::blast::split_ref_def;
/// assert_eq!(split_ref_def("arcA"), ("arcA".to_string(), "arcA".to_string()));
/// assert_eq!(
///     split_ref_def("gi|12345|ref|dnaA|chromosomal replication initiator"),
///     ("dnaA".to_string(), "chromosomal replication initiator".to_string())
/// );
/// ```
pub fn split_ref_def(def: &str) -> (String, String) {
    let mut fields: Vec<&str> = def.split('|').collect();
    if fields.len() > 3 && fields[0] == "gi" {
        fields.drain(..3);
    }

    let first = fields.first().copied().unwrap_or("");
    let gene = first.split_whitespace().next().unwrap_or(first).to_string();
    let description = fields.last().copied().unwrap_or("").trim().to_string();

    (gene, description)
}

pub fn read_blast_xml(path: &str) -> Result<Vec<QueryResult>, OrthoError> {
    let text = crate::libs::io::read_to_string(path).map_err(|e| OrthoError::SearchResult {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    parse_blast_xml(&text).map_err(|e| OrthoError::SearchResult {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

pub fn parse_blast_xml(xml: &str) -> anyhow::Result<Vec<QueryResult>> {
    let output: BlastOutputXml = quick_xml::de::from_str(xml)?;

    let mut results = vec![];
    for iteration in output.iterations.map(|e| e.items).unwrap_or_default() {
        let mut hits = vec![];
        for hit in iteration.hits.map(|e| e.items).unwrap_or_default() {
            let (gene, description) = split_ref_def(&hit.def);
            let hsps = hit
                .hsps
                .map(|e| e.items)
                .unwrap_or_default()
                .into_iter()
                .map(Hsp::from)
                .collect();
            hits.push(RefHit {
                gene,
                description,
                len: hit.len,
                hsps,
            });
        }

        results.push(QueryResult {
            query: iteration.query_def.unwrap_or_default(),
            query_len: iteration.query_len.unwrap_or_default(),
            hits,
        });
    }

    Ok(results)
}

#[derive(Debug, Deserialize)]
#[serde(rename = "BlastOutput")]
struct BlastOutputXml {
    #[serde(rename = "BlastOutput_iterations")]
    iterations: Option<IterationsXml>,
}

#[derive(Debug, Deserialize)]
struct IterationsXml {
    #[serde(rename = "Iteration", default)]
    items: Vec<IterationXml>,
}

#[derive(Debug, Deserialize)]
struct IterationXml {
    #[serde(rename = "Iteration_query-def")]
    query_def: Option<String>,
    #[serde(rename = "Iteration_query-len")]
    query_len: Option<usize>,
    #[serde(rename = "Iteration_hits")]
    hits: Option<HitsXml>,
}

#[derive(Debug, Deserialize)]
struct HitsXml {
    #[serde(rename = "Hit", default)]
    items: Vec<HitXml>,
}

#[derive(Debug, Deserialize)]
struct HitXml {
    #[serde(rename = "Hit_def")]
    def: String,
    #[serde(rename = "Hit_len")]
    len: usize,
    #[serde(rename = "Hit_hsps")]
    hsps: Option<HspsXml>,
}

#[derive(Debug, Deserialize)]
struct HspsXml {
    #[serde(rename = "Hsp", default)]
    items: Vec<HspXml>,
}

#[derive(Debug, Deserialize)]
struct HspXml {
    #[serde(rename = "Hsp_bit-score")]
    bit_score: f64,
    #[serde(rename = "Hsp_score")]
    score: f64,
    #[serde(rename = "Hsp_evalue")]
    evalue: f64,
    #[serde(rename = "Hsp_query-from")]
    query_from: usize,
    #[serde(rename = "Hsp_query-to")]
    query_to: usize,
    #[serde(rename = "Hsp_hit-from")]
    hit_from: usize,
    #[serde(rename = "Hsp_hit-to")]
    hit_to: usize,
    #[serde(rename = "Hsp_query-frame")]
    query_frame: Option<i32>,
    #[serde(rename = "Hsp_hit-frame")]
    hit_frame: Option<i32>,
    #[serde(rename = "Hsp_identity")]
    identity: usize,
    #[serde(rename = "Hsp_align-len")]
    align_len: usize,
    #[serde(rename = "Hsp_qseq")]
    qseq: String,
}

impl From<HspXml> for Hsp {
    fn from(x: HspXml) -> Self {
        Hsp {
            score: x.score,
            bit_score: x.bit_score,
            evalue: x.evalue,
            query_start: x.query_from,
            query_end: x.query_to,
            ref_start: x.hit_from,
            ref_end: x.hit_to,
            query_frame: x.query_frame.unwrap_or(0),
            hit_frame: x.hit_frame.unwrap_or(0),
            identities: x.identity,
            align_len: x.align_len,
            query_seq: x.qseq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = r#"<?xml version="1.0"?>
<!DOCTYPE BlastOutput PUBLIC "-//NCBI//NCBI BlastOutput/EN" "http://www.ncbi.nlm.nih.gov/dtd/NCBI_BlastOutput.dtd">
<BlastOutput>
  <BlastOutput_program>blastn</BlastOutput_program>
  <BlastOutput_version>BLASTN 2.12.0+</BlastOutput_version>
  <BlastOutput_db>refs.fna</BlastOutput_db>
  <BlastOutput_query-ID>Query_1</BlastOutput_query-ID>
  <BlastOutput_query-def>contig1 sample A</BlastOutput_query-def>
  <BlastOutput_query-len>120</BlastOutput_query-len>
  <BlastOutput_iterations>
    <Iteration>
      <Iteration_iter-num>1</Iteration_iter-num>
      <Iteration_query-ID>Query_1</Iteration_query-ID>
      <Iteration_query-def>contig1 sample A</Iteration_query-def>
      <Iteration_query-len>120</Iteration_query-len>
      <Iteration_hits>
        <Hit>
          <Hit_num>1</Hit_num>
          <Hit_id>gnl|BL_ORD_ID|0</Hit_id>
          <Hit_def>g1</Hit_def>
          <Hit_accession>0</Hit_accession>
          <Hit_len>12</Hit_len>
          <Hit_hsps>
            <Hsp>
              <Hsp_num>1</Hsp_num>
              <Hsp_bit-score>22.3</Hsp_bit-score>
              <Hsp_score>12</Hsp_score>
              <Hsp_evalue>1.5e-05</Hsp_evalue>
              <Hsp_query-from>11</Hsp_query-from>
              <Hsp_query-to>22</Hsp_query-to>
              <Hsp_hit-from>12</Hsp_hit-from>
              <Hsp_hit-to>1</Hsp_hit-to>
              <Hsp_query-frame>1</Hsp_query-frame>
              <Hsp_hit-frame>-1</Hsp_hit-frame>
              <Hsp_identity>12</Hsp_identity>
              <Hsp_positive>12</Hsp_positive>
              <Hsp_gaps>0</Hsp_gaps>
              <Hsp_align-len>12</Hsp_align-len>
              <Hsp_qseq>AAACCCGGGTTT</Hsp_qseq>
              <Hsp_hseq>AAACCCGGGTTT</Hsp_hseq>
              <Hsp_midline>||||||||||||</Hsp_midline>
            </Hsp>
          </Hit_hsps>
        </Hit>
      </Iteration_hits>
    </Iteration>
    <Iteration>
      <Iteration_iter-num>2</Iteration_iter-num>
      <Iteration_query-ID>Query_2</Iteration_query-ID>
      <Iteration_query-def>contig2</Iteration_query-def>
      <Iteration_query-len>80</Iteration_query-len>
      <Iteration_hits>
      </Iteration_hits>
      <Iteration_message>No hits found</Iteration_message>
    </Iteration>
  </BlastOutput_iterations>
</BlastOutput>
"#;

    #[test]
    fn test_parse_blast_xml() {
        let results = parse_blast_xml(XML).unwrap();
        assert_eq!(results.len(), 2);

        let first = &results[0];
        assert_eq!(first.query, "contig1 sample A");
        assert_eq!(first.query_len, 120);
        assert_eq!(first.hits.len(), 1);

        let hit = &first.hits[0];
        assert_eq!(hit.gene, "g1");
        assert_eq!(hit.description, "g1");
        assert_eq!(hit.len, 12);

        let hsp = &hit.hsps[0];
        assert_eq!(hsp.identities, 12);
        assert_eq!(hsp.align_len, 12);
        assert_eq!(hsp.hit_frame, -1);
        assert_eq!(hsp.ref_start, 12);
        assert_eq!(hsp.query_seq, "AAACCCGGGTTT");
        approx::assert_relative_eq!(hsp.evalue, 1.5e-5);

        assert!(results[1].hits.is_empty());
    }

    #[test]
    fn test_parse_blast_xml_malformed() {
        assert!(parse_blast_xml("<BlastOutput><BlastOutput_iterations>").is_err());
    }

    #[test]
    fn test_split_ref_def_words() {
        let (gene, desc) = split_ref_def("recA DNA recombinase|recombinase A");
        assert_eq!(gene, "recA");
        assert_eq!(desc, "recombinase A");
    }
}
