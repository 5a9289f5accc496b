//! Multiple sequence alignments and their text formats.
//!
//! Readers: CLUSTAL (as written by MUSCLE or ClustalW) and aligned FASTA.
//! Writers: CLUSTAL, relaxed PHYLIP, FASTA and XMFA blocks.

use crate::libs::error::OrthoError;
use indexmap::IndexMap;
use std::io::{self, Write};

/// One aligned row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedSeq {
    pub id: String,
    pub seq: Vec<u8>,
}

impl AlignedSeq {
    pub fn new(id: &str, seq: &[u8]) -> Self {
        Self {
            id: id.to_string(),
            seq: seq.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    pub records: Vec<AlignedSeq>,
}

impl Alignment {
    pub fn new(records: Vec<AlignedSeq>) -> Self {
        Self { records }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Common row length; `None` for ragged or empty alignments.
    ///
    /// ```
    /// use orthocat::libs::msa::{Alignment, AlignedSeq};
    /// let aln = Alignment::new(vec![AlignedSeq::new("A", b"AC-T"), AlignedSeq::new("B", b"ACGT")]);
    /// assert_eq!(aln.width(), Some(4));
    /// ```
    pub fn width(&self) -> Option<usize> {
        let first = self.records.first()?.seq.len();
        if self.records.iter().all(|r| r.seq.len() == first) {
            Some(first)
        } else {
            None
        }
    }

    pub fn ids(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.id.as_str()).collect()
    }

    /// Keeps only the given columns, in the given order.
    pub fn project(&self, columns: &[usize]) -> Self {
        let records = self
            .records
            .iter()
            .map(|r| AlignedSeq {
                id: r.id.clone(),
                seq: columns.iter().map(|&i| r.seq[i]).collect(),
            })
            .collect();
        Self { records }
    }
}

/// Reads an alignment file, FASTA when it starts with `>`, CLUSTAL
/// otherwise. Rows must have equal lengths.
pub fn read_alignment(path: &str) -> Result<Alignment, OrthoError> {
    let text = crate::libs::io::read_to_string(path)
        .map_err(|e| OrthoError::alignment(path, e.to_string()))?;
    parse_alignment(&text).map_err(|reason| OrthoError::alignment(path, reason))
}

pub fn parse_alignment(text: &str) -> Result<Alignment, String> {
    let aln = if text.trim_start().starts_with('>') {
        parse_aligned_fasta(text)?
    } else {
        parse_clustal(text)?
    };

    if aln.is_empty() {
        return Err("no sequences".to_string());
    }
    if aln.width().is_none() {
        return Err("sequences have different lengths".to_string());
    }
    Ok(aln)
}

pub fn parse_aligned_fasta(text: &str) -> Result<Alignment, String> {
    let mut records: Vec<AlignedSeq> = vec![];
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('>') {
            let id = header.split_whitespace().next().unwrap_or("");
            if id.is_empty() {
                return Err("empty FASTA header".to_string());
            }
            records.push(AlignedSeq::new(id, b""));
        } else {
            match records.last_mut() {
                Some(record) => record.seq.extend(line.bytes().filter(|b| !b.is_ascii_whitespace())),
                None => return Err("sequence before the first header".to_string()),
            }
        }
    }
    Ok(Alignment::new(records))
}

/// Blocks of `id  residues [count]` lines. Conservation lines start with
/// whitespace and are skipped. Rows keep the order of first appearance.
pub fn parse_clustal(text: &str) -> Result<Alignment, String> {
    let mut lines = text.lines().skip_while(|l| l.trim().is_empty());
    match lines.next() {
        Some(header) if header.starts_with("CLUSTAL") || header.starts_with("MUSCLE") => {}
        _ => return Err("missing CLUSTAL header".to_string()),
    }

    let mut seq_of: IndexMap<String, Vec<u8>> = IndexMap::new();
    for line in lines {
        if line.trim().is_empty() || line.starts_with(|c: char| c.is_whitespace()) {
            continue;
        }

        let mut fields = line.split_whitespace();
        let id = fields.next().unwrap_or("");
        let residues = match fields.next() {
            Some(s) => s,
            None => return Err(format!("no residues on line `{}`", line)),
        };
        if let Some(count) = fields.next() {
            if count.parse::<usize>().is_err() {
                return Err(format!("unexpected field `{}`", count));
            }
        }

        seq_of
            .entry(id.to_string())
            .or_default()
            .extend_from_slice(residues.as_bytes());
    }

    Ok(Alignment::new(
        seq_of
            .into_iter()
            .map(|(id, seq)| AlignedSeq { id, seq })
            .collect(),
    ))
}

const CLUSTAL_BLOCK: usize = 60;

/// CLUSTAL with 60-column blocks and a `*` conservation line.
pub fn write_clustal<W: Write>(writer: &mut W, aln: &Alignment) -> io::Result<()> {
    writeln!(writer, "CLUSTAL W multiple sequence alignment")?;
    writeln!(writer)?;

    let name_width = aln
        .records
        .iter()
        .map(|r| r.id.len())
        .max()
        .unwrap_or(0)
        .max(10)
        + 6;
    let width = aln.width().unwrap_or(0);

    let mut start = 0;
    while start < width {
        let end = (start + CLUSTAL_BLOCK).min(width);
        writeln!(writer)?;
        for r in &aln.records {
            writeln!(
                writer,
                "{:<name_width$}{}",
                r.id,
                String::from_utf8_lossy(&r.seq[start..end]),
            )?;
        }

        let marks: String = (start..end)
            .map(|i| {
                let b = aln.records[0].seq[i];
                if !crate::libs::seq::is_gap(b) && aln.records.iter().all(|r| r.seq[i] == b) {
                    '*'
                } else {
                    ' '
                }
            })
            .collect();
        writeln!(writer, "{:<name_width$}{}", "", marks)?;

        start = end;
    }

    Ok(())
}

/// Relaxed PHYLIP: `count length` then one `name sequence` line per row.
pub fn write_phylip<W: Write>(writer: &mut W, aln: &Alignment) -> io::Result<()> {
    writeln!(writer, "{} {}", aln.len(), aln.width().unwrap_or(0))?;
    for r in &aln.records {
        writeln!(writer, "{} {}", r.id, String::from_utf8_lossy(&r.seq))?;
    }
    Ok(())
}

pub fn write_fasta<W: Write>(writer: &mut W, aln: &Alignment) -> io::Result<()> {
    for r in &aln.records {
        writeln!(writer, ">{}\n{}", r.id, String::from_utf8_lossy(&r.seq))?;
    }
    Ok(())
}

/// One XMFA block: a `#name` comment, FASTA rows and a closing `=`.
pub fn write_xmfa_block<W: Write>(writer: &mut W, name: &str, aln: &Alignment) -> io::Result<()> {
    writeln!(writer, "#{}", name)?;
    write_fasta(writer, aln)?;
    writeln!(writer, "=")?;
    Ok(())
}

/// Writes `<prefix>.phy` and `<prefix>.aln`, plus `<prefix>.fas` on request.
pub fn write_alignment_files(prefix: &str, aln: &Alignment, fasta: bool) -> anyhow::Result<()> {
    let mut writer = crate::writer(&format!("{}.phy", prefix))?;
    write_phylip(&mut writer, aln)?;
    writer.flush()?;

    let mut writer = crate::writer(&format!("{}.aln", prefix))?;
    write_clustal(&mut writer, aln)?;
    writer.flush()?;

    if fasta {
        let mut writer = crate::writer(&format!("{}.fas", prefix))?;
        write_fasta(&mut writer, aln)?;
        writer.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLUSTAL: &str = "\
CLUSTAL W (1.83) multiple sequence alignment


A               ATGAAACCC-GG 11
B               ATGAAACCCAGG 12
C               ATGTAACCCAGG 12
                *** ***** **

A               TTTAAA 17
B               TTTAAA 18
C               TTCAAA 18
                ** ***
";

    #[test]
    fn test_parse_clustal() {
        let aln = parse_alignment(CLUSTAL).unwrap();
        assert_eq!(aln.ids(), vec!["A", "B", "C"]);
        assert_eq!(aln.width(), Some(18));
        assert_eq!(aln.records[0].seq, b"ATGAAACCC-GGTTTAAA".to_vec());
    }

    #[test]
    fn test_parse_muscle_header() {
        let text = "MUSCLE (3.8) multiple sequence alignment\n\nx  AC-\ny  ACG\n";
        let aln = parse_alignment(text).unwrap();
        assert_eq!(aln.len(), 2);
        assert_eq!(aln.width(), Some(3));
    }

    #[test]
    fn test_parse_aligned_fasta() {
        let aln = parse_alignment(">A desc\nAC-\nGT\n>B\nACG\nGT\n").unwrap();
        assert_eq!(aln.ids(), vec!["A", "B"]);
        assert_eq!(aln.records[0].seq, b"AC-GT".to_vec());
    }

    #[test]
    fn test_parse_rejects() {
        assert!(parse_alignment("").is_err());
        assert!(parse_alignment("not an alignment\nA ACGT\n").is_err());
        assert!(parse_alignment("CLUSTAL W\n\nA ACGT\nB ACG\n").is_err());
        assert!(parse_alignment("CLUSTAL W\n\nA\n").is_err());
        assert!(parse_alignment("ACGT\n>A\nACGT\n").is_err());
    }

    #[test]
    fn test_clustal_output_reads_back() {
        let long: Vec<u8> = b"ACGT".iter().cycle().take(130).copied().collect();
        let mut other = long.clone();
        other[65] = b'-';
        let aln = Alignment::new(vec![
            AlignedSeq::new("genome_with_long_name", &long),
            AlignedSeq::new("B", &other),
        ]);

        let mut out = Vec::new();
        write_clustal(&mut out, &aln).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("CLUSTAL"));
        // three blocks of 60, 60 and 10 columns
        assert_eq!(text.matches("genome_with_long_name").count(), 3);

        assert_eq!(parse_alignment(&text).unwrap(), aln);
    }

    #[test]
    fn test_write_phylip() {
        let aln = Alignment::new(vec![AlignedSeq::new("A", b"AC-T"), AlignedSeq::new("B", b"ACGT")]);
        let mut out = Vec::new();
        write_phylip(&mut out, &aln).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "2 4\nA AC-T\nB ACGT\n");
    }

    #[test]
    fn test_write_xmfa_block() {
        let aln = Alignment::new(vec![AlignedSeq::new("A", b"AC"), AlignedSeq::new("B", b"AG")]);
        let mut out = Vec::new();
        write_xmfa_block(&mut out, "out.g1.fas", &aln).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "#out.g1.fas\n>A\nAC\n>B\nAG\n=\n"
        );
    }

    #[test]
    fn test_project() {
        let aln = Alignment::new(vec![AlignedSeq::new("A", b"ACGT"), AlignedSeq::new("B", b"TGCA")]);
        let p = aln.project(&[1, 3]);
        assert_eq!(p.records[0].seq, b"CT".to_vec());
        assert_eq!(p.records[1].seq, b"GA".to_vec());
    }
}
