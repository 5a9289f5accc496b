use crate::libs::ortholog::{Candidate, OrthologSet};
use crate::libs::presence::PresenceMatrix;
use itertools::Itertools;
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::Path;

pub const AUDIT_HEADER: [&str; 16] = [
    "ref_gene",
    "desc",
    "len",
    "genome_file_name",
    "fasta_entry",
    "len",
    "identity",
    "perOflength",
    "e-value",
    "ref_start",
    "ref_stop",
    "genome_start",
    "genome_stop",
    "score",
    "added",
    "sequence",
];

/// Tab-separated audit table, one row per HSP.
pub struct AuditWriter<W: Write> {
    writer: W,
}

impl<W: Write> AuditWriter<W> {
    /// Writes the header line.
    pub fn new(mut writer: W) -> io::Result<Self> {
        writeln!(writer, "{}", AUDIT_HEADER.join("\t"))?;
        Ok(Self { writer })
    }

    pub fn write_row(&mut self, candidate: &Candidate, added: bool) -> io::Result<()> {
        let hit = &candidate.hit;
        let hsp = &hit.hsp;
        let seq = candidate
            .record
            .as_ref()
            .map(|r| r.seq_str())
            .unwrap_or("");

        writeln!(
            self.writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:e}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            hit.gene,
            hit.description,
            hit.ref_len,
            hit.genome_file,
            hit.query,
            hit.query_len,
            candidate.score.identity_int(),
            candidate.score.coverage_int(),
            hsp.evalue,
            hsp.ref_start,
            hsp.ref_end,
            hsp.query_start,
            hsp.query_end,
            hsp.score,
            if added { 1 } else { 0 },
            seq,
        )
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Header row of sorted genome names, then the description of each gene
/// followed by `1`/`0` per genome.
pub fn write_presence<W: Write>(writer: &mut W, matrix: &PresenceMatrix) -> io::Result<()> {
    writeln!(writer, "\t{}", matrix.genomes.join("\t"))?;
    for row in &matrix.rows {
        let cells = row
            .present
            .iter()
            .map(|p| if *p { "1" } else { "0" })
            .join("\t");
        writeln!(writer, "{}\t{}", row.description, cells)?;
    }
    Ok(())
}

pub fn write_presence_xlsx(path: &str, matrix: &PresenceMatrix) -> anyhow::Result<()> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("presence")?;

    for (i, genome) in matrix.genomes.iter().enumerate() {
        worksheet.write_string(0, (i + 1) as u16, genome)?;
    }
    for (r, row) in matrix.rows.iter().enumerate() {
        let r = (r + 1) as u32;
        worksheet.write_string(r, 0, &row.description)?;
        for (c, present) in row.present.iter().enumerate() {
            worksheet.write_number(r, (c + 1) as u16, if *present { 1 } else { 0 })?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// Writes one FASTA file per gene into `dir`, named `<prefix><gene>.fas`.
/// Returns gene ids with the written paths, in set order.
///
/// Gene ids that sanitise to a name already taken get a `.2`, `.3`, ...
/// suffix, so every gene has its own file.
pub fn write_gene_fastas(
    set: &OrthologSet,
    dir: &str,
    prefix: &str,
) -> anyhow::Result<Vec<(String, String)>> {
    std::fs::create_dir_all(dir)?;

    let mut taken: HashSet<String> = HashSet::new();
    let mut written = vec![];
    for (gene, group) in set.iter() {
        let stem = crate::libs::seq::safe_name(gene);
        let mut name = stem.clone();
        let mut n = 1;
        while !taken.insert(name.clone()) {
            n += 1;
            name = format!("{}.{}", stem, n);
        }
        if n > 1 {
            log::warn!("{} clashes with another gene id, written as {}{}.fas", gene, prefix, name);
        }

        let file = format!("{}{}.fas", prefix, name);
        let path = Path::new(dir).join(&file).display().to_string();

        let mut writer = crate::writer(&path)?;
        for record in &group.records {
            writer.write_all(
                format!(">{} {}\n{}\n", record.id, record.description, record.seq_str()).as_ref(),
            )?;
        }
        writer.flush()?;

        written.push((gene.to_string(), path));
    }

    Ok(written)
}
