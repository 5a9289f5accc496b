use clap::*;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("xmfa")
        .about("Writes gene alignments as one XMFA file")
        .after_help(
            r###"
Each input alignment becomes one block: a `#<file name>` line, the rows in FASTA and a
closing `=`. Genes do not need to contain every genome.

Unreadable alignments are skipped with a warning.

Examples:
1. Combine gene alignments for recombination-aware tree builders:
   orthocat xmfa tests/concat/g1.aln tests/concat/g2.aln -o all.xmfa

"###,
        )
        .arg(
            Arg::new("infiles")
                .required(true)
                .num_args(1..)
                .index(1)
                .help("Per-gene alignment files"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let mut writer = orthocat::writer(args.get_one::<String>("outfile").unwrap())?;

    let genes: Vec<(String, String)> = args
        .get_many::<String>("infiles")
        .unwrap()
        .map(|path| (orthocat::libs::seq::file_name(path), path.to_string()))
        .collect();
    write_xmfa(&mut writer, &genes)?;
    writer.flush()?;

    Ok(())
}

/// Returns the number of blocks written.
pub fn write_xmfa<W: Write>(writer: &mut W, genes: &[(String, String)]) -> anyhow::Result<usize> {
    let mut blocks = 0;
    for (name, path) in genes {
        match orthocat::libs::msa::read_alignment(path) {
            Ok(aln) => {
                orthocat::libs::msa::write_xmfa_block(writer, name, &aln)?;
                blocks += 1;
            }
            Err(e) => log::warn!("{}", e),
        }
    }
    Ok(blocks)
}
