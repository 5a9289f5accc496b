use clap::*;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("concat")
        .about("Concatenates gene alignments that contain every genome")
        .after_help(
            r###"
Joins per-gene alignments into one row per genome, in the order the files are given.

Note:
- A gene takes part only when its alignment has exactly one row per genome.
  Incomplete genes are left out, never padded with gaps.
- Unreadable or malformed alignment files are skipped with a warning.
- Inputs may be CLUSTAL or aligned FASTA.
- Writes <outprefix>.phy (relaxed PHYLIP) and <outprefix>.aln (CLUSTAL);
  --fasta adds <outprefix>.fas.
- Nothing is written if a genome row misses any included gene.

Examples:
1. Concatenate alignments of a 3-genome run:
   orthocat concat tests/concat/g1.aln tests/concat/g2.aln --count 3 -o all

2. Take the genome count from the genome list:
   orthocat concat aln/*.aln --list genome.lst -o out.all --fasta

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
            Arg::new("count")
                .long("count")
                .short('n')
                .num_args(1)
                .value_parser(value_parser!(usize))
                .help("Number of genomes in the run"),
        )
        .arg(
            Arg::new("genome.lst")
                .long("list")
                .short('l')
                .num_args(1)
                .help("Genome list of the run, gives the genome count"),
        )
        .group(
            ArgGroup::new("genomes")
                .args(["count", "genome.lst"])
                .required(true),
        )
        .arg(
            Arg::new("fasta")
                .long("fasta")
                .action(ArgAction::SetTrue)
                .help("Also write FASTA"),
        )
        .arg(
            Arg::new("outprefix")
                .long("outprefix")
                .short('o')
                .num_args(1)
                .default_value("all")
                .help("Prefix of output files"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let genome_count = match args.get_one::<usize>("count") {
        Some(n) => *n,
        None => {
            let list = args.get_one::<String>("genome.lst").unwrap();
            orthocat::libs::settings::read_genome_list(list)?.len()
        }
    };
    let outprefix = args.get_one::<String>("outprefix").unwrap();
    let is_fasta = args.get_flag("fasta");

    let genes: Vec<(String, String)> = args
        .get_many::<String>("infiles")
        .unwrap()
        .map(|path| (orthocat::libs::seq::file_name(path), path.to_string()))
        .collect();

    //----------------------------
    // Ops
    //----------------------------
    let aln = orthocat::libs::concat::concat_files(&genes, genome_count)?;

    //----------------------------
    // Output
    //----------------------------
    orthocat::libs::msa::write_alignment_files(outprefix, &aln, is_fasta)?;

    Ok(())
}
