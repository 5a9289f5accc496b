use clap::*;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("detect")
        .about("Detects whether reference genes are protein or nucleotide")
        .after_help(
            r###"
Prints `protein` when any reference sequence has a symbol other than A, C, G, T or N,
`nucleotide` otherwise.

Examples:
1. Detect the kind of a reference set:
   orthocat detect tests/collect/refs.fna

"###,
        )
        .arg(
            Arg::new("refs.fa")
                .required(true)
                .index(1)
                .help("Multi-FASTA file of reference genes"),
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
    let refs = args.get_one::<String>("refs.fa").unwrap();
    let mut writer = orthocat::writer(args.get_one::<String>("outfile").unwrap())?;

    let kind = orthocat::libs::settings::RefKind::detect(refs)?;
    writer.write_all(format!("{}\n", kind).as_ref())?;
    writer.flush()?;

    Ok(())
}
