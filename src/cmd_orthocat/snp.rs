use clap::*;
use orthocat::libs::snp::{filter_variable_sites, SiteFilter};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("snp")
        .about("Keeps variable, gap-free columns of an alignment")
        .after_help(
            r###"
A column is kept when no row has a gap there and more than --min rows differ from
the first row. Kept columns stay in their original order.

When no column qualifies, a warning is logged and no file is written.

Examples:
1. Keep columns where at least one genome differs:
   orthocat snp all.aln --min 0 -o allsnp

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .index(1)
                .help("Alignment file, CLUSTAL or aligned FASTA"),
        )
        .arg(
            Arg::new("min")
                .long("min")
                .short('n')
                .required(true)
                .num_args(1)
                .value_parser(value_parser!(usize))
                .help("A column needs more than this many rows differing from the first row"),
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
                .default_value("allsnp")
                .help("Prefix of output files"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let infile = args.get_one::<String>("infile").unwrap();
    let min = *args.get_one::<usize>("min").unwrap();
    let outprefix = args.get_one::<String>("outprefix").unwrap();

    let aln = orthocat::libs::msa::read_alignment(infile)?;
    write_variable_sites(&aln, min, outprefix, args.get_flag("fasta"))?;

    Ok(())
}

/// Returns the number of kept columns; zero means nothing was written.
pub fn write_variable_sites(
    aln: &orthocat::libs::msa::Alignment,
    min: usize,
    outprefix: &str,
    fasta: bool,
) -> anyhow::Result<usize> {
    match filter_variable_sites(aln, min) {
        SiteFilter::Sites { columns, alignment } => {
            log::info!("{} variable sites of {}", columns.len(), aln.width().unwrap_or(0));
            orthocat::libs::msa::write_alignment_files(outprefix, &alignment, fasta)?;
            Ok(columns.len())
        }
        SiteFilter::NoInformativeSites => {
            log::warn!("no informative sites, {}.phy not written", outprefix);
            Ok(0)
        }
    }
}
