extern crate clap;
use clap::*;

mod cmd_orthocat;

fn main() -> anyhow::Result<()> {
    let app = Command::new("orthocat")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`orthocat` - homologs of marker genes, presence tables and concatenated alignments")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("More log messages, repeat for more"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Only warnings and errors"),
        )
        .subcommand(cmd_orthocat::detect::make_subcommand())
        .subcommand(cmd_orthocat::collect::make_subcommand())
        .subcommand(cmd_orthocat::concat::make_subcommand())
        .subcommand(cmd_orthocat::snp::make_subcommand())
        .subcommand(cmd_orthocat::xmfa::make_subcommand())
        .subcommand(cmd_orthocat::pl::make_subcommand())
        .after_help(
            r###"Subcommand groups:

* Homologs:
    * detect  - Protein or nucleotide reference set
    * collect - Homolog sets, audit table and presence matrix from search results

* Alignments:
    * concat - Concatenate gene alignments covering all genomes
    * snp    - Keep variable, gap-free columns
    * xmfa   - Gene alignments as one XMFA file

* Pipelines:
    * pl - Search, collect, align, concatenate and filter in one run

"###,
        );

    let matches = app.get_matches();

    let level = if matches.get_flag("quiet") {
        log::LevelFilter::Warn
    } else {
        match matches.get_count("verbose") {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    match matches.subcommand() {
        Some(("detect", sub_matches)) => cmd_orthocat::detect::execute(sub_matches),
        Some(("collect", sub_matches)) => cmd_orthocat::collect::execute(sub_matches),
        Some(("concat", sub_matches)) => cmd_orthocat::concat::execute(sub_matches),
        Some(("snp", sub_matches)) => cmd_orthocat::snp::execute(sub_matches),
        Some(("xmfa", sub_matches)) => cmd_orthocat::xmfa::execute(sub_matches),
        Some(("pl", sub_matches)) => cmd_orthocat::pl::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
