use clap::*;
use orthocat::libs::ortholog::{collect_genomes, Collector, OrthologSet};
use orthocat::libs::presence::PresenceMatrix;
use orthocat::libs::report::{write_gene_fastas, write_presence, write_presence_xlsx, AuditWriter};
use orthocat::libs::settings::*;
use std::io::Write;
use std::path::Path;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    add_collect_args(
        Command::new("collect")
            .about("Collects homologs of reference genes from search results")
            .after_help(
                r###"
Reads the cached search results of every genome, keeps the best passing match of each
reference gene per genome, and writes:

* <outdir>/<prefix>table.tsv    - every HSP, with an `added` flag
* <outdir>/<prefix>presence.tsv - genes x sorted genome names, 1/0
* <outdir>/fas/<prefix><gene>.fas - homologs of each gene

Search results are read from <workdir>/<refs file>.<genome file>.<prot|nucl>.xml.
With --annotated, coding sequences are looked up in <workdir>/<genome name>.faa (protein
references) or .fna (nucleotide references).

Default cutoffs are 80% identity and 80% coverage; 70/70 for protein references or
annotated genomes. Explicit values always win.

Examples:
1. Collect homologs into the current directory:
   orthocat collect tests/collect/refs.fna tests/collect/genome.lst --workdir tests/collect/temp

2. Score genomes on 4 threads and also write an xlsx presence table:
   orthocat collect refs.fna genome.lst --parallel 4 --xlsx -o results

"###,
            ),
    )
}

/// Options shared with the pipeline.
pub fn add_collect_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("refs.fa")
            .required(true)
            .index(1)
            .help("Multi-FASTA file of reference genes, amino acid or nucleotide"),
    )
    .arg(
        Arg::new("genome.lst")
            .required(true)
            .index(2)
            .help("File listing genome paths, one per line"),
    )
    .arg(
        Arg::new("annotated")
            .long("annotated")
            .short('g')
            .action(ArgAction::SetTrue)
            .help("Genomes are annotated records rather than FASTA"),
    )
    .arg(
        Arg::new("identity")
            .long("identity")
            .short('p')
            .num_args(1)
            .value_parser(value_parser!(u32))
            .help("Minimum percent identity"),
    )
    .arg(
        Arg::new("coverage")
            .long("coverage")
            .short('l')
            .num_args(1)
            .value_parser(value_parser!(u32))
            .help("Minimum percent of the reference length covered"),
    )
    .arg(
        Arg::new("workdir")
            .long("workdir")
            .num_args(1)
            .default_value("temp")
            .help("Directory of search results and extracted coding sequences"),
    )
    .arg(
        Arg::new("prefix")
            .long("prefix")
            .num_args(1)
            .default_value("out.")
            .help("Prefix of output files"),
    )
    .arg(
        Arg::new("outdir")
            .long("outdir")
            .short('o')
            .num_args(1)
            .default_value(".")
            .help("Output location"),
    )
    .arg(
        Arg::new("parallel")
            .long("parallel")
            .num_args(1)
            .default_value("1")
            .value_parser(value_parser!(usize))
            .help("Number of threads scoring genomes"),
    )
    .arg(
        Arg::new("xlsx")
            .long("xlsx")
            .action(ArgAction::SetTrue)
            .help("Also write the presence table as xlsx"),
    )
}

/// Parsed options of a collect run.
pub struct CollectOpt {
    pub refs: String,
    pub genomes: Vec<GenomeEntry>,
    pub settings: Settings,
    pub workdir: String,
    pub outdir: String,
    pub prefix: String,
    pub parallel: usize,
    pub xlsx: bool,
}

impl CollectOpt {
    /// Validates inputs. Any failure here is fatal.
    pub fn from_args(args: &ArgMatches) -> anyhow::Result<Self> {
        let refs = args.get_one::<String>("refs.fa").unwrap().to_string();
        orthocat::libs::io::require_file(&refs, "Multi-FASTA")?;
        let genomes = read_genome_list(args.get_one::<String>("genome.lst").unwrap())?;

        let input = if args.get_flag("annotated") {
            InputKind::Annotated
        } else {
            InputKind::Raw
        };
        let reference = RefKind::detect(&refs)?;
        let settings = Settings::new(
            args.get_one::<u32>("identity").copied(),
            args.get_one::<u32>("coverage").copied(),
            input,
            reference,
        );
        log::info!(
            "{} references, identity >= {}, coverage >= {}",
            reference,
            settings.thresholds.identity,
            settings.thresholds.coverage
        );

        Ok(Self {
            refs,
            genomes,
            settings,
            workdir: args.get_one::<String>("workdir").unwrap().to_string(),
            outdir: args.get_one::<String>("outdir").unwrap().to_string(),
            prefix: args.get_one::<String>("prefix").unwrap().to_string(),
            parallel: *args.get_one::<usize>("parallel").unwrap(),
            xlsx: args.get_flag("xlsx"),
        })
    }

    pub fn out_path(&self, name: &str) -> String {
        Path::new(&self.outdir)
            .join(format!("{}{}", self.prefix, name))
            .display()
            .to_string()
    }

    pub fn fas_dir(&self) -> String {
        Path::new(&self.outdir).join("fas").display().to_string()
    }
}

/// Collected homologs and the FASTA file written for each gene.
pub struct Collected {
    pub set: OrthologSet,
    pub gene_fastas: Vec<(String, String)>,
}

pub fn run(opt: &CollectOpt) -> anyhow::Result<Collected> {
    std::fs::create_dir_all(&opt.outdir)?;

    let audit = AuditWriter::new(orthocat::writer(&opt.out_path("table.tsv"))?)?;
    let mut collector = Collector::new(audit);
    collect_genomes(
        &mut collector,
        &opt.settings,
        &opt.genomes,
        &opt.refs,
        &opt.workdir,
        opt.parallel,
    )?;
    let set = collector.finish()?;

    let matrix = PresenceMatrix::build(&set, &sorted_genome_names(&opt.genomes));
    for (genome, total) in matrix.genomes.iter().zip(matrix.column_totals()) {
        log::debug!("{}: {} of {} genes", genome, total, matrix.rows.len());
    }
    let mut writer = orthocat::writer(&opt.out_path("presence.tsv"))?;
    write_presence(&mut writer, &matrix)?;
    writer.flush()?;
    if opt.xlsx {
        write_presence_xlsx(&opt.out_path("presence.xlsx"), &matrix)?;
    }

    let gene_fastas = write_gene_fastas(&set, &opt.fas_dir(), &opt.prefix)?;
    log::info!("{} genes with homologs", set.len());

    Ok(Collected { set, gene_fastas })
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let opt = CollectOpt::from_args(args)?;

    if opt.settings.input == InputKind::Annotated {
        for genome in &opt.genomes {
            let cds = genome.cds_fasta(&opt.workdir, opt.settings.reference);
            orthocat::libs::io::require_file(&cds, "Extracted coding sequences")?;
        }
    }

    //----------------------------
    // Ops
    //----------------------------
    run(&opt)?;

    Ok(())
}
