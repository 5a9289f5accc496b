use clap::*;
use cmd_lib::*;
use orthocat::libs::io::is_cached;
use orthocat::libs::msa::{read_alignment, write_alignment_files, write_phylip};
use orthocat::libs::settings::{InputKind, RefKind};
use std::fs;
use std::io::Write;
use std::path::Path;

use super::collect::{add_collect_args, CollectOpt};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    add_collect_args(
        Command::new("pl")
            .about("Pipeline - reference genes to concatenated alignments")
            .after_help(
                r###"
* Steps
    * makeblastdb on <refs.fa>
    * one search per genome into <workdir>, skipped when the result exists and is not empty
        * raw genomes: blastn (nucleotide refs) or blastx (protein refs)
        * --annotated: blastn or blastp with <workdir>/<genome name>.fna|.faa as query
    * collect: audit table, presence table, fas/<prefix><gene>.fas
    * with --concat, --snps, --xmfa or --tree: muscle per gene into aln/, PHYLIP copies in phy/
    * --xmfa: <prefix>all.xmfa
    * --concat: <prefix>all.phy and <prefix>all.aln
    * --snps N: <prefix>allsnp.phy and <prefix>allsnp.aln from the concatenation
    * --tree: phyml on the concatenation, or on every gene without --concat

* Coding sequences of annotated genomes must be extracted beforehand.

* --force reruns searches and alignments even when cached.

* This pipeline depends on `makeblastdb`, `blastn`/`blastx`/`blastp`, `muscle` and,
  for --tree, `phyml`

Examples:
1. Presence table and per-gene homologs only:
   orthocat pl refs.fna genome.lst

2. Concatenated alignment of all genes, SNP columns and trees:
   orthocat pl refs.fna genome.lst --concat --snps 1 --tree -o results

"###,
            ),
    )
    .arg(
        Arg::new("evalue")
            .long("evalue")
            .short('e')
            .num_args(1)
            .default_value("0.00005")
            .help("E-value cutoff passed to the search"),
    )
    .arg(
        Arg::new("concat")
            .long("concat")
            .short('c')
            .action(ArgAction::SetTrue)
            .help("Concatenate gene alignments"),
    )
    .arg(
        Arg::new("snps")
            .long("snps")
            .short('n')
            .num_args(1)
            .value_parser(value_parser!(usize))
            .help("Minimum number of differing rows of a kept column; implies --concat"),
    )
    .arg(
        Arg::new("xmfa")
            .long("xmfa")
            .short('x')
            .action(ArgAction::SetTrue)
            .help("Write gene alignments as XMFA"),
    )
    .arg(
        Arg::new("tree")
            .long("tree")
            .short('t')
            .action(ArgAction::SetTrue)
            .help("Build trees with PhyML"),
    )
    .arg(
        Arg::new("force")
            .long("force")
            .short('w')
            .action(ArgAction::SetTrue)
            .help("Overwrite cached search results and alignments"),
    )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let opt = CollectOpt::from_args(args)?;
    let evalue = args.get_one::<String>("evalue").unwrap().to_string();
    let snps = args.get_one::<usize>("snps").copied();
    let is_concat = args.get_flag("concat") || snps.is_some();
    let is_xmfa = args.get_flag("xmfa");
    let is_tree = args.get_flag("tree");
    let is_force = args.get_flag("force");
    let is_align = is_concat || is_xmfa || is_tree;

    let reference = opt.settings.reference;
    let program = match (opt.settings.input, reference) {
        (_, RefKind::Nucleotide) => "blastn",
        (InputKind::Raw, RefKind::Protein) => "blastx",
        (InputKind::Annotated, RefKind::Protein) => "blastp",
    };

    let mut tools = vec!["makeblastdb", program];
    if is_align {
        tools.push("muscle");
    }
    if is_tree {
        tools.push("phyml");
    }
    for tool in tools {
        if which::which(tool).is_err() {
            anyhow::bail!("{} not found in PATH. Please install it first.", tool);
        }
    }

    // query file of each genome
    let mut queries = vec![];
    for genome in &opt.genomes {
        let query = match opt.settings.input {
            InputKind::Raw => genome.path.clone(),
            InputKind::Annotated => genome.cds_fasta(&opt.workdir, reference),
        };
        orthocat::libs::io::require_file(&query, "Genome")?;
        queries.push(query);
    }

    fs::create_dir_all(&opt.workdir)?;
    fs::create_dir_all(&opt.outdir)?;

    let refs = &opt.refs;
    let dbtype = reference.dbtype();

    //----------------------------
    // Search
    //----------------------------
    run_cmd!(echo "==> makeblastdb")?;
    run_cmd!(makeblastdb -in ${refs} -dbtype ${dbtype} > /dev/null)?;

    run_cmd!(echo "==> ${program}")?;
    for (genome, query) in opt.genomes.iter().zip(&queries) {
        let result = genome.search_result(&opt.workdir, refs, reference);
        if is_cached(&result) && !is_force {
            log::info!("{} is cached", result);
            continue;
        }
        log::info!("searching {}", genome.path);
        match program {
            "blastn" => run_cmd!(
                blastn -task blastn -dust no -query ${query} -db ${refs}
                    -evalue ${evalue} -outfmt 5 -out ${result}
            )?,
            "blastx" => run_cmd!(
                blastx -seg no -query ${query} -db ${refs}
                    -evalue ${evalue} -outfmt 5 -out ${result}
            )?,
            _ => run_cmd!(
                blastp -seg no -query ${query} -db ${refs}
                    -evalue ${evalue} -outfmt 5 -out ${result}
            )?,
        }
    }

    //----------------------------
    // Collect
    //----------------------------
    run_cmd!(echo "==> collect")?;
    let collected = super::collect::run(&opt)?;

    if !is_align {
        return Ok(());
    }

    //----------------------------
    // Align
    //----------------------------
    run_cmd!(echo "==> muscle")?;
    let aln_dir = Path::new(&opt.outdir).join("aln");
    let phy_dir = Path::new(&opt.outdir).join("phy");
    fs::create_dir_all(&aln_dir)?;
    fs::create_dir_all(&phy_dir)?;

    // gene file name => alignment path
    let mut alignments: Vec<(String, String)> = vec![];
    for (_, fas) in &collected.gene_fastas {
        let name = orthocat::libs::seq::file_name(fas);
        let aln = aln_dir.join(format!("{}.aln", name)).display().to_string();
        let phy = phy_dir.join(format!("{}.phy", name)).display().to_string();

        if !is_cached(&aln) || is_force {
            if let Err(e) = run_cmd!(muscle -in ${fas} -out ${aln} -clw -quiet) {
                log::warn!("muscle failed on {}: {}", fas, e);
                continue;
            }
        }

        match read_alignment(&aln) {
            Ok(alignment) => {
                let mut writer = orthocat::writer(&phy)?;
                write_phylip(&mut writer, &alignment)?;
                writer.flush()?;
            }
            Err(e) => {
                log::warn!("{}", e);
                continue;
            }
        }

        if is_tree && !is_concat {
            phyml(&phy, reference);
        }
        alignments.push((name, aln));
    }

    if is_xmfa {
        run_cmd!(echo "==> xmfa")?;
        let mut writer = orthocat::writer(&opt.out_path("all.xmfa"))?;
        super::xmfa::write_xmfa(&mut writer, &alignments)?;
        writer.flush()?;
    }

    //----------------------------
    // Concatenate
    //----------------------------
    if is_concat {
        run_cmd!(echo "==> concat")?;
        let aln = orthocat::libs::concat::concat_files(&alignments, opt.genomes.len())?;
        let all = opt.out_path("all");
        write_alignment_files(&all, &aln, false)?;
        if is_tree {
            phyml(&format!("{}.phy", all), reference);
        }

        if let Some(min) = snps {
            run_cmd!(echo "==> snp")?;
            let snp = opt.out_path("allsnp");
            let kept = super::snp::write_variable_sites(&aln, min, &snp, false)?;
            if kept > 0 && is_tree {
                phyml(&format!("{}.phy", snp), reference);
            }
        }
    }

    Ok(())
}

/// A failed tree only costs that tree.
fn phyml(phy: &str, reference: RefKind) {
    let datatype = match reference {
        RefKind::Nucleotide => "nt",
        RefKind::Protein => "aa",
    };
    if let Err(e) = run_cmd!(phyml -i ${phy} -d ${datatype} -a e -b 10 > /dev/null) {
        log::warn!("phyml failed on {}: {}", phy, e);
    }
}
