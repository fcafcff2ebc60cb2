use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;
use tracing::{info, warn};

use crate::acquire::ensembl::{
    acquire_ensembl_live, EnsemblHttpIndex, LiveCollaborators, DEFAULT_ENSEMBL_RELEASE,
};
use crate::acquire::external::{FastaIndexer, NoodlesFaidx, SamtoolsFaidx, TransvarIndexer};
use crate::acquire::orchestrator::{
    ensure_reference, AcquisitionReport, Acquirer, ReferenceCheck, REFERENCE_GUIDANCE,
};
use crate::acquire::prompt::StdinPrompter;
use crate::catalog::store::ResourceCatalog;
use crate::cli::OutputFormat;
use crate::config::document::ConfigDocument;
use crate::config::store::{resolve_build, ConfigStore, SearchPaths};
use crate::config::summary::ConfigSummary;
use crate::core::types::{Topic, DEFAULT_BUILD_TOKEN, DEFAULT_SECTION, REFVERSION_KEY};
use crate::download::downloader::Downloader;

#[derive(Args)]
pub struct ConfigArgs {
    /// Option name to set
    #[arg(short = 'k', long = "key")]
    pub key: Option<String>,

    /// Option value to set
    #[arg(short = 'v', long = "value")]
    pub value: Option<String>,

    /// Genome build to operate on (DEFAULT: the configured active build)
    #[arg(long, default_value = DEFAULT_BUILD_TOKEN)]
    pub refversion: String,

    /// Make an already configured build the active one
    #[arg(long, alias = "switch_build")]
    pub switch_build: Option<String>,

    /// Download the reference genome
    #[arg(long, alias = "download_ref")]
    pub download_ref: bool,

    /// Download pre-built annotation databases
    #[arg(long, alias = "download_anno")]
    pub download_anno: bool,

    /// Download raw transcript tables
    #[arg(long, alias = "download_raw")]
    pub download_raw: bool,

    /// Download dbSNP
    #[arg(long, alias = "download_dbsnp")]
    pub download_dbsnp: bool,

    /// Download identifier mapping tables
    #[arg(long, alias = "download_idmap")]
    pub download_idmap: bool,

    /// Download genome and GTF from a live Ensembl release and index them
    #[arg(long, alias = "download_ensembl")]
    pub download_ensembl: bool,

    /// Ensembl release used by --download-ensembl
    #[arg(long, alias = "ensembl_release", default_value_t = DEFAULT_ENSEMBL_RELEASE)]
    pub ensembl_release: u32,

    /// Do not ask for a reference after downloading annotations
    #[arg(long, alias = "skip_reference")]
    pub skip_reference: bool,

    /// Index FASTA in-process instead of running samtools faidx
    #[arg(long, alias = "builtin_faidx")]
    pub builtin_faidx: bool,
}

impl ConfigArgs {
    /// The build named on the command line, if any
    fn explicit_build(&self) -> Option<&str> {
        (self.refversion != DEFAULT_BUILD_TOKEN).then_some(self.refversion.as_str())
    }

    fn downloads_anything(&self) -> bool {
        self.download_ref
            || self.download_anno
            || self.download_raw
            || self.download_dbsnp
            || self.download_idmap
            || self.download_ensembl
    }

    /// Re-record an explicit build as the active one
    fn record_explicit(&self, doc: &mut ConfigDocument) {
        if let Some(build) = self.explicit_build() {
            doc.set_refversion(build);
        }
    }
}

pub fn run(args: ConfigArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let paths = SearchPaths::from_env();
    let store = ConfigStore::from_search_paths(&paths);
    let mut doc = store.load()?;
    let mut altered = false;

    if verbose {
        eprintln!("Loaded configuration with {} options", doc.option_count());
    }

    if let (Some(key), Some(value)) = (&args.key, &args.value) {
        altered = true;
        let section = if key.eq_ignore_ascii_case(REFVERSION_KEY) {
            DEFAULT_SECTION.to_string()
        } else {
            resolve_build(args.explicit_build(), &doc)
        };
        doc.set(&section, key, value);
        args.record_explicit(&mut doc);
    }

    if let Some(build) = &args.switch_build {
        if !doc.has_section(build) {
            bail!(
                "Build {build} is not locally available. Consider\n$ transvar-config config --download-anno --refversion {build}"
            );
        }
        altered = true;
        doc.set_refversion(build);
    }

    if args.downloads_anything() {
        altered = true;
        run_downloads(&args, &paths, &mut doc)?;
    }

    if altered {
        store.persist(&mut doc);
    } else {
        print_summary(&doc, &paths, args.explicit_build(), format)?;
    }

    Ok(())
}

fn run_downloads(
    args: &ConfigArgs,
    paths: &SearchPaths,
    doc: &mut ConfigDocument,
) -> anyhow::Result<()> {
    let catalog = ResourceCatalog::builtin();
    let downloader = Downloader::http().context("Failed to set up the HTTP client")?;
    let acquirer = Acquirer::new(&catalog, &downloader, &paths.download_dirs);
    let explicit = args.explicit_build();

    let topics = [
        (args.download_ref, Topic::Reference),
        (args.download_anno, Topic::Anno),
    ];
    for (_, topic) in topics.iter().filter(|(wanted, _)| *wanted) {
        let report = acquirer.acquire(doc, explicit, *topic)?;
        log_report(&report);
        args.record_explicit(doc);
    }

    if args.download_anno && !args.skip_reference {
        let build = resolve_build(explicit, doc);
        if ensure_reference(doc, &build, &StdinPrompter)? == ReferenceCheck::Declined {
            println!("\n{REFERENCE_GUIDANCE}\n");
        }
    }

    if args.download_ensembl {
        let index = EnsemblHttpIndex::new().context("Failed to set up the Ensembl listing client")?;
        let fasta_indexer: Box<dyn FastaIndexer> = if args.builtin_faidx {
            Box::new(NoodlesFaidx)
        } else {
            Box::new(SamtoolsFaidx::default())
        };
        let annotation_indexer = TransvarIndexer::default();
        let tools = LiveCollaborators {
            index: &index,
            prompter: &StdinPrompter,
            fasta_indexer: fasta_indexer.as_ref(),
            annotation_indexer: &annotation_indexer,
        };

        let live = acquire_ensembl_live(&acquirer, doc, explicit, args.ensembl_release, &tools)?;
        info!(
            "Configured {}: reference {}, ensembl {}",
            live.species,
            live.reference.display(),
            live.annotation.display()
        );
        args.record_explicit(doc);
    }

    let topics = [
        (args.download_raw, Topic::Raw),
        (args.download_dbsnp, Topic::Dbsnp),
    ];
    for (_, topic) in topics.iter().filter(|(wanted, _)| *wanted) {
        let report = acquirer.acquire(doc, explicit, *topic)?;
        log_report(&report);
        args.record_explicit(doc);
    }

    if args.download_idmap {
        let report = acquirer.acquire_idmap(doc)?;
        log_report(&report);
        args.record_explicit(doc);
    }

    Ok(())
}

fn log_report(report: &AcquisitionReport) {
    if report.success {
        info!(
            "{}: {} of {} files downloaded to {}",
            report.section,
            report.fetched.len(),
            report.attempted,
            report.directory.display()
        );
    } else {
        warn!(
            "{}: {} of {} files downloaded to {}, some required files are missing",
            report.section,
            report.fetched.len(),
            report.attempted,
            report.directory.display()
        );
    }
}

fn print_summary(
    doc: &ConfigDocument,
    paths: &SearchPaths,
    explicit: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let summary = ConfigSummary::collect(doc, paths, explicit)?;

    match format {
        OutputFormat::Text => print_summary_text(&summary),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Tsv => {
            println!("build\tkey\tvalue");
            if let Some(reference) = &summary.reference {
                println!("{}\treference\t{reference}", summary.build);
            }
            for db in &summary.databases {
                println!("{}\t{}\t{}", summary.build, db.key, db.value);
            }
        }
    }

    Ok(())
}

fn print_summary_text(summary: &ConfigSummary) {
    let list = |title: &str, items: &[PathBuf]| {
        println!("{title}");
        for item in items {
            println!(" - {}", item.display());
        }
        println!();
    };
    list("Configuration files to search:", &summary.config_files);
    list("Download path:", &summary.download_dirs);

    println!("Reference version: {}", summary.build);
    if !summary.configured {
        println!("There is no reference and database set for {}.", summary.build);
        return;
    }

    if let Some(reference) = &summary.reference {
        println!("Reference: {reference}");
    }
    println!();

    println!("Available databases: ");
    for db in &summary.databases {
        println!(" - {}: {}", db.key, db.value);
        for idmap in &db.idmaps {
            println!("     [idmap] {} - {}", idmap.namespace, idmap.path.display());
        }
    }
}
