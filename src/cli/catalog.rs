use clap::{Args, Subcommand};

use crate::catalog::store::ResourceCatalog;
use crate::cli::OutputFormat;
use crate::core::resource::ResourceDescriptor;
use crate::core::types::Topic;

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List all (build, topic) bundles in the catalog
    List {
        /// Filter by build (e.g., "hg38")
        #[arg(long)]
        build: Option<String>,

        /// Filter by topic
        #[arg(long, value_enum)]
        topic: Option<Topic>,
    },

    /// Show the files of one bundle
    Show {
        /// Build name (e.g., "hg19", or "idmap")
        #[arg(required = true)]
        build: String,

        /// Topic
        #[arg(required = true, value_enum)]
        topic: Topic,
    },
}

pub fn run(args: CatalogArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let catalog = ResourceCatalog::builtin();

    if verbose {
        eprintln!(
            "Loaded catalog with {} bundles (annotation root {})",
            catalog.len(),
            catalog.root()
        );
    }

    match args.command {
        CatalogCommands::List { build, topic } => run_list(&catalog, build.as_deref(), topic, format),
        CatalogCommands::Show { build, topic } => run_show(&catalog, &build, topic, format),
    }
}

fn run_list(
    catalog: &ResourceCatalog,
    build_filter: Option<&str>,
    topic_filter: Option<Topic>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let filtered: Vec<_> = catalog
        .iter()
        .filter(|(build, topic, _)| {
            build_filter.map_or(true, |b| b == *build) && topic_filter.map_or(true, |t| t == *topic)
        })
        .collect();

    match format {
        OutputFormat::Text => {
            let build_width = filtered
                .iter()
                .map(|(b, _, _)| b.len())
                .max()
                .unwrap_or(5)
                .max(5);

            println!("Resource Catalog ({} bundles)\n", filtered.len());
            println!(
                "{:<bw$} {:<9} {:>5} {:>6}",
                "Build",
                "Topic",
                "Files",
                "Keyed",
                bw = build_width
            );
            println!("{}", "-".repeat(build_width + 23));
            for (build, topic, resources) in &filtered {
                println!(
                    "{:<bw$} {:<9} {:>5} {:>6}",
                    build,
                    topic.as_str(),
                    resources.len(),
                    keyed_count(resources),
                    bw = build_width
                );
            }
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = filtered
                .iter()
                .map(|(build, topic, resources)| {
                    serde_json::json!({
                        "build": build,
                        "topic": topic,
                        "file_count": resources.len(),
                        "keys": resources.iter().filter_map(|r| r.key.as_deref()).collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("build\ttopic\tfile_count\tkeyed_count");
            for (build, topic, resources) in &filtered {
                println!(
                    "{}\t{}\t{}\t{}",
                    build,
                    topic,
                    resources.len(),
                    keyed_count(resources)
                );
            }
        }
    }

    Ok(())
}

fn run_show(
    catalog: &ResourceCatalog,
    build: &str,
    topic: Topic,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let resources = catalog.lookup(build, topic)?;

    match format {
        OutputFormat::Text => {
            println!("Bundle: {build} / {topic}\n");
            println!("{:<16} {:<15} {:<50} URL", "Key", "Class", "File");
            println!("{}", "-".repeat(100));
            for r in resources {
                println!(
                    "{:<16} {:<15} {:<50} {}",
                    r.key.as_deref().unwrap_or("-"),
                    r.class.to_string(),
                    truncate(&r.filename, 50),
                    r.url
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&resources)?);
        }
        OutputFormat::Tsv => {
            println!("key\tfilename\tclass\turl");
            for r in resources {
                println!(
                    "{}\t{}\t{}\t{}",
                    r.key.as_deref().unwrap_or(""),
                    r.filename,
                    r.class,
                    r.url
                );
            }
        }
    }

    Ok(())
}

fn keyed_count(resources: &[ResourceDescriptor]) -> usize {
    resources.iter().filter(|r| r.key.is_some()).count()
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
