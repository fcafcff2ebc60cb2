//! Live acquisition of a genome and gene annotation from the Ensembl release tree.

use std::path::PathBuf;

use tracing::info;

use crate::acquire::external::{gunzip, AnnotationIndexer, FastaIndexer};
use crate::acquire::orchestrator::{AcquireError, Acquirer};
use crate::acquire::prompt::Prompter;
use crate::config::document::ConfigDocument;
use crate::core::resource::ResourceDescriptor;
use crate::core::types::DEFAULT_BUILD_TOKEN;
use crate::download::transport::TransportError;
use crate::utils::paths::remote_basename;

/// Ensembl file host
pub const ENSEMBL_HOST: &str = "https://ftp.ensembl.org";

/// Release used when none is given
pub const DEFAULT_ENSEMBL_RELEASE: u32 = 95;

/// Species offered first in the interactive choice
pub const DEFAULT_SPECIES: &str = "homo_sapiens";

const GENOME_SUFFIX: &str = "dna.toplevel.fa.gz";
const ANNOTATION_SUFFIX: &str = "gtf.gz";

/// Directory listing of a remote file tree
pub trait RemoteIndex {
    /// Entry names (no leading path) directly under `dir`
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` if the listing cannot be fetched.
    fn list(&self, dir: &str) -> Result<Vec<String>, TransportError>;

    /// Download URL of `dir/name`
    fn url(&self, dir: &str, name: &str) -> String;
}

/// Lists directories of the Ensembl HTTPS mirror by scraping its index pages
pub struct EnsemblHttpIndex {
    client: reqwest::blocking::Client,
    base: String,
}

impl EnsemblHttpIndex {
    /// # Errors
    ///
    /// Returns `TransportError::Http` if the HTTP client cannot be built.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_base(ENSEMBL_HOST)
    }

    /// # Errors
    ///
    /// Returns `TransportError::Http` if the HTTP client cannot be built.
    pub fn with_base(base: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self {
            client,
            base: base.into().trim_end_matches('/').to_string(),
        })
    }
}

impl RemoteIndex for EnsemblHttpIndex {
    fn list(&self, dir: &str) -> Result<Vec<String>, TransportError> {
        let url = format!("{}/{}/", self.base, dir.trim_matches('/'));
        let response = self.client.get(&url).send()?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(TransportError::NotFound);
        }
        let html = response.error_for_status()?.text()?;
        Ok(parse_listing(&html))
    }

    fn url(&self, dir: &str, name: &str) -> String {
        format!("{}/{}/{name}", self.base, dir.trim_matches('/'))
    }
}

/// Extract entry names from an HTML directory index.
///
/// Parent links, sort links and absolute links are skipped; a trailing `/`
/// on subdirectory names is dropped.
#[must_use]
pub fn parse_listing(html: &str) -> Vec<String> {
    let mut names = Vec::new();

    for chunk in html.split("href=\"").skip(1) {
        let Some((target, _)) = chunk.split_once('"') else {
            continue;
        };
        if target.is_empty()
            || target.starts_with("..")
            || target.starts_with('?')
            || target.starts_with('/')
            || target.contains("://")
        {
            continue;
        }
        let name = target.trim_end_matches('/');
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }

    names
}

/// Injected collaborators of [`acquire_ensembl_live`]
pub struct LiveCollaborators<'a> {
    pub index: &'a dyn RemoteIndex,
    pub prompter: &'a dyn Prompter,
    pub fasta_indexer: &'a dyn FastaIndexer,
    pub annotation_indexer: &'a dyn AnnotationIndexer,
}

/// What a live acquisition produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsemblAcquisition {
    pub species: String,
    /// Decompressed, indexed genome
    pub reference: PathBuf,
    /// Indexed annotation database
    pub annotation: PathBuf,
}

/// Fetch the genome and GTF of one species from an Ensembl release, index both,
/// and bind them as `reference` and `ensembl` in the species' section.
///
/// Without an explicit build (or with the `DEFAULT` token) the operator picks
/// a species from the release's GTF directory. The species becomes
/// `DEFAULT.refversion`.
///
/// # Errors
///
/// Listing shapes other than exactly one genome and one annotation archive
/// are `AcquireError::Assertion`; a bad species choice is
/// `AcquireError::InvalidInput`; any download or indexing failure is fatal.
pub fn acquire_ensembl_live(
    acquirer: &Acquirer<'_>,
    doc: &mut ConfigDocument,
    explicit_build: Option<&str>,
    release: u32,
    tools: &LiveCollaborators<'_>,
) -> Result<EnsemblAcquisition, AcquireError> {
    let root = format!("pub/release-{release}");

    let species = match explicit_build {
        Some(build) if build != DEFAULT_BUILD_TOKEN => build.to_string(),
        _ => choose_species(tools, &format!("{root}/gtf"))?,
    };
    let lowered = species.to_lowercase();
    info!("Preparing genome and annotation for {species} (Ensembl release {release})");

    let genome_dir = format!("{root}/fasta/{lowered}/dna");
    let genome = single_match(tools.index, &genome_dir, GENOME_SUFFIX)?;
    let genome_archive = fetch_one(acquirer, doc, &species, tools.index, &genome_dir, &genome)?;

    let gtf_dir = format!("{root}/gtf/{lowered}");
    let gtf = single_match(tools.index, &gtf_dir, ANNOTATION_SUFFIX)?;
    let gtf_archive = fetch_one(acquirer, doc, &species, tools.index, &gtf_dir, &gtf)?;

    let reference = gunzip(&genome_archive)?;
    tools.fasta_indexer.index(&reference)?;
    doc.set(&species, "reference", &reference.to_string_lossy());

    info!("Indexing GTF");
    let annotation = tools.annotation_indexer.index(&[gtf_archive])?;
    doc.set(&species, "ensembl", &annotation.to_string_lossy());

    doc.set_refversion(&species);

    Ok(EnsemblAcquisition {
        species,
        reference,
        annotation,
    })
}

fn choose_species(tools: &LiveCollaborators<'_>, gtf_root: &str) -> Result<String, AcquireError> {
    let species: Vec<String> = list(tools.index, gtf_root)?
        .iter()
        .map(|entry| remote_basename(entry).to_string())
        .collect();
    if species.is_empty() {
        return Err(AcquireError::Assertion(format!("no species listed under {gtf_root}")));
    }

    for (i, name) in species.iter().enumerate() {
        eprintln!("[{i}] {name}");
    }
    let default = species.iter().position(|s| s == DEFAULT_SPECIES).unwrap_or(0);

    let answer = tools
        .prompter
        .ask(&format!("Please choose your target taxon [{default}]: "))?;
    let answer = answer.trim();
    let choice = if answer.is_empty() {
        default
    } else {
        answer
            .parse::<usize>()
            .map_err(|_| AcquireError::InvalidInput(format!("Invalid choice: {answer}")))?
    };

    let Some(picked) = species.get(choice) else {
        return Err(AcquireError::InvalidInput(format!("Invalid choice: {choice}")));
    };
    info!("Preparing genomes and annotations for [{choice}] {picked}");
    Ok(picked.clone())
}

fn list(index: &dyn RemoteIndex, dir: &str) -> Result<Vec<String>, AcquireError> {
    index.list(dir).map_err(|source| AcquireError::Listing {
        dir: dir.to_string(),
        source,
    })
}

fn single_match(index: &dyn RemoteIndex, dir: &str, suffix: &str) -> Result<String, AcquireError> {
    let matches: Vec<String> = list(index, dir)?
        .into_iter()
        .filter(|name| name.ends_with(suffix))
        .collect();

    match matches.as_slice() {
        [one] => Ok(remote_basename(one).to_string()),
        _ => Err(AcquireError::Assertion(format!(
            "expected exactly one *{suffix} under {dir}, found {}",
            matches.len()
        ))),
    }
}

fn fetch_one(
    acquirer: &Acquirer<'_>,
    doc: &mut ConfigDocument,
    species: &str,
    index: &dyn RemoteIndex,
    dir: &str,
    name: &str,
) -> Result<PathBuf, AcquireError> {
    let url = index.url(dir, name);
    let resource = ResourceDescriptor::companion(name, url.clone());
    let report = acquirer.download_into(doc, species, std::slice::from_ref(&resource))?;

    match report.fetched.into_iter().next() {
        Some(path) if report.success => Ok(path),
        _ => Err(AcquireError::Download(url)),
    }
}
