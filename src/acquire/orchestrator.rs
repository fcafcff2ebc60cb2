use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::acquire::external::ExternalError;
use crate::acquire::prompt::Prompter;
use crate::catalog::store::{CatalogError, ResourceCatalog};
use crate::config::document::ConfigDocument;
use crate::config::store::resolve_build;
use crate::core::resource::ResourceDescriptor;
use crate::core::types::{Topic, IDMAP_SECTION};
use crate::download::downloader::{Downloader, FetchOutcome};
use crate::download::transport::TransportError;
use crate::utils::paths::expand_tilde;

#[derive(Error, Debug)]
pub enum AcquireError {
    #[error(transparent)]
    NotFound(#[from] CatalogError),

    #[error("cannot create any download directory (tried {})", display_paths(.attempted))]
    Directory { attempted: Vec<PathBuf> },

    #[error("unexpected remote listing: {0}")]
    Assertion(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("failed to list {dir}: {source}")]
    Listing {
        dir: String,
        #[source]
        source: TransportError,
    },

    #[error("could not download {0}")]
    Download(String),

    #[error(transparent)]
    External(#[from] ExternalError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// What one batch of downloads achieved
#[derive(Debug, Clone, Serialize)]
pub struct AcquisitionReport {
    /// Section the keyed resources were bound into
    pub section: String,
    pub directory: PathBuf,
    /// Number of resources attempted
    pub attempted: usize,
    pub fetched: Vec<PathBuf>,
    /// (key, path) pairs bound into the section
    pub bound: Vec<(String, String)>,
    pub warnings: Vec<String>,
    /// False once a required resource could not be fetched
    pub success: bool,
}

impl AcquisitionReport {
    fn new(section: &str, directory: &Path) -> Self {
        Self {
            section: section.to_string(),
            directory: directory.to_path_buf(),
            attempted: 0,
            fetched: Vec::new(),
            bound: Vec::new(),
            warnings: Vec::new(),
            success: true,
        }
    }
}

/// Drives catalog lookups and downloads, recording results in a document.
///
/// The acquirer never persists the document; callers batch several
/// acquisitions into one write.
pub struct Acquirer<'a> {
    catalog: &'a ResourceCatalog,
    downloader: &'a Downloader,
    download_dirs: &'a [PathBuf],
}

impl<'a> Acquirer<'a> {
    pub fn new(
        catalog: &'a ResourceCatalog,
        downloader: &'a Downloader,
        download_dirs: &'a [PathBuf],
    ) -> Self {
        Self {
            catalog,
            downloader,
            download_dirs,
        }
    }

    /// Download a (build, topic) bundle and bind its keyed files into the build's section.
    ///
    /// The resolved build becomes `DEFAULT.refversion`.
    ///
    /// # Errors
    ///
    /// Returns `AcquireError::NotFound` if the catalog has no such bundle, or
    /// `AcquireError::Directory` if no download directory is usable.
    /// Individual file failures are reported in the returned report instead.
    pub fn acquire(
        &self,
        doc: &mut ConfigDocument,
        explicit_build: Option<&str>,
        topic: Topic,
    ) -> Result<AcquisitionReport, AcquireError> {
        let build = resolve_build(explicit_build, doc);
        let resources = self.catalog.lookup(&build, topic)?;
        info!("Acquiring {topic} for {build} ({} files)", resources.len());

        doc.set_refversion(&build);
        self.download_into(doc, &build, resources)
    }

    /// Download the build-independent identifier mappings into the `idmap` section
    ///
    /// # Errors
    ///
    /// Same as [`acquire`](Self::acquire).
    pub fn acquire_idmap(&self, doc: &mut ConfigDocument) -> Result<AcquisitionReport, AcquireError> {
        let resources = self.catalog.lookup(IDMAP_SECTION, Topic::Idmap)?;
        self.download_into(doc, IDMAP_SECTION, resources)
    }

    /// First candidate directory that exists or can be created
    ///
    /// # Errors
    ///
    /// Returns `AcquireError::Directory` if none is usable.
    pub fn select_download_dir(&self) -> Result<PathBuf, AcquireError> {
        for dir in self.download_dirs {
            if dir.is_dir() {
                return Ok(dir.clone());
            }
            if dir.exists() {
                debug!("{} exists but is not a directory", dir.display());
                continue;
            }
            match std::fs::create_dir_all(dir) {
                Ok(()) => return Ok(dir.clone()),
                Err(e) => debug!("Cannot create {}: {e}", dir.display()),
            }
        }

        Err(AcquireError::Directory {
            attempted: self.download_dirs.to_vec(),
        })
    }

    /// Fetch every resource into the selected directory, binding keyed ones into `section`.
    ///
    /// Once a directory is selected, all files of the batch go there; a
    /// failed file does not move on to the next candidate directory.
    ///
    /// # Errors
    ///
    /// Returns `AcquireError::Directory` if no download directory is usable.
    pub fn download_into(
        &self,
        doc: &mut ConfigDocument,
        section: &str,
        resources: &[ResourceDescriptor],
    ) -> Result<AcquisitionReport, AcquireError> {
        let dir = self.select_download_dir()?;
        let mut report = AcquisitionReport::new(section, &dir);

        for resource in resources {
            report.attempted += 1;
            match self.downloader.fetch_resource(resource, &dir) {
                FetchOutcome::Fetched { path, .. } => {
                    if let Some(key) = &resource.key {
                        let value = path.to_string_lossy().into_owned();
                        doc.set(section, key, &value);
                        report.bound.push((key.clone(), value));
                    }
                    report.fetched.push(path);
                }
                FetchOutcome::Skipped { failure } => {
                    debug!("Optional file not available: {failure}");
                }
                FetchOutcome::Missing { failure } => {
                    warn!("Optional file not available: {}", failure.url);
                    report
                        .warnings
                        .push(format!("optional file not available: {}", failure.url));
                }
                FetchOutcome::Failed { failure } => {
                    warn!(
                        "File not available: {} or target directory not found ({})",
                        failure.url,
                        dir.display()
                    );
                    debug!("{failure}");
                    report.warnings.push(format!(
                        "file not available: {} or target directory not found",
                        failure.url
                    ));
                    report.success = false;
                }
            }
        }

        Ok(report)
    }
}

/// Outcome of [`ensure_reference`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceCheck {
    /// The build already had a reference
    Present,
    /// The operator supplied one, now bound
    Bound(PathBuf),
    /// The operator declined
    Declined,
}

/// Guidance printed when no reference is configured
pub const REFERENCE_GUIDANCE: &str = "\
Need fa-indexed fasta of reference. You can either download reference through:
$ transvar-config config --download-ref
or specify through
$ transvar-config config -k reference -v [path_to_fa] --refversion [build_name]";

/// Make sure `build` has a `reference`, asking the operator for one if not.
///
/// # Errors
///
/// Returns `AcquireError::InvalidInput` if the supplied path does not exist.
pub fn ensure_reference(
    doc: &mut ConfigDocument,
    build: &str,
    prompter: &dyn Prompter,
) -> Result<ReferenceCheck, AcquireError> {
    if doc.has_section(build) && doc.has_option(build, "reference") {
        return Ok(ReferenceCheck::Present);
    }

    let answer = prompter.ask("Please specify fa-indexed fasta of reference (Enter to skip): ")?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(ReferenceCheck::Declined);
    }

    let path = expand_tilde(answer);
    if !path.exists() {
        return Err(AcquireError::InvalidInput(format!(
            "Path {} is non-existent.",
            path.display()
        )));
    }

    doc.set(build, "reference", &path.to_string_lossy());
    Ok(ReferenceCheck::Bound(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquire::prompt::ScriptedPrompter;
    use crate::download::transport::Transport;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Serves any URL whose file name is not listed as missing
    struct FakeTransport {
        missing: Vec<&'static str>,
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl Transport for FakeTransport {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn fetch(&self, url: &str, dest: &Path) -> Result<u64, TransportError> {
            self.calls.borrow_mut().push(url.to_string());
            if self.missing.iter().any(|m| url.ends_with(m)) {
                return Err(TransportError::NotFound);
            }
            std::fs::write(dest, url)?;
            Ok(url.len() as u64)
        }
    }

    fn downloader(missing: Vec<&'static str>) -> (Downloader, Rc<RefCell<Vec<String>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let d = Downloader::new(
            Box::new(FakeTransport {
                missing: missing.clone(),
                calls: Rc::clone(&calls),
            }),
            Box::new(FakeTransport {
                missing,
                calls: Rc::new(RefCell::new(Vec::new())),
            }),
        );
        (d, calls)
    }

    fn toy_catalog() -> ResourceCatalog {
        ResourceCatalog::from_entries(
            "https://ann.example.org/",
            vec![
                (
                    ("toy".to_string(), Topic::Reference),
                    vec![
                        ResourceDescriptor::keyed("reference", "toy.fa", "https://h/toy.fa"),
                        ResourceDescriptor::companion("toy.fa.fai", "https://h/toy.fa.fai"),
                    ],
                ),
                (
                    ("toy".to_string(), Topic::Raw),
                    vec![ResourceDescriptor::keyed(
                        "raw_refseq",
                        "toy.refseq.gff.gz",
                        "https://h/toy.refseq.gff.gz",
                    )],
                ),
                (
                    ("hg19".to_string(), Topic::Dbsnp),
                    vec![ResourceDescriptor::keyed("dbsnp", "d.vcf.gz", "https://h/d.vcf.gz")],
                ),
                (
                    (IDMAP_SECTION.to_string(), Topic::Idmap),
                    vec![ResourceDescriptor::keyed(
                        "uniprot",
                        "uniprot.idmap_idx",
                        "https://h/uniprot.idmap_idx",
                    )],
                ),
            ],
        )
    }

    #[test]
    fn test_acquire_binds_keyed_files_and_sets_refversion() {
        let dir = TempDir::new().unwrap();
        let dirs = vec![dir.path().join("dl")];
        let catalog = toy_catalog();
        let (d, calls) = downloader(vec![]);
        let acquirer = Acquirer::new(&catalog, &d, &dirs);

        let mut doc = ConfigDocument::new();
        let report = acquirer.acquire(&mut doc, Some("toy"), Topic::Reference).unwrap();

        assert!(report.success);
        assert_eq!(report.attempted, 2);
        assert_eq!(calls.borrow().len(), 2);
        assert_eq!(doc.refversion(), Some("toy"));
        let expected = dirs[0].join("toy.fa");
        assert_eq!(doc.get("toy", "reference"), Some(expected.to_str().unwrap()));
        assert_eq!(doc.options("toy").len(), 1);
        assert!(dirs[0].join("toy.fa.fai").exists());
    }

    #[test]
    fn test_acquire_uses_default_build() {
        let dir = TempDir::new().unwrap();
        let dirs = vec![dir.path().to_path_buf()];
        let catalog = toy_catalog();
        let (d, _) = downloader(vec![]);
        let acquirer = Acquirer::new(&catalog, &d, &dirs);

        let mut doc = ConfigDocument::new();
        let report = acquirer.acquire(&mut doc, None, Topic::Dbsnp).unwrap();
        assert_eq!(report.section, "hg19");
        assert_eq!(doc.refversion(), Some("hg19"));
    }

    #[test]
    fn test_acquire_unknown_pair_is_fatal_and_leaves_document() {
        let dir = TempDir::new().unwrap();
        let dirs = vec![dir.path().to_path_buf()];
        let catalog = toy_catalog();
        let (d, calls) = downloader(vec![]);
        let acquirer = Acquirer::new(&catalog, &d, &dirs);

        let mut doc = ConfigDocument::new();
        let err = acquirer.acquire(&mut doc, Some("toy"), Topic::Dbsnp).unwrap_err();
        assert!(matches!(err, AcquireError::NotFound(_)));
        assert!(doc.refversion().is_none());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_derived_anno_failures_by_class() {
        let dir = TempDir::new().unwrap();
        let dirs = vec![dir.path().to_path_buf()];
        let catalog = toy_catalog();
        // every idmap companion is missing upstream
        let (d, calls) = downloader(vec!["idmap_idx"]);
        let acquirer = Acquirer::new(&catalog, &d, &dirs);

        let mut doc = ConfigDocument::new();
        let report = acquirer.acquire(&mut doc, Some("toy"), Topic::Anno).unwrap();
        assert!(report.success);
        assert!(report.warnings.is_empty());
        assert_eq!(report.attempted, 9);
        assert_eq!(calls.borrow().len(), 9);
        assert_eq!(report.fetched.len(), 5);
        assert!(doc.get("toy", "refseq").unwrap().ends_with("toy.refseq.gff.gz.transvardb"));
    }

    #[test]
    fn test_required_failure_marks_batch_but_continues() {
        let dir = TempDir::new().unwrap();
        let dirs = vec![dir.path().to_path_buf()];
        let catalog = toy_catalog();
        let (d, calls) = downloader(vec!["toy.fa"]);
        let acquirer = Acquirer::new(&catalog, &d, &dirs);

        let mut doc = ConfigDocument::new();
        let report = acquirer.acquire(&mut doc, Some("toy"), Topic::Reference).unwrap();
        assert!(!report.success);
        assert_eq!(calls.borrow().len(), 2);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("https://h/toy.fa"));
        assert!(doc.get("toy", "reference").is_none());
        assert!(dirs[0].join("toy.fa.fai").exists());
    }

    #[test]
    fn test_acquire_idmap_binds_idmap_section() {
        let dir = TempDir::new().unwrap();
        let dirs = vec![dir.path().to_path_buf()];
        let catalog = toy_catalog();
        let (d, _) = downloader(vec![]);
        let acquirer = Acquirer::new(&catalog, &d, &dirs);

        let mut doc = ConfigDocument::new();
        let report = acquirer.acquire_idmap(&mut doc).unwrap();
        assert!(report.success);
        assert!(doc.get(IDMAP_SECTION, "uniprot").is_some());
        assert!(doc.refversion().is_none());
    }

    #[test]
    fn test_select_download_dir_falls_back() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let dirs = vec![
            blocker.join("cannot"),
            blocker.clone(),
            dir.path().join("second"),
            dir.path().join("third"),
        ];
        let catalog = toy_catalog();
        let (d, _) = downloader(vec![]);
        let acquirer = Acquirer::new(&catalog, &d, &dirs);

        assert_eq!(acquirer.select_download_dir().unwrap(), dirs[2]);
        assert!(!dirs[3].exists());
    }

    #[test]
    fn test_select_download_dir_none_usable() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let dirs = vec![blocker.join("a"), blocker.join("b")];
        let catalog = toy_catalog();
        let (d, calls) = downloader(vec![]);
        let acquirer = Acquirer::new(&catalog, &d, &dirs);

        let mut doc = ConfigDocument::new();
        let err = acquirer.acquire(&mut doc, Some("toy"), Topic::Reference).unwrap_err();
        assert!(matches!(err, AcquireError::Directory { attempted } if attempted.len() == 2));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_ensure_reference_present() {
        let mut doc = ConfigDocument::new();
        doc.set("hg19", "reference", "/r/hg19.fa");
        let prompter = ScriptedPrompter::new(Vec::<String>::new());
        assert_eq!(
            ensure_reference(&mut doc, "hg19", &prompter).unwrap(),
            ReferenceCheck::Present
        );
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn test_ensure_reference_declined() {
        let mut doc = ConfigDocument::new();
        let prompter = ScriptedPrompter::new([""]);
        assert_eq!(
            ensure_reference(&mut doc, "hg38", &prompter).unwrap(),
            ReferenceCheck::Declined
        );
        assert!(!doc.has_section("hg38"));
    }

    #[test]
    fn test_ensure_reference_binds_existing_path() {
        let dir = TempDir::new().unwrap();
        let fasta = dir.path().join("hg38.fa");
        std::fs::write(&fasta, ">chr1\nA\n").unwrap();

        let mut doc = ConfigDocument::new();
        let prompter = ScriptedPrompter::new([fasta.to_str().unwrap()]);
        assert_eq!(
            ensure_reference(&mut doc, "hg38", &prompter).unwrap(),
            ReferenceCheck::Bound(fasta.clone())
        );
        assert_eq!(doc.get("hg38", "reference"), Some(fasta.to_str().unwrap()));
    }

    #[test]
    fn test_ensure_reference_rejects_missing_path() {
        let mut doc = ConfigDocument::new();
        let prompter = ScriptedPrompter::new(["/definitely/not/here.fa"]);
        let err = ensure_reference(&mut doc, "hg38", &prompter).unwrap_err();
        assert!(matches!(err, AcquireError::InvalidInput(_)));
        assert!(err.to_string().contains("non-existent"));
    }
}
