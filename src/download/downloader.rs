use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::resource::ResourceDescriptor;
use crate::core::types::ResourceClass;
use crate::download::transport::{AgentTransport, HttpTransport, Transport, TransportError};

/// Both transports failed for one URL
#[derive(Debug)]
pub struct FetchFailure {
    pub url: String,
    pub primary: TransportError,
    pub secondary: TransportError,
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}; fallback: {})",
            self.url, self.primary, self.secondary
        )
    }
}

/// Result of fetching one catalog resource, after failure classification
#[derive(Debug)]
pub enum FetchOutcome {
    /// The file is on disk
    Fetched { path: PathBuf, bytes: u64 },
    /// Optional file missing; nothing to report
    Skipped { failure: FetchFailure },
    /// Optional file missing; worth a warning but not a failed batch
    Missing { failure: FetchFailure },
    /// Required file missing
    Failed { failure: FetchFailure },
}

impl FetchOutcome {
    #[must_use]
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched { .. })
    }
}

/// Fetches single files, falling back to a second transport on any failure
pub struct Downloader {
    primary: Box<dyn Transport>,
    secondary: Box<dyn Transport>,
}

impl Downloader {
    pub fn new(primary: Box<dyn Transport>, secondary: Box<dyn Transport>) -> Self {
        Self { primary, secondary }
    }

    /// `reqwest` first, `ureq` as fallback
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Http` if the HTTP client cannot be built.
    pub fn http() -> Result<Self, TransportError> {
        Ok(Self::new(
            Box::new(HttpTransport::new()?),
            Box::new(AgentTransport::new()),
        ))
    }

    /// Fetch `url` into `dest`, trying the secondary transport only if the primary fails.
    ///
    /// Both transports write to `<dest>.part`, which replaces `dest` only after
    /// a transfer succeeds. A failed fetch leaves an existing `dest` untouched.
    ///
    /// # Errors
    ///
    /// Returns a `FetchFailure` holding both transport errors.
    pub fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchFailure> {
        let part = part_path(dest);

        let primary = match attempt(self.primary.as_ref(), url, &part, dest) {
            Ok(bytes) => return Ok(bytes),
            Err(e) => {
                debug!("{} transport failed for {url}: {e}", self.primary.name());
                e
            }
        };

        match attempt(self.secondary.as_ref(), url, &part, dest) {
            Ok(bytes) => Ok(bytes),
            Err(secondary) => {
                debug!("{} transport failed for {url}: {secondary}", self.secondary.name());
                discard(&part);
                Err(FetchFailure {
                    url: url.to_string(),
                    primary,
                    secondary,
                })
            }
        }
    }

    /// Fetch one catalog resource into `dir` and classify the result by its resource class
    pub fn fetch_resource(&self, resource: &ResourceDescriptor, dir: &Path) -> FetchOutcome {
        let path = dir.join(&resource.filename);

        match self.fetch(&resource.url, &path) {
            Ok(bytes) => {
                #[allow(clippy::cast_precision_loss)]
                let mb = bytes as f64 / 1_000_000.0;
                info!("{} done ({mb:.1} MB)", resource.filename);
                FetchOutcome::Fetched { path, bytes }
            }
            Err(failure) => match resource.class {
                ResourceClass::OptionalSilent => FetchOutcome::Skipped { failure },
                ResourceClass::OptionalWarn => FetchOutcome::Missing { failure },
                ResourceClass::Required => FetchOutcome::Failed { failure },
            },
        }
    }
}

/// One transfer into `part`, moved onto `dest` once complete
fn attempt(transport: &dyn Transport, url: &str, part: &Path, dest: &Path) -> Result<u64, TransportError> {
    let bytes = transport.fetch(url, part)?;
    std::fs::rename(part, dest)?;
    Ok(bytes)
}

/// `<dest>.part`
fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

fn discard(part: &Path) {
    if part.exists() {
        if let Err(e) = std::fs::remove_file(part) {
            debug!("could not remove {}: {e}", part.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use tempfile::TempDir;

    struct Fake {
        succeed: bool,
        calls: Rc<Cell<usize>>,
    }

    impl Transport for Fake {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn fetch(&self, _url: &str, dest: &Path) -> Result<u64, TransportError> {
            self.calls.set(self.calls.get() + 1);
            std::fs::write(dest, b"partial")?;
            if self.succeed {
                Ok(7)
            } else {
                Err(TransportError::Status(500))
            }
        }
    }

    fn downloader(primary_ok: bool, secondary_ok: bool) -> (Downloader, Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let p = Rc::new(Cell::new(0));
        let s = Rc::new(Cell::new(0));
        let d = Downloader::new(
            Box::new(Fake {
                succeed: primary_ok,
                calls: Rc::clone(&p),
            }),
            Box::new(Fake {
                succeed: secondary_ok,
                calls: Rc::clone(&s),
            }),
        );
        (d, p, s)
    }

    #[test]
    fn test_primary_success_skips_secondary() {
        let dir = TempDir::new().unwrap();
        let (d, p, s) = downloader(true, true);
        assert_eq!(d.fetch("https://h/x", &dir.path().join("x")).unwrap(), 7);
        assert_eq!((p.get(), s.get()), (1, 0));
    }

    #[test]
    fn test_secondary_used_after_primary_failure() {
        let dir = TempDir::new().unwrap();
        let (d, p, s) = downloader(false, true);
        assert!(d.fetch("https://h/x", &dir.path().join("x")).is_ok());
        assert_eq!((p.get(), s.get()), (1, 1));
    }

    #[test]
    fn test_total_failure_removes_partial_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("x");
        let (d, _, _) = downloader(false, false);
        let failure = d.fetch("https://h/x", &dest).unwrap_err();
        assert_eq!(failure.url, "https://h/x");
        assert!(!dest.exists());
        assert!(!dir.path().join("x.part").exists());
        assert!(failure.to_string().contains("HTTP 500"));
    }

    /// Fails before writing anything, like a refused connection
    struct Offline;

    impl Transport for Offline {
        fn name(&self) -> &'static str {
            "offline"
        }

        fn fetch(&self, _url: &str, _dest: &Path) -> Result<u64, TransportError> {
            Err(TransportError::Status(503))
        }
    }

    #[test]
    fn test_failed_refetch_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("hg19.fa");
        std::fs::write(&dest, ">chr1\nACGT\n").unwrap();

        let d = Downloader::new(Box::new(Offline), Box::new(Offline));
        assert!(d.fetch("https://h/hg19.fa", &dest).is_err());
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), ">chr1\nACGT\n");

        // a partial transfer does not clobber it either
        let (d, _, _) = downloader(false, false);
        assert!(d.fetch("https://h/hg19.fa", &dest).is_err());
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), ">chr1\nACGT\n");
        assert!(!dir.path().join("hg19.fa.part").exists());
    }

    #[test]
    fn test_success_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("x");
        std::fs::write(&dest, "old").unwrap();
        let (d, _, _) = downloader(false, true);
        d.fetch("https://h/x", &dest).unwrap();
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "partial");
        assert!(!dir.path().join("x.part").exists());
    }

    #[test]
    fn test_fetch_resource_classification() {
        let dir = TempDir::new().unwrap();
        let (d, _, _) = downloader(false, false);

        let idmap = ResourceDescriptor::companion("a.HGNC.idmap_idx", "https://h/a.HGNC.idmap_idx");
        assert!(matches!(
            d.fetch_resource(&idmap, dir.path()),
            FetchOutcome::Skipped { .. }
        ));

        let alias = ResourceDescriptor::companion("a.alias_idx", "https://h/a.alias_idx");
        assert!(matches!(
            d.fetch_resource(&alias, dir.path()),
            FetchOutcome::Missing { .. }
        ));

        let fasta = ResourceDescriptor::keyed("reference", "hg19.fa", "https://h/hg19.fa");
        assert!(matches!(
            d.fetch_resource(&fasta, dir.path()),
            FetchOutcome::Failed { .. }
        ));
    }

    #[test]
    fn test_fetch_resource_success_path() {
        let dir = TempDir::new().unwrap();
        let (d, _, _) = downloader(true, false);
        let fasta = ResourceDescriptor::keyed("reference", "hg19.fa", "https://h/hg19.fa");
        match d.fetch_resource(&fasta, dir.path()) {
            FetchOutcome::Fetched { path, bytes } => {
                assert_eq!(path, dir.path().join("hg19.fa"));
                assert_eq!(bytes, 7);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
