use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::document::ConfigDocument;
use crate::core::types::{DEFAULT_BUILD, DEFAULT_BUILD_TOKEN, REFVERSION_KEY};
use crate::parsing::ini::{parse_ini_file, write_ini_text, ParseError};
use crate::utils::paths::{absolutize, expand_tilde};

/// Environment override for the first configuration file
pub const CONFIG_ENV: &str = "TRANSVAR_CFG";

/// Environment override for the first download directory
pub const DOWNLOAD_DIR_ENV: &str = "TRANSVAR_DOWNLOAD_DIR";

const PACKAGE_CONFIG_NAME: &str = "transvar.cfg";
const PACKAGE_DOWNLOAD_NAME: &str = "transvar.download";
const USER_CONFIG: &str = "~/.transvar.cfg";
const USER_DOWNLOAD: &str = "~/.transvar.download";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no writable configuration file among: {}", display_paths(.attempted))]
    NotWritable { attempted: Vec<PathBuf> },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ordered candidate locations for configuration files and download directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPaths {
    pub config_files: Vec<PathBuf>,
    pub download_dirs: Vec<PathBuf>,
}

impl SearchPaths {
    pub fn new(config_files: Vec<PathBuf>, download_dirs: Vec<PathBuf>) -> Self {
        Self {
            config_files,
            download_dirs,
        }
    }

    /// Environment override (or the package default next to the executable),
    /// then the user's home directory.
    #[must_use]
    pub fn from_env() -> Self {
        let package_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));

        let candidate = |var: &str, package_name: &str| match std::env::var(var) {
            Ok(value) if !value.is_empty() => expand_tilde(&value),
            _ => package_dir.join(package_name),
        };

        Self {
            config_files: vec![
                candidate(CONFIG_ENV, PACKAGE_CONFIG_NAME),
                expand_tilde(USER_CONFIG),
            ],
            download_dirs: vec![
                candidate(DOWNLOAD_DIR_ENV, PACKAGE_DOWNLOAD_NAME),
                expand_tilde(USER_DOWNLOAD),
            ],
        }
    }
}

/// Pick the active build: explicit argument, then `DEFAULT.refversion`, then the fixed default
#[must_use]
pub fn resolve_build(explicit: Option<&str>, doc: &ConfigDocument) -> String {
    match explicit {
        Some(build) if build != DEFAULT_BUILD_TOKEN => build.to_string(),
        _ => doc.refversion().unwrap_or(DEFAULT_BUILD).to_string(),
    }
}

/// Loads and persists the configuration document along a search path
#[derive(Debug, Clone)]
pub struct ConfigStore {
    files: Vec<PathBuf>,
}

impl ConfigStore {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    pub fn from_search_paths(paths: &SearchPaths) -> Self {
        Self::new(paths.config_files.clone())
    }

    /// Candidate files in search order
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Read the first existing file, with relative values made absolute.
    /// No existing file yields an empty document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the chosen file cannot be read or parsed.
    pub fn load(&self) -> Result<ConfigDocument, ConfigError> {
        let Some(path) = self.files.iter().find(|p| p.is_file()) else {
            debug!("No configuration file found, starting empty");
            return Ok(ConfigDocument::new());
        };

        debug!("Reading configuration from {}", path.display());
        let mut doc = parse_ini_file(path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let anchor = absolutize(path)?;
        resolve_relative_paths(&mut doc, &anchor);
        Ok(doc)
    }

    /// Write to the first location that accepts the write
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotWritable` listing every location tried.
    pub fn try_persist(&self, doc: &ConfigDocument) -> Result<PathBuf, ConfigError> {
        let text = write_ini_text(doc);

        for path in &self.files {
            match std::fs::write(path, &text) {
                Ok(()) => {
                    info!("Configuration written to {}", path.display());
                    return Ok(path.clone());
                }
                Err(e) => debug!("Cannot write {}: {e}", path.display()),
            }
        }

        Err(ConfigError::NotWritable {
            attempted: self.files.clone(),
        })
    }

    /// Like [`try_persist`](Self::try_persist), but failure only warns.
    /// The in-memory document keeps the session's changes either way.
    pub fn persist(&self, doc: &mut ConfigDocument) -> Option<PathBuf> {
        match self.try_persist(doc) {
            Ok(path) => {
                doc.mark_clean();
                Some(path)
            }
            Err(e) => {
                warn!("{e}; configuration changes were not saved");
                None
            }
        }
    }
}

/// Rewrite every relative value as an absolute path anchored at the
/// directory of `config_file`. `refversion` is a build name and is left alone.
pub fn resolve_relative_paths(doc: &mut ConfigDocument, config_file: &Path) {
    let base = config_file.parent().unwrap_or_else(|| Path::new("/"));

    for section in doc.all_sections_mut() {
        for (key, value) in &mut section.options {
            if key.as_str() == REFVERSION_KEY || value.is_empty() || Path::new(value.as_str()).is_absolute() {
                continue;
            }
            *value = base.join(value.as_str()).to_string_lossy().into_owned();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, text: &str) {
        std::fs::write(path, text).unwrap();
    }

    #[test]
    fn test_resolve_build_tiers() {
        let mut doc = ConfigDocument::new();
        assert_eq!(resolve_build(None, &doc), "hg19");
        assert_eq!(resolve_build(Some("DEFAULT"), &doc), "hg19");

        doc.set_refversion("mm10");
        assert_eq!(resolve_build(None, &doc), "mm10");
        assert_eq!(resolve_build(Some("DEFAULT"), &doc), "mm10");

        assert_eq!(resolve_build(Some("hg38"), &doc), "hg38");
    }

    #[test]
    fn test_load_missing_files_yields_empty_document() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(vec![dir.path().join("a.cfg"), dir.path().join("b.cfg")]);
        let doc = store.load().unwrap();
        assert_eq!(doc.option_count(), 0);
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = TempDir::new().unwrap();
        let cfg = dir.path().join("transvar.cfg");
        write(
            &cfg,
            "[DEFAULT]\nrefversion = hg19\n\n[hg19]\nreference = ./data/hg19.fa\nrefseq = data/hg19.refseq.gff.gz.transvardb\ndbsnp = /abs/hg19_dbsnp.vcf.gz\n",
        );

        let doc = ConfigStore::new(vec![cfg.clone()]).load().unwrap();
        assert_eq!(doc.refversion(), Some("hg19"));
        assert_eq!(
            doc.get("hg19", "reference"),
            Some(dir.path().join("./data/hg19.fa").to_str().unwrap())
        );
        assert_eq!(
            doc.get("hg19", "refseq"),
            Some(
                dir.path()
                    .join("data/hg19.refseq.gff.gz.transvardb")
                    .to_str()
                    .unwrap()
            )
        );
        assert_eq!(doc.get("hg19", "dbsnp"), Some("/abs/hg19_dbsnp.vcf.gz"));
    }

    #[test]
    fn test_refversion_never_rewritten() {
        let dir = TempDir::new().unwrap();
        let cfg = dir.path().join("c.cfg");
        write(&cfg, "[DEFAULT]\nrefversion = ./weird/name\n\n[x]\nrefversion = y\n");

        let doc = ConfigStore::new(vec![cfg]).load().unwrap();
        assert_eq!(doc.refversion(), Some("./weird/name"));
        assert_eq!(doc.options("x")[0].1, "y");
    }

    #[test]
    fn test_load_reads_only_first_existing_file() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("one").join("first.cfg");
        let second = dir.path().join("second.cfg");
        let third = dir.path().join("third.cfg");
        write(&second, "[hg38]\nreference = /s/hg38.fa\n");
        write(&third, "[mm10]\nreference = /t/mm10.fa\n");

        let doc = ConfigStore::new(vec![first, second, third]).load().unwrap();
        assert!(doc.has_section("hg38"));
        assert!(!doc.has_section("mm10"));
    }

    #[test]
    fn test_load_anchors_to_defining_file() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        let cfg = nested.join("t.cfg");
        write(&cfg, "[hg19]\nreference = hg19.fa\n");

        let missing = dir.path().join("missing.cfg");
        let doc = ConfigStore::new(vec![missing, cfg]).load().unwrap();
        assert_eq!(
            doc.get("hg19", "reference"),
            Some(nested.join("hg19.fa").to_str().unwrap())
        );
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = TempDir::new().unwrap();
        let cfg = dir.path().join("bad.cfg");
        write(&cfg, "reference = x\n");
        let err = ConfigStore::new(vec![cfg]).load().unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_persist_falls_through_to_second_location_only() {
        let dir = TempDir::new().unwrap();
        // A regular file used as a directory makes the first location unwritable
        let blocker = dir.path().join("blocker");
        write(&blocker, "");
        let first = blocker.join("transvar.cfg");
        let second = dir.path().join("second.cfg");
        let third = dir.path().join("third.cfg");

        let store = ConfigStore::new(vec![first.clone(), second.clone(), third.clone()]);
        let mut doc = ConfigDocument::new();
        doc.set("hg19", "reference", "/r/hg19.fa");

        assert_eq!(store.persist(&mut doc), Some(second.clone()));
        assert!(!first.exists());
        assert!(second.exists());
        assert!(!third.exists());
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_persist_failure_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        write(&blocker, "");
        let store = ConfigStore::new(vec![blocker.join("a.cfg"), blocker.join("b.cfg")]);

        let mut doc = ConfigDocument::new();
        doc.set_refversion("hg38");

        assert!(store.persist(&mut doc).is_none());
        assert_eq!(doc.refversion(), Some("hg38"));
        assert!(doc.is_modified());
        assert!(matches!(
            store.try_persist(&doc).unwrap_err(),
            ConfigError::NotWritable { attempted } if attempted.len() == 2
        ));
    }

    #[test]
    fn test_search_paths_from_env_orders_override_first() {
        // Only inspects the shape; the override itself is covered by the CLI tests
        let paths = SearchPaths::from_env();
        assert_eq!(paths.config_files.len(), 2);
        assert_eq!(paths.download_dirs.len(), 2);
        assert!(paths.config_files[1].ends_with(".transvar.cfg"));
        assert!(paths.download_dirs[1].ends_with(".transvar.download"));
    }
}
