use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::config::document::ConfigDocument;
use crate::config::store::SearchPaths;
use crate::core::types::{DEFAULT_BUILD_TOKEN, REFVERSION_KEY};

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("no default reference version set")]
    NoActiveBuild,
}

/// Identifier-mapping index found next to a database file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdmapFile {
    pub namespace: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseEntry {
    pub key: String,
    pub value: String,
    pub idmaps: Vec<IdmapFile>,
}

/// Read-only view of the active configuration
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub config_files: Vec<PathBuf>,
    pub download_dirs: Vec<PathBuf>,
    pub build: String,
    /// False when the document has no section for `build`
    pub configured: bool,
    pub reference: Option<String>,
    pub databases: Vec<DatabaseEntry>,
}

impl ConfigSummary {
    /// Summarise `doc` for the explicit build, or for `DEFAULT.refversion`.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::NoActiveBuild` if neither is available.
    pub fn collect(
        doc: &ConfigDocument,
        paths: &SearchPaths,
        explicit_build: Option<&str>,
    ) -> Result<Self, SummaryError> {
        let build = match explicit_build {
            Some(build) if build != DEFAULT_BUILD_TOKEN => build.to_string(),
            _ => doc
                .refversion()
                .ok_or(SummaryError::NoActiveBuild)?
                .to_string(),
        };

        let configured = doc.has_section(&build);
        let mut reference = None;
        let mut databases = Vec::new();

        if configured {
            for (key, value) in doc.options(&build) {
                match key.as_str() {
                    "reference" => reference = Some(value.clone()),
                    REFVERSION_KEY => {}
                    _ => databases.push(DatabaseEntry {
                        key: key.clone(),
                        value: value.clone(),
                        idmaps: idmap_files(Path::new(value)),
                    }),
                }
            }
        }

        Ok(Self {
            config_files: paths.config_files.clone(),
            download_dirs: paths.download_dirs.clone(),
            build,
            configured,
            reference,
            databases,
        })
    }
}

/// `<database>*.idmap_idx` files in the database's directory, sorted by path
fn idmap_files(database: &Path) -> Vec<IdmapFile> {
    let (Some(dir), Some(prefix)) = (database.parent(), database.file_name()) else {
        return Vec::new();
    };
    let prefix = prefix.to_string_lossy();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut found: Vec<IdmapFile> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with(prefix.as_ref()) {
                return None;
            }
            let stem = name.strip_suffix(".idmap_idx")?;
            let namespace = stem.rsplit_once('.').map_or("", |(_, ns)| ns);
            Some(IdmapFile {
                namespace: namespace.to_string(),
                path: entry.path(),
            })
        })
        .collect();
    found.sort_by(|a, b| a.path.cmp(&b.path));
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths() -> SearchPaths {
        SearchPaths::new(
            vec![PathBuf::from("/pkg/transvar.cfg"), PathBuf::from("/home/u/.transvar.cfg")],
            vec![PathBuf::from("/pkg/transvar.download")],
        )
    }

    #[test]
    fn test_no_active_build() {
        let doc = ConfigDocument::new();
        let err = ConfigSummary::collect(&doc, &paths(), None).unwrap_err();
        assert_eq!(err.to_string(), "no default reference version set");
    }

    #[test]
    fn test_unconfigured_build() {
        let mut doc = ConfigDocument::new();
        doc.set_refversion("hg38");
        let summary = ConfigSummary::collect(&doc, &paths(), None).unwrap();
        assert_eq!(summary.build, "hg38");
        assert!(!summary.configured);
        assert!(summary.databases.is_empty());
    }

    #[test]
    fn test_explicit_build_wins() {
        let mut doc = ConfigDocument::new();
        doc.set_refversion("hg38");
        doc.set("mm10", "reference", "/r/mm10.fa");
        let summary = ConfigSummary::collect(&doc, &paths(), Some("mm10")).unwrap();
        assert_eq!(summary.build, "mm10");
        assert_eq!(summary.reference.as_deref(), Some("/r/mm10.fa"));
    }

    #[test]
    fn test_databases_with_idmaps() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("hg19.refseq.gff.gz.transvardb");
        for name in [
            "hg19.refseq.gff.gz.transvardb",
            "hg19.refseq.gff.gz.transvardb.HGNC.idmap_idx",
            "hg19.refseq.gff.gz.transvardb.GeneID.idmap_idx",
            "hg19.refseq.gff.gz.transvardb.gene_idx",
            "hg19.ccds.txt.transvardb.HGNC.idmap_idx",
        ] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }

        let mut doc = ConfigDocument::new();
        doc.set_refversion("hg19");
        doc.set("hg19", "reference", "/r/hg19.fa");
        doc.set("hg19", "refseq", db.to_str().unwrap());

        let summary = ConfigSummary::collect(&doc, &paths(), Some("DEFAULT")).unwrap();
        assert_eq!(summary.databases.len(), 1);
        let namespaces: Vec<_> = summary.databases[0]
            .idmaps
            .iter()
            .map(|i| i.namespace.as_str())
            .collect();
        assert_eq!(namespaces, vec!["GeneID", "HGNC"]);
    }

    #[test]
    fn test_missing_database_directory() {
        assert!(idmap_files(Path::new("/nonexistent/dir/x.transvardb")).is_empty());
    }
}
