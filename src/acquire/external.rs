//! External collaborators: decompression, FASTA indexing and annotation indexing.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use flate2::read::MultiGzDecoder;
use thiserror::Error;
use tracing::info;

use crate::catalog::derive::TRANSVARDB_SUFFIX;

#[derive(Error, Debug)]
pub enum ExternalError {
    #[error("'{0}' not found on PATH")]
    MissingTool(String),

    #[error("'{program}' exited with {status}")]
    ToolFailed { program: String, status: String },

    #[error("target file {0} does not end with .gz")]
    NotGzipped(PathBuf),

    #[error("indexer produced no output for {0}")]
    NoOutput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decompress `path` next to itself (dropping `.gz`) and remove the archive
///
/// # Errors
///
/// Returns `ExternalError::NotGzipped` if the name lacks `.gz`, or an IO error.
pub fn gunzip(path: &Path) -> Result<PathBuf, ExternalError> {
    let name = path.to_string_lossy();
    let Some(stem) = name.strip_suffix(".gz") else {
        return Err(ExternalError::NotGzipped(path.to_path_buf()));
    };
    let output = PathBuf::from(stem);

    info!("Unzipping {}", path.display());
    let mut decoder = MultiGzDecoder::new(BufReader::new(File::open(path)?));
    let mut writer = BufWriter::new(File::create(&output)?);
    std::io::copy(&mut decoder, &mut writer)?;
    writer.flush()?;
    std::fs::remove_file(path)?;

    Ok(output)
}

fn run_tool(program: &str, args: &[&std::ffi::OsStr]) -> Result<(), ExternalError> {
    let status = Command::new(program).args(args).status().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ExternalError::MissingTool(program.to_string())
        } else {
            ExternalError::Io(e)
        }
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(ExternalError::ToolFailed {
            program: program.to_string(),
            status: status.to_string(),
        })
    }
}

/// Produces a `.fai` index next to a FASTA file
pub trait FastaIndexer {
    /// # Errors
    ///
    /// Returns an `ExternalError` if indexing fails.
    fn index(&self, fasta: &Path) -> Result<PathBuf, ExternalError>;
}

/// `samtools faidx <file>`; samtools must be on PATH
#[derive(Debug, Clone)]
pub struct SamtoolsFaidx {
    program: String,
}

impl SamtoolsFaidx {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SamtoolsFaidx {
    fn default() -> Self {
        Self::new("samtools")
    }
}

impl FastaIndexer for SamtoolsFaidx {
    fn index(&self, fasta: &Path) -> Result<PathBuf, ExternalError> {
        info!("Faidx indexing {}", fasta.display());
        run_tool(&self.program, &["faidx".as_ref(), fasta.as_os_str()])?;
        Ok(fai_path(fasta))
    }
}

/// In-process `.fai` indexing with noodles
#[derive(Debug, Default, Clone, Copy)]
pub struct NoodlesFaidx;

impl FastaIndexer for NoodlesFaidx {
    fn index(&self, fasta: &Path) -> Result<PathBuf, ExternalError> {
        use noodles::fasta;

        info!("Faidx indexing {}", fasta.display());
        let index = fasta::index(fasta)?;
        let output = fai_path(fasta);
        let mut file = BufWriter::new(File::create(&output)?);
        fasta::fai::io::Writer::new(&mut file).write_index(&index)?;
        file.flush()?;
        Ok(output)
    }
}

fn fai_path(fasta: &Path) -> PathBuf {
    let mut name = fasta.as_os_str().to_os_string();
    name.push(".fai");
    PathBuf::from(name)
}

/// Builds a searchable annotation database from transcript tables
pub trait AnnotationIndexer {
    /// Index `inputs`, returning the `.transvardb` path of the first input
    ///
    /// # Errors
    ///
    /// Returns an `ExternalError` if indexing fails.
    fn index(&self, inputs: &[PathBuf]) -> Result<PathBuf, ExternalError>;
}

/// Runs `<program> index --ensembl <inputs...>`
#[derive(Debug, Clone)]
pub struct TransvarIndexer {
    program: String,
}

impl TransvarIndexer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for TransvarIndexer {
    fn default() -> Self {
        Self::new("transvar")
    }
}

impl AnnotationIndexer for TransvarIndexer {
    fn index(&self, inputs: &[PathBuf]) -> Result<PathBuf, ExternalError> {
        let Some(first) = inputs.first() else {
            return Err(ExternalError::NoOutput(PathBuf::new()));
        };
        info!("Indexing {}", first.display());

        let mut args: Vec<&std::ffi::OsStr> = vec!["index".as_ref(), "--ensembl".as_ref()];
        args.extend(inputs.iter().map(|p| p.as_os_str()));
        run_tool(&self.program, &args)?;

        let output = transvardb_path(first);
        if output.exists() {
            Ok(output)
        } else {
            Err(ExternalError::NoOutput(first.clone()))
        }
    }
}

/// `<input>.transvardb`
#[must_use]
pub fn transvardb_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(TRANSVARDB_SUFFIX);
    PathBuf::from(name)
}
