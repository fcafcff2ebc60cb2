use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::utils::paths::http_url;

/// Block size used by the primary transport
pub const BLOCK_SIZE: usize = 16 * 1024;

/// Chunk size used by the secondary transport
pub const CHUNK_SIZE: usize = 1024 * 1024;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request failed: {0}")]
    Agent(Box<ureq::Error>),

    #[error("server answered HTTP {0}")]
    Status(u16),

    #[error("remote file not found")]
    NotFound,

    #[error("server did not declare a content length")]
    MissingContentLength,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ureq::Error> for TransportError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(404, _) => Self::NotFound,
            ureq::Error::Status(code, _) => Self::Status(code),
            other => Self::Agent(Box::new(other)),
        }
    }
}

/// A way of copying one URL to one local file
pub trait Transport {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Stream `url` into `dest`, returning the number of bytes written
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` on connection, status or IO failure.
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, TransportError>;
}

/// Primary transport: `reqwest` with certificate checks relaxed.
///
/// Requires the server to declare a content length and streams the body in
/// fixed-size blocks.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns `TransportError::Http` if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(None)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, TransportError> {
        let mut response = self.client.get(http_url(url)).send()?.error_for_status()?;
        let declared = response
            .content_length()
            .ok_or(TransportError::MissingContentLength)?;
        debug!("{url}: {declared} bytes declared");

        info!("[downloading] {}", display_name(dest));
        let mut writer = BufWriter::new(File::create(dest)?);
        let mut buffer = vec![0u8; BLOCK_SIZE];
        let mut written = 0u64;

        loop {
            let n = response.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            writer.write_all(&buffer[..n])?;
            written += n as u64;
        }
        writer.flush()?;

        Ok(written)
    }
}

/// Secondary transport: a `ureq` agent streaming in large chunks.
/// A 404 answer writes nothing.
pub struct AgentTransport {
    agent: ureq::Agent,
}

impl AgentTransport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }
}

impl Default for AgentTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for AgentTransport {
    fn name(&self) -> &'static str {
        "agent"
    }

    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, TransportError> {
        let response = self.agent.get(&http_url(url)).call()?;

        info!("[bakdownloading] {}", display_name(dest));
        let mut reader = response.into_reader();
        let mut writer = BufWriter::new(File::create(dest)?);
        let mut buffer = vec![0u8; CHUNK_SIZE];
        let mut written = 0u64;

        loop {
            let n = reader.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            writer.write_all(&buffer[..n])?;
            written += n as u64;
        }
        writer.flush()?;

        Ok(written)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
