//! # transvar-config
//!
//! Configuration resolution and resource acquisition for the TransVar
//! variant annotator.
//!
//! TransVar needs, per genome build, a reference FASTA and a set of indexed
//! transcript databases. This crate records where those files live in an
//! INI configuration file and knows how to download them.
//!
//! ## Features
//!
//! - **Layered configuration**: environment override, package default and
//!   per-user file, first readable one wins
//! - **Resource catalog**: declarative (build, topic) bundles, with indexed
//!   annotation entries derived from the raw transcript tables
//! - **Resilient downloads**: a second transport is tried whenever the first
//!   fails, and optional files fail quietly
//! - **Live Ensembl**: genome and GTF for any species of an Ensembl release,
//!   decompressed and indexed
//!
//! ## Example
//!
//! ```rust,no_run
//! use transvar_config::{Acquirer, ConfigStore, Downloader, ResourceCatalog, SearchPaths, Topic};
//!
//! let paths = SearchPaths::from_env();
//! let store = ConfigStore::from_search_paths(&paths);
//! let mut doc = store.load().unwrap();
//!
//! let catalog = ResourceCatalog::builtin();
//! let downloader = Downloader::http().unwrap();
//! let acquirer = Acquirer::new(&catalog, &downloader, &paths.download_dirs);
//!
//! let report = acquirer.acquire(&mut doc, Some("hg38"), Topic::Anno).unwrap();
//! println!("{} files in {}", report.fetched.len(), report.directory.display());
//! store.persist(&mut doc);
//! ```
//!
//! ## Modules
//!
//! - [`acquire`]: catalog-driven and live Ensembl acquisition
//! - [`catalog`]: the built-in resource catalog
//! - [`config`]: configuration document, search paths and persistence
//! - [`core`]: resource descriptors, topics and failure classes
//! - [`download`]: single-file transports with fallback
//! - [`parsing`]: INI reader and writer
//! - [`cli`]: Command-line interface implementation

pub mod acquire;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod download;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::acquire::orchestrator::{AcquireError, Acquirer, AcquisitionReport};
pub use crate::catalog::store::{CatalogError, ResourceCatalog};
pub use crate::config::document::ConfigDocument;
pub use crate::config::store::{ConfigError, ConfigStore, SearchPaths};
pub use crate::core::resource::ResourceDescriptor;
pub use crate::core::types::*;
pub use crate::download::downloader::{Downloader, FetchOutcome};
