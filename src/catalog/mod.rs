//! Declarative catalog of downloadable resources.
//!
//! The catalog maps a (build, topic) pair to the ordered list of files that
//! make up that bundle. It is pure data: nothing here touches the network or
//! the filesystem.
//!
//! ## Built-in catalog
//!
//! - **raw**: provider transcript tables for hg19, hg38, mm9 and mm10
//! - **reference**: FASTA plus `.fai` for the same builds
//! - **dbsnp**: hg19 only
//! - **idmap**: UniProt identifier mapping, build independent
//! - **anno**: derived from `raw` when the catalog is constructed
//!
//! ## Example
//!
//! ```rust
//! use transvar_config::ResourceCatalog;
//! use transvar_config::core::types::Topic;
//!
//! let catalog = ResourceCatalog::builtin();
//! let anno = catalog.lookup("hg38", Topic::Anno).unwrap();
//! assert_eq!(anno[0].key.as_deref(), Some("refseq"));
//! ```

pub mod builtin;
pub mod derive;
pub mod store;
