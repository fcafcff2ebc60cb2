//! Core data types for resource acquisition.
//!
//! - [`ResourceDescriptor`]: one downloadable file with its optional config key
//! - [`Topic`]: category of resource bundle (raw, reference, dbsnp, anno, idmap)
//! - [`ResourceClass`]: failure policy attached to each descriptor
//!
//! ## Failure classes
//!
//! | Class | Typical file | Batch on failure |
//! |-------|--------------|------------------|
//! | required | `hg19.fa`, `*.transvardb` | warned, marked failed |
//! | optional-warn | `*alias_idx` | warned, still successful |
//! | optional-silent | `*idmap_idx` | silent, still successful |
//!
//! [`ResourceDescriptor`]: resource::ResourceDescriptor
//! [`Topic`]: types::Topic
//! [`ResourceClass`]: types::ResourceClass

pub mod resource;
pub mod types;
