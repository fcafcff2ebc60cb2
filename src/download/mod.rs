//! Single-file downloads with a fallback transport.
//!
//! Every fetch tries the primary transport (`reqwest`, relaxed certificate
//! checks, declared content length required) and, on any failure, the
//! secondary transport (`ureq` agent). What a total failure means for the
//! surrounding batch depends on the resource's [`ResourceClass`].
//!
//! Downloads are synchronous and have no timeout; `ftp://` URLs are fetched
//! from the same host over HTTPS.
//!
//! [`ResourceClass`]: crate::core::types::ResourceClass

pub mod downloader;
pub mod transport;
