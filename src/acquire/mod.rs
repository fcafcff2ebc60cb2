//! Resource acquisition: download catalog bundles and record them in the configuration.
//!
//! [`orchestrator::Acquirer`] resolves the active build, looks the
//! (build, topic) pair up in the catalog, picks a download directory and
//! binds every keyed file it fetched. Failures of single files are graded
//! by the file's resource class:
//!
//! | Class | Fetch failure |
//! |-------|---------------|
//! | required | warning, batch marked failed |
//! | optional (`alias_idx`) | warning only |
//! | optional (`idmap_idx`) | silent |
//!
//! [`ensembl`] is the one path that bypasses the catalog: it lists a live
//! Ensembl release, fetches one genome and one GTF, and indexes both with
//! external tools. Every failure there is fatal.

pub mod ensembl;
pub mod external;
pub mod orchestrator;
pub mod prompt;
