//! Persistent configuration: where each build's resources live on disk.
//!
//! The configuration is an INI document with a reserved `DEFAULT` section
//! (holding `refversion`, the active build) and one section per build.
//!
//! ## Search path
//!
//! | Order | Config file | Download directory |
//! |-------|-------------|--------------------|
//! | 1 | `$TRANSVAR_CFG` or `transvar.cfg` next to the executable | `$TRANSVAR_DOWNLOAD_DIR` or `transvar.download` next to the executable |
//! | 2 | `~/.transvar.cfg` | `~/.transvar.download` |
//!
//! Reads take the first existing file only. Writes go to the first
//! location that accepts them. Relative values in a file are anchored at
//! that file's directory when loaded.

pub mod document;
pub mod store;
pub mod summary;
