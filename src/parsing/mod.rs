//! Parsers for on-disk formats.
//!
//! - **INI configuration**: `[section]` headers, `key = value` or
//!   `key: value` options, `#`/`;` comments and indented continuation lines
//!
//! ## Example
//!
//! ```rust
//! use transvar_config::parsing::ini::parse_ini_text;
//!
//! let doc = parse_ini_text("[DEFAULT]\nrefversion = hg38\n\n[hg38]\nreference = /ref/hg38.fa\n").unwrap();
//! assert_eq!(doc.refversion(), Some("hg38"));
//! assert_eq!(doc.get("hg38", "reference"), Some("/ref/hg38.fa"));
//! ```

pub mod ini;
