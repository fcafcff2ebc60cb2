use serde::{Deserialize, Serialize};

/// Section name holding process-wide defaults
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Option in `DEFAULT` naming the active build. A build token, never a path.
pub const REFVERSION_KEY: &str = "refversion";

/// Build used when neither the caller nor the configuration names one
pub const DEFAULT_BUILD: &str = "hg19";

/// Placeholder a caller may pass instead of an explicit build
pub const DEFAULT_BUILD_TOKEN: &str = "DEFAULT";

/// Section holding build-independent identifier mappings
pub const IDMAP_SECTION: &str = "idmap";

/// Category of resource bundle available for a build
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Raw transcript tables as published by each provider
    Raw,
    /// Reference sequence (FASTA) and its index
    Reference,
    /// dbSNP variant database
    Dbsnp,
    /// Indexed transcript tables derived from the raw tables
    Anno,
    /// Identifier mapping tables
    Idmap,
}

impl Topic {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Reference => "reference",
            Self::Dbsnp => "dbsnp",
            Self::Anno => "anno",
            Self::Idmap => "idmap",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a failed download of a resource affects its batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceClass {
    /// Failure is warned about and marks the batch failed
    Required,
    /// Failure is swallowed; identifier mappings are missing for many databases
    OptionalSilent,
    /// Failure is warned about but leaves the batch successful
    OptionalWarn,
}

impl ResourceClass {
    /// Classify a resource from its destination filename and source URL.
    ///
    /// `*idmap_idx` files (by name or URL) are silent, `*alias_idx` files
    /// warn, everything else is required.
    #[must_use]
    pub fn classify(filename: &str, url: &str) -> Self {
        if filename.ends_with("idmap_idx") || url.ends_with("idmap_idx") {
            Self::OptionalSilent
        } else if filename.ends_with("alias_idx") {
            Self::OptionalWarn
        } else {
            Self::Required
        }
    }
}

impl std::fmt::Display for ResourceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::OptionalSilent => write!(f, "optional-silent"),
            Self::OptionalWarn => write!(f, "optional-warn"),
        }
    }
}
