use serde::{Deserialize, Serialize};

use crate::core::types::ResourceClass;

/// One downloadable file of a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Configuration option bound to the downloaded path.
    /// `None` for companion files (indices, checksums).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Local file name inside the download directory
    pub filename: String,

    /// Remote source
    pub url: String,

    /// Failure policy, fixed when the catalog is built
    pub class: ResourceClass,
}

impl ResourceDescriptor {
    /// Create a descriptor bound to a configuration key
    pub fn keyed(key: impl Into<String>, filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(Some(key.into()), filename.into(), url.into())
    }

    /// Create an unnamed companion descriptor
    pub fn companion(filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(None, filename.into(), url.into())
    }

    fn new(key: Option<String>, filename: String, url: String) -> Self {
        let class = ResourceClass::classify(&filename, &url);
        Self {
            key,
            filename,
            url,
            class,
        }
    }

    /// Whether this descriptor is bound to a configuration option
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.key.is_some()
    }
}
