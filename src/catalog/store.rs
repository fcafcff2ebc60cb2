use std::collections::BTreeMap;

use thiserror::Error;

use crate::catalog::builtin::{builtin_entries, ANNOTATION_ROOT};
use crate::catalog::derive::derive_anno;
use crate::core::resource::ResourceDescriptor;
use crate::core::types::Topic;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("no pre-built {topic} for {build}, please build manually")]
    NotFound { build: String, topic: Topic },
}

/// Immutable mapping from (build, topic) to an ordered list of resources
#[derive(Debug, Clone)]
pub struct ResourceCatalog {
    /// Base URL of the pre-built annotation host
    root: String,

    /// Entries keyed by (build, topic), including derived `anno` entries
    entries: BTreeMap<(String, Topic), Vec<ResourceDescriptor>>,
}

impl ResourceCatalog {
    /// Build a catalog from hand-authored entries.
    ///
    /// `anno` entries are derived from every `raw` entry here, once.
    /// A hand-authored `anno` entry for a build that also has `raw` tables
    /// is replaced by the derived one.
    pub fn from_entries<I>(root: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = ((String, Topic), Vec<ResourceDescriptor>)>,
    {
        let root = root.into();
        let mut map: BTreeMap<(String, Topic), Vec<ResourceDescriptor>> =
            entries.into_iter().collect();

        let derived: Vec<_> = map
            .iter()
            .filter(|((_, topic), _)| *topic == Topic::Raw)
            .map(|((build, _), raw)| ((build.clone(), Topic::Anno), derive_anno(&root, raw)))
            .collect();
        map.extend(derived);

        Self { root, entries: map }
    }

    /// The catalog shipped with the tool
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_entries(ANNOTATION_ROOT, builtin_entries())
    }

    /// Resources for a (build, topic) pair, in download order
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the pair has no entry.
    pub fn lookup(&self, build: &str, topic: Topic) -> Result<&[ResourceDescriptor], CatalogError> {
        self.entries
            .get(&(build.to_string(), topic))
            .map(Vec::as_slice)
            .ok_or_else(|| CatalogError::NotFound {
                build: build.to_string(),
                topic,
            })
    }

    /// Whether any entry exists for the pair
    #[must_use]
    pub fn contains(&self, build: &str, topic: Topic) -> bool {
        self.entries.contains_key(&(build.to_string(), topic))
    }

    /// All (build, topic) pairs with their resources, ordered by build then topic
    pub fn iter(&self) -> impl Iterator<Item = (&str, Topic, &[ResourceDescriptor])> {
        self.entries
            .iter()
            .map(|((build, topic), resources)| (build.as_str(), *topic, resources.as_slice()))
    }

    /// Distinct builds with at least one entry
    #[must_use]
    pub fn builds(&self) -> Vec<&str> {
        let mut builds: Vec<&str> = self.entries.keys().map(|(b, _)| b.as_str()).collect();
        builds.dedup();
        builds
    }

    /// Base URL used for derived entries
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Number of (build, topic) entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResourceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
