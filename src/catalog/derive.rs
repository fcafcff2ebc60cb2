//! Derivation of indexed annotation (`anno`) entries from raw tables.
//!
//! Every keyed raw table `<file>` is served pre-indexed from the annotation
//! root as `<file>.transvardb` together with its index companions.

use crate::core::resource::ResourceDescriptor;

/// Suffix of an indexed transcript table
pub const TRANSVARDB_SUFFIX: &str = ".transvardb";

/// Index companions shipped with every indexed table
pub const INDEX_SUFFIXES: [&str; 4] = [".gene_idx", ".trxn_idx", ".loc_idx", ".loc_idx.tbi"];

/// Identifier namespaces with an optional mapping index
pub const IDMAP_NAMESPACES: [&str; 4] = ["protein_id", "gene_id", "GeneID", "HGNC"];

/// Join a file name onto a base URL with exactly one separating slash
#[must_use]
pub fn join_url(root: &str, filename: &str) -> String {
    format!("{}/{}", root.trim_end_matches('/'), filename.trim_start_matches('/'))
}

/// Derive the `anno` descriptors for a list of `raw` descriptors.
///
/// Unkeyed raw descriptors are skipped. Each keyed one yields a primary
/// descriptor keyed by the raw key minus its `raw_` prefix, four index
/// companions and one companion per identifier namespace.
#[must_use]
pub fn derive_anno(root: &str, raw: &[ResourceDescriptor]) -> Vec<ResourceDescriptor> {
    let mut derived = Vec::new();

    for descriptor in raw {
        let Some(key) = &descriptor.key else {
            continue;
        };
        let key = key.strip_prefix("raw_").unwrap_or(key);
        let primary = format!("{}{TRANSVARDB_SUFFIX}", descriptor.filename);

        derived.push(ResourceDescriptor::keyed(
            key,
            primary.clone(),
            join_url(root, &primary),
        ));

        for suffix in INDEX_SUFFIXES {
            let filename = format!("{primary}{suffix}");
            let url = join_url(root, &filename);
            derived.push(ResourceDescriptor::companion(filename, url));
        }

        for namespace in IDMAP_NAMESPACES {
            let filename = format!("{primary}.{namespace}.idmap_idx");
            let url = join_url(root, &filename);
            derived.push(ResourceDescriptor::companion(filename, url));
        }
    }

    derived
}
