//! Path and URL helpers shared by the config store and the downloader.

use std::path::{Path, PathBuf};

/// Expand a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, or without a resolvable home directory,
/// are returned unchanged.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Make a path absolute against the current directory without touching the filesystem
///
/// # Errors
///
/// Returns an IO error if the current directory cannot be determined.
pub fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Map a catalog URL onto a scheme the HTTP transports speak.
///
/// The FTP hosts in the catalog (NCBI, Ensembl, EBI) serve the same tree
/// over HTTPS.
#[must_use]
pub fn http_url(url: &str) -> String {
    match url.strip_prefix("ftp://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

/// File name component of a slash-separated remote path
#[must_use]
pub fn remote_basename(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path)
}
