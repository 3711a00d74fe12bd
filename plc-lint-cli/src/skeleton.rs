//! Skeleton source - the reference repository every component is compared to
//!
//! The skeleton comes either from a local checkout or from a repository
//! archive (`.tar.gz` or `.zip`) downloaded and unpacked in memory. Archives
//! wrap their content in a single top-level directory, which is stripped.

use crate::workspace::list_files;
use anyhow::{anyhow, Context, Result};
use plc_lint_core::config::SkeletonConfig;
use plc_lint_core::RepositoryFiles;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4b, 0x03, 0x04];

/// Where the skeleton is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkeletonSource {
    Local(PathBuf),
    Archive(String),
}

impl SkeletonSource {
    /// A local path wins over the archive URL
    pub fn from_config(config: &SkeletonConfig) -> Self {
        match &config.local_path {
            Some(path) => SkeletonSource::Local(PathBuf::from(path)),
            None => SkeletonSource::Archive(config.archive_url()),
        }
    }

    pub fn fetch(&self, timeout: Option<Duration>) -> Result<RepositoryFiles> {
        match self {
            SkeletonSource::Local(path) => {
                info!("📁 Reading skeleton from {}", path.display());
                if !path.is_dir() {
                    return Err(anyhow!("Skeleton directory not found: {}", path.display()));
                }
                list_files(path)
            }
            SkeletonSource::Archive(url) => {
                info!("📦 Downloading skeleton from {}", url);
                let bytes = download(url, timeout)?;
                unpack_archive(&bytes)
            }
        }
    }
}

fn download(url: &str, timeout: Option<Duration>) -> Result<Vec<u8>> {
    let mut builder = ureq::AgentBuilder::new();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    let response = builder
        .build()
        .get(url)
        .call()
        .with_context(|| format!("Failed to download from {}", url))?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .with_context(|| format!("Failed to read archive from {}", url))?;
    debug!("downloaded {} bytes", bytes.len());
    Ok(bytes)
}

/// Unpack a `.tar.gz` or `.zip` archive, detected by its magic bytes
pub fn unpack_archive(bytes: &[u8]) -> Result<RepositoryFiles> {
    let entries = if bytes.starts_with(&GZIP_MAGIC) {
        read_tar_gz(bytes)?
    } else if bytes.starts_with(&ZIP_MAGIC) {
        read_zip(bytes)?
    } else {
        return Err(anyhow!("Unrecognized skeleton archive format"));
    };
    Ok(strip_top_level(entries))
}

/// An archive member: slash-separated path, `None` content for directories
type Entry = (String, Option<String>);

fn read_tar_gz(bytes: &[u8]) -> Result<Vec<Entry>> {
    let decoder = flate2::read::GzDecoder::new(Cursor::new(bytes));
    let mut archive = tar::Archive::new(decoder);
    let mut entries = Vec::new();

    for entry in archive.entries().context("Failed to read tar.gz archive")? {
        let mut entry = entry.context("Failed to read tar.gz entry")?;
        let path = entry.path()?.to_string_lossy().into_owned();
        let kind = entry.header().entry_type();

        if kind.is_dir() {
            entries.push((path, None));
        } else if kind.is_file() {
            let mut content = Vec::new();
            entry
                .read_to_end(&mut content)
                .with_context(|| format!("Failed to extract {}", path))?;
            entries.push((path, Some(String::from_utf8_lossy(&content).into_owned())));
        }
    }
    Ok(entries)
}

fn read_zip(bytes: &[u8]) -> Result<Vec<Entry>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).context("Failed to read zip archive")?;
    let mut entries = Vec::new();

    for index in 0..archive.len() {
        let mut file = archive.by_index(index).context("Failed to read zip entry")?;
        let path = file.name().to_string();
        if file.is_dir() {
            entries.push((path, None));
        } else {
            let mut content = Vec::new();
            file.read_to_end(&mut content)
                .with_context(|| format!("Failed to extract {}", path))?;
            entries.push((path, Some(String::from_utf8_lossy(&content).into_owned())));
        }
    }
    Ok(entries)
}

/// Drop the single directory every entry lives under, if there is one.
/// Parent directories of files are listed even when the archive omits them.
fn strip_top_level(entries: Vec<Entry>) -> RepositoryFiles {
    let top_level = |path: &str| path.trim_start_matches("./").split('/').next().map(str::to_string);
    let first = entries.first().and_then(|(path, _)| top_level(path));
    let shared = first.filter(|prefix| {
        entries.iter().all(|(path, content)| {
            let path = path.trim_start_matches("./");
            path.starts_with(&format!("{}/", prefix)) || (content.is_none() && path.trim_end_matches('/') == prefix)
        })
    });

    let mut files = RepositoryFiles::new();
    for (path, content) in entries {
        let path = path.trim_start_matches("./");
        let relative = match &shared {
            Some(prefix) => path
                .strip_prefix(prefix.as_str())
                .map(|rest| rest.trim_start_matches('/'))
                .unwrap_or(path),
            None => path,
        };
        let relative = relative.trim_end_matches('/');
        if relative.is_empty() {
            continue;
        }

        let mut parent = Path::new(relative).parent();
        while let Some(dir) = parent.filter(|p| !p.as_os_str().is_empty()) {
            files.insert_directory(dir.to_string_lossy().replace('\\', "/"));
            parent = dir.parent();
        }

        match content {
            Some(content) => files.insert_file(relative, content),
            None => files.insert_directory(relative),
        }
    }
    files
}
