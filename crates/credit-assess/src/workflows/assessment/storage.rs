use std::fmt;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::domain::RetailerIdentity;
use super::error::{StorageError, ValidationError};

/// Relative folder for one retailer: `[state, [district,]] retailer`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageKey(Vec<String>);

impl StorageKey {
    pub fn for_identity(identity: &RetailerIdentity) -> Result<Self, ValidationError> {
        if !identity.has_name() {
            return Err(ValidationError::MissingRetailerName);
        }

        let mut segments = Vec::with_capacity(3);
        if let Some(location) = &identity.location {
            let raw_district = location.district.as_deref().unwrap_or_default();
            let state = path_segment("state", &location.state)?;
            let district = path_segment("district", raw_district)?;
            match (state, district) {
                (Some(state), district) => {
                    segments.push(state);
                    segments.extend(district);
                }
                (None, Some(_)) => {
                    return Err(ValidationError::DistrictWithoutState {
                        district: raw_district.to_string(),
                    });
                }
                (None, None) => {}
            }
        }

        match path_segment("retailer name", &identity.retailer_name)? {
            Some(retailer) => segments.push(retailer),
            None => return Err(ValidationError::MissingRetailerName),
        }

        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn to_path(&self, root: &Path) -> PathBuf {
        self.0
            .iter()
            .fold(root.to_path_buf(), |path, segment| path.join(segment))
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

/// Blank components are skipped; dot-only components would escape the root.
/// Every whitespace character, leading and trailing included, becomes `_`.
fn path_segment(component: &'static str, raw: &str) -> Result<Option<String>, ValidationError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let segment: String = raw
        .chars()
        .map(|ch| {
            if ch.is_whitespace() || ch == '/' || ch == '\\' {
                '_'
            } else {
                ch
            }
        })
        .collect();

    if segment.chars().all(|ch| ch == '.') {
        return Err(ValidationError::InvalidPathComponent {
            component,
            value: raw.to_string(),
        });
    }

    Ok(Some(segment))
}

/// Final component of an uploaded file name.
pub fn sanitize_file_name(raw: &str) -> Result<String, StorageError> {
    let candidate = raw.trim().replace('\\', "/");
    let name = candidate.rsplit('/').next().unwrap_or_default().trim();
    if name.is_empty() || name.chars().all(|ch| ch == '.') {
        return Err(StorageError::InvalidFileName(raw.to_string()));
    }
    Ok(name.to_string())
}

/// Persists uploaded supporting documents under a retailer folder.
pub trait DocumentStore: Debug + Send + Sync {
    fn store(&self, folder: &StorageKey, file_name: &str, bytes: &[u8])
        -> Result<(), StorageError>;
}

/// Filesystem-backed store rooted at the configured storage root.
#[derive(Debug, Clone)]
pub struct LocalDocumentStore {
    root: PathBuf,
}

impl LocalDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DocumentStore for LocalDocumentStore {
    fn store(
        &self,
        folder: &StorageKey,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        let name = sanitize_file_name(file_name)?;
        let directory = folder.to_path(&self.root);
        ensure_directory(&directory)?;

        let path = directory.join(name);
        fs::write(&path, bytes).map_err(|source| StorageError::Io { path, source })
    }
}

pub(crate) fn ensure_directory(directory: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(directory).map_err(|source| StorageError::Io {
        path: directory.to_path_buf(),
        source,
    })
}
