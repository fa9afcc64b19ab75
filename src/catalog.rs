use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::asset::Category;
use crate::catalog_manifest::CatalogManifest;

/// File extensions recognised as images when listing a directory.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Source of image identifiers for the round generator.
pub trait AssetCatalog {
    /// Every identifier in the pool for `category`.
    fn list_assets(&self, category: Category) -> Vec<String>;
}

/// Two disjoint pools of image identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub(crate) targets: Vec<String>,
    pub(crate) decoys: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("failed to read asset location {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse asset manifest at {path}: {source}")]
    ParseError {
        path: String,
        source: serde_json::Error,
    },
    #[error("{identifier} is listed as both a campus and an external image")]
    OverlappingPools { identifier: String },
}

impl PartialEq for CatalogLoadError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ReadError { path: left, .. }, Self::ReadError { path: right, .. }) => {
                left == right
            }
            (Self::ParseError { path: left, .. }, Self::ParseError { path: right, .. }) => {
                left == right
            }
            (
                Self::OverlappingPools { identifier: left },
                Self::OverlappingPools { identifier: right },
            ) => left == right,
            _ => false,
        }
    }
}

impl Eq for CatalogLoadError {}

impl Catalog {
    pub fn new(targets: Vec<String>, decoys: Vec<String>) -> Result<Self, CatalogLoadError> {
        let target_set: HashSet<&str> = targets.iter().map(String::as_str).collect();

        if let Some(shared) = decoys
            .iter()
            .find(|identifier| target_set.contains(identifier.as_str()))
        {
            return Err(CatalogLoadError::OverlappingPools {
                identifier: shared.clone(),
            });
        }

        Ok(Self { targets, decoys })
    }

    /// Lists the image files directly inside each directory.
    pub fn from_directories(
        target_dir: impl AsRef<Path>,
        decoy_dir: impl AsRef<Path>,
    ) -> Result<Self, CatalogLoadError> {
        let targets = list_image_files(target_dir.as_ref())?;
        let decoys = list_image_files(decoy_dir.as_ref())?;

        tracing::debug!(
            targets = targets.len(),
            decoys = decoys.len(),
            "loaded catalog from directories"
        );

        Self::new(targets, decoys)
    }

    pub fn from_manifest(manifest: CatalogManifest) -> Result<Self, CatalogLoadError> {
        tracing::debug!(
            targets = manifest.pool(Category::Target).len(),
            decoys = manifest.pool(Category::Decoy).len(),
            "loaded catalog from manifest"
        );

        Self::new(manifest.targets, manifest.decoys)
    }

    /// Reads a JSON manifest; relative entries resolve against the manifest's directory.
    pub fn from_manifest_file(path: impl AsRef<Path>) -> Result<Self, CatalogLoadError> {
        let path = path.as_ref();

        let data = fs::read(path).map_err(|source| CatalogLoadError::ReadError {
            path: path.display().to_string(),
            source,
        })?;

        let manifest: CatalogManifest =
            serde_json::from_slice(&data).map_err(|source| CatalogLoadError::ParseError {
                path: path.display().to_string(),
                source,
            })?;

        let base = path
            .parent()
            .map(|parent| parent.display().to_string())
            .unwrap_or_default();

        Self::from_manifest(manifest.rebased(&base))
    }

    pub fn len(&self, category: Category) -> usize {
        match category {
            Category::Target => self.targets.len(),
            Category::Decoy => self.decoys.len(),
        }
    }
}

impl AssetCatalog for Catalog {
    fn list_assets(&self, category: Category) -> Vec<String> {
        match category {
            Category::Target => self.targets.clone(),
            Category::Decoy => self.decoys.clone(),
        }
    }
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| extension.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

fn list_image_files(root: &Path) -> Result<Vec<String>, CatalogLoadError> {
    let walker = fs::read_dir(root).map_err(|source| CatalogLoadError::ReadError {
        path: root.display().to_string(),
        source,
    })?;

    let mut files = Vec::new();

    for entry in walker {
        let entry = entry.map_err(|source| CatalogLoadError::ReadError {
            path: root.display().to_string(),
            source,
        })?;

        let path = entry.path();

        if path.is_file() && is_image_file(&path) {
            files.push(path.display().to_string());
        }
    }

    files.sort();
    Ok(files)
}
