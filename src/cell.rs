use image::RgbaImage;
use image::imageops::FilterType;
use std::path::Path;

use crate::asset::{Category, ImageAsset};
use crate::round::RoundInstance;

/// Border kept around each thumbnail inside its cell.
const CELL_PADDING: u32 = 4;

#[derive(Debug, thiserror::Error)]
pub enum AssetLoadError {
    #[error("failed to open image {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: String,
        source: image::ImageError,
    },
}

/// What a grid cell draws.
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Thumbnail(RgbaImage),
    /// Coloured tile with the file name, used when the image could not be loaded.
    Placeholder { fill: &'static str, caption: String },
}

/// One clickable grid position.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub position: usize,
    pub asset: ImageAsset,
    pub content: CellContent,
}

impl Cell {
    pub fn is_placeholder(&self) -> bool {
        matches!(self.content, CellContent::Placeholder { .. })
    }

    pub fn row_col(&self, cols: usize) -> (usize, usize) {
        (self.position / cols, self.position % cols)
    }
}

pub fn placeholder_fill(category: Category) -> &'static str {
    match category {
        Category::Target => "#a3c4bc",
        Category::Decoy => "#e6a57e",
    }
}

pub fn placeholder_for(asset: &ImageAsset) -> CellContent {
    CellContent::Placeholder {
        fill: placeholder_fill(asset.category),
        caption: asset.display_name().to_string(),
    }
}

/// Decodes `path` and scales it to fill an `edge`-pixel cell.
pub fn load_thumbnail(path: &Path, edge: u32) -> Result<RgbaImage, AssetLoadError> {
    let reader = image::ImageReader::open(path).map_err(|source| AssetLoadError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let decoded = reader
        .with_guessed_format()
        .map_err(|source| AssetLoadError::Open {
            path: path.display().to_string(),
            source,
        })?
        .decode()
        .map_err(|source| AssetLoadError::Decode {
            path: path.display().to_string(),
            source,
        })?;

    let side = edge.saturating_sub(CELL_PADDING).max(1);
    Ok(decoded
        .resize_exact(side, side, FilterType::Lanczos3)
        .to_rgba8())
}

/// Builds a cell for every position, falling back to a placeholder when loading fails.
pub fn build_cells(instance: &RoundInstance) -> Vec<Cell> {
    let edge = instance.spec().cell_edge();

    instance
        .cells()
        .iter()
        .enumerate()
        .map(|(position, asset)| {
            let content = match load_thumbnail(Path::new(&asset.identifier), edge) {
                Ok(thumbnail) => CellContent::Thumbnail(thumbnail),
                Err(error) => {
                    tracing::warn!(position, %error, "using placeholder cell");
                    placeholder_for(asset)
                }
            };

            Cell {
                position,
                asset: asset.clone(),
                content,
            }
        })
        .collect()
}
