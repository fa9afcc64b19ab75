use std::fmt;
use std::path::Path;

/// Which pool an image was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Category {
    /// Images of the campus; these are the ones the user must pick.
    Target,
    /// Images from elsewhere that must be left unselected.
    Decoy,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Target => "campus",
            Category::Decoy => "external",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single image known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ImageAsset {
    /// Path or URL of the image. Unique across both pools.
    pub identifier: String,
    pub category: Category,
}

impl ImageAsset {
    pub fn new(identifier: impl Into<String>, category: Category) -> Self {
        Self {
            identifier: identifier.into(),
            category,
        }
    }

    pub fn is_target(&self) -> bool {
        self.category == Category::Target
    }

    /// File name portion of the identifier, used for captions.
    pub fn display_name(&self) -> &str {
        Path::new(&self.identifier)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.identifier)
    }
}

impl fmt::Display for ImageAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.category)
    }
}
