use crate::asset::Category;

/// JSON listing of both image pools, e.g. `assets/manifest.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct CatalogManifest {
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub decoys: Vec<String>,
}

impl CatalogManifest {
    pub fn pool(&self, category: Category) -> &[String] {
        match category {
            Category::Target => &self.targets,
            Category::Decoy => &self.decoys,
        }
    }

    /// Prefixes every relative identifier with `base`, leaving absolute paths and URLs alone.
    pub fn rebased(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        if base.is_empty() {
            return self;
        }

        for identifier in self.targets.iter_mut().chain(self.decoys.iter_mut()) {
            if !identifier.starts_with('/') && !identifier.contains("://") {
                *identifier = format!("{base}/{identifier}");
            }
        }

        self
    }
}
