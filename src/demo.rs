use crate::Catalog;

/// Images in each pool of the demo catalog.
pub const DEMO_POOL_SIZE: usize = 29;

fn demo_pool(prefix: &str) -> Vec<String> {
    (1..=DEMO_POOL_SIZE)
        .map(|index| format!("{prefix}_{index}.jpg"))
        .collect()
}

/// Placeholder catalog used when no image directories are configured.
///
/// The identifiers do not exist on disk, so every cell renders as a placeholder.
pub fn demo_catalog() -> Catalog {
    Catalog {
        targets: demo_pool("campus"),
        decoys: demo_pool("external"),
    }
}
