use campusgate::{
    AssetCatalog, Catalog, CatalogLoadError, Category, RoundError, demo_catalog, generate_round,
};
use rand::SeedableRng;
use std::collections::HashSet;
use std::fs;

#[test]
fn generates_every_round_from_directory_catalog() {
    let root = tempfile::tempdir().expect("temporary directory should be created");
    let campus = root.path().join("campus_images");
    let external = root.path().join("external_images");
    fs::create_dir_all(&campus).expect("campus dir");
    fs::create_dir_all(&external).expect("external dir");
    for index in 0..10 {
        fs::write(campus.join(format!("campus_{index}.jpg")), b"x").expect("campus image");
    }
    for index in 0..19 {
        fs::write(external.join(format!("external_{index}.png")), b"x").expect("external image");
    }

    let catalog = Catalog::from_directories(&campus, &external).expect("catalog should load");
    let mut rng = rand::rngs::StdRng::seed_from_u64(77);
    let mut used = HashSet::new();

    for (round, cells, targets) in [(1, 4, 1), (2, 9, 3), (3, 16, 6)] {
        let instance =
            generate_round(&mut rng, &catalog, round, &used).expect("pools are large enough");

        assert_eq!(instance.cells().len(), cells);
        assert_eq!(instance.target_positions().len(), targets);
        for asset in instance.cells() {
            let expected_dir = match asset.category {
                Category::Target => &campus,
                Category::Decoy => &external,
            };
            assert!(asset.identifier.starts_with(&expected_dir.display().to_string()));
        }
        used.extend(instance.identifiers().map(str::to_string));
    }

    assert_eq!(used.len(), catalog.list_assets(Category::Target).len() + 19);
}

#[test]
fn exhausted_pool_is_reported_not_degraded() {
    let catalog = demo_catalog();
    let used: HashSet<String> = catalog
        .list_assets(Category::Target)
        .into_iter()
        .skip(2)
        .collect();
    let mut rng = rand::rngs::StdRng::seed_from_u64(4);

    let error = generate_round(&mut rng, &catalog, 2, &used).expect_err("only two campus left");

    assert_eq!(
        error,
        RoundError::InsufficientAssets {
            category: Category::Target,
            required: 3,
            available: 2,
        }
    );
}

#[test]
fn overlapping_directories_are_rejected() {
    let root = tempfile::tempdir().expect("temporary directory should be created");
    fs::write(root.path().join("quad.jpg"), b"x").expect("image");

    let error = Catalog::from_directories(root.path(), root.path())
        .expect_err("same directory for both pools");

    assert!(matches!(error, CatalogLoadError::OverlappingPools { .. }));
}
