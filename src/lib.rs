pub mod asset;
pub mod catalog;
pub mod catalog_manifest;
pub mod cell;
pub mod config;
pub mod countdown;
pub mod demo;
pub mod notice;
pub mod odds;
pub mod round;
pub mod selection;
pub mod session;
pub mod verdict;
pub mod verifier;
pub mod web;

pub use asset::{Category, ImageAsset};
pub use catalog::{AssetCatalog, Catalog, CatalogLoadError};
pub use catalog_manifest::CatalogManifest;
pub use cell::{AssetLoadError, Cell, CellContent, build_cells};
pub use config::GateConfig;
pub use countdown::{Countdown, Tick, TimeDisplay};
pub use demo::{DEMO_POOL_SIZE, demo_catalog};
pub use notice::Notice;
pub use round::{
    ROUND_COUNT, ROUNDS, RoundError, RoundInstance, RoundSpec, check_full_playthrough,
    generate_round,
};
pub use selection::{SelectionError, SelectionMode, SelectionState};
pub use session::{ActiveRound, SessionState, Stage, Transition};
pub use verdict::{POINTS_PER_CORRECT, Verdict, evaluate};
pub use verifier::{Briefing, Event, Presenter, Variant, Verifier};
