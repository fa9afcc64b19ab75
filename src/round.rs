use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use crate::asset::{Category, ImageAsset};
use crate::catalog::AssetCatalog;
use crate::verdict::POINTS_PER_CORRECT;

/// Number of rounds in a full playthrough.
pub const ROUND_COUNT: u8 = 3;

/// Fixed parameters of one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSpec {
    pub number: u8,
    pub rows: usize,
    pub cols: usize,
    pub target_count: usize,
    pub decoy_count: usize,
    /// Seconds allowed in the timed variant.
    pub time_limit: Option<u32>,
}

pub static ROUNDS: [RoundSpec; ROUND_COUNT as usize] = [
    RoundSpec {
        number: 1,
        rows: 2,
        cols: 2,
        target_count: 1,
        decoy_count: 3,
        time_limit: Some(30),
    },
    RoundSpec {
        number: 2,
        rows: 3,
        cols: 3,
        target_count: 3,
        decoy_count: 6,
        time_limit: Some(60),
    },
    RoundSpec {
        number: 3,
        rows: 4,
        cols: 4,
        target_count: 6,
        decoy_count: 10,
        time_limit: Some(120),
    },
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RoundError {
    #[error("round {round} is not defined; rounds run from 1 to 3")]
    UnknownRound { round: u8 },
    #[error("round needs {required} unused {category} images but only {available} remain")]
    InsufficientAssets {
        category: Category,
        required: usize,
        available: usize,
    },
    #[error("round {round} expects {expected_cells} cells with {expected_targets} campus images, got {cells} cells with {targets}")]
    LayoutMismatch {
        round: u8,
        expected_cells: usize,
        expected_targets: usize,
        cells: usize,
        targets: usize,
    },
}

impl RoundSpec {
    pub fn for_round(round: u8) -> Result<&'static RoundSpec, RoundError> {
        ROUNDS
            .iter()
            .find(|spec| spec.number == round)
            .ok_or(RoundError::UnknownRound { round })
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_last(&self) -> bool {
        self.number == ROUND_COUNT
    }

    /// Thumbnail edge in pixels; smaller grids get larger cells.
    pub fn cell_edge(&self) -> u32 {
        match self.rows {
            0..=2 => 220,
            3 => 180,
            _ => 150,
        }
    }

    pub fn status(&self) -> String {
        format!("Level {} of {}", self.number, ROUND_COUNT)
    }

    pub fn instructions(&self, timed: bool) -> String {
        let what = if self.target_count == 1 {
            "the ONE campus image".to_string()
        } else {
            format!("all {} campus images", self.target_count)
        };

        let mut text = format!(
            "LEVEL {}: Select {} from the {}x{} grid below. Each correct campus image is worth {} points.",
            self.number, what, self.rows, self.cols, POINTS_PER_CORRECT
        );

        if let (true, Some(limit)) = (timed, self.time_limit) {
            text.push_str(&format!(" You have {}.", describe_duration(limit)));
        }

        text
    }
}

fn describe_duration(seconds: u32) -> String {
    match (seconds / 60, seconds % 60) {
        (0, secs) => format!("{secs} seconds"),
        (1, 0) => "1 minute".to_string(),
        (mins, 0) => format!("{mins} minutes"),
        (mins, secs) => format!("{mins} minutes {secs} seconds"),
    }
}

/// One attempt at a round: the assets in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundInstance {
    spec: RoundSpec,
    cells: Vec<ImageAsset>,
}

impl RoundInstance {
    /// Builds an instance from an explicit layout, checking it against the round's shape.
    pub fn from_layout(round: u8, cells: Vec<ImageAsset>) -> Result<Self, RoundError> {
        let spec = *RoundSpec::for_round(round)?;
        let targets = cells.iter().filter(|asset| asset.is_target()).count();

        if cells.len() != spec.cell_count() || targets != spec.target_count {
            return Err(RoundError::LayoutMismatch {
                round,
                expected_cells: spec.cell_count(),
                expected_targets: spec.target_count,
                cells: cells.len(),
                targets,
            });
        }

        Ok(Self { spec, cells })
    }

    pub fn spec(&self) -> &RoundSpec {
        &self.spec
    }

    pub fn round(&self) -> u8 {
        self.spec.number
    }

    pub fn cells(&self) -> &[ImageAsset] {
        &self.cells
    }

    pub fn get(&self, position: usize) -> Option<&ImageAsset> {
        self.cells.get(position)
    }

    pub fn target_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, asset)| asset.is_target())
            .map(|(position, _)| position)
            .collect()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|asset| asset.identifier.as_str())
    }
}

/// Generates a fresh instance of `round`, never reusing an identifier in `used`.
///
/// Targets and decoys are each sampled without replacement from the unused part of their
/// pool, then the combined set is shuffled to decide display positions.
///
/// # Errors
/// * Returns [`RoundError::UnknownRound`] if `round` is outside `1..=ROUND_COUNT`.
/// * Returns [`RoundError::InsufficientAssets`] if either pool has too few unused images.
pub fn generate_round<R, C>(
    rng: &mut R,
    catalog: &C,
    round: u8,
    used: &HashSet<String>,
) -> Result<RoundInstance, RoundError>
where
    R: Rng + ?Sized,
    C: AssetCatalog + ?Sized,
{
    let spec = *RoundSpec::for_round(round)?;

    let mut cells = draw(rng, catalog, Category::Target, spec.target_count, used)?;
    cells.extend(draw(rng, catalog, Category::Decoy, spec.decoy_count, used)?);
    cells.shuffle(rng);

    tracing::debug!(
        round,
        cells = cells.len(),
        excluded = used.len(),
        "generated round"
    );

    Ok(RoundInstance { spec, cells })
}

/// Checks that `catalog` holds enough distinct images for every round of one playthrough.
///
/// # Errors
/// Returns [`RoundError::InsufficientAssets`] for the first pool that falls short, with
/// `required` counting the whole playthrough.
pub fn check_full_playthrough<C>(catalog: &C) -> Result<(), RoundError>
where
    C: AssetCatalog + ?Sized,
{
    for category in [Category::Target, Category::Decoy] {
        let required: usize = ROUNDS
            .iter()
            .map(|spec| match category {
                Category::Target => spec.target_count,
                Category::Decoy => spec.decoy_count,
            })
            .sum();
        let available = catalog
            .list_assets(category)
            .into_iter()
            .collect::<HashSet<_>>()
            .len();

        if available < required {
            return Err(RoundError::InsufficientAssets {
                category,
                required,
                available,
            });
        }
    }

    Ok(())
}

fn draw<R, C>(
    rng: &mut R,
    catalog: &C,
    category: Category,
    count: usize,
    used: &HashSet<String>,
) -> Result<Vec<ImageAsset>, RoundError>
where
    R: Rng + ?Sized,
    C: AssetCatalog + ?Sized,
{
    let mut seen = HashSet::new();
    let available: Vec<String> = catalog
        .list_assets(category)
        .into_iter()
        .filter(|identifier| !used.contains(identifier))
        .filter(|identifier| seen.insert(identifier.clone()))
        .collect();

    if available.len() < count {
        return Err(RoundError::InsufficientAssets {
            category,
            required: count,
            available: available.len(),
        });
    }

    Ok(available
        .choose_multiple(rng, count)
        .map(|identifier| ImageAsset::new(identifier.clone(), category))
        .collect())
}
