use crate::round::RoundInstance;
use crate::selection::SelectionState;

/// Points for each correctly selected campus image.
pub const POINTS_PER_CORRECT: u32 = 5;

/// Result of checking a submitted selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub round: u8,
    pub passed: bool,
    /// Awarded for correct picks whether or not the round passed.
    pub points_awarded: u32,
    pub correct_count: usize,
    pub required_count: usize,
    /// Selected positions holding external images, ascending.
    pub incorrect_positions: Vec<usize>,
}

impl Verdict {
    /// Targets the user left unselected.
    pub fn missed_count(&self) -> usize {
        self.required_count.saturating_sub(self.correct_count)
    }
}

/// Scores `selection` against `instance`.
///
/// A round passes only when no external image is selected and every campus image is.
pub fn evaluate(instance: &RoundInstance, selection: &SelectionState) -> Verdict {
    let mut correct_count = 0;
    let mut incorrect_positions = Vec::new();

    for position in selection.positions() {
        match instance.get(position) {
            Some(asset) if asset.is_target() => correct_count += 1,
            Some(_) => incorrect_positions.push(position),
            None => {}
        }
    }

    let required_count = instance.spec().target_count;
    let passed = incorrect_positions.is_empty() && correct_count == required_count;

    Verdict {
        round: instance.round(),
        passed,
        points_awarded: correct_count as u32 * POINTS_PER_CORRECT,
        correct_count,
        required_count,
        incorrect_positions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{Category, ImageAsset};
    use crate::selection::SelectionState;

    fn round_one_with_target_at(target: usize) -> RoundInstance {
        let cells = (0..4)
            .map(|position| {
                let category = if position == target {
                    Category::Target
                } else {
                    Category::Decoy
                };
                ImageAsset::new(format!("cell_{position}.jpg"), category)
            })
            .collect();

        RoundInstance::from_layout(1, cells).expect("valid round 1 layout")
    }

    fn round_two() -> RoundInstance {
        let cells = (0..9)
            .map(|position| {
                let category = if position < 3 {
                    Category::Target
                } else {
                    Category::Decoy
                };
                ImageAsset::new(format!("cell_{position}.jpg"), category)
            })
            .collect();

        RoundInstance::from_layout(2, cells).expect("valid round 2 layout")
    }

    fn select(instance: &RoundInstance, positions: &[usize]) -> SelectionState {
        let mut selection = SelectionState::for_round(instance);
        for &position in positions {
            selection.toggle(position).expect("in range");
        }
        selection
    }

    #[test]
    fn exact_target_pick_passes() {
        let instance = round_one_with_target_at(2);
        let verdict = evaluate(&instance, &select(&instance, &[2]));

        assert!(verdict.passed);
        assert_eq!(verdict.points_awarded, 5);
        assert!(verdict.incorrect_positions.is_empty());
    }

    #[test]
    fn decoy_pick_fails_but_keeps_partial_credit() {
        let instance = round_two();
        let verdict = evaluate(&instance, &select(&instance, &[0, 1, 2, 7]));

        assert!(!verdict.passed);
        assert_eq!(verdict.points_awarded, 15);
        assert_eq!(verdict.incorrect_positions, [7]);
    }

    #[test]
    fn mixed_selection_in_multi_round() {
        let instance = round_two();
        let verdict = evaluate(&instance, &select(&instance, &[2, 3]));

        assert!(!verdict.passed);
        assert_eq!(verdict.points_awarded, 5);
        assert_eq!(verdict.incorrect_positions, [3]);
        assert_eq!(verdict.missed_count(), 2);
    }

    #[test]
    fn too_few_targets_fails_without_wrong_picks() {
        let instance = round_two();
        let verdict = evaluate(&instance, &select(&instance, &[0, 1]));

        assert!(!verdict.passed);
        assert_eq!(verdict.points_awarded, 10);
        assert!(verdict.incorrect_positions.is_empty());
        assert_eq!(verdict.missed_count(), 1);
    }

    #[test]
    fn only_decoys_scores_nothing() {
        let instance = round_one_with_target_at(0);
        let verdict = evaluate(&instance, &select(&instance, &[3]));

        assert!(!verdict.passed);
        assert_eq!(verdict.points_awarded, 0);
        assert_eq!(verdict.incorrect_positions, [3]);
    }
}
