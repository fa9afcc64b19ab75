use std::collections::BTreeSet;

use crate::round::RoundInstance;

/// How a click interacts with cells that are already selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// At most one cell selected; picking a cell clears the rest.
    Single,
    /// Cells toggle independently.
    Multiple,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("position {position} is outside the {cells}-cell grid")]
    OutOfRange { position: usize, cells: usize },
}

/// Positions currently toggled on in the active round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    mode: SelectionMode,
    cells: usize,
    selected: BTreeSet<usize>,
}

impl SelectionState {
    pub fn new(mode: SelectionMode, cells: usize) -> Self {
        Self {
            mode,
            cells,
            selected: BTreeSet::new(),
        }
    }

    /// Empty selection shaped for `instance`; rounds needing a single target use radio semantics.
    pub fn for_round(instance: &RoundInstance) -> Self {
        let mode = if instance.spec().target_count == 1 {
            SelectionMode::Single
        } else {
            SelectionMode::Multiple
        };

        Self::new(mode, instance.cells().len())
    }

    /// Flips `position` and returns whether it is now selected.
    pub fn toggle(&mut self, position: usize) -> Result<bool, SelectionError> {
        if position >= self.cells {
            return Err(SelectionError::OutOfRange {
                position,
                cells: self.cells,
            });
        }

        if self.selected.remove(&position) {
            return Ok(false);
        }

        if self.mode == SelectionMode::Single {
            self.selected.clear();
        }

        self.selected.insert(position);
        Ok(true)
    }

    /// Selected positions in ascending order.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn submit_enabled(&self) -> bool {
        !self.is_empty()
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }
}
