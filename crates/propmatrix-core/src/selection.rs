//! Single-cell selection over the visible sequence.

/// Keyboard input relevant to the matrix view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Other,
}

/// Grid or a single enlarged cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Grid,
    Expanded { position: usize },
}

/// Optional index into the currently filtered and sorted sequence.
///
/// The selected combination's ordinal is remembered alongside the index so
/// that a recomputed sequence can follow it to its new position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<Selected>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Selected {
    position: usize,
    ordinal: usize,
}

impl Selection {
    /// Selects `position` in `visible` (ordinals in display order).
    ///
    /// Out-of-range positions clear the selection and return false.
    pub fn select(&mut self, position: usize, visible: &[usize]) -> bool {
        match visible.get(position) {
            Some(&ordinal) => {
                self.selected = Some(Selected { position, ordinal });
                true
            }
            None => {
                self.selected = None;
                false
            }
        }
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn is_selected(&self) -> bool {
        self.selected.is_some()
    }

    pub fn ordinal(&self) -> Option<usize> {
        self.selected.map(|selected| selected.ordinal)
    }

    /// Position if it is still inside a sequence of `len` items.
    pub fn resolve(&self, len: usize) -> Option<usize> {
        self.selected
            .map(|selected| selected.position)
            .filter(|&position| position < len)
    }

    /// Follows the selected combination into a recomputed sequence, or
    /// clears the selection when it is no longer visible.
    pub fn rebase(&mut self, visible: &[usize]) {
        let Some(selected) = self.selected else {
            return;
        };
        self.selected = visible
            .iter()
            .position(|&ordinal| ordinal == selected.ordinal)
            .map(|position| Selected {
                position,
                ordinal: selected.ordinal,
            });
    }

    pub fn mode(&self, len: usize) -> ViewMode {
        match self.resolve(len) {
            Some(position) => ViewMode::Expanded { position },
            None => ViewMode::Grid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_selection_falls_back_to_grid() {
        let mut selection = Selection::default();
        assert!(!selection.select(5, &[0, 1, 2]));
        assert_eq!(selection.mode(3), ViewMode::Grid);
    }

    #[test]
    fn rebase_follows_combination_to_new_position() {
        let mut selection = Selection::default();
        assert!(selection.select(2, &[0, 1, 2, 3]));
        selection.rebase(&[3, 2, 1, 0]);
        assert_eq!(selection.mode(4), ViewMode::Expanded { position: 1 });
    }

    #[test]
    fn rebase_clears_when_filtered_out() {
        let mut selection = Selection::default();
        selection.select(0, &[7, 8]);
        selection.rebase(&[8]);
        assert!(!selection.is_selected());
        assert_eq!(selection.mode(1), ViewMode::Grid);
    }

    #[test]
    fn resolve_guards_against_shrunken_sequence() {
        let mut selection = Selection::default();
        selection.select(3, &[0, 1, 2, 3]);
        assert_eq!(selection.resolve(2), None);
    }
}
