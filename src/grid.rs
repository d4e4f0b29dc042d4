use crate::error::SequencerError;

/// Number of time slots a freshly created composition grid has.
pub const DEFAULT_STEP_COUNT: usize = 16;

/// Dense pitch-offset x step-index selection grid.
///
/// Updates are copy-on-write: `set` and `toggled` return a new grid value and
/// leave the receiver untouched, so a schedule compiled from an earlier grid
/// stays valid while the user keeps editing. Dimensions are fixed for the
/// lifetime of one grid value; a scale reconfiguration replaces the grid
/// wholesale instead of resizing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepGrid {
    cells: Vec<Vec<bool>>,
    pitch_count: usize,
    step_count: usize,
}

impl StepGrid {
    /// All-false grid with `pitch_count` rows and `step_count` columns.
    pub fn new(pitch_count: usize, step_count: usize) -> Result<Self, SequencerError> {
        if pitch_count == 0 || step_count == 0 {
            return Err(SequencerError::InvalidDimension {
                pitches: pitch_count,
                steps: step_count,
            });
        }
        Ok(Self {
            cells: vec![vec![false; step_count]; pitch_count],
            pitch_count,
            step_count,
        })
    }

    pub fn pitch_count(&self) -> usize {
        self.pitch_count
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Pure read; out-of-range indices read as unselected.
    pub fn is_selected(&self, pitch: usize, step: usize) -> bool {
        self.cells
            .get(pitch)
            .and_then(|row| row.get(step))
            .copied()
            .unwrap_or(false)
    }

    /// New grid with exactly one cell changed.
    pub fn set(&self, pitch: usize, step: usize, value: bool) -> Result<Self, SequencerError> {
        self.check_bounds(pitch, step)?;
        let mut next = self.clone();
        next.cells[pitch][step] = value;
        Ok(next)
    }

    /// New grid with one cell flipped.
    pub fn toggled(&self, pitch: usize, step: usize) -> Result<Self, SequencerError> {
        self.set(pitch, step, !self.is_selected(pitch, step))
    }

    /// Fresh all-false grid of the same dimensions.
    pub fn cleared(&self) -> Self {
        Self {
            cells: vec![vec![false; self.step_count]; self.pitch_count],
            pitch_count: self.pitch_count,
            step_count: self.step_count,
        }
    }

    /// Selected `(pitch, step)` pairs, ascending by pitch then by step.
    pub fn selected_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(pitch, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &on)| on)
                .map(move |(step, _)| (pitch, step))
        })
    }

    fn check_bounds(&self, pitch: usize, step: usize) -> Result<(), SequencerError> {
        if pitch >= self.pitch_count || step >= self.step_count {
            return Err(SequencerError::OutOfRange {
                pitch,
                step,
                pitches: self.pitch_count,
                steps: self.step_count,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_false() {
        let grid = StepGrid::new(3, 4).unwrap();
        assert_eq!(grid.pitch_count(), 3);
        assert_eq!(grid.step_count(), 4);
        assert_eq!(grid.selected_cells().count(), 0);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            StepGrid::new(0, 16),
            Err(SequencerError::InvalidDimension { .. })
        ));
        assert!(matches!(
            StepGrid::new(8, 0),
            Err(SequencerError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn set_leaves_original_untouched() {
        let grid = StepGrid::new(2, 2).unwrap();
        let updated = grid.set(1, 1, true).unwrap();
        assert!(!grid.is_selected(1, 1));
        assert!(updated.is_selected(1, 1));
    }

    #[test]
    fn toggle_round_trip_restores_grid() {
        let grid = StepGrid::new(4, 8).unwrap().set(2, 3, true).unwrap();
        let on = grid.set(1, 5, true).unwrap();
        let off = on.set(1, 5, false).unwrap();
        assert_eq!(off, grid);
    }

    #[test]
    fn out_of_range_set_is_rejected() {
        let grid = StepGrid::new(2, 2).unwrap();
        assert!(matches!(
            grid.set(2, 0, true),
            Err(SequencerError::OutOfRange { .. })
        ));
        assert!(matches!(
            grid.set(0, 2, true),
            Err(SequencerError::OutOfRange { .. })
        ));
        assert!(!grid.is_selected(2, 0));
    }

    #[test]
    fn cleared_keeps_dimensions() {
        let grid = StepGrid::new(3, 5).unwrap().set(2, 4, true).unwrap();
        let cleared = grid.cleared();
        assert_eq!(cleared.pitch_count(), 3);
        assert_eq!(cleared.step_count(), 5);
        assert_eq!(cleared.selected_cells().count(), 0);
    }

    #[test]
    fn selected_cells_iterate_pitch_major() {
        let grid = StepGrid::new(3, 4)
            .unwrap()
            .set(2, 0, true)
            .unwrap()
            .set(0, 3, true)
            .unwrap()
            .set(0, 1, true)
            .unwrap();
        let cells: Vec<_> = grid.selected_cells().collect();
        assert_eq!(cells, vec![(0, 1), (0, 3), (2, 0)]);
    }
}
