use crate::events::{Schedule, ToneEvent};
use crate::grid::StepGrid;

/// Compiles a selection grid into an ordered tone schedule.
///
/// Every selected cell `(o, t)` becomes one event at
/// `(frequencies[o % len], t * step_duration, step_duration)`. The modulo
/// wraps pitch offsets past the end of the table back onto it, so a grid
/// taller than the table repeats the pitch layout octave-style. Events come
/// out grouped by ascending pitch offset, then ascending step index, which
/// makes repeated compiles of the same input bit-identical.
///
/// `frequencies` must be non-empty and `step_duration` positive; both are
/// guaranteed by the controller.
pub fn compile_schedule(grid: &StepGrid, frequencies: &[f32], step_duration: f32) -> Schedule {
    debug_assert!(!frequencies.is_empty());
    debug_assert!(step_duration > 0.0);

    let events = grid
        .selected_cells()
        .map(|(pitch, step)| ToneEvent {
            frequency: frequencies[pitch % frequencies.len()],
            start: step as f32 * step_duration,
            duration: step_duration,
        })
        .collect();

    Schedule {
        events,
        total_duration: grid.step_count() as f32 * step_duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_grid_compiles_to_empty_schedule() {
        let grid = StepGrid::new(4, 8).unwrap();
        let schedule = compile_schedule(&grid, &[220.0], 0.25);
        assert!(schedule.is_empty());
        assert_eq!(schedule.total_duration, 2.0);
    }

    #[test]
    fn selected_cells_become_ordered_events() {
        // two pitches, four steps, cells (0,0) and (1,2)
        let grid = StepGrid::new(2, 4)
            .unwrap()
            .set(1, 2, true)
            .unwrap()
            .set(0, 0, true)
            .unwrap();
        let schedule = compile_schedule(&grid, &[440.0, 880.0], 0.5);
        assert_eq!(
            schedule.events,
            vec![
                ToneEvent {
                    frequency: 440.0,
                    start: 0.0,
                    duration: 0.5
                },
                ToneEvent {
                    frequency: 880.0,
                    start: 1.0,
                    duration: 0.5
                },
            ]
        );
        assert_eq!(schedule.total_duration, 2.0);
    }

    #[test]
    fn pitch_offsets_wrap_around_the_table() {
        let grid = StepGrid::new(5, 2)
            .unwrap()
            .set(3, 0, true)
            .unwrap()
            .set(4, 1, true)
            .unwrap();
        let schedule = compile_schedule(&grid, &[100.0, 200.0, 300.0], 1.0);
        assert_eq!(schedule.events[0].frequency, 100.0); // 3 % 3
        assert_eq!(schedule.events[1].frequency, 200.0); // 4 % 3
    }

    #[test]
    fn compiling_twice_is_deterministic() {
        let mut grid = StepGrid::new(6, 16).unwrap();
        for (pitch, step) in [(0, 0), (5, 15), (2, 7), (2, 3)] {
            grid = grid.set(pitch, step, true).unwrap();
        }
        let freqs = [220.0, 247.5, 275.0];
        let first = compile_schedule(&grid, &freqs, 0.2);
        let second = compile_schedule(&grid, &freqs, 0.2);
        assert_eq!(first, second);
    }

    #[test]
    fn unselected_cells_contribute_nothing() {
        let grid = StepGrid::new(3, 3).unwrap().set(1, 1, true).unwrap();
        let schedule = compile_schedule(&grid, &[330.0], 0.5);
        assert_eq!(schedule.events.len(), 1);
        assert_eq!(schedule.events[0].start, 0.5);
    }
}
