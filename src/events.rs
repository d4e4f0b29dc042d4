/// One tone in a compiled schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneEvent {
    /// Hz, always positive.
    pub frequency: f32,
    /// Seconds from the start of the schedule.
    pub start: f32,
    /// Seconds.
    pub duration: f32,
}

/// Ordered event list produced by the compiler, ready for an audio engine.
/// An empty event list is a valid schedule.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schedule {
    pub events: Vec<ToneEvent>,
    /// Wall-clock length of one full pass over the grid, in seconds.
    pub total_duration: f32,
}

impl Schedule {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
