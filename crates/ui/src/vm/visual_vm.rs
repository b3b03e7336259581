use services::GameSnapshot;

/// What the progress scene draws. Derived entirely from a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisualState {
    pub progress: u32,
    pub total_levels: u32,
    pub is_complete: bool,
    pub is_loading: bool,
    pub flash: bool,
    pub is_failed: bool,
}

impl VisualState {
    /// Share of levels cleared, in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total_levels == 0 {
            return 0.0;
        }
        (f64::from(self.progress) / f64::from(self.total_levels)).clamp(0.0, 1.0)
    }

    /// Whether the scene cell at `index` (zero based) is lit.
    #[must_use]
    pub fn is_lit(&self, index: u32) -> bool {
        index < self.progress
    }
}

#[must_use]
pub fn map_visual_state(snapshot: &GameSnapshot) -> VisualState {
    VisualState {
        progress: snapshot.score.min(snapshot.total_levels),
        total_levels: snapshot.total_levels,
        is_complete: snapshot.completed,
        is_loading: snapshot.is_loading(),
        flash: snapshot.feedback_flag,
        is_failed: snapshot.is_failed(),
    }
}
