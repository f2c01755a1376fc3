//! Engine configuration

/// Tunables for the combo search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Largest number of frames in one combo
    pub max_combo_frames: usize,
    /// Frames needing more moves than this are never combined
    pub max_combine_cost: u8,
}

impl EngineConfig {
    /// Configuration with a custom combo size bound.
    ///
    /// `max_combo_frames` is clamped to at least 1 (single-frame combos only).
    #[must_use]
    pub fn with_depth(max_combo_frames: usize) -> Self {
        Self {
            max_combo_frames: max_combo_frames.max(1),
            ..Self::default()
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_combo_frames: 3,
            max_combine_cost: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.max_combo_frames, 3);
        assert_eq!(config.max_combine_cost, 3);
    }

    #[test]
    fn test_depth_is_clamped() {
        assert_eq!(EngineConfig::with_depth(0).max_combo_frames, 1);
        assert_eq!(EngineConfig::with_depth(4).max_combo_frames, 4);
    }
}
