//! Tunable parameters for a running program, external to the language
//! itself.

/// Parameters governing how long a program runs and how its output is
/// windowed for animation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Maximum frames before termination; `None` means run forever.
    pub frames: Option<u64>,
    /// Cap on concurrent running programs.
    pub max_forks: usize,
    /// Steps used to train initial extents.
    pub lookahead_steps: usize,
    /// Bounded stroke list kept by the animation driver.
    pub max_strokes: usize,
    /// Size of the cursor indicator drawn at each fork's position.
    pub dot_size: f64,
    /// Target canvas width in pixels.
    pub width: u32,
    /// Target canvas height in pixels.
    pub height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frames: None,
            max_forks: 20,
            lookahead_steps: 80,
            max_strokes: 200,
            dot_size: 3.0,
            width: 800,
            height: 600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = Config::default();
        assert_eq!(config.max_forks, 20);
        assert_eq!(config.lookahead_steps, 80);
        assert_eq!(config.max_strokes, 200);
        assert_eq!(config.frames, None);
    }
}
