//! Arcade Runner - endless-runner mini-games for the browser
//!
//! Core modules:
//! - `sim`: Deterministic run simulation (obstacles, jumps, collisions, phases)
//! - `tuning`: Data-driven variant configuration (one engine, every runner game)
//! - `highscores`: Remote leaderboard sync
//! - `audio`: Music/sound toggles and browser playback
//! - `settings`: Player preferences persisted to LocalStorage
//! - `platform`: Browser/native platform abstraction

pub mod audio;
pub mod error;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{HighScoreError, StartError};
pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::{Character, Variant, VariantConfig, Viewport};

/// Game configuration constants shared by every variant
pub mod consts {
    /// Score increments once per this much running time (ms)
    pub const SCORE_INTERVAL_MS: f64 = 100.0;
    /// Countdown length before a run starts (seconds)
    pub const COUNTDOWN_SECS: u32 = 3;
    /// Time between countdown ticks (ms)
    pub const COUNTDOWN_TICK_MS: f64 = 1000.0;
    /// Largest frame delta used for obstacle motion (tab stalls, debugger stops)
    pub const MAX_FRAME_DELTA_MS: f64 = 250.0;

    /// Obstacle positions are percent of field width, measured from the right edge
    pub const OBSTACLE_SPAWN_POSITION: f32 = -10.0;
    pub const OBSTACLE_EXIT_POSITION: f32 = 110.0;
    /// 0.5% per 60 Hz frame
    pub const OBSTACLE_SPEED_PER_MS: f32 = 0.5 / 16.67;

    /// Leaderboard page size
    pub const LEADERBOARD_LIMIT: usize = 10;
    /// Window for the "today" board (ms)
    pub const DAILY_WINDOW_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;
    /// Shortest username accepted for submission
    pub const MIN_USERNAME_LEN: usize = 3;

    /// Viewports at least this wide use the desktop layout
    pub const DESKTOP_BREAKPOINT_PX: f32 = 768.0;
}
