//! Game state and core simulation types
//!
//! Everything a run needs lives here, including the tuning copied out of the
//! variant preset, so a `GameState` is self-contained and serializable.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::RunClock;
use super::collision::{self, Rect, RunnerHitbox};
use super::obstacle::{Lane, Obstacle, Spawner};
use super::runner::{CharacterState, Runner};
use crate::tuning::{
    CollisionTuning, JumpTuning, Layout, Layouts, SpawnTuning, StartGate, Variant, VariantConfig,
    Viewport,
};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting on the start screen
    #[default]
    Init,
    /// Counting down to the first frame of a run
    Ready,
    /// Active gameplay
    Playing,
    /// Game is paused (explicitly, by the settings panel, or by losing focus)
    Paused,
    /// Run ended
    GameOver,
}

/// Something the presentation layer may want to react to (sound, HUD, leaderboard)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    CountdownTick { remaining: u32 },
    RunStarted,
    Jumped,
    Landed,
    SlideStarted,
    SlideEnded,
    ObstacleSpawned { id: u32, lane: Lane },
    Crashed { obstacle_id: u32 },
    Paused,
    Resumed,
    SettingsOpened,
    SettingsClosed,
    RunEnded { score: u64 },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub variant: Variant,
    pub viewport: Viewport,
    pub gate: StartGate,
    pub can_slide: bool,
    pub spawn_tuning: SpawnTuning,
    /// Desktop jump durations; see `jump_tuning()` for the active ones
    pub jump: JumpTuning,
    pub collision: CollisionTuning,
    pub layouts: Layouts,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Lane picker
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub runner: Runner,
    /// Active obstacles (sorted by id, oldest first)
    pub obstacles: Vec<Obstacle>,
    /// One point per elapsed scoring interval
    pub score: u64,
    /// Whole seconds of running time
    pub game_time_secs: u64,
    /// Countdown number on screen while `Ready`
    pub countdown: u32,
    /// Wall time of the next countdown step
    pub next_countdown_ms: f64,
    pub clock: RunClock,
    pub spawner: Spawner,
    pub settings_open: bool,
    /// Events since the last drain (not part of the persisted state)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh state for a preset
    pub fn new(config: &VariantConfig, viewport: Viewport, seed: u64) -> Self {
        Self {
            variant: config.variant,
            viewport,
            gate: config.gate,
            can_slide: config.can_slide,
            spawn_tuning: config.spawn,
            jump: config.jump,
            collision: config.collision,
            layouts: config.layouts,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Init,
            runner: Runner::new(),
            obstacles: Vec::new(),
            score: 0,
            game_time_secs: 0,
            countdown: 0,
            next_countdown_ms: 0.0,
            clock: RunClock::default(),
            spawner: Spawner::new(&config.spawn),
            settings_open: false,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Shorthand for `new` with the variant's own preset
    pub fn for_variant(variant: Variant, viewport: Viewport, seed: u64) -> Self {
        Self::new(&variant.config(), viewport, seed)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Geometry for the current viewport
    pub fn layout(&self) -> Layout {
        self.layouts.for_viewport(self.viewport)
    }

    /// Jump durations for the current viewport
    pub fn jump_tuning(&self) -> JumpTuning {
        self.jump.for_viewport(self.viewport)
    }

    pub fn width_scale(&self) -> f32 {
        self.collision.width_scale(self.viewport)
    }

    /// Switch layouts (window resize). Takes effect from the next frame.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport != viewport {
            log::debug!("Viewport {:?} -> {:?}", self.viewport, viewport);
            self.viewport = viewport;
        }
    }

    pub fn character_state(&self) -> CharacterState {
        self.runner.state()
    }

    pub fn runner_hitbox(&self) -> RunnerHitbox {
        collision::runner_hitbox(&self.layout(), self.runner.state())
    }

    /// Hitboxes of every active obstacle, tagged with their ids
    pub fn obstacle_hitboxes(&self) -> Vec<(u32, Rect)> {
        let layout = self.layout();
        self.obstacles
            .iter()
            .map(|o| (o.id, collision::obstacle_hitbox(&layout, o)))
            .collect()
    }

    /// Take every event emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        log::trace!("{:?}", event);
        self.events.push(event);
    }

    pub(crate) fn spawn_obstacle(&mut self, lane: Lane) -> u32 {
        let id = self.next_entity_id();
        self.obstacles.push(Obstacle::new(id, lane));
        id
    }
}
