//! Obstacles and their spawn timer

use serde::{Deserialize, Serialize};

use crate::consts::{OBSTACLE_EXIT_POSITION, OBSTACLE_SPAWN_POSITION, OBSTACLE_SPEED_PER_MS};
use crate::tuning::SpawnTuning;

/// Which of the two heights an obstacle travels at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lane {
    Low,
    High,
}

/// A hazard sliding across the field from right to left
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub lane: Lane,
    /// Percent of field width from the right edge
    pub position: f32,
}

impl Obstacle {
    pub fn new(id: u32, lane: Lane) -> Self {
        Self {
            id,
            lane,
            position: OBSTACLE_SPAWN_POSITION,
        }
    }

    pub fn advance(&mut self, delta_ms: f64) {
        self.position += OBSTACLE_SPEED_PER_MS * delta_ms.max(0.0) as f32;
    }

    pub fn is_off_screen(&self) -> bool {
        self.position >= OBSTACLE_EXIT_POSITION
    }
}

/// Move every obstacle and drop the ones that left the field
pub fn advance_obstacles(obstacles: &mut Vec<Obstacle>, delta_ms: f64) {
    for obstacle in obstacles.iter_mut() {
        obstacle.advance(delta_ms);
    }
    obstacles.retain(|o| !o.is_off_screen());
}

/// Spawn timer whose interval shrinks toward a floor after every spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    interval_ms: f64,
    last_spawn_ms: f64,
}

impl Spawner {
    pub fn new(tuning: &SpawnTuning) -> Self {
        Self {
            interval_ms: tuning.initial_interval_ms.max(tuning.min_interval_ms),
            last_spawn_ms: 0.0,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Whether a spawn is owed at running time `elapsed_ms`
    pub fn is_due(&self, elapsed_ms: f64) -> bool {
        elapsed_ms - self.last_spawn_ms > self.interval_ms
    }

    /// Mark a spawn and tighten the interval
    pub fn record_spawn(&mut self, elapsed_ms: f64, tuning: &SpawnTuning) {
        self.last_spawn_ms = elapsed_ms;
        self.interval_ms = (self.interval_ms * tuning.decay)
            .max(tuning.min_interval_ms)
            .min(self.interval_ms);
    }
}
