//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes from the caller, never from a system clock
//! - Seeded RNG only
//! - Stable iteration order (obstacles by id)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod obstacle;
pub mod phase;
pub mod runner;
pub mod state;
pub mod tick;

pub use clock::RunClock;
pub use collision::{Rect, RunnerHitbox, first_collision, hits, obstacle_hitbox, runner_hitbox};
pub use obstacle::{Lane, Obstacle, Spawner, advance_obstacles};
pub use phase::Entrant;
pub use runner::{CharacterState, Runner};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
