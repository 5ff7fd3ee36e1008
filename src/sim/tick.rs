//! Per-frame simulation tick
//!
//! Core game loop. The caller supplies the frame timestamp; everything else
//! is derived from state, so the same inputs at the same timestamps always
//! produce the same run.

use rand::Rng;

use super::collision::{self, RunnerHitbox};
use super::obstacle::{Lane, Obstacle, advance_obstacles};
use super::runner::CharacterState;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::{COUNTDOWN_TICK_MS, MAX_FRAME_DELTA_MS, SCORE_INTERVAL_MS};

/// How far ahead the autopilot projects obstacles (ms, about one frame)
const AUTOPILOT_LOOKAHEAD_MS: f64 = 16.67;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (W, ArrowUp, tap, button)
    pub jump: bool,
    /// Slide held (S, ArrowDown)
    pub slide: bool,
    /// Pause toggle
    pub pause: bool,
    /// Settings panel toggle
    pub toggle_settings: bool,
    /// Idle/demo mode - AI plays the game
    pub autopilot: bool,
}

/// Advance the game to wall time `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) {
    if input.toggle_settings {
        state.toggle_settings(now_ms);
    }

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.pause(now_ms);
                return;
            }
            GamePhase::Paused => {
                state.resume(now_ms);
            }
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Ready => count_down(state, now_ms),
        GamePhase::Playing => {
            let mut input = input.clone();
            if input.autopilot {
                steer(state, &mut input);
            }

            if input.slide {
                state.slide();
            } else {
                state.unslide();
            }
            if input.jump {
                state.jump(now_ms);
            }

            step(state, now_ms);
        }
        GamePhase::Init | GamePhase::Paused | GamePhase::GameOver => {}
    }
}

/// 3, 2, 1, go
fn count_down(state: &mut GameState, now_ms: f64) {
    while now_ms >= state.next_countdown_ms {
        if state.countdown <= 1 {
            state.begin_run(now_ms);
            return;
        }
        state.countdown -= 1;
        state.next_countdown_ms += COUNTDOWN_TICK_MS;
        state.emit(GameEvent::CountdownTick {
            remaining: state.countdown,
        });
    }
}

/// One frame of a run in progress
fn step(state: &mut GameState, now_ms: f64) {
    let delta = state.clock.advance(now_ms).min(MAX_FRAME_DELTA_MS);
    let elapsed = state.clock.elapsed(now_ms);

    let jump = state.jump_tuning();
    if state.runner.update(elapsed, &jump) {
        state.emit(GameEvent::Landed);
    }

    // Interval crossings, so a dropped frame still scores
    let intervals = (elapsed / SCORE_INTERVAL_MS).floor() as u64;
    if intervals > state.score {
        state.score = intervals;
    }
    state.game_time_secs = (elapsed / 1000.0).floor() as u64;

    advance_obstacles(&mut state.obstacles, delta);

    if state.spawner.is_due(elapsed) {
        let lane = if state.rng.random_bool(state.spawn_tuning.low_lane_chance) {
            Lane::Low
        } else {
            Lane::High
        };
        let id = state.spawn_obstacle(lane);
        let tuning = state.spawn_tuning;
        state.spawner.record_spawn(elapsed, &tuning);
        log::trace!(
            "Spawned obstacle {} ({:?}), next in {:.0} ms",
            id,
            lane,
            state.spawner.interval_ms()
        );
        state.emit(GameEvent::ObstacleSpawned { id, lane });
    }

    let runner = state.runner_hitbox();
    let hit = collision::first_collision(
        &runner,
        state.obstacle_hitboxes(),
        &state.collision,
        state.width_scale(),
    );
    if let Some(obstacle_id) = hit {
        log::debug!("Runner hit obstacle {}", obstacle_id);
        state.emit(GameEvent::Crashed { obstacle_id });
        state.end_run();
    }
}

/// Autopilot: duck or jump when an obstacle is about to reach the runner
fn steer(state: &GameState, input: &mut TickInput) {
    let layout = state.layout();
    let width_scale = state.width_scale();
    let standing = collision::runner_hitbox(&layout, CharacterState::Running);
    let sliding = collision::runner_hitbox(&layout, CharacterState::Sliding);

    let threats: Vec<_> = state
        .obstacles
        .iter()
        .map(|o| {
            let mut ahead: Obstacle = o.clone();
            ahead.advance(AUTOPILOT_LOOKAHEAD_MS);
            collision::obstacle_hitbox(&layout, &ahead)
        })
        .filter(|rect| collision::hits(&standing, rect, &state.collision, width_scale))
        .collect();

    if threats.is_empty() {
        input.slide = false;
        return;
    }

    let duck = |pose: &RunnerHitbox| {
        threats
            .iter()
            .all(|rect| !collision::hits(pose, rect, &state.collision, width_scale))
    };
    if state.can_slide && state.runner.is_grounded() && duck(&sliding) {
        input.slide = true;
    } else {
        input.slide = false;
        input.jump = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Entrant;
    use crate::tuning::{Character, Variant, Viewport};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn entrant() -> Entrant {
        Entrant {
            character: Some(Character::Ninja),
            username: Some("tester".into()),
        }
    }

    /// Start a run and tick through the countdown; returns the wall time
    fn start_run(state: &mut GameState) -> f64 {
        state.start(0.0, &entrant()).unwrap();
        let input = TickInput::default();
        for now in [1_000.0, 2_000.0, 3_000.0] {
            tick(state, &input, now);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        3_000.0
    }

    fn run_frames(state: &mut GameState, input: &TickInput, mut now: f64, frames: usize) -> f64 {
        for _ in 0..frames {
            now += FRAME_MS;
            tick(state, input, now);
        }
        now
    }

    #[test]
    fn test_countdown_then_run() {
        let mut state = GameState::for_variant(Variant::NinjaJump, Viewport::Desktop, 1);
        state.start(0.0, &entrant()).unwrap();
        let input = TickInput::default();

        tick(&mut state, &input, 999.0);
        assert_eq!(state.countdown, 3);
        tick(&mut state, &input, 1_000.0);
        assert_eq!(state.countdown, 2);
        tick(&mut state, &input, 2_000.0);
        assert_eq!(state.countdown, 1);
        assert_eq!(state.phase, GamePhase::Ready);
        tick(&mut state, &input, 3_000.0);
        assert_eq!(state.phase, GamePhase::Playing);

        let events = state.drain_events();
        let ticks: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::CountdownTick { remaining } => Some(*remaining),
                _ => None,
            })
            .collect();
        assert_eq!(ticks, vec![3, 2, 1]);
        assert_eq!(events.last(), Some(&GameEvent::RunStarted));
    }

    #[test]
    fn test_long_stall_during_countdown_starts_once() {
        let mut state = GameState::for_variant(Variant::NinjaJump, Viewport::Desktop, 1);
        state.start(0.0, &entrant()).unwrap();
        tick(&mut state, &TickInput::default(), 60_000.0);
        assert_eq!(state.phase, GamePhase::Playing);
        let started = state
            .drain_events()
            .iter()
            .filter(|e| **e == GameEvent::RunStarted)
            .count();
        assert_eq!(started, 1);
    }

    #[test]
    fn test_score_counts_intervals() {
        let mut state = GameState::for_variant(Variant::NinjaJump, Viewport::Desktop, 1);
        let start = start_run(&mut state);

        tick(&mut state, &TickInput::default(), start + 99.0);
        assert_eq!(state.score, 0);
        tick(&mut state, &TickInput::default(), start + 100.0);
        assert_eq!(state.score, 1);
        // A stalled frame still scores every interval it skipped
        tick(&mut state, &TickInput::default(), start + 1_050.0);
        assert_eq!(state.score, 10);
        assert_eq!(state.game_time_secs, 1);
    }

    #[test]
    fn test_pause_preserves_running_time() {
        let mut state = GameState::for_variant(Variant::NinjaRunner, Viewport::Desktop, 5);
        let start = start_run(&mut state);
        tick(&mut state, &TickInput::default(), start + 500.0);
        assert_eq!(state.score, 5);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, start + 500.0);
        assert_eq!(state.phase, GamePhase::Paused);

        // Nothing moves while paused
        tick(&mut state, &TickInput::default(), start + 20_000.0);
        assert_eq!(state.score, 5);

        tick(&mut state, &pause, start + 30_000.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 5);
        tick(&mut state, &TickInput::default(), start + 30_200.0);
        assert_eq!(state.score, 7);
    }

    #[test]
    fn test_obstacles_spawn_and_move() {
        let mut state = GameState::for_variant(Variant::NinjaJump, Viewport::Desktop, 9);
        let start = start_run(&mut state);
        let input = TickInput::default();

        let now = run_frames(&mut state, &input, start, 150);
        assert_eq!(state.obstacles.len(), 1);
        let first = state.obstacles[0].position;

        run_frames(&mut state, &input, now, 1);
        assert!(state.obstacles[0].position > first);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::ObstacleSpawned { .. }))
        );
    }

    #[test]
    fn test_collision_ends_run() {
        let mut state = GameState::for_variant(Variant::NinjaJump, Viewport::Desktop, 2);
        let start = start_run(&mut state);

        // Drop an obstacle right on top of the runner
        let layout = state.layout();
        let id = state.spawn_obstacle(Lane::Low);
        state.obstacles[0].position =
            100.0 * (1.0 - (layout.runner_x + layout.obstacle_sprite / 2.0) / layout.field_width);

        tick(&mut state, &TickInput::default(), start + FRAME_MS);
        assert_eq!(state.phase, GamePhase::GameOver);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Crashed { obstacle_id: id }));
        assert!(matches!(events.last(), Some(GameEvent::RunEnded { .. })));

        // Frozen after the crash
        let score = state.score;
        tick(&mut state, &TickInput::default(), start + 10_000.0);
        assert_eq!(state.score, score);
    }

    #[test]
    fn test_jump_clears_low_obstacle() {
        let mut state = GameState::for_variant(Variant::NinjaJump, Viewport::Desktop, 2);
        let start = start_run(&mut state);
        let layout = state.layout();
        state.spawn_obstacle(Lane::Low);
        state.obstacles[0].position =
            100.0 * (1.0 - (layout.runner_x + layout.obstacle_sprite / 2.0) / layout.field_width);

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, start + FRAME_MS);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.character_state(), CharacterState::Jumping);
    }

    #[test]
    fn test_slide_follows_held_key() {
        let mut state = GameState::for_variant(Variant::AzaleasRunner, Viewport::Desktop, 2);
        let start = start_run(&mut state);
        let held = TickInput {
            slide: true,
            ..Default::default()
        };
        let now = run_frames(&mut state, &held, start, 2);
        assert_eq!(state.character_state(), CharacterState::Sliding);

        run_frames(&mut state, &TickInput::default(), now, 1);
        assert_eq!(state.character_state(), CharacterState::Running);
    }

    #[test]
    fn test_determinism() {
        // Two states with the same seed produce identical runs
        let mut state1 = GameState::for_variant(Variant::NinjaJump, Viewport::Desktop, 99_999);
        let mut state2 = GameState::for_variant(Variant::NinjaJump, Viewport::Desktop, 99_999);
        let autopilot = TickInput {
            autopilot: true,
            ..Default::default()
        };

        let start1 = start_run(&mut state1);
        let start2 = start_run(&mut state2);
        assert_eq!(start1, start2);
        run_frames(&mut state1, &autopilot, start1, 1_200);
        run_frames(&mut state2, &autopilot, start2, 1_200);

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.obstacles, state2.obstacles);
    }

    #[test]
    fn test_autopilot_survives_first_obstacles() {
        let mut state = GameState::for_variant(Variant::NinjaJump, Viewport::Desktop, 4);
        let start = start_run(&mut state);
        let autopilot = TickInput {
            autopilot: true,
            ..Default::default()
        };
        // Long enough for the first obstacle to cross the whole field
        run_frames(&mut state, &autopilot, start, 600);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.score >= 99);
    }

    #[test]
    fn test_settings_toggle_pauses_run() {
        let mut state = GameState::for_variant(Variant::NinjaJump, Viewport::Desktop, 2);
        let start = start_run(&mut state);
        let toggle = TickInput {
            toggle_settings: true,
            ..Default::default()
        };
        tick(&mut state, &toggle, start + 200.0);
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(state.settings_open);

        tick(&mut state, &toggle, start + 5_000.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.clock.elapsed(start + 5_000.0), 200.0);
    }
}
