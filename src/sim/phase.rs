//! Phase transitions and player actions
//!
//! Init/GameOver -> Ready -> Playing <-> Paused -> GameOver. Every method is
//! a no-op (returning false) when called from a phase it does not apply to.

use super::clock::RunClock;
use super::obstacle::Spawner;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::{COUNTDOWN_SECS, COUNTDOWN_TICK_MS};
use crate::error::StartError;
use crate::tuning::{Character, StartGate};

/// Who is about to play: what the start gate checks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entrant {
    pub character: Option<Character>,
    /// Username that has already passed the leaderboard check
    pub username: Option<String>,
}

impl GameState {
    /// Start the countdown for a new run
    pub fn start(&mut self, now_ms: f64, entrant: &Entrant) -> Result<(), StartError> {
        match self.phase {
            GamePhase::Init | GamePhase::GameOver => {}
            phase => return Err(StartError::Busy(phase)),
        }
        match self.gate {
            StartGate::Character if entrant.character.is_none() => {
                return Err(StartError::NoCharacter);
            }
            StartGate::Username if entrant.username.is_none() => {
                return Err(StartError::UsernameUnverified);
            }
            _ => {}
        }

        log::info!("{} countdown started", self.variant.title());
        self.phase = GamePhase::Ready;
        self.settings_open = false;
        self.countdown = COUNTDOWN_SECS;
        self.next_countdown_ms = now_ms + COUNTDOWN_TICK_MS;
        self.obstacles.clear();
        self.score = 0;
        self.game_time_secs = 0;
        self.emit(GameEvent::CountdownTick {
            remaining: COUNTDOWN_SECS,
        });
        Ok(())
    }

    /// Countdown finished: reset everything and go
    pub fn begin_run(&mut self, now_ms: f64) {
        self.phase = GamePhase::Playing;
        self.countdown = 0;
        self.score = 0;
        self.game_time_secs = 0;
        self.obstacles.clear();
        self.spawner = Spawner::new(&self.spawn_tuning);
        self.clock = RunClock::started(now_ms);
        self.runner.reset();
        log::info!("{} run started", self.variant.title());
        self.emit(GameEvent::RunStarted);
    }

    pub fn pause(&mut self, now_ms: f64) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::Paused;
        self.clock.pause(now_ms);
        self.runner.rest();
        log::debug!("Paused at score {}", self.score);
        self.emit(GameEvent::Paused);
        true
    }

    /// Resume a paused run; also closes the settings panel
    pub fn resume(&mut self, now_ms: f64) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        if self.settings_open {
            self.settings_open = false;
            self.emit(GameEvent::SettingsClosed);
        }
        self.phase = GamePhase::Playing;
        self.clock.resume(now_ms);
        self.runner.wake();
        log::debug!("Resumed after {:.0} ms paused", self.clock.total_paused_ms());
        self.emit(GameEvent::Resumed);
        true
    }

    /// Open or close the settings panel; a run pauses while it is open
    pub fn toggle_settings(&mut self, now_ms: f64) {
        if self.settings_open {
            if self.phase == GamePhase::Paused {
                self.resume(now_ms);
            } else {
                self.settings_open = false;
                self.emit(GameEvent::SettingsClosed);
            }
        } else {
            self.pause(now_ms);
            self.settings_open = true;
            self.emit(GameEvent::SettingsOpened);
        }
    }

    /// Stop the run and freeze the final score
    pub fn end_run(&mut self) {
        if !matches!(self.phase, GamePhase::Playing | GamePhase::Paused) {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.runner.rest();
        log::info!(
            "{} run over: score {} in {}s",
            self.variant.title(),
            self.score,
            self.game_time_secs
        );
        self.emit(GameEvent::RunEnded { score: self.score });
    }

    /// Jump if allowed; returns whether a jump began
    pub fn jump(&mut self, now_ms: f64) -> bool {
        if self.phase != GamePhase::Playing || self.settings_open {
            return false;
        }
        let elapsed = self.clock.elapsed(now_ms);
        let tuning = self.jump_tuning();
        if self.runner.jump(elapsed, &tuning) {
            self.emit(GameEvent::Jumped);
            true
        } else {
            false
        }
    }

    /// Start sliding (slide variants only); returns whether the pose changed
    pub fn slide(&mut self) -> bool {
        if !self.can_slide || self.phase != GamePhase::Playing || self.settings_open {
            return false;
        }
        if self.runner.is_sliding() || !self.runner.slide() {
            return false;
        }
        self.emit(GameEvent::SlideStarted);
        true
    }

    pub fn unslide(&mut self) {
        if self.runner.is_sliding() {
            self.runner.unslide();
            self.emit(GameEvent::SlideEnded);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::CharacterState;
    use crate::tuning::{Variant, Viewport};

    fn ninja() -> Entrant {
        Entrant {
            character: Some(Character::Frog),
            username: None,
        }
    }

    fn playing(variant: Variant) -> GameState {
        let mut state = GameState::for_variant(variant, Viewport::Desktop, 3);
        state.gate = StartGate::Character;
        state.start(0.0, &ninja()).unwrap();
        state.begin_run(3_000.0);
        state
    }

    #[test]
    fn test_start_checks_gate() {
        let mut state = GameState::for_variant(Variant::NinjaJump, Viewport::Desktop, 1);
        assert_eq!(state.start(0.0, &Entrant::default()), Err(StartError::NoCharacter));
        assert_eq!(state.phase, GamePhase::Init);

        let mut state = GameState::for_variant(Variant::AzaleasRunner, Viewport::Desktop, 1);
        assert_eq!(state.start(0.0, &ninja()), Err(StartError::UsernameUnverified));

        let entrant = Entrant {
            character: None,
            username: Some("rider".into()),
        };
        assert_eq!(state.start(0.0, &entrant), Ok(()));
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.countdown, 3);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::CountdownTick { remaining: 3 }]
        );
    }

    #[test]
    fn test_start_rejected_mid_run() {
        let mut state = playing(Variant::NinjaJump);
        assert_eq!(
            state.start(4_000.0, &ninja()),
            Err(StartError::Busy(GamePhase::Playing))
        );
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = playing(Variant::NinjaJump);
        state.score = 55;
        state.end_run();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.drain_events().contains(&GameEvent::RunEnded { score: 55 }));

        assert!(state.start(10_000.0, &ninja()).is_ok());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut state = playing(Variant::NinjaRunner);
        assert!(state.pause(4_000.0));
        assert!(!state.pause(4_100.0));
        assert_eq!(state.character_state(), CharacterState::Idle);
        assert!(!state.jump(4_200.0));

        assert!(state.resume(9_000.0));
        assert_eq!(state.character_state(), CharacterState::Running);
        assert_eq!(state.clock.elapsed(9_000.0), 1_000.0);
    }

    #[test]
    fn test_settings_panel_pauses_and_blocks_jumps() {
        let mut state = playing(Variant::NinjaJump);
        state.toggle_settings(3_500.0);
        assert!(state.settings_open);
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(!state.jump(3_600.0));

        state.toggle_settings(5_000.0);
        assert!(!state.settings_open);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.jump(5_000.0));
    }

    #[test]
    fn test_resume_closes_settings() {
        let mut state = playing(Variant::NinjaJump);
        state.toggle_settings(3_500.0);
        state.drain_events();
        assert!(state.resume(4_000.0));
        assert!(!state.settings_open);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::SettingsClosed, GameEvent::Resumed]
        );
    }

    #[test]
    fn test_settings_outside_a_run_does_not_pause() {
        let mut state = GameState::for_variant(Variant::NinjaJump, Viewport::Desktop, 1);
        state.toggle_settings(0.0);
        assert!(state.settings_open);
        assert_eq!(state.phase, GamePhase::Init);
        state.toggle_settings(10.0);
        assert!(!state.settings_open);
    }

    #[test]
    fn test_slide_only_on_slide_variants() {
        let mut state = playing(Variant::NinjaRunner);
        assert!(!state.slide());

        let mut state = playing(Variant::AzaleasRunner);
        assert!(state.slide());
        assert!(!state.slide());
        assert_eq!(state.character_state(), CharacterState::Sliding);
        state.unslide();
        assert_eq!(state.character_state(), CharacterState::Running);
    }

    #[test]
    fn test_jump_emits_event_once() {
        let mut state = playing(Variant::NinjaJump);
        state.drain_events();
        assert!(state.jump(3_100.0));
        assert!(!state.jump(3_150.0));
        assert_eq!(state.drain_events(), vec![GameEvent::Jumped]);
    }
}
