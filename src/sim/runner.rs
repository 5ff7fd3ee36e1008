//! The player's runner: grounded flag, jump phases, slide
//!
//! Jumps are a fixed sequence of timed phases (rise, optional fall, optional
//! recovery). Deadlines are in running time so a pause freezes a jump mid-air.
//! The visible pose is derived from these timers, never stored.

use serde::{Deserialize, Serialize};

use crate::tuning::JumpTuning;

/// Visible pose of the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CharacterState {
    #[default]
    Idle,
    Running,
    Jumping,
    Sliding,
    Falling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum JumpStage {
    Rising,
    Falling,
    /// Landed, but the next jump is still locked out
    Recovering,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Airborne {
    stage: JumpStage,
    /// Running-time deadline for the current stage
    until_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runner {
    grounded: bool,
    jump: Option<Airborne>,
    slide_held: bool,
    /// Not in an active run (menus, pause, game over)
    resting: bool,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            grounded: true,
            jump: None,
            slide_held: false,
            resting: true,
        }
    }
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current pose
    pub fn state(&self) -> CharacterState {
        if self.resting {
            return CharacterState::Idle;
        }
        match self.jump.map(|a| a.stage) {
            Some(JumpStage::Rising) => CharacterState::Jumping,
            Some(JumpStage::Falling) => CharacterState::Falling,
            _ if self.slide_held => CharacterState::Sliding,
            _ => CharacterState::Running,
        }
    }

    /// May start a new jump
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// In the rise or fall phase of a jump
    pub fn is_jumping(&self) -> bool {
        matches!(
            self.jump.map(|a| a.stage),
            Some(JumpStage::Rising | JumpStage::Falling)
        )
    }

    pub fn is_sliding(&self) -> bool {
        self.slide_held
    }

    /// Fresh runner at the start of a run
    pub fn reset(&mut self) {
        *self = Self {
            resting: false,
            ..Self::default()
        };
    }

    /// Stop animating (pause, game over); jump deadlines are kept
    pub fn rest(&mut self) {
        self.resting = true;
    }

    pub fn wake(&mut self) {
        self.resting = false;
    }

    /// Start a jump at running time `elapsed_ms`. Returns false if not grounded.
    pub fn jump(&mut self, elapsed_ms: f64, tuning: &JumpTuning) -> bool {
        if !self.grounded {
            return false;
        }
        self.grounded = false;
        self.slide_held = false;
        self.jump = Some(Airborne {
            stage: JumpStage::Rising,
            until_ms: elapsed_ms + tuning.rise_ms,
        });
        true
    }

    /// Advance jump phases to `elapsed_ms`.
    ///
    /// Returns true on the update where the runner touches down.
    pub fn update(&mut self, elapsed_ms: f64, tuning: &JumpTuning) -> bool {
        let mut landed = false;
        while let Some(airborne) = self.jump {
            if elapsed_ms < airborne.until_ms {
                break;
            }
            self.jump = match airborne.stage {
                JumpStage::Rising if tuning.fall_ms > 0.0 => Some(Airborne {
                    stage: JumpStage::Falling,
                    until_ms: airborne.until_ms + tuning.fall_ms,
                }),
                JumpStage::Rising | JumpStage::Falling => {
                    landed = true;
                    if tuning.recover_ms > 0.0 {
                        Some(Airborne {
                            stage: JumpStage::Recovering,
                            until_ms: airborne.until_ms + tuning.recover_ms,
                        })
                    } else {
                        None
                    }
                }
                JumpStage::Recovering => None,
            };
            if self.jump.is_none() {
                self.grounded = true;
            }
        }
        landed
    }

    /// Duck under high obstacles. Only while grounded and not jumping.
    pub fn slide(&mut self) -> bool {
        if self.is_jumping() || !self.grounded {
            return false;
        }
        self.slide_held = true;
        true
    }

    /// Release the slide; the pose falls back to whatever the timers say
    pub fn unslide(&mut self) {
        self.slide_held = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_phase() -> JumpTuning {
        JumpTuning {
            rise_ms: 275.0,
            fall_ms: 150.0,
            recover_ms: 0.0,
            compact_scale: 1.2,
        }
    }

    fn with_cooldown() -> JumpTuning {
        JumpTuning {
            rise_ms: 300.0,
            fall_ms: 0.0,
            recover_ms: 50.0,
            compact_scale: 1.0,
        }
    }

    fn running() -> Runner {
        let mut runner = Runner::new();
        runner.reset();
        runner
    }

    #[test]
    fn test_jump_phases_and_landing() {
        let tuning = two_phase();
        let mut runner = running();
        assert_eq!(runner.state(), CharacterState::Running);

        assert!(runner.jump(1_000.0, &tuning));
        assert!(!runner.is_grounded());
        assert_eq!(runner.state(), CharacterState::Jumping);

        assert!(!runner.update(1_274.0, &tuning));
        assert_eq!(runner.state(), CharacterState::Jumping);

        assert!(!runner.update(1_275.0, &tuning));
        assert_eq!(runner.state(), CharacterState::Falling);
        assert!(runner.is_jumping());

        assert!(runner.update(1_425.0, &tuning));
        assert!(runner.is_grounded());
        assert_eq!(runner.state(), CharacterState::Running);
    }

    #[test]
    fn test_no_double_jump() {
        let tuning = two_phase();
        let mut runner = running();
        assert!(runner.jump(0.0, &tuning));
        assert!(!runner.jump(10.0, &tuning));
        runner.update(200.0, &tuning);
        assert!(!runner.jump(200.0, &tuning));
        runner.update(425.0, &tuning);
        assert!(runner.jump(425.0, &tuning));
    }

    #[test]
    fn test_recovery_locks_out_jump() {
        let tuning = with_cooldown();
        let mut runner = running();
        runner.jump(0.0, &tuning);

        assert!(runner.update(300.0, &tuning));
        // Visibly running again, but still locked out
        assert_eq!(runner.state(), CharacterState::Running);
        assert!(!runner.is_grounded());
        assert!(!runner.jump(320.0, &tuning));

        assert!(!runner.update(350.0, &tuning));
        assert!(runner.is_grounded());
    }

    #[test]
    fn test_long_frame_runs_through_every_phase() {
        let tuning = two_phase();
        let mut runner = running();
        runner.jump(0.0, &tuning);
        assert!(runner.update(10_000.0, &tuning));
        assert!(runner.is_grounded());
        assert_eq!(runner.state(), CharacterState::Running);
    }

    #[test]
    fn test_slide_only_when_grounded() {
        let tuning = two_phase();
        let mut runner = running();
        assert!(runner.slide());
        assert_eq!(runner.state(), CharacterState::Sliding);
        runner.unslide();
        assert_eq!(runner.state(), CharacterState::Running);

        runner.jump(0.0, &tuning);
        assert!(!runner.slide());
        assert_eq!(runner.state(), CharacterState::Jumping);
    }

    #[test]
    fn test_jump_cancels_slide() {
        let tuning = two_phase();
        let mut runner = running();
        runner.slide();
        assert!(runner.jump(0.0, &tuning));
        assert!(!runner.is_sliding());
        assert_eq!(runner.state(), CharacterState::Jumping);
    }

    #[test]
    fn test_resting_is_idle() {
        let tuning = two_phase();
        let mut runner = running();
        runner.jump(0.0, &tuning);
        runner.rest();
        assert_eq!(runner.state(), CharacterState::Idle);
        runner.wake();
        // The jump was frozen, not cancelled
        assert_eq!(runner.state(), CharacterState::Jumping);
    }
}
