//! Data-driven variant configuration
//!
//! Every runner game on the site is the same engine with different numbers.
//! A `Variant` names one of them; `Variant::config()` returns its preset.
//! Numeric tunings are `Copy + Serialize` so the simulation can carry them in
//! its (serializable) state; asset paths stay here as static strings.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::DESKTOP_BREAKPOINT_PX;
use crate::sim::CharacterState;

/// The runner games hosted by the arcade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    AzaleasRunner,
    NinjaJump,
    NinjaRunner,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::AzaleasRunner, Variant::NinjaJump, Variant::NinjaRunner];

    /// URL slug (`/arcade/<slug>`)
    pub fn slug(&self) -> &'static str {
        match self {
            Variant::AzaleasRunner => "azaleas-runner",
            Variant::NinjaJump => "ninja-jump",
            Variant::NinjaRunner => "ninja-runner",
        }
    }

    pub fn from_slug(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "azaleas-runner" | "azaleas" => Some(Variant::AzaleasRunner),
            "ninja-jump" => Some(Variant::NinjaJump),
            "ninja-runner" | "ninja" => Some(Variant::NinjaRunner),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Variant::AzaleasRunner => "Azalea's Runner",
            Variant::NinjaJump => "Ninja Jump",
            Variant::NinjaRunner => "Ninja Runner",
        }
    }

    /// Full preset for this variant
    pub fn config(&self) -> VariantConfig {
        match self {
            Variant::AzaleasRunner => azaleas_runner(),
            Variant::NinjaJump => ninja_jump(),
            Variant::NinjaRunner => ninja_runner(),
        }
    }
}

/// Layout class, chosen from the viewport width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Viewport {
    #[default]
    Desktop,
    Compact,
}

impl Viewport {
    pub fn from_width(width: f32) -> Self {
        if width >= DESKTOP_BREAKPOINT_PX {
            Viewport::Desktop
        } else {
            Viewport::Compact
        }
    }
}

/// Selectable sprite sets for the character-gated variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Character {
    Ninja,
    Frog,
    Pink,
}

impl Character {
    pub const ALL: [Character; 3] = [Character::Ninja, Character::Frog, Character::Pink];

    pub fn as_str(&self) -> &'static str {
        match self {
            Character::Ninja => "ninja",
            Character::Frog => "frog",
            Character::Pink => "pink",
        }
    }
}

/// What a player must provide before a run can start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartGate {
    /// A character must be selected
    Character,
    /// A username must be checked against the leaderboard
    Username,
}

/// Obstacle spawning: the interval decays geometrically toward a floor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnTuning {
    pub initial_interval_ms: f64,
    /// Multiplier applied to the interval after every spawn
    pub decay: f64,
    pub min_interval_ms: f64,
    /// Probability that a new obstacle uses the low lane
    pub low_lane_chance: f64,
}

/// Fixed jump phase durations (no physics integration)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpTuning {
    /// Rising phase, runner shows `Jumping`
    pub rise_ms: f64,
    /// Falling phase, runner shows `Falling` (0 = none)
    pub fall_ms: f64,
    /// Back on the ground but not yet allowed to jump again (0 = none)
    pub recover_ms: f64,
    /// Compact viewports stretch the airborne phases by this factor
    pub compact_scale: f64,
}

impl JumpTuning {
    /// Durations for a viewport
    pub fn for_viewport(&self, viewport: Viewport) -> Self {
        match viewport {
            Viewport::Desktop => *self,
            Viewport::Compact => Self {
                rise_ms: self.rise_ms * self.compact_scale,
                fall_ms: self.fall_ms * self.compact_scale,
                ..*self
            },
        }
    }
}

/// Hitbox fudge factors for the distance + vertical-overlap check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionTuning {
    pub width_scale_desktop: f32,
    pub width_scale_compact: f32,
    /// Fraction of the runner's height that counts vertically
    pub height_scale: f32,
    /// Further height fraction kept while sliding (bottom-anchored)
    pub slide_height_scale: f32,
    /// Combined width is divided by this to get the proximity radius
    pub radius_divisor: f32,
}

impl CollisionTuning {
    pub fn width_scale(&self, viewport: Viewport) -> f32 {
        match viewport {
            Viewport::Desktop => self.width_scale_desktop,
            Viewport::Compact => self.width_scale_compact,
        }
    }
}

/// Play-field geometry in CSS pixels for one viewport
///
/// Vertical distances are measured up from the field's bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub field_width: f32,
    pub field_height: f32,
    /// Horizontal center of the runner's hitbox
    pub runner_x: f32,
    /// Bottom of the runner's hitbox when grounded
    pub runner_ground: f32,
    /// Standing hitbox (width, height)
    pub runner_size: Vec2,
    /// Height gained while `Jumping`
    pub jump_lift: f32,
    /// Rendered obstacle sprite edge length
    pub obstacle_sprite: f32,
    /// Obstacle hitbox edge length, centered in the sprite
    pub obstacle_hitbox: f32,
    pub low_lane_bottom: f32,
    pub high_lane_bottom: f32,
}

/// Layouts for both viewports
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layouts {
    pub desktop: Layout,
    pub compact: Layout,
}

impl Layouts {
    pub fn for_viewport(&self, viewport: Viewport) -> Layout {
        match viewport {
            Viewport::Desktop => self.desktop,
            Viewport::Compact => self.compact,
        }
    }
}

/// Runner sprite lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerSprites {
    /// One fixed sprite per pose
    Fixed {
        standing: &'static str,
        running: &'static str,
        jumping: &'static str,
        sliding: &'static str,
    },
    /// `<dir>/<character>-idle.gif` and `<dir>/<character>-running.gif`
    PerCharacter { dir: &'static str },
}

/// Static asset paths, resolved at render time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assets {
    pub background: &'static str,
    pub obstacle: &'static str,
    pub runner: RunnerSprites,
    pub jump_sound: &'static str,
    pub end_sound: &'static str,
    pub music: &'static str,
}

impl Assets {
    /// Sprite for the runner's current pose
    pub fn runner_sprite(&self, state: CharacterState, character: Option<Character>) -> String {
        match self.runner {
            RunnerSprites::Fixed {
                standing,
                running,
                jumping,
                sliding,
            } => match state {
                CharacterState::Running => running,
                CharacterState::Jumping => jumping,
                CharacterState::Sliding => sliding,
                CharacterState::Idle | CharacterState::Falling => standing,
            }
            .to_string(),
            RunnerSprites::PerCharacter { dir } => {
                let character = character.unwrap_or(Character::Ninja);
                let pose = if state == CharacterState::Running {
                    "running"
                } else {
                    "idle"
                };
                format!("{}/{}-{}.gif", dir, character.as_str(), pose)
            }
        }
    }
}

/// Complete preset for one variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantConfig {
    pub variant: Variant,
    pub gate: StartGate,
    /// Whether S/↓ slides
    pub can_slide: bool,
    pub spawn: SpawnTuning,
    pub jump: JumpTuning,
    pub collision: CollisionTuning,
    pub layouts: Layouts,
    pub assets: Assets,
    /// Remote high score table, if this variant has a leaderboard
    pub leaderboard_table: Option<&'static str>,
}

fn azaleas_runner() -> VariantConfig {
    VariantConfig {
        variant: Variant::AzaleasRunner,
        gate: StartGate::Username,
        can_slide: true,
        spawn: SpawnTuning {
            initial_interval_ms: 2000.0,
            decay: 0.995,
            min_interval_ms: 600.0,
            low_lane_chance: 0.67,
        },
        jump: JumpTuning {
            rise_ms: 275.0,
            fall_ms: 150.0,
            recover_ms: 0.0,
            compact_scale: 1.2,
        },
        collision: CollisionTuning {
            width_scale_desktop: 1.0,
            width_scale_compact: 0.5,
            height_scale: 1.0,
            slide_height_scale: 0.5,
            radius_divisor: 1.5,
        },
        layouts: Layouts {
            desktop: Layout {
                field_width: 960.0,
                field_height: 600.0,
                runner_x: 76.0,
                runner_ground: 150.0,
                runner_size: Vec2::new(40.0, 160.0),
                jump_lift: 120.0,
                obstacle_sprite: 64.0,
                obstacle_hitbox: 50.0,
                low_lane_bottom: 150.0,
                high_lane_bottom: 250.0,
            },
            compact: Layout {
                field_width: 360.0,
                field_height: 500.0,
                runner_x: 56.0,
                runner_ground: 120.0,
                runner_size: Vec2::new(30.0, 80.0),
                jump_lift: 60.0,
                obstacle_sprite: 32.0,
                obstacle_hitbox: 30.0,
                low_lane_bottom: 120.0,
                high_lane_bottom: 170.0,
            },
        },
        assets: Assets {
            background: "/arcade/azaleas-runner/images/runningrider_bg.png",
            obstacle: "/arcade/azaleas-runner/images/azalea.png",
            runner: RunnerSprites::Fixed {
                standing: "/arcade/azaleas-runner/images/runningrider_stand.png",
                running: "/arcade/azaleas-runner/images/runningrider.gif",
                jumping: "/arcade/azaleas-runner/images/runningrider_jump.png",
                sliding: "/arcade/azaleas-runner/images/runningrider_slide.png",
            },
            jump_sound: "/arcade/azaleas-runner/sounds/jump_sound.mp3",
            end_sound: "/arcade/azaleas-runner/sounds/end_game_sound.mp3",
            music: "/arcade/azaleas-runner/sounds/music_zapsplat_easy_cheesy.mp3",
        },
        leaderboard_table: Some("azalea_runner_scores"),
    }
}

fn ninja_jump() -> VariantConfig {
    VariantConfig {
        variant: Variant::NinjaJump,
        gate: StartGate::Character,
        can_slide: false,
        spawn: SpawnTuning {
            initial_interval_ms: 2000.0,
            decay: 0.98,
            min_interval_ms: 200.0,
            low_lane_chance: 0.67,
        },
        jump: JumpTuning {
            rise_ms: 300.0,
            fall_ms: 0.0,
            recover_ms: 50.0,
            compact_scale: 1.0,
        },
        collision: CollisionTuning {
            width_scale_desktop: 0.5,
            width_scale_compact: 0.25,
            height_scale: 0.5,
            slide_height_scale: 1.0,
            radius_divisor: 2.0,
        },
        layouts: Layouts {
            desktop: Layout {
                field_width: 960.0,
                field_height: 580.0,
                runner_x: 64.0,
                runner_ground: 130.0,
                runner_size: Vec2::new(35.0, 60.0),
                jump_lift: 80.0,
                obstacle_sprite: 32.0,
                obstacle_hitbox: 30.0,
                low_lane_bottom: 150.0,
                high_lane_bottom: 125.0,
            },
            compact: Layout {
                field_width: 360.0,
                field_height: 400.0,
                runner_x: 52.0,
                runner_ground: 95.0,
                runner_size: Vec2::new(25.0, 40.0),
                jump_lift: 50.0,
                obstacle_sprite: 32.0,
                obstacle_hitbox: 20.0,
                low_lane_bottom: 90.0,
                high_lane_bottom: 100.0,
            },
        },
        assets: Assets {
            background: "/game/background.jpg",
            obstacle: "/game/objects/saw.png",
            runner: RunnerSprites::PerCharacter { dir: "/game/characters" },
            jump_sound: "/game/sounds/jump.mp3",
            end_sound: "/game/sounds/end.mp3",
            music: "/game/sounds/background.mp3",
        },
        leaderboard_table: None,
    }
}

fn ninja_runner() -> VariantConfig {
    VariantConfig {
        variant: Variant::NinjaRunner,
        gate: StartGate::Character,
        can_slide: false,
        spawn: SpawnTuning {
            initial_interval_ms: 2000.0,
            decay: 0.995,
            min_interval_ms: 600.0,
            low_lane_chance: 0.67,
        },
        jump: JumpTuning {
            rise_ms: 1000.0,
            fall_ms: 0.0,
            recover_ms: 0.0,
            compact_scale: 1.0,
        },
        collision: CollisionTuning {
            width_scale_desktop: 0.5,
            width_scale_compact: 0.25,
            height_scale: 0.5,
            slide_height_scale: 1.0,
            radius_divisor: 2.0,
        },
        layouts: Layouts {
            desktop: Layout {
                field_width: 960.0,
                field_height: 580.0,
                runner_x: 72.0,
                runner_ground: 140.0,
                runner_size: Vec2::new(25.0, 40.0),
                jump_lift: 80.0,
                obstacle_sprite: 64.0,
                obstacle_hitbox: 30.0,
                low_lane_bottom: 190.0,
                high_lane_bottom: 110.0,
            },
            compact: Layout {
                field_width: 360.0,
                field_height: 400.0,
                runner_x: 56.0,
                runner_ground: 105.0,
                runner_size: Vec2::new(25.0, 40.0),
                jump_lift: 50.0,
                obstacle_sprite: 32.0,
                obstacle_hitbox: 20.0,
                low_lane_bottom: 100.0,
                high_lane_bottom: 150.0,
            },
        },
        assets: Assets {
            background: "/game/background.jpg",
            obstacle: "/game/ninja-runner/images/obstacle.png",
            runner: RunnerSprites::PerCharacter { dir: "/game/characters" },
            jump_sound: "/games/ninja-runner/sounds/jump_sound.mp3",
            end_sound: "/games/ninja-runner/sounds/end_game_sound.mp3",
            music: "/games/ninja-runner/sounds/background_music.mp3",
        },
        leaderboard_table: None,
    }
}
