//! Hitboxes and runner/obstacle collision
//!
//! Boxes live in play-field pixels with the origin at the top-left and y
//! pointing down, the same space the page lays sprites out in. The test is a
//! cheap proximity check on box centers followed by a vertical overlap check
//! on the runner's effective height.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::obstacle::{Lane, Obstacle};
use super::runner::CharacterState;
use crate::tuning::{CollisionTuning, Layout};

/// Axis-aligned rectangle (y down)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        left: 0.0,
        top: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Build a rect; non-finite or negative measurements collapse to `ZERO`
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        let finite = left.is_finite() && top.is_finite() && width.is_finite() && height.is_finite();
        if !finite || width < 0.0 || height < 0.0 {
            return Self::ZERO;
        }
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rect of the given size whose bottom edge is centered on (`center_x`, `bottom`)
    pub fn from_bottom_center(center_x: f32, bottom: f32, width: f32, height: f32) -> Self {
        Self::new(center_x - width / 2.0, bottom - height, width, height)
    }

    /// Rect of the given size centered on `center`
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// The runner's box plus the pose that decides how its height counts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunnerHitbox {
    pub rect: Rect,
    pub sliding: bool,
}

/// Runner hitbox for a pose
pub fn runner_hitbox(layout: &Layout, state: CharacterState) -> RunnerHitbox {
    let base = layout.runner_size;
    let (width, height) = match state {
        CharacterState::Jumping | CharacterState::Falling => (base.x * 0.8, base.y * 0.9),
        // Lying down: the standing box turned on its side
        CharacterState::Sliding => (base.y, base.x),
        CharacterState::Idle | CharacterState::Running => (base.x, base.y),
    };
    let lift = if state == CharacterState::Jumping {
        layout.jump_lift
    } else {
        0.0
    };
    let bottom = layout.field_height - layout.runner_ground - lift;
    RunnerHitbox {
        rect: Rect::from_bottom_center(layout.runner_x, bottom, width, height),
        sliding: state == CharacterState::Sliding,
    }
}

/// Obstacle hitbox: a square centered in the sprite
pub fn obstacle_hitbox(layout: &Layout, obstacle: &Obstacle) -> Rect {
    let lane_bottom = match obstacle.lane {
        Lane::Low => layout.low_lane_bottom,
        Lane::High => layout.high_lane_bottom,
    };
    let sprite_right = layout.field_width * (1.0 - obstacle.position / 100.0);
    let sprite_bottom = layout.field_height - lane_bottom;
    let center = Vec2::new(
        sprite_right - layout.obstacle_sprite / 2.0,
        sprite_bottom - layout.obstacle_sprite / 2.0,
    );
    Rect::from_center(center, layout.obstacle_hitbox, layout.obstacle_hitbox)
}

/// Distance gate, then vertical overlap on the runner's effective height
pub fn hits(runner: &RunnerHitbox, obstacle: &Rect, tuning: &CollisionTuning, width_scale: f32) -> bool {
    let rect = &runner.rect;
    if rect.is_empty() || obstacle.is_empty() {
        return false;
    }

    let distance = rect.center().distance(obstacle.center());
    let combined = (rect.width * width_scale + obstacle.width) / tuning.radius_divisor;
    if distance >= combined {
        return false;
    }

    let full_height = rect.height * tuning.height_scale;
    let (top, height) = if runner.sliding {
        // Bottom-anchored: only the lower part of the body is still up
        let height = full_height * tuning.slide_height_scale;
        (rect.bottom() - height, height)
    } else {
        (rect.top + (rect.height - full_height) / 2.0, full_height)
    };
    top < obstacle.bottom() && top + height > obstacle.top
}

/// Id of the first obstacle hitting the runner, if any
pub fn first_collision<I>(
    runner: &RunnerHitbox,
    obstacles: I,
    tuning: &CollisionTuning,
    width_scale: f32,
) -> Option<u32>
where
    I: IntoIterator<Item = (u32, Rect)>,
{
    obstacles
        .into_iter()
        .find(|(_, rect)| hits(runner, rect, tuning, width_scale))
        .map(|(id, _)| id)
}
