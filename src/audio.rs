//! Audio: music/sound toggles and browser playback
//!
//! The game never talks to the speakers directly. Simulation events map to
//! `AudioCue`s, and the `AudioManager` (wasm only) plays them through
//! `<audio>` elements honoring the player's `AudioState`.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Player-controlled audio preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioState {
    pub music_on: bool,
    pub sound_on: bool,
    /// 0..=100
    pub music_volume: u8,
    /// 0..=100
    pub sound_volume: u8,
}

impl Default for AudioState {
    fn default() -> Self {
        Self {
            music_on: true,
            sound_on: true,
            music_volume: 50,
            sound_volume: 50,
        }
    }
}

impl AudioState {
    pub fn set_music_volume(&mut self, volume: i32) {
        self.music_volume = volume.clamp(0, 100) as u8;
    }

    pub fn set_sound_volume(&mut self, volume: i32) {
        self.sound_volume = volume.clamp(0, 100) as u8;
    }

    pub fn toggle_music(&mut self) {
        self.music_on = !self.music_on;
    }

    pub fn toggle_sound(&mut self) {
        self.sound_on = !self.sound_on;
    }

    /// Element volume for the music track (0.0 - 1.0)
    pub fn music_gain(&self) -> f64 {
        self.music_volume.min(100) as f64 / 100.0
    }

    /// Element volume for sound effects (0.0 - 1.0)
    pub fn sound_gain(&self) -> f64 {
        self.sound_volume.min(100) as f64 / 100.0
    }
}

/// Something to play, stop or pause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Jump,
    EndGame,
    /// Start the track from the beginning
    MusicStart,
    /// Continue the track where it paused
    MusicResume,
    MusicPause,
    /// Pause and rewind
    MusicStop,
}

impl AudioCue {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jumped => Some(AudioCue::Jump),
            GameEvent::Crashed { .. } => Some(AudioCue::EndGame),
            GameEvent::RunStarted => Some(AudioCue::MusicStart),
            GameEvent::Resumed => Some(AudioCue::MusicResume),
            GameEvent::Paused => Some(AudioCue::MusicPause),
            GameEvent::RunEnded { .. } => Some(AudioCue::MusicStop),
            _ => None,
        }
    }

    /// Whether this cue makes a sound under `state`. Stopping is always allowed.
    pub fn audible(&self, state: &AudioState) -> bool {
        match self {
            AudioCue::Jump | AudioCue::EndGame => state.sound_on,
            AudioCue::MusicStart | AudioCue::MusicResume => state.music_on,
            AudioCue::MusicPause | AudioCue::MusicStop => true,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::AudioManager;

#[cfg(target_arch = "wasm32")]
mod browser {
    use wasm_bindgen_futures::JsFuture;
    use web_sys::HtmlAudioElement;

    use super::{AudioCue, AudioState};
    use crate::tuning::Assets;

    /// One `<audio>` element per sound, as the page preloads them
    pub struct AudioManager {
        jump: Option<HtmlAudioElement>,
        end_game: Option<HtmlAudioElement>,
        music: Option<HtmlAudioElement>,
        state: AudioState,
    }

    fn load(src: &str, looping: bool) -> Option<HtmlAudioElement> {
        match HtmlAudioElement::new_with_src(src) {
            Ok(element) => {
                element.set_loop(looping);
                Some(element)
            }
            Err(err) => {
                log::warn!("Failed to create audio element for {}: {:?}", src, err);
                None
            }
        }
    }

    fn play(element: &HtmlAudioElement) {
        // Autoplay policies reject play() before the first user gesture
        match element.play() {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                if let Err(err) = JsFuture::from(promise).await {
                    log::warn!("Error playing audio: {:?}", err);
                }
            }),
            Err(err) => log::warn!("Error playing audio: {:?}", err),
        }
    }

    impl AudioManager {
        pub fn new(assets: &Assets, state: AudioState) -> Self {
            let mut manager = Self {
                jump: load(assets.jump_sound, false),
                end_game: load(assets.end_sound, false),
                music: load(assets.music, true),
                state,
            };
            manager.apply(state);
            manager
        }

        /// Push new preferences to the elements
        pub fn apply(&mut self, state: AudioState) {
            let was_on = self.state.music_on;
            self.state = state;
            for sound in [&self.jump, &self.end_game].into_iter().flatten() {
                sound.set_volume(state.sound_gain());
                sound.set_muted(!state.sound_on);
            }
            if let Some(music) = &self.music {
                music.set_volume(state.music_gain());
                music.set_muted(!state.music_on);
                if was_on && !state.music_on {
                    music.pause().ok();
                }
            }
        }

        /// Turning music back on mid-run continues the track
        pub fn music_toggled_on(&self) {
            if let Some(music) = &self.music {
                if self.state.music_on && music.paused() {
                    play(music);
                }
            }
        }

        pub fn play(&self, cue: AudioCue) {
            if !cue.audible(&self.state) {
                return;
            }
            match cue {
                AudioCue::Jump | AudioCue::EndGame => {
                    let element = if cue == AudioCue::Jump {
                        &self.jump
                    } else {
                        &self.end_game
                    };
                    if let Some(sound) = element {
                        sound.set_current_time(0.0);
                        play(sound);
                    }
                }
                AudioCue::MusicStart => {
                    if let Some(music) = &self.music {
                        music.set_current_time(0.0);
                        play(music);
                    }
                }
                AudioCue::MusicResume => {
                    if let Some(music) = &self.music {
                        play(music);
                    }
                }
                AudioCue::MusicPause => {
                    if let Some(music) = &self.music {
                        music.pause().ok();
                    }
                }
                AudioCue::MusicStop => {
                    if let Some(music) = &self.music {
                        music.pause().ok();
                        music.set_current_time(0.0);
                    }
                }
            }
        }
    }
}
