//! Arcade Runner entry point
//!
//! Browser: wires the page's DOM to the simulation and runs the frame loop.
//! Native: a headless autopilot run, handy for checking a tuning preset.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Event, EventTarget, HtmlElement, HtmlInputElement, KeyboardEvent};

    use arcade_runner::Settings;
    use arcade_runner::audio::{AudioCue, AudioManager};
    use arcade_runner::consts::MIN_USERNAME_LEN;
    use arcade_runner::highscores::{
        self, HighScores, Pending, RestStore, ScoreRow, SubmitOutcome,
    };
    use arcade_runner::platform::input::Action;
    use arcade_runner::platform::time;
    use arcade_runner::sim::{
        CharacterState, Entrant, GameEvent, GamePhase, GameState, Lane, TickInput, tick,
    };
    use arcade_runner::tuning::{Character, StartGate, Variant, VariantConfig, Viewport};

    /// Game instance holding all state
    struct Game {
        config: VariantConfig,
        state: GameState,
        input: TickInput,
        settings: Settings,
        highscores: HighScores,
        store: Option<Rc<RestStore>>,
        audio: AudioManager,
        /// Obstacle sprites by obstacle id
        sprites: HashMap<u32, HtmlElement>,
        frame_pending: bool,
        submitting: bool,
        /// Game-over message (submit result)
        status: String,
    }

    impl Game {
        fn new(
            config: VariantConfig,
            viewport: Viewport,
            seed: u64,
            settings: Settings,
            store: Option<Rc<RestStore>>,
        ) -> Self {
            Self {
                state: GameState::new(&config, viewport, seed),
                audio: AudioManager::new(&config.assets, settings.audio),
                config,
                input: TickInput::default(),
                settings,
                highscores: HighScores::new(),
                store,
                sprites: HashMap::new(),
                frame_pending: false,
                submitting: false,
                status: String::new(),
            }
        }

        fn entrant(&self) -> Entrant {
            Entrant {
                character: self.settings.character,
                username: self.highscores.verified_username().map(str::to_string),
            }
        }

        fn start(&mut self) {
            let entrant = self.entrant();
            let document = document();
            match self.state.start(time::now_ms(), &entrant) {
                Ok(()) => {
                    self.status.clear();
                    set_text(&document, "start-error", "");
                }
                Err(err) => {
                    log::warn!("Cannot start: {}", err);
                    set_text(&document, "start-error", &err.to_string());
                }
            }
            self.handle_events();
        }

        /// Run one frame of simulation
        fn update(&mut self, time: f64) {
            tick(&mut self.state, &self.input, time);

            // Clear one-shot inputs after processing
            self.input.jump = false;
            self.input.pause = false;
            self.input.toggle_settings = false;

            self.handle_events();
        }

        /// Pause without waiting for a frame (hidden tabs get none)
        fn auto_pause(&mut self, reason: &str) {
            if self.state.pause(time::now_ms()) {
                log::info!("Auto-paused ({})", reason);
                self.handle_events();
                self.render();
            }
        }

        fn handle_events(&mut self) {
            for event in self.state.drain_events() {
                if let Some(cue) = AudioCue::for_event(&event) {
                    self.audio.play(cue);
                }
                match event {
                    GameEvent::RunStarted => {
                        self.highscores.begin_run();
                        self.input.slide = false;
                    }
                    GameEvent::RunEnded { score } => {
                        if score > self.highscores.high_score && self.store.is_none() {
                            self.highscores.high_score = score;
                        }
                    }
                    _ => {}
                }
            }
        }

        /// Persist settings and push audio changes to the elements
        fn settings_changed(&mut self) {
            self.audio.apply(self.settings.audio);
            self.settings.save(self.config.variant);
        }

        fn render(&mut self) {
            let document = document();
            self.render_runner(&document);
            self.render_obstacles(&document);
            self.render_hitboxes(&document);
            self.render_hud(&document);
        }

        fn render_runner(&self, document: &Document) {
            let Some(runner) = element(document, "runner") else {
                return;
            };
            let layout = self.state.layout();
            let pose = self.state.character_state();
            let size = layout.runner_size;
            let (width, height) = if pose == CharacterState::Sliding {
                (size.y, size.x)
            } else {
                (size.x, size.y)
            };
            let lift = if pose == CharacterState::Jumping {
                layout.jump_lift
            } else {
                0.0
            };
            set_px(&runner, "left", layout.runner_x - width / 2.0);
            set_px(&runner, "bottom", layout.runner_ground + lift);
            set_px(&runner, "width", width);
            set_px(&runner, "height", height);

            let src = self
                .config
                .assets
                .runner_sprite(pose, self.settings.character);
            if runner.get_attribute("src").as_deref() != Some(src.as_str()) {
                let _ = runner.set_attribute("src", &src);
            }
        }

        /// Keep one `<img>` per live obstacle
        fn render_obstacles(&mut self, document: &Document) {
            let Some(layer) = document.get_element_by_id("obstacles") else {
                return;
            };
            let layout = self.state.layout();
            let live: HashSet<u32> = self.state.obstacles.iter().map(|o| o.id).collect();
            self.sprites.retain(|id, sprite| {
                let keep = live.contains(id);
                if !keep {
                    sprite.remove();
                }
                keep
            });

            for obstacle in &self.state.obstacles {
                let sprite = match self.sprites.get(&obstacle.id) {
                    Some(sprite) => sprite.clone(),
                    None => {
                        let Some(sprite) = document
                            .create_element("img")
                            .ok()
                            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
                        else {
                            continue;
                        };
                        let _ = sprite.set_attribute("src", self.config.assets.obstacle);
                        let _ = sprite.set_attribute("class", "obstacle");
                        let _ = layer.append_child(&sprite);
                        self.sprites.insert(obstacle.id, sprite.clone());
                        sprite
                    }
                };
                let bottom = match obstacle.lane {
                    Lane::Low => layout.low_lane_bottom,
                    Lane::High => layout.high_lane_bottom,
                };
                let _ = sprite
                    .style()
                    .set_property("right", &format!("{}%", obstacle.position));
                set_px(&sprite, "bottom", bottom);
                set_px(&sprite, "width", layout.obstacle_sprite);
                set_px(&sprite, "height", layout.obstacle_sprite);
            }
        }

        /// Debug outlines (field pixels, top-left origin)
        fn render_hitboxes(&self, document: &Document) {
            let Some(layer) = document.get_element_by_id("hitboxes") else {
                return;
            };
            if !self.settings.show_hitboxes {
                layer.set_inner_html("");
                return;
            }
            let runner = self.state.runner_hitbox().rect;
            let obstacles = self.state.obstacle_hitboxes().into_iter().map(|(_, rect)| rect);
            let html: String = std::iter::once(runner)
                .chain(obstacles)
                .map(|r| {
                    format!(
                        "<div class=\"hitbox\" style=\"left:{:.1}px;top:{:.1}px;width:{:.1}px;height:{:.1}px\"></div>",
                        r.left, r.top, r.width, r.height
                    )
                })
                .collect();
            layer.set_inner_html(&html);
        }

        fn render_hud(&self, document: &Document) {
            let state = &self.state;
            set_text(document, "score", &state.score.to_string());
            set_text(document, "game-time", &format!("{}s", state.game_time_secs));
            set_text(document, "high-score", &self.highscores.high_score.to_string());

            set_visible(document, "countdown", state.phase == GamePhase::Ready);
            set_text(document, "countdown", &state.countdown.to_string());

            set_visible(document, "init-screen", state.phase == GamePhase::Init);
            set_visible(
                document,
                "pause-overlay",
                state.phase == GamePhase::Paused && !state.settings_open,
            );
            set_visible(document, "settings-panel", state.settings_open);
            set_visible(document, "game-over", state.phase == GamePhase::GameOver);
            set_text(document, "final-score", &state.score.to_string());
            let rank = match self.highscores.potential_rank(state.score) {
                Some(rank) if self.store.is_some() && !self.highscores.is_submitted() => {
                    format!("That would rank #{}!", rank)
                }
                _ => String::new(),
            };
            set_text(document, "final-rank", &rank);

            let can_submit = self.store.is_some()
                && state.phase == GamePhase::GameOver
                && state.score > 0
                && !self.highscores.is_submitted()
                && !self.submitting;
            set_visible(document, "submit-btn", can_submit);
            set_text(document, "submit-status", &self.status);
        }

        fn render_boards(&self) {
            let document = document();
            fill_board(&document, "board-all-time", &self.highscores.all_time);
            fill_board(&document, "board-daily", &self.highscores.daily);
            set_text(&document, "high-score", &self.highscores.high_score.to_string());
        }

        fn render_username_check(&self, available: bool) {
            let document = document();
            let message = if self.settings.username.chars().count() < MIN_USERNAME_LEN {
                format!("At least {} characters", MIN_USERNAME_LEN)
            } else if available {
                "Username available".to_string()
            } else {
                "Username taken".to_string()
            };
            set_text(&document, "username-status", &message);
        }

        /// Reflect saved settings in the panel controls
        fn sync_controls(&self) {
            let document = document();
            let audio = self.settings.audio;
            set_input(&document, "username", |i| i.set_value(&self.settings.username));
            set_input(&document, "music-volume", |i| {
                i.set_value(&audio.music_volume.to_string())
            });
            set_input(&document, "sound-volume", |i| {
                i.set_value(&audio.sound_volume.to_string())
            });
            set_input(&document, "hitbox-toggle", |i| {
                i.set_checked(self.settings.show_hitboxes)
            });
            set_text(&document, "music-toggle", if audio.music_on { "Music: on" } else { "Music: off" });
            set_text(&document, "sound-toggle", if audio.sound_on { "Sound: on" } else { "Sound: off" });
            for character in Character::ALL {
                if let Some(el) = document.get_element_by_id(&format!("character-{}", character.as_str())) {
                    let _ = el
                        .class_list()
                        .toggle_with_force("selected", self.settings.character == Some(character));
                }
            }
        }
    }

    fn document() -> Document {
        web_sys::window()
            .and_then(|w| w.document())
            .expect("no document")
    }

    fn element(document: &Document, id: &str) -> Option<HtmlElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    fn set_px(el: &HtmlElement, property: &str, value: f32) {
        let _ = el.style().set_property(property, &format!("{}px", value));
    }

    fn set_input(document: &Document, id: &str, f: impl FnOnce(&HtmlInputElement)) {
        if let Some(input) = document
            .get_element_by_id(id)
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        {
            f(&input);
        }
    }

    fn input_value(event: &Event) -> Option<HtmlInputElement> {
        event.target()?.dyn_into::<HtmlInputElement>().ok()
    }

    /// Rebuild a leaderboard list; text content only, usernames are untrusted
    fn fill_board(document: &Document, id: &str, rows: &[ScoreRow]) {
        let Some(list) = document.get_element_by_id(id) else {
            return;
        };
        list.set_inner_html("");
        let now = time::unix_ms();
        for (rank, row) in rows.iter().enumerate() {
            let Ok(item) = document.create_element("li") else {
                continue;
            };
            let age = time::parse_iso8601(&row.created_at)
                .map(|at| time::relative_age(at, now))
                .unwrap_or_default();
            item.set_text_content(Some(&format!(
                "{}. {} - {} ({})",
                rank + 1,
                row.username,
                row.score,
                age
            )));
            let _ = list.append_child(&item);
        }
    }

    /// Attach an event listener for the lifetime of the page
    fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn listen_id(document: &Document, id: &str, event: &str, handler: impl FnMut(Event) + 'static) {
        match document.get_element_by_id(id) {
            Some(el) => listen(&el, event, handler),
            None => log::debug!("No #{} on this page", id),
        }
    }

    /// Make sure a frame is scheduled
    fn kick(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.frame_pending {
                return;
            }
            g.frame_pending = true;
        }
        request_animation_frame(game.clone());
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Frames only run while something moves; paused and finished runs idle
    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_running = {
            let mut g = game.borrow_mut();
            g.frame_pending = false;
            g.update(time);
            g.render();
            matches!(g.state.phase, GamePhase::Ready | GamePhase::Playing)
        };
        if keep_running {
            kick(&game);
        }
    }

    fn refresh_boards(game: &Rc<RefCell<Game>>) {
        let Some(store) = game.borrow().store.clone() else {
            return;
        };
        let game = game.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match highscores::fetch_boards(&*store, time::unix_ms()).await {
                Ok(boards) => {
                    let mut g = game.borrow_mut();
                    g.highscores.apply(boards);
                    g.render_boards();
                }
                Err(err) => log::error!("Error fetching scores: {}", err),
            }
        });
    }

    fn check_username(game: &Rc<RefCell<Game>>, name: String) {
        let store = game.borrow().store.clone();
        let Some(store) = store else {
            // No leaderboard to check against: any long enough name will do
            let mut g = game.borrow_mut();
            let available = name.chars().count() >= MIN_USERNAME_LEN;
            g.highscores.set_username_check(&name, available);
            g.render_username_check(available);
            return;
        };
        let game = game.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let available = match highscores::username_available(&*store, &name).await {
                Ok(available) => available,
                Err(err) => {
                    log::error!("Error checking username: {}", err);
                    false
                }
            };
            let mut g = game.borrow_mut();
            // Ignore answers for names the player has since edited
            if g.settings.username == name {
                g.highscores.set_username_check(&name, available);
                g.render_username_check(available);
            }
        });
    }

    fn submit_score(game: &Rc<RefCell<Game>>) {
        let (store, row, run) = {
            let mut g = game.borrow_mut();
            let Some(store) = g.store.clone() else {
                return;
            };
            if g.submitting {
                return;
            }
            let (row, run) = match g.highscores.pending(g.state.score) {
                Ok(Pending::Insert { row, run }) => (row, run),
                Ok(Pending::Skip(outcome)) => {
                    if outcome == SubmitOutcome::AlreadySubmitted {
                        g.status = "Score already submitted.".to_string();
                        g.render();
                    }
                    return;
                }
                Err(err) => {
                    g.status = err.to_string();
                    g.render();
                    return;
                }
            };
            g.submitting = true;
            g.status = "Submitting...".to_string();
            g.render();
            (store, row, run)
        };
        let game = game.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = highscores::insert_score(&*store, &row, time::unix_ms()).await;
            let mut g = game.borrow_mut();
            g.submitting = false;
            let status = match result {
                Ok(boards) => {
                    g.highscores.mark_submitted(run, boards);
                    "Score submitted successfully!"
                }
                Err(_) => "Failed to submit score. Please try again.",
            };
            g.status = status.to_string();
            g.render();
            g.render_boards();
        });
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // The page says which game it hosts: <html data-variant="ninja-jump">
        let variant = document
            .document_element()
            .and_then(|el| el.get_attribute("data-variant"))
            .and_then(|slug| Variant::from_slug(&slug))
            .unwrap_or(Variant::AzaleasRunner);
        let config = variant.config();
        log::info!("{} starting...", variant.title());

        let width = window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(1024.0) as f32;
        let viewport = Viewport::from_width(width);

        let store = config.leaderboard_table.and_then(|table| match RestStore::from_env(table) {
            Ok(store) => Some(Rc::new(store)),
            Err(err) => {
                log::warn!("{}, scores stay local", err);
                None
            }
        });

        let settings = Settings::load(variant);
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(config, viewport, seed, settings, store)));
        log::info!("Game initialized with seed: {}", seed);

        if let Some(field) = element(&document, "field") {
            let _ = field
                .style()
                .set_property("background-image", &format!("url({})", config.assets.background));
        }
        set_visible(&document, "slide-btn", config.can_slide);
        set_visible(&document, "username-form", config.gate == StartGate::Username);
        set_visible(&document, "character-select", config.gate == StartGate::Character);
        set_visible(&document, "leaderboard", config.leaderboard_table.is_some());

        setup_keyboard(game.clone(), &window);
        setup_touch_controls(game.clone(), &document);
        setup_buttons(game.clone(), &document);
        setup_settings_panel(game.clone(), &document);
        setup_player_select(game.clone(), &document);
        setup_auto_pause(game.clone(), &window, &document);
        setup_resize(game.clone(), &window);

        {
            let g = game.borrow();
            g.sync_controls();
            g.render_boards();
        }
        game.borrow_mut().render();
        refresh_boards(&game);

        let saved_name = game.borrow().settings.username.clone();
        if !saved_name.is_empty() {
            check_username(&game, saved_name);
        }

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>, window: &web_sys::Window) {
        // Key down
        {
            let game = game.clone();
            listen(window, "keydown", move |event: Event| {
                // Typing a username is not playing
                if input_value(&event).is_some() {
                    return;
                }
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let key = event.key();
                {
                    let mut g = game.borrow_mut();
                    if key == "i" || key == "I" {
                        g.input.autopilot = !g.input.autopilot;
                        log::info!("Autopilot: {}", g.input.autopilot);
                        return;
                    }
                    match Action::from_key(&key) {
                        Some(Action::Jump) => {
                            event.prevent_default();
                            if !event.repeat() {
                                g.input.jump = true;
                            }
                        }
                        Some(Action::Slide) => {
                            event.prevent_default();
                            g.input.slide = true;
                        }
                        Some(Action::Pause) => g.input.pause = true,
                        Some(Action::Settings) => g.input.toggle_settings = true,
                        None => return,
                    }
                }
                kick(&game);
            });
        }

        // Key up
        listen(window, "keyup", move |event: Event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if Action::from_key(&event.key()) == Some(Action::Slide) {
                game.borrow_mut().input.slide = false;
                kick(&game);
            }
        });
    }

    fn setup_touch_controls(game: Rc<RefCell<Game>>, document: &Document) {
        // Tap the field or the jump button to jump
        for (id, event) in [("field", "touchstart"), ("jump-btn", "click")] {
            let game = game.clone();
            listen_id(document, id, event, move |event: Event| {
                if event.type_() == "touchstart" {
                    event.prevent_default();
                }
                game.borrow_mut().input.jump = true;
                kick(&game);
            });
        }

        // Slide button is held like the key
        for (event, held) in [
            ("mousedown", true),
            ("touchstart", true),
            ("mouseup", false),
            ("mouseleave", false),
            ("touchend", false),
        ] {
            let game = game.clone();
            listen_id(document, "slide-btn", event, move |event: Event| {
                event.prevent_default();
                game.borrow_mut().input.slide = held;
                kick(&game);
            });
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>, document: &Document) {
        for id in ["start-btn", "restart-btn"] {
            let game = game.clone();
            listen_id(document, id, "click", move |_event: Event| {
                game.borrow_mut().start();
                kick(&game);
            });
        }

        for id in ["pause-btn", "resume-btn"] {
            let game = game.clone();
            listen_id(document, id, "click", move |_event: Event| {
                game.borrow_mut().input.pause = true;
                kick(&game);
            });
        }

        for id in ["settings-btn", "settings-close"] {
            let game = game.clone();
            listen_id(document, id, "click", move |_event: Event| {
                game.borrow_mut().input.toggle_settings = true;
                kick(&game);
            });
        }

        listen_id(document, "submit-btn", "click", move |_event: Event| {
            submit_score(&game);
        });
    }

    fn setup_settings_panel(game: Rc<RefCell<Game>>, document: &Document) {
        {
            let game = game.clone();
            listen_id(document, "music-toggle", "click", move |_event: Event| {
                let mut g = game.borrow_mut();
                g.settings.audio.toggle_music();
                g.settings_changed();
                if g.state.phase == GamePhase::Playing {
                    g.audio.music_toggled_on();
                }
                g.sync_controls();
            });
        }
        {
            let game = game.clone();
            listen_id(document, "sound-toggle", "click", move |_event: Event| {
                let mut g = game.borrow_mut();
                g.settings.audio.toggle_sound();
                g.settings_changed();
                g.sync_controls();
            });
        }
        for (id, music) in [("music-volume", true), ("sound-volume", false)] {
            let game = game.clone();
            listen_id(document, id, "input", move |event: Event| {
                let Some(volume) = input_value(&event).and_then(|i| i.value().parse::<i32>().ok())
                else {
                    return;
                };
                let mut g = game.borrow_mut();
                if music {
                    g.settings.audio.set_music_volume(volume);
                } else {
                    g.settings.audio.set_sound_volume(volume);
                }
                g.settings_changed();
            });
        }
        listen_id(document, "hitbox-toggle", "change", move |event: Event| {
            let Some(input) = input_value(&event) else {
                return;
            };
            let mut g = game.borrow_mut();
            g.settings.show_hitboxes = input.checked();
            g.settings_changed();
            g.render();
        });
    }

    fn setup_player_select(game: Rc<RefCell<Game>>, document: &Document) {
        for character in Character::ALL {
            let game = game.clone();
            let id = format!("character-{}", character.as_str());
            listen_id(document, &id, "click", move |_event: Event| {
                let mut g = game.borrow_mut();
                g.settings.character = Some(character);
                g.settings_changed();
                g.sync_controls();
                g.render();
            });
        }

        listen_id(document, "username", "input", move |event: Event| {
            let Some(input) = input_value(&event) else {
                return;
            };
            let name = input.value().trim().to_string();
            {
                let mut g = game.borrow_mut();
                g.settings.username = name.clone();
                g.settings_changed();
                // Unverified until the check comes back
                g.highscores.set_username_check(&name, false);
            }
            check_username(&game, name);
        });
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>, window: &web_sys::Window, document: &Document) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            listen(document, "visibilitychange", move |_event: Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().auto_pause("tab hidden");
                }
            });
        }

        // Window blur (click outside)
        listen(window, "blur", move |_event: Event| {
            game.borrow_mut().auto_pause("window blur");
        });
    }

    fn setup_resize(game: Rc<RefCell<Game>>, window: &web_sys::Window) {
        let window_clone = window.clone();
        listen(window, "resize", move |_event: Event| {
            let Some(width) = window_clone.inner_width().ok().and_then(|w| w.as_f64()) else {
                return;
            };
            let mut g = game.borrow_mut();
            g.state.set_viewport(Viewport::from_width(width as f32));
            g.render();
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use arcade_runner::Variant;

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let variant = match args.next() {
        Some(slug) => match Variant::from_slug(&slug) {
            Some(variant) => variant,
            None => {
                let known: Vec<_> = Variant::ALL.iter().map(|v| v.slug()).collect();
                eprintln!("Unknown variant '{}' (expected one of: {})", slug, known.join(", "));
                std::process::exit(2);
            }
        },
        None => Variant::NinjaJump,
    };
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|s| *s > 0.0)
        .unwrap_or(60.0);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| arcade_runner::platform::time::unix_ms() as u64);

    log::info!("{} (native) starting: {}s autopilot run, seed {}", variant.title(), seconds, seed);

    match headless_run(variant, seconds, seed) {
        Some((score, crashed)) => {
            let outcome = if crashed { "crashed" } else { "survived" };
            println!("{}: score {} ({})", variant.slug(), score, outcome);
        }
        None => std::process::exit(1),
    }
}

/// Autopilot run at 60 fps; returns the final score and whether the runner crashed
#[cfg(not(target_arch = "wasm32"))]
fn headless_run(variant: arcade_runner::Variant, seconds: f64, seed: u64) -> Option<(u64, bool)> {
    use arcade_runner::consts::{COUNTDOWN_SECS, COUNTDOWN_TICK_MS};
    use arcade_runner::sim::{Entrant, GameEvent, GamePhase, GameState, TickInput, tick};
    use arcade_runner::{Character, Viewport};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    let mut state = GameState::for_variant(variant, Viewport::Desktop, seed);
    let entrant = Entrant {
        character: Some(Character::Ninja),
        username: Some("autopilot".to_string()),
    };
    if let Err(err) = state.start(0.0, &entrant) {
        log::error!("Cannot start: {}", err);
        return None;
    }

    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let end_ms = COUNTDOWN_SECS as f64 * COUNTDOWN_TICK_MS + seconds * 1000.0;
    let mut now = 0.0;
    let mut crashed = false;
    while now < end_ms && state.phase != GamePhase::GameOver {
        now += FRAME_MS;
        tick(&mut state, &input, now);
        for event in state.drain_events() {
            match event {
                GameEvent::Crashed { obstacle_id } => {
                    crashed = true;
                    log::info!("Crashed into obstacle {} at {}s", obstacle_id, state.game_time_secs);
                }
                GameEvent::ObstacleSpawned { .. } | GameEvent::Jumped | GameEvent::Landed => {
                    log::debug!("{:?}", event)
                }
                other => log::info!("{:?}", other),
            }
        }
    }
    Some((state.score, crashed))
}
