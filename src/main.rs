//! Skyfall Dodge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::KeyboardEvent;

    use skyfall_dodge::audio::AudioManager;
    use skyfall_dodge::platform::{is_mute_key, key_intent};
    use skyfall_dodge::renderer::DomRenderer;
    use skyfall_dodge::{Engine, GameEvent, Settings};

    /// Game instance holding all state
    struct Game {
        engine: Engine,
        renderer: DomRenderer,
        audio: AudioManager,
        settings: Settings,
        last_time: f64,
    }

    impl Game {
        /// Run simulation ticks and push the resulting events to the page
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                time - self.last_time
            } else {
                0.0
            };
            self.last_time = time;

            self.engine.advance(dt);
            for event in self.engine.drain_events() {
                log_event(&event);
                self.audio.handle_event(&event);
                self.renderer.apply(&event);
            }
            self.renderer.update(dt);
        }

        /// Start button: first run
        fn start(&mut self) {
            if self.engine.start() {
                self.begin_run();
            }
        }

        /// Restart button: new run after a game over
        fn restart(&mut self) {
            if self.engine.restart() {
                self.begin_run();
            }
        }

        fn begin_run(&mut self) {
            self.renderer.begin_run();
            self.audio.resume();
            self.audio.start_music();
        }

        /// Mute key: flip sound and remember the choice
        fn toggle_mute(&mut self) {
            let muted = self.settings.toggle_mute();
            self.audio.apply_settings(&self.settings);
            self.settings.save();
            log::info!("Sound {}", if muted { "off" } else { "on" });
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(err) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", err).into());
        }

        log::info!("Skyfall Dodge starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - cannot start");
            return;
        };

        let Some(renderer) = DomRenderer::new(document.clone()) else {
            log::error!("Page is missing #game-container or #player");
            return;
        };

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let audio = AudioManager::new(&settings);
        let engine = Engine::new(seed, settings.clone());
        log::info!("Game initialized with seed: {}", engine.state().seed);

        let game = Rc::new(RefCell::new(Game {
            engine,
            renderer,
            audio,
            settings,
            last_time: 0.0,
        }));

        setup_keyboard(&document, game.clone());
        setup_button(&document, "start-button", game.clone(), Game::start);
        setup_button(&document, "restart-button", game.clone(), Game::restart);

        // Start game loop
        request_animation_frame(game);

        log::info!("Skyfall Dodge running!");
    }

    fn setup_keyboard(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        for (event_name, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if let Some((direction, active)) = key_intent(&key, pressed) {
                    game.borrow_mut().engine.set_move_intent(direction, active);
                } else if pressed && !event.repeat() && is_mute_key(&key) {
                    game.borrow_mut().toggle_mute();
                }
            });
            let _ = document
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_button(
        document: &web_sys::Document,
        id: &str,
        game: Rc<RefCell<Game>>,
        action: fn(&mut Game),
    ) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("No #{} button", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            action(&mut game.borrow_mut());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
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

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().update(time);
        request_animation_frame(game);
    }

    fn log_event(event: &GameEvent) {
        if let Ok(json) = serde_json::to_string(event) {
            log::debug!("{}", json);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Skyfall Dodge (native) starting...");
    log::info!("Native mode runs a headless demo - serve the web build to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

    let score = headless::run_demo(seed, 120_000);
    println!("Seed {}: final score {}", seed, score);
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use skyfall_dodge::sim::{GameState, MoveDirection, object_rect, player_rect};
    use skyfall_dodge::{Engine, GameEvent, GamePhase, Settings};

    /// Simulate one run with a simple dodging autopilot; returns the score.
    pub fn run_demo(seed: u64, max_ms: u64) -> u64 {
        let mut engine = Engine::new(seed, Settings::default());
        engine.start();

        // 60 fps frames of ~16.7 ms
        let mut elapsed = 0.0;
        while elapsed < max_ms as f64 {
            let (left, right) = steer(engine.state());
            engine.set_move_intent(MoveDirection::Left, left);
            engine.set_move_intent(MoveDirection::Right, right);
            engine.advance(1000.0 / 60.0);
            elapsed += 1000.0 / 60.0;

            for event in engine.drain_events() {
                match event {
                    GameEvent::ScoreChanged { score } if score % 100 == 0 => {
                        log::info!("Score {}", score);
                    }
                    GameEvent::GameOver { score } => log::info!("Hit! Final score {}", score),
                    _ => {}
                }
            }
            if engine.phase() == GamePhase::GameOver {
                break;
            }
        }
        engine.score()
    }

    /// Move away from the lowest object falling toward the player's column
    fn steer(state: &GameState) -> (bool, bool) {
        let player = player_rect(&state.player, &state.settings);
        let center = (player.left() + player.right()) / 2.0;
        let margin = state.settings.player_width;

        let threat = state
            .objects
            .iter()
            .map(|o| object_rect(o, &state.settings))
            .filter(|r| r.right() > player.left() - margin && r.left() < player.right() + margin)
            .max_by(|a, b| a.bottom().total_cmp(&b.bottom()));

        let Some(threat) = threat else {
            return (false, false);
        };
        let threat_center = (threat.left() + threat.right()) / 2.0;
        let blocked_left = state.player.position <= 0.0;
        let blocked_right = state.player.position >= 100.0;
        let go_left = (threat_center > center && !blocked_left) || blocked_right;
        (go_left, !go_left)
    }
}
