//! Debris Dodge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use debris_dodge::audio::{AudioSession, SfxPicker};
    use debris_dodge::consts::MAX_FRAME_MS;
    use debris_dodge::platform::{Button, map_button, map_key};
    use debris_dodge::sim::{GameState, GameStatus, Snapshot, TickInput, tick};
    use debris_dodge::{Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: TickInput,
        last_time: f64,
        sfx: SfxPicker,
        audio: Rc<RefCell<AudioSession>>,
        ctx: CanvasRenderingContext2d,
    }

    impl Game {
        /// Run one simulation tick for this frame
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) as f32).clamp(0.0, MAX_FRAME_MS)
            } else {
                1000.0 / 60.0
            };
            self.last_time = time;

            let input = std::mem::take(&mut self.input);
            tick(&mut self.state, &input, dt);

            let audio = self.audio.borrow();
            for sound in self.sfx.react(&self.state.events) {
                audio.play(sound);
            }
        }

        /// Draw the current frame
        fn render(&self) {
            draw(&self.ctx, self.state.tuning(), &self.state.snapshot());
        }

        fn queue_key(&mut self, key: &str, down: bool, repeat: bool) {
            if let Some(event) = map_key(key, down, repeat, self.state.status) {
                self.input.push(event);
            }
        }

        fn queue_button(&mut self, button: Button) {
            if let Some(event) = map_button(button, self.state.status) {
                self.input.push(event);
            }
        }
    }

    fn draw(ctx: &CanvasRenderingContext2d, tuning: &Tuning, snap: &Snapshot) {
        let w = tuning.width as f64;
        let h = tuning.height as f64;

        // Track and kerbs
        ctx.set_fill_style_str("#3b3b3b");
        ctx.fill_rect(0.0, 0.0, w, h);
        ctx.set_fill_style_str("#c0392b");
        ctx.fill_rect(0.0, 0.0, 8.0, h);
        ctx.fill_rect(w - 8.0, 0.0, 8.0, h);

        ctx.set_fill_style_str("#8bc34a");
        for d in &snap.debris {
            ctx.fill_rect(
                d.x as f64,
                d.y as f64,
                tuning.debris_width as f64,
                tuning.debris_height as f64,
            );
        }

        ctx.set_fill_style_str("#f5d76e");
        ctx.fill_rect(
            snap.player_x as f64,
            h - tuning.player_height as f64,
            tuning.player_width as f64,
            tuning.player_height as f64,
        );

        ctx.set_fill_style_str("#ffffff");
        ctx.set_font("20px sans-serif");
        ctx.set_text_align("left");
        let _ = ctx.fill_text(&format!("Score: {}", snap.score), 16.0, 30.0);

        if snap.status == GameStatus::Over {
            ctx.set_fill_style_str("rgba(0, 0, 0, 0.6)");
            ctx.fill_rect(0.0, 0.0, w, h);
            ctx.set_fill_style_str("#ffffff");
            ctx.set_text_align("center");
            ctx.set_font("36px sans-serif");
            let _ = ctx.fill_text("Game Over!", w / 2.0, h / 2.0 - 20.0);
            ctx.set_font("24px sans-serif");
            let _ = ctx.fill_text(&format!("Score: {}", snap.score), w / 2.0, h / 2.0 + 20.0);
            ctx.set_font("16px sans-serif");
            let _ = ctx.fill_text("Press Enter to restart", w / 2.0, h / 2.0 + 56.0);
        }
    }

    /// Read an optional JSON document embedded in the page
    fn embedded_json(id: &str) -> Option<String> {
        web_sys::window()?
            .document()?
            .get_element_by_id(id)?
            .text_content()
    }

    fn load_tuning() -> Tuning {
        let Some(json) = embedded_json("tuning") else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from page");
                tuning
            }
            Err(e) => {
                log::warn!("Invalid tuning, using defaults: {}", e);
                Tuning::default()
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Debris Dodge starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let tuning = load_tuning();
        let settings = embedded_json("settings")
            .map(|json| Settings::from_json(&json))
            .unwrap_or_default();

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        canvas.set_width(tuning.width as u32);
        canvas.set_height(tuning.height as u32);
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let state = match GameState::with_tuning(seed, tuning) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("Rejected tuning, using defaults: {}", e);
                GameState::new(seed)
            }
        };
        let audio = Rc::new(RefCell::new(AudioSession::init(settings)));
        let game = Rc::new(RefCell::new(Game {
            state,
            input: TickInput::default(),
            last_time: 0.0,
            sfx: SfxPicker::new(seed.wrapping_add(1)),
            audio: audio.clone(),
            ctx,
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_keyboard(game.clone(), audio.clone())?;
        setup_buttons(game.clone(), audio.clone())?;
        setup_page_lifecycle(audio)?;

        request_animation_frame(game);

        log::info!("Debris Dodge running!");
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>, audio: Rc<RefCell<AudioSession>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                audio.borrow_mut().start_music();
                let key = event.key();
                if key.starts_with("Arrow") {
                    event.prevent_default();
                }
                game.borrow_mut().queue_key(&key, true, event.repeat());
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().queue_key(&event.key(), false, false);
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_buttons(game: Rc<RefCell<Game>>, audio: Rc<RefCell<AudioSession>>) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("no document")?;

        // Any pointer press on the page counts as the audio-unlocking gesture
        {
            let audio = audio.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                audio.borrow_mut().start_music();
            });
            document.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            document.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        for (id, button) in [
            ("btn-left", Button::Left),
            ("btn-right", Button::Right),
            ("restart-btn", Button::Restart),
        ] {
            let Some(el) = document.get_element_by_id(id) else {
                log::warn!("Missing #{} button", id);
                continue;
            };

            let game = game.clone();
            let audio = audio.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                // Keep touch from also firing a synthetic mousedown
                event.prevent_default();
                audio.borrow_mut().start_music();
                game.borrow_mut().queue_button(button);
            });
            el.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            el.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Pause audio while the page is hidden. A page kept in the back/forward
    /// cache comes back through `pageshow` with its session intact.
    fn setup_page_lifecycle(audio: Rc<RefCell<AudioSession>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        {
            let audio = audio.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                audio.borrow_mut().suspend();
            });
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                audio.borrow_mut().resume();
            });
            window.add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Debris Dodge (native) starting...");
    log::info!("The playable build is the web version; running a headless autopilot session");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(12345);

    let (score, ticks) = autopilot::run(seed, 60 * 60 * 5);
    println!("seed {}: score {} after {} frames", seed, score, ticks);
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use debris_dodge::audio::SfxPicker;
    use debris_dodge::sim::{GameState, InputEvent, TickInput, tick};

    const FRAME_MS: f32 = 1000.0 / 60.0;
    /// How far above the player band debris counts as a threat
    const LOOKAHEAD: f32 = 200.0;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Steer {
        Left,
        Right,
        Hold,
    }

    /// Steer away from the nearest threatening debris, toward the roomier side
    fn choose(state: &GameState) -> Steer {
        let t = state.tuning();
        let band_top = t.height - t.player_height - LOOKAHEAD;
        let px = state.player.x;

        let threat = state
            .debris
            .iter()
            .filter(|d| d.y + t.debris_height > band_top)
            .filter(|d| d.x < px + t.player_width + 4.0 && d.x + t.debris_width > px - 4.0)
            .max_by(|a, b| a.y.total_cmp(&b.y));

        match threat {
            None => Steer::Hold,
            Some(d) => {
                let room_left = d.x;
                let room_right = t.width - (d.x + t.debris_width);
                if room_left > room_right {
                    Steer::Left
                } else {
                    Steer::Right
                }
            }
        }
    }

    /// Play until game over or `max_frames`; returns (score, frames played)
    pub fn run(seed: u64, max_frames: u64) -> (u64, u64) {
        let mut state = GameState::new(seed);
        let mut sfx = SfxPicker::new(seed);
        let mut steer = Steer::Hold;
        let mut sounds = 0usize;

        for frame in 0..max_frames {
            let next = choose(&state);
            let mut input = TickInput::default();
            if next != steer {
                match steer {
                    Steer::Left => input.push(InputEvent::MoveLeftEnd),
                    Steer::Right => input.push(InputEvent::MoveRightEnd),
                    Steer::Hold => {}
                }
                match next {
                    Steer::Left => input.push(InputEvent::MoveLeftStart),
                    Steer::Right => input.push(InputEvent::MoveRightStart),
                    Steer::Hold => {}
                }
                steer = next;
            }

            tick(&mut state, &input, FRAME_MS);
            sounds += sfx.react(&state.events).len();

            if state.is_over() {
                log::info!("Autopilot hit after {} frames ({} sounds)", frame + 1, sounds);
                return (state.score, frame + 1);
            }
        }

        log::info!("Autopilot survived ({} sounds)", sounds);
        (state.score, max_frames)
    }
}
