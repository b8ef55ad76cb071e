//! Dino Runner entry point
//!
//! Browser: canvas game driven by requestAnimationFrame, played with the
//! keyboard or by a remote decision service (`?ai=<base url>`).
//! Native: headless runner under the AI controller.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{HtmlCanvasElement, HtmlImageElement, Request, RequestInit, RequestMode, Response};

    use dino_runner::ai::service::DECISION_PATH;
    use dino_runner::ai::{DecisionSlot, FailureLog, Snapshot, heuristic_action, parse_decision};
    use dino_runner::assets::{AssetBarrier, AssetReport, SpriteId};
    use dino_runner::control::{Action, KeyEffect, Keyboard};
    use dino_runner::renderer::{CanvasRenderer, build_scene};
    use dino_runner::session::{FrameHandle, FrameScheduler, Session, SessionListener};
    use dino_runner::sim::GamePhase;
    use dino_runner::{DecisionError, GameConfig, HighScores, platform};

    /// Frame scheduling on requestAnimationFrame
    struct RafScheduler {
        game: Weak<RefCell<Game>>,
        next: u64,
        /// Outstanding frame and its browser request id
        pending: Option<(FrameHandle, i32)>,
    }

    impl FrameScheduler for RafScheduler {
        fn schedule(&mut self) -> FrameHandle {
            self.next += 1;
            let handle = FrameHandle(self.next);
            let game = self.game.clone();
            let closure = Closure::once(move |time: f64| {
                if let Some(game) = game.upgrade() {
                    game_loop(&game, handle, time);
                }
            });
            if let Some(window) = web_sys::window() {
                match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
                    Ok(id) => self.pending = Some((handle, id)),
                    Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
                }
            }
            closure.forget();
            handle
        }

        fn cancel(&mut self, handle: FrameHandle) {
            if let Some((pending, id)) = self.pending {
                if pending == handle {
                    if let Some(window) = web_sys::window() {
                        let _ = window.cancel_animation_frame(id);
                    }
                    self.pending = None;
                }
            }
        }
    }

    /// Mirrors session signals into optional HUD elements
    struct Hud;

    impl SessionListener for Hud {
        fn on_score_change(&mut self, score: u64) {
            set_text("score", &score.to_string());
        }

        fn on_speed_change(&mut self, speed: f32) {
            set_text("speed", &format!("{:.1}", speed));
        }

        fn on_game_over(&mut self, final_score: u64, new_best: bool) {
            if new_best {
                set_text("best", &final_score.to_string());
            }
        }
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            el.set_text_content(Some(text));
        }
    }

    /// Remote decision service state
    struct RemoteAi {
        url: String,
        slot: DecisionSlot,
        in_flight: bool,
        failures: FailureLog,
    }

    impl RemoteAi {
        fn new(base_url: &str) -> Self {
            Self {
                url: format!("{}{}", base_url.trim_end_matches('/'), DECISION_PATH),
                slot: DecisionSlot::new(),
                in_flight: false,
                failures: FailureLog::new(),
            }
        }
    }

    struct Game {
        session: Session<RafScheduler>,
        keyboard: Keyboard,
        assets: AssetBarrier,
        report: Option<AssetReport>,
        renderer: CanvasRenderer,
        ai: Option<RemoteAi>,
    }

    impl Game {
        fn render(&self) {
            let scene = build_scene(
                self.session.state(),
                self.session.config(),
                self.report.as_ref(),
                self.session.high_scores().top_score(),
            );
            self.renderer.draw(&scene);
        }

        /// Control action for the next tick
        fn action(&mut self) -> Action {
            match &self.ai {
                Some(ai) => ai.slot.action_at(
                    self.session.state().elapsed_ticks,
                    self.session.config().decision_max_age_ticks,
                ),
                None => self.keyboard.take_action(),
            }
        }

        fn restart(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.session.restart(seed, platform::now_ms());
            self.keyboard.clear();
            if let Some(ai) = self.ai.as_mut() {
                ai.slot.clear();
            }
        }

        /// Claim the decision service for the current snapshot, if it is idle
        fn take_decision_request(&mut self) -> Option<(String, Snapshot, f32)> {
            if !self.session.is_running() {
                return None;
            }
            let snapshot = self.session.snapshot();
            let lookahead = self.session.config().ai_lookahead;
            let ai = self.ai.as_mut()?;
            if ai.in_flight {
                return None;
            }
            ai.in_flight = true;
            Some((ai.url.clone(), snapshot, lookahead))
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Dino Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let config = GameConfig::load();
        // Keep an editable copy in LocalStorage
        config.save();
        canvas.set_width(config.world_width as u32);
        canvas.set_height(config.world_height as u32);
        let renderer = CanvasRenderer::new(&canvas).expect("no 2d context");

        let ai_url = window
            .location()
            .search()
            .ok()
            .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok())
            .and_then(|params| params.get("ai"));
        if let Some(url) = &ai_url {
            log::info!("AI mode, decision service at {}", url);
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new_cyclic(|weak: &Weak<RefCell<Game>>| {
            let scheduler = RafScheduler {
                game: weak.clone(),
                next: 0,
                pending: None,
            };
            // GameConfig::load only returns validated configs
            let mut session = Session::new(config, seed, scheduler, HighScores::load())
                .expect("config rejected after validation");
            session.add_listener(Box::new(Hud));
            RefCell::new(Game {
                session,
                keyboard: Keyboard::new(),
                assets: AssetBarrier::new(SpriteId::ALL),
                report: None,
                renderer,
                ai: ai_url.as_deref().map(RemoteAi::new),
            })
        });

        game.borrow().render();
        load_sprites(&game);
        setup_keyboard(&game);
        setup_auto_pause(&game);

        log::info!("Game initialized with seed: {}", seed);
    }

    fn game_loop(game: &Rc<RefCell<Game>>, handle: FrameHandle, time: f64) {
        let request = {
            let mut g = game.borrow_mut();
            let action = g.action();
            g.session.on_frame(handle, time, action);
            g.render();
            g.take_decision_request()
        };

        if let Some((url, snapshot, lookahead)) = request {
            request_decision(game.clone(), url, snapshot, lookahead);
        }
    }

    fn request_decision(game: Rc<RefCell<Game>>, url: String, snapshot: Snapshot, lookahead: f32) {
        wasm_bindgen_futures::spawn_local(async move {
            let result = fetch_decision(&url, &snapshot).await;
            let mut g = game.borrow_mut();
            if let Some(ai) = g.ai.as_mut() {
                let action = match result {
                    Ok(action) => {
                        ai.failures.record_success("decision service");
                        action
                    }
                    Err(e) => {
                        ai.failures.record_error("decision service", &e);
                        heuristic_action(&snapshot, lookahead)
                    }
                };
                ai.slot.deliver(action, snapshot.tick);
                ai.in_flight = false;
            }
        });
    }

    fn js_error(err: JsValue) -> DecisionError {
        DecisionError::transport(format!("{:?}", err))
    }

    async fn fetch_decision(url: &str, snapshot: &Snapshot) -> Result<Action, DecisionError> {
        let body =
            serde_json::to_string(snapshot).map_err(|e| DecisionError::malformed(e.to_string()))?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(url, &opts).map_err(js_error)?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_error)?;

        let window = web_sys::window().ok_or(DecisionError::Unavailable)?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error)?
            .dyn_into()
            .map_err(js_error)?;
        if !response.ok() {
            return Err(DecisionError::transport(format!("HTTP {}", response.status())));
        }

        let text = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?
            .as_string()
            .ok_or_else(|| DecisionError::malformed("response body is not text"))?;
        parse_decision(&text)
    }

    fn load_sprites(game: &Rc<RefCell<Game>>) {
        for id in SpriteId::ALL {
            let image = match HtmlImageElement::new() {
                Ok(image) => image,
                Err(e) => {
                    log::warn!("Could not create image for {}: {:?}", id.path(), e);
                    sprite_settled(game, id, None);
                    continue;
                }
            };

            {
                let game = game.clone();
                let loaded = image.clone();
                let closure = Closure::<dyn FnMut()>::new(move || {
                    sprite_settled(&game, id, Some(loaded.clone()));
                });
                image.set_onload(Some(closure.as_ref().unchecked_ref()));
                closure.forget();
            }
            {
                let game = game.clone();
                let closure = Closure::<dyn FnMut()>::new(move || {
                    sprite_settled(&game, id, None);
                });
                image.set_onerror(Some(closure.as_ref().unchecked_ref()));
                closure.forget();
            }

            image.set_src(id.path());
        }
    }

    fn sprite_settled(game: &Rc<RefCell<Game>>, id: SpriteId, image: Option<HtmlImageElement>) {
        let mut g = game.borrow_mut();
        let ok = image.is_some();
        if let Some(image) = image {
            g.renderer.add_image(id, image);
        }
        if let Some(report) = g.assets.settle(id, ok) {
            g.report = Some(report);
            // The AI plays without waiting for a key press
            if g.ai.is_some() {
                g.session.start(platform::now_ms());
            }
        }
        g.render();
    }

    fn setup_keyboard(game: &Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                let now = platform::now_ms();
                match g.keyboard.key_down(&event.code()) {
                    KeyEffect::Control => {
                        event.prevent_default();
                        // Sprites must settle before the first run; the AI drives itself
                        if g.report.is_none() || g.ai.is_some() {
                            return;
                        }
                        let phase = g.session.state().phase;
                        match phase {
                            GamePhase::Ready => g.session.start(now),
                            GamePhase::GameOver => g.restart(),
                            GamePhase::Playing | GamePhase::Paused => return,
                        }
                    }
                    KeyEffect::TogglePause => g.session.toggle_pause(now),
                    KeyEffect::Restart => {
                        if g.report.is_none() {
                            return;
                        }
                        g.restart();
                    }
                    KeyEffect::Ignored => return,
                }
                g.render();
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().keyboard.key_up(&event.code());
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: &Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.session.is_running() && g.session.pause() {
                        log::info!("Auto-paused (tab hidden)");
                        g.render();
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside); held keys would otherwise stick
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.keyboard.clear();
                if g.session.is_running() && g.session.pause() {
                    log::info!("Auto-paused (window blur)");
                    g.render();
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::time::Duration;

    use clap::Parser;

    use dino_runner::ai::{
        DecisionSlot, DecisionWorker, FailureLog, HeuristicService, HttpDecisionService,
        decide_or_fallback,
    };
    use dino_runner::consts::REFERENCE_FRAME_MS;
    use dino_runner::session::{FrameHandle, FrameScheduler, Session, SessionListener};
    use dino_runner::{ConfigError, GameConfig, HighScores};

    /// Headless Dino Runner played by the AI controller
    #[derive(Debug, Parser)]
    #[command(author, version, about, long_about = None)]
    pub struct Cli {
        /// JSON config file (missing fields take default values)
        pub config: Option<PathBuf>,
        /// Use the arcade preset instead of the default config
        #[arg(long, conflicts_with = "config")]
        pub arcade: bool,
        #[arg(long, default_value_t = 1)]
        pub seed: u64,
        /// Decision service base URL, e.g. http://localhost:8000
        #[arg(long)]
        pub ai: Option<String>,
        /// Decision service request timeout in milliseconds
        #[arg(long, default_value_t = 200)]
        pub ai_timeout_ms: u64,
        #[arg(long, default_value_t = 100_000)]
        pub max_ticks: u64,
    }

    /// Frames are pulled by the run loop one at a time
    #[derive(Default)]
    struct StepScheduler {
        next: u64,
        pending: Option<FrameHandle>,
    }

    impl FrameScheduler for StepScheduler {
        fn schedule(&mut self) -> FrameHandle {
            self.next += 1;
            let handle = FrameHandle(self.next);
            self.pending = Some(handle);
            handle
        }

        fn cancel(&mut self, handle: FrameHandle) {
            if self.pending == Some(handle) {
                self.pending = None;
            }
        }
    }

    struct Reporter;

    impl SessionListener for Reporter {
        fn on_speed_change(&mut self, speed: f32) {
            log::debug!("Speed now {:.3}", speed);
        }

        fn on_game_over(&mut self, final_score: u64, new_best: bool) {
            println!(
                "Game over: score {}{}",
                final_score,
                if new_best { " (new best)" } else { "" }
            );
        }
    }

    enum Pilot {
        Local {
            service: HeuristicService,
            failures: FailureLog,
        },
        Remote {
            worker: DecisionWorker,
            slot: DecisionSlot,
        },
    }

    pub fn run(cli: Cli) -> Result<(), ConfigError> {
        let config = match (&cli.config, cli.arcade) {
            (Some(path), _) => GameConfig::from_file(path)?,
            (None, true) => GameConfig::arcade(),
            (None, false) => GameConfig::default(),
        };
        let lookahead = config.ai_lookahead;
        let max_age = config.decision_max_age_ticks;

        let mut session =
            Session::new(config, cli.seed, StepScheduler::default(), HighScores::load())?;
        session.add_listener(Box::new(Reporter));

        let mut pilot = match &cli.ai {
            Some(url) => {
                let service =
                    HttpDecisionService::new(url, Duration::from_millis(cli.ai_timeout_ms));
                log::info!("Using decision service at {}", service.url());
                Pilot::Remote {
                    worker: DecisionWorker::spawn(Box::new(service), lookahead),
                    slot: DecisionSlot::new(),
                }
            }
            None => Pilot::Local {
                service: HeuristicService::new(lookahead),
                failures: FailureLog::new(),
            },
        };

        // Fixed reference frames: every tick runs at time scale 1.0
        let frame_ms = REFERENCE_FRAME_MS as f64;
        let mut now = 0.0;
        session.start(now);

        loop {
            let Some(handle) = session.scheduler().pending else {
                break;
            };
            if session.state().elapsed_ticks >= cli.max_ticks {
                session.stop();
                break;
            }
            let snapshot = session.snapshot();
            let action = match &mut pilot {
                Pilot::Local { service, failures } => {
                    decide_or_fallback(service, &snapshot, lookahead, failures).0
                }
                Pilot::Remote { worker, slot } => {
                    worker.drain_into(slot);
                    let action = slot.action_at(snapshot.tick, max_age);
                    worker.submit(snapshot);
                    // Real-time pacing so the service can keep up
                    std::thread::sleep(Duration::from_secs_f64(frame_ms / 1000.0));
                    action
                }
            };
            now += frame_ms;
            session.on_frame(handle, now, action);
        }

        let state = session.state();
        log::info!(
            "Run finished after {} ticks (phase {:?})",
            state.elapsed_ticks,
            state.phase
        );
        println!(
            "Score {} after {} ticks, final speed {:.3}",
            state.score, state.elapsed_ticks, state.speed
        );
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use clap::Parser;

    env_logger::init();
    log::info!("Dino Runner (native) starting...");

    match headless::run(headless::Cli::parse()) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
