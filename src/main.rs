//! Cash Runner entry point
//!
//! Browser: canvas + DOM host driving the frame loop from
//! `requestAnimationFrame`. Native: headless autopilot runner.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement};

    use cash_runner::consts::*;
    use cash_runner::frame_loop::{FrameLoop, FrameStatus, ManualClock};
    use cash_runner::leaderboard::Leaderboard;
    use cash_runner::render::{RenderError, RenderState};
    use cash_runner::report::{HttpReporter, ReportError, ScoreReporter};
    use cash_runner::session::{ReportOutcome, Session, report_score};
    use cash_runner::settings::Settings;
    use cash_runner::sim::{GameEvent, GamePhase, HeldKeys, MoveKey, TickInput};

    const SERVER_META: &str = "cash-runner-server";
    const API_KEY_META: &str = "cash-runner-api-key";

    /// Game instance holding all state
    struct Game {
        session: Session,
        settings: Settings,
        frame_loop: FrameLoop<ManualClock>,
        render_state: Option<RenderState>,
        reporter: Option<HttpReporter>,
        keys: HeldKeys,
        /// Pending `requestAnimationFrame` handle
        raf_handle: Option<i32>,
        /// Submission in flight
        resolving: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(settings: Settings, reporter: Option<HttpReporter>) -> Self {
            let mut frame_loop = FrameLoop::new(ManualClock::new(0.0));
            frame_loop.scene_mut().spin_coins = !settings.reduced_motion;
            Self {
                session: Session::new(&settings.player_name),
                settings,
                frame_loop,
                render_state: None,
                reporter,
                keys: HeldKeys::default(),
                raf_handle: None,
                resolving: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (59_000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Begin a session. Refuses without a renderer.
        fn begin(&mut self, retry: bool) -> bool {
            if self.render_state.is_none() || self.resolving {
                return false;
            }
            let seed = js_sys::Date::now() as u64;
            let started = if retry {
                self.session.retry(seed)
            } else {
                self.session.start(seed)
            };
            if started {
                self.keys.clear();
                self.frame_times = [0.0; 60];
                self.frame_loop.start();
            }
            started
        }

        /// Tear down the playing view
        fn cancel_frames(&mut self) {
            if let Some(handle) = self.raf_handle.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(handle);
                }
            }
            self.frame_loop.cancel();
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
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

    fn meta_content(document: &Document, name: &str) -> Option<String> {
        document
            .query_selector(&format!("meta[name=\"{name}\"]"))
            .ok()
            .flatten()?
            .get_attribute("content")
            .filter(|v| !v.trim().is_empty())
    }

    fn escape_html(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#39;"),
                _ => out.push(c),
            }
        }
        out
    }

    fn render_leaderboard(board: &Leaderboard) {
        let Some(document) = document() else { return };
        let Some(list) = document.get_element_by_id("leaderboard") else {
            return;
        };
        if board.is_empty() {
            list.set_inner_html("<li class=\"empty\">No scores yet</li>");
            return;
        }
        let rows: String = board
            .entries()
            .iter()
            .map(|e| {
                format!(
                    "<li class=\"{}\"><span class=\"rank\">#{}</span>\
                     <span class=\"name\">{}</span>\
                     <span class=\"cash\">${}</span>\
                     <span class=\"score\">{} pts</span></li>",
                    e.podium().css_class(),
                    e.rank,
                    escape_html(&e.name),
                    e.cash,
                    e.score
                )
            })
            .collect();
        list.set_inner_html(&rows);
    }

    /// Sync menu / HUD / game-over panels with the session phase
    fn update_views(g: &Game) {
        let Some(document) = document() else { return };
        let phase = g.session.phase();
        set_visible(&document, "menu", phase == GamePhase::Menu);
        set_visible(&document, "hud", phase == GamePhase::Playing);
        set_visible(&document, "game-over", phase == GamePhase::GameOver);
        set_visible(&document, "hud-fps", g.settings.show_fps && phase == GamePhase::Playing);
        set_text(&document, "hud-score", &g.session.game.score.to_string());
        set_text(&document, "hud-cash", &format!("${}", g.session.game.cash));

        if phase == GamePhase::GameOver {
            set_text(&document, "final-score", &g.session.game.score.to_string());
            set_text(&document, "final-cash", &format!("${}", g.session.game.cash));
        }
    }

    fn apply_events(events: &[GameEvent]) {
        let Some(document) = document() else { return };
        for event in events {
            if let GameEvent::CoinCollected { score, cash, .. } = event {
                set_text(&document, "hud-score", &score.to_string());
                set_text(&document, "hud-cash", &format!("${cash}"));
            }
        }
    }

    fn show_render_error(err: &RenderError) {
        log::error!("Renderer unavailable: {}", err);
        if let Some(document) = document() {
            set_text(&document, "render-error", &format!("WebGPU unavailable: {err}"));
            set_visible(&document, "render-error", true);
        }
    }

    async fn init_renderer(
        canvas: HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Result<RenderState, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, width, height).await
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Cash Runner starting...");

        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        set_visible(&document, "loading", false);

        // The server may come from stored settings or a deploy-time meta tag,
        // falling back to the page origin. The credential only ever comes
        // from the meta tag.
        let mut settings = Settings::load();
        if let Some(url) = meta_content(&document, SERVER_META) {
            settings.server_url = url;
        }
        settings.api_key = meta_content(&document, API_KEY_META);
        if !settings.has_server() {
            settings.server_url = window.location().origin().unwrap_or_default();
        }
        let reporter = match HttpReporter::from_settings(&settings) {
            Ok(reporter) => Some(reporter),
            Err(e) => {
                log::warn!("Leaderboard disabled: {}", e);
                None
            }
        };

        if let Some(input) = document
            .get_element_by_id("player-name")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(&settings.player_name);
        }

        let game = Rc::new(RefCell::new(Game::new(settings, reporter)));

        // Initialize WebGPU
        match document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        {
            Some(canvas) => {
                let dpr = window.device_pixel_ratio();
                let width = (FIELD_WIDTH as f64 * dpr) as u32;
                let height = (FIELD_HEIGHT as f64 * dpr) as u32;
                canvas.set_width(width);
                canvas.set_height(height);
                match init_renderer(canvas, width, height).await {
                    Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
                    Err(e) => show_render_error(&e),
                }
            }
            None => log::error!("No #canvas element found"),
        }

        setup_key_handlers(game.clone());
        setup_buttons(game.clone());
        setup_teardown(game.clone());

        update_views(&game.borrow());
        render_leaderboard(&game.borrow().session.leaderboard);
        refresh_leaderboard(game);
    }

    /// Initial leaderboard load
    fn refresh_leaderboard(game: Rc<RefCell<Game>>) {
        let Some(reporter) = game.borrow().reporter.clone() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            let result = reporter.fetch_leaderboard().await;
            let mut g = game.borrow_mut();
            g.session.apply_leaderboard(result);
            render_leaderboard(&g.session.leaderboard);
        });
    }

    fn setup_key_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        for (event_name, held) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(key) = MoveKey::from_key_name(&event.key()) {
                    event.prevent_default();
                    game.borrow_mut().keys.set(key, held);
                }
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Drop held keys when focus leaves the page
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().keys.clear();
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn on_click(id: &str, handler: impl FnMut(web_sys::MouseEvent) + 'static) {
        let Some(document) = document() else { return };
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(handler);
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click("start-btn", move |_| start_playing(game.clone(), false));
        }
        {
            let game = game.clone();
            on_click("retry-btn", move |_| start_playing(game.clone(), true));
        }
        on_click("menu-btn", move |_| back_to_menu(game.clone()));
    }

    fn start_playing(game: Rc<RefCell<Game>>, retry: bool) {
        let started = game.borrow_mut().begin(retry);
        if started {
            update_views(&game.borrow());
            request_animation_frame(game);
        }
    }

    /// Submit (if named) then return to the menu
    fn back_to_menu(game: Rc<RefCell<Game>>) {
        let (submission, reporter) = {
            let mut g = game.borrow_mut();
            if g.session.phase() != GamePhase::GameOver || g.resolving {
                return;
            }
            let name = document()
                .and_then(|d| d.get_element_by_id("player-name"))
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                .map(|input| input.value())
                .unwrap_or_default();
            g.session.player_name = name.trim().to_string();
            g.settings.remember_name(&name);
            g.settings.save();
            g.resolving = true;
            (g.session.pending_submission(), g.reporter.clone())
        };

        wasm_bindgen_futures::spawn_local(async move {
            let outcome = match (reporter, submission) {
                (Some(reporter), submission) => report_score(&reporter, submission.as_ref()).await,
                (None, Some(_)) => ReportOutcome::Failed(ReportError::NotConfigured),
                (None, None) => ReportOutcome::Skipped,
            };
            let mut g = game.borrow_mut();
            g.session.resolve_game_over(outcome);
            g.resolving = false;
            update_views(&g);
            render_leaderboard(&g.session.leaderboard);
        });
    }

    fn setup_teardown(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().cancel_frames();
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let next = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(next, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => game.borrow_mut().raf_handle = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let status = {
            let mut g = game.borrow_mut();
            g.raf_handle = None;
            g.frame_loop.clock().set(time);
            let input = TickInput::from_keys(g.keys);

            let Game {
                session,
                frame_loop,
                render_state,
                ..
            } = &mut *g;
            let Some(render_state) = render_state.as_mut() else {
                frame_loop.cancel();
                return;
            };
            let report = frame_loop.frame(&mut session.game, &input, render_state);

            g.track_fps(time);
            apply_events(&report.events);
            if g.settings.show_fps {
                if let Some(document) = document() {
                    set_text(&document, "hud-fps", &format!("{} FPS", g.fps));
                }
            }
            report.status
        };

        match status {
            FrameStatus::Continue => request_animation_frame(game),
            FrameStatus::Stopped => {
                let mut g = game.borrow_mut();
                g.cancel_frames();
                update_views(&g);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use anyhow::Context;
    use clap::Parser;

    use cash_runner::consts::FRAME_MS;
    use cash_runner::frame_loop::{FrameLoop, ManualClock, NullSurface};
    use cash_runner::leaderboard::Leaderboard;
    use cash_runner::report::HttpReporter;
    use cash_runner::session::Session;
    use cash_runner::settings::Settings;
    use cash_runner::sim::{GameEvent, GamePhase, TickInput};

    /// Run a seeded autopilot session without a window
    #[derive(Parser, Debug)]
    #[command(name = "cash-runner")]
    #[command(author, version, about = "Cash Runner headless autopilot runner")]
    pub struct Cli {
        /// RNG seed (random if omitted)
        #[arg(long, short = 's')]
        pub seed: Option<u64>,

        /// Stop after this many frames (60 per second of play)
        #[arg(long, default_value_t = 36_000)]
        pub max_frames: u64,

        /// Name to submit the result under (no submission if omitted)
        #[arg(long, short = 'n')]
        pub name: Option<String>,

        /// Leaderboard server URL [env: CASH_RUNNER_SERVER]
        #[arg(long)]
        pub server: Option<String>,

        /// Leaderboard API key [env: CASH_RUNNER_API_KEY]
        #[arg(long)]
        pub api_key: Option<String>,
    }

    pub fn run(cli: Cli) -> anyhow::Result<()> {
        let mut settings = Settings::load();
        if let Some(server) = cli.server {
            settings.server_url = server;
        }
        if let Some(key) = cli.api_key {
            settings.api_key = Some(key);
        }

        let seed = cli.seed.unwrap_or_else(rand::random);
        let mut session = Session::new(cli.name.as_deref().unwrap_or_default());
        session.start(seed);

        let mut frame_loop = FrameLoop::new(ManualClock::new(0.0));
        frame_loop.start();
        let autopilot = TickInput {
            autopilot: true,
            ..TickInput::default()
        };
        let frames = frame_loop.run_fixed(
            &mut session.game,
            FRAME_MS,
            cli.max_frames,
            &mut NullSurface,
            |_| autopilot,
            |events| {
                for event in events {
                    if let GameEvent::CoinCollected { value, score, .. } = event {
                        log::debug!("+{} (score {})", value, score);
                    }
                }
            },
        );

        if session.phase() == GamePhase::Playing {
            frame_loop.cancel();
            session.abandon();
            log::info!("Frame limit reached");
        }

        println!("Seed:   {}", seed);
        println!("Frames: {} ({:.1}s)", frames, frames as f64 * FRAME_MS / 1000.0);
        println!("Score:  {}", session.game.score);
        println!("Cash:   ${}", session.game.cash);

        if !settings.has_server() {
            log::info!("No leaderboard server configured, skipping submission");
            return Ok(());
        }

        let reporter = HttpReporter::from_settings(&settings).context("Invalid leaderboard configuration")?;
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to create tokio runtime")?;
        rt.block_on(session.finish(&reporter));

        print_leaderboard(&session.leaderboard);
        Ok(())
    }

    fn print_leaderboard(board: &Leaderboard) {
        println!();
        println!("Leaderboard");
        if board.is_empty() {
            println!("  (empty)");
            return;
        }
        for entry in board.entries() {
            println!(
                "  {:>2}. {:<20} {:>8} pts  ${}",
                entry.rank, entry.name, entry.score, entry.cash
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    headless::run(headless::Cli::parse())
}
