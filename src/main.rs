//! KwmeJump entry point
//!
//! Browser: canvas, keyboard and the requestAnimationFrame loop.
//! Native: a headless autopilot session, useful for checking generation.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlInputElement, KeyboardEvent};

    use kwme_jump::consts::SIM_DT;
    use kwme_jump::input::{self, Intent};
    use kwme_jump::leaderboard::MAX_DISPLAYED;
    use kwme_jump::platform::{BrowserStore, FetchTransport};
    use kwme_jump::renderer::CanvasRenderer;
    use kwme_jump::sim::GameEvent;
    use kwme_jump::{Game, Leaderboard, LeaderboardEntry, ScoreBoard, Settings};

    type Board = Leaderboard<FetchTransport, BrowserStore>;

    /// Everything the browser loop owns
    struct App {
        game: Game,
        renderer: CanvasRenderer,
        settings: Settings,
        board: Board,
        last_time: f64,
        /// A submission is in flight or already done for this game over
        submitted: bool,
    }

    impl App {
        fn update(&mut self, time: f64) -> bool {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            let events = self.game.frame(dt);
            self.game.render(&mut self.renderer);
            events
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. }))
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("KwmeJump starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let renderer = match CanvasRenderer::new(&canvas) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("Canvas unavailable: {}", e);
                return;
            }
        };

        let settings = Settings::load(&BrowserStore);
        let board = Leaderboard::connect(
            &settings.leaderboard_config(),
            Some(FetchTransport),
            BrowserStore,
        );
        if let Leaderboard::Remote(remote) = &board {
            let remote = remote.clone();
            wasm_bindgen_futures::spawn_local(async move {
                // Failure is only logged; the board stays online
                let _ = remote.probe().await;
            });
        }

        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);
        let game = Game::new(seed, settings.tuning.clone());

        if let Some(input) = username_input() {
            input.set_value(&settings.username);
        }

        let app = Rc::new(RefCell::new(App {
            game,
            renderer,
            settings,
            board,
            last_time: 0.0,
            submitted: false,
        }));

        refresh_leaderboard(app.clone());
        setup_keyboard(app.clone());
        request_animation_frame(app);

        log::info!("KwmeJump running!");
    }

    fn username_input() -> Option<HtmlInputElement> {
        web_sys::window()?
            .document()?
            .get_element_by_id("username-input")?
            .dyn_into()
            .ok()
    }

    /// Fetch the top scores and show them in `#leaderboard`
    fn refresh_leaderboard(app: Rc<RefCell<App>>) {
        let board = app.borrow().board.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let entries = board.fetch_top(MAX_DISPLAYED).await;
            show_leaderboard(&entries);
        });
    }

    fn show_leaderboard(entries: &[LeaderboardEntry]) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(el) = document.get_element_by_id("leaderboard") else {
            log::info!("Leaderboard: {:?}", entries);
            return;
        };
        let text = if entries.is_empty() {
            "No scores yet".to_string()
        } else {
            entries
                .iter()
                .enumerate()
                .map(|(i, e)| format!("{}. {} {}", i + 1, e.username, e.score))
                .collect::<Vec<_>>()
                .join("\n")
        };
        el.set_text_content(Some(&text));
    }

    /// Submit the final score under the typed (or remembered) name
    fn submit_score(app: Rc<RefCell<App>>) {
        let (mut board, username, score) = {
            let mut a = app.borrow_mut();
            let Some(score) = a.game.final_score() else {
                return;
            };
            if a.submitted {
                return;
            }

            let username = username_input()
                .map(|input| input.value())
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| a.settings.username.clone());
            if username.trim().is_empty() {
                a.game.set_notice("Please enter a name");
                return;
            }

            a.submitted = true;
            a.game.set_notice("Submitting...");
            if a.settings.username != username.trim() {
                a.settings.username = username.trim().to_string();
                a.settings.save(&mut BrowserStore);
            }
            (a.board.clone(), username, score)
        };

        wasm_bindgen_futures::spawn_local(async move {
            let outcome = board.submit(&username, score).await;
            app.borrow_mut().game.set_notice(outcome.message);
            refresh_leaderboard(app);
        });
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let phase = app.borrow().game.phase();
                let Some(intent) = input::key_down(&event.key(), phase) else {
                    return;
                };
                match intent {
                    Intent::Start => {
                        event.prevent_default();
                        app.borrow_mut().game.start();
                    }
                    Intent::Jump => {
                        event.prevent_default();
                        app.borrow_mut().game.jump();
                    }
                    Intent::Left(pressed) => app.borrow_mut().game.move_left(pressed),
                    Intent::Right(pressed) => app.borrow_mut().game.move_right(pressed),
                    Intent::Submit => submit_score(app.clone()),
                    // Typing an R into the name field isn't a restart
                    Intent::Restart if !is_typing() => {
                        let mut a = app.borrow_mut();
                        a.game.restart();
                        a.submitted = false;
                    }
                    Intent::Restart => {}
                    Intent::ToggleAutopilot => {
                        let mut a = app.borrow_mut();
                        a.game.autopilot = !a.game.autopilot;
                        log::info!("Autopilot: {}", a.game.autopilot);
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match input::key_up(&event.key()) {
                    Some(Intent::Left(pressed)) => app.borrow_mut().game.move_left(pressed),
                    Some(Intent::Right(pressed)) => app.borrow_mut().game.move_right(pressed),
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Whether the username field has focus
    fn is_typing() -> bool {
        let active = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.active_element());
        matches!(active, Some(el) if el.id() == "username-input")
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let game_over = app.borrow_mut().update(time);
        if game_over {
            refresh_leaderboard(app.clone());
        }
        request_animation_frame(app);
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

/// Headless autopilot session: `kwme-jump [seed]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use kwme_jump::consts::SIM_DT;
    use kwme_jump::leaderboard::{LocalScoreBoard, MAX_DISPLAYED};
    use kwme_jump::platform::MemoryStore;
    use kwme_jump::{Game, GamePhase, LeaderboardEntry, Settings};

    /// Ten simulated minutes
    const MAX_FRAMES: u32 = 36_000;

    env_logger::init();
    log::info!("KwmeJump (native) starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let settings = Settings::load(&MemoryStore::new());

    let mut game = Game::new(seed, settings.tuning);
    game.autopilot = true;
    game.start();

    let mut frames = 0;
    while game.phase() == GamePhase::Playing && frames < MAX_FRAMES {
        game.frame(SIM_DT);
        frames += 1;
    }

    let score = game.final_score().unwrap_or_else(|| game.score());
    log::info!(
        "Autopilot finished after {} frames with score {} ({} platforms live, {} faulted frames)",
        frames,
        score,
        game.world().platforms.len(),
        game.faulted_frames()
    );

    let mut board = LocalScoreBoard::new(MemoryStore::new());
    let entry = LeaderboardEntry {
        username: "autopilot".to_string(),
        score,
    };
    match board.record(entry) {
        Ok(rank) => log::info!("Recorded locally at rank {:?}", rank),
        Err(e) => log::error!("Failed to record score: {}", e),
    }
    for (i, entry) in board.load().top(MAX_DISPLAYED).iter().enumerate() {
        println!("{:>2}. {} {}", i + 1, entry.username, entry.score);
    }
}
