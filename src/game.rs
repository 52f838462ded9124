//! Game state machine
//!
//! START → PLAYING → GAMEOVER → START. The host owns the frame loop and calls
//! [`Game::frame`] once per display refresh; input intents arrive in between.

use crate::renderer::{FrameView, RenderSink};
use crate::sim::{GameEvent, GameWorld, TickInput, tick};
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, waiting for a start intent
    Start,
    /// Simulation running
    Playing,
    /// Simulation frozen, leaderboard shown
    GameOver,
}

/// Held steering keys; the most recent press wins while both are down
#[derive(Debug, Clone, Copy, Default)]
struct Steering {
    left: bool,
    right: bool,
    last: f32,
}

impl Steering {
    fn value(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            (true, true) => self.last,
            (false, false) => 0.0,
        }
    }
}

/// Game instance holding all session state
pub struct Game {
    phase: GamePhase,
    world: GameWorld,
    tuning: Tuning,
    base_seed: u64,
    sessions: u64,
    steering: Steering,
    /// Jump intent for the next tick only
    pending_jump: bool,
    /// Demo mode: the autopilot steers
    pub autopilot: bool,
    final_score: Option<u64>,
    /// Transient game-over message (e.g. leaderboard submit result)
    notice: Option<String>,
    /// Ticks that failed and were skipped
    faulted_frames: u64,
}

impl Game {
    /// A tuning that fails validation is replaced by the defaults
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.or_default();
        Self {
            phase: GamePhase::Start,
            // Backdrop for the title screen
            world: GameWorld::new(seed, tuning.clone()),
            tuning,
            base_seed: seed,
            sessions: 0,
            steering: Steering::default(),
            pending_jump: false,
            autopilot: false,
            final_score: None,
            notice: None,
            faulted_frames: 0,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn world(&self) -> &GameWorld {
        &self.world
    }

    pub fn score(&self) -> u64 {
        self.world.score
    }

    /// Score of the session that just ended (GAMEOVER only)
    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Show a message on the game-over screen
    pub fn set_notice(&mut self, notice: impl Into<String>) {
        if self.phase == GamePhase::GameOver {
            self.notice = Some(notice.into());
        }
    }

    pub fn faulted_frames(&self) -> u64 {
        self.faulted_frames
    }

    /// START → PLAYING: fresh world, player at spawn, score zeroed
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Start {
            return false;
        }
        self.sessions += 1;
        let seed = self
            .base_seed
            .wrapping_add(self.sessions.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.world = GameWorld::new(seed, self.tuning.clone());
        self.steering = Steering::default();
        self.pending_jump = false;
        self.final_score = None;
        self.notice = None;
        self.phase = GamePhase::Playing;
        log::info!("Session {} started with seed {}", self.sessions, seed);
        true
    }

    /// GAMEOVER → START: drop the game-over screen state
    pub fn restart(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        self.final_score = None;
        self.notice = None;
        self.world.score = 0;
        self.phase = GamePhase::Start;
        true
    }

    pub fn move_left(&mut self, pressed: bool) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.steering.left = pressed;
        if pressed {
            self.steering.last = -1.0;
        }
    }

    pub fn move_right(&mut self, pressed: bool) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.steering.right = pressed;
        if pressed {
            self.steering.last = 1.0;
        }
    }

    /// Request the double jump on the next tick
    pub fn jump(&mut self) {
        if self.phase == GamePhase::Playing {
            self.pending_jump = true;
        }
    }

    /// Run one frame of `elapsed` seconds; returns what happened
    ///
    /// A failing tick is logged and skipped so the host loop keeps running.
    pub fn frame(&mut self, elapsed: f32) -> Vec<GameEvent> {
        if self.phase != GamePhase::Playing {
            return Vec::new();
        }

        let dt = self.tuning.time_step.step(elapsed);
        let input = TickInput {
            steer: self.steering.value(),
            jump: std::mem::take(&mut self.pending_jump),
            autopilot: self.autopilot,
        };

        match tick(&mut self.world, &input, dt) {
            Ok(outcome) => {
                if outcome.game_over {
                    self.phase = GamePhase::GameOver;
                    self.final_score = Some(self.world.score);
                    log::info!(
                        "Game over: score {} after {} ticks",
                        self.world.score,
                        self.world.time_ticks
                    );
                }
                outcome.events
            }
            Err(err) => {
                self.faulted_frames += 1;
                log::error!("Tick failed, frame skipped: {}", err);
                Vec::new()
            }
        }
    }

    /// Read-only view for the render sink
    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            phase: self.phase,
            player: &self.world.player,
            platforms: &self.world.platforms,
            items: &self.world.items,
            clouds: &self.world.clouds,
            score: self.world.score,
            notice: self.notice.as_deref(),
        }
    }

    pub fn render(&self, sink: &mut impl RenderSink) {
        sink.render(&self.view());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SCREEN_HEIGHT;
    use crate::sim::Player;
    use crate::tuning::TimeStep;
    use glam::Vec2;

    const DT: f32 = 0.016;

    /// Remove every platform so the player falls out of the world
    fn play_until_game_over(game: &mut Game) -> Vec<GameEvent> {
        game.world.platforms.clear();
        for _ in 0..1000 {
            let events = game.frame(DT);
            if game.phase() == GamePhase::GameOver {
                return events;
            }
        }
        panic!("never reached game over");
    }

    #[test]
    fn test_start_to_playing() {
        let mut game = Game::new(1, Tuning::default());
        assert_eq!(game.phase(), GamePhase::Start);
        assert!(game.frame(DT).is_empty());

        assert!(game.start());
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.world().player.pos, Player::spawn_point());
        assert_eq!(game.score(), 0);

        // Already playing
        assert!(!game.start());
        assert!(!game.restart());
    }

    #[test]
    fn test_game_over_freezes_simulation() {
        let mut game = Game::new(1, Tuning::default());
        game.start();
        let events = play_until_game_over(&mut game);
        assert!(matches!(events.last(), Some(GameEvent::GameOver { .. })));
        assert_eq!(game.final_score(), Some(game.score()));

        let frozen = game.world().player.pos;
        let ticks = game.world().time_ticks;
        game.jump();
        game.move_left(true);
        assert!(game.frame(DT).is_empty());
        assert_eq!(game.world().player.pos, frozen);
        assert_eq!(game.world().time_ticks, ticks);
    }

    #[test]
    fn test_restart_cycle_resets_session() {
        let mut game = Game::new(1, Tuning::default());
        game.start();
        game.world.score = 1234;
        play_until_game_over(&mut game);
        game.set_notice("Score saved locally.");
        assert_eq!(game.notice(), Some("Score saved locally."));

        assert!(game.restart());
        assert_eq!(game.phase(), GamePhase::Start);
        assert_eq!(game.notice(), None);
        assert_eq!(game.final_score(), None);
        assert_eq!(game.score(), 0);

        assert!(game.start());
        assert_eq!(game.score(), 0);
        assert_eq!(game.world().camera_y, 0.0);
        assert_eq!(game.world().player.pos, Vec2::new(215.0, SCREEN_HEIGHT - 150.0));
        assert_eq!(game.world().player.vel.y, -550.0);
        assert!(!game.world().platforms.is_empty());
    }

    #[test]
    fn test_sessions_get_fresh_worlds() {
        let mut game = Game::new(1, Tuning::default());
        game.start();
        let first = game.world().platforms.clone();
        play_until_game_over(&mut game);
        game.restart();
        game.start();
        assert_ne!(game.world().platforms, first);
    }

    #[test]
    fn test_failed_tick_is_skipped() {
        let mut game = Game::new(1, Tuning::default());
        game.start();

        assert!(game.frame(f32::NAN).is_empty());
        assert_eq!(game.faulted_frames(), 1);
        assert_eq!(game.phase(), GamePhase::Playing);

        // The loop keeps going
        game.frame(DT);
        assert_eq!(game.world().time_ticks, 1);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut game = Game::new(1, Tuning::default());
        game.start();
        game.frame(5.0);
        // One clamped 0.1s step from spawn: 650 - 550 * 0.1
        assert!((game.world().player.pos.y - 595.0).abs() < 0.001);
    }

    #[test]
    fn test_invalid_tuning_still_plays() {
        let tuning = Tuning {
            item_chance: 1.5,
            ..Default::default()
        };
        let mut game = Game::new(3, tuning);
        assert!(game.start());
        assert_eq!(game.world().tuning, Tuning::default());
        game.frame(DT);
        assert_eq!(game.faulted_frames(), 0);
    }

    #[test]
    fn test_fixed_time_step_ignores_elapsed() {
        let tuning = Tuning {
            time_step: TimeStep::Fixed { dt: 0.01 },
            ..Default::default()
        };
        let mut game = Game::new(1, tuning);
        game.start();
        game.frame(5.0);
        assert!((game.world().player.pos.y - 644.5).abs() < 0.001);
    }

    #[test]
    fn test_steering_last_press_wins() {
        let mut game = Game::new(1, Tuning::default());
        game.start();

        game.move_left(true);
        game.frame(DT);
        assert_eq!(game.world().player.vel.x, -300.0);

        game.move_right(true);
        game.frame(DT);
        assert_eq!(game.world().player.vel.x, 300.0);

        game.move_right(false);
        game.frame(DT);
        assert_eq!(game.world().player.vel.x, -300.0);

        game.move_left(false);
        game.frame(DT);
        assert_eq!(game.world().player.vel.x, 0.0);
    }

    #[test]
    fn test_jump_without_capability_is_dropped() {
        let mut game = Game::new(1, Tuning::default());
        game.start();
        game.jump();
        let events = game.frame(DT);
        assert!(!events.contains(&GameEvent::DoubleJumped));

        // Granting the capability later doesn't replay the old intent
        game.world.player.has_double_jump = true;
        let events = game.frame(DT);
        assert!(!events.contains(&GameEvent::DoubleJumped));
        assert!(game.world().player.has_double_jump);
    }

    #[test]
    fn test_render_is_read_only() {
        struct Recorder {
            frames: usize,
            platforms: usize,
        }
        impl RenderSink for Recorder {
            fn render(&mut self, view: &FrameView<'_>) {
                self.frames += 1;
                self.platforms = view.platforms.len();
            }
        }

        let mut game = Game::new(1, Tuning::default());
        game.start();
        let mut sink = Recorder {
            frames: 0,
            platforms: 0,
        };
        let before = game.world().player.pos;
        game.render(&mut sink);
        assert_eq!(sink.frames, 1);
        assert_eq!(sink.platforms, game.world().platforms.len());
        assert_eq!(game.world().player.pos, before);
    }
}
