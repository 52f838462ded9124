//! Canvas2D renderer (flat shapes, no assets)

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{FrameView, RenderSink};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::game::GamePhase;
use crate::sim::ItemKind;

const SKY: &str = "#87CEEB";
const CLOUD: &str = "rgba(255, 255, 255, 0.7)";
const PLATFORM: &str = "#4CAF50";
const PLAYER: &str = "purple";
const DOUBLE_JUMP: &str = "#2196F3";

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Size the canvas to the logical playfield and grab its 2D context
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, String> {
        canvas.set_width(SCREEN_WIDTH as u32);
        canvas.set_height(SCREEN_HEIGHT as u32);
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| format!("get_context failed: {:?}", e))?
            .ok_or("canvas has no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "2d context has unexpected type".to_string())?;
        Ok(Self { ctx })
    }

    fn circle(&self, x: f32, y: f32, r: f32, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        if self.ctx.arc(x as f64, y as f64, r as f64, 0.0, TAU).is_ok() {
            self.ctx.fill();
        }
    }

    fn text(&self, text: &str, x: f64, y: f64, font: &str) {
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str("white");
        let _ = self.ctx.fill_text(text, x, y);
    }
}

impl RenderSink for CanvasRenderer {
    fn render(&mut self, view: &FrameView<'_>) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(SKY);
        ctx.fill_rect(0.0, 0.0, SCREEN_WIDTH as f64, SCREEN_HEIGHT as f64);

        for cloud in view.clouds {
            self.circle(cloud.pos.x, cloud.pos.y, cloud.size, CLOUD);
        }

        for item in view.items {
            let color = match item.kind {
                ItemKind::DoubleJump => "blue",
                ItemKind::JumpBoost => "red",
            };
            let r = item.rect;
            self.circle(
                r.pos.x + r.size.x / 2.0,
                r.pos.y + r.size.y / 2.0,
                r.size.x / 2.0,
                color,
            );
        }

        ctx.set_fill_style_str(PLATFORM);
        for platform in view.platforms {
            let r = platform.rect;
            ctx.fill_rect(
                r.pos.x as f64,
                r.pos.y as f64,
                r.size.x as f64,
                r.size.y as f64,
            );
        }

        let player = view.player;
        ctx.set_fill_style_str(PLAYER);
        ctx.fill_rect(
            player.pos.x as f64,
            player.pos.y as f64,
            player.size.x as f64,
            player.size.y as f64,
        );
        if player.has_double_jump {
            self.circle(player.pos.x + player.size.x, player.pos.y, 10.0, DOUBLE_JUMP);
            ctx.set_stroke_style_str("white");
            ctx.set_line_width(2.0);
            ctx.stroke();
        }

        match view.phase {
            GamePhase::Start => {
                self.text("Press Space to start", 110.0, 300.0, "28px sans-serif");
            }
            GamePhase::Playing => {
                self.text(&view.score.to_string(), 16.0, 36.0, "24px sans-serif");
            }
            GamePhase::GameOver => {
                self.text("Game Over", 150.0, 280.0, "40px sans-serif");
                self.text(
                    &format!("Score: {}", view.score),
                    170.0,
                    330.0,
                    "24px sans-serif",
                );
                if let Some(notice) = view.notice {
                    self.text(notice, 40.0, 380.0, "18px sans-serif");
                }
                self.text("Enter: submit  R: restart", 110.0, 430.0, "20px sans-serif");
            }
        }
    }
}
