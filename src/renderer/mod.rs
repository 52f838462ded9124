//! Rendering contract
//!
//! Renderers are pure readers of simulation state: they get a [`FrameView`]
//! borrowed from the game and must not feed anything back.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use crate::game::GamePhase;
use crate::sim::{Cloud, Item, Platform, Player};

/// Snapshot of everything drawable this frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub phase: GamePhase,
    pub player: &'a Player,
    pub platforms: &'a [Platform],
    pub items: &'a [Item],
    pub clouds: &'a [Cloud],
    pub score: u64,
    pub notice: Option<&'a str>,
}

/// Something that can draw a frame
pub trait RenderSink {
    fn render(&mut self, view: &FrameView<'_>);
}
