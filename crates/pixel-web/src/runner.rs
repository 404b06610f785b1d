use std::sync::Arc;

use pixel_engine::{AnimationCatalog, EngineContext, FrameCapture, Game, GameConfig};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]` (see `export_game!`), because wasm-bindgen
/// cannot export generic structs directly.
///
/// Sheet texts are loaded into a mutable catalog before `init`; `init` freezes
/// the catalog and hands it to the `EngineContext`.
pub struct GameRunner<G: Game> {
    game: G,
    config: GameConfig,
    pending: AnimationCatalog,
    ctx: Option<EngineContext>,
    capture: FrameCapture,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        Self {
            game,
            config,
            pending: AnimationCatalog::new(),
            ctx: None,
            capture: FrameCapture::default(),
        }
    }

    /// Parse one sheet text into the catalog. Returns the number of
    /// animations loaded. Ignored once the game is initialized.
    pub fn load_sheets(&mut self, text: &str) -> usize {
        if self.ctx.is_some() {
            log::warn!("sheet text loaded after init, ignored");
            return 0;
        }
        self.pending.load_text(text)
    }

    /// Initialize the game. Call once after the sheets are loaded.
    pub fn init(&mut self) {
        if self.ctx.is_some() {
            return;
        }
        self.config = self.game.config();
        let catalog = Arc::new(std::mem::take(&mut self.pending));
        let mut ctx = EngineContext::new(&self.config, catalog);
        self.game.init(&mut ctx);
        self.ctx = Some(ctx);
    }

    pub fn is_initialized(&self) -> bool {
        self.ctx.is_some()
    }

    /// Run one frame: update, draw, then present the framebuffer if it changed.
    pub fn tick(&mut self, dt: f32) {
        let Some(ctx) = self.ctx.as_mut() else {
            return;
        };
        self.game.update(ctx, dt);
        self.game.draw(ctx);
        ctx.screen.present(&mut self.capture);
        ctx.frame += 1;
    }

    pub fn context(&self) -> Option<&EngineContext> {
        self.ctx.as_ref()
    }

    pub fn context_mut(&mut self) -> Option<&mut EngineContext> {
        self.ctx.as_mut()
    }

    // ---- Framebuffer accessors for wasm memory reads ----

    /// Last presented frame, RGBA8.
    pub fn pixels(&self) -> &[u8] {
        &self.capture.pixels
    }

    pub fn pixels_ptr(&self) -> *const u8 {
        self.capture.pixels.as_ptr()
    }

    pub fn pixels_len(&self) -> u32 {
        self.capture.pixels.len() as u32
    }

    /// Bumped every time a new frame is presented, so the host can skip
    /// re-uploading unchanged frames.
    pub fn frame_generation(&self) -> u32 {
        self.capture.generation
    }

    pub fn width(&self) -> u32 {
        self.config.screen.width
    }

    pub fn height(&self) -> u32 {
        self.config.screen.height
    }

    pub fn set_camera(&mut self, x: i32, y: i32) {
        if let Some(ctx) = self.ctx.as_mut() {
            ctx.screen.camera = pixel_engine::PixelPoint::new(x, y);
        }
    }

    pub fn set_shake(&mut self, amount: i32) {
        if let Some(ctx) = self.ctx.as_mut() {
            ctx.screen.set_shake(amount);
        }
    }
}
