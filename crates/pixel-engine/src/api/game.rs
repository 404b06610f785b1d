use std::sync::Arc;

use crate::api::config::{ScreenConfig, SpriteConfig};
use crate::assets::catalog::AnimationCatalog;
use crate::components::sprite::SpriteComponent;
use crate::renderer::screen::PixelScreen;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameConfig {
    /// Framebuffer setup.
    pub screen: ScreenConfig,
    /// Defaults for sprites created through `EngineContext::sprite`.
    pub sprite: SpriteConfig,
}

/// The core contract every game must fulfill.
///
/// The host calls `update` then `draw` once per tick and presents the
/// framebuffer afterwards, so all sprite state is settled before anything
/// reads the pixels.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state: create sprites, pick starting animations.
    fn init(&mut self, ctx: &mut EngineContext);

    /// Advance game state by `dt` seconds.
    fn update(&mut self, ctx: &mut EngineContext, dt: f32);

    /// Composite the current state into the framebuffer.
    fn draw(&mut self, ctx: &mut EngineContext);
}

/// Engine state handed to the game each tick.
pub struct EngineContext {
    catalog: Arc<AnimationCatalog>,
    sprite_config: SpriteConfig,
    pub screen: PixelScreen,
    /// Ticks run since init.
    pub frame: u64,
}

impl EngineContext {
    pub fn new(config: &GameConfig, catalog: Arc<AnimationCatalog>) -> Self {
        Self {
            catalog,
            sprite_config: config.sprite.clone(),
            screen: PixelScreen::from_config(&config.screen),
            frame: 0,
        }
    }

    pub fn catalog(&self) -> &Arc<AnimationCatalog> {
        &self.catalog
    }

    /// Create a sprite bound to `sheet` using the configured sprite defaults.
    pub fn sprite(&self, sheet: &str) -> SpriteComponent {
        SpriteComponent::with_config(sheet, Arc::clone(&self.catalog), &self.sprite_config)
    }
}
