pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod assets;

// Re-export key types at crate root for convenience
pub use api::config::{ScreenConfig, SpriteConfig};
pub use api::error::{LookupError, ParseError};
pub use api::game::{EngineContext, Game, GameConfig};
pub use assets::catalog::AnimationCatalog;
pub use assets::parser::{parse_animation, sheet_entries, SheetEntry};
pub use components::animation::{AnimationData, FrameData, LoopMode, PixelData};
pub use components::sprite::{ColorOverride, SpriteComponent};
pub use core::color::Rgba;
pub use core::geometry::{PixelPoint, PixelRect};
pub use core::rng::Rng;
pub use renderer::screen::PixelScreen;
pub use renderer::traits::{FrameCapture, Presenter};
pub use systems::animation::{draw_sprites, tick_sprites};
pub use systems::debug::{draw_hitbox, HITBOX_COLOR};
pub use systems::text::{TextAlignment, TextDisplay, TextStyle};
