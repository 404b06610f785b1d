//! Animation system: advances sprite playback and composites sprites.

use crate::components::sprite::SpriteComponent;
use crate::core::geometry::PixelPoint;
use crate::renderer::screen::PixelScreen;

/// Advance every sprite by `dt` seconds. Returns how many changed frame.
///
/// Call this once per tick, before drawing.
pub fn tick_sprites<'a>(sprites: impl IntoIterator<Item = &'a mut SpriteComponent>, dt: f32) -> usize {
    sprites
        .into_iter()
        .map(|sprite| sprite.update(dt))
        .filter(|changed| *changed)
        .count()
}

/// Draw sprites in order, each at its canvas origin. Later sprites land on top.
pub fn draw_sprites<'a>(
    screen: &mut PixelScreen,
    sprites: impl IntoIterator<Item = (&'a SpriteComponent, PixelPoint)>,
) {
    for (sprite, origin) in sprites {
        sprite.draw(screen, origin);
    }
}
