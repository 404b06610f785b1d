//! Debug rendering: translucent hitbox overlays.

use crate::core::color::Rgba;
use crate::core::geometry::{PixelPoint, PixelRect};
use crate::renderer::screen::PixelScreen;

/// Translucent red used for hitbox overlays.
pub const HITBOX_COLOR: Rgba = Rgba::new(255, 0, 0, 77);

/// Composite `color` over every pixel of a canvas-local hitbox placed at `origin`.
pub fn draw_hitbox(screen: &mut PixelScreen, hitbox: PixelRect, origin: PixelPoint, color: Rgba) {
    screen.fill_rect(hitbox + origin, color);
}
