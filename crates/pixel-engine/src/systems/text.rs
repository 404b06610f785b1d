//! Bitmap font text rendering.
//!
//! A font is an ordinary sprite sheet in which each glyph is an animation
//! named after its character (`*a*`, `*b*`, `*!*`...). Glyph size is taken
//! from the `a` animation. Glyphs are drawn from frame 0 through a private
//! `SpriteComponent`, so text color works the same way as sprite recoloring:
//! glyphs are authored in black and black is overridden with the text color.

use std::sync::Arc;

use crate::assets::catalog::AnimationCatalog;
use crate::components::sprite::SpriteComponent;
use crate::core::color::Rgba;
use crate::core::geometry::{PixelPoint, PixelRect};
use crate::renderer::screen::PixelScreen;

/// Direction glyphs advance in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    #[default]
    LeftToRight,
    /// Top to bottom; newlines start a new column to the right.
    UpToDown,
}

/// Layout settings for a `TextDisplay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStyle {
    /// Sheet holding the glyph animations.
    pub font_sheet: String,
    pub alignment: TextAlignment,
    /// Gap between glyphs in font pixels.
    pub spacing: i32,
    /// Each font pixel becomes a `scale` x `scale` block.
    pub scale: i32,
}

impl TextStyle {
    pub fn new(font_sheet: impl Into<String>) -> Self {
        Self {
            font_sheet: font_sheet.into(),
            alignment: TextAlignment::LeftToRight,
            spacing: 1,
            scale: 1,
        }
    }

    pub fn with_alignment(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_spacing(mut self, spacing: i32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_scale(mut self, scale: i32) -> Self {
        self.scale = scale.max(1);
        self
    }
}

/// A run of text drawn glyph by glyph from a font sheet.
#[derive(Debug)]
pub struct TextDisplay {
    text: String,
    style: TextStyle,
    glyphs: SpriteComponent,
    letter_size: PixelPoint,
}

impl TextDisplay {
    pub fn new(text: impl Into<String>, catalog: Arc<AnimationCatalog>, style: TextStyle) -> Self {
        let letter_size = catalog.anim_size(&style.font_sheet, "a");
        let glyphs = SpriteComponent::new(style.font_sheet.clone(), catalog);
        Self {
            text: text.into(),
            style,
            glyphs,
            letter_size,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn letter_size(&self) -> PixelPoint {
        self.letter_size
    }

    /// Recolor the (black) glyph pixels.
    pub fn set_color(&mut self, color: Rgba) {
        self.glyphs.add_color_override(Rgba::BLACK, color);
    }

    /// Hitbox covering the whole string, anchored at the first glyph.
    pub fn bounds(&self) -> PixelRect {
        let n = self.text.chars().count() as i32;
        let PixelPoint { x: w, y: h } = self.letter_size;
        let TextStyle { spacing, scale, .. } = self.style;
        match self.style.alignment {
            TextAlignment::LeftToRight => {
                let run = w.saturating_add(spacing).saturating_mul(n).saturating_sub(1);
                PixelRect::new(0, 0, run.saturating_mul(scale), h.saturating_mul(scale))
            }
            TextAlignment::UpToDown => {
                let run = h.saturating_add(spacing).saturating_mul(n).saturating_sub(1);
                PixelRect::new(0, 0, w.saturating_mul(scale), run.saturating_mul(scale))
            }
        }
    }

    /// Draw the text with its first glyph's canvas origin at `origin`.
    ///
    /// Characters without a glyph still advance the cursor.
    pub fn draw(&self, screen: &mut PixelScreen, origin: PixelPoint) {
        let PixelPoint { x: w, y: h } = self.letter_size;
        let TextStyle { spacing, scale, .. } = self.style;
        let advance = match self.style.alignment {
            TextAlignment::LeftToRight => PixelPoint::new(w.saturating_add(spacing), 0),
            TextAlignment::UpToDown => PixelPoint::new(0, -h.saturating_add(spacing)),
        } * scale;
        let mut cursor = origin;

        for c in self.text.chars() {
            if c == '\n' {
                cursor = match self.style.alignment {
                    TextAlignment::LeftToRight => {
                        PixelPoint::new(origin.x, cursor.y) - PixelPoint::new(0, h) * scale
                    }
                    TextAlignment::UpToDown => {
                        PixelPoint::new(cursor.x, origin.y) + PixelPoint::new(w, 0) * scale
                    }
                };
                continue;
            }

            let glyph = self
                .glyphs
                .catalog()
                .frame_pixels(&self.style.font_sheet, c.encode_utf8(&mut [0; 4]), 0, false, false);
            if let Some(pixels) = glyph {
                self.glyphs.draw_pixels(screen, &pixels, cursor, scale);
            }

            cursor = cursor + advance;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2x2 glyphs: `a` fills the bottom row, `b` the left column.
    const FONT: &str = "font\n\
        *a*!2,2!{[0](0-0,1)}\n\
        *b*!2,2!{[0](0-0)(1-0)}\n";

    fn catalog() -> Arc<AnimationCatalog> {
        Arc::new(AnimationCatalog::from_texts([FONT]))
    }

    fn lit(screen: &PixelScreen) -> Vec<PixelPoint> {
        let mut out = Vec::new();
        for y in 0..screen.height() as i32 {
            for x in 0..screen.width() as i32 {
                let p = PixelPoint::new(x, y);
                if screen.get_pixel(p).is_some_and(|c| c.a > 0) {
                    out.push(p);
                }
            }
        }
        out
    }

    fn blank(w: u32, h: u32) -> PixelScreen {
        let mut screen = PixelScreen::new(w, h);
        screen.clear(Rgba::TRANSPARENT);
        screen
    }

    #[test]
    fn letter_size_from_a_glyph() {
        let text = TextDisplay::new("ab", catalog(), TextStyle::new("font"));
        assert_eq!(text.letter_size(), PixelPoint::new(2, 2));
    }

    #[test]
    fn left_to_right_bounds() {
        let text = TextDisplay::new("abc", catalog(), TextStyle::new("font"));
        assert_eq!(text.bounds(), PixelRect::new(0, 0, 8, 2));

        let scaled = TextDisplay::new("abc", catalog(), TextStyle::new("font").with_scale(2));
        assert_eq!(scaled.bounds(), PixelRect::new(0, 0, 16, 4));
    }

    #[test]
    fn up_to_down_bounds() {
        let style = TextStyle::new("font").with_alignment(TextAlignment::UpToDown);
        let text = TextDisplay::new("ab", catalog(), style);
        assert_eq!(text.bounds(), PixelRect::new(0, 0, 2, 5));
    }

    #[test]
    fn draws_glyphs_with_spacing() {
        let text = TextDisplay::new("ab", catalog(), TextStyle::new("font"));
        let mut screen = blank(8, 4);
        text.draw(&mut screen, PixelPoint::new(0, 1));
        assert_eq!(
            lit(&screen),
            vec![
                PixelPoint::new(0, 1),
                PixelPoint::new(1, 1),
                PixelPoint::new(3, 1),
                PixelPoint::new(3, 2),
            ]
        );
    }

    #[test]
    fn newline_moves_down_a_line() {
        let text = TextDisplay::new("a\na", catalog(), TextStyle::new("font"));
        let mut screen = blank(4, 4);
        text.draw(&mut screen, PixelPoint::new(0, 2));
        assert_eq!(
            lit(&screen),
            vec![
                PixelPoint::new(0, 0),
                PixelPoint::new(1, 0),
                PixelPoint::new(0, 2),
                PixelPoint::new(1, 2),
            ]
        );
    }

    #[test]
    fn unknown_glyphs_still_advance() {
        let text = TextDisplay::new("?a", catalog(), TextStyle::new("font"));
        let mut screen = blank(8, 2);
        text.draw(&mut screen, PixelPoint::ZERO);
        assert_eq!(lit(&screen), vec![PixelPoint::new(3, 0), PixelPoint::new(4, 0)]);
    }

    #[test]
    fn color_recolors_black_glyphs() {
        let mut text = TextDisplay::new("a", catalog(), TextStyle::new("font"));
        text.set_color(Rgba::rgb(0, 200, 0));
        let mut screen = blank(2, 2);
        text.draw(&mut screen, PixelPoint::ZERO);
        assert_eq!(screen.get_pixel(PixelPoint::ZERO), Some(Rgba::rgb(0, 200, 0)));
    }

    #[test]
    fn set_text_updates_bounds() {
        let mut text = TextDisplay::new("a", catalog(), TextStyle::new("font"));
        assert_eq!(text.bounds().width, 2);
        text.set_text("aa");
        assert_eq!(text.text(), "aa");
        assert_eq!(text.bounds().width, 5);
    }
}
