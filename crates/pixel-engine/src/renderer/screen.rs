//! Software framebuffer: a fixed grid of RGBA pixels behind a pixel camera.
//!
//! All drawing funnels through `PixelScreen`. Unless GUI-space mode is on,
//! world coordinates are translated by subtracting the camera position, and
//! anything that lands outside the buffer is dropped without complaint.
//! Row 0 is the bottom of the picture, matching `PixelRect`'s bottom-left
//! anchoring.

use glam::Vec2;

use crate::api::config::ScreenConfig;
use crate::core::color::Rgba;
use crate::core::geometry::{PixelPoint, PixelRect};
use crate::core::rng::Rng;
use crate::renderer::traits::Presenter;

pub struct PixelScreen {
    width: i32,
    height: i32,
    pixels: Vec<Rgba>,
    clear_cache: Vec<Rgba>,
    clear_color: Option<Rgba>,
    dirty: bool,
    /// World coordinate shown at buffer position (0, 0).
    pub camera: PixelPoint,
    gui_space: bool,
    shake: i32,
    rng: Rng,
}

impl PixelScreen {
    /// Create a buffer filled with opaque black.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width: width as i32,
            height: height as i32,
            pixels: vec![Rgba::BLACK; len],
            clear_cache: Vec::new(),
            clear_color: None,
            dirty: true,
            camera: PixelPoint::ZERO,
            gui_space: false,
            shake: 0,
            rng: Rng::new(42),
        }
    }

    pub fn from_config(config: &ScreenConfig) -> Self {
        let mut screen = Self::new(config.width, config.height);
        screen.gui_space = config.gui_space;
        screen.shake = config.shake.max(0);
        screen.rng = Rng::new(config.shake_seed);
        screen.clear(config.clear_color);
        screen
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// The buffer as raw RGBA8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn gui_space(&self) -> bool {
        self.gui_space
    }

    /// Toggle GUI-space drawing (no camera offset, no culling).
    pub fn set_gui_space(&mut self, gui_space: bool) {
        self.gui_space = gui_space;
    }

    pub fn shake(&self) -> i32 {
        self.shake
    }

    /// Shake the picture for `amount` frames, with offsets up to `amount` pixels.
    pub fn set_shake(&mut self, amount: i32) {
        self.shake = amount.max(0);
    }

    /// The world-space rect currently visible.
    pub fn viewport(&self) -> PixelRect {
        PixelRect::new(self.camera.x, self.camera.y, self.width, self.height)
    }

    pub fn viewport_x_min(&self) -> i32 {
        self.camera.x
    }

    pub fn viewport_x_max(&self) -> i32 {
        self.camera.x.saturating_add(self.width - 1)
    }

    pub fn viewport_y_min(&self) -> i32 {
        self.camera.y
    }

    pub fn viewport_y_max(&self) -> i32 {
        self.camera.y.saturating_add(self.height - 1)
    }

    /// Map a world position to a pixel position for a given on-screen pixel size.
    pub fn world_to_pixel(pos: Vec2, pixel_size: f32) -> PixelPoint {
        PixelPoint::new(
            (pos.x / pixel_size).floor() as i32,
            (pos.y / pixel_size).floor() as i32,
        )
    }

    fn index(&self, point: PixelPoint) -> Option<usize> {
        let p = if self.gui_space { point } else { point - self.camera };
        if p.x < 0 || p.x >= self.width || p.y < 0 || p.y >= self.height {
            return None;
        }
        Some((p.y * self.width + p.x) as usize)
    }

    /// Read the pixel at a world position.
    pub fn get_pixel(&self, point: PixelPoint) -> Option<Rgba> {
        self.index(point).map(|i| self.pixels[i])
    }

    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: Rgba) {
        let len = self.pixels.len();
        if self.clear_color != Some(color) || self.clear_cache.len() != len {
            self.clear_cache.clear();
            self.clear_cache.resize(len, color);
            self.clear_color = Some(color);
        }
        self.pixels.copy_from_slice(&self.clear_cache);
        self.dirty = true;
    }

    /// Overwrite one pixel, no blending.
    pub fn set_pixel(&mut self, point: PixelPoint, color: Rgba) {
        if let Some(i) = self.index(point) {
            self.pixels[i] = color;
            self.dirty = true;
        }
    }

    /// Composite `color` over one pixel.
    pub fn add_pixel(&mut self, point: PixelPoint, color: Rgba) {
        if let Some(i) = self.index(point) {
            self.pixels[i] = color.over(self.pixels[i]);
            self.dirty = true;
        }
    }

    /// Opaque colors overwrite, anything else composites.
    pub fn plot(&mut self, point: PixelPoint, color: Rgba) {
        if color.is_opaque() {
            self.set_pixel(point, color);
        } else {
            self.add_pixel(point, color);
        }
    }

    /// Saturating channel subtract at one pixel.
    pub fn subtract_pixel(&mut self, point: PixelPoint, color: Rgba) {
        if let Some(i) = self.index(point) {
            self.pixels[i] = self.pixels[i].saturating_sub(color);
            self.dirty = true;
        }
    }

    /// Composite `color` over every pixel.
    pub fn add_pixels(&mut self, color: Rgba) {
        for px in &mut self.pixels {
            *px = color.over(*px);
        }
        self.dirty = true;
    }

    /// Saturating channel add over the whole buffer.
    pub fn add_color(&mut self, color: Rgba) {
        for px in &mut self.pixels {
            *px = px.saturating_add(color);
        }
        self.dirty = true;
    }

    /// Saturating channel subtract over the whole buffer.
    pub fn subtract_color(&mut self, color: Rgba) {
        for px in &mut self.pixels {
            *px = px.saturating_sub(color);
        }
        self.dirty = true;
    }

    /// Composite `color` over every pixel of a world-space rect. Only the
    /// part that lands in the buffer is visited.
    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgba) {
        let shown = if self.gui_space {
            PixelRect::new(0, 0, self.width, self.height)
        } else {
            self.viewport()
        };
        let x0 = rect.left.max(shown.left);
        let x1 = rect.left.saturating_add(rect.width).min(shown.left.saturating_add(shown.width));
        let y0 = rect.bottom.max(shown.bottom);
        let y1 = rect.bottom.saturating_add(rect.height).min(shown.bottom.saturating_add(shown.height));
        for y in y0..y1 {
            for x in x0..x1 {
                self.add_pixel(PixelPoint::new(x, y), color);
            }
        }
    }

    /// Bresenham line from `a` to `b`, composited pixel by pixel.
    pub fn draw_line(&mut self, a: PixelPoint, b: PixelPoint, color: Rgba) {
        let (mut x0, mut y0, mut x1, mut y1) = (a.x, a.y, b.x, b.y);
        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        if steep {
            std::mem::swap(&mut x0, &mut y0);
            std::mem::swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            std::mem::swap(&mut x0, &mut x1);
            std::mem::swap(&mut y0, &mut y1);
        }

        let dx = x1 - x0;
        let dy = (y1 - y0).abs();
        let ystep = if y0 < y1 { 1 } else { -1 };
        let mut err = dx / 2;
        let mut y = y0;

        for x in x0..=x1 {
            if steep {
                self.add_pixel(PixelPoint::new(y, x), color);
            } else {
                self.add_pixel(PixelPoint::new(x, y), color);
            }
            err -= dy;
            if err < 0 {
                y += ystep;
                err += dx;
            }
        }
    }

    /// Toroidal shift: each pixel takes the value previously at its position
    /// plus `offset`, wrapping at the edges. Transparent sources come back as
    /// transparent black.
    pub fn shift_pixels(&mut self, offset: PixelPoint) {
        if self.pixels.is_empty() {
            return;
        }
        let source = self.pixels.clone();
        for y in 0..self.height {
            let sy = (y + offset.y).rem_euclid(self.height);
            for x in 0..self.width {
                let sx = (x + offset.x).rem_euclid(self.width);
                let px = source[(sy * self.width + sx) as usize];
                self.pixels[(y * self.width + x) as usize] =
                    if px.a == 0 { Rgba::TRANSPARENT } else { px };
            }
        }
        self.dirty = true;
    }

    /// End-of-tick step: apply one frame of shake, then hand the buffer to the
    /// presenter if anything changed. Returns whether a frame was presented.
    pub fn present(&mut self, presenter: &mut impl Presenter) -> bool {
        if self.shake > 0 {
            let offset = PixelPoint::new(
                self.rng.range(-self.shake, self.shake),
                self.rng.range(-self.shake, self.shake),
            );
            self.shift_pixels(offset);
            self.shake -= 1;
        }

        if !self.dirty {
            return false;
        }
        presenter.present(self.as_bytes(), self.width(), self.height());
        self.dirty = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::traits::FrameCapture;

    const RED: Rgba = Rgba::rgb(255, 0, 0);

    fn clean(width: u32, height: u32) -> PixelScreen {
        let mut screen = PixelScreen::new(width, height);
        screen.clear(Rgba::TRANSPARENT);
        screen.present(&mut FrameCapture::default());
        screen
    }

    #[test]
    fn starts_black_and_dirty() {
        let screen = PixelScreen::new(4, 3);
        assert_eq!(screen.pixels().len(), 12);
        assert!(screen.pixels().iter().all(|p| *p == Rgba::BLACK));
        assert!(screen.is_dirty());
        assert_eq!(screen.as_bytes().len(), 48);
    }

    #[test]
    fn from_config_applies_clear_color() {
        let config = ScreenConfig {
            clear_color: Rgba::rgb(1, 2, 3),
            gui_space: true,
            ..ScreenConfig::new(2, 2)
        };
        let screen = PixelScreen::from_config(&config);
        assert!(screen.gui_space());
        assert!(screen.pixels().iter().all(|p| *p == Rgba::rgb(1, 2, 3)));
    }

    #[test]
    fn set_pixel_respects_camera() {
        let mut screen = clean(4, 4);
        screen.camera = PixelPoint::new(10, 20);
        screen.set_pixel(PixelPoint::new(11, 22), RED);
        assert_eq!(screen.pixels()[2 * 4 + 1], RED);
        assert_eq!(screen.get_pixel(PixelPoint::new(11, 22)), Some(RED));
    }

    #[test]
    fn gui_space_ignores_camera() {
        let mut screen = clean(4, 4);
        screen.camera = PixelPoint::new(10, 20);
        screen.set_gui_space(true);
        screen.set_pixel(PixelPoint::new(1, 2), RED);
        assert_eq!(screen.pixels()[2 * 4 + 1], RED);
    }

    #[test]
    fn out_of_bounds_is_dropped() {
        let mut screen = clean(4, 4);
        screen.set_pixel(PixelPoint::new(-1, 0), RED);
        screen.set_pixel(PixelPoint::new(4, 0), RED);
        screen.add_pixel(PixelPoint::new(0, 4), RED);
        screen.subtract_pixel(PixelPoint::new(0, -1), RED);
        assert!(!screen.is_dirty());
        assert!(screen.pixels().iter().all(|p| *p == Rgba::TRANSPARENT));
        assert_eq!(screen.get_pixel(PixelPoint::new(9, 9)), None);
    }

    #[test]
    fn add_pixel_blends() {
        let mut screen = clean(1, 1);
        screen.set_pixel(PixelPoint::ZERO, Rgba::rgb(0, 255, 0));
        screen.add_pixel(PixelPoint::ZERO, Rgba::new(255, 0, 0, 128));
        assert_eq!(screen.pixels()[0], Rgba::new(128, 127, 0, 255));
    }

    #[test]
    fn plot_dispatches_on_alpha() {
        let mut screen = clean(2, 1);
        screen.set_pixel(PixelPoint::new(0, 0), Rgba::WHITE);
        screen.set_pixel(PixelPoint::new(1, 0), Rgba::WHITE);
        screen.plot(PixelPoint::new(0, 0), Rgba::rgb(0, 0, 0));
        screen.plot(PixelPoint::new(1, 0), Rgba::new(0, 0, 0, 0));
        assert_eq!(screen.pixels()[0], Rgba::BLACK);
        assert_eq!(screen.pixels()[1], Rgba::WHITE);
    }

    #[test]
    fn clear_reuses_cache_without_aliasing() {
        let mut screen = PixelScreen::new(2, 2);
        screen.clear(RED);
        screen.set_pixel(PixelPoint::ZERO, Rgba::WHITE);
        screen.clear(RED);
        assert!(screen.pixels().iter().all(|p| *p == RED));
        screen.clear(Rgba::WHITE);
        assert!(screen.pixels().iter().all(|p| *p == Rgba::WHITE));
    }

    #[test]
    fn horizontal_line() {
        let mut screen = clean(5, 1);
        screen.draw_line(PixelPoint::new(4, 0), PixelPoint::new(0, 0), RED);
        assert!(screen.pixels().iter().all(|p| *p == RED));
    }

    #[test]
    fn diagonal_and_steep_lines() {
        let mut screen = clean(4, 4);
        screen.draw_line(PixelPoint::new(0, 0), PixelPoint::new(3, 3), RED);
        for i in 0..4 {
            assert_eq!(screen.get_pixel(PixelPoint::new(i, i)), Some(RED));
        }

        let mut screen = clean(4, 4);
        screen.draw_line(PixelPoint::new(1, 0), PixelPoint::new(1, 3), RED);
        let lit = screen.pixels().iter().filter(|p| **p == RED).count();
        assert_eq!(lit, 4);
        for y in 0..4 {
            assert_eq!(screen.get_pixel(PixelPoint::new(1, y)), Some(RED));
        }
    }

    #[test]
    fn line_composites() {
        let mut screen = clean(3, 1);
        let half = Rgba::new(255, 0, 0, 128);
        screen.draw_line(PixelPoint::new(0, 0), PixelPoint::new(2, 0), half);
        screen.draw_line(PixelPoint::new(0, 0), PixelPoint::new(2, 0), half);
        assert!(screen.pixels()[0].a > 128);
    }

    #[test]
    fn shift_wraps_toroidally() {
        let mut screen = clean(3, 2);
        screen.set_pixel(PixelPoint::new(0, 0), RED);
        screen.shift_pixels(PixelPoint::new(1, 0));
        // (2,0) takes the value from (0,0) after wrapping.
        assert_eq!(screen.get_pixel(PixelPoint::new(2, 0)), Some(RED));
        assert_eq!(screen.get_pixel(PixelPoint::new(0, 0)), Some(Rgba::TRANSPARENT));

        screen.shift_pixels(PixelPoint::new(0, -1));
        assert_eq!(screen.get_pixel(PixelPoint::new(2, 1)), Some(RED));
    }

    #[test]
    fn shift_scrubs_transparent_sources() {
        let mut screen = clean(2, 1);
        screen.set_pixel(PixelPoint::new(1, 0), Rgba::new(9, 9, 9, 0));
        screen.shift_pixels(PixelPoint::new(1, 0));
        assert_eq!(screen.pixels()[0], Rgba::TRANSPARENT);
    }

    #[test]
    fn present_only_when_dirty() {
        let mut screen = PixelScreen::new(2, 2);
        let mut capture = FrameCapture::default();
        assert!(screen.present(&mut capture));
        assert!(!screen.is_dirty());
        assert!(!screen.present(&mut capture));
        assert_eq!(capture.generation, 1);

        screen.set_pixel(PixelPoint::ZERO, RED);
        assert!(screen.present(&mut capture));
        assert_eq!(capture.generation, 2);
        assert_eq!(&capture.pixels[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn shake_counts_down_and_presents() {
        let mut screen = clean(4, 4);
        let mut capture = FrameCapture::default();
        screen.set_shake(2);
        assert!(screen.present(&mut capture));
        assert_eq!(screen.shake(), 1);
        assert!(screen.present(&mut capture));
        assert_eq!(screen.shake(), 0);
        assert!(!screen.present(&mut capture));
    }

    #[test]
    fn tint_whole_buffer() {
        let mut screen = PixelScreen::new(2, 1);
        screen.add_color(Rgba::new(10, 20, 30, 0));
        assert_eq!(screen.pixels()[0], Rgba::new(10, 20, 30, 255));
        screen.subtract_color(Rgba::new(20, 5, 0, 0));
        assert_eq!(screen.pixels()[1], Rgba::new(0, 15, 30, 255));
        screen.add_pixels(Rgba::new(255, 255, 255, 0));
        assert_eq!(screen.pixels()[1], Rgba::new(0, 15, 30, 255));
    }

    #[test]
    fn fill_rect_clips() {
        let mut screen = clean(3, 3);
        screen.fill_rect(PixelRect::new(1, 1, 5, 5), RED);
        let lit = screen.pixels().iter().filter(|p| **p == RED).count();
        assert_eq!(lit, 4);
    }

    #[test]
    fn fill_rect_with_extreme_bounds_stays_in_buffer() {
        let mut screen = clean(3, 2);
        screen.camera = PixelPoint::new(-1, 0);
        screen.fill_rect(PixelRect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX), RED);
        assert!(screen.pixels().iter().all(|p| *p == Rgba::TRANSPARENT));

        screen.fill_rect(PixelRect::new(0, 1, i32::MAX, i32::MAX), RED);
        let lit: Vec<usize> = (0..6).filter(|i| screen.pixels()[*i] == RED).collect();
        assert_eq!(lit, vec![4, 5]);
    }

    #[test]
    fn viewport_follows_camera() {
        let mut screen = PixelScreen::new(10, 8);
        screen.camera = PixelPoint::new(5, -3);
        assert_eq!(screen.viewport(), PixelRect::new(5, -3, 10, 8));
        assert_eq!(screen.viewport_x_max(), 14);
        assert_eq!(screen.viewport_y_max(), 4);
    }

    #[test]
    fn world_to_pixel_floors() {
        let p = PixelScreen::world_to_pixel(Vec2::new(15.0, -1.0), 4.0);
        assert_eq!(p, PixelPoint::new(3, -1));
    }
}
