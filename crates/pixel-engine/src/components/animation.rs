//! Immutable animation data: sparse per-frame pixel lists decoded from sheet text.

use crate::core::color::Rgba;
use crate::core::geometry::{PixelPoint, PixelRect};

/// What happens when playback reaches the end of a frame's duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoopMode {
    /// Wrap back to the first frame.
    #[default]
    Loops,
    /// Stop on the last frame and fire the completion callback.
    PlayOnce,
    /// Bounce between the first and last frames.
    PingPong,
    /// Jump to a random frame other than the current one.
    RandomFrame,
}

impl LoopMode {
    /// Map the ordinal used by the sheet format (`&n&`) to a mode.
    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        match ordinal {
            0 => Some(LoopMode::Loops),
            1 => Some(LoopMode::PlayOnce),
            2 => Some(LoopMode::PingPong),
            3 => Some(LoopMode::RandomFrame),
            _ => None,
        }
    }
}

/// One colored pixel at an offset inside the animation canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelData {
    pub position: PixelPoint,
    pub color: Rgba,
}

impl PixelData {
    pub const fn new(position: PixelPoint, color: Rgba) -> Self {
        Self { position, color }
    }
}

/// A single still image: the pixels actually drawn plus how long it shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameData {
    pub pixels: Vec<PixelData>,
    /// Display duration in seconds.
    pub duration: f32,
}

impl FrameData {
    pub fn new(pixels: Vec<PixelData>, duration: f32) -> Self {
        Self { pixels, duration }
    }

    pub fn pixels_flipped_x(&self, width: i32) -> Vec<PixelData> {
        self.map_positions(|p| PixelPoint::new(mirror(width, p.x), p.y))
    }

    pub fn pixels_flipped_y(&self, height: i32) -> Vec<PixelData> {
        self.map_positions(|p| PixelPoint::new(p.x, mirror(height, p.y)))
    }

    pub fn pixels_flipped_xy(&self, width: i32, height: i32) -> Vec<PixelData> {
        self.map_positions(|p| PixelPoint::new(mirror(width, p.x), mirror(height, p.y)))
    }

    /// Pixels with the requested flips applied against a canvas of `size`.
    pub fn pixels_oriented(&self, flip_x: bool, flip_y: bool, size: PixelPoint) -> Vec<PixelData> {
        match (flip_x, flip_y) {
            (true, true) => self.pixels_flipped_xy(size.x, size.y),
            (true, false) => self.pixels_flipped_x(size.x),
            (false, true) => self.pixels_flipped_y(size.y),
            (false, false) => self.pixels.clone(),
        }
    }

    fn map_positions(&self, f: impl Fn(PixelPoint) -> PixelPoint) -> Vec<PixelData> {
        self.pixels
            .iter()
            .map(|px| PixelData::new(f(px.position), px.color))
            .collect()
    }
}

/// Reflect `v` across a canvas edge of length `extent`. Saturates instead of
/// overflowing on out-of-canvas coordinates.
fn mirror(extent: i32, v: i32) -> i32 {
    extent.saturating_sub(1).saturating_sub(v)
}

/// A named frame sequence sharing one canvas size, hitbox and loop mode.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationData {
    pub name: String,
    pub frames: Vec<FrameData>,
    /// Canvas width (x) and height (y) shared by all frames.
    pub size: PixelPoint,
    /// Collision rect in canvas-local coordinates.
    pub hitbox: PixelRect,
    pub loop_mode: LoopMode,
}

impl AnimationData {
    pub fn new(
        name: impl Into<String>,
        frames: Vec<FrameData>,
        size: PixelPoint,
        hitbox: PixelRect,
        loop_mode: LoopMode,
    ) -> Self {
        Self {
            name: name.into(),
            frames,
            size,
            hitbox,
            loop_mode,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, index: usize) -> Option<&FrameData> {
        self.frames.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn px(x: i32, y: i32, color: Rgba) -> PixelData {
        PixelData::new(PixelPoint::new(x, y), color)
    }

    fn sample_frame() -> FrameData {
        FrameData::new(
            vec![
                px(0, 0, Rgba::rgb(255, 0, 0)),
                px(2, 1, Rgba::rgb(0, 255, 0)),
                px(3, 3, Rgba::new(0, 0, 255, 40)),
            ],
            0.1,
        )
    }

    #[test]
    fn flip_x_mirrors_columns() {
        let flipped = sample_frame().pixels_flipped_x(4);
        assert_eq!(flipped[0].position, PixelPoint::new(3, 0));
        assert_eq!(flipped[1].position, PixelPoint::new(1, 1));
        assert_eq!(flipped[2].position, PixelPoint::new(0, 3));
        assert_eq!(flipped[2].color, Rgba::new(0, 0, 255, 40));
    }

    #[test]
    fn flip_y_mirrors_rows() {
        let flipped = sample_frame().pixels_flipped_y(4);
        assert_eq!(flipped[0].position, PixelPoint::new(0, 3));
        assert_eq!(flipped[1].position, PixelPoint::new(2, 2));
    }

    #[test]
    fn flip_x_twice_round_trips() {
        let frame = sample_frame();
        let once = FrameData::new(frame.pixels_flipped_x(4), frame.duration);
        let twice: HashSet<PixelData> = once.pixels_flipped_x(4).into_iter().collect();
        let original: HashSet<PixelData> = frame.pixels.iter().copied().collect();
        assert_eq!(twice, original);
    }

    #[test]
    fn oriented_matches_specific_flips() {
        let frame = sample_frame();
        let size = PixelPoint::new(4, 4);
        assert_eq!(frame.pixels_oriented(false, false, size), frame.pixels);
        assert_eq!(frame.pixels_oriented(true, false, size), frame.pixels_flipped_x(4));
        assert_eq!(frame.pixels_oriented(false, true, size), frame.pixels_flipped_y(4));
        assert_eq!(frame.pixels_oriented(true, true, size), frame.pixels_flipped_xy(4, 4));
    }

    #[test]
    fn loop_mode_ordinals() {
        assert_eq!(LoopMode::from_ordinal(0), Some(LoopMode::Loops));
        assert_eq!(LoopMode::from_ordinal(3), Some(LoopMode::RandomFrame));
        assert_eq!(LoopMode::from_ordinal(4), None);
        assert_eq!(LoopMode::from_ordinal(-1), None);
    }

    #[test]
    fn frame_lookup_by_index() {
        let anim = AnimationData::new(
            "walk",
            vec![FrameData::new(vec![], 0.25), FrameData::new(vec![], 0.5)],
            PixelPoint::new(8, 8),
            PixelRect::default(),
            LoopMode::Loops,
        );
        assert_eq!(anim.frame_count(), 2);
        assert_eq!(anim.frame(1).map(|f| f.duration), Some(0.5));
        assert!(anim.frame(2).is_none());
    }

    #[test]
    fn flips_saturate_far_outside_the_canvas() {
        let frame = FrameData::new(
            vec![px(i32::MIN, i32::MAX, Rgba::WHITE), px(i32::MAX, i32::MIN, Rgba::WHITE)],
            0.1,
        );
        let flipped = frame.pixels_flipped_xy(4, 4);
        assert_eq!(flipped[0].position, PixelPoint::new(i32::MAX, i32::MIN + 4));
        assert_eq!(flipped[1].position, PixelPoint::new(i32::MIN + 4, i32::MAX));
    }
}
