//! 8-bit RGBA color and alpha-over compositing.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGBA color.
///
/// Laid out as four consecutive bytes so a slice of colors can be handed to a
/// presenter as raw RGBA8 data without copying.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Greyscale with the given alpha.
    pub const fn grey(value: u8, a: u8) -> Self {
        Self::new(value, value, value, a)
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// True when the RGB channels match, ignoring alpha.
    pub fn same_rgb(&self, other: &Rgba) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }

    /// Composite `self` over `dst` with straight (non-premultiplied) alpha.
    ///
    /// A fully transparent result collapses to transparent black.
    pub fn over(self, dst: Rgba) -> Rgba {
        let na = unit(self.a);
        let oa = unit(dst.a);
        let ra = na + oa * (1.0 - na);
        if ra <= 0.0 {
            return Rgba::TRANSPARENT;
        }

        let blend = |n: u8, o: u8| (unit(n) * na + unit(o) * oa * (1.0 - na)) / ra;
        Rgba::new(
            byte(blend(self.r, dst.r)),
            byte(blend(self.g, dst.g)),
            byte(blend(self.b, dst.b)),
            byte(ra),
        )
    }

    /// Channel-wise saturating add, alpha included.
    pub fn saturating_add(self, other: Rgba) -> Rgba {
        Rgba::new(
            self.r.saturating_add(other.r),
            self.g.saturating_add(other.g),
            self.b.saturating_add(other.b),
            self.a.saturating_add(other.a),
        )
    }

    /// Channel-wise saturating subtract, alpha included.
    pub fn saturating_sub(self, other: Rgba) -> Rgba {
        Rgba::new(
            self.r.saturating_sub(other.r),
            self.g.saturating_sub(other.g),
            self.b.saturating_sub(other.b),
            self.a.saturating_sub(other.a),
        )
    }
}

fn unit(channel: u8) -> f32 {
    channel as f32 / 255.0
}

fn byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
