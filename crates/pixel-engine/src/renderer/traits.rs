//! Presentation contract between the framebuffer and the host.
//!
//! The engine never talks to a GPU or window directly. Once per tick, when the
//! framebuffer changed, it hands its raw RGBA8 bytes to a `Presenter` which is
//! expected to upload and display them (a texture upload, a canvas
//! `putImageData`, a terminal dump...).

/// Uploads a finished framebuffer to the screen.
pub trait Presenter {
    /// `pixels` holds `width * height` RGBA8 texels, row-major, row 0 first.
    fn present(&mut self, pixels: &[u8], width: u32, height: u32);
}

impl<F> Presenter for F
where
    F: FnMut(&[u8], u32, u32),
{
    fn present(&mut self, pixels: &[u8], width: u32, height: u32) {
        self(pixels, width, height)
    }
}

/// Presenter that keeps a copy of the last presented frame.
///
/// Useful for hosts that pull pixels on their own schedule (such as a browser
/// reading wasm memory) and for tests.
#[derive(Debug, Clone, Default)]
pub struct FrameCapture {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Number of frames presented so far.
    pub generation: u32,
}

impl Presenter for FrameCapture {
    fn present(&mut self, pixels: &[u8], width: u32, height: u32) {
        self.pixels.clear();
        self.pixels.extend_from_slice(pixels);
        self.width = width;
        self.height = height;
        self.generation = self.generation.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_presenter() {
        let mut calls = 0;
        let mut presenter = |pixels: &[u8], w: u32, h: u32| {
            assert_eq!(pixels.len() as u32, w * h * 4);
            calls += 1;
        };
        presenter.present(&[0; 8], 2, 1);
        assert_eq!(calls, 1);
    }

    #[test]
    fn capture_copies_frame() {
        let mut capture = FrameCapture::default();
        capture.present(&[1, 2, 3, 4], 1, 1);
        assert_eq!(capture.pixels, vec![1, 2, 3, 4]);
        assert_eq!((capture.width, capture.height, capture.generation), (1, 1, 1));
    }
}
