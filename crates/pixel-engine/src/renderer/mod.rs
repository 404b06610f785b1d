pub mod screen;
pub mod traits;

// Re-export key types for convenient access
pub use screen::PixelScreen;
pub use traits::{FrameCapture, Presenter};
