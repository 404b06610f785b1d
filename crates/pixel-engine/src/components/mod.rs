pub mod animation;
pub mod sprite;
