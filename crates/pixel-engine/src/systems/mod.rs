pub mod animation;
pub mod debug;
pub mod text;
