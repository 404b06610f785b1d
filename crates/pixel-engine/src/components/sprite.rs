//! Per-entity sprite playback.
//!
//! A `SpriteComponent` plays one animation at a time out of a single sprite
//! sheet in the shared `AnimationCatalog`. It owns its playback state (frame,
//! timer, loop-mode override, callbacks) plus presentation tweaks that survive
//! animation switches (color overrides, flips).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::api::config::SpriteConfig;
use crate::api::error::LookupError;
use crate::assets::catalog::AnimationCatalog;
use crate::components::animation::{AnimationData, FrameData, LoopMode, PixelData};
use crate::core::color::Rgba;
use crate::core::geometry::{PixelPoint, PixelRect};
use crate::core::rng::Rng;
use crate::renderer::screen::PixelScreen;

/// Called every time playback lands on a registered frame.
pub type FrameCallback = Box<dyn FnMut()>;
/// Called once when a play-once animation finishes.
pub type CompleteCallback = Box<dyn FnOnce()>;

/// Replaces pixels whose RGB matches `from` with `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorOverride {
    pub from: Rgba,
    pub to: Rgba,
}

pub struct SpriteComponent {
    catalog: Arc<AnimationCatalog>,
    sheet: String,
    current: Option<Arc<AnimationData>>,
    frame_index: usize,
    frame_timer: f32,
    ping_pong_forward: bool,
    play_once_finished: bool,
    loop_override: Option<LoopMode>,
    /// Multiplier on elapsed time (1.0 = normal speed).
    pub time_scale: f32,
    /// Keep each pixel's own alpha when a color override applies.
    pub preserve_alpha: bool,
    pub flip_x: bool,
    pub flip_y: bool,
    color_overrides: Vec<ColorOverride>,
    frame_callbacks: BTreeMap<usize, FrameCallback>,
    on_complete: Option<CompleteCallback>,
    rng: Rng,
}

impl fmt::Debug for SpriteComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpriteComponent")
            .field("sheet", &self.sheet)
            .field("animation", &self.current.as_ref().map(|a| a.name.as_str()))
            .field("frame_index", &self.frame_index)
            .field("frame_timer", &self.frame_timer)
            .field("loop_override", &self.loop_override)
            .field("flip_x", &self.flip_x)
            .field("flip_y", &self.flip_y)
            .field("color_overrides", &self.color_overrides)
            .field("frame_callbacks", &self.frame_callbacks.len())
            .finish_non_exhaustive()
    }
}

impl SpriteComponent {
    pub fn new(sheet: impl Into<String>, catalog: Arc<AnimationCatalog>) -> Self {
        Self::with_config(sheet, catalog, &SpriteConfig::default())
    }

    pub fn with_config(
        sheet: impl Into<String>,
        catalog: Arc<AnimationCatalog>,
        config: &SpriteConfig,
    ) -> Self {
        Self {
            catalog,
            sheet: sheet.into(),
            current: None,
            frame_index: 0,
            frame_timer: 0.0,
            ping_pong_forward: true,
            play_once_finished: false,
            loop_override: None,
            time_scale: config.time_scale,
            preserve_alpha: config.preserve_alpha,
            flip_x: false,
            flip_y: false,
            color_overrides: Vec::new(),
            frame_callbacks: BTreeMap::new(),
            on_complete: None,
            rng: Rng::new(config.seed),
        }
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    /// Point the component at another sheet. The current animation keeps
    /// playing until the next `play_animation`.
    pub fn set_sheet(&mut self, sheet: impl Into<String>) {
        self.sheet = sheet.into();
    }

    pub fn catalog(&self) -> &AnimationCatalog {
        &self.catalog
    }

    pub fn has_animation(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_animation(&self) -> Option<&AnimationData> {
        self.current.as_deref()
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn current_frame(&self) -> Option<&FrameData> {
        self.current.as_ref().and_then(|a| a.frame(self.frame_index))
    }

    /// Hitbox of the playing animation, in canvas-local coordinates.
    pub fn hitbox(&self) -> Option<PixelRect> {
        self.current.as_ref().map(|a| a.hitbox)
    }

    /// The override if one is set, else the animation's own mode.
    pub fn loop_mode(&self) -> Option<LoopMode> {
        self.current
            .as_ref()
            .map(|a| self.loop_override.unwrap_or(a.loop_mode))
    }

    /// True once a play-once animation has run past its last frame.
    pub fn is_finished(&self) -> bool {
        self.play_once_finished
    }

    /// Switch to a named animation in this component's sheet.
    ///
    /// Asking for the animation that is already playing does nothing. On a
    /// failed lookup the error is logged and playback state is untouched.
    pub fn play_animation(&mut self, name: &str) -> Result<(), LookupError> {
        if self.current.as_ref().is_some_and(|a| a.name == name) {
            return Ok(());
        }

        let anim = match self.lookup(name) {
            Ok(anim) => anim,
            Err(err) => {
                log::error!("{}", err);
                return Err(err);
            }
        };

        log::debug!("{}: playing <{}>", self.sheet, name);
        self.current = Some(anim);
        self.frame_timer = 0.0;
        self.ping_pong_forward = true;
        self.play_once_finished = false;
        self.loop_override = None;
        self.set_frame(0);
        Ok(())
    }

    /// Resolve `name` in this sheet. Frameless animations cannot be played.
    fn lookup(&self, name: &str) -> Result<Arc<AnimationData>, LookupError> {
        let anim = self.catalog.get(&self.sheet, name)?;
        if anim.frame_count() == 0 {
            return Err(LookupError::NoFrames {
                sheet: self.sheet.clone(),
                animation: name.to_string(),
            });
        }
        Ok(Arc::clone(anim))
    }

    /// Play an animation with a loop mode that replaces the animation's own
    /// until the next animation starts.
    pub fn play_animation_with_mode(&mut self, name: &str, mode: LoopMode) -> Result<(), LookupError> {
        self.play_animation(name)?;
        self.loop_override = Some(mode);
        Ok(())
    }

    /// Play an animation and run `callback` when it completes. This is how a
    /// one-shot effect removes itself once done.
    pub fn play_once_then(
        &mut self,
        name: &str,
        callback: impl FnOnce() + 'static,
    ) -> Result<(), LookupError> {
        self.play_animation(name)?;
        self.set_on_complete(callback);
        Ok(())
    }

    pub fn set_on_complete(&mut self, callback: impl FnOnce() + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Run `callback` whenever playback lands on `frame`. Replaces any
    /// callback already registered for that frame.
    pub fn on_frame(&mut self, frame: usize, callback: impl FnMut() + 'static) {
        self.frame_callbacks.insert(frame, Box::new(callback));
    }

    pub fn clear_frame_callbacks(&mut self) {
        self.frame_callbacks.clear();
    }

    /// Recolor pixels whose RGB matches `from`. Overrides are checked in the
    /// order they were added; re-adding `from` replaces its target in place.
    pub fn add_color_override(&mut self, from: Rgba, to: Rgba) {
        match self.color_overrides.iter_mut().find(|o| o.from == from) {
            Some(existing) => existing.to = to,
            None => self.color_overrides.push(ColorOverride { from, to }),
        }
    }

    pub fn remove_color_override(&mut self, from: Rgba) {
        self.color_overrides.retain(|o| o.from != from);
    }

    pub fn clear_color_overrides(&mut self) {
        self.color_overrides.clear();
    }

    pub fn color_overrides(&self) -> &[ColorOverride] {
        &self.color_overrides
    }

    /// Advance playback by `dt` seconds. Returns true if the frame changed.
    ///
    /// At most one frame step happens per call, however much time passed.
    pub fn update(&mut self, dt: f32) -> bool {
        let Some(anim) = self.current.clone() else {
            return false;
        };
        let Some(frame) = anim.frame(self.frame_index) else {
            return false;
        };

        self.frame_timer += dt * self.time_scale;
        if self.frame_timer <= frame.duration {
            return false;
        }

        let before = self.frame_index;
        let count = anim.frame_count();
        let mode = self.loop_override.unwrap_or(anim.loop_mode);
        match mode {
            LoopMode::Loops if count > 1 => {
                self.set_frame((self.frame_index + 1) % count);
            }
            LoopMode::PlayOnce if !self.play_once_finished => {
                if self.frame_index + 1 < count {
                    self.set_frame(self.frame_index + 1);
                } else {
                    self.play_once_finished = true;
                    if let Some(callback) = self.on_complete.take() {
                        callback();
                    }
                }
            }
            LoopMode::PingPong if count > 1 => {
                let next = if self.ping_pong_forward {
                    if self.frame_index + 1 < count {
                        self.frame_index + 1
                    } else {
                        self.ping_pong_forward = false;
                        self.frame_index - 1
                    }
                } else if self.frame_index > 0 {
                    self.frame_index - 1
                } else {
                    self.ping_pong_forward = true;
                    1
                };
                self.set_frame(next);
            }
            LoopMode::RandomFrame if count > 1 => {
                let mut next = self.rng.next_int(count as u32 - 1) as usize;
                if next >= self.frame_index {
                    next += 1;
                }
                self.set_frame(next);
            }
            _ => {}
        }

        self.frame_timer = 0.0;
        self.frame_index != before
    }

    fn set_frame(&mut self, index: usize) {
        self.frame_index = index;
        if let Some(callback) = self.frame_callbacks.get_mut(&index) {
            callback();
        }
    }

    /// The current frame's pixels with this component's flips applied.
    pub fn current_pixels(&self) -> Option<Vec<PixelData>> {
        let anim = self.current.as_ref()?;
        let frame = anim.frame(self.frame_index)?;
        Some(frame.pixels_oriented(self.flip_x, self.flip_y, anim.size))
    }

    /// Map a source color through the override table.
    pub fn resolve_color(&self, color: Rgba) -> Rgba {
        match self.color_overrides.iter().find(|o| o.from.same_rgb(&color)) {
            Some(o) if self.preserve_alpha => Rgba::new(o.to.r, o.to.g, o.to.b, color.a),
            Some(o) => o.to,
            None => color,
        }
    }

    /// Whether the animation canvas placed at `origin` can touch the viewport.
    pub fn is_visible(&self, screen: &PixelScreen, origin: PixelPoint) -> bool {
        let Some(anim) = self.current.as_ref() else {
            return false;
        };
        let size = anim.size;
        let camera = screen.camera;
        origin.x >= camera.x.saturating_sub(size.x)
            && origin.x <= camera.x.saturating_add(screen.width() as i32)
            && origin.y >= camera.y.saturating_sub(size.y)
            && origin.y <= camera.y.saturating_add(screen.height() as i32)
    }

    /// Draw the current frame with its canvas origin at `origin`.
    pub fn draw(&self, screen: &mut PixelScreen, origin: PixelPoint) {
        if !self.has_animation() {
            return;
        }
        if !screen.gui_space() && !self.is_visible(screen, origin) {
            return;
        }
        if let Some(pixels) = self.current_pixels() {
            self.draw_pixels(screen, &pixels, origin, 1);
        }
    }

    /// Draw an arbitrary pixel list through the override table, each pixel
    /// blown up to a `scale` x `scale` block.
    ///
    /// A pixel whose position does not fit in `i32` is off any screen and is
    /// dropped like any other out-of-bounds write.
    pub fn draw_pixels(&self, screen: &mut PixelScreen, pixels: &[PixelData], origin: PixelPoint, scale: i32) {
        for px in pixels {
            let Some(base) = px.position.checked_mul(scale).and_then(|p| p.checked_add(origin)) else {
                continue;
            };
            let color = self.resolve_color(px.color);
            for dx in 0..scale {
                for dy in 0..scale {
                    if let Some(p) = base.checked_add(PixelPoint::new(dx, dy)) {
                        screen.plot(p, color);
                    }
                }
            }
        }
    }
}
