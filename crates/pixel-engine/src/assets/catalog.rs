use std::collections::HashMap;
use std::sync::Arc;

use crate::api::error::LookupError;
use crate::assets::parser::{parse_animation, sheet_entries};
use crate::components::animation::{AnimationData, PixelData};
use crate::core::geometry::{PixelPoint, PixelRect};

/// Catalog of parsed animations, keyed by sprite-sheet name.
///
/// Built once at startup from sheet texts and read-only afterwards. Animations
/// are shared with sprite components through `Arc`, so a catalog wrapped in an
/// `Arc` can be handed to any number of components.
#[derive(Debug, Default, Clone)]
pub struct AnimationCatalog {
    sheets: HashMap<String, Vec<Arc<AnimationData>>>,
}

impl AnimationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a set of sheet texts.
    pub fn from_texts<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        let mut catalog = Self::new();
        for text in texts {
            catalog.load_text(text);
        }
        log::debug!(
            "animation catalog loaded: {} sheets, {} animations",
            catalog.sheets.len(),
            catalog.animation_count()
        );
        catalog
    }

    /// Parse one sheet text and append every well-formed animation.
    ///
    /// A malformed animation string is logged and skipped; the rest of the
    /// text still loads. Returns the number of animations added.
    pub fn load_text(&mut self, text: &str) -> usize {
        let mut loaded = 0;
        for entry in sheet_entries(text) {
            match parse_animation(entry.source) {
                Ok(anim) => {
                    self.insert(entry.sheet, anim);
                    loaded += 1;
                }
                Err(err) => {
                    log::error!(
                        "error reading animation string... {}: {} ({})",
                        entry.sheet,
                        entry.source,
                        err
                    );
                }
            }
        }
        loaded
    }

    /// Append an animation to a sheet, creating the sheet if needed.
    pub fn insert(&mut self, sheet: &str, anim: AnimationData) {
        self.sheets
            .entry(sheet.to_string())
            .or_default()
            .push(Arc::new(anim));
    }

    /// All animations of a sheet in parse order.
    pub fn sheet(&self, sheet: &str) -> Option<&[Arc<AnimationData>]> {
        self.sheets.get(sheet).map(Vec::as_slice)
    }

    pub fn has_sheet(&self, sheet: &str) -> bool {
        self.sheets.contains_key(sheet)
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    /// Look up an animation by name. The first one parsed wins on duplicates.
    pub fn get(&self, sheet: &str, animation: &str) -> Result<&Arc<AnimationData>, LookupError> {
        let anims = self
            .sheets
            .get(sheet)
            .ok_or_else(|| LookupError::UnknownSheet(sheet.to_string()))?;
        anims
            .iter()
            .find(|a| a.name == animation)
            .ok_or_else(|| LookupError::UnknownAnimation {
                sheet: sheet.to_string(),
                animation: animation.to_string(),
            })
    }

    /// Canvas size of an animation, or zero if it cannot be found.
    pub fn anim_size(&self, sheet: &str, animation: &str) -> PixelPoint {
        self.get_logged(sheet, animation)
            .map(|a| a.size)
            .unwrap_or_default()
    }

    /// Hitbox of an animation, or an empty rect if it cannot be found.
    pub fn anim_hitbox(&self, sheet: &str, animation: &str) -> PixelRect {
        self.get_logged(sheet, animation)
            .map(|a| a.hitbox)
            .unwrap_or_default()
    }

    /// Pixels of one frame, flipped against the animation's own canvas size.
    ///
    /// Returns `None` for an unknown animation or an out-of-range frame.
    pub fn frame_pixels(
        &self,
        sheet: &str,
        animation: &str,
        frame: usize,
        flip_x: bool,
        flip_y: bool,
    ) -> Option<Vec<PixelData>> {
        let anim = self.get(sheet, animation).ok()?;
        let data = anim.frame(frame)?;
        Some(data.pixels_oriented(flip_x, flip_y, anim.size))
    }

    /// Like `get`, but an unknown sheet is logged. Unknown animations are not,
    /// since callers use these lookups to probe for optional glyphs.
    fn get_logged(&self, sheet: &str, animation: &str) -> Option<&Arc<AnimationData>> {
        match self.get(sheet, animation) {
            Ok(anim) => Some(anim),
            Err(err @ LookupError::UnknownSheet(_)) => {
                log::error!("{}", err);
                None
            }
            Err(_) => None,
        }
    }

    pub fn animation_count(&self) -> usize {
        self.sheets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::animation::LoopMode;

    const HERO: &str = "hero\n\
        *idle*!1,1!{[255](0-0)#0.1#}&0&\n\
        *jump*!2,2!{[255](0-0,1)#0.1#}&1&\n";

    #[test]
    fn loads_from_text() {
        let catalog = AnimationCatalog::from_texts([HERO]);
        assert_eq!(catalog.animation_count(), 2);
        let jump = catalog.get("hero", "jump").expect("jump should exist");
        assert_eq!(jump.size, PixelPoint::new(2, 2));
        assert_eq!(jump.loop_mode, LoopMode::PlayOnce);
    }

    #[test]
    fn malformed_string_is_skipped() {
        let text = "hero\n*broken*!a,1!\n*ok*!1,1!{[1](0-0)}\n";
        let mut catalog = AnimationCatalog::new();
        assert_eq!(catalog.load_text(text), 1);
        assert!(catalog.get("hero", "ok").is_ok());
        assert!(catalog.get("hero", "broken").is_err());
        assert_eq!(catalog.sheet("hero").map(|s| s.len()), Some(1));
    }

    #[test]
    fn first_match_wins_on_duplicate_names() {
        let text = "hero\n*idle*!1,1!\n*idle*!5,5!\n";
        let catalog = AnimationCatalog::from_texts([text]);
        assert_eq!(catalog.get("hero", "idle").unwrap().size, PixelPoint::new(1, 1));
    }

    #[test]
    fn multiple_sheets_in_one_text() {
        let text = "hero\n*idle*\nfont\n*a*\n*b*\n";
        let catalog = AnimationCatalog::from_texts([text]);
        assert_eq!(catalog.sheet("hero").map(|s| s.len()), Some(1));
        assert_eq!(catalog.sheet("font").map(|s| s.len()), Some(2));
        let mut names: Vec<_> = catalog.sheet_names().collect();
        names.sort();
        assert_eq!(names, vec!["font", "hero"]);
    }

    #[test]
    fn lookup_errors() {
        let catalog = AnimationCatalog::from_texts([HERO]);
        assert_eq!(
            catalog.get("villain", "idle").unwrap_err(),
            LookupError::UnknownSheet("villain".into())
        );
        assert_eq!(
            catalog.get("hero", "run").unwrap_err(),
            LookupError::UnknownAnimation {
                sheet: "hero".into(),
                animation: "run".into()
            }
        );
    }

    #[test]
    fn size_and_hitbox_queries() {
        let text = "hero\n*idle*!3,2!<1,0,1,2>{[1](0-0)[2](1-2)}\n";
        let catalog = AnimationCatalog::from_texts([text]);
        assert_eq!(catalog.anim_size("hero", "idle"), PixelPoint::new(3, 2));
        assert_eq!(catalog.anim_hitbox("hero", "idle"), PixelRect::new(1, 0, 1, 2));
        assert_eq!(catalog.anim_size("hero", "run"), PixelPoint::ZERO);
        assert_eq!(catalog.anim_hitbox("nobody", "idle"), PixelRect::default());
    }

    #[test]
    fn frame_pixels_query() {
        let text = "hero\n*idle*!3,2!{[1](0-0)[2](1-2)}\n";
        let catalog = AnimationCatalog::from_texts([text]);
        let flipped = catalog.frame_pixels("hero", "idle", 0, true, true).unwrap();
        assert_eq!(flipped[0].position, PixelPoint::new(2, 1));
        assert_eq!(flipped[1].position, PixelPoint::new(0, 0));
        assert!(catalog.frame_pixels("hero", "idle", 1, false, false).is_none());
        assert!(catalog.frame_pixels("hero", "run", 0, false, false).is_none());
    }

    #[test]
    fn empty_catalog() {
        let catalog = AnimationCatalog::new();
        assert!(catalog.is_empty());
        assert!(!catalog.has_sheet("hero"));
        assert!(catalog.sheet("hero").is_none());
    }
}
