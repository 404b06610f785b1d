//! Decoder for the compact sheet-text animation format.
//!
//! A sheet text is a sequence of lines. A line that does not start with `*`
//! names the sheet that following animation strings belong to; a line that
//! starts with `*` is one complete animation string:
//!
//! ```text
//! hero
//! *idle*!8,8!<1,0,6,8>{[255,0,0](0-1,2)#0.1#}{^[](0-1)[0,0,255](1-3)#0.1#}&0&
//! ```
//!
//! | tag          | meaning                                                     |
//! |--------------|-------------------------------------------------------------|
//! | `*name*`     | animation name                                              |
//! | `!w,h!`      | canvas size                                                 |
//! | `<l,b,w,h>`  | hitbox                                                      |
//! | `{...}`      | frame; `{^` marks a delta frame against the previous one    |
//! | `[...]`      | current color: `[]`, `[grey]`, `[grey,a]`, `[r,g,b]`, `[r,g,b,a]` |
//! | `(y-x,x,..)` | one row of pixels in the current color                      |
//! | `#t#`        | frame duration in seconds                                   |
//! | `&n&`        | loop mode ordinal                                           |
//!
//! The scan is a single pass over the characters with an explicit state stack
//! and one character of lookahead after `{`.

use std::collections::{HashMap, HashSet};

use crate::api::error::ParseError;
use crate::components::animation::{AnimationData, FrameData, LoopMode, PixelData};
use crate::core::color::Rgba;
use crate::core::geometry::{PixelPoint, PixelRect};

/// Which tag the scanner is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Name,
    Size,
    Hitbox,
    /// Just saw `{`; the next character decides delta mode.
    FrameStart,
    Frame,
    Color,
    RowY,
    RowX,
    Duration,
    Loop,
}

/// One animation string paired with the sheet it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetEntry<'a> {
    pub sheet: &'a str,
    pub source: &'a str,
}

/// Split sheet text into animation strings tagged with their sheet name.
///
/// Strings that appear before any sheet line belong to the sheet `""`.
pub fn sheet_entries(text: &str) -> impl Iterator<Item = SheetEntry<'_>> {
    let mut sheet = "";
    text.lines().filter_map(move |line| {
        if line.is_empty() {
            None
        } else if line.starts_with('*') {
            Some(SheetEntry { sheet, source: line })
        } else {
            sheet = line;
            None
        }
    })
}

/// Decode one animation string.
pub fn parse_animation(source: &str) -> Result<AnimationData, ParseError> {
    let mut parser = AnimationParser::default();
    for c in source.chars() {
        parser.feed(c)?;
    }
    Ok(parser.finish())
}

#[derive(Debug, Default)]
struct AnimationParser {
    states: Vec<ParseState>,
    scratch: String,

    name: String,
    frames: Vec<FrameData>,
    size: PixelPoint,
    hitbox: PixelRect,
    loop_mode: LoopMode,

    color: Rgba,
    row_y: i32,
    duration: f32,
    delta: bool,
    pending: Vec<PixelData>,
    previous: Vec<PixelData>,
}

impl AnimationParser {
    fn top(&self) -> Option<ParseState> {
        self.states.last().copied()
    }

    fn is_in(&self, state: ParseState) -> bool {
        self.top() == Some(state)
    }

    fn push(&mut self, state: ParseState) {
        self.states.push(state);
        self.scratch.clear();
    }

    /// Pop the top state and hand back the text accumulated inside it.
    fn close(&mut self) -> String {
        self.states.pop();
        std::mem::take(&mut self.scratch)
    }

    fn feed(&mut self, c: char) -> Result<(), ParseError> {
        if self.is_in(ParseState::FrameStart) {
            self.states.pop();
            self.states.push(ParseState::Frame);
            self.delta = c == '^';
            if self.delta {
                return Ok(());
            }
        }

        // Names are literal so font sheets can name glyphs like `!` or `#`.
        if self.is_in(ParseState::Name) && c != '*' {
            self.scratch.push(c);
            return Ok(());
        }

        match c {
            '*' => {
                if self.is_in(ParseState::Name) {
                    self.name = self.close();
                } else {
                    self.push(ParseState::Name);
                }
            }
            '!' => {
                if self.is_in(ParseState::Size) {
                    let value = self.close();
                    if let Some([w, h]) = parse_ints::<2>(&value, "size")? {
                        self.size = PixelPoint::new(w, h);
                    }
                } else {
                    self.push(ParseState::Size);
                }
            }
            '<' => self.push(ParseState::Hitbox),
            '>' => {
                if self.is_in(ParseState::Hitbox) {
                    let value = self.close();
                    if let Some([l, b, w, h]) = parse_ints::<4>(&value, "hitbox")? {
                        self.hitbox = PixelRect::new(l, b, w, h);
                    }
                }
            }
            '{' => self.push(ParseState::FrameStart),
            '}' => {
                self.finish_frame();
                if self.is_in(ParseState::Frame) {
                    self.states.pop();
                }
            }
            '[' => self.push(ParseState::Color),
            ']' => {
                if self.is_in(ParseState::Color) {
                    let value = self.close();
                    self.color = parse_color(&value)?;
                }
            }
            '(' => self.push(ParseState::RowY),
            '-' if self.is_in(ParseState::RowY) => {
                let value = self.close();
                self.row_y = parse_int(&value, "row y")?;
                self.push(ParseState::RowX);
            }
            ')' => {
                if self.is_in(ParseState::RowX) {
                    let value = self.close();
                    self.push_row(&value)?;
                } else if self.is_in(ParseState::RowY) {
                    // `()` never saw its `-`.
                    self.states.pop();
                }
                self.scratch.clear();
            }
            '#' => {
                if self.is_in(ParseState::Duration) {
                    let value = self.close();
                    let value = value.trim();
                    if !value.is_empty() {
                        self.duration = value
                            .parse()
                            .map_err(|_| ParseError::InvalidDuration(value.to_string()))?;
                    }
                } else {
                    self.push(ParseState::Duration);
                }
            }
            '&' => {
                if self.is_in(ParseState::Loop) {
                    let value = self.close();
                    let value = value.trim();
                    if !value.is_empty() {
                        let ordinal: i64 = value.parse().map_err(|_| ParseError::InvalidInteger {
                            field: "loop mode",
                            value: value.to_string(),
                        })?;
                        self.loop_mode = LoopMode::from_ordinal(ordinal)
                            .ok_or(ParseError::InvalidLoopMode(ordinal))?;
                    }
                } else {
                    self.push(ParseState::Loop);
                }
            }
            other => self.scratch.push(other),
        }
        Ok(())
    }

    fn push_row(&mut self, value: &str) -> Result<(), ParseError> {
        if value.trim().is_empty() {
            return Ok(());
        }
        for x in value.split(',') {
            let x = parse_int(x, "row x")?;
            self.pending
                .push(PixelData::new(PixelPoint::new(x, self.row_y), self.color));
        }
        Ok(())
    }

    fn finish_frame(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        let pixels = if self.delta {
            apply_delta(&self.previous, pending)
        } else {
            pending
        };

        self.previous = pixels.clone();
        self.frames.push(FrameData::new(pixels, self.duration));
        self.duration = 0.0;
        self.delta = false;
    }

    fn finish(self) -> AnimationData {
        AnimationData::new(self.name, self.frames, self.size, self.hitbox, self.loop_mode)
    }
}

/// Rebuild a full frame from the previous frame and a change set.
///
/// Every position mentioned in `changes` drops the previous pixel there; the
/// last change per position wins and is kept only if it has non-zero alpha.
fn apply_delta(previous: &[PixelData], changes: Vec<PixelData>) -> Vec<PixelData> {
    let touched: HashSet<PixelPoint> = changes.iter().map(|p| p.position).collect();

    let mut latest: Vec<PixelData> = Vec::with_capacity(changes.len());
    let mut slot: HashMap<PixelPoint, usize> = HashMap::with_capacity(changes.len());
    for change in changes {
        match slot.get(&change.position) {
            Some(&i) => latest[i] = change,
            None => {
                slot.insert(change.position, latest.len());
                latest.push(change);
            }
        }
    }

    previous
        .iter()
        .filter(|p| !touched.contains(&p.position))
        .copied()
        .chain(latest.into_iter().filter(|p| p.color.a > 0))
        .collect()
}

fn parse_int(value: &str, field: &'static str) -> Result<i32, ParseError> {
    value.trim().parse().map_err(|_| ParseError::InvalidInteger {
        field,
        value: value.to_string(),
    })
}

/// Parse exactly `N` comma-separated integers. An empty value yields `None`.
fn parse_ints<const N: usize>(
    value: &str,
    field: &'static str,
) -> Result<Option<[i32; N]>, ParseError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() != N {
        return Err(ParseError::BadArity {
            tag: field,
            expected: if N == 2 { "2" } else { "4" },
            found: parts.len(),
            value: value.to_string(),
        });
    }
    let mut out = [0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = parse_int(part, field)?;
    }
    Ok(Some(out))
}

fn parse_color(value: &str) -> Result<Rgba, ParseError> {
    if value.is_empty() {
        return Ok(Rgba::TRANSPARENT);
    }
    let channels = value
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<u8>()
                .map_err(|_| ParseError::InvalidColorComponent(v.to_string()))
        })
        .collect::<Result<Vec<u8>, _>>();

    // Arity is checked before the components so a 5-value color reports arity.
    let count = value.split(',').count();
    if !(1..=4).contains(&count) {
        return Err(ParseError::BadArity {
            tag: "color",
            expected: "0 to 4",
            found: count,
            value: value.to_string(),
        });
    }

    Ok(match channels?.as_slice() {
        [grey] => Rgba::grey(*grey, 255),
        [grey, a] => Rgba::grey(*grey, *a),
        [r, g, b] => Rgba::rgb(*r, *g, *b),
        [r, g, b, a] => Rgba::new(*r, *g, *b, *a),
        _ => Rgba::TRANSPARENT,
    })
}
