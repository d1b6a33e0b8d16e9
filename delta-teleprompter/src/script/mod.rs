//! The scrolling engine: word wrapping, the scroll cursor and the tick source that drives it.
//!
//! Nothing in here touches the window or the font directly.
//! Glyph measurement comes in as a callback, and the renderer only ever reads from [`ScriptCursor`].

pub mod clock;
pub mod cursor;
pub mod reflow;
pub mod source;

use std::fmt;
use std::ops::Deref;

use thiserror::Error;

use crate::render::Pixel;

pub use clock::ScrollClock;
pub use cursor::{EndPolicy, ScriptCursor};
pub use reflow::{reflow, ReflowOptions};
pub use source::{load_script, ScriptLoadError};

/// One wrapped output row.  Produced once per reflow and never mutated afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Line(Box<str>);

impl Line {
    pub fn new(text: &str) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Line {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl PartialEq<&str> for Line {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// The result of a successful [`reflow`]: padding rows followed by the wrapped script.
///
/// Never empty; even an empty script ends with one (empty) content line.
/// A new font, size or text area produces a whole new `WrappedScript`;
/// this one is then dropped rather than patched.
#[derive(Debug, Clone)]
pub struct WrappedScript {
    lines: Vec<Line>,
    line_height: Pixel,
    lines_per_screen: usize,
    padding: usize,
}

impl WrappedScript {
    pub(crate) fn new(lines: Vec<Line>, line_height: Pixel, lines_per_screen: usize, padding: usize) -> Self {
        debug_assert!(!lines.is_empty());
        debug_assert!(padding < lines.len());
        Self {
            lines,
            line_height,
            lines_per_screen,
            padding,
        }
    }

    /// Every row, padding included.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Only the rows produced from the script text.
    pub fn content(&self) -> &[Line] {
        &self.lines[self.padding..]
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Height of one rendered row; the same for every row of the script.
    pub fn line_height(&self) -> Pixel {
        self.line_height
    }

    /// How many whole rows fit into the text area the script was wrapped for.
    pub fn lines_per_screen(&self) -> usize {
        self.lines_per_screen
    }

    /// Number of leading padding rows (blank rows plus the countdown markers).
    pub fn padding(&self) -> usize {
        self.padding
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReflowError {
    /// The text between two breakable whitespace boundaries grew past the segment limit.
    #[error("line too long: {len} bytes without a break (limit is {limit})")]
    LineTooLong { len: usize, limit: usize },

    /// The measurement callback reported rows with no height.
    #[error("font reports a line height of zero")]
    ZeroLineHeight,
}

impl ReflowError {
    /// Short text for the error screen.
    pub fn headline(&self) -> &'static str {
        match self {
            Self::LineTooLong { .. } => "ERROR: Text too long!",
            Self::ZeroLineHeight => "ERROR: Font has no line height!",
        }
    }
}
