use crate::render::Pixel;

use super::{Line, WrappedScript};

/// What scrolling backwards does to the end-of-script flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EndPolicy {
    /// The flag stays set until a new script is installed.
    #[default]
    Sticky,

    /// Any successful backward step clears the flag.
    ClearOnStepBack,
}

/// Scroll position inside an installed [`WrappedScript`].
///
/// The cursor is in one of three states:
/// - no script installed: every operation does nothing,
/// - positioned: `current` points at the top visible row, `offset` pixels of it already scrolled away,
/// - at end: the last row has been scrolled past; the cursor parks on it with offset 0.
///
/// Only [`ScriptCursor::install`] leaves the "at end" state
/// (or a backward step, with [`EndPolicy::ClearOnStepBack`]).
#[derive(Debug, Default)]
pub struct ScriptCursor {
    script: Option<WrappedScript>,
    current: usize,
    offset: Pixel,
    at_end: bool,
    policy: EndPolicy,
}

impl ScriptCursor {
    pub fn new(policy: EndPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Replaces the script (the old one is dropped) and rewinds to the first row.
    pub fn install(&mut self, script: WrappedScript) {
        self.script = Some(script);
        self.current = 0;
        self.offset = 0;
        self.at_end = false;
    }

    pub fn script(&self) -> Option<&WrappedScript> {
        self.script.as_ref()
    }

    pub fn current_line(&self) -> usize {
        self.current
    }

    /// Pixels of the top row already scrolled off the top of the text area.
    pub fn row_offset(&self) -> Pixel {
        self.offset
    }

    pub fn is_at_end(&self) -> bool {
        self.at_end
    }

    /// Scrolls by one pixel; after a full row height the next row moves to the top.
    pub fn step_pixel(&mut self) {
        let Some(script) = &self.script else {
            return;
        };
        if self.at_end {
            return;
        }

        self.offset += 1;
        if self.offset >= script.line_height() {
            self.offset = 0;
            self.advance();
        }
    }

    /// Jumps forward by whole rows.  The pixel offset is left as it is.
    pub fn step_lines(&mut self, count: usize) {
        if self.script.is_none() {
            return;
        }
        for _ in 0..count {
            self.advance();
        }
    }

    /// Jumps back by up to `count` rows, stopping at the first row.
    pub fn step_back(&mut self, count: usize) {
        if self.script.is_none() {
            return;
        }
        let target = self.current.saturating_sub(count);
        if target != self.current && self.policy == EndPolicy::ClearOnStepBack {
            self.at_end = false;
        }
        self.current = target;
    }

    /// Rows to draw this frame, starting with the partially scrolled top row.
    ///
    /// Row `n` goes at `n * line_height - row_offset` from the top of the text area.
    /// One more row than fits on screen is returned, for the row scrolling in at the bottom.
    pub fn visible_window(&self) -> &[Line] {
        let Some(script) = &self.script else {
            return &[];
        };
        let lines = script.lines();
        let end = usize::min(self.current + script.lines_per_screen() + 1, lines.len());
        &lines[self.current..end]
    }

    fn advance(&mut self) {
        let Some(script) = &self.script else {
            return;
        };
        if self.current + 1 < script.len() {
            self.current += 1;
            self.at_end = false;
        } else {
            self.at_end = true;
        }
    }
}
