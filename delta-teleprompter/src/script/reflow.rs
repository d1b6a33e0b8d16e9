use crate::layout::Size;
use crate::render::Pixel;

use super::{Line, ReflowError, WrappedScript};

/// Longest run of text (in bytes) that may sit between two breakable spaces.
pub const DEFAULT_MAX_SEGMENT_BYTES: usize = 1022;

/// Rows added after the screenful of blank padding, so the countdown has room to scroll in.
pub const PADDING_MARGIN: usize = 4;

pub struct ReflowOptions {
    pub max_width: Pixel,
    pub max_height: Pixel,
    pub max_segment_bytes: usize,
}

impl ReflowOptions {
    pub fn new(max_width: Pixel, max_height: Pixel) -> Self {
        Self {
            max_width,
            max_height,
            max_segment_bytes: DEFAULT_MAX_SEGMENT_BYTES,
        }
    }

    #[must_use]
    pub fn max_segment_bytes(mut self, limit: usize) -> Self {
        self.max_segment_bytes = limit;
        self
    }
}

/// Wraps `text` into rows narrower than `max_width`, using `measure` for the rendered size of a string.
///
/// Shorthand for [`ReflowOptions::new`] and [`reflow_with`].
pub fn reflow<M>(text: &str, max_width: Pixel, max_height: Pixel, measure: M) -> Result<WrappedScript, ReflowError>
where
    M: FnMut(&str) -> Size,
{
    reflow_with(text, &ReflowOptions::new(max_width, max_height), measure)
}

/// Greedy word wrap.
///
/// All whitespace (newlines included) is folded into single spaces first,
/// so the script is one long paragraph.  The candidate row is re-measured at
/// every space; once it reaches `max_width`, the row is cut at the space
/// before the word that overflowed.  A single word wider than the area is
/// never split; it gets a row of its own.
///
/// The wrapped rows are preceded by a screenful of padding (see [`padding_line`]).
pub fn reflow_with<M>(text: &str, options: &ReflowOptions, mut measure: M) -> Result<WrappedScript, ReflowError>
where
    M: FnMut(&str) -> Size,
{
    let text = normalize_whitespace(text);

    let blank = measure("");
    if blank.height == 0 {
        return Err(ReflowError::ZeroLineHeight);
    }
    let lines_per_screen = options.max_height / blank.height;
    let padding = lines_per_screen + PADDING_MARGIN;

    let mut lines: Vec<Line> = (0..padding).map(|i| padding_line(padding - i)).collect();
    let mut line_height = blank.height;

    let check = |candidate: &str| {
        if candidate.len() > options.max_segment_bytes {
            Err(ReflowError::LineTooLong {
                len: candidate.len(),
                limit: options.max_segment_bytes,
            })
        } else {
            Ok(())
        }
    };

    // Byte offsets into `text`; `end` and `prev_end` always sit just after a space
    let mut start = 0;
    let mut end = 0;

    for (space, _) in text.match_indices(' ') {
        let prev_end = end;
        end = space + 1;

        let candidate = &text[start..end];
        check(candidate)?;
        let size = measure(candidate);
        line_height = size.height;

        if size.width >= options.max_width && prev_end > start {
            lines.push(Line::new(text[start..prev_end].trim_end()));
            start = prev_end;
        }
    }

    // Whatever follows the last space still has to be checked against the width
    let tail = &text[start..];
    check(tail)?;
    let size = measure(tail);
    line_height = size.height;
    if size.width >= options.max_width && end > start {
        lines.push(Line::new(text[start..end].trim_end()));
        start = end;
    }
    lines.push(Line::new(&text[start..]));

    if line_height == 0 {
        return Err(ReflowError::ZeroLineHeight);
    }

    log::debug!(
        "reflow: {} rows ({} padding) at {}x{}px, row height {}px",
        lines.len(),
        padding,
        options.max_width,
        options.max_height,
        line_height
    );

    Ok(WrappedScript::new(lines, line_height, lines_per_screen, padding))
}

/// Folds every whitespace run into one ASCII space and trims both ends.
/// Works on a copy; the caller's buffer is left alone.
pub fn normalize_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(word);
    }
    result
}

/// Padding row `from_end` rows before the first line of the script.
/// The last few rows count down "3", "2", "1", each followed by a blank row.
fn padding_line(from_end: usize) -> Line {
    match from_end {
        6 => Line::new("3"),
        4 => Line::new("2"),
        2 => Line::new("1"),
        _ => Line::new(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ROW: Pixel = 12;

    /// Every character is 10px wide, every row 12px tall.
    fn fixed_width(text: &str) -> Size {
        Size {
            width: 10 * text.chars().count(),
            height: ROW,
        }
    }

    #[test]
    fn breaks_before_the_overflowing_word() {
        let script = reflow("abc def ghijklmnop", 90, 120, fixed_width).unwrap();
        assert_eq!(script.content(), &["abc def", "ghijklmnop"]);
    }

    #[test]
    fn padding_is_a_screenful_plus_margin() {
        let script = reflow("hello", 200, 120, fixed_width).unwrap();
        assert_eq!(script.lines_per_screen(), 10);
        assert_eq!(script.padding(), 10 + PADDING_MARGIN);
        assert_eq!(script.len(), script.padding() + 1);
    }

    #[test]
    fn padding_ends_with_a_countdown() {
        let script = reflow("hello", 200, 120, fixed_width).unwrap();
        let padding = &script.lines()[..script.padding()];
        let tail: Vec<&str> = padding[padding.len() - 6..].iter().map(|l| l.as_str()).collect();
        assert_eq!(tail, ["3", "", "2", "", "1", ""]);
        assert!(padding[..padding.len() - 6].iter().all(|l| l.is_empty()));
    }

    #[test]
    fn short_padding_drops_missing_markers() {
        // one row per screen: 5 padding rows, so the "3" has no slot
        let script = reflow("hello", 200, ROW, fixed_width).unwrap();
        let padding: Vec<&str> = script.lines()[..script.padding()].iter().map(|l| l.as_str()).collect();
        assert_eq!(padding, ["", "2", "", "1", ""]);
    }

    #[test]
    fn empty_text_gives_padding_and_one_empty_line() {
        let script = reflow("", 200, 120, fixed_width).unwrap();
        assert_eq!(script.content(), &[""]);
        assert_eq!(script.line_height(), ROW);
    }

    #[test]
    fn whitespace_only_text_is_empty() {
        let script = reflow(" \n\t  \r\n", 200, 120, fixed_width).unwrap();
        assert_eq!(script.content(), &[""]);
    }

    #[test]
    fn newlines_and_tabs_become_spaces() {
        let script = reflow("one\ntwo\t\tthree\r\n\nfour", 1000, 120, fixed_width).unwrap();
        assert_eq!(script.content(), &["one two three four"]);
    }

    #[test]
    fn input_is_not_modified() {
        let text = String::from("a\tb\nc");
        reflow(&text, 1000, 120, fixed_width).unwrap();
        assert_eq!(text, "a\tb\nc");
    }

    #[test]
    fn long_word_gets_its_own_line() {
        let script = reflow("ab averyveryverylongword cd", 100, 120, fixed_width).unwrap();
        assert_eq!(script.content(), &["ab", "averyveryverylongword", "cd"]);
    }

    #[test]
    fn long_leading_word_does_not_emit_an_empty_line() {
        let script = reflow("averyveryverylongword cd ef", 100, 120, fixed_width).unwrap();
        assert_eq!(script.content(), &["averyveryverylongword", "cd ef"]);
    }

    #[test]
    fn width_equal_to_limit_breaks() {
        // "abcd " is exactly 50px
        let script = reflow("abcd efgh", 50, 120, fixed_width).unwrap();
        assert_eq!(script.content(), &["abcd", "efgh"]);
    }

    #[test]
    fn single_unbreakable_token_is_kept_whole() {
        let script = reflow("supercalifragilistic", 50, 120, fixed_width).unwrap();
        assert_eq!(script.content(), &["supercalifragilistic"]);
    }

    #[test]
    fn too_long_segment_is_rejected() {
        let word = "x".repeat(40);
        let text = format!("a {word} b");
        let options = ReflowOptions::new(10_000, 120).max_segment_bytes(32);
        let err = reflow_with(&text, &options, fixed_width).unwrap_err();
        assert_eq!(err, ReflowError::LineTooLong { len: 43, limit: 32 });
    }

    #[test]
    fn too_long_tail_is_rejected() {
        let text = "y".repeat(DEFAULT_MAX_SEGMENT_BYTES + 1);
        let err = reflow(&text, 10_000_000, 120, fixed_width).unwrap_err();
        assert!(matches!(err, ReflowError::LineTooLong { .. }));
    }

    #[test]
    fn wrapping_keeps_segments_short() {
        // Long text is fine as long as it breaks often enough
        let text = "word ".repeat(2000);
        let script = reflow(&text, 100, 120, fixed_width).unwrap();
        assert!(script.content().len() > 100);
    }

    #[test]
    fn zero_line_height_is_rejected() {
        let err = reflow("abc", 100, 100, |s| Size {
            width: s.len(),
            height: 0,
        })
        .unwrap_err();
        assert_eq!(err, ReflowError::ZeroLineHeight);
    }

    #[test]
    fn zero_height_area_still_pads_with_the_margin() {
        let script = reflow("abc", 100, 0, fixed_width).unwrap();
        assert_eq!(script.lines_per_screen(), 0);
        assert_eq!(script.padding(), PADDING_MARGIN);
    }

    #[test]
    fn normalize_collapses_runs() {
        assert_eq!(normalize_whitespace("  a \n\n b\t"), "a b");
        assert_eq!(normalize_whitespace(""), "");
    }

    proptest! {
        #[test]
        fn prop_padding_and_non_empty(text in "[a-z \n\t]{0,200}", height in 1usize..400) {
            let script = reflow(&text, 80, height, fixed_width).unwrap();
            prop_assert!(!script.content().is_empty());
            prop_assert_eq!(script.padding(), height / ROW + PADDING_MARGIN);
        }

        #[test]
        fn prop_multi_word_rows_fit(text in "[a-z]{1,12}( [a-z]{1,12}){0,40}", width in 40usize..300) {
            let script = reflow(&text, width, 120, fixed_width).unwrap();
            let content = script.content();
            for line in &content[..content.len() - 1] {
                if line.contains(' ') {
                    prop_assert!(fixed_width(line).width < width, "{:?} too wide", line);
                }
            }
        }

        #[test]
        fn prop_words_survive_in_order(text in "[a-z]{1,12}( [a-z]{1,12}){0,40}", width in 1usize..300) {
            let script = reflow(&text, width, 120, fixed_width).unwrap();
            let rejoined = script.content().iter().map(|l| l.as_str()).collect::<Vec<_>>().join(" ");
            prop_assert_eq!(rejoined, text);
        }
    }
}
