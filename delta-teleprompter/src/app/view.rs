use crate::layout::{Alignment, Position, Rect, Size};
use crate::render::text::TextLine;
use crate::render::{DrawHandle, Drawable};

use super::{Screen, Session};

/// Pixel size of everything that isn't the script: help, banners, messages.
const UI_FONT_SIZE: u16 = 20;

const HELP_TEXT: &[&str] = &[
    concat!("Delta Teleprompter v", env!("CARGO_PKG_VERSION")),
    "",
    "Enter or Space: start, pause, resume",
    "Up / Down: jump forward / back",
    "Right / Left: faster / slower",
    "+ / -: bigger / smaller text",
    "F5 / F6: narrower / wider text",
    "F7 / F8: shorter / taller text",
    "F2: center or left align",
    "F11: full screen",
    "F1: this help",
    "Escape: quit",
];

const PAUSED_BANNER: &[&str] = &[
    "** PAUSED **",
    concat!("Teleprompter v", env!("CARGO_PKG_VERSION")),
    "Licence: GPLv3",
    "ABSOLUTELY NO WARRANTY!",
];

const END_BANNER: &[&str] = &["** OVER **", "Press Enter to replay,", "Escape to quit..."];

impl Session {
    /// Renders the current screen into `handle`, which covers the whole window.
    pub fn draw(&mut self, handle: &mut DrawHandle) {
        handle.fill(self.config.background_color);
        let window = handle.bounds();

        match &self.screen {
            Screen::Intro { .. } | Screen::Help { .. } => self.draw_block(handle, HELP_TEXT, window, false),
            Screen::LoadScript => self.draw_block(handle, &["Loading script..."], window, false),
            Screen::LoadFailed { message, .. } => {
                let message = *message;
                self.draw_block(handle, &[message], window, false);
            }
            Screen::Running => self.draw_script(handle),
            Screen::Paused => {
                self.draw_script(handle);
                self.draw_block(handle, PAUSED_BANNER, window, true);
            }
            Screen::End => {
                self.draw_script(handle);
                self.draw_block(handle, END_BANNER, window, true);
            }
        }

        if let Some(notice) = self.notice.take() {
            let row = self.typeface.metrics(UI_FONT_SIZE).line_height();
            let strip = Rect {
                origin: Position {
                    x: 0,
                    y: window.bottom() - (2 * row) as i32,
                },
                size: Size {
                    width: window.size.width,
                    height: row,
                },
            };
            self.draw_block(handle, &[notice.text.as_str()], strip, true);
            self.notice = Some(notice);
        }
    }

    /// The visible rows of the script, the top one shifted up by the scrolled-off pixels.
    fn draw_script(&mut self, handle: &mut DrawHandle) {
        let area = self.text_area();
        let Some(script) = self.cursor.script() else {
            return;
        };
        let metrics = self.typeface.metrics(self.config.font_size);
        let row_height = script.line_height() as i32;

        let mut y = area.top() - self.cursor.row_offset() as i32;
        for line in self.cursor.visible_window() {
            if y >= area.bottom() {
                break;
            }
            let row = TextLine::layout(line, &metrics, &mut self.glyphs);
            let x = self.config.alignment.x_in(area, row.width());
            row.draw_at(handle, Position { x, y }, self.config.text_color, area);
            y += row_height;
        }
    }

    /// Draws `lines` centered in `area`, optionally on a background-colored box so it reads over the script.
    fn draw_block(&mut self, handle: &mut DrawHandle, lines: &[&str], area: Rect, boxed: bool) {
        let metrics = self.typeface.metrics(UI_FONT_SIZE);
        let row_height = metrics.line_height();
        let rows: Vec<TextLine> = lines
            .iter()
            .map(|line| TextLine::layout(line, &metrics, &mut self.glyphs))
            .collect();

        let width = rows.iter().map(TextLine::width).max().unwrap_or(0);
        let height = rows.len() * row_height;
        let top = area.top() + (area.size.height.saturating_sub(height) / 2) as i32;

        if boxed {
            let margin = row_height / 2;
            let left = Alignment::Center.x_in(area, width + 2 * margin);
            handle.fill_rect(
                Rect {
                    origin: Position {
                        x: left,
                        y: top - margin as i32,
                    },
                    size: Size {
                        width: width + 2 * margin,
                        height: height + 2 * margin,
                    },
                },
                self.config.background_color,
            );
        }

        let color = self.config.text_color;
        let clip = handle.bounds();
        for (index, row) in rows.iter().enumerate() {
            let position = Position {
                x: Alignment::Center.x_in(area, row.width()),
                y: top + (index * row_height) as i32,
            };
            row.draw_at(handle, position, color, clip);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Instant;

    use crate::app::{Command, Session};
    use crate::config::Config;
    use crate::graphics::color::{self, Color};
    use crate::graphics::typeface::Typeface;
    use crate::layout::Size;
    use crate::render::DrawHandle;

    const WIDTH: usize = 320;
    const HEIGHT: usize = 240;

    fn session(script: &str, config: Config) -> (Session, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.txt");
        fs::write(&path, script).unwrap();
        let config = Config {
            script_path: path,
            ..config
        };
        let viewport = Size {
            width: WIDTH,
            height: HEIGHT,
        };
        (
            Session::new(config, Typeface::try_default().unwrap(), viewport, Instant::now()),
            dir,
        )
    }

    fn render(session: &mut Session) -> Vec<u32> {
        let mut buffer = vec![0; WIDTH * HEIGHT];
        session.draw(&mut DrawHandle::new(&mut buffer, WIDTH, HEIGHT));
        buffer
    }

    /// Rows (top to bottom) that contain at least one pixel of `color`.
    fn rows_with(buffer: &[u32], color: Color) -> Vec<usize> {
        let pixel = color::to_pixel(color);
        (0..HEIGHT)
            .filter(|&y| buffer[y * WIDTH..(y + 1) * WIDTH].contains(&pixel))
            .collect()
    }

    fn start(session: &mut Session) {
        let now = Instant::now();
        session.handle(Command::Confirm, false, now);
        session.update(now);
    }

    #[test]
    fn intro_shows_help_on_background() {
        let config = Config {
            background_color: Color::new(0, 0, 0x80),
            ..Config::default()
        };
        let (mut session, _dir) = session("hello", config);
        let buffer = render(&mut session);
        assert_eq!(buffer[0], 0x000080);
        assert!(!rows_with(&buffer, Config::default().text_color).is_empty());
    }

    #[test]
    fn nothing_is_drawn_outside_the_text_area() {
        let (mut session, _dir) = session("hello", Config::default());
        start(&mut session);
        // Only padding rows and the countdown markers are up at first
        let buffer = render(&mut session);
        let area = session.text_area();
        let lit = rows_with(&buffer, Config::default().text_color);
        assert!(lit.iter().all(|&y| (area.top()..area.bottom()).contains(&(y as i32))));
    }

    #[test]
    fn script_is_clipped_to_text_area() {
        let config = Config {
            text_height_percent: 50,
            ..Config::default()
        };
        let (mut session, _dir) = session(&"word ".repeat(200), config);
        start(&mut session);
        let now = Instant::now();
        for _ in 0..4 {
            session.handle(Command::ScrollForward, false, now);
        }

        let buffer = render(&mut session);
        let area = session.text_area();
        let lit = rows_with(&buffer, Config::default().text_color);
        assert!(!lit.is_empty());
        assert!(lit.iter().all(|&y| (area.top()..area.bottom()).contains(&(y as i32))));
    }

    #[test]
    fn pause_banner_covers_script() {
        let (mut session, _dir) = session(&"word ".repeat(200), Config::default());
        start(&mut session);
        let running = render(&mut session);
        session.handle(Command::Confirm, false, Instant::now());
        let paused = render(&mut session);
        assert_ne!(running, paused);
    }
}
