//! The teleprompter session: which screen is up, what the keys do on it,
//! and when the script advances.
//!
//! Everything here is driven by the event loop in `main` through three calls:
//! [`Session::handle`] for key presses, [`Session::update`] whenever the loop wakes up,
//! and [`Session::draw`] for each frame.  Nothing blocks and nothing needs a window,
//! so the whole state machine runs headless in tests.

pub mod input;
mod view;

use std::time::{Duration, Instant};

use crate::config::Config;
use crate::graphics::typeface::Typeface;
use crate::layout::{Rect, Size};
use crate::render::text::GlyphCache;
use crate::script::{load_script, reflow, EndPolicy, ReflowError, ScriptCursor, ScrollClock, WrappedScript};

pub use input::{command_for, Command};

/// How long the help text is shown before the script starts by itself.
pub const INTRO_DURATION: Duration = Duration::from_secs(3);
/// How long a load error stays on screen.
pub const LOAD_FAILED_DURATION: Duration = Duration::from_secs(3);
/// How long an info message (new speed, new width...) stays on screen.
pub const INFO_DURATION: Duration = Duration::from_millis(1500);

/// Screen to go back to when the help screen is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    Running,
    Paused,
    End,
}

impl From<Resume> for Screen {
    fn from(resume: Resume) -> Self {
        match resume {
            Resume::Running => Screen::Running,
            Resume::Paused => Screen::Paused,
            Resume::End => Screen::End,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Help text at start-up
    Intro { until: Instant },
    /// Help text opened with F1
    Help { resume: Resume },
    /// Reading, wrapping and installing the script on the next update
    LoadScript,
    LoadFailed { until: Instant, message: &'static str },
    Running,
    Paused,
    End,
}

/// A short message drawn over whatever screen is up.
#[derive(Debug, Clone)]
struct Notice {
    text: String,
    until: Instant,
}

pub struct Session {
    config: Config,
    typeface: Typeface,
    /// Text of the last successfully loaded script, kept for reflowing
    script: Option<String>,
    cursor: ScriptCursor,
    /// Text area size the installed script was wrapped for
    wrapped_for: Option<Size>,
    clock: ScrollClock,
    screen: Screen,
    notice: Option<Notice>,
    glyphs: GlyphCache,
    viewport: Size,
    exit: bool,
}

impl Session {
    pub fn new(config: Config, typeface: Typeface, viewport: Size, now: Instant) -> Self {
        let clock = ScrollClock::new(config.auto_scroll_speed, now);
        Self {
            config,
            typeface,
            script: None,
            cursor: ScriptCursor::new(EndPolicy::Sticky),
            wrapped_for: None,
            clock,
            screen: Screen::Intro {
                until: now + INTRO_DURATION,
            },
            notice: None,
            glyphs: GlyphCache::default(),
            viewport,
            exit: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn cursor(&self) -> &ScriptCursor {
        &self.cursor
    }

    pub fn should_exit(&self) -> bool {
        self.exit
    }

    /// The text of the info message currently on screen, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|notice| notice.text.as_str())
    }

    /// Where the script is drawn.  Once a script is installed this is the box it was wrapped for,
    /// centered in the window, so every row fits no matter how the window was resized since.
    pub fn text_area(&self) -> Rect {
        match self.wrapped_for {
            Some(size) => Rect::centered(self.viewport, size),
            None => self.configured_area(),
        }
    }

    /// The configured share of the window, centered.  New wraps are made for this.
    fn configured_area(&self) -> Rect {
        Rect::centered_share(
            self.viewport,
            self.config.text_width_percent,
            self.config.text_height_percent,
        )
    }

    /// The window changed size.  Only placement follows; the script keeps the wrap it has.
    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
        if !self.config.full_screen {
            self.config.window_width = u16::try_from(viewport.width).unwrap_or(u16::MAX).max(1);
            self.config.window_height = u16::try_from(viewport.height).unwrap_or(u16::MAX).max(1);
        }
    }

    /// Applies one key press.  `repeat` is set for presses generated by holding the key down.
    pub fn handle(&mut self, command: Command, repeat: bool, now: Instant) {
        if repeat && !command.repeats() {
            return;
        }
        if command == Command::Quit {
            log::info!("quit requested");
            self.exit = true;
            return;
        }

        match (&self.screen, command) {
            (Screen::Intro { .. }, Command::Confirm) => self.enter(Screen::LoadScript, now),

            (Screen::Help { resume }, Command::Confirm | Command::Help) => {
                let resume = *resume;
                self.enter(resume.into(), now);
            }

            (Screen::Running, Command::Confirm) => self.enter(Screen::Paused, now),
            (Screen::Paused, Command::Confirm) => self.enter(Screen::Running, now),
            (Screen::Running, Command::Help) => self.enter(Screen::Help { resume: Resume::Running }, now),
            (Screen::Paused, Command::Help) => self.enter(Screen::Help { resume: Resume::Paused }, now),

            (Screen::End, Command::Confirm) => self.enter(Screen::LoadScript, now),
            (Screen::End, Command::Help) => self.enter(Screen::Help { resume: Resume::End }, now),

            (Screen::Running | Screen::Paused, command) => self.adjust(command, now),

            _ => {}
        }
    }

    /// Advances timers and the scroll position to `now`.
    /// Returns `true` if anything visible changed.
    pub fn update(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if self.notice.as_ref().is_some_and(|notice| now >= notice.until) {
            self.notice = None;
            changed = true;
        }

        // Ticks that fall due outside the running screen are dropped here
        let ticks = self.clock.poll(now);
        let running = self.screen == Screen::Running;
        for _ in 0..ticks {
            if self.cursor.is_at_end() || !self.clock.tick(running, &mut self.cursor) {
                break;
            }
            changed = true;
        }

        match self.screen {
            Screen::Intro { until } if now >= until => {
                self.enter(Screen::LoadScript, now);
                changed = true;
            }
            Screen::LoadFailed { until, .. } if now >= until => {
                self.enter(Screen::End, now);
                changed = true;
            }
            Screen::Running | Screen::Paused if self.cursor.is_at_end() => {
                log::info!("end of script");
                self.enter(Screen::End, now);
                changed = true;
            }
            _ => {}
        }

        if self.screen == Screen::LoadScript {
            self.load(now);
            changed = true;
        }

        changed
    }

    /// When [`Session::update`] next has something to do, or `None` to wait for input.
    pub fn next_deadline(&self) -> Option<Instant> {
        let screen = match self.screen {
            Screen::Intro { until } | Screen::LoadFailed { until, .. } => Some(until),
            Screen::Running => Some(self.clock.next_deadline()),
            _ => None,
        };
        let notice = self.notice.as_ref().map(|notice| notice.until);
        match (screen, notice) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn enter(&mut self, screen: Screen, now: Instant) {
        log::debug!("screen: {:?} -> {:?}", self.screen, screen);
        if screen == Screen::Running {
            self.clock.restart(now);
        }
        self.screen = screen;
    }

    fn notify(&mut self, text: String, now: Instant) {
        log::info!("{text}");
        self.notice = Some(Notice {
            text,
            until: now + INFO_DURATION,
        });
    }

    /// Reads the script file, wraps it and starts scrolling it from the top.
    fn load(&mut self, now: Instant) {
        let text = match load_script(&self.config.script_path) {
            Ok(text) => text,
            Err(err) => {
                log::error!("{err}");
                self.fail(err.headline(), now);
                return;
            }
        };

        match self.wrap(&text) {
            Ok(wrapped) => {
                log::info!(
                    "script ready: {} rows, {} per screen",
                    wrapped.content().len(),
                    wrapped.lines_per_screen()
                );
                self.install(wrapped);
                self.script = Some(text);
                self.enter(Screen::Running, now);
            }
            Err(err) => {
                log::error!("cannot wrap script: {err}");
                self.fail(err.headline(), now);
            }
        }
    }

    fn fail(&mut self, message: &'static str, now: Instant) {
        self.enter(
            Screen::LoadFailed {
                until: now + LOAD_FAILED_DURATION,
                message,
            },
            now,
        );
    }

    /// Wraps `text` for the current font size and text area.
    fn wrap(&self, text: &str) -> Result<WrappedScript, ReflowError> {
        let area = self.configured_area();
        let metrics = self.typeface.metrics(self.config.font_size);
        reflow(text, area.size.width, area.size.height, |candidate| metrics.measure(candidate))
    }

    fn install(&mut self, wrapped: WrappedScript) {
        self.wrapped_for = Some(self.configured_area().size);
        self.cursor.install(wrapped);
    }

    /// Keys that only mean something while the script is on screen.
    fn adjust(&mut self, command: Command, now: Instant) {
        match command {
            Command::ScrollForward => self.cursor.step_lines(self.config.scroll_line_count.into()),
            Command::ScrollBack => self.cursor.step_back(self.config.scroll_line_count.into()),

            Command::Faster | Command::Slower => {
                if self.config.adjust_speed(command == Command::Faster) {
                    self.clock.set_speed(self.config.auto_scroll_speed, now);
                    log::debug!("scroll interval: {:?}", self.clock.interval());
                }
                self.notify(format!("Auto scroll speed: {}", self.config.auto_scroll_speed), now);
            }

            Command::GrowFont | Command::ShrinkFont => {
                let previous = self.config.font_size;
                if self.config.adjust_font_size(command == Command::GrowFont) {
                    if self.rewrap(now) {
                        self.notify(format!("Font size: {}", self.config.font_size), now);
                    } else {
                        self.config.font_size = previous;
                    }
                }
            }

            Command::NarrowerText | Command::WiderText => {
                let previous = self.config.text_width_percent;
                if self.config.adjust_text_width(command == Command::WiderText) && !self.rewrap(now) {
                    self.config.text_width_percent = previous;
                    return;
                }
                self.notify(format!("Text width: {}%", self.config.text_width_percent), now);
            }

            Command::ShorterText | Command::TallerText => {
                let previous = self.config.text_height_percent;
                if self.config.adjust_text_height(command == Command::TallerText) && !self.rewrap(now) {
                    self.config.text_height_percent = previous;
                    return;
                }
                self.notify(format!("Text height: {}%", self.config.text_height_percent), now);
            }

            Command::ToggleAlignment => {
                self.config.alignment = self.config.alignment.toggled();
                self.notify(format!("Alignment: {:?}", self.config.alignment), now);
            }

            Command::ToggleFullScreen => {
                self.config.full_screen = !self.config.full_screen;
                log::info!("full screen: {}", self.config.full_screen);
            }

            Command::Confirm | Command::Help | Command::Quit => {}
        }
    }

    /// Wraps the loaded script again after a font or area change; this starts it over from the top.
    /// On failure the current wrap stays installed and `false` is returned.
    fn rewrap(&mut self, now: Instant) -> bool {
        let Some(text) = &self.script else {
            return true;
        };
        match self.wrap(text) {
            Ok(wrapped) => {
                self.install(wrapped);
                self.glyphs.clear();
                true
            }
            Err(err) => {
                log::warn!("cannot wrap script: {err}");
                self.notify(format!("Cannot wrap script: {err}"), now);
                false
            }
        }
    }
}
