//! Persisted settings.
//!
//! The record is a fixed-size little-endian blob guarded by a version byte.
//! Anything that does not match exactly (size or version) is thrown away as a
//! whole and the defaults are used instead; a record is never partially merged.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::graphics::color::{Color, BLACK, WHITE};
use crate::layout::Alignment;

pub const CONFIG_VERSION: u8 = 1;

const PATH_FIELD_LEN: usize = 255;

/// version, two paths, font size, width/height %, window size, two colors, then four single bytes
pub const RECORD_LEN: usize = 1 + 2 * PATH_FIELD_LEN + 2 + 1 + 1 + 2 + 2 + 3 + 3 + 1 + 1 + 1 + 1;

pub const FONT_SIZE_RANGE: (u16, u16) = (6, 200);
pub const FONT_SIZE_STEP: u16 = 2;

pub const TEXT_PERCENT_RANGE: (u8, u8) = (10, 100);
pub const TEXT_PERCENT_STEP: u8 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file i/o")]
    Io(#[from] io::Error),

    #[error("config record is {found} bytes, expected {expected}", expected = RECORD_LEN)]
    RecordLength { found: usize },

    #[error("config version {found} does not match {expected}", expected = CONFIG_VERSION)]
    VersionMismatch { found: u8 },

    #[error("path is longer than {} bytes: {}", PATH_FIELD_LEN, .0.display())]
    PathTooLong(PathBuf),

    #[error("path is not valid UTF-8")]
    NonUtf8Path,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub script_path: PathBuf,
    /// `None` means the embedded font
    pub font_path: Option<PathBuf>,
    pub font_size: u16,
    pub text_width_percent: u8,
    pub text_height_percent: u8,
    pub window_width: u16,
    pub window_height: u16,
    pub background_color: Color,
    pub text_color: Color,
    pub alignment: Alignment,
    /// 0 (slowest) to 255 (fastest)
    pub auto_scroll_speed: u8,
    /// Rows jumped by one press of Up/Down
    pub scroll_line_count: u8,
    pub full_screen: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            script_path: PathBuf::from("script.txt"),
            font_path: None,
            font_size: 36,
            text_width_percent: 90,
            text_height_percent: 90,
            window_width: 640,
            window_height: 480,
            background_color: BLACK,
            text_color: WHITE,
            alignment: Alignment::Center,
            auto_scroll_speed: 240,
            scroll_line_count: 5,
            full_screen: false,
        }
    }
}

impl Config {
    /// Pulls every value back into its allowed range.
    pub fn clamp(&mut self) {
        self.font_size = self.font_size.clamp(FONT_SIZE_RANGE.0, FONT_SIZE_RANGE.1);
        self.text_width_percent = self
            .text_width_percent
            .clamp(TEXT_PERCENT_RANGE.0, TEXT_PERCENT_RANGE.1);
        self.text_height_percent = self
            .text_height_percent
            .clamp(TEXT_PERCENT_RANGE.0, TEXT_PERCENT_RANGE.1);
        self.scroll_line_count = self.scroll_line_count.max(1);
        self.window_width = self.window_width.max(1);
        self.window_height = self.window_height.max(1);
    }

    /// Returns `true` if the value changed.
    pub fn adjust_font_size(&mut self, grow: bool) -> bool {
        let size = step_u16(self.font_size, grow, FONT_SIZE_STEP, FONT_SIZE_RANGE);
        std::mem::replace(&mut self.font_size, size) != size
    }

    pub fn adjust_text_width(&mut self, grow: bool) -> bool {
        let percent = step_u8(self.text_width_percent, grow, TEXT_PERCENT_STEP, TEXT_PERCENT_RANGE);
        std::mem::replace(&mut self.text_width_percent, percent) != percent
    }

    pub fn adjust_text_height(&mut self, grow: bool) -> bool {
        let percent = step_u8(self.text_height_percent, grow, TEXT_PERCENT_STEP, TEXT_PERCENT_RANGE);
        std::mem::replace(&mut self.text_height_percent, percent) != percent
    }

    pub fn adjust_speed(&mut self, faster: bool) -> bool {
        let speed = step_u8(self.auto_scroll_speed, faster, 1, (u8::MIN, u8::MAX));
        std::mem::replace(&mut self.auto_scroll_speed, speed) != speed
    }

    pub fn log_summary(&self) {
        log::info!("configuration version: {CONFIG_VERSION}");
        log::info!("script file path:      {}", self.script_path.display());
        match &self.font_path {
            Some(path) => log::info!("font file path:        {}", path.display()),
            None => log::info!("font file path:        (embedded)"),
        }
        log::info!("font size:             {}", self.font_size);
        log::info!("text width:            {}%", self.text_width_percent);
        log::info!("text height:           {}%", self.text_height_percent);
        log::info!("window size:           {} x {}", self.window_width, self.window_height);
        log::info!(
            "background color:      {:02X} {:02X} {:02X}",
            self.background_color.red,
            self.background_color.green,
            self.background_color.blue
        );
        log::info!(
            "text color:            {:02X} {:02X} {:02X}",
            self.text_color.red,
            self.text_color.green,
            self.text_color.blue
        );
        log::info!("alignment:             {:?}", self.alignment);
        log::info!("auto scroll speed:     {}", self.auto_scroll_speed);
        log::info!("scroll line count:     {}", self.scroll_line_count);
        log::info!("full screen:           {}", self.full_screen);
    }

    pub fn encode(&self) -> Result<Vec<u8>, ConfigError> {
        let mut record = Vec::with_capacity(RECORD_LEN);
        record.push(CONFIG_VERSION);
        put_path(&mut record, Some(&self.script_path))?;
        put_path(&mut record, self.font_path.as_deref())?;
        record.extend_from_slice(&self.font_size.to_le_bytes());
        record.push(self.text_width_percent);
        record.push(self.text_height_percent);
        record.extend_from_slice(&self.window_width.to_le_bytes());
        record.extend_from_slice(&self.window_height.to_le_bytes());
        record.extend_from_slice(&[
            self.background_color.red,
            self.background_color.green,
            self.background_color.blue,
        ]);
        record.extend_from_slice(&[self.text_color.red, self.text_color.green, self.text_color.blue]);
        record.push(u8::from(self.alignment == Alignment::Center));
        record.push(self.auto_scroll_speed);
        record.push(self.scroll_line_count);
        record.push(u8::from(self.full_screen));

        debug_assert_eq!(record.len(), RECORD_LEN);
        Ok(record)
    }

    pub fn decode(record: &[u8]) -> Result<Self, ConfigError> {
        if record.len() != RECORD_LEN {
            return Err(ConfigError::RecordLength { found: record.len() });
        }
        let mut reader = Reader { record };
        let version = reader.u8();
        if version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch { found: version });
        }

        let script_path = reader.path()?.unwrap_or_default();
        let font_path = reader.path()?;
        let mut config = Self {
            script_path,
            font_path,
            font_size: reader.u16(),
            text_width_percent: reader.u8(),
            text_height_percent: reader.u8(),
            window_width: reader.u16(),
            window_height: reader.u16(),
            background_color: reader.color(),
            text_color: reader.color(),
            alignment: if reader.u8() != 0 {
                Alignment::Center
            } else {
                Alignment::Left
            },
            auto_scroll_speed: reader.u8(),
            scroll_line_count: reader.u8(),
            full_screen: reader.u8() != 0,
        };
        config.clamp();
        Ok(config)
    }
}

fn step_u8(value: u8, up: bool, step: u8, (min, max): (u8, u8)) -> u8 {
    if up {
        value.saturating_add(step).min(max)
    } else {
        value.saturating_sub(step).max(min)
    }
}

fn step_u16(value: u16, up: bool, step: u16, (min, max): (u16, u16)) -> u16 {
    if up {
        value.saturating_add(step).min(max)
    } else {
        value.saturating_sub(step).max(min)
    }
}

fn put_path(record: &mut Vec<u8>, path: Option<&Path>) -> Result<(), ConfigError> {
    let bytes = match path {
        Some(path) => path.to_str().ok_or(ConfigError::NonUtf8Path)?.as_bytes(),
        None => &[],
    };
    if bytes.len() > PATH_FIELD_LEN {
        return Err(ConfigError::PathTooLong(path.unwrap_or(Path::new("")).to_owned()));
    }
    record.extend_from_slice(bytes);
    record.resize(record.len() + PATH_FIELD_LEN - bytes.len(), 0);
    Ok(())
}

/// Reads fields front to back.  Length is checked once up front, so the reads can't run out.
struct Reader<'a> {
    record: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> &'a [u8] {
        let (head, rest) = self.record.split_at(len);
        self.record = rest;
        head
    }

    fn u8(&mut self) -> u8 {
        self.take(1)[0]
    }

    fn u16(&mut self) -> u16 {
        let bytes = self.take(2);
        u16::from_le_bytes([bytes[0], bytes[1]])
    }

    fn color(&mut self) -> Color {
        let bytes = self.take(3);
        Color::new(bytes[0], bytes[1], bytes[2])
    }

    /// NUL-padded; an empty field is `None`
    fn path(&mut self) -> Result<Option<PathBuf>, ConfigError> {
        let field = self.take(PATH_FIELD_LEN);
        let len = field.iter().position(|&b| b == 0).unwrap_or(field.len());
        if len == 0 {
            return Ok(None);
        }
        let text = std::str::from_utf8(&field[..len]).map_err(|_| ConfigError::NonUtf8Path)?;
        Ok(Some(PathBuf::from(text)))
    }
}

/// Where the record lives on disk.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `$HOME/.delta_teleprompter/teleprompter.bin`, if there is a home directory.
    pub fn default_location() -> Option<Self> {
        dirs::home_dir().map(|home| Self::new(home.join(".delta_teleprompter").join("teleprompter.bin")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<Config, ConfigError> {
        Config::decode(&fs::read(&self.path)?)
    }

    /// The stored configuration, or the defaults if there is no usable record.
    pub fn load(&self) -> Config {
        match self.read() {
            Ok(config) => {
                log::info!("loaded configuration from {}", self.path.display());
                config
            }
            Err(ConfigError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("no configuration at {}, using defaults", self.path.display());
                Config::default()
            }
            Err(err) => {
                log::debug!("ignoring stored configuration: {err}");
                Config::default()
            }
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let record = config.encode()?;
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, record)?;
        log::info!("saved configuration to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customized() -> Config {
        Config {
            script_path: PathBuf::from("/tmp/speech.txt"),
            font_path: Some(PathBuf::from("/usr/share/fonts/custom.ttf")),
            font_size: 48,
            text_width_percent: 75,
            text_height_percent: 60,
            window_width: 1920,
            window_height: 1080,
            background_color: Color::new(0x10, 0x20, 0x30),
            text_color: Color::new(0xFF, 0xEE, 0x00),
            alignment: Alignment::Left,
            auto_scroll_speed: 200,
            scroll_line_count: 3,
            full_screen: true,
        }
    }

    #[test]
    fn record_has_fixed_length() {
        assert_eq!(Config::default().encode().unwrap().len(), RECORD_LEN);
        assert_eq!(customized().encode().unwrap().len(), RECORD_LEN);
        assert_eq!(RECORD_LEN, 529);
    }

    #[test]
    fn round_trip_keeps_every_field() {
        for config in [Config::default(), customized()] {
            let record = config.encode().unwrap();
            assert_eq!(Config::decode(&record).unwrap(), config);
        }
    }

    #[test]
    fn other_version_is_rejected() {
        let mut record = customized().encode().unwrap();
        record[0] = CONFIG_VERSION + 1;
        assert!(matches!(
            Config::decode(&record),
            Err(ConfigError::VersionMismatch { found }) if found == CONFIG_VERSION + 1
        ));
    }

    #[test]
    fn short_record_is_rejected() {
        let record = customized().encode().unwrap();
        assert!(matches!(
            Config::decode(&record[..RECORD_LEN - 1]),
            Err(ConfigError::RecordLength { found }) if found == RECORD_LEN - 1
        ));
    }

    #[test]
    fn overlong_path_cannot_be_saved() {
        let config = Config {
            script_path: PathBuf::from("x".repeat(300)),
            ..Config::default()
        };
        assert!(matches!(config.encode(), Err(ConfigError::PathTooLong(_))));
    }

    #[test]
    fn out_of_range_values_are_clamped_on_decode() {
        let mut record = Config::default().encode().unwrap();
        // font size sits right after the version byte and both paths
        let at = 1 + 2 * PATH_FIELD_LEN;
        record[at..at + 2].copy_from_slice(&1000u16.to_le_bytes());
        record[at + 2] = 3;
        let config = Config::decode(&record).unwrap();
        assert_eq!(config.font_size, FONT_SIZE_RANGE.1);
        assert_eq!(config.text_width_percent, TEXT_PERCENT_RANGE.0);
    }

    #[test]
    fn adjustments_stop_at_limits() {
        let mut config = Config {
            font_size: 198,
            auto_scroll_speed: 255,
            text_width_percent: 10,
            ..Config::default()
        };
        assert!(config.adjust_font_size(true));
        assert_eq!(config.font_size, 200);
        assert!(!config.adjust_font_size(true));

        assert!(!config.adjust_speed(true));
        assert!(config.adjust_speed(false));
        assert_eq!(config.auto_scroll_speed, 254);

        assert!(!config.adjust_text_width(false));
        assert!(config.adjust_text_width(true));
        assert_eq!(config.text_width_percent, 15);
    }

    #[test]
    fn store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("nested").join("teleprompter.bin"));
        store.save(&customized()).unwrap();
        assert_eq!(store.load(), customized());
    }

    #[test]
    fn store_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("teleprompter.bin"));
        assert_eq!(store.load(), Config::default());

        let mut record = customized().encode().unwrap();
        record[0] = 0;
        fs::write(store.path(), record).unwrap();
        assert_eq!(store.load(), Config::default());

        fs::write(store.path(), b"garbage").unwrap();
        assert_eq!(store.load(), Config::default());
    }
}
