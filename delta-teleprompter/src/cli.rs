use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::graphics::color::{parse_color, Color};
use crate::layout::Alignment;

/// Delta Teleprompter - scrolls a text script across the screen
///
/// Flags override the stored configuration and are saved with it on exit.
#[derive(Debug, Default, Parser)]
#[command(name = "delta-teleprompter", version)]
pub struct Args {
    /// Script to display
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// TrueType font used to display the script
    #[arg(short, long, conflicts_with = "internal_font")]
    pub font: Option<PathBuf>,

    /// Use the built-in font
    #[arg(short, long)]
    pub internal_font: bool,

    /// Font size in pixels
    #[arg(short = 'S', long)]
    pub font_size: Option<u16>,

    /// Width of the text area, in percent of the window
    #[arg(short = 'w', long)]
    pub text_width_percent: Option<u8>,

    /// Height of the text area, in percent of the window
    #[arg(short = 't', long)]
    pub text_height_percent: Option<u8>,

    /// Window width in pixels [default: 640]
    #[arg(short = 'x', long)]
    pub video_size_x: Option<u16>,

    /// Window height in pixels [default: 480]
    #[arg(short = 'y', long)]
    pub video_size_y: Option<u16>,

    /// Background color, e.g. 0x000000, #000000 or 0 [default: black]
    #[arg(short = 'B', long, value_parser = parse_color)]
    pub background_color: Option<Color>,

    /// Text color, e.g. 0xFFFFFF [default: white]
    #[arg(short = 'C', long, value_parser = parse_color)]
    pub text_color: Option<Color>,

    /// Center each row (default)
    #[arg(short = 'c', long, conflicts_with = "align_left")]
    pub align_center: bool,

    /// Align rows to the left
    #[arg(short = 'l', long)]
    pub align_left: bool,

    /// Auto scroll speed, 0 to 255 [default: 240]
    #[arg(short = 'a', long)]
    pub auto_scroll_speed: Option<u8>,

    /// Rows jumped by the Up and Down keys [default: 5]
    #[arg(short = 'n', long)]
    pub scroll_line_count: Option<u8>,

    /// Start in full screen
    #[arg(short = 'F', long)]
    pub full_screen: bool,
}

impl Args {
    /// Writes every given flag into `config`, then clamps.
    pub fn apply(self, config: &mut Config) {
        if let Some(script) = self.script {
            config.script_path = script;
        }
        if let Some(font) = self.font {
            config.font_path = Some(font);
        }
        if self.internal_font {
            config.font_path = None;
        }
        if let Some(size) = self.font_size {
            config.font_size = size;
        }
        if let Some(percent) = self.text_width_percent {
            config.text_width_percent = percent;
        }
        if let Some(percent) = self.text_height_percent {
            config.text_height_percent = percent;
        }
        if let Some(width) = self.video_size_x {
            config.window_width = width;
        }
        if let Some(height) = self.video_size_y {
            config.window_height = height;
        }
        if let Some(color) = self.background_color {
            config.background_color = color;
        }
        if let Some(color) = self.text_color {
            config.text_color = color;
        }
        if self.align_center {
            config.alignment = Alignment::Center;
        }
        if self.align_left {
            config.alignment = Alignment::Left;
        }
        if let Some(speed) = self.auto_scroll_speed {
            config.auto_scroll_speed = speed;
        }
        if let Some(count) = self.scroll_line_count {
            config.scroll_line_count = count;
        }
        if self.full_screen {
            config.full_screen = true;
        }
        config.clamp();
    }
}
