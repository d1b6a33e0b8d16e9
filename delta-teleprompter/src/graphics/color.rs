use std::str::FromStr;

use palette::{LinSrgb, Mix, Srgb};

/// Colors are stored and configured as 8-bit sRGB.
pub type Color = Srgb<u8>;

pub const BLACK: Color = Srgb::new(0x00, 0x00, 0x00);
pub const WHITE: Color = Srgb::new(0xFF, 0xFF, 0xFF);

/// Parses `0xRRGGBB`, `#RRGGBB` (or `#RGB`), or a plain decimal number.
pub fn parse_color(text: &str) -> Result<Color, String> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return Color::from_str(hex).map_err(|err| format!("invalid hex color `{text}`: {err}"));
    }
    if text.starts_with('#') {
        return Color::from_str(text).map_err(|err| format!("invalid hex color `{text}`: {err}"));
    }
    let value: u32 = text
        .parse()
        .map_err(|err| format!("invalid color `{text}`: {err}"))?;
    Ok(from_pixel(value))
}

/// Packs a color the way the frame buffer wants it: `0x00RRGGBB`.
pub fn to_pixel(color: Color) -> u32 {
    (u32::from(color.red) << 16) | (u32::from(color.green) << 8) | u32::from(color.blue)
}

pub fn from_pixel(pixel: u32) -> Color {
    Srgb::new((pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8)
}

/// Puts `foreground` over `background` with the given coverage, mixing in linear light.
pub fn blend(background: Color, foreground: Color, coverage: u8) -> Color {
    match coverage {
        0 => background,
        255 => foreground,
        _ => {
            let background: LinSrgb<f32> = background.into_linear();
            let foreground: LinSrgb<f32> = foreground.into_linear();
            Color::from_linear(background.mix(foreground, f32::from(coverage) / 255.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_notations() {
        assert_eq!(parse_color("0xFF0000").unwrap(), Srgb::new(0xFF, 0, 0));
        assert_eq!(parse_color("#00ff00").unwrap(), Srgb::new(0, 0xFF, 0));
        assert_eq!(parse_color("255").unwrap(), Srgb::new(0, 0, 0xFF));
        assert!(parse_color("bogus").is_err());
        assert!(parse_color("0xZZ0000").is_err());
    }

    #[test]
    fn pixel_packing() {
        let color = Srgb::new(0x12, 0x34, 0x56);
        assert_eq!(to_pixel(color), 0x123456);
        assert_eq!(from_pixel(0x123456), color);
    }

    #[test]
    fn blend_extremes() {
        assert_eq!(blend(BLACK, WHITE, 0), BLACK);
        assert_eq!(blend(BLACK, WHITE, 255), WHITE);
        let half = blend(BLACK, WHITE, 128);
        assert!(half.red > 0x80, "linear mixing is brighter than naive sRGB averaging");
        assert_eq!(half.red, half.green);
    }
}
