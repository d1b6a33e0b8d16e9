/// Colors, plus parsing them from the command line
pub mod color;

/// Glyph metrics and text measurement
pub mod text;

/// Font loading, with the embedded fallback font
pub mod typeface;
