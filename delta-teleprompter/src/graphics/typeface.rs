use std::fmt::Display;
use std::path::{Path, PathBuf};

use eyre::WrapErr;
use fontdue::{Font as FontData, FontSettings};
use thiserror::Error;

use super::text::FontMetrics;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("cannot read font file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `fontdue` only gives us a `&'static str` for parse failures
    #[error("invalid font data: {0}")]
    Parse(&'static str),
}

const FONT_DATA: &[u8] = include_bytes!("../../../assets/DejaVuSans/DejaVuSans.ttf");

/// Where the active font came from; shown in the log and on the help screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    Embedded,
    File(PathBuf),
}

impl Display for FontSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedded => write!(f, "embedded DejaVu Sans"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A parsed font, usable at any pixel size.
pub struct Typeface {
    data: FontData,
    source: FontSource,
}

impl Typeface {
    /// The font compiled into the binary.  If this fails, nothing can be drawn at all.
    pub fn try_default() -> eyre::Result<Self> {
        let data = parse(FONT_DATA).wrap_err("processing embedded font")?;

        Ok(Self {
            data,
            source: FontSource::Embedded,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, FontError> {
        let bytes = std::fs::read(path).map_err(|source| FontError::Read {
            path: path.to_owned(),
            source,
        })?;

        Ok(Self {
            data: parse(&bytes)?,
            source: FontSource::File(path.to_owned()),
        })
    }

    /// Loads `path` if given, falling back to the embedded font when it is missing or unusable.
    pub fn load(path: Option<&Path>) -> eyre::Result<Self> {
        if let Some(path) = path {
            match Self::from_file(path) {
                Ok(typeface) => {
                    log::info!("loaded font {}", path.display());
                    return Ok(typeface);
                }
                Err(err) => log::warn!("{err}; falling back to the embedded font"),
            }
        }

        log::info!("loading embedded font");
        Self::try_default()
    }

    pub fn source(&self) -> &FontSource {
        &self.source
    }

    pub fn metrics(&self, size: u16) -> FontMetrics<'_> {
        FontMetrics::new(&self.data, size)
    }
}

fn parse(bytes: &[u8]) -> Result<FontData, FontError> {
    FontData::from_bytes(bytes, FontSettings::default()).map_err(FontError::Parse)
}
