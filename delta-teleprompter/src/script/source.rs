use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptLoadError {
    #[error("cannot open script file {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read from script file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("script file {} is empty", path.display())]
    EmptyFile { path: PathBuf },

    #[error("script file {} was cut short: read {read} of {expected} bytes", path.display())]
    Truncated {
        path: PathBuf,
        expected: u64,
        read: usize,
    },
}

impl ScriptLoadError {
    /// Short text for the error screen.
    pub fn headline(&self) -> &'static str {
        match self {
            Self::Open { .. } => "ERROR: Cannot open script file!",
            Self::Read { .. } => "ERROR: Cannot read from script file!",
            Self::EmptyFile { .. } => "ERROR: File is empty!",
            Self::Truncated { .. } => "ERROR: Script file was cut short!",
        }
    }
}

/// Reads the whole script into memory.
///
/// Invalid UTF-8 is replaced rather than rejected; the renderer draws
/// replacement glyphs for it.
pub fn load_script(path: &Path) -> Result<String, ScriptLoadError> {
    log::info!("loading script {}", path.display());

    let mut file = File::open(path).map_err(|source| ScriptLoadError::Open {
        path: path.to_owned(),
        source,
    })?;
    let read_error = |source| ScriptLoadError::Read {
        path: path.to_owned(),
        source,
    };

    let expected = file.metadata().map_err(read_error)?.len();
    if expected == 0 {
        return Err(ScriptLoadError::EmptyFile { path: path.to_owned() });
    }

    let mut bytes = Vec::with_capacity(expected as usize);
    file.read_to_end(&mut bytes).map_err(read_error)?;
    if (bytes.len() as u64) < expected {
        return Err(ScriptLoadError::Truncated {
            path: path.to_owned(),
            expected,
            read: bytes.len(),
        });
    }

    log::info!("script loaded: {} bytes", bytes.len());
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            log::warn!("script is not valid UTF-8, replacing invalid sequences");
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_whole_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Hello\nteleprompter").unwrap();
        assert_eq!(load_script(file.path()).unwrap(), "Hello\nteleprompter");
    }

    #[test]
    fn empty_file_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = load_script(file.path()).unwrap_err();
        assert!(matches!(err, ScriptLoadError::EmptyFile { .. }));
        assert_eq!(err.headline(), "ERROR: File is empty!");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_script(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, ScriptLoadError::Open { .. }));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"caf\xe9 au lait").unwrap();
        assert_eq!(load_script(file.path()).unwrap(), "caf\u{fffd} au lait");
    }
}
