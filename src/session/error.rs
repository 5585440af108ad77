//! Session file errors.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Why a session file could not be loaded or saved.
#[derive(Debug)]
pub enum SessionError {
    /// The file could not be opened or created. Nothing was parsed.
    Open { path: PathBuf, source: io::Error },
    /// Reading failed part way through. Frames before the failure were
    /// applied.
    Read(io::Error),
    Write(io::Error),
    /// `save` on a session that was never given a file name.
    Untitled,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Open { path, source } => {
                write!(f, "cannot open {}: {source}", path.display())
            }
            SessionError::Read(e) => write!(f, "read error: {e}"),
            SessionError::Write(e) => write!(f, "write error: {e}"),
            SessionError::Untitled => write!(f, "session has no file name"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Open { source, .. } => Some(source),
            SessionError::Read(e) | SessionError::Write(e) => Some(e),
            SessionError::Untitled => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn open_error_names_the_path() {
        let err = SessionError::Open {
            path: PathBuf::from("/nowhere/song.syx"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "cannot open /nowhere/song.syx: not found");
        assert!(err.source().is_some());
    }

    #[test]
    fn untitled_has_no_source() {
        assert!(SessionError::Untitled.source().is_none());
    }
}
