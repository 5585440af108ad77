//! Editor configuration loaded from ~/.xgedit/config.yaml.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::param::RangePolicy;
use crate::sysex::reassembler::DEFAULT_MAX_FRAME_LEN;

/// Editor configuration loaded from YAML. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Bytes read per call while loading a session file.
    #[serde(default = "EditorConfig::default_read_chunk_size")]
    pub read_chunk_size: usize,
    /// Packets buffered between a MIDI input thread and the editor.
    #[serde(default = "EditorConfig::default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default)]
    pub range_policy: RangePolicy,
    /// Frames longer than this are discarded during reassembly.
    #[serde(default = "EditorConfig::default_max_frame_len")]
    pub max_frame_len: usize,
    /// Base directory for relative session paths. None = working directory.
    #[serde(default)]
    pub session_dir: Option<PathBuf>,
}

impl EditorConfig {
    /// Load config from the standard path.
    /// Returns None if the file is missing or unreadable.
    pub fn load() -> Option<Self> {
        let content = std::fs::read_to_string(default_config_path()?).ok()?;
        serde_yaml::from_str(&content).ok()
    }

    /// Load config from an explicit path. Unlike [`EditorConfig::load`] a
    /// missing or invalid file is an error.
    pub fn load_from(path: &Path) -> Result<Self, io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Resolve a session path against `session_dir`. Absolute paths pass
    /// through.
    pub fn resolve_session_path(&self, path: &Path) -> PathBuf {
        match &self.session_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn default_read_chunk_size() -> usize {
        1024
    }

    fn default_queue_capacity() -> usize {
        256
    }

    fn default_max_frame_len() -> usize {
        DEFAULT_MAX_FRAME_LEN
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            read_chunk_size: Self::default_read_chunk_size(),
            queue_capacity: Self::default_queue_capacity(),
            range_policy: RangePolicy::default(),
            max_frame_len: Self::default_max_frame_len(),
            session_dir: None,
        }
    }
}

/// ~/.xgedit/config.yaml, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".xgedit").join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.read_chunk_size, 1024);
        assert_eq!(config.queue_capacity, 256);
        assert_eq!(config.range_policy, RangePolicy::Clamp);
        assert_eq!(config.max_frame_len, 16394);
        assert!(config.session_dir.is_none());
    }

    #[test]
    fn empty_document_gives_defaults() {
        let config: EditorConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn custom_config_deserialize() {
        let yaml = r#"
read_chunk_size: 64
range_policy: reject
session_dir: /var/lib/xgedit
"#;
        let config: EditorConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.read_chunk_size, 64);
        assert_eq!(config.queue_capacity, 256);
        assert_eq!(config.range_policy, RangePolicy::Reject);
        assert_eq!(config.session_dir, Some(PathBuf::from("/var/lib/xgedit")));
    }

    #[test]
    fn serialize_deserialize() {
        let config = EditorConfig {
            max_frame_len: 512,
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: EditorConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "queue_capacity: 8").unwrap();
        let config = EditorConfig::load_from(file.path()).unwrap();
        assert_eq!(config.queue_capacity, 8);
    }

    #[test]
    fn load_from_invalid_file_is_invalid_data() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "range_policy: sometimes").unwrap();
        let err = EditorConfig::load_from(file.path()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn relative_session_paths_use_session_dir() {
        let config = EditorConfig {
            session_dir: Some(PathBuf::from("/sessions")),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_session_path(Path::new("song.syx")),
            PathBuf::from("/sessions/song.syx")
        );
        assert_eq!(
            config.resolve_session_path(Path::new("/tmp/song.syx")),
            PathBuf::from("/tmp/song.syx")
        );
        assert_eq!(
            EditorConfig::default().resolve_session_path(Path::new("song.syx")),
            PathBuf::from("song.syx")
        );
    }
}
