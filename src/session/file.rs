//! Session files: raw concatenated SysEx, read in chunks.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use tracing::{debug, info};

use super::error::SessionError;
use super::summary::{apply_frame, LoadSummary};
use crate::config::EditorConfig;
use crate::param::ParamRegistry;
use crate::sysex::{self, StreamReassembler};

/// Tuning for the chunked loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub chunk_size: usize,
    pub max_frame_len: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

impl From<&EditorConfig> for LoadOptions {
    fn from(config: &EditorConfig) -> Self {
        Self {
            chunk_size: config.read_chunk_size,
            max_frame_len: config.max_frame_len,
        }
    }
}

pub(crate) fn open(path: &Path) -> Result<File, SessionError> {
    File::open(path).map_err(|source| SessionError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a session file into `registry`, on top of its current state.
pub fn load_session_file(
    registry: &mut ParamRegistry,
    path: &Path,
    options: LoadOptions,
) -> Result<LoadSummary, SessionError> {
    let file = open(path)?;
    let summary = load_session(registry, file, options)?;
    info!(path = %path.display(), "{summary}");
    Ok(summary)
}

/// Feed everything `reader` yields through the reassembler and apply each
/// frame. Bad frames are counted in the summary; only an I/O failure ends
/// the load early.
pub fn load_session<R: Read>(
    registry: &mut ParamRegistry,
    mut reader: R,
    options: LoadOptions,
) -> Result<LoadSummary, SessionError> {
    let mut reassembler = StreamReassembler::with_max_frame_len(options.max_frame_len);
    let mut summary = LoadSummary::new();
    let mut chunk = vec![0u8; options.chunk_size.max(1)];

    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(SessionError::Read(e)),
        };
        reassembler.feed(&chunk[..n], |frame| {
            apply_frame(registry, frame, &mut summary)
        });
    }
    reassembler.flush();
    summary.fragments_discarded = reassembler.discarded();

    debug!(frames = summary.frames, "session stream consumed");
    Ok(summary)
}

/// Save every non-default parameter as Parameter Change frames, creating
/// parent directories as needed. Returns the number of parameters written.
pub fn save_session_file(registry: &ParamRegistry, path: &Path) -> Result<usize, SessionError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| SessionError::Open {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(path).map_err(|source| SessionError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    let count = write_session(registry, &mut writer).map_err(SessionError::Write)?;
    writer.flush().map_err(SessionError::Write)?;
    info!(path = %path.display(), "{count} parameters saved");
    Ok(count)
}

/// Write the session stream, one frame per non-default parameter in
/// ascending address order.
pub fn write_session<W: Write>(registry: &ParamRegistry, writer: &mut W) -> io::Result<usize> {
    let mut frame = Vec::with_capacity(16);
    let mut count = 0;
    for param in registry.snapshot_non_default() {
        frame.clear();
        sysex::encode_into(param, &mut frame);
        writer.write_all(&frame)?;
        count += 1;
    }
    Ok(count)
}
