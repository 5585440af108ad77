//! Editing session: the registry plus its file name and unsaved-edit count.

pub mod error;
pub mod file;
pub mod summary;

pub use error::SessionError;
pub use file::{load_session, load_session_file, save_session_file, write_session, LoadOptions};
pub use summary::{apply_frame, LoadSummary, LoadWarning};

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::EditorConfig;
use crate::param::{
    GroupId, ParamAddress, ParamEventReceiver, ParamRegistry, SetError, SetOutcome,
};

#[derive(Debug)]
pub struct Session {
    registry: ParamRegistry,
    path: Option<PathBuf>,
    dirty: usize,
    options: LoadOptions,
}

impl Session {
    pub fn new() -> Self {
        Self::with_registry(ParamRegistry::new(), LoadOptions::default())
    }

    pub fn with_registry(registry: ParamRegistry, options: LoadOptions) -> Self {
        Self {
            registry,
            path: None,
            dirty: 0,
            options,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::with_registry(
            ParamRegistry::with_policy(config.range_policy),
            LoadOptions::from(config),
        )
    }

    pub fn registry(&self) -> &ParamRegistry {
        &self.registry
    }

    pub fn subscribe(&mut self) -> ParamEventReceiver {
        self.registry.subscribe()
    }

    /// Current file name. None until loaded or saved.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Edits made since the last new/load/save.
    pub fn dirty_count(&self) -> usize {
        self.dirty
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    /// Run a user edit against the registry. Counts as one unsaved change.
    pub fn edit<T>(&mut self, f: impl FnOnce(&mut ParamRegistry) -> T) -> T {
        self.dirty += 1;
        f(&mut self.registry)
    }

    /// Set one parameter as a user edit. Refused writes leave the session
    /// clean.
    pub fn set_value(&mut self, address: ParamAddress, value: u32) -> Result<SetOutcome, SetError> {
        let outcome = self.registry.set_value(address, value)?;
        self.dirty += 1;
        Ok(outcome)
    }

    /// Reset one instance of a group as a user edit.
    pub fn reset_group(&mut self, id: GroupId, key: u16) -> Result<(), SetError> {
        self.registry.reset_group(id, key)?;
        self.dirty += 1;
        Ok(())
    }

    /// Start over: every parameter at its default, no file name.
    pub fn new_session(&mut self) {
        self.registry.reset_all();
        self.path = None;
        self.dirty = 0;
    }

    /// Replace the session with the contents of `path`.
    ///
    /// The file is read into a scratch registry first. Only a complete read
    /// replaces the session, so any open or read failure leaves values, file
    /// name and dirty count untouched. Subscribers see one `Reset` followed
    /// by a `Changed` per loaded non-default value.
    pub fn load(&mut self, path: &Path) -> Result<LoadSummary, SessionError> {
        let file = file::open(path)?;
        let mut scratch = ParamRegistry::with_policy(self.registry.range_policy());
        let summary = load_session(&mut scratch, file, self.options)?;

        self.registry.reset_all();
        for param in scratch.snapshot_non_default() {
            // Same table and policy: every loaded value is accepted again.
            let _ = self.registry.set_value(param.address(), param.value());
        }
        self.path = Some(path.to_path_buf());
        self.dirty = 0;
        info!(path = %path.display(), "{summary}");
        Ok(summary)
    }

    /// Save to the current file name.
    pub fn save(&mut self) -> Result<usize, SessionError> {
        let path = self.path.clone().ok_or(SessionError::Untitled)?;
        self.save_as(&path)
    }

    /// Save to `path` and adopt it as the file name.
    pub fn save_as(&mut self, path: &Path) -> Result<usize, SessionError> {
        let count = save_session_file(&self.registry, path)?;
        self.path = Some(path.to_path_buf());
        self.dirty = 0;
        Ok(count)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
