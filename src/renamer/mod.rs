//! Renaming driver
//!
//! Validates the host's input, fetches the parsed script from the cache, runs
//! the filename and destination passes and post-processes their buffers into
//! a [`RenameResult`].

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::destination::{Destination, resolve_destination};
use crate::metadata::{ImportFolder, RenameRequest};
use crate::script::{
    ExecError, ParseCache, ParseError, PassOutcome, ScriptTree, evaluate_for_destination, evaluate_for_filename,
};

/// Configuration file handling
pub mod config;
/// Renaming error types
pub mod error;

pub use config::{DEFAULT_INTERPRETER_ID, RenamerConfig};
pub use error::{RenameError, Result};

/// A rename script as stored by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Interpreter the script was written for.
    pub kind: String,
    /// Script source.
    pub text: String,
}

impl Script {
    /// A script for the default interpreter.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: DEFAULT_INTERPRETER_ID.to_string(),
            text: text.into(),
        }
    }
}

/// New name and location of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameResult {
    /// File name including the original extension.
    pub filename: String,
    /// Destination import folder.
    pub destination: ImportFolder,
    /// Subfolder relative to the destination's location.
    pub subfolder: PathBuf,
}

impl RenameResult {
    /// Path of the renamed file relative to the destination folder.
    pub fn relative_path(&self) -> PathBuf {
        self.subfolder.join(&self.filename)
    }

    /// Absolute path of the renamed file.
    pub fn full_path(&self) -> PathBuf {
        self.destination.location.join(self.relative_path())
    }
}

/// Evaluates rename scripts. Safe to share between threads.
#[derive(Debug)]
pub struct Renamer {
    config: RenamerConfig,
    cache: ParseCache,
}

impl Renamer {
    /// Create a renamer with its own parse cache.
    pub fn new(config: RenamerConfig) -> Self {
        let cache = ParseCache::new(config.cache_capacity);
        Self { config, cache }
    }

    /// Active configuration.
    pub fn config(&self) -> &RenamerConfig {
        &self.config
    }

    /// Parse script text through the cache.
    pub fn check(&self, text: &str) -> std::result::Result<Arc<ScriptTree>, ParseError> {
        self.cache.get_or_parse(text)
    }

    /// Compute the new filename only. `None` when the script skipped or produced a blank name.
    pub fn filename(&self, script: &Script, request: &RenameRequest) -> Result<Option<String>> {
        let tree = self.prepare(script, request)?;
        self.run_filename(&tree, request)
    }

    /// Compute the new location only. `None` when the script skipped or asked for no move.
    pub fn destination(&self, script: &Script, request: &RenameRequest) -> Result<Option<Destination>> {
        let tree = self.prepare(script, request)?;
        self.run_destination(&tree, request)
    }

    /// Compute filename, destination folder and subfolder.
    ///
    /// Returns `Ok(None)` when the script skipped or any of the three outputs is blank.
    pub fn rename(&self, script: &Script, request: &RenameRequest) -> Result<Option<RenameResult>> {
        let tree = self.prepare(script, request)?;
        let Some(filename) = self.run_filename(&tree, request)? else {
            return Ok(None);
        };
        let Some(destination) = self.run_destination(&tree, request)? else {
            return Ok(None);
        };
        Ok(Some(RenameResult {
            filename,
            destination: destination.folder,
            subfolder: destination.subfolder,
        }))
    }

    fn prepare(&self, script: &Script, request: &RenameRequest) -> Result<Arc<ScriptTree>> {
        if script.kind != self.config.interpreter_id {
            return Err(RenameError::BadArguments(format!(
                "script kind '{}' does not match interpreter '{}'",
                script.kind, self.config.interpreter_id
            )));
        }
        if script.text.trim().is_empty() {
            return Err(RenameError::BadArguments("script is empty".into()));
        }
        if request.anime.is_empty() {
            return Err(RenameError::BadArguments("no anime info".into()));
        }
        if request.episodes.is_empty() {
            return Err(RenameError::BadArguments("no episode info".into()));
        }
        debug!(file = %request.file.path.display(), "evaluating rename script");
        Ok(self.cache.get_or_parse(&script.text)?)
    }

    fn run_filename(&self, tree: &ScriptTree, request: &RenameRequest) -> Result<Option<String>> {
        let buffers = match evaluate_for_filename(tree, request).inspect_err(log_cancel)? {
            PassOutcome::Completed(buffers) => buffers,
            PassOutcome::Skipped => return Ok(None),
        };
        let stem = self.config.policy().sanitize_component(buffers.filename.trim());
        if stem.trim().is_empty() {
            debug!(file = %request.file.path.display(), "script produced a blank filename");
            return Ok(None);
        }
        Ok(Some(format!("{}{}", stem, request.file.extension())))
    }

    fn run_destination(&self, tree: &ScriptTree, request: &RenameRequest) -> Result<Option<Destination>> {
        let buffers = match evaluate_for_destination(tree, request).inspect_err(log_cancel)? {
            PassOutcome::Completed(buffers) => buffers,
            PassOutcome::Skipped => return Ok(None),
        };
        let destination = resolve_destination(
            &buffers,
            &request.import_folders,
            &request.file.path,
            &self.config.policy(),
        )?;
        Ok(destination)
    }
}

impl Default for Renamer {
    fn default() -> Self {
        Self::new(RenamerConfig::default())
    }
}

fn log_cancel(err: &ExecError) {
    if let ExecError::Cancelled(message) = err {
        info!(%message, "rename cancelled by script");
    }
}
