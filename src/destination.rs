//! Turns the destination and subfolder buffers of a script into a concrete
//! import folder and relative subfolder.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, trace};

use crate::metadata::{ImportFolder, normalize_location};
use crate::sanitize::SanitizePolicy;
use crate::script::Buffers;

/// Marks a segment boundary written by a `/` or `\` literal in a subfolder statement.
pub const SEGMENT_SEPARATOR: char = '\u{E000}';

/// Marks a `*` literal in a subfolder statement.
pub const WILDCARD_SEGMENT: char = '\u{E001}';

/// Encode the separators and wildcards of a string literal written to the subfolder.
pub fn mark_path_literal(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '/' | '\\' => SEGMENT_SEPARATOR,
            '*' => WILDCARD_SEGMENT,
            other => other,
        })
        .collect()
}

/// Remove marker characters from computed text so it cannot create segments.
pub fn strip_path_markers(text: &str) -> String {
    text.chars()
        .filter(|ch| *ch != SEGMENT_SEPARATOR && *ch != WILDCARD_SEGMENT)
        .collect()
}

/// Where a file should be moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Destination-capable import folder.
    pub folder: ImportFolder,
    /// Path relative to the folder's location.
    pub subfolder: PathBuf,
}

/// Errors resolving the destination or subfolder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DestinationError {
    /// No destination-capable folder matches the requested name or location
    #[error("bad destination: no destination folder matches '{0}'")]
    BadDestination(String),

    /// A subfolder was requested but the file lives under no destination folder
    #[error("no destination was set and the file is not inside a destination folder")]
    NoOldDestination,

    /// A `*` segment has no counterpart in the file's current subfolder
    #[error("wildcard segment {index} has no matching segment in the current subfolder")]
    WildcardOutOfRange {
        /// Zero-based segment index
        index: usize,
    },

    /// The resulting subfolder has no segments
    #[error("subfolder is empty")]
    EmptySubfolder,
}

/// Resolve the destination-pass buffers.
///
/// Returns `Ok(None)` when the script wrote neither a destination nor a subfolder.
pub fn resolve_destination(
    buffers: &Buffers,
    folders: &[ImportFolder],
    file_path: &Path,
    policy: &SanitizePolicy,
) -> Result<Option<Destination>, DestinationError> {
    let requested = buffers.destination.trim();
    let folder = if !requested.is_empty() {
        find_destination(folders, requested)?
    } else if buffers.destination_written || buffers.subfolder_written {
        old_destination(folders, file_path).ok_or(DestinationError::NoOldDestination)?
    } else {
        return Ok(None);
    };

    let old_segments = old_subfolder(folders, file_path);
    let segments = if buffers.subfolder_written {
        build_segments(&buffers.subfolder, &old_segments, policy)?
    } else {
        trace!("subfolder not set, keeping current one");
        old_segments
    };
    if segments.is_empty() {
        return Err(DestinationError::EmptySubfolder);
    }

    let subfolder: PathBuf = segments.iter().collect();
    debug!(folder = %folder.name, subfolder = %subfolder.display(), "resolved destination");
    Ok(Some(Destination {
        folder: folder.clone(),
        subfolder,
    }))
}

fn find_destination<'a>(folders: &'a [ImportFolder], requested: &str) -> Result<&'a ImportFolder, DestinationError> {
    let wanted_name = requested.to_lowercase();
    let wanted_location = normalize_location(Path::new(requested)).to_lowercase();
    folders
        .iter()
        .filter(|folder| folder.is_destination())
        .find(|folder| {
            folder.name.to_lowercase() == wanted_name
                || folder.normalized_location().to_lowercase() == wanted_location
        })
        .ok_or_else(|| DestinationError::BadDestination(requested.to_string()))
}

fn deepest_container<'a>(
    folders: impl Iterator<Item = &'a ImportFolder>,
    file_path: &Path,
) -> Option<&'a ImportFolder> {
    folders
        .filter_map(|folder| folder.prefix_len(file_path).map(|depth| (depth, folder)))
        .max_by_key(|(depth, _)| *depth)
        .map(|(_, folder)| folder)
}

/// Destination-capable folder with the longest location prefix of `file_path`.
pub fn old_destination<'a>(folders: &'a [ImportFolder], file_path: &Path) -> Option<&'a ImportFolder> {
    deepest_container(folders.iter().filter(|folder| folder.is_destination()), file_path)
}

/// Directory segments of `file_path` under the import folder containing it.
pub fn old_subfolder(folders: &[ImportFolder], file_path: &Path) -> Vec<String> {
    deepest_container(folders.iter(), file_path)
        .and_then(|folder| folder.relative_dirs(file_path))
        .unwrap_or_default()
}

fn build_segments(
    raw: &str,
    old_segments: &[String],
    policy: &SanitizePolicy,
) -> Result<Vec<String>, DestinationError> {
    let mut segments = Vec::new();
    for part in raw.split(SEGMENT_SEPARATOR) {
        if part.trim().chars().eq([WILDCARD_SEGMENT]) {
            let index = segments.len();
            let kept = old_segments
                .get(index)
                .ok_or(DestinationError::WildcardOutOfRange { index })?;
            segments.push(kept.clone());
            continue;
        }
        let literal = part.replace(WILDCARD_SEGMENT, "*");
        let cleaned = policy.sanitize_component(literal.trim());
        if !cleaned.is_empty() {
            segments.push(cleaned);
        }
    }
    Ok(segments)
}
