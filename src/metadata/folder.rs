use serde::{Deserialize, Serialize};
use std::ops::BitOr;
use std::path::{Path, PathBuf};

/// Combinable flags describing how an import folder may be used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DropFolderKind(u8);

impl DropFolderKind {
    /// Plain import folder.
    pub const NONE: DropFolderKind = DropFolderKind(0);
    /// Files may be picked up from this folder.
    pub const SOURCE: DropFolderKind = DropFolderKind(1);
    /// Files may be moved into this folder.
    pub const DESTINATION: DropFolderKind = DropFolderKind(2);
    /// Folder is ignored by the renamer.
    pub const EXCLUDED: DropFolderKind = DropFolderKind(4);

    /// Raw bit representation.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether every flag of `other` is set.
    pub fn contains(self, other: DropFolderKind) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for DropFolderKind {
    type Output = DropFolderKind;

    fn bitor(self, rhs: Self) -> Self::Output {
        DropFolderKind(self.0 | rhs.0)
    }
}

/// A storage location managed by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFolder {
    /// Host id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Absolute location on disk.
    pub location: PathBuf,
    /// Usage flags.
    #[serde(default)]
    pub kind: DropFolderKind,
}

impl ImportFolder {
    /// Whether files may be moved into this folder.
    pub fn is_destination(&self) -> bool {
        self.kind.contains(DropFolderKind::DESTINATION) && !self.kind.contains(DropFolderKind::EXCLUDED)
    }

    /// Whether this folder is a drop source.
    pub fn is_source(&self) -> bool {
        self.kind.contains(DropFolderKind::SOURCE)
    }

    /// Location with forward slashes and no trailing separator.
    pub fn normalized_location(&self) -> String {
        normalize_location(&self.location)
    }

    /// Number of leading path components this folder shares with `path`,
    /// or `None` when `path` does not live under this folder.
    pub fn prefix_len(&self, path: &Path) -> Option<usize> {
        let folder = self.normalized_location();
        let target = normalize_location(path);
        let folder_parts = split_components(&folder);
        let target_parts = split_components(&target);
        if folder_parts.len() > target_parts.len() {
            return None;
        }
        let matches = folder_parts
            .iter()
            .zip(&target_parts)
            .all(|(a, b)| eq_component(a, b));
        matches.then_some(folder_parts.len())
    }

    /// Directory components of `path` below this folder, excluding the file name.
    pub fn relative_dirs(&self, path: &Path) -> Option<Vec<String>> {
        let depth = self.prefix_len(path)?;
        let target = normalize_location(path);
        let parts = split_components(&target);
        if parts.len() <= depth {
            return Some(Vec::new());
        }
        Some(parts[depth..parts.len() - 1].iter().map(|s| s.to_string()).collect())
    }
}

/// Normalize a location for comparisons: `\` becomes `/`, trailing separators are dropped.
pub fn normalize_location(path: &Path) -> String {
    let text = path.to_string_lossy().replace('\\', "/");
    let trimmed = text.trim_end_matches('/');
    if trimmed.is_empty() && text.starts_with('/') {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

fn split_components(normalized: &str) -> Vec<&str> {
    normalized.split('/').filter(|part| !part.is_empty()).collect()
}

// Windows-style locations compare case-insensitively.
fn eq_component(a: &str, b: &str) -> bool {
    if cfg!(windows) {
        a.eq_ignore_ascii_case(b)
    } else {
        a == b
    }
}
