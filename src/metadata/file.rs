use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::anime::Language;

/// Hashes computed by the host when the file was imported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHashes {
    /// CRC32, hex encoded.
    pub crc: String,
    /// ED2K, hex encoded.
    pub ed2k: String,
    /// SHA-1, hex encoded.
    pub sha1: String,
    /// MD5, hex encoded.
    pub md5: String,
}

/// Video stream details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoStream {
    /// Codec name (e.g. `HEVC`).
    pub codec: String,
    /// Width in pixels.
    pub width: i64,
    /// Height in pixels.
    pub height: i64,
    /// Bits per sample.
    pub bit_depth: i64,
}

/// Audio stream details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioStream {
    /// Codec name (e.g. `FLAC`).
    pub codec: String,
    /// Channel count.
    #[serde(default)]
    pub channels: i64,
    /// Spoken language, when tagged.
    #[serde(default)]
    pub language: Option<Language>,
}

/// Subtitle stream details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleStream {
    /// Subtitle format (e.g. `ASS`).
    pub codec: String,
    /// Subtitle language, when tagged.
    #[serde(default)]
    pub language: Option<Language>,
}

/// Container-level media information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaInfo {
    /// Primary video stream.
    pub video: Option<VideoStream>,
    /// Audio streams in container order.
    pub audio: Vec<AudioStream>,
    /// Subtitle streams in container order.
    pub subtitles: Vec<SubtitleStream>,
    /// Duration in seconds.
    pub duration_secs: u64,
    /// Whether the container has chapters.
    pub chaptered: bool,
}

/// Release group as known to AniDB.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseGroup {
    /// Full group name.
    pub name: String,
    /// Abbreviated group name.
    pub short_name: String,
}

/// AniDB information about a specific release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AniDbFileInfo {
    /// AniDB file id.
    pub id: i64,
    /// Release source (`BD`, `Web`, `DVD`, ...).
    pub source: String,
    /// Release version, starting at 1.
    pub version: i64,
    /// Whether the release is censored.
    pub censored: bool,
    /// Release group, when known.
    pub release_group: Option<ReleaseGroup>,
    /// Audio languages according to AniDB.
    pub audio_languages: Vec<Language>,
    /// Subtitle languages according to AniDB.
    pub sub_languages: Vec<Language>,
    /// File name as originally released.
    pub original_filename: String,
}

/// The file being renamed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Host file id.
    pub id: i64,
    /// Current absolute location of the file.
    pub path: PathBuf,
    /// Size in bytes.
    #[serde(default)]
    pub size: i64,
    /// Content hashes.
    #[serde(default)]
    pub hashes: FileHashes,
    /// Media information, when the file was scanned.
    #[serde(default)]
    pub media: Option<MediaInfo>,
    /// AniDB release information, when the file was recognized.
    #[serde(default)]
    pub anidb: Option<AniDbFileInfo>,
    /// Whether a user linked the file to its episodes by hand.
    #[serde(default)]
    pub manually_linked: bool,
}

impl FileInfo {
    /// Current file name including its extension.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Current extension including the leading dot, or an empty string.
    pub fn extension(&self) -> String {
        extension_of(&self.path)
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// A host-side grouping of related series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupInfo {
    /// Group display name.
    pub name: String,
    /// Series in the group.
    pub anime_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> FileInfo {
        FileInfo {
            id: 1,
            path: PathBuf::from(path),
            size: 0,
            hashes: FileHashes::default(),
            media: None,
            anidb: None,
            manually_linked: false,
        }
    }

    #[test]
    fn name_and_extension() {
        let f = file("/anime/Show/Show - 01.mkv");
        assert_eq!(f.file_name(), "Show - 01.mkv");
        assert_eq!(f.extension(), ".mkv");
        assert_eq!(file("/anime/README").extension(), "");
    }

    #[test]
    fn deserializes_with_defaults() {
        let f: FileInfo = serde_json::from_str(r#"{"id": 4, "path": "/a/b.mp4"}"#).unwrap();
        assert_eq!(f.id, 4);
        assert!(f.media.is_none());
        assert_eq!(f.hashes, FileHashes::default());
    }
}
