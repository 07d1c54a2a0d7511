//! Read-only metadata records consumed by the renaming scripts.
//!
//! Hosts assemble a [`RenameRequest`] from their own database records before
//! invoking the renamer. Every record is serde-(de)serializable so requests
//! can also be handed over as JSON (see the `renamescript` binary).

use serde::{Deserialize, Serialize};

/// Anime, episode and title records.
pub mod anime;
/// File, media and release-group records.
pub mod file;
/// Import folder records and drop-folder flags.
pub mod folder;

pub use anime::{AnimeInfo, AnimeKind, EpisodeCounts, EpisodeInfo, EpisodeKind, Language, Title, TitleKind};
pub use file::{AniDbFileInfo, AudioStream, FileHashes, FileInfo, GroupInfo, MediaInfo, ReleaseGroup, SubtitleStream, VideoStream};
pub use folder::{DropFolderKind, ImportFolder, normalize_location};

/// Everything a script may observe about one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameRequest {
    /// The file being renamed.
    pub file: FileInfo,
    /// Series linked to the file. The first entry is the anchor series.
    pub anime: Vec<AnimeInfo>,
    /// Episodes linked to the file. The first entry is the primary episode.
    pub episodes: Vec<EpisodeInfo>,
    /// Group the anchor series belongs to, if any.
    #[serde(default)]
    pub group: Option<GroupInfo>,
    /// Storage locations known to the host.
    #[serde(default)]
    pub import_folders: Vec<ImportFolder>,
}

impl RenameRequest {
    /// The anchor series (first linked anime).
    pub fn primary_anime(&self) -> Option<&AnimeInfo> {
        self.anime.first()
    }

    /// The primary episode (first linked episode).
    pub fn primary_episode(&self) -> Option<&EpisodeInfo> {
        self.episodes.first()
    }
}
