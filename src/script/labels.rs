//! The closed label vocabulary and the accessors behind each label.
//!
//! A label belongs to exactly one category. Adding a label is backwards
//! compatible; renaming, removing or recategorizing one breaks scripts.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::metadata::{AnimeInfo, EpisodeInfo, Language, MediaInfo, RenameRequest, Title, TitleKind};

use super::value::Collection;

/// Labels that produce text.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StringLabel {
    AnimeTitlePreferred,
    AnimeTitleRomaji,
    AnimeTitleEnglish,
    AnimeTitleJapanese,
    EpisodeTitleRomaji,
    EpisodeTitleEnglish,
    EpisodeTitleJapanese,
    AnimeType,
    EpisodeType,
    EpisodePrefix,
    GroupShort,
    GroupLong,
    GroupName,
    Source,
    Resolution,
    VideoCodec,
    Duration,
    CrcLower,
    CrcUpper,
    Ed2kLower,
    Ed2kUpper,
    Sha1Lower,
    Sha1Upper,
    Md5Lower,
    Md5Upper,
    OldFilename,
    OriginalFilename,
    Extension,
}

/// Labels that produce integers.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumberLabel {
    AnimeId,
    EpisodeId,
    FileId,
    EpisodeNumber,
    FileVersion,
    Width,
    Height,
    BitDepth,
    AudioChannels,
    EpisodeCount,
    SpecialCount,
    AirYear,
    EpisodeAirYear,
    FileSize,
}

/// Labels that produce booleans.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoolLabel {
    Restricted,
    Censored,
    Chaptered,
    ManuallyLinked,
    InDropSource,
    MultiLinked,
    MultiAnime,
}

/// Labels that produce collections usable with `has`.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionLabel {
    AnimeTitles,
    EpisodeTitles,
    ImportFolders,
    AudioCodecs,
    DubLanguages,
    SubLanguages,
}

/// A label of any category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Text label.
    String(StringLabel),
    /// Integer label.
    Number(NumberLabel),
    /// Boolean label.
    Bool(BoolLabel),
    /// Collection label.
    Collection(CollectionLabel),
}

const STRING_LABELS: &[(&str, StringLabel)] = &[
    ("AnimeTitlePreferred", StringLabel::AnimeTitlePreferred),
    ("AnimeTitleRomaji", StringLabel::AnimeTitleRomaji),
    ("AnimeTitleEnglish", StringLabel::AnimeTitleEnglish),
    ("AnimeTitleJapanese", StringLabel::AnimeTitleJapanese),
    ("EpisodeTitleRomaji", StringLabel::EpisodeTitleRomaji),
    ("EpisodeTitleEnglish", StringLabel::EpisodeTitleEnglish),
    ("EpisodeTitleJapanese", StringLabel::EpisodeTitleJapanese),
    ("AnimeType", StringLabel::AnimeType),
    ("EpisodeType", StringLabel::EpisodeType),
    ("EpisodePrefix", StringLabel::EpisodePrefix),
    ("GroupShort", StringLabel::GroupShort),
    ("GroupLong", StringLabel::GroupLong),
    ("GroupName", StringLabel::GroupName),
    ("Source", StringLabel::Source),
    ("Resolution", StringLabel::Resolution),
    ("VideoCodec", StringLabel::VideoCodec),
    ("Duration", StringLabel::Duration),
    ("CrcLower", StringLabel::CrcLower),
    ("CrcUpper", StringLabel::CrcUpper),
    ("Ed2kLower", StringLabel::Ed2kLower),
    ("Ed2kUpper", StringLabel::Ed2kUpper),
    ("Sha1Lower", StringLabel::Sha1Lower),
    ("Sha1Upper", StringLabel::Sha1Upper),
    ("Md5Lower", StringLabel::Md5Lower),
    ("Md5Upper", StringLabel::Md5Upper),
    ("OldFilename", StringLabel::OldFilename),
    ("OriginalFilename", StringLabel::OriginalFilename),
    ("Extension", StringLabel::Extension),
];

const NUMBER_LABELS: &[(&str, NumberLabel)] = &[
    ("AnimeId", NumberLabel::AnimeId),
    ("EpisodeId", NumberLabel::EpisodeId),
    ("FileId", NumberLabel::FileId),
    ("EpisodeNumber", NumberLabel::EpisodeNumber),
    ("FileVersion", NumberLabel::FileVersion),
    ("Width", NumberLabel::Width),
    ("Height", NumberLabel::Height),
    ("BitDepth", NumberLabel::BitDepth),
    ("AudioChannels", NumberLabel::AudioChannels),
    ("EpisodeCount", NumberLabel::EpisodeCount),
    ("SpecialCount", NumberLabel::SpecialCount),
    ("AirYear", NumberLabel::AirYear),
    ("EpisodeAirYear", NumberLabel::EpisodeAirYear),
    ("FileSize", NumberLabel::FileSize),
];

const BOOL_LABELS: &[(&str, BoolLabel)] = &[
    ("Restricted", BoolLabel::Restricted),
    ("Censored", BoolLabel::Censored),
    ("Chaptered", BoolLabel::Chaptered),
    ("ManuallyLinked", BoolLabel::ManuallyLinked),
    ("InDropSource", BoolLabel::InDropSource),
    ("MultiLinked", BoolLabel::MultiLinked),
    ("MultiAnime", BoolLabel::MultiAnime),
];

const COLLECTION_LABELS: &[(&str, CollectionLabel)] = &[
    ("AnimeTitles", CollectionLabel::AnimeTitles),
    ("EpisodeTitles", CollectionLabel::EpisodeTitles),
    ("ImportFolders", CollectionLabel::ImportFolders),
    ("AudioCodecs", CollectionLabel::AudioCodecs),
    ("DubLanguages", CollectionLabel::DubLanguages),
    ("SubLanguages", CollectionLabel::SubLanguages),
];

fn lookup<T: Copy>(table: &[(&'static str, T)], name: &str) -> Option<T> {
    table.iter().find(|(key, _)| *key == name).map(|(_, label)| *label)
}

fn reverse<T: Copy + PartialEq>(table: &[(&'static str, T)], label: T) -> &'static str {
    table
        .iter()
        .find(|(_, candidate)| *candidate == label)
        .map(|(name, _)| *name)
        .unwrap_or("?")
}

impl Label {
    /// Resolve a label name as written in a script. Names are case-sensitive.
    pub fn from_name(name: &str) -> Option<Label> {
        lookup(STRING_LABELS, name)
            .map(Label::String)
            .or_else(|| lookup(NUMBER_LABELS, name).map(Label::Number))
            .or_else(|| lookup(BOOL_LABELS, name).map(Label::Bool))
            .or_else(|| lookup(COLLECTION_LABELS, name).map(Label::Collection))
    }

    /// Name of the label as written in scripts.
    pub fn name(self) -> &'static str {
        match self {
            Label::String(label) => reverse(STRING_LABELS, label),
            Label::Number(label) => reverse(NUMBER_LABELS, label),
            Label::Bool(label) => reverse(BOOL_LABELS, label),
            Label::Collection(label) => reverse(COLLECTION_LABELS, label),
        }
    }

    /// Every label name, grouped by category.
    pub fn all_names() -> impl Iterator<Item = &'static str> {
        STRING_LABELS
            .iter()
            .map(|(name, _)| *name)
            .chain(NUMBER_LABELS.iter().map(|(name, _)| *name))
            .chain(BOOL_LABELS.iter().map(|(name, _)| *name))
            .chain(COLLECTION_LABELS.iter().map(|(name, _)| *name))
    }
}

/// Read-only view over a [`RenameRequest`] that answers label lookups.
///
/// Missing optional metadata resolves to the empty string, zero, `false` or an
/// empty collection; the accessors never fail.
#[derive(Debug, Clone, Copy)]
pub struct Metadata<'a> {
    request: &'a RenameRequest,
}

impl<'a> Metadata<'a> {
    /// Wrap a request.
    pub fn new(request: &'a RenameRequest) -> Self {
        Self { request }
    }

    /// The wrapped request.
    pub fn request(&self) -> &'a RenameRequest {
        self.request
    }

    fn anime(&self) -> Option<&'a AnimeInfo> {
        self.request.primary_anime()
    }

    fn episode(&self) -> Option<&'a EpisodeInfo> {
        self.request.primary_episode()
    }

    fn media(&self) -> Option<&'a MediaInfo> {
        self.request.file.media.as_ref()
    }

    fn anime_title(&self, language: Language, kinds: &[TitleKind]) -> String {
        self.anime()
            .and_then(|anime| Title::pick(&anime.titles, language, kinds))
            .map(|title| title.text.clone())
            .unwrap_or_default()
    }

    fn episode_title(&self, language: Language) -> String {
        self.episode()
            .and_then(|episode| {
                Title::pick(&episode.titles, language, &[TitleKind::Main, TitleKind::Official])
            })
            .map(|title| title.text.clone())
            .unwrap_or_default()
    }

    /// Resolve a text label.
    pub fn string(&self, label: StringLabel) -> String {
        let file = &self.request.file;
        let anidb = file.anidb.as_ref();
        let group = anidb.and_then(|info| info.release_group.as_ref());
        let video = self.media().and_then(|media| media.video.as_ref());
        match label {
            StringLabel::AnimeTitlePreferred => self
                .anime()
                .map(|anime| anime.preferred_title.clone())
                .unwrap_or_default(),
            StringLabel::AnimeTitleRomaji => {
                self.anime_title(Language::Romaji, &[TitleKind::Main, TitleKind::Official])
            }
            StringLabel::AnimeTitleEnglish => {
                self.anime_title(Language::English, &[TitleKind::Official, TitleKind::Main])
            }
            StringLabel::AnimeTitleJapanese => {
                self.anime_title(Language::Japanese, &[TitleKind::Official, TitleKind::Main])
            }
            StringLabel::EpisodeTitleRomaji => self.episode_title(Language::Romaji),
            StringLabel::EpisodeTitleEnglish => self.episode_title(Language::English),
            StringLabel::EpisodeTitleJapanese => self.episode_title(Language::Japanese),
            StringLabel::AnimeType => self
                .anime()
                .map(|anime| anime.kind.name().to_string())
                .unwrap_or_default(),
            StringLabel::EpisodeType => self
                .episode()
                .map(|episode| episode.kind.name().to_string())
                .unwrap_or_default(),
            StringLabel::EpisodePrefix => self
                .episode()
                .map(|episode| episode.kind.prefix().to_string())
                .unwrap_or_default(),
            StringLabel::GroupShort => group.map(|g| g.short_name.clone()).unwrap_or_default(),
            StringLabel::GroupLong => group.map(|g| g.name.clone()).unwrap_or_default(),
            StringLabel::GroupName => self
                .request
                .group
                .as_ref()
                .map(|g| g.name.clone())
                .unwrap_or_default(),
            StringLabel::Source => anidb.map(|info| info.source.clone()).unwrap_or_default(),
            StringLabel::Resolution => match video {
                Some(video) if video.width > 0 && video.height > 0 => {
                    format!("{}x{}", video.width, video.height)
                }
                _ => String::new(),
            },
            StringLabel::VideoCodec => video.map(|v| v.codec.clone()).unwrap_or_default(),
            StringLabel::Duration => match self.media() {
                Some(media) if media.duration_secs > 0 => format_duration(media.duration_secs),
                _ => String::new(),
            },
            StringLabel::CrcLower => file.hashes.crc.to_lowercase(),
            StringLabel::CrcUpper => file.hashes.crc.to_uppercase(),
            StringLabel::Ed2kLower => file.hashes.ed2k.to_lowercase(),
            StringLabel::Ed2kUpper => file.hashes.ed2k.to_uppercase(),
            StringLabel::Sha1Lower => file.hashes.sha1.to_lowercase(),
            StringLabel::Sha1Upper => file.hashes.sha1.to_uppercase(),
            StringLabel::Md5Lower => file.hashes.md5.to_lowercase(),
            StringLabel::Md5Upper => file.hashes.md5.to_uppercase(),
            StringLabel::OldFilename => file.file_name(),
            StringLabel::OriginalFilename => anidb
                .map(|info| info.original_filename.clone())
                .unwrap_or_default(),
            StringLabel::Extension => file.extension().trim_start_matches('.').to_string(),
        }
    }

    /// Resolve an integer label.
    pub fn number(&self, label: NumberLabel) -> i64 {
        let file = &self.request.file;
        let video = self.media().and_then(|media| media.video.as_ref());
        match label {
            NumberLabel::AnimeId => self.anime().map(|anime| anime.id).unwrap_or(0),
            NumberLabel::EpisodeId => self.episode().map(|episode| episode.id).unwrap_or(0),
            NumberLabel::FileId => file.id,
            NumberLabel::EpisodeNumber => self.episode().map(|episode| episode.number).unwrap_or(0),
            NumberLabel::FileVersion => file.anidb.as_ref().map(|info| info.version).unwrap_or(0),
            NumberLabel::Width => video.map(|v| v.width).unwrap_or(0),
            NumberLabel::Height => video.map(|v| v.height).unwrap_or(0),
            NumberLabel::BitDepth => video.map(|v| v.bit_depth).unwrap_or(0),
            NumberLabel::AudioChannels => self
                .media()
                .and_then(|media| media.audio.iter().map(|stream| stream.channels).max())
                .unwrap_or(0),
            NumberLabel::EpisodeCount => self
                .anime()
                .map(|anime| anime.episode_counts.episodes)
                .unwrap_or(0),
            NumberLabel::SpecialCount => self
                .anime()
                .map(|anime| anime.episode_counts.specials)
                .unwrap_or(0),
            NumberLabel::AirYear => self
                .anime()
                .and_then(|anime| anime.air_date)
                .map(|date| i64::from(date.year()))
                .unwrap_or(0),
            NumberLabel::EpisodeAirYear => self
                .episode()
                .and_then(|episode| episode.air_date)
                .map(|date| i64::from(date.year()))
                .unwrap_or(0),
            NumberLabel::FileSize => file.size,
        }
    }

    /// Resolve a boolean label.
    pub fn boolean(&self, label: BoolLabel) -> bool {
        let file = &self.request.file;
        match label {
            BoolLabel::Restricted => self.anime().map(|anime| anime.restricted).unwrap_or(false),
            BoolLabel::Censored => file.anidb.as_ref().map(|info| info.censored).unwrap_or(false),
            BoolLabel::Chaptered => self.media().map(|media| media.chaptered).unwrap_or(false),
            BoolLabel::ManuallyLinked => file.manually_linked,
            BoolLabel::InDropSource => self
                .request
                .import_folders
                .iter()
                .any(|folder| folder.is_source() && folder.prefix_len(&file.path).is_some()),
            BoolLabel::MultiLinked => self.request.episodes.len() > 1,
            BoolLabel::MultiAnime => self.request.anime.len() > 1,
        }
    }

    /// Resolve a collection label.
    pub fn collection(&self, label: CollectionLabel) -> Collection {
        let file = &self.request.file;
        let anidb = file.anidb.as_ref();
        match label {
            CollectionLabel::AnimeTitles => Collection::Titles(
                self.anime().map(|anime| anime.titles.clone()).unwrap_or_default(),
            ),
            CollectionLabel::EpisodeTitles => Collection::Titles(
                self.episode()
                    .map(|episode| episode.titles.clone())
                    .unwrap_or_default(),
            ),
            CollectionLabel::ImportFolders => {
                Collection::Folders(self.request.import_folders.clone())
            }
            CollectionLabel::AudioCodecs => Collection::Strings(
                self.media()
                    .map(|media| media.audio.iter().map(|stream| stream.codec.clone()).collect())
                    .unwrap_or_default(),
            ),
            CollectionLabel::DubLanguages => {
                let from_anidb = anidb.map(|info| info.audio_languages.clone()).unwrap_or_default();
                if !from_anidb.is_empty() {
                    return Collection::Languages(from_anidb);
                }
                Collection::Languages(
                    self.media()
                        .map(|media| dedup(media.audio.iter().filter_map(|s| s.language)))
                        .unwrap_or_default(),
                )
            }
            CollectionLabel::SubLanguages => {
                let from_anidb = anidb.map(|info| info.sub_languages.clone()).unwrap_or_default();
                if !from_anidb.is_empty() {
                    return Collection::Languages(from_anidb);
                }
                Collection::Languages(
                    self.media()
                        .map(|media| dedup(media.subtitles.iter().filter_map(|s| s.language)))
                        .unwrap_or_default(),
                )
            }
        }
    }
}

fn dedup(languages: impl Iterator<Item = Language>) -> Vec<Language> {
    let mut out: Vec<Language> = Vec::new();
    for lang in languages {
        if !out.contains(&lang) {
            out.push(lang);
        }
    }
    out
}

fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}
