use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Title language as reported by AniDB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    /// Language was not recorded.
    Unknown,
    /// Romanized Japanese (`x-jat`).
    Romaji,
    /// English.
    English,
    /// Japanese.
    Japanese,
    /// Chinese (unspecified script).
    Chinese,
    /// Simplified Chinese.
    ChineseSimplified,
    /// Traditional Chinese.
    ChineseTraditional,
    /// Romanized Chinese.
    Pinyin,
    /// Korean.
    Korean,
    /// Romanized Korean.
    KoreanTranscription,
    /// Thai.
    Thai,
    /// French.
    French,
    /// German.
    German,
    /// Spanish.
    Spanish,
    /// Italian.
    Italian,
    /// Portuguese.
    Portuguese,
    /// Brazilian Portuguese.
    BrazilianPortuguese,
    /// Russian.
    Russian,
    /// Polish.
    Polish,
    /// Dutch.
    Dutch,
    /// Swedish.
    Swedish,
    /// Norwegian.
    Norwegian,
    /// Danish.
    Danish,
    /// Finnish.
    Finnish,
    /// Arabic.
    Arabic,
    /// Hebrew.
    Hebrew,
    /// Turkish.
    Turkish,
    /// Indonesian.
    Indonesian,
    /// Vietnamese.
    Vietnamese,
    /// Czech.
    Czech,
    /// Hungarian.
    Hungarian,
    /// Greek.
    Greek,
}

impl Language {
    /// Every language, in declaration order.
    pub const ALL: &'static [Language] = &[
        Language::Unknown,
        Language::Romaji,
        Language::English,
        Language::Japanese,
        Language::Chinese,
        Language::ChineseSimplified,
        Language::ChineseTraditional,
        Language::Pinyin,
        Language::Korean,
        Language::KoreanTranscription,
        Language::Thai,
        Language::French,
        Language::German,
        Language::Spanish,
        Language::Italian,
        Language::Portuguese,
        Language::BrazilianPortuguese,
        Language::Russian,
        Language::Polish,
        Language::Dutch,
        Language::Swedish,
        Language::Norwegian,
        Language::Danish,
        Language::Finnish,
        Language::Arabic,
        Language::Hebrew,
        Language::Turkish,
        Language::Indonesian,
        Language::Vietnamese,
        Language::Czech,
        Language::Hungarian,
        Language::Greek,
    ];

    /// Name used both in scripts and when a language is stringified.
    pub fn name(self) -> &'static str {
        match self {
            Language::Unknown => "Unknown",
            Language::Romaji => "Romaji",
            Language::English => "English",
            Language::Japanese => "Japanese",
            Language::Chinese => "Chinese",
            Language::ChineseSimplified => "ChineseSimplified",
            Language::ChineseTraditional => "ChineseTraditional",
            Language::Pinyin => "Pinyin",
            Language::Korean => "Korean",
            Language::KoreanTranscription => "KoreanTranscription",
            Language::Thai => "Thai",
            Language::French => "French",
            Language::German => "German",
            Language::Spanish => "Spanish",
            Language::Italian => "Italian",
            Language::Portuguese => "Portuguese",
            Language::BrazilianPortuguese => "BrazilianPortuguese",
            Language::Russian => "Russian",
            Language::Polish => "Polish",
            Language::Dutch => "Dutch",
            Language::Swedish => "Swedish",
            Language::Norwegian => "Norwegian",
            Language::Danish => "Danish",
            Language::Finnish => "Finnish",
            Language::Arabic => "Arabic",
            Language::Hebrew => "Hebrew",
            Language::Turkish => "Turkish",
            Language::Indonesian => "Indonesian",
            Language::Vietnamese => "Vietnamese",
            Language::Czech => "Czech",
            Language::Hungarian => "Hungarian",
            Language::Greek => "Greek",
        }
    }

    /// Exact-case lookup, used for keywords in scripts.
    pub fn from_name(name: &str) -> Option<Language> {
        Self::ALL.iter().copied().find(|lang| lang.name() == name)
    }

    /// Case-insensitive lookup, used when a string is matched against a language.
    pub fn from_name_ignore_case(name: &str) -> Option<Language> {
        Self::ALL
            .iter()
            .copied()
            .find(|lang| lang.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// AniDB title type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TitleKind {
    /// No type recorded.
    None,
    /// The main title of the entry.
    Main,
    /// Official title in a given language.
    Official,
    /// Short form / abbreviation.
    Short,
    /// Alternative title.
    Synonym,
    /// Title as shown on the title card.
    TitleCard,
    /// Kana reading of a kanji title.
    KanjiReading,
}

impl TitleKind {
    /// Every title kind, in declaration order.
    pub const ALL: &'static [TitleKind] = &[
        TitleKind::None,
        TitleKind::Main,
        TitleKind::Official,
        TitleKind::Short,
        TitleKind::Synonym,
        TitleKind::TitleCard,
        TitleKind::KanjiReading,
    ];

    /// Keyword naming this kind in scripts.
    pub fn name(self) -> &'static str {
        match self {
            TitleKind::None => "None",
            TitleKind::Main => "Main",
            TitleKind::Official => "Official",
            TitleKind::Short => "Short",
            TitleKind::Synonym => "Synonym",
            TitleKind::TitleCard => "TitleCard",
            TitleKind::KanjiReading => "KanjiReading",
        }
    }

    /// Exact-case keyword lookup.
    pub fn from_name(name: &str) -> Option<TitleKind> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }
}

/// A single title of an anime or episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    /// Title text.
    pub text: String,
    /// Language of the title.
    pub language: Language,
    /// AniDB title type.
    pub kind: TitleKind,
}

impl Title {
    /// Convenience constructor.
    pub fn new(text: impl Into<String>, language: Language, kind: TitleKind) -> Self {
        Self {
            text: text.into(),
            language,
            kind,
        }
    }

    /// Pick the best title for `language`, preferring the kinds in the order given.
    /// Falls back to any title in that language.
    pub fn pick<'a>(titles: &'a [Title], language: Language, kinds: &[TitleKind]) -> Option<&'a Title> {
        kinds
            .iter()
            .find_map(|kind| {
                titles
                    .iter()
                    .find(|title| title.language == language && title.kind == *kind)
            })
            .or_else(|| titles.iter().find(|title| title.language == language))
    }
}

/// Broad series type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimeKind {
    /// Feature film.
    Movie,
    /// Original video animation.
    Ova,
    /// Broadcast TV series.
    TvSeries,
    /// One-off TV special.
    TvSpecial,
    /// Web release.
    Web,
    /// Anything else.
    #[serde(other)]
    Other,
}

impl AnimeKind {
    /// Display name exposed through the `AnimeType` label.
    pub fn name(self) -> &'static str {
        match self {
            AnimeKind::Movie => "Movie",
            AnimeKind::Ova => "OVA",
            AnimeKind::TvSeries => "TV Series",
            AnimeKind::TvSpecial => "TV Special",
            AnimeKind::Web => "Web",
            AnimeKind::Other => "Other",
        }
    }
}

/// Number of episodes of each kind a series has.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeCounts {
    /// Regular episodes.
    pub episodes: i64,
    /// Specials.
    pub specials: i64,
    /// Openings and endings.
    pub credits: i64,
    /// Trailers and promos.
    pub trailers: i64,
    /// Parodies.
    pub parodies: i64,
    /// Everything else.
    pub others: i64,
}

/// Series record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeInfo {
    /// AniDB anime id.
    pub id: i64,
    /// Title the host prefers for display.
    pub preferred_title: String,
    /// All known titles.
    #[serde(default)]
    pub titles: Vec<Title>,
    /// Whether the series is age restricted.
    #[serde(default)]
    pub restricted: bool,
    /// Series type.
    pub kind: AnimeKind,
    /// First air date.
    #[serde(default)]
    pub air_date: Option<NaiveDate>,
    /// Last air date.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Episode totals per kind.
    #[serde(default)]
    pub episode_counts: EpisodeCounts,
    /// Ids of related series.
    #[serde(default)]
    pub related_ids: Vec<i64>,
}

/// Kind of an episode. Variants are declared in the order episode ranges are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EpisodeKind {
    /// Regular episode.
    Episode,
    /// Special.
    Special,
    /// Opening or ending.
    Credits,
    /// Trailer or promo.
    Trailer,
    /// Parody.
    Parody,
    /// Anything else.
    Other,
    /// A kind the host did not recognize.
    #[serde(other)]
    Unknown,
}

impl EpisodeKind {
    /// Position used when ordering groups of episodes. `None` sorts after every defined kind.
    pub fn ordinal(self) -> Option<u8> {
        match self {
            EpisodeKind::Episode => Some(0),
            EpisodeKind::Special => Some(1),
            EpisodeKind::Credits => Some(2),
            EpisodeKind::Trailer => Some(3),
            EpisodeKind::Parody => Some(4),
            EpisodeKind::Other => Some(5),
            EpisodeKind::Unknown => None,
        }
    }

    /// Short code printed in front of episode numbers of this kind.
    pub fn prefix(self) -> &'static str {
        match self {
            EpisodeKind::Episode | EpisodeKind::Unknown => "",
            EpisodeKind::Special => "S",
            EpisodeKind::Credits => "C",
            EpisodeKind::Trailer => "T",
            EpisodeKind::Parody => "P",
            EpisodeKind::Other => "O",
        }
    }

    /// Display name exposed through the `EpisodeType` label.
    pub fn name(self) -> &'static str {
        match self {
            EpisodeKind::Episode => "Episode",
            EpisodeKind::Special => "Special",
            EpisodeKind::Credits => "Credits",
            EpisodeKind::Trailer => "Trailer",
            EpisodeKind::Parody => "Parody",
            EpisodeKind::Other => "Other",
            EpisodeKind::Unknown => "Unknown",
        }
    }
}

/// Episode record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeInfo {
    /// AniDB episode id.
    pub id: i64,
    /// Id of the owning series.
    pub anime_id: i64,
    /// Episode number within its kind.
    pub number: i64,
    /// Episode kind.
    pub kind: EpisodeKind,
    /// Air date.
    #[serde(default)]
    pub air_date: Option<NaiveDate>,
    /// Episode titles.
    #[serde(default)]
    pub titles: Vec<Title>,
}
