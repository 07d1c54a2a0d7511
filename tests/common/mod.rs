//! Shared request fixtures for integration tests.

#![allow(dead_code)]

use renamescript::{RenameRequest, Renamer, RenamerConfig, Script};
use serde_json::json;

/// A file sitting in the drop folder, linked to episodes 1-2 of series 100.
pub fn request() -> RenameRequest {
    serde_json::from_value(json!({
        "file": {
            "id": 55,
            "path": "/mnt/drop/Incoming/[Grp] Shingeki no Kyojin - 01-02 [ABCD1234].mkv",
            "size": 1048576,
            "hashes": { "crc": "abcd1234", "ed2k": "", "sha1": "", "md5": "" },
            "media": {
                "video": { "codec": "HEVC", "width": 1920, "height": 1080, "bit_depth": 10 },
                "audio": [
                    { "codec": "FLAC", "channels": 2, "language": "Japanese" },
                    { "codec": "AAC", "channels": 6, "language": "English" }
                ],
                "subtitles": [{ "codec": "ASS", "language": "English" }],
                "duration_secs": 1440,
                "chaptered": true
            },
            "anidb": {
                "id": 9000,
                "source": "BD",
                "version": 2,
                "release_group": { "name": "Group Long", "short_name": "Grp" },
                "original_filename": "snk_01.mkv"
            }
        },
        "anime": [{
            "id": 100,
            "preferred_title": "Shingeki no Kyojin",
            "kind": "TvSeries",
            "air_date": "2013-04-07",
            "titles": [
                { "text": "Shingeki no Kyojin", "language": "Romaji", "kind": "Main" },
                { "text": "Attack on Titan", "language": "English", "kind": "Official" },
                { "text": "進撃の巨人", "language": "Japanese", "kind": "Official" },
                { "text": "AoT", "language": "English", "kind": "Short" }
            ],
            "episode_counts": { "episodes": 25, "specials": 8 }
        }],
        "episodes": [
            {
                "id": 1001, "anime_id": 100, "number": 1, "kind": "Episode",
                "titles": [{ "text": "To You, 2000 Years From Now", "language": "English", "kind": "Main" }]
            },
            { "id": 1002, "anime_id": 100, "number": 2, "kind": "Episode" }
        ],
        "import_folders": [
            { "id": 1, "name": "Drop", "location": "/mnt/drop", "kind": 1 },
            { "id": 2, "name": "Anime", "location": "/mnt/anime", "kind": 2 },
            { "id": 3, "name": "Archive", "location": "/mnt/archive", "kind": 0 }
        ]
    }))
    .expect("request fixture")
}

/// Renamer with the Windows illegal-character set and look-alike replacement.
pub fn renamer() -> Renamer {
    Renamer::new(RenamerConfig {
        windows_compatible: true,
        remove_illegal_chars: false,
        ..RenamerConfig::default()
    })
}

/// Evaluate only the filename half of `text`.
pub fn filename(text: &str) -> Option<String> {
    renamer()
        .filename(&Script::new(text), &request())
        .expect("filename evaluation")
}
