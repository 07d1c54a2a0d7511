mod common;

use std::path::PathBuf;

use common::{filename, renamer, request};
use renamescript::destination::DestinationError;
use renamescript::script::EvalError;
use renamescript::{RenameError, Script};

const FULL_SCRIPT: &str = r#"
// English title when there is an official one
if (AnimeTitles has English and Official)
    set first(AnimeTitles has English and Official)
else
    set AnimeTitlePreferred
add ' - ' episodes(2) ' [' GroupShort ']'

destination set 'Anime'
subfolder set AnimeTitleRomaji '/Season 1'
"#;

#[test]
fn full_script_produces_all_three_outputs() {
    let result = renamer()
        .rename(&Script::new(FULL_SCRIPT), &request())
        .expect("rename")
        .expect("result");

    assert_eq!(result.filename, "Attack on Titan - 01-02 [Grp].mkv");
    assert_eq!(result.destination.id, 2);
    assert_eq!(result.subfolder, PathBuf::from("Shingeki no Kyojin").join("Season 1"));
    assert_eq!(
        result.full_path(),
        PathBuf::from("/mnt/anime/Shingeki no Kyojin/Season 1/Attack on Titan - 01-02 [Grp].mkv")
    );
}

#[test]
fn numeric_looking_strings_equal_numbers() {
    assert_eq!(filename("if (1231 == '1231') set 'yes' else set 'no'").as_deref(), Some("yes.mkv"));
    assert_eq!(filename("if (1 == 'abc') set 'yes' else set 'no'").as_deref(), Some("no.mkv"));
    assert_eq!(filename("if (AnimeId != '100') set 'yes' else set 'no'").as_deref(), Some("no.mkv"));
}

#[test]
fn boolean_operands_cannot_be_compared() {
    let err = renamer()
        .filename(&Script::new("if (Restricted == 'x') skip"), &request())
        .unwrap_err();
    assert!(matches!(err, RenameError::Eval(EvalError::Incomparable { .. })));
}

#[test]
fn ordering_coerces_strings_to_length() {
    assert_eq!(filename("if ('abc' > 2) set 'longer'").as_deref(), Some("longer.mkv"));
    assert_eq!(filename("if (AnimeTitles >= 4) set 'many'").as_deref(), Some("many.mkv"));
}

#[test]
fn labels_resolve_against_the_request() {
    assert_eq!(
        filename("set Resolution ' ' VideoCodec ' ' CrcUpper ' v' FileVersion ' ' Duration").as_deref(),
        Some("1920x1080 HEVC ABCD1234 v2 0։24։00.mkv")
    );
    assert_eq!(
        filename("set len(AnimeTitles) ' ' len('abc') ' ' AirYear ' ' AnimeType").as_deref(),
        Some("4 3 2013 TV Series.mkv")
    );
    assert_eq!(
        filename("if (InDropSource and MultiLinked and not MultiAnime) set 'flags'").as_deref(),
        Some("flags.mkv")
    );
}

#[test]
fn collections_stringify_and_filter() {
    assert_eq!(
        filename("set AnimeTitles has English").as_deref(),
        Some("Attack on Titan, AoT.mkv")
    );
    assert_eq!(
        filename("if (DubLanguages has English) set 'dual' else set 'sub'").as_deref(),
        Some("dual.mkv")
    );
    assert_eq!(
        filename("if (AnimeTitles has 'titan') set 'match'").as_deref(),
        Some("match.mkv")
    );
    assert_eq!(
        filename("if (ImportFolders has '/MNT/ANIME/') set 'known'").as_deref(),
        Some("known.mkv")
    );
}

#[test]
fn has_on_empty_collection_is_empty() {
    assert_eq!(
        filename("if (EpisodeTitles has Japanese) set 'x' else set 'empty'").as_deref(),
        Some("empty.mkv")
    );
    assert_eq!(
        filename("set len(ImportFolders has 'nope') first(SubLanguages has Japanese) '!'").as_deref(),
        Some("0!.mkv")
    );
}

#[test]
fn inapplicable_filter_is_an_error() {
    let err = renamer()
        .filename(&Script::new("if (ImportFolders has English) skip"), &request())
        .unwrap_err();
    assert!(matches!(err, RenameError::Eval(EvalError::InvalidFilter { .. })));
}

#[test]
fn string_functions_saturate() {
    assert_eq!(
        filename("set substr(AnimeTitlePreferred, 9, 100) '|' trunc('abc', 10) '|' trunc('abc', -1) 'x'").as_deref(),
        Some("no Kyojin¦abc¦x.mkv")
    );
    assert_eq!(
        filename("set upper(trim('  aot ')) pad(7, 3) lower('X')").as_deref(),
        Some("AOT007x.mkv")
    );
}

#[test]
fn illegal_characters_are_replaced() {
    assert_eq!(filename("set 'Re:Zero? <1/2>'").as_deref(), Some("Re։Zero﹖ ‹1⁄2›.mkv"));
}

#[test]
fn cancel_is_reported_in_every_entry_point() {
    let renamer = renamer();
    let script = Script::new("subfolder set 'x' cancel 'a' 'b'");
    let req = request();
    assert_eq!(renamer.filename(&script, &req), Err(RenameError::Cancelled("ab".into())));
    assert_eq!(renamer.destination(&script, &req), Err(RenameError::Cancelled("ab".into())));
    assert_eq!(renamer.rename(&script, &req), Err(RenameError::Cancelled("ab".into())));
}

#[test]
fn skip_produces_nothing() {
    let script = Script::new("set 'name' destination set 'Anime' if (EpisodeNumber == 1) skip");
    assert_eq!(renamer().rename(&script, &request()), Ok(None));
}

#[test]
fn passes_do_not_leak_into_each_other() {
    let renamer = renamer();
    let req = request();

    let names_only = Script::new("filename set 'a' add 'b'");
    assert_eq!(renamer.filename(&names_only, &req), Ok(Some("ab.mkv".into())));
    assert_eq!(renamer.destination(&names_only, &req), Ok(None));
    assert_eq!(renamer.rename(&names_only, &req), Ok(None));

    let places_only = Script::new("destination set 'Anime' subfolder set 'Show'");
    assert_eq!(renamer.filename(&places_only, &req), Ok(None));
    let dest = renamer
        .destination(&places_only, &req)
        .expect("destination")
        .expect("moved");
    assert_eq!(dest.folder.name, "Anime");
    assert_eq!(dest.subfolder, PathBuf::from("Show"));
}

#[test]
fn bare_operands_append_to_their_target() {
    let renamer = renamer();
    let req = request();

    let script = Script::new("'[' GroupShort '] ' filename AnimeTitleRomaji destination 'Anime' subfolder 'Show'");
    let result = renamer.rename(&script, &req).expect("rename").expect("result");
    assert_eq!(result.filename, "[Grp] Shingeki no Kyojin.mkv");
    assert_eq!(result.destination.id, 2);
    assert_eq!(result.subfolder, PathBuf::from("Show"));

    assert_eq!(filename("set 'a' 'b' if (Restricted) 'r' else 'c'").as_deref(), Some("abc.mkv"));
}

#[test]
fn destination_requires_destination_flag() {
    let script = Script::new("set 'x' destination set 'Archive' subfolder set 'Show'");
    assert_eq!(
        renamer().rename(&script, &request()),
        Err(RenameError::Destination(DestinationError::BadDestination("Archive".into())))
    );
}

#[test]
fn wildcards_reuse_current_segments() {
    let renamer = renamer();
    let req = request();

    let keep = Script::new("destination set 'Anime' subfolder set '*/New'");
    let dest = renamer.destination(&keep, &req).expect("destination").expect("moved");
    assert_eq!(dest.subfolder, PathBuf::from("Incoming").join("New"));

    let too_deep = Script::new("destination set 'Anime' subfolder set '*/*'");
    assert_eq!(
        renamer.destination(&too_deep, &req),
        Err(RenameError::Destination(DestinationError::WildcardOutOfRange { index: 1 }))
    );
}

#[test]
fn destination_alone_keeps_current_subfolder() {
    let script = Script::new("destination set 'anime'");
    let dest = renamer()
        .destination(&script, &request())
        .expect("destination")
        .expect("moved");
    assert_eq!(dest.folder.id, 2);
    assert_eq!(dest.subfolder, PathBuf::from("Incoming"));
}

#[test]
fn bad_arguments_are_rejected_before_parsing() {
    let renamer = renamer();
    let mut req = request();

    let wrong_kind = Script {
        kind: "Lua".into(),
        text: "set (".into(),
    };
    assert!(matches!(renamer.rename(&wrong_kind, &req), Err(RenameError::BadArguments(_))));
    assert!(matches!(renamer.rename(&Script::new("  "), &req), Err(RenameError::BadArguments(_))));

    req.episodes.clear();
    assert!(matches!(renamer.rename(&Script::new("set 'x'"), &req), Err(RenameError::BadArguments(_))));
}

#[test]
fn parse_errors_are_cached_and_reported() {
    let renamer = renamer();
    let first = renamer.check("set AnimeTitle").unwrap_err();
    let second = renamer.check("set AnimeTitle").unwrap_err();
    assert_eq!(first, second);
    assert_eq!((first.line, first.column), (1, 5));

    let err = renamer
        .rename(&Script::new("set AnimeTitle"), &request())
        .unwrap_err();
    assert_eq!(err, RenameError::Parse(first));
}
