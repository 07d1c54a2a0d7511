use proptest::prelude::*;
use renamescript::episodes::format_episode_numbers;
use renamescript::metadata::{EpisodeInfo, EpisodeKind};
use renamescript::script::eval::substr;

fn episodes(numbers: &[i64]) -> Vec<EpisodeInfo> {
    episodes_of_kind(numbers, EpisodeKind::Episode)
}

fn episodes_of_kind(numbers: &[i64], kind: EpisodeKind) -> Vec<EpisodeInfo> {
    numbers
        .iter()
        .map(|&number| EpisodeInfo {
            id: number,
            anime_id: 1,
            number,
            kind,
            air_date: None,
            titles: Vec::new(),
        })
        .collect()
}

/// Expand `a-b c` back into the numbers it covers.
fn expand(formatted: &str) -> Vec<i64> {
    let mut out = Vec::new();
    for range in formatted.split_whitespace() {
        let mut bounds = range.split('-').map(|n| n.parse::<i64>().expect("number"));
        let first = bounds.next().expect("first");
        let last = bounds.next().unwrap_or(first);
        out.extend(first..=last);
    }
    out
}

proptest! {
    #[test]
    fn ranges_cover_exactly_the_input(mut numbers in prop::collection::vec(1i64..200, 0..40)) {
        let formatted = format_episode_numbers(&episodes(&numbers), 1, 0);
        numbers.sort_unstable();
        numbers.dedup();
        prop_assert_eq!(expand(&formatted), numbers);
    }

    #[test]
    fn ranges_are_maximal(numbers in prop::collection::btree_set(1i64..200, 0..40)) {
        let numbers: Vec<i64> = numbers.into_iter().collect();
        let formatted = format_episode_numbers(&episodes(&numbers), 1, 3);
        let bounds: Vec<(i64, i64)> = formatted
            .split_whitespace()
            .map(|range| {
                let mut parts = range.split('-').map(|n| n.parse::<i64>().expect("number"));
                let first = parts.next().expect("first");
                (first, parts.next().unwrap_or(first))
            })
            .collect();
        for pair in bounds.windows(2) {
            prop_assert!(pair[1].0 > pair[0].1 + 1, "adjacent ranges {:?} should have merged", pair);
        }
    }

    #[test]
    fn prefix_leads_each_run_only(numbers in prop::collection::btree_set(1i64..200, 1..40)) {
        let numbers: Vec<i64> = numbers.into_iter().collect();
        let formatted = format_episode_numbers(&episodes_of_kind(&numbers, EpisodeKind::Special), 1, 0);
        let mut unprefixed = Vec::new();
        for range in formatted.split_whitespace() {
            let rest = range.strip_prefix('S');
            prop_assert!(rest.is_some(), "run {} lacks its prefix", range);
            let rest = rest.unwrap_or_default();
            prop_assert!(!rest.contains('S'), "run {} repeats its prefix", range);
            unprefixed.push(rest.to_string());
        }
        prop_assert_eq!(expand(&unprefixed.join(" ")), numbers);
    }

    #[test]
    fn substr_never_exceeds_input(text in "\\PC{0,20}", start in -30i64..30, len in -30i64..30) {
        let out = substr(&text, start, Some(len));
        prop_assert!(out.chars().count() <= text.chars().count());
        prop_assert!(text.contains(out.as_str()));
        if len <= 0 {
            prop_assert!(out.is_empty());
        }
    }

    #[test]
    fn trunc_is_a_prefix(text in "\\PC{0,20}", len in -5i64..30) {
        let out = substr(&text, 0, Some(len));
        prop_assert!(text.starts_with(out.as_str()));
    }
}
