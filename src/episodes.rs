//! Episode-number range compression, e.g. `01-03 05 S1-2`.

use std::collections::BTreeMap;

use crate::metadata::EpisodeInfo;

/// Summarize the numbers of the episodes owned by `anchor_anime_id`.
///
/// Episodes are grouped by kind (regular episodes first, unknown kinds last),
/// each group sorted ascending and compressed into contiguous runs. Runs are
/// written as `<prefix><first>` or `<prefix><first>-<last>` with numbers zero
/// padded to `width`, separated by single spaces. Only the first number of a
/// run carries the kind prefix.
pub fn format_episode_numbers(episodes: &[EpisodeInfo], anchor_anime_id: i64, width: usize) -> String {
    let mut groups: BTreeMap<(u8, &'static str), Vec<i64>> = BTreeMap::new();
    for episode in episodes.iter().filter(|ep| ep.anime_id == anchor_anime_id) {
        let order = episode.kind.ordinal().unwrap_or(u8::MAX);
        groups
            .entry((order, episode.kind.prefix()))
            .or_default()
            .push(episode.number);
    }

    let mut out = String::new();
    for ((_, prefix), mut numbers) in groups {
        numbers.sort_unstable();
        numbers.dedup();
        for (first, last) in runs(&numbers) {
            out.push(' ');
            out.push_str(&render(prefix, first, width));
            if last != first {
                out.push('-');
                out.push_str(&render("", last, width));
            }
        }
    }
    out.trim().to_string()
}

/// Maximal runs of consecutive numbers in a sorted, duplicate-free slice.
fn runs(numbers: &[i64]) -> Vec<(i64, i64)> {
    let mut runs: Vec<(i64, i64)> = Vec::new();
    for &number in numbers {
        match runs.last_mut() {
            Some((_, last)) if last.checked_add(1) == Some(number) => *last = number,
            _ => runs.push((number, number)),
        }
    }
    runs
}

fn render(prefix: &str, number: i64, width: usize) -> String {
    format!("{}{:0width$}", prefix, number, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::EpisodeKind;

    fn ep(anime_id: i64, number: i64, kind: EpisodeKind) -> EpisodeInfo {
        EpisodeInfo {
            id: anime_id * 1000 + number,
            anime_id,
            number,
            kind,
            air_date: None,
            titles: Vec::new(),
        }
    }

    #[test]
    fn compresses_contiguous_runs() {
        let episodes: Vec<_> = [1, 2, 3, 5, 6, 8, 10]
            .into_iter()
            .map(|n| ep(1, n, EpisodeKind::Episode))
            .collect();
        assert_eq!(format_episode_numbers(&episodes, 1, 3), "001-003 005-006 008 010");
    }

    #[test]
    fn filters_to_anchor_series_and_prefixes_kinds() {
        let episodes = vec![
            ep(1, 1, EpisodeKind::Episode),
            ep(1, 2, EpisodeKind::Episode),
            ep(1, 5, EpisodeKind::Other),
            ep(2, 1, EpisodeKind::Other),
        ];
        assert_eq!(format_episode_numbers(&episodes, 1, 0), "1-2 O5");
    }

    #[test]
    fn groups_follow_kind_order_regardless_of_input_order() {
        let episodes = vec![
            ep(1, 3, EpisodeKind::Unknown),
            ep(1, 2, EpisodeKind::Credits),
            ep(1, 1, EpisodeKind::Special),
            ep(1, 2, EpisodeKind::Special),
            ep(1, 7, EpisodeKind::Episode),
        ];
        assert_eq!(format_episode_numbers(&episodes, 1, 2), "07 S01-02 C02 03");
    }

    #[test]
    fn prefix_only_leads_a_run() {
        let episodes: Vec<_> = [1, 2, 3, 6]
            .into_iter()
            .map(|n| ep(1, n, EpisodeKind::Special))
            .collect();
        assert_eq!(format_episode_numbers(&episodes, 1, 0), "S1-3 S6");
    }

    #[test]
    fn empty_and_unmatched_inputs() {
        assert_eq!(format_episode_numbers(&[], 1, 2), "");
        assert_eq!(format_episode_numbers(&[ep(9, 1, EpisodeKind::Episode)], 1, 2), "");
    }

    #[test]
    fn duplicates_collapse() {
        let episodes = vec![ep(1, 4, EpisodeKind::Episode), ep(1, 4, EpisodeKind::Episode)];
        assert_eq!(format_episode_numbers(&episodes, 1, 0), "4");
    }
}
