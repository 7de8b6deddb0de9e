use crate::chart::WeeklyRankEntry;
use crate::model::WeekId;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

pub const RANK_THRESHOLDS: [u32; 4] = [1, 3, 5, 10];

/// A named superlative. `holders` always lists every tied name, sorted;
/// a record is never silently narrowed to one arbitrary winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub title: String,
    pub holders: Vec<String>,
    pub value: u64,
}

/// All superlatives over the ranked weekly series. An empty series yields
/// an empty book rather than an error.
pub fn record_book(entries: &[WeeklyRankEntry]) -> Vec<Record> {
    let mut book = Vec::new();
    if entries.is_empty() {
        return book;
    }

    for threshold in RANK_THRESHOLDS {
        book.push(tied_max(
            format!("Most Total Weeks in Top {threshold}"),
            weeks_at_or_above(entries, threshold),
        ));
    }

    for threshold in RANK_THRESHOLDS {
        book.push(tied_max(
            format!("Most Consecutive Weeks in Top {threshold}"),
            streaks_at_or_above(entries, threshold),
        ));
    }

    book.push(tied_max(
        String::from("Constructor's Champion"),
        artist_points(entries),
    ));
    book.push(tied_max(
        String::from("Most Chart Hits (Artist)"),
        artist_chart_hits(entries),
    ));
    book.push(highest_debut(entries));

    book.retain(|record| !record.holders.is_empty());
    book
}

/// Weeks spent at `rank <= threshold`, per track.
pub fn weeks_at_or_above(entries: &[WeeklyRankEntry], threshold: u32) -> HashMap<String, u64> {
    let mut counts = HashMap::new();
    for entry in entries.iter().filter(|entry| entry.rank <= threshold) {
        *counts.entry(entry.track.clone()).or_insert(0) += 1;
    }
    counts
}

/// Longest run of consecutive charting weeks at `rank <= threshold`, per
/// track. Runs extend only when the raw ISO week number increments by one,
/// so a year boundary (W52 -> W01) always breaks a streak even when the
/// calendar gap is a single week.
pub fn streaks_at_or_above(entries: &[WeeklyRankEntry], threshold: u32) -> HashMap<String, u64> {
    let mut weeks_by_track: HashMap<String, Vec<WeekId>> = HashMap::new();
    for entry in entries.iter().filter(|entry| entry.rank <= threshold) {
        weeks_by_track
            .entry(entry.track.clone())
            .or_default()
            .push(entry.week_id);
    }

    weeks_by_track
        .into_iter()
        .map(|(track, mut weeks)| {
            weeks.sort();
            weeks.dedup();
            (track, longest_run(&weeks))
        })
        .collect()
}

fn longest_run(weeks: &[WeekId]) -> u64 {
    let mut best = u64::from(!weeks.is_empty());
    let mut current = best;
    for pair in weeks.windows(2) {
        if pair[1].week == pair[0].week + 1 {
            current += 1;
            best = best.max(current);
        } else {
            current = 1;
        }
    }
    best
}

/// Points summed per artist across every charted track. Entries with no
/// resolved artist are left out rather than pooled under a placeholder.
pub fn artist_points(entries: &[WeeklyRankEntry]) -> HashMap<String, u64> {
    let mut points = HashMap::new();
    for entry in entries {
        let Some(artist) = &entry.artist else {
            continue;
        };
        *points.entry(artist.clone()).or_insert(0) += u64::from(entry.points);
    }
    points
}

/// Distinct charted tracks per artist.
pub fn artist_chart_hits(entries: &[WeeklyRankEntry]) -> HashMap<String, u64> {
    let mut hits: HashMap<String, HashSet<&str>> = HashMap::new();
    for entry in entries {
        let Some(artist) = &entry.artist else {
            continue;
        };
        hits.entry(artist.clone()).or_default().insert(&entry.track);
    }
    hits.into_iter()
        .map(|(artist, tracks)| (artist, tracks.len() as u64))
        .collect()
}

/// Each track's first-ever chart entry.
pub fn debuts(entries: &[WeeklyRankEntry]) -> Vec<WeeklyRankEntry> {
    let mut first: HashMap<&str, &WeeklyRankEntry> = HashMap::new();
    for entry in entries {
        match first.get(entry.track.as_str()) {
            Some(existing) if existing.week_id <= entry.week_id => {}
            _ => {
                first.insert(&entry.track, entry);
            }
        }
    }

    let mut debuts: Vec<WeeklyRankEntry> = first.into_values().cloned().collect();
    debuts.sort_by(|a, b| a.week_id.cmp(&b.week_id).then_with(|| a.track.cmp(&b.track)));
    debuts
}

/// Numerically lowest rank ever achieved on a debut, with every tied track.
pub fn highest_debut(entries: &[WeeklyRankEntry]) -> Record {
    let debuts = debuts(entries);
    let best = debuts.iter().map(|entry| entry.rank).min();

    let mut holders: Vec<String> = debuts
        .iter()
        .filter(|entry| Some(entry.rank) == best)
        .map(|entry| entry.track.clone())
        .collect();
    holders.sort();
    holders.dedup();

    Record {
        title: String::from("Highest Debut of All Time"),
        holders,
        value: u64::from(best.unwrap_or(0)),
    }
}

fn tied_max(title: String, values: HashMap<String, u64>) -> Record {
    let max = values.values().copied().max();
    let mut holders: Vec<String> = values
        .into_iter()
        .filter(|(_, value)| Some(*value) == max)
        .map(|(name, _)| name)
        .collect();
    holders.sort();

    Record {
        title,
        holders,
        value: max.unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(week_id: WeekId, track: &str, artist: Option<&str>, rank: u32) -> WeeklyRankEntry {
        WeeklyRankEntry {
            week_id,
            track: track.to_string(),
            artist: artist.map(str::to_string),
            minutes: 10.0,
            rank,
            points: crate::chart::points_for(rank),
        }
    }

    #[test]
    fn empty_series_yields_empty_book() {
        assert!(record_book(&[]).is_empty());
    }

    #[test]
    fn four_week_reign_counts_as_streak_of_four() {
        let series: Vec<WeeklyRankEntry> = (1..=4)
            .map(|week| entry(WeekId::new(2024, week), "A", None, 1))
            .collect();

        let streaks = streaks_at_or_above(&series, 1);
        assert_eq!(streaks.get("A"), Some(&4));
    }

    #[test]
    fn gap_in_week_numbers_breaks_a_streak() {
        let series = vec![
            entry(WeekId::new(2024, 1), "A", None, 1),
            entry(WeekId::new(2024, 2), "A", None, 1),
            entry(WeekId::new(2024, 5), "A", None, 1),
            entry(WeekId::new(2024, 6), "A", None, 1),
            entry(WeekId::new(2024, 7), "A", None, 1),
        ];

        let streaks = streaks_at_or_above(&series, 1);
        assert_eq!(streaks.get("A"), Some(&3));
    }

    #[test]
    fn streak_breaks_at_year_boundary() {
        // W52 -> W01 is one calendar week apart, but the raw week-number
        // comparison treats it as a break.
        let series = vec![
            entry(WeekId::new(2024, 51), "A", None, 1),
            entry(WeekId::new(2024, 52), "A", None, 1),
            entry(WeekId::new(2025, 1), "A", None, 1),
        ];

        let streaks = streaks_at_or_above(&series, 1);
        assert_eq!(streaks.get("A"), Some(&2));
    }

    #[test]
    fn streaks_respect_the_rank_threshold() {
        let series = vec![
            entry(WeekId::new(2024, 1), "A", None, 1),
            entry(WeekId::new(2024, 2), "A", None, 4),
            entry(WeekId::new(2024, 3), "A", None, 1),
        ];

        assert_eq!(streaks_at_or_above(&series, 1).get("A"), Some(&1));
        assert_eq!(streaks_at_or_above(&series, 5).get("A"), Some(&3));
    }

    #[test]
    fn threshold_counts_report_all_tied_tracks() {
        let series = vec![
            entry(WeekId::new(2024, 1), "A", None, 1),
            entry(WeekId::new(2024, 2), "B", None, 1),
            entry(WeekId::new(2024, 3), "C", None, 2),
        ];

        let book = record_book(&series);
        let top1 = book
            .iter()
            .find(|record| record.title == "Most Total Weeks in Top 1")
            .expect("record");
        assert_eq!(top1.value, 1);
        assert_eq!(top1.holders, vec![String::from("A"), String::from("B")]);
    }

    #[test]
    fn constructor_champion_lists_tied_artists() {
        let series = vec![
            entry(WeekId::new(2024, 1), "A", Some("X"), 1),
            entry(WeekId::new(2024, 2), "B", Some("Y"), 1),
        ];

        let book = record_book(&series);
        let constructor = book
            .iter()
            .find(|record| record.title == "Constructor's Champion")
            .expect("record");
        assert_eq!(constructor.value, 25);
        assert_eq!(
            constructor.holders,
            vec![String::from("X"), String::from("Y")]
        );
    }

    #[test]
    fn unresolved_artists_are_excluded_from_artist_records() {
        let series = vec![
            entry(WeekId::new(2024, 1), "A", None, 1),
            entry(WeekId::new(2024, 1), "B", Some("X"), 2),
        ];

        let points = artist_points(&series);
        assert_eq!(points.len(), 1);
        assert_eq!(points.get("X"), Some(&18));
    }

    #[test]
    fn chart_hits_count_distinct_tracks() {
        let series = vec![
            entry(WeekId::new(2024, 1), "A", Some("X"), 1),
            entry(WeekId::new(2024, 2), "A", Some("X"), 1),
            entry(WeekId::new(2024, 2), "B", Some("X"), 2),
        ];

        assert_eq!(artist_chart_hits(&series).get("X"), Some(&2));
    }

    #[test]
    fn highest_debut_uses_first_week_per_track() {
        let series = vec![
            entry(WeekId::new(2024, 1), "A", None, 3),
            entry(WeekId::new(2024, 2), "A", None, 1),
            entry(WeekId::new(2024, 2), "B", None, 2),
        ];

        let record = highest_debut(&series);
        // A debuted at 3; its later #1 does not count. B debuted at 2.
        assert_eq!(record.value, 2);
        assert_eq!(record.holders, vec![String::from("B")]);
    }

    #[test]
    fn highest_debut_keeps_all_ties() {
        let series = vec![
            entry(WeekId::new(2024, 1), "A", None, 1),
            entry(WeekId::new(2024, 2), "B", None, 1),
        ];

        let record = highest_debut(&series);
        assert_eq!(record.value, 1);
        assert_eq!(record.holders, vec![String::from("A"), String::from("B")]);
    }
}
