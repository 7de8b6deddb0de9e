use crate::model::{EventTable, WeekId};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

pub const MAX_RANKED: usize = 10;

/// F1-style scoring: ranks past 10 never exist in a weekly chart, so they
/// score nothing.
pub fn points_for(rank: u32) -> u32 {
    match rank {
        1 => 25,
        2 => 18,
        3 => 15,
        4 => 12,
        5 => 10,
        6 => 8,
        7 => 6,
        8 => 4,
        9 => 2,
        10 => 1,
        _ => 0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyRankEntry {
    pub week_id: WeekId,
    pub track: String,
    pub artist: Option<String>,
    pub minutes: f64,
    pub rank: u32,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllTimeScore {
    pub track: String,
    pub total_points: u32,
    pub total_minutes: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekBuckets {
    pub week_id: WeekId,
    /// (track, total minutes) in first-seen event order within the week.
    pub tracks: Vec<(String, f64)>,
}

/// Groups events into (week, track) buckets and sums listening minutes.
/// Weeks come out sorted ascending; tracks within a week keep the order in
/// which they first appeared, which is what the ranking tie-break leans on.
pub fn weekly_minutes(table: &EventTable) -> Vec<WeekBuckets> {
    let mut week_index: HashMap<WeekId, usize> = HashMap::new();
    let mut weeks: Vec<WeekBuckets> = Vec::new();
    let mut track_index: Vec<HashMap<String, usize>> = Vec::new();

    for event in &table.events {
        let week_id = event.week_id();
        let week_slot = *week_index.entry(week_id).or_insert_with(|| {
            weeks.push(WeekBuckets {
                week_id,
                tracks: Vec::new(),
            });
            track_index.push(HashMap::new());
            weeks.len() - 1
        });

        let bucket = &mut weeks[week_slot];
        match track_index[week_slot].get(&event.track) {
            Some(slot) => bucket.tracks[*slot].1 += event.minutes(),
            None => {
                track_index[week_slot].insert(event.track.clone(), bucket.tracks.len());
                bucket.tracks.push((event.track.clone(), event.minutes()));
            }
        }
    }

    weeks.sort_by_key(|bucket| bucket.week_id);
    weeks
}

/// First non-null artist ever seen for each track name. Tracks credited
/// inconsistently across events resolve to the earliest attribution.
pub fn track_artist_map(table: &EventTable) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for event in &table.events {
        if let Some(artist) = &event.artist
            && !map.contains_key(&event.track)
        {
            map.insert(event.track.clone(), artist.clone());
        }
    }
    map
}

/// The canonical ranked weekly series every downstream view consumes.
///
/// Per week: top `MAX_RANKED` tracks by minutes, dense 1-based ranks, points
/// from the fixed table. Equal minutes keep first-seen order (stable sort),
/// so the result is deterministic for a given event order. Weeks with no
/// qualifying tracks simply produce no rows.
pub fn rank_series(table: &EventTable) -> Vec<WeeklyRankEntry> {
    let artists = track_artist_map(table);
    let mut entries = Vec::new();

    for bucket in weekly_minutes(table) {
        let mut ranked = bucket.tracks;
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(MAX_RANKED);

        for (index, (track, minutes)) in ranked.into_iter().enumerate() {
            let rank = index as u32 + 1;
            entries.push(WeeklyRankEntry {
                week_id: bucket.week_id,
                artist: artists.get(&track).cloned(),
                track,
                minutes,
                rank,
                points: points_for(rank),
            });
        }
    }

    entries
}

/// Accumulated points and minutes per track across every ranked week.
/// Recomputed from the full series each time; sorted by points, then
/// minutes, then name for a fully deterministic order.
pub fn all_time_leaderboard(entries: &[WeeklyRankEntry]) -> Vec<AllTimeScore> {
    let mut totals: HashMap<&str, (u32, f64)> = HashMap::new();
    for entry in entries {
        let slot = totals.entry(&entry.track).or_insert((0, 0.0));
        slot.0 += entry.points;
        slot.1 += entry.minutes;
    }

    let mut scores: Vec<AllTimeScore> = totals
        .into_iter()
        .map(|(track, (total_points, total_minutes))| AllTimeScore {
            track: track.to_string(),
            total_points,
            total_minutes,
        })
        .collect();
    scores.sort_by(|a, b| compare_scores(a, b));
    scores
}

fn compare_scores(a: &AllTimeScore, b: &AllTimeScore) -> Ordering {
    b.total_points
        .cmp(&a.total_points)
        .then(b.total_minutes.total_cmp(&a.total_minutes))
        .then_with(|| a.track.cmp(&b.track))
}

/// Every ranked week for one track, ordered by week ascending.
pub fn track_history(entries: &[WeeklyRankEntry], track: &str) -> Vec<WeeklyRankEntry> {
    let mut history: Vec<WeeklyRankEntry> = entries
        .iter()
        .filter(|entry| entry.track == track)
        .cloned()
        .collect();
    history.sort_by_key(|entry| entry.week_id);
    history
}

/// One week's full chart, ordered by rank ascending.
pub fn week_chart(entries: &[WeeklyRankEntry], week_id: WeekId) -> Vec<WeeklyRankEntry> {
    let mut chart: Vec<WeeklyRankEntry> = entries
        .iter()
        .filter(|entry| entry.week_id == week_id)
        .cloned()
        .collect();
    chart.sort_by_key(|entry| entry.rank);
    chart
}

pub fn weeks(entries: &[WeeklyRankEntry]) -> Vec<WeekId> {
    let mut weeks: Vec<WeekId> = entries.iter().map(|entry| entry.week_id).collect();
    weeks.sort();
    weeks.dedup();
    weeks
}

pub fn charted_tracks(entries: &[WeeklyRankEntry]) -> Vec<String> {
    let mut tracks: Vec<String> = entries.iter().map(|entry| entry.track.clone()).collect();
    tracks.sort();
    tracks.dedup();
    tracks
}
