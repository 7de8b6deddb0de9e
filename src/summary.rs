use crate::model::{EventTable, WeekId};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use time::Date;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopTrackRow {
    pub track: String,
    pub artist: Option<String>,
    pub minutes: f64,
    pub plays: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopArtistRow {
    pub artist: String,
    pub minutes: f64,
    pub unique_tracks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopAlbumRow {
    pub album: String,
    pub artist: Option<String>,
    pub minutes: f64,
    pub unique_tracks: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_minutes: f64,
    pub total_hours: f64,
    pub unique_tracks: u64,
    pub unique_albums: u64,
    pub unique_artists: u64,
    pub listening_days: u64,
    pub listening_weeks: u64,
    pub listening_months: u64,
    pub listening_years: u64,
    pub most_played_track: Option<(String, f64)>,
    pub most_played_artist: Option<(String, f64)>,
    pub most_played_album: Option<(String, f64)>,
    pub avg_minutes_per_listening_day: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DayStreaks {
    pub total_days: u64,
    pub days_with_listening: u64,
    pub days_without_listening: u64,
    pub longest_listening_streak: u64,
    pub longest_silent_streak: u64,
    pub avg_minutes_on_listening_days: f64,
    pub avg_minutes_across_all_days: f64,
}

pub fn top_tracks(table: &EventTable, n: usize) -> Vec<TopTrackRow> {
    let artists = crate::chart::track_artist_map(table);
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, (f64, u64)> = HashMap::new();

    for event in &table.events {
        let slot = totals.entry(event.track.clone()).or_insert_with(|| {
            order.push(event.track.clone());
            (0.0, 0)
        });
        slot.0 += event.minutes();
        slot.1 += 1;
    }

    let mut rows: Vec<TopTrackRow> = order
        .into_iter()
        .map(|track| {
            let (minutes, plays) = totals[&track];
            TopTrackRow {
                artist: artists.get(&track).cloned(),
                track,
                minutes,
                plays,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.minutes.total_cmp(&a.minutes));
    rows.truncate(n);
    rows
}

pub fn top_artists(table: &EventTable, n: usize) -> Vec<TopArtistRow> {
    let mut order: Vec<String> = Vec::new();
    let mut minutes: HashMap<String, f64> = HashMap::new();
    let mut tracks: HashMap<String, HashSet<&str>> = HashMap::new();

    for event in &table.events {
        let Some(artist) = &event.artist else {
            continue;
        };
        let slot = minutes.entry(artist.clone()).or_insert_with(|| {
            order.push(artist.clone());
            0.0
        });
        *slot += event.minutes();
        tracks.entry(artist.clone()).or_default().insert(&event.track);
    }

    let mut rows: Vec<TopArtistRow> = order
        .into_iter()
        .map(|artist| TopArtistRow {
            minutes: minutes[&artist],
            unique_tracks: tracks[&artist].len() as u64,
            artist,
        })
        .collect();
    rows.sort_by(|a, b| b.minutes.total_cmp(&a.minutes));
    rows.truncate(n);
    rows
}

pub fn top_albums(table: &EventTable, n: usize) -> Vec<TopAlbumRow> {
    let mut order: Vec<String> = Vec::new();
    let mut minutes: HashMap<String, f64> = HashMap::new();
    let mut artists: HashMap<String, String> = HashMap::new();
    let mut tracks: HashMap<String, HashSet<&str>> = HashMap::new();

    for event in &table.events {
        let Some(album) = &event.album else {
            continue;
        };
        let slot = minutes.entry(album.clone()).or_insert_with(|| {
            order.push(album.clone());
            0.0
        });
        *slot += event.minutes();
        tracks.entry(album.clone()).or_default().insert(&event.track);
        if let Some(artist) = &event.artist
            && !artists.contains_key(album)
        {
            artists.insert(album.clone(), artist.clone());
        }
    }

    let mut rows: Vec<TopAlbumRow> = order
        .into_iter()
        .map(|album| TopAlbumRow {
            minutes: minutes[&album],
            unique_tracks: tracks[&album].len() as u64,
            artist: artists.get(&album).cloned(),
            album,
        })
        .collect();
    rows.sort_by(|a, b| b.minutes.total_cmp(&a.minutes));
    rows.truncate(n);
    rows
}

pub fn summary_stats(table: &EventTable) -> SummaryStats {
    if table.is_empty() {
        return SummaryStats::default();
    }

    let mut days: HashSet<Date> = HashSet::new();
    let mut weeks: HashSet<WeekId> = HashSet::new();
    let mut months: HashSet<(i32, u8)> = HashSet::new();
    let mut years: HashSet<i32> = HashSet::new();
    let mut albums: HashSet<&str> = HashSet::new();
    let mut daily_minutes: HashMap<Date, f64> = HashMap::new();
    let mut total_minutes = 0.0;

    for event in &table.events {
        let date = event.utc_date();
        days.insert(date);
        weeks.insert(event.week_id());
        months.insert((date.year(), u8::from(date.month())));
        years.insert(date.year());
        if let Some(album) = event.album.as_deref() {
            albums.insert(album);
        }
        *daily_minutes.entry(date).or_insert(0.0) += event.minutes();
        total_minutes += event.minutes();
    }

    let track_rows = top_tracks(table, usize::MAX);
    let artist_rows = top_artists(table, usize::MAX);
    let album_rows = top_albums(table, usize::MAX);

    SummaryStats {
        total_minutes,
        total_hours: total_minutes / 60.0,
        unique_tracks: track_rows.len() as u64,
        unique_albums: albums.len() as u64,
        unique_artists: artist_rows.len() as u64,
        listening_days: days.len() as u64,
        listening_weeks: weeks.len() as u64,
        listening_months: months.len() as u64,
        listening_years: years.len() as u64,
        most_played_track: track_rows
            .first()
            .map(|row| (row.track.clone(), row.minutes)),
        most_played_artist: artist_rows
            .first()
            .map(|row| (row.artist.clone(), row.minutes)),
        most_played_album: album_rows
            .first()
            .map(|row| (row.album.clone(), row.minutes)),
        avg_minutes_per_listening_day: total_minutes / days.len() as f64,
    }
}

/// Day-level streaks over the full date range of the table, with silent
/// days zero-filled between the first and last listening day.
pub fn day_streaks(table: &EventTable) -> DayStreaks {
    let mut daily_minutes: HashMap<i32, f64> = HashMap::new();
    for event in &table.events {
        *daily_minutes
            .entry(event.utc_date().to_julian_day())
            .or_insert(0.0) += event.minutes();
    }

    let Some(first) = daily_minutes.keys().copied().min() else {
        return DayStreaks::default();
    };
    let last = daily_minutes.keys().copied().max().unwrap_or(first);

    let mut streaks = DayStreaks::default();
    let mut total_minutes = 0.0;
    let mut listening_run = 0;
    let mut silent_run = 0;

    for day in first..=last {
        streaks.total_days += 1;
        let minutes = daily_minutes.get(&day).copied().unwrap_or(0.0);
        total_minutes += minutes;

        if minutes > 0.0 {
            streaks.days_with_listening += 1;
            listening_run += 1;
            silent_run = 0;
        } else {
            streaks.days_without_listening += 1;
            silent_run += 1;
            listening_run = 0;
        }
        streaks.longest_listening_streak = streaks.longest_listening_streak.max(listening_run);
        streaks.longest_silent_streak = streaks.longest_silent_streak.max(silent_run);
    }

    if streaks.days_with_listening > 0 {
        streaks.avg_minutes_on_listening_days = total_minutes / streaks.days_with_listening as f64;
    }
    streaks.avg_minutes_across_all_days = total_minutes / streaks.total_days as f64;
    streaks
}

/// Event counts per hour of day, UTC.
pub fn hour_histogram(table: &EventTable) -> [u64; 24] {
    let mut bins = [0; 24];
    for event in &table.events {
        bins[usize::from(event.utc_hour())] += 1;
    }
    bins
}

/// Event counts per weekday, Monday first.
pub fn weekday_histogram(table: &EventTable) -> [u64; 7] {
    let mut bins = [0; 7];
    for event in &table.events {
        bins[usize::from(event.utc_date().weekday().number_days_from_monday())] += 1;
    }
    bins
}

/// Summed minutes per (weekday, hour) cell, Monday first. The consumer
/// renders this as the activity heatmap.
pub fn weekday_hour_heatmap(table: &EventTable) -> [[f64; 24]; 7] {
    let mut cells = [[0.0; 24]; 7];
    for event in &table.events {
        let weekday = usize::from(event.utc_date().weekday().number_days_from_monday());
        let hour = usize::from(event.utc_hour());
        cells[weekday][hour] += event.minutes();
    }
    cells
}

/// Summed minutes per calendar month, ascending `(year, month)` keys.
pub fn monthly_minutes(table: &EventTable) -> Vec<((i32, u8), f64)> {
    let mut totals: HashMap<(i32, u8), f64> = HashMap::new();
    for event in &table.events {
        let date = event.utc_date();
        *totals
            .entry((date.year(), u8::from(date.month())))
            .or_insert(0.0) += event.minutes();
    }

    let mut series: Vec<((i32, u8), f64)> = totals.into_iter().collect();
    series.sort_by_key(|(month, _)| *month);
    series
}

/// Summed minutes per ISO week, ascending. Only weeks with events appear;
/// the consumer decides whether to zero-fill gaps when plotting.
pub fn weekly_minutes_series(table: &EventTable) -> Vec<(WeekId, f64)> {
    let mut totals: HashMap<WeekId, f64> = HashMap::new();
    for event in &table.events {
        *totals.entry(event.week_id()).or_insert(0.0) += event.minutes();
    }

    let mut series: Vec<(WeekId, f64)> = totals.into_iter().collect();
    series.sort_by_key(|(week, _)| *week);
    series
}

/// Event counts per calendar month, January first.
pub fn month_histogram(table: &EventTable) -> [u64; 12] {
    let mut bins = [0; 12];
    for event in &table.events {
        bins[usize::from(u8::from(event.utc_date().month())) - 1] += 1;
    }
    bins
}

/// Event counts per calendar year, ascending.
pub fn year_histogram(table: &EventTable) -> Vec<(i32, u64)> {
    let mut counts: HashMap<i32, u64> = HashMap::new();
    for event in &table.events {
        *counts.entry(event.utc_date().year()).or_insert(0) += 1;
    }

    let mut bins: Vec<(i32, u64)> = counts.into_iter().collect();
    bins.sort_by_key(|(year, _)| *year);
    bins
}

/// Summed minutes per (month, day-of-month) cell, years collapsed. The
/// consumer renders this as the calendar heatmap.
pub fn month_day_heatmap(table: &EventTable) -> [[f64; 31]; 12] {
    let mut cells = [[0.0; 31]; 12];
    for event in &table.events {
        let date = event.utc_date();
        let month = usize::from(u8::from(date.month())) - 1;
        let day = usize::from(date.day()) - 1;
        cells[month][day] += event.minutes();
    }
    cells
}

/// Longest run of consecutive clock hours with any listening, with silent
/// hours zero-filled between the first and last active hour.
pub fn longest_hour_streak(table: &EventTable) -> u64 {
    let mut hourly: HashMap<i64, f64> = HashMap::new();
    for event in &table.events {
        let hour =
            i64::from(event.utc_date().to_julian_day()) * 24 + i64::from(event.utc_hour());
        *hourly.entry(hour).or_insert(0.0) += event.minutes();
    }

    let Some(first) = hourly.keys().copied().min() else {
        return 0;
    };
    let last = hourly.keys().copied().max().unwrap_or(first);

    let mut best = 0;
    let mut run = 0;
    for hour in first..=last {
        if hourly.get(&hour).copied().unwrap_or(0.0) > 0.0 {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}
