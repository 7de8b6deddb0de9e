#![no_main]

use libfuzzer_sys::fuzz_target;
use rewind::chart::{self, MAX_RANKED};
use rewind::model::{EventTable, ListeningEvent};
use time::{Duration, OffsetDateTime};

fuzz_target!(|data: &[u8]| {
    let base = OffsetDateTime::UNIX_EPOCH;
    let events: Vec<ListeningEvent> = data
        .chunks_exact(4)
        .map(|chunk| ListeningEvent {
            ts: base + Duration::days(i64::from(chunk[0])) + Duration::hours(i64::from(chunk[1] % 24)),
            track: format!("track_{}", chunk[2] % 32),
            artist: (chunk[2] % 3 != 0).then(|| format!("artist_{}", chunk[2] % 7)),
            album: None,
            ms_played: u64::from(chunk[3]) * 10_000,
        })
        .collect();

    let table = EventTable::new(events);
    let series = chart::rank_series(&table);
    assert_eq!(series, chart::rank_series(&table));

    for week in chart::weeks(&series) {
        let week_chart = chart::week_chart(&series, week);
        assert!(week_chart.len() <= MAX_RANKED);
        for (index, entry) in week_chart.iter().enumerate() {
            assert_eq!(entry.rank, index as u32 + 1);
            assert_eq!(entry.points, chart::points_for(entry.rank));
        }
        for pair in week_chart.windows(2) {
            assert!(pair[0].points > pair[1].points);
            assert!(pair[0].minutes >= pair[1].minutes);
        }
    }

    let leaderboard = chart::all_time_leaderboard(&series);
    for pair in leaderboard.windows(2) {
        assert!(pair[0].total_points >= pair[1].total_points);
    }
});
