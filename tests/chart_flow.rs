use rewind::core::RewindCore;
use rewind::game::GameMode;
use rewind::import;
use rewind::model::{EventTable, FilterQuery, ListeningEvent, WeekId};
use std::fs;
use tempfile::tempdir;
use time::OffsetDateTime;
use time::macros::{date, datetime};

fn event(ts: OffsetDateTime, track: &str, artist: Option<&str>, ms: u64) -> ListeningEvent {
    ListeningEvent {
        ts,
        track: track.to_string(),
        artist: artist.map(str::to_string),
        album: None,
        ms_played: ms,
    }
}

fn reign_table() -> EventTable {
    // "Anthem" holds rank 1 for 2024-W01 through 2024-W04, then vanishes.
    // "Filler" pads each week at rank 2 and takes over afterwards.
    let mut events = Vec::new();
    for week in 0..4 {
        let monday = datetime!(2024-01-01 09:00 UTC) + time::Duration::weeks(week);
        events.push(event(monday, "Anthem", Some("Crown"), 1_200_000));
        events.push(event(monday, "Filler", Some("Crown"), 600_000));
    }
    events.push(event(
        datetime!(2024-01-29 09:00 UTC),
        "Filler",
        Some("Crown"),
        600_000,
    ));
    EventTable::new(events)
}

#[test]
fn ranked_series_flows_into_every_view() {
    let mut core = RewindCore::from_events(reign_table());

    let weeks = core.weeks();
    assert_eq!(weeks.len(), 5);
    assert_eq!(weeks[0], WeekId::new(2024, 1));

    let w1 = core.week_chart(WeekId::new(2024, 1));
    assert_eq!(w1.len(), 2);
    assert_eq!(w1[0].track, "Anthem");
    assert_eq!(w1[0].points, 25);
    assert_eq!(w1[1].track, "Filler");
    assert_eq!(w1[1].points, 18);

    // Anthem: 4 wins. Filler: 4 second places plus one solo win.
    let leaderboard = core.leaderboard();
    assert_eq!(leaderboard[0].track, "Anthem");
    assert_eq!(leaderboard[0].total_points, 100);
    assert_eq!(leaderboard[1].track, "Filler");
    assert_eq!(leaderboard[1].total_points, 4 * 18 + 25);

    let history = core.track_history("Anthem");
    assert_eq!(history.len(), 4);
    assert!(history.iter().all(|entry| entry.rank == 1));
}

#[test]
fn record_book_reports_the_four_week_reign() {
    let mut core = RewindCore::from_events(reign_table());
    let book = core.record_book();

    let streak = book
        .iter()
        .find(|record| record.title == "Most Consecutive Weeks in Top 1")
        .expect("streak record");
    assert_eq!(streak.value, 4);
    assert_eq!(streak.holders, vec![String::from("Anthem")]);

    let constructor = book
        .iter()
        .find(|record| record.title == "Constructor's Champion")
        .expect("constructor record");
    assert_eq!(constructor.holders, vec![String::from("Crown")]);
    assert_eq!(constructor.value, 100 + 4 * 18 + 25);

    let debut = book
        .iter()
        .find(|record| record.title == "Highest Debut of All Time")
        .expect("debut record");
    assert_eq!(debut.value, 1);
    assert_eq!(debut.holders, vec![String::from("Anthem")]);
}

#[test]
fn date_filter_narrows_the_series_and_restores_cleanly() {
    let mut core = RewindCore::from_events(reign_table());
    let full = core.ranked().to_vec();

    core.set_filter(FilterQuery {
        start_date: Some(date!(2024 - 01 - 29)),
        ..FilterQuery::default()
    });
    let tail = core.ranked().to_vec();
    assert_eq!(tail.len(), 1);
    assert_eq!(tail[0].track, "Filler");
    assert_eq!(tail[0].rank, 1);

    core.set_filter(FilterQuery::default());
    assert_eq!(core.ranked(), full.as_slice());
}

#[test]
fn import_feeds_the_engine_end_to_end() {
    let dir = tempdir().expect("tempdir");
    fs::write(
        dir.path().join("endsong_0.json"),
        r#"[
            {"ts": "2024-01-01T10:00:00Z", "ms_played": 600000,
             "master_metadata_track_name": "Anthem",
             "master_metadata_album_artist_name": "Crown",
             "master_metadata_album_album_name": "Debut"},
            {"ts": "2024-01-02T10:00:00Z", "ms_played": 300000,
             "master_metadata_track_name": "Filler",
             "master_metadata_album_artist_name": "Crown",
             "master_metadata_album_album_name": "Debut"},
            {"ts": "garbage", "ms_played": 300000,
             "master_metadata_track_name": "Dropped"}
        ]"#,
    )
    .expect("write");

    let table = import::load_export_dir(dir.path()).expect("load");
    assert_eq!(table.len(), 2);

    let mut core = RewindCore::from_events(table);
    let chart = core.week_chart(WeekId::new(2024, 1));
    assert_eq!(chart.len(), 2);
    assert_eq!(chart[0].track, "Anthem");
    assert_eq!(chart[0].artist.as_deref(), Some("Crown"));

    let albums = core.top_albums(5);
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0].album, "Debut");
    assert_eq!(albums[0].unique_tracks, 2);

    let state = core.game_round(GameMode::Tracks);
    assert!(state.current_pair.is_some());
}
