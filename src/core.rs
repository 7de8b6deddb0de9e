use crate::chart::{self, AllTimeScore, WeeklyRankEntry};
use crate::game::{self, GameMode, GameSession, GameState};
use crate::model::{EventTable, FilterQuery, WeekId};
use crate::records::{self, Record};
use crate::summary::{self, DayStreaks, SummaryStats, TopAlbumRow, TopArtistRow, TopTrackRow};
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Session facade over one loaded event table.
///
/// Every derived view is a pure function of the base table and the current
/// filter; the ranked weekly series is the one expensive derivation, so it
/// is memoized and invalidated only when the filter actually changes.
/// Callers invoke one accessor per user action — there is no implicit
/// recompute loop.
#[derive(Debug)]
pub struct RewindCore {
    events: EventTable,
    filter: FilterQuery,
    filtered: Option<EventTable>,
    ranked: Option<Vec<WeeklyRankEntry>>,
    games: GameSession,
    rng: SmallRng,
}

impl RewindCore {
    pub fn from_events(events: EventTable) -> Self {
        Self {
            events,
            filter: FilterQuery::default(),
            filtered: None,
            ranked: None,
            games: GameSession::default(),
            rng: SmallRng::from_os_rng(),
        }
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn filter(&self) -> &FilterQuery {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: FilterQuery) {
        if self.filter == filter {
            return;
        }
        self.filter = filter;
        self.filtered = None;
        self.ranked = None;
    }

    pub fn filtered(&mut self) -> &EventTable {
        self.filtered
            .get_or_insert_with(|| self.events.filter(&self.filter))
    }

    /// The canonical ranked weekly series for the current filter.
    pub fn ranked(&mut self) -> &[WeeklyRankEntry] {
        if self.ranked.is_none() {
            let filtered = self
                .filtered
                .get_or_insert_with(|| self.events.filter(&self.filter));
            self.ranked = Some(chart::rank_series(filtered));
        }
        self.ranked.as_deref().unwrap_or_default()
    }

    pub fn leaderboard(&mut self) -> Vec<AllTimeScore> {
        chart::all_time_leaderboard(self.ranked())
    }

    pub fn record_book(&mut self) -> Vec<Record> {
        records::record_book(self.ranked())
    }

    pub fn track_history(&mut self, track: &str) -> Vec<WeeklyRankEntry> {
        chart::track_history(self.ranked(), track)
    }

    pub fn week_chart(&mut self, week_id: WeekId) -> Vec<WeeklyRankEntry> {
        chart::week_chart(self.ranked(), week_id)
    }

    pub fn weeks(&mut self) -> Vec<WeekId> {
        chart::weeks(self.ranked())
    }

    pub fn charted_tracks(&mut self) -> Vec<String> {
        chart::charted_tracks(self.ranked())
    }

    pub fn summary(&mut self) -> SummaryStats {
        summary::summary_stats(self.filtered())
    }

    pub fn day_streaks(&mut self) -> DayStreaks {
        summary::day_streaks(self.filtered())
    }

    pub fn hour_streak(&mut self) -> u64 {
        summary::longest_hour_streak(self.filtered())
    }

    pub fn top_tracks(&mut self, n: usize) -> Vec<TopTrackRow> {
        summary::top_tracks(self.filtered(), n)
    }

    pub fn top_artists(&mut self, n: usize) -> Vec<TopArtistRow> {
        summary::top_artists(self.filtered(), n)
    }

    pub fn top_albums(&mut self, n: usize) -> Vec<TopAlbumRow> {
        summary::top_albums(self.filtered(), n)
    }

    pub fn game_state(&self, mode: GameMode) -> &GameState {
        self.games.state(mode)
    }

    pub fn game_round(&mut self, mode: GameMode) -> &GameState {
        let pool = game::pool(self.filtered(), mode);
        let state = self.games.state_mut(mode);
        state.next_round(&mut self.rng, &pool);
        self.games.state(mode)
    }

    pub fn game_answer(&mut self, mode: GameMode, pick_first: bool) -> Option<bool> {
        self.games.state_mut(mode).answer(pick_first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ListeningEvent;
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

    fn sample_core() -> RewindCore {
        RewindCore::from_events(EventTable::new(vec![
            event(datetime!(2024-01-01 10:00 UTC), "A", Some("X"), 600_000),
            event(datetime!(2024-01-02 10:00 UTC), "B", Some("Y"), 300_000),
            event(datetime!(2024-01-08 10:00 UTC), "A", Some("X"), 120_000),
        ]))
    }

    #[test]
    fn filter_change_invalidates_the_memoized_series() {
        let mut core = sample_core();
        assert_eq!(core.ranked().len(), 3);

        core.set_filter(FilterQuery {
            end_date: Some(date!(2024 - 01 - 05)),
            ..FilterQuery::default()
        });
        assert_eq!(core.ranked().len(), 2);
        assert!(core.weeks().len() == 1);
    }

    #[test]
    fn setting_an_identical_filter_keeps_the_memo() {
        let mut core = sample_core();
        let _ = core.ranked();
        core.set_filter(FilterQuery::default());
        assert!(core.ranked.is_some());

        core.set_filter(FilterQuery {
            tracks: vec![String::from("A")],
            ..FilterQuery::default()
        });
        assert!(core.ranked.is_none());
    }

    #[test]
    fn recompute_with_same_filter_is_identical() {
        let mut core = sample_core();
        let first = core.ranked().to_vec();
        core.set_filter(FilterQuery {
            tracks: vec![String::from("A")],
            ..FilterQuery::default()
        });
        core.set_filter(FilterQuery::default());
        assert_eq!(core.ranked(), first.as_slice());
    }

    #[test]
    fn views_agree_on_the_same_series() {
        let mut core = sample_core();
        let leaderboard = core.leaderboard();
        let history = core.track_history("A");

        let a = leaderboard
            .iter()
            .find(|score| score.track == "A")
            .expect("A on leaderboard");
        assert_eq!(
            a.total_points,
            history.iter().map(|entry| entry.points).sum::<u32>()
        );
    }

    #[test]
    fn empty_filter_result_yields_empty_views_not_errors() {
        let mut core = sample_core();
        core.set_filter(FilterQuery {
            tracks: vec![String::from("nothing matches this")],
            ..FilterQuery::default()
        });

        assert!(core.ranked().is_empty());
        assert!(core.leaderboard().is_empty());
        assert!(core.record_book().is_empty());
        assert!(core.weeks().is_empty());
        assert_eq!(core.summary(), SummaryStats::default());
    }

    #[test]
    fn game_round_draws_from_the_filtered_pool() {
        let mut core = sample_core();
        let state = core.game_round(GameMode::Tracks);
        let (first, second) = state.current_pair.clone().expect("pair");
        assert_ne!(first.name, second.name);

        // Only one artist pool entry after filtering to artist X.
        core.set_filter(FilterQuery {
            artists: vec![String::from("X")],
            ..FilterQuery::default()
        });
        let state = core.game_round(GameMode::Artists);
        assert_eq!(state.current_pair, None);
    }

    #[test]
    fn game_scores_thread_through_the_session() {
        let mut core = sample_core();
        core.game_round(GameMode::Tracks);
        let outcome = core.game_answer(GameMode::Tracks, true);
        assert!(outcome.is_some());

        let state = core.game_state(GameMode::Tracks);
        assert_eq!(state.correct + state.incorrect, 1);
        assert_eq!(core.game_state(GameMode::Artists).correct, 0);
        assert_eq!(core.game_state(GameMode::Artists).incorrect, 0);
    }
}
