use crate::model::EventTable;
use crate::summary;
use rand::Rng;
use rand::seq::index::sample;

const ARTIST_POOL_SIZE: usize = 100;
const TRACK_POOL_SIZE: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    Artists,
    Tracks,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameItem {
    pub name: String,
    pub minutes: f64,
}

/// One mode's running score and current question. State is threaded
/// explicitly by the caller; there are no ambient globals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameState {
    pub correct: u32,
    pub incorrect: u32,
    pub current_pair: Option<(GameItem, GameItem)>,
    pub answered: bool,
}

impl GameState {
    /// Draws a new distinct pair from the pool. Pools with fewer than two
    /// items leave the state pairless; the caller renders "not enough data".
    pub fn next_round<R: Rng>(&mut self, rng: &mut R, pool: &[GameItem]) {
        if pool.len() < 2 {
            self.current_pair = None;
            self.answered = false;
            return;
        }

        let picks = sample(rng, pool.len(), 2);
        self.current_pair = Some((pool[picks.index(0)].clone(), pool[picks.index(1)].clone()));
        self.answered = false;
    }

    /// Scores the player's pick against the current pair, once per round.
    /// Equal minutes make the first item the correct answer.
    pub fn answer(&mut self, pick_first: bool) -> Option<bool> {
        if self.answered {
            return None;
        }
        let (first, second) = self.current_pair.as_ref()?;

        let first_wins = first.minutes >= second.minutes;
        let correct = pick_first == first_wins;
        if correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
        self.answered = true;
        Some(correct)
    }
}

/// Per-mode game state keyed by the typed mode enum.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameSession {
    artists: GameState,
    tracks: GameState,
}

impl GameSession {
    pub fn state(&self, mode: GameMode) -> &GameState {
        match mode {
            GameMode::Artists => &self.artists,
            GameMode::Tracks => &self.tracks,
        }
    }

    pub fn state_mut(&mut self, mode: GameMode) -> &mut GameState {
        match mode {
            GameMode::Artists => &mut self.artists,
            GameMode::Tracks => &mut self.tracks,
        }
    }
}

/// Candidate pool for one mode: the most-listened entities, so questions
/// stay answerable from memory.
pub fn pool(table: &EventTable, mode: GameMode) -> Vec<GameItem> {
    match mode {
        GameMode::Artists => summary::top_artists(table, ARTIST_POOL_SIZE)
            .into_iter()
            .map(|row| GameItem {
                name: row.artist,
                minutes: row.minutes,
            })
            .collect(),
        GameMode::Tracks => summary::top_tracks(table, TRACK_POOL_SIZE)
            .into_iter()
            .map(|row| GameItem {
                name: row.track,
                minutes: row.minutes,
            })
            .collect(),
    }
}
