use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use time::{Date, OffsetDateTime, UtcOffset};

pub const MS_PER_MINUTE: f64 = 60_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ListeningEvent {
    pub ts: OffsetDateTime,
    pub track: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub ms_played: u64,
}

impl ListeningEvent {
    pub fn minutes(&self) -> f64 {
        self.ms_played as f64 / MS_PER_MINUTE
    }

    pub fn utc_date(&self) -> Date {
        self.ts.to_offset(UtcOffset::UTC).date()
    }

    pub fn utc_hour(&self) -> u8 {
        self.ts.to_offset(UtcOffset::UTC).hour()
    }

    pub fn week_id(&self) -> WeekId {
        WeekId::from_date(self.utc_date())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventTable {
    pub events: Vec<ListeningEvent>,
}

impl EventTable {
    pub fn new(events: Vec<ListeningEvent>) -> Self {
        Self { events }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn filter(&self, query: &FilterQuery) -> EventTable {
        let events = self
            .events
            .iter()
            .filter(|event| query.matches(event))
            .cloned()
            .collect();
        EventTable { events }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterQuery {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub artists: Vec<String>,
    pub albums: Vec<String>,
    pub tracks: Vec<String>,
}

impl FilterQuery {
    fn matches(&self, event: &ListeningEvent) -> bool {
        let date = event.utc_date();
        if matches!(self.start_date, Some(start) if date < start) {
            return false;
        }
        if matches!(self.end_date, Some(end) if date > end) {
            return false;
        }

        if !self.artists.is_empty() {
            let Some(artist) = event.artist.as_deref() else {
                return false;
            };
            if !self.artists.iter().any(|wanted| wanted == artist) {
                return false;
            }
        }

        if !self.albums.is_empty() {
            let Some(album) = event.album.as_deref() else {
                return false;
            };
            if !self.albums.iter().any(|wanted| wanted == album) {
                return false;
            }
        }

        if !self.tracks.is_empty() && !self.tracks.iter().any(|wanted| wanted == &event.track) {
            return false;
        }

        true
    }
}

/// ISO-8601 week key: Monday-start weeks, week 1 holds the year's first
/// Thursday. The year is the ISO year, which can differ from the calendar
/// year around January 1st.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekId {
    pub year: i32,
    pub week: u8,
}

impl Serialize for WeekId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WeekId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        WeekId::parse(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid week id {value}")))
    }
}

impl WeekId {
    pub fn new(year: i32, week: u8) -> Self {
        Self { year, week }
    }

    pub fn from_date(date: Date) -> Self {
        let (year, week, _) = date.to_iso_week_date();
        Self { year, week }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let (year, week) = input.split_once("-W")?;
        let year = year.parse().ok()?;
        let week: u8 = week.parse().ok()?;
        (1..=53).contains(&week).then_some(Self { year, week })
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}
