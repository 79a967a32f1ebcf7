use crate::error::ReportError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use tabled::Tabled;

#[derive(Debug, Deserialize)]
pub struct RawConnectionRow {
    #[serde(rename = "Connected On")]
    pub connected_on: Option<String>,
    #[serde(rename = "Company")]
    pub company: Option<String>,
    #[serde(rename = "Position")]
    pub position: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawInvitationRow {
    #[serde(rename = "Sent At")]
    pub sent_at: Option<String>,
    #[serde(rename = "Direction")]
    pub direction: Option<String>,
}

/// One accepted connection. `connected_on` is `None` when the export carried
/// a blank or unparseable date; such records never pass a date filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRecord {
    pub connected_on: Option<NaiveDate>,
    pub company: String,
    pub position: String,
}

impl ConnectionRecord {
    pub fn new(connected_on: NaiveDate, company: &str, position: &str) -> Self {
        Self {
            connected_on: Some(connected_on),
            company: company.to_string(),
            position: position.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Incoming,
    Outgoing,
}

impl FromStr for Direction {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCOMING" => Ok(Direction::Incoming),
            "OUTGOING" => Ok(Direction::Outgoing),
            _ => Err(ReportError::UnrecognizedDirection(s.to_string())),
        }
    }
}

/// One invitation event. A `None` direction marks a value outside
/// INCOMING/OUTGOING that only the direction count has to skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationRecord {
    pub sent_at: Option<NaiveDate>,
    pub direction: Option<Direction>,
}

impl InvitationRecord {
    pub fn new(sent_at: NaiveDate, direction: Direction) -> Self {
        Self {
            sent_at: Some(sent_at),
            direction: Some(direction),
        }
    }
}

/// Inclusive date range. `start > end` is accepted and simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Smallest range covering every present date, or `None` if there are none.
    pub fn spanning<I>(dates: I) -> Option<Self>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        dates.into_iter().fold(None, |acc, d| match acc {
            None => Some(Self::new(d, d)),
            Some(r) => Some(Self::new(r.start.min(d), r.end.max(d))),
        })
    }

    pub fn is_well_formed(&self) -> bool {
        self.start <= self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DirectionCounts {
    pub incoming: usize,
    pub outgoing: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    /// Calendar index, 1 = January.
    pub month: u32,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkippedCounts {
    pub undated_connections: usize,
    pub undated_invitations: usize,
    pub unrecognized_directions: usize,
}

impl SkippedCounts {
    pub fn total(&self) -> usize {
        self.undated_connections + self.undated_invitations + self.unrecognized_directions
    }
}

/// Everything the dashboard shows for one date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub range: DateRange,
    pub connection_count: usize,
    pub distinct_companies: usize,
    pub invitations: DirectionCounts,
    pub monthly: Vec<MonthCount>,
    pub top_companies: Vec<RankedEntry>,
    pub position_words: BTreeMap<String, usize>,
    pub skipped: SkippedCounts,
}

impl Report {
    /// All-zero report for `range`.
    pub fn empty(range: DateRange) -> Self {
        Self {
            range,
            connection_count: 0,
            distinct_companies: 0,
            invitations: DirectionCounts::default(),
            monthly: Vec::new(),
            top_companies: Vec::new(),
            position_words: BTreeMap::new(),
            skipped: SkippedCounts::default(),
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MonthlyRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "TotalConnections")]
    #[tabled(rename = "TotalConnections")]
    pub total_connections: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CompanyRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Company")]
    #[tabled(rename = "Company")]
    pub company: String,
    #[serde(rename = "TotalConnections")]
    #[tabled(rename = "TotalConnections")]
    pub total_connections: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct WordRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Word")]
    #[tabled(rename = "Word")]
    pub word: String,
    #[serde(rename = "Frequency")]
    #[tabled(rename = "Frequency")]
    pub frequency: String,
}
