use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Day of the week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl Weekday {
    /// Returns all weekdays, Monday first.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
            Self::Sunday,
        ]
    }

    /// Returns the transport name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }

    /// Parses a transport name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|weekday| weekday.as_str() == value)
    }
}

impl Display for Weekday {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Working hours for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    /// Start time as `HH:MM`.
    pub start: String,
    /// End time as `HH:MM`.
    pub end: String,
    /// Whether the collaborator works that day.
    pub is_working: bool,
}

impl DaySchedule {
    /// Creates a day entry.
    #[must_use]
    pub fn new(start: impl Into<String>, end: impl Into<String>, is_working: bool) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            is_working,
        }
    }

    /// Returns the worked minutes, zero for rest days or malformed times.
    #[must_use]
    pub fn worked_minutes(&self) -> u32 {
        if !self.is_working {
            return 0;
        }

        match (parse_time_of_day(&self.start), parse_time_of_day(&self.end)) {
            (Some(start), Some(end)) if end > start => u32::from(end - start),
            _ => 0,
        }
    }
}

/// Weekly working-hours configuration keyed by weekday.
///
/// Loaded schedules are kept as received and may omit days; the default
/// schedule always covers the full week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkSchedule {
    days: BTreeMap<Weekday, DaySchedule>,
}

impl WorkSchedule {
    /// Builds a schedule from explicit day entries.
    #[must_use]
    pub fn from_days(days: impl IntoIterator<Item = (Weekday, DaySchedule)>) -> Self {
        Self {
            days: days.into_iter().collect(),
        }
    }

    /// Returns the entry for a weekday, if present.
    #[must_use]
    pub fn day(&self, weekday: Weekday) -> Option<&DaySchedule> {
        self.days.get(&weekday)
    }

    /// Replaces the entry for a weekday.
    pub fn set_day(&mut self, weekday: Weekday, entry: DaySchedule) {
        self.days.insert(weekday, entry);
    }

    /// Returns true when all seven weekdays are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        Weekday::all()
            .iter()
            .all(|weekday| self.days.contains_key(weekday))
    }

    /// Returns the weekdays marked as working, Monday first.
    #[must_use]
    pub fn working_days(&self) -> Vec<Weekday> {
        self.days
            .iter()
            .filter_map(|(weekday, entry)| entry.is_working.then_some(*weekday))
            .collect()
    }

    /// Returns the total worked minutes across the week.
    #[must_use]
    pub fn weekly_minutes(&self) -> u32 {
        self.days.values().map(DaySchedule::worked_minutes).sum()
    }

    /// Iterates present entries, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &DaySchedule)> {
        self.days.iter().map(|(weekday, entry)| (*weekday, entry))
    }
}

impl Default for WorkSchedule {
    /// Monday to Friday 09:00-17:00; the weekend is off, with Saturday keeping
    /// 09:00-13:00 hours on record.
    fn default() -> Self {
        Self::from_days([
            (Weekday::Monday, DaySchedule::new("09:00", "17:00", true)),
            (Weekday::Tuesday, DaySchedule::new("09:00", "17:00", true)),
            (Weekday::Wednesday, DaySchedule::new("09:00", "17:00", true)),
            (Weekday::Thursday, DaySchedule::new("09:00", "17:00", true)),
            (Weekday::Friday, DaySchedule::new("09:00", "17:00", true)),
            (Weekday::Saturday, DaySchedule::new("09:00", "13:00", false)),
            (Weekday::Sunday, DaySchedule::new("09:00", "17:00", false)),
        ])
    }
}

/// Parses an `HH:MM` time of day into minutes after midnight.
#[must_use]
pub fn parse_time_of_day(value: &str) -> Option<u16> {
    let (hours, minutes) = value.split_once(':')?;
    if hours.len() != 2
        || minutes.len() != 2
        || !hours.bytes().chain(minutes.bytes()).all(|byte| byte.is_ascii_digit())
    {
        return None;
    }

    let hours: u16 = hours.parse().ok()?;
    let minutes: u16 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    Some(hours * 60 + minutes)
}
