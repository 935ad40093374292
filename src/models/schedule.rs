use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::validation::non_empty;
use crate::utils::error::{AppResult, ValidationErrors};

/// Veckodag för en lektion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Weekday {
    #[default]
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }

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

    pub fn to_chrono(self) -> chrono::Weekday {
        match self {
            Self::Monday => chrono::Weekday::Mon,
            Self::Tuesday => chrono::Weekday::Tue,
            Self::Wednesday => chrono::Weekday::Wed,
            Self::Thursday => chrono::Weekday::Thu,
            Self::Friday => chrono::Weekday::Fri,
            Self::Saturday => chrono::Weekday::Sat,
            Self::Sunday => chrono::Weekday::Sun,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = String;

    /// Accepterar fullt namn eller de tre första bokstäverna, oavsett skiftläge
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let prefix: String = lower.chars().take(3).collect();
        let day = Self::all().iter().copied().find(|d| {
            let name = d.as_str().to_lowercase();
            name == lower || (lower.len() == 3 && name.starts_with(&prefix))
        });
        day.ok_or_else(|| format!("Okänd veckodag: {}", s))
    }
}

impl ToSql for Weekday {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Weekday {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        s.parse().map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

/// Lektionstid i veckoschemat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Option<i64>,
    pub subject: String,
    pub day: Weekday,
    /// Fritext, t.ex. "10:20 AM"
    pub start_time: String,
    pub end_time: String,
}

impl Schedule {
    pub fn new(subject: String, day: Weekday, start_time: String, end_time: String) -> Self {
        Self {
            id: None,
            subject,
            day,
            start_time,
            end_time,
        }
    }
}

/// Schemat uppdelat per veckodag, alltid sju sektioner måndag-söndag
pub fn group_by_day(schedules: &[Schedule]) -> Vec<(Weekday, Vec<Schedule>)> {
    Weekday::all()
        .iter()
        .map(|day| {
            let entries = schedules
                .iter()
                .filter(|s| s.day == *day)
                .cloned()
                .collect();
            (*day, entries)
        })
        .collect()
}

/// Formulärdata för en ny lektionstid
#[derive(Debug, Clone, Default)]
pub struct ScheduleForm {
    pub subject: String,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

impl ScheduleForm {
    pub fn to_schedule(&self) -> AppResult<Schedule> {
        let mut errors = ValidationErrors::new();

        let subject = non_empty(&self.subject);
        if subject.is_none() {
            errors.add("subject", "Subject is required");
        }

        let day = self.day.parse::<Weekday>().ok();
        if day.is_none() {
            errors.add("day", "Day must be a weekday name");
        }

        let start_time = non_empty(&self.start_time);
        if start_time.is_none() {
            errors.add("start_time", "Start time is required");
        }
        let end_time = non_empty(&self.end_time);
        if end_time.is_none() {
            errors.add("end_time", "End time is required");
        }

        errors.into_result()?;

        Ok(Schedule::new(
            subject.unwrap_or_default(),
            day.unwrap_or_default(),
            start_time.unwrap_or_default(),
            end_time.unwrap_or_default(),
        ))
    }
}
