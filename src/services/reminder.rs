//! Veckovisa lektionspåminnelser från schemat
//!
//! Själva leveransen är plattformsspecifik och ligger bakom
//! [`ReminderScheduler`]. Här beräknas bara när och vad.

use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tracing::{info, warn};

use crate::models::{Schedule, Weekday};
use crate::utils::date::parse_class_time;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RepeatFrequency {
    Weekly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    /// "schedule-<id>", så att en ny schemaläggning ersätter den gamla
    pub id: String,
    pub title: String,
    pub body: String,
    pub fire_at: NaiveDateTime,
    pub repeat: RepeatFrequency,
}

pub trait ReminderScheduler {
    /// Schemalägg eller ersätt påminnelsen med samma id
    fn schedule(&self, reminder: &Reminder) -> Result<()>;

    fn cancel(&self, id: &str) -> Result<()>;
}

/// Skriver bara till loggen
#[derive(Debug, Default)]
pub struct LoggingScheduler;

impl ReminderScheduler for LoggingScheduler {
    fn schedule(&self, reminder: &Reminder) -> Result<()> {
        info!(
            "Påminnelse {} \"{}\" {}",
            reminder.id, reminder.title, reminder.fire_at
        );
        Ok(())
    }

    fn cancel(&self, id: &str) -> Result<()> {
        info!("Avbröt påminnelse {}", id);
        Ok(())
    }
}

/// Nästa tillfälle för veckodag och tid, räknat från `now`.
/// Samma vecka om tiden inte passerat, annars en vecka senare.
pub fn next_occurrence(day: Weekday, time: NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.weekday().num_days_from_monday() as i64;
    let target = day.to_chrono().num_days_from_monday() as i64;
    let days_ahead = (target - today).rem_euclid(7);

    let candidate = (now.date() + Duration::days(days_ahead)).and_time(time);
    if candidate < now {
        candidate + Duration::weeks(1)
    } else {
        candidate
    }
}

pub fn reminder_id(schedule_id: i64) -> String {
    format!("schedule-{}", schedule_id)
}

/// Påminnelse för en lektionstid, `lead_minutes` före start.
/// None om schemat saknar ID eller starttiden inte går att tolka.
pub fn build_reminder(schedule: &Schedule, now: NaiveDateTime, lead_minutes: u32) -> Option<Reminder> {
    let id = schedule.id?;
    let start = parse_class_time(&schedule.start_time)?;

    let lead = Duration::minutes(lead_minutes as i64);
    let mut fire_at = next_occurrence(schedule.day, start, now) - lead;
    if fire_at < now {
        fire_at = fire_at + Duration::weeks(1);
    }

    Some(Reminder {
        id: reminder_id(id),
        title: format!("Class: {}", schedule.subject),
        body: format!(
            "Starts at {} - Ends at {}",
            schedule.start_time, schedule.end_time
        ),
        fire_at,
        repeat: RepeatFrequency::Weekly,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderReport {
    pub scheduled: usize,
    pub warnings: Vec<String>,
}

/// Schemalägg alla lektionstider. Enskilda fel hoppas över och rapporteras.
pub fn schedule_all(
    schedules: &[Schedule],
    scheduler: &dyn ReminderScheduler,
    now: NaiveDateTime,
    lead_minutes: u32,
) -> ReminderReport {
    let mut report = ReminderReport::default();

    for schedule in schedules {
        let Some(reminder) = build_reminder(schedule, now, lead_minutes) else {
            let message = format!(
                "Ogiltig lektionstid för {}: {:?}",
                schedule.subject, schedule.start_time
            );
            warn!("{}", message);
            report.warnings.push(message);
            continue;
        };

        match scheduler.schedule(&reminder) {
            Ok(()) => report.scheduled += 1,
            Err(e) => {
                let message = format!("Kunde inte schemalägga {}: {:#}", reminder.id, e);
                warn!("{}", message);
                report.warnings.push(message);
            }
        }
    }

    report
}
