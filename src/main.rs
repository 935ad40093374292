//! Studylib - Entry Point
//!
//! Öppnar databasen, kör migrationer och skriver en sammanfattning.

use anyhow::Context;
use chrono::Local;

use studylib::models::AppSettings;
use studylib::services::{gpa_summary, schedule_all, GpaOptions, LoggingScheduler};
use studylib::Database;

fn main() -> anyhow::Result<()> {
    let settings = AppSettings::load();

    // Initiera logging
    tracing_subscriber::fmt()
        .with_max_level(settings.tracing_level())
        .with_target(false)
        .init();

    tracing::info!("Startar Studylib v{}", env!("CARGO_PKG_VERSION"));

    let db = Database::open(&settings.database_path)
        .with_context(|| format!("Kunde inte öppna databasen {:?}", settings.database_path))?;
    db.ensure_schema().context("Databasmigrering misslyckades")?;

    if let Err(e) = settings.ensure_directories() {
        tracing::warn!("Kunde inte skapa kataloger: {}", e);
    }

    let subjects = db.subjects().count()?;
    let active = db.subjects().find_active()?.len();
    let marks = db.marks().find_all()?;
    let scale = db.grading_scales().find_all()?;
    let summary = gpa_summary(&scale, &marks, GpaOptions::default());

    tracing::info!(
        "{} ämnen ({} aktiva), {} resultat, GPA {:.2} över {} credits",
        subjects,
        active,
        marks.len(),
        summary.gpa,
        summary.total_credit_hours
    );
    if summary.unmatched_entries > 0 {
        tracing::warn!(
            "{} resultat saknar intervall i betygsskalan",
            summary.unmatched_entries
        );
    }

    let schedules = db.schedules().find_all()?;
    let report = schedule_all(
        &schedules,
        &LoggingScheduler,
        Local::now().naive_local(),
        settings.reminder_lead_minutes,
    );
    tracing::info!("{} lektionspåminnelser", report.scheduled);

    Ok(())
}
