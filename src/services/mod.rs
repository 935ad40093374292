//! Tjänster för Studylib
//!
//! Innehåller affärslogik som inte hör hemma i formulär eller databas.

pub mod analysis;
pub mod export;
pub mod gallery;
pub mod gpa;
pub mod pdf;
pub mod reminder;

pub use analysis::{bar_series, gpa_gauge, pie_series, PerformanceTier};
pub use export::{ExportFormat, ExportService, TranscriptScope};
pub use gallery::GalleryService;
pub use gpa::{gpa_summary, weighted_gpa, GpaOptions, GpaSummary, UnmatchedCredits};
pub use pdf::{PdfConverter, PdfLibrary};
pub use reminder::{schedule_all, LoggingScheduler, Reminder, ReminderScheduler};
