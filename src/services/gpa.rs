//! Betygspoäng och viktat snittbetyg (GPA)
//!
//! Rena funktioner utan I/O. Betygsskalan söks i given ordning och det
//! första intervall som innehåller procentsatsen vinner, så överlappande
//! intervall är tillåtna.

use serde::Serialize;

use crate::models::{GradingScale, LetterGrade, Mark};

/// Något som har poäng och högskolepoäng/credits
pub trait Scored {
    fn obtained_marks(&self) -> f64;
    fn total_marks(&self) -> f64;
    fn credit_hour(&self) -> i64;
}

impl Scored for Mark {
    fn obtained_marks(&self) -> f64 {
        self.obtained_marks
    }

    fn total_marks(&self) -> f64 {
        self.total_marks
    }

    fn credit_hour(&self) -> i64 {
        self.credit_hour
    }
}

/// Fristående post, t.ex. för "vad händer om"-beräkningar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredEntry {
    pub obtained_marks: f64,
    pub total_marks: f64,
    pub credit_hour: i64,
}

impl ScoredEntry {
    pub fn new(obtained_marks: f64, total_marks: f64, credit_hour: i64) -> Self {
        Self {
            obtained_marks,
            total_marks,
            credit_hour,
        }
    }
}

impl Scored for ScoredEntry {
    fn obtained_marks(&self) -> f64 {
        self.obtained_marks
    }

    fn total_marks(&self) -> f64 {
        self.total_marks
    }

    fn credit_hour(&self) -> i64 {
        self.credit_hour
    }
}

/// Hur poster utanför alla intervall hanteras
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmatchedCredits {
    /// Ger 0 poäng men deras credits räknas i nämnaren
    #[default]
    Count,
    /// Utesluts helt ur beräkningen
    Skip,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GpaOptions {
    pub unmatched: UnmatchedCredits,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GpaSummary {
    /// Avrundat till två decimaler
    pub gpa: f64,
    pub total_weighted_points: f64,
    pub total_credit_hours: i64,
    pub unmatched_entries: usize,
}

/// Procent av maxpoäng. None om totalen inte är positiv.
pub fn percentage(obtained: f64, total: f64) -> Option<f64> {
    if total > 0.0 && obtained.is_finite() && total.is_finite() {
        Some(obtained / total * 100.0)
    } else {
        None
    }
}

/// Första intervallet i skalan som innehåller resultatets procentsats
pub fn find_band(scale: &[GradingScale], obtained: f64, total: f64) -> Option<&GradingScale> {
    let pct = percentage(obtained, total)?;
    scale.iter().find(|band| band.contains(pct))
}

/// Betygspoäng för ett resultat, 0 om inget intervall matchar
pub fn grade_points_for(scale: &[GradingScale], obtained: f64, total: f64) -> f64 {
    find_band(scale, obtained, total).map_or(0.0, |band| band.grade_points)
}

/// Bokstavsbetyg för ett resultat
pub fn letter_for(scale: &[GradingScale], obtained: f64, total: f64) -> Option<LetterGrade> {
    find_band(scale, obtained, total).map(|band| band.letter_grade)
}

/// Viktat snitt med standardregeln (omatchade poster räknas)
pub fn weighted_gpa<T: Scored>(scale: &[GradingScale], entries: &[T]) -> f64 {
    gpa_summary(scale, entries, GpaOptions::default()).gpa
}

/// Viktat snitt med alla mellanled
pub fn gpa_summary<T: Scored>(scale: &[GradingScale], entries: &[T], options: GpaOptions) -> GpaSummary {
    let mut summary = GpaSummary::default();
    let mut credit_sum = 0.0;

    for entry in entries {
        let band = find_band(scale, entry.obtained_marks(), entry.total_marks());

        let grade_points = match band {
            Some(band) => band.grade_points,
            None => {
                summary.unmatched_entries += 1;
                if options.unmatched == UnmatchedCredits::Skip {
                    continue;
                }
                0.0
            }
        };

        let credits = entry.credit_hour();
        summary.total_weighted_points += credits as f64 * grade_points;
        summary.total_credit_hours = summary.total_credit_hours.saturating_add(credits);
        credit_sum += credits as f64;
    }

    if credit_sum > 0.0 {
        summary.gpa = round2(summary.total_weighted_points / credit_sum);
    }

    summary
}

/// Högsta betygspoäng i skalan, 0 för tom skala
pub fn highest_grade_point(scale: &[GradingScale]) -> f64 {
    scale
        .iter()
        .map(|band| band.grade_points)
        .fold(None, |max: Option<f64>, gp| Some(max.map_or(gp, |m| m.max(gp))))
        .unwrap_or(0.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
