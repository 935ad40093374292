//! Diagramdata för resultatvyerna: stapel per ämne för ett år,
//! tårtbitar per ämne för en termin och en mätare för totalt snitt.

use serde::Serialize;

use super::gpa::{grade_points_for, highest_grade_point, weighted_gpa};
use crate::models::{GradingScale, Mark};

const PIE_LABEL_MAX: usize = 10;

/// Fyrstegsskala för färgsättning, relativt skalans högsta betygspoäng
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum PerformanceTier {
    /// Under 50 %
    Low,
    /// 50–69 %
    Fair,
    /// 70–79 %
    Good,
    /// 80 % och uppåt
    Excellent,
}

impl PerformanceTier {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 80.0 {
            Self::Excellent
        } else if percent >= 70.0 {
            Self::Good
        } else if percent >= 50.0 {
            Self::Fair
        } else {
            Self::Low
        }
    }

    /// Färg i snittmätaren
    pub fn gauge_color(&self) -> &'static str {
        match self {
            Self::Low => "#FF4C4C",
            Self::Fair => "#FFD600",
            Self::Good => "#69F0AE",
            Self::Excellent => "#00C853",
        }
    }

    /// Färg i stapel- och tårtdiagram
    pub fn chart_color(&self) -> &'static str {
        match self {
            Self::Low => "#ff0099",
            Self::Fair => "#ff8400",
            Self::Good => "#00ffea",
            Self::Excellent => "#8000ff",
        }
    }
}

/// Andel av högsta möjliga betygspoäng i procent, 0 om skalan saknar poäng
pub fn percent_of_max(value: f64, highest: f64) -> f64 {
    if highest > 0.0 {
        value / highest * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPoint {
    pub label: String,
    pub value: f64,
    pub tier: PerformanceTier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub text: String,
    pub value: f64,
    pub tier: PerformanceTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GpaGauge {
    pub gpa: f64,
    pub highest: f64,
    pub percent: f64,
    pub tier: PerformanceTier,
}

impl GpaGauge {
    /// T.ex. "2.80/4"
    pub fn label(&self) -> String {
        format!("{:.2}/{}", self.gpa, self.highest)
    }
}

fn scored_tier(scale: &[GradingScale], highest: f64, mark: &Mark) -> (f64, PerformanceTier) {
    let gp = grade_points_for(scale, mark.obtained_marks, mark.total_marks);
    (gp, PerformanceTier::from_percent(percent_of_max(gp, highest)))
}

/// Stapel per resultat, värdet är betygspoängen
pub fn bar_series(scale: &[GradingScale], marks: &[Mark]) -> Vec<BarPoint> {
    let highest = highest_grade_point(scale);

    marks
        .iter()
        .map(|mark| {
            let (value, tier) = scored_tier(scale, highest, mark);
            BarPoint {
                label: mark.subject_name.clone(),
                value,
                tier,
            }
        })
        .collect()
}

/// Tårtbit per resultat med förkortat ämnesnamn i etiketten
pub fn pie_series(scale: &[GradingScale], marks: &[Mark]) -> Vec<PieSlice> {
    let highest = highest_grade_point(scale);

    marks
        .iter()
        .map(|mark| {
            let (value, tier) = scored_tier(scale, highest, mark);
            PieSlice {
                text: format!("{} : {:.2}", truncate_label(&mark.subject_name), value),
                value,
                tier,
            }
        })
        .collect()
}

/// Snittmätare över alla givna resultat
pub fn gpa_gauge(scale: &[GradingScale], marks: &[Mark]) -> GpaGauge {
    let gpa = weighted_gpa(scale, marks);
    let highest = highest_grade_point(scale);
    let percent = percent_of_max(gpa, highest);

    GpaGauge {
        gpa,
        highest,
        percent,
        tier: PerformanceTier::from_percent(percent),
    }
}

fn truncate_label(name: &str) -> String {
    if name.chars().count() > PIE_LABEL_MAX {
        let short: String = name.chars().take(PIE_LABEL_MAX).collect();
        format!("{}...", short)
    } else {
        name.to_string()
    }
}
