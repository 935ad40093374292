use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::{AppResult, ValidationErrors};

/// Bokstavsbetyg som kan användas i betygsskalan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LetterGrade {
    #[default]
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "D-")]
    DMinus,
    #[serde(rename = "E")]
    E,
    #[serde(rename = "E+")]
    EPlus,
    #[serde(rename = "E-")]
    EMinus,
    #[serde(rename = "F")]
    F,
}

impl LetterGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::APlus => "A+",
            Self::AMinus => "A-",
            Self::B => "B",
            Self::BPlus => "B+",
            Self::BMinus => "B-",
            Self::C => "C",
            Self::CPlus => "C+",
            Self::CMinus => "C-",
            Self::D => "D",
            Self::DPlus => "D+",
            Self::DMinus => "D-",
            Self::E => "E",
            Self::EPlus => "E+",
            Self::EMinus => "E-",
            Self::F => "F",
        }
    }

    /// Ordning som i väljaren
    pub fn all() -> &'static [Self] {
        &[
            Self::A,
            Self::APlus,
            Self::AMinus,
            Self::B,
            Self::BPlus,
            Self::BMinus,
            Self::C,
            Self::CPlus,
            Self::CMinus,
            Self::D,
            Self::DPlus,
            Self::DMinus,
            Self::E,
            Self::EPlus,
            Self::EMinus,
            Self::F,
        ]
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LetterGrade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| format!("Okänt bokstavsbetyg: {}", s))
    }
}

impl ToSql for LetterGrade {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for LetterGrade {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        s.parse().map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

/// Ett betygsintervall i procent och dess betygspoäng
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingScale {
    pub id: Option<i64>,
    pub min_mark: f64,
    pub max_mark: f64,
    pub letter_grade: LetterGrade,
    pub grade_points: f64,
}

impl GradingScale {
    pub fn new(min_mark: f64, max_mark: f64, letter_grade: LetterGrade, grade_points: f64) -> Self {
        Self {
            id: None,
            min_mark,
            max_mark,
            letter_grade,
            grade_points,
        }
    }

    /// Inkluderande på båda sidor
    pub fn contains(&self, percentage: f64) -> bool {
        percentage >= self.min_mark && percentage <= self.max_mark
    }

    /// Tom rad som läggs till när användaren trycker "lägg till"
    pub fn blank(id: i64) -> Self {
        Self {
            id: Some(id),
            min_mark: 0.0,
            max_mark: 0.0,
            letter_grade: LetterGrade::A,
            grade_points: 0.0,
        }
    }

    /// Jämför innehåll utan hänsyn till ID
    pub fn same_band(&self, other: &Self) -> bool {
        self.min_mark == other.min_mark
            && self.max_mark == other.max_mark
            && self.letter_grade == other.letter_grade
            && self.grade_points == other.grade_points
    }
}

/// Nästa klientgenererade ID för en ny rad i redigeraren
pub fn next_client_id(rows: &[GradingScale]) -> i64 {
    rows.iter().filter_map(|r| r.id).max().map_or(1, |max| max + 1)
}

/// Validera en hel skala innan den sparas.
/// Överlappande intervall och luckor är tillåtna.
pub fn validate_scale(rows: &[GradingScale]) -> AppResult<()> {
    let mut errors = ValidationErrors::new();

    for row in rows {
        let in_range = |v: f64| v.is_finite() && (0.0..=100.0).contains(&v);
        if !in_range(row.min_mark) || !in_range(row.max_mark) {
            errors.add("min_mark", "Marks must be between 0 and 100");
        } else if row.min_mark > row.max_mark {
            errors.add("max_mark", "Max mark must not be below min mark");
        }

        if !row.grade_points.is_finite() || row.grade_points < 0.0 {
            errors.add("grade_points", "Grade points must be 0 or more");
        }
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_grade_round_trip() {
        for grade in LetterGrade::all() {
            assert_eq!(grade.as_str().parse::<LetterGrade>().unwrap(), *grade);
        }
        assert!("G".parse::<LetterGrade>().is_err());
    }

    #[test]
    fn test_letter_grade_serde() {
        let json = serde_json::to_string(&LetterGrade::BPlus).unwrap();
        assert_eq!(json, "\"B+\"");
    }

    #[test]
    fn test_contains_is_inclusive() {
        let band = GradingScale::new(60.0, 69.0, LetterGrade::D, 1.0);
        assert!(band.contains(60.0));
        assert!(band.contains(69.0));
        assert!(!band.contains(69.5));
    }

    #[test]
    fn test_next_client_id() {
        assert_eq!(next_client_id(&[]), 1);
        let rows = vec![GradingScale::blank(3), GradingScale::blank(1)];
        assert_eq!(next_client_id(&rows), 4);
    }

    #[test]
    fn test_validate_scale() {
        let ok = vec![
            GradingScale::new(0.0, 59.0, LetterGrade::F, 0.0),
            GradingScale::new(50.0, 100.0, LetterGrade::A, 4.0),
        ];
        assert!(validate_scale(&ok).is_ok());

        let bad = vec![GradingScale::new(80.0, 70.0, LetterGrade::B, -1.0)];
        assert!(validate_scale(&bad).is_err());
    }
}
