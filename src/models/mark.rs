use serde::{Deserialize, Serialize};

use super::subject::SUBJECT_NAME_MAX;
use super::validation::{check_text, parse_number, positive_int};
use crate::utils::error::{AppResult, ValidationErrors};

/// Resultat i ett ämne. `subject_name` är fritext, ingen koppling till `subject`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    pub id: Option<i64>,
    pub subject_name: String,
    pub total_marks: f64,
    pub obtained_marks: f64,
    pub credit_hour: i64,
    pub year: i64,
    pub semester: i64,
}

impl Mark {
    pub fn new(
        subject_name: String,
        obtained_marks: f64,
        total_marks: f64,
        credit_hour: i64,
        year: i64,
        semester: i64,
    ) -> Self {
        Self {
            id: None,
            subject_name,
            total_marks,
            obtained_marks,
            credit_hour,
            year,
            semester,
        }
    }

    /// Procent av maxpoäng, None om totalen inte är positiv
    pub fn percentage(&self) -> Option<f64> {
        crate::services::gpa::percentage(self.obtained_marks, self.total_marks)
    }

    /// Rad för listvyn, t.ex. "Marks: 45/50 | CH: 3 | Per: 90.0%"
    pub fn summary(&self) -> String {
        let per = self.percentage().unwrap_or(0.0);
        format!(
            "Marks: {}/{} | CH: {} | Per: {:.1}%",
            self.obtained_marks, self.total_marks, self.credit_hour, per
        )
    }
}

/// Formulärdata för resultat, så som det skrivs in
#[derive(Debug, Clone, Default)]
pub struct MarkForm {
    pub subject_name: String,
    pub total_marks: String,
    pub obtained_marks: String,
    pub credit_hour: String,
    pub year: String,
    pub semester: String,
}

impl MarkForm {
    pub fn from_mark(mark: &Mark) -> Self {
        Self {
            subject_name: mark.subject_name.clone(),
            total_marks: mark.total_marks.to_string(),
            obtained_marks: mark.obtained_marks.to_string(),
            credit_hour: mark.credit_hour.to_string(),
            year: mark.year.to_string(),
            semester: mark.semester.to_string(),
        }
    }

    /// Validera alla fält och bygg ett resultat (utan ID)
    pub fn to_mark(&self) -> AppResult<Mark> {
        let mut errors = ValidationErrors::new();

        check_text(
            &mut errors,
            "subject_name",
            &self.subject_name,
            SUBJECT_NAME_MAX,
            "Subject name must be 1–30 non-space characters",
        );

        let total = match parse_number(&self.total_marks) {
            Some(t) if t > 0.0 => Some(t),
            _ => {
                errors.add("total_marks", "Total marks must be > 0");
                None
            }
        };

        let obtained = parse_number(&self.obtained_marks);
        let obtained_ok = match (obtained, total) {
            (Some(o), Some(t)) => o >= 0.0 && o <= t,
            _ => false,
        };
        if !obtained_ok {
            errors.add(
                "obtained_marks",
                "Obtained marks must be between 0 and total marks",
            );
        }

        let credit_hour = positive_int(
            &mut errors,
            "credit_hour",
            &self.credit_hour,
            "Credit hour must be > 0",
        );
        let year = positive_int(&mut errors, "year", &self.year, "Year must be > 0");
        let semester = positive_int(
            &mut errors,
            "semester",
            &self.semester,
            "Semester must be > 0",
        );

        errors.into_result()?;

        Ok(Mark::new(
            self.subject_name.trim().to_string(),
            obtained.unwrap_or_default(),
            total.unwrap_or_default(),
            credit_hour,
            year,
            semester,
        ))
    }
}
