use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{check_text, parse_int};
use crate::utils::error::{AppResult, ValidationErrors};

pub const SUBJECT_NAME_MAX: usize = 30;
pub const TEACHER_NAME_MAX: usize = 20;
pub const SEMESTER_MIN: i64 = 1;
pub const SEMESTER_MAX: i64 = 18;

/// Ämne som skannat material och betyg organiseras kring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: Option<i64>,
    pub name: String,
    pub teacher_name: Option<String>,
    pub abbreviation: Option<String>,
    /// Terminsnummer lagrat som text
    pub semester: Option<String>,
    pub active_subject: bool,
    /// ISO-8601, sätts till nu vid skapande om det saknas
    pub date: Option<String>,
}

impl Subject {
    pub fn new(name: String) -> Self {
        Self {
            id: None,
            name,
            teacher_name: None,
            abbreviation: None,
            semester: None,
            active_subject: false,
            date: None,
        }
    }

    /// Tidsstämpel i samma format som JavaScripts toISOString()
    pub fn now_timestamp() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn display_name(&self) -> String {
        match &self.abbreviation {
            Some(abbr) if !abbr.is_empty() => format!("{} ({})", self.name, abbr),
            _ => self.name.clone(),
        }
    }
}

/// Formulärdata för att skapa eller redigera ett ämne
#[derive(Debug, Clone, Default)]
pub struct SubjectForm {
    pub name: String,
    pub teacher_name: String,
    pub abbreviation: String,
    pub semester: String,
}

impl SubjectForm {
    pub fn from_subject(subject: &Subject) -> Self {
        Self {
            name: subject.name.clone(),
            teacher_name: subject.teacher_name.clone().unwrap_or_default(),
            abbreviation: subject.abbreviation.clone().unwrap_or_default(),
            semester: subject.semester.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        let mut errors = ValidationErrors::new();

        check_text(
            &mut errors,
            "name",
            &self.name,
            SUBJECT_NAME_MAX,
            "Subject name must be 1–30 non-space characters",
        );
        check_text(
            &mut errors,
            "teacher_name",
            &self.teacher_name,
            TEACHER_NAME_MAX,
            "Teacher name must be 1–20 non-space characters",
        );

        if !is_valid_abbreviation(self.abbreviation.trim()) {
            errors.add(
                "abbreviation",
                "Abbreviation must be exactly 3 uppercase letters",
            );
        }

        match parse_int(&self.semester) {
            Some(n) if (SEMESTER_MIN..=SEMESTER_MAX).contains(&n) => {}
            _ => errors.add("semester", "Semester must be a number between 1 and 18"),
        }

        errors.into_result()
    }

    /// Validera och bygg ett nytt (ej sparat) ämne
    pub fn into_subject(self) -> AppResult<Subject> {
        self.validate()?;

        let mut subject = Subject::new(self.name.trim().to_string());
        self.write_fields(&mut subject);
        Ok(subject)
    }

    /// Validera och skriv över de redigerbara fälten på ett befintligt ämne
    pub fn apply_to(&self, subject: &mut Subject) -> AppResult<()> {
        self.validate()?;

        subject.name = self.name.trim().to_string();
        self.write_fields(subject);
        subject.date = Some(Subject::now_timestamp());
        Ok(())
    }

    fn write_fields(&self, subject: &mut Subject) {
        subject.teacher_name = Some(self.teacher_name.trim().to_string());
        subject.abbreviation = Some(self.abbreviation.trim().to_string());
        subject.semester = Some(self.semester.trim().to_string());
    }
}

/// Exakt tre versaler A-Z
pub fn is_valid_abbreviation(value: &str) -> bool {
    value.len() == 3 && value.chars().all(|c| c.is_ascii_uppercase())
}
