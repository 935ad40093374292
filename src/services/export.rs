//! Export-tjänst för resultatutdrag (JSON, CSV, PDF)

use anyhow::{Context, Result};
use chrono::Utc;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::gpa::{gpa_summary, grade_points_for, letter_for, GpaOptions};
use crate::db::Database;
use crate::models::{GradingScale, Mark};

/// Exportformat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
            ExportFormat::Pdf => "PDF",
        }
    }
}

/// Vilka resultat som tas med
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptScope {
    All,
    Year(i64),
    Semester { year: i64, semester: i64 },
}

impl TranscriptScope {
    pub fn display_name(&self) -> String {
        match self {
            TranscriptScope::All => "All results".to_string(),
            TranscriptScope::Year(year) => format!("Year {}", year),
            TranscriptScope::Semester { year, semester } => {
                format!("Year {} - Semester {}", year, semester)
            }
        }
    }

    pub fn filename_prefix(&self) -> String {
        match self {
            TranscriptScope::All => "transcript".to_string(),
            TranscriptScope::Year(year) => format!("transcript_{}", year),
            TranscriptScope::Semester { year, semester } => {
                format!("transcript_{}_s{}", year, semester)
            }
        }
    }
}

/// Exporterbar resultatrad
#[derive(Debug, Serialize)]
pub struct MarkExport {
    pub id: i64,
    pub subject_name: String,
    pub obtained_marks: f64,
    pub total_marks: f64,
    pub percentage: Option<f64>,
    pub credit_hour: i64,
    pub year: i64,
    pub semester: i64,
    pub letter_grade: Option<String>,
    pub grade_points: f64,
}

impl MarkExport {
    fn from_mark(mark: &Mark, scale: &[GradingScale]) -> Self {
        Self {
            id: mark.id.unwrap_or(0),
            subject_name: mark.subject_name.clone(),
            obtained_marks: mark.obtained_marks,
            total_marks: mark.total_marks,
            percentage: mark.percentage(),
            credit_hour: mark.credit_hour,
            year: mark.year,
            semester: mark.semester,
            letter_grade: letter_for(scale, mark.obtained_marks, mark.total_marks)
                .map(|l| l.to_string()),
            grade_points: grade_points_for(scale, mark.obtained_marks, mark.total_marks),
        }
    }
}

/// Hela utdraget
#[derive(Debug, Serialize)]
pub struct TranscriptExport {
    pub generated_at: String,
    pub scope: String,
    pub gpa: f64,
    pub total_credit_hours: i64,
    pub marks: Vec<MarkExport>,
}

/// Export-tjänst
pub struct ExportService<'a> {
    db: &'a Database,
}

impl<'a> ExportService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Generera filnamn för export
    pub fn generate_filename(scope: TranscriptScope, format: ExportFormat) -> String {
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        format!(
            "studylib_{}_{}.{}",
            scope.filename_prefix(),
            timestamp,
            format.extension()
        )
    }

    /// Bygg utdraget från databasen
    pub fn build_transcript(&self, scope: TranscriptScope) -> Result<TranscriptExport> {
        let marks = match scope {
            TranscriptScope::All => self.db.marks().find_all()?,
            TranscriptScope::Year(year) => self.db.marks().find_by_year(year)?,
            TranscriptScope::Semester { year, semester } => {
                self.db.marks().find_by_semester(semester, year)?
            }
        };
        let scale = self.db.grading_scales().find_all()?;

        Ok(Self::transcript_from(scope, &marks, &scale))
    }

    fn transcript_from(scope: TranscriptScope, marks: &[Mark], scale: &[GradingScale]) -> TranscriptExport {
        let summary = gpa_summary(scale, marks, GpaOptions::default());

        TranscriptExport {
            generated_at: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            scope: scope.display_name(),
            gpa: summary.gpa,
            total_credit_hours: summary.total_credit_hours,
            marks: marks.iter().map(|m| MarkExport::from_mark(m, scale)).collect(),
        }
    }

    /// Exportera utdrag till fil
    pub fn export_to_file(
        &self,
        scope: TranscriptScope,
        format: ExportFormat,
        path: &Path,
    ) -> Result<ExportResult> {
        let transcript = self.build_transcript(scope)?;

        // PDF hanteras separat
        if format == ExportFormat::Pdf {
            return Self::write_pdf(&transcript, path);
        }

        let content = match format {
            ExportFormat::Json => serde_json::to_string_pretty(&transcript)
                .context("JSON serialisering misslyckades")?,
            ExportFormat::Csv => Self::transcript_to_csv(&transcript),
            ExportFormat::Pdf => unreachable!("PDF hanteras separat i write_pdf"),
        };

        std::fs::write(path, &content).context("Kunde inte skriva fil")?;

        Ok(ExportResult {
            format,
            row_count: transcript.marks.len(),
            gpa: transcript.gpa,
            file_size: content.len(),
        })
    }

    /// Skriv PDF med en rad per resultat
    fn write_pdf(transcript: &TranscriptExport, path: &Path) -> Result<ExportResult> {
        let title = format!("Transcript - {}", transcript.scope);

        let (doc, page1, layer1) = PdfDocument::new(&title, Mm(210.0), Mm(297.0), "Lager 1");
        let mut current_layer = doc.get_page(page1).get_layer(layer1);

        let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let font_bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

        // Sidkonfiguration
        let margin_left = Mm(20.0);
        let margin_top = Mm(280.0);
        let margin_bottom = Mm(20.0);
        let line_height = Mm(5.0);
        let mut y_pos = margin_top;

        current_layer.use_text(&title, 16.0, margin_left, y_pos, &font_bold);
        y_pos = y_pos - Mm(8.0);

        let date_str = format!("Generated: {}", transcript.generated_at);
        current_layer.use_text(&date_str, 10.0, margin_left, y_pos, &font);
        y_pos = y_pos - Mm(10.0);

        let columns = [
            ("Subject", margin_left),
            ("Marks", Mm(85.0)),
            ("%", Mm(110.0)),
            ("CH", Mm(130.0)),
            ("Grade", Mm(145.0)),
            ("GP", Mm(165.0)),
        ];

        for (label, x) in &columns {
            current_layer.use_text(*label, 10.0, *x, y_pos, &font_bold);
        }
        y_pos = y_pos - line_height;

        for mark in &transcript.marks {
            if y_pos < margin_bottom {
                let (page, layer) = doc.add_page(Mm(210.0), Mm(297.0), "Lager 1");
                current_layer = doc.get_page(page).get_layer(layer);
                y_pos = margin_top;
            }

            let cells = [
                mark.subject_name.clone(),
                format!("{}/{}", mark.obtained_marks, mark.total_marks),
                mark.percentage.map(|p| format!("{:.1}", p)).unwrap_or_default(),
                mark.credit_hour.to_string(),
                mark.letter_grade.clone().unwrap_or_else(|| "-".to_string()),
                format!("{:.2}", mark.grade_points),
            ];

            for (cell, (_, x)) in cells.iter().zip(columns.iter()) {
                current_layer.use_text(cell.as_str(), 9.0, *x, y_pos, &font);
            }
            y_pos = y_pos - line_height;
        }

        if y_pos < Mm(30.0) {
            let (page, layer) = doc.add_page(Mm(210.0), Mm(297.0), "Lager 1");
            current_layer = doc.get_page(page).get_layer(layer);
            y_pos = margin_top;
        }

        y_pos = y_pos - line_height;
        let totals = format!(
            "GPA: {:.2}    Credit hours: {}",
            transcript.gpa, transcript.total_credit_hours
        );
        current_layer.use_text(&totals, 11.0, margin_left, y_pos, &font_bold);

        // Spara PDF
        let file = File::create(path).context("Kunde inte skapa PDF-fil")?;
        let mut writer = BufWriter::new(file);
        doc.save(&mut writer).context("Kunde inte spara PDF")?;
        writer.flush().context("Kunde inte spara PDF")?;

        let file_size = std::fs::metadata(path)?.len() as usize;

        Ok(ExportResult {
            format: ExportFormat::Pdf,
            row_count: transcript.marks.len(),
            gpa: transcript.gpa,
            file_size,
        })
    }

    /// Konvertera utdrag till CSV
    fn transcript_to_csv(transcript: &TranscriptExport) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str(
            "id,subject_name,obtained_marks,total_marks,percentage,credit_hour,year,semester,letter_grade,grade_points\n",
        );

        // Rader
        for m in &transcript.marks {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{:.2}\n",
                m.id,
                Self::csv_escape(&m.subject_name),
                m.obtained_marks,
                m.total_marks,
                m.percentage.map(|p| format!("{:.2}", p)).unwrap_or_default(),
                m.credit_hour,
                m.year,
                m.semester,
                m.letter_grade.as_deref().unwrap_or(""),
                m.grade_points,
            ));
        }

        csv.push_str(&format!("\nGPA,{:.2}\n", transcript.gpa));
        csv.push_str(&format!("Credit hours,{}\n", transcript.total_credit_hours));

        csv
    }

    /// Escape CSV-värde
    fn csv_escape(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

/// Resultat av export
#[derive(Debug)]
pub struct ExportResult {
    pub format: ExportFormat,
    pub row_count: usize,
    pub gpa: f64,
    pub file_size: usize,
}

impl ExportResult {
    pub fn summary(&self) -> String {
        format!(
            "{} exporterad: {} resultat, GPA {:.2}, {} bytes",
            self.format.display_name(),
            self.row_count,
            self.gpa,
            self.file_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LetterGrade;
    use tempfile::tempdir;

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.grading_scales()
            .replace_all(&[
                GradingScale::new(0.0, 59.0, LetterGrade::F, 0.0),
                GradingScale::new(60.0, 69.0, LetterGrade::D, 1.0),
                GradingScale::new(70.0, 79.0, LetterGrade::C, 2.0),
                GradingScale::new(80.0, 100.0, LetterGrade::A, 4.0),
            ])
            .unwrap();

        for (name, obtained, credit, year, semester) in [
            ("Math", 90.0, 3, 2024, 1),
            ("Art, History", 65.0, 2, 2024, 1),
            ("Chemistry", 75.0, 4, 2023, 2),
        ] {
            let mut mark = Mark::new(name.into(), obtained, 100.0, credit, year, semester);
            db.marks().create(&mut mark).unwrap();
        }

        db
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(ExportService::csv_escape("hello"), "hello");
        assert_eq!(ExportService::csv_escape("hello,world"), "\"hello,world\"");
        assert_eq!(
            ExportService::csv_escape("say \"hello\""),
            "\"say \"\"hello\"\"\""
        );
    }

    #[test]
    fn test_generate_filename() {
        let filename = ExportService::generate_filename(TranscriptScope::All, ExportFormat::Json);
        assert!(filename.starts_with("studylib_transcript_"));
        assert!(filename.ends_with(".json"));

        let filename = ExportService::generate_filename(
            TranscriptScope::Semester { year: 2024, semester: 2 },
            ExportFormat::Csv,
        );
        assert!(filename.starts_with("studylib_transcript_2024_s2_"));
        assert!(filename.ends_with(".csv"));
    }

    #[test]
    fn test_transcript_for_semester() {
        let db = seeded();
        let transcript = ExportService::new(&db)
            .build_transcript(TranscriptScope::Semester { year: 2024, semester: 1 })
            .unwrap();

        assert_eq!(transcript.marks.len(), 2);
        assert_eq!(transcript.total_credit_hours, 5);
        assert!((transcript.gpa - 2.8).abs() < 1e-9);

        let math = transcript.marks.iter().find(|m| m.subject_name == "Math").unwrap();
        assert_eq!(math.letter_grade.as_deref(), Some("A"));
        assert_eq!(math.grade_points, 4.0);
    }

    #[test]
    fn test_export_json_and_csv() {
        let db = seeded();
        let dir = tempdir().unwrap();
        let service = ExportService::new(&db);

        let json_path = dir.path().join("t.json");
        let result = service
            .export_to_file(TranscriptScope::All, ExportFormat::Json, &json_path)
            .unwrap();
        assert_eq!(result.row_count, 3);
        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(parsed["marks"].as_array().unwrap().len(), 3);

        let csv_path = dir.path().join("t.csv");
        service
            .export_to_file(TranscriptScope::Year(2024), ExportFormat::Csv, &csv_path)
            .unwrap();
        let csv = std::fs::read_to_string(&csv_path).unwrap();
        assert!(csv.starts_with("id,subject_name,"));
        assert!(csv.contains("\"Art, History\""));
        assert!(csv.contains("GPA,2.80"));
    }

    #[test]
    fn test_export_pdf() {
        let db = seeded();
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.pdf");

        let result = ExportService::new(&db)
            .export_to_file(TranscriptScope::All, ExportFormat::Pdf, &path)
            .unwrap();
        assert_eq!(result.format, ExportFormat::Pdf);
        assert!(result.file_size > 0);
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn test_pdf_file_size_matches_disk() {
        let db = seeded();
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.pdf");

        let result = ExportService::new(&db)
            .export_to_file(TranscriptScope::All, ExportFormat::Pdf, &path)
            .unwrap();
        let on_disk = std::fs::metadata(&path).unwrap().len();
        assert_eq!(result.file_size as u64, on_disk);
        assert!(on_disk > 0);
    }
}
