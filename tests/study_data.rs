use std::fs;

use rusqlite::Connection;
use tempfile::tempdir;

use studylib::services::gpa::{gpa_summary, weighted_gpa, GpaOptions};
use studylib::utils::{AppError, FileStore, LocalFileStore};
use studylib::{Database, GradingScale, LetterGrade, Mark, MarkForm, Subject};

fn scale() -> Vec<GradingScale> {
    vec![
        GradingScale::new(0.0, 59.0, LetterGrade::F, 0.0),
        GradingScale::new(60.0, 69.0, LetterGrade::D, 1.0),
        GradingScale::new(70.0, 79.0, LetterGrade::C, 2.0),
        GradingScale::new(80.0, 100.0, LetterGrade::A, 4.0),
    ]
}

fn open_file_db(dir: &std::path::Path) -> Database {
    let db = Database::open(&dir.join("study.db")).unwrap();
    db.ensure_schema().unwrap();
    db
}

struct ReadOnlyStore;

impl FileStore for ReadOnlyStore {
    fn exists(&self, _path: &str) -> bool {
        true
    }

    fn delete(&self, path: &str) -> anyhow::Result<()> {
        anyhow::bail!("permission denied: {}", path)
    }

    fn copy(&self, _source: &str, _dest: &str) -> anyhow::Result<()> {
        anyhow::bail!("read only")
    }

    fn make_dir(&self, _path: &str) -> anyhow::Result<()> {
        anyhow::bail!("read only")
    }
}

#[test]
fn deleting_subject_removes_images_and_files() {
    let dir = tempdir().unwrap();
    let db = open_file_db(dir.path());

    let mut subject = Subject::new("History".into());
    let id = db.subjects().create(&mut subject).unwrap();

    let page = dir.path().join("page.jpg");
    fs::write(&page, "jpg").unwrap();
    db.images()
        .add_many(id, &[format!("file://{}", page.display())])
        .unwrap();

    let report = db.subjects().delete(id, &LocalFileStore).unwrap();
    assert!(report.is_clean());
    assert!(!page.exists());
    assert_eq!(db.images().count_by_subject(id).unwrap(), 0);
    assert!(db.subjects().find_by_id(id).unwrap().is_none());
}

#[test]
fn subject_delete_tolerates_file_errors() {
    let dir = tempdir().unwrap();
    let db = open_file_db(dir.path());

    let mut subject = Subject::new("Physics".into());
    let id = db.subjects().create(&mut subject).unwrap();
    db.images().add_many(id, &["/nowhere/1.jpg".to_string()]).unwrap();

    let report = db.subjects().delete(id, &ReadOnlyStore).unwrap();
    assert_eq!(report.rows_deleted, 1);
    assert!(!report.is_clean());
    assert_eq!(db.images().count_by_subject(id).unwrap(), 0);
}

#[test]
fn legacy_prefixed_uris_are_normalized_on_open() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("study.db");

    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE subject (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL,
                teacher_name TEXT, abbreviation TEXT, semester TEXT, active_subject INTEGER, date TEXT);
             CREATE TABLE image (id INTEGER PRIMARY KEY AUTOINCREMENT, subject_id INTEGER NOT NULL,
                image_uri TEXT NOT NULL,
                FOREIGN KEY (subject_id) REFERENCES subject(id) ON DELETE CASCADE);
             INSERT INTO subject (name, active_subject) VALUES ('Art', 1);
             INSERT INTO image (subject_id, image_uri) VALUES (1, 'file:///scans/a.jpg');",
        )
        .unwrap();
    }

    let db = Database::open(&path).unwrap();
    db.ensure_schema().unwrap();

    let images = db.images().find_by_subject(1).unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].image_uri, "/scans/a.jpg");
    assert_eq!(images[0].file_uri(), "file:///scans/a.jpg");

    let report = db
        .images()
        .delete_by_uris(&["file:///scans/a.jpg".to_string()], &LocalFileStore)
        .unwrap();
    assert_eq!(report.rows_deleted, 1);
}

#[test]
fn stored_marks_give_expected_gpa() {
    let db = Database::open_in_memory().unwrap();
    db.grading_scales().replace_all(&scale()).unwrap();

    let mut math = Mark::new("Math".into(), 90.0, 100.0, 3, 2024, 1);
    let mut art = Mark::new("Art".into(), 65.0, 100.0, 2, 2024, 1);
    db.marks().create(&mut math).unwrap();
    db.marks().create(&mut art).unwrap();

    let stored_scale = db.grading_scales().find_all().unwrap();
    let marks = db.marks().find_by_semester(1, 2024).unwrap();
    assert!((weighted_gpa(&stored_scale, &marks) - 2.8).abs() < 1e-9);

    let empty = db.marks().find_by_semester(2, 2024).unwrap();
    assert_eq!(weighted_gpa(&stored_scale, &empty), 0.0);
}

#[test]
fn unmatched_mark_still_counts_credit_hours() {
    let marks = vec![
        Mark::new("Math".into(), 90.0, 100.0, 2, 2024, 1),
        Mark::new("Gap".into(), 59.5, 100.0, 2, 2024, 1),
    ];

    let summary = gpa_summary(&scale(), &marks, GpaOptions::default());
    assert_eq!(summary.total_credit_hours, 4);
    assert_eq!(summary.gpa, 2.0);
}

#[test]
fn grading_scale_replacement_round_trips() {
    let db = Database::open_in_memory().unwrap();
    db.grading_scales()
        .replace_all(&[GradingScale::new(0.0, 100.0, LetterGrade::BPlus, 3.3)])
        .unwrap();
    db.grading_scales().replace_all(&scale()).unwrap();

    let stored = db.grading_scales().find_all().unwrap();
    assert_eq!(stored.len(), scale().len());
    for (saved, expected) in stored.iter().zip(scale().iter()) {
        assert!(saved.same_band(expected));
    }
}

#[test]
fn active_subjects_are_filtered_newest_first() {
    let db = Database::open_in_memory().unwrap();
    let mut ids = Vec::new();
    for (name, active) in [("A", true), ("B", false), ("C", true)] {
        let mut subject = Subject::new(name.into());
        subject.active_subject = active;
        ids.push(db.subjects().create(&mut subject).unwrap());
    }

    let names: Vec<String> = db
        .subjects()
        .find_active()
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["C", "A"]);
}

#[test]
fn obtained_marks_cannot_exceed_total() {
    let mut form = MarkForm {
        subject_name: "Biology".into(),
        total_marks: "50".into(),
        obtained_marks: "51".into(),
        credit_hour: "3".into(),
        year: "2024".into(),
        semester: "2".into(),
    };
    assert!(matches!(form.to_mark(), Err(AppError::Validation(_))));

    form.obtained_marks = "50".into();
    let mark = form.to_mark().unwrap();
    assert_eq!(mark.obtained_marks, mark.total_marks);
}
