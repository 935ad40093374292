/// SQL-schema för Studylib
/// Kolumnerna är kompatibla med mobilappens befintliga databas

pub const SCHEMA_VERSION: i32 = 2;

pub const CREATE_TABLES: &str = r#"
-- Ämnen
CREATE TABLE IF NOT EXISTS subject (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    teacher_name TEXT,
    abbreviation TEXT,
    semester TEXT,
    active_subject INTEGER,
    date TEXT
);

-- Skannade sidor
CREATE TABLE IF NOT EXISTS image (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    subject_id INTEGER NOT NULL,
    image_uri TEXT NOT NULL,
    FOREIGN KEY (subject_id) REFERENCES subject(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_image_subject ON image(subject_id);

-- Resultat (subject_name är fritext, ingen främmande nyckel)
CREATE TABLE IF NOT EXISTS mark (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    subject_name TEXT NOT NULL,
    total_marks REAL NOT NULL,
    obtained_marks REAL NOT NULL,
    credit_hour INTEGER NOT NULL,
    year INTEGER NOT NULL,
    semester INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_mark_year_semester ON mark(year, semester);

-- Betygsskala
CREATE TABLE IF NOT EXISTS grading_scale (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    min_mark REAL NOT NULL,
    max_mark REAL NOT NULL,
    letter_grade TEXT NOT NULL,
    grade_points REAL NOT NULL
);

-- Veckoschema
CREATE TABLE IF NOT EXISTS schedule (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    subject TEXT NOT NULL,
    day TEXT NOT NULL,
    start_time TEXT NOT NULL,
    end_time TEXT NOT NULL
);

-- Migrationshistorik
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// Tabeller som måste finnas efter setup
pub const REQUIRED_TABLES: &[&str] = &["subject", "image", "mark", "grading_scale", "schedule"];
