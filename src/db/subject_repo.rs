use anyhow::{anyhow, Result};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};
use tracing::info;

use super::lock;
use crate::models::Subject;
use crate::utils::file_ops::{remove_files_best_effort, CleanupReport, FileStore};

const SUBJECT_COLUMNS: &str =
    "id, name, teacher_name, abbreviation, semester, active_subject, date";

pub struct SubjectRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SubjectRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Skapa ämne. Datum sätts till nu om det saknas.
    pub fn create(&self, subject: &mut Subject) -> Result<i64> {
        if subject.date.is_none() {
            subject.date = Some(Subject::now_timestamp());
        }

        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT INTO subject (name, teacher_name, abbreviation, semester, active_subject, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                subject.name,
                subject.teacher_name,
                subject.abbreviation,
                subject.semester,
                subject.active_subject,
                subject.date,
            ],
        )?;

        let id = conn.last_insert_rowid();
        subject.id = Some(id);

        Ok(id)
    }

    /// Hämta alla ämnen, senast skapade först
    pub fn find_all(&self) -> Result<Vec<Subject>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM subject ORDER BY id DESC",
            SUBJECT_COLUMNS
        ))?;

        let subjects = stmt
            .query_map([], Self::row_to_subject)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(subjects)
    }

    /// Hämta aktiva ämnen, senast skapade först
    pub fn find_active(&self) -> Result<Vec<Subject>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM subject WHERE active_subject = 1 ORDER BY id DESC",
            SUBJECT_COLUMNS
        ))?;

        let subjects = stmt
            .query_map([], Self::row_to_subject)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(subjects)
    }

    /// Hämta ämne via ID
    pub fn find_by_id(&self, id: i64) -> Result<Option<Subject>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM subject WHERE id = ?",
            SUBJECT_COLUMNS
        ))?;

        let mut rows = stmt.query_map([id], Self::row_to_subject)?;
        let subject = rows.next().transpose()?;
        Ok(subject)
    }

    /// Uppdatera alla redigerbara fält
    pub fn update(&self, subject: &Subject) -> Result<()> {
        let id = subject.id.ok_or_else(|| anyhow!("Ämne har inget ID"))?;
        let date = subject.date.clone().unwrap_or_else(Subject::now_timestamp);

        let conn = lock(&self.conn)?;
        let rows = conn.execute(
            "UPDATE subject SET
                name = ?1, teacher_name = ?2, abbreviation = ?3, semester = ?4,
                active_subject = ?5, date = ?6
             WHERE id = ?7",
            params![
                subject.name,
                subject.teacher_name,
                subject.abbreviation,
                subject.semester,
                subject.active_subject,
                date,
                id,
            ],
        )?;

        if rows == 0 {
            return Err(anyhow!("Ämne med ID {} hittades inte", id));
        }

        Ok(())
    }

    /// Sätt eller ta bort aktiv-flaggan. Flera ämnen kan vara aktiva samtidigt.
    pub fn set_active(&self, id: i64, active: bool) -> Result<()> {
        let conn = lock(&self.conn)?;
        let rows = conn.execute(
            "UPDATE subject SET active_subject = ?1 WHERE id = ?2",
            params![active, id],
        )?;

        if rows == 0 {
            return Err(anyhow!("Ämne med ID {} hittades inte", id));
        }

        Ok(())
    }

    /// Ersätt hela den aktiva mängden: angivna ämnen blir aktiva, alla andra inaktiva.
    /// Okänt ID rullar tillbaka hela ändringen.
    pub fn set_active_only(&self, ids: &[i64]) -> Result<()> {
        let mut conn = lock(&self.conn)?;
        let tx = conn.transaction()?;

        tx.execute("UPDATE subject SET active_subject = 0", [])?;
        for id in ids {
            let rows = tx.execute("UPDATE subject SET active_subject = 1 WHERE id = ?", [id])?;
            if rows == 0 {
                return Err(anyhow!("Ämne med ID {} hittades inte", id));
            }
        }

        tx.commit()?;
        info!("{} aktiva ämnen", ids.len());
        Ok(())
    }

    /// Ta bort ämne med dess bilder.
    ///
    /// Bildfilerna tas bort först, med bästa förmåga: saknade filer ignoreras
    /// och fel samlas som varningar i rapporten. Därefter tas ämnesraden bort
    /// i en transaktion och `ON DELETE CASCADE` tar bildraderna.
    pub fn delete(&self, id: i64, files: &dyn FileStore) -> Result<CleanupReport> {
        let mut report = CleanupReport::default();
        let mut conn = lock(&self.conn)?;

        let uris = match Self::image_uris(&conn, id) {
            Ok(uris) => uris,
            Err(e) => {
                report.warn(format!("Kunde inte lista bilder för ämne {}: {}", id, e));
                Vec::new()
            }
        };

        remove_files_best_effort(files, &uris, &mut report);

        let tx = conn.transaction()?;
        report.rows_deleted = tx.execute("DELETE FROM subject WHERE id = ?", [id])?;
        tx.commit()?;

        info!(
            "Tog bort ämne {} ({} bilder, {} varningar)",
            id,
            uris.len(),
            report.warnings.len()
        );

        Ok(report)
    }

    /// Räkna ämnen
    pub fn count(&self) -> Result<i64> {
        let conn = lock(&self.conn)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM subject", [], |row| row.get(0))?;
        Ok(count)
    }

    fn image_uris(conn: &Connection, subject_id: i64) -> rusqlite::Result<Vec<String>> {
        let mut stmt = conn.prepare("SELECT image_uri FROM image WHERE subject_id = ?")?;
        let uris: rusqlite::Result<Vec<String>> = stmt
            .query_map([subject_id], |row| row.get(0))?
            .collect();
        uris
    }

    fn row_to_subject(row: &Row) -> rusqlite::Result<Subject> {
        Ok(Subject {
            id: row.get(0)?,
            name: row.get(1)?,
            teacher_name: row.get(2)?,
            abbreviation: row.get(3)?,
            semester: row.get(4)?,
            active_subject: row.get::<_, Option<i64>>(5)?.unwrap_or(0) != 0,
            date: row.get(6)?,
        })
    }
}
