use anyhow::{anyhow, Result};
use rusqlite::{params, Connection, Params, Row};
use std::sync::{Arc, Mutex};

use super::lock;
use crate::models::Mark;

const MARK_COLUMNS: &str =
    "id, subject_name, total_marks, obtained_marks, credit_hour, year, semester";

pub struct MarkRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MarkRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Skapa resultat
    pub fn create(&self, mark: &mut Mark) -> Result<i64> {
        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT INTO mark (subject_name, total_marks, obtained_marks, credit_hour, year, semester)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                mark.subject_name,
                mark.total_marks,
                mark.obtained_marks,
                mark.credit_hour,
                mark.year,
                mark.semester,
            ],
        )?;

        let id = conn.last_insert_rowid();
        mark.id = Some(id);

        Ok(id)
    }

    /// Hämta resultat via ID
    pub fn find_by_id(&self, id: i64) -> Result<Option<Mark>> {
        let mut marks = self.query(&format!("SELECT {} FROM mark WHERE id = ?", MARK_COLUMNS), [id])?;
        Ok(marks.pop())
    }

    /// Uppdatera resultat
    pub fn update(&self, mark: &Mark) -> Result<()> {
        let id = mark.id.ok_or_else(|| anyhow!("Resultat har inget ID"))?;

        let conn = lock(&self.conn)?;
        let rows = conn.execute(
            "UPDATE mark SET
                subject_name = ?1, total_marks = ?2, obtained_marks = ?3,
                credit_hour = ?4, year = ?5, semester = ?6
             WHERE id = ?7",
            params![
                mark.subject_name,
                mark.total_marks,
                mark.obtained_marks,
                mark.credit_hour,
                mark.year,
                mark.semester,
                id,
            ],
        )?;

        if rows == 0 {
            return Err(anyhow!("Resultat med ID {} hittades inte", id));
        }

        Ok(())
    }

    /// Ta bort resultat. Returnerar false om det inte fanns.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let conn = lock(&self.conn)?;
        let rows = conn.execute("DELETE FROM mark WHERE id = ?", [id])?;
        Ok(rows > 0)
    }

    /// Hämta alla resultat, senast skapade först
    pub fn find_all(&self) -> Result<Vec<Mark>> {
        self.query(&format!("SELECT {} FROM mark ORDER BY id DESC", MARK_COLUMNS), [])
    }

    /// Hämta resultat för ett år
    pub fn find_by_year(&self, year: i64) -> Result<Vec<Mark>> {
        self.query(
            &format!("SELECT {} FROM mark WHERE year = ? ORDER BY id DESC", MARK_COLUMNS),
            [year],
        )
    }

    /// Hämta resultat för en termin ett visst år
    pub fn find_by_semester(&self, semester: i64, year: i64) -> Result<Vec<Mark>> {
        self.query(
            &format!(
                "SELECT {} FROM mark WHERE semester = ? AND year = ? ORDER BY id DESC",
                MARK_COLUMNS
            ),
            [semester, year],
        )
    }

    /// År som har resultat, senaste först
    pub fn available_years(&self) -> Result<Vec<i64>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare("SELECT DISTINCT year FROM mark ORDER BY year DESC")?;
        let years = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(years)
    }

    /// Terminer som har resultat ett visst år, stigande
    pub fn available_semesters(&self, year: i64) -> Result<Vec<i64>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT semester FROM mark WHERE year = ? ORDER BY semester",
        )?;
        let semesters = stmt
            .query_map([year], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(semesters)
    }

    /// Räkna resultat
    pub fn count(&self) -> Result<i64> {
        let conn = lock(&self.conn)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM mark", [], |row| row.get(0))?;
        Ok(count)
    }

    fn query<P: Params>(&self, sql: &str, params: P) -> Result<Vec<Mark>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(sql)?;
        let marks = stmt
            .query_map(params, Self::row_to_mark)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(marks)
    }

    fn row_to_mark(row: &Row) -> rusqlite::Result<Mark> {
        Ok(Mark {
            id: row.get(0)?,
            subject_name: row.get(1)?,
            total_marks: row.get(2)?,
            obtained_marks: row.get(3)?,
            credit_hour: row.get(4)?,
            year: row.get(5)?,
            semester: row.get(6)?,
        })
    }
}
