use anyhow::Result;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};
use tracing::info;

use super::lock;
use crate::models::GradingScale;

/// Betygsskalan sparas alltid som en helhet: rensa allt och sätt in på nytt
pub struct GradingScaleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl GradingScaleRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Hämta hela skalan i inmatningsordning
    pub fn find_all(&self) -> Result<Vec<GradingScale>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT id, min_mark, max_mark, letter_grade, grade_points
             FROM grading_scale ORDER BY id",
        )?;

        let rows = stmt
            .query_map([], Self::row_to_scale)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    /// Ta bort alla rader
    pub fn delete_all(&self) -> Result<usize> {
        let conn = lock(&self.conn)?;
        let rows = conn.execute("DELETE FROM grading_scale", [])?;
        Ok(rows)
    }

    /// Sätt in rader; klientens ID:n ignoreras
    pub fn insert_many(&self, rows: &[GradingScale]) -> Result<usize> {
        let mut conn = lock(&self.conn)?;
        let tx = conn.transaction()?;
        Self::insert_rows(&tx, rows)?;
        tx.commit()?;
        Ok(rows.len())
    }

    /// Ersätt hela skalan i en transaktion
    pub fn replace_all(&self, rows: &[GradingScale]) -> Result<()> {
        let mut conn = lock(&self.conn)?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM grading_scale", [])?;
        Self::insert_rows(&tx, rows)?;
        tx.commit()?;

        info!("Sparade betygsskala med {} intervall", rows.len());
        Ok(())
    }

    fn insert_rows(conn: &Connection, rows: &[GradingScale]) -> rusqlite::Result<()> {
        let mut stmt = conn.prepare(
            "INSERT INTO grading_scale (min_mark, max_mark, letter_grade, grade_points)
             VALUES (?1, ?2, ?3, ?4)",
        )?;

        for row in rows {
            stmt.execute(params![
                row.min_mark,
                row.max_mark,
                row.letter_grade,
                row.grade_points,
            ])?;
        }

        Ok(())
    }

    fn row_to_scale(row: &Row) -> rusqlite::Result<GradingScale> {
        Ok(GradingScale {
            id: row.get(0)?,
            min_mark: row.get(1)?,
            max_mark: row.get(2)?,
            letter_grade: row.get(3)?,
            grade_points: row.get(4)?,
        })
    }
}
