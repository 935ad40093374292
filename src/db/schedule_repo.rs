use anyhow::Result;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

use super::lock;
use crate::models::{group_by_day, Schedule, Weekday};

pub struct ScheduleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ScheduleRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Lägg till lektionstid
    pub fn create(&self, schedule: &mut Schedule) -> Result<i64> {
        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT INTO schedule (subject, day, start_time, end_time) VALUES (?1, ?2, ?3, ?4)",
            params![
                schedule.subject,
                schedule.day,
                schedule.start_time,
                schedule.end_time,
            ],
        )?;

        let id = conn.last_insert_rowid();
        schedule.id = Some(id);
        Ok(id)
    }

    /// Hämta hela schemat
    pub fn find_all(&self) -> Result<Vec<Schedule>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT id, subject, day, start_time, end_time FROM schedule ORDER BY id",
        )?;

        let schedules = stmt
            .query_map([], Self::row_to_schedule)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(schedules)
    }

    /// Hämta schemat grupperat måndag-söndag
    pub fn find_all_grouped(&self) -> Result<Vec<(Weekday, Vec<Schedule>)>> {
        let schedules = self.find_all()?;
        Ok(group_by_day(&schedules))
    }

    /// Ta bort lektionstid. Returnerar false om den inte fanns.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let conn = lock(&self.conn)?;
        let rows = conn.execute("DELETE FROM schedule WHERE id = ?", [id])?;
        Ok(rows > 0)
    }

    fn row_to_schedule(row: &Row) -> rusqlite::Result<Schedule> {
        Ok(Schedule {
            id: row.get(0)?,
            subject: row.get(1)?,
            day: row.get(2)?,
            start_time: row.get(3)?,
            end_time: row.get(4)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_create_group_delete() {
        let db = Database::open_in_memory().unwrap();
        let repo = db.schedules();

        let mut math = Schedule::new(
            "Math".into(),
            Weekday::Wednesday,
            "9:00 AM".into(),
            "10:30 AM".into(),
        );
        let math_id = repo.create(&mut math).unwrap();
        let mut art = Schedule::new("Art".into(), Weekday::Monday, "1:00 PM".into(), "2:00 PM".into());
        repo.create(&mut art).unwrap();

        let all = repo.find_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].day, Weekday::Wednesday);

        let grouped = repo.find_all_grouped().unwrap();
        assert_eq!(grouped[0].1[0].subject, "Art");
        assert_eq!(grouped[2].1[0].subject, "Math");

        assert!(repo.delete(math_id).unwrap());
        assert!(!repo.delete(math_id).unwrap());
        assert_eq!(repo.find_all().unwrap().len(), 1);
    }

    #[test]
    fn test_day_stored_as_name() {
        let db = Database::open_in_memory().unwrap();
        let mut s = Schedule::new("Bio".into(), Weekday::Sunday, "8:00 AM".into(), "9:00 AM".into());
        db.schedules().create(&mut s).unwrap();

        let day: String = db
            .with_connection(|conn| Ok(conn.query_row("SELECT day FROM schedule", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(day, "Sunday");
    }
}
