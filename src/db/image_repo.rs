use anyhow::Result;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::sync::{Arc, Mutex};
use tracing::info;

use super::lock;
use crate::models::Image;
use crate::utils::file_ops::{remove_files_best_effort, CleanupReport, FileStore};
use crate::utils::path::{strip_file_scheme, with_file_scheme};

pub struct ImageRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ImageRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Lägg till en rad per URI för ett ämne.
    /// URI:er lagras utan file://-prefix. Alla rader eller ingen.
    pub fn add_many(&self, subject_id: i64, uris: &[String]) -> Result<Vec<i64>> {
        let mut conn = lock(&self.conn)?;
        let tx = conn.transaction()?;
        let mut ids = Vec::with_capacity(uris.len());

        {
            let mut stmt =
                tx.prepare("INSERT INTO image (subject_id, image_uri) VALUES (?1, ?2)")?;
            for uri in uris {
                stmt.execute(params![subject_id, strip_file_scheme(uri)])?;
                ids.push(tx.last_insert_rowid());
            }
        }

        tx.commit()?;
        info!("Lade till {} bilder för ämne {}", ids.len(), subject_id);

        Ok(ids)
    }

    /// Hämta bild via ID
    pub fn find_by_id(&self, id: i64) -> Result<Option<Image>> {
        let conn = lock(&self.conn)?;
        let mut stmt =
            conn.prepare("SELECT id, subject_id, image_uri FROM image WHERE id = ?")?;

        let mut rows = stmt.query_map([id], Self::row_to_image)?;
        let image = rows.next().transpose()?;
        Ok(image)
    }

    /// Hämta alla bilder för ett ämne, nyaste först
    pub fn find_by_subject(&self, subject_id: i64) -> Result<Vec<Image>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT id, subject_id, image_uri FROM image
             WHERE subject_id = ?
             ORDER BY id DESC",
        )?;

        let images = stmt
            .query_map([subject_id], Self::row_to_image)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(images)
    }

    /// Räkna bilder för ett ämne
    pub fn count_by_subject(&self, subject_id: i64) -> Result<i64> {
        let conn = lock(&self.conn)?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM image WHERE subject_id = ?",
            [subject_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Ta bort bilder via URI och därefter deras filer.
    ///
    /// URI:erna normaliseras (file:// tas bort) och matchas mot både den
    /// normaliserade och den prefixade formen, eftersom äldre rader kan ha
    /// sparats med prefix. Filer tas bara bort för URI:er som hade en rad,
    /// och borttagningen försöker båda varianterna.
    pub fn delete_by_uris(&self, uris: &[String], files: &dyn FileStore) -> Result<CleanupReport> {
        let mut report = CleanupReport::default();

        let mut normalized: Vec<String> = uris
            .iter()
            .map(|u| strip_file_scheme(u).to_string())
            .collect();
        normalized.sort();
        normalized.dedup();

        if normalized.is_empty() {
            return Ok(report);
        }

        let candidates: Vec<String> = normalized
            .iter()
            .cloned()
            .chain(normalized.iter().map(|u| with_file_scheme(u)))
            .collect();
        let placeholders = vec!["?"; candidates.len()].join(",");

        let mut tracked: Vec<String> = {
            let mut conn = lock(&self.conn)?;
            let tx = conn.transaction()?;

            let found: Vec<String> = {
                let mut stmt = tx.prepare(&format!(
                    "SELECT image_uri FROM image WHERE image_uri IN ({})",
                    placeholders
                ))?;
                let rows = stmt.query_map(params_from_iter(candidates.iter()), |row| row.get(0))?;
                rows.collect::<rusqlite::Result<Vec<String>>>()?
            };

            report.rows_deleted = tx.execute(
                &format!("DELETE FROM image WHERE image_uri IN ({})", placeholders),
                params_from_iter(candidates.iter()),
            )?;
            tx.commit()?;

            found
                .iter()
                .map(|u| strip_file_scheme(u).to_string())
                .collect()
        };
        tracked.sort();
        tracked.dedup();

        for path in &tracked {
            remove_files_best_effort(files, [path.clone(), with_file_scheme(path)], &mut report);
        }

        info!(
            "Tog bort {} bildrader ({} varningar)",
            report.rows_deleted,
            report.warnings.len()
        );

        Ok(report)
    }

    fn row_to_image(row: &Row) -> rusqlite::Result<Image> {
        Ok(Image {
            id: row.get(0)?,
            subject_id: row.get(1)?,
            image_uri: row.get(2)?,
        })
    }
}
