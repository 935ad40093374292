//! Bildgalleri per ämne: inläsning av skannade sidor, borttagning och kopiering

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;
use tracing::info;

use crate::db::Database;
use crate::utils::file_ops::{unique_filename, CleanupReport, FileStore};
use crate::utils::path::{strip_file_scheme, with_file_scheme};

pub struct GalleryService<'a> {
    db: &'a Database,
    files: &'a dyn FileStore,
}

impl<'a> GalleryService<'a> {
    pub fn new(db: &'a Database, files: &'a dyn FileStore) -> Self {
        Self { db, files }
    }

    /// Spara skannade sidor på ett ämne
    pub fn import_scans(&self, subject_id: i64, uris: &[String]) -> Result<Vec<i64>> {
        if uris.is_empty() {
            return Ok(Vec::new());
        }
        self.db.images().add_many(subject_id, uris)
    }

    /// Ämnets bilder som visningsbara file://-URI:er, nyaste först
    pub fn display_uris(&self, subject_id: i64) -> Result<Vec<String>> {
        let images = self.db.images().find_by_subject(subject_id)?;
        Ok(images.iter().map(|img| img.file_uri()).collect())
    }

    /// Ta bort markerade bilder, både rader och filer
    pub fn delete_selected(&self, uris: &[String]) -> Result<CleanupReport> {
        self.db.images().delete_by_uris(uris, self.files)
    }

    /// Kopiera bilder till en katalog med bibehållna filnamn
    pub fn copy_to_folder(&self, uris: &[String], dir: &Path) -> Result<Vec<String>> {
        let dir_str = dir.to_string_lossy();
        self.files.make_dir(&dir_str)?;

        let mut copied = Vec::with_capacity(uris.len());
        for (i, uri) in uris.iter().enumerate() {
            let source = strip_file_scheme(uri);
            let file_name = Path::new(source)
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .unwrap_or_else(|| format!("image_{}.jpg", i));

            // Skriv aldrig över en befintlig fil i målkatalogen
            let file_name = unique_filename(self.files, dir, &file_name);
            let dest = dir.join(&file_name).to_string_lossy().to_string();
            self.files
                .copy(source, &dest)
                .with_context(|| format!("Kunde inte kopiera {}", source))?;
            copied.push(dest);
        }

        info!("Kopierade {} bilder till {:?}", copied.len(), dir);
        Ok(copied)
    }

    /// Tillfälliga kopior för delning, returneras som file://-URI:er
    pub fn share_copies(&self, uris: &[String], cache_dir: &Path) -> Result<Vec<String>> {
        let stamp = Utc::now().timestamp_millis();
        let mut shared = Vec::with_capacity(uris.len());

        for (i, uri) in uris.iter().enumerate() {
            let dest = cache_dir
                .join(format!("shared_image_{}_{}.jpg", stamp, i))
                .to_string_lossy()
                .to_string();
            self.files.copy(strip_file_scheme(uri), &dest)?;
            shared.push(with_file_scheme(&dest));
        }

        Ok(shared)
    }
}
