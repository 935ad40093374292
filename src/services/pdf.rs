//! PDF-hantering: bilder till PDF och en enkel filhanterare för PDF-katalogen

use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::utils::file_ops::{delete_file, ensure_directory, list_files_with_extension, move_file};
use crate::utils::path::{sanitize_filename, with_file_scheme};
use crate::utils::{AppError, AppResult};

const NAME_EXISTS: &str = "A file with this name already exists.";

/// Omvandlar HTML till en PDF-fil. Plattformsberoende, därför en trait.
pub trait PdfConverter {
    /// Skriv PDF till `target` och returnera den faktiska sökvägen
    fn convert(&self, html: &str, target: &Path) -> anyhow::Result<PathBuf>;
}

/// Namn för en PDF utan eget namn, t.ex. "pdf_1718000000000.pdf"
pub fn unique_pdf_name() -> String {
    format!("pdf_{}.pdf", Utc::now().timestamp_millis())
}

/// Standardnamn för en ny PDF från galleriet
pub fn unique_document_name() -> String {
    format!("document_{}", Utc::now().timestamp_millis())
}

/// HTML med en sida per bild
pub fn build_images_html<S: AsRef<str>>(uris: &[S]) -> String {
    let mut html = String::from(
        "<html><head><style>\
         body { margin: 0; padding: 0; }\
         .page { page-break-after: always; display: flex; justify-content: center; \
         align-items: center; height: 100vh; }\
         img { max-width: 100%; max-height: 100%; }\
         </style></head><body>",
    );

    for uri in uris {
        html.push_str(&format!(
            "<div class=\"page\"><img src=\"{}\" /></div>",
            with_file_scheme(uri.as_ref())
        ));
    }

    html.push_str("</body></html>");
    html
}

/// En PDF i katalogen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFile {
    pub name: String,
    pub path: PathBuf,
}

/// PDF-katalogen
pub struct PdfLibrary {
    dir: PathBuf,
}

impl PdfLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Alla PDF:er sorterade på namn. Katalogen skapas om den saknas.
    pub fn list(&self) -> anyhow::Result<Vec<PdfFile>> {
        ensure_directory(&self.dir)?;

        let files = list_files_with_extension(&self.dir, "pdf")?
            .into_iter()
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                Some(PdfFile { name, path })
            })
            .collect();

        Ok(files)
    }

    /// Sök på del av filnamnet, skiftlägesokänsligt
    pub fn search(&self, query: &str) -> anyhow::Result<Vec<PdfFile>> {
        let query = query.trim().to_lowercase();
        let mut files = self.list()?;
        if !query.is_empty() {
            files.retain(|f| f.name.to_lowercase().contains(&query));
        }
        Ok(files)
    }

    pub fn delete(&self, name: &str) -> AppResult<()> {
        let path = self.dir.join(name);
        if !path.is_file() {
            return Err(AppError::not_found(name.to_string()));
        }

        delete_file(&path).map_err(|e| AppError::other(format!("{:#}", e)))?;
        info!("Tog bort PDF: {}", name);
        Ok(())
    }

    /// Byt namn. ".pdf" läggs till; tomt namn ger ett genererat namn.
    pub fn rename(&self, name: &str, new_name: &str) -> AppResult<PathBuf> {
        let source = self.dir.join(name);
        if !source.is_file() {
            return Err(AppError::not_found(name.to_string()));
        }

        let trimmed = sanitize_filename(new_name);
        let final_name = if trimmed.is_empty() {
            unique_pdf_name()
        } else {
            format!("{}.pdf", trimmed)
        };

        let target = self.dir.join(&final_name);
        if target.exists() {
            return Err(AppError::already_exists(NAME_EXISTS));
        }

        move_file(&source, &target).map_err(|e| AppError::other(format!("{:#}", e)))?;
        info!("Bytte namn på {} till {}", name, final_name);
        Ok(target)
    }

    /// Skapa en PDF av bilderna med givet namn (utan ändelse)
    pub fn export_images<S: AsRef<str>>(
        &self,
        converter: &dyn PdfConverter,
        uris: &[S],
        name: &str,
    ) -> AppResult<PathBuf> {
        if uris.is_empty() {
            return Err(AppError::other("Inga bilder valda"));
        }

        ensure_directory(&self.dir).map_err(|e| AppError::other(format!("{:#}", e)))?;

        let trimmed = sanitize_filename(name);
        let stem = if trimmed.is_empty() {
            unique_document_name()
        } else {
            trimmed
        };

        let target = self.dir.join(format!("{}.pdf", stem));
        if target.exists() {
            return Err(AppError::already_exists(NAME_EXISTS));
        }

        let html = build_images_html(uris);
        let path = converter
            .convert(&html, &target)
            .map_err(|e| AppError::other(format!("PDF-konvertering misslyckades: {:#}", e)))?;

        info!("Skapade PDF med {} bilder: {:?}", uris.len(), path);
        Ok(path)
    }
}
