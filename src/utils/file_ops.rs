//! Filoperationer för skannade bilder och PDF:er

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::path::strip_file_scheme;

/// Filsystemet så som databaslagret ser det.
/// Sökvägar får bära ett file://-prefix.
pub trait FileStore {
    fn exists(&self, path: &str) -> bool;

    /// Ta bort en fil. En fil som redan saknas är inget fel.
    fn delete(&self, path: &str) -> Result<()>;

    fn copy(&self, source: &str, dest: &str) -> Result<()>;

    fn make_dir(&self, path: &str) -> Result<()>;
}

/// FileStore mot det lokala filsystemet
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStore;

impl FileStore for LocalFileStore {
    fn exists(&self, path: &str) -> bool {
        Path::new(strip_file_scheme(path)).exists()
    }

    fn delete(&self, path: &str) -> Result<()> {
        delete_file(Path::new(strip_file_scheme(path)))
    }

    fn copy(&self, source: &str, dest: &str) -> Result<()> {
        let source = Path::new(strip_file_scheme(source));
        let dest = Path::new(strip_file_scheme(dest));

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::copy(source, dest)
            .with_context(|| format!("Kunde inte kopiera fil från {:?} till {:?}", source, dest))?;
        Ok(())
    }

    fn make_dir(&self, path: &str) -> Result<()> {
        ensure_directory(Path::new(strip_file_scheme(path)))
    }
}

/// Resultat av en städning där enskilda fel bara loggas
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Antal borttagna databasrader
    pub rows_deleted: usize,
    /// Filer som försökts tas bort
    pub files_attempted: usize,
    pub warnings: Vec<String>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn warn(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.warnings.push(message);
    }
}

/// Ta bort filer utan att avbryta vid fel; fel samlas i rapporten
pub fn remove_files_best_effort<S, I>(store: &dyn FileStore, paths: I, report: &mut CleanupReport)
where
    S: AsRef<str>,
    I: IntoIterator<Item = S>,
{
    for path in paths {
        let path = path.as_ref();
        report.files_attempted += 1;

        match store.delete(path) {
            Ok(()) => tracing::debug!("Tog bort fil: {}", path),
            Err(e) => report.warn(format!("Kunde inte ta bort {}: {:#}", path, e)),
        }
    }
}

/// Flytta en fil till ny plats
pub fn move_file(source: &Path, dest: &Path) -> Result<()> {
    // Skapa målkatalog om den inte finns
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    // Försök rename först (snabbast om samma filsystem)
    if fs::rename(source, dest).is_ok() {
        return Ok(());
    }

    // Om rename misslyckas (olika filsystem), kopiera och ta bort
    fs::copy(source, dest)?;
    fs::remove_file(source)?;

    Ok(())
}

/// Ta bort en fil
pub fn delete_file(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)
            .with_context(|| format!("Kunde inte ta bort fil: {:?}", path))?;
    }
    Ok(())
}

/// Lista filer direkt i en katalog med given filändelse, sorterade på namn
pub fn list_files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case(extension))
                .unwrap_or(false)
        })
        .collect();

    files.sort();
    Ok(files)
}

/// Generera unikt filnamn om filen redan finns i `dir`
pub fn unique_filename(store: &dyn FileStore, dir: &Path, filename: &str) -> String {
    let taken = |name: &str| store.exists(&dir.join(name).to_string_lossy());

    if !taken(filename) {
        return filename.to_string();
    }

    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);

    let extension = Path::new(filename)
        .extension()
        .and_then(|s| s.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();

    for i in 2..1000 {
        let new_name = format!("{}_{}{}", stem, i, extension);
        if !taken(&new_name) {
            return new_name;
        }
    }

    // Fallback med timestamp
    let timestamp = chrono::Utc::now().timestamp();
    format!("{}_{}{}", stem, timestamp, extension)
}

/// Säkerställ att en katalog finns
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Kunde inte skapa katalog: {:?}", path))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_local_store_delete_is_tolerant() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("scan.jpg");
        fs::write(&file, "x").unwrap();

        let store = LocalFileStore;
        let uri = format!("file://{}", file.display());
        assert!(store.exists(&uri));

        store.delete(&uri).unwrap();
        assert!(!file.exists());

        // Andra gången saknas filen
        store.delete(&uri).unwrap();
    }

    #[test]
    fn test_local_store_copy_and_make_dir() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.jpg");
        fs::write(&source, "bild").unwrap();

        let target_dir = dir.path().join("Images");
        let store = LocalFileStore;
        store.make_dir(target_dir.to_str().unwrap()).unwrap();

        let dest = target_dir.join("a.jpg");
        store
            .copy(source.to_str().unwrap(), dest.to_str().unwrap())
            .unwrap();
        assert_eq!(fs::read_to_string(dest).unwrap(), "bild");
    }

    #[test]
    fn test_remove_files_best_effort() {
        let dir = tempdir().unwrap();
        let present = dir.path().join("one.jpg");
        fs::write(&present, "").unwrap();
        // En katalog kan inte tas bort med remove_file
        let blocked = dir.path().join("blocked.jpg");
        fs::create_dir(&blocked).unwrap();
        let missing = dir.path().join("missing.jpg");

        let paths = [
            present.display().to_string(),
            blocked.display().to_string(),
            missing.display().to_string(),
        ];

        let mut report = CleanupReport::default();
        remove_files_best_effort(&LocalFileStore, &paths, &mut report);

        assert_eq!(report.files_attempted, 3);
        assert_eq!(report.warnings.len(), 1);
        assert!(!present.exists());
    }

    #[test]
    fn test_unique_filename() {
        let dir = tempdir().unwrap();

        let store = LocalFileStore;

        assert_eq!(unique_filename(&store, dir.path(), "test.pdf"), "test.pdf");
        fs::write(dir.path().join("test.pdf"), "").unwrap();
        assert_eq!(unique_filename(&store, dir.path(), "test.pdf"), "test_2.pdf");
    }

    #[test]
    fn test_list_files_with_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.pdf"), "").unwrap();
        fs::write(dir.path().join("a.PDF"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.pdf"), "").unwrap();

        let files = list_files_with_extension(dir.path(), "pdf").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }
}
