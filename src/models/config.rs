use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::path::{get_config_path, get_data_dir};

/// Applikationsinställningar, sparas som TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub database_path: PathBuf,
    /// Katalog dit bilder kopieras vid export från galleriet
    pub images_directory: PathBuf,
    /// Katalog för genererade PDF:er
    pub pdf_directory: PathBuf,
    /// trace, debug, info, warn eller error
    pub log_level: String,
    /// Påminnelse så här många minuter före lektionsstart
    pub reminder_lead_minutes: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        let data_dir = get_data_dir();

        Self {
            database_path: data_dir.join("studylib.db"),
            images_directory: data_dir.join("Images"),
            pdf_directory: data_dir.join("PDFs"),
            log_level: "info".to_string(),
            reminder_lead_minutes: 0,
        }
    }
}

impl AppSettings {
    /// Ladda från standardsökvägen, defaults om filen saknas eller är trasig
    pub fn load() -> Self {
        Self::load_from(&get_config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if let Ok(content) = std::fs::read_to_string(path) {
            match toml::from_str(&content) {
                Ok(settings) => return settings,
                Err(e) => tracing::warn!("Kunde inte tolka {:?}: {}", path, e),
            }
        }

        Self::default()
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level
            .parse()
            .unwrap_or(tracing::Level::INFO)
    }

    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.images_directory)?;
        std::fs::create_dir_all(&self.pdf_directory)?;
        Ok(())
    }
}
