pub mod schema;
pub mod migrations;
pub mod subject_repo;
pub mod image_repo;
pub mod mark_repo;
pub mod grading_repo;
pub mod schedule_repo;

use anyhow::{anyhow, Result};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

pub use subject_repo::SubjectRepository;
pub use image_repo::ImageRepository;
pub use mark_repo::MarkRepository;
pub use grading_repo::GradingScaleRepository;
pub use schedule_repo::ScheduleRepository;

/// Databashandtag som skickas till varje operation.
/// Öppnas en gång vid start; kloner delar samma anslutning.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Öppna eller skapa databas
    pub fn open(path: &Path) -> Result<Self> {
        // Skapa katalog om den inte finns
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Konfigurera SQLite
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 5000;
            "
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Öppna in-memory databas (för tester)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.ensure_schema()?;
        Ok(db)
    }

    /// Skapa tabeller som saknas och kör migrationer
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = lock(&self.conn)?;
        migrations::run_migrations(&conn)
    }

    /// Hämta ämnes-repository
    pub fn subjects(&self) -> SubjectRepository {
        SubjectRepository::new(Arc::clone(&self.conn))
    }

    /// Hämta bild-repository
    pub fn images(&self) -> ImageRepository {
        ImageRepository::new(Arc::clone(&self.conn))
    }

    /// Hämta resultat-repository
    pub fn marks(&self) -> MarkRepository {
        MarkRepository::new(Arc::clone(&self.conn))
    }

    /// Hämta betygsskale-repository
    pub fn grading_scales(&self) -> GradingScaleRepository {
        GradingScaleRepository::new(Arc::clone(&self.conn))
    }

    /// Hämta schema-repository
    pub fn schedules(&self) -> ScheduleRepository {
        ScheduleRepository::new(Arc::clone(&self.conn))
    }

    /// Direkt tillgång till connection (för avancerade operationer)
    pub fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = lock(&self.conn)?;
        f(&conn)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}

/// Lås anslutningen; ett förgiftat lås rapporteras som fel
pub(crate) fn lock(conn: &Arc<Mutex<Connection>>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| anyhow!("Databasanslutningen är låst av en tråd som kraschat"))
}
