use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

use super::schema::{CREATE_TABLES, SCHEMA_VERSION};

/// Säkerställ schemat och kör alla nödvändiga migrationer.
/// Säker att anropa vid varje start; befintlig data rörs inte.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current_version = get_current_version(conn)?;

    // Alla tabeller skapas med IF NOT EXISTS
    conn.execute_batch(CREATE_TABLES)?;

    if current_version == 0 {
        // Ny databas, eller en från mobilappen utan migrationshistorik
        info!("Skapar databas med schema version {}", SCHEMA_VERSION);
        initial_setup(conn)?;
    } else if current_version < SCHEMA_VERSION {
        info!(
            "Migrerar databas från version {} till {}",
            current_version, SCHEMA_VERSION
        );
        migrate_from(conn, current_version)?;
    } else {
        info!("Databas är uppdaterad (version {})", current_version);
    }

    Ok(())
}

pub(crate) fn get_current_version(conn: &Connection) -> Result<i32> {
    // Kontrollera om schema_migrations-tabellen finns
    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_migrations')",
        [],
        |row| row.get(0),
    )?;

    if !table_exists {
        return Ok(0);
    }

    // Hämta senaste version
    let version: Option<i32> = conn.query_row(
        "SELECT MAX(version) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    Ok(version.unwrap_or(0))
}

fn initial_setup(conn: &Connection) -> Result<()> {
    // Äldre databaser kan innehålla file://-prefix
    normalize_image_uris(conn)?;

    conn.execute(
        "INSERT INTO schema_migrations (version) VALUES (?)",
        [SCHEMA_VERSION],
    )?;

    info!("Initial setup klar");
    Ok(())
}

fn migrate_from(conn: &Connection, from_version: i32) -> Result<()> {
    // Kör migrationer stegvis
    for version in (from_version + 1)..=SCHEMA_VERSION {
        match version {
            2 => migrate_v1_to_v2(conn)?,
            _ => {}
        }

        // Markera version som migrerad
        conn.execute(
            "INSERT INTO schema_migrations (version) VALUES (?)",
            [version],
        )?;

        info!("Migrerade till version {}", version);
    }

    Ok(())
}

/// Migration v1 -> v2: Lagra bildsökvägar utan file://-prefix
fn migrate_v1_to_v2(conn: &Connection) -> Result<()> {
    info!("Migration v2: Normaliserar bildsökvägar");
    normalize_image_uris(conn)
}

/// Samma regel som strip_file_scheme: bara ett gement file:// tas bort
fn normalize_image_uris(conn: &Connection) -> Result<()> {
    let affected = conn.execute(
        "UPDATE image SET image_uri = substr(image_uri, 8)
         WHERE substr(image_uri, 1, 7) = 'file://'",
        [],
    )?;

    if affected > 0 {
        info!("Normaliserade {} bildsökvägar", affected);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::REQUIRED_TABLES;
    use rusqlite::Connection;

    fn table_names(conn: &Connection) -> Vec<String> {
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect()
    }

    #[test]
    fn test_initial_migration() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let tables = table_names(&conn);
        for table in REQUIRED_TABLES {
            assert!(tables.contains(&table.to_string()), "saknar {}", table);
        }
    }

    #[test]
    fn test_idempotent_migration() {
        let conn = Connection::open_in_memory().unwrap();

        run_migrations(&conn).unwrap();
        conn.execute("INSERT INTO subject (name) VALUES ('Math')", [])
            .unwrap();
        run_migrations(&conn).unwrap();

        let version = get_current_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);

        // Befintlig data finns kvar
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM subject", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_adopts_legacy_database() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE subject (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                teacher_name TEXT,
                abbreviation TEXT,
                semester TEXT,
                active_subject INTEGER,
                date TEXT
            );
            CREATE TABLE image (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                subject_id INTEGER NOT NULL,
                image_uri TEXT NOT NULL,
                FOREIGN KEY (subject_id) REFERENCES subject(id) ON DELETE CASCADE
            );
            INSERT INTO subject (name) VALUES ('Math');
            INSERT INTO image (subject_id, image_uri) VALUES (1, 'file:///scans/a.jpg');
            INSERT INTO image (subject_id, image_uri) VALUES (1, '/scans/b.jpg');",
        )
        .unwrap();

        run_migrations(&conn).unwrap();

        let uris: Vec<String> = conn
            .prepare("SELECT image_uri FROM image ORDER BY id")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();
        assert_eq!(uris, vec!["/scans/a.jpg", "/scans/b.jpg"]);
        assert!(table_names(&conn).contains(&"mark".to_string()));
    }

    #[test]
    fn test_migrates_from_v1() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(CREATE_TABLES).unwrap();
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])
            .unwrap();
        conn.execute("INSERT INTO subject (name) VALUES ('Bio')", [])
            .unwrap();
        conn.execute(
            "INSERT INTO image (subject_id, image_uri) VALUES (1, 'file:///x.jpg')",
            [],
        )
        .unwrap();

        run_migrations(&conn).unwrap();

        let uri: String = conn
            .query_row("SELECT image_uri FROM image", [], |row| row.get(0))
            .unwrap();
        assert_eq!(uri, "/x.jpg");
        assert_eq!(get_current_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_normalize_only_lowercase_scheme() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(CREATE_TABLES).unwrap();
        conn.execute_batch(
            "INSERT INTO subject (name) VALUES ('Bio');
             INSERT INTO image (subject_id, image_uri) VALUES (1, 'file:///a.jpg');
             INSERT INTO image (subject_id, image_uri) VALUES (1, 'FILE:///b.jpg');
             INSERT INTO image (subject_id, image_uri) VALUES (1, '/c.jpg');",
        )
        .unwrap();

        normalize_image_uris(&conn).unwrap();

        let uris: Vec<String> = conn
            .prepare("SELECT image_uri FROM image ORDER BY id")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();
        assert_eq!(uris, vec!["/a.jpg", "FILE:///b.jpg", "/c.jpg"]);
        assert_eq!(
            crate::utils::path::strip_file_scheme("FILE:///b.jpg"),
            "FILE:///b.jpg"
        );
    }
}
