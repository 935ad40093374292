use std::path::PathBuf;

pub const FILE_SCHEME: &str = "file://";

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("se", "studylib", "Studylib")
}

/// Hämta datakatalog
pub fn get_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./data"))
}

/// Hämta databassökväg
pub fn get_database_path() -> PathBuf {
    get_data_dir().join("studylib.db")
}

/// Hämta konfigurationssökväg
pub fn get_config_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().join("settings.toml"))
        .unwrap_or_else(|| PathBuf::from("settings.toml"))
}

/// Ta bort ett inledande file://-prefix
pub fn strip_file_scheme(uri: &str) -> &str {
    uri.strip_prefix(FILE_SCHEME).unwrap_or(uri)
}

/// Lägg till file://-prefix om det saknas
pub fn with_file_scheme(uri: &str) -> String {
    format!("{}{}", FILE_SCHEME, strip_file_scheme(uri))
}

/// Skapa en säker filnamn från en sträng
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_scheme() {
        assert_eq!(strip_file_scheme("file:///tmp/a.jpg"), "/tmp/a.jpg");
        assert_eq!(strip_file_scheme("/tmp/a.jpg"), "/tmp/a.jpg");
        assert_eq!(with_file_scheme("/tmp/a.jpg"), "file:///tmp/a.jpg");
        assert_eq!(with_file_scheme("file:///tmp/a.jpg"), "file:///tmp/a.jpg");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("hello world"), "hello world");
        assert_eq!(sanitize_filename("hello/world"), "hello_world");
        assert_eq!(sanitize_filename("file:name"), "file_name");
        assert_eq!(sanitize_filename("test<>file"), "test__file");
    }
}
