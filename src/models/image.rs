use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::path::{strip_file_scheme, with_file_scheme};

/// Skannad sida som hör till ett ämne
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: Option<i64>,
    pub subject_id: i64,
    /// Sökväg utan file://-prefix
    pub image_uri: String,
}

impl Image {
    pub fn new(subject_id: i64, image_uri: &str) -> Self {
        Self {
            id: None,
            subject_id,
            image_uri: strip_file_scheme(image_uri).to_string(),
        }
    }

    /// URI med file://-prefix, för visning och delning
    pub fn file_uri(&self) -> String {
        with_file_scheme(&self.image_uri)
    }

    pub fn path(&self) -> PathBuf {
        PathBuf::from(strip_file_scheme(&self.image_uri))
    }

    pub fn file_name(&self) -> Option<String> {
        self.path()
            .file_name()
            .and_then(|n| n.to_str())
            .map(|s| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_strips_scheme() {
        let image = Image::new(1, "file:///data/scans/page1.jpg");
        assert_eq!(image.image_uri, "/data/scans/page1.jpg");
        assert_eq!(image.file_uri(), "file:///data/scans/page1.jpg");
        assert_eq!(image.file_name().as_deref(), Some("page1.jpg"));
    }
}
