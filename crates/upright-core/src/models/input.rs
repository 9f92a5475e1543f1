use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::UprightError;

/// Extensions recognised as JPEG during directory expansion
pub const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Input path, tagged once as file or directory before a batch starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum PathRef {
    File(PathBuf),
    Directory(PathBuf),
}

impl PathRef {
    /// Classify a user-supplied path by inspecting the filesystem.
    ///
    /// Fails when the path does not exist or is neither a regular file nor a
    /// directory. This is the only startup-level validation of inputs.
    pub fn classify(path: impl Into<PathBuf>) -> Result<Self, UprightError> {
        let path = path.into();
        let metadata = std::fs::metadata(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => UprightError::NotFound(path.clone()),
            _ => UprightError::InvalidInput(format!("{}: {}", path.display(), e)),
        })?;

        if metadata.is_dir() {
            Ok(PathRef::Directory(path))
        } else if metadata.is_file() {
            Ok(PathRef::File(path))
        } else {
            Err(UprightError::InvalidInput(format!(
                "{} is neither a file nor a directory",
                path.display()
            )))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            PathRef::File(path) | PathRef::Directory(path) => path,
        }
    }
}

/// Case policy for the `.jpg`/`.jpeg` match during directory expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtensionMatch {
    #[default]
    CaseInsensitive,
    /// Lowercase extensions only
    CaseSensitive,
}

impl ExtensionMatch {
    pub fn parse(s: &str) -> Result<Self, UprightError> {
        match s.to_lowercase().as_str() {
            "case-insensitive" | "insensitive" => Ok(ExtensionMatch::CaseInsensitive),
            "case-sensitive" | "sensitive" => Ok(ExtensionMatch::CaseSensitive),
            _ => Err(UprightError::Config(format!(
                "Invalid extension match: {}",
                s
            ))),
        }
    }

    /// Whether `path` carries a JPEG extension under this policy
    pub fn is_jpeg(self, path: &Path) -> bool {
        let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };

        match self {
            ExtensionMatch::CaseInsensitive => JPEG_EXTENSIONS
                .iter()
                .any(|ext| extension.eq_ignore_ascii_case(ext)),
            ExtensionMatch::CaseSensitive => JPEG_EXTENSIONS.contains(&extension),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_file_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.jpg");
        std::fs::write(&file, b"x").unwrap();

        assert_eq!(
            PathRef::classify(dir.path()).unwrap(),
            PathRef::Directory(dir.path().to_path_buf())
        );
        assert_eq!(PathRef::classify(&file).unwrap(), PathRef::File(file));
    }

    #[test]
    fn test_classify_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.jpg");

        match PathRef::classify(&missing) {
            Err(UprightError::NotFound(path)) => assert_eq!(path, missing),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_extension_match_case_insensitive() {
        let policy = ExtensionMatch::CaseInsensitive;
        assert!(policy.is_jpeg(Path::new("a.jpg")));
        assert!(policy.is_jpeg(Path::new("b.JPEG")));
        assert!(policy.is_jpeg(Path::new("c.JpG")));
        assert!(!policy.is_jpeg(Path::new("d.png")));
        assert!(!policy.is_jpeg(Path::new("jpg")));
        assert!(!policy.is_jpeg(Path::new("e.jpg.bak")));
    }

    #[test]
    fn test_extension_match_case_sensitive() {
        let policy = ExtensionMatch::CaseSensitive;
        assert!(policy.is_jpeg(Path::new("a.jpg")));
        assert!(policy.is_jpeg(Path::new("a.jpeg")));
        assert!(!policy.is_jpeg(Path::new("b.JPEG")));
        assert!(!policy.is_jpeg(Path::new("b.Jpg")));
    }

    #[test]
    fn test_extension_match_parse() {
        assert_eq!(
            ExtensionMatch::parse("Case-Sensitive").unwrap(),
            ExtensionMatch::CaseSensitive
        );
        assert_eq!(
            ExtensionMatch::parse("insensitive").unwrap(),
            ExtensionMatch::CaseInsensitive
        );
        assert!(ExtensionMatch::parse("sometimes").is_err());
    }
}
