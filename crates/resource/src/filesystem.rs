//! Filesystem-based resource provider.
//!
//! Relative paths resolve against a base directory (the working directory by
//! default). Absolute paths are used as given, since they come from the
//! person running the composer rather than from document content.

use figura_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct FilesystemResourceProvider {
    base_path: PathBuf,
}

impl Default for FilesystemResourceProvider {
    fn default() -> Self {
        Self::new(".")
    }
}

impl FilesystemResourceProvider {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.base_path.join(candidate)
        }
    }
}

impl ResourceProvider for FilesystemResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        let full_path = self.resolve(path);
        log::debug!("Loading resource {}", full_path.display());

        std::fs::read(&full_path).map(Arc::new).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound(path.to_string())
            } else {
                ResourceError::LoadFailed {
                    path: path.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_relative_to_base() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("images")).unwrap();
        fs::write(dir.path().join("images/logo.png"), b"not really a png").unwrap();

        let provider = FilesystemResourceProvider::new(dir.path());
        assert!(provider.exists("images/logo.png"));
        let data = provider.load("images/logo.png").unwrap();
        assert_eq!(&*data, b"not really a png");
    }

    #[test]
    fn test_load_absolute_path() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("example.png");
        fs::write(&file, b"bytes").unwrap();

        let provider = FilesystemResourceProvider::new("/definitely/not/here");
        let data = provider.load(file.to_str().unwrap()).unwrap();
        assert_eq!(&*data, b"bytes");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let provider = FilesystemResourceProvider::new(dir.path());

        let result = provider.load("example.png");
        assert!(matches!(result, Err(ResourceError::NotFound(_))));
        assert!(!provider.exists("example.png"));
    }

    #[test]
    fn test_directory_is_not_a_resource() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        let provider = FilesystemResourceProvider::new(dir.path());

        assert!(!provider.exists("nested"));
        assert!(matches!(
            provider.load("nested"),
            Err(ResourceError::LoadFailed { .. })
        ));
    }
}
