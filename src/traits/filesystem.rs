use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Trait for filesystem reads to enable testing with mocks
pub trait FileSystem: Send + Sync {
    /// Read file contents as string
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Check if path is a file
    fn is_file(&self, path: &Path) -> bool;

    /// Check if path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Absolute form of an existing path
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;
}

/// Real filesystem implementation using std::fs
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        std::fs::canonicalize(path).with_context(|| format!("Failed to resolve path: {:?}", path))
    }
}

/// Mock filesystem implementation for testing (in-memory)
#[cfg(test)]
pub struct MockFileSystem {
    files: std::sync::RwLock<std::collections::HashMap<PathBuf, String>>,
    current_dir: std::sync::RwLock<PathBuf>,
}

#[cfg(test)]
impl MockFileSystem {
    /// Create new empty mock filesystem
    pub fn new() -> Self {
        Self {
            files: std::sync::RwLock::new(std::collections::HashMap::new()),
            current_dir: std::sync::RwLock::new(PathBuf::from("/")),
        }
    }

    /// Directory relative paths are resolved against
    pub fn set_current_dir(&self, dir: &Path) {
        *self.current_dir.write().unwrap() = dir.to_path_buf();
    }

    /// Seed a file; its parent directories exist implicitly
    pub fn add_file(&self, path: &Path, contents: &str) {
        self.files
            .write()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_string());
    }
}

#[cfg(test)]
impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .with_context(|| format!("File not found in mock filesystem: {:?}", path))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files
            .read()
            .unwrap()
            .keys()
            .any(|file| file.starts_with(path) && file != path)
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        let mut resolved = self.current_dir.read().unwrap().clone();
        for component in path.components() {
            match component {
                std::path::Component::ParentDir => {
                    resolved.pop();
                }
                std::path::Component::CurDir => {}
                other => resolved.push(other),
            }
        }

        if !self.is_file(&resolved) && !self.is_dir(&resolved) {
            anyhow::bail!("Path not found in mock filesystem: {:?}", path);
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_filesystem_directories_follow_files() {
        let fs = MockFileSystem::new();
        fs.add_file(Path::new("/stacks/dev/stack.yaml"), "name: dev\n");

        assert!(fs.is_file(Path::new("/stacks/dev/stack.yaml")));
        assert!(fs.is_dir(Path::new("/stacks/dev")));
        assert!(fs.is_dir(Path::new("/stacks")));
        assert!(!fs.is_dir(Path::new("/stacks/dev/stack.yaml")));
        assert_eq!(
            fs.read_to_string(Path::new("/stacks/dev/stack.yaml")).unwrap(),
            "name: dev\n"
        );
        assert!(fs.read_to_string(Path::new("/stacks/prod/stack.yaml")).is_err());
    }

    #[test]
    fn test_mock_filesystem_canonicalize_against_current_dir() {
        let fs = MockFileSystem::new();
        fs.add_file(Path::new("/stacks/dev/stack.yaml"), "name: dev\n");
        fs.set_current_dir(Path::new("/stacks/prod"));

        assert_eq!(
            fs.canonicalize(Path::new("../dev")).unwrap(),
            PathBuf::from("/stacks/dev")
        );
        assert_eq!(
            fs.canonicalize(Path::new("/stacks/./dev")).unwrap(),
            PathBuf::from("/stacks/dev")
        );
        assert!(fs.canonicalize(Path::new("missing")).is_err());
    }
}
