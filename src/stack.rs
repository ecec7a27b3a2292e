use crate::traits::FileSystem;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File that marks a directory as a Kusion stack
pub const STACK_FILE: &str = "stack.yaml";

/// A deployable stack: the preview tool runs inside `root` against `name`
#[derive(Debug, Clone, PartialEq)]
pub struct Stack {
    pub name: String,
    pub root: PathBuf,
}

/// The parts of `stack.yaml` this crate reads
#[derive(Debug, Deserialize)]
struct StackFile {
    name: String,
}

impl Stack {
    pub fn new(name: &str, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            root: root.into(),
        }
    }

    /// Load the stack rooted at `dir`
    ///
    /// An explicit `name` wins over the one declared in `stack.yaml`; without
    /// it the file must exist.
    pub fn from_dir(fs: &dyn FileSystem, dir: &Path, name: Option<&str>) -> Result<Self> {
        if !fs.is_dir(dir) {
            anyhow::bail!("Stack directory {:?} does not exist", dir);
        }

        if let Some(name) = name {
            return Ok(Self::new(name, dir));
        }

        let stack_file = dir.join(STACK_FILE);
        if !fs.is_file(&stack_file) {
            anyhow::bail!(
                "No {} found in {:?}. Is this a Kusion stack? Pass --name to override",
                STACK_FILE,
                dir
            );
        }

        let content = fs.read_to_string(&stack_file)?;
        let parsed: StackFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", stack_file))?;

        if parsed.name.trim().is_empty() {
            anyhow::bail!("{:?} declares an empty stack name", stack_file);
        }

        Ok(Self::new(parsed.name.trim(), dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockFileSystem;

    #[test]
    fn test_from_dir_reads_stack_file() {
        let fs = MockFileSystem::new();
        fs.add_file(
            Path::new("/work/demo/dev/stack.yaml"),
            "# The stack name\nname: dev\nextra: ignored\n",
        );

        let stack = Stack::from_dir(&fs, Path::new("/work/demo/dev"), None).unwrap();
        assert_eq!(stack, Stack::new("dev", "/work/demo/dev"));
    }

    #[test]
    fn test_from_dir_name_override() {
        let fs = MockFileSystem::new();
        fs.add_file(Path::new("/work/demo/dev/main.k"), "");

        let stack = Stack::from_dir(&fs, Path::new("/work/demo/dev"), Some("prod")).unwrap();
        assert_eq!(stack.name, "prod");
        assert_eq!(stack.root, PathBuf::from("/work/demo/dev"));
    }

    #[test]
    fn test_from_dir_without_stack_file() {
        let fs = MockFileSystem::new();
        fs.add_file(Path::new("/work/demo/dev/main.k"), "");

        let err = Stack::from_dir(&fs, Path::new("/work/demo/dev"), None).unwrap_err();
        assert!(err.to_string().contains("No stack.yaml found"));
    }

    #[test]
    fn test_from_dir_missing_directory() {
        let fs = MockFileSystem::new();
        assert!(Stack::from_dir(&fs, Path::new("/nowhere"), Some("dev")).is_err());
    }

    #[test]
    fn test_from_dir_rejects_empty_name() {
        let fs = MockFileSystem::new();
        fs.add_file(Path::new("/work/dev/stack.yaml"), "name: \"  \"\n");

        assert!(Stack::from_dir(&fs, Path::new("/work/dev"), None).is_err());
    }
}
