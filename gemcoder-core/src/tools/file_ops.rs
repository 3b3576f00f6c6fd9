//! File and directory tools

use super::types::{PathArgs, WriteArgs};
use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Resolve a model-supplied path: absolute paths are kept, relative ones join `root`
pub fn resolve_path(root: &Path, raw: &str) -> PathBuf {
    let candidate = Path::new(raw.trim());
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        root.join(candidate)
    }
}

/// File operations rooted at the process working directory
#[derive(Debug, Clone)]
pub struct FileOpsTool {
    workspace_root: PathBuf,
}

impl FileOpsTool {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self { workspace_root }
    }

    fn resolve(&self, raw: &str) -> PathBuf {
        resolve_path(&self.workspace_root, raw)
    }

    /// Create (or overwrite) a file, creating parent directories
    pub async fn create_file(&self, args: &WriteArgs) -> Result<String> {
        let path = self.resolve(&args.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create directories for {}", path.display())
            })?;
        }
        fs::write(&path, args.content.as_bytes())
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(path = %path.display(), bytes = args.content.len(), "created file");
        Ok(format!(
            "Created file {} ({} bytes)",
            path.display(),
            args.content.len()
        ))
    }

    pub async fn create_directory(&self, args: &PathArgs) -> Result<String> {
        let path = self.resolve(&args.path);
        fs::create_dir_all(&path)
            .await
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
        Ok(format!("Created directory {}", path.display()))
    }

    pub async fn read_file(&self, args: &PathArgs) -> Result<String> {
        let path = self.resolve(&args.path);
        let bytes = fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        String::from_utf8(bytes)
            .map_err(|_| anyhow!("{} is not a UTF-8 text file", path.display()))
    }

    /// Replace the content of an existing file
    pub async fn update_file(&self, args: &WriteArgs) -> Result<String> {
        let path = self.resolve(&args.path);
        let metadata = fs::metadata(&path)
            .await
            .with_context(|| format!("Cannot update {}", path.display()))?;
        if !metadata.is_file() {
            return Err(anyhow!("{} is not a regular file", path.display()));
        }
        fs::write(&path, args.content.as_bytes())
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(format!(
            "Updated file {} ({} bytes)",
            path.display(),
            args.content.len()
        ))
    }

    pub async fn delete_file(&self, args: &PathArgs) -> Result<String> {
        let path = self.resolve(&args.path);
        fs::remove_file(&path)
            .await
            .with_context(|| format!("Failed to delete {}", path.display()))?;
        Ok(format!("Deleted file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn absolute_paths_are_not_rebased() {
        let root = Path::new("/work");
        assert_eq!(resolve_path(root, "src/lib.rs"), PathBuf::from("/work/src/lib.rs"));
        assert_eq!(resolve_path(root, "/tmp/x"), PathBuf::from("/tmp/x"));
    }

    #[tokio::test]
    async fn create_read_update_delete_cycle() -> Result<()> {
        let dir = TempDir::new()?;
        let tool = FileOpsTool::new(dir.path().to_path_buf());
        let write = WriteArgs {
            path: "nested/notes.txt".into(),
            content: "hello".into(),
        };

        tool.create_file(&write).await?;
        let path = PathArgs {
            path: "nested/notes.txt".into(),
        };
        assert_eq!(tool.read_file(&path).await?, "hello");

        tool.update_file(&WriteArgs {
            path: "nested/notes.txt".into(),
            content: "bye".into(),
        })
        .await?;
        assert_eq!(tool.read_file(&path).await?, "bye");

        tool.delete_file(&path).await?;
        assert!(!dir.path().join("nested/notes.txt").exists());
        Ok(())
    }

    #[tokio::test]
    async fn update_requires_existing_file() -> Result<()> {
        let dir = TempDir::new()?;
        let tool = FileOpsTool::new(dir.path().to_path_buf());
        let err = tool
            .update_file(&WriteArgs {
                path: "missing.txt".into(),
                content: "x".into(),
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("missing.txt"));
        Ok(())
    }
}
