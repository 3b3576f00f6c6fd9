//! Advisory project listing used to give the model context about a workspace

use crate::config::constants::scan;
use anyhow::{Result, anyhow};
use indexmap::IndexMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub max_files: usize,
    /// Files larger than this are listed but their content is skipped
    pub max_bytes_per_file: u64,
    pub include_contents: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_files: scan::DEFAULT_MAX_FILES,
            max_bytes_per_file: scan::DEFAULT_MAX_BYTES_PER_FILE,
            include_contents: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub relative_path: PathBuf,
    pub size: u64,
    pub content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProjectScan {
    pub root: PathBuf,
    pub files: Vec<ScannedFile>,
    pub extension_counts: IndexMap<String, usize>,
    /// More eligible files existed than `max_files`
    pub truncated: bool,
}

fn is_ignored(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    if entry.file_type().is_dir() {
        return scan::IGNORED_DIRS.contains(&name.as_ref());
    }
    name == ".env" || name.starts_with(".env.")
}

fn has_text_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| scan::TEXT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Walk `root`, skipping ignored directories and env files, keeping text sources only
pub fn scan_project(root: &Path, options: &ScanOptions) -> Result<ProjectScan> {
    if !root.is_dir() {
        return Err(anyhow!("{} is not a directory", root.display()));
    }

    let mut files = Vec::new();
    let mut extension_counts: IndexMap<String, usize> = IndexMap::new();
    let mut truncated = false;

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_ignored(entry))
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && has_text_extension(entry.path()));

    for entry in walker {
        if files.len() >= options.max_files {
            truncated = true;
            break;
        }

        let path = entry.path();
        let relative_path =
            pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf());
        let size = entry.metadata().map(|meta| meta.len()).unwrap_or(0);

        if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
            *extension_counts.entry(ext.to_ascii_lowercase()).or_insert(0) += 1;
        }

        let content = if options.include_contents && size <= options.max_bytes_per_file {
            fs::read_to_string(path).ok()
        } else {
            None
        };

        files.push(ScannedFile {
            relative_path,
            size,
            content,
        });
    }

    extension_counts.sort_by(|_, a, _, b| b.cmp(a));
    debug!(root = %root.display(), files = files.len(), truncated, "scanned project");

    Ok(ProjectScan {
        root: root.to_path_buf(),
        files,
        extension_counts,
        truncated,
    })
}

impl ProjectScan {
    /// Context block for a project-overview prompt
    pub fn render_prompt(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Project root: {}", self.root.display());
        let _ = writeln!(out, "Files ({}{}):", self.files.len(), if self.truncated { ", truncated" } else { "" });
        for file in &self.files {
            let _ = writeln!(out, "- {} ({} bytes)", file.relative_path.display(), file.size);
        }

        if !self.extension_counts.is_empty() {
            let summary: Vec<String> = self
                .extension_counts
                .iter()
                .map(|(ext, count)| format!("{ext}: {count}"))
                .collect();
            let _ = writeln!(out, "By extension: {}", summary.join(", "));
        }

        for file in &self.files {
            if let Some(content) = &file.content {
                let _ = writeln!(out, "\n--- {} ---", file.relative_path.display());
                let _ = writeln!(out, "{}", content.trim_end());
            }
        }
        out
    }
}
