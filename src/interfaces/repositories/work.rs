use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::{
    entities::work_entry::RawWorkEntry,
    errors::{AppError, ContentError},
    repositories::content_repo::{FsWorkRepo, StaticWorkRepo},
    utils::{front_matter::parse_front_matter, markdown::is_markdown_path},
};

#[async_trait]
pub trait WorkRepository: Send + Sync {
    /// Returns every entry of the collection, unvalidated.
    async fn load_entries(&self) -> Result<Vec<RawWorkEntry>, AppError>;
}

impl FsWorkRepo {
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        FsWorkRepo { content_dir: content_dir.into() }
    }

    async fn markdown_files(&self) -> Result<Vec<PathBuf>, ContentError> {
        let dir = self.content_dir.display().to_string();
        let mut read_dir = fs::read_dir(&self.content_dir)
            .await
            .map_err(|e| ContentError::Io(dir.clone(), e.to_string()))?;

        let mut paths = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| ContentError::Io(dir.clone(), e.to_string()))?
        {
            let path = entry.path();
            let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            if is_file && is_markdown_path(&path) {
                paths.push(path);
            } else {
                tracing::debug!("Skipping non-markdown content path: {}", path.display());
            }
        }

        paths.sort();
        Ok(paths)
    }

    async fn read_entry(path: &Path) -> Result<RawWorkEntry, ContentError> {
        let source = path.display().to_string();
        let text = fs::read_to_string(path)
            .await
            .map_err(|e| ContentError::Io(source.clone(), e.to_string()))?;

        let (data, body) = parse_front_matter(&text)
            .map_err(|e| ContentError::MalformedFrontMatter(source.clone(), e.to_string()))?;

        let slug = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(slug::slugify)
            .unwrap_or_default();

        Ok(RawWorkEntry {
            slug,
            source,
            data,
            body: body.to_string(),
        })
    }
}

#[async_trait]
impl WorkRepository for FsWorkRepo {
    async fn load_entries(&self) -> Result<Vec<RawWorkEntry>, AppError> {
        let paths = self.markdown_files().await?;

        let mut entries = Vec::with_capacity(paths.len());
        for path in paths {
            entries.push(Self::read_entry(&path).await?);
        }

        tracing::debug!(
            "Read {} work entries from {}",
            entries.len(),
            self.content_dir.display()
        );
        Ok(entries)
    }
}

impl StaticWorkRepo {
    pub fn new(entries: Vec<RawWorkEntry>) -> Self {
        StaticWorkRepo { entries }
    }
}

#[async_trait]
impl WorkRepository for StaticWorkRepo {
    async fn load_entries(&self) -> Result<Vec<RawWorkEntry>, AppError> {
        Ok(self.entries.clone())
    }
}
