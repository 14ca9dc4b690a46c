use std::path::PathBuf;

use crate::entities::work_entry::RawWorkEntry;

/// Reads `work` entries from Markdown files in a content directory.
#[derive(Debug, Clone)]
pub struct FsWorkRepo {
    pub content_dir: PathBuf,
}

/// Serves a fixed set of entries held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticWorkRepo {
    pub entries: Vec<RawWorkEntry>,
}
