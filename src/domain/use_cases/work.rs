use std::collections::HashSet;

use crate::{
    entities::{
        work::WorkItem,
        work_entry::{WorkCollection, WorkEntry},
    },
    errors::{field_errors, AppError, ContentError, EntryError},
    repositories::work::WorkRepository,
    utils::markdown::safe_markdown_to_html,
};

pub struct WorkHandler<R>
where
    R: WorkRepository,
{
    pub work_repo: R,
}

impl<R> WorkHandler<R>
where
    R: WorkRepository,
{
    pub fn new(work_repo: R) -> Self {
        WorkHandler { work_repo }
    }

    /// Loads and validates every entry of the collection.
    ///
    /// The collection is admitted only if every entry validates; otherwise
    /// the error lists each failing entry together with all of its field
    /// errors.
    pub async fn load_collection(&self) -> Result<WorkCollection, AppError> {
        let raw_entries = self.work_repo.load_entries().await?;

        let mut seen = HashSet::with_capacity(raw_entries.len());
        let mut entries = Vec::with_capacity(raw_entries.len());
        let mut failures = Vec::new();

        for raw in raw_entries {
            if !seen.insert(raw.slug.clone()) {
                return Err(ContentError::DuplicateSlug(raw.slug, raw.source).into());
            }

            match WorkItem::try_from(&raw.data) {
                Ok(item) => entries.push(WorkEntry {
                    body_html: safe_markdown_to_html(&raw.body),
                    slug: raw.slug,
                    item,
                }),
                Err(errors) => {
                    let errors = field_errors(&errors);
                    tracing::warn!(
                        "Rejected work entry {} with {} field error(s)",
                        raw.source,
                        errors.len()
                    );
                    failures.push(EntryError { source: raw.source, errors });
                }
            }
        }

        if !failures.is_empty() {
            return Err(ContentError::InvalidEntries(failures).into());
        }

        let collection = WorkCollection::new(entries);
        tracing::info!("Loaded work collection with {} entries", collection.len());
        Ok(collection)
    }
}
