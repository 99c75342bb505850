use crate::document::{Adjacency, Document};
use crate::records::{DIRECTORY_LABEL, REPOSITORY_LABEL};
use crate::types::ScrapeError;

/// Repository and directory named in the first task's repository block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMarkers {
    pub repository: String,
    pub directory: String,
}

impl ProjectMarkers {
    pub fn read(doc: &Document) -> Result<Self, ScrapeError> {
        let repository = doc
            .first_label_value(REPOSITORY_LABEL, Adjacency::Sibling)
            .ok_or(ScrapeError::MissingMarker(REPOSITORY_LABEL))??;
        let directory = doc
            .first_label_value(DIRECTORY_LABEL, Adjacency::Descend)
            .ok_or(ScrapeError::MissingMarker(DIRECTORY_LABEL))??;
        Ok(Self {
            repository,
            directory,
        })
    }
}
