use crate::{JobId, JobResultKind, ProjectKind, SessionState, Stage};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub jobs: Vec<JobRowView>,
    pub skipped_urls: usize,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn count(&self, outcome: JobResultKind) -> usize {
        self.jobs
            .iter()
            .filter(|job| job.outcome == Some(outcome))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub job_id: JobId,
    pub url: String,
    pub title: Option<String>,
    pub kind: Option<ProjectKind>,
    pub stage: Stage,
    pub failures: usize,
    pub outcome: Option<JobResultKind>,
    pub error: Option<String>,
}
