use crate::{JobId, ProjectKind};

/// Work the runner performs on behalf of the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Log in if needed and load the project page.
    FetchPage { job_id: JobId, url: String },
    /// Create the project directory and its task and test files.
    Scaffold { job_id: JobId, kind: ProjectKind },
    /// Generate `README.md` for the project.
    WriteReadme { job_id: JobId },
    /// Drop the loaded page of a finished job.
    ReleasePage { job_id: JobId },
}
