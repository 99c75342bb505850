use crate::JobId;

/// What the runner learned from a loaded project page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub title: Option<String>,
    pub repository: Option<String>,
}

/// Outcome of a scaffold or README step: the number of artifacts that
/// could not be written, or the reason the whole step failed.
pub type StepResult = Result<usize, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Project URLs given on the command line.
    UrlsSubmitted(Vec<String>),
    /// A page finished loading (or failed to).
    PageFetched {
        job_id: JobId,
        result: Result<PageInfo, String>,
    },
    /// Project directory scaffolding finished.
    ScaffoldFinished { job_id: JobId, result: StepResult },
    /// README generation finished.
    ReadmeFinished { job_id: JobId, result: StepResult },
    /// Fallback for placeholder wiring.
    NoOp,
}
