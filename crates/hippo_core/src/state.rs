use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fmt;

use url::Url;

use crate::view_model::{AppViewModel, JobRowView};
use crate::ProjectKind;

pub type JobId = u64;

/// Which steps every project URL goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Scaffold the project directory, then write its README.
    #[default]
    Full,
    /// Scaffold only.
    Scaffold,
    /// README only.
    Readme,
}

impl RunMode {
    pub fn scaffolds(self) -> bool {
        matches!(self, RunMode::Full | RunMode::Scaffold)
    }

    pub fn documents(self) -> bool {
        matches!(self, RunMode::Full | RunMode::Readme)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Queued,
    Fetching,
    Scaffolding,
    Documenting,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Queued => write!(f, "queued"),
            Stage::Fetching => write!(f, "fetching"),
            Stage::Scaffolding => write!(f, "scaffolding"),
            Stage::Documenting => write!(f, "documenting"),
            Stage::Done => write!(f, "done"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobResultKind {
    Success,
    /// Finished, but some artifacts could not be written.
    Partial,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Job {
    pub(crate) url: String,
    pub(crate) title: Option<String>,
    pub(crate) kind: Option<ProjectKind>,
    pub(crate) stage: Stage,
    pub(crate) failures: usize,
    pub(crate) outcome: Option<JobResultKind>,
    pub(crate) error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    mode: RunMode,
    session: SessionState,
    jobs: BTreeMap<JobId, Job>,
    queue: VecDeque<JobId>,
    active: Option<JobId>,
    next_job_id: JobId,
    seen_urls: HashSet<String>,
    skipped: usize,
    dirty: bool,
}

impl AppState {
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    /// Job currently being processed. Only one job is ever in flight.
    pub fn active_job(&self) -> Option<JobId> {
        self.active
    }

    pub fn is_finished(&self) -> bool {
        self.session == SessionState::Finished
    }

    /// Process exit status: 1 when any job failed, 0 otherwise.
    pub fn exit_code(&self) -> i32 {
        let failed = self
            .jobs
            .values()
            .any(|job| job.outcome == Some(JobResultKind::Failed));
        i32::from(failed)
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            session: self.session,
            jobs: self
                .jobs
                .iter()
                .map(|(job_id, job)| JobRowView {
                    job_id: *job_id,
                    url: job.url.clone(),
                    title: job.title.clone(),
                    kind: job.kind,
                    stage: job.stage,
                    failures: job.failures,
                    outcome: job.outcome,
                    error: job.error.clone(),
                })
                .collect(),
            skipped_urls: self.skipped,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Queue new jobs; URLs already seen in this batch are skipped.
    pub(crate) fn enqueue_urls(&mut self, urls: impl IntoIterator<Item = String>) -> usize {
        let mut enqueued = 0;
        for url in urls {
            if !self.seen_urls.insert(normalize_url_for_dedupe(&url)) {
                self.skipped += 1;
                continue;
            }
            self.next_job_id += 1;
            let job_id = self.next_job_id;
            self.jobs.insert(
                job_id,
                Job {
                    url,
                    title: None,
                    kind: None,
                    stage: Stage::Queued,
                    failures: 0,
                    outcome: None,
                    error: None,
                },
            );
            self.queue.push_back(job_id);
            enqueued += 1;
        }
        if enqueued > 0 && self.session == SessionState::Idle {
            self.session = SessionState::Running;
        }
        self.mark_dirty();
        enqueued
    }

    /// Make the next queued job active. Returns its id and URL, or finishes
    /// the session when the queue is empty.
    pub(crate) fn start_next(&mut self) -> Option<(JobId, String)> {
        let Some(job_id) = self.queue.pop_front() else {
            self.active = None;
            if self.session == SessionState::Running {
                self.session = SessionState::Finished;
            }
            return None;
        };
        self.active = Some(job_id);
        let job = self.jobs.get_mut(&job_id)?;
        job.stage = Stage::Fetching;
        Some((job_id, job.url.clone()))
    }

    pub(crate) fn active_job_mut(&mut self, job_id: JobId) -> Option<&mut Job> {
        if self.active != Some(job_id) {
            return None;
        }
        self.jobs.get_mut(&job_id)
    }

    pub(crate) fn finish(&mut self, job_id: JobId, error: Option<String>) {
        if let Some(job) = self.jobs.get_mut(&job_id) {
            job.stage = Stage::Done;
            job.outcome = Some(match (&error, job.failures) {
                (Some(_), _) => JobResultKind::Failed,
                (None, 0) => JobResultKind::Success,
                (None, _) => JobResultKind::Partial,
            });
            job.error = error;
        }
        self.active = None;
        self.mark_dirty();
    }
}

/// Key used to detect the same project URL given twice. Scheme and host
/// compare case-insensitively, the path does not. Fragments and trailing
/// slashes are ignored.
pub fn normalize_url_for_dedupe(raw: &str) -> String {
    let trimmed = raw.trim();
    match Url::parse(trimmed) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.as_str().trim_end_matches('/').to_string()
        }
        Err(_) => {
            let without_fragment = trimmed.split('#').next().unwrap_or(trimmed);
            without_fragment.trim_end_matches('/').to_string()
        }
    }
}
