use std::fmt;
use std::path::PathBuf;

use hippo_logging::{hippo_debug, hippo_warn};

use crate::document::MarkerError;
use crate::persist::PersistError;

pub type JobId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Putchar,
    Header,
    TaskFiles,
    Subdirectory,
    TestFiles,
    Checker,
    Title,
    Resources,
    Objectives,
    Tasks,
    Author,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Putchar => write!(f, "Creating _putchar.c"),
            Phase::Header => write!(f, "Creating header file"),
            Phase::TaskFiles => write!(f, "Creating task files"),
            Phase::Subdirectory => write!(f, "Creating subdirectory files"),
            Phase::TestFiles => write!(f, "Creating test files"),
            Phase::Checker => write!(f, "Creating checker script"),
            Phase::Title => write!(f, "Writing project title"),
            Phase::Resources => write!(f, "Writing resources"),
            Phase::Objectives => write!(f, "Writing learning objectives"),
            Phase::Tasks => write!(f, "Writing task information"),
            Phase::Author => write!(f, "Writing author information"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub phase: Phase,
    pub item: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeEvent {
    PhaseStarted(Phase),
    ArtifactWritten { phase: Phase, path: PathBuf },
    ItemFailed(ItemFailure),
    PhaseFinished(Phase),
}

pub trait ProgressSink {
    fn emit(&self, event: ScrapeEvent);
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl ProgressSink for SilentSink {
    fn emit(&self, _event: ScrapeEvent) {}
}

/// What one scraper produced. Failures never abort the scrape; they are
/// collected here and surfaced as `[ERROR]` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeReport {
    pub written: Vec<PathBuf>,
    pub directories: Vec<PathBuf>,
    pub failures: Vec<ItemFailure>,
}

impl ScrapeReport {
    pub fn merge(&mut self, other: ScrapeReport) {
        self.written.extend(other.written);
        self.directories.extend(other.directories);
        self.failures.extend(other.failures);
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn record_written(&mut self, sink: &dyn ProgressSink, phase: Phase, path: PathBuf) {
        hippo_debug!("{phase}: wrote {}", path.display());
        sink.emit(ScrapeEvent::ArtifactWritten {
            phase,
            path: path.clone(),
        });
        self.written.push(path);
    }

    pub(crate) fn record_directory(&mut self, path: PathBuf) {
        hippo_debug!("created directory {}", path.display());
        self.directories.push(path);
    }

    pub(crate) fn record_failure(
        &mut self,
        sink: &dyn ProgressSink,
        phase: Phase,
        item: impl Into<String>,
        reason: impl fmt::Display,
    ) {
        let failure = ItemFailure {
            phase,
            item: item.into(),
            reason: reason.to_string(),
        };
        hippo_warn!("{phase}: {} failed: {}", failure.item, failure.reason);
        sink.emit(ScrapeEvent::ItemFailed(failure.clone()));
        self.failures.push(failure);
    }
}

/// Runs `body` between the start and finish events of `phase`.
pub(crate) fn in_phase<T>(sink: &dyn ProgressSink, phase: Phase, body: impl FnOnce() -> T) -> T {
    sink.emit(ScrapeEvent::PhaseStarted(phase));
    let out = body();
    sink.emit(ScrapeEvent::PhaseFinished(phase));
    out
}

/// Errors that abort the work for one project page.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("page has no title heading")]
    MissingTitle,
    #[error("page has no {0:?} marker")]
    MissingMarker(&'static str),
    #[error(transparent)]
    Marker(#[from] MarkerError),
    #[error("unknown project type for repository {0:?}")]
    UnknownProject(String),
    #[error(transparent)]
    Persist(#[from] PersistError),
}
