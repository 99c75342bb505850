//! Hipposcraper engine: page session, scrapers and the IO pipeline.
mod decode;
mod document;
mod engine;
mod filename;
mod persist;
mod project;
mod records;
mod scrapers;
mod session;
mod types;

pub use decode::{decode_page, DecodeError, DecodedPage};
pub use document::{Adjacency, Document, MarkerError};
pub use engine::{
    Author, EngineConfig, EngineError, PageSummary, ScaffoldOutcome, ScrapeEngine, ScraperKind,
};
pub use filename::validate_artifact_name;
pub use persist::{create_project_dir, ensure_output_dir, ArtifactWriter, PersistError};
pub use project::ProjectMarkers;
pub use records::{
    FileEntry, TaskFiles, TaskScan, DIRECTORY_LABEL, FILE_LABEL, PROTOTYPE_LABEL,
    REPOSITORY_LABEL,
};
pub use scrapers::{
    diagnostic_label, extract_fixture, function_name, include_guard, rewrite_resource_url,
    Fixture, FixtureError, FixtureScraper, HighScraper, Languages, LowScraper, ReadmeScraper,
    ReadmeWriter, Resource, Scaffolder, SysScraper, CHECKER_NAME, PUTCHAR_SOURCE, README_NAME,
    RESOURCE_PREFIX,
};
pub use session::{
    FailureKind, FetchedPage, IntranetSession, LoginCredentials, PageSource, SessionError,
    SessionSettings, DEFAULT_HOST,
};
pub use types::{
    ItemFailure, JobId, Phase, ProgressSink, ScrapeError, ScrapeEvent, ScrapeReport, SilentSink,
};
