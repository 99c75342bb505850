use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use hippo_logging::{hippo_debug, hippo_info};
use url::Url;

use crate::document::{Adjacency, Document};
use crate::persist::{create_project_dir, ensure_output_dir, ArtifactWriter, PersistError};
use crate::project::ProjectMarkers;
use crate::records::REPOSITORY_LABEL;
use crate::scrapers::{
    FixtureScraper, HighScraper, LowScraper, ReadmeScraper, Scaffolder, SysScraper,
};
use crate::session::{PageSource, SessionError};
use crate::types::{JobId, ProgressSink, ScrapeError, ScrapeReport};

/// Which scaffold scraper a project page gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScraperKind {
    Low,
    High,
    Sys,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub output_dir: PathBuf,
    /// Host that relative resource links are resolved against.
    pub resource_host: Url,
    pub write_checker: bool,
}

impl EngineConfig {
    pub fn new(output_dir: impl Into<PathBuf>, resource_host: Url) -> Self {
        Self {
            output_dir: output_dir.into(),
            resource_host,
            write_checker: false,
        }
    }
}

/// README footer data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub github_username: String,
}

impl Author {
    pub fn profile_url(&self) -> String {
        format!("github.com/{}", self.github_username)
    }
}

/// What the orchestrator learns from a freshly fetched page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSummary {
    pub title: Option<String>,
    pub repository: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldOutcome {
    pub project_dir: PathBuf,
    pub report: ScrapeReport,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("cannot start async runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error("no page loaded for job {0}")]
    PageNotLoaded(JobId),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Scrape(#[from] ScrapeError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Executes the IO side of a batch: fetching pages, scaffolding project
/// directories and writing READMEs. Pages stay parsed between steps of one
/// job and are dropped on [`ScrapeEngine::release`].
///
/// Everything runs on the calling thread; the page source is driven by a
/// current-thread runtime.
pub struct ScrapeEngine {
    source: Box<dyn PageSource>,
    runtime: tokio::runtime::Runtime,
    config: EngineConfig,
    pages: HashMap<JobId, Document>,
}

impl ScrapeEngine {
    pub fn new(source: Box<dyn PageSource>, config: EngineConfig) -> Result<Self, EngineError> {
        ensure_output_dir(&config.output_dir)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            source,
            runtime,
            config,
            pages: HashMap::new(),
        })
    }

    pub fn fetch(&mut self, job_id: JobId, url: &str) -> Result<PageSummary, EngineError> {
        let page = self.runtime.block_on(self.source.fetch_page(url))?;
        hippo_info!("Fetched {} ({})", page.final_url, page.encoding);

        let doc = Document::parse(&page.html);
        let summary = PageSummary {
            title: doc
                .select_first("h1")
                .map(|h1| h1.text().collect::<String>().trim().to_string()),
            repository: doc
                .first_label_value(REPOSITORY_LABEL, Adjacency::Sibling)
                .and_then(Result::ok),
        };
        self.pages.insert(job_id, doc);
        Ok(summary)
    }

    /// Create the project directory and fill it with the kind's task files,
    /// the test files shown on the page and, when configured, `check.sh`.
    pub fn scaffold(
        &self,
        job_id: JobId,
        kind: ScraperKind,
        sink: &dyn ProgressSink,
    ) -> Result<ScaffoldOutcome, EngineError> {
        let doc = self.page(job_id)?;
        let markers = ProjectMarkers::read(doc)?;
        let project_dir = create_project_dir(&self.config.output_dir, &markers.directory)?;
        hippo_info!("Scaffolding {} as {kind:?}", project_dir.display());

        let scaffolder: Box<dyn Scaffolder> = match kind {
            ScraperKind::Low => Box::new(LowScraper::new(doc)),
            ScraperKind::High => Box::new(HighScraper::new(doc)),
            ScraperKind::Sys => Box::new(SysScraper::new(doc)),
        };
        let writer = ArtifactWriter::new(&project_dir);
        let mut report = scaffolder.write_files(&writer, sink);
        report.merge(FixtureScraper::new(doc).write_files(&writer, sink));
        if self.config.write_checker {
            report.merge(scaffolder.write_checker(&writer, sink));
        }
        Ok(ScaffoldOutcome {
            project_dir,
            report,
        })
    }

    pub fn write_readme(
        &self,
        job_id: JobId,
        author: &Author,
        sink: &dyn ProgressSink,
    ) -> Result<ScrapeReport, EngineError> {
        let doc = self.page(job_id)?;
        let scraper = ReadmeScraper::scrape(doc, &self.config.resource_host)?;
        let mut readme = scraper.open(&self.config.output_dir, sink);
        hippo_debug!("README target {}", readme.target_dir().display());
        readme.write_title();
        readme.write_resources();
        readme.write_objectives();
        readme.write_tasks();
        readme.write_footer(&author.name, &author.github_username, &author.profile_url());
        Ok(readme.finish()?)
    }

    /// Drop the parsed page of a finished job.
    pub fn release(&mut self, job_id: JobId) -> bool {
        self.pages.remove(&job_id).is_some()
    }

    fn page(&self, job_id: JobId) -> Result<&Document, EngineError> {
        self.pages
            .get(&job_id)
            .ok_or(EngineError::PageNotLoaded(job_id))
    }
}
