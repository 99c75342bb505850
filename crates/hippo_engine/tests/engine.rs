mod common;

use std::collections::HashMap;

use common::{listing, read, TestSink, HIGH_LEVEL_PAGE, LOW_LEVEL_PAGE};
use hippo_engine::{
    Author, EngineConfig, EngineError, FailureKind, FetchedPage, PageSource, PersistError,
    ScrapeEngine, ScraperKind, SessionError, SilentSink, README_NAME,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use url::Url;

const LOW_URL: &str = "https://intranet.hbtn.io/projects/212";
const HIGH_URL: &str = "https://intranet.hbtn.io/projects/331";

struct FakeSource {
    pages: HashMap<&'static str, &'static str>,
}

impl FakeSource {
    fn new() -> Self {
        Self {
            pages: HashMap::from([(LOW_URL, LOW_LEVEL_PAGE), (HIGH_URL, HIGH_LEVEL_PAGE)]),
        }
    }
}

#[async_trait::async_trait]
impl PageSource for FakeSource {
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, SessionError> {
        match self.pages.get(url) {
            Some(html) => Ok(FetchedPage {
                url: url.to_string(),
                final_url: url.to_string(),
                html: html.to_string(),
                encoding: "UTF-8".to_string(),
            }),
            None => Err(SessionError {
                kind: FailureKind::HttpStatus(404),
                message: "404 Not Found".to_string(),
            }),
        }
    }
}

fn engine(temp: &TempDir, write_checker: bool) -> ScrapeEngine {
    let mut config = EngineConfig::new(
        temp.path(),
        Url::parse("https://intranet.hbtn.io").unwrap(),
    );
    config.write_checker = write_checker;
    ScrapeEngine::new(Box::new(FakeSource::new()), config).unwrap()
}

fn author() -> Author {
    Author {
        name: "Ada Lovelace".to_string(),
        github_username: "ada".to_string(),
    }
}

#[test]
fn fetch_summarises_the_page() {
    let temp = TempDir::new().unwrap();
    let mut engine = engine(&temp, false);
    let summary = engine.fetch(1, LOW_URL).unwrap();
    assert_eq!(
        summary.title.as_deref(),
        Some("0x02. C - Functions, nested loops")
    );
    assert_eq!(
        summary.repository.as_deref(),
        Some("holbertonschool-low_level_programming")
    );
}

#[test]
fn full_run_scaffolds_then_documents_the_project() {
    let temp = TempDir::new().unwrap();
    let mut engine = engine(&temp, true);
    let sink = TestSink::new();

    engine.fetch(1, LOW_URL).unwrap();
    let outcome = engine.scaffold(1, ScraperKind::Low, &sink).unwrap();
    assert_eq!(
        outcome.project_dir,
        temp.path().join("0x02-functions_nested_loops")
    );
    assert!(outcome.report.is_clean(), "{:?}", outcome.report.failures);

    let report = engine.write_readme(1, &author(), &sink).unwrap();
    assert!(report.is_clean(), "{:?}", report.failures);

    assert_eq!(
        listing(&outcome.project_dir),
        [
            "0-main.c",
            "1-alphabet.c",
            "1-main.c",
            "2-islower.c",
            "README.md",
            "_putchar.c",
            "check.sh",
            "main.h",
        ]
    );
    let readme = read(&outcome.project_dir, README_NAME);
    assert!(readme.ends_with("* **Ada Lovelace** - [ada](github.com/ada)\n"));
}

#[test]
fn existing_project_directory_aborts_the_scaffold() {
    let temp = TempDir::new().unwrap();
    let mut engine = engine(&temp, false);
    engine.fetch(1, HIGH_URL).unwrap();
    engine.scaffold(1, ScraperKind::High, &SilentSink).unwrap();

    let err = engine
        .scaffold(1, ScraperKind::High, &SilentSink)
        .unwrap_err();
    assert!(matches!(err, EngineError::Persist(PersistError::AlreadyExists(_))));
}

#[test]
fn released_pages_are_gone() {
    let temp = TempDir::new().unwrap();
    let mut engine = engine(&temp, false);
    engine.fetch(4, LOW_URL).unwrap();
    assert!(engine.release(4));
    assert!(!engine.release(4));

    let err = engine.write_readme(4, &author(), &SilentSink).unwrap_err();
    assert!(matches!(err, EngineError::PageNotLoaded(4)));
}

#[test]
fn fetch_failures_surface_as_session_errors() {
    let temp = TempDir::new().unwrap();
    let mut engine = engine(&temp, false);
    let err = engine
        .fetch(2, "https://intranet.hbtn.io/projects/0")
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Session(SessionError {
            kind: FailureKind::HttpStatus(404),
            ..
        })
    ));
}
