use std::cell::RefCell;
use std::io::{self, Stdout, Write};

use hippo_core::{AppViewModel, JobResultKind};
use hippo_engine::{ProgressSink, ScrapeEvent};

/// Progress printer for one batch run. Scraper phases arrive through
/// [`ProgressSink`]; job boundaries and the final summary are printed by
/// the runner.
pub struct Console<W: Write> {
    out: RefCell<W>,
}

impl Console<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    pub fn job_started(&self, url: &str) {
        self.line(&format!("Scraping {url}"));
    }

    pub fn step_started(&self, step: &str) {
        self.line(&format!("  -> {step}..."));
    }

    pub fn job_failed(&self, reason: &str) {
        self.line(&format!("     [ERROR] {reason}"));
    }

    pub fn summary(&self, view: &AppViewModel) {
        for line in summary_lines(view) {
            self.line(&line);
        }
    }

    // Progress output is best effort; a closed stdout must not stop a scrape.
    fn line(&self, text: &str) {
        let _ = writeln!(self.out.borrow_mut(), "{text}");
    }
}

impl<W: Write> ProgressSink for Console<W> {
    fn emit(&self, event: ScrapeEvent) {
        if let Some(line) = event_line(&event) {
            self.line(&line);
        }
    }
}

fn event_line(event: &ScrapeEvent) -> Option<String> {
    match event {
        ScrapeEvent::PhaseStarted(phase) => Some(format!("  -> {phase}...")),
        ScrapeEvent::PhaseFinished(_) => Some("     Done.".to_string()),
        ScrapeEvent::ItemFailed(failure) => Some(format!(
            "     [ERROR] Failed: {} ({})",
            failure.item, failure.reason
        )),
        ScrapeEvent::ArtifactWritten { .. } => None,
    }
}

fn summary_lines(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec![format!(
        "Finished {} project(s): {} ok, {} with errors, {} failed",
        view.jobs.len(),
        view.count(JobResultKind::Success),
        view.count(JobResultKind::Partial),
        view.count(JobResultKind::Failed),
    )];
    if view.skipped_urls > 0 {
        lines.push(format!("Skipped {} duplicate URL(s)", view.skipped_urls));
    }
    for job in &view.jobs {
        if let (Some(JobResultKind::Failed), Some(error)) = (job.outcome, &job.error) {
            lines.push(format!("  [FAILED] {}: {error}", job.url));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use hippo_core::{JobRowView, SessionState, Stage};
    use hippo_engine::{ItemFailure, Phase};
    use pretty_assertions::assert_eq;

    fn printed(console: Console<Vec<u8>>) -> String {
        String::from_utf8(console.into_inner()).unwrap()
    }

    #[test]
    fn phases_print_start_and_done_lines() {
        let console = Console::new(Vec::new());
        console.emit(ScrapeEvent::PhaseStarted(Phase::Header));
        console.emit(ScrapeEvent::ArtifactWritten {
            phase: Phase::Header,
            path: "main.h".into(),
        });
        console.emit(ScrapeEvent::ItemFailed(ItemFailure {
            phase: Phase::Header,
            item: "1-alphabet.c".to_string(),
            reason: "no prototype".to_string(),
        }));
        console.emit(ScrapeEvent::PhaseFinished(Phase::Header));

        assert_eq!(
            printed(console),
            "  -> Creating header file...\n\
             \x20    [ERROR] Failed: 1-alphabet.c (no prototype)\n\
             \x20    Done.\n"
        );
    }

    #[test]
    fn summary_lists_failed_jobs() {
        let row = |job_id, outcome, error: Option<&str>| JobRowView {
            job_id,
            url: format!("https://intranet.hbtn.io/projects/{job_id}"),
            title: None,
            kind: None,
            stage: Stage::Done,
            failures: 0,
            outcome: Some(outcome),
            error: error.map(str::to_string),
        };
        let view = AppViewModel {
            session: SessionState::Finished,
            jobs: vec![
                row(1, JobResultKind::Success, None),
                row(2, JobResultKind::Failed, Some("login failed")),
            ],
            skipped_urls: 1,
            dirty: false,
        };

        assert_eq!(
            summary_lines(&view),
            [
                "Finished 2 project(s): 1 ok, 0 with errors, 1 failed",
                "Skipped 1 duplicate URL(s)",
                "  [FAILED] https://intranet.hbtn.io/projects/2: login failed",
            ]
        );
    }
}
