use std::io::Write;

use hippo_core::{Effect, Msg, PageInfo, ProjectKind};
use hippo_engine::{Author, ScrapeEngine, ScraperKind};
use hippo_logging::{hippo_info, hippo_warn, set_current_job};

use crate::progress::Console;

/// Executes core effects against the engine and turns their outcomes back
/// into messages for the state machine.
pub struct EffectRunner<W: Write> {
    engine: ScrapeEngine,
    author: Author,
    console: Console<W>,
}

impl<W: Write> EffectRunner<W> {
    pub fn new(engine: ScrapeEngine, author: Author, console: Console<W>) -> Self {
        Self {
            engine,
            author,
            console,
        }
    }

    pub fn console(&self) -> &Console<W> {
        &self.console
    }

    #[cfg(test)]
    pub fn into_console(self) -> Console<W> {
        self.console
    }

    pub fn run(&mut self, effect: Effect) -> Option<Msg> {
        match effect {
            Effect::FetchPage { job_id, url } => {
                set_current_job(job_id);
                hippo_info!("FetchPage url={}", url);
                self.console.job_started(&url);
                let result = self
                    .engine
                    .fetch(job_id, &url)
                    .map(|summary| PageInfo {
                        title: summary.title,
                        repository: summary.repository,
                    })
                    .map_err(|err| self.failed(err));
                Some(Msg::PageFetched { job_id, result })
            }
            Effect::Scaffold { job_id, kind } => {
                set_current_job(job_id);
                self.console
                    .step_started(&format!("Scaffolding {kind} project"));
                let result = self
                    .engine
                    .scaffold(job_id, map_kind(kind), &self.console)
                    .map(|outcome| {
                        hippo_info!(
                            "Scaffolded {} ({} files)",
                            outcome.project_dir.display(),
                            outcome.report.written.len()
                        );
                        outcome.report.failures.len()
                    })
                    .map_err(|err| self.failed(err));
                Some(Msg::ScaffoldFinished { job_id, result })
            }
            Effect::WriteReadme { job_id } => {
                set_current_job(job_id);
                self.console.step_started("Creating README.md");
                let result = self
                    .engine
                    .write_readme(job_id, &self.author, &self.console)
                    .map(|report| report.failures.len())
                    .map_err(|err| self.failed(err));
                Some(Msg::ReadmeFinished { job_id, result })
            }
            Effect::ReleasePage { job_id } => {
                if !self.engine.release(job_id) {
                    hippo_warn!("no page to release for job {}", job_id);
                }
                set_current_job(0);
                None
            }
        }
    }

    fn failed(&self, err: impl std::fmt::Display) -> String {
        let reason = err.to_string();
        hippo_warn!("job failed: {}", reason);
        self.console.job_failed(&reason);
        reason
    }
}

fn map_kind(kind: ProjectKind) -> ScraperKind {
    match kind {
        ProjectKind::LowLevel => ScraperKind::Low,
        ProjectKind::HighLevel => ScraperKind::High,
        ProjectKind::System => ScraperKind::Sys,
    }
}
