use hippo_logging::hippo_debug;

use crate::document::{Document, MarkerError};
use crate::persist::ArtifactWriter;
use crate::records::{TaskFiles, TaskScan};
use crate::scrapers::{has_extension, Scaffolder};
use crate::types::{in_phase, Phase, ProgressSink, ScrapeReport};

const RUBY_MARKER: &str = "env ruby";

/// Scraper for shell, Ruby and Puppet-style DevOps projects: one stub per
/// task holding only a shebang line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysScraper {
    ruby: bool,
    tasks: Vec<TaskFiles>,
    prototype_errors: Vec<MarkerError>,
}

impl SysScraper {
    pub fn new(doc: &Document) -> Self {
        let ruby = doc.contains_text(RUBY_MARKER);
        if ruby {
            hippo_debug!("project uses ruby, every stub gets a ruby shebang");
        }
        let scan = TaskScan::collect(doc);
        Self {
            ruby,
            tasks: scan.tasks,
            prototype_errors: scan.errors,
        }
    }

    pub fn uses_ruby(&self) -> bool {
        self.ruby
    }

    pub fn shebang(&self, name: &str) -> &'static str {
        if self.ruby {
            "#!/usr/bin/env ruby"
        } else if has_extension(name, "py") {
            "#!/usr/bin/python3"
        } else {
            "#!/usr/bin/env bash"
        }
    }
}

impl Scaffolder for SysScraper {
    fn write_files(&self, writer: &ArtifactWriter, sink: &dyn ProgressSink) -> ScrapeReport {
        let mut report = ScrapeReport::default();
        in_phase(sink, Phase::TaskFiles, || {
            for err in &self.prototype_errors {
                report.record_failure(sink, Phase::TaskFiles, "prototype", err);
            }
            for task in &self.tasks {
                let entry = match &task.entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        report.record_failure(sink, Phase::TaskFiles, "task file", err);
                        continue;
                    }
                };
                let name = entry.primary();
                let content = format!("{}\n", self.shebang(name));
                match writer.write(name, &content) {
                    Ok(path) => report.record_written(sink, Phase::TaskFiles, path),
                    Err(err) => report.record_failure(sink, Phase::TaskFiles, entry.raw(), err),
                }
            }
        });
        report
    }
}
