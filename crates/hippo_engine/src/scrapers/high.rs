use hippo_logging::hippo_debug;

use crate::document::{Document, MarkerError};
use crate::persist::ArtifactWriter;
use crate::records::{FileEntry, TaskScan};
use crate::scrapers::{checker_script, has_extension, quoted, shebang_for, Scaffolder, CHECKER_NAME};
use crate::types::{in_phase, Phase, ProgressSink, ScrapeReport};

/// One artifact created directly in the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Planned {
    Empty(String),
    Directory(String),
    Script { name: String, content: String },
}

/// Languages whose files the project creates, read by the checker script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Languages {
    pub python: bool,
    pub javascript: bool,
}

/// Scraper for Python and JavaScript projects.
///
/// Entries naming a path (`models/base.py`) are deferred into the one
/// subdirectory the project is allowed; everything else lands in the
/// project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScraper {
    plan: Vec<Planned>,
    subdir: Option<String>,
    deferred: Vec<String>,
    entries: Vec<FileEntry>,
    errors: Vec<MarkerError>,
    prototype_errors: Vec<MarkerError>,
    languages: Languages,
}

impl HighScraper {
    pub fn new(doc: &Document) -> Self {
        let scan = TaskScan::collect(doc);

        let mut scraper = Self {
            plan: Vec::new(),
            subdir: None,
            deferred: Vec::new(),
            entries: Vec::new(),
            errors: Vec::new(),
            prototype_errors: scan.errors,
            languages: Languages::default(),
        };
        for task in scan.tasks {
            match task.entry {
                Ok(entry) => {
                    scraper.plan_entry(&entry, &task.prototypes);
                    scraper.entries.push(entry);
                }
                Err(err) => scraper.errors.push(err),
            }
        }
        scraper
    }

    pub fn languages(&self) -> Languages {
        self.languages
    }

    pub fn subdirectory(&self) -> Option<&str> {
        self.subdir.as_deref()
    }

    /// Basenames created inside [`Self::subdirectory`].
    pub fn deferred(&self) -> &[String] {
        &self.deferred
    }

    /// Where a `File:` name ends up relative to the project directory.
    /// Path entries live under the one subdirectory, whatever their own
    /// directory was.
    fn created_path(&self, name: &str) -> Option<String> {
        if !name.contains('/') {
            return Some(name.to_string());
        }
        let basename = name.rsplit('/').next().filter(|base| !base.is_empty())?;
        let subdir = self.subdir.as_deref()?;
        Some(format!("{subdir}/{basename}"))
    }

    fn plan_entry(&mut self, entry: &FileEntry, prototypes: &[String]) {
        for name in entry.names().iter().filter(|name| name.contains('/')) {
            let Some((dir, _)) = name.split_once('/') else {
                continue;
            };
            let basename = name.rsplit('/').next().unwrap_or_default();
            if basename.is_empty() {
                hippo_debug!("{name} names a directory, nothing to defer");
            } else {
                self.deferred.push(basename.to_string());
            }
            if self.subdir.is_none() && !dir.is_empty() {
                self.subdir = Some(dir.to_string());
            }
        }

        let primary = entry.primary();
        if primary.contains('/') {
            return;
        }
        if entry.is_group() {
            self.plan.push(Planned::Empty(primary.to_string()));
        } else if !primary.contains('.') {
            self.plan.push(Planned::Directory(primary.to_string()));
        } else {
            let content = self.render_script(primary, prototypes);
            self.plan.push(Planned::Script {
                name: primary.to_string(),
                content,
            });
        }
    }

    fn render_script(&mut self, name: &str, prototypes: &[String]) -> String {
        let mut content = shebang_for(name)
            .map(|shebang| format!("{shebang}\n"))
            .unwrap_or_default();
        if has_extension(name, "js") {
            self.languages.javascript = true;
        }
        if has_extension(name, "py") {
            self.languages.python = true;
            for prototype in prototypes {
                content.push_str(prototype);
                content.push('\n');
            }
        }
        content
    }

    fn write_plan(
        &self,
        writer: &ArtifactWriter,
        sink: &dyn ProgressSink,
        report: &mut ScrapeReport,
    ) {
        in_phase(sink, Phase::TaskFiles, || {
            for err in &self.prototype_errors {
                report.record_failure(sink, Phase::TaskFiles, "prototype", err);
            }
            for err in &self.errors {
                report.record_failure(sink, Phase::TaskFiles, "task file", err);
            }
            for item in &self.plan {
                match item {
                    Planned::Empty(name) => match writer.write(name, "") {
                        Ok(path) => report.record_written(sink, Phase::TaskFiles, path),
                        Err(err) => report.record_failure(sink, Phase::TaskFiles, name, err),
                    },
                    Planned::Directory(name) => match writer.create_dir(name) {
                        Ok(path) => report.record_directory(path),
                        Err(err) => report.record_failure(sink, Phase::TaskFiles, name, err),
                    },
                    Planned::Script { name, content } => match writer.write(name, content) {
                        Ok(path) => report.record_written(sink, Phase::TaskFiles, path),
                        Err(err) => report.record_failure(sink, Phase::TaskFiles, name, err),
                    },
                }
            }
        });
    }

    fn write_subdirectory(
        &self,
        writer: &ArtifactWriter,
        sink: &dyn ProgressSink,
        report: &mut ScrapeReport,
    ) {
        let Some(subdir) = self.subdir.as_deref() else {
            return;
        };
        in_phase(sink, Phase::Subdirectory, || {
            let target = match writer.create_dir(subdir).and_then(|path| {
                report.record_directory(path);
                writer.subdir(subdir)
            }) {
                Ok(target) => target,
                Err(err) => {
                    report.record_failure(sink, Phase::Subdirectory, subdir, err);
                    return;
                }
            };
            for name in &self.deferred {
                match target.write(name, "") {
                    Ok(path) => report.record_written(sink, Phase::Subdirectory, path),
                    Err(err) => report.record_failure(sink, Phase::Subdirectory, name, err),
                }
            }
        });
    }
}

impl Scaffolder for HighScraper {
    fn write_files(&self, writer: &ArtifactWriter, sink: &dyn ProgressSink) -> ScrapeReport {
        let mut report = ScrapeReport::default();
        self.write_plan(writer, sink, &mut report);
        self.write_subdirectory(writer, sink, &mut report);
        report
    }

    fn write_checker(&self, writer: &ArtifactWriter, sink: &dyn ProgressSink) -> ScrapeReport {
        let paths: Vec<String> = self
            .entries
            .iter()
            .flat_map(FileEntry::names)
            .filter_map(|name| self.created_path(name))
            .collect();
        let files_with =
            |ext: &str| quoted(paths.iter().filter(|path| has_extension(path, ext)));

        let mut commands = Vec::new();
        if self.languages.javascript {
            commands.push(format!("semistandard --fix {}", files_with("js")));
        }
        if self.languages.python {
            commands.push(format!("pep8 {}", files_with("py")));
        }

        let mut report = ScrapeReport::default();
        let script = checker_script(&commands);
        in_phase(sink, Phase::Checker, || match writer.write(CHECKER_NAME, &script) {
            Ok(path) => report.record_written(sink, Phase::Checker, path),
            Err(err) => report.record_failure(sink, Phase::Checker, CHECKER_NAME, err),
        });
        report
    }
}
