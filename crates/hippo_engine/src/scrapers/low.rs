use hippo_logging::{hippo_debug, hippo_warn};

use crate::document::{preceding, text_of, value_after_label, Adjacency, Document, MarkerError};
use crate::persist::ArtifactWriter;
use crate::records::{TaskFiles, TaskScan};
use crate::scrapers::{checker_script, quoted, Scaffolder, CHECKER_NAME};
use crate::types::{in_phase, Phase, ProgressSink, ScrapeReport};

const PUTCHAR_PHRASE: &str = "You are allowed to use";
const PUTCHAR_NAME: &str = "_putchar";
const PUTCHAR_FILE: &str = "_putchar.c";
const PUTCHAR_PROTOTYPE: &str = "int _putchar(char c);";
const HEADER_PHRASE: &str = "forget to push your header file";

pub const PUTCHAR_SOURCE: &str = "#include <unistd.h>

/**
 * _putchar - write a character to stdout
 * @c: the character to write
 *
 * Return: On error, -1 is returned, and errno is set appropriately.
 * Otherwise, 1 is returned.
 */
int _putchar(char c)
{
\treturn (write(STDOUT_FILENO, &c, 1));
}
";

/// Scraper for C projects: `_putchar.c`, one header, one stub per task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowScraper {
    putchar: bool,
    header: Option<String>,
    prototypes: Vec<String>,
    tasks: Vec<TaskFiles>,
    prototype_errors: Vec<MarkerError>,
}

impl LowScraper {
    pub fn new(doc: &Document) -> Self {
        let scan = TaskScan::collect(doc);
        Self {
            putchar: find_putchar(doc),
            header: find_header(doc),
            prototypes: scan.all_prototypes(),
            tasks: scan.tasks,
            prototype_errors: scan.errors,
        }
    }

    pub fn uses_putchar(&self) -> bool {
        self.putchar
    }

    pub fn header_name(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn prototypes(&self) -> &[String] {
        &self.prototypes
    }

    pub fn render_header(&self) -> Option<String> {
        let header = self.header.as_deref()?;
        let guard = include_guard(header);
        let mut out = format!(
            "#ifndef {guard}\n#define {guard}\n\n#include <stdio.h>\n#include <stdlib.h>\n\n"
        );
        if self.putchar {
            out.push_str(PUTCHAR_PROTOTYPE);
            out.push('\n');
        }
        for prototype in &self.prototypes {
            out.push_str(prototype);
            out.push_str(";\n");
        }
        out.push_str(&format!("\n#endif /* {guard} */\n"));
        Some(out)
    }

    pub fn render_stub(&self, prototypes: &[String]) -> String {
        let mut out = String::new();
        if let Some(header) = &self.header {
            out.push_str(&format!("#include \"{header}\"\n\n"));
        }
        let bodies: Vec<String> = prototypes
            .iter()
            .map(|prototype| {
                format!(
                    "/**\n * {} -\n *\n * Return: \n */\n{prototype}\n{{\n\n}}\n",
                    function_name(prototype)
                )
            })
            .collect();
        out.push_str(&bodies.join("\n"));
        out
    }

    fn write_putchar(
        &self,
        writer: &ArtifactWriter,
        sink: &dyn ProgressSink,
        report: &mut ScrapeReport,
    ) {
        if !self.putchar {
            return;
        }
        in_phase(sink, Phase::Putchar, || match writer.write(PUTCHAR_FILE, PUTCHAR_SOURCE) {
            Ok(path) => report.record_written(sink, Phase::Putchar, path),
            Err(err) => report.record_failure(sink, Phase::Putchar, PUTCHAR_FILE, err),
        });
    }

    fn write_header(
        &self,
        writer: &ArtifactWriter,
        sink: &dyn ProgressSink,
        report: &mut ScrapeReport,
    ) {
        let (Some(header), Some(content)) = (self.header.as_deref(), self.render_header()) else {
            hippo_debug!("no header file required");
            return;
        };
        in_phase(sink, Phase::Header, || match writer.write(header, &content) {
            Ok(path) => report.record_written(sink, Phase::Header, path),
            Err(err) => report.record_failure(sink, Phase::Header, header, err),
        });
    }

    fn write_stubs(
        &self,
        writer: &ArtifactWriter,
        sink: &dyn ProgressSink,
        report: &mut ScrapeReport,
    ) {
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
                // Tasks without a prototype (scripts, makefiles) get no stub.
                if task.prototypes.is_empty() {
                    hippo_debug!("no prototype for {}, not stubbed", entry.raw());
                    continue;
                }
                let name = entry.primary();
                match writer.write(name, &self.render_stub(&task.prototypes)) {
                    Ok(path) => report.record_written(sink, Phase::TaskFiles, path),
                    Err(err) => report.record_failure(sink, Phase::TaskFiles, entry.raw(), err),
                }
            }
        });
    }
}

impl Scaffolder for LowScraper {
    fn write_files(&self, writer: &ArtifactWriter, sink: &dyn ProgressSink) -> ScrapeReport {
        let mut report = ScrapeReport::default();
        self.write_putchar(writer, sink, &mut report);
        self.write_header(writer, sink, &mut report);
        self.write_stubs(writer, sink, &mut report);
        report
    }

    fn write_checker(&self, writer: &ArtifactWriter, sink: &dyn ProgressSink) -> ScrapeReport {
        let mut report = ScrapeReport::default();
        let files = self.header.iter().cloned().chain(
            self.tasks
                .iter()
                .filter_map(|task| task.entry.as_ref().ok())
                .flat_map(|entry| entry.names().iter().cloned()),
        );
        let script = checker_script(&[format!("betty {}", quoted(files))]);
        in_phase(sink, Phase::Checker, || match writer.write(CHECKER_NAME, &script) {
            Ok(path) => report.record_written(sink, Phase::Checker, path),
            Err(err) => report.record_failure(sink, Phase::Checker, CHECKER_NAME, err),
        });
        report
    }
}

/// `main.h` -> `MAIN_H`: first `.` becomes `_`, then uppercase.
pub fn include_guard(header: &str) -> String {
    header.replacen('.', "_", 1).to_uppercase()
}

/// Function name of a C prototype: `char *_strcpy(char *dest, char *src)`
/// gives `_strcpy`.
pub fn function_name(prototype: &str) -> &str {
    let head = prototype.split('(').next().unwrap_or(prototype);
    let last_word = head.split(' ').next_back().unwrap_or(head);
    last_word.split('*').next_back().unwrap_or(last_word)
}

fn find_putchar(doc: &Document) -> bool {
    doc.label_nodes(PUTCHAR_PHRASE).any(|node| {
        text_of(node).is_some_and(|text| text.trim() == PUTCHAR_PHRASE)
            && value_after_label(node, PUTCHAR_PHRASE, Adjacency::Sibling)
                .is_ok_and(|value| value == PUTCHAR_NAME)
    })
}

/// The header name is the last text before the "don't forget to push your
/// header file" reminder.
fn find_header(doc: &Document) -> Option<String> {
    let reminder = doc.label_nodes(HEADER_PHRASE).next()?;
    let candidate = preceding(reminder)
        .filter_map(text_of)
        .map(str::trim)
        .find(|text| !text.is_empty())?;
    if candidate.ends_with(".h") {
        Some(candidate.to_string())
    } else {
        hippo_warn!("text before header reminder is not a header name: {candidate:?}");
        None
    }
}
