//! README generation: the project title, resources, learning objectives and
//! one section per task, followed by an author footer.
//!
//! [`ReadmeScraper::scrape`] reads everything up front. Writing goes through
//! a [`ReadmeWriter`] that buffers the document and persists it once in
//! [`ReadmeWriter::finish`], so an aborted run never leaves half a README.

use std::path::{Path, PathBuf};

use hippo_logging::{hippo_debug, hippo_warn};
use scraper::Selector;
use url::Url;

use crate::document::{
    after_subtree, find_next_element, first_text, next_in_order, node_text, text_of, Adjacency,
    Document, DomNode,
};
use crate::persist::ArtifactWriter;
use crate::records::{FileEntry, FILE_LABEL, REPOSITORY_LABEL};
use crate::types::{in_phase, Phase, ProgressSink, ScrapeError, ScrapeReport};

pub const README_NAME: &str = "README.md";
/// Resource links starting with this prefix are relative to the intranet.
pub const RESOURCE_PREFIX: &str = "/rltoken/";
const TASK_BODY: &str = " Task Body ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    pub url: String,
}

/// Make a `/rltoken/` link absolute against `host`; other links pass through.
pub fn rewrite_resource_url(href: &str, host: &Url) -> String {
    if !href.starts_with(RESOURCE_PREFIX) {
        return href.to_string();
    }
    match host.join(href) {
        Ok(url) => url.to_string(),
        Err(err) => {
            hippo_warn!("cannot join {href} onto {host}: {err}");
            href.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadmeScraper {
    title: String,
    project_dir: Option<String>,
    resources: Option<Vec<Resource>>,
    objectives: Option<Vec<String>>,
    task_names: Vec<String>,
    files: Vec<Option<String>>,
    descriptions: Vec<Option<String>>,
}

impl ReadmeScraper {
    pub fn scrape(doc: &Document, resource_host: &Url) -> Result<Self, ScrapeError> {
        // Leading or trailing newlines would break the `# ` heading line.
        let title = doc
            .select_first("h1")
            .map(|h1| h1.text().collect::<String>().trim().to_string())
            .filter(|title| !title.is_empty())
            .ok_or(ScrapeError::MissingTitle)?;

        Ok(Self {
            title,
            project_dir: find_project_dir(doc),
            resources: find_resources(doc, resource_host),
            objectives: find_objectives(doc),
            task_names: doc
                .select_all("h4.task")
                .into_iter()
                .map(|h4| first_text(h4).unwrap_or_default())
                .collect(),
            files: doc
                .find_label_values(FILE_LABEL, Adjacency::Sibling)
                .into_iter()
                .map(|value| value.ok().map(|raw| FileEntry::parse(&raw).primary().to_string()))
                .collect(),
            descriptions: doc.comments_matching(TASK_BODY).map(task_description).collect(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Directory named in the repository block, when it looks like one.
    pub fn project_dir(&self) -> Option<&str> {
        self.project_dir.as_deref()
    }

    pub fn resources(&self) -> Option<&[Resource]> {
        self.resources.as_deref()
    }

    pub fn objectives(&self) -> Option<&[String]> {
        self.objectives.as_deref()
    }

    pub fn task_names(&self) -> &[String] {
        &self.task_names
    }

    /// Where the README goes: the project directory when it exists under
    /// `base`, otherwise `base` itself.
    pub fn readme_dir(&self, base: &Path) -> PathBuf {
        match &self.project_dir {
            Some(dir) if base.join(dir).is_dir() => base.join(dir),
            _ => base.to_path_buf(),
        }
    }

    pub fn open<'a>(&'a self, base: &Path, sink: &'a dyn ProgressSink) -> ReadmeWriter<'a> {
        ReadmeWriter {
            scraper: self,
            sink,
            writer: ArtifactWriter::new(self.readme_dir(base)),
            content: String::new(),
            report: ScrapeReport::default(),
        }
    }
}

pub struct ReadmeWriter<'a> {
    scraper: &'a ReadmeScraper,
    sink: &'a dyn ProgressSink,
    writer: ArtifactWriter,
    content: String,
    report: ScrapeReport,
}

impl ReadmeWriter<'_> {
    pub fn target_dir(&self) -> &Path {
        self.writer.dir()
    }

    pub fn write_title(&mut self) {
        in_phase(self.sink, Phase::Title, || {
            self.content.push_str(&format!("# {}\n\n", self.scraper.title));
        });
    }

    pub fn write_resources(&mut self) {
        in_phase(self.sink, Phase::Resources, || {
            self.content.push_str("## Resources:books:\nRead or watch:\n");
            match &self.scraper.resources {
                Some(resources) => {
                    for resource in resources {
                        if resource.name.is_empty() {
                            self.content.push_str(&format!("{}\n", resource.url));
                        } else {
                            self.content
                                .push_str(&format!("* [{}]({})\n", resource.name, resource.url));
                        }
                    }
                }
                None => self.report.record_failure(
                    self.sink,
                    Phase::Resources,
                    "resources",
                    "no resource list on the page",
                ),
            }
            self.content.push_str("\n---\n");
        });
    }

    pub fn write_objectives(&mut self) {
        in_phase(self.sink, Phase::Objectives, || {
            self.content
                .push_str("## Learning Objectives:bulb:\nWhat you should learn from this project:\n");
            match &self.scraper.objectives {
                Some(lines) => {
                    for line in lines {
                        if line.is_empty() {
                            self.content.push('\n');
                        } else {
                            self.content.push_str(&format!("* {line}\n"));
                        }
                    }
                }
                None => self.report.record_failure(
                    self.sink,
                    Phase::Objectives,
                    "learning objectives",
                    "no learning objectives on the page",
                ),
            }
            self.content.push_str("\n---\n");
        });
    }

    /// One section per task name, paired by position with the page's file
    /// names and task descriptions. Tasks missing either are reported.
    pub fn write_tasks(&mut self) {
        let scraper = self.scraper;
        in_phase(self.sink, Phase::Tasks, || {
            for (idx, name) in scraper.task_names.iter().enumerate() {
                let file = scraper.files.get(idx).and_then(Option::as_deref);
                let description = scraper.descriptions.get(idx).and_then(Option::as_deref);
                match (file, description) {
                    (Some(file), Some(description)) => {
                        self.content
                            .push_str(&format!("\n### [{name}](./{file})\n* {description}\n\n"));
                    }
                    (None, _) => self.report.record_failure(
                        self.sink,
                        Phase::Tasks,
                        name,
                        "no file name for task",
                    ),
                    (_, None) => self.report.record_failure(
                        self.sink,
                        Phase::Tasks,
                        name,
                        "no description for task",
                    ),
                }
            }
        });
    }

    pub fn write_footer(&mut self, author: &str, user: &str, profile_url: &str) {
        in_phase(self.sink, Phase::Author, || {
            self.content.push_str(&format!(
                "---\n\n## Author\n* **{author}** - [{user}]({profile_url})\n"
            ));
        });
    }

    /// Persist the README. Sections that could not be written are listed in
    /// the returned report.
    pub fn finish(mut self) -> Result<ScrapeReport, ScrapeError> {
        let path = self.writer.write(README_NAME, &self.content)?;
        hippo_debug!("README written to {}", path.display());
        self.report.written.push(path);
        Ok(self.report)
    }
}

fn find_project_dir(doc: &Document) -> Option<String> {
    let label = doc.label_nodes(REPOSITORY_LABEL).next()?;
    let li = find_next_element(label, "li")?;
    let value = next_in_order(*li).and_then(next_in_order).map(node_text)?;
    let value = value.trim();
    if value.contains('-') {
        Some(value.to_string())
    } else {
        hippo_warn!("failed to find directory name, got {value:?}");
        None
    }
}

fn find_objectives(doc: &Document) -> Option<Vec<String>> {
    let h2 = doc.heading("h2", "Learning Objectives")?;
    let h3 = find_next_element(*h2, "h3")?;
    let list = std::iter::successors(after_subtree(*h3), |node| next_in_order(*node))
        .find(|node| node.value().is_element())?;
    Some(
        node_text(list)
            .lines()
            .map(|line| line.trim().to_string())
            .collect(),
    )
}

fn find_resources(doc: &Document, host: &Url) -> Option<Vec<Resource>> {
    let h2 = doc.heading("h2", "Resources")?;
    let p = find_next_element(*h2, "p")?;
    let ul = find_next_element(*p, "ul")?;
    let anchors = Selector::parse("a[href]").ok()?;
    Some(
        ul.select(&anchors)
            .filter_map(|a| {
                let href = a.value().attr("href")?;
                Some(Resource {
                    name: a.text().collect::<String>().trim().to_string(),
                    url: rewrite_resource_url(href, host),
                })
            })
            .collect(),
    )
}

/// Text of the first non-blank node after a task body comment.
fn task_description(comment: DomNode<'_>) -> Option<String> {
    let node = std::iter::successors(next_in_order(comment), |node| next_in_order(*node))
        .find(|node| match text_of(*node) {
            Some(text) => !text.trim().is_empty(),
            None => node.value().is_element(),
        })?;
    let text = node_text(node);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn host() -> Url {
        Url::parse("https://intranet.hbtn.io").unwrap()
    }

    #[test]
    fn rltoken_links_are_made_absolute() {
        assert_eq!(
            rewrite_resource_url("/rltoken/abc", &host()),
            "https://intranet.hbtn.io/rltoken/abc"
        );
        assert_eq!(
            rewrite_resource_url("https://example.com/x", &host()),
            "https://example.com/x"
        );
    }

    #[test]
    fn project_dir_comes_from_the_repository_block() {
        let doc = Document::parse(
            "<h1>0x00. C - Hello, World</h1><ul>\
             <li>GitHub repository: <code>holbertonschool-low_level_programming</code></li>\
             <li>Directory: <code>0x00-hello_world</code></li></ul>",
        );
        let scraper = ReadmeScraper::scrape(&doc, &host()).unwrap();
        assert_eq!(scraper.title(), "0x00. C - Hello, World");
        assert_eq!(scraper.project_dir(), Some("0x00-hello_world"));
    }

    #[test]
    fn title_keeps_inner_text_and_drops_surrounding_whitespace() {
        let doc = Document::parse("<h1>\n  0x01. C -  Variables, if, else  \n</h1>");
        let scraper = ReadmeScraper::scrape(&doc, &host()).unwrap();
        assert_eq!(scraper.title(), "0x01. C -  Variables, if, else");
    }

    #[test]
    fn missing_title_is_fatal() {
        let doc = Document::parse("<p>no heading</p>");
        assert!(matches!(
            ReadmeScraper::scrape(&doc, &host()),
            Err(ScrapeError::MissingTitle)
        ));
    }

    #[test]
    fn objectives_keep_blank_lines() {
        let doc = Document::parse(
            "<h1>T</h1><h2>Learning Objectives</h2><h3>General</h3>\n\
             <ul>\n<li>What is a pointer</li>\n\n<li>How to use it</li>\n</ul>",
        );
        let scraper = ReadmeScraper::scrape(&doc, &host()).unwrap();
        assert_eq!(
            scraper.objectives().unwrap(),
            ["", "What is a pointer", "", "How to use it"]
        );
    }
}
