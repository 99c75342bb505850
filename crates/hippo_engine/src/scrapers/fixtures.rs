use hippo_logging::hippo_trace;

use crate::document::Document;
use crate::persist::ArtifactWriter;
use crate::scrapers::Scaffolder;
use crate::types::{in_phase, Phase, ProgressSink, ScrapeReport};

const NOT_A_TEST_FILE: &str = "[Not a test file]";
const CAT: &str = "cat ";

/// Extensions recognised in a transcript, in precedence order. C files are
/// only recognised through a `main.c` test driver.
const MARKERS: [(&str, &str); 4] = [
    ("main.c", ".c"),
    (".sql", ".sql"),
    (".js", ".js"),
    (".py", ".py"),
];
const HTML: &str = ".html";

/// A file reconstructed from a `cat <file>` shell transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub name: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FixtureError {
    #[error("transcript has no shell prompt")]
    MissingPrompt,
    #[error("no {extension} file name follows `cat`")]
    MissingName { extension: &'static str },
    #[error("file name {0:?} is not a single word")]
    InvalidName(String),
    #[error("transcript ends on the `cat` line")]
    MissingBody,
}

/// Reconstruct the file shown in one `<pre>` transcript.
///
/// Returns `None` when the block is not a transcript of a test file at all.
pub fn extract_fixture(block: &str) -> Option<Result<Fixture, FixtureError>> {
    if !block.contains("cat") {
        return None;
    }
    let is_html = block.contains(HTML);
    let extension = MARKERS
        .iter()
        .find(|(marker, _)| block.contains(marker))
        .map(|(_, extension)| *extension);
    let extension = if is_html { HTML } else { extension? };
    Some(parse_transcript(block, extension, is_html))
}

fn parse_transcript(
    block: &str,
    extension: &'static str,
    is_html: bool,
) -> Result<Fixture, FixtureError> {
    let prompt = block
        .split_once('$')
        .map(|(prompt, _)| prompt)
        .filter(|prompt| !prompt.is_empty())
        .ok_or(FixtureError::MissingPrompt)?;

    let cat_at = block.find(CAT).ok_or(FixtureError::MissingName { extension })?;
    let after_cat = &block[cat_at + CAT.len()..];
    let stem_len = after_cat
        .find(extension)
        .ok_or(FixtureError::MissingName { extension })?;
    let name = format!("{}{extension}", &after_cat[..stem_len]);
    if stem_len == 0 || name.chars().any(char::is_whitespace) {
        return Err(FixtureError::InvalidName(name));
    }

    // Everything after the echoed `cat` line, up to the next prompt.
    let rest = if is_html {
        let at = block.find(HTML).unwrap_or_default();
        let after = &block[at + HTML.len()..];
        let until_prompt = after.split(prompt).next().unwrap_or_default();
        let (_, body) = until_prompt.split_once('\n').ok_or(FixtureError::MissingBody)?;
        body
    } else {
        let after = &after_cat[stem_len + extension.len()..];
        let (_, body) = after.split_once('\n').ok_or(FixtureError::MissingBody)?;
        body.split(prompt).next().unwrap_or_default()
    };

    let body = match rest.rfind('\n') {
        Some(last) => &rest[..=last],
        None => "",
    };
    Ok(Fixture {
        name,
        body: body.to_string(),
    })
}

/// Label used when reporting a block that could not be turned into a file:
/// the block itself when short, a placeholder otherwise.
pub fn diagnostic_label(block: &str) -> String {
    if block.matches('\n').count() > 1 {
        NOT_A_TEST_FILE.to_string()
    } else {
        block.to_string()
    }
}

/// Writes the test drivers and fixtures shown in `<pre>` transcripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureScraper {
    blocks: Vec<String>,
}

impl FixtureScraper {
    pub fn new(doc: &Document) -> Self {
        Self {
            blocks: doc
                .select_all("pre")
                .into_iter()
                .map(|pre| pre.text().collect())
                .collect(),
        }
    }

    pub fn fixtures(&self) -> impl Iterator<Item = (&str, Result<Fixture, FixtureError>)> {
        self.blocks
            .iter()
            .filter_map(|block| extract_fixture(block).map(|fixture| (block.as_str(), fixture)))
    }
}

impl Scaffolder for FixtureScraper {
    fn write_files(&self, writer: &ArtifactWriter, sink: &dyn ProgressSink) -> ScrapeReport {
        let mut report = ScrapeReport::default();
        in_phase(sink, Phase::TestFiles, || {
            for (block, fixture) in self.fixtures() {
                let fixture = match fixture {
                    Ok(fixture) => fixture,
                    Err(err) => {
                        report.record_failure(sink, Phase::TestFiles, diagnostic_label(block), err);
                        continue;
                    }
                };
                hippo_trace!("{} has {} bytes", fixture.name, fixture.body.len());
                match writer.write(&fixture.name, &fixture.body) {
                    Ok(path) => report.record_written(sink, Phase::TestFiles, path),
                    Err(err) => report.record_failure(sink, Phase::TestFiles, fixture.name, err),
                }
            }
        });
        report
    }
}
