//! Scrapers turning a project page into files on disk.
//!
//! Each scaffold scraper extracts everything it needs at construction and
//! only touches the filesystem in [`Scaffolder::write_files`], always through
//! the explicit [`ArtifactWriter`] it is handed.
mod fixtures;
mod high;
mod low;
mod readme;
mod sys;

pub use fixtures::{diagnostic_label, extract_fixture, Fixture, FixtureError, FixtureScraper};
pub use high::{HighScraper, Languages};
pub use low::{function_name, include_guard, LowScraper, PUTCHAR_SOURCE};
pub use readme::{
    rewrite_resource_url, ReadmeScraper, ReadmeWriter, Resource, README_NAME, RESOURCE_PREFIX,
};
pub use sys::SysScraper;

use std::path::Path;

use crate::persist::ArtifactWriter;
use crate::types::{ProgressSink, ScrapeReport};

pub const CHECKER_NAME: &str = "check.sh";

pub trait Scaffolder {
    /// Create every source artifact for the project in `writer`'s directory.
    fn write_files(&self, writer: &ArtifactWriter, sink: &dyn ProgressSink) -> ScrapeReport;

    /// Create a `check.sh` running the project's style checker.
    fn write_checker(&self, _writer: &ArtifactWriter, _sink: &dyn ProgressSink) -> ScrapeReport {
        ScrapeReport::default()
    }
}

/// Shebang line chosen from a file name's extension.
pub(crate) fn shebang_for(name: &str) -> Option<&'static str> {
    match Path::new(name).extension().and_then(|ext| ext.to_str()) {
        Some("py") => Some("#!/usr/bin/python3"),
        Some("sh") => Some("#!/bin/bash"),
        Some("js") => Some("#!/usr/bin/node"),
        _ => None,
    }
}

pub(crate) fn has_extension(name: &str, wanted: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == wanted)
}

pub(crate) fn checker_script(commands: &[String]) -> String {
    let mut script = String::from("#!/usr/bin/env bash\n");
    for command in commands {
        script.push_str(command);
        script.push('\n');
    }
    script
}

pub(crate) fn quoted(names: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    names
        .into_iter()
        .map(|name| format!("\"{}\"", name.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
