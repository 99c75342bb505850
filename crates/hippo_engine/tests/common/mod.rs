#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use hippo_engine::{Phase, ProgressSink, ScrapeEvent};

pub const LOW_LEVEL_PAGE: &str = include_str!("../fixtures/low_level.html");
pub const HIGH_LEVEL_PAGE: &str = include_str!("../fixtures/high_level.html");

#[derive(Default, Clone)]
pub struct TestSink {
    events: Arc<Mutex<Vec<ScrapeEvent>>>,
}

impl TestSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<ScrapeEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }

    pub fn started_phases(&self) -> Vec<Phase> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                ScrapeEvent::PhaseStarted(phase) => Some(*phase),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: ScrapeEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Sorted names of the entries directly inside `dir`.
pub fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

pub fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}
