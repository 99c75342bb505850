mod common;

use common::{listing, read, TestSink, LOW_LEVEL_PAGE};
use hippo_engine::{
    ArtifactWriter, Document, LowScraper, Phase, Scaffolder, ScrapeEvent, SilentSink,
    PUTCHAR_SOURCE,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn page_details_are_read_up_front() {
    let scraper = LowScraper::new(&Document::parse(LOW_LEVEL_PAGE));
    assert!(scraper.uses_putchar());
    assert_eq!(scraper.header_name(), Some("main.h"));
    assert_eq!(
        scraper.prototypes(),
        ["void print_alphabet(void)", "int _islower(int c)"]
    );
}

#[test]
fn three_files_and_two_prototypes_give_two_stubs() {
    let temp = TempDir::new().unwrap();
    let scraper = LowScraper::new(&Document::parse(LOW_LEVEL_PAGE));
    let report = scraper.write_files(&ArtifactWriter::new(temp.path()), &SilentSink);

    assert!(report.is_clean(), "{:?}", report.failures);
    assert_eq!(
        listing(temp.path()),
        ["1-alphabet.c", "2-islower.c", "_putchar.c", "main.h"]
    );
    assert_eq!(read(temp.path(), "_putchar.c"), PUTCHAR_SOURCE);
}

#[test]
fn header_declares_putchar_and_every_prototype() {
    let temp = TempDir::new().unwrap();
    let scraper = LowScraper::new(&Document::parse(LOW_LEVEL_PAGE));
    scraper.write_files(&ArtifactWriter::new(temp.path()), &SilentSink);

    assert_eq!(
        read(temp.path(), "main.h"),
        "#ifndef MAIN_H
#define MAIN_H

#include <stdio.h>
#include <stdlib.h>

int _putchar(char c);
void print_alphabet(void);
int _islower(int c);

#endif /* MAIN_H */
"
    );
}

#[test]
fn stub_includes_header_and_doc_skeleton() {
    let temp = TempDir::new().unwrap();
    let scraper = LowScraper::new(&Document::parse(LOW_LEVEL_PAGE));
    scraper.write_files(&ArtifactWriter::new(temp.path()), &SilentSink);

    assert_eq!(
        read(temp.path(), "2-islower.c"),
        concat!(
            "#include \"main.h\"\n\n",
            "/**\n * _islower -\n *\n * Return: \n */\n",
            "int _islower(int c)\n{\n\n}\n",
        )
    );
}

#[test]
fn comma_entries_create_only_the_first_file() {
    let doc = Document::parse(
        r#"<ul>
<li>Prototype: <code>int add(int a, int b);</code></li>
<li>File: <code>3-calc.c, 3-calc.h</code></li>
</ul>"#,
    );
    let temp = TempDir::new().unwrap();
    let report = LowScraper::new(&doc).write_files(&ArtifactWriter::new(temp.path()), &SilentSink);

    assert!(report.is_clean());
    assert_eq!(listing(temp.path()), ["3-calc.c"]);
    assert!(!read(temp.path(), "3-calc.c").contains("#include"));
}

#[test]
fn phases_are_reported_in_order() {
    let temp = TempDir::new().unwrap();
    let sink = TestSink::new();
    LowScraper::new(&Document::parse(LOW_LEVEL_PAGE))
        .write_files(&ArtifactWriter::new(temp.path()), &sink);

    assert_eq!(
        sink.started_phases(),
        [Phase::Putchar, Phase::Header, Phase::TaskFiles]
    );
    let written = sink
        .take()
        .into_iter()
        .filter(|event| matches!(event, ScrapeEvent::ArtifactWritten { .. }))
        .count();
    assert_eq!(written, 4);
}

#[test]
fn unwritable_stub_is_reported_and_the_rest_continue() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("1-alphabet.c")).unwrap();
    let report = LowScraper::new(&Document::parse(LOW_LEVEL_PAGE))
        .write_files(&ArtifactWriter::new(temp.path()), &SilentSink);

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].item, "1-alphabet.c");
    assert!(temp.path().join("2-islower.c").is_file());
}

#[test]
fn checker_runs_betty_on_header_and_sources() {
    let temp = TempDir::new().unwrap();
    let scraper = LowScraper::new(&Document::parse(LOW_LEVEL_PAGE));
    let report = scraper.write_checker(&ArtifactWriter::new(temp.path()), &SilentSink);

    assert!(report.is_clean());
    assert_eq!(
        read(temp.path(), "check.sh"),
        "#!/usr/bin/env bash\nbetty \"main.h\" \"0-putchar.c\" \"1-alphabet.c\" \"2-islower.c\"\n"
    );
}

#[test]
fn empty_prototype_marker_is_reported_and_the_rest_continue() {
    let doc = Document::parse(
        "<ul><li>Prototype: </li></ul>\
         <ul><li>Prototype: <code>int add(int a, int b);</code></li></ul>\
         <ul><li>File: <code>0-add.c</code></li></ul>",
    );
    let temp = TempDir::new().unwrap();
    let sink = TestSink::new();
    let report = LowScraper::new(&doc).write_files(&ArtifactWriter::new(temp.path()), &sink);

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].item, "prototype");
    assert_eq!(report.failures[0].phase, Phase::TaskFiles);
    let failed = sink
        .take()
        .into_iter()
        .filter(|event| matches!(event, ScrapeEvent::ItemFailed(_)))
        .count();
    assert_eq!(failed, 1);
    assert_eq!(listing(temp.path()), ["0-add.c"]);
}
