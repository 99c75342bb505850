mod common;

use std::fs;
use std::path::Path;

use common::{read, TestSink, HIGH_LEVEL_PAGE, LOW_LEVEL_PAGE};
use hippo_engine::{
    Document, Phase, ReadmeScraper, Resource, ScrapeEvent, ScrapeReport, SilentSink, README_NAME,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use url::Url;

fn host() -> Url {
    Url::parse("https://intranet.hbtn.io").unwrap()
}

fn write_all(scraper: &ReadmeScraper, base: &Path, sink: &TestSink) -> ScrapeReport {
    let mut readme = scraper.open(base, sink);
    readme.write_title();
    readme.write_resources();
    readme.write_objectives();
    readme.write_tasks();
    readme.write_footer("Ada Lovelace", "ada", "github.com/ada");
    readme.finish().unwrap()
}

#[test]
fn full_readme_for_a_project_page() {
    let temp = TempDir::new().unwrap();
    let scraper = ReadmeScraper::scrape(&Document::parse(LOW_LEVEL_PAGE), &host()).unwrap();
    let report = write_all(&scraper, temp.path(), &TestSink::new());

    assert!(report.is_clean(), "{:?}", report.failures);
    assert_eq!(report.written, [temp.path().join(README_NAME)]);
    assert_eq!(
        read(temp.path(), README_NAME),
        concat!(
            "# 0x02. C - Functions, nested loops\n",
            "\n",
            "## Resources:books:\n",
            "Read or watch:\n",
            "* [Nested while loops](https://intranet.hbtn.io/rltoken/aBcD12)\n",
            "* [C - Functions](https://www.cprogramming.com/tutorial/c/lesson4.html)\n",
            "\n",
            "---\n",
            "## Learning Objectives:bulb:\n",
            "What you should learn from this project:\n",
            "\n",
            "* What are nested loops and how to use them\n",
            "* What is a function and how do you use functions\n",
            "\n",
            "---\n",
            "\n",
            "### [0. _putchar](./0-putchar.c)\n",
            "* Write a program that prints _putchar, followed by a new line.\n",
            "\n",
            "\n",
            "### [1. I sometimes suffer from insomnia](./1-alphabet.c)\n",
            "* Write a function that prints the alphabet, in lowercase, followed by a new line.\n",
            "\n",
            "\n",
            "### [2. Is lower](./2-islower.c)\n",
            "* Write a function that checks for lowercase character.\n",
            "\n",
            "---\n",
            "\n",
            "## Author\n",
            "* **Ada Lovelace** - [ada](github.com/ada)\n",
        )
    );
}

#[test]
fn readme_goes_into_an_existing_project_directory() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("0x02-functions_nested_loops");
    fs::create_dir(&project).unwrap();

    let scraper = ReadmeScraper::scrape(&Document::parse(LOW_LEVEL_PAGE), &host()).unwrap();
    assert_eq!(scraper.project_dir(), Some("0x02-functions_nested_loops"));
    write_all(&scraper, temp.path(), &TestSink::new());

    assert!(project.join(README_NAME).is_file());
    assert!(!temp.path().join(README_NAME).exists());
}

#[test]
fn directory_without_a_hyphen_falls_back_to_the_base_directory() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("nohyphen")).unwrap();
    let doc = Document::parse(
        "<h1>Big project</h1><ul>\
         <li>GitHub repository: <code>holbertonschool-higher_level_programming</code></li>\
         <li>Directory: <code>nohyphen</code></li></ul>",
    );

    let scraper = ReadmeScraper::scrape(&doc, &host()).unwrap();
    assert_eq!(scraper.project_dir(), None);
    assert_eq!(scraper.readme_dir(temp.path()), temp.path());

    write_all(&scraper, temp.path(), &TestSink::new());
    assert!(temp.path().join(README_NAME).is_file());
    assert!(!temp.path().join("nohyphen").join(README_NAME).exists());
}

#[test]
fn relative_resources_point_at_the_host() {
    let scraper = ReadmeScraper::scrape(&Document::parse(LOW_LEVEL_PAGE), &host()).unwrap();
    assert_eq!(
        scraper.resources().unwrap(),
        [
            Resource {
                name: "Nested while loops".to_string(),
                url: "https://intranet.hbtn.io/rltoken/aBcD12".to_string(),
            },
            Resource {
                name: "C - Functions".to_string(),
                url: "https://www.cprogramming.com/tutorial/c/lesson4.html".to_string(),
            },
        ]
    );
}

#[test]
fn missing_resources_section_keeps_the_static_lines() {
    let temp = TempDir::new().unwrap();
    let sink = TestSink::new();
    let scraper = ReadmeScraper::scrape(&Document::parse(HIGH_LEVEL_PAGE), &host()).unwrap();
    assert_eq!(scraper.resources(), None);

    let report = write_all(&scraper, temp.path(), &sink);
    let phases: Vec<Phase> = report.failures.iter().map(|failure| failure.phase).collect();
    assert_eq!(phases, [Phase::Resources]);

    let readme = read(temp.path(), README_NAME);
    assert!(readme.starts_with(concat!(
        "# 0x0C. Python - Almost a circle\n\n",
        "## Resources:books:\nRead or watch:\n\n---\n",
        "## Learning Objectives:bulb:\n",
    )));
    assert!(readme.contains("* What is *args and how to use it\n"));
    assert!(sink.take().iter().any(|event| matches!(
        event,
        ScrapeEvent::ItemFailed(failure) if failure.phase == Phase::Resources
    )));
}

#[test]
fn tasks_without_a_description_are_reported_not_invented() {
    let doc = Document::parse(
        r#"<html><body><h1>0x09. Static libraries</h1>
<h4 class="task">0. A library is not a luxury</h4>
<!-- Task Body -->
<p>Create the static library libmy.a.</p>
<ul><li>File: <code>libmy.a, main.h</code></li></ul>
<h4 class="task">1. Without libraries what have we</h4>
<!-- Task Body -->
<p>Create a script that creates a static library.</p>
<ul><li>File: <code>create_static_lib.sh</code></li></ul>
<h4 class="task">2. Advanced</h4>
<ul><li>File: <code>100-advanced.c</code></li></ul>
</body></html>"#,
    );
    let temp = TempDir::new().unwrap();
    let scraper = ReadmeScraper::scrape(&doc, &host()).unwrap();
    assert_eq!(scraper.task_names().len(), 3);

    let mut readme = scraper.open(temp.path(), &SilentSink);
    readme.write_tasks();
    let report = readme.finish().unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].item, "2. Advanced");
    assert_eq!(
        read(temp.path(), README_NAME),
        concat!(
            "\n### [0. A library is not a luxury](./libmy.a)\n",
            "* Create the static library libmy.a.\n\n",
            "\n### [1. Without libraries what have we](./create_static_lib.sh)\n",
            "* Create a script that creates a static library.\n\n",
        )
    );
}
