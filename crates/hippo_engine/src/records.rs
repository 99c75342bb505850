use crate::document::{value_after_label, Adjacency, Document, MarkerError};

pub const FILE_LABEL: &str = "File: ";
pub const PROTOTYPE_LABEL: &str = "Prototype: ";
pub const DIRECTORY_LABEL: &str = "Directory: ";
pub const REPOSITORY_LABEL: &str = "GitHub repository: ";

/// The value of one `File:` marker. Several deliverables of one task are
/// listed comma-separated, e.g. `0-main.py, models/base.py`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    raw: String,
    names: Vec<String>,
}

impl FileEntry {
    pub fn parse(raw: &str) -> Self {
        let names = raw
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        Self {
            raw: raw.trim().to_string(),
            names,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Text strictly before the first comma.
    pub fn primary(&self) -> &str {
        self.raw.split(',').next().unwrap_or_default().trim()
    }

    pub fn is_group(&self) -> bool {
        self.raw.contains(',')
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Deliverable of one task together with the prototypes listed in that task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFiles {
    pub entry: Result<FileEntry, MarkerError>,
    pub prototypes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskScan {
    pub tasks: Vec<TaskFiles>,
    /// Prototypes listed after the last `File:` marker.
    pub trailing_prototypes: Vec<String>,
    pub errors: Vec<MarkerError>,
}

impl TaskScan {
    /// Single document-order pass over `Prototype:` and `File:` markers.
    ///
    /// Prototypes belong to the next `File:` marker: on the project page a
    /// task body lists its prototypes before the repository block naming
    /// the file.
    pub fn collect(doc: &Document) -> Self {
        let mut scan = TaskScan::default();
        let mut pending = Vec::new();

        for node in doc.text_nodes() {
            let Some(text) = crate::document::text_of(node) else {
                continue;
            };
            if text.contains(PROTOTYPE_LABEL) {
                match value_after_label(node, PROTOTYPE_LABEL, Adjacency::Sibling) {
                    Ok(value) => pending.push(clean_prototype(&value)),
                    Err(err) => scan.errors.push(err),
                }
            } else if text.contains(FILE_LABEL) {
                let entry = value_after_label(node, FILE_LABEL, Adjacency::Sibling)
                    .map(|value| FileEntry::parse(&value));
                scan.tasks.push(TaskFiles {
                    entry,
                    prototypes: std::mem::take(&mut pending),
                });
            }
        }

        scan.trailing_prototypes = pending;
        scan
    }

    /// Every prototype on the page, in document order.
    pub fn all_prototypes(&self) -> Vec<String> {
        self.tasks
            .iter()
            .flat_map(|task| task.prototypes.iter())
            .chain(self.trailing_prototypes.iter())
            .cloned()
            .collect()
    }
}

fn clean_prototype(raw: &str) -> String {
    raw.replace(';', "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn primary_is_text_before_first_comma() {
        let entry = FileEntry::parse("0-main.py, models/base.py, models/__init__.py");
        assert_eq!(entry.primary(), "0-main.py");
        assert!(entry.is_group());
        assert_eq!(
            entry.names(),
            ["0-main.py", "models/base.py", "models/__init__.py"]
        );
    }

    #[test]
    fn prototypes_attach_to_the_following_file() {
        let doc = Document::parse(
            r#"<body>
<ul><li>Prototype: <code>int add(int a, int b);</code></li>
<li>Prototype: <code>int sub(int a, int b);</code></li></ul>
<ul><li>File: <code>0-add.c</code></li></ul>
<ul><li>File: <code>1-nothing.c</code></li></ul>
<ul><li>Prototype: <code>void tail(void);</code></li></ul>
</body>"#,
        );
        let scan = TaskScan::collect(&doc);

        assert_eq!(scan.tasks.len(), 2);
        assert_eq!(
            scan.tasks[0].prototypes,
            vec!["int add(int a, int b)", "int sub(int a, int b)"]
        );
        assert!(scan.tasks[1].prototypes.is_empty());
        assert_eq!(scan.trailing_prototypes, vec!["void tail(void)"]);
        assert_eq!(scan.all_prototypes().len(), 3);
    }

    #[test]
    fn page_without_markers_scans_empty() {
        let scan = TaskScan::collect(&Document::parse("<p>nothing here</p>"));
        assert_eq!(scan, TaskScan::default());
    }
}
