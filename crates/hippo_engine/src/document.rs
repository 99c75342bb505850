//! Parsed project page and the typed queries the scrapers run against it.
//!
//! Every query walks the `scraper` tree in document order. Nothing here
//! mutates the tree, so one [`Document`] is shared read-only by all scrapers.

use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

pub type DomNode<'a> = NodeRef<'a, Node>;

/// Where the value of a marker lives relative to the marker's text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjacency {
    /// The next sibling of the label text, e.g. `File: <code>0-main.c</code>`.
    Sibling,
    /// The next node in document order, descending into the following element.
    Descend,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkerError {
    #[error("nothing follows marker {label:?}")]
    MissingValue { label: String },
    #[error("marker {label:?} is followed by empty text")]
    EmptyValue { label: String },
}

pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// All text nodes, in document order.
    pub fn text_nodes(&self) -> impl Iterator<Item = DomNode<'_>> {
        self.html
            .tree
            .root()
            .descendants()
            .filter(|node| node.value().is_text())
    }

    /// Text nodes whose content contains `label`.
    pub fn label_nodes<'a>(&'a self, label: &'a str) -> impl Iterator<Item = DomNode<'a>> + 'a {
        self.text_nodes()
            .filter(move |node| text_of(*node).is_some_and(|text| text.contains(label)))
    }

    /// Values adjacent to every occurrence of `label`, in document order.
    ///
    /// An absent label yields an empty vector. A label whose neighbour is
    /// missing or blank yields an `Err` in its slot; other slots are unaffected.
    pub fn find_label_values(
        &self,
        label: &str,
        adjacency: Adjacency,
    ) -> Vec<Result<String, MarkerError>> {
        self.label_nodes(label)
            .map(|node| value_after_label(node, label, adjacency))
            .collect()
    }

    pub fn first_label_value(
        &self,
        label: &str,
        adjacency: Adjacency,
    ) -> Option<Result<String, MarkerError>> {
        self.label_nodes(label)
            .next()
            .map(|node| value_after_label(node, label, adjacency))
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.label_nodes(needle).next().is_some()
    }

    pub fn select_all(&self, css: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(css) {
            Ok(selector) => self.html.select(&selector).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn select_first(&self, css: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(css).ok()?;
        self.html.select(&selector).next()
    }

    /// First `tag` element whose text contains `needle`.
    pub fn heading(&self, tag: &str, needle: &str) -> Option<ElementRef<'_>> {
        self.select_all(tag)
            .into_iter()
            .find(|element| element.text().collect::<String>().contains(needle))
    }

    /// Comment nodes whose trimmed content equals `content`.
    pub fn comments_matching<'a>(
        &'a self,
        content: &'a str,
    ) -> impl Iterator<Item = DomNode<'a>> + 'a {
        self.html.tree.root().descendants().filter(move |node| {
            node.value()
                .as_comment()
                .is_some_and(|comment| comment.trim() == content.trim())
        })
    }
}

pub fn value_after_label(
    node: DomNode<'_>,
    label: &str,
    adjacency: Adjacency,
) -> Result<String, MarkerError> {
    let target = match adjacency {
        Adjacency::Sibling => node.next_sibling(),
        Adjacency::Descend => next_in_order(node),
    }
    .ok_or_else(|| MarkerError::MissingValue {
        label: label.to_string(),
    })?;

    let text = node_text(target);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(MarkerError::EmptyValue {
            label: label.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

pub fn text_of<'a>(node: DomNode<'a>) -> Option<&'a str> {
    node.value().as_text().map(|text| &**text)
}

/// Concatenated text of `node` and all of its descendants. Comments are skipped.
pub fn node_text(node: DomNode<'_>) -> String {
    node.descendants().filter_map(text_of).collect()
}

/// First non-blank text inside `element`, trimmed.
pub fn first_text(element: ElementRef<'_>) -> Option<String> {
    element
        .text()
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

/// Next node in document order: first child, else next sibling, else the
/// nearest ancestor's next sibling.
pub fn next_in_order(node: DomNode<'_>) -> Option<DomNode<'_>> {
    if let Some(child) = node.first_child() {
        return Some(child);
    }
    after_subtree(node)
}

/// Next node in document order that is not a descendant of `node`.
pub fn after_subtree(node: DomNode<'_>) -> Option<DomNode<'_>> {
    let mut current = node;
    loop {
        if let Some(sibling) = current.next_sibling() {
            return Some(sibling);
        }
        current = current.parent()?;
    }
}

/// Previous node in document order: the deepest last descendant of the
/// previous sibling, else the parent.
pub fn prev_in_order(node: DomNode<'_>) -> Option<DomNode<'_>> {
    match node.prev_sibling() {
        Some(mut current) => {
            while let Some(last) = current.last_child() {
                current = last;
            }
            Some(current)
        }
        None => node.parent(),
    }
}

pub fn following(node: DomNode<'_>) -> impl Iterator<Item = DomNode<'_>> {
    std::iter::successors(next_in_order(node), |n| next_in_order(*n))
}

pub fn preceding(node: DomNode<'_>) -> impl Iterator<Item = DomNode<'_>> {
    std::iter::successors(prev_in_order(node), |n| prev_in_order(*n))
}

/// First `tag` element after `node` in document order.
pub fn find_next_element<'a>(node: DomNode<'a>, tag: &str) -> Option<ElementRef<'a>> {
    following(node)
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name().eq_ignore_ascii_case(tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"<html><body>
<ul>
<li>GitHub repository: <code>holbertonschool-low_level_programming</code></li>
<li>Directory: <code>0x00-hello_world</code></li>
<li>File: <code>0-main.c</code></li>
<li>File: </li>
</ul>
</body></html>"#;

    #[test]
    fn absent_label_yields_nothing() {
        let doc = Document::parse(PAGE);
        assert!(doc
            .find_label_values("Prototype: ", Adjacency::Sibling)
            .is_empty());
        assert!(doc.first_label_value("Prototype: ", Adjacency::Sibling).is_none());
    }

    #[test]
    fn sibling_values_keep_document_order_and_per_item_errors() {
        let doc = Document::parse(PAGE);
        let values = doc.find_label_values("File: ", Adjacency::Sibling);
        assert_eq!(
            values,
            vec![
                Ok("0-main.c".to_string()),
                Err(MarkerError::MissingValue {
                    label: "File: ".to_string()
                }),
            ]
        );
    }

    #[test]
    fn descend_reads_into_next_element() {
        let doc = Document::parse(PAGE);
        let dir = doc.first_label_value("Directory: ", Adjacency::Descend);
        assert_eq!(dir, Some(Ok("0x00-hello_world".to_string())));
    }

    #[test]
    fn backward_walk_reaches_previous_text() {
        let doc = Document::parse("<ul><li>header <code>main.h</code></li>\n<li>push it</li></ul>");
        let label = doc.label_nodes("push it").next().unwrap();
        let previous: Vec<&str> = preceding(label)
            .filter_map(text_of)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        assert_eq!(previous, vec!["main.h", "header"]);
    }

    #[test]
    fn comments_are_found_by_trimmed_content() {
        let doc = Document::parse("<div><!-- Task Body --><p>Do it</p></div>");
        let comment = doc.comments_matching("Task Body").next().unwrap();
        let next = following(comment).find_map(ElementRef::wrap).unwrap();
        assert_eq!(first_text(next).as_deref(), Some("Do it"));
    }
}
