//! In-memory element tree.

use std::collections::BTreeMap;

/// Index of the synthetic document node
pub(crate) const ROOT: usize = 0;

/// Builder for one element and its subtree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockElement {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: String,
    children: Vec<MockElement>,
    visible: bool,
    focused: bool,
}

impl MockElement {
    /// Create a visible element
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            text: String::new(),
            children: Vec::new(),
            visible: true,
            focused: false,
        }
    }

    /// Set an attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the element's own text, placed before its children
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Append a child
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Hide the element and, through it, its subtree
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Give the element focus
    #[must_use]
    pub const fn focused(mut self) -> Self {
        self.focused = true;
        self
    }
}

/// Flattened node; index order is document order
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub visible: bool,
    pub focused: bool,
}

impl Node {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Arena of nodes in pre-order
#[derive(Debug, Clone)]
pub(crate) struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn new(elements: Vec<MockElement>) -> Self {
        let mut doc = Self {
            nodes: vec![Node {
                tag: "#document".to_string(),
                attributes: BTreeMap::new(),
                text: String::new(),
                parent: None,
                children: Vec::new(),
                visible: true,
                focused: false,
            }],
        };
        for element in elements {
            doc.push(element, ROOT, true);
        }
        doc
    }

    fn push(&mut self, element: MockElement, parent: usize, parent_visible: bool) {
        let index = self.nodes.len();
        let visible = parent_visible && element.visible;
        self.nodes.push(Node {
            tag: element.tag,
            attributes: element.attributes,
            text: element.text,
            parent: Some(parent),
            children: Vec::new(),
            visible,
            focused: element.focused,
        });
        self.nodes[parent].children.push(index);
        for child in element.children {
            self.push(child, index, visible);
        }
    }

    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    /// Strict descendants of `index`, in document order
    pub fn descendants(&self, index: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.nodes[index].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next].children.iter().rev());
        }
        out
    }

    /// Ancestors of `index`, nearest first, excluding the document node
    pub fn ancestors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.nodes[index].parent, |&i| self.nodes[i].parent)
            .filter(|&i| i != ROOT)
    }

    /// Text of the subtree, whitespace-collapsed
    pub fn text_content(&self, index: usize) -> String {
        let mut parts = Vec::new();
        self.collect_text(index, &mut parts);
        normalize(&parts.join(" "))
    }

    fn collect_text<'a>(&'a self, index: usize, parts: &mut Vec<&'a str>) {
        let node = &self.nodes[index];
        if !node.text.is_empty() {
            parts.push(&node.text);
        }
        for &child in &node.children {
            self.collect_text(child, parts);
        }
    }

    /// First element (document order) whose `id` is `id`
    pub fn by_id(&self, id: &str) -> Option<usize> {
        (1..self.nodes.len()).find(|&i| self.nodes[i].attr("id") == Some(id))
    }
}

/// Collapse runs of whitespace and trim
pub(crate) fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
