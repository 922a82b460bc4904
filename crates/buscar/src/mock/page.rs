//! `MockPage`: a [`PageDriver`] over an in-memory document.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::driver::PageDriver;
use crate::locator::{LocatorHandle, LocatorStep};
use crate::mock::document::{Document, MockElement, ROOT};
use crate::mock::matcher::SelectorList;
use crate::result::{BuscarError, BuscarResult};

const FORM_CONTROLS: [&str; 3] = ["input", "textarea", "select"];

/// In-memory page for tests.
///
/// Timeouts and `include_shadow_dom` are accepted and ignored: the document
/// never changes underneath a query.
#[derive(Debug)]
pub struct MockPage {
    doc: Document,
    values: Mutex<HashMap<usize, String>>,
    call_history: Mutex<Vec<String>>,
}

impl MockPage {
    /// Create a page whose body holds `elements`
    #[must_use]
    pub fn new(elements: Vec<MockElement>) -> Self {
        Self {
            doc: Document::new(elements),
            values: Mutex::new(HashMap::new()),
            call_history: Mutex::new(Vec::new()),
        }
    }

    /// Calls made so far, as `method:handle[:arg]`
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.call_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Check if a method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.history().iter().any(|c| c.starts_with(method))
    }

    /// Current value of the control with the given id
    #[must_use]
    pub fn value_of(&self, id: &str) -> Option<String> {
        self.doc.by_id(id).map(|index| self.current_value(index))
    }

    fn record(&self, call: String) {
        self.call_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn select(&self, scopes: &[usize], selector: &str) -> BuscarResult<Vec<usize>> {
        let list = SelectorList::parse(selector)?;
        let mut out: Vec<usize> = scopes
            .iter()
            .flat_map(|&scope| self.doc.descendants(scope))
            .filter(|&i| list.matches(&self.doc, i))
            .collect();
        out.sort_unstable();
        out.dedup();
        Ok(out)
    }

    /// Evaluate a handle to node indices in document order
    fn resolve(&self, handle: &LocatorHandle) -> BuscarResult<Vec<usize>> {
        let mut current: Option<Vec<usize>> = None;
        for step in handle.steps() {
            let input = current.take();
            let next = match step {
                LocatorStep::Select(selector) => {
                    let scopes = input.unwrap_or_else(|| vec![ROOT]);
                    self.select(&scopes, selector)?
                }
                LocatorStep::Narrow(tag) => input
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|&i| &self.doc.node(i).tag == tag)
                    .collect(),
                LocatorStep::Filter { has } => {
                    let list = SelectorList::parse(has)?;
                    input
                        .unwrap_or_default()
                        .into_iter()
                        .filter(|&i| {
                            self.doc
                                .descendants(i)
                                .into_iter()
                                .any(|d| list.matches(&self.doc, d))
                        })
                        .collect()
                }
                LocatorStep::Children => {
                    let mut children: Vec<usize> = input
                        .unwrap_or_default()
                        .into_iter()
                        .flat_map(|i| self.doc.node(i).children.clone())
                        .collect();
                    children.sort_unstable();
                    children.dedup();
                    children
                }
                LocatorStep::Closest(selector) => {
                    let list = SelectorList::parse(selector)?;
                    let mut found: Vec<usize> = input
                        .unwrap_or_default()
                        .into_iter()
                        .filter_map(|i| {
                            std::iter::once(i)
                                .chain(self.doc.ancestors(i))
                                .find(|&a| list.matches(&self.doc, a))
                        })
                        .collect();
                    found.sort_unstable();
                    found.dedup();
                    found
                }
                LocatorStep::Nth(nth) => {
                    let input = input.unwrap_or_default();
                    nth.position(input.len())
                        .map(|p| vec![input[p]])
                        .unwrap_or_default()
                }
            };
            current = Some(next);
        }
        Ok(current.unwrap_or_default())
    }

    fn single(&self, handle: &LocatorHandle) -> BuscarResult<usize> {
        match self.resolve(handle)?.as_slice() {
            [index] => Ok(*index),
            [] => Err(BuscarError::driver(format!("no element matches {handle}"))),
            many => Err(BuscarError::driver(format!(
                "strict mode violation: {handle} resolved to {} elements",
                many.len()
            ))),
        }
    }

    /// A label stands in for its control, as browser automation does
    fn retarget(&self, index: usize) -> BuscarResult<usize> {
        let node = self.doc.node(index);
        if node.tag != "label" {
            return Ok(index);
        }
        let control = match node.attr("for") {
            Some(id) if !id.is_empty() => self.doc.by_id(id),
            _ => self
                .doc
                .descendants(index)
                .into_iter()
                .find(|&d| FORM_CONTROLS.contains(&self.doc.node(d).tag.as_str())),
        };
        control.ok_or_else(|| BuscarError::driver("label is not associated with a control"))
    }

    fn current_value(&self, index: usize) -> String {
        if let Some(value) = self
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&index)
        {
            return value.clone();
        }
        let node = self.doc.node(index);
        match node.tag.as_str() {
            "textarea" => self.doc.text_content(index),
            "select" => {
                let options: Vec<usize> = self
                    .doc
                    .descendants(index)
                    .into_iter()
                    .filter(|&d| self.doc.node(d).tag == "option")
                    .collect();
                options
                    .iter()
                    .find(|&&o| self.doc.node(o).attr("selected").is_some())
                    .or_else(|| options.first())
                    .map(|&o| {
                        self.doc
                            .node(o)
                            .attr("value")
                            .map_or_else(|| self.doc.text_content(o), str::to_string)
                    })
                    .unwrap_or_default()
            }
            _ => node.attr("value").unwrap_or_default().to_string(),
        }
    }
}

#[async_trait]
impl PageDriver for MockPage {
    async fn count(&self, handle: &LocatorHandle) -> BuscarResult<usize> {
        self.record(format!("count:{handle}"));
        Ok(self.resolve(handle)?.len())
    }

    async fn tag_name(&self, handle: &LocatorHandle) -> BuscarResult<String> {
        self.record(format!("tag_name:{handle}"));
        let index = self.single(handle)?;
        Ok(self.doc.node(index).tag.clone())
    }

    async fn get_attribute(
        &self,
        handle: &LocatorHandle,
        name: &str,
    ) -> BuscarResult<Option<String>> {
        self.record(format!("get_attribute:{handle}:{name}"));
        let index = self.single(handle)?;
        Ok(self.doc.node(index).attr(name).map(str::to_string))
    }

    async fn text_content(&self, handle: &LocatorHandle) -> BuscarResult<Option<String>> {
        self.record(format!("text_content:{handle}"));
        let index = self.single(handle)?;
        Ok(Some(self.doc.text_content(index)))
    }

    async fn input_value(&self, handle: &LocatorHandle) -> BuscarResult<String> {
        self.record(format!("input_value:{handle}"));
        let index = self.retarget(self.single(handle)?)?;
        if !FORM_CONTROLS.contains(&self.doc.node(index).tag.as_str()) {
            return Err(BuscarError::driver("Not an <input>, <textarea> or <select> element"));
        }
        Ok(self.current_value(index))
    }

    async fn fill(&self, handle: &LocatorHandle, value: &str, force: bool) -> BuscarResult<()> {
        self.record(format!("fill:{handle}:{value}"));
        let index = self.retarget(self.single(handle)?)?;
        let node = self.doc.node(index);
        let editable = matches!(node.tag.as_str(), "input" | "textarea")
            || node.attr("contenteditable").is_some();
        if !editable {
            return Err(BuscarError::driver(
                "Element is not an <input>, <textarea> or [contenteditable] element",
            ));
        }
        if !force && !node.visible {
            return Err(BuscarError::driver(format!("element {handle} is not visible")));
        }
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(index, value.to_string());
        Ok(())
    }

    async fn dispatch_event(&self, handle: &LocatorHandle, event: &str) -> BuscarResult<()> {
        self.record(format!("dispatch_event:{handle}:{event}"));
        self.single(handle).map(|_| ())
    }
}
