//! `PageDriver`: the seam between locator handles and a live document.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  Query executors / actions                                     │
//! │        │  LocatorHandle (lazy step chain + options)            │
//! │        ▼                                                       │
//! │  PageDriver (async trait)                                      │
//! │  ┌──────────────────────┐   ┌──────────────────────────────┐   │
//! │  │  browser provider    │   │  mock::MockPage              │   │
//! │  │  (CDP, WebDriver)    │   │  (in-memory document, tests) │   │
//! │  └──────────────────────┘   └──────────────────────────────┘   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handles are evaluated by the driver on every call, never cached.
//! Single-element reads (`tag_name`, `get_attribute`, ...) require the
//! handle to resolve to exactly one element.

use async_trait::async_trait;

use crate::locator::LocatorHandle;
use crate::result::BuscarResult;

/// Event dispatched after a value is set
pub const CHANGE_EVENT: &str = "change";

/// Abstract driver for a live document
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Number of elements the handle currently resolves to
    async fn count(&self, handle: &LocatorHandle) -> BuscarResult<usize>;

    /// Lowercase tag name of the single resolved element
    async fn tag_name(&self, handle: &LocatorHandle) -> BuscarResult<String>;

    /// Attribute of the single resolved element
    async fn get_attribute(&self, handle: &LocatorHandle, name: &str)
        -> BuscarResult<Option<String>>;

    /// Text content of the single resolved element
    async fn text_content(&self, handle: &LocatorHandle) -> BuscarResult<Option<String>>;

    /// Current value of the single resolved form control
    async fn input_value(&self, handle: &LocatorHandle) -> BuscarResult<String>;

    /// Replace the value of the single resolved form control.
    ///
    /// `force` skips actionability checks such as visibility.
    async fn fill(&self, handle: &LocatorHandle, value: &str, force: bool) -> BuscarResult<()>;

    /// Dispatch a DOM event on the single resolved element
    async fn dispatch_event(&self, handle: &LocatorHandle, event: &str) -> BuscarResult<()>;
}
