//! In-memory page for testing without a browser.
//!
//! ## Example
//!
//! ```rust,ignore
//! use buscar::mock::{MockElement, MockPage};
//!
//! let page = MockPage::new(vec![
//!     MockElement::new("label")
//!         .text("Email")
//!         .child(MockElement::new("input").attr("type", "email")),
//! ]);
//! ```

mod document;
mod matcher;
mod page;

pub use document::MockElement;
pub use page::MockPage;
