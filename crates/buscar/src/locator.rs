//! Lazy locator handles.
//!
//! A [`LocatorHandle`] is a deferred description of zero or more elements:
//! a chain of typed steps evaluated by a [`PageDriver`](crate::PageDriver)
//! only when something reads from it (count, attribute, fill, ...).
//!
//! # Design Philosophy
//!
//! - **Immutable**: chaining (`first()`, `children()`, ...) returns a new
//!   handle and never touches the receiver
//! - **Lazy**: building a handle performs no I/O
//! - **Typed steps**: narrowing, reductions and ancestry are enum variants,
//!   not string fragments, so drivers can evaluate them faithfully

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::options::OptionSet;

/// Default timeout for driver calls (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Separator used when rendering a handle chain
const STEP_SEPARATOR: &str = " >> ";

/// Element reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nth {
    /// First element in document order
    First,
    /// Last element in document order
    Last,
    /// Zero-based index
    Index(usize),
}

impl Nth {
    /// Pick from a match count, returning the zero-based position
    #[must_use]
    pub const fn position(self, len: usize) -> Option<usize> {
        match self {
            Self::First if len > 0 => Some(0),
            Self::Last if len > 0 => Some(len - 1),
            Self::Index(i) if i < len => Some(i),
            _ => None,
        }
    }
}

/// One step of a locator chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocatorStep {
    /// Descendants matching a selector (from the page root for the first step)
    Select(String),
    /// Keep only matches with the given tag name
    Narrow(String),
    /// Keep only matches that contain a descendant matching the selector
    Filter {
        /// Selector a descendant must match
        has: String,
    },
    /// Direct children of every match
    Children,
    /// Nearest ancestor-or-self of every match that matches the selector
    Closest(String),
    /// Reduce to a single element
    Nth(Nth),
}

impl fmt::Display for LocatorStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(selector) => f.write_str(selector),
            Self::Narrow(tag) => write!(f, "narrow={tag}"),
            Self::Filter { has } => write!(f, "has={has}"),
            Self::Children => f.write_str("> *"),
            Self::Closest(selector) => write!(f, "closest={selector}"),
            Self::Nth(Nth::First) => f.write_str("nth=0"),
            Self::Nth(Nth::Last) => f.write_str("nth=-1"),
            Self::Nth(Nth::Index(i)) => write!(f, "nth={i}"),
        }
    }
}

/// Options forwarded to the driver with a handle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocateOptions {
    /// Per-call timeout; the driver default applies when unset
    pub timeout: Option<Duration>,
    /// Pierce shadow roots while matching
    pub include_shadow_dom: bool,
}

impl LocateOptions {
    /// Extract locate options from a step's option set
    #[must_use]
    pub fn from_options(options: Option<&OptionSet>) -> Self {
        options.map_or_else(Self::default, |opts| Self {
            timeout: opts.timeout(),
            include_shadow_dom: opts.include_shadow_dom().unwrap_or(false),
        })
    }

    /// Effective timeout, falling back to `default_ms`
    #[must_use]
    pub fn timeout_or(&self, default_ms: u64) -> Duration {
        self.timeout.unwrap_or(Duration::from_millis(default_ms))
    }

    /// Step options with the timeout always set, `default_ms` when the step gives none
    #[must_use]
    pub fn for_step(options: Option<&OptionSet>, default_ms: u64) -> Self {
        let locate = Self::from_options(options);
        Self {
            timeout: Some(locate.timeout_or(default_ms)),
            ..locate
        }
    }
}

/// An immutable, lazy reference to zero or more elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorHandle {
    steps: Vec<LocatorStep>,
    options: LocateOptions,
}

impl LocatorHandle {
    /// Elements matching `selector` anywhere in the page
    #[must_use]
    pub fn root(selector: impl Into<String>) -> Self {
        Self {
            steps: vec![LocatorStep::Select(selector.into())],
            options: LocateOptions::default(),
        }
    }

    /// Attach driver options
    #[must_use]
    pub fn with_options(mut self, options: LocateOptions) -> Self {
        self.options = options;
        self
    }

    fn then(&self, step: LocatorStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self {
            steps,
            options: self.options.clone(),
        }
    }

    /// Descendants of this handle's elements matching `selector`
    #[must_use]
    pub fn locator(&self, selector: impl Into<String>) -> Self {
        self.then(LocatorStep::Select(selector.into()))
    }

    /// First element
    #[must_use]
    pub fn first(&self) -> Self {
        self.then(LocatorStep::Nth(Nth::First))
    }

    /// Last element
    #[must_use]
    pub fn last(&self) -> Self {
        self.then(LocatorStep::Nth(Nth::Last))
    }

    /// Element at a zero-based index
    #[must_use]
    pub fn nth(&self, index: usize) -> Self {
        self.then(LocatorStep::Nth(Nth::Index(index)))
    }

    /// Only elements whose tag is `tag`
    #[must_use]
    pub fn narrow(&self, tag: impl Into<String>) -> Self {
        self.then(LocatorStep::Narrow(tag.into().to_ascii_lowercase()))
    }

    /// Only elements containing a descendant matching `selector`
    #[must_use]
    pub fn filter_has(&self, selector: impl Into<String>) -> Self {
        self.then(LocatorStep::Filter {
            has: selector.into(),
        })
    }

    /// Direct children of every element
    #[must_use]
    pub fn children(&self) -> Self {
        self.then(LocatorStep::Children)
    }

    /// Nearest ancestor-or-self matching `selector`
    #[must_use]
    pub fn closest(&self, selector: impl Into<String>) -> Self {
        self.then(LocatorStep::Closest(selector.into()))
    }

    /// Focused element within this handle's elements
    #[must_use]
    pub fn focused(&self) -> Self {
        self.locator(":focus")
    }

    /// The step chain, root first
    #[must_use]
    pub fn steps(&self) -> &[LocatorStep] {
        &self.steps
    }

    /// Driver options
    #[must_use]
    pub const fn options(&self) -> &LocateOptions {
        &self.options
    }

    /// Whether the chain ends in a single-element reduction
    #[must_use]
    pub fn is_reduced(&self) -> bool {
        matches!(self.steps.last(), Some(LocatorStep::Nth(_)))
    }

    /// Human-readable chain, e.g. `[role="button"]:visible >> nth=0`
    #[must_use]
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LocatorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(STEP_SEPARATOR)?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}
