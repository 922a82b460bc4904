//! Label resolution: from visible label text to the control it labels.
//!
//! ```text
//! candidates = label:text(T) | [aria-labelledby*=T] | [aria-label*=T]   (first in document order)
//!
//!   <label for=id>          → #id
//!   <label> … <K> … </label> → first nested K
//!   aria-labelledby == T    → #T
//!   tag == K, aria-label == T → the candidate itself
//! ```
//!
//! Candidate gathering matches *contains*; the ARIA strategies compare for
//! *exact* equality. A `label` candidate is decided by the label strategies
//! alone and never reaches the ARIA ones.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BuscarConfig;
use crate::driver::PageDriver;
use crate::intent::QueryIntent;
use crate::locator::{LocateOptions, LocatorHandle};
use crate::options::OptionSet;
use crate::result::{BuscarError, BuscarResult};
use crate::selector::id_selector;

/// Control a label resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelTarget {
    /// `<input>`
    Input,
    /// `<textarea>`
    Textarea,
}

impl LabelTarget {
    /// Tag name of the target control
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Textarea => "textarea",
        }
    }
}

impl fmt::Display for LabelTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Rule applied when several elements satisfy a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Keep the first match in document order, silently
    #[default]
    FirstInDocumentOrder,
}

impl TieBreak {
    /// Reduce a handle under this rule
    #[must_use]
    pub fn apply(self, handle: &LocatorHandle) -> LocatorHandle {
        match self {
            Self::FirstInDocumentOrder => handle.first(),
        }
    }
}

/// What the driver reported about the chosen candidate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFacts {
    /// Lowercase tag name
    pub tag: String,
    /// `for` attribute
    pub for_id: Option<String>,
    /// `aria-labelledby` attribute
    pub aria_labelledby: Option<String>,
    /// `aria-label` attribute
    pub aria_label: Option<String>,
}

impl CandidateFacts {
    /// Read the facts of a single-element handle
    pub async fn read(driver: &dyn PageDriver, candidate: &LocatorHandle) -> BuscarResult<Self> {
        Ok(Self {
            tag: driver.tag_name(candidate).await?.to_ascii_lowercase(),
            for_id: driver.get_attribute(candidate, "for").await?,
            aria_labelledby: driver.get_attribute(candidate, "aria-labelledby").await?,
            aria_label: driver.get_attribute(candidate, "aria-label").await?,
        })
    }

    fn is_label(&self) -> bool {
        self.tag == "label"
    }
}

/// One way of mapping a candidate to its control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelStrategy {
    /// `<label for="id">` resolves to `#id`
    ForAttribute,
    /// `<label>` without `for` resolves to its first nested control
    NestedControl,
    /// `aria-labelledby` equal to the text resolves to the element with that id
    LabelledBy,
    /// A control whose `aria-label` equals the text is its own target
    AriaLabel,
}

/// Strategies in priority order
pub const LABEL_STRATEGIES: [LabelStrategy; 4] = [
    LabelStrategy::ForAttribute,
    LabelStrategy::NestedControl,
    LabelStrategy::LabelledBy,
    LabelStrategy::AriaLabel,
];

/// Inputs to one label resolution
#[derive(Debug, Clone)]
pub struct LabelRequest<'a> {
    /// Label text
    pub text: &'a str,
    /// Control kind
    pub target: LabelTarget,
    /// The first candidate
    pub candidate: &'a LocatorHandle,
    /// Options carried by resulting handles
    pub locate: &'a LocateOptions,
    /// Configuration (quoting)
    pub config: &'a BuscarConfig,
}

impl LabelStrategy {
    /// Try this strategy against a candidate. `None` means it does not apply.
    #[must_use]
    pub fn resolve(self, facts: &CandidateFacts, request: &LabelRequest<'_>) -> Option<LocatorHandle> {
        let by_id = |id: &str| {
            LocatorHandle::root(id_selector(id, request.config.quoting()))
                .with_options(request.locate.clone())
        };
        match self {
            Self::ForAttribute => {
                let id = facts.for_id.as_deref().filter(|id| !id.is_empty())?;
                facts.is_label().then(|| by_id(id))
            }
            Self::NestedControl => facts
                .is_label()
                .then(|| request.candidate.locator(request.target.tag()).first()),
            Self::LabelledBy => (!facts.is_label()
                && facts.aria_labelledby.as_deref() == Some(request.text))
            .then(|| by_id(request.text)),
            Self::AriaLabel => (!facts.is_label()
                && facts.tag == request.target.tag()
                && facts.aria_label.as_deref() == Some(request.text))
            .then(|| request.candidate.clone()),
        }
    }
}

/// All label candidates for `text`: label elements and ARIA-labelled elements.
///
/// Scoped to `scope` when given, otherwise the page root.
#[must_use]
pub fn label_candidates(
    text: &str,
    options: Option<&OptionSet>,
    scope: Option<&LocatorHandle>,
    config: &BuscarConfig,
) -> LocatorHandle {
    let selector = QueryIntent::LabelText(text.to_string()).selector(options, config);
    match scope {
        Some(parent) => parent.locator(selector),
        None => LocatorHandle::root(selector),
    }
    .with_options(config.locate_options(options))
}

/// Resolve label text to a single control handle
pub async fn resolve_label(
    driver: &dyn PageDriver,
    text: &str,
    target: LabelTarget,
    options: Option<&OptionSet>,
    scope: Option<&LocatorHandle>,
    config: &BuscarConfig,
) -> BuscarResult<LocatorHandle> {
    let kind = format!("{target} by label text");
    let candidates = label_candidates(text, options, scope, config);
    let candidate = TieBreak::FirstInDocumentOrder.apply(&candidates);

    if driver.count(&candidate).await? == 0 {
        return Err(BuscarError::resolution(
            kind,
            text,
            "no label, aria-labelledby or aria-label candidate",
        ));
    }

    let facts = CandidateFacts::read(driver, &candidate).await?;
    let locate = candidate.options().clone();
    let request = LabelRequest {
        text,
        target,
        candidate: &candidate,
        locate: &locate,
        config,
    };

    for strategy in LABEL_STRATEGIES {
        if let Some(handle) = strategy.resolve(&facts, &request) {
            debug!(?strategy, text, selector = %handle, "label resolved");
            return Ok(handle);
        }
    }

    Err(BuscarError::resolution(
        kind,
        text,
        format!("first candidate <{}> is not associated with any {target} control", facts.tag),
    ))
}
