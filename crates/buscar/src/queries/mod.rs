//! Query executors.
//!
//! Each executor turns a semantic intent plus options into a
//! [`LocatorHandle`] and stores it as the world's current subject:
//!
//! ```text
//! QueryIntent ──compile──▶ selector ──scope──▶ handle ──narrow──▶ ──reduce──▶ LocatorContext
//!                                     (root | current subject)   (tag)      (first)
//! ```
//!
//! Singular executors are their plural counterpart followed by a
//! first-element reduction. The context is written once, after the handle is
//! fully built, so a failed or cancelled query leaves it untouched.

pub mod attribute;
pub mod chain;
pub mod display_value;
pub mod label;
pub mod selector;
pub mod text;

use tracing::{debug, info};

use crate::context::World;
use crate::intent::QueryIntent;
use crate::locator::{LocateOptions, LocatorHandle};
use crate::options::OptionSet;
use crate::result::BuscarResult;

/// How many elements an executor keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cardinality {
    /// Every match (plural executors)
    #[default]
    All,
    /// The first match (singular executors)
    First,
}

impl Cardinality {
    /// Apply to a plural handle
    #[must_use]
    pub fn apply(self, handle: LocatorHandle) -> LocatorHandle {
        match self {
            Self::All => handle,
            Self::First => handle.first(),
        }
    }
}

/// Echo options to the log when the `log` option is set
pub(crate) fn log_options(operation: &str, options: Option<&OptionSet>) {
    if let Some(opts) = options.filter(|o| o.log()) {
        let pairs: Vec<String> = opts.iter().map(|(k, v)| format!("{k}={v:?}")).collect();
        info!(operation, options = %pairs.join(", "), "step options");
    }
}

/// Root a selector at the page or under `scope`; `locate` replaces any inherited options
pub(crate) fn scoped(
    selector: String,
    scope: Option<&LocatorHandle>,
    locate: LocateOptions,
) -> LocatorHandle {
    match scope {
        Some(parent) => parent.locator(selector),
        None => LocatorHandle::root(selector),
    }
    .with_options(locate)
}

/// Build the plural handle for an intent without touching the context
pub fn build_handle(
    world: &World,
    intent: &QueryIntent,
    narrow: Option<&str>,
    options: Option<&OptionSet>,
) -> BuscarResult<LocatorHandle> {
    let within = options.and_then(OptionSet::within_subject).unwrap_or(false);
    let scope = world.scope(within, intent.kind())?;
    let handle = scoped(
        intent.selector(options, world.config()),
        scope,
        world.config().locate_options(options),
    );
    Ok(match narrow {
        Some(tag) => handle.narrow(tag),
        None => handle,
    })
}

/// Resolve an intent and store the result as the current subject
pub async fn execute<'w>(
    world: &'w mut World,
    intent: &QueryIntent,
    narrow: Option<&str>,
    cardinality: Cardinality,
    options: Option<&OptionSet>,
) -> BuscarResult<&'w LocatorHandle> {
    log_options(intent.kind(), options);
    let handle = cardinality.apply(build_handle(world, intent, narrow, options)?);
    debug!(
        kind = intent.kind(),
        text = intent.text(),
        selector = %handle,
        "query resolved"
    );
    Ok(world.context_mut().set(handle))
}
