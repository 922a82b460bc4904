//! Label-text queries.

use tracing::debug;

use crate::context::World;
use crate::label::{label_candidates, resolve_label, LabelTarget};
use crate::locator::LocatorHandle;
use crate::options::OptionSet;
use crate::queries::{log_options, Cardinality};
use crate::result::BuscarResult;

/// `When I find elements by label text "T"` / `When I find element by label text "T"`.
///
/// Yields the label candidates themselves (labels and ARIA-labelled
/// elements), not the controls they label.
pub async fn find_by_label_text<'w>(
    world: &'w mut World,
    text: &str,
    cardinality: Cardinality,
    options: Option<&OptionSet>,
) -> BuscarResult<&'w LocatorHandle> {
    log_options("find elements by label text", options);
    let within = options.and_then(OptionSet::within_subject).unwrap_or(false);
    let scope = world.scope(within, "find elements by label text")?;
    let handle = cardinality.apply(label_candidates(text, options, scope, world.config()));
    debug!(kind = "label text", text, selector = %handle, "query resolved");
    Ok(world.context_mut().set(handle))
}

/// `When I find input by label text "T"` / `When I find textarea by label text "T"`
pub async fn find_control_by_label_text<'w>(
    world: &'w mut World,
    text: &str,
    target: LabelTarget,
    options: Option<&OptionSet>,
) -> BuscarResult<&'w LocatorHandle> {
    log_options("find control by label text", options);
    let within = options.and_then(OptionSet::within_subject).unwrap_or(false);
    let scope = world.scope(within, "find control by label text")?.cloned();
    let handle = resolve_label(
        world.driver(),
        text,
        target,
        options,
        scope.as_ref(),
        world.config(),
    )
    .await?;
    Ok(world.context_mut().set(handle))
}
