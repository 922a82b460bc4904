//! Text-based queries: headings, buttons, links and the text engine.

use crate::context::World;
use crate::intent::QueryIntent;
use crate::locator::LocatorHandle;
use crate::options::OptionSet;
use crate::queries::{execute, Cardinality};
use crate::result::BuscarResult;

/// `h1`..`h6` containing `text`
pub async fn find_by_heading_text<'w>(
    world: &'w mut World,
    text: &str,
    cardinality: Cardinality,
    options: Option<&OptionSet>,
) -> BuscarResult<&'w LocatorHandle> {
    let intent = QueryIntent::Heading(text.to_string());
    execute(world, &intent, None, cardinality, options).await
}

/// Buttons whose text contains, or whose value equals, `text`
pub async fn find_by_button_text<'w>(
    world: &'w mut World,
    text: &str,
    cardinality: Cardinality,
    options: Option<&OptionSet>,
) -> BuscarResult<&'w LocatorHandle> {
    let intent = QueryIntent::Button(text.to_string());
    execute(world, &intent, None, cardinality, options).await
}

/// Anchors containing `text`
pub async fn find_by_link_text<'w>(
    world: &'w mut World,
    text: &str,
    cardinality: Cardinality,
    options: Option<&OptionSet>,
) -> BuscarResult<&'w LocatorHandle> {
    let intent = QueryIntent::Link(text.to_string());
    execute(world, &intent, None, cardinality, options).await
}

/// `When I find element by text "T"`
pub async fn find_element_by_text<'w>(
    world: &'w mut World,
    text: &str,
    options: Option<&OptionSet>,
) -> BuscarResult<&'w LocatorHandle> {
    let intent = QueryIntent::Text(text.to_string());
    execute(world, &intent, None, Cardinality::First, options).await
}
