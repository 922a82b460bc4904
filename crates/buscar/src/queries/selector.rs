//! Raw selector queries.
//!
//! `find element by selector` starts from the page root; `get element(s) by
//! selector` searches within the current subject unless `withinSubject` is
//! `null` or `false`.

use tracing::debug;

use crate::context::World;
use crate::intent::QueryIntent;
use crate::locator::LocatorHandle;
use crate::options::OptionSet;
use crate::queries::{execute, log_options, scoped, Cardinality};
use crate::result::BuscarResult;

/// `When I find element by selector "S"`
pub async fn find_element_by_selector<'w>(
    world: &'w mut World,
    selector: &str,
    options: Option<&OptionSet>,
) -> BuscarResult<&'w LocatorHandle> {
    let intent = QueryIntent::Selector(selector.to_string());
    execute(world, &intent, None, Cardinality::All, options).await
}

/// `When I get elements by selector "S"` / `When I get element by selector "S"`
pub async fn get_by_selector<'w>(
    world: &'w mut World,
    selector: &str,
    cardinality: Cardinality,
    options: Option<&OptionSet>,
) -> BuscarResult<&'w LocatorHandle> {
    let operation = match cardinality {
        Cardinality::All => "get elements by selector",
        Cardinality::First => "get element by selector",
    };
    log_options(operation, options);
    let within = options.and_then(OptionSet::within_subject).unwrap_or(true);
    let scope = world.scope(within, operation)?;
    let locate = world.config().locate_options(options);
    let handle = cardinality.apply(scoped(selector.to_string(), scope, locate));
    debug!(operation, selector = %handle, "query resolved");
    Ok(world.context_mut().set(handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::PageDriver;
    use crate::mock::MockElement;
    use crate::options::{OptionValue, WITHIN_SUBJECT};
    use crate::queries::test_support::world;

    fn lists() -> Vec<MockElement> {
        vec![
            MockElement::new("ul").attr("id", "a").children([
                MockElement::new("li").text("a1"),
                MockElement::new("li").text("a2"),
            ]),
            MockElement::new("ul").attr("id", "b").child(MockElement::new("li").text("b1")),
        ]
    }

    #[tokio::test]
    async fn test_find_by_selector_is_page_wide() {
        let (mut world, page) = world(lists());
        world.context_mut().set(LocatorHandle::root("#b"));
        let handle = find_element_by_selector(&mut world, "li", None)
            .await
            .unwrap()
            .clone();
        assert_eq!(page.count(&handle).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_get_by_selector_scopes_to_subject() {
        let (mut world, page) = world(lists());
        world.context_mut().set(LocatorHandle::root("#a"));
        let items = get_by_selector(&mut world, "li", Cardinality::All, None)
            .await
            .unwrap()
            .clone();
        assert_eq!(page.count(&items).await.unwrap(), 2);

        // the subject is now the list items, which have no nested items
        let nested = get_by_selector(&mut world, "li", Cardinality::All, None)
            .await
            .unwrap()
            .clone();
        assert_eq!(page.count(&nested).await.unwrap(), 0);

        world.context_mut().set(LocatorHandle::root("#b"));
        let first = get_by_selector(&mut world, "li", Cardinality::First, None)
            .await
            .unwrap()
            .clone();
        assert_eq!(page.text_content(&first).await.unwrap().as_deref(), Some("b1"));
    }

    #[tokio::test]
    async fn test_get_by_selector_at_page_root() {
        let (mut world, page) = world(lists());
        let root = OptionSet::new().with(WITHIN_SUBJECT, OptionValue::Bool(false));
        let handle = get_by_selector(&mut world, "li", Cardinality::First, Some(&root))
            .await
            .unwrap()
            .clone();
        assert_eq!(page.text_content(&handle).await.unwrap().as_deref(), Some("a1"));
    }

    #[tokio::test]
    async fn test_get_by_selector_needs_subject() {
        let (mut world, _) = world(lists());
        let err = get_by_selector(&mut world, "li", Cardinality::All, None)
            .await
            .unwrap_err();
        assert!(err.is_precondition());
        assert!(err.to_string().contains("get elements by selector"));
    }
}
