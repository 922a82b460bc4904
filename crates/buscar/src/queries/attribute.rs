//! Attribute-based queries: role, test ID, alt text, placeholder, title, name.

use crate::context::World;
use crate::intent::QueryIntent;
use crate::locator::LocatorHandle;
use crate::options::OptionSet;
use crate::queries::{execute, Cardinality};
use crate::result::BuscarResult;

/// `When I find elements by role "R"`
pub async fn find_elements_by_role<'w>(
    world: &'w mut World,
    role: &str,
    options: Option<&OptionSet>,
) -> BuscarResult<&'w LocatorHandle> {
    let intent = QueryIntent::Role(role.to_string());
    execute(world, &intent, None, Cardinality::All, options).await
}

/// `When I find element by role "R"`
pub async fn find_element_by_role<'w>(
    world: &'w mut World,
    role: &str,
    options: Option<&OptionSet>,
) -> BuscarResult<&'w LocatorHandle> {
    let intent = QueryIntent::Role(role.to_string());
    execute(world, &intent, None, Cardinality::First, options).await
}

/// `When I find elements by test ID "T"`
pub async fn find_elements_by_test_id<'w>(
    world: &'w mut World,
    test_id: &str,
    options: Option<&OptionSet>,
) -> BuscarResult<&'w LocatorHandle> {
    let intent = QueryIntent::TestId(test_id.to_string());
    execute(world, &intent, None, Cardinality::All, options).await
}

/// `When I find element by test ID "T"`
pub async fn find_element_by_test_id<'w>(
    world: &'w mut World,
    test_id: &str,
    options: Option<&OptionSet>,
) -> BuscarResult<&'w LocatorHandle> {
    let intent = QueryIntent::TestId(test_id.to_string());
    execute(world, &intent, None, Cardinality::First, options).await
}

/// Elements (or, with `narrow`, only `img` elements) by alt text
pub async fn find_by_alt_text<'w>(
    world: &'w mut World,
    text: &str,
    narrow: Option<&str>,
    cardinality: Cardinality,
    options: Option<&OptionSet>,
) -> BuscarResult<&'w LocatorHandle> {
    let intent = QueryIntent::AltText(text.to_string());
    execute(world, &intent, narrow, cardinality, options).await
}

/// Elements by placeholder text, optionally narrowed to `input` or `textarea`
pub async fn find_by_placeholder_text<'w>(
    world: &'w mut World,
    text: &str,
    narrow: Option<&str>,
    cardinality: Cardinality,
    options: Option<&OptionSet>,
) -> BuscarResult<&'w LocatorHandle> {
    let intent = QueryIntent::Placeholder(text.to_string());
    execute(world, &intent, narrow, cardinality, options).await
}

/// Elements by `title` attribute or SVG `<title>`
pub async fn find_by_title<'w>(
    world: &'w mut World,
    title: &str,
    cardinality: Cardinality,
    options: Option<&OptionSet>,
) -> BuscarResult<&'w LocatorHandle> {
    let intent = QueryIntent::Title(title.to_string());
    execute(world, &intent, None, cardinality, options).await
}

/// Elements by `name` attribute, optionally narrowed to `input`
pub async fn find_by_name<'w>(
    world: &'w mut World,
    name: &str,
    narrow: Option<&str>,
    cardinality: Cardinality,
    options: Option<&OptionSet>,
) -> BuscarResult<&'w LocatorHandle> {
    let intent = QueryIntent::Name(name.to_string());
    execute(world, &intent, narrow, cardinality, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::PageDriver;
    use crate::mock::MockElement;
    use crate::options::{OptionValue, PSEUDO_SELECTOR};
    use crate::queries::test_support::world;

    fn form() -> Vec<MockElement> {
        vec![MockElement::new("form").children([
            MockElement::new("input")
                .attr("name", "email")
                .attr("placeholder", "you@example.com")
                .attr("data-testid", "email"),
            MockElement::new("textarea")
                .attr("name", "email")
                .attr("placeholder", "you@example.com"),
            MockElement::new("div").attr("role", "alert").hidden(),
            MockElement::new("div").attr("role", "alert").text("Saved"),
            MockElement::new("img").attr("alt", "Logo"),
            MockElement::new("span").attr("alt", "Logo"),
            MockElement::new("button").attr("title", "Close").attr("data-test-id", "close"),
        ])]
    }

    #[tokio::test]
    async fn test_role_skips_hidden_by_default() {
        let (mut world, page) = world(form());
        let handle = find_elements_by_role(&mut world, "alert", None).await.unwrap().clone();
        assert_eq!(page.count(&handle).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_role_pseudo_override() {
        let (mut world, page) = world(form());
        let hidden = OptionSet::new().with(PSEUDO_SELECTOR, OptionValue::String("hidden".into()));
        let handle = find_element_by_role(&mut world, "alert", Some(&hidden))
            .await
            .unwrap()
            .clone();
        assert_eq!(page.text_content(&handle).await.unwrap().as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_test_id_matches_both_attributes() {
        let (mut world, page) = world(form());
        let handle = find_elements_by_test_id(&mut world, "close", None).await.unwrap().clone();
        assert_eq!(page.tag_name(&handle).await.unwrap(), "button");
        let handle = find_element_by_test_id(&mut world, "email", None).await.unwrap().clone();
        assert_eq!(page.tag_name(&handle).await.unwrap(), "input");
    }

    #[tokio::test]
    async fn test_alt_text_targets_images_only() {
        let (mut world, page) = world(form());
        let handle = find_by_alt_text(&mut world, "Logo", None, Cardinality::All, None)
            .await
            .unwrap()
            .clone();
        assert_eq!(page.count(&handle).await.unwrap(), 1);
        let handle = find_by_alt_text(&mut world, "Logo", Some("img"), Cardinality::First, None)
            .await
            .unwrap()
            .clone();
        assert_eq!(page.tag_name(&handle).await.unwrap(), "img");
    }

    #[tokio::test]
    async fn test_placeholder_narrowing() {
        let (mut world, page) = world(form());
        let all = find_by_placeholder_text(&mut world, "you@example.com", None, Cardinality::All, None)
            .await
            .unwrap()
            .clone();
        assert_eq!(page.count(&all).await.unwrap(), 2);
        let textarea = find_by_placeholder_text(
            &mut world,
            "you@example.com",
            Some("textarea"),
            Cardinality::First,
            None,
        )
        .await
        .unwrap()
        .clone();
        assert_eq!(page.tag_name(&textarea).await.unwrap(), "textarea");
    }

    #[tokio::test]
    async fn test_name_narrowed_to_inputs() {
        let (mut world, page) = world(form());
        let inputs = find_by_name(&mut world, "email", Some("input"), Cardinality::All, None)
            .await
            .unwrap()
            .clone();
        assert_eq!(page.count(&inputs).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_title() {
        let (mut world, page) = world(form());
        let handle = find_by_title(&mut world, "Close", Cardinality::First, None)
            .await
            .unwrap()
            .clone();
        assert_eq!(page.tag_name(&handle).await.unwrap(), "button");
    }
}
