//! Step surface: natural-language step text to executor dispatch.
//!
//! ```gherkin
//! When I find input by label text "Email"
//! And I set value "a@b.com"
//! Then I see value "a@b.com"
//! ```
//!
//! Every pattern takes at most one quoted argument plus an optional
//! key/value options table.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actions;
use crate::context::World;
use crate::intent::QueryKind;
use crate::label::LabelTarget;
use crate::options::OptionSet;
use crate::queries::{self, chain, display_value, Cardinality};
use crate::queries::display_value::DisplayValueStrategy;
use crate::result::{BuscarError, BuscarResult};

/// Quoted `{string}` argument; `\"` escapes a quote
const ARG: &str = r#""((?:[^"\\]|\\.)*)""#;

/// One step as written in a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    /// Step text alone
    Plain(String),
    /// Step text with an options table
    WithTable {
        /// Step text
        step: String,
        /// Key/value rows
        #[serde(default)]
        table: Vec<Vec<String>>,
    },
}

impl Step {
    /// Step text
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) | Self::WithTable { step: text, .. } => text,
        }
    }

    /// Options table rows, if any
    #[must_use]
    pub fn table(&self) -> Option<&[Vec<String>]> {
        match self {
            Self::Plain(_) => None,
            Self::WithTable { table, .. } => Some(table),
        }
    }
}

impl From<&str> for Step {
    fn from(text: &str) -> Self {
        Self::Plain(text.to_string())
    }
}

/// What a matched step does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    /// Compile an intent and store it
    Query {
        /// Kind of intent built from the argument
        kind: QueryKind,
        /// Tag filter
        narrow: Option<&'static str>,
        /// Plural or singular
        cardinality: Cardinality,
    },
    /// Label candidates themselves
    LabelElements(Cardinality),
    /// Control resolved through its label
    LabelControl(LabelTarget),
    /// Display value across inputs, textareas and selects
    DisplayValue,
    /// Display value of one control kind
    DisplayValueOf(DisplayValueStrategy),
    /// Raw selector within the current subject
    GetBySelector(Cardinality),
    /// Direct children of the subject
    Children,
    /// Nearest ancestor-or-self
    Closest,
    /// First element of the subject
    First,
    /// Last element of the subject
    Last,
    /// 1-based element of the subject
    Nth,
    /// Focused element within the subject
    Focused,
    /// Fill and dispatch `change`
    SetValue,
    /// Fill
    Type,
    /// Fill with an empty string
    Clear,
    /// Value equals
    SeeValue,
    /// Value differs
    DoNotSeeValue,
}

/// A step matched against the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedStep {
    /// Action to run
    pub action: StepAction,
    /// Captured argument, unescaped
    pub argument: Option<String>,
}

/// Registry of step patterns
#[derive(Debug, Clone)]
pub struct StepRegistry {
    keyword: Regex,
    patterns: Vec<(Regex, StepAction)>,
}

fn query(kind: QueryKind, narrow: Option<&'static str>, cardinality: Cardinality) -> StepAction {
    StepAction::Query {
        kind,
        narrow,
        cardinality,
    }
}

/// Plural and singular patterns for one query family
fn family(
    plural: &str,
    singular: &str,
    by: &str,
    kind: QueryKind,
    narrow: Option<&'static str>,
) -> [(String, StepAction); 2] {
    [
        (
            format!("I find {plural} by {by} {ARG}"),
            query(kind, narrow, Cardinality::All),
        ),
        (
            format!("I find {singular} by {by} {ARG}"),
            query(kind, narrow, Cardinality::First),
        ),
    ]
}

fn catalogue() -> Vec<(String, StepAction)> {
    let mut table = Vec::new();
    table.extend(family("elements", "element", "role", QueryKind::Role, None));
    table.extend(family("elements", "element", "test ID", QueryKind::TestId, None));
    table.extend(family("elements", "element", "alt text", QueryKind::AltText, None));
    table.extend(family("images", "image", "alt text", QueryKind::AltText, Some("img")));
    table.extend(family("elements", "element", "placeholder text", QueryKind::Placeholder, None));
    table.extend(family("inputs", "input", "placeholder text", QueryKind::Placeholder, Some("input")));
    table.extend(family(
        "textareas",
        "textarea",
        "placeholder text",
        QueryKind::Placeholder,
        Some("textarea"),
    ));
    table.extend(family("elements", "element", "title", QueryKind::Title, None));
    table.extend(family("elements", "element", "name", QueryKind::Name, None));
    table.extend(family("inputs", "input", "name", QueryKind::Name, Some("input")));
    table.extend(family("headings", "heading", "text", QueryKind::Heading, None));
    table.extend(family("buttons", "button", "text", QueryKind::Button, None));
    table.extend(family("links", "link", "text", QueryKind::Link, None));
    table.extend([
        (
            format!("I find elements by label text {ARG}"),
            StepAction::LabelElements(Cardinality::All),
        ),
        (
            format!("I find element by label text {ARG}"),
            StepAction::LabelElements(Cardinality::First),
        ),
        (
            format!("I find input by label text {ARG}"),
            StepAction::LabelControl(LabelTarget::Input),
        ),
        (
            format!("I find textarea by label text {ARG}"),
            StepAction::LabelControl(LabelTarget::Textarea),
        ),
        (
            format!("I get element by display value {ARG}"),
            StepAction::DisplayValue,
        ),
        (
            format!("I find input by display value {ARG}"),
            StepAction::DisplayValueOf(DisplayValueStrategy::Input),
        ),
        (
            format!("I find textarea by display value {ARG}"),
            StepAction::DisplayValueOf(DisplayValueStrategy::Textarea),
        ),
        (
            format!("I find select by display value {ARG}"),
            StepAction::DisplayValueOf(DisplayValueStrategy::Option),
        ),
        (
            format!("I find element by text {ARG}"),
            query(QueryKind::Text, None, Cardinality::First),
        ),
        (
            format!("I find element by selector {ARG}"),
            query(QueryKind::Selector, None, Cardinality::All),
        ),
        (
            format!("I get elements by selector {ARG}"),
            StepAction::GetBySelector(Cardinality::All),
        ),
        (
            format!("I get element by selector {ARG}"),
            StepAction::GetBySelector(Cardinality::First),
        ),
        ("I get children".to_string(), StepAction::Children),
        (
            format!("I find closest element {ARG}"),
            StepAction::Closest,
        ),
        ("I get first element".to_string(), StepAction::First),
        ("I get last element".to_string(), StepAction::Last),
        (
            r"I get (\d+)(?:st|nd|rd|th) element".to_string(),
            StepAction::Nth,
        ),
        ("I get focused element".to_string(), StepAction::Focused),
        (format!("I set value {ARG}"), StepAction::SetValue),
        (format!("I type {ARG}"), StepAction::Type),
        ("I clear".to_string(), StepAction::Clear),
        (format!("I see value {ARG}"), StepAction::SeeValue),
        (format!("I do not see value {ARG}"), StepAction::DoNotSeeValue),
    ]);
    table
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }
    out
}

impl StepRegistry {
    /// Compile the step catalogue
    pub fn new() -> BuscarResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| BuscarError::config(format!("bad step pattern {pattern:?}: {e}")))
        };
        let keyword = compile(r"^\s*(?:Given|When|Then|And|But|\*)\s+")?;
        let patterns = catalogue()
            .into_iter()
            .map(|(pattern, action)| Ok((compile(&format!("^{pattern}$"))?, action)))
            .collect::<BuscarResult<Vec<_>>>()?;
        Ok(Self { keyword, patterns })
    }

    /// Number of registered patterns
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether no patterns are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Match step text, ignoring a leading Gherkin keyword
    pub fn matches(&self, text: &str) -> BuscarResult<MatchedStep> {
        let body = self.keyword.replace(text, "");
        let body = body.trim();
        self.patterns
            .iter()
            .find_map(|(regex, action)| {
                regex.captures(body).map(|caps| MatchedStep {
                    action: *action,
                    argument: caps.get(1).map(|m| unescape(m.as_str())),
                })
            })
            .ok_or_else(|| BuscarError::UnknownStep {
                text: text.to_string(),
            })
    }

    /// Match and execute one step against `world`
    pub async fn run(&self, world: &mut World, step: &Step) -> BuscarResult<()> {
        let matched = self.matches(step.text())?;
        let options = OptionSet::from_table(step.table())?;
        let options = options.as_ref();
        let arg = matched.argument.unwrap_or_default();
        debug!(step = step.text(), action = ?matched.action, "running step");

        match matched.action {
            StepAction::Query {
                kind,
                narrow,
                cardinality,
            } => {
                queries::execute(world, &kind.intent(arg), narrow, cardinality, options).await?;
            }
            StepAction::LabelElements(cardinality) => {
                queries::label::find_by_label_text(world, &arg, cardinality, options).await?;
            }
            StepAction::LabelControl(target) => {
                queries::label::find_control_by_label_text(world, &arg, target, options).await?;
            }
            StepAction::DisplayValue => {
                display_value::get_element_by_display_value(world, &arg, options).await?;
            }
            StepAction::DisplayValueOf(strategy) => {
                display_value::find_by_display_value(world, strategy, &arg, options).await?;
            }
            StepAction::GetBySelector(cardinality) => {
                queries::selector::get_by_selector(world, &arg, cardinality, options).await?;
            }
            StepAction::Children => {
                chain::get_children(world).await?;
            }
            StepAction::Closest => {
                chain::find_closest_element(world, &arg).await?;
            }
            StepAction::First => {
                chain::get_first_element(world).await?;
            }
            StepAction::Last => {
                chain::get_last_element(world).await?;
            }
            StepAction::Nth => {
                let position = arg
                    .parse::<usize>()
                    .map_err(|e| BuscarError::invalid_options(format!("bad position {arg:?}: {e}")))?;
                chain::get_nth_element(world, position).await?;
            }
            StepAction::Focused => {
                chain::get_focused_element(world).await?;
            }
            StepAction::SetValue => actions::set_value(world, &arg).await?,
            StepAction::Type => actions::type_text(world, &arg, options).await?,
            StepAction::Clear => actions::clear(world, options).await?,
            StepAction::SeeValue => actions::see_value(world, &arg).await?,
            StepAction::DoNotSeeValue => actions::do_not_see_value(world, &arg).await?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::PageDriver;
    use crate::locator::LocatorHandle;
    use crate::mock::MockElement;
    use crate::queries::test_support::world;
    use proptest::prelude::*;

    fn registry() -> StepRegistry {
        StepRegistry::new().unwrap()
    }

    mod match_tests {
        use super::*;

        #[test]
        fn test_keywords_are_stripped() {
            let registry = registry();
            for text in [
                "When I get children",
                "And I get children",
                "Given I get children",
                "I get children",
            ] {
                assert_eq!(registry.matches(text).unwrap().action, StepAction::Children);
            }
        }

        #[test]
        fn test_argument_is_captured_and_unescaped() {
            let matched = registry()
                .matches(r#"When I find element by title "Say \"hi\"""#)
                .unwrap();
            assert_eq!(matched.argument.as_deref(), Some("Say \"hi\""));
            assert!(matches!(
                matched.action,
                StepAction::Query {
                    cardinality: Cardinality::First,
                    narrow: None,
                    ..
                }
            ));
        }

        #[test]
        fn test_query_actions_compare_by_kind() {
            let registry = registry();
            let by_role = registry.matches("When I find elements by role \"row\"").unwrap();
            assert_eq!(
                by_role.action,
                StepAction::Query {
                    kind: QueryKind::Role,
                    narrow: None,
                    cardinality: Cardinality::All,
                }
            );
            let by_test_id = registry.matches("When I find elements by test ID \"row\"").unwrap();
            assert_ne!(by_role.action, by_test_id.action);
        }

        #[test]
        fn test_narrowed_families() {
            let registry = registry();
            let matched = registry.matches("When I find inputs by name \"q\"").unwrap();
            assert!(matches!(
                matched.action,
                StepAction::Query {
                    narrow: Some("input"),
                    cardinality: Cardinality::All,
                    ..
                }
            ));
            let matched = registry
                .matches("When I find image by alt text \"Logo\"")
                .unwrap();
            assert!(matches!(
                matched.action,
                StepAction::Query {
                    narrow: Some("img"),
                    cardinality: Cardinality::First,
                    ..
                }
            ));
        }

        #[test]
        fn test_label_and_display_value_steps() {
            let registry = registry();
            assert_eq!(
                registry.matches("When I find textarea by label text \"Bio\"").unwrap().action,
                StepAction::LabelControl(LabelTarget::Textarea)
            );
            assert_eq!(
                registry
                    .matches("When I find select by display value \"Rust\"")
                    .unwrap()
                    .action,
                StepAction::DisplayValueOf(DisplayValueStrategy::Option)
            );
        }

        #[test]
        fn test_ordinal_steps() {
            let registry = registry();
            for (text, n) in [("I get 1st element", "1"), ("I get 22nd element", "22"), ("I get 3rd element", "3")] {
                let matched = registry.matches(text).unwrap();
                assert_eq!(matched.action, StepAction::Nth);
                assert_eq!(matched.argument.as_deref(), Some(n));
            }
        }

        #[test]
        fn test_unknown_step() {
            let err = registry().matches("When I dance").unwrap_err();
            assert!(matches!(err, BuscarError::UnknownStep { .. }));
        }

        #[test]
        fn test_do_not_see_value_is_not_see_value() {
            assert_eq!(
                registry().matches("Then I do not see value \"x\"").unwrap().action,
                StepAction::DoNotSeeValue
            );
        }
    }

    mod run_tests {
        use super::*;

        fn step_with_table(text: &str, rows: &[(&str, &str)]) -> Step {
            Step::WithTable {
                step: text.to_string(),
                table: rows
                    .iter()
                    .map(|(k, v)| vec![(*k).to_string(), (*v).to_string()])
                    .collect(),
            }
        }

        #[tokio::test]
        async fn test_run_query_then_chain() {
            let registry = registry();
            let (mut world, page) = world(vec![MockElement::new("ul")
                .attr("role", "list")
                .children([MockElement::new("li").text("a"), MockElement::new("li").text("b")])]);
            registry
                .run(&mut world, &"When I find element by role \"list\"".into())
                .await
                .unwrap();
            registry.run(&mut world, &"And I get children".into()).await.unwrap();
            registry.run(&mut world, &"And I get 2nd element".into()).await.unwrap();
            let subject = world.context().get().unwrap().clone();
            assert_eq!(page.text_content(&subject).await.unwrap().as_deref(), Some("b"));
        }

        #[tokio::test]
        async fn test_run_with_options_table() {
            let registry = registry();
            let (mut world, page) = world(vec![
                MockElement::new("div").attr("role", "alert").hidden().text("boom"),
            ]);
            let step = step_with_table(
                "When I find element by role \"alert\"",
                &[("pseudoSelector", "hidden"), ("timeout", "100")],
            );
            registry.run(&mut world, &step).await.unwrap();
            let subject = world.context().get().unwrap().clone();
            assert_eq!(page.text_content(&subject).await.unwrap().as_deref(), Some("boom"));
        }

        #[tokio::test]
        async fn test_bad_table_fails_before_touching_context() {
            let registry = registry();
            let (mut world, _) = world(Vec::new());
            let step = Step::WithTable {
                step: "When I find element by role \"x\"".to_string(),
                table: vec![vec!["timeout".to_string()]],
            };
            let err = registry.run(&mut world, &step).await.unwrap_err();
            assert!(matches!(err, BuscarError::InvalidOptions { .. }));
            assert!(world.context().is_empty());
        }

        #[tokio::test]
        async fn test_chain_step_on_empty_context() {
            let registry = registry();
            let (mut world, _) = world(Vec::new());
            let err = registry
                .run(&mut world, &"When I get first element".into())
                .await
                .unwrap_err();
            assert!(err.is_precondition());
        }

        #[tokio::test]
        async fn test_get_element_by_selector_scopes() {
            let registry = registry();
            let (mut world, page) = world(vec![
                MockElement::new("p").text("outside"),
                MockElement::new("section").child(MockElement::new("p").text("inside")),
            ]);
            registry
                .run(&mut world, &"When I find element by selector \"section\"".into())
                .await
                .unwrap();
            registry
                .run(&mut world, &"When I get element by selector \"p\"".into())
                .await
                .unwrap();
            let subject = world.context().get().unwrap().clone();
            assert_eq!(subject.describe(), "section >> p >> nth=0");
            assert_eq!(page.text_content(&subject).await.unwrap().as_deref(), Some("inside"));
        }
    }

    fn family_strategy() -> impl Strategy<Value = (&'static str, &'static str)> {
        prop_oneof![
            Just(("elements by role", "element by role")),
            Just(("elements by test ID", "element by test ID")),
            Just(("elements by alt text", "element by alt text")),
            Just(("images by alt text", "image by alt text")),
            Just(("elements by placeholder text", "element by placeholder text")),
            Just(("inputs by placeholder text", "input by placeholder text")),
            Just(("textareas by placeholder text", "textarea by placeholder text")),
            Just(("elements by title", "element by title")),
            Just(("elements by name", "element by name")),
            Just(("inputs by name", "input by name")),
            Just(("headings by text", "heading by text")),
            Just(("buttons by text", "button by text")),
            Just(("links by text", "link by text")),
            Just(("elements by label text", "element by label text")),
        ]
    }

    proptest! {
        #[test]
        fn prop_singular_is_plural_first((plural, singular) in family_strategy(), text in "[a-zA-Z0-9 _-]{1,20}") {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let registry = registry();
            let (plural_handle, singular_handle) = rt.block_on(async {
                let (mut world, _) = world(Vec::new());
                registry
                    .run(&mut world, &Step::Plain(format!("When I find {plural} \"{text}\"")))
                    .await
                    .unwrap();
                let plural_handle = world.context().get().unwrap().clone();
                registry
                    .run(&mut world, &Step::Plain(format!("When I find {singular} \"{text}\"")))
                    .await
                    .unwrap();
                (plural_handle, world.context().get().unwrap().clone())
            });
            prop_assert_eq!(singular_handle, plural_handle.first());
        }
    }
}
