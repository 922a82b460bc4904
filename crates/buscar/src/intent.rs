//! Semantic query intents and their selector alternatives.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::BuscarConfig;
use crate::options::OptionSet;
use crate::selector::{Criterion, PseudoSelector, SelectorCompiler};

/// Heading tags, in order
pub const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Bases matched by button queries
pub const BUTTON_BASES: [&str; 4] = [
    "button",
    "[type=\"button\"]",
    "[type=\"submit\"]",
    "[role=\"button\"]",
];

/// What a step is looking for, with its literal search text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum QueryIntent {
    /// `label` text or ARIA label
    LabelText(String),
    /// `role` attribute
    Role(String),
    /// Test-id attribute (`data-testid` by default)
    TestId(String),
    /// `img` alt text
    AltText(String),
    /// `placeholder` attribute
    Placeholder(String),
    /// `title` attribute or SVG `<title>`
    Title(String),
    /// `name` attribute
    Name(String),
    /// `h1`..`h6` text
    Heading(String),
    /// Button text or value
    Button(String),
    /// Anchor text
    Link(String),
    /// Current value of an input, textarea or select
    DisplayValue(String),
    /// Raw selector
    Selector(String),
    /// Text engine match
    Text(String),
}

/// The kind of a [`QueryIntent`], without its search text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// See [`QueryIntent::LabelText`]
    LabelText,
    /// See [`QueryIntent::Role`]
    Role,
    /// See [`QueryIntent::TestId`]
    TestId,
    /// See [`QueryIntent::AltText`]
    AltText,
    /// See [`QueryIntent::Placeholder`]
    Placeholder,
    /// See [`QueryIntent::Title`]
    Title,
    /// See [`QueryIntent::Name`]
    Name,
    /// See [`QueryIntent::Heading`]
    Heading,
    /// See [`QueryIntent::Button`]
    Button,
    /// See [`QueryIntent::Link`]
    Link,
    /// See [`QueryIntent::DisplayValue`]
    DisplayValue,
    /// See [`QueryIntent::Selector`]
    Selector,
    /// See [`QueryIntent::Text`]
    Text,
}

impl QueryKind {
    /// Human-readable name, used in errors and logs
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LabelText => "label text",
            Self::Role => "role",
            Self::TestId => "test ID",
            Self::AltText => "alt text",
            Self::Placeholder => "placeholder text",
            Self::Title => "title",
            Self::Name => "name",
            Self::Heading => "heading text",
            Self::Button => "button text",
            Self::Link => "link text",
            Self::DisplayValue => "display value",
            Self::Selector => "selector",
            Self::Text => "text",
        }
    }

    /// Pair this kind with search text
    #[must_use]
    pub fn intent(self, text: impl Into<String>) -> QueryIntent {
        let text = text.into();
        match self {
            Self::LabelText => QueryIntent::LabelText(text),
            Self::Role => QueryIntent::Role(text),
            Self::TestId => QueryIntent::TestId(text),
            Self::AltText => QueryIntent::AltText(text),
            Self::Placeholder => QueryIntent::Placeholder(text),
            Self::Title => QueryIntent::Title(text),
            Self::Name => QueryIntent::Name(text),
            Self::Heading => QueryIntent::Heading(text),
            Self::Button => QueryIntent::Button(text),
            Self::Link => QueryIntent::Link(text),
            Self::DisplayValue => QueryIntent::DisplayValue(text),
            Self::Selector => QueryIntent::Selector(text),
            Self::Text => QueryIntent::Text(text),
        }
    }
}

impl QueryIntent {
    /// The intent's kind
    #[must_use]
    pub const fn query_kind(&self) -> QueryKind {
        match self {
            Self::LabelText(_) => QueryKind::LabelText,
            Self::Role(_) => QueryKind::Role,
            Self::TestId(_) => QueryKind::TestId,
            Self::AltText(_) => QueryKind::AltText,
            Self::Placeholder(_) => QueryKind::Placeholder,
            Self::Title(_) => QueryKind::Title,
            Self::Name(_) => QueryKind::Name,
            Self::Heading(_) => QueryKind::Heading,
            Self::Button(_) => QueryKind::Button,
            Self::Link(_) => QueryKind::Link,
            Self::DisplayValue(_) => QueryKind::DisplayValue,
            Self::Selector(_) => QueryKind::Selector,
            Self::Text(_) => QueryKind::Text,
        }
    }

    /// Human-readable kind, used in errors and logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.query_kind().name()
    }

    /// The literal search text
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::LabelText(t)
            | Self::Role(t)
            | Self::TestId(t)
            | Self::AltText(t)
            | Self::Placeholder(t)
            | Self::Title(t)
            | Self::Name(t)
            | Self::Heading(t)
            | Self::Button(t)
            | Self::Link(t)
            | Self::DisplayValue(t)
            | Self::Selector(t)
            | Self::Text(t) => t,
        }
    }

    /// Visibility constraint applied when no `pseudoSelector` option is given
    #[must_use]
    pub const fn default_pseudo(&self) -> PseudoSelector {
        match self {
            Self::LabelText(_)
            | Self::Role(_)
            | Self::TestId(_)
            | Self::AltText(_)
            | Self::Placeholder(_)
            | Self::Name(_)
            | Self::Heading(_)
            | Self::DisplayValue(_) => PseudoSelector::Visible,
            Self::Title(_)
            | Self::Button(_)
            | Self::Link(_)
            | Self::Selector(_)
            | Self::Text(_) => PseudoSelector::None,
        }
    }

    /// Effective pseudo-selector after applying the option override
    #[must_use]
    pub fn pseudo(&self, options: Option<&OptionSet>) -> PseudoSelector {
        options
            .and_then(OptionSet::pseudo_selector)
            .unwrap_or_else(|| self.default_pseudo())
    }

    /// Selector alternatives for this intent, before the pseudo-selector
    #[must_use]
    pub fn alternatives(&self, config: &BuscarConfig) -> SelectorCompiler {
        let compiler = SelectorCompiler::new().quoting(config.quoting());
        match self {
            Self::LabelText(t) => compiler
                .alternative("label", Criterion::text(t.as_str()))
                .alternative("", Criterion::attr_contains("aria-labelledby", t.as_str()))
                .alternative("", Criterion::attr_contains("aria-label", t.as_str())),
            Self::Role(t) => compiler.alternative("", Criterion::attr_eq("role", t.as_str())),
            Self::TestId(t) => config
                .test_id_attributes
                .iter()
                .fold(compiler, |c, attr| {
                    c.alternative("", Criterion::attr_eq(attr.as_str(), t.as_str()))
                }),
            Self::AltText(t) => compiler.alternative("img", Criterion::attr_eq("alt", t.as_str())),
            Self::Placeholder(t) => {
                compiler.alternative("", Criterion::attr_eq("placeholder", t.as_str()))
            }
            Self::Title(t) => compiler
                .alternative("", Criterion::attr_eq("title", t.as_str()))
                .alternative("svg title", Criterion::has_text(t.as_str())),
            Self::Name(t) => compiler.alternative("", Criterion::attr_eq("name", t.as_str())),
            Self::Heading(t) => compiler.expand(&HEADING_TAGS, &[Criterion::has_text(t.as_str())]),
            Self::Button(t) => compiler.expand(
                &BUTTON_BASES,
                &[
                    Criterion::has_text(t.as_str()),
                    Criterion::attr_eq("value", t.as_str()),
                ],
            ),
            Self::Link(t) => compiler.alternative("a", Criterion::has_text(t.as_str())),
            Self::DisplayValue(t) => compiler
                .alternative("input", Criterion::attr_eq("value", t.as_str()))
                .alternative("textarea", Criterion::attr_eq("value", t.as_str())),
            Self::Selector(s) => compiler.raw(s.as_str()),
            Self::Text(t) => compiler.raw(format!("text={t}")),
        }
    }

    /// Compile to a selector string, honouring the `pseudoSelector` option
    #[must_use]
    pub fn selector(&self, options: Option<&OptionSet>, config: &BuscarConfig) -> String {
        self.alternatives(config).pseudo(self.pseudo(options)).compile()
    }
}

impl fmt::Display for QueryIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.kind(), self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{OptionValue, PSEUDO_SELECTOR};
    use proptest::prelude::*;

    fn compile(intent: &QueryIntent) -> String {
        intent.selector(None, &BuscarConfig::default())
    }

    mod alternative_tests {
        use super::*;

        #[test]
        fn test_role() {
            assert_eq!(
                compile(&QueryIntent::Role("button".into())),
                "[role=\"button\"]:visible"
            );
        }

        #[test]
        fn test_test_id_uses_both_attributes() {
            assert_eq!(
                compile(&QueryIntent::TestId("save".into())),
                "[data-testid=\"save\"]:visible, [data-test-id=\"save\"]:visible"
            );
        }

        #[test]
        fn test_test_id_attributes_from_config() {
            let config = BuscarConfig::default().with_test_id_attributes(["data-qa"]);
            assert_eq!(
                QueryIntent::TestId("x".into()).selector(None, &config),
                "[data-qa=\"x\"]:visible"
            );
        }

        #[test]
        fn test_title_has_no_default_pseudo() {
            assert_eq!(
                compile(&QueryIntent::Title("Close".into())),
                "[title=\"Close\"], svg title:has-text(\"Close\")"
            );
        }

        #[test]
        fn test_heading_covers_six_levels() {
            let selector = compile(&QueryIntent::Heading("Intro".into()));
            assert_eq!(selector.split(", ").count(), 6);
            assert!(selector.starts_with("h1:has-text(\"Intro\"):visible"));
            assert!(selector.ends_with("h6:has-text(\"Intro\"):visible"));
        }

        #[test]
        fn test_button_is_base_major() {
            let selector = compile(&QueryIntent::Button("Go".into()));
            let parts: Vec<_> = selector.split(", ").collect();
            assert_eq!(parts.len(), 8);
            assert_eq!(parts[0], "button:has-text(\"Go\")");
            assert_eq!(parts[1], "button[value=\"Go\"]");
            assert_eq!(parts[7], "[role=\"button\"][value=\"Go\"]");
        }

        #[test]
        fn test_label_candidates() {
            assert_eq!(
                compile(&QueryIntent::LabelText("Email".into())),
                "label:text(\"Email\"):visible, [aria-labelledby*=\"Email\"]:visible, \
                 [aria-label*=\"Email\"]:visible"
            );
        }

        #[test]
        fn test_kind_pairs_with_text() {
            let intent = QueryKind::Placeholder.intent("Search");
            assert_eq!(intent, QueryIntent::Placeholder("Search".into()));
            assert_eq!(intent.query_kind(), QueryKind::Placeholder);
            assert_eq!(intent.kind(), "placeholder text");
        }

        #[test]
        fn test_text_and_selector_never_take_pseudo() {
            let hidden = OptionSet::new().with(PSEUDO_SELECTOR, OptionValue::String("hidden".into()));
            let config = BuscarConfig::default();
            assert_eq!(
                QueryIntent::Text("Hi".into()).selector(Some(&hidden), &config),
                "text=Hi"
            );
            assert_eq!(
                QueryIntent::Selector("#main > p".into()).selector(Some(&hidden), &config),
                "#main > p"
            );
        }

        #[test]
        fn test_pseudo_override() {
            let hidden = OptionSet::new().with(PSEUDO_SELECTOR, OptionValue::String(":hidden".into()));
            assert_eq!(
                QueryIntent::AltText("Logo".into()).selector(Some(&hidden), &BuscarConfig::default()),
                "img[alt=\"Logo\"]:hidden"
            );
        }

        #[test]
        fn test_raw_quoting_interpolates_verbatim() {
            let config = BuscarConfig::default().with_escape_selectors(false);
            assert_eq!(
                QueryIntent::Name("a\"b".into()).selector(None, &config),
                "[name=\"a\"b\"]:visible"
            );
            assert_eq!(
                QueryIntent::Name("a\"b".into()).selector(None, &BuscarConfig::default()),
                "[name=\"a\\\"b\"]:visible"
            );
        }

        #[test]
        fn test_display() {
            assert_eq!(QueryIntent::Link("Home".into()).to_string(), "link text \"Home\"");
        }
    }

    fn intent_strategy() -> impl Strategy<Value = QueryIntent> {
        let text = "[ -~]{0,24}";
        prop_oneof![
            text.prop_map(QueryIntent::LabelText),
            text.prop_map(QueryIntent::Role),
            text.prop_map(QueryIntent::TestId),
            text.prop_map(QueryIntent::AltText),
            text.prop_map(QueryIntent::Placeholder),
            text.prop_map(QueryIntent::Title),
            text.prop_map(QueryIntent::Name),
            text.prop_map(QueryIntent::Heading),
            text.prop_map(QueryIntent::Button),
            text.prop_map(QueryIntent::Link),
            text.prop_map(QueryIntent::DisplayValue),
            text.prop_map(QueryIntent::Selector),
            text.prop_map(QueryIntent::Text),
        ]
    }

    fn pseudo_strategy() -> impl Strategy<Value = Option<&'static str>> {
        prop_oneof![
            Just(None),
            Just(Some("visible")),
            Just(Some("hidden")),
            Just(Some("none")),
        ]
    }

    proptest! {
        #[test]
        fn prop_compilation_is_idempotent(intent in intent_strategy(), pseudo in pseudo_strategy()) {
            let options = pseudo.map(|p| OptionSet::new().with(PSEUDO_SELECTOR, OptionValue::String(p.into())));
            let config = BuscarConfig::default();
            let a = intent.selector(options.as_ref(), &config);
            let b = intent.clone().selector(options.clone().as_ref(), &config);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_every_alternative_shares_the_suffix(text in "[a-zA-Z0-9 ]{1,16}") {
            let selector = compile(&QueryIntent::Button(text.clone()));
            for part in selector.split(", ") {
                prop_assert!(part.contains(&text));
            }
            let hidden = OptionSet::new().with(PSEUDO_SELECTOR, OptionValue::String("hidden".into()));
            let selector = QueryIntent::Heading(text).selector(Some(&hidden), &BuscarConfig::default());
            for part in selector.split(", ") {
                prop_assert!(part.ends_with(":hidden"));
            }
        }
    }
}
