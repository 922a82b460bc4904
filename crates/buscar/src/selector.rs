//! Selector compiler.
//!
//! Composes selector strings from semantic base patterns, a text or
//! attribute criterion, and a visibility pseudo-selector:
//!
//! ```text
//!   bases:     button | [type="submit"]
//!   criteria:  :has-text("Save") | [value="Save"]
//!   pseudo:    :visible
//!
//!   button:has-text("Save"):visible, button[value="Save"]:visible,
//!   [type="submit"]:has-text("Save"):visible, [type="submit"][value="Save"]:visible
//! ```
//!
//! Compilation is pure: the same inputs always produce the same string.

use serde::{Deserialize, Serialize};

/// Separator between selector alternatives (logical OR)
pub const ALTERNATIVE_SEPARATOR: &str = ", ";

/// Visibility constraint appended to every compiled alternative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PseudoSelector {
    /// Matches visible elements
    Visible,
    /// Matches hidden elements
    Hidden,
    /// No visibility constraint
    #[default]
    None,
}

impl PseudoSelector {
    /// Suffix appended to a selector
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Visible => ":visible",
            Self::Hidden => ":hidden",
            Self::None => "",
        }
    }

    /// Parse `visible`, `:visible`, `hidden`, `:hidden`, `none` or an empty string
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().trim_start_matches(':').to_ascii_lowercase().as_str() {
            "visible" => Some(Self::Visible),
            "hidden" => Some(Self::Hidden),
            "none" | "" => Some(Self::None),
            _ => None,
        }
    }
}

/// How interpolated text is quoted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quoting {
    /// Double-quoted with `"`, `\` and control characters escaped
    #[default]
    Escaped,
    /// Double-quoted verbatim; text containing `"` yields a broken selector
    Raw,
}

impl Quoting {
    /// Quote a value for interpolation into a selector
    #[must_use]
    pub fn quote(self, text: &str) -> String {
        match self {
            Self::Escaped => quote(text),
            Self::Raw => format!("\"{text}\""),
        }
    }
}

/// Quote text as a double-quoted selector string literal.
///
/// Produces the same output as a JSON string encoder, so plain text is
/// wrapped in quotes unchanged and only `"`, `\` and control characters are
/// escaped.
#[must_use]
pub fn quote(text: &str) -> String {
    serde_json::Value::String(text.to_owned()).to_string()
}

/// Attribute comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeOp {
    /// `[name="value"]`
    Equals,
    /// `[name*="value"]`
    Contains,
}

impl AttributeOp {
    const fn token(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::Contains => "*=",
        }
    }
}

/// Text or attribute criterion combined with each base alternative
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Criterion {
    /// The base alone
    Any,
    /// `:has-text("T")`: text content contains T
    HasText(String),
    /// `:text("T")`: the element's own text matches T
    Text(String),
    /// `[name="T"]` or `[name*="T"]`
    Attribute {
        /// Attribute name
        name: String,
        /// Comparison
        op: AttributeOp,
        /// Compared value
        value: String,
    },
}

impl Criterion {
    /// `[name="value"]`
    #[must_use]
    pub fn attr_eq(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Attribute {
            name: name.into(),
            op: AttributeOp::Equals,
            value: value.into(),
        }
    }

    /// `[name*="value"]`
    #[must_use]
    pub fn attr_contains(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Attribute {
            name: name.into(),
            op: AttributeOp::Contains,
            value: value.into(),
        }
    }

    /// `:has-text("text")`
    #[must_use]
    pub fn has_text(text: impl Into<String>) -> Self {
        Self::HasText(text.into())
    }

    /// `:text("text")`
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    fn render(&self, quoting: Quoting) -> String {
        match self {
            Self::Any => String::new(),
            Self::HasText(text) => format!(":has-text({})", quoting.quote(text)),
            Self::Text(text) => format!(":text({})", quoting.quote(text)),
            Self::Attribute { name, op, value } => {
                format!("[{name}{}{}]", op.token(), quoting.quote(value))
            }
        }
    }
}

/// One selector alternative: a base pattern plus a criterion
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alternative {
    base: String,
    criterion: Criterion,
    pseudo_allowed: bool,
}

impl Alternative {
    /// Combine a base with a criterion
    #[must_use]
    pub fn new(base: impl Into<String>, criterion: Criterion) -> Self {
        Self {
            base: base.into(),
            criterion,
            pseudo_allowed: true,
        }
    }

    /// A verbatim selector that never receives a pseudo-selector suffix
    #[must_use]
    pub fn raw(selector: impl Into<String>) -> Self {
        Self {
            base: selector.into(),
            criterion: Criterion::Any,
            pseudo_allowed: false,
        }
    }

    fn render(&self, pseudo: PseudoSelector, quoting: Quoting) -> String {
        let mut out = self.base.clone();
        out.push_str(&self.criterion.render(quoting));
        if self.pseudo_allowed {
            out.push_str(pseudo.suffix());
        }
        out
    }
}

/// Builder that compiles alternatives into one selector string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorCompiler {
    alternatives: Vec<Alternative>,
    pseudo: PseudoSelector,
    quoting: Quoting,
}

impl SelectorCompiler {
    /// Create an empty compiler
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one alternative
    #[must_use]
    pub fn alternative(mut self, base: impl Into<String>, criterion: Criterion) -> Self {
        self.alternatives.push(Alternative::new(base, criterion));
        self
    }

    /// Add a verbatim alternative
    #[must_use]
    pub fn raw(mut self, selector: impl Into<String>) -> Self {
        self.alternatives.push(Alternative::raw(selector));
        self
    }

    /// Add every base × criterion pair, base-major
    #[must_use]
    pub fn expand(mut self, bases: &[&str], criteria: &[Criterion]) -> Self {
        for base in bases {
            for criterion in criteria {
                self.alternatives
                    .push(Alternative::new(*base, criterion.clone()));
            }
        }
        self
    }

    /// Set the pseudo-selector appended to every alternative
    #[must_use]
    pub const fn pseudo(mut self, pseudo: PseudoSelector) -> Self {
        self.pseudo = pseudo;
        self
    }

    /// Set the quoting mode
    #[must_use]
    pub const fn quoting(mut self, quoting: Quoting) -> Self {
        self.quoting = quoting;
        self
    }

    /// Number of alternatives
    #[must_use]
    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    /// Whether no alternatives were added
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// Compile to a single comma-joined selector
    #[must_use]
    pub fn compile(&self) -> String {
        self.alternatives
            .iter()
            .map(|alt| alt.render(self.pseudo, self.quoting))
            .collect::<Vec<_>>()
            .join(ALTERNATIVE_SEPARATOR)
    }
}

/// Compile base alternatives against one criterion and pseudo-selector
#[must_use]
pub fn compile(bases: &[&str], criterion: &Criterion, pseudo: PseudoSelector) -> String {
    SelectorCompiler::new()
        .expand(bases, std::slice::from_ref(criterion))
        .pseudo(pseudo)
        .compile()
}

/// Selector for the element with the given id.
///
/// Plain identifiers use `#id`; anything else falls back to an attribute
/// match so the id never has to be CSS-escaped.
#[must_use]
pub fn id_selector(id: &str, quoting: Quoting) -> String {
    let mut chars = id.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if plain {
        format!("#{id}")
    } else {
        Criterion::attr_eq("id", id).render(quoting)
    }
}
