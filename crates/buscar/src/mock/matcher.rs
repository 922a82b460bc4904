//! A small matcher for the selector dialect buscar emits.
//!
//! Supported: tag names and `*`, `#id`, `[a]`, `[a="v"]`, `[a*="v"]`,
//! `:visible`, `:hidden`, `:focus`, `:has-text("t")`, `:text("t")`, the
//! `text=` engine, descendant and `>` combinators, and comma lists.
//! Anything else is rejected rather than guessed at.

use crate::mock::document::{normalize, Document, ROOT};
use crate::result::{BuscarError, BuscarResult};

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrMatch {
    Exists,
    Equals(String),
    Contains(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Filter {
    Id(String),
    Attr(String, AttrMatch),
    Visible,
    Hidden,
    Focus,
    HasText(String),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    filters: Vec<Filter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Alternative {
    TextEngine { value: String, exact: bool },
    Complex(Vec<(Combinator, Compound)>),
}

/// Parsed comma-separated selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorList {
    alternatives: Vec<Alternative>,
}

fn unsupported(selector: &str, detail: &str) -> BuscarError {
    BuscarError::driver(format!("unsupported selector {selector:?}: {detail}"))
}

/// Split on top-level commas, ignoring commas inside quotes, brackets and parens
fn split_top_level(selector: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let (mut depth, mut in_quotes, mut escaped, mut start) = (0_i32, false, false, 0);
    for (i, c) in selector.char_indices() {
        if in_quotes {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quotes = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&selector[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&selector[start..]);
    parts
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn expect(&mut self, want: char) -> BuscarResult<()> {
        match self.bump() {
            Some(c) if c == want => Ok(()),
            other => Err(unsupported(
                self.source,
                &format!("expected {want:?}, found {other:?}"),
            )),
        }
    }

    fn ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self
            .peek()
            .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        {
            out.push(c);
            self.pos += 1;
        }
        out
    }

    fn quoted(&mut self) -> BuscarResult<String> {
        let start = self.pos;
        self.expect('"')?;
        let mut escaped = false;
        loop {
            match self.bump() {
                None => return Err(unsupported(self.source, "unterminated string")),
                Some(_) if escaped => escaped = false,
                Some('\\') => escaped = true,
                Some('"') => break,
                Some(_) => {}
            }
        }
        let literal: String = self.chars[start..self.pos].iter().collect();
        serde_json::from_str(&literal)
            .map_err(|e| unsupported(self.source, &format!("bad string literal: {e}")))
    }

    fn value(&mut self) -> BuscarResult<String> {
        if self.peek() == Some('"') {
            self.quoted()
        } else {
            Ok(self.ident())
        }
    }

    fn paren_text(&mut self) -> BuscarResult<String> {
        self.expect('(')?;
        let text = self.quoted()?;
        self.expect(')')?;
        Ok(text)
    }

    fn compound(&mut self) -> BuscarResult<Compound> {
        let mut compound = Compound::default();
        if self.peek() == Some('*') {
            self.pos += 1;
        } else if self.peek().is_some_and(char::is_alphabetic) {
            compound.tag = Some(self.ident().to_ascii_lowercase());
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.filters.push(Filter::Id(self.ident()));
                }
                Some('[') => {
                    self.pos += 1;
                    let name = self.ident();
                    let matcher = match self.bump() {
                        Some(']') => {
                            compound.filters.push(Filter::Attr(name, AttrMatch::Exists));
                            continue;
                        }
                        Some('=') => AttrMatch::Equals(self.value()?),
                        Some('*') => {
                            self.expect('=')?;
                            AttrMatch::Contains(self.value()?)
                        }
                        other => {
                            return Err(unsupported(
                                self.source,
                                &format!("unexpected {other:?} in attribute"),
                            ))
                        }
                    };
                    self.expect(']')?;
                    compound.filters.push(Filter::Attr(name, matcher));
                }
                Some(':') => {
                    self.pos += 1;
                    let filter = match self.ident().as_str() {
                        "visible" => Filter::Visible,
                        "hidden" => Filter::Hidden,
                        "focus" => Filter::Focus,
                        "has-text" => Filter::HasText(self.paren_text()?),
                        "text" => Filter::Text(self.paren_text()?),
                        other => {
                            return Err(unsupported(self.source, &format!("pseudo-class :{other}")))
                        }
                    };
                    compound.filters.push(filter);
                }
                _ => break,
            }
        }
        Ok(compound)
    }

    fn complex(&mut self) -> BuscarResult<Vec<(Combinator, Compound)>> {
        let mut parts = Vec::new();
        self.skip_ws();
        while self.peek().is_some() {
            let mut combinator = Combinator::Descendant;
            if self.peek() == Some('>') {
                self.pos += 1;
                self.skip_ws();
                combinator = Combinator::Child;
            }
            let start = self.pos;
            let compound = self.compound()?;
            if self.pos == start {
                return Err(unsupported(
                    self.source,
                    &format!("unexpected {:?}", self.peek()),
                ));
            }
            parts.push((combinator, compound));
            self.skip_ws();
        }
        if parts.is_empty() {
            return Err(unsupported(self.source, "empty selector"));
        }
        Ok(parts)
    }
}

impl SelectorList {
    /// Parse a selector in the supported dialect
    pub fn parse(selector: &str) -> BuscarResult<Self> {
        if let Some(rest) = selector.trim_start().strip_prefix("text=") {
            if !rest.starts_with('"') {
                // Unquoted text engine: the whole remainder is the needle
                return Ok(Self {
                    alternatives: vec![Alternative::TextEngine {
                        value: rest.to_string(),
                        exact: false,
                    }],
                });
            }
        }
        let alternatives = split_top_level(selector)
            .into_iter()
            .map(|part| {
                let part = part.trim();
                if let Some(rest) = part.strip_prefix("text=") {
                    if rest.starts_with('"') {
                        let value = Parser::new(rest).quoted()?;
                        Ok(Alternative::TextEngine { value, exact: true })
                    } else {
                        Ok(Alternative::TextEngine {
                            value: rest.to_string(),
                            exact: false,
                        })
                    }
                } else {
                    Parser::new(part).complex().map(Alternative::Complex)
                }
            })
            .collect::<BuscarResult<Vec<_>>>()?;
        Ok(Self { alternatives })
    }

    /// Whether `index` matches any alternative
    pub fn matches(&self, doc: &Document, index: usize) -> bool {
        index != ROOT
            && self.alternatives.iter().any(|alt| match alt {
                Alternative::TextEngine { value, exact } => text_engine(doc, index, value, *exact),
                Alternative::Complex(parts) => matches_complex(doc, index, parts),
            })
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack
        .to_lowercase()
        .contains(&normalize(needle).to_lowercase())
}

/// Smallest element whose text satisfies `pred`
fn smallest_with_text(doc: &Document, index: usize, pred: impl Fn(&str) -> bool) -> bool {
    pred(&doc.text_content(index))
        && !doc
            .node(index)
            .children
            .iter()
            .any(|&child| pred(&doc.text_content(child)))
}

fn text_engine(doc: &Document, index: usize, value: &str, exact: bool) -> bool {
    if exact {
        let want = normalize(value);
        smallest_with_text(doc, index, |text| text == want)
    } else {
        smallest_with_text(doc, index, |text| contains_ci(text, value))
    }
}

fn matches_filter(doc: &Document, index: usize, filter: &Filter) -> bool {
    let node = doc.node(index);
    match filter {
        Filter::Id(id) => node.attr("id") == Some(id.as_str()),
        Filter::Attr(name, AttrMatch::Exists) => node.attr(name).is_some(),
        Filter::Attr(name, AttrMatch::Equals(v)) => node.attr(name) == Some(v.as_str()),
        Filter::Attr(name, AttrMatch::Contains(v)) => {
            node.attr(name).is_some_and(|a| a.contains(v.as_str()))
        }
        Filter::Visible => node.visible,
        Filter::Hidden => !node.visible,
        Filter::Focus => node.focused,
        Filter::HasText(t) => contains_ci(&doc.text_content(index), t),
        Filter::Text(t) => smallest_with_text(doc, index, |text| contains_ci(text, t)),
    }
}

fn matches_compound(doc: &Document, index: usize, compound: &Compound) -> bool {
    compound
        .tag
        .as_ref()
        .map_or(true, |tag| &doc.node(index).tag == tag)
        && compound
            .filters
            .iter()
            .all(|f| matches_filter(doc, index, f))
}

fn matches_complex(doc: &Document, index: usize, parts: &[(Combinator, Compound)]) -> bool {
    let Some(((combinator, compound), rest)) = parts.split_last() else {
        return true;
    };
    if !matches_compound(doc, index, compound) {
        return false;
    }
    if rest.is_empty() {
        return true;
    }
    match combinator {
        Combinator::Child => doc
            .node(index)
            .parent
            .filter(|&p| p != ROOT)
            .is_some_and(|p| matches_complex(doc, p, rest)),
        Combinator::Descendant => doc.ancestors(index).any(|a| matches_complex(doc, a, rest)),
    }
}
