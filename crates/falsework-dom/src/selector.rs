#![forbid(unsafe_code)]

//! CSS selector lists: parsing and matching.
//!
//! Supported grammar:
//!
//! ```text
//! list      := complex ( ',' complex )*
//! complex   := compound ( combinator compound )*
//! combinator:= ' ' | '>' | '+' | '~'
//! compound  := ( ident | '*' )? ( '#' ident | '.' ident | attr | pseudo )*
//! attr      := '[' ident ( op ( ident | string ) ( 'i' )? )? ']'
//! op        := '=' | '~=' | '|=' | '^=' | '$=' | '*='
//! pseudo    := ':first-child' | ':last-child' | ':only-child' | ':empty'
//!            | ':disabled' | ':enabled' | ':checked'
//!            | ':nth-child(' nth ')' | ':nth-last-child(' nth ')'
//!            | ':not(' compound ')'
//!            | ':' ident ( '(' balanced ')' )?
//!            | '::' ident ( '(' balanced ')' )?
//! nth       := 'odd' | 'even' | integer | integer? 'n' ( ('+' | '-') digits )?
//! ```
//!
//! Pseudo-classes that depend on user interaction or browser state
//! (`:hover`, `:focus`, ...) and pseudo-elements are accepted but never
//! match: no element in this document is ever hovered or focused.
//!
//! Matching is evaluated right to left. Combinators walk element parents and
//! element siblings only, so a selector never matches across a shadow root
//! or the document node.
//!
//! # Failure Modes
//!
//! Every syntax problem is reported eagerly by [`SelectorList::parse`];
//! matching itself cannot fail.

use std::fmt;

use crate::node::{NodeId, NodeKind, Tree};

/// Errors from [`SelectorList::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The input (or one entry of the list) is empty.
    #[error("empty selector")]
    Empty,
    /// Input ended in the middle of a construct.
    #[error("unexpected end of selector at {position}")]
    UnexpectedEnd { position: usize },
    /// A character that cannot appear here.
    #[error("unexpected {found:?} at {position}")]
    UnexpectedChar { found: char, position: usize },
    /// A combinator with nothing to its right (or left).
    #[error("dangling combinator at {position}")]
    DanglingCombinator { position: usize },
    /// The argument of `:nth-child` / `:nth-last-child` is not `an+b`.
    #[error("invalid an+b argument {argument:?} at {position}")]
    InvalidNth { argument: String, position: usize },
}

/// How two compounds relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
    NextSibling,
    SubsequentSibling,
}

/// Attribute operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOp {
    Equals,
    Includes,
    DashMatch,
    Prefix,
    Suffix,
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrSelector {
    pub name: String,
    pub op: Option<(AttrOp, String)>,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Simple {
    Id(String),
    Class(String),
    Attr(AttrSelector),
    FirstChild,
    LastChild,
    OnlyChild,
    Empty,
    /// A form control carrying the `disabled` attribute.
    Disabled,
    /// A form control without the `disabled` attribute.
    Enabled,
    /// A checked `input` or a selected `option`.
    Checked,
    NthChild(Nth),
    NthLastChild(Nth),
    Not(Box<Compound>),
    /// A well-formed pseudo-class or pseudo-element that never matches.
    Unmatched(String),
}

/// The `an+b` pattern of `:nth-child`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nth {
    pub a: i32,
    pub b: i32,
}

impl Nth {
    /// Whether the 1-based `position` is `a*n + b` for some `n >= 0`.
    #[must_use]
    pub fn matches(self, position: usize) -> bool {
        let Ok(position) = i64::try_from(position) else {
            return false;
        };
        let offset = position - i64::from(self.b);
        match i64::from(self.a) {
            0 => offset == 0,
            a => offset % a == 0 && offset / a >= 0,
        }
    }

    fn parse(argument: &str) -> Option<Self> {
        let text = argument.trim().to_ascii_lowercase();
        match text.as_str() {
            "odd" => return Some(Self { a: 2, b: 1 }),
            "even" => return Some(Self { a: 2, b: 0 }),
            _ => {}
        }
        let Some(n) = text.find('n') else {
            return signed_integer(&text).map(|b| Self { a: 0, b });
        };
        let a = match &text[..n] {
            "" | "+" => 1,
            "-" => -1,
            coefficient => signed_integer(coefficient)?,
        };
        let rest = text[n + 1..].trim_start();
        let b = if rest.is_empty() {
            0
        } else {
            let (negative, digits) = match rest.strip_prefix('+') {
                Some(digits) => (false, digits),
                None => (true, rest.strip_prefix('-')?),
            };
            let digits = digits.trim_start();
            if !digits.bytes().all(|d| d.is_ascii_digit()) {
                return None;
            }
            let value: i32 = digits.parse().ok()?;
            if negative { -value } else { value }
        };
        Some(Self { a, b })
    }
}

fn signed_integer(text: &str) -> Option<i32> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|d| d.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Tags `:disabled` and `:enabled` apply to.
const FORM_CONTROLS: &[&str] = &[
    "button", "fieldset", "input", "optgroup", "option", "select", "textarea",
];

/// A sequence of simple selectors with no combinator between them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Compound {
    /// Lowercase type selector. `None` for `*` or no type.
    pub tag: Option<String>,
    pub simple: Vec<Simple>,
}

/// Compounds joined by combinators, left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    compounds: Vec<Compound>,
    combinators: Vec<Combinator>,
}

impl ComplexSelector {
    /// The rightmost compound: the one the matched element itself must
    /// satisfy.
    #[must_use]
    pub fn subject(&self) -> &Compound {
        // Parsing guarantees at least one compound.
        &self.compounds[self.compounds.len() - 1]
    }
}

/// A parsed, comma-separated selector list.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectorList {
    source: String,
    selectors: Vec<ComplexSelector>,
}

impl fmt::Debug for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SelectorList").field(&self.source).finish()
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for SelectorList {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl SelectorList {
    /// Parse a selector list.
    ///
    /// # Errors
    ///
    /// [`SelectorError`] describing the first syntax problem.
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let mut parser = Parser {
            chars: source.chars().collect(),
            pos: 0,
        };
        let selectors = parser.list()?;
        Ok(Self {
            source: source.trim().to_owned(),
            selectors,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn selectors(&self) -> &[ComplexSelector] {
        &self.selectors
    }

    /// Type selector of each entry's subject compound, in list order.
    ///
    /// `div > button.a, .b` yields `[Some("button"), None]`.
    #[must_use]
    pub fn subject_tags(&self) -> Vec<Option<&str>> {
        self.selectors
            .iter()
            .map(|s| s.subject().tag.as_deref())
            .collect()
    }

    pub(crate) fn matches_in(&self, tree: &Tree, id: NodeId) -> bool {
        if !matches!(tree.get(id).kind, NodeKind::Element { .. }) {
            return false;
        }
        self.selectors
            .iter()
            .any(|s| matches_complex(tree, id, s, s.compounds.len() - 1))
    }
}

fn matches_complex(tree: &Tree, id: NodeId, selector: &ComplexSelector, index: usize) -> bool {
    if !matches_compound(tree, id, &selector.compounds[index]) {
        return false;
    }
    if index == 0 {
        return true;
    }
    let next = index - 1;
    match selector.combinators[next] {
        Combinator::Child => tree
            .parent_element(id)
            .is_some_and(|p| matches_complex(tree, p, selector, next)),
        Combinator::Descendant => {
            let mut cursor = tree.parent_element(id);
            while let Some(p) = cursor {
                if matches_complex(tree, p, selector, next) {
                    return true;
                }
                cursor = tree.parent_element(p);
            }
            false
        }
        Combinator::NextSibling => {
            let siblings = tree.element_siblings(id);
            let position = siblings.iter().position(|s| *s == id);
            position
                .and_then(|i| i.checked_sub(1))
                .is_some_and(|i| matches_complex(tree, siblings[i], selector, next))
        }
        Combinator::SubsequentSibling => {
            let siblings = tree.element_siblings(id);
            let position = siblings.iter().position(|s| *s == id).unwrap_or(0);
            siblings[..position]
                .iter()
                .any(|s| matches_complex(tree, *s, selector, next))
        }
    }
}

fn matches_compound(tree: &Tree, id: NodeId, compound: &Compound) -> bool {
    let Some(tag) = tree.tag(id) else {
        return false;
    };
    if let Some(want) = &compound.tag
        && want != tag
    {
        return false;
    }
    compound.simple.iter().all(|s| matches_simple(tree, id, s))
}

fn matches_simple(tree: &Tree, id: NodeId, simple: &Simple) -> bool {
    match simple {
        Simple::Id(want) => tree.attribute(id, "id") == Some(want.as_str()),
        Simple::Class(want) => tree
            .attribute(id, "class")
            .is_some_and(|c| c.split_whitespace().any(|token| token == want)),
        Simple::Attr(attr) => matches_attr(tree.attribute(id, &attr.name), attr),
        Simple::FirstChild => tree.element_siblings(id).first() == Some(&id),
        Simple::LastChild => tree.element_siblings(id).last() == Some(&id),
        Simple::OnlyChild => tree.element_siblings(id) == [id],
        Simple::Empty => tree.get(id).children.iter().all(|c| match &tree.get(*c).kind {
            NodeKind::Text(data) => data.is_empty(),
            _ => false,
        }),
        Simple::Disabled | Simple::Enabled => {
            let control = tree.tag(id).is_some_and(|tag| FORM_CONTROLS.contains(&tag));
            let disabled = tree.attribute(id, "disabled").is_some();
            control && (disabled == matches!(simple, Simple::Disabled))
        }
        Simple::Checked => match tree.tag(id) {
            Some("input") => tree.attribute(id, "checked").is_some(),
            Some("option") => tree.attribute(id, "selected").is_some(),
            _ => false,
        },
        Simple::NthChild(nth) => {
            let siblings = tree.element_siblings(id);
            siblings
                .iter()
                .position(|s| *s == id)
                .is_some_and(|i| nth.matches(i + 1))
        }
        Simple::NthLastChild(nth) => {
            let siblings = tree.element_siblings(id);
            siblings
                .iter()
                .rev()
                .position(|s| *s == id)
                .is_some_and(|i| nth.matches(i + 1))
        }
        Simple::Not(inner) => !matches_compound(tree, id, inner),
        Simple::Unmatched(_) => false,
    }
}

fn matches_attr(value: Option<&str>, attr: &AttrSelector) -> bool {
    let Some(value) = value else {
        return false;
    };
    let Some((op, want)) = &attr.op else {
        return true;
    };
    let (value, want) = if attr.case_insensitive {
        (value.to_lowercase(), want.to_lowercase())
    } else {
        (value.to_owned(), want.clone())
    };
    match op {
        AttrOp::Equals => value == want,
        AttrOp::Includes => {
            !want.is_empty()
                && !want.contains(char::is_whitespace)
                && value.split_whitespace().any(|token| token == want)
        }
        AttrOp::DashMatch => value == want || value.starts_with(&format!("{want}-")),
        AttrOp::Prefix => !want.is_empty() && value.starts_with(&want),
        AttrOp::Suffix => !want.is_empty() && value.ends_with(&want),
        AttrOp::Substring => !want.is_empty() && value.contains(&want),
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos != start
    }

    fn expect(&mut self, want: char) -> Result<(), SelectorError> {
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(found) => Err(SelectorError::UnexpectedChar {
                found,
                position: self.pos - 1,
            }),
            None => Err(SelectorError::UnexpectedEnd { position: self.pos }),
        }
    }

    fn list(&mut self) -> Result<Vec<ComplexSelector>, SelectorError> {
        let mut out = vec![self.complex()?];
        while self.peek() == Some(',') {
            self.pos += 1;
            out.push(self.complex()?);
        }
        match self.peek() {
            None => Ok(out),
            Some(found) => Err(SelectorError::UnexpectedChar {
                found,
                position: self.pos,
            }),
        }
    }

    fn complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        self.skip_whitespace();
        if matches!(self.peek(), None | Some(',')) {
            return Err(SelectorError::Empty);
        }
        if let Some('>' | '+' | '~') = self.peek() {
            return Err(SelectorError::DanglingCombinator { position: self.pos });
        }
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_space => Combinator::Descendant,
                Some(found) => {
                    return Err(SelectorError::UnexpectedChar {
                        found,
                        position: self.pos,
                    });
                }
            };
            if combinator != Combinator::Descendant {
                let position = self.pos;
                self.pos += 1;
                self.skip_whitespace();
                if matches!(self.peek(), None | Some(',' | '>' | '+' | '~')) {
                    return Err(SelectorError::DanglingCombinator { position });
                }
            }
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }
        Ok(ComplexSelector {
            compounds,
            combinators,
        })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let start = self.pos;
        let mut compound = Compound::default();
        match self.peek() {
            Some('*') => {
                self.pos += 1;
            }
            Some(c) if is_ident_start(c) => {
                compound.tag = Some(self.ident()?.to_ascii_lowercase());
            }
            _ => {}
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.simple.push(Simple::Id(self.ident()?));
                }
                Some('.') => {
                    self.pos += 1;
                    compound.simple.push(Simple::Class(self.ident()?));
                }
                Some('[') => {
                    self.pos += 1;
                    compound.simple.push(Simple::Attr(self.attribute()?));
                }
                Some(':') => {
                    self.pos += 1;
                    compound.simple.push(self.pseudo()?);
                }
                _ => break,
            }
        }
        if self.pos == start {
            return match self.peek() {
                Some(found) => Err(SelectorError::UnexpectedChar {
                    found,
                    position: self.pos,
                }),
                None => Err(SelectorError::UnexpectedEnd { position: self.pos }),
            };
        }
        Ok(compound)
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        match self.peek() {
            Some('-') if self.chars.get(self.pos + 1).is_some_and(char::is_ascii_digit) => {
                return Err(SelectorError::UnexpectedChar {
                    found: '-',
                    position: self.pos,
                });
            }
            Some(c) if is_ident_start(c) => {}
            Some(found) => {
                return Err(SelectorError::UnexpectedChar {
                    found,
                    position: self.pos,
                });
            }
            None => return Err(SelectorError::UnexpectedEnd { position: self.pos }),
        }
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn attribute(&mut self) -> Result<AttrSelector, SelectorError> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();
        let op = match self.peek() {
            Some(']') => {
                self.pos += 1;
                return Ok(AttrSelector {
                    name,
                    op: None,
                    case_insensitive: false,
                });
            }
            Some('=') => {
                self.pos += 1;
                AttrOp::Equals
            }
            Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
                self.pos += 1;
                self.expect('=')?;
                match c {
                    '~' => AttrOp::Includes,
                    '|' => AttrOp::DashMatch,
                    '^' => AttrOp::Prefix,
                    '$' => AttrOp::Suffix,
                    _ => AttrOp::Substring,
                }
            }
            Some(found) => {
                return Err(SelectorError::UnexpectedChar {
                    found,
                    position: self.pos,
                });
            }
            None => return Err(SelectorError::UnexpectedEnd { position: self.pos }),
        };
        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.pos += 1;
                }
                let value: String = self.chars[start..self.pos].iter().collect();
                self.expect(quote)?;
                value
            }
            _ => self.ident()?,
        };
        self.skip_whitespace();
        let case_insensitive = matches!(self.peek(), Some('i' | 'I'));
        if case_insensitive {
            self.pos += 1;
            self.skip_whitespace();
        }
        self.expect(']')?;
        Ok(AttrSelector {
            name,
            op: Some((op, value)),
            case_insensitive,
        })
    }

    fn pseudo(&mut self) -> Result<Simple, SelectorError> {
        if self.peek() == Some(':') {
            self.pos += 1;
            let name = self.ident()?.to_ascii_lowercase();
            if self.peek() == Some('(') {
                self.balanced()?;
            }
            return Ok(Simple::Unmatched(format!("::{name}")));
        }
        let name = self.ident()?.to_ascii_lowercase();
        match name.as_str() {
            "first-child" => Ok(Simple::FirstChild),
            "last-child" => Ok(Simple::LastChild),
            "only-child" => Ok(Simple::OnlyChild),
            "empty" => Ok(Simple::Empty),
            "disabled" => Ok(Simple::Disabled),
            "enabled" => Ok(Simple::Enabled),
            "checked" => Ok(Simple::Checked),
            "nth-child" => Ok(Simple::NthChild(self.nth()?)),
            "nth-last-child" => Ok(Simple::NthLastChild(self.nth()?)),
            "not" => {
                self.expect('(')?;
                self.skip_whitespace();
                let inner = self.compound()?;
                self.skip_whitespace();
                self.expect(')')?;
                Ok(Simple::Not(Box::new(inner)))
            }
            _ => {
                if self.peek() == Some('(') {
                    self.balanced()?;
                }
                Ok(Simple::Unmatched(name))
            }
        }
    }

    fn nth(&mut self) -> Result<Nth, SelectorError> {
        let position = self.pos + 1;
        let argument = self.balanced()?;
        Nth::parse(&argument).ok_or(SelectorError::InvalidNth {
            argument,
            position,
        })
    }

    /// Consume `( ... )` with nested parentheses. Returns the inner text.
    fn balanced(&mut self) -> Result<String, SelectorError> {
        self.expect('(')?;
        let start = self.pos;
        let mut depth = 1usize;
        while let Some(c) = self.bump() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(self.chars[start..self.pos - 1].iter().collect());
                    }
                }
                _ => {}
            }
        }
        Err(SelectorError::UnexpectedEnd { position: self.pos })
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Document, Element, ShadowRootInit};

    fn fixture() -> (Document, Element, Element, Element) {
        let doc = Document::new();
        let p = doc.create_element("p");
        p.set_attribute("id", "row");
        let up = doc.create_element("button");
        up.set_attribute("class", "vote vote-up");
        up.set_attribute("data-kind", "thumbs-up");
        let down = doc.create_element("button");
        down.set_attribute("class", "vote vote-down");
        p.append_child(&up).unwrap();
        p.append_child(&down).unwrap();
        doc.root().append_child(&p).unwrap();
        (doc, p, up, down)
    }

    #[test]
    fn parses_lists() {
        let list = SelectorList::parse("button.vote-up, button.vote-down").unwrap();
        assert_eq!(list.selectors().len(), 2);
        assert_eq!(list.subject_tags(), vec![Some("button"), Some("button")]);
        assert_eq!(list.to_string(), "button.vote-up, button.vote-down");
    }

    #[test]
    fn subject_is_the_rightmost_compound() {
        let list = SelectorList::parse("p > button, div .x").unwrap();
        assert_eq!(list.subject_tags(), vec![Some("button"), None]);
    }

    #[test]
    fn type_class_id_and_attribute() {
        let (_doc, p, up, down) = fixture();
        assert!(up.matches("button").unwrap());
        assert!(up.matches(".vote-up").unwrap());
        assert!(!down.matches(".vote-up").unwrap());
        assert!(p.matches("#row").unwrap());
        assert!(up.matches("[data-kind]").unwrap());
        assert!(up.matches("[data-kind=thumbs-up]").unwrap());
        assert!(up.matches("[data-kind|=thumbs]").unwrap());
        assert!(up.matches("[data-kind^='thumbs']").unwrap());
        assert!(up.matches("[data-kind$=\"up\"]").unwrap());
        assert!(up.matches("[data-kind*=mbs]").unwrap());
        assert!(up.matches("[class~=vote]").unwrap());
        assert!(up.matches("[data-kind=THUMBS-UP i]").unwrap());
        assert!(!up.matches("[data-kind=THUMBS-UP]").unwrap());
    }

    #[test]
    fn combinators() {
        let (_doc, _p, up, down) = fixture();
        assert!(up.matches("p button").unwrap());
        assert!(up.matches("#row > .vote-up").unwrap());
        assert!(down.matches(".vote-up + .vote-down").unwrap());
        assert!(down.matches(".vote-up ~ button").unwrap());
        assert!(!up.matches(".vote-down ~ button").unwrap());
        assert!(!up.matches("div button").unwrap());
    }

    #[test]
    fn structural_pseudo_classes() {
        let (doc, p, up, down) = fixture();
        assert!(up.matches(":first-child").unwrap());
        assert!(down.matches(":last-child").unwrap());
        assert!(!up.matches(":only-child").unwrap());
        assert!(up.matches(":empty").unwrap());
        assert!(!p.matches(":empty").unwrap());
        assert!(down.matches("button:not(.vote-up)").unwrap());
        let lone = doc.create_element("i");
        assert!(lone.matches(":only-child").unwrap());
    }

    #[test]
    fn form_state_pseudo_classes() {
        let doc = Document::new();
        let off = doc.create_element("button");
        off.set_attribute("disabled", "");
        let on = doc.create_element("button");
        let ticked = doc.create_element("input");
        ticked.set_attribute("type", "checkbox");
        ticked.set_attribute("checked", "");
        let label = doc.create_element("span");
        label.set_attribute("disabled", "");

        assert!(off.matches("button:disabled").unwrap());
        assert!(!off.matches("button:enabled").unwrap());
        assert!(on.matches("button:enabled").unwrap());
        assert!(on.matches("button:not(:disabled)").unwrap());
        assert!(!off.matches("button:not(:disabled)").unwrap());
        assert!(ticked.matches("input:checked").unwrap());
        assert!(!on.matches(":checked").unwrap());
        assert!(!label.matches(":disabled").unwrap(), "not a form control");
        assert!(!label.matches(":enabled").unwrap());
    }

    #[test]
    fn nth_child_positions() {
        let doc = Document::new();
        let list = doc.create_element("ul");
        let items: Vec<Element> = (0..5)
            .map(|_| {
                let li = doc.create_element("li");
                list.append_child(&li).unwrap();
                li
            })
            .collect();
        let hits = |selector: &str| -> Vec<usize> {
            let parsed = SelectorList::parse(selector).unwrap();
            (0..items.len())
                .filter(|i| items[*i].matches_list(&parsed))
                .map(|i| i + 1)
                .collect()
        };
        assert_eq!(hits("li:nth-child(2)"), vec![2]);
        assert_eq!(hits(":nth-child(odd)"), vec![1, 3, 5]);
        assert_eq!(hits(":nth-child(even)"), vec![2, 4]);
        assert_eq!(hits(":nth-child(2n + 1)"), vec![1, 3, 5]);
        assert_eq!(hits(":nth-child(-n+3)"), vec![1, 2, 3]);
        assert_eq!(hits(":nth-child(n+4)"), vec![4, 5]);
        assert_eq!(hits(":nth-child(3n-1)"), vec![2, 5]);
        assert_eq!(hits(":nth-child(0)"), Vec::<usize>::new());
        assert_eq!(hits(":nth-last-child(1)"), vec![5]);
        assert_eq!(hits("li:not(:nth-child(1))"), vec![2, 3, 4, 5]);
    }

    #[test]
    fn interaction_pseudo_classes_parse_but_never_match() {
        let (_doc, _p, up, _down) = fixture();
        for selector in ["button:hover", "button:focus", "p::before", "a:lang(en)", "b:is(.x, .y)"] {
            let list = SelectorList::parse(selector).unwrap();
            assert!(!up.matches_list(&list), "{selector}");
        }
        assert!(up.matches("button:not(:focus)").unwrap());
    }

    #[test]
    fn matching_stops_at_shadow_roots() {
        let doc = Document::new();
        let outer = doc.create_element("section");
        let host = doc.create_element("x-host");
        outer.append_child(&host).unwrap();
        let root = host.attach_shadow(ShadowRootInit::closed()).unwrap();
        let button = doc.create_element("button");
        root.append_child(&button).unwrap();
        assert!(button.matches("button").unwrap());
        assert!(!button.matches("section button").unwrap());
        assert!(!button.matches("x-host > button").unwrap());
    }

    #[test]
    fn query_selector_all_in_tree_order() {
        let (doc, _p, up, down) = fixture();
        let list = SelectorList::parse("button").unwrap();
        let found = doc.root().query_selector_all(&list);
        assert_eq!(found, vec![up.clone(), down]);
        assert_eq!(doc.root().query_selector(&list), Some(up));
    }

    #[test]
    fn closest_walks_ancestors() {
        let (_doc, p, up, _down) = fixture();
        let list = SelectorList::parse("#row").unwrap();
        assert_eq!(up.closest(&list), Some(p));
    }

    #[test]
    fn syntax_errors() {
        assert_eq!(SelectorList::parse(""), Err(SelectorError::Empty));
        assert_eq!(SelectorList::parse("a,"), Err(SelectorError::Empty));
        assert_eq!(SelectorList::parse(" , a"), Err(SelectorError::Empty));
        assert!(matches!(
            SelectorList::parse("a >"),
            Err(SelectorError::DanglingCombinator { .. })
        ));
        assert!(matches!(
            SelectorList::parse("> a"),
            Err(SelectorError::DanglingCombinator { .. })
        ));
        assert!(matches!(
            SelectorList::parse("button..x"),
            Err(SelectorError::UnexpectedChar { found: '.', .. })
        ));
        assert!(matches!(
            SelectorList::parse("[data-x"),
            Err(SelectorError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            SelectorList::parse("a[x='y]"),
            Err(SelectorError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            SelectorList::parse("li:nth-child(2n+)"),
            Err(SelectorError::InvalidNth { .. })
        ));
        assert!(matches!(
            SelectorList::parse("li:nth-child(2 n)"),
            Err(SelectorError::InvalidNth { .. })
        ));
        assert!(matches!(
            SelectorList::parse("a:lang(en"),
            Err(SelectorError::UnexpectedEnd { .. })
        ));
        assert!(SelectorList::parse("a:").is_err());
        assert!(SelectorList::parse("a::").is_err());
        assert!(SelectorList::parse(".-1x").is_err());
        assert!(SelectorList::parse("a ) b").is_err());
    }
}
