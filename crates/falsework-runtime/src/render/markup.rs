#![forbid(unsafe_code)]

//! Declarative content model produced by component templates.

use std::borrow::Cow;

/// A piece of content to render into a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    Element(ElementMarkup),
    Text(String),
    /// Children spliced into the parent without a wrapper.
    Fragment(Vec<Markup>),
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementMarkup {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Markup>,
}

impl ElementMarkup {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }
}

impl Markup {
    /// Set an attribute. Later values for the same name replace earlier ones.
    /// No effect on text and fragments.
    #[must_use]
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        if let Markup::Element(el) = &mut self {
            let name = name.to_ascii_lowercase();
            let value = value.into();
            match el.attrs.iter_mut().find(|(n, _)| *n == name) {
                Some(slot) => slot.1 = value,
                None => el.attrs.push((name, value)),
            }
        }
        self
    }

    /// Append a class to the `class` attribute.
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        if let Markup::Element(el) = &mut self {
            match el.attrs.iter_mut().find(|(n, _)| n == "class") {
                Some((_, value)) if !value.is_empty() => {
                    value.push(' ');
                    value.push_str(class);
                }
                Some((_, value)) => class.clone_into(value),
                None => el.attrs.push(("class".to_owned(), class.to_owned())),
            }
        }
        self
    }

    #[must_use]
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Append one child. Fragments append their own children.
    #[must_use]
    pub fn child(mut self, child: impl Into<Markup>) -> Self {
        match &mut self {
            Markup::Element(ElementMarkup { children, .. }) | Markup::Fragment(children) => {
                children.push(child.into());
            }
            Markup::Text(_) => {}
        }
        self
    }

    #[must_use]
    pub fn children<I>(self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Markup>,
    {
        children.into_iter().fold(self, |acc, c| acc.child(c))
    }

    /// Append a text child.
    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Markup::Text(text.into()))
    }

    /// Flatten fragments into a list of elements and text.
    #[must_use]
    pub fn flatten(items: &[Markup]) -> Vec<&Markup> {
        let mut out = Vec::with_capacity(items.len());
        flatten_into(items, &mut out);
        out
    }
}

fn flatten_into<'a>(items: &'a [Markup], out: &mut Vec<&'a Markup>) {
    for item in items {
        match item {
            Markup::Fragment(children) => flatten_into(children, out),
            other => out.push(other),
        }
    }
}

impl From<&str> for Markup {
    fn from(text: &str) -> Self {
        Markup::Text(text.to_owned())
    }
}

impl From<String> for Markup {
    fn from(text: String) -> Self {
        Markup::Text(text)
    }
}

impl From<Cow<'_, str>> for Markup {
    fn from(text: Cow<'_, str>) -> Self {
        Markup::Text(text.into_owned())
    }
}

impl From<Vec<Markup>> for Markup {
    fn from(items: Vec<Markup>) -> Self {
        Markup::Fragment(items)
    }
}

/// Builder helpers.
///
/// ```
/// use falsework_runtime::render::html::{el, text};
///
/// let row = el("p").class("count").child(text("up: 1"));
/// assert_eq!(row, el("p").attr("class", "count").text("up: 1"));
/// ```
pub mod html {
    use super::{ElementMarkup, Markup};

    /// An empty element.
    #[must_use]
    pub fn el(tag: &str) -> Markup {
        Markup::Element(ElementMarkup::new(tag))
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Markup {
        Markup::Text(text.into())
    }

    #[must_use]
    pub fn fragment(items: impl IntoIterator<Item = Markup>) -> Markup {
        Markup::Fragment(items.into_iter().collect())
    }

    /// A `<style>` element holding `css`.
    #[must_use]
    pub fn style(css: impl Into<String>) -> Markup {
        el("style").text(css)
    }
}

#[cfg(test)]
mod tests {
    use super::html::{el, fragment, style, text};
    use super::*;

    #[test]
    fn attr_replaces_existing_value() {
        let m = el("button").attr("type", "button").attr("TYPE", "submit");
        let Markup::Element(e) = m else {
            panic!("expected element");
        };
        assert_eq!(e.attrs, vec![("type".to_owned(), "submit".to_owned())]);
    }

    #[test]
    fn class_accumulates() {
        let m = el("button").class("vote").class("vote-up");
        let Markup::Element(e) = m else {
            panic!("expected element");
        };
        assert_eq!(e.attrs, vec![("class".to_owned(), "vote vote-up".to_owned())]);
    }

    #[test]
    fn text_ignores_element_builders() {
        let m = text("hi").attr("a", "b").child(el("p"));
        assert_eq!(m, Markup::Text("hi".into()));
    }

    #[test]
    fn flatten_splices_nested_fragments() {
        let items = vec![
            el("p"),
            fragment([text("a"), fragment([text("b")])]),
            style("p {}"),
        ];
        let flat = Markup::flatten(&items);
        assert_eq!(flat.len(), 4);
        assert_eq!(flat[1], &Markup::Text("a".into()));
        assert_eq!(flat[2], &Markup::Text("b".into()));
    }

    #[test]
    fn children_accepts_strings() {
        let m = el("ul").children(["one", "two"]);
        let Markup::Element(e) = m else {
            panic!("expected element");
        };
        assert_eq!(e.children.len(), 2);
    }
}
