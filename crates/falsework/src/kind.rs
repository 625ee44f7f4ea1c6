#![forbid(unsafe_code)]

//! Element kinds and narrowed event targets.
//!
//! A capture handler names the [`ElementKind`] it expects. The router
//! checks at bind time that every selector can only match elements of that
//! kind, so the handler receives a [`Target<K>`] with kind-specific
//! accessors instead of a bare [`Element`].

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

use falsework_dom::{Element, Event, MouseDetail, Node};

/// A tag-level element kind.
pub trait ElementKind: 'static {
    /// The tag this kind narrows to; `None` accepts any element.
    const TAG: Option<&'static str>;
    /// Human-readable kind name for diagnostics.
    const NAME: &'static str;
}

/// Any element: no narrowing.
#[derive(Debug, Clone, Copy)]
pub enum AnyElement {}

impl ElementKind for AnyElement {
    const TAG: Option<&'static str> = None;
    const NAME: &'static str = "element";
}

macro_rules! element_kinds {
    ($($(#[$meta:meta])* $kind:ident => $tag:literal),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy)]
            pub enum $kind {}

            impl ElementKind for $kind {
                const TAG: Option<&'static str> = Some($tag);
                const NAME: &'static str = $tag;
            }
        )*
    };
}

element_kinds! {
    /// `<a>`
    Anchor => "a",
    /// `<button>`
    Button => "button",
    Div => "div",
    Form => "form",
    /// `<img>`
    Image => "img",
    Input => "input",
    Label => "label",
    /// `<li>`
    ListItem => "li",
    /// `<p>`
    Paragraph => "p",
    Select => "select",
    Span => "span",
    TextArea => "textarea",
}

/// An element known to be of kind `K`.
pub struct Target<K> {
    element: Element,
    _kind: PhantomData<K>,
}

impl<K> Clone for Target<K> {
    fn clone(&self) -> Self {
        Self {
            element: self.element.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K: ElementKind> fmt::Debug for Target<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Target")
            .field(&K::NAME)
            .field(&self.element)
            .finish()
    }
}

impl<K> Deref for Target<K> {
    type Target = Element;

    fn deref(&self) -> &Element {
        &self.element
    }
}

impl<K: ElementKind> Target<K> {
    /// Narrow `element` to `K`, if its tag agrees.
    #[must_use]
    pub fn narrow(element: Element) -> Option<Self> {
        match K::TAG {
            Some(tag) if element.local_name() != tag => None,
            _ => Some(Self {
                element,
                _kind: PhantomData,
            }),
        }
    }

    #[must_use]
    pub fn element(&self) -> &Element {
        &self.element
    }

    #[must_use]
    pub fn into_element(self) -> Element {
        self.element
    }
}

impl Target<Button> {
    /// The `type` attribute, defaulting to `submit`.
    #[must_use]
    pub fn button_type(&self) -> String {
        self.get_attribute("type")
            .unwrap_or_else(|| "submit".to_owned())
    }

    #[must_use]
    pub fn disabled(&self) -> bool {
        self.has_attribute("disabled")
    }
}

impl Target<Input> {
    /// Current value (the `value` attribute, empty when unset).
    #[must_use]
    pub fn value(&self) -> String {
        self.get_attribute("value").unwrap_or_default()
    }

    pub fn set_value(&self, value: &str) {
        self.set_attribute("value", value);
    }

    /// The `type` attribute, defaulting to `text`.
    #[must_use]
    pub fn input_type(&self) -> String {
        self.get_attribute("type")
            .unwrap_or_else(|| "text".to_owned())
    }

    #[must_use]
    pub fn checked(&self) -> bool {
        self.has_attribute("checked")
    }

    #[must_use]
    pub fn disabled(&self) -> bool {
        self.has_attribute("disabled")
    }
}

impl Target<TextArea> {
    #[must_use]
    pub fn value(&self) -> String {
        self.text_content()
    }
}

impl Target<Anchor> {
    #[must_use]
    pub fn href(&self) -> Option<String> {
        self.get_attribute("href")
    }
}

impl Target<Image> {
    #[must_use]
    pub fn src(&self) -> Option<String> {
        self.get_attribute("src")
    }

    #[must_use]
    pub fn alt(&self) -> String {
        self.get_attribute("alt").unwrap_or_default()
    }
}

/// A captured event together with its narrowed origin.
pub struct Captured<'e, K> {
    event: &'e Event,
    target: Target<K>,
}

impl<'e, K: ElementKind> Captured<'e, K> {
    pub(crate) fn new(event: &'e Event, target: Target<K>) -> Self {
        Self { event, target }
    }

    /// The element the event originated from, narrowed to `K`.
    #[must_use]
    pub fn target(&self) -> &Target<K> {
        &self.target
    }

    #[must_use]
    pub fn event(&self) -> &'e Event {
        self.event
    }

    #[must_use]
    pub fn event_type(&self) -> &str {
        self.event.event_type()
    }

    /// The node the router listens on (the scope root).
    #[must_use]
    pub fn current_target(&self) -> Option<Node> {
        let id = self.event.current_target()?;
        Some(self.target.document().node(id))
    }

    #[must_use]
    pub fn mouse_detail(&self) -> Option<MouseDetail> {
        self.event.mouse_detail()
    }

    pub fn prevent_default(&self) {
        self.event.prevent_default();
    }

    pub fn stop_propagation(&self) {
        self.event.stop_propagation();
    }
}

impl<K: ElementKind> fmt::Debug for Captured<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Captured")
            .field("event", &self.event.event_type())
            .field("target", &self.target)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use falsework_dom::Document;

    #[test]
    fn narrowing_checks_the_tag() {
        let doc = Document::new();
        let button = doc.create_element("button");
        let span = doc.create_element("span");
        assert!(Target::<Button>::narrow(button.clone()).is_some());
        assert!(Target::<Button>::narrow(span.clone()).is_none());
        assert!(Target::<AnyElement>::narrow(span).is_some());
    }

    #[test]
    fn kind_specific_accessors() {
        let doc = Document::new();
        let input = doc.create_element("input");
        let target = Target::<Input>::narrow(input).unwrap();
        assert_eq!(target.input_type(), "text");
        assert_eq!(target.value(), "");
        target.set_value("42");
        assert_eq!(target.value(), "42");

        let button = Target::<Button>::narrow(doc.create_element("button")).unwrap();
        assert_eq!(button.button_type(), "submit");
        assert!(!button.disabled());

        let link = doc.create_element("a");
        link.set_attribute("href", "/votes");
        let link = Target::<Anchor>::narrow(link).unwrap();
        assert_eq!(link.href().as_deref(), Some("/votes"));
    }

    #[test]
    fn kind_names() {
        assert_eq!(Button::TAG, Some("button"));
        assert_eq!(Paragraph::NAME, "p");
        assert_eq!(AnyElement::TAG, None);
    }
}
