#![forbid(unsafe_code)]

//! Write-once mapping from element names to component definitions.

use ahash::AHashMap;

use crate::error::RegistryError;
use crate::naming::derive_name;

/// Names reserved by the HTML specification for non-custom elements.
const RESERVED_NAMES: &[&str] = &[
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

/// Pick the element name for a component: the explicit name when given,
/// otherwise one derived from `identifier`.
///
/// # Errors
///
/// [`RegistryError::EmptyDerivedName`] when no explicit name is given and
/// derivation yields nothing.
pub fn resolve_name(identifier: &str, explicit: Option<&str>) -> Result<String, RegistryError> {
    if let Some(name) = explicit {
        return Ok(name.to_owned());
    }
    let derived = derive_name(identifier);
    if derived.is_empty() {
        return Err(RegistryError::EmptyDerivedName {
            identifier: identifier.to_owned(),
        });
    }
    Ok(derived)
}

/// Check that `name` is usable as a custom element name.
///
/// # Errors
///
/// [`RegistryError::InvalidName`] naming the violated rule.
pub fn validate_name(name: &str) -> Result<(), RegistryError> {
    let invalid = |reason| RegistryError::InvalidName {
        name: name.to_owned(),
        reason,
    };
    if !name.starts_with(|c: char| c.is_ascii_lowercase()) {
        return Err(invalid("must start with a lowercase ASCII letter"));
    }
    if !name.contains('-') {
        return Err(invalid("must contain a hyphen"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | '_'))
    {
        return Err(invalid("may only contain lowercase letters, digits, '-', '.' and '_'"));
    }
    if RESERVED_NAMES.contains(&name) {
        return Err(invalid("is reserved"));
    }
    Ok(())
}

/// Permanent name bindings.
///
/// `D` is the definition payload; the host stores constructors, tests can
/// store anything.
#[derive(Debug, Clone)]
pub struct Registry<D> {
    entries: AHashMap<String, D>,
    order: Vec<String>,
}

impl<D> Default for Registry<D> {
    fn default() -> Self {
        Self {
            entries: AHashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<D> Registry<D> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `definition`.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidName`] when `name` is not a valid custom
    ///   element name.
    /// - [`RegistryError::AlreadyRegistered`] when `name` is bound, whatever
    ///   it is bound to.
    pub fn register(&mut self, name: &str, definition: D) -> Result<(), RegistryError> {
        validate_name(name)?;
        if self.entries.contains_key(name) {
            tracing::debug!(name, "duplicate registration rejected");
            return Err(RegistryError::AlreadyRegistered {
                name: name.to_owned(),
            });
        }
        self.entries.insert(name.to_owned(), definition);
        self.order.push(name.to_owned());
        tracing::debug!(name, total = self.order.len(), "component registered");
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&D> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// First name (in registration order) whose definition satisfies `pred`.
    pub fn find_name(&self, mut pred: impl FnMut(&D) -> bool) -> Option<&str> {
        self.order
            .iter()
            .find(|name| self.entries.get(name.as_str()).is_some_and(&mut pred))
            .map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
