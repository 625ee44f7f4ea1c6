#![forbid(unsafe_code)]

//! Element names derived from type identifiers.
//!
//! An identifier is split into word tokens and joined in kebab case:
//!
//! | Identifier | Name |
//! |------------|------|
//! | `ClickCounter` | `click-counter` |
//! | `HTTPServer` | `http-server` |
//! | `XMLHttpRequest` | `xml-http-request` |
//! | `my_widget` | `my-widget` |
//! | `Vote2Panel` | `vote2-panel` |
//!
//! Token rules:
//!
//! - An uppercase letter opens a token unless it continues an uppercase run.
//! - In an uppercase run, the last capital before a lowercase letter opens
//!   the next token (`HTTPServer` splits before `S`).
//! - Lowercase letters and digits extend the open token; a lowercase letter
//!   with no open token starts one.
//! - Digits with no open token are dropped.
//! - Every other character closes the open token.
//!
//! The output only contains lowercase tokens joined by `-`, so deriving
//! again returns it unchanged.

/// Derive a kebab-case element name from `identifier`.
///
/// Returns an empty string when the identifier has no letters.
///
/// ```
/// use falsework::naming::derive_name;
///
/// assert_eq!(derive_name("ClickCounter"), "click-counter");
/// assert_eq!(derive_name("HTTPServer"), "http-server");
/// assert_eq!(derive_name("my_widget"), "my-widget");
/// ```
#[must_use]
pub fn derive_name(identifier: &str) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    let mut tokens: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = current.chars().last();
            let next_is_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            let breaks = match prev {
                None => false,
                Some(p) if p.is_ascii_uppercase() => next_is_lower,
                Some(_) => true,
            };
            if breaks {
                tokens.push(std::mem::take(&mut current));
            }
            current.push(c);
        } else if c.is_ascii_lowercase() || (c.is_ascii_digit() && !current.is_empty()) {
            current.push(c);
        } else if !current.is_empty() && !c.is_ascii_digit() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
        .iter()
        .map(|t| t.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// `HTML<PascalCase>Element` for a registered element name.
///
/// ```
/// use falsework::naming::string_tag;
///
/// assert_eq!(string_tag("click-counter"), "HTMLClickCounterElement");
/// ```
#[must_use]
pub fn string_tag(name: &str) -> String {
    let mut out = String::from("HTML");
    for part in name.split('-') {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.extend(chars);
        }
    }
    out.push_str("Element");
    out
}
