use std::fmt;
use once_cell::sync::Lazy;
use regex::Regex;
use crate::errors::WikiError;

/// Separator between namespace segments of a page name
pub const NAMESPACE_SEPARATOR: char = ':';

static DISALLOWED_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\p{Arabic}A-Za-z0-9_:]+").expect("page name pattern is valid")
});

/// Collapse every run of characters outside the allowed set into one `-`.
///
/// Never fails; the result may be empty or consist of hyphens only, which
/// callers have to treat as an invalid name (see [`PageName::parse`]).
pub fn sanitize_page_name(raw: &str) -> String {
    DISALLOWED_RUN.replace_all(raw, "-").into_owned()
}

/// A sanitized, non-empty page name such as `Projects:Rust:Notes`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageName(String);

impl PageName {
    /// Sanitize a raw identifier and reject names with nothing usable left
    pub fn parse(raw: &str) -> Result<Self, WikiError> {
        let name = sanitize_page_name(raw);
        if name.chars().all(|c| c == '-') {
            log::debug!("Rejecting page name '{}' (sanitized to '{}')", raw, name);
            return Err(WikiError::InvalidName(raw.to_string()));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(NAMESPACE_SEPARATOR)
    }
}

impl fmt::Display for PageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
