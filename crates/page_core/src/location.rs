use shared::domain::PhoneId;
use tracing::warn;

/// Fragment form the page deep-links with, e.g. `#/phones/nexus-s`.
pub const PHONE_FRAGMENT_PREFIX: &str = "#/phones/";

/// Read once when the page is mounted.
pub trait Location: Send + Sync {
    fn current_fragment(&self) -> Option<String>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticLocation {
    fragment: Option<String>,
}

impl StaticLocation {
    pub fn new(fragment: Option<String>) -> Self {
        Self { fragment }
    }

    pub fn with_fragment(fragment: impl Into<String>) -> Self {
        Self::new(Some(fragment.into()))
    }
}

impl Location for StaticLocation {
    fn current_fragment(&self) -> Option<String> {
        self.fragment.clone()
    }
}

/// Drops the fixed-length prefix and returns what is left as the id. The prefix text is
/// not validated; a mismatch is only logged.
pub fn phone_id_from_fragment(fragment: &str) -> Option<PhoneId> {
    if fragment.is_empty() {
        return None;
    }
    if !fragment.starts_with(PHONE_FRAGMENT_PREFIX) {
        warn!(fragment, "location fragment does not use the phone prefix");
    }
    let id: String = fragment
        .chars()
        .skip(PHONE_FRAGMENT_PREFIX.chars().count())
        .collect();
    if id.is_empty() {
        return None;
    }
    Some(PhoneId(id))
}
