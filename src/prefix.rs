use log::debug;
use strum::Display;

use crate::error::RelocateError;

/// Which of the two user-supplied path fragments a value plays.
#[derive(Display, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PrefixRole {
    #[strum(serialize = "old")]
    Old,
    #[strum(serialize = "new")]
    New,
}

impl PrefixRole {
    pub fn missing_phrase(&self) -> &'static str {
        match self {
            PrefixRole::Old => "a path prefix to replace",
            PrefixRole::New => "a new path prefix to substitute for the old",
        }
    }
}

/// A validated request to rewrite `old_prefix` into `new_prefix`.
///
/// Both fragments are non-empty and differ from each other. Matching is a
/// literal, case-sensitive comparison against the start of a path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixRequest {
    old_prefix: String,
    new_prefix: String,
}

impl PrefixRequest {
    pub fn new(old_prefix: &str, new_prefix: &str) -> Result<Self, RelocateError> {
        let old_prefix = Self::require_fragment(old_prefix, PrefixRole::Old)?;
        let new_prefix = Self::require_fragment(new_prefix, PrefixRole::New)?;

        if old_prefix == new_prefix {
            return Err(RelocateError::NoOpRequest);
        }

        Ok(PrefixRequest {
            old_prefix: old_prefix.to_owned(),
            new_prefix: new_prefix.to_owned(),
        })
    }

    /// Rejects an empty fragment. Used on its own to validate the old fragment
    /// before the new one is asked for.
    pub fn require_fragment(fragment: &str, role: PrefixRole) -> Result<&str, RelocateError> {
        if fragment.is_empty() {
            return Err(RelocateError::EmptyPrefix(role));
        }

        debug!("{} path prefix fragment: '{}'", role, fragment);
        Ok(fragment)
    }

    pub fn old_prefix(&self) -> &str {
        &self.old_prefix
    }

    pub fn new_prefix(&self) -> &str {
        &self.new_prefix
    }

    /// Definitive check: the path starts with the old fragment.
    pub fn matches(&self, content_url: &str) -> bool {
        content_url.starts_with(&self.old_prefix)
    }

    /// Returns the rewritten path for a matching path, `None` otherwise.
    ///
    /// The match is anchored at the start of the path but every occurrence of
    /// the old fragment is substituted, not only the leading one. Whether the
    /// extra substitutions are intended is unresolved; the behavior is kept
    /// as-is until someone decides otherwise.
    pub fn rewrite(&self, content_url: &str) -> Option<String> {
        if self.matches(content_url) {
            Some(content_url.replace(&self.old_prefix, &self.new_prefix))
        } else {
            None
        }
    }
}
