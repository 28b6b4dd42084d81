//! Sender origin policy.
//!
//! Signing events are only accepted from the Yousign application origin.
//! Redirect instructions come from the nested identity verification step and
//! are accepted from any origin; see [`RedirectTrust`].

use core::fmt;

/// Origin the signing interface is served from.
pub const TRUSTED_ORIGIN: &str = "https://yousign.app";

/// The origin signing events must come from.
///
/// Matching is exact: scheme, host and port must all be equal, and there is
/// no trailing slash in a serialized origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedOrigin(String);

impl TrustedOrigin {
    /// Creates a policy accepting exactly `origin`.
    pub fn new(origin: impl Into<String>) -> Self {
        Self(origin.into())
    }

    /// Returns `true` if a message from `origin` may trigger host callbacks.
    #[must_use]
    pub fn matches(&self, origin: &str) -> bool {
        self.0 == origin
    }

    /// Returns the accepted origin.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TrustedOrigin {
    fn default() -> Self {
        Self::new(TRUSTED_ORIGIN)
    }
}

impl fmt::Display for TrustedOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which senders may ask the embedded frame to navigate.
///
/// The verification partner posts its redirect instruction from its own
/// origin, which the host cannot know in advance. The router therefore
/// accepts redirect instructions from any sender. Keeping this as a named
/// value makes the exception visible to anyone hardening the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedirectTrust {
    /// Any sender may request a redirect.
    #[default]
    AnyOrigin,
    /// Only the [`TrustedOrigin`] may request a redirect.
    TrustedOnly,
}

impl RedirectTrust {
    /// Returns `true` if a redirect from `origin` is honoured.
    #[must_use]
    pub fn allows(self, origin: &str, trusted: &TrustedOrigin) -> bool {
        match self {
            Self::AnyOrigin => true,
            Self::TrustedOnly => trusted.matches(origin),
        }
    }
}
