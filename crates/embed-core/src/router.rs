//! Message routing.
//!
//! The router decides what an inbound message should trigger. It does not
//! run anything itself: [`MessageRouter::route`] returns a [`Route`] that the
//! session then applies. Keeping the decision pure lets the session release
//! its borrow of the registry before host code runs.
//!
//! Two checks are made, independently of each other:
//!
//! 1. A signing event from the trusted origin naming a kind with a
//!    registered handler selects that handler.
//! 2. A redirect instruction, allowed by the [`RedirectTrust`] policy,
//!    selects a frame navigation to the redirect URL with the signer key
//!    appended.

use crate::event::EventKind;
use crate::link::SignatureLink;
use crate::message::InboundMessage;
use crate::origin::{RedirectTrust, TrustedOrigin};
use crate::registry::CallbackRegistry;

/// What an inbound message triggers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    /// Handler to invoke with the message payload.
    pub callback: Option<EventKind>,

    /// New frame target.
    pub navigation: Option<String>,
}

impl Route {
    /// Returns `true` if the message triggers nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.callback.is_none() && self.navigation.is_none()
    }
}

/// Classifies inbound messages against the origin policy and the registry.
#[derive(Debug, Clone)]
pub struct MessageRouter {
    origin: TrustedOrigin,
    redirect_trust: RedirectTrust,
    link: SignatureLink,
}

impl MessageRouter {
    /// Creates a router for a session embedding `link`.
    #[must_use]
    pub fn new(link: SignatureLink) -> Self {
        Self {
            origin: TrustedOrigin::default(),
            redirect_trust: RedirectTrust::default(),
            link,
        }
    }

    /// Replaces the trusted origin.
    #[must_use]
    pub fn with_origin(mut self, origin: TrustedOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Replaces the redirect trust policy.
    #[must_use]
    pub fn with_redirect_trust(mut self, redirect_trust: RedirectTrust) -> Self {
        self.redirect_trust = redirect_trust;
        self
    }

    /// Returns the trusted origin.
    #[must_use]
    pub const fn origin(&self) -> &TrustedOrigin {
        &self.origin
    }

    /// Returns the signature link redirects are resolved against.
    #[must_use]
    pub const fn link(&self) -> &SignatureLink {
        &self.link
    }

    /// Decides what a message from `origin` triggers.
    ///
    /// Never fails: anything that does not match is simply not routed.
    #[must_use]
    pub fn route<H>(
        &self,
        origin: &str,
        message: &InboundMessage,
        registry: &CallbackRegistry<H>,
    ) -> Route {
        let callback = message
            .event_kind()
            .filter(|kind| self.origin.matches(origin) && registry.is_registered(*kind));

        let navigation = message
            .redirect_url()
            .filter(|_| self.redirect_trust.allows(origin, &self.origin))
            .map(|redirect_url| self.link.redirect_target(redirect_url));

        Route {
            callback,
            navigation,
        }
    }
}
