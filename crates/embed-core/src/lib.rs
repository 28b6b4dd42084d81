//! Yousign Embed Core Library
//!
//! This crate provides the platform-independent core for embedding the
//! Yousign signing interface in a host page: it decides what every message
//! posted to the host window should trigger, and keeps the host's
//! callbacks for the signing lifecycle.
//!
//! # Overview
//!
//! The signing interface runs in an iframe served from
//! `https://yousign.app`. It reports progress by posting messages to the
//! parent window:
//!
//! - **Signing events** (`type: "yousign"`) carry one of six
//!   [`EventKind`]s and are dispatched to the host callback registered for
//!   that kind, but only when they come from the trusted origin.
//! - **Redirect instructions** (`type: "__ubble"`) come from the nested
//!   identity verification step and make the frame navigate to a new URL,
//!   with the signer key of the original link appended.
//!
//! Every other message is ignored. The window message channel is shared
//! with the rest of the page, so unknown traffic is normal.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Host page / JS bindings                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                        Session                               │
//! │  ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐ │
//! │  │ Inbound   │  │  Message  │  │ Callback  │  │ Signature │ │
//! │  │ Message   │─▶│  Router   │◀─│ Registry  │  │   Link    │ │
//! │  └───────────┘  └───────────┘  └───────────┘  └───────────┘ │
//! ├─────────────────────────────────────────────────────────────┤
//! │          Host abstraction (Document / Frame traits)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use yousign_embed_core::{CallbackRegistry, EventKind, InboundMessage, MessageRouter, SignatureLink};
//!
//! let link = SignatureLink::parse("https://yousign.app/signatures/42?k=ABC123", false).unwrap();
//! let router = MessageRouter::new(link);
//!
//! let mut registry = CallbackRegistry::<()>::new();
//! registry.register(EventKind::Success, ()).unwrap();
//!
//! let message = InboundMessage::classify(&json!({ "type": "yousign", "event": "success" }));
//! let route = router.route("https://yousign.app", &message, &registry);
//! assert_eq!(route.callback, Some(EventKind::Success));
//!
//! let message = InboundMessage::classify(&json!({
//!     "type": "__ubble",
//!     "payload": { "redirectUrl": "https://x.test/v" }
//! }));
//! let route = router.route("https://x.test", &message, &registry);
//! assert_eq!(route.navigation.as_deref(), Some("https://x.test/v&k=ABC123"));
//! ```
//!
//! # Security Considerations
//!
//! - Signing events are only accepted from [`TRUSTED_ORIGIN`], compared
//!   exactly.
//! - Redirect instructions are accepted from any origin
//!   ([`RedirectTrust::AnyOrigin`]). The verification partner's origin is not
//!   known to the host; the behaviour is kept for compatibility and can be
//!   restricted with [`MessageRouter::with_redirect_trust`].
//! - The router does not isolate host callbacks: a callback that fails
//!   propagates to the platform.

// Modules
pub mod error;
pub mod event;
pub mod link;
pub mod message;
pub mod origin;
pub mod registry;
pub mod router;
pub mod session;

// Re-exports for convenience
pub use error::{Error, Result};
pub use event::EventKind;
pub use link::SignatureLink;
pub use message::InboundMessage;
pub use origin::{RedirectTrust, TRUSTED_ORIGIN, TrustedOrigin};
pub use registry::{CallbackRegistry, Handler};
pub use router::{MessageRouter, Route};
pub use session::{Document, EmbedOptions, FRAME_ID, Frame, IframeAttributes, Session};
