//! Inbound message classification.
//!
//! Every value posted to the host window lands here, whatever its sender.
//! Classification is structural: a message either matches one of the two
//! known families exactly or it is [`InboundMessage::Unrecognized`], which
//! the router ignores. Nothing in this module can fail.
//!
//! # Wire format
//!
//! ```text
//! { "type": "yousign", "event": "<event kind>", ...event fields }
//! { "type": "__ubble", "payload": { "redirectUrl": "<url>" } }
//! ```
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use yousign_embed_core::{EventKind, InboundMessage};
//!
//! let message = InboundMessage::classify(&json!({ "type": "yousign", "event": "success" }));
//! assert_eq!(message.event_kind(), Some(EventKind::Success));
//!
//! let message = InboundMessage::classify(&json!("react-devtools-bridge"));
//! assert_eq!(message, InboundMessage::Unrecognized);
//! ```

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::event::EventKind;

/// Message type tag of signing events.
pub const SIGNING_EVENT_TYPE: &str = "yousign";

/// Message type tag of redirect instructions.
pub const REDIRECT_INSTRUCTION_TYPE: &str = "__ubble";

/// A classified inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// A signing lifecycle event.
    SigningEvent {
        /// The raw `event` field. It may name no known [`EventKind`].
        event: String,
    },

    /// A request from the verification step to navigate the frame.
    RedirectInstruction {
        /// Where the frame should go, before the signer key is appended.
        redirect_url: String,
    },

    /// Anything else. Ignored.
    Unrecognized,
}

/// Key of the redirect target inside a redirect payload.
const REDIRECT_URL_KEY: &str = "redirectUrl";

/// The two recognized wire shapes.
///
/// Internally tagged enums also deserialize from sequences whose first
/// element is the tag, so only objects may reach this type.
#[derive(Deserialize)]
#[serde(tag = "type")]
enum Wire {
    #[serde(rename = "yousign")]
    Signing { event: String },

    #[serde(rename = "__ubble")]
    Redirect { payload: Map<String, Value> },
}

impl InboundMessage {
    /// Classifies an untrusted message payload.
    ///
    /// Only objects are classified: arrays, strings and other values are
    /// unrecognized even when they carry a family tag. Missing or mistyped
    /// fields make the message unrecognized too, and `payload` must itself
    /// be an object. `redirectUrl` must be a non-empty string; an empty
    /// string, a number or any other truthy non-string value is not treated
    /// as a redirect target.
    #[must_use]
    pub fn classify(data: &Value) -> Self {
        if !data.is_object() {
            return Self::Unrecognized;
        }

        match Wire::deserialize(data) {
            Ok(Wire::Signing { event }) => Self::SigningEvent { event },
            Ok(Wire::Redirect { payload }) => match payload.get(REDIRECT_URL_KEY) {
                Some(Value::String(redirect_url)) if !redirect_url.is_empty() => {
                    Self::RedirectInstruction {
                        redirect_url: redirect_url.clone(),
                    }
                }
                _ => Self::Unrecognized,
            },
            Err(_) => Self::Unrecognized,
        }
    }

    /// Classifies a JSON-encoded message.
    ///
    /// Text that is not JSON is unrecognized.
    #[must_use]
    pub fn classify_json(json: &str) -> Self {
        serde_json::from_str::<Value>(json).map_or(Self::Unrecognized, |data| Self::classify(&data))
    }

    /// Returns the event kind of a signing event naming a known kind.
    #[must_use]
    pub fn event_kind(&self) -> Option<EventKind> {
        match self {
            Self::SigningEvent { event } => EventKind::from_wire(event),
            Self::RedirectInstruction { .. } | Self::Unrecognized => None,
        }
    }

    /// Returns the redirect URL of a redirect instruction.
    #[must_use]
    pub fn redirect_url(&self) -> Option<&str> {
        match self {
            Self::RedirectInstruction { redirect_url } => Some(redirect_url),
            Self::SigningEvent { .. } | Self::Unrecognized => None,
        }
    }
}
