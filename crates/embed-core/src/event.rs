//! Signing lifecycle event kinds.
//!
//! The signing interface reports its progress through a closed set of
//! events. Each one can carry at most one host callback.
//!
//! | Kind            | Wire name        | JS registration     |
//! |-----------------|------------------|---------------------|
//! | `Started`       | `started`        | `onStarted`         |
//! | `Success`       | `success`        | `onSuccess`         |
//! | `Error`         | `error`          | `onError`           |
//! | `Ping`          | `ping`           | `onPing`            |
//! | `Declined`      | `declined`       | `onDeclined`        |
//! | `SignatureDone` | `signature.done` | `onSignatureDone`   |
//!
//! # Example
//!
//! ```
//! use yousign_embed_core::EventKind;
//!
//! let kind: EventKind = "signature.done".parse().unwrap();
//! assert_eq!(kind, EventKind::SignatureDone);
//! assert_eq!(kind.as_str(), "signature.done");
//! ```

use core::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A signing lifecycle event the host may subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventKind {
    /// The signer opened the signing interface.
    #[serde(rename = "started")]
    Started = 0,

    /// The signer completed every signature requested of them.
    #[serde(rename = "success")]
    Success = 1,

    /// The signing interface reported an error.
    #[serde(rename = "error")]
    Error = 2,

    /// Periodic liveness notification from the signing interface.
    #[serde(rename = "ping")]
    Ping = 3,

    /// The signer declined to sign.
    #[serde(rename = "declined")]
    Declined = 4,

    /// A single signature was applied.
    #[serde(rename = "signature.done")]
    SignatureDone = 5,
}

impl EventKind {
    /// Number of event kinds.
    pub const COUNT: usize = 6;

    /// All event kinds, in slot order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Started,
        Self::Success,
        Self::Error,
        Self::Ping,
        Self::Declined,
        Self::SignatureDone,
    ];

    /// Returns the slot index of this kind in `0..COUNT`.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the name used on the wire in the `event` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Success => "success",
            Self::Error => "error",
            Self::Ping => "ping",
            Self::Declined => "declined",
            Self::SignatureDone => "signature.done",
        }
    }

    /// Looks up a kind by its wire name.
    ///
    /// # Example
    ///
    /// ```
    /// use yousign_embed_core::EventKind;
    ///
    /// assert_eq!(EventKind::from_wire("ping"), Some(EventKind::Ping));
    /// assert_eq!(EventKind::from_wire("Ping"), None);
    /// ```
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown event name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventKind(pub String);

impl fmt::Display for UnknownEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event kind: {}", self.0)
    }
}

impl core::error::Error for UnknownEventKind {}

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s).ok_or_else(|| UnknownEventKind(s.to_string()))
    }
}
