//! Error types for the Yousign embedding core.
//!
//! This module provides the error type [`enum@Error`] covering every failure a
//! host can observe: building a session and registering event callbacks.
//!
//! Inbound messages never produce errors. A message that does not match
//! any recognized shape is ignored, because the window message channel is
//! shared with unrelated senders.
//!
//! # Example
//!
//! ```
//! use yousign_embed_core::{Error, EventKind};
//!
//! let err = Error::InvalidCallbackFunction(EventKind::SignatureDone);
//! assert_eq!(err.to_string(), "Callback on signature.done event is not a function.");
//! assert_eq!(err.name(), "InvalidCallbackFunction");
//! ```

use core::result::Result as CoreResult;

use thiserror::Error;
use url::ParseError as UrlParseError;

use crate::event::EventKind;

/// The main error type for the embedding core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    // =========================================================================
    // Construction Errors
    // =========================================================================
    /// The signature link is not a valid absolute URL.
    #[error("The signature link is invalid.")]
    InvalidSignatureLink,

    /// No element in the host document has the given container id.
    #[error("The iFrame container with the id \"{0}\" is not found.")]
    IframeContainerNotFound(String),

    /// [`Session::attach`](crate::Session::attach) found no frame to adopt.
    #[error("The iFrame with the id \"{0}\" is not found.")]
    IframeNotFound(String),

    /// The host document refused an operation (element creation, insertion).
    #[error("Document error: {0}")]
    Document(String),

    // =========================================================================
    // Registration Errors
    // =========================================================================
    /// The value offered as a handler for this event is not callable.
    #[error("Callback on {0} event is not a function.")]
    InvalidCallbackFunction(EventKind),
}

impl Error {
    /// Returns the error name surfaced to JavaScript callers.
    ///
    /// Each variant maps to a distinct name so hosts can tell failure kinds
    /// apart by `error.name`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InvalidSignatureLink => "InvalidSignatureLink",
            Self::IframeContainerNotFound(_) => "IframeContainerNotFound",
            Self::IframeNotFound(_) => "IframeNotFound",
            Self::Document(_) => "DocumentError",
            Self::InvalidCallbackFunction(_) => "InvalidCallbackFunction",
        }
    }
}

impl From<UrlParseError> for Error {
    fn from(_: UrlParseError) -> Self {
        Self::InvalidSignatureLink
    }
}

/// A specialized [`Result`] type for embedding operations.
pub type Result<T> = CoreResult<T, Error>;
