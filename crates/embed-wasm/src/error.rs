//! JavaScript-friendly error types for WASM bindings.
//!
//! Every error reaches JavaScript as an `Error` object whose `name` tells the
//! failure kind apart, so hosts can write:
//!
//! ```javascript
//! try {
//!     new Yousign({ signatureLink, iframeContainerId: 'signing-area' });
//! } catch (e) {
//!     if (e.name === 'IframeContainerNotFound') { /* ... */ }
//! }
//! ```

use std::{error, fmt};

use js_sys::Error as JsError;
use wasm_bindgen::prelude::*;
use yousign_embed_core::error::Error as CoreError;

/// Error type for WASM operations.
#[derive(Debug, Clone)]
pub enum WasmError {
    /// Session or registration error from the core library.
    Core(CoreError),

    /// The options object does not have the expected shape.
    InvalidOptions(String),

    /// There is no `window` (e.g. in a worker).
    WindowUnavailable,

    /// JavaScript error from a DOM API.
    JsError(String),
}

impl WasmError {
    /// Returns the `name` of the JavaScript error.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Core(error) => error.name(),
            Self::InvalidOptions(_) => "InvalidOptions",
            Self::WindowUnavailable => "WindowUnavailable",
            Self::JsError(_) => "JsError",
        }
    }
}

impl fmt::Display for WasmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core(error) => {
                write!(f, "{error}")
            }
            Self::InvalidOptions(msg) => {
                write!(f, "Invalid options: {msg}")
            }
            Self::WindowUnavailable => {
                write!(f, "No window is available in this context")
            }
            Self::JsError(msg) => {
                write!(f, "JavaScript error: {msg}")
            }
        }
    }
}

impl error::Error for WasmError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Core(error) => Some(error),
            Self::InvalidOptions(_) | Self::WindowUnavailable | Self::JsError(_) => None,
        }
    }
}

impl From<WasmError> for JsValue {
    fn from(error: WasmError) -> Self {
        let js_error = JsError::new(&error.to_string());
        js_error.set_name(error.name());
        js_error.into()
    }
}

impl From<CoreError> for WasmError {
    fn from(error: CoreError) -> Self {
        Self::Core(error)
    }
}

impl From<JsValue> for WasmError {
    fn from(value: JsValue) -> Self {
        let msg = if let Some(s) = value.as_string() {
            s
        } else if let Some(err) = value.dyn_ref::<JsError>() {
            err.message().into()
        } else {
            format!("{value:?}")
        };
        Self::JsError(msg)
    }
}

/// Result type for WASM operations.
pub type WasmResult<T> = Result<T, WasmError>;
