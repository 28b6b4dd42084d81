//! Yousign Embed WASM Library
//!
//! This crate provides WebAssembly bindings for embedding the Yousign
//! signing interface in a web page and reacting to its lifecycle events.
//!
//! # Browser Support
//!
//! Works in every browser supporting WebAssembly and `window.postMessage`.
//! The host page must allow framing `https://yousign.app` (check any
//! `frame-src` Content Security Policy).
//!
//! # Quick Start
//!
//! ```javascript
//! import init, { Yousign } from 'yousign-embed-wasm';
//!
//! // Initialize WASM module
//! await init();
//!
//! // Embed the signing interface in <div id="signing-area">
//! const yousign = new Yousign({
//!     signatureLink: 'https://yousign.app/signatures/42?k=ABC123',
//!     iframeContainerId: 'signing-area',
//!     isSandbox: false,
//!     iframeAttributes: { referrerPolicy: 'origin-when-cross-origin' },
//! });
//!
//! // React to the signing lifecycle
//! yousign.onStarted((data) => console.log('started', data));
//! yousign.onSuccess((data) => console.log('signed', data));
//! yousign.onDeclined((data) => console.log('declined', data));
//!
//! // Stop listening when leaving the page
//! yousign.removeMessageListener();
//! ```
//!
//! # API Reference
//!
//! ## [`Yousign`]
//!
//! ### Construction
//!
//! - [`new Yousign(options)`](Yousign::new) - Embed the signing interface, reusing an embedded frame
//! - [`Yousign.attach(options)`](Yousign::attach) - Take over the frame embedded by a previous instance
//!
//! ### Methods
//!
//! - [`onStarted(fn)`](Yousign::on_started) - The signer opened the interface
//! - [`onSuccess(fn)`](Yousign::on_success) - The signer completed signing
//! - [`onError(fn)`](Yousign::on_error) - The interface reported an error
//! - [`onPing(fn)`](Yousign::on_ping) - Liveness notification
//! - [`onDeclined(fn)`](Yousign::on_declined) - The signer declined
//! - [`onSignatureDone(fn)`](Yousign::on_signature_done) - One signature was applied
//! - [`removeMessageListener()`](Yousign::remove_message_listener) - Stop handling messages
//! - [`isListening()`](Yousign::is_listening) - Check if messages are still handled
//!
//! # Errors
//!
//! Failures are thrown as `Error` objects with a distinguishing `name`:
//! `InvalidSignatureLink`, `IframeContainerNotFound`, `IframeNotFound`,
//! `InvalidCallbackFunction`, `InvalidOptions`, `DocumentError`.

pub mod callback;
pub mod dom;
pub mod error;
pub mod yousign;

pub use callback::JsCallback;
pub use dom::{DomDocument, IframeFrame};
pub use error::{WasmError, WasmResult};
pub use yousign::Yousign;

use wasm_bindgen::prelude::*;
use wasm_tracing::WasmLayerConfig;

/// Initializes the WASM module.
///
/// Installs the panic hook and routes `tracing` output to the browser
/// console. Called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    if wasm_tracing::set_as_global_default_with_config(console_config()).is_err() {
        // The host already installed a subscriber; keep theirs.
        tracing::debug!("tracing subscriber already set");
    }

    tracing::debug!("yousign-embed-wasm v{}", env!("CARGO_PKG_VERSION"));
}

/// Console layer settings: `debug!` and above, through `console.*` methods.
fn console_config() -> WasmLayerConfig {
    let mut config = WasmLayerConfig::new().with_max_level(tracing::Level::DEBUG);
    config.use_console_methods = true;
    config
}

/// Returns the library version.
///
/// # Returns
///
/// The version string (e.g., `"0.1.0"`).
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Import for WASM tests
    use wasm_bindgen_test as _;

    #[test]
    fn console_shows_debug_events() {
        let config = console_config();
        assert_eq!(config.max_level, tracing::Level::DEBUG);
        assert!(config.use_console_methods);
    }

    #[test]
    fn version() {
        let version = get_version();
        assert!(!version.is_empty());
    }
}
