//! The `Yousign` JavaScript class.
//!
//! This module exposes an embedding session to JavaScript. Constructing a
//! `Yousign` object embeds the signing interface and starts listening to the
//! window `message` event; the `on*` methods register lifecycle callbacks;
//! `removeMessageListener` stops listening.
//!
//! # Example
//!
//! ```javascript
//! const yousign = new Yousign({
//!     signatureLink: 'https://yousign.app/signatures/42?k=ABC123',
//!     iframeContainerId: 'signing-area',
//!     isSandbox: false,
//! });
//!
//! yousign.onSuccess((data) => console.log('signed', data));
//! yousign.onDeclined(() => router.push('/declined'));
//!
//! // When leaving the page
//! yousign.removeMessageListener();
//! ```

use std::fmt;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{MessageEvent, Window};

use yousign_embed_core::{EmbedOptions, EventKind, InboundMessage, Result as CoreResult, Session};

use crate::callback::JsCallback;
use crate::dom::{DomDocument, IframeFrame};
use crate::error::{WasmError, WasmResult};

/// Name of the window event carrying cross-document messages.
const MESSAGE_EVENT: &str = "message";

type EmbedSession = Session<JsCallback, IframeFrame>;

/// An embedded signing interface.
///
/// # Thread Safety
///
/// This type is not thread-safe and should only be used from the main thread
/// in a browser environment.
#[wasm_bindgen]
pub struct Yousign {
    /// The session shared with the message listener.
    session: Rc<EmbedSession>,

    /// The window the listener is registered on.
    window: Window,

    /// The registered `message` listener.
    ///
    /// Kept for the lifetime of the object, even after removal, so that a
    /// callback removing the listener does not free the closure running it.
    listener: Closure<dyn Fn(MessageEvent)>,
}

impl fmt::Debug for Yousign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Yousign")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[wasm_bindgen]
impl Yousign {
    /// Embeds the signing interface and starts listening for its messages.
    ///
    /// Reuses the frame already embedded by a previous instance, if any.
    ///
    /// # Errors
    ///
    /// - `InvalidOptions` if `options` is not an options object
    /// - `InvalidSignatureLink` if the signature link is not a valid URL
    /// - `IframeContainerNotFound` if the container element does not exist
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<Yousign, JsValue> {
        Self::new_internal(&options, EmbedSession::open).map_err(JsValue::from)
    }

    /// Takes over the frame embedded by a previous instance.
    ///
    /// # Errors
    ///
    /// Same as the constructor, plus `IframeNotFound` if no frame is
    /// embedded yet.
    #[wasm_bindgen]
    pub fn attach(options: JsValue) -> Result<Yousign, JsValue> {
        Self::new_internal(&options, EmbedSession::attach).map_err(JsValue::from)
    }

    /// Internal construction.
    fn new_internal(
        options: &JsValue,
        open: fn(&DomDocument, &EmbedOptions) -> CoreResult<EmbedSession>,
    ) -> WasmResult<Yousign> {
        let options = parse_options(options)?;

        let window = web_sys::window().ok_or(WasmError::WindowUnavailable)?;
        let document = window.document().ok_or(WasmError::WindowUnavailable)?;
        let session = Rc::new(open(&DomDocument::new(document), &options)?);

        let listener_session = Rc::clone(&session);
        let listener = Closure::<dyn Fn(_)>::new(move |event: MessageEvent| {
            let data = event.data();
            let message = classify(&data);
            listener_session.receive(&event.origin(), &message, &data);
        });

        window.add_event_listener_with_callback(MESSAGE_EVENT, listener.as_ref().unchecked_ref())?;

        Ok(Self {
            session,
            window,
            listener,
        })
    }

    /// Registers the callback for the `started` event.
    ///
    /// # Errors
    ///
    /// `InvalidCallbackFunction` if `callback` is not a function.
    #[wasm_bindgen(js_name = "onStarted")]
    pub fn on_started(&self, callback: JsValue) -> Result<(), JsValue> {
        self.register(EventKind::Started, callback)
    }

    /// Registers the callback for the `success` event.
    ///
    /// # Errors
    ///
    /// `InvalidCallbackFunction` if `callback` is not a function.
    #[wasm_bindgen(js_name = "onSuccess")]
    pub fn on_success(&self, callback: JsValue) -> Result<(), JsValue> {
        self.register(EventKind::Success, callback)
    }

    /// Registers the callback for the `error` event.
    ///
    /// # Errors
    ///
    /// `InvalidCallbackFunction` if `callback` is not a function.
    #[wasm_bindgen(js_name = "onError")]
    pub fn on_error(&self, callback: JsValue) -> Result<(), JsValue> {
        self.register(EventKind::Error, callback)
    }

    /// Registers the callback for the `ping` event.
    ///
    /// # Errors
    ///
    /// `InvalidCallbackFunction` if `callback` is not a function.
    #[wasm_bindgen(js_name = "onPing")]
    pub fn on_ping(&self, callback: JsValue) -> Result<(), JsValue> {
        self.register(EventKind::Ping, callback)
    }

    /// Registers the callback for the `declined` event.
    ///
    /// # Errors
    ///
    /// `InvalidCallbackFunction` if `callback` is not a function.
    #[wasm_bindgen(js_name = "onDeclined")]
    pub fn on_declined(&self, callback: JsValue) -> Result<(), JsValue> {
        self.register(EventKind::Declined, callback)
    }

    /// Registers the callback for the `signature.done` event.
    ///
    /// # Errors
    ///
    /// `InvalidCallbackFunction` if `callback` is not a function.
    #[wasm_bindgen(js_name = "onSignatureDone")]
    pub fn on_signature_done(&self, callback: JsValue) -> Result<(), JsValue> {
        self.register(EventKind::SignatureDone, callback)
    }

    /// Stops listening to window messages.
    ///
    /// Safe to call more than once.
    #[wasm_bindgen(js_name = "removeMessageListener")]
    pub fn remove_message_listener(&self) {
        if self.session.detach() {
            let removed = self.window.remove_event_listener_with_callback(
                MESSAGE_EVENT,
                self.listener.as_ref().unchecked_ref(),
            );
            if let Err(e) = removed {
                tracing::warn!("failed to remove message listener: {e:?}");
            }
        }
    }

    /// Checks if the object still handles window messages.
    #[wasm_bindgen(js_name = "isListening")]
    pub fn is_listening(&self) -> bool {
        self.session.is_attached()
    }

    /// Returns the finalized signature link loaded in the frame.
    #[wasm_bindgen(getter = signatureLink)]
    pub fn signature_link(&self) -> String {
        self.session.link().to_string()
    }
}

impl Yousign {
    /// Shared registration path of the `on*` methods.
    fn register(&self, kind: EventKind, callback: JsValue) -> Result<(), JsValue> {
        self.session
            .register::<JsValue>(kind, callback)
            .map_err(|e| JsValue::from(WasmError::from(e)))
    }
}

impl Drop for Yousign {
    fn drop(&mut self) {
        self.remove_message_listener();
    }
}

/// Reads the constructor options object.
fn parse_options(options: &JsValue) -> WasmResult<EmbedOptions> {
    let json = js_sys::JSON::stringify(options)
        .ok()
        .and_then(|json| json.as_string())
        .ok_or_else(|| WasmError::InvalidOptions("expected an options object".to_string()))?;
    serde_json::from_str(&json).map_err(|e| WasmError::InvalidOptions(e.to_string()))
}

/// Classifies a message payload.
///
/// Payloads that have no JSON form (functions, cyclic objects, `BigInt`,
/// transferables) are unrecognized.
fn classify(data: &JsValue) -> InboundMessage {
    js_sys::JSON::stringify(data)
        .ok()
        .and_then(|json| json.as_string())
        .map_or(InboundMessage::Unrecognized, |json| {
            InboundMessage::classify_json(&json)
        })
}
