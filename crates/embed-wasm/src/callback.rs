//! JavaScript callbacks as event handlers.

use js_sys::Function;
use wasm_bindgen::prelude::*;

use yousign_embed_core::Handler;

/// A JavaScript function registered for a signing event.
///
/// Only functions convert from a [`JsValue`]; anything else is rejected,
/// which is how registrations validate callability.
#[derive(Debug, Clone)]
pub struct JsCallback(Function);

impl TryFrom<JsValue> for JsCallback {
    type Error = JsValue;

    fn try_from(value: JsValue) -> Result<Self, Self::Error> {
        value.dyn_into::<Function>().map(Self)
    }
}

impl Handler<JsValue> for JsCallback {
    /// Calls the function with the message payload.
    ///
    /// An exception thrown by the function is rethrown to the event loop,
    /// exactly as if the function had been the listener itself.
    fn handle(&self, payload: &JsValue) {
        if let Err(exception) = self.0.call1(&JsValue::NULL, payload) {
            wasm_bindgen::throw_val(exception);
        }
    }
}
