//! Embedding sessions.
//!
//! A [`Session`] is one embedded signing interface: the frame showing it,
//! the signature link it was opened with, the host callbacks, and whether it
//! still listens to the window message channel.
//!
//! The host environment is abstracted by the [`Document`] and [`Frame`]
//! traits so the same session logic runs against the browser DOM (see
//! `yousign-embed-wasm`) and against in-memory fakes in tests.
//!
//! # Example
//!
//! ```ignore
//! use yousign_embed_core::{EmbedOptions, Session};
//!
//! let options = EmbedOptions::new("https://yousign.app/signatures/42?k=ABC", "signing-area");
//! let session = Session::<MyHandler, _>::open(&document, &options)?;
//!
//! session.register(EventKind::Success, my_handler)?;
//!
//! // From the window message listener:
//! session.receive(&origin, &InboundMessage::classify(&data), &data);
//!
//! // When leaving the page:
//! session.detach();
//! ```

use core::cell::{Cell, RefCell};
use core::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::event::EventKind;
use crate::link::SignatureLink;
use crate::message::InboundMessage;
use crate::registry::{CallbackRegistry, Handler};
use crate::router::{MessageRouter, Route};

/// Well-known id of the embedded frame element.
pub const FRAME_ID: &str = "yousign-iframe";

/// A frame element hosting the signing interface.
pub trait Frame {
    /// Sets the frame's navigation target.
    fn set_src(&self, url: &str);

    /// Sets the frame's `referrerpolicy` attribute.
    fn set_referrer_policy(&self, policy: &str);
}

/// The host document the frame lives in.
pub trait Document {
    /// The frame type this document hands out.
    type Frame: Frame;

    /// Returns `true` if an element with `id` exists.
    fn contains_element(&self, id: &str) -> bool;

    /// Returns the frame element with `id`, if there is one.
    fn frame_by_id(&self, id: &str) -> Option<Self::Frame>;

    /// Creates a frame with id `frame_id` as the last child of the element
    /// with id `container_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IframeContainerNotFound`] if the container does not
    /// exist, or [`Error::Document`] if the document refuses the operation.
    fn create_frame(&self, container_id: &str, frame_id: &str) -> Result<Self::Frame>;
}

/// Attributes applied to the frame element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IframeAttributes {
    /// Value for the `referrerpolicy` attribute, applied verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer_policy: Option<String>,
}

/// Options for opening a session.
///
/// Deserializes from the object hosts pass to the JavaScript constructor:
///
/// ```
/// use yousign_embed_core::EmbedOptions;
///
/// let options: EmbedOptions = serde_json::from_str(r#"{
///     "signatureLink": "https://yousign.app/signatures/42?k=ABC",
///     "iframeContainerId": "signing-area",
///     "isSandbox": true,
///     "iframeAttributes": { "referrerPolicy": "origin-when-cross-origin" }
/// }"#).unwrap();
///
/// assert!(options.is_sandbox);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedOptions {
    /// URL of the signing interface for one signer.
    pub signature_link: String,

    /// Id of the element the frame is created in.
    pub iframe_container_id: String,

    /// Whether the link targets the sandbox environment.
    #[serde(default)]
    pub is_sandbox: bool,

    /// Extra frame attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iframe_attributes: Option<IframeAttributes>,
}

impl EmbedOptions {
    /// Creates production options with no extra attributes.
    pub fn new(signature_link: impl Into<String>, iframe_container_id: impl Into<String>) -> Self {
        Self {
            signature_link: signature_link.into(),
            iframe_container_id: iframe_container_id.into(),
            is_sandbox: false,
            iframe_attributes: None,
        }
    }

    /// Returns the referrer policy to apply, if any.
    #[must_use]
    pub fn referrer_policy(&self) -> Option<&str> {
        self.iframe_attributes
            .as_ref()
            .and_then(|attributes| attributes.referrer_policy.as_deref())
            .filter(|policy| !policy.is_empty())
    }
}

/// How the session obtains its frame.
#[derive(Clone, Copy)]
enum FrameSource {
    Create,
    Attach,
    AttachOrCreate,
}

/// One embedded signing interface.
pub struct Session<H, F> {
    frame: F,
    router: MessageRouter,
    registry: RefCell<CallbackRegistry<H>>,
    attached: Cell<bool>,
}

impl<H, F: Frame> Session<H, F> {
    /// Opens a session in a new frame inside the container.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSignatureLink`] if the link does not parse
    /// - [`Error::IframeContainerNotFound`] if the container does not exist
    /// - [`Error::Document`] if the frame cannot be created
    pub fn create<D>(document: &D, options: &EmbedOptions) -> Result<Self>
    where
        D: Document<Frame = F>,
    {
        Self::build(document, options, FrameSource::Create)
    }

    /// Opens a session in the frame already embedded under [`FRAME_ID`].
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSignatureLink`] if the link does not parse
    /// - [`Error::IframeContainerNotFound`] if the container does not exist
    /// - [`Error::IframeNotFound`] if no frame is embedded yet
    pub fn attach<D>(document: &D, options: &EmbedOptions) -> Result<Self>
    where
        D: Document<Frame = F>,
    {
        Self::build(document, options, FrameSource::Attach)
    }

    /// Opens a session, reusing the embedded frame if there is one.
    ///
    /// # Errors
    ///
    /// Same as [`Session::create`].
    pub fn open<D>(document: &D, options: &EmbedOptions) -> Result<Self>
    where
        D: Document<Frame = F>,
    {
        Self::build(document, options, FrameSource::AttachOrCreate)
    }

    fn build<D>(document: &D, options: &EmbedOptions, source: FrameSource) -> Result<Self>
    where
        D: Document<Frame = F>,
    {
        let link = SignatureLink::parse(&options.signature_link, options.is_sandbox)?;

        let container_id = options.iframe_container_id.as_str();
        if !document.contains_element(container_id) {
            return Err(Error::IframeContainerNotFound(container_id.to_string()));
        }

        let frame = match source {
            FrameSource::Create => document.create_frame(container_id, FRAME_ID)?,
            FrameSource::Attach => document
                .frame_by_id(FRAME_ID)
                .ok_or_else(|| Error::IframeNotFound(FRAME_ID.to_string()))?,
            FrameSource::AttachOrCreate => match document.frame_by_id(FRAME_ID) {
                Some(frame) => frame,
                None => document.create_frame(container_id, FRAME_ID)?,
            },
        };

        frame.set_src(link.as_str());
        if let Some(policy) = options.referrer_policy() {
            frame.set_referrer_policy(policy);
        }

        debug!(container = container_id, sandbox = options.is_sandbox, "signing session opened");

        Ok(Self {
            frame,
            router: MessageRouter::new(link),
            registry: RefCell::new(CallbackRegistry::new()),
            attached: Cell::new(true),
        })
    }

    /// Registers the handler for `kind`, replacing any previous one.
    ///
    /// May be called from inside a handler.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCallbackFunction`] if `candidate` is not
    /// callable. The previous handler stays registered.
    pub fn register<C>(&self, kind: EventKind, candidate: C) -> Result<()>
    where
        C: TryInto<H>,
    {
        self.registry.borrow_mut().register(kind, candidate)
    }

    /// Returns `true` if a handler is registered for `kind`.
    #[must_use]
    pub fn is_registered(&self, kind: EventKind) -> bool {
        self.registry.borrow().is_registered(kind)
    }

    /// Handles one message from the window message channel.
    ///
    /// `message` is the classified form of `payload`; the handler receives
    /// `payload` itself. Does nothing once the session is detached.
    pub fn receive<P>(&self, origin: &str, message: &InboundMessage, payload: &P) -> Route
    where
        P: ?Sized,
        H: Handler<P> + Clone,
    {
        if !self.attached.get() {
            return Route::default();
        }

        let (route, handler) = {
            let registry = self.registry.borrow();
            let route = self.router.route(origin, message, &*registry);
            let handler = route.callback.and_then(|kind| registry.get(kind).cloned());
            (route, handler)
        };

        if let (Some(kind), Some(handler)) = (route.callback, handler) {
            debug!(event = %kind, "dispatching signing event");
            handler.handle(payload);
        }

        if let Some(target) = &route.navigation {
            debug!(origin, "following redirect instruction");
            self.frame.set_src(target);
        }

        route
    }

    /// Stops handling messages.
    ///
    /// Returns `true` the first time, `false` if already detached.
    pub fn detach(&self) -> bool {
        let was_attached = self.attached.replace(false);
        if was_attached {
            debug!("signing session detached");
        }
        was_attached
    }

    /// Returns `true` while the session handles messages.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    /// Returns the frame hosting the signing interface.
    #[must_use]
    pub const fn frame(&self) -> &F {
        &self.frame
    }

    /// Returns the finalized signature link.
    #[must_use]
    pub const fn link(&self) -> &SignatureLink {
        self.router.link()
    }

    /// Returns the value of query parameter `key` of the signature link.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.router.link().query_param(key)
    }
}

impl<H, F> fmt::Debug for Session<H, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("router", &self.router)
            .field("registry", &self.registry)
            .field("attached", &self.attached.get())
            .finish_non_exhaustive()
    }
}
