//! Browser DOM implementation of the host traits.
//!
//! [`DomDocument`] and [`IframeFrame`] implement the core [`Document`] and
//! [`Frame`] traits over `web-sys`, so sessions drive real elements.

use std::fmt;

use wasm_bindgen::JsCast;
use web_sys::HtmlIFrameElement;

use yousign_embed_core::error::{Error as CoreError, Result as CoreResult};
use yousign_embed_core::{Document, Frame};

/// The page's document.
#[derive(Clone)]
pub struct DomDocument(web_sys::Document);

impl DomDocument {
    /// Wraps a document.
    #[must_use]
    pub const fn new(document: web_sys::Document) -> Self {
        Self(document)
    }
}

impl fmt::Debug for DomDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomDocument").finish_non_exhaustive()
    }
}

impl Document for DomDocument {
    type Frame = IframeFrame;

    fn contains_element(&self, id: &str) -> bool {
        self.0.get_element_by_id(id).is_some()
    }

    fn frame_by_id(&self, id: &str) -> Option<IframeFrame> {
        self.0
            .get_element_by_id(id)?
            .dyn_into::<HtmlIFrameElement>()
            .ok()
            .map(IframeFrame)
    }

    fn create_frame(&self, container_id: &str, frame_id: &str) -> CoreResult<IframeFrame> {
        let container = self
            .0
            .get_element_by_id(container_id)
            .ok_or_else(|| CoreError::IframeContainerNotFound(container_id.to_string()))?;

        let iframe: HtmlIFrameElement = self
            .0
            .create_element("iframe")
            .map_err(|e| CoreError::Document(format!("createElement: {e:?}")))?
            .unchecked_into();
        iframe.set_id(frame_id);

        container
            .append_child(&iframe)
            .map_err(|e| CoreError::Document(format!("appendChild: {e:?}")))?;

        Ok(IframeFrame(iframe))
    }
}

/// An `<iframe>` element.
#[derive(Clone)]
pub struct IframeFrame(HtmlIFrameElement);

impl IframeFrame {
    /// Returns the underlying element.
    #[must_use]
    pub const fn element(&self) -> &HtmlIFrameElement {
        &self.0
    }
}

impl fmt::Debug for IframeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IframeFrame")
            .field("id", &self.0.id())
            .finish_non_exhaustive()
    }
}

impl Frame for IframeFrame {
    fn set_src(&self, url: &str) {
        self.0.set_src(url);
    }

    fn set_referrer_policy(&self, policy: &str) {
        self.0.set_referrer_policy(policy);
    }
}
