//! Session behaviour against an in-memory host document.

// Silence unused crate dependency warnings for test binary
use serde as _;
use thiserror as _;
use tracing as _;
use url as _;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::{Value, json};
use yousign_embed_core::{
    Document, EmbedOptions, Error, EventKind, FRAME_ID, Frame, IframeAttributes, InboundMessage,
    Result, Session, TRUSTED_ORIGIN,
};

const LINK: &str = "https://yousign.app/signatures/42?k=ABC123";
const CONTAINER: &str = "signing-area";

#[derive(Debug, Default)]
struct FrameState {
    id: String,
    parent: String,
    history: Vec<String>,
    referrer_policy: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct FakeFrame(Rc<RefCell<FrameState>>);

impl FakeFrame {
    fn src(&self) -> Option<String> {
        self.0.borrow().history.last().cloned()
    }

    fn navigations(&self) -> usize {
        self.0.borrow().history.len()
    }
}

impl Frame for FakeFrame {
    fn set_src(&self, url: &str) {
        self.0.borrow_mut().history.push(url.to_string());
    }

    fn set_referrer_policy(&self, policy: &str) {
        self.0.borrow_mut().referrer_policy = Some(policy.to_string());
    }
}

#[derive(Debug, Default)]
struct FakeDocument {
    containers: Vec<String>,
    frames: RefCell<Vec<FakeFrame>>,
    refuse_creation: bool,
}

impl FakeDocument {
    fn with_container(id: &str) -> Self {
        Self {
            containers: vec![id.to_string()],
            ..Self::default()
        }
    }

    fn frame_count(&self) -> usize {
        self.frames.borrow().len()
    }
}

impl Document for FakeDocument {
    type Frame = FakeFrame;

    fn contains_element(&self, id: &str) -> bool {
        self.containers.iter().any(|c| c == id)
            || self.frames.borrow().iter().any(|f| f.0.borrow().id == id)
    }

    fn frame_by_id(&self, id: &str) -> Option<FakeFrame> {
        self.frames
            .borrow()
            .iter()
            .find(|f| f.0.borrow().id == id)
            .cloned()
    }

    fn create_frame(&self, container_id: &str, frame_id: &str) -> Result<FakeFrame> {
        if self.refuse_creation {
            return Err(Error::Document("appendChild refused".to_string()));
        }
        let frame = FakeFrame::default();
        {
            let mut state = frame.0.borrow_mut();
            state.id = frame_id.to_string();
            state.parent = container_id.to_string();
        }
        self.frames.borrow_mut().push(frame.clone());
        Ok(frame)
    }
}

/// A host callback.
#[derive(Clone)]
struct Callback(Rc<dyn Fn(&Value)>);

impl yousign_embed_core::Handler<Value> for Callback {
    fn handle(&self, payload: &Value) {
        (self.0)(payload);
    }
}

/// Whatever a host may pass to a registration method.
enum Candidate {
    Function(Rc<dyn Fn(&Value)>),
    Plain(Value),
}

impl TryFrom<Candidate> for Callback {
    type Error = Value;

    fn try_from(candidate: Candidate) -> std::result::Result<Self, Value> {
        match candidate {
            Candidate::Function(f) => Ok(Self(f)),
            Candidate::Plain(value) => Err(value),
        }
    }
}

type TestSession = Session<Callback, FakeFrame>;

/// Records every payload a callback receives.
fn recorder() -> (Rc<RefCell<Vec<Value>>>, Candidate) {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let sink = calls.clone();
    let candidate = Candidate::Function(Rc::new(move |payload: &Value| {
        sink.borrow_mut().push(payload.clone());
    }));
    (calls, candidate)
}

fn open(document: &FakeDocument) -> TestSession {
    TestSession::open(document, &EmbedOptions::new(LINK, CONTAINER)).unwrap()
}

fn deliver(session: &TestSession, origin: &str, data: &Value) {
    session.receive(origin, &InboundMessage::classify(data), data);
}

fn signing_event(kind: EventKind) -> Value {
    json!({ "type": "yousign", "event": kind.as_str(), "signature_request_id": "sr_1" })
}

fn redirect(url: &str) -> Value {
    json!({ "type": "__ubble", "payload": { "redirectUrl": url } })
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn malformed_link_is_rejected() {
    let document = FakeDocument::with_container(CONTAINER);
    let err = TestSession::open(&document, &EmbedOptions::new("yousign.app/s/42", CONTAINER))
        .unwrap_err();
    assert_eq!(err, Error::InvalidSignatureLink);
    assert_eq!(err.name(), "InvalidSignatureLink");
    assert_eq!(document.frame_count(), 0);
}

#[test]
fn missing_container_is_rejected() {
    let document = FakeDocument::with_container(CONTAINER);
    let err = TestSession::open(&document, &EmbedOptions::new(LINK, "elsewhere")).unwrap_err();
    assert_eq!(err, Error::IframeContainerNotFound("elsewhere".to_string()));
    assert_eq!(
        err.to_string(),
        "The iFrame container with the id \"elsewhere\" is not found."
    );
    assert_eq!(document.frame_count(), 0);
}

#[test]
fn link_is_checked_before_container() {
    let document = FakeDocument::default();
    let err = TestSession::open(&document, &EmbedOptions::new("::", "elsewhere")).unwrap_err();
    assert_eq!(err, Error::InvalidSignatureLink);
}

#[test]
fn open_creates_frame_in_container() {
    let document = FakeDocument::with_container(CONTAINER);
    let session = open(&document);

    assert_eq!(document.frame_count(), 1);
    let state = session.frame().0.borrow();
    assert_eq!(state.id, FRAME_ID);
    assert_eq!(state.parent, CONTAINER);
    assert_eq!(state.history, vec![LINK.to_string()]);
    assert_eq!(state.referrer_policy, None);
    assert!(session.is_attached());
}

#[test]
fn open_reuses_embedded_frame() {
    let document = FakeDocument::with_container(CONTAINER);
    let first = open(&document);
    first.detach();

    let mut options = EmbedOptions::new("https://yousign.app/signatures/43?k=XYZ", CONTAINER);
    options.is_sandbox = true;
    let second = TestSession::open(&document, &options).unwrap();

    assert_eq!(document.frame_count(), 1);
    assert_eq!(
        second.frame().src().as_deref(),
        Some("https://yousign.app/signatures/43?k=XYZ&disable_domain_validation=true")
    );
    assert_eq!(first.frame().navigations(), 2);
}

#[test]
fn attach_requires_embedded_frame() {
    let document = FakeDocument::with_container(CONTAINER);
    let options = EmbedOptions::new(LINK, CONTAINER);

    let err = TestSession::attach(&document, &options).unwrap_err();
    assert_eq!(err, Error::IframeNotFound(FRAME_ID.to_string()));

    TestSession::create(&document, &options).unwrap();
    let attached = TestSession::attach(&document, &options).unwrap();
    assert_eq!(document.frame_count(), 1);
    assert_eq!(attached.frame().src().as_deref(), Some(LINK));
}

#[test]
fn create_always_creates() {
    let document = FakeDocument::with_container(CONTAINER);
    let options = EmbedOptions::new(LINK, CONTAINER);
    TestSession::create(&document, &options).unwrap();
    TestSession::create(&document, &options).unwrap();
    assert_eq!(document.frame_count(), 2);
}

#[test]
fn document_failure_surfaces() {
    let document = FakeDocument {
        refuse_creation: true,
        ..FakeDocument::with_container(CONTAINER)
    };
    let err = TestSession::open(&document, &EmbedOptions::new(LINK, CONTAINER)).unwrap_err();
    assert_eq!(err.name(), "DocumentError");
}

#[test]
fn sandbox_and_referrer_policy() {
    let document = FakeDocument::with_container(CONTAINER);
    let options = EmbedOptions {
        is_sandbox: true,
        iframe_attributes: Some(IframeAttributes {
            referrer_policy: Some("strict-origin".to_string()),
        }),
        ..EmbedOptions::new(LINK, CONTAINER)
    };
    let session = TestSession::open(&document, &options).unwrap();

    assert_eq!(
        session.frame().src().as_deref(),
        Some("https://yousign.app/signatures/42?k=ABC123&disable_domain_validation=true")
    );
    assert_eq!(
        session.frame().0.borrow().referrer_policy.as_deref(),
        Some("strict-origin")
    );
    assert_eq!(
        session.query_param("disable_domain_validation").as_deref(),
        Some("true")
    );
    assert_eq!(session.query_param("k").as_deref(), Some("ABC123"));
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn non_callable_registration_fails_and_keeps_handler() {
    let document = FakeDocument::with_container(CONTAINER);
    let session = open(&document);

    for kind in EventKind::ALL {
        let (calls, candidate) = recorder();
        session.register(kind, candidate).unwrap();

        for plain in [json!("callback"), json!(null), json!({ "call": true })] {
            let err = session.register(kind, Candidate::Plain(plain)).unwrap_err();
            assert_eq!(err, Error::InvalidCallbackFunction(kind));
            assert_eq!(
                err.to_string(),
                format!("Callback on {} event is not a function.", kind.as_str())
            );
        }

        deliver(&session, TRUSTED_ORIGIN, &signing_event(kind));
        assert_eq!(calls.borrow().len(), 1, "{kind}");
    }
}

// =============================================================================
// Dispatch
// =============================================================================

#[test]
fn each_kind_reaches_only_its_handler() {
    let document = FakeDocument::with_container(CONTAINER);
    let session = open(&document);

    let recorders: Vec<_> = EventKind::ALL
        .into_iter()
        .map(|kind| {
            let (calls, candidate) = recorder();
            session.register(kind, candidate).unwrap();
            calls
        })
        .collect();

    for kind in EventKind::ALL {
        let data = signing_event(kind);
        deliver(&session, TRUSTED_ORIGIN, &data);

        for (other, calls) in EventKind::ALL.iter().zip(&recorders) {
            let calls = calls.borrow();
            if *other == kind {
                assert_eq!(calls.last(), Some(&data));
            }
            let expected = usize::from(other.index() <= kind.index());
            assert_eq!(calls.len(), expected, "{other} after {kind}");
        }
    }
    assert_eq!(session.frame().navigations(), 1);
}

#[test]
fn untrusted_origin_never_dispatches() {
    let document = FakeDocument::with_container(CONTAINER);
    let session = open(&document);
    let count = Rc::new(Cell::new(0));
    for kind in EventKind::ALL {
        let counter = count.clone();
        session
            .register(
                kind,
                Candidate::Function(Rc::new(move |_: &Value| counter.set(counter.get() + 1))),
            )
            .unwrap();
    }

    for origin in ["https://evil.test", "https://yousign.app.evil.test", "null"] {
        for kind in EventKind::ALL {
            deliver(&session, origin, &signing_event(kind));
        }
    }
    assert_eq!(count.get(), 0);
}

#[test]
fn unregistered_event_is_ignored() {
    let document = FakeDocument::with_container(CONTAINER);
    let session = open(&document);
    let (calls, candidate) = recorder();
    session.register(EventKind::Success, candidate).unwrap();

    deliver(&session, TRUSTED_ORIGIN, &signing_event(EventKind::Declined));
    deliver(
        &session,
        TRUSTED_ORIGIN,
        &json!({ "type": "yousign", "event": "unknown.event" }),
    );
    deliver(&session, TRUSTED_ORIGIN, &json!({ "type": "yousign" }));
    deliver(&session, TRUSTED_ORIGIN, &json!("hello"));

    assert!(calls.borrow().is_empty());
    assert_eq!(session.frame().navigations(), 1);
}

#[test]
fn redirect_appends_signer_key() {
    let document = FakeDocument::with_container(CONTAINER);
    let session = open(&document);

    deliver(&session, "https://verification.partner.test", &redirect("https://x.test/v"));
    assert_eq!(
        session.frame().src().as_deref(),
        Some("https://x.test/v&k=ABC123")
    );

    deliver(&session, TRUSTED_ORIGIN, &redirect("https://x.test/w?step=2"));
    assert_eq!(
        session.frame().src().as_deref(),
        Some("https://x.test/w?step=2&k=ABC123")
    );
}

#[test]
fn malformed_redirect_is_ignored() {
    let document = FakeDocument::with_container(CONTAINER);
    let session = open(&document);

    deliver(&session, TRUSTED_ORIGIN, &json!({ "type": "__ubble" }));
    deliver(&session, TRUSTED_ORIGIN, &json!({ "type": "__ubble", "payload": {} }));
    deliver(&session, TRUSTED_ORIGIN, &redirect(""));
    deliver(
        &session,
        TRUSTED_ORIGIN,
        &json!({ "type": "__ubble", "payload": ["https://x.test"] }),
    );

    assert_eq!(session.frame().navigations(), 1);
}

#[test]
fn tagged_arrays_neither_navigate_nor_dispatch() {
    let document = FakeDocument::with_container(CONTAINER);
    let session = open(&document);
    let (calls, candidate) = recorder();
    session.register(EventKind::Success, candidate).unwrap();

    deliver(
        &session,
        "https://evil.test",
        &json!(["__ubble", { "redirectUrl": "https://attacker.test/p?x=1" }]),
    );
    deliver(
        &session,
        TRUSTED_ORIGIN,
        &json!(["__ubble", { "redirectUrl": "https://attacker.test/p?x=1" }]),
    );
    deliver(&session, TRUSTED_ORIGIN, &json!(["yousign", "success"]));

    assert_eq!(session.frame().navigations(), 1);
    assert!(calls.borrow().is_empty());
}

#[test]
fn handler_may_reregister_during_dispatch() {
    let document = FakeDocument::with_container(CONTAINER);
    let session = Rc::new(open(&document));
    let replaced = Rc::new(Cell::new(0));

    let inner_session = Rc::downgrade(&session);
    let inner_replaced = replaced.clone();
    session
        .register(
            EventKind::Ping,
            Candidate::Function(Rc::new(move |_: &Value| {
                let replaced = inner_replaced.clone();
                if let Some(session) = inner_session.upgrade() {
                    session
                        .register(
                            EventKind::Ping,
                            Candidate::Function(Rc::new(move |_: &Value| {
                                replaced.set(replaced.get() + 1);
                            })),
                        )
                        .unwrap();
                }
            })),
        )
        .unwrap();

    deliver(&session, TRUSTED_ORIGIN, &signing_event(EventKind::Ping));
    assert_eq!(replaced.get(), 0);

    deliver(&session, TRUSTED_ORIGIN, &signing_event(EventKind::Ping));
    deliver(&session, TRUSTED_ORIGIN, &signing_event(EventKind::Ping));
    assert_eq!(replaced.get(), 2);
}

// =============================================================================
// Teardown
// =============================================================================

#[test]
fn no_dispatch_after_detach() {
    let document = FakeDocument::with_container(CONTAINER);
    let session = open(&document);
    let (calls, candidate) = recorder();
    session.register(EventKind::Started, candidate).unwrap();

    deliver(&session, TRUSTED_ORIGIN, &signing_event(EventKind::Started));
    assert!(session.detach());

    deliver(&session, TRUSTED_ORIGIN, &signing_event(EventKind::Started));
    deliver(&session, TRUSTED_ORIGIN, &redirect("https://x.test/v"));

    assert_eq!(calls.borrow().len(), 1);
    assert_eq!(session.frame().navigations(), 1);
    assert!(!session.is_attached());
}

#[test]
fn detach_is_idempotent() {
    let document = FakeDocument::with_container(CONTAINER);
    let session = open(&document);
    assert!(session.detach());
    assert!(!session.detach());
    assert!(!session.detach());
}
