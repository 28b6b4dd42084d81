//! Host callback registry.
//!
//! One slot per [`EventKind`], so "at most one handler per event" holds by
//! construction. Registering again replaces the previous handler.

use core::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::error::{Error, Result};
use crate::event::EventKind;

/// Something that can be invoked with an event payload of type `P`.
pub trait Handler<P: ?Sized> {
    /// Invokes the handler.
    ///
    /// Failures inside the handler are the host's business. Implementations
    /// let them propagate to the platform rather than report them here.
    fn handle(&self, payload: &P);
}

impl<P, F> Handler<P> for Rc<F>
where
    P: ?Sized,
    F: Fn(&P) + ?Sized,
{
    fn handle(&self, payload: &P) {
        (**self)(payload);
    }
}

/// Fixed-size mapping from [`EventKind`] to a single handler.
pub struct CallbackRegistry<H> {
    slots: [Option<H>; EventKind::COUNT],
}

impl<H> CallbackRegistry<H> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
        }
    }

    /// Registers the handler for `kind`, replacing any previous one.
    ///
    /// `candidate` is whatever the host offered. It is accepted if it
    /// converts into a handler, which is how callability is checked.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCallbackFunction`] if `candidate` does not
    /// convert. The registry is left unchanged.
    pub fn register<C>(&mut self, kind: EventKind, candidate: C) -> Result<()>
    where
        C: TryInto<H>,
    {
        let handler = candidate
            .try_into()
            .map_err(|_| Error::InvalidCallbackFunction(kind))?;
        trace!(event = %kind, "callback registered");
        self.slots[kind.index()] = Some(handler);
        Ok(())
    }

    /// Returns the handler registered for `kind`.
    #[must_use]
    pub fn get(&self, kind: EventKind) -> Option<&H> {
        self.slots[kind.index()].as_ref()
    }

    /// Returns `true` if a handler is registered for `kind`.
    #[must_use]
    pub fn is_registered(&self, kind: EventKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    /// Iterates over the kinds that currently have a handler.
    pub fn registered(&self) -> impl Iterator<Item = EventKind> + '_ {
        EventKind::ALL
            .into_iter()
            .filter(|kind| self.is_registered(*kind))
    }
}

impl<H> Default for CallbackRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> fmt::Debug for CallbackRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.registered()).finish()
    }
}
