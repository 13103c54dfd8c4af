// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input queue between browser callbacks and the page.
//!
//! Browser callbacks never call into the page directly. They push an input
//! through an [`Emitter`], and the [`Dispatcher`] drains the queue from a
//! microtask, one input at a time. This keeps handlers from re-entering the
//! page and guarantees that no closure is dropped while it is executing: by
//! the time the page disposes a player or cancels a timer, the callback that
//! reported it has already returned.

use alloc::collections::VecDeque;
use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};

use wasm_bindgen_futures::spawn_local;

/// Consumes queued inputs.
pub trait Handler {
    /// Input type.
    type Input: 'static;

    /// Handles one input.
    fn handle(&mut self, input: Self::Input);
}

struct Inner<H: Handler> {
    queue: RefCell<VecDeque<H::Input>>,
    handler: RefCell<Option<H>>,
    scheduled: Cell<bool>,
}

impl<H: Handler + 'static> Inner<H> {
    fn push(self: &Rc<Self>, input: H::Input) {
        self.queue.borrow_mut().push_back(input);
        if self.scheduled.replace(true) {
            return;
        }
        let inner = Rc::clone(self);
        spawn_local(async move { inner.drain() });
    }

    fn drain(&self) {
        loop {
            // The queue borrow ends before the handler runs, so the handler
            // may enqueue more input.
            let next = self.queue.borrow_mut().pop_front();
            let Some(input) = next else { break };
            if let Some(handler) = self.handler.borrow_mut().as_mut() {
                handler.handle(input);
            }
        }
        self.scheduled.set(false);
    }
}

/// Owns a [`Handler`] and the queue feeding it.
///
/// Must outlive every [`Emitter`] that should still deliver input; emitters
/// hold only a weak reference.
pub struct Dispatcher<H: Handler> {
    inner: Rc<Inner<H>>,
}

impl<H: Handler + 'static> Dispatcher<H> {
    /// Creates a dispatcher with no handler installed.
    ///
    /// Inputs sent before [`install`](Self::install) stay queued.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                queue: RefCell::new(VecDeque::new()),
                handler: RefCell::new(None),
                scheduled: Cell::new(false),
            }),
        }
    }

    /// Installs the handler.
    pub fn install(&self, handler: H) {
        *self.inner.handler.borrow_mut() = Some(handler);
    }

    /// Queues an input.
    pub fn send(&self, input: H::Input) {
        self.inner.push(input);
    }

    /// Returns a cloneable sender for browser callbacks.
    #[must_use]
    pub fn emitter(&self) -> Emitter<H::Input> {
        let weak: Weak<Inner<H>> = Rc::downgrade(&self.inner);
        Emitter {
            send: Rc::new(move |input| {
                if let Some(inner) = weak.upgrade() {
                    inner.push(input);
                }
            }),
        }
    }
}

impl<H: Handler + 'static> Default for Dispatcher<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Handler> core::fmt::Debug for Dispatcher<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("queued", &self.inner.queue.borrow().len())
            .field("scheduled", &self.inner.scheduled.get())
            .finish_non_exhaustive()
    }
}

/// Sends inputs to a [`Dispatcher`]. Inputs sent after the dispatcher is
/// dropped are discarded.
pub struct Emitter<I> {
    send: Rc<dyn Fn(I)>,
}

impl<I> Emitter<I> {
    /// Queues `input`.
    pub fn emit(&self, input: I) {
        (self.send)(input);
    }
}

impl<I> Clone for Emitter<I> {
    fn clone(&self) -> Self {
        Self {
            send: Rc::clone(&self.send),
        }
    }
}

impl<I> core::fmt::Debug for Emitter<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Emitter").finish_non_exhaustive()
    }
}
