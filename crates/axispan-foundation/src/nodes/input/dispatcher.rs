//! Pointer event queue.
//!
//! Platform integrations enqueue events as they arrive; the controller drains
//! them in arrival order on its own turn of the event loop.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::nodes::input::types::PointerEvent;

/// FIFO of pointer events waiting to be processed.
#[derive(Debug, Default)]
pub struct PointerDispatcher {
    queue: RefCell<VecDeque<PointerEvent>>,
}

impl PointerDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_event(&self, event: PointerEvent) {
        self.queue.borrow_mut().push_back(event);
    }

    fn pop(&self) -> Option<PointerEvent> {
        self.queue.borrow_mut().pop_front()
    }

    /// Hand every queued event to `handler` in arrival order. Events pushed
    /// by the handler are delivered in the same drain.
    pub fn drain<F>(&self, mut handler: F)
    where
        F: FnMut(PointerEvent),
    {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn clear(&self) {
        self.queue.borrow_mut().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }
}
