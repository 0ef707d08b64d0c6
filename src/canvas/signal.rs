use std::cell::{Cell, RefCell};

use crate::layer::LayerId;

/// Something a canvas draws changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChangeEvent {
    LayerAdded(LayerId),
    LayerRemoved(LayerId),
    LayerChanged { layer: LayerId, param: String },
    /// The render description or a pasted canvas changed.
    ContentChanged,
}

/// Handle returned by [`ChangeSignal::subscribe`]; pass it back to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Slot = (SubscriptionId, Box<dyn FnMut(&ChangeEvent)>);

/// Explicit subscribe/unsubscribe notification list.
///
/// Handlers may subscribe or unsubscribe while an event is being delivered;
/// the change applies from the next event on.
#[derive(Default)]
pub struct ChangeSignal {
    next_id: Cell<u64>,
    emitting: Cell<bool>,
    slots: RefCell<Vec<Slot>>,
    dropped: RefCell<Vec<SubscriptionId>>,
}

impl std::fmt::Debug for ChangeSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeSignal")
            .field("subscribers", &self.len())
            .finish()
    }
}

impl ChangeSignal {
    pub fn subscribe(&self, handler: impl FnMut(&ChangeEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.slots.borrow_mut().push((id, Box::new(handler)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut slots = self.slots.borrow_mut();
        if let Some(pos) = slots.iter().position(|(s, _)| *s == id) {
            slots.remove(pos);
            return true;
        }
        // Mid-delivery the slots are checked out of the list.
        if self.emitting.get() && id.0 < self.next_id.get() {
            let mut dropped = self.dropped.borrow_mut();
            if !dropped.contains(&id) {
                dropped.push(id);
                return true;
            }
        }
        false
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn emit(&self, event: &ChangeEvent) {
        let mut delivering = self.slots.take();
        let outer = self.emitting.replace(true);
        for (_, handler) in delivering.iter_mut() {
            handler(event);
        }
        self.emitting.set(outer);
        let mut slots = self.slots.borrow_mut();
        delivering.append(&mut slots);
        let dropped = self.dropped.take();
        delivering.retain(|(id, _)| !dropped.contains(id));
        *slots = delivering;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/signal.rs"]
mod tests;
