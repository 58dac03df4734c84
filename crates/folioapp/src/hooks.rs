//! Post-commit notifications.
//!
//! Commands notify [`Hooks`] only after the backend write succeeded. Observers
//! cannot fail the mutation and cannot change the resource.

use crate::model::Resource;

#[derive(Debug, Clone, PartialEq)]
pub enum MutationEvent {
    Created(Resource),
    Updated(Resource),
    Removed(Resource),
    Duplicated { source_id: String, copy: Resource },
}

impl MutationEvent {
    pub fn resource(&self) -> &Resource {
        match self {
            MutationEvent::Created(r) | MutationEvent::Updated(r) | MutationEvent::Removed(r) => r,
            MutationEvent::Duplicated { copy, .. } => copy,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            MutationEvent::Created(_) => "created",
            MutationEvent::Updated(_) => "updated",
            MutationEvent::Removed(_) => "removed",
            MutationEvent::Duplicated { .. } => "duplicated",
        }
    }
}

pub trait MutationObserver {
    fn notify(&self, event: &MutationEvent);
}

/// Ordered list of observers.
#[derive(Default)]
pub struct Hooks {
    observers: Vec<Box<dyn MutationObserver>>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: Box<dyn MutationObserver>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn emit(&self, event: MutationEvent) {
        let resource = event.resource();
        tracing::info!(
            action = event.action(),
            kind = %resource.kind(),
            id = %resource.id,
            "mutation committed"
        );
        for observer in &self.observers {
            observer.notify(&event);
        }
    }
}

/// Observer that records every event, for tests and diagnostics.
#[derive(Default, Clone)]
pub struct EventLog {
    events: std::rc::Rc<std::cell::RefCell<Vec<MutationEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<MutationEvent> {
        self.events.borrow().clone()
    }
}

impl MutationObserver for EventLog {
    fn notify(&self, event: &MutationEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
