//! Typed feedback events from the core to the UI shell
//!
//! The configurator never touches UI state directly; it emits these events
//! and the control panel reacts (hide a loading overlay, re-enable an
//! apply button). Payloads are plain data so no UI framework leaks in.

use glam::Vec3;

use crate::config::TransitionRejection;

/// Events emitted by the configurator core
#[derive(Debug, Clone, PartialEq)]
pub enum ConfiguratorEvent {
    /// A model finished loading and its configuration is fully applied;
    /// carries the bounding sphere for camera framing
    ModelReady { center: Vec3, radius: f32 },
    /// The selected color was applied to at least one paintable surface
    ColorApplied,
    /// A state transition was rejected; the configuration is unchanged
    TransitionRejected { reason: TransitionRejection },
    /// A model load failed; the previous model stays interactive
    LoadFailed { message: String },
}

/// Subscriber callback type
pub type EventHandler = Box<dyn FnMut(&ConfiguratorEvent)>;

/// Minimal observer registry for configurator events.
///
/// Subscribers are called synchronously, in subscription order, on the
/// thread that emitted the event.
#[derive(Default)]
pub struct EventBus {
    handlers: Vec<EventHandler>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for all events
    pub fn subscribe(&mut self, handler: impl FnMut(&ConfiguratorEvent) + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Deliver an event to every subscriber
    pub fn emit(&mut self, event: ConfiguratorEvent) {
        for handler in &mut self.handlers {
            handler(&event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_events_reach_all_subscribers_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        for tag in ["a", "b"] {
            let seen = Rc::clone(&seen);
            bus.subscribe(move |event| {
                seen.borrow_mut().push((tag, event.clone()));
            });
        }

        bus.emit(ConfiguratorEvent::ColorApplied);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "a");
        assert_eq!(seen[1].0, "b");
        assert_eq!(seen[0].1, ConfiguratorEvent::ColorApplied);
    }

    #[test]
    fn test_model_ready_payload() {
        let got = Rc::new(RefCell::new(None));
        let mut bus = EventBus::new();
        {
            let got = Rc::clone(&got);
            bus.subscribe(move |event| {
                *got.borrow_mut() = Some(event.clone());
            });
        }

        bus.emit(ConfiguratorEvent::ModelReady {
            center: Vec3::new(0.0, 1.0, 0.0),
            radius: 4.5,
        });

        match got.borrow().as_ref() {
            Some(ConfiguratorEvent::ModelReady { center, radius }) => {
                assert_eq!(*center, Vec3::new(0.0, 1.0, 0.0));
                assert_eq!(*radius, 4.5);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
