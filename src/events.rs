//! Host events and the listener registry.
//!
//! A running tour subscribes to keyboard, layout, and pointer input by
//! holding [`Subscription`] guards. The host checks [`Listeners::wants`]
//! before forwarding an event, so once a run's guards drop nothing reaches
//! the controller, however the run ended.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Keys the tour responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourKey {
    Escape,
    ArrowLeft,
    ArrowRight,
}

/// Input from the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Key(TourKey),

    /// Any scroll anywhere in the host, not only the tour's container.
    Scroll,

    /// The viewport changed size. The page already reports the new size.
    Resize,

    /// Click on the dimmed backdrop outside the cutout and tooltip.
    BackdropClick,
}

impl HostEvent {
    pub fn channel(self) -> Channel {
        match self {
            Self::Key(_) => Channel::Keyboard,
            Self::Scroll | Self::Resize => Channel::Layout,
            Self::BackdropClick => Channel::Pointer,
        }
    }
}

/// Groups of events a run can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Keyboard,
    Layout,
    Pointer,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    active: BTreeMap<u64, Channel>,
}

/// Registry of live subscriptions, shared between controller and host.
#[derive(Debug, Clone, Default)]
pub struct Listeners {
    registry: Rc<RefCell<Registry>>,
}

impl Listeners {
    pub fn subscribe(&self, channel: Channel) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.active.insert(id, channel);
        Subscription {
            id,
            registry: Rc::clone(&self.registry),
        }
    }

    /// Whether anything is listening on the event's channel.
    pub fn wants(&self, event: HostEvent) -> bool {
        let channel = event.channel();
        self.registry
            .borrow()
            .active
            .values()
            .any(|c| *c == channel)
    }

    /// Number of live subscriptions across all channels.
    pub fn count(&self) -> usize {
        self.registry.borrow().active.len()
    }
}

/// A live subscription. Unregisters itself when dropped.
#[derive(Debug)]
#[must_use = "the subscription is removed as soon as the guard is dropped"]
pub struct Subscription {
    id: u64,
    registry: Rc<RefCell<Registry>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.borrow_mut().active.remove(&self.id);
    }
}
