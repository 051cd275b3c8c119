//! Outward notifications and the bus that delivers them
//!
//! Listeners run synchronously on the thread that emits, in the order they
//! subscribed. A listener may call back into the engine: the bus never holds
//! its own lock while a listener runs.

use crate::error::ChannelError;
use crate::gatt::{Peripheral, State};
use crate::uuid::Uuid;
use log::debug;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// A semantic event decoded from the daemon
///
/// Events that concern a known peripheral carry a detached snapshot of it.
#[derive(Debug, Clone)]
pub enum Event {
    StateChange {
        state: State,
    },
    AdvertisingStart,
    AdvertisingStop,
    Discover {
        device_uuid: Uuid,
        peripheral: Peripheral,
    },
    Connect {
        device_uuid: Uuid,
    },
    Disconnect {
        device_uuid: Uuid,
    },
    MtuChange {
        device_uuid: Uuid,
        peripheral: Peripheral,
        mtu: i64,
    },
    RssiUpdate {
        device_uuid: Uuid,
        peripheral: Peripheral,
    },
    ServicesDiscover {
        device_uuid: Uuid,
        peripheral: Peripheral,
    },
    CharacteristicsDiscover {
        device_uuid: Uuid,
        service_uuid: String,
        peripheral: Peripheral,
    },
    DescriptorsDiscover {
        device_uuid: Uuid,
        service_uuid: String,
        characteristic_uuid: String,
        peripheral: Peripheral,
    },
    /// A read response or a notification
    Read {
        device_uuid: Uuid,
        service_uuid: String,
        characteristic_uuid: String,
        peripheral: Peripheral,
        data: Vec<u8>,
        is_notification: bool,
    },
    /// The daemon channel reported a lifecycle error instead of a message
    ChannelError(ChannelError),
}

/// Discriminant of an `Event`, used to subscribe to one kind only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    StateChange,
    AdvertisingStart,
    AdvertisingStop,
    Discover,
    Connect,
    Disconnect,
    MtuChange,
    RssiUpdate,
    ServicesDiscover,
    CharacteristicsDiscover,
    DescriptorsDiscover,
    Read,
    ChannelError,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::StateChange => "stateChange",
            EventKind::AdvertisingStart => "advertisingStart",
            EventKind::AdvertisingStop => "advertisingStop",
            EventKind::Discover => "discover",
            EventKind::Connect => "connect",
            EventKind::Disconnect => "disconnect",
            EventKind::MtuChange => "mtuChange",
            EventKind::RssiUpdate => "rssiUpdate",
            EventKind::ServicesDiscover => "servicesDiscover",
            EventKind::CharacteristicsDiscover => "characteristicsDiscover",
            EventKind::DescriptorsDiscover => "descriptorsDiscover",
            EventKind::Read => "read",
            EventKind::ChannelError => "error",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::StateChange { .. } => EventKind::StateChange,
            Event::AdvertisingStart => EventKind::AdvertisingStart,
            Event::AdvertisingStop => EventKind::AdvertisingStop,
            Event::Discover { .. } => EventKind::Discover,
            Event::Connect { .. } => EventKind::Connect,
            Event::Disconnect { .. } => EventKind::Disconnect,
            Event::MtuChange { .. } => EventKind::MtuChange,
            Event::RssiUpdate { .. } => EventKind::RssiUpdate,
            Event::ServicesDiscover { .. } => EventKind::ServicesDiscover,
            Event::CharacteristicsDiscover { .. } => EventKind::CharacteristicsDiscover,
            Event::DescriptorsDiscover { .. } => EventKind::DescriptorsDiscover,
            Event::Read { .. } => EventKind::Read,
            Event::ChannelError(_) => EventKind::ChannelError,
        }
    }

    /// Wire-style name of the event, e.g. `"stateChange"`
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// The peripheral the event concerns, if any
    pub fn device_uuid(&self) -> Option<Uuid> {
        match self {
            Event::Discover { device_uuid, .. }
            | Event::Connect { device_uuid }
            | Event::Disconnect { device_uuid }
            | Event::MtuChange { device_uuid, .. }
            | Event::RssiUpdate { device_uuid, .. }
            | Event::ServicesDiscover { device_uuid, .. }
            | Event::CharacteristicsDiscover { device_uuid, .. }
            | Event::DescriptorsDiscover { device_uuid, .. }
            | Event::Read { device_uuid, .. } => Some(*device_uuid),
            _ => None,
        }
    }
}

/// A listener callback
pub type Listener = Arc<dyn Fn(&Event) + Send + Sync + 'static>;

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    kind: Option<EventKind>,
    listener: Listener,
}

/// Synchronous publish/subscribe fan-out
#[derive(Default)]
pub struct EventBus {
    subscriptions: Mutex<Vec<Subscription>>,
    next_id: AtomicU64,
    verbose: AtomicBool,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs events nobody listens to when enabled.
    pub fn set_verbose(&self, verbose: bool) {
        self.verbose.store(verbose, Ordering::Relaxed);
    }

    fn add(&self, kind: Option<EventKind>, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Subscription { id, kind, listener });
        id
    }

    /// Subscribes to every event.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.add(None, Arc::new(listener))
    }

    /// Subscribes to events of one kind.
    pub fn on<F>(&self, kind: EventKind, listener: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.add(Some(kind), Arc::new(listener))
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self
            .subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        subscriptions.len() != before
    }

    /// Calls every matching listener, in subscription order.
    pub fn emit(&self, event: &Event) {
        let kind = event.kind();
        let listeners: Vec<Listener> = self
            .subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|s| s.kind.map_or(true, |k| k == kind))
            .map(|s| s.listener.clone())
            .collect();

        if listeners.is_empty() {
            if self.verbose.load(Ordering::Relaxed) {
                debug!("unhandled event {}: {:?}", kind, event);
            }
            return;
        }

        for listener in listeners {
            listener(event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self
            .subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("EventBus")
            .field("subscriptions", &count)
            .field("verbose", &self.verbose.load(Ordering::Relaxed))
            .finish()
    }
}
