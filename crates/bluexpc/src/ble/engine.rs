//! The BLE engine facade
//!
//! `Ble` ties the pieces together: it sends commands through a `Transport`,
//! receives daemon messages as an `EventHandler`, keeps the registry of
//! discovered peripherals, and publishes events on its bus.

use super::command;
use super::dispatch::{self, EngineState};
use super::event::{Event, EventBus, EventKind, SubscriptionId};
use crate::error::{BleError, ChannelError, Result};
use crate::gatt::registry::read;
use crate::gatt::{Attribute, AttributeTable, Peripheral, Service};
use crate::host;
use crate::uuid::Uuid;
use crate::xpc::{Dict, EventHandler, Message, Transport};
use log::{error, trace, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Client-side engine for the Bluetooth daemon.
///
/// Inbound messages are applied one at a time. Listeners run after the
/// registry lock is released and may call any outbound operation, but must
/// not feed messages back into `handle_event` synchronously.
pub struct Ble {
    transport: Arc<dyn Transport>,
    events: EventBus,
    state: Mutex<EngineState>,
    dispatching: Mutex<()>,
    verbose: AtomicBool,
}

impl Ble {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            events: EventBus::new(),
            state: Mutex::new(EngineState::default()),
            dispatching: Mutex::new(()),
            verbose: AtomicBool::new(false),
        }
    }

    /// Traces every inbound and outbound message and logs unhandled events.
    pub fn set_verbose(&self, verbose: bool) {
        self.verbose.store(verbose, Ordering::Relaxed);
        self.events.set_verbose(verbose);
    }

    fn is_verbose(&self) -> bool {
        self.verbose.load(Ordering::Relaxed)
    }

    fn state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The event bus
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.events.subscribe(listener)
    }

    pub fn on<F>(&self, kind: EventKind, listener: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.events.on(kind, listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    fn send(&self, message: Message) -> Result<()> {
        if self.is_verbose() {
            trace!("send {}", message.to_value());
        }
        self.transport.send(&message)?;
        Ok(())
    }

    /// Registers this client with the daemon.
    pub fn init(&self) -> Result<()> {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        self.send(command::init(&format!("bluexpc-{}", secs)))
    }

    pub fn start_advertising(&self, name: &str, service_uuids: &[Uuid]) -> Result<()> {
        self.send(command::start_advertising(name, service_uuids))
    }

    /// Advertises raw identifier beacon data, in the form the host expects.
    pub fn start_advertising_ibeacon_data(&self, data: &[u8]) -> Result<()> {
        let release = host::release()
            .map_err(|e| warn!("Failed to read host release: {}", e))
            .ok();
        self.send(command::start_advertising_beacon(release.as_deref(), data))
    }

    pub fn start_advertising_ibeacon(
        &self,
        uuid: Uuid,
        major: u16,
        minor: u16,
        measured_power: i8,
    ) -> Result<()> {
        let data = command::ibeacon_data(uuid, major, minor, measured_power);
        self.start_advertising_ibeacon_data(&data)
    }

    pub fn stop_advertising(&self) -> Result<()> {
        self.send(command::stop_advertising())
    }

    /// Starts scanning. With `allow_duplicates` off, only the first sighting
    /// of each peripheral produces a discover event.
    pub fn start_scanning(&self, service_uuids: &[Uuid], allow_duplicates: bool) -> Result<()> {
        self.state().allow_duplicates = allow_duplicates;
        self.send(command::start_scanning(service_uuids, allow_duplicates))
    }

    pub fn stop_scanning(&self) -> Result<()> {
        self.send(command::stop_scanning())
    }

    fn resolve_peripheral(&self, device_uuid: Uuid) -> Result<()> {
        if self.state().registry.find(&device_uuid).is_none() {
            warn!("No peripheral {}", device_uuid);
            return Err(BleError::UnknownPeripheral(device_uuid));
        }
        Ok(())
    }

    /// Start and end handle of a discovered service
    fn resolve_service(&self, device_uuid: Uuid, service_uuid: &str) -> Result<(u16, u16)> {
        let state = self.state();
        let resolved = state
            .registry
            .find(&device_uuid)
            .ok_or(BleError::UnknownPeripheral(device_uuid))
            .and_then(|p| {
                p.services
                    .by_uuid(service_uuid)
                    .ok_or_else(|| BleError::UnknownService(service_uuid.to_string()))
            })
            .map(|s| {
                let s = read(&s);
                (s.start_handle, s.end_handle)
            });
        resolved.map_err(|e| {
            warn!("{}", e);
            e
        })
    }

    /// Declaration and value handle of a discovered characteristic
    fn resolve_characteristic(
        &self,
        device_uuid: Uuid,
        service_uuid: &str,
        characteristic_uuid: &str,
    ) -> Result<(u16, u16)> {
        let state = self.state();
        let resolved = state
            .registry
            .find(&device_uuid)
            .ok_or(BleError::UnknownPeripheral(device_uuid))
            .and_then(|p| {
                p.services
                    .by_uuid(service_uuid)
                    .ok_or_else(|| BleError::UnknownService(service_uuid.to_string()))
            })
            .and_then(|s| {
                let found = read(&s).characteristics.by_uuid(characteristic_uuid);
                found.ok_or_else(|| {
                    BleError::UnknownCharacteristic(characteristic_uuid.to_string())
                })
            })
            .map(|c| {
                let c = read(&c);
                (c.handle, c.value_handle)
            });
        resolved.map_err(|e| {
            warn!("{}", e);
            e
        })
    }

    pub fn connect(&self, device_uuid: Uuid) -> Result<()> {
        self.resolve_peripheral(device_uuid)?;
        self.send(command::connect(device_uuid))
    }

    pub fn disconnect(&self, device_uuid: Uuid) -> Result<()> {
        self.resolve_peripheral(device_uuid)?;
        self.send(command::disconnect(device_uuid))
    }

    pub fn update_rssi(&self, device_uuid: Uuid) -> Result<()> {
        self.resolve_peripheral(device_uuid)?;
        self.send(command::update_rssi(device_uuid))
    }

    pub fn discover_services(&self, device_uuid: Uuid, service_uuids: &[Uuid]) -> Result<()> {
        self.resolve_peripheral(device_uuid)?;
        self.send(command::discover_services(device_uuid, service_uuids))
    }

    pub fn discover_characteristics(
        &self,
        device_uuid: Uuid,
        service_uuid: &str,
        characteristic_uuids: &[String],
    ) -> Result<()> {
        let (start, end) = self.resolve_service(device_uuid, service_uuid)?;
        self.send(command::discover_characteristics(
            device_uuid,
            start,
            end,
            characteristic_uuids,
        ))
    }

    pub fn discover_descriptors(
        &self,
        device_uuid: Uuid,
        service_uuid: &str,
        characteristic_uuid: &str,
    ) -> Result<()> {
        let (handle, value_handle) =
            self.resolve_characteristic(device_uuid, service_uuid, characteristic_uuid)?;
        self.send(command::discover_descriptors(device_uuid, handle, value_handle))
    }

    pub fn read(
        &self,
        device_uuid: Uuid,
        service_uuid: &str,
        characteristic_uuid: &str,
    ) -> Result<()> {
        let (handle, value_handle) =
            self.resolve_characteristic(device_uuid, service_uuid, characteristic_uuid)?;
        self.send(command::read(device_uuid, handle, value_handle))
    }

    pub fn remove_services(&self) -> Result<()> {
        self.send(command::remove_services())
    }

    /// Replaces the local GATT server with `services`.
    ///
    /// Sends a remove-all command followed by one set-services command per
    /// service, stopping at the first send failure.
    pub fn set_services(&self, services: &[Service]) -> Result<()> {
        let (table, messages) = AttributeTable::build(services);
        self.state().attributes = table;
        for message in messages {
            self.send(message)?;
        }
        Ok(())
    }

    /// The local attribute pushed under `attribute_id`
    pub fn attribute(&self, attribute_id: u32) -> Option<Attribute> {
        self.state().attributes.get(attribute_id).cloned()
    }

    /// Detached snapshot of a known peripheral
    pub fn peripheral(&self, device_uuid: &Uuid) -> Option<Peripheral> {
        self.state().registry.find(device_uuid).cloned()
    }

    /// Snapshots of every known peripheral, in no particular order
    pub fn peripherals(&self) -> Vec<Peripheral> {
        self.state().registry.iter().cloned().collect()
    }

    fn dispatch(&self, envelope: &Dict) {
        let message = match Message::from_dict(envelope) {
            Ok(message) => message,
            Err(e) => {
                warn!("Dropping malformed message: {}", e);
                return;
            }
        };
        let args = message.args();

        if self.is_verbose() {
            trace!("event {} {}", message.id, args);
        }

        let outcome = dispatch::dispatch(&mut self.state(), message.id, &args);
        match outcome {
            Ok(Some(event)) => self.events.emit(&event),
            Ok(None) => {}
            Err(e) => warn!("Dropping event {}: {}", message.id, e),
        }
    }
}

impl EventHandler for Ble {
    fn handle_event(&self, event: std::result::Result<Dict, ChannelError>) {
        let _dispatching = self
            .dispatching
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match event {
            Ok(envelope) => self.dispatch(&envelope),
            Err(e) => {
                error!("Channel error: {}", e);
                self.events.emit(&Event::ChannelError(e));
            }
        }
    }
}

impl std::fmt::Debug for Ble {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ble")
            .field("peripherals", &self.state().registry.len())
            .field("events", &self.events)
            .field("verbose", &self.is_verbose())
            .finish()
    }
}
