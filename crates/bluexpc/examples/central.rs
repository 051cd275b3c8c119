//! Example demonstrating the central role
//!
//! Listeners drive discovery: scan once the radio is on, connect to the first
//! peripheral seen, then walk its services and characteristics. A canned
//! daemon conversation is replayed into the engine, so it runs without a
//! daemon.

use bluexpc::gatt::registry::read;
use bluexpc::xpc::*;
use bluexpc::{Ble, Event, EventKind, State, Uuid};
use std::sync::{Arc, Weak};

fn deliver(ble: &Ble, id: i64, args: Dict) {
    if let Value::Dict(envelope) = Message::new(id, args).to_value() {
        ble.handle_event(Ok(envelope));
    }
}

fn on_event(ble: &Weak<Ble>, event: &Event) {
    let Some(ble) = ble.upgrade() else {
        return;
    };

    let result = match event {
        Event::StateChange {
            state: State::PoweredOn,
        } => ble.start_scanning(&[], false),
        Event::Discover {
            device_uuid,
            peripheral,
        } => {
            println!(
                "Discovered {} {:?} rssi {}",
                device_uuid.hyphenated(),
                peripheral.advertisement.local_name,
                peripheral.rssi
            );
            ble.connect(*device_uuid)
        }
        Event::Connect { device_uuid } => ble.discover_services(*device_uuid, &[]),
        Event::ServicesDiscover {
            device_uuid,
            peripheral,
        } => peripheral
            .services
            .values()
            .map(|s| read(s).uuid.clone())
            .collect::<Vec<_>>()
            .iter()
            .try_for_each(|uuid| ble.discover_characteristics(*device_uuid, uuid, &[])),
        Event::CharacteristicsDiscover {
            device_uuid,
            service_uuid,
            ..
        } => {
            println!("Characteristics of {} discovered", service_uuid);
            ble.read(*device_uuid, service_uuid, "2a19")
        }
        Event::Read {
            characteristic_uuid,
            data,
            ..
        } => {
            println!("Read {}: {:02x?}", characteristic_uuid, data);
            Ok(())
        }
        _ => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", event.name(), e);
    }
}

fn main() {
    env_logger::init();

    let ble = Arc::new(Ble::new(Arc::new(LogTransport)));
    let weak = Arc::downgrade(&ble);
    ble.subscribe(move |event| on_event(&weak, event));
    ble.on(EventKind::ChannelError, |event| eprintln!("{:?}", event));

    let device = Uuid::from_bytes([0x5A; 16]);

    deliver(&ble, EVT_STATE_CHANGE, Dict::new().with(KEY_ARG_STATE, 5i64));
    deliver(
        &ble,
        EVT_DISCOVER,
        Dict::new()
            .with(KEY_ARG_DEVICE_UUID, device)
            .with(KEY_ARG_RSSI, -58i64)
            .with(
                KEY_ARG_ADVERTISEMENT_DATA,
                Dict::new()
                    .with(KEY_ADV_LOCAL_NAME, "Thermometer")
                    .with(KEY_ADV_IS_CONNECTABLE, 1i64),
            ),
    );
    deliver(&ble, EVT_CONNECT, Dict::new().with(KEY_ARG_DEVICE_UUID, device));
    deliver(
        &ble,
        EVT_SERVICES_DISCOVER,
        Dict::new().with(KEY_ARG_DEVICE_UUID, device).with(
            KEY_ARG_SERVICES,
            vec![Value::Dict(
                Dict::new()
                    .with(KEY_ARG_UUID, vec![0x18u8, 0x0F])
                    .with(KEY_ARG_SERVICE_START_HANDLE, 1u16)
                    .with(KEY_ARG_SERVICE_END_HANDLE, 4u16),
            )],
        ),
    );
    deliver(
        &ble,
        EVT_CHARACTERISTICS_DISCOVER,
        Dict::new()
            .with(KEY_ARG_DEVICE_UUID, device)
            .with(KEY_ARG_SERVICE_START_HANDLE, 1u16)
            .with(
                KEY_ARG_CHARACTERISTICS,
                vec![Value::Dict(
                    Dict::new()
                        .with(KEY_ARG_UUID, vec![0x2Au8, 0x19])
                        .with(KEY_ARG_CHARACTERISTIC_HANDLE, 2u16)
                        .with(KEY_ARG_CHARACTERISTIC_VALUE_HANDLE, 3u16)
                        .with(KEY_ARG_CHARACTERISTIC_PROPERTIES, 0x12i64),
                )],
            ),
    );
    deliver(
        &ble,
        EVT_READ,
        Dict::new()
            .with(KEY_ARG_DEVICE_UUID, device)
            .with(KEY_ARG_CHARACTERISTIC_HANDLE, 3u16)
            .with(KEY_ARG_DATA, vec![87u8]),
    );
    ble.handle_event(Err(bluexpc::ChannelError::Terminated));

    for peripheral in ble.peripherals() {
        println!(
            "{} has {} service(s)",
            peripheral.uuid.hyphenated(),
            peripheral.services.len()
        );
    }
}
