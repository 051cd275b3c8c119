//! Unit tests for the BLE engine

use super::command;
use super::*;
use crate::error::{BleError, ChannelError};
use crate::gatt::registry::read;
use crate::gatt::{Characteristic, Property, Service, State};
use crate::uuid::Uuid;
use crate::xpc::*;
use std::sync::{Arc, Mutex};

/// Transport double that records every outbound message
#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<Message>>,
    fail_with: Mutex<Option<ChannelError>>,
}

impl RecordingTransport {
    fn take(&self) -> Vec<Message> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }
}

impl Transport for RecordingTransport {
    fn send(&self, message: &Message) -> Result<(), ChannelError> {
        if let Some(e) = self.fail_with.lock().unwrap().clone() {
            return Err(e);
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

struct Fixture {
    ble: Arc<Ble>,
    transport: Arc<RecordingTransport>,
    events: Arc<Mutex<Vec<Event>>>,
}

impl Fixture {
    fn new() -> Self {
        let transport = Arc::new(RecordingTransport::default());
        let ble = Arc::new(Ble::new(transport.clone()));
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        ble.subscribe(move |e| sink.lock().unwrap().push(e.clone()));
        Self {
            ble,
            transport,
            events,
        }
    }

    fn deliver(&self, id: i64, args: Dict) {
        let envelope = Message::new(id, args).to_value();
        self.ble
            .handle_event(Ok(envelope.as_dict().unwrap().clone()));
    }

    fn take_events(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    fn sight(&self, device: Uuid, name: &str, rssi: i64) {
        self.deliver(
            EVT_DISCOVER,
            Dict::new()
                .with(KEY_ARG_DEVICE_UUID, device)
                .with(
                    KEY_ARG_ADVERTISEMENT_DATA,
                    Dict::new()
                        .with(KEY_ADV_LOCAL_NAME, name)
                        .with(KEY_ADV_IS_CONNECTABLE, 1i64),
                )
                .with(KEY_ARG_RSSI, rssi),
        );
    }

    fn discover_services(&self, device: Uuid, services: &[(u16, u16, u16)]) {
        let list: Vec<Value> = services
            .iter()
            .map(|&(uuid, start, end)| {
                Value::Dict(
                    Dict::new()
                        .with(KEY_ARG_UUID, uuid.to_be_bytes().to_vec())
                        .with(KEY_ARG_SERVICE_START_HANDLE, start)
                        .with(KEY_ARG_SERVICE_END_HANDLE, end),
                )
            })
            .collect();
        self.deliver(
            EVT_SERVICES_DISCOVER,
            Dict::new()
                .with(KEY_ARG_DEVICE_UUID, device)
                .with(KEY_ARG_SERVICES, list),
        );
    }

    fn discover_characteristics(&self, device: Uuid, start: u16, chars: &[(u16, u16, u16, i64)]) {
        let list: Vec<Value> = chars
            .iter()
            .map(|&(uuid, handle, value_handle, properties)| {
                Value::Dict(
                    Dict::new()
                        .with(KEY_ARG_UUID, uuid.to_be_bytes().to_vec())
                        .with(KEY_ARG_CHARACTERISTIC_HANDLE, handle)
                        .with(KEY_ARG_CHARACTERISTIC_VALUE_HANDLE, value_handle)
                        .with(KEY_ARG_CHARACTERISTIC_PROPERTIES, properties),
                )
            })
            .collect();
        self.deliver(
            EVT_CHARACTERISTICS_DISCOVER,
            Dict::new()
                .with(KEY_ARG_DEVICE_UUID, device)
                .with(KEY_ARG_SERVICE_START_HANDLE, start)
                .with(KEY_ARG_CHARACTERISTICS, list),
        );
    }

    fn read_event(&self, device: Uuid, handle: u16, data: &[u8]) {
        self.deliver(
            EVT_READ,
            Dict::new()
                .with(KEY_ARG_DEVICE_UUID, device)
                .with(KEY_ARG_CHARACTERISTIC_HANDLE, handle)
                .with(KEY_ARG_DATA, data),
        );
    }
}

fn device() -> Uuid {
    Uuid::from_bytes([0xAB; 16])
}

/// A peripheral with the battery service (handles 1..=5) discovered
fn discovered() -> Fixture {
    let f = Fixture::new();
    f.sight(device(), "sensor", -60);
    f.discover_services(device(), &[(0x180F, 1, 5)]);
    f.discover_characteristics(device(), 1, &[(0x2A19, 2, 3, 0x12)]);
    f.take_events();
    f
}

#[test]
fn test_state_change() {
    let f = Fixture::new();
    f.deliver(EVT_STATE_CHANGE, Dict::new().with(KEY_ARG_STATE, 5i64));
    f.deliver(EVT_STATE_CHANGE, Dict::new().with(KEY_ARG_STATE, 42i64));

    let events = f.take_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        events[0],
        Event::StateChange {
            state: State::PoweredOn
        }
    ));
}

#[test]
fn test_advertising_result_codes() {
    let f = Fixture::new();
    f.deliver(EVT_ADVERTISING_START, Dict::new().with(KEY_ARG_RESULT, 0i64));
    f.deliver(EVT_ADVERTISING_START, Dict::new().with(KEY_ARG_RESULT, 9i64));
    f.deliver(EVT_ADVERTISING_STOP, Dict::new().with(KEY_ARG_RESULT, 0i64));

    let names: Vec<&str> = f.take_events().iter().map(Event::name).collect();
    assert_eq!(names, vec!["advertisingStart", "advertisingStop"]);
}

#[test]
fn test_discover_with_empty_advertisement() {
    let f = Fixture::new();
    f.deliver(
        EVT_DISCOVER,
        Dict::new()
            .with(KEY_ARG_DEVICE_UUID, device())
            .with(KEY_ARG_ADVERTISEMENT_DATA, Dict::new()),
    );

    assert!(f.take_events().is_empty());
    assert!(f.ble.peripheral(&device()).is_none());
    assert!(f.ble.peripherals().is_empty());
}

#[test]
fn test_discover_with_null_only_advertisement() {
    let f = Fixture::new();
    f.deliver(
        EVT_DISCOVER,
        Dict::new()
            .with(KEY_ARG_DEVICE_UUID, device())
            .with(
                KEY_ARG_ADVERTISEMENT_DATA,
                Dict::new()
                    .with(KEY_ADV_LOCAL_NAME, Value::Null)
                    .with(KEY_ADV_TX_POWER_LEVEL, Value::Null),
            ),
    );

    assert!(f.take_events().is_empty());
    assert!(f.ble.peripherals().is_empty());
}

#[test]
fn test_discover_without_duplicates() {
    let f = Fixture::new();
    f.ble.start_scanning(&[], false).unwrap();

    f.sight(device(), "first", -70);
    f.sight(device(), "second", -50);

    let events = f.take_events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        Event::Discover {
            device_uuid,
            peripheral,
        } => {
            assert_eq!(*device_uuid, device());
            assert_eq!(peripheral.advertisement.local_name, "first");
            assert!(peripheral.connectable);
        }
        other => panic!("unexpected event {:?}", other),
    }

    let stored = f.ble.peripheral(&device()).unwrap();
    assert_eq!(stored.advertisement.local_name, "second");
    assert_eq!(stored.rssi, -50);
}

#[test]
fn test_discover_with_duplicates() {
    let f = Fixture::new();
    f.ble.start_scanning(&[], true).unwrap();

    f.sight(device(), "first", -70);
    f.sight(device(), "second", -50);

    let events = f.take_events();
    assert_eq!(events.len(), 2);
    assert!(matches!(
        &events[1],
        Event::Discover { peripheral, .. } if peripheral.rssi == -50
    ));
}

#[test]
fn test_connect_and_disconnect_keep_discovery_state() {
    let f = discovered();
    f.deliver(EVT_CONNECT, Dict::new().with(KEY_ARG_DEVICE_UUID, device()));
    f.deliver(EVT_DISCONNECT, Dict::new().with(KEY_ARG_DEVICE_UUID, device()));

    let names: Vec<&str> = f.take_events().iter().map(Event::name).collect();
    assert_eq!(names, vec!["connect", "disconnect"]);

    let peripheral = f.ble.peripheral(&device()).unwrap();
    assert_eq!(peripheral.services.len(), 1);
}

#[test]
fn test_mtu_and_rssi_require_known_peripheral() {
    let f = Fixture::new();
    let stranger = Uuid::from_u16(0x1234);
    f.deliver(
        EVT_MTU_CHANGE,
        Dict::new()
            .with(KEY_ARG_DEVICE_UUID, stranger)
            .with(KEY_ARG_ATT_MTU, 185i64),
    );
    f.deliver(
        EVT_RSSI_UPDATE,
        Dict::new()
            .with(KEY_ARG_DEVICE_UUID, stranger)
            .with(KEY_ARG_DATA, -30i64),
    );
    assert!(f.take_events().is_empty());

    f.sight(device(), "sensor", -60);
    f.take_events();
    f.deliver(
        EVT_MTU_CHANGE,
        Dict::new()
            .with(KEY_ARG_DEVICE_UUID, device())
            .with(KEY_ARG_ATT_MTU, 185i64),
    );
    f.deliver(
        EVT_RSSI_UPDATE,
        Dict::new()
            .with(KEY_ARG_DEVICE_UUID, device())
            .with(KEY_ARG_DATA, -30i64),
    );

    let events = f.take_events();
    assert!(matches!(events[0], Event::MtuChange { mtu: 185, .. }));
    assert!(matches!(&events[1], Event::RssiUpdate { peripheral, .. } if peripheral.rssi == -30));
    assert_eq!(f.ble.peripheral(&device()).unwrap().rssi, -30);
}

#[test]
fn test_services_replace_previous_discovery() {
    let f = discovered();
    f.discover_services(device(), &[(0x180A, 10, 20)]);

    let peripheral = f.ble.peripheral(&device()).unwrap();
    assert_eq!(peripheral.services.len(), 1);
    assert!(peripheral.services.by_uuid("180f").is_none());
    assert!(peripheral.services.by_handle(1).is_none());

    let info = peripheral.services.by_handle(10).unwrap();
    let info = read(&info);
    assert_eq!(info.uuid, "180a");
    assert_eq!(info.name.as_deref(), Some("Device Information"));
    assert_eq!(info.end_handle, 20);
    assert!(info.characteristics.is_empty());
}

#[test]
fn test_services_for_unknown_peripheral() {
    let f = Fixture::new();
    f.discover_services(device(), &[(0x180F, 1, 5)]);
    assert!(f.take_events().is_empty());
    assert!(f.ble.peripheral(&device()).is_none());
}

#[test]
fn test_characteristics_registered_under_three_keys() {
    let f = Fixture::new();
    f.sight(device(), "sensor", -60);
    f.discover_services(device(), &[(0x180F, 1, 5)]);
    f.discover_characteristics(device(), 1, &[(0x2A19, 2, 3, 0x12), (0x2A1A, 4, 5, 0x02)]);

    let events = f.take_events();
    let discovered: Vec<&Event> = events
        .iter()
        .filter(|e| e.kind() == EventKind::CharacteristicsDiscover)
        .collect();
    assert_eq!(discovered.len(), 1);
    assert!(matches!(
        discovered[0],
        Event::CharacteristicsDiscover { service_uuid, .. } if service_uuid == "180f"
    ));

    let peripheral = f.ble.peripheral(&device()).unwrap();
    let service = peripheral.services.by_uuid("180f").unwrap();
    let service = read(&service);
    let by_uuid = service.characteristics.by_uuid("2a19").unwrap();
    assert!(Arc::ptr_eq(&by_uuid, &service.characteristics.by_handle(2).unwrap()));
    assert!(Arc::ptr_eq(&by_uuid, &service.characteristics.by_handle(3).unwrap()));

    let level = read(&by_uuid);
    assert_eq!(level.name.as_deref(), Some("Battery Level"));
    assert_eq!(level.properties, Property::READ | Property::NOTIFY);
}

#[test]
fn test_characteristics_for_unknown_service() {
    let f = discovered();
    f.discover_characteristics(device(), 40, &[(0x2A19, 41, 42, 0x02)]);
    assert!(f.take_events().is_empty());
}

#[test]
fn test_malformed_characteristic_leaves_registry_untouched() {
    let f = discovered();
    f.deliver(
        EVT_CHARACTERISTICS_DISCOVER,
        Dict::new()
            .with(KEY_ARG_DEVICE_UUID, device())
            .with(KEY_ARG_SERVICE_START_HANDLE, 1u16)
            .with(
                KEY_ARG_CHARACTERISTICS,
                vec![
                    Value::Dict(
                        Dict::new()
                            .with(KEY_ARG_UUID, vec![0x2Au8, 0x1B])
                            .with(KEY_ARG_CHARACTERISTIC_HANDLE, 4u16)
                            .with(KEY_ARG_CHARACTERISTIC_VALUE_HANDLE, 5u16)
                            .with(KEY_ARG_CHARACTERISTIC_PROPERTIES, 2i64),
                    ),
                    Value::Dict(Dict::new().with(KEY_ARG_UUID, vec![0x2Au8, 0x1C])),
                ],
            ),
    );

    assert!(f.take_events().is_empty());
    let peripheral = f.ble.peripheral(&device()).unwrap();
    let service = peripheral.services.by_handle(1).unwrap();
    assert!(read(&service).characteristics.by_uuid("2a1b").is_none());
}

#[test]
fn test_descriptors_discover() {
    let f = discovered();
    f.deliver(
        EVT_DESCRIPTORS_DISCOVER,
        Dict::new()
            .with(KEY_ARG_DEVICE_UUID, device())
            .with(KEY_ARG_CHARACTERISTIC_HANDLE, 2u16)
            .with(
                KEY_ARG_DESCRIPTORS,
                vec![Value::Dict(
                    Dict::new()
                        .with(KEY_ARG_UUID, vec![0x29u8, 0x02])
                        .with(KEY_ARG_DESCRIPTOR_HANDLE, 4u16),
                )],
            ),
    );

    let events = f.take_events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        Event::DescriptorsDiscover {
            service_uuid,
            characteristic_uuid,
            peripheral,
            ..
        } => {
            assert_eq!(service_uuid, "180f");
            assert_eq!(characteristic_uuid, "2a19");
            let (_, c) = peripheral.find_characteristic(3).unwrap();
            let c = read(&c);
            let d = c.descriptors.by_handle(4).unwrap();
            assert_eq!(read(&d).uuid, "2902");
            assert!(c.descriptors.by_uuid("2902").is_some());
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn test_descriptors_for_unknown_characteristic() {
    let f = discovered();
    f.deliver(
        EVT_DESCRIPTORS_DISCOVER,
        Dict::new()
            .with(KEY_ARG_DEVICE_UUID, device())
            .with(KEY_ARG_CHARACTERISTIC_HANDLE, 77u16)
            .with(KEY_ARG_DESCRIPTORS, Vec::<Value>::new()),
    );
    assert!(f.take_events().is_empty());
}

#[test]
fn test_read_and_notification() {
    let f = discovered();
    f.read_event(device(), 3, &[0x64]);
    f.deliver(
        EVT_READ,
        Dict::new()
            .with(KEY_ARG_DEVICE_UUID, device())
            .with(KEY_ARG_CHARACTERISTIC_HANDLE, 3u16)
            .with(KEY_ARG_DATA, vec![0x63u8])
            .with(KEY_ARG_IS_NOTIFICATION, 1i64),
    );

    let events = f.take_events();
    assert_eq!(events.len(), 2);
    match (&events[0], &events[1]) {
        (
            Event::Read {
                characteristic_uuid,
                data,
                is_notification: false,
                ..
            },
            Event::Read {
                data: notified,
                is_notification: true,
                ..
            },
        ) => {
            assert_eq!(characteristic_uuid, "2a19");
            assert_eq!(*data, vec![0x64u8]);
            assert_eq!(*notified, vec![0x63u8]);
        }
        other => panic!("unexpected events {:?}", other),
    }
}

#[test]
fn test_read_for_unknown_handle_is_dropped() {
    let f = discovered();
    f.read_event(device(), 99, &[1]);
    f.read_event(Uuid::from_u16(7), 3, &[1]);
    assert!(f.take_events().is_empty());
}

#[test]
fn test_lookup_resolves_single_service() {
    let f = Fixture::new();
    f.sight(device(), "sensor", -60);
    f.discover_services(device(), &[(0x180F, 1, 5), (0x180A, 6, 10)]);
    f.discover_characteristics(device(), 1, &[(0x2A19, 2, 3, 0x12)]);
    f.discover_characteristics(device(), 6, &[(0x2A29, 7, 8, 0x02)]);
    f.take_events();

    f.read_event(device(), 8, b"ACME");
    let events = f.take_events();
    assert!(matches!(
        &events[0],
        Event::Read { service_uuid, characteristic_uuid, .. }
            if service_uuid == "180a" && characteristic_uuid == "2a29"
    ));
}

#[test]
fn test_lookup_first_match_on_handle_collision() {
    let f = Fixture::new();
    f.sight(device(), "sensor", -60);
    f.discover_services(device(), &[(0x180F, 1, 5), (0x180A, 6, 10)]);
    f.discover_characteristics(device(), 1, &[(0x2A19, 2, 3, 0x12)]);
    // The second service claims the same value handle
    f.discover_characteristics(device(), 6, &[(0x2A29, 7, 3, 0x02)]);
    f.take_events();

    f.read_event(device(), 3, &[0]);
    let events = f.take_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        Event::Read { service_uuid, characteristic_uuid, .. }
            if service_uuid == "180f" && characteristic_uuid == "2a19"
    ));
}

#[test]
fn test_snapshot_not_affected_by_later_discovery() {
    let f = Fixture::new();
    f.sight(device(), "sensor", -60);
    f.discover_services(device(), &[(0x180F, 1, 5)]);
    let events = f.take_events();
    let snapshot = match &events[1] {
        Event::ServicesDiscover { peripheral, .. } => peripheral.clone(),
        other => panic!("unexpected event {:?}", other),
    };

    f.discover_characteristics(device(), 1, &[(0x2A19, 2, 3, 0x12)]);

    let service = snapshot.services.by_handle(1).unwrap();
    assert!(read(&service).characteristics.is_empty());
}

#[test]
fn test_channel_error_forwarded() {
    let f = discovered();
    f.ble.handle_event(Err(ChannelError::Interrupted));

    let events = f.take_events();
    assert!(matches!(
        events[0],
        Event::ChannelError(ChannelError::Interrupted)
    ));
    assert!(f.ble.peripheral(&device()).is_some());
}

#[test]
fn test_malformed_envelope_and_unknown_opcode() {
    let f = Fixture::new();
    f.ble
        .handle_event(Ok(Dict::new().with(KEY_MSG_ID, EVT_STATE_CHANGE)));
    f.deliver(999, Dict::new());
    f.deliver(EVT_CONNECT, Dict::new().with(KEY_ARG_DEVICE_UUID, "not a uuid"));
    assert!(f.take_events().is_empty());
}

#[test]
fn test_outbound_operations_resolve_first() {
    let f = Fixture::new();
    assert!(matches!(
        f.ble.connect(device()),
        Err(BleError::UnknownPeripheral(_))
    ));
    assert!(f.transport.take().is_empty());

    let f = discovered();
    assert!(matches!(
        f.ble.read(device(), "180a", "2a19"),
        Err(BleError::UnknownService(_))
    ));
    assert!(matches!(
        f.ble.discover_descriptors(device(), "180f", "2a00"),
        Err(BleError::UnknownCharacteristic(_))
    ));
    assert!(f.transport.take().is_empty());

    f.ble.connect(device()).unwrap();
    f.ble.read(device(), "180f", "2a19").unwrap();
    f.ble
        .discover_characteristics(device(), "180f", &["2a19".to_string()])
        .unwrap();

    let sent = f.transport.take();
    assert_eq!(sent[0], command::connect(device()));
    assert_eq!(sent[1], command::read(device(), 2, 3));
    assert_eq!(
        sent[2],
        command::discover_characteristics(device(), 1, 5, &["2a19".to_string()])
    );
    let args = sent[2].args();
    assert_eq!(args.get_int(KEY_ARG_SERVICE_END_HANDLE), Ok(5));
}

#[test]
fn test_send_failure_is_reported() {
    let f = Fixture::new();
    *f.transport.fail_with.lock().unwrap() = Some(ChannelError::Invalid);
    assert!(matches!(
        f.ble.stop_scanning(),
        Err(BleError::Channel(ChannelError::Invalid))
    ));
}

#[test]
fn test_set_services_records_attributes() {
    let f = Fixture::new();
    let services = vec![Service::new(Uuid::from_u16(0x180F)).with_characteristic(
        Characteristic::new(Uuid::from_u16(0x2A19), Property::READ),
    )];
    f.ble.set_services(&services).unwrap();

    let sent = f.transport.take();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].id, MSG_REMOVE_SERVICES);
    assert_eq!(sent[1].id, MSG_SET_SERVICES);
    assert_eq!(f.ble.attribute(2).map(|a| a.uuid()), Some(Uuid::from_u16(0x2A19)));
    assert!(f.ble.attribute(0).is_none());
}

#[test]
fn test_listener_can_call_back_into_engine() {
    let f = Fixture::new();
    let ble = Arc::downgrade(&f.ble);
    f.ble.on(EventKind::StateChange, move |e| {
        if let (Event::StateChange { state: State::PoweredOn }, Some(ble)) = (e, ble.upgrade()) {
            ble.start_scanning(&[], true).unwrap();
        }
    });

    f.deliver(EVT_STATE_CHANGE, Dict::new().with(KEY_ARG_STATE, 5i64));
    let sent = f.transport.take();
    assert_eq!(sent, vec![command::start_scanning(&[], true)]);
}

#[test]
fn test_command_encoding() {
    let scan = command::start_scanning(&[Uuid::from_u16(0x180F)], true);
    assert_eq!(scan.id, MSG_START_SCANNING);
    let args = scan.args();
    assert_eq!(
        args.get_array(KEY_ARG_UUIDS).unwrap(),
        &[Value::from("0000180f00001000800000805f9b34fb")][..]
    );
    assert_eq!(
        args.get_dict(KEY_ARG_OPTIONS)
            .and_then(|o| o.get_int(KEY_OPT_ALLOW_DUPLICATES)),
        Ok(1)
    );

    let scan = command::start_scanning(&[], false);
    assert!(scan.args().get_dict(KEY_ARG_OPTIONS).unwrap().is_empty());

    let connect = command::connect(device());
    let args = connect.args();
    assert_eq!(args.get_uuid(KEY_ARG_DEVICE_UUID), Ok(device()));
    assert_eq!(
        args.get_dict(KEY_ARG_OPTIONS)
            .and_then(|o| o.get_int(KEY_OPT_NOTIFY_ON_DISCONNECTION)),
        Ok(1)
    );

    let init = command::init("bluexpc-1");
    assert_eq!(init.id, MSG_INIT);
    assert_eq!(init.args().get_string(KEY_ARG_NAME), Ok("bluexpc-1"));
    assert_eq!(init.args().get_int(KEY_ARG_TYPE), Ok(0));

    let adv = command::start_advertising("beacon", &[Uuid::from_u16(0x180F)]);
    let args = adv.args();
    assert_eq!(args.get_string(KEY_ADV_LOCAL_NAME), Ok("beacon"));
    assert_eq!(
        args.get_array(KEY_ADV_SERVICE_UUIDS).unwrap()[0].as_uuid(),
        Some(Uuid::from_u16(0x180F))
    );

    assert_eq!(command::stop_advertising(), Message::bare(MSG_STOP_ADVERTISING));
    assert_eq!(command::stop_scanning(), Message::bare(MSG_STOP_SCANNING));
}

#[test]
fn test_ibeacon_data_layout() {
    let uuid: Uuid = "1BEAC099-BEAC-BEAC-BEAC-BEAC09BEAC09".parse().unwrap();
    let data = command::ibeacon_data(uuid, 0x0102, 0x0304, -57);

    assert_eq!(data.len(), command::IBEACON_DATA_LEN);
    assert_eq!(&data[..16], uuid.as_bytes());
    assert_eq!(&data[16..], &[0x01u8, 0x02, 0x03, 0x04, 0xC7]);
}

#[test]
fn test_beacon_payload_variants() {
    let data = [0xAAu8; 21];

    let modern = command::build_beacon_payload(Some("14.0.0"), &data);
    let bytes = modern.get_bytes(KEY_ADV_APPLE_MFG_DATA).unwrap();
    assert_eq!(&bytes[..6], &[26u8, 0xFF, 0x4C, 0x00, 0x02, 21]);
    assert_eq!(&bytes[6..], &data[..]);
    assert!(!modern.contains(KEY_ADV_APPLE_BEACON_KEY));

    // Numeric, not lexicographic, comparison
    let newer = command::build_beacon_payload(Some("23.4.0"), &data);
    assert!(newer.contains(KEY_ADV_APPLE_MFG_DATA));

    for release in [Some("13.4.0"), Some("9.8.0"), Some("unknown"), None] {
        let legacy = command::build_beacon_payload(release, &data);
        assert_eq!(legacy.get_bytes(KEY_ADV_APPLE_BEACON_KEY), Ok(&data[..]));
        assert!(!legacy.contains(KEY_ADV_APPLE_MFG_DATA));
    }
}
