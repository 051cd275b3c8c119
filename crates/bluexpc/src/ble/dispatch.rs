//! Inbound event dispatch
//!
//! Turns one daemon message into at most one `Event`, updating the registry
//! on the way. Each handler decodes everything it needs before touching the
//! registry, so a malformed message never leaves a partial update behind.

use super::advertisement;
use super::event::Event;
use crate::error::{DispatchError, ValueError};
use crate::gatt::known;
use crate::gatt::registry::{read, write};
use crate::gatt::{
    AttributeTable, CharacteristicDescriptor, HandleMap, Property, Registry, ServiceCharacteristic,
    ServiceHandle, State,
};
use crate::xpc::{
    Dict, Value, EVT_ADVERTISING_START, EVT_ADVERTISING_STOP, EVT_CHARACTERISTICS_DISCOVER,
    EVT_CONNECT, EVT_DESCRIPTORS_DISCOVER, EVT_DISCONNECT, EVT_DISCOVER, EVT_MTU_CHANGE, EVT_READ,
    EVT_RSSI_UPDATE, EVT_SERVICES_DISCOVER, EVT_STATE_CHANGE, KEY_ADV_IS_CONNECTABLE,
    KEY_ARG_ADVERTISEMENT_DATA, KEY_ARG_ATT_MTU, KEY_ARG_CHARACTERISTICS,
    KEY_ARG_CHARACTERISTIC_HANDLE, KEY_ARG_CHARACTERISTIC_PROPERTIES,
    KEY_ARG_CHARACTERISTIC_VALUE_HANDLE, KEY_ARG_DATA, KEY_ARG_DESCRIPTORS,
    KEY_ARG_DESCRIPTOR_HANDLE, KEY_ARG_DEVICE_UUID, KEY_ARG_IS_NOTIFICATION, KEY_ARG_RESULT,
    KEY_ARG_RSSI, KEY_ARG_SERVICES, KEY_ARG_SERVICE_END_HANDLE, KEY_ARG_SERVICE_START_HANDLE,
    KEY_ARG_STATE, KEY_ARG_UUID,
};
use log::trace;

/// Mutable engine state guarded by the engine's state lock
#[derive(Debug, Default)]
pub struct EngineState {
    pub registry: Registry,
    /// Report every sighting, not only the first one per peripheral
    pub allow_duplicates: bool,
    /// Last local attribute table pushed to the daemon
    pub attributes: AttributeTable,
}

type Outcome = Result<Option<Event>, DispatchError>;

/// Applies one inbound message.
///
/// `Ok(None)` means the message was consumed without an event: unknown
/// opcodes, empty sightings, suppressed duplicates and the lookups that are
/// allowed to miss silently. `Err` means the message was dropped and should
/// be reported.
pub fn dispatch(state: &mut EngineState, id: i64, args: &Dict) -> Outcome {
    match id {
        EVT_STATE_CHANGE => state_change(args),
        EVT_ADVERTISING_START => advertising(args, "advertisingStart", Event::AdvertisingStart),
        EVT_ADVERTISING_STOP => advertising(args, "advertisingStop", Event::AdvertisingStop),
        EVT_DISCOVER => discover(state, args),
        EVT_CONNECT => Ok(Some(Event::Connect {
            device_uuid: args.get_uuid(KEY_ARG_DEVICE_UUID)?,
        })),
        EVT_DISCONNECT => Ok(Some(Event::Disconnect {
            device_uuid: args.get_uuid(KEY_ARG_DEVICE_UUID)?,
        })),
        EVT_MTU_CHANGE => mtu_change(&state.registry, args),
        EVT_RSSI_UPDATE => rssi_update(&mut state.registry, args),
        EVT_SERVICES_DISCOVER => services_discover(&mut state.registry, args),
        EVT_CHARACTERISTICS_DISCOVER => characteristics_discover(&state.registry, args),
        EVT_DESCRIPTORS_DISCOVER => descriptors_discover(&state.registry, args),
        EVT_READ => read_value(&state.registry, args),
        _ => {
            trace!("ignoring event {}", id);
            Ok(None)
        }
    }
}

/// Reads an array element that must be a dictionary.
fn entry<'a>(key: &str, item: &'a Value) -> Result<&'a Dict, ValueError> {
    item.as_dict().ok_or_else(|| ValueError::WrongType {
        key: key.to_string(),
        expected: "dictionary",
        found: item.type_name(),
    })
}

fn state_change(args: &Dict) -> Outcome {
    let raw = args.get_int(KEY_ARG_STATE)?;
    let state = State::from_raw(raw).ok_or(DispatchError::InvalidState(raw))?;
    Ok(Some(Event::StateChange { state }))
}

fn advertising(args: &Dict, operation: &'static str, event: Event) -> Outcome {
    match args.get_int(KEY_ARG_RESULT)? {
        0 => Ok(Some(event)),
        result => Err(DispatchError::OperationFailed { operation, result }),
    }
}

fn discover(state: &mut EngineState, args: &Dict) -> Outcome {
    let adv = args.get_dict(KEY_ARG_ADVERTISEMENT_DATA)?;
    if adv.is_empty() {
        return Ok(None);
    }

    let device_uuid = args.get_uuid(KEY_ARG_DEVICE_UUID)?;
    let advertisement = advertisement::decode(adv, args);
    let connectable = adv.get_int_or(KEY_ADV_IS_CONNECTABLE, 0) > 0;
    let rssi = i32::try_from(args.get_int_or(KEY_ARG_RSSI, 0)).unwrap_or(0);

    let allow_duplicates = state.allow_duplicates;
    let (peripheral, existed) = state.registry.upsert(device_uuid);
    if !existed {
        peripheral.connectable = connectable;
    }
    peripheral.advertisement = advertisement;
    peripheral.rssi = rssi;

    if existed && !allow_duplicates {
        return Ok(None);
    }

    Ok(Some(Event::Discover {
        device_uuid,
        peripheral: peripheral.clone(),
    }))
}

fn mtu_change(registry: &Registry, args: &Dict) -> Outcome {
    let device_uuid = args.get_uuid(KEY_ARG_DEVICE_UUID)?;
    let mtu = args.get_int(KEY_ARG_ATT_MTU)?;

    Ok(registry.find(&device_uuid).map(|p| Event::MtuChange {
        device_uuid,
        peripheral: p.clone(),
        mtu,
    }))
}

fn rssi_update(registry: &mut Registry, args: &Dict) -> Outcome {
    let device_uuid = args.get_uuid(KEY_ARG_DEVICE_UUID)?;
    let rssi = args.get_int(KEY_ARG_DATA)?;

    Ok(registry.find_mut(&device_uuid).map(|p| {
        p.rssi = i32::try_from(rssi).unwrap_or(p.rssi);
        Event::RssiUpdate {
            device_uuid,
            peripheral: p.clone(),
        }
    }))
}

fn decode_service(dict: &Dict) -> Result<ServiceHandle, ValueError> {
    let uuid = dict.get_hex_bytes(KEY_ARG_UUID)?;
    let known = known::service(&uuid);
    Ok(ServiceHandle {
        name: known.map(|k| k.name.to_string()),
        type_: known.map(|k| k.type_.to_string()),
        start_handle: dict.get_u16(KEY_ARG_SERVICE_START_HANDLE)?,
        end_handle: dict.get_u16(KEY_ARG_SERVICE_END_HANDLE)?,
        characteristics: HandleMap::new(),
        uuid,
    })
}

fn services_discover(registry: &mut Registry, args: &Dict) -> Outcome {
    let device_uuid = args.get_uuid(KEY_ARG_DEVICE_UUID)?;

    let mut services = HandleMap::new();
    if args.contains(KEY_ARG_SERVICES) {
        for item in args.get_array(KEY_ARG_SERVICES)? {
            let service = decode_service(entry(KEY_ARG_SERVICES, item)?)?;
            let (uuid, start_handle) = (service.uuid.clone(), service.start_handle);
            services.insert(service, &uuid, &[start_handle]);
        }
    }

    let peripheral = registry
        .find_mut(&device_uuid)
        .ok_or(DispatchError::UnknownPeripheral(device_uuid))?;
    peripheral.services = services;

    Ok(Some(Event::ServicesDiscover {
        device_uuid,
        peripheral: peripheral.clone(),
    }))
}

fn decode_characteristic(dict: &Dict) -> Result<ServiceCharacteristic, ValueError> {
    let uuid = dict.get_hex_bytes(KEY_ARG_UUID)?;
    let known = known::characteristic(&uuid);
    Ok(ServiceCharacteristic {
        name: known.map(|k| k.name.to_string()),
        type_: known.map(|k| k.type_.to_string()),
        properties: Property::from_raw(dict.get_int(KEY_ARG_CHARACTERISTIC_PROPERTIES)?),
        handle: dict.get_u16(KEY_ARG_CHARACTERISTIC_HANDLE)?,
        value_handle: dict.get_u16(KEY_ARG_CHARACTERISTIC_VALUE_HANDLE)?,
        descriptors: HandleMap::new(),
        uuid,
    })
}

fn characteristics_discover(registry: &Registry, args: &Dict) -> Outcome {
    let device_uuid = args.get_uuid(KEY_ARG_DEVICE_UUID)?;
    let start_handle = args.get_u16(KEY_ARG_SERVICE_START_HANDLE)?;
    let characteristics = args
        .get_array(KEY_ARG_CHARACTERISTICS)?
        .iter()
        .map(|item| decode_characteristic(entry(KEY_ARG_CHARACTERISTICS, item)?))
        .collect::<Result<Vec<_>, ValueError>>()?;

    let peripheral = registry
        .find(&device_uuid)
        .ok_or(DispatchError::UnknownPeripheral(device_uuid))?;
    let service = peripheral
        .services
        .by_handle(start_handle)
        .ok_or(DispatchError::UnknownService(start_handle))?;

    let service_uuid = {
        let mut service = write(&service);
        for characteristic in characteristics {
            let uuid = characteristic.uuid.clone();
            let handles = [characteristic.handle, characteristic.value_handle];
            service.characteristics.insert(characteristic, &uuid, &handles);
        }
        service.uuid.clone()
    };

    Ok(Some(Event::CharacteristicsDiscover {
        device_uuid,
        service_uuid,
        peripheral: peripheral.clone(),
    }))
}

fn decode_descriptor(dict: &Dict) -> Result<CharacteristicDescriptor, ValueError> {
    Ok(CharacteristicDescriptor {
        uuid: dict.get_hex_bytes(KEY_ARG_UUID)?,
        handle: dict.get_u16(KEY_ARG_DESCRIPTOR_HANDLE)?,
    })
}

fn descriptors_discover(registry: &Registry, args: &Dict) -> Outcome {
    let device_uuid = args.get_uuid(KEY_ARG_DEVICE_UUID)?;
    let handle = args.get_u16(KEY_ARG_CHARACTERISTIC_HANDLE)?;
    let descriptors = args
        .get_array(KEY_ARG_DESCRIPTORS)?
        .iter()
        .map(|item| decode_descriptor(entry(KEY_ARG_DESCRIPTORS, item)?))
        .collect::<Result<Vec<_>, ValueError>>()?;

    let peripheral = registry
        .find(&device_uuid)
        .ok_or(DispatchError::UnknownPeripheral(device_uuid))?;
    let (service, characteristic) = peripheral
        .find_characteristic(handle)
        .ok_or(DispatchError::UnknownCharacteristic(handle))?;

    let characteristic_uuid = {
        let mut characteristic = write(&characteristic);
        for descriptor in descriptors {
            let uuid = descriptor.uuid.clone();
            let descriptor_handle = descriptor.handle;
            characteristic
                .descriptors
                .insert(descriptor, &uuid, &[descriptor_handle]);
        }
        characteristic.uuid.clone()
    };
    let service_uuid = read(&service).uuid.clone();

    Ok(Some(Event::DescriptorsDiscover {
        device_uuid,
        service_uuid,
        characteristic_uuid,
        peripheral: peripheral.clone(),
    }))
}

fn read_value(registry: &Registry, args: &Dict) -> Outcome {
    let device_uuid = args.get_uuid(KEY_ARG_DEVICE_UUID)?;
    let handle = args.get_u16(KEY_ARG_CHARACTERISTIC_HANDLE)?;
    let is_notification = args.get_int_or(KEY_ARG_IS_NOTIFICATION, 0) != 0;
    let data = args.get_bytes(KEY_ARG_DATA)?.to_vec();

    let Some(peripheral) = registry.find(&device_uuid) else {
        return Ok(None);
    };
    let Some((service, characteristic)) = peripheral.find_characteristic(handle) else {
        return Ok(None);
    };

    let service_uuid = read(&service).uuid.clone();
    let characteristic_uuid = read(&characteristic).uuid.clone();

    Ok(Some(Event::Read {
        device_uuid,
        service_uuid,
        characteristic_uuid,
        peripheral: peripheral.clone(),
        data,
        is_notification,
    }))
}
