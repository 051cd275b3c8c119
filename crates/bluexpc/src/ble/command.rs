//! Outbound command builders
//!
//! Each function shapes one daemon command. None of them touch engine state;
//! resolving peripherals and handles is the caller's job.

use crate::host;
use crate::uuid::Uuid;
use crate::xpc::{
    Dict, Message, Value, KEY_ADV_APPLE_BEACON_KEY, KEY_ADV_APPLE_MFG_DATA, KEY_ADV_LOCAL_NAME,
    KEY_ADV_SERVICE_UUIDS, KEY_ARG_CHARACTERISTIC_HANDLE, KEY_ARG_CHARACTERISTIC_VALUE_HANDLE,
    KEY_ARG_DEVICE_UUID, KEY_ARG_NAME, KEY_ARG_OPTIONS, KEY_ARG_SERVICE_END_HANDLE,
    KEY_ARG_SERVICE_START_HANDLE, KEY_ARG_TYPE, KEY_ARG_UUIDS, KEY_OPT_ALLOW_DUPLICATES,
    KEY_OPT_NOTIFY_ON_DISCONNECTION, KEY_OPT_SHOW_POWER_ALERT, MSG_CONNECT, MSG_DISCONNECT,
    MSG_DISCOVER_CHARACTERISTICS, MSG_DISCOVER_DESCRIPTORS, MSG_DISCOVER_SERVICES, MSG_INIT,
    MSG_READ, MSG_REMOVE_SERVICES, MSG_START_ADVERTISING, MSG_START_SCANNING, MSG_STOP_ADVERTISING,
    MSG_STOP_SCANNING, MSG_UPDATE_RSSI,
};
use byteorder::{BigEndian, ByteOrder};

/// Length of an identifier beacon payload: UUID, major, minor, power
pub const IBEACON_DATA_LEN: usize = 21;

/// First release major version that takes the manufacturer-data beacon form
const MFG_DATA_BEACON_RELEASE: u32 = 14;

/// Apple company identifier, little-endian
const APPLE_COMPANY_ID: [u8; 2] = [0x4C, 0x00];
const AD_TYPE_MANUFACTURER_DATA: u8 = 0xFF;
const IBEACON_TYPE: u8 = 0x02;

pub fn init(name: &str) -> Message {
    Message::new(
        MSG_INIT,
        Dict::new()
            .with(KEY_ARG_NAME, name)
            .with(KEY_ARG_OPTIONS, Dict::new().with(KEY_OPT_SHOW_POWER_ALERT, 0i64))
            .with(KEY_ARG_TYPE, 0i64),
    )
}

/// Advertises a local name and service UUIDs (as raw data).
pub fn start_advertising(name: &str, service_uuids: &[Uuid]) -> Message {
    let uuids: Value = service_uuids
        .iter()
        .map(|u| Value::Data(u.as_bytes().to_vec()))
        .collect();

    Message::new(
        MSG_START_ADVERTISING,
        Dict::new()
            .with(KEY_ADV_LOCAL_NAME, name)
            .with(KEY_ADV_SERVICE_UUIDS, uuids),
    )
}

/// Wraps raw beacon data in the advertising payload the host expects.
///
/// Hosts with a release major version of 14 or later take a complete
/// manufacturer-specific AD structure; older or unknown ones take the data
/// under the legacy beacon key.
pub fn build_beacon_payload(release: Option<&str>, data: &[u8]) -> Dict {
    let modern = release
        .and_then(host::major_version)
        .is_some_and(|major| major >= MFG_DATA_BEACON_RELEASE);

    if modern {
        let len = data.len();
        let mut payload = Vec::with_capacity(len + 6);
        payload.push((len + 5) as u8);
        payload.push(AD_TYPE_MANUFACTURER_DATA);
        payload.extend_from_slice(&APPLE_COMPANY_ID);
        payload.push(IBEACON_TYPE);
        payload.push(len as u8);
        payload.extend_from_slice(data);
        Dict::new().with(KEY_ADV_APPLE_MFG_DATA, payload)
    } else {
        Dict::new().with(KEY_ADV_APPLE_BEACON_KEY, data)
    }
}

pub fn start_advertising_beacon(release: Option<&str>, data: &[u8]) -> Message {
    Message::new(MSG_START_ADVERTISING, build_beacon_payload(release, data))
}

/// Packs identifier beacon fields: UUID, big-endian major and minor, and the
/// signed measured power at one metre.
pub fn ibeacon_data(
    uuid: Uuid,
    major: u16,
    minor: u16,
    measured_power: i8,
) -> [u8; IBEACON_DATA_LEN] {
    let mut data = [0u8; IBEACON_DATA_LEN];
    data[..16].copy_from_slice(uuid.as_bytes());
    BigEndian::write_u16(&mut data[16..18], major);
    BigEndian::write_u16(&mut data[18..20], minor);
    data[20] = measured_power as u8;
    data
}

pub fn stop_advertising() -> Message {
    Message::bare(MSG_STOP_ADVERTISING)
}

/// Starts scanning for the given services (all services when empty).
pub fn start_scanning(service_uuids: &[Uuid], allow_duplicates: bool) -> Message {
    let uuids: Value = service_uuids.iter().map(|u| u.to_string()).collect();
    let options = if allow_duplicates {
        Dict::new().with(KEY_OPT_ALLOW_DUPLICATES, 1i64)
    } else {
        Dict::new()
    };

    Message::new(
        MSG_START_SCANNING,
        Dict::new()
            .with(KEY_ARG_UUIDS, uuids)
            .with(KEY_ARG_OPTIONS, options),
    )
}

pub fn stop_scanning() -> Message {
    Message::bare(MSG_STOP_SCANNING)
}

pub fn connect(device_uuid: Uuid) -> Message {
    Message::new(
        MSG_CONNECT,
        Dict::new()
            .with(
                KEY_ARG_OPTIONS,
                Dict::new().with(KEY_OPT_NOTIFY_ON_DISCONNECTION, 1i64),
            )
            .with(KEY_ARG_DEVICE_UUID, device_uuid),
    )
}

pub fn disconnect(device_uuid: Uuid) -> Message {
    Message::new(
        MSG_DISCONNECT,
        Dict::new().with(KEY_ARG_DEVICE_UUID, device_uuid),
    )
}

pub fn update_rssi(device_uuid: Uuid) -> Message {
    Message::new(
        MSG_UPDATE_RSSI,
        Dict::new().with(KEY_ARG_DEVICE_UUID, device_uuid),
    )
}

pub fn discover_services(device_uuid: Uuid, service_uuids: &[Uuid]) -> Message {
    let uuids: Value = service_uuids.iter().map(|u| u.to_string()).collect();
    Message::new(
        MSG_DISCOVER_SERVICES,
        Dict::new()
            .with(KEY_ARG_DEVICE_UUID, device_uuid)
            .with(KEY_ARG_UUIDS, uuids),
    )
}

/// Discovers characteristics within a service's handle range.
pub fn discover_characteristics(
    device_uuid: Uuid,
    start_handle: u16,
    end_handle: u16,
    characteristic_uuids: &[String],
) -> Message {
    let uuids: Value = characteristic_uuids.iter().map(String::as_str).collect();
    Message::new(
        MSG_DISCOVER_CHARACTERISTICS,
        Dict::new()
            .with(KEY_ARG_DEVICE_UUID, device_uuid)
            .with(KEY_ARG_SERVICE_START_HANDLE, start_handle)
            .with(KEY_ARG_SERVICE_END_HANDLE, end_handle)
            .with(KEY_ARG_UUIDS, uuids),
    )
}

fn characteristic_command(id: i64, device_uuid: Uuid, handle: u16, value_handle: u16) -> Message {
    Message::new(
        id,
        Dict::new()
            .with(KEY_ARG_DEVICE_UUID, device_uuid)
            .with(KEY_ARG_CHARACTERISTIC_HANDLE, handle)
            .with(KEY_ARG_CHARACTERISTIC_VALUE_HANDLE, value_handle),
    )
}

pub fn discover_descriptors(device_uuid: Uuid, handle: u16, value_handle: u16) -> Message {
    characteristic_command(MSG_DISCOVER_DESCRIPTORS, device_uuid, handle, value_handle)
}

pub fn read(device_uuid: Uuid, handle: u16, value_handle: u16) -> Message {
    characteristic_command(MSG_READ, device_uuid, handle, value_handle)
}

pub fn remove_services() -> Message {
    Message::bare(MSG_REMOVE_SERVICES)
}
