//! Advertisement payload decoding
//!
//! Every field of an advertisement is optional. Absent or malformed fields
//! take their default instead of failing the sighting.

use crate::gatt::{Advertisement, ServiceData};
use crate::xpc::{
    Dict, Value, KEY_ADV_LOCAL_NAME, KEY_ADV_MANUFACTURER_DATA, KEY_ADV_SERVICE_DATA,
    KEY_ADV_SERVICE_UUIDS, KEY_ADV_TX_POWER_LEVEL, KEY_ARG_NAME,
};
use log::trace;

/// Decodes the advertisement dictionary of a discover event.
///
/// `args` is the enclosing message, whose name field backs up a missing
/// local name.
pub fn decode(adv: &Dict, args: &Dict) -> Advertisement {
    let local_name = adv
        .get(KEY_ADV_LOCAL_NAME)
        .and_then(Value::as_str)
        .unwrap_or_else(|| args.get_string_or(KEY_ARG_NAME, ""))
        .to_string();

    Advertisement {
        local_name,
        tx_power_level: tx_power_level(adv),
        manufacturer_data: adv.get_bytes_opt(KEY_ADV_MANUFACTURER_DATA).map(<[u8]>::to_vec),
        service_data: service_data(adv),
        service_uuids: service_uuids(adv),
    }
}

fn tx_power_level(adv: &Dict) -> i32 {
    let raw = adv.get_int_or(KEY_ADV_TX_POWER_LEVEL, 0);
    i32::try_from(raw).unwrap_or(0)
}

fn service_uuids(adv: &Dict) -> Vec<String> {
    let Some(items) = adv.get(KEY_ADV_SERVICE_UUIDS).and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::Data(bytes) => Some(hex::encode(bytes)),
            Value::Uuid(uuid) => Some(hex::encode(uuid.as_bytes())),
            _ => {
                trace!("skipping service uuid of type {}", item.type_name());
                None
            }
        })
        .collect()
}

/// Service data arrives as a flat list alternating UUID bytes and payload
/// bytes. A trailing UUID without payload is ignored.
fn service_data(adv: &Dict) -> Vec<ServiceData> {
    let Some(items) = adv.get(KEY_ADV_SERVICE_DATA).and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .chunks_exact(2)
        .filter_map(|pair| match (pair[0].as_bytes(), pair[1].as_bytes()) {
            (Some(uuid), Some(data)) => Some(ServiceData {
                uuid: hex::encode(uuid),
                data: data.to_vec(),
            }),
            _ => {
                trace!("skipping malformed service data entry");
                None
            }
        })
        .collect()
}
