//! Names of SIG-assigned services and characteristics
//!
//! Discovery events only carry raw UUIDs; these tables give the well-known
//! ones a human-readable name and a type identifier.

/// Human-readable name and type identifier of a well-known attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameType {
    pub name: &'static str,
    pub type_: &'static str,
}

/// Hex suffix shared by every UUID derived from the Bluetooth base UUID
const BASE_UUID_SUFFIX: &str = "00001000800000805f9b34fb";

const SERVICES: &[(&str, &str, &str)] = &[
    ("1800", "Generic Access", "org.bluetooth.service.generic_access"),
    ("1801", "Generic Attribute", "org.bluetooth.service.generic_attribute"),
    ("1802", "Immediate Alert", "org.bluetooth.service.immediate_alert"),
    ("1803", "Link Loss", "org.bluetooth.service.link_loss"),
    ("1804", "Tx Power", "org.bluetooth.service.tx_power"),
    ("1805", "Current Time Service", "org.bluetooth.service.current_time"),
    ("1806", "Reference Time Update Service", "org.bluetooth.service.reference_time_update"),
    ("1807", "Next DST Change Service", "org.bluetooth.service.next_dst_change"),
    ("1808", "Glucose", "org.bluetooth.service.glucose"),
    ("1809", "Health Thermometer", "org.bluetooth.service.health_thermometer"),
    ("180a", "Device Information", "org.bluetooth.service.device_information"),
    ("180d", "Heart Rate", "org.bluetooth.service.heart_rate"),
    ("180e", "Phone Alert Status Service", "org.bluetooth.service.phone_alert_service"),
    ("180f", "Battery Service", "org.bluetooth.service.battery_service"),
    ("1810", "Blood Pressure", "org.bluetooth.service.blood_pressure"),
    ("1811", "Alert Notification Service", "org.bluetooth.service.alert_notification"),
    ("1812", "Human Interface Device", "org.bluetooth.service.human_interface_device"),
    ("1813", "Scan Parameters", "org.bluetooth.service.scan_parameters"),
    ("1814", "Running Speed and Cadence", "org.bluetooth.service.running_speed_and_cadence"),
    ("1816", "Cycling Speed and Cadence", "org.bluetooth.service.cycling_speed_and_cadence"),
    ("1818", "Cycling Power", "org.bluetooth.service.cycling_power"),
    ("1819", "Location and Navigation", "org.bluetooth.service.location_and_navigation"),
    ("181a", "Environmental Sensing", "org.bluetooth.service.environmental_sensing"),
    ("181c", "User Data", "org.bluetooth.service.user_data"),
    ("181d", "Weight Scale", "org.bluetooth.service.weight_scale"),
];

const CHARACTERISTICS: &[(&str, &str, &str)] = &[
    ("2a00", "Device Name", "org.bluetooth.characteristic.gap.device_name"),
    ("2a01", "Appearance", "org.bluetooth.characteristic.gap.appearance"),
    ("2a02", "Peripheral Privacy Flag", "org.bluetooth.characteristic.gap.peripheral_privacy_flag"),
    ("2a03", "Reconnection Address", "org.bluetooth.characteristic.gap.reconnection_address"),
    (
        "2a04",
        "Peripheral Preferred Connection Parameters",
        "org.bluetooth.characteristic.gap.peripheral_preferred_connection_parameters",
    ),
    ("2a05", "Service Changed", "org.bluetooth.characteristic.gatt.service_changed"),
    ("2a06", "Alert Level", "org.bluetooth.characteristic.alert_level"),
    ("2a07", "Tx Power Level", "org.bluetooth.characteristic.tx_power_level"),
    ("2a19", "Battery Level", "org.bluetooth.characteristic.battery_level"),
    ("2a23", "System ID", "org.bluetooth.characteristic.system_id"),
    ("2a24", "Model Number String", "org.bluetooth.characteristic.model_number_string"),
    ("2a25", "Serial Number String", "org.bluetooth.characteristic.serial_number_string"),
    ("2a26", "Firmware Revision String", "org.bluetooth.characteristic.firmware_revision_string"),
    ("2a27", "Hardware Revision String", "org.bluetooth.characteristic.hardware_revision_string"),
    ("2a28", "Software Revision String", "org.bluetooth.characteristic.software_revision_string"),
    ("2a29", "Manufacturer Name String", "org.bluetooth.characteristic.manufacturer_name_string"),
    (
        "2a2a",
        "IEEE 11073-20601 Regulatory Certification Data List",
        "org.bluetooth.characteristic.ieee_11073-20601_regulatory_certification_data_list",
    ),
    ("2a37", "Heart Rate Measurement", "org.bluetooth.characteristic.heart_rate_measurement"),
    ("2a38", "Body Sensor Location", "org.bluetooth.characteristic.body_sensor_location"),
    ("2a39", "Heart Rate Control Point", "org.bluetooth.characteristic.heart_rate_control_point"),
    ("2a50", "PnP ID", "org.bluetooth.characteristic.pnp_id"),
    ("2a6e", "Temperature", "org.bluetooth.characteristic.temperature"),
    ("2a6f", "Humidity", "org.bluetooth.characteristic.humidity"),
];

/// Reduces a full base-derived UUID to its 16-bit hex form.
fn short_form(uuid: &str) -> &str {
    if uuid.len() == 32 && uuid.starts_with("0000") && uuid.ends_with(BASE_UUID_SUFFIX) {
        &uuid[4..8]
    } else {
        uuid
    }
}

type Table = &'static [(&'static str, &'static str, &'static str)];

fn lookup(table: Table, uuid: &str) -> Option<NameType> {
    let uuid = uuid.to_ascii_lowercase();
    let key = short_form(&uuid);
    table
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|&(_, name, type_)| NameType { name, type_ })
}

/// Looks up a service by its hex UUID.
pub fn service(uuid: &str) -> Option<NameType> {
    lookup(SERVICES, uuid)
}

/// Looks up a characteristic by its hex UUID.
pub fn characteristic(uuid: &str) -> Option<NameType> {
    lookup(CHARACTERISTICS, uuid)
}
