//! Common types for the central role
//!
//! Radio state, characteristic properties, and the peripheral hierarchy that
//! discovery events build up.

use super::registry::{read, HandleMap, Shared};
use crate::uuid::Uuid;
use bitflags::bitflags;
use std::fmt;

/// Power and availability of the local radio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Unknown,
    Resetting,
    Unsupported,
    Unauthorized,
    PoweredOff,
    PoweredOn,
}

impl State {
    /// Maps the daemon's integer state; `None` for values outside the enum.
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(State::Unknown),
            1 => Some(State::Resetting),
            2 => Some(State::Unsupported),
            3 => Some(State::Unauthorized),
            4 => Some(State::PoweredOff),
            5 => Some(State::PoweredOn),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            State::Unknown => "unknown",
            State::Resetting => "resetting",
            State::Unsupported => "unsupported",
            State::Unauthorized => "unauthorized",
            State::PoweredOff => "poweredOff",
            State::PoweredOn => "poweredOn",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Characteristic properties as defined in the Bluetooth specification
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Property: u32 {
        const BROADCAST = 0x01;
        const READ = 0x02;
        const WRITE_WITHOUT_RESPONSE = 0x04;
        const WRITE = 0x08;
        const NOTIFY = 0x10;
        const INDICATE = 0x20;
        const AUTHENTICATED_SIGNED_WRITES = 0x40;
        const EXTENDED_PROPERTIES = 0x80;
    }
}

const PROPERTY_NAMES: [(Property, &str); 8] = [
    (Property::BROADCAST, "broadcast"),
    (Property::READ, "read"),
    (Property::WRITE_WITHOUT_RESPONSE, "writeWithoutResponse"),
    (Property::WRITE, "write"),
    (Property::NOTIFY, "notify"),
    (Property::INDICATE, "indicate"),
    (Property::AUTHENTICATED_SIGNED_WRITES, "authenticateSignedWrites"),
    (Property::EXTENDED_PROPERTIES, "extendedProperties"),
];

impl Property {
    /// Decodes the daemon's raw property integer, keeping bits that have no
    /// named flag.
    pub fn from_raw(raw: i64) -> Self {
        Property::from_bits_retain(raw as u32)
    }

    pub fn can_read(&self) -> bool {
        self.contains(Property::READ)
    }
}

/// Space-joined flag names in declaration order; empty for no flags.
impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = PROPERTY_NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        f.write_str(&names.join(" "))
    }
}

/// One entry of an advertisement's service data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceData {
    pub uuid: String,
    pub data: Vec<u8>,
}

/// Latest advertisement seen for a peripheral
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Advertisement {
    pub local_name: String,
    pub tx_power_level: i32,
    pub manufacturer_data: Option<Vec<u8>>,
    pub service_data: Vec<ServiceData>,
    pub service_uuids: Vec<String>,
}

/// A descriptor discovered on a remote characteristic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacteristicDescriptor {
    pub uuid: String,
    pub handle: u16,
}

/// A characteristic discovered on a remote service
#[derive(Debug, Clone)]
pub struct ServiceCharacteristic {
    pub uuid: String,
    pub name: Option<String>,
    pub type_: Option<String>,
    pub properties: Property,
    /// Declaration handle
    pub handle: u16,
    pub value_handle: u16,
    /// Descriptors, by UUID and by handle
    pub descriptors: HandleMap<CharacteristicDescriptor>,
}

/// A service discovered on a remote peripheral
#[derive(Debug, Clone)]
pub struct ServiceHandle {
    pub uuid: String,
    pub name: Option<String>,
    pub type_: Option<String>,
    pub start_handle: u16,
    pub end_handle: u16,
    /// Characteristics, by UUID, declaration handle and value handle
    pub characteristics: HandleMap<ServiceCharacteristic>,
}

/// A remote device seen while scanning.
///
/// Cloning a peripheral copies its whole GATT hierarchy, so a clone never
/// observes later changes made through the registry.
#[derive(Debug, Clone)]
pub struct Peripheral {
    pub uuid: Uuid,
    pub address: Option<String>,
    pub address_type: Option<String>,
    pub connectable: bool,
    pub advertisement: Advertisement,
    pub rssi: i32,
    /// Services, by UUID and by start handle
    pub services: HandleMap<ServiceHandle>,
}

impl Peripheral {
    pub fn new(uuid: Uuid) -> Self {
        Self {
            uuid,
            address: None,
            address_type: None,
            connectable: false,
            advertisement: Advertisement::default(),
            rssi: 0,
            services: HandleMap::new(),
        }
    }

    /// Finds the characteristic registered under `handle`, scanning services
    /// in discovery order. The first service holding the handle wins.
    pub fn find_characteristic(
        &self,
        handle: u16,
    ) -> Option<(Shared<ServiceHandle>, Shared<ServiceCharacteristic>)> {
        for service in self.services.values() {
            let found = read(service).characteristics.by_handle(handle);
            if let Some(characteristic) = found {
                return Some((service.clone(), characteristic));
            }
        }
        None
    }
}
